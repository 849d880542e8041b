//! Port traits the engine depends on.

pub mod config_port;
pub mod history_port;
