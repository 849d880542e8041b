//! Core domain types and engine logic.

pub mod player;
pub mod record;
pub mod stats;
pub mod confidence;
pub mod projection;
pub mod price;
pub mod valuation;
pub mod trade;
pub mod batch;
pub mod roster;
pub mod engine_config;
pub mod config_validation;
pub mod error;
