//! rosteredge: fantasy score projection, price simulation and trade analysis.
//!
//! Hexagonal architecture: engine logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], and the command line in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
