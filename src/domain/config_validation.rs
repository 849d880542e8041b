//! Configuration validation.
//!
//! Runs before any engine component is built. Missing keys are fine (they
//! fall back to defaults); present keys must be in range.

use crate::domain::error::EngineError;
use crate::ports::config_port::ConfigPort;

const WEIGHT_KEYS: [&str; 7] = [
    "season_average",
    "last_three",
    "last_five",
    "last_vs_opponent",
    "last_three_vs_opponent",
    "last_at_venue",
    "last_three_at_venue",
];

pub fn validate_engine_config(config: &dyn ConfigPort) -> Result<(), EngineError> {
    validate_weights(config)?;
    validate_magic_number(config)?;
    validate_valuation(config)?;
    validate_trade(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), EngineError> {
    match config.get_string("data", "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(EngineError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> EngineError {
    EngineError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_weights(config: &dyn ConfigPort) -> Result<(), EngineError> {
    for key in WEIGHT_KEYS {
        let value = config.get_double("projection", key, 0.0);
        if value < 0.0 || !value.is_finite() {
            return Err(invalid(
                "projection",
                key,
                "weight must be a non-negative number",
            ));
        }
    }
    Ok(())
}

fn validate_magic_number(config: &dyn ConfigPort) -> Result<(), EngineError> {
    let value = config.get_double("price", "magic_number", 1.0);
    if value <= 0.0 || !value.is_finite() {
        return Err(invalid("price", "magic_number", "magic_number must be positive"));
    }
    Ok(())
}

fn validate_valuation(config: &dyn ConfigPort) -> Result<(), EngineError> {
    let ceiling = config.get_double("valuation", "ceiling_multiplier", 1.2);
    if ceiling < 1.0 {
        return Err(invalid(
            "valuation",
            "ceiling_multiplier",
            "ceiling_multiplier must be at least 1",
        ));
    }

    let floor = config.get_double("valuation", "floor_multiplier", 0.8);
    if floor <= 0.0 || floor > 1.0 {
        return Err(invalid(
            "valuation",
            "floor_multiplier",
            "floor_multiplier must be between 0 and 1",
        ));
    }

    let default_ceiling = config.get_double("valuation", "default_ceiling_score", 100.0);
    let default_floor = config.get_double("valuation", "default_floor_score", 40.0);
    if default_floor < 0.0 {
        return Err(invalid(
            "valuation",
            "default_floor_score",
            "default_floor_score must be non-negative",
        ));
    }
    if default_floor > default_ceiling {
        return Err(invalid(
            "valuation",
            "default_floor_score",
            "default_floor_score must not exceed default_ceiling_score",
        ));
    }
    Ok(())
}

fn validate_trade(config: &dyn ConfigPort) -> Result<(), EngineError> {
    let price_factor = config.get_double("trade", "price_factor", 1.0);
    if price_factor <= 0.0 || !price_factor.is_finite() {
        return Err(invalid("trade", "price_factor", "price_factor must be positive"));
    }

    let weeks = config.get_int("trade", "weeks", 1);
    if weeks < 1 {
        return Err(invalid("trade", "weeks", "weeks must be at least 1"));
    }
    if u32::try_from(weeks).is_err() {
        return Err(invalid("trade", "weeks", "weeks is too large"));
    }

    let rookie = config.get_int("trade", "rookie_max_price", 300_000);
    let premium = config.get_int("trade", "premium_min_price", 800_000);
    if rookie <= 0 {
        return Err(invalid(
            "trade",
            "rookie_max_price",
            "rookie_max_price must be positive",
        ));
    }
    if rookie >= premium {
        return Err(invalid(
            "trade",
            "rookie_max_price",
            "rookie_max_price must be below premium_min_price",
        ));
    }
    Ok(())
}
