//! INI file configuration adapter.

use crate::domain::error::EngineError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;
use tracing::debug;

/// Sections the engine reads. Anything else in the file is reported by
/// [`FileConfigAdapter::unknown_sections`].
pub const KNOWN_SECTIONS: [&str; 6] = ["data", "projection", "price", "valuation", "trade", "output"];

/// [`ConfigPort`] backed by an INI file or string.
#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| EngineError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        debug!(file = %path.display(), sections = config.sections().len(), "loaded config");
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, EngineError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| EngineError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    /// Section names present in the file but not read by the engine, sorted.
    pub fn unknown_sections(&self) -> Vec<String> {
        let mut unknown: Vec<String> = self
            .config
            .sections()
            .into_iter()
            .filter(|s| s != "default" && !KNOWN_SECTIONS.contains(&s.as_str()))
            .collect();
        unknown.sort();
        unknown
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key).filter(|v| !v.trim().is_empty())
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        match self.config.getint(section, key) {
            Ok(Some(v)) => v,
            _ => default,
        }
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        match self.config.getfloat(section, key) {
            Ok(Some(v)) => v,
            _ => default,
        }
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.get_string(section, key)
            .and_then(|v| parse_bool(&v))
            .unwrap_or(default)
    }
}
