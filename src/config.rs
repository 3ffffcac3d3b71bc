//! # Configuration Management
//!
//! This module handles loading and saving the almanac-config.toml file: where
//! the diary keeper lives, which UTC offset their calendar follows, and how many
//! days a report covers.

use crate::error::AlmanacError;
use crate::observer::Observer;
use chrono::FixedOffset;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "almanac-config.toml";

/// Errors from reading, writing or interpreting the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("UTC offset {0} h is outside ±24 h")]
    UtcOffset(f64),

    #[error(transparent)]
    Observer(#[from] AlmanacError),
}

/// Application configuration loaded from almanac-config.toml
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Where the sky is observed from
    pub observer: ObserverConfig,
    /// What a report covers
    pub report: ReportConfig,
}

/// Observer location and calendar offset
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObserverConfig {
    /// Human-readable place name for the report header
    pub name: String,
    /// Degrees north, -90 to 90
    pub latitude: f64,
    /// Degrees east, -180 to 180
    pub longitude: f64,
    /// Metres above sea level
    pub elevation_m: f64,
    /// Hours east of UTC; fractional offsets such as 5.5 are allowed
    pub utc_offset_hours: f64,
}

/// Report options
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Consecutive days to report, starting at the requested date
    pub days: u32,
    /// Include solar and lunar transit columns
    pub show_transits: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            observer: ObserverConfig {
                name: "Akashi, Japan".to_string(),
                latitude: 35.0,
                longitude: 135.0,
                elevation_m: 0.0,
                utc_offset_hours: 9.0, // JST
            },
            report: ReportConfig {
                days: 7,
                show_transits: true,
            },
        }
    }
}

impl Config {
    /// Load configuration from almanac-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_load_from_path(&path) {
            Ok(config) => {
                info!("Loaded configuration for {}", config.observer.name);
                config
            }
            Err(ConfigError::Io(e)) => {
                warn!(
                    "No config file at {} ({}), using default configuration (Akashi, Japan)",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
            Err(e) => {
                warn!("{}; using default configuration (Akashi, Japan)", e);
                Self::default()
            }
        }
    }

    /// Load configuration from specified path without falling back.
    pub fn try_load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save current configuration as pretty TOML
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Validated observer for the configured location.
    pub fn observer(&self) -> Result<Observer, ConfigError> {
        let o = &self.observer;
        Ok(Observer::new(o.latitude, o.longitude, o.elevation_m)?)
    }

    /// Configured UTC offset, rounded to the second.
    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        let hours = self.observer.utc_offset_hours;
        if !hours.is_finite() || hours.abs() >= 24.0 {
            return Err(ConfigError::UtcOffset(hours));
        }
        FixedOffset::east_opt((hours * 3600.0).round() as i32).ok_or(ConfigError::UtcOffset(hours))
    }
}
