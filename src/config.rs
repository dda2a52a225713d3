//! Portal configuration.
//!
//! Values come from built-in defaults, then an optional JSON file named by
//! `COHORT_PORTAL_CONFIG`, then individual environment overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE_ENV: &str = "COHORT_PORTAL_CONFIG";
pub const HOST_ENV: &str = "COHORT_PORTAL_HOST";
pub const PORT_ENV: &str = "COHORT_PORTAL_PORT";
pub const LOG_ENV: &str = "COHORT_PORTAL_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Invalid config JSON: {0}")]
    InvalidJson(String),

    #[error("Invalid port '{0}'")]
    InvalidPort(String),

    #[error("Invalid points policy: min {min}, max {max}")]
    InvalidPointsPolicy { min: i64, max: i64 },
}

/// Bounds a mentor may award in one assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsPolicy {
    pub min: i64,
    pub max: i64,
    pub default_award: i64,
}

impl Default for PointsPolicy {
    fn default() -> Self {
        Self {
            min: 1,
            max: 100,
            default_award: 10,
        }
    }
}

impl PointsPolicy {
    pub fn contains(&self, delta: i64) -> bool {
        (self.min..=self.max).contains(&delta)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min < 1 || self.min > self.max {
            return Err(ConfigError::InvalidPointsPolicy {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub bind_host: String,
    pub port: u16,
    pub log_level: String,
    pub points: PointsPolicy,
    pub welcome_top_n: usize,
    pub preview_top_n: usize,
    pub badge_slots: usize,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            bind_host: "127.0.0.1".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            points: PointsPolicy::default(),
            welcome_top_n: 3,
            preview_top_n: 5,
            badge_slots: 4,
        }
    }
}

impl PortalConfig {
    /// Load from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(path.trim()))?,
            _ => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.points.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| ConfigError::InvalidJson(e.to_string()))?;
        config.points.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup; split out so tests need not touch the real env.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(HOST_ENV).filter(|h| !h.trim().is_empty()) {
            self.bind_host = host.trim().to_string();
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Some(level) = lookup(LOG_ENV).filter(|l| !l.trim().is_empty()) {
            self.log_level = level.trim().to_string();
        }
        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.bind_host.clone(), self.port)
    }
}
