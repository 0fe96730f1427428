//! Serializable gateway configuration.
//!
//! A TOML file carries the risk settings snapshot and the paper gateway's
//! mark prices. Loaded fresh by the operator tooling; the engines only ever
//! see the resulting `RiskSettings` value.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tradegate_core::domain::RiskSettings;

/// Errors from loading a gateway config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration for the order gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Risk limit snapshot applied to every admission decision.
    pub risk: RiskSettings,

    /// Mark prices for the paper execution gateway, keyed by symbol.
    pub paper_marks: HashMap<String, f64>,
}

impl GatewayConfig {
    /// Load from a TOML file. Missing sections fall back to defaults.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}
