// ⚙️ Configuration - thresholds and display settings
//
// Values come from defaults, overridden by environment variables:
//   PAYEE_REVIEW_THRESHOLD   confidence below which a record needs review
//   PAYEE_SHARE_TOLERANCE    allowed drift of category shares from 100
//   PAYEE_CONTRACT_ADDR      listen address of the server binary

use crate::entities::PayeeType;
use std::env;
use thiserror::Error;

pub const REVIEW_THRESHOLD_VAR: &str = "PAYEE_REVIEW_THRESHOLD";
pub const SHARE_TOLERANCE_VAR: &str = "PAYEE_SHARE_TOLERANCE";
pub const ADDR_VAR: &str = "PAYEE_CONTRACT_ADDR";

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a number, got {value:?}")]
    NotANumber { var: &'static str, value: String },

    #[error("{var} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        var: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

// ============================================================================
// CONTRACT CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ContractConfig {
    /// Auto-classified records below this confidence go to review
    pub review_threshold: f64,

    /// Category shares may sum to 100 ± this
    pub share_tolerance: f64,

    /// Chart colors, one per payee type in `PayeeType::ALL` order
    pub palette: [&'static str; 7],
}

impl Default for ContractConfig {
    fn default() -> Self {
        ContractConfig {
            review_threshold: 0.7,
            share_tolerance: 0.5,
            palette: [
                "#4CAF50", // Individual
                "#2196F3", // Business
                "#9C27B0", // Government
                "#FF9800", // Insurance
                "#3F51B5", // Banking
                "#607D8B", // Internal Transfer
                "#9E9E9E", // Unknown
            ],
        }
    }
}

impl ContractConfig {
    /// Defaults overridden by whatever is set in the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = ContractConfig::default();

        if let Some(value) = read_ratio(REVIEW_THRESHOLD_VAR, 0.0, 1.0)? {
            config.review_threshold = value;
        }
        if let Some(value) = read_ratio(SHARE_TOLERANCE_VAR, 0.0, 100.0)? {
            config.share_tolerance = value;
        }

        Ok(config)
    }

    pub fn color_for(&self, payee_type: PayeeType) -> &'static str {
        let index = PayeeType::ALL
            .iter()
            .position(|t| *t == payee_type)
            .unwrap_or(PayeeType::ALL.len() - 1);
        self.palette[index]
    }
}

fn read_ratio(var: &'static str, min: f64, max: f64) -> Result<Option<f64>, ConfigError> {
    match env::var(var) {
        Ok(raw) => parse_bounded(var, &raw, min, max).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_bounded(var: &'static str, raw: &str, min: f64, max: f64) -> Result<f64, ConfigError> {
    let value: f64 = raw.trim().parse().map_err(|_| ConfigError::NotANumber {
        var,
        value: raw.to_string(),
    })?;

    if !(min..=max).contains(&value) {
        return Err(ConfigError::OutOfRange { var, value, min, max });
    }

    Ok(value)
}

// ============================================================================
// SERVER CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub addr: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        ServerConfig {
            addr: env::var(ADDR_VAR).unwrap_or_else(|_| DEFAULT_ADDR.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ContractConfig::default();

        assert_eq!(config.review_threshold, 0.7);
        assert_eq!(config.color_for(PayeeType::Business), "#2196F3");
        assert_eq!(config.color_for(PayeeType::Unknown), "#9E9E9E");
    }

    #[test]
    fn test_parse_bounded() {
        assert_eq!(parse_bounded("X", " 0.85 ", 0.0, 1.0).unwrap(), 0.85);

        let err = parse_bounded("X", "high", 0.0, 1.0).unwrap_err();
        assert!(matches!(err, ConfigError::NotANumber { .. }));

        let err = parse_bounded("X", "1.5", 0.0, 1.0).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));
        println!("{}", err);
    }
}
