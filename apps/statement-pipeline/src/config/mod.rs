//! Configuration for the statement pipeline.
//!
//! Provides YAML configuration loading with environment variable
//! interpolation. Every policy table the pipeline consults — scoring
//! bands, severity thresholds, alert thresholds, the risk-free rate —
//! lives here so it can be tuned and tested without touching the engine.
//!
//! # Usage
//!
//! ```rust,ignore
//! use statement_pipeline::config::{Config, load_config};
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Access configuration values
//! println!("risk-free rate: {}", config.pipeline.risk_free_rate);
//! ```

mod alerts;
mod behavior;
mod pipeline;
mod scoring;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use alerts::{AlertThresholds, ThresholdPair};
pub use behavior::{BehaviorConfig, BehaviorScoreWeights, SeverityBands};
pub use pipeline::PipelineParams;
pub use scoring::{PerformanceBands, RiskBands, ScoreBand, ScoringConfig};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// General pipeline parameters.
    #[serde(default)]
    pub pipeline: PipelineParams,
    /// Scoring policy.
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Behavior detection policy.
    #[serde(default)]
    pub behavior: BehaviorConfig,
    /// Alert thresholds.
    #[serde(default)]
    pub alerts: AlertThresholds,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable
/// interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let mut result = input.to_string();

    // Match ${VAR} or ${VAR:-default} patterns
    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    for cap in re.captures_iter(input) {
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        let Some(var_match) = cap.get(1) else {
            continue;
        };
        let full_match = full_match.as_str();
        let var_name = var_match.as_str();
        let default_value = cap.get(2).map(|m| m.as_str());

        let value = match std::env::var(var_name) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        };

        result = result.replace(full_match, &value);
    }

    result
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let params = &config.pipeline;

    if params.risk_free_rate < Decimal::ZERO || params.risk_free_rate > Decimal::ONE {
        return Err(ConfigError::ValidationError(
            "pipeline.risk_free_rate must be between 0.0 and 1.0".to_string(),
        ));
    }

    if params.trading_days_per_year == 0 {
        return Err(ConfigError::ValidationError(
            "pipeline.trading_days_per_year must be positive".to_string(),
        ));
    }

    if params.min_observations < 2 {
        return Err(ConfigError::ValidationError(
            "pipeline.min_observations must be at least 2".to_string(),
        ));
    }

    if params.gap_days < 1 {
        return Err(ConfigError::ValidationError(
            "pipeline.gap_days must be at least 1".to_string(),
        ));
    }

    for (name, band) in [
        ("scoring.performance.total_return", config.scoring.performance.total_return),
        ("scoring.performance.sharpe_ratio", config.scoring.performance.sharpe_ratio),
        ("scoring.performance.max_drawdown", config.scoring.performance.max_drawdown),
        ("scoring.performance.win_rate", config.scoring.performance.win_rate),
        ("scoring.risk.avg_margin_ratio", config.scoring.risk.avg_margin_ratio),
        ("scoring.risk.volatility", config.scoring.risk.volatility),
        ("scoring.risk.max_drawdown", config.scoring.risk.max_drawdown),
    ] {
        if band.weight < Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "{name}.weight must be non-negative"
            )));
        }
        if band.best == band.worst {
            return Err(ConfigError::ValidationError(format!(
                "{name}: best and worst must differ"
            )));
        }
    }

    for (name, bands) in [
        ("behavior.loss_ratio", config.behavior.loss_ratio),
        ("behavior.change_pct", config.behavior.change_pct),
    ] {
        if bands.medium > bands.high {
            return Err(ConfigError::ValidationError(format!(
                "{name}: medium threshold must not exceed high threshold"
            )));
        }
    }

    for (name, pair) in [
        ("alerts.margin_ratio", config.alerts.margin_ratio),
        ("alerts.gross_exposure", config.alerts.gross_exposure),
        ("alerts.top1_concentration", config.alerts.top1_concentration),
        ("alerts.max_drawdown", config.alerts.max_drawdown),
    ] {
        if pair.warning > pair.danger {
            return Err(ConfigError::ValidationError(format!(
                "{name}: warning threshold must not exceed danger threshold"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.pipeline.risk_free_rate, dec!(0.03));
        assert_eq!(config.pipeline.trading_days_per_year, 252);
        assert_eq!(config.scoring.performance.total_return.weight, dec!(40));
        assert_eq!(config.alerts.margin_ratio.danger, dec!(0.80));
    }

    #[test]
    fn test_load_minimal_config() {
        let yaml = r"
pipeline:
  risk_free_rate: 0.025
";
        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load minimal config: {e}"),
        };
        assert_eq!(config.pipeline.risk_free_rate, dec!(0.025));
        // Unspecified sections fall back to defaults
        assert_eq!(config.scoring.performance.sharpe_ratio.weight, dec!(30));
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "rate: ${PIPELINE_CONFIG_TEST_NONEXISTENT_VAR:-0.03}";
        let result = interpolate_env_vars(input);
        assert_eq!(result, "rate: 0.03");
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "rate: ${PIPELINE_CONFIG_TEST_UNLIKELY_TO_EXIST}";
        let result = interpolate_env_vars(input);
        assert_eq!(result, "rate: ");
    }

    #[test]
    fn test_validation_invalid_risk_free_rate() {
        let yaml = r"
pipeline:
  risk_free_rate: 1.5
";
        let result = load_config_from_string(yaml);
        let Err(err) = result else {
            panic!("expected error for invalid risk_free_rate");
        };
        assert!(err.to_string().contains("risk_free_rate"));
    }

    #[test]
    fn test_validation_inverted_alert_pair() {
        let yaml = r"
alerts:
  margin_ratio:
    warning: 0.9
    danger: 0.8
";
        let result = load_config_from_string(yaml);
        let Err(err) = result else {
            panic!("expected error for inverted thresholds");
        };
        assert!(err.to_string().contains("margin_ratio"));
    }

    #[test]
    fn test_validation_degenerate_band() {
        let yaml = r"
scoring:
  performance:
    sharpe_ratio:
      best: 1.0
      worst: 1.0
      weight: 30
";
        let result = load_config_from_string(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r"
pipeline:
  risk_free_rate: 0.02
  trading_days_per_year: 250
  min_observations: 5

scoring:
  performance:
    total_return:
      best: 0.20
      worst: -0.10
      weight: 40

behavior:
  loss_ratio:
    high: 0.10
    medium: 0.04

alerts:
  margin_ratio:
    warning: 0.5
    danger: 0.7
";
        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load full config: {e}"),
        };

        assert_eq!(config.pipeline.trading_days_per_year, 250);
        assert_eq!(config.pipeline.min_observations, 5);
        assert_eq!(config.scoring.performance.total_return.best, dec!(0.20));
        assert_eq!(config.behavior.loss_ratio.high, dec!(0.10));
        assert_eq!(config.alerts.margin_ratio.warning, dec!(0.5));
    }
}
