use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{CleanerError, Result};

/// Environment variable naming the TOML config file
pub const CONFIG_ENV_VAR: &str = "RETAIL_CLEANER_CONFIG";
/// Config file looked up in the working directory when nothing else is given
pub const DEFAULT_CONFIG_PATH: &str = "cleaner.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub weight: WeightConfig,
    pub report: ReportConfig,
    pub output: OutputConfig,
}

/// What to do with a weight that parsed but could not be converted
/// (for example a multipack with three numbers in it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    Null,
    Drop,
}

/// What to do with a weight that leaves non-numeric residue after unit stripping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    Abort,
    Null,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    /// Converted weights strictly below this are treated as grams mislabeled as kilograms
    pub correction_threshold_kg: f64,
    pub correction_factor: f64,
    pub on_failure: FailurePolicy,
    pub on_malformed: MalformedPolicy,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            correction_threshold_kg: 0.01,
            correction_factor: 1000.0,
            on_failure: FailurePolicy::Null,
            on_malformed: MalformedPolicy::Abort,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Sample values kept per column in the report summary
    pub sample_size: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { sample_size: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty_json: true }
    }
}

impl Config {
    /// Load configuration using the env var, then `cleaner.toml`, then built-in defaults.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::load_from(&path);
        }

        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            return Self::load_from(DEFAULT_CONFIG_PATH);
        }

        Ok(Self::default())
    }

    pub fn load_from(config_path: &str) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            CleanerError::Config(format!("Failed to read config file '{}': {}", config_path, e))
        })?;

        let config = Self::from_toml_str(&config_content)?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.weight.correction_threshold_kg >= 0.0) {
            return Err(CleanerError::Config(
                "weight.correction_threshold_kg must be a non-negative number".to_string(),
            ));
        }
        if !(self.weight.correction_factor > 0.0) {
            return Err(CleanerError::Config(
                "weight.correction_factor must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_observed_catalog() {
        let config = Config::default();
        assert_eq!(config.weight.correction_threshold_kg, 0.01);
        assert_eq!(config.weight.correction_factor, 1000.0);
        assert_eq!(config.weight.on_failure, FailurePolicy::Null);
        assert_eq!(config.weight.on_malformed, MalformedPolicy::Abort);
        assert_eq!(config.report.sample_size, 5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [weight]
            on_failure = "drop"
            "#,
        )
        .unwrap();

        assert_eq!(config.weight.on_failure, FailurePolicy::Drop);
        assert_eq!(config.weight.correction_threshold_kg, 0.01);
        assert!(config.output.pretty_json);
    }

    #[test]
    fn test_rejects_non_positive_factor() {
        let result = Config::from_toml_str(
            r#"
            [weight]
            correction_factor = 0.0
            "#,
        );
        assert!(matches!(result, Err(CleanerError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = Config::load_from("/definitely/not/here.toml");
        assert!(matches!(result, Err(CleanerError::Config(_))));
    }
}
