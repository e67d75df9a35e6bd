use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_path")]
    pub path: String,
    /// Re-read the catalog file this often; disabled when unset
    pub reload_interval_secs: Option<u64>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            reload_interval_secs: None,
        }
    }
}

fn default_catalog_path() -> String { "data/neighborhoods.json".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_limit() -> u16 { 5 }
fn default_max_limit() -> u16 { 50 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_budget_weight")]
    pub budget: f64,
    #[serde(default = "default_lifestyle_weight")]
    pub lifestyle: f64,
    #[serde(default = "default_priorities_weight")]
    pub priorities: f64,
    #[serde(default = "default_commute_weight")]
    pub commute: f64,
    #[serde(default = "default_safety_weight")]
    pub safety: f64,
    #[serde(default = "default_walkability_weight")]
    pub walkability: f64,
    #[serde(default = "default_amenities_weight")]
    pub amenities: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            budget: default_budget_weight(),
            lifestyle: default_lifestyle_weight(),
            priorities: default_priorities_weight(),
            commute: default_commute_weight(),
            safety: default_safety_weight(),
            walkability: default_walkability_weight(),
            amenities: default_amenities_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            budget: config.budget,
            lifestyle: config.lifestyle,
            priorities: config.priorities,
            commute: config.commute,
            safety: config.safety,
            walkability: config.walkability,
            amenities: config.amenities,
        }
    }
}

fn default_budget_weight() -> f64 { 0.25 }
fn default_lifestyle_weight() -> f64 { 0.20 }
fn default_priorities_weight() -> f64 { 0.20 }
fn default_commute_weight() -> f64 { 0.15 }
fn default_safety_weight() -> f64 { 0.10 }
fn default_walkability_weight() -> f64 { 0.05 }
fn default_amenities_weight() -> f64 { 0.05 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
    Full,
}

impl LoggingSettings {
    /// Configured format; unrecognized names fall back to `Full`
    pub fn log_format(&self) -> LogFormat {
        match self.format.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Full,
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with NEIGHBORLY__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., NEIGHBORLY__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        Self::finish(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        Self::finish(settings)
    }

    /// Load configuration from an in-memory TOML document
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?;

        Self::finish(settings)
    }

    /// Scoring weights, checked for use by the matcher
    pub fn scoring_weights(&self) -> Result<ScoringWeights, ConfigError> {
        let weights = ScoringWeights::from(&self.scoring.weights);
        weights
            .validate()
            .map_err(|e| ConfigError::Message(format!("scoring.weights: {}", e)))?;
        Ok(weights)
    }

    fn finish(settings: Config) -> Result<Self, ConfigError> {
        let settings: Self = settings.try_deserialize()?;
        settings.scoring_weights()?;

        if settings.matching.default_limit == 0 || settings.matching.default_limit > settings.matching.max_limit {
            return Err(ConfigError::Message(format!(
                "matching.default_limit must be between 1 and max_limit ({})",
                settings.matching.max_limit
            )));
        }

        Ok(settings)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("NEIGHBORLY")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
