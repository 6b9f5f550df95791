//! Application configuration.
//!
//! Settings come from an optional TOML file; every key has a default, so an empty file
//! (or no file) is valid. A few environment variables override the file afterwards:
//!
//! | variable                          | overrides                  |
//! |-----------------------------------|----------------------------|
//! | `DATABASE_URL`                    | `database_url`             |
//! | `VOLSIGHT_PROVIDER_URL`           | `provider.base_url`        |
//! | `VOLSIGHT_PROVIDER_TIMEOUT_SECS`  | `provider.timeout_secs`    |
//!
//! ```toml
//! database_url = "data/price_cache.db"
//! default_lookback_years = 5
//!
//! [provider]
//! base_url = "https://query1.finance.yahoo.com"
//! timeout_secs = 30
//! ```

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use price_ingestor::providers::yahoo_chart::{
    YahooChartConfig,
    provider::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT},
};
use serde::{Deserialize, Serialize};
use shared_utils::env::{InvalidEnvVarError, env_override, parse_env_override};
use thiserror::Error;

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const PROVIDER_URL_ENV: &str = "VOLSIGHT_PROVIDER_URL";
pub const PROVIDER_TIMEOUT_ENV: &str = "VOLSIGHT_PROVIDER_TIMEOUT_SECS";

pub const DEFAULT_DATABASE_URL: &str = "price_cache.db";
pub const DEFAULT_LOOKBACK_YEARS: u32 = 5;

/// Errors related to application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Env(#[from] InvalidEnvVarError),

    #[error("default_lookback_years must be at least 1")]
    ZeroLookback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// SQLite path or `sqlite://` URL of the price cache.
    pub database_url: String,
    /// Lookback used when a request does not name one.
    pub default_lookback_years: u32,
    pub provider: ProviderSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            default_lookback_years: DEFAULT_LOOKBACK_YEARS,
            provider: ProviderSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderSettings {
    pub base_url: String,
    pub user_agent: String,
    /// Whole-request timeout. Unset means the fetch is unbounded.
    pub timeout_secs: Option<u64>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: None,
        }
    }
}

impl ProviderSettings {
    pub fn chart_config(&self) -> YahooChartConfig {
        YahooChartConfig {
            base_url: self.base_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

impl AppConfig {
    /// Parses and validates a TOML document. Environment overrides are not applied.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path` when given (defaults otherwise), then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&s)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Replaces settings with any non-blank override variables.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(url) = env_override(DATABASE_URL_ENV) {
            self.database_url = url;
        }
        if let Some(url) = env_override(PROVIDER_URL_ENV) {
            self.provider.base_url = url;
        }
        if let Some(secs) = parse_env_override::<u64>(PROVIDER_TIMEOUT_ENV)? {
            self.provider.timeout_secs = Some(secs);
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_lookback_years == 0 {
            return Err(ConfigError::ZeroLookback);
        }
        Ok(())
    }
}
