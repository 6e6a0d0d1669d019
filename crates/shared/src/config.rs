//! Engine configuration
//!
//! Configuration is loaded once at startup from `MAIZTER_*` environment
//! variables and passed down via dependency injection. Missing or malformed
//! values fail fast with a typed error; there are no silent fallbacks for
//! invalid input, only documented defaults for absent optional variables.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration loading or validation
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration: {var}")]
    MissingRequired { var: String },

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },

    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Runtime configuration for the tenant lifecycle engine
///
/// # Environment Variables
///
/// All variables are optional and fall back to the documented defaults:
///
/// - `MAIZTER_WORKLOAD_TIMEOUT_SECS`: upper bound for a single workload
///   controller scale call (default: 30)
/// - `MAIZTER_HISTORY_PAGE_SIZE`: default page size for history queries
///   (default: 50)
/// - `MAIZTER_SCHEDULER_MAX_SLEEP_SECS`: cap on a single timer sleep so idle
///   timers re-evaluate their schedule periodically (default: 3600)
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Bounded timeout for workload controller calls
    pub workload_timeout: Duration,
    /// Default limit for history queries when the caller passes none
    pub history_page_size: usize,
    /// Maximum single sleep of a schedule timer
    pub scheduler_max_sleep: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workload_timeout: Duration::from_secs(30),
            history_page_size: 50,
            scheduler_max_sleep: Duration::from_secs(3600),
        }
    }
}

impl EngineConfig {
    /// Build the configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            workload_timeout: Duration::from_secs(parse_optional(
                "MAIZTER_WORKLOAD_TIMEOUT_SECS",
                defaults.workload_timeout.as_secs(),
            )?),
            history_page_size: parse_optional(
                "MAIZTER_HISTORY_PAGE_SIZE",
                defaults.history_page_size as u64,
            )? as usize,
            scheduler_max_sleep: Duration::from_secs(parse_optional(
                "MAIZTER_SCHEDULER_MAX_SLEEP_SECS",
                defaults.scheduler_max_sleep.as_secs(),
            )?),
        })
    }

    /// Validate cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.workload_timeout.is_zero() {
            return Err(ConfigError::Validation(
                "workload timeout must be greater than zero".to_string(),
            ));
        }
        if self.history_page_size == 0 {
            return Err(ConfigError::Validation(
                "history page size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_optional(var: &str, default: u64) -> Result<u64> {
    match std::env::var(var) {
        Ok(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw,
        }),
        Err(std::env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(ConfigError::InvalidValue {
            var: var.to_string(),
            value: e.to_string(),
        }),
    }
}
