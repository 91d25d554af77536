//! Configuration management and validation.
//!
//! Provides configuration structures for eBird API access, link building,
//! reference data locations and request defaults. Configuration is layered:
//! built-in defaults, then an optional TOML file, then environment variables,
//! with CLI flags applied last by the caller.

use crate::constants::{
    API_BASE_URL_ENV, DEFAULT_DAYS_BACK, DEFAULT_REQUEST_TIMEOUT_SECS, DIRECTIONS_BASE_URL,
    EBIRD_API_BASE_URL, EBIRD_TOKEN_ENV, HOTSPOT_BASE_URL, MAX_CONCURRENT_REQUESTS,
    MAX_DAYS_BACK, MIN_DAYS_BACK, SPECIES_INFO_BASE_URL, default_concurrent_requests,
};
use crate::error::{LifersError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// eBird API access settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, without trailing slash
    pub base_url: String,

    /// API token; never written back out
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Bound on concurrent per-species requests
    pub max_concurrent_requests: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: EBIRD_API_BASE_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_concurrent_requests: default_concurrent_requests(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Base URLs for links shown alongside results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub species_info_base_url: String,
    pub hotspot_base_url: String,
    pub directions_base_url: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            species_info_base_url: SPECIES_INFO_BASE_URL.to_string(),
            hotspot_base_url: HOTSPOT_BASE_URL.to_string(),
            directions_base_url: DIRECTIONS_BASE_URL.to_string(),
        }
    }
}

/// Locations of the reference tables; `None` uses the bundled copy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    pub taxonomy_path: Option<PathBuf>,
    pub country_codes_path: Option<PathBuf>,
}

/// Request defaults used when the caller does not specify them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDefaults {
    pub days_back: u32,
    pub country: String,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            days_back: DEFAULT_DAYS_BACK,
            country: "Australia".to_string(),
        }
    }
}

/// Global configuration for the needs finder
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LifersConfig {
    pub api: ApiConfig,
    pub links: LinkConfig,
    pub reference: ReferenceConfig,
    pub defaults: RequestDefaults,
}

impl LifersConfig {
    /// Default config file location: `<config_dir>/lifers/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            LifersError::configuration("Could not determine user config directory")
        })?;
        Ok(config_dir.join("lifers").join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LifersError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&contents).map_err(|e| {
            LifersError::configuration(format!(
                "Invalid config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Load with layered approach (defaults -> file -> environment)
    ///
    /// An explicit `config_file` must exist; otherwise the default location is
    /// used only when present.
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Ok(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env_overrides();
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var(EBIRD_TOKEN_ENV) {
            if !token.trim().is_empty() {
                self.api.token = Some(token.trim().to_string());
            }
        }
        if let Ok(base_url) = std::env::var(API_BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                self.api.base_url = base_url.trim().to_string();
            }
        }
    }

    /// Set the API token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api.token = Some(token.into());
        self
    }

    /// Set the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    /// Set the bound on concurrent per-species requests
    pub fn with_max_concurrent_requests(mut self, max_requests: usize) -> Self {
        self.api.max_concurrent_requests = max_requests;
        self
    }

    /// Set the default observation window
    pub fn with_days_back(mut self, days_back: u32) -> Self {
        self.defaults.days_back = days_back;
        self
    }

    /// Use an external taxonomy file instead of the bundled one
    pub fn with_taxonomy_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.reference.taxonomy_path = Some(path.into());
        self
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(LifersError::configuration("API base URL must not be empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(LifersError::configuration(
                "Request timeout must be greater than 0",
            ));
        }
        if self.api.max_concurrent_requests == 0
            || self.api.max_concurrent_requests > MAX_CONCURRENT_REQUESTS
        {
            return Err(LifersError::configuration(format!(
                "Concurrent requests must be between 1 and {}",
                MAX_CONCURRENT_REQUESTS
            )));
        }
        validate_days_back(self.defaults.days_back)?;
        Ok(())
    }

    /// The API token, required by every command that calls eBird
    pub fn require_token(&self) -> Result<&str> {
        self.api
            .token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                LifersError::configuration(format!(
                    "Environment variable '{}' is not set. Please set it before running.",
                    EBIRD_TOKEN_ENV
                ))
            })
    }
}

/// Check an observation window against the range eBird accepts
pub fn validate_days_back(days_back: u32) -> Result<()> {
    if !(MIN_DAYS_BACK..=MAX_DAYS_BACK).contains(&days_back) {
        return Err(LifersError::configuration(format!(
            "Days back must be between {} and {}, got {}",
            MIN_DAYS_BACK, MAX_DAYS_BACK, days_back
        )));
    }
    Ok(())
}
