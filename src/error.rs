//! Error handling for lifelist and needs processing.
//!
//! Provides error types with context for reference data loading, lifelist
//! validation, eBird API access and report output.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LifersError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reference data '{source_name}' unavailable: {reason}")]
    DataUnavailable { source_name: String, reason: String },

    #[error("Error parsing the CSV file: {reason}")]
    Format { reason: String },

    #[error("Missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("API request to {url} failed{}: {reason}", .status.map(|s| format!(" with status code {s}")).unwrap_or_default())]
    RemoteService {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("Fetching recent observations for species '{species_code}' failed")]
    SpeciesFetchFailed {
        species_code: String,
        #[source]
        source: Box<LifersError>,
    },

    #[error("Invalid region code: '{code}'")]
    InvalidRegionCode { code: String },

    #[error("Unknown region '{name}' in {parent}")]
    UnknownRegion { name: String, parent: String },

    #[error("Output path is not a directory: {path}")]
    InvalidOutputPath { path: PathBuf },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl LifersError {
    pub fn data_unavailable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::DataUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn format(reason: impl ToString) -> Self {
        Self::Format {
            reason: reason.to_string(),
        }
    }

    /// Non-200 response from the eBird API
    pub fn remote_status(url: impl Into<String>, status: u16) -> Self {
        Self::RemoteService {
            url: url.into(),
            status: Some(status),
            reason: "unexpected response status".to_string(),
        }
    }

    /// Network-level or payload failure talking to the eBird API
    pub fn remote(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::RemoteService {
            url: url.into(),
            status: None,
            reason: reason.to_string(),
        }
    }

    pub fn species_fetch_failed(species_code: impl Into<String>, source: LifersError) -> Self {
        Self::SpeciesFetchFailed {
            species_code: species_code.into(),
            source: Box::new(source),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// HTTP status carried by a remote failure, looking through fan-out wrappers
    pub fn remote_status_code(&self) -> Option<u16> {
        match self {
            Self::RemoteService { status, .. } => *status,
            Self::SpeciesFetchFailed { source, .. } => source.remote_status_code(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LifersError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_names_missing_columns() {
        let err = LifersError::Schema {
            missing: vec!["Date".to_string(), "LocID".to_string()],
        };
        assert_eq!(err.to_string(), "Missing required columns: Date, LocID");
    }

    #[test]
    fn test_remote_status_message() {
        let err = LifersError::remote_status("https://api.ebird.org/v2/data/obs/AU/recent", 500);
        assert!(err.to_string().contains("status code 500"));
        assert_eq!(err.remote_status_code(), Some(500));

        let err = LifersError::remote("https://api.ebird.org", "connection refused");
        assert!(!err.to_string().contains("status code"));
        assert_eq!(err.remote_status_code(), None);
    }

    #[test]
    fn test_species_fetch_failure_keeps_cause() {
        let cause = LifersError::remote_status("https://x", 404);
        let err = LifersError::species_fetch_failed("rebdov", cause);
        assert!(err.to_string().contains("rebdov"));
        assert_eq!(err.remote_status_code(), Some(404));
        assert!(std::error::Error::source(&err).is_some());
    }
}
