//! Lifers library
//!
//! Finds the bird species seen recently in an eBird region that are missing
//! from a birder's life list.
//!
//! This library provides tools for:
//! - Parsing eBird life list exports and deriving species codes
//! - Querying the eBird API v2 for regions and recent observations
//! - Computing needed species with bounded concurrent per-species lookups
//! - Aggregating sightings into map points and per-location tables
//! - Writing report tables as CSV or Parquet

pub mod api;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod finder;
pub mod formatter;
pub mod lifelist;
pub mod models;
pub mod needs;
pub mod output;
pub mod reference;
pub mod region;
pub mod table;

// Re-export commonly used types
pub use api::{RecentObservationSource, RegionClient, SpeciesObservationSource};
pub use config::LifersConfig;
pub use error::{LifersError, Result};
pub use finder::{NeedsFinder, NeedsReport, NeedsRequest};
pub use lifelist::{Lifelist, load_lifelist, parse_lifelist};
pub use models::{Observation, RegionLocation, ReportWarning};
pub use output::{OutputFormat, ReportWriter};
pub use reference::ReferenceData;
pub use region::{RegionCode, RegionSelection, resolve_region};
