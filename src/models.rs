//! Core data structures shared across the needs finder.
//!
//! Defines life list records, eBird observation records, the map aggregate
//! and the non-fatal warnings attached to a report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of an uploaded life list, after filtering to species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifelistRecord {
    /// Position in the life list; the first row gets the highest number
    pub species_number: usize,
    pub taxon_order: Option<String>,
    pub category: String,
    pub common_name: String,
    pub scientific_name: String,
    pub count: Option<String>,
    pub location: Option<String>,
    pub state_province: Option<String>,
    pub date: Option<String>,
    pub observed_on: Option<NaiveDate>,
    pub location_id: Option<String>,
    pub checklist_id: Option<String>,
    pub exotic: Option<String>,
    pub countable: bool,
    pub species_code: Option<String>,
}

/// One recent observation as returned by the eBird API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub species_code: String,
    #[serde(default)]
    pub com_name: String,
    #[serde(default)]
    pub sci_name: String,
    #[serde(default)]
    pub loc_id: String,
    #[serde(default)]
    pub loc_name: String,
    #[serde(default)]
    pub obs_dt: String,
    #[serde(default)]
    pub how_many: Option<u32>,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
    #[serde(default)]
    pub obs_valid: bool,
    #[serde(default)]
    pub obs_reviewed: bool,
    #[serde(default)]
    pub location_private: bool,
    #[serde(default)]
    pub sub_id: Option<String>,
}

/// One map point: every needed species seen at a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionLocation {
    #[serde(rename = "locName")]
    pub loc_name: String,
    pub lng: f64,
    pub lat: f64,
    /// Sorted, de-duplicated common names
    pub species: Vec<String>,
    pub tooltip_species: String,
    pub num_species: usize,
}

/// One row in a location's sightings table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSighting {
    pub common_name: String,
    pub scientific_name: String,
    pub date: String,
    pub count: Option<u32>,
}

/// Needed-species sightings grouped under one location name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDetail {
    pub loc_name: String,
    pub loc_id: String,
    /// Absent for private locations
    pub hotspot_url: Option<String>,
    pub directions_url: String,
    pub sightings: Vec<LocationSighting>,
}

/// Centre of the map aggregate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lng: f64,
}

/// Non-fatal conditions surfaced to the caller as messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportWarning {
    /// The life list has no species rows
    EmptyLifelist,
    /// No recent observations of species missing from the life list
    NoRecentNeeds { days_back: u32 },
    /// Rows whose species code could not be derived from the taxonomy
    UnmatchedSpecies { count: usize },
    /// A row is dated later than the row before it, so numbering may not
    /// follow sighting order
    UnverifiedOrdering { row: usize },
}

impl fmt::Display for ReportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportWarning::EmptyLifelist => write!(f, "No species found in the lifelist CSV."),
            ReportWarning::NoRecentNeeds { days_back } => write!(
                f,
                "No recent observations found for unseen species in the past {} days.",
                days_back
            ),
            ReportWarning::UnmatchedSpecies { count } => write!(
                f,
                "{} lifelist species could not be matched to a species code.",
                count
            ),
            ReportWarning::UnverifiedOrdering { row } => write!(
                f,
                "Lifelist row {} is dated after the row before it; species numbers assume newest-first order.",
                row
            ),
        }
    }
}
