//! Application constants for the lifers needs finder
//!
//! This module contains eBird endpoint conventions, lifelist column names,
//! default values and display labels used throughout the application.

// =============================================================================
// eBird API
// =============================================================================

/// Base URL of the eBird API v2
pub const EBIRD_API_BASE_URL: &str = "https://api.ebird.org/v2";

/// Header carrying the eBird API token
pub const EBIRD_TOKEN_HEADER: &str = "X-eBirdApiToken";

/// Environment variable holding the eBird API token
pub const EBIRD_TOKEN_ENV: &str = "EBIRD_API_TOKEN";

/// Environment variable overriding the API base URL
pub const API_BASE_URL_ENV: &str = "LIFERS_API_BASE_URL";

/// Query parameter for the number of days of observations to retrieve
pub const DAYS_BACK_PARAM: &str = "back";

/// The eBird API accepts 1 to 30 days back
pub const MIN_DAYS_BACK: u32 = 1;
pub const MAX_DAYS_BACK: u32 = 30;

/// Default number of days of observations to retrieve
pub const DEFAULT_DAYS_BACK: u32 = 7;

/// Default HTTP request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Upper bound on concurrent per-species requests
pub const MAX_CONCURRENT_REQUESTS: usize = 32;

pub const USER_AGENT: &str = concat!("lifers/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Links
// =============================================================================

/// Species information pages, keyed by species code
pub const SPECIES_INFO_BASE_URL: &str = "https://ebird.org/species/";

/// Hotspot information pages, keyed by location ID
pub const HOTSPOT_BASE_URL: &str = "https://ebird.org/hotspot/";

/// Map directions, followed by "lat,lng"
pub const DIRECTIONS_BASE_URL: &str = "https://maps.google.com/?q=";

// =============================================================================
// Reference data
// =============================================================================

pub mod reference {
    pub const TAXONOMY_SOURCE: &str = "ebird taxonomy";
    pub const TAXONOMY_KEY_COLUMN: &str = "SCI_NAME";
    pub const TAXONOMY_VALUE_COLUMN: &str = "SPECIES_CODE";

    pub const COUNTRY_SOURCE: &str = "country codes";
    pub const COUNTRY_KEY_COLUMN: &str = "Country";
    pub const COUNTRY_VALUE_COLUMN: &str = "Alpha-2";
}

// =============================================================================
// Lifelist columns
// =============================================================================

/// Column names of an eBird life list export
pub mod lifelist_columns {
    pub const TAXON_ORDER: &str = "Taxon Order";
    pub const CATEGORY: &str = "Category";
    pub const COMMON_NAME: &str = "Common Name";
    pub const SCIENTIFIC_NAME: &str = "Scientific Name";
    pub const COUNT: &str = "Count";
    pub const LOCATION: &str = "Location";
    pub const STATE_PROVINCE: &str = "S/P";
    pub const DATE: &str = "Date";
    pub const LOCATION_ID: &str = "LocID";
    pub const CHECKLIST_ID: &str = "SubID";
    pub const EXOTIC: &str = "Exotic";
    pub const COUNTABLE: &str = "Countable";

    /// Optional; derived from the taxonomy when absent
    pub const SPECIES_CODE: &str = "Species Code";

    /// Derived, never read from input
    pub const SPECIES_NUMBER: &str = "Species Number";

    /// Columns every life list must carry, in canonical order
    pub const REQUIRED: &[&str] = &[
        TAXON_ORDER,
        CATEGORY,
        COMMON_NAME,
        SCIENTIFIC_NAME,
        COUNT,
        LOCATION,
        STATE_PROVINCE,
        DATE,
        LOCATION_ID,
        CHECKLIST_ID,
        EXOTIC,
        COUNTABLE,
    ];

    /// Category value of rows that count as species
    pub const SPECIES_CATEGORY: &str = "species";

    /// Date formats seen in life list exports
    pub const DATE_FORMATS: &[&str] = &["%d %b %Y", "%Y-%m-%d", "%d/%m/%Y"];
}

// =============================================================================
// Display labels
// =============================================================================

pub mod labels {
    pub const COMMON_NAME: &str = "Common Name";
    pub const SCIENTIFIC_NAME: &str = "Scientific Name";
    pub const SPECIES_INFORMATION: &str = "Species Information";
    pub const DATE: &str = "Date";
    pub const COUNT: &str = "Count";

    pub const LOC_NAME: &str = "locName";
    pub const LNG: &str = "lng";
    pub const LAT: &str = "lat";
    pub const TOOLTIP_SPECIES: &str = "tooltip_species";
    pub const NUM_SPECIES: &str = "num_species";
}

// =============================================================================
// Output
// =============================================================================

pub mod output_files {
    pub const LIFELIST: &str = "lifelist";
    pub const NEEDS: &str = "needs";
    pub const REGION_MAP: &str = "region_map";
    pub const REGION_OBSERVATIONS: &str = "region_observations";
}

/// Default concurrency for per-species fetches: CPU count + 4, capped
pub fn default_concurrent_requests() -> usize {
    (num_cpus::get() + 4).min(MAX_CONCURRENT_REQUESTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_columns_exclude_optional() {
        assert_eq!(lifelist_columns::REQUIRED.len(), 12);
        assert!(!lifelist_columns::REQUIRED.contains(&lifelist_columns::SPECIES_CODE));
    }

    #[test]
    fn test_default_concurrency_bounds() {
        let workers = default_concurrent_requests();
        assert!(workers >= 5);
        assert!(workers <= MAX_CONCURRENT_REQUESTS);
    }
}
