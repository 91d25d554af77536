//! Static reference tables: eBird taxonomy and country codes.
//!
//! Both tables ship inside the binary. Either can be redirected to an
//! external file (for example the complete eBird taxonomy download) through
//! [`ReferenceConfig`]. Tables are loaded on first use and never change
//! afterwards.

use crate::config::ReferenceConfig;
use crate::constants::reference::{
    COUNTRY_KEY_COLUMN, COUNTRY_SOURCE, COUNTRY_VALUE_COLUMN, TAXONOMY_KEY_COLUMN,
    TAXONOMY_SOURCE, TAXONOMY_VALUE_COLUMN,
};
use crate::error::{LifersError, Result};
use crate::table::{column_names, read_string_csv, string_values};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};

const BUNDLED_TAXONOMY: &[u8] = include_bytes!("../data/ebird_taxonomy.csv");
const BUNDLED_COUNTRY_CODES: &[u8] = include_bytes!("../data/country_codes.csv");

/// Lazily loaded lookup tables
#[derive(Debug, Default)]
pub struct ReferenceData {
    config: ReferenceConfig,
    taxonomy: OnceLock<HashMap<String, String>>,
    countries: OnceLock<BTreeMap<String, String>>,
}

impl ReferenceData {
    pub fn new(config: ReferenceConfig) -> Self {
        Self {
            config,
            taxonomy: OnceLock::new(),
            countries: OnceLock::new(),
        }
    }

    /// Process-wide instance backed by the bundled tables
    pub fn bundled() -> &'static ReferenceData {
        static INSTANCE: OnceLock<ReferenceData> = OnceLock::new();
        INSTANCE.get_or_init(ReferenceData::default)
    }

    /// Scientific name -> eBird species code
    pub fn taxonomy_lookup(&self) -> Result<&HashMap<String, String>> {
        if let Some(taxonomy) = self.taxonomy.get() {
            return Ok(taxonomy);
        }

        let bytes = read_source(
            TAXONOMY_SOURCE,
            self.config.taxonomy_path.as_deref(),
            BUNDLED_TAXONOMY,
        )?;
        let pairs = load_pairs(
            &bytes,
            TAXONOMY_SOURCE,
            TAXONOMY_KEY_COLUMN,
            TAXONOMY_VALUE_COLUMN,
        )?;
        let taxonomy: HashMap<String, String> = pairs.into_iter().collect();
        info!("Loaded {} taxonomy entries", taxonomy.len());

        Ok(self.taxonomy.get_or_init(|| taxonomy))
    }

    /// Country name -> ISO 3166 alpha-2 code, ordered by name
    pub fn country_lookup(&self) -> Result<&BTreeMap<String, String>> {
        if let Some(countries) = self.countries.get() {
            return Ok(countries);
        }

        let bytes = read_source(
            COUNTRY_SOURCE,
            self.config.country_codes_path.as_deref(),
            BUNDLED_COUNTRY_CODES,
        )?;
        let pairs = load_pairs(
            &bytes,
            COUNTRY_SOURCE,
            COUNTRY_KEY_COLUMN,
            COUNTRY_VALUE_COLUMN,
        )?;
        let countries: BTreeMap<String, String> = pairs.into_iter().collect();
        info!("Loaded {} country codes", countries.len());

        Ok(self.countries.get_or_init(|| countries))
    }
}

/// Process-wide scientific name -> species code table
pub fn taxonomy_lookup() -> Result<&'static HashMap<String, String>> {
    ReferenceData::bundled().taxonomy_lookup()
}

/// Process-wide country name -> ISO code table
pub fn country_lookup() -> Result<&'static BTreeMap<String, String>> {
    ReferenceData::bundled().country_lookup()
}

fn read_source(source_name: &str, path: Option<&Path>, bundled: &[u8]) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            debug!("Reading {} from {}", source_name, path.display());
            std::fs::read(path).map_err(|e| {
                LifersError::data_unavailable(source_name, format!("{}: {}", path.display(), e))
            })
        }
        None => Ok(bundled.to_vec()),
    }
}

/// Read the key/value column pair from a reference CSV, skipping blank cells
fn load_pairs(
    bytes: &[u8],
    source_name: &str,
    key_column: &str,
    value_column: &str,
) -> Result<Vec<(String, String)>> {
    let df = read_string_csv(bytes)
        .map_err(|e| LifersError::data_unavailable(source_name, e))?;

    let columns = column_names(&df);
    for required in [key_column, value_column] {
        if !columns.contains(required) {
            return Err(LifersError::data_unavailable(
                source_name,
                format!("missing column '{}'", required),
            ));
        }
    }

    let keys = string_values(&df, key_column)
        .map_err(|e| LifersError::data_unavailable(source_name, e))?;
    let values = string_values(&df, value_column)
        .map_err(|e| LifersError::data_unavailable(source_name, e))?;

    let pairs: Vec<(String, String)> = keys
        .into_iter()
        .zip(values)
        .filter_map(|(key, value)| Some((key?, value?)))
        .collect();

    if pairs.is_empty() {
        return Err(LifersError::data_unavailable(source_name, "no entries"));
    }

    Ok(pairs)
}
