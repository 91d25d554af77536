//! Life list ingestion
//!
//! Validates an eBird "My eBird" life list export and normalises it into a
//! numbered list of species records, each carrying the eBird species code
//! used to compare against recent observations.

use crate::constants::lifelist_columns::{
    CATEGORY, COMMON_NAME, SCIENTIFIC_NAME, SPECIES_CODE, SPECIES_NUMBER,
};
use crate::models::{LifelistRecord, ReportWarning};
use polars::prelude::*;
use std::collections::HashSet;

pub mod parser;

#[cfg(test)]
pub mod tests;

pub use parser::{load_lifelist, parse_lifelist};

/// Comparison key for scientific names: trimmed, single-spaced, lower case
pub fn scientific_name_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A parsed life list and the anomalies found while reading it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lifelist {
    /// Species rows in file order; the first row has the highest number
    pub records: Vec<LifelistRecord>,
    pub warnings: Vec<ReportWarning>,
}

impl Lifelist {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Species codes present in the list; rows without a code are skipped
    pub fn species_codes(&self) -> HashSet<String> {
        self.records
            .iter()
            .filter_map(|record| record.species_code.clone())
            .collect()
    }

    /// Normalised scientific names of rows that have no species code
    pub fn unmatched_scientific_names(&self) -> HashSet<String> {
        self.records
            .iter()
            .filter(|record| record.species_code.is_none())
            .map(|record| scientific_name_key(&record.scientific_name))
            .filter(|key| !key.is_empty())
            .collect()
    }

    /// Display table of the parsed list
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let numbers: Vec<u32> = self
            .records
            .iter()
            .map(|r| r.species_number as u32)
            .collect();
        let common: Vec<&str> = self.records.iter().map(|r| r.common_name.as_str()).collect();
        let scientific: Vec<&str> = self
            .records
            .iter()
            .map(|r| r.scientific_name.as_str())
            .collect();
        let codes: Vec<Option<&str>> = self
            .records
            .iter()
            .map(|r| r.species_code.as_deref())
            .collect();
        let categories: Vec<&str> = self.records.iter().map(|r| r.category.as_str()).collect();

        DataFrame::new(vec![
            Column::new(SPECIES_NUMBER.into(), numbers),
            Column::new(COMMON_NAME.into(), common),
            Column::new(SCIENTIFIC_NAME.into(), scientific),
            Column::new(SPECIES_CODE.into(), codes),
            Column::new(CATEGORY.into(), categories),
        ])
    }
}
