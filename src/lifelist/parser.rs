//! Life list CSV parsing and validation

use super::Lifelist;
use crate::constants::lifelist_columns::{
    CATEGORY, CHECKLIST_ID, COMMON_NAME, COUNT, COUNTABLE, DATE, DATE_FORMATS, EXOTIC,
    LOCATION, LOCATION_ID, REQUIRED, SCIENTIFIC_NAME, SPECIES_CATEGORY, SPECIES_CODE,
    STATE_PROVINCE, TAXON_ORDER,
};
use crate::error::{LifersError, Result};
use crate::models::{LifelistRecord, ReportWarning};
use crate::reference::ReferenceData;
use crate::table::{column_names, optional_string_values, read_string_csv, string_values};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Read and parse a life list file
pub fn load_lifelist(path: &Path, reference: &ReferenceData) -> Result<Lifelist> {
    let bytes = std::fs::read(path)?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    parse_lifelist(&bytes, reference)
}

/// Parse a life list export
///
/// Keeps only rows whose category is `species` and numbers them from N down
/// to 1 in file order. Species codes come from a `Species Code` column when
/// the export carries one, otherwise from the taxonomy by scientific name.
pub fn parse_lifelist(bytes: &[u8], reference: &ReferenceData) -> Result<Lifelist> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(LifersError::format("input is empty"));
    }

    let df = read_string_csv(bytes).map_err(LifersError::format)?;
    check_required_columns(&df)?;

    let rows = LifelistColumns::extract(&df).map_err(LifersError::format)?;
    let species_rows: Vec<usize> = (0..df.height())
        .filter(|&i| rows.category[i].as_deref() == Some(SPECIES_CATEGORY))
        .collect();
    debug!(
        "{} of {} life list rows are species",
        species_rows.len(),
        df.height()
    );

    let taxonomy = if rows.has_species_code {
        None
    } else {
        Some(reference.taxonomy_lookup()?)
    };

    let total = species_rows.len();
    let mut records = Vec::with_capacity(total);
    for (position, &i) in species_rows.iter().enumerate() {
        let scientific_name = rows.scientific_name[i].clone().unwrap_or_default();
        let species_code = match taxonomy {
            Some(taxonomy) => taxonomy.get(&scientific_name).cloned(),
            None => rows.species_code[i].clone(),
        };
        let date = rows.date[i].clone();
        let observed_on = date.as_deref().and_then(parse_date);

        records.push(LifelistRecord {
            species_number: total - position,
            taxon_order: rows.taxon_order[i].clone(),
            category: SPECIES_CATEGORY.to_string(),
            common_name: rows.common_name[i].clone().unwrap_or_default(),
            scientific_name,
            count: rows.count[i].clone(),
            location: rows.location[i].clone(),
            state_province: rows.state_province[i].clone(),
            date,
            observed_on,
            location_id: rows.location_id[i].clone(),
            checklist_id: rows.checklist_id[i].clone(),
            exotic: rows.exotic[i].clone(),
            countable: rows.countable[i].as_deref().is_some_and(is_truthy),
            species_code,
        });
    }

    let mut warnings = Vec::new();

    let unmatched = records.iter().filter(|r| r.species_code.is_none()).count();
    if unmatched > 0 {
        warn!("{} life list species have no species code", unmatched);
        warnings.push(ReportWarning::UnmatchedSpecies { count: unmatched });
    }

    if let Some(row) = first_out_of_order(&records) {
        warn!("Life list row {} is newer than the row before it", row);
        warnings.push(ReportWarning::UnverifiedOrdering { row });
    }

    info!("Parsed life list with {} species", records.len());
    Ok(Lifelist { records, warnings })
}

fn check_required_columns(df: &DataFrame) -> Result<()> {
    let present = column_names(df);
    let missing: Vec<String> = REQUIRED
        .iter()
        .filter(|column| !present.contains(**column))
        .map(|column| column.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(LifersError::Schema { missing })
    }
}

/// Parse a life list date in any of the known export formats
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value.trim(), format).ok())
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

/// 1-based position of the first record dated after its predecessor
fn first_out_of_order(records: &[LifelistRecord]) -> Option<usize> {
    records
        .windows(2)
        .position(|pair| match (pair[0].observed_on, pair[1].observed_on) {
            (Some(previous), Some(current)) => current > previous,
            _ => false,
        })
        .map(|index| index + 2)
}

/// Column values pulled out of the frame once
struct LifelistColumns {
    taxon_order: Vec<Option<String>>,
    category: Vec<Option<String>>,
    common_name: Vec<Option<String>>,
    scientific_name: Vec<Option<String>>,
    count: Vec<Option<String>>,
    location: Vec<Option<String>>,
    state_province: Vec<Option<String>>,
    date: Vec<Option<String>>,
    location_id: Vec<Option<String>>,
    checklist_id: Vec<Option<String>>,
    exotic: Vec<Option<String>>,
    countable: Vec<Option<String>>,
    species_code: Vec<Option<String>>,
    has_species_code: bool,
}

impl LifelistColumns {
    fn extract(df: &DataFrame) -> PolarsResult<Self> {
        Ok(Self {
            taxon_order: string_values(df, TAXON_ORDER)?,
            category: string_values(df, CATEGORY)?,
            common_name: string_values(df, COMMON_NAME)?,
            scientific_name: string_values(df, SCIENTIFIC_NAME)?,
            count: string_values(df, COUNT)?,
            location: string_values(df, LOCATION)?,
            state_province: string_values(df, STATE_PROVINCE)?,
            date: string_values(df, DATE)?,
            location_id: string_values(df, LOCATION_ID)?,
            checklist_id: string_values(df, CHECKLIST_ID)?,
            exotic: string_values(df, EXOTIC)?,
            countable: string_values(df, COUNTABLE)?,
            species_code: optional_string_values(df, SPECIES_CODE)?,
            has_species_code: df.get_column_index(SPECIES_CODE).is_some(),
        })
    }
}
