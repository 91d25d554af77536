//! Report persistence as CSV or Parquet tables

use crate::constants::output_files::{LIFELIST, NEEDS, REGION_MAP, REGION_OBSERVATIONS};
use crate::error::{LifersError, Result};
use crate::finder::NeedsReport;
use clap::ValueEnum;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Table file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Writes report tables into one directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    format: OutputFormat,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            format,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the life list, needs, map and region observation tables
    pub fn write_report(
        &self,
        report: &NeedsReport,
        species_info_base_url: &str,
    ) -> Result<Vec<PathBuf>> {
        self.prepare_dir()?;

        let tables = [
            (LIFELIST, report.lifelist.to_frame()?),
            (NEEDS, report.needs_frame(species_info_base_url)?),
            (REGION_MAP, report.region_map_frame()?),
            (REGION_OBSERVATIONS, report.region_observations_frame()?),
        ];

        let mut written = Vec::with_capacity(tables.len());
        for (name, mut df) in tables {
            written.push(self.write_frame(name, &mut df)?);
        }

        info!(
            "Wrote {} tables to {}",
            written.len(),
            self.output_dir.display()
        );
        Ok(written)
    }

    /// Write one table as `<output_dir>/<name>.<ext>`
    pub fn write_frame(&self, name: &str, df: &mut DataFrame) -> Result<PathBuf> {
        self.prepare_dir()?;

        let path = self
            .output_dir
            .join(format!("{}.{}", name, self.format.extension()));
        let mut file = File::create(&path)?;

        match self.format {
            OutputFormat::Csv => {
                CsvWriter::new(&mut file).include_header(true).finish(df)?;
            }
            OutputFormat::Parquet => {
                ParquetWriter::new(&mut file)
                    .with_compression(ParquetCompression::Snappy)
                    .finish(df)?;
            }
        }

        debug!("Wrote {} rows to {}", df.height(), path.display());
        Ok(path)
    }

    fn prepare_dir(&self) -> Result<()> {
        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(LifersError::InvalidOutputPath {
                path: self.output_dir.clone(),
            });
        }
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifelist::Lifelist;
    use crate::models::{LifelistRecord, Observation, RegionLocation};
    use crate::table::{read_string_csv, string_values};
    use tempfile::TempDir;

    fn sample_report() -> NeedsReport {
        let record = LifelistRecord {
            species_number: 1,
            taxon_order: Some("12540".to_string()),
            category: "species".to_string(),
            common_name: "Galah".to_string(),
            scientific_name: "Eolophus roseicapilla".to_string(),
            count: Some("5".to_string()),
            location: Some("Royal Park".to_string()),
            state_province: Some("AU-VIC".to_string()),
            date: Some("11 Aug 2023".to_string()),
            observed_on: None,
            location_id: Some("L901738".to_string()),
            checklist_id: Some("S2".to_string()),
            exotic: None,
            countable: true,
            species_code: Some("galah".to_string()),
        };
        let observation = Observation {
            species_code: "noimin1".to_string(),
            com_name: "Noisy Miner".to_string(),
            sci_name: "Manorina melanocephala".to_string(),
            loc_id: "L901738".to_string(),
            loc_name: "Royal Park".to_string(),
            obs_dt: "2023-08-20 08:00".to_string(),
            how_many: Some(3),
            lat: -37.78,
            lng: 144.95,
            obs_valid: true,
            obs_reviewed: false,
            location_private: false,
            sub_id: None,
        };

        NeedsReport {
            lifelist: Lifelist {
                records: vec![record],
                warnings: Vec::new(),
            },
            needs: vec![observation.clone()],
            region_observations: vec![observation],
            region_map: vec![RegionLocation {
                loc_name: "Royal Park".to_string(),
                lng: 144.95,
                lat: -37.78,
                species: vec!["Noisy Miner".to_string()],
                tooltip_species: "1. Noisy Miner".to_string(),
                num_species: 1,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_write_report_csv() {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("nested").join("out");
        let writer = ReportWriter::new(&output_dir, OutputFormat::Csv);

        let written = writer
            .write_report(&sample_report(), "https://ebird.org/species/")
            .unwrap();
        assert_eq!(written.len(), 4);
        assert!(written.iter().all(|path| path.exists()));

        let bytes = std::fs::read(output_dir.join("needs.csv")).unwrap();
        let df = read_string_csv(&bytes).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(
            string_values(&df, "Species Information").unwrap(),
            vec![Some("https://ebird.org/species/noimin1".to_string())]
        );

        let bytes = std::fs::read(output_dir.join("region_map.csv")).unwrap();
        let df = read_string_csv(&bytes).unwrap();
        assert_eq!(
            string_values(&df, "tooltip_species").unwrap(),
            vec![Some("1. Noisy Miner".to_string())]
        );
    }

    #[test]
    fn test_write_report_parquet() {
        let temp_dir = TempDir::new().unwrap();
        let writer = ReportWriter::new(temp_dir.path(), OutputFormat::Parquet);

        writer
            .write_report(&sample_report(), "https://ebird.org/species/")
            .unwrap();

        let file = File::open(temp_dir.path().join("lifelist.parquet")).unwrap();
        let df = ParquetReader::new(file).finish().unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 5);
    }

    #[test]
    fn test_output_path_must_be_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("not_a_dir");
        std::fs::write(&file_path, "x").unwrap();

        let writer = ReportWriter::new(&file_path, OutputFormat::Csv);
        let err = writer
            .write_report(&sample_report(), "https://ebird.org/species/")
            .unwrap_err();
        assert!(matches!(err, LifersError::InvalidOutputPath { .. }));
    }

    #[test]
    fn test_format_names() {
        assert_eq!(OutputFormat::default(), OutputFormat::Csv);
        assert_eq!(OutputFormat::Parquet.to_string(), "parquet");
    }
}
