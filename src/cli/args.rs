//! Command-line argument definitions for lifers
//!
//! Defines the CLI interface with the clap derive API: global verbosity and
//! configuration flags plus one subcommand per task.

use crate::constants::{EBIRD_TOKEN_ENV, MAX_CONCURRENT_REQUESTS, MAX_DAYS_BACK, MIN_DAYS_BACK};
use crate::error::{LifersError, Result};
use crate::output::OutputFormat;
use crate::region::RegionSelection;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Find recently observed bird species missing from your eBird life list
#[derive(Debug, Clone, Parser)]
#[command(
    name = "lifers",
    version,
    about = "Find recently observed bird species missing from your eBird life list",
    long_about = "Compares an eBird life list export against recent observations in an eBird \
                  region and reports the species you have not yet seen, where they were seen \
                  and links to more information. Requires an eBird API token in the \
                  EBIRD_API_TOKEN environment variable for commands that call eBird."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors and hide progress bars
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file (defaults to <config dir>/lifers/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// List country names and their eBird region codes
    Countries(CountriesArgs),
    /// List the subregions of an eBird region
    Regions(RegionsArgs),
    /// Parse and summarise a life list export
    Lifelist(LifelistArgs),
    /// Find recently observed species missing from a life list
    Needs(NeedsArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct CountriesArgs {
    /// Only show countries whose name contains this text (case-insensitive)
    #[arg(long, value_name = "TEXT")]
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Parser)]
pub struct RegionsArgs {
    /// Parent region code, e.g. AU or AU-VIC
    #[arg(value_name = "PARENT")]
    pub parent: String,

    /// Subregion level to list
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub level: u8,

    /// eBird API token
    #[arg(long, env = EBIRD_TOKEN_ENV, hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Parser)]
pub struct LifelistArgs {
    /// eBird life list CSV export
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Number of most recent life list species to show
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

#[derive(Debug, Clone, Parser)]
pub struct NeedsArgs {
    /// eBird life list CSV export
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// eBird region code, e.g. AU-VIC-MEL
    #[arg(long, value_name = "CODE", conflicts_with_all = ["country", "subregion", "sub_subregion"])]
    pub region: Option<String>,

    /// Country name (defaults to the configured country)
    #[arg(long, value_name = "NAME")]
    pub country: Option<String>,

    /// First-level subregion name, e.g. Victoria
    #[arg(long, value_name = "NAME")]
    pub subregion: Option<String>,

    /// Second-level subregion name, e.g. Melbourne
    #[arg(long, value_name = "NAME", requires = "subregion")]
    pub sub_subregion: Option<String>,

    /// Days of recent observations to search (1-30)
    #[arg(long, value_name = "N")]
    pub days_back: Option<u32>,

    /// Bound on concurrent per-species requests
    #[arg(long, value_name = "N")]
    pub max_concurrent: Option<usize>,

    /// Write report tables into this directory
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Format of written tables
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// eBird API token
    #[arg(long, env = EBIRD_TOKEN_ENV, hide_env_values = true)]
    pub token: Option<String>,
}

impl Args {
    /// Log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl NeedsArgs {
    /// Validate flag values that clap cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if let Some(days_back) = self.days_back {
            if !(MIN_DAYS_BACK..=MAX_DAYS_BACK).contains(&days_back) {
                return Err(LifersError::configuration(format!(
                    "--days-back must be between {} and {}",
                    MIN_DAYS_BACK, MAX_DAYS_BACK
                )));
            }
        }
        if let Some(max_concurrent) = self.max_concurrent {
            if max_concurrent == 0 || max_concurrent > MAX_CONCURRENT_REQUESTS {
                return Err(LifersError::configuration(format!(
                    "--max-concurrent must be between 1 and {}",
                    MAX_CONCURRENT_REQUESTS
                )));
            }
        }
        Ok(())
    }

    /// Named region selection, or `None` when an explicit code was given
    pub fn region_selection(&self, default_country: &str) -> Option<RegionSelection> {
        if self.region.is_some() {
            return None;
        }

        let country = self.country.as_deref().unwrap_or(default_country);
        let mut selection = RegionSelection::country(country);
        if let Some(subregion) = &self.subregion {
            selection = selection.with_subregion(subregion);
        }
        if let Some(sub_subregion) = &self.sub_subregion {
            selection = selection.with_sub_subregion(sub_subregion);
        }
        Some(selection)
    }
}
