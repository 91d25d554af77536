//! `countries`: list country names and region codes

use super::shared::print_heading;
use crate::cli::args::CountriesArgs;
use crate::config::LifersConfig;
use crate::reference::ReferenceData;
use anyhow::{Context, Result};
use colored::*;

pub fn run_countries(args: &CountriesArgs, config: &LifersConfig) -> Result<()> {
    let reference = ReferenceData::new(config.reference.clone());
    let countries = reference
        .country_lookup()
        .context("Failed to load country codes")?;

    let filter = args.filter.as_deref().map(str::to_lowercase);
    let matches: Vec<(&String, &String)> = countries
        .iter()
        .filter(|(name, _)| {
            filter
                .as_deref()
                .is_none_or(|filter| name.to_lowercase().contains(filter))
        })
        .collect();

    print_heading(&format!("{} countries", matches.len()));
    for (name, code) in matches {
        println!("  {}  {}", code.bright_cyan(), name);
    }
    Ok(())
}
