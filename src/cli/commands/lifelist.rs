//! `lifelist`: parse and summarise a life list export

use super::shared::{print_heading, print_warnings};
use crate::cli::args::LifelistArgs;
use crate::config::LifersConfig;
use crate::lifelist::load_lifelist;
use crate::reference::ReferenceData;
use anyhow::{Context, Result};
use colored::*;

pub fn run_lifelist(args: &LifelistArgs, config: &LifersConfig) -> Result<()> {
    let reference = ReferenceData::new(config.reference.clone());
    let lifelist = load_lifelist(&args.file, &reference)
        .with_context(|| format!("Failed to read life list {}", args.file.display()))?;

    print_heading("Life list");
    println!(
        "  {} {}",
        "Species:".bright_cyan(),
        lifelist.len().to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "With species code:".bright_cyan(),
        lifelist.species_codes().len().to_string().bright_white()
    );
    print_warnings(&lifelist.warnings);

    if !lifelist.is_empty() {
        let frame = lifelist.to_frame()?;
        println!("\n{}", frame.head(Some(args.limit)));
    }
    Ok(())
}
