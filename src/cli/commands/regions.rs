//! `regions`: list the subregions of a region

use super::shared::{print_heading, with_token_override};
use crate::api::RegionClient;
use crate::cli::args::RegionsArgs;
use crate::config::LifersConfig;
use crate::region::{RegionCode, SubregionLevel};
use anyhow::{Context, Result};
use colored::*;

pub async fn run_regions(args: &RegionsArgs, config: &LifersConfig) -> Result<()> {
    let config = with_token_override(config, args.token.as_deref());
    config.require_token()?;

    let parent = RegionCode::parse(&args.parent)?;
    let level = SubregionLevel::from_number(args.level)?;
    let client = RegionClient::new(&config.api)?;

    let regions = client
        .list_subregions(&parent, level)
        .await
        .with_context(|| format!("Failed to list level {} regions of {}", level, parent))?;

    print_heading(&format!(
        "{} level {} regions in {}",
        regions.len(),
        level,
        parent
    ));
    for (name, code) in &regions {
        println!("  {}  {}", code.bright_cyan(), name);
    }
    Ok(())
}
