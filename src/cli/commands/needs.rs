//! `needs`: find recently observed species missing from a life list

use super::shared::{print_heading, print_warnings, with_token_override};
use crate::api::RegionClient;
use crate::cli::args::NeedsArgs;
use crate::config::LifersConfig;
use crate::finder::{NeedsFinder, NeedsReport, NeedsRequest};
use crate::needs::unique_species_codes;
use crate::output::ReportWriter;
use crate::reference::ReferenceData;
use crate::region::{RegionCode, resolve_region};
use anyhow::{Context, Result};
use colored::*;
use std::time::Instant;
use tracing::info;

pub async fn run_needs(
    args: &NeedsArgs,
    config: &LifersConfig,
    show_progress: bool,
) -> Result<()> {
    let start_time = Instant::now();
    args.validate()?;

    // Flags win over file and environment settings
    let mut config = with_token_override(config, args.token.as_deref());
    if let Some(days_back) = args.days_back {
        config = config.with_days_back(days_back);
    }
    if let Some(max_concurrent) = args.max_concurrent {
        config = config.with_max_concurrent_requests(max_concurrent);
    }
    config.validate()?;
    config.require_token()?;

    let reference = ReferenceData::new(config.reference.clone());
    let client = RegionClient::new(&config.api)?;

    // An explicit code is used as given; names are looked up
    let region = match &args.region {
        Some(code) => RegionCode::parse(code)?,
        None => {
            let selection = args
                .region_selection(&config.defaults.country)
                .context("No region selected")?;
            resolve_region(&selection, &reference, &client)
                .await
                .context("Failed to resolve region")?
        }
    };
    let days_back = config.defaults.days_back;

    let lifelist = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read life list {}", args.file.display()))?;

    println!(
        "{}",
        format!("Searching {} over the past {} days", region, days_back)
            .bright_green()
            .bold()
    );

    // Run the search
    let request = NeedsRequest::new(region, days_back, lifelist);
    let report = NeedsFinder::new(&client, &reference, &config)
        .with_progress(show_progress)
        .find_needs(&request)
        .await?;

    print_report(&report, &config);

    // Optionally persist the tables
    if let Some(output_dir) = &args.output_dir {
        let writer = ReportWriter::new(output_dir, args.format);
        let written = writer
            .write_report(&report, &config.links.species_info_base_url)
            .with_context(|| format!("Failed to write report to {}", output_dir.display()))?;
        print_heading("Written tables");
        for path in written {
            println!("  {}", path.display());
        }
    }

    info!("Needs search finished in {:?}", start_time.elapsed());
    Ok(())
}

fn print_report(report: &NeedsReport, config: &LifersConfig) {
    println!(
        "  {} {}",
        "Life list species:".bright_cyan(),
        report.lifelist.len().to_string().bright_white()
    );
    print_warnings(&report.warnings);
    if report.needs.is_empty() {
        return;
    }

    print_heading(&format!(
        "{} species you have not seen",
        report.needed_species_count()
    ));
    let species = unique_species_codes(&report.needs);
    for code in &species {
        if let Some(obs) = report.needs.iter().find(|obs| &obs.species_code == code) {
            println!(
                "  {} ({})  {}{}",
                obs.com_name.bright_white().bold(),
                obs.sci_name.italic(),
                config.links.species_info_base_url,
                obs.species_code
            );
        }
    }

    print_heading(&format!("{} locations", report.location_details.len()));
    for detail in &report.location_details {
        println!("\n  {}", detail.loc_name.bright_cyan().bold());
        if let Some(hotspot_url) = &detail.hotspot_url {
            println!("    Hotspot information: {}", hotspot_url);
        }
        println!("    Directions: {}", detail.directions_url);
        for sighting in &detail.sightings {
            let count = sighting
                .count
                .map(|count| count.to_string())
                .unwrap_or_else(|| "X".to_string());
            println!(
                "    {:<32} {:<16} {}",
                sighting.common_name, sighting.date, count
            );
        }
    }

    if let Some(center) = report.map_center {
        println!(
            "\n  {} {:.4}, {:.4}",
            "Map centre:".bright_cyan(),
            center.lat,
            center.lng
        );
    }
}
