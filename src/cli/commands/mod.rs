//! Command implementations for the lifers CLI
//!
//! Each subcommand lives in its own module; shared setup (logging,
//! configuration, clients) is in [`shared`].

pub mod countries;
pub mod lifelist;
pub mod needs;
pub mod regions;
pub mod shared;

use crate::cli::args::{Args, Commands};
use anyhow::Result;
use std::future::Future;

/// Dispatch to the subcommand handler
pub async fn run(args: Args) -> Result<()> {
    shared::setup_logging(&args);
    let config = shared::load_configuration(&args)?;

    match &args.command {
        Some(Commands::Countries(countries_args)) => {
            countries::run_countries(countries_args, &config)
        }
        Some(Commands::Regions(regions_args)) => {
            regions::run_regions(regions_args, &config).await
        }
        Some(Commands::Lifelist(lifelist_args)) => {
            lifelist::run_lifelist(lifelist_args, &config)
        }
        Some(Commands::Needs(needs_args)) => {
            needs::run_needs(needs_args, &config, args.show_progress()).await
        }
        None => Ok(()),
    }
}

/// Run a command until it finishes or the interrupt future fires
///
/// An interrupt that resolves to an error (e.g. the signal handler could
/// not be installed) is ignored and the command runs to completion.
pub async fn run_until_interrupted<C, I>(command: C, interrupt: I) -> Result<()>
where
    C: Future<Output = Result<()>>,
    I: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        result = command => result,
        Ok(()) = interrupt => {
            eprintln!("\nReceived CTRL+C, shutting down...");
            Err(anyhow::anyhow!("Interrupted by user"))
        }
    }
}
