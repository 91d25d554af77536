//! Shared components for CLI commands

use crate::cli::args::Args;
use crate::config::LifersConfig;
use crate::models::ReportWarning;
use anyhow::{Context, Result};
use colored::*;
use tracing::debug;

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over the verbosity flags.
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lifers={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Load configuration: defaults, then config file, then environment
pub fn load_configuration(args: &Args) -> Result<LifersConfig> {
    let config = LifersConfig::load_layered(args.config.as_deref())
        .context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Apply a `--token` flag over the loaded configuration
pub fn with_token_override(config: &LifersConfig, token: Option<&str>) -> LifersConfig {
    match token.map(str::trim).filter(|token| !token.is_empty()) {
        Some(token) => config.clone().with_token(token),
        None => config.clone(),
    }
}

pub fn print_heading(text: &str) {
    println!("\n{}", text.bright_green().bold());
}

pub fn print_warnings(warnings: &[ReportWarning]) {
    for warning in warnings {
        println!("{} {}", "Note:".bright_yellow().bold(), warning);
    }
}
