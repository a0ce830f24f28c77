//! fincoach CLI - ledger analytics from the command line
//!
//! Usage:
//!   fincoach --file ledger.csv summary      Current-month summary
//!   fincoach --file ledger.csv subscriptions Recurring charges
//!   fincoach --file ledger.csv what-if Dining=60 Coffee=20
//!   fincoach sample --out ledger.csv        Generate a demo ledger

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Summary => commands::cmd_summary(&cli.file, cli.privacy),
        Commands::Trends { months } => commands::cmd_trends(&cli.file, months),
        Commands::Subscriptions => commands::cmd_subscriptions(&cli.file, cli.privacy),
        Commands::Anomalies => commands::cmd_anomalies(&cli.file, cli.privacy),
        Commands::Score { income } => commands::cmd_score(&cli.file, income),
        Commands::Forecast {
            income,
            goal,
            months,
        } => commands::cmd_forecast(&cli.file, income, goal, months),
        Commands::WhatIf {
            cuts,
            income,
            goal,
            months,
        } => commands::cmd_what_if(&cli.file, &cuts, income, goal, months),
        Commands::Coffee => commands::cmd_coffee(&cli.file),
        Commands::Coach {
            income,
            goal,
            months,
        } => commands::cmd_coach(&cli.file, income, goal, months, cli.privacy),
        Commands::Sample { days, seed, out } => commands::cmd_sample(days, seed, out.as_deref()),
    }
}
