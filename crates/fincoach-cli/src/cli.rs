//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// fincoach - turn a transaction ledger into financial insight
#[derive(Parser)]
#[command(name = "fincoach")]
#[command(about = "Personal finance coach over a transaction ledger", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Ledger CSV with date, merchant, amount columns (category optional)
    #[arg(short, long, default_value = "ledger.csv", global = true)]
    pub file: PathBuf,

    /// Mask merchant names in the output
    #[arg(long, global = true)]
    pub privacy: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Current-month spend summary with category and merchant breakdowns
    Summary,

    /// Monthly expense trend lines
    Trends {
        /// Trailing months to include
        #[arg(short, long, default_value = "6")]
        months: u32,
    },

    /// Detected recurring charges (subscriptions / gray charges)
    Subscriptions,

    /// Statistically unusual transactions
    Anomalies,

    /// Composite financial-health score
    Score {
        /// Monthly income; 0 means unknown
        #[arg(short, long, default_value = "1800")]
        income: f64,
    },

    /// Goal forecast against the current month's spend
    Forecast {
        /// Monthly income
        #[arg(short, long, default_value = "1800")]
        income: f64,

        /// Savings goal amount
        #[arg(short, long, default_value = "3000")]
        goal: f64,

        /// Months available to reach the goal
        #[arg(short, long, default_value = "10")]
        months: i64,
    },

    /// Re-run the forecast with hypothetical category cuts
    WhatIf {
        /// Cuts as Category=Amount pairs (e.g. Dining=60 Coffee=20)
        #[arg(required = true)]
        cuts: Vec<String>,

        /// Monthly income
        #[arg(short, long, default_value = "1800")]
        income: f64,

        /// Savings goal amount
        #[arg(short, long, default_value = "3000")]
        goal: f64,

        /// Months available to reach the goal
        #[arg(short, long, default_value = "10")]
        months: i64,
    },

    /// Coffee-spend assessment
    Coffee,

    /// Rule-based coaching nudges
    Coach {
        /// Monthly income
        #[arg(short, long, default_value = "1800")]
        income: f64,

        /// Savings goal amount
        #[arg(short, long, default_value = "3000")]
        goal: f64,

        /// Months available to reach the goal
        #[arg(short, long, default_value = "10")]
        months: i64,
    },

    /// Generate a reproducible demo ledger CSV
    Sample {
        /// Days of history to generate
        #[arg(short, long, default_value = "90")]
        days: u32,

        /// RNG seed (same seed, same ledger)
        #[arg(short, long, default_value = "7")]
        seed: u64,

        /// Output path; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}
