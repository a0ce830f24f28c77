//! Command implementations for the fincoach CLI

mod ledger;
mod plan;
mod report;
mod sample;

pub use plan::{cmd_coach, cmd_coffee, cmd_forecast, cmd_what_if};
pub use report::{cmd_anomalies, cmd_score, cmd_subscriptions, cmd_summary, cmd_trends};
pub use sample::cmd_sample;

use anyhow::Result;
use serde_json::to_string_pretty;

pub(crate) use ledger::load_transactions;

/// Print any report as pretty JSON on stdout
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", to_string_pretty(value)?);
    Ok(())
}
