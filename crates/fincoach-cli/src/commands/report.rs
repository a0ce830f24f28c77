//! Read-only report commands: summary, trends, subscriptions, anomalies,
//! score

use std::path::Path;

use anyhow::Result;

use fincoach_core::AnalyticsEngine;

use super::{load_transactions, print_json};

pub fn cmd_summary(file: &Path, privacy: bool) -> Result<()> {
    let transactions = load_transactions(file)?;
    let engine = AnalyticsEngine::new();
    print_json(&engine.summary(&transactions, privacy))
}

pub fn cmd_trends(file: &Path, months: u32) -> Result<()> {
    let transactions = load_transactions(file)?;
    let engine = AnalyticsEngine::new();
    print_json(&engine.trends(&transactions, months)?)
}

pub fn cmd_subscriptions(file: &Path, privacy: bool) -> Result<()> {
    let transactions = load_transactions(file)?;
    let engine = AnalyticsEngine::new();
    print_json(&engine.subscriptions(&transactions, privacy))
}

pub fn cmd_anomalies(file: &Path, privacy: bool) -> Result<()> {
    let transactions = load_transactions(file)?;
    let engine = AnalyticsEngine::new();
    print_json(&engine.anomalies(&transactions, privacy))
}

pub fn cmd_score(file: &Path, income: f64) -> Result<()> {
    let transactions = load_transactions(file)?;
    let engine = AnalyticsEngine::new();
    print_json(&engine.score(&transactions, income))
}
