//! Planning commands: forecast, what-if, coffee assessment, coach

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Result};

use fincoach_core::AnalyticsEngine;

use super::{load_transactions, print_json};

pub fn cmd_forecast(file: &Path, income: f64, goal: f64, months: i64) -> Result<()> {
    let transactions = load_transactions(file)?;
    let engine = AnalyticsEngine::new();
    print_json(&engine.forecast(&transactions, income, goal, months)?)
}

pub fn cmd_what_if(
    file: &Path,
    cuts: &[String],
    income: f64,
    goal: f64,
    months: i64,
) -> Result<()> {
    let transactions = load_transactions(file)?;
    let cuts = parse_cuts(cuts)?;
    let engine = AnalyticsEngine::new();
    print_json(&engine.what_if(&transactions, &cuts, income, goal, months)?)
}

pub fn cmd_coffee(file: &Path) -> Result<()> {
    let transactions = load_transactions(file)?;
    let engine = AnalyticsEngine::new();
    print_json(&engine.coffee_assessment(&transactions))
}

pub fn cmd_coach(file: &Path, income: f64, goal: f64, months: i64, privacy: bool) -> Result<()> {
    let transactions = load_transactions(file)?;
    let engine = AnalyticsEngine::new();
    print_json(&engine.coach(&transactions, income, goal, months, privacy)?)
}

/// Parse `Category=Amount` pairs into a cut map
fn parse_cuts(pairs: &[String]) -> Result<HashMap<String, f64>> {
    let mut cuts = HashMap::new();
    for pair in pairs {
        let Some((category, amount)) = pair.split_once('=') else {
            bail!("Expected Category=Amount, got '{}'", pair);
        };
        let amount: f64 = amount
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid cut amount in '{}'", pair))?;
        cuts.insert(category.trim().to_string(), amount);
    }
    Ok(cuts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cuts() {
        let cuts = parse_cuts(&["Dining=60".to_string(), "Coffee = 20.5".to_string()]).unwrap();
        assert_eq!(cuts["Dining"], 60.0);
        assert_eq!(cuts["Coffee"], 20.5);
    }

    #[test]
    fn test_parse_cuts_rejects_garbage() {
        assert!(parse_cuts(&["Dining".to_string()]).is_err());
        assert!(parse_cuts(&["Dining=lots".to_string()]).is_err());
    }
}
