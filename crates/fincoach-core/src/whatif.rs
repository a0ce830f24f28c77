//! What-if spending simulation
//!
//! Re-runs the goal forecast against a hypothetical reduced-spend month.
//! Cuts are applied per category and clamped to what the category actually
//! spent, so a slider pushed past reality never produces a negative
//! expense. The underlying transaction set is never touched.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::aggregate;
use crate::error::Result;
use crate::forecast::{self, ForecastResult};
use crate::models::Transaction;
use crate::recurring::round2;

/// Result of simulating category cuts against the current month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatIfReport {
    /// Period the simulation ran against (`None` for an empty dataset)
    pub period: Option<String>,
    pub current_expense: f64,
    pub new_expense: f64,
    /// Cuts actually applied after clamping, category -> amount
    pub applied: HashMap<String, f64>,
    pub forecast: ForecastResult,
}

/// Simulate reducing the current month's spend by per-category cuts.
///
/// Each requested cut is clamped to `[0, category's current spend]`;
/// categories absent from the current month contribute nothing. The
/// forecast re-runs with the reduced expense while income, goal, and
/// months stay as supplied.
pub fn simulate_cuts(
    transactions: &[Transaction],
    cuts: &HashMap<String, f64>,
    income_monthly: f64,
    goal_amount: f64,
    months_to_goal: i64,
) -> Result<WhatIfReport> {
    let period = aggregate::latest_period(transactions);

    let (current_expense, applied) = match period {
        Some(p) => {
            let by_category = aggregate::totals_by_category(transactions, p);
            let mut applied: HashMap<String, f64> = HashMap::new();
            for row in &by_category {
                let requested = cuts.get(&row.category).copied().unwrap_or(0.0);
                let take = requested.clamp(0.0, row.total);
                if take > 0.0 {
                    applied.insert(row.category.clone(), round2(take));
                }
            }
            let total: f64 = by_category.iter().map(|c| c.total).sum();
            (total, applied)
        }
        None => (0.0, HashMap::new()),
    };

    let reduction: f64 = applied.values().sum();
    let new_expense = (current_expense - reduction).max(0.0);
    let forecast =
        forecast::goal_forecast(income_monthly, new_expense, goal_amount, months_to_goal)?;

    Ok(WhatIfReport {
        period: period.map(|p| p.to_string()),
        current_expense: round2(current_expense),
        new_expense: round2(new_expense),
        applied,
        forecast,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(date: &str, merchant: &str, category: &str, amount: f64) -> Transaction {
        Transaction::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            merchant,
            amount,
        )
        .with_category(category)
    }

    fn month() -> Vec<Transaction> {
        vec![
            tx("2025-09-02", "SAFEWAY", "Groceries", 300.0),
            tx("2025-09-05", "UBEREATS", "Dining", 120.0),
            tx("2025-09-08", "STARBUCKS", "Coffee", 30.0),
        ]
    }

    #[test]
    fn test_cut_reduces_expense() {
        let cuts = HashMap::from([("Dining".to_string(), 60.0)]);
        let report = simulate_cuts(&month(), &cuts, 2000.0, 3000.0, 10).unwrap();
        assert_eq!(report.current_expense, 450.0);
        assert_eq!(report.new_expense, 390.0);
        assert_eq!(report.applied["Dining"], 60.0);
    }

    #[test]
    fn test_cut_clamped_to_category_spend() {
        // Asking for more than Coffee's $30 only removes $30
        let cuts = HashMap::from([("Coffee".to_string(), 500.0)]);
        let report = simulate_cuts(&month(), &cuts, 2000.0, 3000.0, 10).unwrap();
        assert_eq!(report.applied["Coffee"], 30.0);
        assert_eq!(report.new_expense, 420.0);
    }

    #[test]
    fn test_new_expense_never_negative() {
        let cuts = HashMap::from([
            ("Groceries".to_string(), 10_000.0),
            ("Dining".to_string(), 10_000.0),
            ("Coffee".to_string(), 10_000.0),
            ("Phantom".to_string(), 10_000.0),
        ]);
        let report = simulate_cuts(&month(), &cuts, 2000.0, 3000.0, 10).unwrap();
        assert_eq!(report.new_expense, 0.0);
        assert!(!report.applied.contains_key("Phantom"));
    }

    #[test]
    fn test_negative_cut_ignored() {
        let cuts = HashMap::from([("Dining".to_string(), -50.0)]);
        let report = simulate_cuts(&month(), &cuts, 2000.0, 3000.0, 10).unwrap();
        assert!(report.applied.is_empty());
        assert_eq!(report.new_expense, report.current_expense);
    }

    #[test]
    fn test_invalid_months_propagates() {
        let cuts = HashMap::new();
        assert!(simulate_cuts(&month(), &cuts, 2000.0, 3000.0, 0).is_err());
    }

    #[test]
    fn test_does_not_mutate_input() {
        let txs = month();
        let before = serde_json::to_string(&txs).unwrap();
        let cuts = HashMap::from([("Dining".to_string(), 60.0)]);
        simulate_cuts(&txs, &cuts, 2000.0, 3000.0, 10).unwrap();
        assert_eq!(serde_json::to_string(&txs).unwrap(), before);
    }

    #[test]
    fn test_empty_dataset_forecasts_zero_expense() {
        let cuts = HashMap::new();
        let report = simulate_cuts(&[], &cuts, 2000.0, 3000.0, 10).unwrap();
        assert!(report.period.is_none());
        assert_eq!(report.current_expense, 0.0);
        assert!(report.forecast.on_track);
    }
}
