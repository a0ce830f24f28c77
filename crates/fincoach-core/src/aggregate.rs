//! Period aggregation
//!
//! Groups expense-side transactions by calendar month and by
//! category/merchant. Every downstream analytic (trends, score, forecast,
//! what-if) reads month buckets built here rather than re-deriving them.
//!
//! Breakdown rows are sorted by total descending with ties broken by name,
//! so "top N" lists are deterministic for equal spend.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{Period, Transaction};

/// Total spend for one category within a period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Total spend for one merchant within a period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantTotal {
    pub merchant: String,
    pub total: f64,
}

/// Month-over-month movement for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDelta {
    pub category: String,
    pub this_month: f64,
    pub prev_month: f64,
    pub delta: f64,
}

/// The most recent period containing any expense, if one exists
pub fn latest_period(transactions: &[Transaction]) -> Option<Period> {
    transactions
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.period())
        .max()
}

/// Total expense for one period
pub fn period_total(transactions: &[Transaction], period: Period) -> f64 {
    transactions
        .iter()
        .filter(|t| t.is_expense() && t.period() == period)
        .map(|t| t.amount)
        .sum()
}

/// Per-category expense totals for one period, sorted desc then by name
pub fn totals_by_category(transactions: &[Transaction], period: Period) -> Vec<CategoryTotal> {
    let mut by_category: HashMap<&str, f64> = HashMap::new();
    for tx in transactions.iter().filter(|t| t.is_expense() && t.period() == period) {
        *by_category.entry(tx.category.as_str()).or_insert(0.0) += tx.amount;
    }

    let mut rows: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}

/// Per-merchant expense totals for one period, sorted desc then by name
pub fn totals_by_merchant(transactions: &[Transaction], period: Period) -> Vec<MerchantTotal> {
    let mut by_merchant: HashMap<&str, f64> = HashMap::new();
    for tx in transactions.iter().filter(|t| t.is_expense() && t.period() == period) {
        *by_merchant.entry(tx.merchant.as_str()).or_insert(0.0) += tx.amount;
    }

    let mut rows: Vec<MerchantTotal> = by_merchant
        .into_iter()
        .map(|(merchant, total)| MerchantTotal {
            merchant: merchant.to_string(),
            total,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.merchant.cmp(&b.merchant))
    });
    rows
}

/// Dense trailing series of monthly expense totals.
///
/// Returns exactly `months` entries ending at the latest expense period,
/// oldest first, with months that saw no spend filled with zero. An empty
/// dataset yields an empty series (there is no anchor month to count back
/// from).
pub fn trailing_totals(transactions: &[Transaction], months: u32) -> Vec<(Period, f64)> {
    if months == 0 {
        return Vec::new();
    }
    let anchor = match latest_period(transactions) {
        Some(p) => p,
        None => return Vec::new(),
    };

    let mut sums: HashMap<Period, f64> = HashMap::new();
    for tx in transactions.iter().filter(|t| t.is_expense()) {
        *sums.entry(tx.period()).or_insert(0.0) += tx.amount;
    }

    (0..months)
        .rev()
        .map(|back| {
            let period = anchor.minus_months(back);
            (period, sums.get(&period).copied().unwrap_or(0.0))
        })
        .collect()
}

/// Per-category series aligned with a month axis, zero-filled
pub fn trailing_by_category(
    transactions: &[Transaction],
    months: &[Period],
) -> Vec<(String, Vec<f64>)> {
    let mut sums: HashMap<(&str, Period), f64> = HashMap::new();
    let mut categories: Vec<&str> = Vec::new();
    for tx in transactions.iter().filter(|t| t.is_expense()) {
        let key = (tx.category.as_str(), tx.period());
        if !categories.contains(&tx.category.as_str()) {
            categories.push(tx.category.as_str());
        }
        *sums.entry(key).or_insert(0.0) += tx.amount;
    }
    categories.sort_unstable();

    categories
        .into_iter()
        .map(|cat| {
            let series = months
                .iter()
                .map(|m| sums.get(&(cat, *m)).copied().unwrap_or(0.0))
                .collect();
            (cat.to_string(), series)
        })
        .collect()
}

/// Category totals for the latest period vs the one before it.
///
/// Empty when the dataset has fewer than two expense months; categories
/// present in either month appear, sorted by current spend descending.
pub fn category_deltas(transactions: &[Transaction]) -> Vec<CategoryDelta> {
    let current = match latest_period(transactions) {
        Some(p) => p,
        None => return Vec::new(),
    };
    // Compare against the most recent month that actually has data, which
    // may not be the calendar-previous month in a sparse ledger
    let previous = match transactions
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.period())
        .filter(|p| *p < current)
        .max()
    {
        Some(p) => p,
        None => return Vec::new(),
    };

    let cur = totals_by_category(transactions, current);
    let prev = totals_by_category(transactions, previous);

    let mut names: Vec<&str> = cur
        .iter()
        .map(|c| c.category.as_str())
        .chain(prev.iter().map(|c| c.category.as_str()))
        .collect();
    names.sort_unstable();
    names.dedup();

    let lookup = |rows: &[CategoryTotal], name: &str| {
        rows.iter()
            .find(|r| r.category == name)
            .map(|r| r.total)
            .unwrap_or(0.0)
    };

    let mut deltas: Vec<CategoryDelta> = names
        .into_iter()
        .map(|name| {
            let this_month = lookup(&cur, name);
            let prev_month = lookup(&prev, name);
            CategoryDelta {
                category: name.to_string(),
                this_month,
                prev_month,
                delta: this_month - prev_month,
            }
        })
        .collect();
    deltas.sort_by(|a, b| {
        b.this_month
            .partial_cmp(&a.this_month)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
    deltas
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

    fn sample() -> Vec<Transaction> {
        vec![
            tx("2025-08-03", "SAFEWAY", "Groceries", 80.0),
            tx("2025-09-02", "SAFEWAY", "Groceries", 60.0),
            tx("2025-09-05", "STARBUCKS", "Coffee", 5.0),
            tx("2025-09-10", "STARBUCKS", "Coffee", 6.0),
            tx("2025-09-12", "UBER", "Transport", 16.0),
            tx("2025-09-15", "PAYROLL", "Income", -1800.0),
        ]
    }

    #[test]
    fn test_latest_period_ignores_income() {
        let txs = vec![
            tx("2025-09-01", "SAFEWAY", "Groceries", 60.0),
            tx("2025-10-01", "PAYROLL", "Income", -1800.0),
        ];
        assert_eq!(latest_period(&txs), Some(Period::new(2025, 9)));
    }

    #[test]
    fn test_category_totals_partition_period_total() {
        let txs = sample();
        let period = Period::new(2025, 9);
        let total = period_total(&txs, period);
        let sum: f64 = totals_by_category(&txs, period).iter().map(|c| c.total).sum();
        assert!((total - sum).abs() < 1e-9);
        assert!((total - 87.0).abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_tie_break_is_lexical() {
        let txs = vec![
            tx("2025-09-01", "B-SHOP", "Beta", 10.0),
            tx("2025-09-02", "A-SHOP", "Alpha", 10.0),
        ];
        let cats = totals_by_category(&txs, Period::new(2025, 9));
        assert_eq!(cats[0].category, "Alpha");
        assert_eq!(cats[1].category, "Beta");
        let merchants = totals_by_merchant(&txs, Period::new(2025, 9));
        assert_eq!(merchants[0].merchant, "A-SHOP");
    }

    #[test]
    fn test_trailing_totals_dense_and_zero_filled() {
        let txs = vec![
            tx("2025-06-10", "SAFEWAY", "Groceries", 50.0),
            tx("2025-09-10", "SAFEWAY", "Groceries", 70.0),
        ];
        let series = trailing_totals(&txs, 6);
        assert_eq!(series.len(), 6);
        assert_eq!(series[0].0, Period::new(2025, 4));
        assert_eq!(series[5].0, Period::new(2025, 9));
        assert_eq!(series[2].1, 50.0); // June
        assert_eq!(series[3].1, 0.0); // July gap
        assert_eq!(series[5].1, 70.0);
    }

    #[test]
    fn test_trailing_totals_empty_dataset() {
        assert!(trailing_totals(&[], 6).is_empty());
    }

    #[test]
    fn test_category_deltas_cover_both_months() {
        let txs = vec![
            tx("2025-08-03", "SAFEWAY", "Groceries", 80.0),
            tx("2025-08-20", "UBER", "Transport", 30.0),
            tx("2025-09-02", "SAFEWAY", "Groceries", 60.0),
            tx("2025-09-05", "STARBUCKS", "Coffee", 25.0),
        ];
        let deltas = category_deltas(&txs);
        let groceries = deltas.iter().find(|d| d.category == "Groceries").unwrap();
        assert!((groceries.delta - (-20.0)).abs() < 1e-9);
        // Transport only existed last month, still reported
        let transport = deltas.iter().find(|d| d.category == "Transport").unwrap();
        assert_eq!(transport.this_month, 0.0);
        assert_eq!(transport.prev_month, 30.0);
    }

    #[test]
    fn test_category_deltas_need_two_months() {
        let txs = vec![tx("2025-09-02", "SAFEWAY", "Groceries", 60.0)];
        assert!(category_deltas(&txs).is_empty());
    }
}
