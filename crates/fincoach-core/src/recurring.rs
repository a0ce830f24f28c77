//! Recurring-charge detection
//!
//! Flags merchants billed repeatedly at a near-constant amount across
//! multiple calendar months (subscriptions and "gray charges") without
//! needing a merchant taxonomy. Variable spend (groceries, rideshare)
//! fails the amount-stability requirement and stays out.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::models::{Period, Transaction};

/// Detection configuration
#[derive(Debug, Clone)]
pub struct RecurringConfig {
    /// Minimum distinct billing months for a merchant to qualify
    pub min_periods: usize,
    /// Absolute tolerance (dollars) for an amount to join a charge cluster
    pub amount_tolerance_abs: f64,
    /// Relative tolerance for an amount to join a charge cluster
    pub amount_tolerance_pct: f64,
}

impl Default for RecurringConfig {
    fn default() -> Self {
        Self {
            min_periods: 2,
            amount_tolerance_abs: 2.0,
            amount_tolerance_pct: 0.10,
        }
    }
}

/// A merchant billed at a stable amount across multiple months
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantRecurrence {
    pub merchant: String,
    /// Representative charge (median of the clustered amounts)
    pub charge: f64,
    /// Billing months as a comma-joined `YYYY-MM` list
    pub months: String,
    /// Number of distinct billing months
    pub count: usize,
    #[serde(skip)]
    pub periods: Vec<Period>,
}

impl MerchantRecurrence {
    /// Whether this charge was billed in the given period
    pub fn billed_in(&self, period: Period) -> bool {
        self.periods.contains(&period)
    }
}

/// One cluster of similar monthly charges for a merchant
struct ChargeCluster {
    reference: f64,
    amounts: Vec<f64>,
    periods: Vec<Period>,
}

/// Detect recurring charges across the transaction set.
///
/// Per merchant, the median charge of each billing month is clustered:
/// an amount joins an existing cluster when it sits within the absolute or
/// relative tolerance of the cluster's running median. Clusters spanning
/// at least `min_periods` distinct months become [`MerchantRecurrence`]
/// rows, sorted by month count descending then merchant name.
pub fn detect_recurring(
    transactions: &[Transaction],
    config: &RecurringConfig,
) -> Vec<MerchantRecurrence> {
    // Median charge per (merchant, month); the median smooths out months
    // where a merchant was billed more than once
    let mut monthly: HashMap<(&str, Period), Vec<f64>> = HashMap::new();
    for tx in transactions.iter().filter(|t| t.is_expense()) {
        monthly
            .entry((tx.merchant.as_str(), tx.period()))
            .or_default()
            .push(tx.amount);
    }

    let mut per_merchant: HashMap<&str, Vec<(Period, f64)>> = HashMap::new();
    for ((merchant, period), amounts) in monthly {
        per_merchant
            .entry(merchant)
            .or_default()
            .push((period, median(&amounts)));
    }

    let mut results: Vec<MerchantRecurrence> = Vec::new();

    for (merchant, mut months) in per_merchant {
        months.sort_by_key(|(period, _)| *period);

        let mut clusters: Vec<ChargeCluster> = Vec::new();
        for (period, amount) in months {
            let matched = clusters.iter_mut().find(|c| {
                let diff = (amount - c.reference).abs();
                diff <= config.amount_tolerance_abs
                    || (c.reference > 0.0 && diff / c.reference <= config.amount_tolerance_pct)
            });
            match matched {
                Some(cluster) => {
                    cluster.amounts.push(amount);
                    if !cluster.periods.contains(&period) {
                        cluster.periods.push(period);
                    }
                    cluster.reference = median(&cluster.amounts);
                }
                None => clusters.push(ChargeCluster {
                    reference: amount,
                    amounts: vec![amount],
                    periods: vec![period],
                }),
            }
        }

        for cluster in clusters {
            if cluster.periods.len() < config.min_periods {
                continue;
            }
            let mut periods = cluster.periods;
            periods.sort();
            let months_label = periods
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            debug!(merchant, charge = cluster.reference, months = %months_label, "Recurring charge");
            results.push(MerchantRecurrence {
                merchant: merchant.to_string(),
                charge: round2(median(&cluster.amounts)),
                months: months_label,
                count: periods.len(),
                periods,
            });
        }
    }

    results.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.merchant.cmp(&b.merchant)));
    results
}

/// Median of a slice; 0.0 when empty
pub(crate) fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(date: &str, merchant: &str, amount: f64) -> Transaction {
        Transaction::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            merchant,
            amount,
        )
        .with_category("Entertainment")
    }

    #[test]
    fn test_three_identical_months_always_reported() {
        let txs = vec![
            tx("2025-07-15", "NETFLIX", 15.49),
            tx("2025-08-15", "NETFLIX", 15.49),
            tx("2025-09-15", "NETFLIX", 15.49),
        ];
        let subs = detect_recurring(&txs, &RecurringConfig::default());
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].merchant, "NETFLIX");
        assert_eq!(subs[0].count, 3);
        assert!((subs[0].charge - 15.49).abs() < 0.01);
        assert_eq!(subs[0].months, "2025-07, 2025-08, 2025-09");
    }

    #[test]
    fn test_single_month_never_reported() {
        let txs = vec![tx("2025-09-15", "NETFLIX", 15.49)];
        assert!(detect_recurring(&txs, &RecurringConfig::default()).is_empty());
    }

    #[test]
    fn test_small_drift_stays_in_one_cluster() {
        // Within $2 of the running median month to month
        let txs = vec![
            tx("2025-07-01", "SPOTIFY", 9.99),
            tx("2025-08-01", "SPOTIFY", 10.99),
            tx("2025-09-01", "SPOTIFY", 9.99),
        ];
        let subs = detect_recurring(&txs, &RecurringConfig::default());
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].count, 3);
    }

    #[test]
    fn test_variable_spend_not_reported() {
        let txs = vec![
            tx("2025-07-03", "SAFEWAY", 42.0),
            tx("2025-08-09", "SAFEWAY", 118.0),
            tx("2025-09-21", "SAFEWAY", 71.0),
        ];
        assert!(detect_recurring(&txs, &RecurringConfig::default()).is_empty());
    }

    #[test]
    fn test_income_rows_ignored() {
        let mut txs = vec![
            tx("2025-07-01", "PAYROLL", -1800.0),
            tx("2025-08-01", "PAYROLL", -1800.0),
        ];
        txs.iter_mut().for_each(|t| t.category = "Income".to_string());
        assert!(detect_recurring(&txs, &RecurringConfig::default()).is_empty());
    }

    #[test]
    fn test_sorted_by_count_then_merchant() {
        let txs = vec![
            tx("2025-07-01", "SPOTIFY", 9.99),
            tx("2025-08-01", "SPOTIFY", 9.99),
            tx("2025-07-15", "NETFLIX", 15.49),
            tx("2025-08-15", "NETFLIX", 15.49),
            tx("2025-09-15", "NETFLIX", 15.49),
        ];
        let subs = detect_recurring(&txs, &RecurringConfig::default());
        assert_eq!(subs[0].merchant, "NETFLIX");
        assert_eq!(subs[1].merchant, "SPOTIFY");
    }

    #[test]
    fn test_billed_in_lookup() {
        let txs = vec![
            tx("2025-08-15", "NETFLIX", 15.49),
            tx("2025-09-15", "NETFLIX", 15.49),
        ];
        let subs = detect_recurring(&txs, &RecurringConfig::default());
        assert!(subs[0].billed_in(Period::new(2025, 9)));
        assert!(!subs[0].billed_in(Period::new(2025, 7)));
    }
}
