//! Statistical anomaly detection
//!
//! Flags individual expense transactions whose amount deviates from the
//! typical spend of their peers. The comparison group is other expenses in
//! the same category over a trailing window; merchants with enough history
//! serve as the fallback group when the category is too thin.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Period, Transaction};

/// Detection configuration
#[derive(Debug, Clone)]
pub struct AnomalyConfig {
    /// Minimum comparison-group size; smaller groups never produce flags
    pub min_samples: usize,
    /// |z| at or above this flags the transaction
    pub z_threshold: f64,
    /// Trailing window (calendar months before the transaction's month)
    /// for the category comparison group
    pub window_months: u32,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            min_samples: 3,
            z_threshold: 2.5,
            window_months: 3,
        }
    }
}

/// An expense whose amount is statistically unusual for its peer group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anomaly {
    pub date: NaiveDate,
    pub merchant: String,
    pub category: String,
    pub amount: f64,
    pub z_score: f64,
}

/// Detect anomalous expense transactions.
///
/// For each expense: build the category group from the `window_months`
/// calendar months before its own month; when that group is smaller than
/// `min_samples`, fall back to the merchant's full history minus the
/// transaction itself. No flag is emitted unless the group has at least
/// `min_samples` members with a nonzero spread.
///
/// Output is sorted by date descending, then |z| descending, so the
/// freshest and most surprising flags come first.
pub fn detect_anomalies(transactions: &[Transaction], config: &AnomalyConfig) -> Vec<Anomaly> {
    let expenses: Vec<&Transaction> = transactions.iter().filter(|t| t.is_expense()).collect();
    let mut anomalies: Vec<Anomaly> = Vec::new();

    for (idx, tx) in expenses.iter().enumerate() {
        let period = tx.period();
        let window_start = period.minus_months(config.window_months);

        // Category peers in the trailing window, own month excluded
        let category_group: Vec<f64> = expenses
            .iter()
            .filter(|peer| {
                let p = peer.period();
                peer.category == tx.category && p >= window_start && p < period
            })
            .map(|peer| peer.amount)
            .collect();

        let group = if category_group.len() >= config.min_samples {
            category_group
        } else {
            // Fallback: same merchant over the full dataset minus this row
            expenses
                .iter()
                .enumerate()
                .filter(|(i, peer)| *i != idx && peer.merchant == tx.merchant)
                .map(|(_, peer)| peer.amount)
                .collect()
        };

        if group.len() < config.min_samples {
            continue;
        }

        let (mean, stddev) = mean_and_stddev(&group);
        if stddev <= 0.0 {
            continue;
        }

        let z = (tx.amount - mean) / stddev;
        if z.abs() >= config.z_threshold {
            anomalies.push(Anomaly {
                date: tx.date,
                merchant: tx.merchant.clone(),
                category: tx.category.clone(),
                amount: tx.amount,
                z_score: z,
            });
        }
    }

    anomalies.sort_by(|a, b| {
        b.date.cmp(&a.date).then_with(|| {
            b.z_score
                .abs()
                .partial_cmp(&a.z_score.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    });
    anomalies
}

/// Count anomalies falling in one period
pub fn anomalies_in_period(anomalies: &[Anomaly], period: Period) -> usize {
    anomalies
        .iter()
        .filter(|a| Period::from_date(a.date) == period)
        .count()
}

/// Mean and population standard deviation
fn mean_and_stddev(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
