//! Composite financial-health scoring
//!
//! Combines several normalized signals into a single 0–100 score:
//! savings rate, month-to-month spending volatility, recurring-charge
//! burden, and anomaly frequency. Signals that cannot be computed (no
//! income supplied, a single month of history) are omitted and the
//! remaining weights renormalized instead of guessing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::aggregate;
use crate::anomaly::{self, AnomalyConfig};
use crate::models::{Period, Transaction};
use crate::recurring::{self, RecurringConfig};

/// Weight of each signal in the overall score. Weights sum to 1; when a
/// signal is omitted the rest are renormalized over their own sum.
#[derive(Debug, Clone)]
pub struct ScoreWeights {
    pub savings_rate: f64,
    pub volatility: f64,
    pub recurring_burden: f64,
    pub anomaly_hygiene: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            savings_rate: 0.55,
            volatility: 0.15,
            recurring_burden: 0.20,
            anomaly_hygiene: 0.10,
        }
    }
}

/// One named component of the health score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub name: String,
    /// Normalized 0–100
    pub value: u32,
    /// Short guidance shown next to the signal
    pub hint: String,
}

/// The composite score plus its contributing signals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthScore {
    /// Overall score, always within [0, 100]
    pub score: u32,
    /// Period the score describes (`None` for an empty dataset)
    pub period: Option<String>,
    pub signals: Vec<Signal>,
}

/// Number of trailing data months considered for the volatility signal
const VOLATILITY_MONTHS: usize = 6;

/// Compute the health score for the current (latest) expense month.
///
/// `income_monthly <= 0` means income is unknown: the savings-rate signal
/// is omitted rather than divided by zero. An empty dataset yields a
/// neutral 50 with no signals.
pub fn health_score(
    transactions: &[Transaction],
    income_monthly: f64,
    weights: &ScoreWeights,
    recurring_config: &RecurringConfig,
    anomaly_config: &AnomalyConfig,
) -> HealthScore {
    let current = match aggregate::latest_period(transactions) {
        Some(p) => p,
        None => {
            return HealthScore {
                score: 50,
                period: None,
                signals: vec![],
            }
        }
    };

    let current_total = aggregate::period_total(transactions, current);
    let mut weighted: Vec<(f64, f64, Signal)> = Vec::new();

    // Savings rate: fraction of income left after the current month's
    // spend, saturating at 0 and 1
    if income_monthly > 0.0 {
        let rate = ((income_monthly - current_total) / income_monthly).clamp(0.0, 1.0);
        weighted.push((
            weights.savings_rate,
            rate,
            Signal {
                name: "Savings Rate".to_string(),
                value: to_percent(rate),
                hint: "Aim for 20%+ of income.".to_string(),
            },
        ));
    } else {
        debug!("Income unknown; omitting savings-rate signal");
    }

    // Volatility: coefficient of variation of recent monthly totals,
    // inverted so flatter spending scores higher
    let mut monthly_totals: Vec<f64> = {
        let mut sums: HashMap<Period, f64> = HashMap::new();
        for tx in transactions.iter().filter(|t| t.is_expense()) {
            *sums.entry(tx.period()).or_insert(0.0) += tx.amount;
        }
        let mut entries: Vec<_> = sums.into_iter().collect();
        entries.sort_by_key(|(p, _)| *p);
        entries.into_iter().map(|(_, total)| total).collect()
    };
    if monthly_totals.len() > VOLATILITY_MONTHS {
        monthly_totals.drain(..monthly_totals.len() - VOLATILITY_MONTHS);
    }
    if monthly_totals.len() >= 2 {
        let mean = monthly_totals.iter().sum::<f64>() / monthly_totals.len() as f64;
        if mean > 1e-6 {
            let variance = monthly_totals
                .iter()
                .map(|v| (v - mean).powi(2))
                .sum::<f64>()
                / monthly_totals.len() as f64;
            let cv = variance.sqrt() / mean;
            let steadiness = 1.0 - cv.min(1.0);
            weighted.push((
                weights.volatility,
                steadiness,
                Signal {
                    name: "Volatility".to_string(),
                    value: to_percent(steadiness),
                    hint: "Flatter is better.".to_string(),
                },
            ));
        }
    }

    // Recurring burden: share of the current month's spend going to
    // charges billed in this period
    if current_total > 0.0 {
        let subscriptions = recurring::detect_recurring(transactions, recurring_config);
        let recurring_total: f64 = subscriptions
            .iter()
            .filter(|s| s.billed_in(current))
            .map(|s| s.charge)
            .sum();
        let ratio = (recurring_total / current_total).min(1.0);
        let headroom = 1.0 - ratio;
        weighted.push((
            weights.recurring_burden,
            headroom,
            Signal {
                name: "Recurring Burden".to_string(),
                value: to_percent(headroom),
                hint: "Trim subscriptions.".to_string(),
            },
        ));
    }

    // Anomaly hygiene: fraction of this month's transactions flagged as
    // statistical outliers, inverted
    let tx_in_period = transactions
        .iter()
        .filter(|t| t.is_expense() && t.period() == current)
        .count();
    if tx_in_period > 0 {
        let anomalies = anomaly::detect_anomalies(transactions, anomaly_config);
        let rate =
            anomaly::anomalies_in_period(&anomalies, current) as f64 / tx_in_period as f64;
        let hygiene = 1.0 - rate.min(1.0);
        weighted.push((
            weights.anomaly_hygiene,
            hygiene,
            Signal {
                name: "Anomaly Hygiene".to_string(),
                value: to_percent(hygiene),
                hint: "Review outliers.".to_string(),
            },
        ));
    }

    let weight_sum: f64 = weighted.iter().map(|(w, _, _)| w).sum();
    let score = if weight_sum > 0.0 {
        let raw: f64 = weighted.iter().map(|(w, v, _)| w * v).sum::<f64>() / weight_sum;
        ((raw * 100.0).round() as i64).clamp(0, 100) as u32
    } else {
        50
    };

    HealthScore {
        score,
        period: Some(current.to_string()),
        signals: weighted.into_iter().map(|(_, _, s)| s).collect(),
    }
}

fn to_percent(value: f64) -> u32 {
    ((value * 100.0).round() as i64).clamp(0, 100) as u32
}
