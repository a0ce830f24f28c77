//! Rule-based coaching
//!
//! Composes the fixed metric set the coaching surface may reference (one
//! compact context built from the other analytics) and derives from it a
//! short list of deterministic nudges plus greedy per-category trim
//! suggestions that cover a monthly savings gap.

use serde::{Deserialize, Serialize};

use crate::aggregate::{self, CategoryDelta, CategoryTotal, MerchantTotal};
use crate::anomaly::{self, AnomalyConfig};
use crate::coffee::{self, CoffeeConfig};
use crate::error::Result;
use crate::forecast::{self, ForecastResult};
use crate::models::{Period, Transaction};
use crate::recurring::round2;

/// How many merchants the context carries
const TOP_MERCHANTS: usize = 10;

/// Maximum nudges returned per call
const MAX_NUDGES: usize = 4;

/// Trim cuts below this are noise and not suggested
const MIN_SUGGESTED_CUT: f64 = 5.0;

/// A proposed reduction for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrimSuggestion {
    pub category: String,
    /// The category's current-month spend
    pub current: f64,
    pub suggested_cut: f64,
}

/// One-line coffee summary for the current period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoffeeNote {
    pub coffee_spend: f64,
    pub message: String,
}

/// The compact snapshot the coaching rules (and any external free-text
/// layer) work from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachContext {
    pub period: Option<String>,
    pub expense_total: f64,
    pub by_category: Vec<CategoryTotal>,
    pub top_merchants: Vec<MerchantTotal>,
    pub coffee_msg: String,
    pub forecast: ForecastResult,
    pub suggestions: Vec<TrimSuggestion>,
    pub delta_categories: Vec<CategoryDelta>,
    pub anomaly_count: usize,
}

/// Coaching output: the nudges plus the context they were derived from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachReport {
    pub nudges: Vec<String>,
    pub context: CoachContext,
}

/// One-line coffee spend summary for a period, with the classic
/// brew-at-home annualized saving (60% of the monthly spend, 12 months)
pub fn coffee_note(
    transactions: &[Transaction],
    period: Period,
    config: &CoffeeConfig,
) -> CoffeeNote {
    let coffee_spend: f64 = transactions
        .iter()
        .filter(|t| {
            t.amount > 0.0
                && t.period() == period
                && config
                    .category_names
                    .iter()
                    .any(|name| t.category.eq_ignore_ascii_case(name))
        })
        .map(|t| t.amount)
        .sum();
    let yearly_save = coffee_spend * 0.60 * 12.0;
    CoffeeNote {
        coffee_spend: round2(coffee_spend),
        message: format!(
            "You've spent ${:.2} on coffee in {}. Brewing at home a bit more could save ~${:.0}/yr.",
            coffee_spend, period, yearly_save
        ),
    }
}

/// Greedily suggest small trims (10–20%) from the biggest current-month
/// categories until the monthly gap is covered.
///
/// Categories spending $200+ are asked for 20%, smaller ones 10%; cuts
/// under $5 are skipped. Returns nothing when there is no gap.
pub fn trim_suggestions(transactions: &[Transaction], needed_per_month: f64) -> Vec<TrimSuggestion> {
    if needed_per_month <= 0.0 {
        return Vec::new();
    }
    let period = match aggregate::latest_period(transactions) {
        Some(p) => p,
        None => return Vec::new(),
    };

    let mut remaining = needed_per_month;
    let mut suggestions = Vec::new();
    for row in aggregate::totals_by_category(transactions, period) {
        if remaining <= 0.0 {
            break;
        }
        let pct = if row.total >= 200.0 { 0.2 } else { 0.1 };
        let cut = (row.total * pct).min(remaining);
        if cut >= MIN_SUGGESTED_CUT {
            suggestions.push(TrimSuggestion {
                category: row.category,
                current: round2(row.total),
                suggested_cut: round2(cut),
            });
            remaining -= cut;
        }
    }
    suggestions
}

/// Build the coaching context from the raw analytics.
///
/// Fails only on invalid forecast parameters (`months_to_goal <= 0`).
pub fn compose_context(
    transactions: &[Transaction],
    income_monthly: f64,
    goal_amount: f64,
    months_to_goal: i64,
    coffee_config: &CoffeeConfig,
    anomaly_config: &AnomalyConfig,
) -> Result<CoachContext> {
    let period = aggregate::latest_period(transactions);

    let (expense_total, by_category, top_merchants, coffee_msg) = match period {
        Some(p) => {
            let total = aggregate::period_total(transactions, p);
            let mut merchants = aggregate::totals_by_merchant(transactions, p);
            merchants.truncate(TOP_MERCHANTS);
            let note = coffee_note(transactions, p, coffee_config);
            (
                total,
                aggregate::totals_by_category(transactions, p),
                merchants,
                note.message,
            )
        }
        None => (0.0, Vec::new(), Vec::new(), String::new()),
    };

    let forecast =
        forecast::goal_forecast(income_monthly, expense_total, goal_amount, months_to_goal)?;
    let needed = if forecast.on_track {
        0.0
    } else {
        forecast.need_per_month
    };
    let suggestions = trim_suggestions(transactions, needed);
    let anomaly_count = anomaly::detect_anomalies(transactions, anomaly_config).len();

    Ok(CoachContext {
        period: period.map(|p| p.to_string()),
        expense_total: round2(expense_total),
        by_category,
        top_merchants,
        coffee_msg,
        forecast,
        suggestions,
        delta_categories: aggregate::category_deltas(transactions),
        anomaly_count,
    })
}

/// Derive up to four deterministic coaching nudges from a context
pub fn rule_nudges(ctx: &CoachContext) -> Vec<String> {
    let mut nudges = Vec::new();

    if ctx.forecast.on_track {
        nudges.push(
            "🎯 Great pace—your plan looks on track. Keep habits steady and avoid new recurring spend."
                .to_string(),
        );
    } else {
        nudges.push(format!(
            "🧭 To hit your goal, trim about ${:.0}/mo. The What-If panel shows exactly where to take it from.",
            ctx.forecast.need_per_month
        ));
    }

    if ctx.coffee_msg.to_lowercase().contains("coffee") {
        nudges.push(format!("☕ {}", ctx.coffee_msg));
    }

    if let Some(s) = ctx.suggestions.first() {
        nudges.push(format!(
            "✂️ Try cutting **{}** by ${:.0}/mo (currently ${:.0}).",
            s.category, s.suggested_cut, s.current
        ));
    }

    if ctx.anomaly_count > 0 {
        nudges.push(format!(
            "🚨 Spotted {} unusual charges recently—give Anomalies a quick review.",
            ctx.anomaly_count
        ));
    }

    nudges.truncate(MAX_NUDGES);
    nudges
}
