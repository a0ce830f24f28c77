//! Coffee-spend assessment
//!
//! A narrow-domain rule engine that answers one question: is this person
//! overspending on coffee? Classification is keyword-driven, the verdict
//! comes from three independent triggers (monthly cap, visit frequency,
//! surge vs the trailing average), and the suggestions are ranked quick
//! wins sized from the observed average ticket.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Period, Transaction};
use crate::recurring::round2;

/// Assessment thresholds and classification lists, all caller-overridable
#[derive(Debug, Clone)]
pub struct CoffeeConfig {
    /// Categories treated as coffee (case-insensitive equality)
    pub category_names: Vec<String>,
    /// Merchant substrings treated as coffee (case-insensitive)
    pub merchant_keywords: Vec<String>,
    /// Monthly spend above this is flagged
    pub monthly_cap: f64,
    /// Visits per week above this is flagged
    pub per_week_count_cap: f64,
    /// Fractional rise over the 3-month average that counts as a surge
    pub surge_vs_3mo_pct: f64,
}

impl Default for CoffeeConfig {
    fn default() -> Self {
        Self {
            category_names: vec!["Coffee".to_string()],
            merchant_keywords: [
                "Starbucks",
                "Peet",
                "Peet's",
                "Philz",
                "Dunkin",
                "Blue Bottle",
                "Cafe",
                "Coffee",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            monthly_cap: 75.0,
            per_week_count_cap: 5.0,
            surge_vs_3mo_pct: 0.25,
        }
    }
}

/// Why the assessment came out the way it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoffeeReason {
    /// No usable transactions at all
    NoData,
    /// Transactions exist but none classify as coffee
    NoCoffeeFound,
    /// At least one overspend trigger fired
    Over,
    /// Coffee spend looks reasonable
    Ok,
}

/// Metrics behind the verdict, for the most recent month with coffee spend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoffeeDetails {
    /// `YYYY-MM` of the assessed month
    pub month: String,
    pub monthly_total: f64,
    pub monthly_count: usize,
    pub avg_ticket: f64,
    pub visits_per_week: f64,
    /// Mean monthly total over the last up-to-3 months with coffee spend
    pub avg_3mo_total: f64,
    /// Human-readable description of each trigger that fired
    pub flags: Vec<String>,
}

/// One ranked savings suggestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoffeeSuggestion {
    pub label: String,
    pub est_monthly_save: f64,
}

/// The full assessment returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoffeeAssessment {
    /// Data sufficiency: false only when there is nothing to assess
    pub ok: bool,
    pub reason: CoffeeReason,
    pub answer: String,
    pub details: Option<CoffeeDetails>,
    pub suggestions: Vec<CoffeeSuggestion>,
}

/// Rollup of one month's coffee activity
#[derive(Debug, Default)]
struct MonthRollup {
    total: f64,
    count: usize,
}

/// Assess coffee spending over the transaction set.
///
/// Only positive-amount transactions participate. A transaction is coffee
/// when its category equals one of the configured names, or its merchant
/// contains one of the configured keywords (both case-insensitive).
pub fn assess_coffee_spending(
    transactions: &[Transaction],
    config: &CoffeeConfig,
) -> CoffeeAssessment {
    let usable: Vec<&Transaction> = transactions.iter().filter(|t| t.amount > 0.0).collect();

    if usable.is_empty() {
        return CoffeeAssessment {
            ok: false,
            reason: CoffeeReason::NoData,
            answer: "I don’t see any transactions yet.".to_string(),
            details: None,
            suggestions: vec![],
        };
    }

    let coffee: Vec<&&Transaction> = usable.iter().filter(|t| is_coffee(t, config)).collect();
    if coffee.is_empty() {
        return CoffeeAssessment {
            ok: true,
            reason: CoffeeReason::NoCoffeeFound,
            answer: "No coffee purchases detected—so you're not overspending on coffee."
                .to_string(),
            details: None,
            suggestions: vec![],
        };
    }

    // Per-month rollups; BTreeMap keeps months chronological
    let mut by_month: BTreeMap<Period, MonthRollup> = BTreeMap::new();
    for tx in &coffee {
        let rollup = by_month.entry(tx.period()).or_default();
        rollup.total += tx.amount;
        rollup.count += 1;
    }

    let (&last_month, last) = by_month.iter().next_back().expect("coffee is non-empty");

    // Average over the last up-to-3 months that actually have coffee spend
    let recent_totals: Vec<f64> = by_month
        .values()
        .rev()
        .take(3)
        .map(|m| m.total)
        .collect();
    let avg3 = recent_totals.iter().sum::<f64>() / recent_totals.len() as f64;

    let weeks_in_month = last_month.days_in_month() as f64 / 7.0;
    let visits_per_week = last.count as f64 / weeks_in_month;

    let over_cap = last.total > config.monthly_cap;
    let freq_high = visits_per_week > config.per_week_count_cap;
    let surge = avg3 > 0.0 && last.total > avg3 * (1.0 + config.surge_vs_3mo_pct);

    let mut flags: Vec<String> = Vec::new();
    if over_cap {
        flags.push(format!(
            "You spent ${:.0} on coffee in {} (above the ${} comfort cap).",
            last.total, last_month, config.monthly_cap
        ));
    }
    if freq_high {
        flags.push(format!(
            "You're buying coffee ~{:.1}×/week (above {}×/week).",
            visits_per_week, config.per_week_count_cap
        ));
    }
    if surge {
        flags.push(format!(
            "Coffee spend is up ~{:.0}% vs your 3-month average.",
            (last.total / avg3 - 1.0) * 100.0
        ));
    }

    let is_too_much = !flags.is_empty();
    let avg_ticket = last.total / (last.count.max(1) as f64);

    let mut suggestions = vec![
        CoffeeSuggestion {
            label: "Home-brew 1 day/week".to_string(),
            est_monthly_save: avg_ticket.round().max(4.0) * 4.0,
        },
        CoffeeSuggestion {
            label: "Size down or skip add-ons 2×/week".to_string(),
            est_monthly_save: ((avg_ticket * 0.3).max(2.0) * 8.0).round(),
        },
        CoffeeSuggestion {
            label: "Pick a lower-cost cafe for 2 visits/week".to_string(),
            est_monthly_save: ((avg_ticket * 0.25).max(2.0) * 8.0).round(),
        },
        CoffeeSuggestion {
            label: "Set a monthly coffee cap".to_string(),
            est_monthly_save: (last.total - config.monthly_cap).max(0.0).round().max(5.0),
        },
        CoffeeSuggestion {
            label: "Use a punch-card/rewards app".to_string(),
            est_monthly_save: 5.0,
        },
    ];
    suggestions.retain(|s| s.est_monthly_save > 0.0);
    suggestions.sort_by(|a, b| {
        b.est_monthly_save
            .partial_cmp(&a.est_monthly_save)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    suggestions.truncate(3);

    let answer = if is_too_much {
        "Yes — you’re likely overspending on coffee."
    } else {
        "No — your coffee spending looks reasonable right now."
    };

    CoffeeAssessment {
        ok: true,
        reason: if is_too_much {
            CoffeeReason::Over
        } else {
            CoffeeReason::Ok
        },
        answer: answer.to_string(),
        details: Some(CoffeeDetails {
            month: last_month.to_string(),
            monthly_total: round2(last.total),
            monthly_count: last.count,
            avg_ticket: round2(avg_ticket),
            visits_per_week: (visits_per_week * 10.0).round() / 10.0,
            avg_3mo_total: round2(avg3),
            flags,
        }),
        suggestions,
    }
}

fn is_coffee(tx: &Transaction, config: &CoffeeConfig) -> bool {
    let category = tx.category.to_lowercase();
    if config
        .category_names
        .iter()
        .any(|name| category == name.to_lowercase())
    {
        return true;
    }
    let merchant = tx.merchant.to_lowercase();
    config
        .merchant_keywords
        .iter()
        .any(|key| merchant.contains(&key.to_lowercase()))
}
