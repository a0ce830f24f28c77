//! Analytics engine facade
//!
//! One entry point per query the presentation layer can ask for. Every
//! method is a pure function of the supplied transaction snapshot plus
//! explicit parameters; the engine itself only carries configuration.
//! Privacy masking happens here, after all numeric computation, so a
//! masked response always carries the same totals as an unmasked one.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::aggregate::{self, CategoryTotal, MerchantTotal};
use crate::anomaly::{self, Anomaly, AnomalyConfig};
use crate::coach::{self, CoachReport, CoffeeNote};
use crate::coffee::{self, CoffeeAssessment, CoffeeConfig};
use crate::error::{Error, Result};
use crate::forecast::{self, ForecastResult};
use crate::models::Transaction;
use crate::privacy::PrivacyMask;
use crate::recurring::{self, MerchantRecurrence, RecurringConfig};
use crate::score::{self, HealthScore, ScoreWeights};
use crate::whatif::{self, WhatIfReport};

/// How many merchants a summary lists
const SUMMARY_TOP_MERCHANTS: usize = 10;

/// Tunable knobs for every analytic, bundled
#[derive(Debug, Clone, Default)]
pub struct AnalyticsConfig {
    pub recurring: RecurringConfig,
    pub anomaly: AnomalyConfig,
    pub weights: ScoreWeights,
    pub coffee: CoffeeConfig,
}

/// Current-month spend summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Latest expense period, `None` when the ledger is empty
    pub period: Option<String>,
    pub total_expense_month: f64,
    pub by_category: Vec<CategoryTotal>,
    pub top_merchants: Vec<MerchantTotal>,
    pub coffee: Option<CoffeeNote>,
    pub privacy: bool,
}

/// Monthly expense trend lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trends {
    /// Month axis as `YYYY-MM`, oldest first, dense
    pub months: Vec<String>,
    pub totals: Vec<f64>,
    pub by_category: Vec<CategorySeries>,
}

/// One category's series aligned with the trend month axis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySeries {
    pub category: String,
    pub totals: Vec<f64>,
}

/// The analytics core behind every insight query
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Current-month summary: total, category/merchant breakdown, coffee line
    pub fn summary(&self, transactions: &[Transaction], privacy: bool) -> Summary {
        let period = aggregate::latest_period(transactions);
        let (total, by_category, mut top_merchants, coffee) = match period {
            Some(p) => {
                let mut merchants = aggregate::totals_by_merchant(transactions, p);
                merchants.truncate(SUMMARY_TOP_MERCHANTS);
                (
                    aggregate::period_total(transactions, p),
                    aggregate::totals_by_category(transactions, p),
                    merchants,
                    Some(coach::coffee_note(transactions, p, &self.config.coffee)),
                )
            }
            None => (0.0, Vec::new(), Vec::new(), None),
        };

        if privacy {
            let mut mask = PrivacyMask::new();
            for row in &mut top_merchants {
                row.merchant = mask.label(&row.merchant);
            }
        }

        debug!(period = ?period.map(|p| p.to_string()), total, "Summary computed");
        Summary {
            period: period.map(|p| p.to_string()),
            total_expense_month: crate::recurring::round2(total),
            by_category,
            top_merchants,
            coffee,
            privacy,
        }
    }

    /// Dense trailing expense totals plus per-category series.
    ///
    /// `months_back` must be positive; an empty ledger yields empty axes.
    pub fn trends(&self, transactions: &[Transaction], months_back: u32) -> Result<Trends> {
        if months_back == 0 {
            return Err(Error::InvalidInput(
                "months_back must be positive".to_string(),
            ));
        }

        let series = aggregate::trailing_totals(transactions, months_back);
        let periods: Vec<_> = series.iter().map(|(p, _)| *p).collect();
        let by_category = aggregate::trailing_by_category(transactions, &periods)
            .into_iter()
            .map(|(category, totals)| CategorySeries { category, totals })
            .collect();

        Ok(Trends {
            months: periods.iter().map(|p| p.to_string()).collect(),
            totals: series.into_iter().map(|(_, total)| total).collect(),
            by_category,
        })
    }

    /// Recurring charges ("subscriptions / gray charges")
    pub fn subscriptions(
        &self,
        transactions: &[Transaction],
        privacy: bool,
    ) -> Vec<MerchantRecurrence> {
        let mut subs = recurring::detect_recurring(transactions, &self.config.recurring);
        if privacy {
            let mut mask = PrivacyMask::new();
            for sub in &mut subs {
                sub.merchant = mask.label(&sub.merchant);
            }
        }
        subs
    }

    /// Statistically unusual expense transactions
    pub fn anomalies(&self, transactions: &[Transaction], privacy: bool) -> Vec<Anomaly> {
        let mut anomalies = anomaly::detect_anomalies(transactions, &self.config.anomaly);
        if privacy {
            let mut mask = PrivacyMask::new();
            for a in &mut anomalies {
                a.merchant = mask.label(&a.merchant);
            }
        }
        anomalies
    }

    /// Composite financial-health score
    pub fn score(&self, transactions: &[Transaction], income_monthly: f64) -> HealthScore {
        score::health_score(
            transactions,
            income_monthly,
            &self.config.weights,
            &self.config.recurring,
            &self.config.anomaly,
        )
    }

    /// Goal forecast against the current month's spend
    pub fn forecast(
        &self,
        transactions: &[Transaction],
        income_monthly: f64,
        goal_amount: f64,
        months_to_goal: i64,
    ) -> Result<ForecastResult> {
        let expense = aggregate::latest_period(transactions)
            .map(|p| aggregate::period_total(transactions, p))
            .unwrap_or(0.0);
        forecast::goal_forecast(income_monthly, expense, goal_amount, months_to_goal)
    }

    /// What-if simulation: forecast with hypothetical category cuts applied
    pub fn what_if(
        &self,
        transactions: &[Transaction],
        cuts: &HashMap<String, f64>,
        income_monthly: f64,
        goal_amount: f64,
        months_to_goal: i64,
    ) -> Result<WhatIfReport> {
        whatif::simulate_cuts(transactions, cuts, income_monthly, goal_amount, months_to_goal)
    }

    /// Coffee-spend assessment with the engine's configured thresholds
    pub fn coffee_assessment(&self, transactions: &[Transaction]) -> CoffeeAssessment {
        coffee::assess_coffee_spending(transactions, &self.config.coffee)
    }

    /// Coffee-spend assessment with caller-supplied thresholds
    pub fn coffee_assessment_with(
        &self,
        transactions: &[Transaction],
        config: &CoffeeConfig,
    ) -> CoffeeAssessment {
        coffee::assess_coffee_spending(transactions, config)
    }

    /// Rule-based coaching nudges plus the context they came from
    pub fn coach(
        &self,
        transactions: &[Transaction],
        income_monthly: f64,
        goal_amount: f64,
        months_to_goal: i64,
        privacy: bool,
    ) -> Result<CoachReport> {
        let mut context = coach::compose_context(
            transactions,
            income_monthly,
            goal_amount,
            months_to_goal,
            &self.config.coffee,
            &self.config.anomaly,
        )?;

        if privacy {
            let mut mask = PrivacyMask::new();
            for row in &mut context.top_merchants {
                row.merchant = mask.label(&row.merchant);
            }
        }

        let nudges = coach::rule_nudges(&context);
        Ok(CoachReport { nudges, context })
    }
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

    fn ledger() -> Vec<Transaction> {
        vec![
            tx("2025-08-01", "NETFLIX", "Entertainment", 15.49),
            tx("2025-08-03", "SAFEWAY", "Groceries", 80.0),
            tx("2025-09-01", "NETFLIX", "Entertainment", 15.49),
            tx("2025-09-02", "SAFEWAY", "Groceries", 60.0),
            tx("2025-09-05", "STARBUCKS", "Coffee", 5.0),
            tx("2025-09-15", "PAYROLL", "Income", -1800.0),
        ]
    }

    #[test]
    fn test_summary_totals_survive_masking() {
        let engine = AnalyticsEngine::new();
        let open = engine.summary(&ledger(), false);
        let masked = engine.summary(&ledger(), true);

        assert_eq!(open.total_expense_month, masked.total_expense_month);
        assert_eq!(open.by_category.len(), masked.by_category.len());
        let open_totals: Vec<f64> = open.top_merchants.iter().map(|m| m.total).collect();
        let masked_totals: Vec<f64> = masked.top_merchants.iter().map(|m| m.total).collect();
        assert_eq!(open_totals, masked_totals);
        assert!(masked
            .top_merchants
            .iter()
            .all(|m| m.merchant.starts_with("Merchant ")));
    }

    #[test]
    fn test_summary_empty_ledger() {
        let engine = AnalyticsEngine::new();
        let summary = engine.summary(&[], false);
        assert!(summary.period.is_none());
        assert_eq!(summary.total_expense_month, 0.0);
        assert!(summary.coffee.is_none());
    }

    #[test]
    fn test_trends_axis_length() {
        let engine = AnalyticsEngine::new();
        let trends = engine.trends(&ledger(), 6).unwrap();
        assert_eq!(trends.months.len(), 6);
        assert_eq!(trends.totals.len(), 6);
        for series in &trends.by_category {
            assert_eq!(series.totals.len(), 6);
        }
        assert!(engine.trends(&ledger(), 0).is_err());
    }

    #[test]
    fn test_subscriptions_masked_consistently() {
        let engine = AnalyticsEngine::new();
        let subs = engine.subscriptions(&ledger(), true);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].merchant, "Merchant A");
        assert!((subs[0].charge - 15.49).abs() < 0.01);
    }

    #[test]
    fn test_forecast_uses_current_month_expense() {
        let engine = AnalyticsEngine::new();
        // September expense: 15.49 + 60 + 5 = 80.49
        let fc = engine.forecast(&ledger(), 2000.0, 3000.0, 10).unwrap();
        assert!((fc.surplus - 1919.51).abs() < 0.01);
        assert!(fc.on_track);
    }

    #[test]
    fn test_what_if_flows_through() {
        let engine = AnalyticsEngine::new();
        let cuts = HashMap::from([("Groceries".to_string(), 30.0)]);
        let report = engine.what_if(&ledger(), &cuts, 2000.0, 3000.0, 10).unwrap();
        assert!((report.current_expense - 80.49).abs() < 0.01);
        assert!((report.new_expense - 50.49).abs() < 0.01);
    }

    #[test]
    fn test_coach_report_masks_merchants() {
        let engine = AnalyticsEngine::new();
        let report = engine.coach(&ledger(), 2000.0, 3000.0, 10, true).unwrap();
        assert!(report
            .context
            .top_merchants
            .iter()
            .all(|m| m.merchant.starts_with("Merchant ")));
        assert!(!report.nudges.is_empty());
    }
}
