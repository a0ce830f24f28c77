//! Goal-based cash-flow forecasting
//!
//! Projects whether a monthly income/expense pattern reaches a savings
//! goal within a requested number of months, and how much monthly surplus
//! is still missing when it does not.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::recurring::round2;

/// Tolerance for "on track" so cent-level rounding never flips the verdict
const ON_TRACK_EPSILON: f64 = 0.01;

/// Outcome of a goal forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Whether the current surplus already covers the required monthly saving
    pub on_track: bool,
    /// Monthly income minus current monthly expense; negative when
    /// spending exceeds income
    pub surplus: f64,
    /// Monthly shortfall against the required saving (<= 0 when on track)
    pub gap: f64,
    /// Additional amount needed per month to reach the goal (0 when on track)
    pub need_per_month: f64,
    /// Natural-language summary of the verdict
    pub message: String,
}

/// Forecast whether `goal_amount` is reachable in `months_to_goal` months.
///
/// `months_to_goal <= 0` is rejected with [`Error::InvalidInput`] since it
/// would divide by zero. Negative income or goal values are accepted; the
/// forecast simply reports how far off track they are.
pub fn goal_forecast(
    income_monthly: f64,
    expense_monthly: f64,
    goal_amount: f64,
    months_to_goal: i64,
) -> Result<ForecastResult> {
    if months_to_goal <= 0 {
        return Err(Error::InvalidInput(format!(
            "months_to_goal must be positive, got {}",
            months_to_goal
        )));
    }

    let surplus = income_monthly - expense_monthly;
    let required = goal_amount / months_to_goal as f64;
    let gap = required - surplus;
    let on_track = gap <= ON_TRACK_EPSILON;
    let need_per_month = gap.max(0.0);

    let message = if on_track {
        "You're on track!".to_string()
    } else {
        format!(
            "Need about ${:.0}/mo more to hit ${:.0} in {} months.",
            need_per_month, goal_amount, months_to_goal
        )
    };

    Ok(ForecastResult {
        on_track,
        surplus: round2(surplus),
        gap: round2(gap),
        need_per_month: round2(need_per_month),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_months_rejected() {
        let err = goal_forecast(2000.0, 1500.0, 3000.0, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(goal_forecast(2000.0, 1500.0, 3000.0, -4).is_err());
    }

    #[test]
    fn test_on_track_when_surplus_covers_required() {
        // surplus 500, required 300
        let fc = goal_forecast(2000.0, 1500.0, 3000.0, 10).unwrap();
        assert!(fc.on_track);
        assert_eq!(fc.surplus, 500.0);
        assert_eq!(fc.need_per_month, 0.0);
        assert!(fc.gap <= 0.0);
    }

    #[test]
    fn test_off_track_reports_monthly_need() {
        // surplus 100, required 300 -> missing 200/mo
        let fc = goal_forecast(2000.0, 1900.0, 3000.0, 10).unwrap();
        assert!(!fc.on_track);
        assert_eq!(fc.need_per_month, 200.0);
        assert_eq!(fc.gap, 200.0);
        assert!(fc.message.contains("200"));
    }

    #[test]
    fn test_negative_surplus_surfaces() {
        // Spending above income: surplus must stay negative, not clamp to 0
        let fc = goal_forecast(1000.0, 1400.0, 1200.0, 12).unwrap();
        assert_eq!(fc.surplus, -400.0);
        assert!(!fc.on_track);
        assert_eq!(fc.need_per_month, 500.0);
    }

    #[test]
    fn test_on_track_iff_need_is_zero() {
        for (income, expense, goal, months) in [
            (2000.0, 1500.0, 3000.0, 10),
            (2000.0, 1900.0, 3000.0, 10),
            (0.0, 0.0, 0.0, 1),
            (1000.0, 1400.0, 1200.0, 12),
            (1800.0, 1800.0, -500.0, 5),
        ] {
            let fc = goal_forecast(income, expense, goal, months).unwrap();
            assert_eq!(fc.on_track, fc.need_per_month <= ON_TRACK_EPSILON);
        }
    }

    #[test]
    fn test_negative_goal_accepted() {
        let fc = goal_forecast(1800.0, 1800.0, -500.0, 5).unwrap();
        assert!(fc.on_track);
    }
}
