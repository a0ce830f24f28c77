//! Domain models for fincoach

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category assigned when a record carries none and no keyword matches
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Category that marks income-side rows regardless of amount sign
pub const INCOME_CATEGORY: &str = "Income";

/// A raw ledger row as it arrives from an upstream parser (CSV, JSON, ...).
///
/// Fields are loosely typed on purpose: exports disagree on header casing
/// and some render amounts as strings. The normalizer decides what survives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default, alias = "Date")]
    pub date: Option<String>,
    #[serde(default, alias = "Merchant")]
    pub merchant: Option<String>,
    #[serde(default, alias = "Category")]
    pub category: Option<String>,
    /// Number or numeric string; anything else drops the row
    #[serde(default, alias = "Amount")]
    pub amount: Option<serde_json::Value>,
}

/// A canonical ledger transaction.
///
/// `amount > 0` is an expense; `amount <= 0` is income, a refund, or
/// payroll. Expense-side analytics (recurring charges, anomalies, coffee)
/// only ever see positive amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub merchant: String,
    pub category: String,
    pub amount: f64,
}

impl Transaction {
    pub fn new(date: NaiveDate, merchant: impl Into<String>, amount: f64) -> Self {
        Self {
            date,
            merchant: merchant.into(),
            category: UNCATEGORIZED.to_string(),
            amount,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Calendar month this transaction falls in
    pub fn period(&self) -> Period {
        Period::from_date(self.date)
    }

    /// True for purchase/expense rows that expense-side analytics may use
    pub fn is_expense(&self) -> bool {
        self.amount > 0.0 && self.category != INCOME_CATEGORY
    }
}

/// A calendar month, the aggregation granularity for every metric.
///
/// Ordering is chronological, so sorting period keys never depends on
/// insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month immediately before this one
    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// The period `n` months earlier
    pub fn minus_months(&self, n: u32) -> Self {
        let total = self.year * 12 + self.month as i32 - 1 - n as i32;
        Self::new(total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
    }

    /// Number of days in this calendar month
    pub fn days_in_month(&self) -> u32 {
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1);
        match (first, next) {
            (Some(f), Some(n)) => (n - f).num_days() as u32,
            _ => 30,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (y, m) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid period: {}", s))?;
        let year: i32 = y.parse().map_err(|_| format!("Invalid period: {}", s))?;
        let month: u32 = m.parse().map_err(|_| format!("Invalid period: {}", s))?;
        if !(1..=12).contains(&month) {
            return Err(format!("Invalid period: {}", s));
        }
        Ok(Self::new(year, month))
    }
}
