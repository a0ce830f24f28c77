//! Transaction normalization
//!
//! Coerces loosely-typed raw ledger rows into canonical [`Transaction`]s.
//! Rows with an unparseable date or amount are dropped individually so a
//! partially corrupt ledger never blocks the rest of the dataset.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use crate::models::{RawRecord, Transaction, INCOME_CATEGORY, UNCATEGORIZED};

/// Accepted date formats, tried in order
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m/%d/%y"];

/// Keyword table for deriving a category from the merchant text when the
/// record carries none. First match wins; matching is case-insensitive
/// substring on the upper-cased merchant.
const CATEGORY_KEYWORDS: [(&str, &[&str]); 9] = [
    ("Coffee", &["STARBUCKS", "PEET", "COFFEE", "DUTCH BROS"]),
    (
        "Groceries",
        &["SAFEWAY", "WHOLE FOODS", "TRADER JOE", "KROGER", "RALPHS", "SPROUTS"],
    ),
    (
        "Dining",
        &["UBEREATS", "DOORDASH", "GRUBHUB", "RESTAURANT", "DINER", "PIZZA"],
    ),
    (
        "Transport",
        &["UBER", "LYFT", "SHELL", "CHEVRON", "EXXON", "BP", "GAS"],
    ),
    (
        "Shopping",
        &["AMAZON", "TARGET", "WALMART", "BEST BUY", "APPLE", "NIKE"],
    ),
    (
        "Entertainment",
        &["SPOTIFY", "NETFLIX", "HULU", "DISNEY", "YOUTUBE PREMIUM"],
    ),
    (
        "Utilities",
        &["COMCAST", "XFINITY", "AT&T", "T-MOBILE", "VERIZON", "PG&E", "WATER"],
    ),
    ("Rent", &["APARTMENTS", "RENT", "PROPERTY MGMT"]),
    (
        INCOME_CATEGORY,
        &["PAYROLL", "DIRECT DEPOSIT", "VENMO CREDIT", "ZELLE CREDIT", "REFUND"],
    ),
];

/// Parse a date string against the accepted format set
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    // ISO timestamps ("2025-09-01T12:00:00") reduce to their date part
    let date_part = s.split(['T', ' ']).next().unwrap_or(s);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Coerce a raw amount value (JSON number or numeric string) to f64.
///
/// Strings tolerate a leading `$`, thousands separators, and surrounding
/// whitespace. Non-finite results are rejected.
pub fn parse_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| !matches!(c, '$' | ','))
                .collect();
            cleaned.parse::<f64>().ok()?
        }
        _ => return None,
    };
    amount.is_finite().then_some(amount)
}

/// Derive a category from merchant text using the keyword table
pub fn categorize_merchant(merchant: &str) -> Option<&'static str> {
    let upper = merchant.to_uppercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keys)| keys.iter().any(|k| upper.contains(k)))
        .map(|(cat, _)| *cat)
}

/// Normalize a batch of raw records into canonical transactions.
///
/// Invalid rows (missing/unparseable date, missing merchant, non-numeric
/// amount) are silently excluded; the survivors come back sorted by date.
pub fn normalize(records: &[RawRecord]) -> Vec<Transaction> {
    let mut transactions: Vec<Transaction> = Vec::with_capacity(records.len());
    let mut dropped = 0usize;

    for record in records {
        match normalize_one(record) {
            Some(tx) => transactions.push(tx),
            None => {
                dropped += 1;
                debug!(?record, "Dropping malformed ledger row");
            }
        }
    }

    if dropped > 0 {
        debug!(kept = transactions.len(), dropped, "Normalization complete");
    }

    transactions.sort_by(|a, b| a.date.cmp(&b.date));
    transactions
}

fn normalize_one(record: &RawRecord) -> Option<Transaction> {
    let date = parse_date(record.date.as_deref()?)?;
    let merchant = record.merchant.as_deref()?.trim();
    if merchant.is_empty() {
        return None;
    }
    let amount = parse_amount(record.amount.as_ref()?)?;

    let category = record
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .or_else(|| categorize_merchant(merchant).map(str::to_string))
        .unwrap_or_else(|| UNCATEGORIZED.to_string());

    Some(Transaction {
        date,
        merchant: merchant.to_string(),
        category,
        amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(date: &str, merchant: &str, amount: Value) -> RawRecord {
        RawRecord {
            date: Some(date.to_string()),
            merchant: Some(merchant.to_string()),
            category: None,
            amount: Some(amount),
        }
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        assert_eq!(parse_date("2025-09-01"), Some(expected));
        assert_eq!(parse_date("2025/09/01"), Some(expected));
        assert_eq!(parse_date("09/01/2025"), Some(expected));
        assert_eq!(parse_date("09/01/25"), Some(expected));
        assert_eq!(parse_date("2025-09-01T08:30:00"), Some(expected));
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_parse_amount_coercion() {
        assert_eq!(parse_amount(&json!(4.95)), Some(4.95));
        assert_eq!(parse_amount(&json!("4.95")), Some(4.95));
        assert_eq!(parse_amount(&json!("$1,500.00")), Some(1500.0));
        assert_eq!(parse_amount(&json!("-1800")), Some(-1800.0));
        assert_eq!(parse_amount(&json!("oops")), None);
        assert_eq!(parse_amount(&json!(null)), None);
        assert_eq!(parse_amount(&json!([1.0])), None);
    }

    #[test]
    fn test_malformed_rows_are_dropped_not_fatal() {
        let records = vec![
            raw("2025-09-01", "STARBUCKS", json!(4.95)),
            raw("garbage", "STARBUCKS", json!(4.95)),
            raw("2025-09-02", "SAFEWAY", json!("not-a-number")),
            RawRecord {
                date: Some("2025-09-03".into()),
                merchant: None,
                category: None,
                amount: Some(json!(10.0)),
            },
        ];

        let txs = normalize(&records);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].merchant, "STARBUCKS");
    }

    #[test]
    fn test_keyword_categorization_fills_missing_category() {
        let records = vec![
            raw("2025-09-01", "STARBUCKS #1234", json!(4.95)),
            raw("2025-09-01", "NETFLIX.COM", json!(15.49)),
            raw("2025-09-01", "Corner Store", json!(12.00)),
            raw("2025-09-05", "ACME PAYROLL", json!(-1800.0)),
        ];

        let txs = normalize(&records);
        assert_eq!(txs[0].category, "Coffee");
        assert_eq!(txs[1].category, "Entertainment");
        assert_eq!(txs[2].category, UNCATEGORIZED);
        assert_eq!(txs[3].category, INCOME_CATEGORY);
    }

    #[test]
    fn test_explicit_category_wins_over_keywords() {
        let mut record = raw("2025-09-01", "STARBUCKS", json!(4.95));
        record.category = Some("Business Meals".to_string());
        let txs = normalize(&[record]);
        assert_eq!(txs[0].category, "Business Meals");
    }

    #[test]
    fn test_output_is_date_sorted() {
        let records = vec![
            raw("2025-09-15", "SAFEWAY", json!(60.0)),
            raw("2025-09-01", "SAFEWAY", json!(55.0)),
            raw("2025-08-20", "SAFEWAY", json!(70.0)),
        ];
        let txs = normalize(&records);
        let dates: Vec<_> = txs.iter().map(|t| t.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }
}
