//! Ledger CSV ingestion
//!
//! Reads a generic ledger CSV (date, merchant, amount, optional category)
//! into raw records and hands them to the core normalizer. Header matching
//! is case-insensitive; anything beyond the known columns is ignored.

use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use serde_json::Value;
use tracing::info;

use fincoach_core::{normalize, RawRecord, Transaction};

/// Load and normalize a ledger CSV.
///
/// Fails when the file is unreadable or the required columns are missing;
/// individual malformed rows are dropped by the normalizer, not here.
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let (date_col, merchant_col, amount_col) = match (
        column("date"),
        column("merchant"),
        column("amount"),
    ) {
        (Some(d), Some(m), Some(a)) => (d, m, a),
        _ => bail!("CSV must include columns: date, merchant, amount"),
    };
    let category_col = column("category");

    let mut records: Vec<RawRecord> = Vec::new();
    for row in reader.records() {
        let row = row?;
        let cell = |idx: usize| row.get(idx).map(|s| s.trim().to_string());
        records.push(RawRecord {
            date: cell(date_col),
            merchant: cell(merchant_col),
            category: category_col.and_then(cell),
            amount: cell(amount_col).map(Value::String),
        });
    }

    let transactions = normalize(&records);
    info!(
        rows = records.len(),
        transactions = transactions.len(),
        "Ledger loaded from {}",
        path.display()
    );
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_basic_ledger() {
        let file = write_csv(
            "date,merchant,amount\n\
             2025-09-01,STARBUCKS,4.95\n\
             2025-09-02,PAYROLL,-1800\n",
        );
        let txs = load_transactions(file.path()).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].merchant, "STARBUCKS");
        assert_eq!(txs[0].category, "Coffee");
    }

    #[test]
    fn test_capitalized_headers_accepted() {
        let file = write_csv(
            "Date,Merchant,Category,Amount\n\
             2025-09-01,Corner Store,Snacks,12.50\n",
        );
        let txs = load_transactions(file.path()).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].category, "Snacks");
    }

    #[test]
    fn test_missing_required_column_fails() {
        let file = write_csv("date,amount\n2025-09-01,4.95\n");
        assert!(load_transactions(file.path()).is_err());
    }

    #[test]
    fn test_bad_rows_dropped_quietly() {
        let file = write_csv(
            "date,merchant,amount\n\
             2025-09-01,STARBUCKS,4.95\n\
             not-a-date,STARBUCKS,4.95\n\
             2025-09-03,STARBUCKS,not-a-number\n",
        );
        let txs = load_transactions(file.path()).unwrap();
        assert_eq!(txs.len(), 1);
    }
}
