//! Demo ledger generation
//!
//! Writes a reproducible sample ledger so every feature can be exercised
//! without real bank data: everyday merchants at rough monthly
//! frequencies, a couple of fixed-price subscriptions, payroll income as
//! negative amounts, and two planted anomalies.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use tracing::info;

/// (merchant, average amount, approximate charges per month).
/// Negative averages are income and keep their sign.
const MERCHANTS: [(&str, f64, f64); 15] = [
    ("STARBUCKS", 4.5, 10.0),
    ("PEET COFFEE", 5.5, 6.0),
    ("SAFEWAY", 65.0, 14.0),
    ("TRADER JOE'S", 45.0, 10.0),
    ("UBEREATS", 28.0, 8.0),
    ("Local Pizza", 18.0, 6.0),
    ("UBER", 16.0, 10.0),
    ("CHEVRON", 52.0, 5.0),
    ("NETFLIX", 15.49, 1.0),
    ("SPOTIFY", 9.99, 1.0),
    ("T-MOBILE", 70.0, 1.0),
    ("APARTMENTS LLC RENT", 1500.0, 1.0),
    ("AMAZON", 32.0, 12.0),
    ("TARGET", 28.0, 8.0),
    ("PAYROLL", -1800.0, 2.0),
];

pub fn cmd_sample(days: u32, seed: u64, out: Option<&Path>) -> Result<()> {
    let rows = generate_rows(days, seed);

    let sink: Box<dyn std::io::Write> = match out {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("Cannot write {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    let mut writer = csv::Writer::from_writer(sink);

    writer.write_record(["date", "merchant", "amount"])?;
    for (date, merchant, amount) in &rows {
        let amount = format!("{:.2}", amount);
        writer.write_record([date.as_str(), merchant.as_str(), amount.as_str()])?;
    }
    writer.flush()?;

    if let Some(path) = out {
        info!(rows = rows.len(), "Demo ledger written to {}", path.display());
    }
    Ok(())
}

/// Generate `days` of history ending today, oldest first
fn generate_rows(days: u32, seed: u64) -> Vec<(String, String, f64)> {
    let mut rng = Pcg64::seed_from_u64(seed);
    let today = Utc::now().date_naive();
    let mut rows: Vec<(chrono::NaiveDate, String, f64)> = Vec::new();

    for back in 0..days {
        let date = today - Duration::days(back as i64);
        for (merchant, avg, per_month) in MERCHANTS {
            // Rough monthly -> daily probability
            let p = (per_month / 30.0).min(0.9);
            if rng.gen::<f64>() >= p {
                continue;
            }
            let magnitude = (avg.abs() * rng.gen_range(0.85..1.15)).max(1.0);
            let amount = if avg < 0.0 { -magnitude } else { magnitude };
            rows.push((date, merchant.to_string(), (amount * 100.0).round() / 100.0));
        }
    }

    // Planted anomalies for the detector to find
    rows.push((today - Duration::days(7), "TARGET".to_string(), 450.0));
    rows.push((today - Duration::days(22), "UBER".to_string(), 120.0));

    rows.sort_by_key(|(date, _, _)| *date);
    rows.into_iter()
        .map(|(date, merchant, amount)| (date.to_string(), merchant, amount))
        .collect()
}
