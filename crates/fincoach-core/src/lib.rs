//! Fincoach Core Library
//!
//! The analytics core for the fincoach personal finance coach:
//! - Normalization of raw ledger rows into canonical transactions
//! - Calendar-month aggregation with category/merchant breakdowns
//! - Recurring-charge (subscription / gray charge) detection
//! - Statistical anomaly flags via per-group z-scores
//! - Composite financial-health scoring
//! - Goal forecasting and the what-if spending simulator
//! - The coffee-spend assessor and rule-based coaching nudges
//! - Privacy masking of merchant identity at the presentation edge
//!
//! Every query is a pure, synchronous function over a transaction
//! snapshot plus explicit parameters; nothing here performs I/O.

pub mod aggregate;
pub mod anomaly;
pub mod coach;
pub mod coffee;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod models;
pub mod normalize;
pub mod privacy;
pub mod recurring;
pub mod score;
pub mod store;
pub mod whatif;

pub use aggregate::{CategoryDelta, CategoryTotal, MerchantTotal};
pub use anomaly::{Anomaly, AnomalyConfig};
pub use coach::{CoachContext, CoachReport, CoffeeNote, TrimSuggestion};
pub use coffee::{CoffeeAssessment, CoffeeConfig, CoffeeDetails, CoffeeReason, CoffeeSuggestion};
pub use engine::{AnalyticsConfig, AnalyticsEngine, CategorySeries, Summary, Trends};
pub use error::{Error, Result};
pub use forecast::ForecastResult;
pub use models::{Period, RawRecord, Transaction};
pub use normalize::normalize;
pub use privacy::PrivacyMask;
pub use recurring::{MerchantRecurrence, RecurringConfig};
pub use score::{HealthScore, ScoreWeights, Signal};
pub use store::{Snapshot, TransactionStore};
pub use whatif::WhatIfReport;
