//! Error types for fincoach

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed caller-supplied parameters (e.g. a non-positive
    /// months-to-goal). Data-quality problems are never errors: bad rows
    /// are dropped at normalization and insufficiency states are encoded
    /// in the result shapes.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
