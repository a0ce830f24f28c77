//! In-memory transaction store
//!
//! The core's analytics are pure functions over a transaction snapshot;
//! this store realizes the external-collaborator contract they expect:
//! "give me the current transaction set" plus a monotonically increasing
//! dataset version callers can poll to know when to recompute.
//!
//! Snapshots are `Arc`-swapped, so a query holding one keeps reading a
//! consistent set even while an upload/reset/clear replaces the data:
//! readers observe either the old snapshot or the new one, never a
//! partially written mix.

use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

use crate::models::Transaction;

/// An immutable view of the dataset at one version
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub transactions: Arc<Vec<Transaction>>,
    pub version: u64,
}

struct StoreState {
    transactions: Arc<Vec<Transaction>>,
    version: u64,
}

/// Thread-safe holder for the current transaction set
pub struct TransactionStore {
    state: RwLock<StoreState>,
}

impl TransactionStore {
    /// Empty store at version 1
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                transactions: Arc::new(Vec::new()),
                version: 1,
            }),
        }
    }

    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            state: RwLock::new(StoreState {
                transactions: Arc::new(transactions),
                version: 1,
            }),
        }
    }

    /// The current snapshot: transactions plus the version they belong to
    pub fn snapshot(&self) -> Snapshot {
        let state = self
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Snapshot {
            transactions: Arc::clone(&state.transactions),
            version: state.version,
        }
    }

    /// Current dataset version without cloning the data handle
    pub fn version(&self) -> u64 {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .version
    }

    /// Replace the dataset, bumping the version. Returns the new version.
    pub fn replace(&self, transactions: Vec<Transaction>) -> u64 {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        state.transactions = Arc::new(transactions);
        state.version += 1;
        info!(
            version = state.version,
            records = state.transactions.len(),
            "Transaction set replaced"
        );
        state.version
    }

    /// Drop all transactions, bumping the version. Returns the new version.
    pub fn clear(&self) -> u64 {
        self.replace(Vec::new())
    }
}

impl Default for TransactionStore {
    fn default() -> Self {
        Self::new()
    }
}
