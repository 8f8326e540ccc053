//! Generation counter used to tell a running search that a newer one has
//! been requested.
//!
//! The table evaluator never looks at these tokens while it scans rows.
//! Callers check [`CancellationToken::is_cancelled`] between pipeline stages
//! and before publishing a result, and drop anything that was superseded.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// Shared "latest request" marker. Clones observe the same counter.
#[derive(Debug, Clone, Default)]
pub struct SearchVersion {
    active: Arc<AtomicU64>,
}

impl SearchVersion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }

    /// Starts a new generation, cancelling every token handed out before.
    pub fn bump(&self) -> CancellationToken {
        let version = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        CancellationToken {
            version,
            active: Some(self.active.clone()),
        }
    }

    /// Registers an externally numbered request. Versions only move forward:
    /// an older number leaves the counter untouched and the returned token is
    /// already cancelled.
    pub fn token_for(&self, version: u64) -> CancellationToken {
        self.active.fetch_max(version, Ordering::SeqCst);
        CancellationToken {
            version,
            active: Some(self.active.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CancellationToken {
    version: u64,
    active: Option<Arc<AtomicU64>>,
}

impl CancellationToken {
    /// A token that is never cancelled, for one-shot callers and tests.
    pub fn noop() -> Self {
        Self {
            version: 0,
            active: None,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_cancelled(&self) -> bool {
        match &self.active {
            Some(active) => active.load(Ordering::SeqCst) != self.version,
            None => false,
        }
    }

    /// Returns `value` unless the token was superseded in the meantime.
    pub fn guard<T>(&self, value: T) -> Option<T> {
        (!self.is_cancelled()).then_some(value)
    }
}
