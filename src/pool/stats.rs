// src/pool/stats.rs
//! Statistics tracking shared by the pool strategies.

use std::sync::atomic::{AtomicU64, Ordering};

/// Internal atomic counters. All updates use `Relaxed` ordering; snapshots
/// are eventually consistent, which is all pool-sizing heuristics need.
#[derive(Debug, Default)]
pub(crate) struct StatCounters {
    pub(crate) acquired: AtomicU64,
    pub(crate) released: AtomicU64,
    pub(crate) created: AtomicU64,
}

impl StatCounters {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_acquire(&self) {
        self.acquired.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_release(&self) {
        self.released.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_create(&self) {
        self.created.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, available: usize) -> PoolStats {
        PoolStats {
            acquired: self.acquired.load(Ordering::Relaxed),
            released: self.released.load(Ordering::Relaxed),
            created: self.created.load(Ordering::Relaxed),
            available,
        }
    }
}

/// Snapshot of a pool's counters.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Total `acquire` calls.
    pub acquired: u64,
    /// Total buffers handed back through `release`.
    pub released: u64,
    /// Total fresh buffers allocated on pool miss.
    pub created: u64,
    /// Idle buffers currently held by the pool (approximate; excludes
    /// thread-local slots).
    pub available: usize,
}

impl PoolStats {
    /// Buffers currently on loan (acquired but not yet released).
    pub fn in_use(&self) -> u64 {
        self.acquired.saturating_sub(self.released)
    }

    /// Fraction of acquires served from the pool rather than a fresh
    /// allocation, as a percentage in `[0.0, 100.0]`.
    pub fn reuse_rate(&self) -> f64 {
        if self.acquired == 0 {
            return 0.0;
        }
        let reused = self.acquired.saturating_sub(self.created);
        (reused as f64 / self.acquired as f64) * 100.0
    }
}
