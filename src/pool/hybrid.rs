// src/pool/hybrid.rs
//! Hybrid routing: thread-local slots for OS threads, stripes for light tasks.
//!
//! The two execution regimes have incompatible sizing assumptions. OS worker
//! threads are few and long-lived, so a one-slot-per-thread cache is ideal
//! and needs no release bookkeeping. Lightweight cooperatively-scheduled
//! tasks can number in the millions and live for microseconds; giving each a
//! permanent slot would grow memory without bound and recycle nothing. The
//! hybrid pool routes every operation to the strategy that matches the
//! calling context.
//!
//! The "am I in a light task" predicate is resolved once, at construction.
//! With the `tokio` feature the default predicate asks whether the caller is
//! inside a tokio runtime context (`Handle::try_current()`); without it the
//! predicate is always false (no light tasks exist) and the pool behaves
//! exactly like [`ThreadLocalPool`]. The striped side is built lazily on
//! first use so a process that never runs light tasks never pays for it.

use super::queue::QueueStripe;
use super::simple::ThreadLocalPool;
use super::stats::StatCounters;
use super::striped::StripedPool;
use super::{Pool, PoolConfig, PooledBuffer, PoolStats, Stripe};
use crate::error::{PoolError, Result};
use std::sync::OnceLock;

/// Default light-task detection: are we inside a tokio runtime context?
#[cfg(feature = "tokio")]
fn in_light_task() -> bool {
    tokio::runtime::Handle::try_current().is_ok()
}

/// Without runtime support no light tasks exist.
#[cfg(not(feature = "tokio"))]
fn in_light_task() -> bool {
    false
}

/// Routes acquire/release between a thread-local pool (OS threads) and a
/// lazily-built striped pool (light tasks).
///
/// Buffers from the striped side carry their origin stripe, so release routes
/// on the tag rather than on the thread performing it: a buffer acquired in
/// one task and released from another still lands in the right stripe.
/// Untagged buffers came from the thread-local side and go back into the
/// calling thread's slot.
///
/// # Example
///
/// ```rust
/// use recyclepool::prelude::*;
///
/// let pool = HybridPool::new(PoolConfig::default()).unwrap();
/// // On a plain OS thread (no light-task context): thread-local path.
/// let buf = pool.acquire();
/// assert_eq!(buf.origin(), None);
/// pool.release(buf);
/// ```
#[derive(Debug)]
pub struct HybridPool<S: Stripe = QueueStripe> {
    native: ThreadLocalPool,
    light: OnceLock<StripedPool<S>>,
    is_light: fn() -> bool,
    stripe_count: usize,
    buffer_capacity: usize,
    stats: StatCounters,
}

impl HybridPool<QueueStripe> {
    /// Creates a hybrid pool with the default light-task detection and the
    /// default queue-backed striped side. Detection degrades to "no light
    /// tasks exist" when no runtime support is compiled in.
    ///
    /// Returns [`PoolError::InvalidStripeCount`] when `config.stripes` is 0.
    pub fn new(config: PoolConfig) -> Result<Self> {
        Self::with_predicate(config, in_light_task)
    }

    /// Like [`new`](Self::new), but fails when light-task detection is not
    /// available instead of silently degrading.
    pub fn strict(config: PoolConfig) -> Result<Self> {
        if cfg!(not(feature = "tokio")) {
            return Err(PoolError::TaskDetectionUnavailable);
        }
        Self::new(config)
    }
}

impl<S: Stripe> HybridPool<S> {
    /// Creates a hybrid pool with an injected light-task predicate and a
    /// chosen stripe backing.
    ///
    /// The predicate is consulted on every acquire; it must be cheap and
    /// must not block.
    pub fn with_predicate(config: PoolConfig, is_light: fn() -> bool) -> Result<Self> {
        if config.stripes == 0 {
            return Err(PoolError::InvalidStripeCount);
        }
        Ok(Self {
            native: ThreadLocalPool::new(config.clone()),
            light: OnceLock::new(),
            is_light,
            stripe_count: config.stripes.next_power_of_two(),
            buffer_capacity: config.buffer_capacity,
            stats: StatCounters::new(),
        })
    }

    /// The striped side, built on first use. `OnceLock` guarantees a single
    /// construction even under concurrent first acquires.
    fn light_pool(&self) -> &StripedPool<S> {
        self.light
            .get_or_init(|| StripedPool::with_stripe_count(self.stripe_count, self.buffer_capacity))
    }

    /// `true` once the striped side has been constructed.
    pub fn light_side_initialized(&self) -> bool {
        self.light.get().is_some()
    }
}

impl<S: Stripe> Pool for HybridPool<S> {
    fn acquire(&self) -> PooledBuffer {
        self.stats.record_acquire();
        if (self.is_light)() {
            self.light_pool().acquire()
        } else {
            self.native.acquire()
        }
    }

    fn release(&self, buffer: PooledBuffer) {
        self.stats.record_release();
        if buffer.origin().is_some() {
            // Acquired on the striped side; return to its origin stripe no
            // matter which context releases it.
            self.light_pool().release(buffer);
        } else {
            // Thread-local side: store back into the calling thread's slot.
            self.native.release(buffer);
        }
    }

    fn stats(&self) -> PoolStats {
        let light = self
            .light
            .get()
            .map(|pool| pool.stats())
            .unwrap_or_default();
        let native = self.native.stats();
        PoolStats {
            acquired: self.stats.acquired.load(std::sync::atomic::Ordering::Relaxed),
            released: self.stats.released.load(std::sync::atomic::Ordering::Relaxed),
            created: light.created + native.created,
            available: light.available + native.available,
        }
    }
}
