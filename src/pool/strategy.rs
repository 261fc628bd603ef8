// src/pool/strategy.rs
//! Named strategy registry: configuration surface over the pool family.
//!
//! This is a lookup table, not core logic. Benchmarks and applications pick a
//! strategy by name at startup and get back a constructed pool behind the
//! [`Pool`] capability; which strategies exist and how they compose is fixed
//! here in one place.

use super::hybrid::HybridPool;
use super::queue::{QueuePool, QueueStripe};
use super::simple::{NoOpPool, ThreadLocalPool};
use super::stack::{LockFreePool, StackStripe};
use super::striped::StripedPool;
use super::{Pool, PoolConfig};
use crate::error::{PoolError, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The closed set of pool compositions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Always allocate, never recycle (baseline).
    NoOp,
    /// One slot per OS thread.
    ThreadLocal,
    /// One shared lock-free MPMC queue.
    Queue,
    /// One shared lock-free Treiber stack.
    LockFree,
    /// Probe-striped queue shards.
    StripedQueue,
    /// Probe-striped stack shards.
    StripedLockFree,
    /// Thread-local for OS threads, striped queues for light tasks.
    Hybrid,
}

impl Strategy {
    /// All registered strategies, in registry order.
    pub fn all() -> &'static [Strategy] {
        &[
            Strategy::NoOp,
            Strategy::ThreadLocal,
            Strategy::Queue,
            Strategy::LockFree,
            Strategy::StripedQueue,
            Strategy::StripedLockFree,
            Strategy::Hybrid,
        ]
    }

    /// The registry name of this strategy.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::NoOp => "no_op",
            Strategy::ThreadLocal => "thread_local",
            Strategy::Queue => "queue",
            Strategy::LockFree => "lock_free",
            Strategy::StripedQueue => "striped_queue",
            Strategy::StripedLockFree => "striped_lock_free",
            Strategy::Hybrid => "hybrid",
        }
    }

    /// Constructs the pool this strategy names.
    ///
    /// Construction-time failures (invalid stripe count) surface here,
    /// never at call time.
    pub fn build(&self, config: PoolConfig) -> Result<Arc<dyn Pool>> {
        Ok(match self {
            Strategy::NoOp => Arc::new(NoOpPool::new(config)),
            Strategy::ThreadLocal => Arc::new(ThreadLocalPool::new(config)),
            Strategy::Queue => Arc::new(QueuePool::new(config)),
            Strategy::LockFree => Arc::new(LockFreePool::new(config)),
            Strategy::StripedQueue => Arc::new(StripedPool::<QueueStripe>::new(config)?),
            Strategy::StripedLockFree => Arc::new(StripedPool::<StackStripe>::new(config)?),
            Strategy::Hybrid => Arc::new(HybridPool::<QueueStripe>::new(config)?),
        })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self> {
        Strategy::all()
            .iter()
            .copied()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| PoolError::UnknownStrategy(s.to_string()))
    }
}
