// src/pool/queue.rs
//! Queue-backed pooling: a lock-free MPMC queue of idle buffers.
//!
//! `SegQueue` is an unbounded multi-producer multi-consumer queue built from
//! linked array segments, so enqueue and dequeue are individually
//! linearizable and never block under arbitrary producer/consumer
//! concurrency. The stripe wrapper adds an approximate length counter; the
//! counter and the queue are not updated in one transaction, so `len()` may
//! be briefly stale. That is acceptable for observability and sizing
//! heuristics.

use super::stats::StatCounters;
use super::{Pool, PoolConfig, PooledBuffer, PoolStats, Stripe};
use crate::buffer::ScratchBuffer;
use crossbeam::queue::SegQueue;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One queue shard: idle buffers in FIFO order.
#[derive(Debug, Default)]
pub struct QueueStripe {
    items: SegQueue<ScratchBuffer>,
    size: AtomicUsize,
}

impl QueueStripe {
    /// Creates an empty stripe.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stripe for QueueStripe {
    #[inline]
    fn try_pop(&self) -> Option<ScratchBuffer> {
        self.items.pop().inspect(|_| {
            self.size.fetch_sub(1, Ordering::Relaxed);
        })
    }

    #[inline]
    fn push(&self, buffer: ScratchBuffer) {
        self.items.push(buffer);
        self.size.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn len(&self) -> usize {
        self.size.load(Ordering::Relaxed)
    }
}

/// A single shared queue-backed pool.
///
/// Acquire is a non-blocking dequeue attempt with an allocate-fresh fallback;
/// release is a fire-and-forget enqueue. Safe under any number of concurrent
/// callers.
///
/// # Example
///
/// ```rust
/// use recyclepool::prelude::*;
///
/// let pool = QueuePool::new(PoolConfig::default());
/// let mut buf = pool.acquire();
/// buf.put_str("payload");
/// pool.release(buf);
/// assert_eq!(pool.stats().released, 1);
/// ```
#[derive(Debug)]
pub struct QueuePool {
    stripe: QueueStripe,
    buffer_capacity: usize,
    stats: StatCounters,
}

impl Default for QueuePool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

impl QueuePool {
    /// Creates an empty queue-backed pool.
    pub fn new(config: PoolConfig) -> Self {
        Self {
            stripe: QueueStripe::new(),
            buffer_capacity: config.buffer_capacity,
            stats: StatCounters::new(),
        }
    }
}

impl Pool for QueuePool {
    fn acquire(&self) -> PooledBuffer {
        self.stats.record_acquire();
        let buffer = self.stripe.try_pop().unwrap_or_else(|| {
            self.stats.record_create();
            ScratchBuffer::with_capacity(self.buffer_capacity)
        });
        PooledBuffer::plain(buffer)
    }

    fn release(&self, buffer: PooledBuffer) {
        self.stats.record_release();
        let (buffer, _origin) = buffer.into_parts();
        self.stripe.push(buffer);
    }

    fn stats(&self) -> PoolStats {
        self.stats.snapshot(self.stripe.len())
    }
}
