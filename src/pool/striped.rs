// src/pool/striped.rs
//! Striping: partitioning a shared pool into independent shards.
//!
//! A single shared lock-free structure becomes a contention hot spot once
//! enough cores hammer it. A [`StripedPool`] holds `N = 2^k` independent
//! stripes and lets a thread probe route each acquiring thread to "its"
//! stripe, so each shard sees roughly `1/N` of the callers. That trades a
//! little buffer reuse for a lot less cross-core traffic.
//!
//! Acquire is governed by the probe; release is governed by **origin**. Every
//! buffer handed out by a striped pool is tagged with the stripe it came
//! from, and release pushes it back to that stripe regardless of which thread
//! performs the release. Buffers may migrate across threads or tasks between
//! acquire and release without corrupting the per-stripe balance.

use super::stats::StatCounters;
use super::{Pool, PoolConfig, PooledBuffer, PoolStats, Stripe};
use crate::buffer::ScratchBuffer;
use crate::error::{PoolError, Result};
use crate::probe::ThreadProbe;
use crossbeam::utils::CachePadded;

/// A pool partitioned into `N = 2^k` independent stripes.
///
/// Generic over the stripe backing: [`StackStripe`](super::StackStripe) for
/// LIFO shards, [`QueueStripe`](super::QueueStripe) for FIFO shards. The
/// stripe count is fixed at construction and never resized.
///
/// # Example
///
/// ```rust
/// use recyclepool::prelude::*;
///
/// let pool = StripedLockFreePool::new(PoolConfig::default().stripes(4)).unwrap();
/// let buf = pool.acquire();
/// let origin = buf.origin().unwrap();
/// assert!(origin < 4);
/// pool.release(buf);
/// // The buffer went back to its origin stripe.
/// assert_eq!(pool.stripe_depths()[origin as usize], 1);
/// ```
#[derive(Debug)]
pub struct StripedPool<S: Stripe> {
    stripes: Box<[CachePadded<S>]>,
    mask: usize,
    probe: ThreadProbe,
    buffer_capacity: usize,
    stats: StatCounters,
}

/// Striped pool with lock-free stack shards.
pub type StripedLockFreePool = StripedPool<super::StackStripe>;

/// Striped pool with MPMC queue shards.
pub type StripedQueuePool = StripedPool<super::QueueStripe>;

impl<S: Stripe> StripedPool<S> {
    /// Creates a striped pool with `config.stripes` shards, rounded up to the
    /// next power of two, each built eagerly and sharing no state.
    ///
    /// Returns [`PoolError::InvalidStripeCount`] when `config.stripes` is 0.
    pub fn new(config: PoolConfig) -> Result<Self> {
        if config.stripes == 0 {
            return Err(PoolError::InvalidStripeCount);
        }
        let size = config.stripes.next_power_of_two();
        Ok(Self::with_stripe_count(size, config.buffer_capacity))
    }

    /// Builds the stripe array for an already power-of-two `size`.
    pub(crate) fn with_stripe_count(size: usize, buffer_capacity: usize) -> Self {
        debug_assert!(size.is_power_of_two());
        let stripes: Box<[CachePadded<S>]> =
            (0..size).map(|_| CachePadded::new(S::default())).collect();
        Self {
            stripes,
            mask: size - 1,
            probe: ThreadProbe::detect(),
            buffer_capacity,
            stats: StatCounters::new(),
        }
    }

    /// Number of stripes (always a power of two).
    pub fn stripe_count(&self) -> usize {
        self.stripes.len()
    }

    /// Approximate idle-buffer depth of each stripe, in stripe order.
    pub fn stripe_depths(&self) -> Vec<usize> {
        self.stripes.iter().map(|s| s.len()).collect()
    }

    fn available(&self) -> usize {
        self.stripes.iter().map(|s| s.len()).sum()
    }
}

impl<S: Stripe> Pool for StripedPool<S> {
    fn acquire(&self) -> PooledBuffer {
        self.stats.record_acquire();
        let index = self.probe.index(self.mask);
        debug_assert!(index < self.stripes.len());
        let buffer = self.stripes[index].try_pop().unwrap_or_else(|| {
            self.stats.record_create();
            ScratchBuffer::with_capacity(self.buffer_capacity)
        });
        PooledBuffer::tagged(buffer, index as u32)
    }

    fn release(&self, buffer: PooledBuffer) {
        self.stats.record_release();
        let (buffer, origin) = buffer.into_parts();
        // Origin-targeted return. An untagged buffer can only reach a striped
        // pool through misuse; route it by the current thread's stripe so it
        // is still recycled rather than lost.
        let index = match origin {
            Some(slot) => (slot as usize) & self.mask,
            None => self.probe.index(self.mask),
        };
        self.stripes[index].push(buffer);
    }

    fn stats(&self) -> PoolStats {
        self.stats.snapshot(self.available())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{QueueStripe, StackStripe};

    #[test]
    fn test_zero_stripes_rejected() {
        let result = StripedLockFreePool::new(PoolConfig::default().stripes(0));
        assert_eq!(result.err(), Some(PoolError::InvalidStripeCount));
    }

    #[test]
    fn test_stripe_count_rounds_to_power_of_two() {
        for (requested, expected) in [(1, 1), (2, 2), (3, 4), (4, 4), (5, 8), (9, 16)] {
            let pool =
                StripedPool::<QueueStripe>::new(PoolConfig::default().stripes(requested)).unwrap();
            assert_eq!(pool.stripe_count(), expected);
        }
    }

    #[test]
    fn test_acquired_buffers_are_tagged() {
        let pool = StripedLockFreePool::new(PoolConfig::default().stripes(4)).unwrap();
        let buffer = pool.acquire();
        let origin = buffer.origin().expect("striped acquire must tag origin");
        assert!((origin as usize) < pool.stripe_count());
    }

    #[test]
    fn test_release_targets_origin_stripe() {
        let pool = StripedLockFreePool::new(PoolConfig::default().stripes(4)).unwrap();

        let buffers: Vec<_> = (0..3).map(|_| pool.acquire()).collect();
        let origin = buffers[0].origin().unwrap() as usize;
        // Same thread, same probe: all three share one origin stripe.
        assert!(buffers.iter().all(|b| b.origin().unwrap() as usize == origin));

        for buffer in buffers {
            pool.release(buffer);
        }

        let depths = pool.stripe_depths();
        assert_eq!(depths[origin], 3);
        assert_eq!(depths.iter().sum::<usize>(), 3);
    }

    #[test]
    fn test_release_from_foreign_thread_respects_origin() {
        use std::sync::Arc;
        use std::thread;

        let pool = Arc::new(StripedQueuePool::new(PoolConfig::default().stripes(8)).unwrap());

        let buffer = pool.acquire();
        let origin = buffer.origin().unwrap() as usize;

        // Hand the buffer to another thread for release.
        let remote = Arc::clone(&pool);
        thread::spawn(move || remote.release(buffer)).join().unwrap();

        assert_eq!(pool.stripe_depths()[origin], 1);
    }

    #[test]
    fn test_same_thread_reuses_own_stripe() {
        let pool = StripedLockFreePool::new(PoolConfig::default().stripes(4)).unwrap();

        // Miss: fresh buffer, tagged with this thread's stripe.
        let mut buffer = pool.acquire();
        buffer.put_str("mine");
        pool.release(buffer);

        // Same thread, stripe now holds exactly one buffer: must reuse it.
        let again = pool.acquire();
        assert_eq!(again.as_slice(), b"mine");
        let stats = pool.stats();
        assert_eq!(stats.created, 1);
        assert_eq!(stats.acquired, 2);
    }

    #[test]
    fn test_concurrent_stress() {
        use std::sync::Arc;
        use std::thread;

        let pool = Arc::new(StripedPool::<StackStripe>::new(PoolConfig::default()).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    for _ in 0..500 {
                        let mut buffer = pool.acquire();
                        buffer.clear();
                        buffer.put_str("work");
                        pool.release(buffer);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let stats = pool.stats();
        assert_eq!(stats.acquired, 4000);
        assert_eq!(stats.in_use(), 0);
    }
}
