// src/pool/simple.rs
//! The two trivial strategies: no pooling at all, and one slot per OS thread.

use super::stats::StatCounters;
use super::{Pool, PoolConfig, PooledBuffer, PoolStats};
use crate::buffer::ScratchBuffer;
use std::cell::Cell;

/// The zero-reuse baseline: every acquire allocates, every release discards.
///
/// Useful as the control strategy when benchmarking the others.
#[derive(Debug)]
pub struct NoOpPool {
    buffer_capacity: usize,
    stats: StatCounters,
}

impl NoOpPool {
    /// Creates a non-recycling pool.
    pub fn new(config: PoolConfig) -> Self {
        Self {
            buffer_capacity: config.buffer_capacity,
            stats: StatCounters::new(),
        }
    }
}

impl Default for NoOpPool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

impl Pool for NoOpPool {
    fn acquire(&self) -> PooledBuffer {
        self.stats.record_acquire();
        self.stats.record_create();
        PooledBuffer::plain(ScratchBuffer::with_capacity(self.buffer_capacity))
    }

    fn release(&self, buffer: PooledBuffer) {
        self.stats.record_release();
        drop(buffer);
    }

    fn stats(&self) -> PoolStats {
        self.stats.snapshot(0)
    }
}

thread_local! {
    /// The calling thread's single buffer slot. Shared by every
    /// [`ThreadLocalPool`] instance in the process, matching the
    /// one-recycler-per-thread model this strategy implements.
    static THREAD_SLOT: Cell<Option<ScratchBuffer>> = const { Cell::new(None) };
}

/// One buffer slot per OS thread, with overwrite semantics.
///
/// Acquire takes the thread's slot (allocating on first use); release stores
/// the buffer back, overwriting whatever the slot held. No synchronization is
/// involved, so this is the fastest strategy. The cost: every thread that ever
/// touches the pool keeps one buffer alive for its lifetime, so it is only
/// safe when the thread population is small and bounded. Routing a large
/// population of short-lived tasks here would grow memory without reuse;
/// that is what [`HybridPool`](super::HybridPool) exists to prevent.
///
/// All `ThreadLocalPool` instances share the per-thread slot, so a buffer
/// released through one instance may be handed out by another on the same
/// thread. Buffers are never moved between threads by this strategy.
#[derive(Debug)]
pub struct ThreadLocalPool {
    buffer_capacity: usize,
    stats: StatCounters,
}

impl ThreadLocalPool {
    /// Creates a thread-local pool.
    pub fn new(config: PoolConfig) -> Self {
        Self {
            buffer_capacity: config.buffer_capacity,
            stats: StatCounters::new(),
        }
    }
}

impl Default for ThreadLocalPool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

impl Pool for ThreadLocalPool {
    fn acquire(&self) -> PooledBuffer {
        self.stats.record_acquire();
        let buffer = THREAD_SLOT.take().unwrap_or_else(|| {
            self.stats.record_create();
            ScratchBuffer::with_capacity(self.buffer_capacity)
        });
        PooledBuffer::plain(buffer)
    }

    fn release(&self, buffer: PooledBuffer) {
        self.stats.record_release();
        let (buffer, _origin) = buffer.into_parts();
        // Overwrite: the previous occupant, if any, is dropped.
        THREAD_SLOT.set(Some(buffer));
    }

    fn stats(&self) -> PoolStats {
        // `available` reports the calling thread's slot only; other threads'
        // slots are not observable without synchronization.
        let occupied = THREAD_SLOT.with(|slot| {
            let value = slot.take();
            let occupied = value.is_some();
            slot.set(value);
            occupied
        });
        self.stats.snapshot(usize::from(occupied))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_always_allocates() {
        let pool = NoOpPool::new(PoolConfig::default().buffer_capacity(64));
        let mut first = pool.acquire();
        first.put_slice(b"data");
        pool.release(first);

        // Nothing is recycled, so the next buffer is fresh and empty.
        let second = pool.acquire();
        assert!(second.is_empty());

        let stats = pool.stats();
        assert_eq!(stats.acquired, 2);
        assert_eq!(stats.created, 2);
        assert_eq!(stats.reuse_rate(), 0.0);
    }

    #[test]
    fn test_thread_local_reuses_slot() {
        let pool = ThreadLocalPool::new(PoolConfig::default().buffer_capacity(64));

        let mut buffer = pool.acquire();
        buffer.put_slice(b"marker");
        pool.release(buffer);

        // Same thread, same slot: contents survive because pools never reset.
        let again = pool.acquire();
        assert_eq!(again.as_slice(), b"marker");
        pool.release(again);
    }

    #[test]
    fn test_thread_local_overwrite_drops_previous() {
        let pool = ThreadLocalPool::new(PoolConfig::default().buffer_capacity(64));

        let a = pool.acquire();
        pool.release(a);

        let mut b = PooledBuffer::plain(ScratchBuffer::with_capacity(16));
        b.put_slice(b"new occupant");
        pool.release(b);

        let current = pool.acquire();
        assert_eq!(current.as_slice(), b"new occupant");
        pool.release(current);
    }

    #[test]
    fn test_thread_local_slots_are_per_thread() {
        let pool = ThreadLocalPool::new(PoolConfig::default().buffer_capacity(64));
        let mut buffer = pool.acquire();
        buffer.put_slice(b"main thread");
        pool.release(buffer);

        // A different thread sees its own (empty) slot.
        std::thread::spawn(|| {
            let pool = ThreadLocalPool::new(PoolConfig::default().buffer_capacity(64));
            let buffer = pool.acquire();
            assert!(buffer.is_empty());
        })
        .join()
        .unwrap();

        // Our slot is untouched.
        let again = pool.acquire();
        assert_eq!(again.as_slice(), b"main thread");
    }
}
