// src/pool/mod.rs
//! The recyclable-buffer pool family.
//!
//! Every strategy implements the same capability: [`Pool::acquire`] hands out
//! a [`PooledBuffer`] and [`Pool::release`] takes it back. Acquire is total:
//! it never fails and never blocks, because an empty pool always falls
//! through to allocating a fresh buffer. A pool is a best-effort cache, never
//! a gate.
//!
//! Strategies, roughly in order of sophistication:
//!
//! - [`NoOpPool`]: always allocates; the zero-reuse baseline.
//! - [`ThreadLocalPool`]: one slot per OS thread; safe only when the thread
//!   population is small and stable.
//! - [`QueuePool`]: one shared lock-free MPMC queue.
//! - [`LockFreePool`]: one shared Treiber stack.
//! - [`StripedPool`]: N independent shards selected by a thread probe.
//! - [`HybridPool`]: thread-local for OS threads, striped for light tasks.

pub(crate) mod config;
pub(crate) mod hybrid;
pub(crate) mod queue;
pub(crate) mod simple;
pub(crate) mod stack;
pub(crate) mod stats;
pub(crate) mod strategy;
pub(crate) mod striped;

pub use config::PoolConfig;
pub use hybrid::HybridPool;
pub use queue::{QueuePool, QueueStripe};
pub use simple::{NoOpPool, ThreadLocalPool};
pub use stack::{LockFreePool, StackStripe};
pub use stats::PoolStats;
pub use strategy::Strategy;
pub use striped::{StripedLockFreePool, StripedPool, StripedQueuePool};

use crate::buffer::ScratchBuffer;

/// The acquire/release capability every pool strategy provides.
///
/// `release` must be called with a buffer previously obtained from the same
/// pool instance; handing it a buffer acquired elsewhere routes it to a
/// stripe it never came from (harmless for queue-backed stripes, but it
/// defeats the balancing the origin tag exists for).
pub trait Pool: Send + Sync {
    /// Returns a usable buffer, reusing a pooled one when available and
    /// allocating a fresh one otherwise. Never fails, never blocks.
    fn acquire(&self) -> PooledBuffer;

    /// Returns a buffer to the pool for reuse.
    ///
    /// The pool does not reset the buffer's contents; callers that need a
    /// clean buffer call [`ScratchBuffer::clear`] before or after release.
    fn release(&self, buffer: PooledBuffer);

    /// Snapshot of this pool's counters.
    fn stats(&self) -> PoolStats;
}

/// A buffer on loan from a [`Pool`].
///
/// Buffers drawn from a striped structure carry the index of their origin
/// stripe; release always targets that recorded stripe, never the releasing
/// thread's own computed stripe, so correctness survives a buffer migrating
/// between threads (or tasks) between acquire and release.
///
/// Dropping a handle without releasing it is allowed: the buffer is simply
/// freed instead of recycled.
#[derive(Debug)]
pub struct PooledBuffer {
    buffer: ScratchBuffer,
    origin: Option<u32>,
}

impl PooledBuffer {
    /// Wraps a buffer with no origin stripe (simple and thread-local pools).
    pub(crate) fn plain(buffer: ScratchBuffer) -> Self {
        Self {
            buffer,
            origin: None,
        }
    }

    /// Wraps a buffer tagged with the stripe it was drawn from.
    pub(crate) fn tagged(buffer: ScratchBuffer, origin: u32) -> Self {
        Self {
            buffer,
            origin: Some(origin),
        }
    }

    /// The stripe this buffer was drawn from, if it came from a striped
    /// structure.
    #[inline]
    pub fn origin(&self) -> Option<u32> {
        self.origin
    }

    /// Extracts the underlying buffer, opting out of recycling.
    pub fn into_inner(self) -> ScratchBuffer {
        self.buffer
    }

    /// Splits the handle into buffer and origin tag (release paths).
    pub(crate) fn into_parts(self) -> (ScratchBuffer, Option<u32>) {
        (self.buffer, self.origin)
    }
}

impl std::ops::Deref for PooledBuffer {
    type Target = ScratchBuffer;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}

impl std::ops::DerefMut for PooledBuffer {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffer
    }
}

/// One shard of a partitioned pool: a lock-free container of idle buffers.
///
/// Implementations must make `try_pop` and `push` individually linearizable
/// under arbitrary concurrent callers; neither may block. `len` may be
/// approximate.
pub trait Stripe: Send + Sync + Default {
    /// Attempts to take an idle buffer. Returns `None` when empty.
    fn try_pop(&self) -> Option<ScratchBuffer>;

    /// Adds an idle buffer. Fire-and-forget, never blocks.
    fn push(&self, buffer: ScratchBuffer);

    /// Approximate number of idle buffers held.
    fn len(&self) -> usize;

    /// `true` if the stripe currently appears empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_handle_has_no_origin() {
        let handle = PooledBuffer::plain(ScratchBuffer::with_capacity(8));
        assert_eq!(handle.origin(), None);
    }

    #[test]
    fn test_tagged_handle_remembers_origin() {
        let handle = PooledBuffer::tagged(ScratchBuffer::with_capacity(8), 3);
        assert_eq!(handle.origin(), Some(3));
        let (buffer, origin) = handle.into_parts();
        assert_eq!(origin, Some(3));
        assert_eq!(buffer.capacity(), 8);
    }

    #[test]
    fn test_deref_reaches_buffer() {
        let mut handle = PooledBuffer::plain(ScratchBuffer::with_capacity(8));
        handle.put_slice(b"abc");
        assert_eq!(handle.as_slice(), b"abc");
    }
}
