// src/pool/stack.rs
//! Lock-free stack pooling: a Treiber stack of idle buffers.
//!
//! Push and pop are compare-and-swap loops on a single head pointer. Retries
//! are unbounded in theory, but every failed CAS means some other thread made
//! progress, so the loops are self-limiting in practice. Node memory is
//! reclaimed through `crossbeam::epoch`: a popped node is destroyed only
//! after every thread that might still hold a reference to it has moved on,
//! which rules out the use-after-free a naive CAS stack invites.
//!
//! Under a single caller the stack is LIFO: the last buffer released is the
//! first one reacquired, which keeps the hottest buffer cache-warm.

use super::stats::StatCounters;
use super::{Pool, PoolConfig, PooledBuffer, PoolStats, Stripe};
use crate::buffer::ScratchBuffer;
use crossbeam::epoch::{self, Atomic, Owned};
use std::mem::ManuallyDrop;
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A singly-linked cell holding one idle buffer.
///
/// The stack owns the node exclusively until it is popped; a winning pop
/// transfers the buffer out and defers destruction of the node itself. The
/// payload is `ManuallyDrop` so that deferred node destruction never touches
/// a buffer that was already moved to a caller.
#[derive(Debug)]
struct Node {
    buffer: ManuallyDrop<ScratchBuffer>,
    next: Atomic<Node>,
}

/// One stack shard: idle buffers in LIFO order.
#[derive(Debug, Default)]
pub struct StackStripe {
    head: Atomic<Node>,
    size: AtomicUsize,
}

impl StackStripe {
    /// Creates an empty stripe.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stripe for StackStripe {
    fn try_pop(&self) -> Option<ScratchBuffer> {
        let guard = epoch::pin();
        loop {
            let head = self.head.load(Ordering::Acquire, &guard);
            let node = unsafe { head.as_ref() }?;
            let next = node.next.load(Ordering::Relaxed, &guard);
            if self
                .head
                .compare_exchange(head, next, Ordering::Acquire, Ordering::Relaxed, &guard)
                .is_ok()
            {
                self.size.fetch_sub(1, Ordering::Relaxed);
                // The CAS win transfers exclusive ownership of the node to
                // this thread; move the buffer out and retire the node.
                unsafe {
                    let buffer = ManuallyDrop::into_inner(ptr::read(&node.buffer));
                    guard.defer_destroy(head);
                    return Some(buffer);
                }
            }
        }
    }

    fn push(&self, buffer: ScratchBuffer) {
        let mut node = Owned::new(Node {
            buffer: ManuallyDrop::new(buffer),
            next: Atomic::null(),
        });
        let guard = epoch::pin();
        loop {
            let head = self.head.load(Ordering::Relaxed, &guard);
            node.next.store(head, Ordering::Relaxed);
            match self
                .head
                .compare_exchange(head, node, Ordering::Release, Ordering::Relaxed, &guard)
            {
                Ok(_) => {
                    self.size.fetch_add(1, Ordering::Relaxed);
                    return;
                }
                Err(err) => node = err.new,
            }
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.size.load(Ordering::Relaxed)
    }
}

impl Drop for StackStripe {
    fn drop(&mut self) {
        // Drain so the remaining buffers run their destructors; the nodes
        // themselves are reclaimed by the epoch collector.
        while self.try_pop().is_some() {}
    }
}

/// A single shared lock-free stack pool.
///
/// # Example
///
/// ```rust
/// use recyclepool::prelude::*;
///
/// let pool = LockFreePool::new(PoolConfig::default());
/// let b1 = pool.acquire();
/// let b2 = pool.acquire();
/// pool.release(b1);
/// pool.release(b2);
/// // Single caller, no contention: LIFO reuse.
/// assert_eq!(pool.stats().available, 2);
/// ```
#[derive(Debug)]
pub struct LockFreePool {
    stripe: StackStripe,
    buffer_capacity: usize,
    stats: StatCounters,
}

impl Default for LockFreePool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

impl LockFreePool {
    /// Creates an empty lock-free stack pool.
    pub fn new(config: PoolConfig) -> Self {
        Self {
            stripe: StackStripe::new(),
            buffer_capacity: config.buffer_capacity,
            stats: StatCounters::new(),
        }
    }
}

impl Pool for LockFreePool {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_empty_returns_none() {
        let stripe = StackStripe::new();
        assert!(stripe.try_pop().is_none());
        assert_eq!(stripe.len(), 0);
    }

    #[test]
    fn test_lifo_under_single_thread() {
        let stripe = StackStripe::new();
        let mut b1 = ScratchBuffer::with_capacity(8);
        b1.put_u8(1);
        let mut b2 = ScratchBuffer::with_capacity(8);
        b2.put_u8(2);

        stripe.push(b1);
        stripe.push(b2);

        assert_eq!(stripe.try_pop().unwrap().as_slice(), &[2]);
        assert_eq!(stripe.try_pop().unwrap().as_slice(), &[1]);
        assert!(stripe.try_pop().is_none());
    }

    #[test]
    fn test_pool_lifo_reuse() {
        let pool = LockFreePool::new(PoolConfig::default().buffer_capacity(32));
        let mut b1 = pool.acquire();
        let mut b2 = pool.acquire();
        b1.put_str("first");
        b2.put_str("second");
        pool.release(b1);
        pool.release(b2);

        assert_eq!(pool.acquire().as_slice(), b"second");
        assert_eq!(pool.acquire().as_slice(), b"first");
    }

    #[test]
    fn test_drop_with_pending_buffers() {
        let stripe = StackStripe::new();
        for _ in 0..16 {
            stripe.push(ScratchBuffer::with_capacity(1024));
        }
        // Dropping the stripe must free the chained nodes and buffers.
        drop(stripe);
    }

    #[test]
    fn test_concurrent_push_pop() {
        use std::sync::Arc;
        use std::thread;

        let pool = Arc::new(LockFreePool::new(PoolConfig::default().buffer_capacity(64)));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    for i in 0..500u32 {
                        let mut buffer = pool.acquire();
                        buffer.clear();
                        buffer.put_slice(&(t * 1000 + i).to_le_bytes());
                        assert_eq!(buffer.len(), 4);
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
        assert_eq!(stats.released, 4000);
        assert!(stats.available <= 8);
    }
}
