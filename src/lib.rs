// src/lib.rs
//! # Recyclable Scratch-Buffer Pools
//!
//! A family of concurrent pools that hand out reusable serialization scratch
//! buffers, built to make the acquire/release cycle cheap and correct under
//! heavy concurrent access, whether from a small stable set of OS worker threads or
//! from an unbounded population of short-lived lightweight tasks.
//!
//! Features:
//! - One capability interface ([`Pool`]) over a closed set of strategies
//! - Total, non-blocking acquire: a pool miss allocates, never waits
//! - Lock-free shared strategies (MPMC queue, Treiber stack) via `crossbeam`
//! - Striping: power-of-two shards selected by a fast thread probe
//! - Origin-tagged buffers so release targets the stripe a buffer came from
//! - Hybrid routing for mixed OS-thread / lightweight-task workloads
//!
//! # Picking a strategy
//!
//! ```rust
//! use recyclepool::prelude::*;
//!
//! let pool = "striped_lock_free".parse::<Strategy>()?
//!     .build(PoolConfig::default().stripes(8))?;
//!
//! let mut buf = pool.acquire();
//! buf.clear();
//! buf.put_str("{\"media\":\"item\"}");
//! pool.release(buf);
//! # Ok::<(), recyclepool::PoolError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buffer;
pub mod error;
pub mod pool;
pub mod probe;

// Re-export main types
pub use buffer::ScratchBuffer;
pub use error::{PoolError, Result};
pub use pool::{
    HybridPool, LockFreePool, NoOpPool, Pool, PoolConfig, PoolStats, PooledBuffer, QueuePool,
    QueueStripe, StackStripe, Strategy, StripedLockFreePool, StripedPool, StripedQueuePool,
    ThreadLocalPool,
};
pub use probe::{ProbeKind, ThreadProbe};

/// Commonly used imports.
pub mod prelude {
    pub use crate::buffer::ScratchBuffer;
    pub use crate::error::{PoolError, Result};
    pub use crate::pool::{
        HybridPool, LockFreePool, NoOpPool, Pool, PoolConfig, PoolStats, PooledBuffer, QueuePool,
        Strategy, StripedLockFreePool, StripedPool, StripedQueuePool, ThreadLocalPool,
    };
    pub use crate::probe::ThreadProbe;
}
