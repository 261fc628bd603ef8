// src/probe.rs
//! Thread probes: fast, thread-sticky indexes for stripe selection.
//!
//! A probe turns "which thread am I on" into a small integer that is stable
//! for the thread's lifetime and well distributed across threads, using a
//! handful of instructions and no allocation. Striped pools mask the probe
//! value with `stripe_count - 1` (stripe counts are always powers of two) to
//! pick a shard.
//!
//! Two variants exist behind one type, selected once at construction and
//! never re-detected per call:
//!
//! - [`ProbeKind::Fast`] keeps a per-thread probe value in a `thread_local!`
//!   cell, lazily seeded from a global golden-ratio sequence. Reading it is a
//!   TLS load; zero is reserved to mean "unset" and triggers one-time
//!   initialization for the calling thread.
//! - [`ProbeKind::Hashed`] derives the value on every call by hashing the
//!   thread's identity and spreading consecutive ids with a multiplicative
//!   golden-ratio step plus a 3-step xorshift. Slightly worse distribution,
//!   no thread-local state.

use std::cell::Cell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;

/// Knuth's multiplicative-hash constant (2^32 / phi).
const GOLDEN_RATIO: u32 = 0x9E37_79B9;

/// Global seeder for fast probes. Each thread takes one increment, so probe
/// values walk the golden-ratio sequence and spread evenly over any
/// power-of-two bucket count.
static PROBE_SEEDER: AtomicU32 = AtomicU32::new(0);

thread_local! {
    /// The calling thread's fast-probe value. Zero means "not yet seeded".
    static FAST_PROBE: Cell<u32> = const { Cell::new(0) };
}

/// Seeds the calling thread's fast probe. Runs at most once per thread.
#[cold]
fn seed_fast_probe() -> u32 {
    let raw = PROBE_SEEDER
        .fetch_add(GOLDEN_RATIO, Ordering::Relaxed)
        .wrapping_add(GOLDEN_RATIO);
    // Zero is the "unset" sentinel, skip it.
    let seed = if raw == 0 { GOLDEN_RATIO } else { raw };
    FAST_PROBE.set(seed);
    seed
}

/// Portable fallback: mix thread identity with the golden ratio, then
/// xorshift to spread consecutive identifiers across buckets.
fn hashed_probe() -> u32 {
    let mut hasher = DefaultHasher::new();
    thread::current().id().hash(&mut hasher);
    let mut probe = (hasher.finish() as u32).wrapping_mul(GOLDEN_RATIO) & (i32::MAX as u32);
    probe ^= probe << 13;
    probe ^= probe >> 17;
    probe ^= probe << 5;
    probe
}

/// The probe variant a [`ThreadProbe`] was constructed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    /// Thread-local cached probe value (preferred).
    Fast,
    /// Per-call hash of thread identity (portable fallback).
    Hashed,
}

/// Computes a fast, thread-sticky index used for stripe selection.
///
/// Construction is the capability check: [`ThreadProbe::detect`] picks the
/// fast variant where available and the hashed fallback otherwise. Call sites
/// only ever see [`probe`](ThreadProbe::probe) and
/// [`index`](ThreadProbe::index).
///
/// # Example
///
/// ```rust
/// use recyclepool::probe::ThreadProbe;
///
/// let probe = ThreadProbe::detect();
/// let mask = 4 - 1; // stripe counts are powers of two
/// let index = probe.index(mask);
/// assert!(index < 4);
/// // Stable within one thread:
/// assert_eq!(index, probe.index(mask));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ThreadProbe {
    kind: ProbeKind,
}

impl ThreadProbe {
    /// Selects the best probe variant available on this platform.
    ///
    /// The thread-local fast variant is always constructible here; the hashed
    /// fallback remains reachable through [`ThreadProbe::hashed`] for callers
    /// that want to avoid per-thread state.
    pub fn detect() -> Self {
        Self::fast()
    }

    /// The thread-local fast variant.
    pub fn fast() -> Self {
        Self {
            kind: ProbeKind::Fast,
        }
    }

    /// The portable hashed-identity fallback.
    pub fn hashed() -> Self {
        Self {
            kind: ProbeKind::Hashed,
        }
    }

    /// Which variant this probe uses.
    pub fn kind(&self) -> ProbeKind {
        self.kind
    }

    /// The raw probe value for the calling thread.
    #[inline]
    pub fn probe(&self) -> u32 {
        match self.kind {
            ProbeKind::Fast => {
                let probe = FAST_PROBE.get();
                if probe == 0 { seed_fast_probe() } else { probe }
            }
            ProbeKind::Hashed => hashed_probe(),
        }
    }

    /// The calling thread's bucket under `mask`, where `mask` is
    /// `stripe_count - 1` for a power-of-two stripe count.
    ///
    /// Masking rather than modulo: stripe counts are always powers of two.
    #[inline]
    pub fn index(&self, mask: usize) -> usize {
        (self.probe() as usize) & mask
    }
}

impl Default for ThreadProbe {
    fn default() -> Self {
        Self::detect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fast_probe_stable_within_thread() {
        let probe = ThreadProbe::fast();
        let first = probe.probe();
        assert_ne!(first, 0);
        for _ in 0..1000 {
            assert_eq!(probe.probe(), first);
        }
    }

    #[test]
    fn test_hashed_probe_stable_within_thread() {
        let probe = ThreadProbe::hashed();
        let first = probe.probe();
        for _ in 0..1000 {
            assert_eq!(probe.probe(), first);
        }
    }

    #[test]
    fn test_index_respects_mask() {
        for probe in [ThreadProbe::fast(), ThreadProbe::hashed()] {
            for shift in 0..8 {
                let mask = (1usize << shift) - 1;
                assert!(probe.index(mask) <= mask);
            }
        }
    }

    #[test]
    fn test_fast_probes_differ_across_threads() {
        let mine = ThreadProbe::fast().probe();
        let theirs: Vec<u32> = (0..8)
            .map(|_| std::thread::spawn(|| ThreadProbe::fast().probe()))
            .map(|h| h.join().unwrap())
            .collect();
        let mut all: HashSet<u32> = theirs.into_iter().collect();
        all.insert(mine);
        assert_eq!(all.len(), 9, "each thread should get its own probe value");
    }

    #[test]
    fn test_detect_prefers_fast() {
        assert_eq!(ThreadProbe::detect().kind(), ProbeKind::Fast);
    }
}
