// src/buffer.rs
//! The reusable scratch object handed out by every pool.
//!
//! A [`ScratchBuffer`] is an append-only byte sink backed by a `Vec<u8>`.
//! Serialization layers write into it through the inherent `put_*` methods or
//! through the [`std::io::Write`] impl, then hand it back to the pool.
//!
//! Pools never inspect or reset buffer contents. A reacquired buffer still
//! holds whatever the previous user wrote; callers that need a clean slate
//! call [`clear`](ScratchBuffer::clear) before writing. This keeps the
//! release path free of per-byte work.

use std::io;

/// A growable, reusable scratch buffer for serialization output.
///
/// # Example
///
/// ```rust
/// use recyclepool::ScratchBuffer;
///
/// let mut buf = ScratchBuffer::with_capacity(64);
/// buf.put_str("header:");
/// buf.put_u8(b' ');
/// buf.put_slice(&[1, 2, 3]);
/// assert_eq!(buf.len(), 11);
///
/// buf.clear();
/// assert!(buf.is_empty());
/// assert!(buf.capacity() >= 64);
/// ```
#[derive(Debug, Default, Clone)]
pub struct ScratchBuffer {
    data: Vec<u8>,
}

impl ScratchBuffer {
    /// Creates an empty buffer with at least the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Appends a single byte.
    #[inline]
    pub fn put_u8(&mut self, byte: u8) {
        self.data.push(byte);
    }

    /// Appends a slice of bytes, growing the buffer if needed.
    #[inline]
    pub fn put_slice(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Appends the UTF-8 bytes of a string.
    #[inline]
    pub fn put_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// The bytes written so far.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Number of bytes written.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` if nothing has been written since the last clear.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current capacity of the backing allocation.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Discards the written bytes, keeping the backing allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Consumes the buffer and returns the written bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

/// Lets external serializers (e.g. `serde_json::to_writer`) target a pooled
/// buffer directly.
impl io::Write for ScratchBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_put_and_read_back() {
        let mut buf = ScratchBuffer::with_capacity(16);
        buf.put_u8(0xAB);
        buf.put_slice(b"scratch");
        buf.put_str("!");
        assert_eq!(buf.len(), 9);
        assert_eq!(&buf.as_slice()[1..8], b"scratch");
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut buf = ScratchBuffer::with_capacity(128);
        buf.put_slice(&[0u8; 64]);
        let cap = buf.capacity();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn test_grows_past_initial_capacity() {
        let mut buf = ScratchBuffer::with_capacity(8);
        buf.put_slice(&[7u8; 100]);
        assert_eq!(buf.len(), 100);
        assert!(buf.capacity() >= 100);
    }

    #[test]
    fn test_io_write() {
        let mut buf = ScratchBuffer::with_capacity(32);
        write!(buf, "n={}", 42).unwrap();
        assert_eq!(buf.as_slice(), b"n=42");
        assert_eq!(buf.into_vec(), b"n=42".to_vec());
    }
}
