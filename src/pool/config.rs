// src/pool/config.rs
//! Configuration shared by the pool strategies.

/// Configuration for pool construction.
///
/// All strategies read `buffer_capacity`; only the striped and hybrid
/// strategies read `stripes`.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Initial capacity of freshly allocated buffers, in bytes.
    pub buffer_capacity: usize,
    /// Requested stripe count for striped strategies. Rounded up to the next
    /// power of two at construction; must be larger than zero.
    pub stripes: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 8192, // 8KB scratch buffers
            stripes: 4,
        }
    }
}

impl PoolConfig {
    /// Sets the initial buffer capacity.
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Sets the requested stripe count.
    pub fn stripes(mut self, stripes: usize) -> Self {
        self.stripes = stripes;
        self
    }

    /// Configuration for small payloads (compact records, log lines).
    pub fn small() -> Self {
        Self {
            buffer_capacity: 1024,
            stripes: 4,
        }
    }

    /// Configuration for heavily parallel carriers (many cores, many tasks).
    pub fn wide() -> Self {
        Self {
            buffer_capacity: 8192,
            stripes: 16,
        }
    }
}
