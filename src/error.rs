// src/error.rs
//! Error types for pool construction and the strategy registry.
//!
//! The steady state of every pool is error-free: `acquire` and `release`
//! never fail and never block, because a pool miss always falls through to
//! allocating a fresh buffer. The only fallible operations are performed
//! once, at construction time.

use std::fmt;

/// Errors surfaced while constructing a pool or resolving a strategy name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// A striped pool was requested with zero stripes.
    InvalidStripeCount,
    /// Light-task detection was explicitly required but no runtime support
    /// is compiled in (the `tokio` feature is disabled).
    TaskDetectionUnavailable,
    /// A strategy name did not match any registered pool strategy.
    UnknownStrategy(String),
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStripeCount => {
                write!(f, "stripe count must be larger than 0")
            }
            Self::TaskDetectionUnavailable => {
                write!(
                    f,
                    "light-task detection requires the `tokio` feature to be enabled"
                )
            }
            Self::UnknownStrategy(name) => write!(f, "unknown pool strategy: {:?}", name),
        }
    }
}

impl std::error::Error for PoolError {}

/// Result type alias for pool construction.
pub type Result<T> = std::result::Result<T, PoolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            PoolError::InvalidStripeCount.to_string(),
            "stripe count must be larger than 0"
        );
        assert!(
            PoolError::UnknownStrategy("jctools".into())
                .to_string()
                .contains("jctools")
        );
    }

    #[test]
    fn test_is_std_error() {
        fn assert_error<E: std::error::Error>(_e: &E) {}
        assert_error(&PoolError::TaskDetectionUnavailable);
    }
}
