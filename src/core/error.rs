//! Error types for pool and simulation operations.

use thiserror::Error;

/// Errors produced by the pool and the tasks built around it.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Pool capacity must be a positive integer.
    #[error("capacity must be greater than 0")]
    InvalidCapacity,
    /// The pool was closed while the caller was blocked (or before it called).
    ///
    /// This is cooperative cancellation, not a failure: the caller should
    /// unwind cleanly without retrying.
    #[error("pool is closed")]
    Closed,
    /// The pool is full and the caller asked not to block.
    #[error("pool is full")]
    Full,
    /// The pool is empty and the caller asked not to block.
    #[error("pool is empty")]
    Empty,
    /// Configuration validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Internal error (thread spawn failure, task panic).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
