//! Error types for ghsweep.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SweepError>;

/// Everything that can fail while sweeping a query across repositories.
#[derive(Debug, Error)]
pub enum SweepError {
    /// Transport-level HTTP failure (connect, timeout, decode).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The search API answered with a non-success status.
    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The search API refused the call because the per-minute quota is spent.
    #[error("search rate limit exhausted ({status}): {message}")]
    RateLimited { status: u16, message: String },

    /// A git plumbing command exited non-zero.
    #[error("git {command} failed (status {status}): {stderr}")]
    Git {
        command: String,
        status: String,
        stderr: String,
    },

    /// Fetched pages did not add up to the total the backend reported.
    #[error("pagination mismatch for '{query}': backend reported {expected} results, fetched {fetched}")]
    PaginationMismatch {
        query: String,
        expected: u64,
        fetched: usize,
    },

    /// Two enabled repositories resolve to the same display alias.
    #[error("duplicate repository alias '{0}'")]
    DuplicateAlias(String),

    /// Configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Filesystem or subprocess I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
