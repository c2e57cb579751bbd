//! Remote search backend.
//!
//! The hosted search API is consumed through two logical operations,
//! issue search and code search, both paginated. [`SearchBackend`] is the
//! seam between the manager and the wire so tests can substitute an
//! in-memory backend for the real client.

pub mod client;
pub mod types;

pub use client::SearchClient;
pub use types::{ApiError, CodeItem, IssueItem, SearchPage, TextMatch};

use crate::error::Result;

/// Paginated access to the two remote search operations.
pub trait SearchBackend {
    /// Search issues and pull requests.
    fn search_issues(&self, query: &str, per_page: u32, page: u32) -> Result<SearchPage<IssueItem>>;

    /// Search file contents and paths.
    fn search_code(&self, query: &str, per_page: u32, page: u32) -> Result<SearchPage<CodeItem>>;

    /// Most recently observed `x-ratelimit-remaining` value, if any call
    /// has been made yet.
    fn last_remaining(&self) -> Option<u32>;
}

#[cfg(test)]
pub(crate) mod fake;
