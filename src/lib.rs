//! # ghsweep
//!
//! One query across a fleet of GitHub repositories.
//!
//! ghsweep fans a single search term out over a configured set of
//! repositories and unifies the answers: issues, pull requests, code,
//! documentation, README content and paths, whether a repository is
//! reached through the hosted search API or through a local clone.
//!
//! ## Key pieces
//!
//! - **Manager**: builds category queries, dispatches each repository
//!   remote or local, aggregates per-alias results
//! - **SearchClient / GitSearch**: the two query sources
//! - **SearchResults**: one counting/iteration/URL view over both
//! - **Renderer**: flat text or tree console output
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use ghsweep::{Config, Manager, RenderOptions, Renderer};
//!
//! fn main() -> ghsweep::Result<()> {
//!     let config = Config::load(Path::new("ghsweep.yml"))?;
//!     let manager = Manager::new(config.repos, config.token)?;
//!     let report = manager.search("thread safety")?;
//!     print!("{}", Renderer::new(RenderOptions::default()).render(&report));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod manager;
pub mod render;
pub mod results;

// Re-exports for convenience
pub use error::{Result, SweepError};

pub use config::{Config, RepoConfig};
pub use git::GitSearch;
pub use github::{SearchBackend, SearchClient};
pub use manager::{Manager, SearchReport};
pub use render::{OutputFormat, RenderOptions, Renderer};
pub use results::{
    CodeRecord, Fragment, IssueRecord, Item, LocalResults, PathRecord, ReadmeIndex, RemoteResults,
    ResultMap, SearchResults,
};
