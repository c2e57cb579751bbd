//! Local query source backed by git plumbing.
//!
//! Repositories configured with a local clone answer the path and README
//! categories from the working copy instead of the remote API. Two
//! plumbing operations cover both: a literal content grep over tracked
//! README files and a recursive tree listing at a fixed reference.

use std::collections::HashSet;
use std::path::PathBuf;
use std::process::{Command, Output};

use tracing::debug;

use crate::error::{Result, SweepError};
use crate::results::PathRecord;

/// Reference enumerated when none is configured.
pub const DEFAULT_BRANCH: &str = "master";

/// Plumbing-backed search over one working copy.
pub struct GitSearch {
    path: PathBuf,
    reference: String,
}

impl GitSearch {
    /// Search the clone at `path`, enumerating [`DEFAULT_BRANCH`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            reference: DEFAULT_BRANCH.to_string(),
        }
    }

    /// Search the clone at `path`, enumerating `reference` instead of the
    /// default branch.
    pub fn at_reference(path: impl Into<PathBuf>, reference: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reference: reference.into(),
        }
    }

    /// Tracked files ending in `README` whose content contains `query` as
    /// a literal string.
    ///
    /// `git grep` exits 1 when no line matches; that is an empty result,
    /// not a failure.
    pub fn find_in_readme(&self, query: &str) -> Result<Vec<PathRecord>> {
        // -e keeps a dash-leading query a pattern rather than an option.
        let args = ["grep", "-l", "-F", "-e", query, "--", "*README"];
        let out = self.run_git(&args)?;
        if out.status.code() == Some(1) {
            return Ok(Vec::new());
        }
        if !out.status.success() {
            return Err(git_error(&args, &out));
        }
        let stdout = String::from_utf8_lossy(&out.stdout);
        Ok(stdout
            .lines()
            .filter(|line| !line.is_empty())
            .map(|rel| PathRecord::local(rel, &self.path, false))
            .collect())
    }

    /// Tracked paths containing `query` (case-insensitive), collapsed to
    /// the component where the match starts and de-duplicated.
    pub fn find_paths(&self, query: &str) -> Result<Vec<PathRecord>> {
        let listing = self.checked(&["ls-tree", "--name-only", "-r", &self.reference])?;
        let mut seen = HashSet::new();
        let mut records = Vec::new();
        for line in listing.lines().filter(|line| !line.is_empty()) {
            if let Some((collapsed, is_dir)) = collapse_path(line, query) {
                if seen.insert(collapsed.clone()) {
                    records.push(PathRecord::local(&collapsed, &self.path, is_dir));
                }
            }
        }
        Ok(records)
    }

    fn run_git(&self, args: &[&str]) -> Result<Output> {
        debug!(cwd = %self.path.display(), ?args, "git");
        Ok(Command::new("git")
            .args(args)
            .current_dir(&self.path)
            .output()?)
    }

    /// Run a plumbing command whose non-zero exit is always fatal.
    fn checked(&self, args: &[&str]) -> Result<String> {
        let out = self.run_git(args)?;
        if !out.status.success() {
            return Err(git_error(args, &out));
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

/// Truncate `path` at the first separator at or after the start of the
/// case-insensitive match of `query`. Returns the collapsed path and
/// whether components were cut off (the collapsed path names a
/// directory), or `None` when the query does not occur.
fn collapse_path(path: &str, query: &str) -> Option<(String, bool)> {
    let haystack = path.to_lowercase();
    let needle = query.to_lowercase();
    let start = haystack.find(&needle)?;
    // Lowercasing can shift byte offsets on non-ASCII paths; keep those
    // whole rather than slice off a char boundary.
    if haystack.len() != path.len() || !path.is_char_boundary(start) {
        return Some((path.to_string(), false));
    }
    match path[start..].find('/') {
        Some(offset) => Some((path[..start + offset].to_string(), true)),
        None => Some((path.to_string(), false)),
    }
}

fn git_error(args: &[&str], out: &Output) -> SweepError {
    SweepError::Git {
        command: args.first().copied().unwrap_or("git").to_string(),
        status: out
            .status
            .code()
            .map(|code| code.to_string())
            .unwrap_or_else(|| "signal".to_string()),
        stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_at_separator_after_match() {
        assert_eq!(
            collapse_path("src/foo/bar.cpp", "foo"),
            Some(("src/foo".to_string(), true))
        );
    }

    #[test]
    fn test_collapse_keeps_full_path_without_later_separator() {
        assert_eq!(
            collapse_path("src/foo/bar.cpp", "bar"),
            Some(("src/foo/bar.cpp".to_string(), false))
        );
    }

    #[test]
    fn test_collapse_is_case_insensitive() {
        assert_eq!(
            collapse_path("src/Widgets/lib.rs", "widgets"),
            Some(("src/Widgets".to_string(), true))
        );
    }

    #[test]
    fn test_collapse_misses_cleanly() {
        assert_eq!(collapse_path("src/foo/bar.cpp", "zzz"), None);
    }

    #[test]
    fn test_collapse_keeps_non_ascii_path_whole() {
        // "İ" lowercases to two chars, shifting every later byte offset.
        assert_eq!(
            collapse_path("İdò/foo/bar.cpp", "foo"),
            Some(("İdò/foo/bar.cpp".to_string(), false))
        );
    }

    #[test]
    fn test_collapse_match_inside_first_component() {
        assert_eq!(
            collapse_path("foobar/baz.c", "foo"),
            Some(("foobar".to_string(), true))
        );
    }
}
