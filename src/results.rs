//! Unified result model.
//!
//! Remote queries and local plumbing searches produce the same three
//! record shapes, wrapped in one counting/iteration/URL abstraction so
//! rendering never cares where a result came from.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Serialize;

use crate::github::types::{CodeItem, IssueItem, TextMatch};

/// A matched text fragment and the kind of object it came from.
#[derive(Debug, Clone, Serialize)]
pub struct Fragment {
    pub text: String,
    /// Backend tag for the matched object, e.g. `FileContent`. Empty when
    /// the backend did not say.
    pub origin: String,
}

impl From<TextMatch> for Fragment {
    fn from(m: TextMatch) -> Self {
        Self {
            text: m.fragment,
            origin: m.object_type.unwrap_or_default(),
        }
    }
}

/// A repository path hit.
#[derive(Debug, Clone, Serialize)]
pub struct PathRecord {
    /// Path relative to the repository root.
    pub path: String,
    /// Browsable URL; `file://` for local hits.
    pub url: String,
    /// Resolved at construction: collapsed local paths and remote paths
    /// with a trailing separator name directories.
    pub is_dir: bool,
}

impl PathRecord {
    /// Record for a remote code-search hit.
    pub fn remote(item: CodeItem) -> Self {
        let is_dir = item.path.ends_with('/');
        Self {
            path: item.path,
            url: item.html_url,
            is_dir,
        }
    }

    /// Record for a hit inside the clone at `base`.
    pub fn local(path: &str, base: &Path, is_dir: bool) -> Self {
        Self {
            path: path.to_string(),
            url: format!("file://{}/{}", base.display(), path),
            is_dir,
        }
    }
}

/// An issue or pull request hit.
#[derive(Debug, Clone, Serialize)]
pub struct IssueRecord {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub fragments: Vec<Fragment>,
}

impl From<IssueItem> for IssueRecord {
    fn from(item: IssueItem) -> Self {
        Self {
            number: item.number,
            title: item.title,
            url: item.html_url,
            fragments: item.text_matches.into_iter().map(Fragment::from).collect(),
        }
    }
}

/// A content hit: code, documentation or README text.
#[derive(Debug, Clone, Serialize)]
pub struct CodeRecord {
    pub path: String,
    pub url: String,
    pub fragments: Vec<Fragment>,
}

impl From<CodeItem> for CodeRecord {
    fn from(item: CodeItem) -> Self {
        Self {
            path: item.path,
            url: item.html_url,
            fragments: item.text_matches.into_iter().map(Fragment::from).collect(),
        }
    }
}

/// One result of any category.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    Path(PathRecord),
    Issue(IssueRecord),
    Code(CodeRecord),
}

impl Item {
    /// Browsable URL of the underlying record.
    pub fn url(&self) -> &str {
        match self {
            Item::Path(p) => &p.url,
            Item::Issue(i) => &i.url,
            Item::Code(c) => &c.url,
        }
    }

    /// Repository path of a path or content record.
    pub fn path(&self) -> Option<&str> {
        match self {
            Item::Path(p) => Some(&p.path),
            Item::Code(c) => Some(&c.path),
            Item::Issue(_) => None,
        }
    }

    /// Match fragments attached to the record.
    pub fn fragments(&self) -> &[Fragment] {
        match self {
            Item::Issue(i) => &i.fragments,
            Item::Code(c) => &c.fragments,
            Item::Path(_) => &[],
        }
    }
}

/// Results of one remote query against one repository.
#[derive(Debug, Clone, Serialize)]
pub struct RemoteResults {
    repo: String,
    query: String,
    total_count: u64,
    items: Vec<Item>,
}

impl RemoteResults {
    pub fn new(
        repo: impl Into<String>,
        query: impl Into<String>,
        total_count: u64,
        items: Vec<Item>,
    ) -> Self {
        Self {
            repo: repo.into(),
            query: query.into(),
            total_count,
            items,
        }
    }

    /// Browsable search URL for the query, percent-encoded. The repo
    /// scope lives in the URL path, not in the query string.
    pub fn query_url(&self) -> String {
        format!(
            "https://github.com/{}/search?q={}",
            self.repo,
            urlencoding::encode(&self.query)
        )
    }
}

/// Results of one local plumbing search.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LocalResults {
    items: Vec<Item>,
}

impl LocalResults {
    pub fn new(records: Vec<PathRecord>) -> Self {
        Self {
            items: records.into_iter().map(Item::Path).collect(),
        }
    }
}

/// Uniform view over a remote or local result set.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SearchResults {
    Remote(RemoteResults),
    Local(LocalResults),
}

impl SearchResults {
    /// Backend-reported total for remote sets; exact item count for
    /// local ones.
    pub fn total_count(&self) -> u64 {
        match self {
            SearchResults::Remote(r) => r.total_count,
            SearchResults::Local(l) => l.items.len() as u64,
        }
    }

    /// Fetched items, in backend order.
    pub fn items(&self) -> &[Item] {
        match self {
            SearchResults::Remote(r) => &r.items,
            SearchResults::Local(l) => &l.items,
        }
    }

    /// Browsable query URL; only remote sets have one.
    pub fn query_url(&self) -> Option<String> {
        match self {
            SearchResults::Remote(r) => Some(r.query_url()),
            SearchResults::Local(_) => None,
        }
    }
}

/// Alias-keyed results of one category.
pub type ResultMap = BTreeMap<String, SearchResults>;

/// README paths discovered per alias, consulted for directory adjacency
/// when rendering path matches.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReadmeIndex {
    entries: BTreeMap<String, Vec<String>>,
}

impl ReadmeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the README paths discovered for `alias`, de-duplicated,
    /// discovery order kept.
    pub fn insert(&mut self, alias: impl Into<String>, paths: Vec<String>) {
        let mut seen = HashSet::new();
        let deduped = paths
            .into_iter()
            .filter(|path| seen.insert(path.clone()))
            .collect();
        self.entries.insert(alias.into(), deduped);
    }

    /// README paths known for `alias`.
    pub fn paths(&self, alias: &str) -> &[String] {
        self.entries
            .get(alias)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every README strictly under `dir` for `alias`. The directory is
    /// normalized to exactly one trailing separator before the prefix
    /// comparison, so `src` never matches `srcx/README`.
    pub fn readmes_under(&self, alias: &str, dir: &str) -> Vec<&str> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        self.paths(alias)
            .iter()
            .filter(|path| path.starts_with(&prefix))
            .map(String::as_str)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
