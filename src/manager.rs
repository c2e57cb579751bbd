//! Query orchestration.
//!
//! The manager owns the enabled repository list, builds the category
//! query strings, dispatches each repository to the remote API or its
//! local clone, and unifies everything into alias-keyed result maps.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::RepoConfig;
use crate::error::{Result, SweepError};
use crate::git::GitSearch;
use crate::github::{CodeItem, SearchBackend, SearchClient};
use crate::results::{
    Item, LocalResults, PathRecord, ReadmeIndex, RemoteResults, ResultMap, SearchResults,
};

/// Results requested by single-shot preview queries.
const PREVIEW_PER_PAGE: u32 = 10;
/// Page size for fully paginated queries.
const FULL_PER_PAGE: u32 = 100;

/// Search calls per minute granted with a token.
const AUTHENTICATED_LIMIT: u32 = 30;
/// Search calls per minute granted without one.
const ANONYMOUS_LIMIT: u32 = 10;

/// Everything one sweep produces for rendering: the six category maps,
/// the README index and the query they were built from.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub issues: ResultMap,
    pub pull_requests: ResultMap,
    pub code: ResultMap,
    pub in_readme: ResultMap,
    pub docs: ResultMap,
    pub paths: ResultMap,
    pub readmes: ReadmeIndex,
}

/// Owns the repository list and runs the category queries.
pub struct Manager {
    repos: Vec<RepoConfig>,
    api: Box<dyn SearchBackend>,
    authenticated: bool,
}

impl Manager {
    /// Build a manager over the hosted search API.
    pub fn new(repos: Vec<RepoConfig>, token: Option<String>) -> Result<Self> {
        let authenticated = token.is_some();
        let client = SearchClient::new(token)?;
        Self::with_backend(repos, Box::new(client), authenticated)
    }

    /// Build a manager over any [`SearchBackend`].
    ///
    /// Disabled repositories are dropped here. Duplicate display aliases
    /// are rejected so every result-map key identifies exactly one
    /// repository.
    pub fn with_backend(
        repos: Vec<RepoConfig>,
        api: Box<dyn SearchBackend>,
        authenticated: bool,
    ) -> Result<Self> {
        let repos: Vec<RepoConfig> = repos.into_iter().filter(|r| r.enabled).collect();
        let mut seen = HashSet::new();
        for repo in &repos {
            if !seen.insert(repo.alias()) {
                return Err(SweepError::DuplicateAlias(repo.alias()));
            }
        }
        Ok(Self {
            repos,
            api,
            authenticated,
        })
    }

    /// Enabled repositories, in configuration order.
    pub fn repos(&self) -> &[RepoConfig] {
        &self.repos
    }

    /// Issue matches per alias.
    pub fn find_issues(&self, term: &str) -> Result<ResultMap> {
        let mut results = ResultMap::new();
        for repo in self.repos.iter().filter(|r| r.issues) {
            let query = format!("{term} type:issue");
            results.insert(repo.alias(), self.issues_single(&query, &repo.full_name())?);
        }
        Ok(results)
    }

    /// Pull request matches per alias.
    pub fn find_pull_requests(&self, term: &str) -> Result<ResultMap> {
        let mut results = ResultMap::new();
        for repo in self.repos.iter().filter(|r| r.pullrequests) {
            let query = format!("{term} type:pr");
            results.insert(repo.alias(), self.issues_single(&query, &repo.full_name())?);
        }
        Ok(results)
    }

    /// Code matches per alias. A configured documentation folder is
    /// excluded from code search.
    pub fn find_code(&self, term: &str) -> Result<ResultMap> {
        let mut results = ResultMap::new();
        for repo in self.repos.iter().filter(|r| r.code) {
            let query = match &repo.doc_folder {
                Some(doc) => format!("{term} -path:{doc}"),
                None => term.to_string(),
            };
            results.insert(repo.alias(), self.code_single(&query, &repo.full_name())?);
        }
        Ok(results)
    }

    /// Documentation matches per alias, for repositories with a
    /// documentation folder.
    pub fn find_docs(&self, term: &str) -> Result<ResultMap> {
        let mut results = ResultMap::new();
        for repo in &self.repos {
            let Some(doc) = &repo.doc_folder else { continue };
            let query = format!("{term} path:{doc}");
            results.insert(repo.alias(), self.code_single(&query, &repo.full_name())?);
        }
        Ok(results)
    }

    /// README content matches per alias. Local clones are grepped,
    /// everything else goes through fully paginated code search.
    pub fn find_in_readme(&self, term: &str) -> Result<ResultMap> {
        let mut results = ResultMap::new();
        for repo in self.repos.iter().filter(|r| r.readme) {
            let set = match self.local_source(repo) {
                Some(git) => local(git.find_in_readme(term)?),
                None => {
                    let query = format!("{term} filename:README");
                    self.code_all(&query, &repo.full_name())?
                }
            };
            results.insert(repo.alias(), set);
        }
        Ok(results)
    }

    /// Path matches per alias. Local clones are enumerated through git
    /// plumbing, everything else goes through fully paginated code
    /// search.
    pub fn find_paths(&self, term: &str) -> Result<ResultMap> {
        let mut results = ResultMap::new();
        for repo in self.repos.iter().filter(|r| r.paths) {
            let set = match self.local_source(repo) {
                Some(git) => local(git.find_paths(term)?),
                None => {
                    let query = format!("{term} in:path");
                    self.paths_all(&query, &repo.full_name())?
                }
            };
            results.insert(repo.alias(), set);
        }
        Ok(results)
    }

    /// Discover README paths for every repository with path search
    /// enabled. The index drives directory adjacency when rendering.
    pub fn find_readmes(&self) -> Result<ReadmeIndex> {
        let mut index = ReadmeIndex::new();
        for repo in self.repos.iter().filter(|r| r.paths) {
            let set = match self.local_source(repo) {
                Some(git) => local(git.find_paths("README")?),
                None => self.paths_all("filename:README", &repo.full_name())?,
            };
            let paths = set
                .items()
                .iter()
                .filter_map(Item::path)
                .map(str::to_string)
                .collect();
            index.insert(repo.alias(), paths);
        }
        Ok(index)
    }

    /// Run every category and assemble the report.
    pub fn search(&self, term: &str) -> Result<SearchReport> {
        info!(term, repos = self.repos.len(), "sweeping");
        Ok(SearchReport {
            query: term.to_string(),
            issues: self.find_issues(term)?,
            pull_requests: self.find_pull_requests(term)?,
            code: self.find_code(term)?,
            in_readme: self.find_in_readme(term)?,
            docs: self.find_docs(term)?,
            paths: self.find_paths(term)?,
            readmes: self.find_readmes()?,
        })
    }

    /// Advisory quota: last observed remaining counter and the policy
    /// limit, 30 calls per minute with a token and 10 without.
    pub fn remaining_quota(&self) -> (Option<u32>, u32) {
        let limit = if self.authenticated {
            AUTHENTICATED_LIMIT
        } else {
            ANONYMOUS_LIMIT
        };
        (self.api.last_remaining(), limit)
    }

    fn local_source(&self, repo: &RepoConfig) -> Option<GitSearch> {
        let path = repo.local_path.as_ref()?;
        Some(match &repo.branch {
            Some(reference) => GitSearch::at_reference(path, reference),
            None => GitSearch::new(path),
        })
    }

    /// Single-shot preview query against issue search.
    fn issues_single(&self, query: &str, repo: &str) -> Result<SearchResults> {
        debug!(repo, query, "issue search");
        let page = self
            .api
            .search_issues(&scoped(query, repo), PREVIEW_PER_PAGE, 1)?;
        let items = page.items.into_iter().map(|i| Item::Issue(i.into())).collect();
        Ok(SearchResults::Remote(RemoteResults::new(
            repo,
            query,
            page.total_count,
            items,
        )))
    }

    /// Single-shot preview query against code search.
    fn code_single(&self, query: &str, repo: &str) -> Result<SearchResults> {
        debug!(repo, query, "code search");
        let page = self
            .api
            .search_code(&scoped(query, repo), PREVIEW_PER_PAGE, 1)?;
        let items = page.items.into_iter().map(|c| Item::Code(c.into())).collect();
        Ok(SearchResults::Remote(RemoteResults::new(
            repo,
            query,
            page.total_count,
            items,
        )))
    }

    /// Fully paginated code search, hits kept as content records.
    fn code_all(&self, query: &str, repo: &str) -> Result<SearchResults> {
        let (total, items) = self.fetch_all(query, repo)?;
        let items = items.into_iter().map(|c| Item::Code(c.into())).collect();
        Ok(SearchResults::Remote(RemoteResults::new(
            repo, query, total, items,
        )))
    }

    /// Fully paginated code search, hits kept as path records.
    fn paths_all(&self, query: &str, repo: &str) -> Result<SearchResults> {
        let (total, items) = self.fetch_all(query, repo)?;
        let items = items
            .into_iter()
            .map(|c| Item::Path(PathRecord::remote(c)))
            .collect();
        Ok(SearchResults::Remote(RemoteResults::new(
            repo, query, total, items,
        )))
    }

    /// Fetch every page of a code query, concatenated in backend order.
    /// The concatenation must add up to the reported total; silently
    /// dropping pages would make the count a lie.
    fn fetch_all(&self, query: &str, repo: &str) -> Result<(u64, Vec<CodeItem>)> {
        debug!(repo, query, "paged code search");
        let q = scoped(query, repo);
        let first = self.api.search_code(&q, FULL_PER_PAGE, 1)?;
        let total = first.total_count;
        let mut items = first.items;
        if total > u64::from(FULL_PER_PAGE) {
            let pages = page_count(total);
            info!(repo, query, total, pages, "paginating");
            for page in 2..=pages {
                let next = self.api.search_code(&q, FULL_PER_PAGE, page)?;
                items.extend(next.items);
            }
        }
        if items.len() as u64 != total {
            return Err(SweepError::PaginationMismatch {
                query: query.to_string(),
                expected: total,
                fetched: items.len(),
            });
        }
        Ok((total, items))
    }
}

/// Scope a query to one repository.
fn scoped(query: &str, repo: &str) -> String {
    format!("{query} repo:{repo}")
}

/// Pages needed to cover `total` results. Saturates instead of wrapping
/// when a reported total would not fit the page counter.
fn page_count(total: u64) -> u32 {
    u32::try_from(total.div_ceil(u64::from(FULL_PER_PAGE))).unwrap_or(u32::MAX)
}

fn local(records: Vec<PathRecord>) -> SearchResults {
    SearchResults::Local(LocalResults::new(records))
}
