//! In-memory search backend for tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::types::{CodeItem, IssueItem, SearchPage};
use super::SearchBackend;
use crate::error::{Result, SweepError};

/// Scripted backend: canned pages keyed by query and page number, plus a
/// shared log of every call for dispatch assertions.
#[derive(Default)]
pub(crate) struct FakeBackend {
    issues: HashMap<(String, u32), SearchPage<IssueItem>>,
    code: HashMap<(String, u32), SearchPage<CodeItem>>,
    pub remaining: Option<u32>,
    pub calls: Rc<RefCell<Vec<String>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the call log that survives boxing the backend.
    pub fn call_log(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.calls)
    }

    pub fn stub_issues(&mut self, query: &str, page: u32, response: SearchPage<IssueItem>) {
        self.issues.insert((query.to_string(), page), response);
    }

    pub fn stub_code(&mut self, query: &str, page: u32, response: SearchPage<CodeItem>) {
        self.code.insert((query.to_string(), page), response);
    }
}

impl SearchBackend for FakeBackend {
    fn search_issues(&self, query: &str, per_page: u32, page: u32) -> Result<SearchPage<IssueItem>> {
        self.calls
            .borrow_mut()
            .push(format!("issues?q={query}&per_page={per_page}&page={page}"));
        self.issues
            .get(&(query.to_string(), page))
            .cloned()
            .ok_or_else(|| SweepError::Api {
                status: 404,
                message: format!("no stub for issue search '{query}' page {page}"),
            })
    }

    fn search_code(&self, query: &str, per_page: u32, page: u32) -> Result<SearchPage<CodeItem>> {
        self.calls
            .borrow_mut()
            .push(format!("code?q={query}&per_page={per_page}&page={page}"));
        self.code
            .get(&(query.to_string(), page))
            .cloned()
            .ok_or_else(|| SweepError::Api {
                status: 404,
                message: format!("no stub for code search '{query}' page {page}"),
            })
    }

    fn last_remaining(&self) -> Option<u32> {
        self.remaining
    }
}

/// Page reporting `total` matches, holding `count` code items named
/// `<prefix><i>` starting at `start`.
pub(crate) fn code_page(total: u64, prefix: &str, start: usize, count: usize) -> SearchPage<CodeItem> {
    SearchPage {
        total_count: total,
        incomplete_results: false,
        items: (start..start + count)
            .map(|i| code_item(&format!("{prefix}{i}")))
            .collect(),
    }
}

pub(crate) fn code_item(path: &str) -> CodeItem {
    CodeItem {
        path: path.to_string(),
        html_url: format!("https://github.com/acme/widgets/blob/master/{path}"),
        text_matches: Vec::new(),
    }
}

pub(crate) fn issue_page(total: u64, numbers: &[u64]) -> SearchPage<IssueItem> {
    SearchPage {
        total_count: total,
        incomplete_results: false,
        items: numbers
            .iter()
            .map(|n| IssueItem {
                number: *n,
                title: format!("issue {n}"),
                html_url: format!("https://github.com/acme/widgets/issues/{n}"),
                text_matches: Vec::new(),
            })
            .collect(),
    }
}
