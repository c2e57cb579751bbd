//! Blocking client for the GitHub search API.
//!
//! Requests opt into the text-match media type so hits carry their match
//! fragments. The most recent `x-ratelimit-remaining` header is remembered
//! for quota reporting.

use std::cell::Cell;

use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::types::{ApiError, CodeItem, IssueItem, SearchPage};
use super::SearchBackend;
use crate::error::{Result, SweepError};

const API_ROOT: &str = "https://api.github.com";

/// Media type that embeds match fragments in search hits.
const TEXT_MATCH_MEDIA: &str = "application/vnd.github.text-match+json";

/// Client for the hosted search endpoints.
pub struct SearchClient {
    http: Client,
    token: Option<String>,
    last_remaining: Cell<Option<u32>>,
}

impl SearchClient {
    /// Build a client. A token is sent as a bearer credential and raises
    /// the search quota.
    pub fn new(token: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("ghsweep/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            token,
            last_remaining: Cell::new(None),
        })
    }

    fn get_page<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &str,
        per_page: u32,
        page: u32,
    ) -> Result<SearchPage<T>> {
        let url = format!("{API_ROOT}{endpoint}");
        let mut request = self
            .http
            .get(&url)
            .header(ACCEPT, TEXT_MATCH_MEDIA)
            .query(&[("q", query)])
            .query(&[("per_page", per_page), ("page", page)]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send()?;
        self.note_quota(&response);
        let status = response.status();
        debug!(%status, endpoint, query, page, "search request");
        if !status.is_success() {
            return Err(self.status_error(response));
        }
        Ok(response.json()?)
    }

    /// Remember the rate-limit counter of a response.
    fn note_quota(&self, response: &Response) {
        let remaining = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        if remaining == Some(0) {
            warn!("search quota exhausted");
        }
        if remaining.is_some() {
            self.last_remaining.set(remaining);
        }
    }

    fn status_error(&self, response: Response) -> SweepError {
        let status = response.status().as_u16();
        let message = response
            .json::<ApiError>()
            .map(|e| e.message)
            .unwrap_or_else(|_| "no error body".to_string());
        if self.last_remaining.get() == Some(0) {
            SweepError::RateLimited { status, message }
        } else {
            SweepError::Api { status, message }
        }
    }
}

impl SearchBackend for SearchClient {
    fn search_issues(&self, query: &str, per_page: u32, page: u32) -> Result<SearchPage<IssueItem>> {
        self.get_page("/search/issues", query, per_page, page)
    }

    fn search_code(&self, query: &str, per_page: u32, page: u32) -> Result<SearchPage<CodeItem>> {
        self.get_page("/search/code", query, per_page, page)
    }

    fn last_remaining(&self) -> Option<u32> {
        self.last_remaining.get()
    }
}
