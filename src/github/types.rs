//! Wire types for the GitHub search API.

use serde::Deserialize;

/// One page of a search response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage<T> {
    /// Total matches the backend knows about, across all pages.
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<T>,
}

/// An issue or pull request hit from issue search.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueItem {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    #[serde(default)]
    pub text_matches: Vec<TextMatch>,
}

/// A file hit from code search.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeItem {
    pub path: String,
    pub html_url: String,
    #[serde(default)]
    pub text_matches: Vec<TextMatch>,
}

/// Matched fragment attached when the text-match media type is requested.
#[derive(Debug, Clone, Deserialize)]
pub struct TextMatch {
    /// Kind of object the fragment came from, e.g. `FileContent`.
    #[serde(default)]
    pub object_type: Option<String>,
    #[serde(default)]
    pub property: Option<String>,
    pub fragment: String,
}

/// Error body of a failed API call.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(default)]
    pub documentation_url: Option<String>,
}
