//! Repository configuration.
//!
//! A configuration file is a YAML document with an optional access token
//! and the list of repositories to sweep:
//!
//! ```yaml
//! token: ghp_...
//! repos:
//!   - owner: acme
//!     name: widgets
//!     alias: widgets
//!     doc-folder: docs
//!   - owner: acme
//!     name: gadgets
//!     local-path: /home/me/src/gadgets
//!     issues: false
//! ```
//!
//! Every category switch defaults to on; a repository opts out of the
//! categories it does not want.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

fn default_true() -> bool {
    true
}

/// One searchable repository and its per-category switches.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoConfig {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// Display alias; defaults to `owner/name`.
    #[serde(default)]
    alias: Option<String>,
    /// Excluded from every category when false.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub issues: bool,
    #[serde(default = "default_true")]
    pub pullrequests: bool,
    #[serde(default = "default_true")]
    pub readme: bool,
    #[serde(default = "default_true")]
    pub paths: bool,
    #[serde(default = "default_true")]
    pub code: bool,
    /// Documentation subfolder. Enables the documentation category and
    /// excludes the folder from code search.
    #[serde(default, rename = "doc-folder")]
    pub doc_folder: Option<String>,
    /// Local clone. Routes the path and README categories to git plumbing
    /// instead of the remote API.
    #[serde(default, rename = "local-path")]
    pub local_path: Option<PathBuf>,
    /// Reference enumerated by local path search, when not the default.
    #[serde(default)]
    pub branch: Option<String>,
}

impl RepoConfig {
    /// A repository with every switch at its default.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            alias: None,
            enabled: true,
            issues: true,
            pullrequests: true,
            readme: true,
            paths: true,
            code: true,
            doc_folder: None,
            local_path: None,
            branch: None,
        }
    }

    /// Override the display alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// `owner/name`, the form the search API scopes queries with.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Display alias, falling back to the full name.
    pub fn alias(&self) -> String {
        self.alias.clone().unwrap_or_else(|| self.full_name())
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Personal access token. Raises the search quota and reaches
    /// private repositories.
    #[serde(default)]
    pub token: Option<String>,
    /// Repositories to sweep.
    #[serde(default)]
    pub repos: Vec<RepoConfig>,
}

impl Config {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    /// Effective token given the command-line and environment overrides,
    /// in that precedence order.
    pub fn token_with_overrides(
        &self,
        flag: Option<String>,
        env: Option<String>,
    ) -> Option<String> {
        flag.or(env).or_else(|| self.token.clone())
    }

    /// Locate a configuration file: `ghsweep.yml` in the working
    /// directory, then `<config dir>/ghsweep/config.yml`.
    pub fn locate() -> Option<PathBuf> {
        let local = PathBuf::from("ghsweep.yml");
        if local.exists() {
            return Some(local);
        }
        let fallback = dirs::config_dir()?.join("ghsweep").join("config.yml");
        fallback.exists().then_some(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
token: ghp_secret
repos:
  - owner: acme
    name: widgets
    alias: widgets
    doc-folder: docs
  - owner: acme
    name: gadgets
    local-path: /tmp/gadgets
    branch: main
    issues: false
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.token.as_deref(), Some("ghp_secret"));
        assert_eq!(config.repos.len(), 2);

        let widgets = &config.repos[0];
        assert_eq!(widgets.alias(), "widgets");
        assert_eq!(widgets.full_name(), "acme/widgets");
        assert_eq!(widgets.doc_folder.as_deref(), Some("docs"));
        assert!(widgets.issues);

        let gadgets = &config.repos[1];
        assert_eq!(gadgets.local_path.as_deref(), Some(Path::new("/tmp/gadgets")));
        assert_eq!(gadgets.branch.as_deref(), Some("main"));
        assert!(!gadgets.issues);
    }

    #[test]
    fn test_switch_defaults_are_on() {
        let yaml = "repos:\n  - owner: acme\n    name: widgets\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let repo = &config.repos[0];
        assert!(repo.enabled);
        assert!(repo.issues);
        assert!(repo.pullrequests);
        assert!(repo.readme);
        assert!(repo.paths);
        assert!(repo.code);
        assert!(repo.doc_folder.is_none());
        assert!(repo.local_path.is_none());
    }

    #[test]
    fn test_alias_falls_back_to_full_name() {
        let repo = RepoConfig::new("acme", "widgets");
        assert_eq!(repo.alias(), "acme/widgets");
        let aliased = RepoConfig::new("acme", "widgets").with_alias("w");
        assert_eq!(aliased.alias(), "w");
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "repos:\n  - owner: acme\n    name: widgets\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.repos[0].full_name(), "acme/widgets");
        assert!(config.token.is_none());
    }

    #[test]
    fn test_token_precedence_flag_env_file() {
        let config = Config {
            token: Some("file".to_string()),
            repos: Vec::new(),
        };
        assert_eq!(
            config.token_with_overrides(Some("flag".into()), Some("env".into())),
            Some("flag".to_string())
        );
        assert_eq!(
            config.token_with_overrides(None, Some("env".into())),
            Some("env".to_string())
        );
        assert_eq!(config.token_with_overrides(None, None), Some("file".to_string()));
        assert_eq!(
            Config::default().token_with_overrides(None, None),
            None
        );
    }

    #[test]
    fn test_load_rejects_malformed_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "repos: [oops").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
