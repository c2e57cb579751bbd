//! Console rendering.
//!
//! One renderer covers both output shapes. Flat text prints a section
//! per category in a fixed order; tree output nests category, alias and
//! hit under the query. Match fragments sit behind a switch in either
//! shape.

use std::fmt::Write;

use crossterm::style::Stylize;

use crate::manager::SearchReport;
use crate::results::{Fragment, Item, ReadmeIndex, ResultMap};

/// Output shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Section-per-category flat text.
    #[default]
    Text,
    /// Box-drawing tree rooted at the query.
    Tree,
}

/// Rendering switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Include match fragments under each hit.
    pub fragments: bool,
    pub format: OutputFormat,
}

/// Renders a [`SearchReport`] for the console.
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render the whole report in the configured shape.
    pub fn render(&self, report: &SearchReport) -> String {
        match self.options.format {
            OutputFormat::Text => self.render_text(report),
            OutputFormat::Tree => self.render_tree(report),
        }
    }

    fn render_text(&self, report: &SearchReport) -> String {
        let mut out = String::new();
        self.counted_section(&mut out, &report.issues, "issues");
        self.counted_section(&mut out, &report.pull_requests, "pull requests");
        self.counted_section(&mut out, &report.code, "code matches");
        self.readme_section(&mut out, &report.in_readme);
        self.counted_section(&mut out, &report.docs, "documentation matches");
        self.paths_section(&mut out, report);
        out
    }

    /// Count plus query link per alias; hits are listed only when
    /// fragments are on.
    fn counted_section(&self, out: &mut String, map: &ResultMap, label: &str) {
        if map.is_empty() {
            return;
        }
        for (alias, results) in map {
            if results.total_count() == 0 {
                continue;
            }
            let _ = writeln!(
                out,
                "Found {} {} in {}",
                results.total_count(),
                label.bold(),
                alias.as_str().green()
            );
            if let Some(url) = results.query_url() {
                let _ = writeln!(out, "  view: {}", url.blue().underlined());
            }
            if self.options.fragments {
                for item in results.items() {
                    self.item_lines(out, item, 1);
                }
            }
        }
        out.push('\n');
    }

    /// README content matches; every hit is listed with its location.
    fn readme_section(&self, out: &mut String, map: &ResultMap) {
        if map.is_empty() {
            return;
        }
        for (alias, results) in map {
            if results.total_count() == 0 {
                continue;
            }
            let _ = writeln!(
                out,
                "Found {} {} in {}",
                results.total_count(),
                "README matches".bold(),
                alias.as_str().green()
            );
            for item in results.items() {
                if let Some(path) = item.path() {
                    let _ = writeln!(out, "  in {}", path.magenta());
                    let _ = writeln!(out, "    view: {}", item.url().blue().underlined());
                }
                if self.options.fragments {
                    for fragment in item.fragments() {
                        self.fragment_lines(out, fragment, 2);
                    }
                }
            }
        }
        out.push('\n');
    }

    /// Path matches with README adjacency annotations.
    fn paths_section(&self, out: &mut String, report: &SearchReport) {
        if report.paths.is_empty() {
            return;
        }
        for (alias, results) in &report.paths {
            if results.total_count() == 0 {
                continue;
            }
            let _ = writeln!(
                out,
                "Found {} {} in {}",
                results.total_count(),
                "path matches".bold(),
                alias.as_str().green()
            );
            for item in results.items() {
                let Some(path) = item.path() else { continue };
                let _ = writeln!(out, "  {}", path.magenta());
                for readme in report.readmes.readmes_under(alias, path) {
                    let _ = writeln!(out, "    has {} in {}", "README".bold(), readme.underlined());
                }
            }
        }
        out.push('\n');
    }

    fn item_lines(&self, out: &mut String, item: &Item, indent: usize) {
        let pad = "  ".repeat(indent);
        match item {
            Item::Issue(issue) => {
                let _ = writeln!(out, "{pad}#{} {}", issue.number, issue.title);
                let _ = writeln!(out, "{pad}  view: {}", issue.url.as_str().blue().underlined());
            }
            Item::Code(code) => {
                let _ = writeln!(out, "{pad}{}", code.path.as_str().magenta());
                let _ = writeln!(out, "{pad}  view: {}", code.url.as_str().blue().underlined());
            }
            Item::Path(path) => {
                let _ = writeln!(out, "{pad}{}", path.path.as_str().magenta());
            }
        }
        if self.options.fragments {
            for fragment in item.fragments() {
                self.fragment_lines(out, fragment, indent + 1);
            }
        }
    }

    fn fragment_lines(&self, out: &mut String, fragment: &Fragment, indent: usize) {
        let pad = "  ".repeat(indent);
        let tag = if fragment.origin.is_empty() {
            "match".to_string()
        } else {
            format!("match in {}", fragment.origin)
        };
        let _ = writeln!(out, "{pad}{}", tag.dark_grey());
        for line in fragment.text.lines() {
            let _ = writeln!(out, "{pad}  {}", line.dark_grey());
        }
    }

    fn render_tree(&self, report: &SearchReport) -> String {
        let mut root = Node::new(format!(
            "results for {}",
            format!("\"{}\"", report.query).bold()
        ));
        let flat: [(&ResultMap, &str); 5] = [
            (&report.issues, "issues"),
            (&report.pull_requests, "pull requests"),
            (&report.code, "code"),
            (&report.in_readme, "README matches"),
            (&report.docs, "documentation"),
        ];
        for (map, label) in flat {
            if let Some(node) = self.category_node(map, label, None) {
                root.child(node);
            }
        }
        if let Some(node) = self.category_node(&report.paths, "paths", Some(&report.readmes)) {
            root.child(node);
        }
        let mut out = String::new();
        root.draw(&mut out);
        out
    }

    fn category_node(
        &self,
        map: &ResultMap,
        label: &str,
        readmes: Option<&ReadmeIndex>,
    ) -> Option<Node> {
        let mut node = Node::new(label.bold().to_string());
        for (alias, results) in map {
            if results.total_count() == 0 {
                continue;
            }
            let mut alias_node = Node::new(format!(
                "{} ({})",
                alias.as_str().green(),
                results.total_count()
            ));
            if let Some(url) = results.query_url() {
                alias_node.child(Node::new(url.blue().underlined().to_string()));
            }
            for item in results.items() {
                alias_node.child(self.item_node(item, alias, readmes));
            }
            node.child(alias_node);
        }
        (!node.children.is_empty()).then_some(node)
    }

    fn item_node(&self, item: &Item, alias: &str, readmes: Option<&ReadmeIndex>) -> Node {
        let mut node = match item {
            Item::Issue(issue) => Node::new(format!("#{} {}", issue.number, issue.title)),
            Item::Code(code) => Node::new(code.path.as_str().magenta().to_string()),
            Item::Path(path) => Node::new(path.path.as_str().magenta().to_string()),
        };
        if let (Some(index), Some(path)) = (readmes, item.path()) {
            for readme in index.readmes_under(alias, path) {
                node.child(Node::new(format!(
                    "has {} in {}",
                    "README".bold(),
                    readme.underlined()
                )));
            }
        }
        if self.options.fragments {
            for fragment in item.fragments() {
                let label = if fragment.origin.is_empty() {
                    fragment.text.replace('\n', " ")
                } else {
                    format!("{}: {}", fragment.origin, fragment.text.replace('\n', " "))
                };
                node.child(Node::new(label.dark_grey().to_string()));
            }
        }
        node
    }
}

/// One line of tree output and its children.
struct Node {
    label: String,
    children: Vec<Node>,
}

impl Node {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    fn child(&mut self, node: Node) {
        self.children.push(node);
    }

    fn draw(&self, out: &mut String) {
        out.push_str(&self.label);
        out.push('\n');
        self.draw_children(out, "");
    }

    fn draw_children(&self, out: &mut String, prefix: &str) {
        let last = self.children.len().saturating_sub(1);
        for (i, child) in self.children.iter().enumerate() {
            let (tee, pad) = if i == last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            let _ = writeln!(out, "{prefix}{tee}{}", child.label);
            child.draw_children(out, &format!("{prefix}{pad}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{
        CodeRecord, IssueRecord, LocalResults, PathRecord, RemoteResults, SearchResults,
    };
    use std::path::Path;

    fn sample_report(fragments_present: bool) -> SearchReport {
        let mut report = SearchReport {
            query: "widget".to_string(),
            ..Default::default()
        };
        report.issues.insert(
            "widgets".to_string(),
            SearchResults::Remote(RemoteResults::new(
                "acme/widgets",
                "widget type:issue",
                2,
                vec![Item::Issue(IssueRecord {
                    number: 42,
                    title: "widget leaks".to_string(),
                    url: "https://github.com/acme/widgets/issues/42".to_string(),
                    fragments: if fragments_present {
                        vec![Fragment {
                            text: "the widget leaks memory".to_string(),
                            origin: "Issue".to_string(),
                        }]
                    } else {
                        Vec::new()
                    },
                })],
            )),
        );
        report.in_readme.insert(
            "widgets".to_string(),
            SearchResults::Remote(RemoteResults::new(
                "acme/widgets",
                "widget filename:README",
                1,
                vec![Item::Code(CodeRecord {
                    path: "docs/README".to_string(),
                    url: "https://github.com/acme/widgets/blob/master/docs/README".to_string(),
                    fragments: Vec::new(),
                })],
            )),
        );
        report.paths.insert(
            "widgets".to_string(),
            SearchResults::Local(LocalResults::new(vec![PathRecord::local(
                "src/widget",
                Path::new("/tmp/clone"),
                true,
            )])),
        );
        report
            .readmes
            .insert("widgets", vec!["src/widget/README.md".to_string()]);
        report
    }

    #[test]
    fn test_text_sections_and_counts() {
        let out = Renderer::new(RenderOptions::default()).render(&sample_report(false));
        assert!(out.contains("Found 2"));
        assert!(out.contains("issues"));
        assert!(out.contains("widgets"));
        assert!(out.contains("https://github.com/acme/widgets/search?q=widget%20type%3Aissue"));
        assert!(out.contains("docs/README"));
        assert!(out.contains("src/widget"));
    }

    #[test]
    fn test_text_adjacency_annotation() {
        let out = Renderer::new(RenderOptions::default()).render(&sample_report(false));
        assert!(out.contains("has"));
        assert!(out.contains("src/widget/README.md"));
    }

    #[test]
    fn test_fragments_only_when_enabled() {
        let report = sample_report(true);
        let without = Renderer::new(RenderOptions::default()).render(&report);
        assert!(!without.contains("the widget leaks memory"));
        let with = Renderer::new(RenderOptions {
            fragments: true,
            format: OutputFormat::Text,
        })
        .render(&report);
        assert!(with.contains("the widget leaks memory"));
        assert!(with.contains("Issue"));
    }

    #[test]
    fn test_zero_count_aliases_are_silent() {
        let mut report = SearchReport {
            query: "widget".to_string(),
            ..Default::default()
        };
        report.issues.insert(
            "widgets".to_string(),
            SearchResults::Remote(RemoteResults::new("acme/widgets", "widget type:issue", 0, vec![])),
        );
        let out = Renderer::new(RenderOptions::default()).render(&report);
        assert!(!out.contains("Found"));
        assert!(!out.contains("widgets"));
    }

    #[test]
    fn test_empty_report_renders_nothing() {
        let report = SearchReport::default();
        let out = Renderer::new(RenderOptions::default()).render(&report);
        assert!(out.is_empty());
    }

    #[test]
    fn test_tree_nests_alias_under_category() {
        let out = Renderer::new(RenderOptions {
            fragments: false,
            format: OutputFormat::Tree,
        })
        .render(&sample_report(false));
        assert!(out.contains("results for"));
        assert!(out.contains("\"widget\""));
        assert!(out.contains("└── ") || out.contains("├── "));
        assert!(out.contains("(2)"));
        assert!(out.contains("src/widget/README.md"));
    }
}
