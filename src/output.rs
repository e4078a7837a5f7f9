//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (section, document, project) is its title and positional
//! index; filesystem paths are secondary context on indented `Source:` lines.
//! This makes the output readable as a table of contents while still letting
//! users trace each entry back to a file.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Documents
//! 001 Guides/
//!     Source: guides/
//!     001 Advanced/
//!         Source: guides/advanced/
//!         001 Writing Plugins
//!             Source: guides/advanced/plugins.md
//!     002 Configuration
//!         Source: guides/configuration.md
//! 002 Faq
//!     Source: faq.md
//!
//! Projects
//! 001 Guides (2 documents)
//!     Intro: configuration.md
//!     Settings live in a `config.toml` next to the docs folder.
//!
//! Config
//!     config.toml
//!
//! Found 9 documents, 2 projects
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! Docs → docs/index.html
//! 001 Guides/
//!     001 Installation → docs/guides/installation/index.html
//! Not found → 404.html
//!
//! Generated 9 document pages, 2 project cards
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::content::RoundTripReport;
use crate::generate::{GenerateReport, doc_page_path};
use crate::scan::Manifest;
use crate::types::{DocContent, DocNode};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title. Sections get a
/// trailing slash so they read like directories.
///
/// ```text
/// 001 Guides/
/// 002 Getting Started
/// ```
fn entity_header(index: usize, node: &DocNode) -> String {
    let marker = if node.is_directory { "/" } else { "" };
    format!("{} {}{}", format_index(index), node.title, marker)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Path of a node relative to the content root, with `/` separators.
fn relative_source(node: &DocNode, content_root: &Path) -> String {
    let rel = node
        .source_path
        .strip_prefix(content_root)
        .unwrap_or(&node.source_path);
    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if node.is_directory {
        format!("{}/", joined)
    } else {
        joined
    }
}

// ============================================================================
// Tree walker
// ============================================================================

/// A flattened node from walking the navigation tree.
struct TreeNode<'a> {
    depth: usize,
    position: usize,
    node: &'a DocNode,
}

/// Walk the navigation tree, assigning positional indices per sibling level.
/// Returns a flat list of nodes with depth and position for formatting.
fn walk_nav_tree(nav: &[DocNode]) -> Vec<TreeNode<'_>> {
    let mut nodes = Vec::new();
    walk_nav_tree_recursive(nav, 0, &mut nodes);
    nodes
}

fn walk_nav_tree_recursive<'a>(items: &'a [DocNode], depth: usize, nodes: &mut Vec<TreeNode<'a>>) {
    for (i, item) in items.iter().enumerate() {
        nodes.push(TreeNode {
            depth,
            position: i + 1,
            node: item,
        });
        walk_nav_tree_recursive(item.children(), depth + 1, nodes);
    }
}

// ============================================================================
// Scan output
// ============================================================================

/// Format scan output: the document tree, projects, and config files.
///
/// `source_root` is the directory holding `config.toml`.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = vec!["Documents".to_string()];

    if manifest.navigation.is_empty() {
        lines.push("    (none)".to_string());
    }
    for tree_node in walk_nav_tree(&manifest.navigation) {
        let base_indent = indent(tree_node.depth);
        lines.push(format!(
            "{}{}",
            base_indent,
            entity_header(tree_node.position, tree_node.node)
        ));
        lines.push(format!(
            "{}    Source: {}",
            base_indent,
            relative_source(tree_node.node, &manifest.content_root)
        ));
    }

    if !manifest.projects.is_empty() {
        lines.push(String::new());
        lines.push("Projects".to_string());
        for (i, project) in manifest.projects.iter().enumerate() {
            lines.push(format!(
                "{} {} ({})",
                format_index(i + 1),
                project.name,
                plural(project.file_count, "document")
            ));
            if let Some(intro) = &project.intro_file {
                lines.push(format!("    Intro: {}", intro));
            }
            lines.push(format!("    {}", truncate_desc(&project.description, 60)));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push("    config.toml".to_string());
    } else {
        lines.push("    (defaults)".to_string());
    }

    lines.push(String::new());
    lines.push(format!(
        "Found {}, {}",
        plural(manifest.paths.len(), "document"),
        plural(manifest.projects.len(), "project")
    ));
    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format build output showing generated HTML files.
///
/// Documents follow the navigation tree, each followed by `→` and the output
/// path. Skipped documents are listed separately.
pub fn format_generate_output(manifest: &Manifest, report: &GenerateReport) -> Vec<String> {
    let mut lines = vec![
        "Home \u{2192} index.html".to_string(),
        "Docs \u{2192} docs/index.html".to_string(),
    ];

    for tree_node in walk_nav_tree(&manifest.navigation) {
        let base_indent = indent(tree_node.depth);
        let header = entity_header(tree_node.position, tree_node.node);
        if tree_node.node.is_directory {
            lines.push(format!("{}{}", base_indent, header));
            continue;
        }
        let page = doc_page_path(&tree_node.node.slug);
        if report.pages.contains(&page) {
            lines.push(format!(
                "{}{} \u{2192} {}",
                base_indent,
                header,
                display_path(&page)
            ));
        } else {
            lines.push(format!("{}{} (skipped)", base_indent, header));
        }
    }
    lines.push("Not found \u{2192} 404.html".to_string());

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for slug in &report.skipped {
            lines.push(format!("    {}", slug));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}",
        plural(report.document_pages(), "document page"),
        plural(report.projects, "project card")
    ));
    lines
}

/// Print build output to stdout.
pub fn print_generate_output(manifest: &Manifest, report: &GenerateReport) {
    for line in format_generate_output(manifest, report) {
        println!("{}", line);
    }
}

fn display_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

// ============================================================================
// Check / show output
// ============================================================================

/// Format the round-trip check result.
pub fn format_check_output(report: &RoundTripReport) -> Vec<String> {
    let mut lines = Vec::new();
    for (slug, error) in &report.failures {
        lines.push(format!("FAIL {}", slug));
        lines.push(format!("    {}", error));
    }
    if report.is_ok() {
        lines.push(format!(
            "All {} resolve",
            plural(report.resolved, "document")
        ));
    } else {
        lines.push(format!(
            "{} of {} failed to resolve",
            plural(report.failures.len(), "document"),
            report.resolved + report.failures.len()
        ));
    }
    lines
}

/// Print check output to stdout.
pub fn print_check_output(report: &RoundTripReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

/// Format a resolved document summary.
pub fn format_show_output(doc: &DocContent) -> Vec<String> {
    vec![
        doc.title.clone(),
        format!("    Slug: {}", doc.slug),
        format!("    Size: {} bytes", doc.content.len()),
    ]
}

/// Print a resolved document summary to stdout.
pub fn print_show_output(doc: &DocContent) {
    for line in format_show_output(doc) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ResolveError;
    use crate::scan::scan;
    use crate::test_helpers::*;
    use crate::types::Slug;
    use std::path::PathBuf;
    use tempfile::TempDir;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(1), "    ");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn truncate_desc_short() {
        assert_eq!(truncate_desc("hello", 10), "hello");
    }

    #[test]
    fn truncate_desc_long() {
        assert_eq!(truncate_desc("hello world", 5), "hello...");
    }

    #[test]
    fn truncate_desc_multibyte() {
        assert_eq!(truncate_desc("héllo wörld", 7), "héllo w...");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "document"), "1 document");
        assert_eq!(plural(0, "document"), "0 documents");
        assert_eq!(plural(3, "project"), "3 projects");
    }

    #[test]
    fn entity_header_marks_directories() {
        let dir = DocNode::directory("Guides".into(), Slug::parse("guides"), PathBuf::from("guides"), vec![]);
        let file = DocNode::file("Faq".into(), Slug::parse("faq"), PathBuf::from("faq.md"));
        assert_eq!(entity_header(1, &dir), "001 Guides/");
        assert_eq!(entity_header(2, &file), "002 Faq");
    }

    #[test]
    fn walk_nav_tree_assigns_positions_per_level() {
        let tmp = setup_fixtures();
        let tree = crate::scan::build_tree(&docs_root(&tmp));
        let nodes = walk_nav_tree(&tree);

        let guides = &nodes[0];
        assert_eq!((guides.depth, guides.position, guides.node.title.as_str()), (0, 1, "Guides"));
        let advanced = &nodes[1];
        assert_eq!((advanced.depth, advanced.position), (1, 1));
        assert_eq!(nodes.len(), flatten(&tree).len());
    }

    // =========================================================================
    // Scan output
    // =========================================================================

    #[test]
    fn scan_output_lists_tree_with_sources() {
        let tmp = setup_fixtures();
        let manifest = scan(&docs_root(&tmp));
        let lines = format_scan_output(&manifest, tmp.path());

        assert_eq!(lines[0], "Documents");
        assert_eq!(lines[1], "001 Guides/");
        assert_eq!(lines[2], "    Source: guides/");
        assert!(lines.contains(&"        001 Writing Plugins".to_string()));
        assert!(lines.contains(&"            Source: guides/advanced/plugins.md".to_string()));
        assert!(lines.contains(&"    config.toml".to_string()));
        assert_eq!(lines.last().unwrap(), "Found 9 documents, 2 projects");
    }

    #[test]
    fn scan_output_lists_projects() {
        let tmp = setup_fixtures();
        let manifest = scan(&docs_root(&tmp));
        let lines = format_scan_output(&manifest, tmp.path());

        let start = lines.iter().position(|l| l == "Projects").unwrap();
        assert!(lines[start + 1].starts_with("001 "));
        assert!(lines.iter().any(|l| l == "    Intro: README.md"));
    }

    #[test]
    fn scan_output_empty_root() {
        let tmp = TempDir::new().unwrap();
        let manifest = scan(&tmp.path().join("missing"));
        let lines = format_scan_output(&manifest, tmp.path());

        assert_eq!(lines[1], "    (none)");
        assert!(lines.contains(&"    (defaults)".to_string()));
        assert!(!lines.contains(&"Projects".to_string()));
        assert_eq!(lines.last().unwrap(), "Found 0 documents, 0 projects");
    }

    // =========================================================================
    // Build output
    // =========================================================================

    #[test]
    fn generate_output_maps_documents_to_pages() {
        let tmp = setup_fixtures();
        let manifest = scan(&docs_root(&tmp));
        let report = GenerateReport {
            output_dir: PathBuf::from("dist"),
            pages: vec![PathBuf::from("docs/guides/installation/index.html")],
            skipped: vec![Slug::parse("faq")],
            projects: 2,
        };
        let lines = format_generate_output(&manifest, &report);

        assert_eq!(lines[0], "Home \u{2192} index.html");
        assert!(lines.iter().any(|l| l
            == "    003 Installation Guide \u{2192} docs/guides/installation/index.html"));
        assert!(lines.iter().any(|l| l.ends_with("Faq (skipped)")));
        assert!(lines.contains(&"Skipped".to_string()));
        assert_eq!(lines.last().unwrap(), "Generated 1 document page, 2 project cards");
    }

    // =========================================================================
    // Check / show output
    // =========================================================================

    #[test]
    fn check_output_all_resolved() {
        let report = RoundTripReport {
            resolved: 9,
            failures: vec![],
        };
        assert_eq!(format_check_output(&report), vec!["All 9 documents resolve"]);
    }

    #[test]
    fn check_output_lists_failures() {
        let report = RoundTripReport {
            resolved: 2,
            failures: vec![(Slug::parse("a/b"), ResolveError::NotFound(Slug::parse("a/b")))],
        };
        let lines = format_check_output(&report);
        assert_eq!(lines[0], "FAIL a/b");
        assert_eq!(lines.last().unwrap(), "1 document of 3 failed to resolve");
    }

    #[test]
    fn show_output_summarises_document() {
        let doc = DocContent {
            content: "# Hi\n".to_string(),
            title: "Hi".to_string(),
            slug: Slug::parse("guides/hi"),
        };
        assert_eq!(
            format_show_output(&doc),
            vec!["Hi", "    Slug: guides/hi", "    Size: 5 bytes"]
        );
    }
}
