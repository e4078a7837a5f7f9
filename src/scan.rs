//! Filesystem scanning: navigation tree and document enumeration.
//!
//! Walks the content root (the Markdown directory, not the source root that
//! holds `config.toml`) and produces the structures site generation consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! docs/                            # Content root
//! ├── introduction.md              # Document → slug ["introduction"]
//! ├── getting-started.md
//! ├── guides/                      # Directory → navigation group
//! │   ├── installation.md          # → ["guides", "installation"]
//! │   └── advanced/
//! │       └── plugins.md           # → ["guides", "advanced", "plugins"]
//! ├── reference/
//! │   └── README.md
//! ├── notes.txt                    # Not Markdown: ignored
//! └── .drafts/                     # Hidden: ignored
//! ```
//!
//! ## Ordering
//!
//! At every level directories come before documents, and each group is
//! sorted by name case-insensitively (ties broken by exact byte order).
//! Filesystem enumeration order never leaks into the output, so repeated
//! scans of an unchanged tree are identical.
//!
//! ## Failure Policy
//!
//! [`try_build_tree`] and [`try_enumerate_paths`] propagate the first I/O
//! error. [`build_tree`] and [`enumerate_paths`] log it and return an empty
//! result: navigation is all-or-nothing. A missing content root is not an
//! error, just an empty site. A document whose title cannot be read keeps its
//! formatted filename as title.
//!
//! Symlinks are not followed.

use crate::content::{derive_title, read_document};
use crate::naming::{format_title, is_hidden, markdown_stem};
use crate::projects;
use crate::types::{DocNode, ProjectInfo, Slug};
use serde::Serialize;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl ScanError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Everything the walkers know about a content root.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub content_root: PathBuf,
    pub navigation: Vec<DocNode>,
    pub paths: Vec<Slug>,
    pub projects: Vec<ProjectInfo>,
}

/// Run every walker against `root`. Never fails; see module docs.
pub fn scan(root: &Path) -> Manifest {
    Manifest {
        content_root: root.to_path_buf(),
        navigation: build_tree(root),
        paths: enumerate_paths(root),
        projects: projects::aggregate_projects(root),
    }
}

// ============================================================================
// Tree builder
// ============================================================================

#[derive(Debug)]
enum EntryKind {
    Directory,
    Document { stem: String },
}

#[derive(Debug)]
struct Entry {
    name: String,
    path: PathBuf,
    kind: EntryKind,
}

/// Build the navigation tree, or an empty tree if anything goes wrong.
pub fn build_tree(root: &Path) -> Vec<DocNode> {
    try_build_tree(root).unwrap_or_else(|e| {
        warn!(root = %root.display(), error = %e, "failed to build docs tree");
        Vec::new()
    })
}

/// Build the navigation tree, propagating traversal errors.
pub fn try_build_tree(root: &Path) -> Result<Vec<DocNode>, ScanError> {
    if !root.exists() {
        debug!(root = %root.display(), "content root missing, empty tree");
        return Ok(Vec::new());
    }
    build_level(root, &Slug::default())
}

fn build_level(dir: &Path, parent: &Slug) -> Result<Vec<DocNode>, ScanError> {
    list_entries(dir)?
        .into_iter()
        .map(|entry| build_node(entry, parent))
        .collect()
}

fn build_node(entry: Entry, parent: &Slug) -> Result<DocNode, ScanError> {
    match entry.kind {
        EntryKind::Directory => {
            let slug = parent.child(entry.name.as_str());
            let children = build_level(&entry.path, &slug)?;
            Ok(DocNode::directory(
                format_title(&entry.name),
                slug,
                entry.path,
                children,
            ))
        }
        EntryKind::Document { stem } => {
            let title = match read_document(&entry.path) {
                Ok(content) => derive_title(&content, &stem),
                Err(e) => {
                    warn!(path = %entry.path.display(), error = %e, "failed to read document title");
                    format_title(&stem)
                }
            };
            Ok(DocNode::file(title, parent.child(stem), entry.path))
        }
    }
}

/// List the visible directories and Markdown files of one directory, in
/// navigation order.
fn list_entries(dir: &Path) -> Result<Vec<Entry>, ScanError> {
    let mut entries = Vec::new();
    for dir_entry in fs::read_dir(dir).map_err(|e| ScanError::io(dir, e))? {
        let dir_entry = dir_entry.map_err(|e| ScanError::io(dir, e))?;
        let path = dir_entry.path();
        let Ok(name) = dir_entry.file_name().into_string() else {
            debug!(path = %path.display(), "skipping non UTF-8 name");
            continue;
        };
        if is_hidden(&name) {
            continue;
        }
        let file_type = dir_entry.file_type().map_err(|e| ScanError::io(&path, e))?;
        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file()
            && let Some(stem) = markdown_stem(&name)
        {
            EntryKind::Document {
                stem: stem.to_string(),
            }
        } else {
            continue;
        };
        entries.push(Entry { name, path, kind });
    }

    entries.sort_by(|a, b| {
        let a_is_dir = matches!(a.kind, EntryKind::Directory);
        let b_is_dir = matches!(b.kind, EntryKind::Directory);
        b_is_dir
            .cmp(&a_is_dir)
            .then_with(|| compare_names(&a.name, &b.name))
    });
    Ok(entries)
}

/// Case-insensitive name order, so the result is a total order independent
/// of the filesystem. Names equal up to case put lowercase first.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

// ============================================================================
// Path enumerator
// ============================================================================

/// Slugs of every document under `root`, or none if anything goes wrong.
pub fn enumerate_paths(root: &Path) -> Vec<Slug> {
    try_enumerate_paths(root).unwrap_or_else(|e| {
        warn!(root = %root.display(), error = %e, "failed to enumerate doc paths");
        Vec::new()
    })
}

/// Slugs of every document under `root`, sorted, propagating walk errors.
///
/// Hidden and non UTF-8 entries are pruned together with everything below
/// them, matching what [`build_tree`] shows.
pub fn try_enumerate_paths(root: &Path) -> Result<Vec<Slug>, ScanError> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            // the root itself may live somewhere hidden (e.g. a temp dir)
            e.depth() == 0 || e.file_name().to_str().is_some_and(|name| !is_hidden(name))
        });

    let mut slugs = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(stem) = entry.file_name().to_str().and_then(markdown_stem) else {
            continue;
        };
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let mut segments: Vec<String> = rel
            .parent()
            .into_iter()
            .flat_map(|p| p.components())
            .filter_map(|c| c.as_os_str().to_str().map(String::from))
            .collect();
        segments.push(stem.to_string());
        slugs.push(Slug::new(segments));
    }

    slugs.sort();
    Ok(slugs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    // =========================================================================
    // Tree shape and ordering
    // =========================================================================

    #[test]
    fn fixture_tree_shape() {
        let tmp = setup_fixtures();
        let tree = build_tree(&docs_root(&tmp));

        assert_tree_shape(
            &tree,
            &[
                ("Guides", &["Advanced", "Configuration", "Installation Guide"]),
                ("Reference", &["Api Overview", "Command Line", "Reference"]),
                ("Faq", &[]),
                ("Getting Started", &[]),
                ("Introduction", &[]),
            ],
        );
    }

    #[test]
    fn directories_before_files() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "aaa.md", "# A");
        write_doc(tmp.path(), "zzz/inner.md", "# Inner");

        let tree = build_tree(tmp.path());
        assert_eq!(node_titles(&tree), vec!["Zzz", "A"]);
        assert!(tree[0].is_directory);
        assert!(!tree[1].is_directory);
    }

    #[test]
    fn names_sorted_case_insensitively() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "beta.md", "");
        write_doc(tmp.path(), "Alpha.md", "");
        write_doc(tmp.path(), "gamma.md", "");

        let tree = build_tree(tmp.path());
        let names: Vec<&str> = tree.iter().filter_map(|n| n.slug.last()).collect();
        assert_eq!(names, vec!["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn lowercase_name_sorts_before_capitalized_twin() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "Readme.md", "");
        write_doc(tmp.path(), "readme.md", "");

        let tree = build_tree(tmp.path());
        let names: Vec<&str> = tree.iter().filter_map(|n| n.slug.last()).collect();
        assert_eq!(names, vec!["readme", "Readme"]);
    }

    #[test]
    fn compare_names_is_total() {
        assert_eq!(compare_names("a", "B"), Ordering::Less);
        assert_eq!(compare_names("B", "a"), Ordering::Greater);
        assert_eq!(compare_names("readme", "Readme"), Ordering::Less);
        assert_eq!(compare_names("Readme", "readme"), Ordering::Greater);
        assert_eq!(compare_names("x", "x"), Ordering::Equal);
    }

    #[test]
    fn slug_length_matches_depth() {
        let tmp = setup_fixtures();
        let tree = build_tree(&docs_root(&tmp));

        fn check(nodes: &[DocNode], depth: usize) {
            for node in nodes {
                assert_eq!(node.slug.len(), depth, "slug {} at depth {depth}", node.slug);
                check(node.children(), depth + 1);
            }
        }
        check(&tree, 1);
    }

    #[test]
    fn file_slug_drops_extension() {
        let tmp = setup_fixtures();
        let tree = build_tree(&docs_root(&tmp));

        let plugins = find_node(&tree, "guides/advanced/plugins");
        assert_eq!(plugins.slug, Slug::from(["guides", "advanced", "plugins"]));
        assert_eq!(plugins.title, "Writing Plugins");
        assert!(plugins.source_path.ends_with("guides/advanced/plugins.md"));
        assert!(plugins.children.is_none());
    }

    #[test]
    fn file_title_falls_back_to_filename() {
        let tmp = setup_fixtures();
        let tree = build_tree(&docs_root(&tmp));

        assert_eq!(find_node(&tree, "faq").title, "Faq");
        assert_eq!(find_node(&tree, "reference/api-overview").title, "Api Overview");
    }

    #[test]
    fn directory_title_is_formatted_name() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "user-guide/start.md", "# Start");

        let tree = build_tree(tmp.path());
        assert_eq!(tree[0].title, "User Guide");
    }

    #[test]
    fn empty_directory_has_empty_children() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("empty")).unwrap();

        let tree = build_tree(tmp.path());
        assert_eq!(tree.len(), 1);
        assert!(tree[0].is_directory);
        assert_eq!(tree[0].children, Some(vec![]));
    }

    #[test]
    fn non_markdown_and_hidden_entries_skipped() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "notes.txt", "text");
        write_doc(tmp.path(), "upper.MD", "# Upper");
        write_doc(tmp.path(), ".hidden.md", "# Hidden");
        write_doc(tmp.path(), ".git/HEAD.md", "# Git");
        write_doc(tmp.path(), "page.md", "# Page");

        let tree = build_tree(tmp.path());
        assert_eq!(node_titles(&tree), vec!["Page"]);
    }

    #[test]
    fn missing_root_yields_empty_tree() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing");
        assert!(build_tree(&missing).is_empty());
        assert!(try_build_tree(&missing).unwrap().is_empty());
    }

    #[test]
    fn empty_root_yields_empty_everything() {
        let tmp = TempDir::new().unwrap();
        let manifest = scan(tmp.path());
        assert!(manifest.navigation.is_empty());
        assert!(manifest.paths.is_empty());
        assert!(manifest.projects.is_empty());
    }

    #[test]
    fn root_that_is_a_file_degrades_to_empty() {
        let tmp = TempDir::new().unwrap();
        let file = write_doc(tmp.path(), "root.md", "# Not a dir");

        assert!(try_build_tree(&file).is_err());
        assert!(build_tree(&file).is_empty());
        assert!(enumerate_paths(&file).is_empty());
    }

    #[test]
    fn tree_is_idempotent() {
        let tmp = setup_fixtures();
        let root = docs_root(&tmp);
        assert_eq!(build_tree(&root), build_tree(&root));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_not_followed() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("docs");
        write_doc(&root, "real.md", "# Real");
        write_doc(tmp.path(), "outside/secret.md", "# Secret");
        std::os::unix::fs::symlink(tmp.path().join("outside"), root.join("linked")).unwrap();

        let tree = build_tree(&root);
        assert_eq!(node_titles(&tree), vec!["Real"]);
        assert_eq!(enumerate_paths(&root), vec![Slug::from(["real"])]);
    }

    // =========================================================================
    // Path enumeration
    // =========================================================================

    #[test]
    fn enumerates_all_fixture_documents() {
        let tmp = setup_fixtures();
        let paths = enumerate_paths(&docs_root(&tmp));

        let as_strings: Vec<String> = paths.iter().map(Slug::url_path).collect();
        assert_eq!(
            as_strings,
            vec![
                "faq",
                "getting-started",
                "guides/advanced/plugins",
                "guides/configuration",
                "guides/installation",
                "introduction",
                "reference/README",
                "reference/api-overview",
                "reference/cli",
            ]
        );
    }

    #[test]
    fn enumeration_matches_tree_documents() {
        let tmp = setup_fixtures();
        let root = docs_root(&tmp);
        write_doc(&root, ".drafts/wip.md", "# WIP");
        write_doc(&root, "guides/notes.txt", "skip me");

        assert_eq!(enumerate_paths(&root), document_slugs(&build_tree(&root)));
    }

    #[test]
    fn enumeration_missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(enumerate_paths(&tmp.path().join("missing")).is_empty());
    }

    #[test]
    fn enumeration_skips_empty_directories() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("a/b/c")).unwrap();
        write_doc(tmp.path(), "a/doc.md", "");

        assert_eq!(enumerate_paths(tmp.path()), vec![Slug::from(["a", "doc"])]);
    }

    #[test]
    fn manifest_serializes_to_json() {
        let tmp = setup_fixtures();
        let manifest = scan(&docs_root(&tmp));
        let json = serde_json::to_value(&manifest).unwrap();

        assert_eq!(json["navigation"][0]["title"], "Guides");
        assert_eq!(json["paths"].as_array().unwrap().len(), 9);
        assert_eq!(json["projects"].as_array().unwrap().len(), 2);
    }
}
