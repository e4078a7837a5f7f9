//! Shared test utilities for the treedocs test suite.
//!
//! Provides content-tree builders, tree lookups, and navigation shape
//! assertions that work with walker output (`DocNode`, `ProjectInfo`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let tree = build_tree(&docs_root(&tmp));
//!
//! assert_tree_shape(&tree, &[
//!     ("Guides", &["Advanced", "Configuration", "Installation Guide"]),
//!     ("Introduction", &[]),
//! ]);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::types::{DocNode, ProjectInfo, Slug};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

/// Markdown root inside a fixture copy (`content_root = "docs"`).
pub fn docs_root(tmp: &TempDir) -> PathBuf {
    tmp.path().join("docs")
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write a file at `rel` under `root`, creating parent directories.
pub fn write_doc(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

// =========================================================================
// Tree lookups (panic with a clear message on miss)
// =========================================================================

/// Titles of one tree level, in order.
pub fn node_titles(nodes: &[DocNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.title.as_str()).collect()
}

/// Find a node anywhere in the tree by its `/`-joined slug. Panics if absent.
pub fn find_node<'a>(nodes: &'a [DocNode], path: &str) -> &'a DocNode {
    let slug = Slug::parse(path);
    find_node_by_slug(nodes, &slug).unwrap_or_else(|| {
        let all: Vec<String> = flatten(nodes).iter().map(|n| n.slug.url_path()).collect();
        panic!("node '{path}' not found. Available: {all:?}")
    })
}

fn find_node_by_slug<'a>(nodes: &'a [DocNode], slug: &Slug) -> Option<&'a DocNode> {
    for node in nodes {
        if &node.slug == slug {
            return Some(node);
        }
        if let Some(found) = find_node_by_slug(node.children(), slug) {
            return Some(found);
        }
    }
    None
}

/// Every node in depth-first order.
pub fn flatten(nodes: &[DocNode]) -> Vec<&DocNode> {
    let mut out = Vec::new();
    for node in nodes {
        out.push(node);
        out.extend(flatten(node.children()));
    }
    out
}

/// Slugs of all document (non-directory) nodes, sorted.
pub fn document_slugs(nodes: &[DocNode]) -> Vec<Slug> {
    let mut slugs: Vec<Slug> = flatten(nodes)
        .into_iter()
        .filter(|n| !n.is_directory)
        .map(|n| n.slug.clone())
        .collect();
    slugs.sort();
    slugs
}

/// Find a project by slug. Panics if not found.
pub fn find_project<'a>(projects: &'a [ProjectInfo], slug: &str) -> &'a ProjectInfo {
    projects.iter().find(|p| p.slug == slug).unwrap_or_else(|| {
        let slugs: Vec<&str> = projects.iter().map(|p| p.slug.as_str()).collect();
        panic!("project '{slug}' not found. Available: {slugs:?}")
    })
}

// =========================================================================
// Shape assertions
// =========================================================================

/// Assert the top two levels of a tree.
///
/// Each entry is `(title, child titles)`. Use `&[]` for documents and empty
/// directories.
pub fn assert_tree_shape(nodes: &[DocNode], expected: &[(&str, &[&str])]) {
    let expected_titles: Vec<&str> = expected.iter().map(|(t, _)| *t).collect();
    assert_eq!(node_titles(nodes), expected_titles, "top-level titles mismatch");

    for ((title, children), node) in expected.iter().zip(nodes) {
        assert_eq!(
            node_titles(node.children()),
            children.to_vec(),
            "children of '{title}' mismatch"
        );
    }
}
