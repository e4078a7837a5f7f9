//! Shared types produced by the walkers and consumed by site generation.
//!
//! Everything here is built fresh from the filesystem on every call and
//! serialized as-is into `manifest.json` by the `scan` command.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Ordered URL path segments identifying a document's place in the tree.
///
/// `guides/setup/install.md` under the content root has the slug
/// `["guides", "setup", "install"]` and the URL path `guides/setup/install`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(Vec<String>);

impl Slug {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Parse a `/`-separated URL path. Empty segments (leading, trailing or
    /// doubled slashes) are dropped.
    pub fn parse(path: &str) -> Self {
        Self(
            path.split('/')
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Final segment: the file stem or directory name.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// This slug extended by one segment.
    pub fn child(&self, segment: impl Into<String>) -> Slug {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Slug(segments)
    }

    /// Segments joined with `/`, no leading or trailing slash.
    pub fn url_path(&self) -> String {
        self.0.join("/")
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url_path())
    }
}

impl From<Vec<String>> for Slug {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&[&str]> for Slug {
    fn from(segments: &[&str]) -> Self {
        Self(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Slug {
    fn from(segments: [&str; N]) -> Self {
        Self(segments.iter().map(|s| s.to_string()).collect())
    }
}

/// One entry (directory or document) in the navigation tree.
///
/// `children` is `Some` exactly when `is_directory` is true; an empty
/// directory has `Some(vec![])`. Use [`DocNode::directory`] and
/// [`DocNode::file`] to keep the two in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocNode {
    /// First `# heading` of the document, or the formatted name.
    pub title: String,
    /// Length equals the node's depth below the content root.
    pub slug: Slug,
    /// Backing file or directory on disk.
    pub source_path: PathBuf,
    pub is_directory: bool,
    /// Directories first, then files; alphabetical within each group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DocNode>>,
}

impl DocNode {
    pub fn directory(title: String, slug: Slug, source_path: PathBuf, children: Vec<DocNode>) -> Self {
        Self {
            title,
            slug,
            source_path,
            is_directory: true,
            children: Some(children),
        }
    }

    pub fn file(title: String, slug: Slug, source_path: PathBuf) -> Self {
        Self {
            title,
            slug,
            source_path,
            is_directory: false,
            children: None,
        }
    }

    /// Children of a directory; empty for documents.
    pub fn children(&self) -> &[DocNode] {
        self.children.as_deref().unwrap_or_default()
    }
}

/// A resolved document: raw Markdown plus its derived title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocContent {
    /// Raw file contents, unrendered.
    pub content: String,
    /// Never empty: first level-1 heading or the formatted last slug segment.
    pub title: String,
    pub slug: Slug,
}

/// Aggregated metadata for one top-level content directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Display name (formatted directory name).
    pub name: String,
    /// Directory name; a single segment, not a path.
    pub slug: String,
    /// At most 150 characters plus `...` when truncated.
    pub description: String,
    /// Markdown files directly inside the directory (not recursive). Always > 0.
    pub file_count: usize,
    /// The directory's own modification time.
    pub last_modified: DateTime<Utc>,
    /// File the description was taken from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro_file: Option<String>,
}
