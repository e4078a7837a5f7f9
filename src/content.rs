//! Slug → document resolution.
//!
//! A slug maps to a file by joining its segments under the content root and
//! appending `.md` to the last one:
//!
//! ```text
//! ["guides", "setup", "install"]  →  <root>/guides/setup/install.md
//! ```
//!
//! Before anything is read, every segment must be a single plain path
//! component (see [`naming::is_safe_segment`]) and the canonicalized file must
//! still live under the canonicalized root. Anything else, including symlinks
//! pointing out of the tree, resolves as "not found".
//!
//! ## Titles
//!
//! A document declares its title with a level-1 heading on its own line
//! (`# Title`). The first such line wins. Without one, the last slug segment
//! is run through [`naming::format_title`].

use crate::naming::{self, format_title};
use crate::types::{DocContent, Slug};
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Empty slug")]
    EmptySlug,
    #[error("Invalid slug segment: {0:?}")]
    InvalidSegment(String),
    #[error("Document not found: {0}")]
    NotFound(Slug),
    #[error("Path escapes content root: {0}")]
    OutsideRoot(PathBuf),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    /// Errors a router should answer with a plain 404.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::EmptySlug | Self::InvalidSegment(_) | Self::NotFound(_) | Self::OutsideRoot(_)
        )
    }
}

/// `#`, at least one space or tab, then the title up to the end of the line.
///
/// Stricter than a bare `^#\s+(.+)$`: the title must start with a visible
/// character, so a whitespace-only `#   ` line is not a heading and the search
/// moves on. `\s` would also let the match run across a newline.
static H1_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#[ \t]+(\S.*?)\r?$").expect("heading pattern is valid"));

/// Text of the first level-1 heading line, if any.
pub fn extract_title(content: &str) -> Option<&str> {
    H1_HEADING
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Heading title, or `fallback_name` formatted for display.
pub fn derive_title(content: &str, fallback_name: &str) -> String {
    extract_title(content)
        .map(String::from)
        .unwrap_or_else(|| format_title(fallback_name))
}

/// Read a document as text. Invalid UTF-8 is replaced rather than rejected so
/// one badly encoded file cannot hide itself from navigation.
pub(crate) fn read_document(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Build the candidate path for a slug without touching the filesystem.
pub fn candidate_path(root: &Path, slug: &Slug) -> Result<PathBuf, ResolveError> {
    let (last, parents) = slug
        .segments()
        .split_last()
        .ok_or(ResolveError::EmptySlug)?;

    let mut path = root.to_path_buf();
    for segment in parents {
        if !naming::is_safe_segment(segment) {
            return Err(ResolveError::InvalidSegment(segment.clone()));
        }
        path.push(segment);
    }
    if !naming::is_safe_segment(last) {
        return Err(ResolveError::InvalidSegment(last.clone()));
    }
    path.push(naming::markdown_file_name(last));
    Ok(path)
}

/// Locate the file backing `slug`, verifying it exists and stays inside `root`.
///
/// Returns the canonical path of the document.
pub fn locate(root: &Path, slug: &Slug) -> Result<PathBuf, ResolveError> {
    let candidate = candidate_path(root, slug)?;

    let canonical = match fs::canonicalize(&candidate) {
        Ok(path) => path,
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
            return Err(ResolveError::NotFound(slug.clone()));
        }
        Err(source) => {
            return Err(ResolveError::Io {
                path: candidate,
                source,
            });
        }
    };
    let canonical_root = fs::canonicalize(root).map_err(|source| ResolveError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    if !canonical.starts_with(&canonical_root) {
        return Err(ResolveError::OutsideRoot(candidate));
    }
    if !canonical.is_file() {
        return Err(ResolveError::NotFound(slug.clone()));
    }
    Ok(canonical)
}

/// Resolve a slug to its document, propagating the reason on failure.
pub fn try_resolve_content(root: &Path, slug: &Slug) -> Result<DocContent, ResolveError> {
    let path = locate(root, slug)?;
    let content = read_document(&path).map_err(|source| ResolveError::Io {
        path: path.clone(),
        source,
    })?;
    // locate() rejects empty slugs, so a last segment always exists
    let fallback = slug.last().unwrap_or_default();
    let title = derive_title(&content, fallback);

    Ok(DocContent {
        content,
        title,
        slug: slug.clone(),
    })
}

/// Resolve a slug to its document, or `None` when there is nothing to show.
///
/// Every failure is logged and reported as absence; callers render their
/// standard not-found response.
pub fn resolve_content(root: &Path, slug: &Slug) -> Option<DocContent> {
    match try_resolve_content(root, slug) {
        Ok(doc) => Some(doc),
        Err(e) => {
            log_resolve_failure(slug, &e);
            None
        }
    }
}

/// Whether a document exists for `slug` (same rules as [`resolve_content`]).
pub fn doc_exists(root: &Path, slug: &Slug) -> bool {
    match locate(root, slug) {
        Ok(_) => true,
        Err(e) => {
            log_resolve_failure(slug, &e);
            false
        }
    }
}

/// Outcome of resolving every enumerated slug.
#[derive(Debug, Default)]
pub struct RoundTripReport {
    pub resolved: usize,
    pub failures: Vec<(Slug, ResolveError)>,
}

impl RoundTripReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Resolve each slug in `paths` against `root`.
///
/// Enumerated paths should always resolve; any failure points at a tree
/// that changed mid-scan or a walker/resolver disagreement.
pub fn check_round_trip(root: &Path, paths: &[Slug]) -> RoundTripReport {
    let mut report = RoundTripReport::default();
    for slug in paths {
        match try_resolve_content(root, slug) {
            Ok(_) => report.resolved += 1,
            Err(e) => {
                warn!(slug = %slug, error = %e, "enumerated path does not resolve");
                report.failures.push((slug.clone(), e));
            }
        }
    }
    report
}

fn log_resolve_failure(slug: &Slug, error: &ResolveError) {
    match error {
        ResolveError::NotFound(_) | ResolveError::EmptySlug => {
            debug!(slug = %slug, "no document for slug");
        }
        ResolveError::InvalidSegment(_) | ResolveError::OutsideRoot(_) => {
            warn!(slug = %slug, error = %error, "rejected slug");
        }
        ResolveError::Io { .. } => {
            warn!(slug = %slug, error = %error, "failed to read document");
        }
    }
}
