//! Project aggregation for the home page.
//!
//! Every visible top-level directory of the content root is a *project*. A
//! project summarises the Markdown files sitting directly inside it:
//!
//! ```text
//! docs/
//! ├── guides/                # project "Guides"
//! │   ├── README.md          # intro file (first match in INTRO_CANDIDATES)
//! │   ├── install.md         # counted
//! │   └── advanced/          # not counted: file_count is non-recursive
//! │       └── plugins.md
//! ├── assets/                # no Markdown directly inside → not a project
//! │   └── logo.png
//! └── changelog.md           # root files are never projects
//! ```
//!
//! The description is the first non-empty line of the intro file that is not
//! a heading, capped at [`DESCRIPTION_MAX_CHARS`] characters. Projects are
//! ordered most recently modified first, using the directory's own mtime.

use crate::content::read_document;
use crate::naming::{format_title, is_hidden, markdown_stem};
use crate::scan::compare_names;
use crate::types::ProjectInfo;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Canonical intro file names, highest priority first.
pub const INTRO_CANDIDATES: &[&str] = &[
    "index.md",
    "README.md",
    "readme.md",
    "introduction.md",
    "overview.md",
    "getting-started.md",
];

pub const DESCRIPTION_MAX_CHARS: usize = 150;

const ELLIPSIS: &str = "...";

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProjectError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// All projects under `root`, newest first; empty if the root can't be listed.
pub fn aggregate_projects(root: &Path) -> Vec<ProjectInfo> {
    try_aggregate_projects(root).unwrap_or_else(|e| {
        warn!(root = %root.display(), error = %e, "failed to aggregate projects");
        Vec::new()
    })
}

/// All projects under `root`, newest first.
///
/// Only a failure to list `root` itself is returned. A project directory that
/// can't be listed is skipped; an intro file that can't be read gets the
/// fallback description.
pub fn try_aggregate_projects(root: &Path) -> Result<Vec<ProjectInfo>, ProjectError> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut projects = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| ProjectError::io(root, e))? {
        let entry = entry.map_err(|e| ProjectError::io(root, e))?;
        let path = entry.path();
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if is_hidden(&name) || !entry.file_type().is_ok_and(|t| t.is_dir()) {
            continue;
        }

        match build_project(&path, &name) {
            Ok(Some(project)) => projects.push(project),
            Ok(None) => debug!(dir = %path.display(), "no markdown files, not a project"),
            Err(e) => warn!(dir = %path.display(), error = %e, "skipping project"),
        }
    }

    sort_projects(&mut projects);
    Ok(projects)
}

/// Newest first; equal timestamps fall back to slug order so output is stable.
pub fn sort_projects(projects: &mut [ProjectInfo]) {
    projects.sort_by(|a, b| {
        b.last_modified
            .cmp(&a.last_modified)
            .then_with(|| a.slug.cmp(&b.slug))
    });
}

fn build_project(dir: &Path, name: &str) -> Result<Option<ProjectInfo>, ProjectError> {
    let files = markdown_files(dir)?;
    let Some(intro) = select_intro(&files) else {
        return Ok(None);
    };

    let display_name = format_title(name);
    let description = project_description(&dir.join(intro), &display_name);
    let last_modified = modified_time(dir);

    Ok(Some(ProjectInfo {
        name: display_name,
        slug: name.to_string(),
        description,
        file_count: files.len(),
        last_modified,
        intro_file: Some(intro.to_string()),
    }))
}

/// Description from the intro file, or the fallback when it has none or
/// can't be read.
fn project_description(intro_path: &Path, display_name: &str) -> String {
    match read_document(intro_path) {
        Ok(content) => extract_description(&content),
        Err(e) => {
            warn!(path = %intro_path.display(), error = %e, "failed to read intro file");
            None
        }
    }
    .unwrap_or_else(|| fallback_description(display_name))
}

/// Directory mtime in UTC; the Unix epoch when it can't be read.
fn modified_time(dir: &Path) -> DateTime<Utc> {
    fs::metadata(dir)
        .and_then(|m| m.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|e| {
            warn!(dir = %dir.display(), error = %e, "no modification time");
            DateTime::<Utc>::from(std::time::UNIX_EPOCH)
        })
}

/// Names of the Markdown files directly inside `dir`, in navigation order.
fn markdown_files(dir: &Path) -> Result<Vec<String>, ProjectError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| ProjectError::io(dir, e))? {
        let entry = entry.map_err(|e| ProjectError::io(dir, e))?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if is_hidden(&name) || markdown_stem(&name).is_none() {
            continue;
        }
        if entry.file_type().is_ok_and(|t| t.is_file()) {
            files.push(name);
        }
    }
    files.sort_by(|a, b| compare_names(a, b));
    Ok(files)
}

/// First candidate present in `files`, else the first file.
pub fn select_intro(files: &[String]) -> Option<&str> {
    INTRO_CANDIDATES
        .iter()
        .copied()
        .find(|candidate| files.iter().any(|f| f == candidate))
        .or_else(|| files.first().map(String::as_str))
}

/// First non-empty, non-heading line, trimmed and truncated.
pub fn extract_description(content: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .map(truncate_description)
}

/// Keep at most [`DESCRIPTION_MAX_CHARS`] characters, marking a cut with `...`.
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(DESCRIPTION_MAX_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

fn fallback_description(display_name: &str) -> String {
    format!("Documentation for {display_name}")
}
