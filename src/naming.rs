//! Centralized filename handling for the content tree.
//!
//! Every walker and the resolver agree on three things, all defined here:
//!
//! - **Which entries count**: names starting with `.` are hidden and skipped.
//! - **What a document is**: a file whose name ends in exactly `.md`; the
//!   stem (name minus `.md`) becomes the final slug segment.
//! - **How names display**: [`format_title`] turns `getting-started` into
//!   `Getting Started`.
//!
//! ## Display Titles
//!
//! Hyphens become spaces, then the first letter of every word is uppercased.
//! A word is a run of alphanumeric characters or underscores, so
//! `api_reference` stays one word (`Api_reference`) while `v2.0-notes`
//! becomes `V2.0 Notes`. Everything else is left untouched:
//! - `getting-started` → "Getting Started"
//! - `FAQ` → "FAQ"
//! - `01-setup` → "01 Setup"

use std::ffi::OsStr;
use std::path::{Component, Path};

/// File extension (without the dot) that marks a document.
pub const MARKDOWN_EXTENSION: &str = "md";

const MARKDOWN_SUFFIX: &str = ".md";

/// Convert a raw file or folder name into a human-readable label.
pub fn format_title(name: &str) -> String {
    let mut title = String::with_capacity(name.len());
    let mut prev_is_word = false;
    for c in name.chars() {
        let c = if c == '-' { ' ' } else { c };
        let is_word = c.is_alphanumeric() || c == '_';
        if is_word && !prev_is_word {
            title.extend(c.to_uppercase());
        } else {
            title.push(c);
        }
        prev_is_word = is_word;
    }
    title
}

/// Hidden entries (dotfiles, `.git/`, editor swap files) never appear in
/// navigation and can never be resolved.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Return the document stem for a Markdown file name, or `None` if the name
/// is not a document.
///
/// - `"intro.md"` → `Some("intro")`
/// - `"notes.MD"` → `None` (the resolver appends lowercase `.md`)
/// - `".md"` → `None`
pub fn markdown_stem(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(MARKDOWN_SUFFIX)
        .filter(|stem| !stem.is_empty())
}

/// Append the Markdown extension to a slug segment.
pub fn markdown_file_name(stem: &str) -> String {
    format!("{stem}{MARKDOWN_SUFFIX}")
}

/// Whether a slug segment can be joined onto the content root without
/// escaping it.
///
/// A safe segment is a single plain path component: not empty, not hidden
/// (which also rules out `.` and `..`), no separators of either platform,
/// no NUL, and no prefix/root component.
pub fn is_safe_segment(segment: &str) -> bool {
    if segment.is_empty()
        || is_hidden(segment)
        || segment.contains(['/', '\\', '\0'])
    {
        return false;
    }
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(c)), None) if c == OsStr::new(segment)
    )
}
