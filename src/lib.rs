//! # treedocs
//!
//! A static documentation site generator. Your filesystem is the data source:
//! directories become navigation sections, `.md` files become pages, and the
//! first `# Heading` of each file becomes its title.
//!
//! # Architecture: Scan, then Generate
//!
//! ```text
//! 1. Scan      docs/     →  Manifest        (tree, slugs, projects)
//! 2. Generate  Manifest  →  dist/           (final HTML site)
//! ```
//!
//! The scan manifest is plain serializable data; `treedocs scan` writes it
//! as JSON so the result can be inspected without building anything.
//! Generation re-reads each document through the content resolver, which is
//! the same code path a dynamic router would use, so a slug that appears in
//! the manifest is exactly a slug that renders.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Navigation tree builder and document path enumerator |
//! | [`content`] | Slug → document resolution, title extraction, traversal guards |
//! | [`projects`] | Top-level project summaries for the home page |
//! | [`generate`] | Renders the HTML site from the manifest using Maud |
//! | [`markdown`] | Markdown → HTML with copyable code blocks |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | Shared data types (`Slug`, `DocNode`, `DocContent`, `ProjectInfo`) |
//! | [`naming`] | Filename → title formatting and slug segment rules |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## Content Root Is Passed, Never Global
//!
//! Every walker and the resolver take the content root as an argument. Tests
//! point them at temp directories; the CLI derives the root from `--source`
//! and `content_root` in `config.toml`.
//!
//! ## Two Faces Per Operation
//!
//! Each filesystem operation has a `try_*` form that returns a typed error
//! and a plain form that logs the error and returns an empty result. Site
//! generation uses the plain forms: one unreadable file must not take down
//! the whole build.
//!
//! ## Deterministic Ordering
//!
//! Directories sort before documents and names compare case-insensitively,
//! with lowercase first when two names differ only in case. The same tree
//! always produces the same navigation, regardless of filesystem enumeration
//! order.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system. Interpolation is auto-escaped; rendered Markdown is the
//! only pre-escaped input, and the Markdown renderer escapes raw HTML and
//! drops link or image URLs with an unsafe scheme itself.

pub mod config;
pub mod content;
pub mod generate;
pub mod markdown;
pub mod naming;
pub mod output;
pub mod projects;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
