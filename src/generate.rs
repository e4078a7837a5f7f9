//! HTML site generation.
//!
//! Takes the scan [`Manifest`] and renders the final static site. Document
//! bodies are re-read through the content resolver at render time, so a
//! page always reflects the file on disk rather than a cached copy.
//!
//! ## Generated Pages
//!
//! - **Home page** (`/index.html`): site title, "Browse Documentation" link,
//!   and one card per top-level project
//! - **Docs index** (`/docs/index.html`): the root `introduction` document, or
//!   a built-in welcome page when there is none
//! - **Document pages** (`/docs/{slug}/index.html`): one per enumerated slug,
//!   with the navigation sidebar
//! - **Not found** (`/404.html`)
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── 404.html
//! └── docs/
//!     ├── index.html
//!     ├── getting-started/
//!     │   └── index.html
//!     └── guides/
//!         └── installation/
//!             └── index.html
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time and inlined into every page:
//! - `static/style.css`: Base styles (colors injected from config)
//! - `static/copy.js`: Copy-to-clipboard for code blocks
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping. Rendered
//! Markdown is the only pre-escaped input.

use crate::config::{self, SiteConfig};
use crate::content::resolve_content;
use crate::markdown::render_markdown;
use crate::naming::markdown_stem;
use crate::scan::Manifest;
use crate::types::{DocContent, DocNode, ProjectInfo, Slug};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a generation run wrote.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub output_dir: PathBuf,
    /// Written files, relative to `output_dir`, sorted.
    pub pages: Vec<PathBuf>,
    /// Enumerated slugs whose document could no longer be resolved.
    pub skipped: Vec<Slug>,
    pub projects: usize,
}

impl GenerateReport {
    /// Number of `/docs/{slug}/` pages written.
    pub fn document_pages(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| p.starts_with("docs") && p.as_path() != Path::new("docs/index.html"))
            .count()
    }
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/copy.js");

enum PageOutcome {
    Written(PathBuf),
    Skipped(Slug),
}

pub fn generate(
    manifest: &Manifest,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let site = SiteContext::new(config, &manifest.navigation);

    create_dir(output_dir)?;
    let mut pages = vec![
        write_page(output_dir, "index.html", render_home(&site, &manifest.projects))?,
        write_page(output_dir, "404.html", render_not_found(&site))?,
    ];

    let intro = resolve_content(&manifest.content_root, &Slug::from(["introduction"]));
    pages.push(write_page(
        output_dir,
        "docs/index.html",
        render_docs_index(&site, intro.as_ref()),
    )?);

    let outcomes: Vec<PageOutcome> = manifest
        .paths
        .par_iter()
        .map(|slug| generate_doc_page(&site, &manifest.content_root, slug, output_dir))
        .collect::<Result<_, _>>()?;

    let mut skipped = Vec::new();
    for outcome in outcomes {
        match outcome {
            PageOutcome::Written(path) => pages.push(path),
            PageOutcome::Skipped(slug) => skipped.push(slug),
        }
    }
    pages.sort();

    info!(
        output = %output_dir.display(),
        pages = pages.len(),
        skipped = skipped.len(),
        "site generated"
    );
    Ok(GenerateReport {
        output_dir: output_dir.to_path_buf(),
        pages,
        skipped,
        projects: manifest.projects.len(),
    })
}

fn generate_doc_page(
    site: &SiteContext<'_>,
    content_root: &Path,
    slug: &Slug,
    output_dir: &Path,
) -> Result<PageOutcome, GenerateError> {
    let Some(doc) = resolve_content(content_root, slug) else {
        warn!(slug = %slug, "document vanished before rendering, skipping");
        return Ok(PageOutcome::Skipped(slug.clone()));
    };
    let rel = doc_page_path(slug);
    let path = write_page(output_dir, &rel, render_doc_page(site, &doc))?;
    Ok(PageOutcome::Written(path))
}

/// Relative output path for a document slug: `docs/a/b/index.html`.
pub fn doc_page_path(slug: &Slug) -> PathBuf {
    let mut path = PathBuf::from("docs");
    path.extend(slug.segments());
    path.push("index.html");
    path
}

/// Site URL for a document slug: `/docs/a/b/`.
pub fn doc_url(slug: &Slug) -> String {
    format!("/docs/{}/", slug.url_path())
}

fn write_page(output_dir: &Path, rel: impl AsRef<Path>, page: Markup) -> Result<PathBuf, GenerateError> {
    let rel = rel.as_ref();
    let path = output_dir.join(rel);
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    fs::write(&path, page.into_string()).map_err(|source| GenerateError::Io {
        path: path.clone(),
        source,
    })?;
    debug!(page = %rel.display(), "wrote page");
    Ok(rel.to_path_buf())
}

fn create_dir(path: &Path) -> Result<(), GenerateError> {
    fs::create_dir_all(path).map_err(|source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Everything shared by every page of one build.
struct SiteContext<'a> {
    config: &'a SiteConfig,
    navigation: &'a [DocNode],
    css: String,
}

impl<'a> SiteContext<'a> {
    fn new(config: &'a SiteConfig, navigation: &'a [DocNode]) -> Self {
        let color_css = config::generate_color_css(&config.colors);
        Self {
            config,
            navigation,
            css: format!("{}\n\n{}", color_css, CSS_STATIC),
        }
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, description: Option<&str>, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                @if let Some(description) = description {
                    meta name="description" content=(description);
                }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the docs sidebar from the navigation tree.
pub fn render_sidebar(heading: &str, nodes: &[DocNode], current: Option<&Slug>) -> Markup {
    html! {
        nav.sidebar aria-label="Documentation" {
            h2.sidebar-heading { a href="/docs/" { (heading) } }
            ul.nav-tree {
                @for node in nodes {
                    (render_nav_item(node, current))
                }
            }
        }
    }
}

/// Directories are labelled groups, documents are links.
fn render_nav_item(node: &DocNode, current: Option<&Slug>) -> Markup {
    if node.is_directory {
        return html! {
            li.nav-group {
                span.nav-group-label { (node.title) }
                ul {
                    @for child in node.children() {
                        (render_nav_item(child, current))
                    }
                }
            }
        };
    }

    let is_current = current == Some(&node.slug);
    html! {
        li class=[is_current.then_some("current")] {
            a href=(doc_url(&node.slug)) aria-current=[is_current.then_some("page")] {
                (node.title)
            }
        }
    }
}

/// Sidebar plus content column, shared by all `/docs/` pages.
fn docs_layout(site: &SiteContext<'_>, current: Option<&Slug>, body: Markup) -> Markup {
    html! {
        div.docs-layout {
            (render_sidebar(&site.config.site.docs_heading, site.navigation, current))
            div.docs-main {
                header.docs-header {
                    a href="/" { (site.config.site.title) }
                    " › "
                    a href="/docs/" { (site.config.site.docs_heading) }
                }
                main.docs-content {
                    (body)
                }
            }
        }
        script { (PreEscaped(JS)) }
    }
}

fn markdown_article(doc: &DocContent) -> Markup {
    html! {
        article.markdown-body {
            (PreEscaped(render_markdown(&doc.content)))
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the home page with project cards
fn render_home(site: &SiteContext<'_>, projects: &[ProjectInfo]) -> Markup {
    let info = &site.config.site;
    let content = html! {
        main.home-page {
            header.hero {
                h1 { (info.title) }
                @if !info.tagline.is_empty() {
                    p.tagline { (info.tagline) }
                }
                a.button href="/docs/" { "Browse Documentation" }
            }
            @if projects.is_empty() {
                section.getting-started {
                    h2 { "Getting Started" }
                    p {
                        "Add Markdown files to the "
                        code { (site.config.content_root) }
                        " folder and organise them in subfolders to create sections."
                    }
                }
            } @else {
                section.project-grid {
                    @for project in projects {
                        (render_project_card(project))
                    }
                }
            }
        }
    };

    base_document(&info.title, Some(info.tagline.as_str()), &site.css, content)
}

fn render_project_card(project: &ProjectInfo) -> Markup {
    let href = project_url(project);
    let files = if project.file_count == 1 {
        "1 document".to_string()
    } else {
        format!("{} documents", project.file_count)
    };
    html! {
        a.project-card href=(href) {
            h2.project-name { (project.name) }
            p.project-description { (project.description) }
            p.project-meta {
                (files)
                " · Updated "
                time datetime=(project.last_modified.to_rfc3339()) {
                    (project.last_modified.format("%Y-%m-%d"))
                }
            }
        }
    }
}

/// Link target for a project card: its intro document when known.
fn project_url(project: &ProjectInfo) -> String {
    let stem = project.intro_file.as_deref().and_then(markdown_stem);
    match stem {
        Some(stem) => doc_url(&Slug::from([project.slug.as_str(), stem])),
        None => "/docs/".to_string(),
    }
}

/// Renders `/docs/`: the introduction document or a welcome page
fn render_docs_index(site: &SiteContext<'_>, intro: Option<&DocContent>) -> Markup {
    let heading = &site.config.site.docs_heading;
    let body = match intro {
        Some(doc) => markdown_article(doc),
        None => html! {
            article.markdown-body.welcome {
                h1 { (heading) }
                p.lead { "Welcome to our documentation site" }
                p {
                    "Navigation is generated from the Markdown files in the "
                    code { (site.config.content_root) }
                    " folder."
                }
                h2 { "Getting Started" }
                ol {
                    li { "Create a new " code { ".md" } " file in the " code { (site.config.content_root) } " folder" }
                    li { "The file appears in the navigation on the next build" }
                    li { "Use standard Markdown with GitHub Flavored Markdown extensions" }
                }
            }
        },
    };
    let title = match intro {
        Some(doc) => format!("{} | {}", doc.title, heading),
        None => heading.clone(),
    };
    base_document(&title, None, &site.css, docs_layout(site, None, body))
}

/// Renders a single document page
fn render_doc_page(site: &SiteContext<'_>, doc: &DocContent) -> Markup {
    let title = format!("{} | {}", doc.title, site.config.site.docs_heading);
    let description = format!("Documentation for {}", doc.title);
    let body = markdown_article(doc);
    base_document(
        &title,
        Some(description.as_str()),
        &site.css,
        docs_layout(site, Some(&doc.slug), body),
    )
}

/// Renders the 404 page
fn render_not_found(site: &SiteContext<'_>) -> Markup {
    let content = html! {
        main.not-found {
            h1 { "Page Not Found" }
            p { "The page you're looking for doesn't exist." }
            a.button href="/docs/" { "Back to " (site.config.site.docs_heading) }
        }
    };
    base_document("Page Not Found", None, &site.css, content)
}

// ============================================================================
// Tests
// ============================================================================
