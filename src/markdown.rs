//! Markdown to HTML rendering for document pages.
//!
//! Parses GitHub-flavored Markdown with `pulldown-cmark` and rewrites a few
//! events on the way to the HTML writer:
//!
//! - Code blocks are buffered and emitted as a `div.code-block` with a copy
//!   button next to the `<pre>`.
//! - Link and image destinations with a scheme other than `http`, `https`
//!   or `mailto` are dropped, so `javascript:` and `data:` URLs never reach
//!   an attribute.
//! - Links pointing at `http…` destinations open in a new tab.
//! - Raw HTML is demoted to text, so it shows up escaped instead of being
//!   injected into the page.

use pulldown_cmark_escape::{escape_href, escape_html};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};
use tracing::debug;

/// Schemes a link or image may point at. Scheme-less URLs are always kept.
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Render a Markdown document to an HTML fragment.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let mut rewriter = EventRewriter::default();
    let events = Parser::new_ext(markdown, options).filter_map(|ev| rewriter.rewrite(ev));

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

/// Code block buffered until its end tag.
#[derive(Default)]
struct CodeBlockState {
    active: bool,
    language: Option<String>,
    buffer: String,
}

impl CodeBlockState {
    fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }
}

#[derive(Default)]
struct EventRewriter {
    code: CodeBlockState,
}

impl EventRewriter {
    /// Map one parser event. `None` swallows the event.
    fn rewrite<'a>(&mut self, event: Event<'a>) -> Option<Event<'a>> {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                self.code.start(code_language(&kind));
                None
            }
            Event::End(TagEnd::CodeBlock) => {
                let (language, code) = self.code.end();
                Some(Event::Html(CowStr::from(render_code_block(
                    language.as_deref(),
                    &code,
                ))))
            }
            Event::Text(text) if self.code.active => {
                self.code.buffer.push_str(&text);
                None
            }
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                let dest_url = sanitize_url(dest_url, "#");
                if is_external(&dest_url) {
                    Some(Event::Html(CowStr::from(external_link_open(&dest_url, &title))))
                } else {
                    Some(Event::Start(Tag::Link {
                        link_type,
                        dest_url,
                        title,
                        id,
                    }))
                }
            }
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) => Some(Event::Start(Tag::Image {
                link_type,
                dest_url: sanitize_url(dest_url, ""),
                title,
                id,
            })),
            // Raw HTML is shown as text. Blocks get a paragraph so the
            // escaped markup doesn't float outside any element.
            Event::Start(Tag::HtmlBlock) => Some(Event::Start(Tag::Paragraph)),
            Event::End(TagEnd::HtmlBlock) => Some(Event::End(TagEnd::Paragraph)),
            Event::Html(raw) | Event::InlineHtml(raw) => Some(Event::Text(raw)),
            other => Some(other),
        }
    }
}

/// Language from a fenced info string (`rust,ignore` → `rust`).
fn code_language(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info
            .split(|c: char| c.is_whitespace() || c == ',')
            .next()
            .filter(|lang| !lang.is_empty())
            .map(str::to_string),
        CodeBlockKind::Indented => None,
    }
}

/// Keep `dest` when it is relative or uses an allowed scheme, otherwise
/// swap in `replacement`.
fn sanitize_url<'a>(dest: CowStr<'a>, replacement: &'static str) -> CowStr<'a> {
    if is_safe_url(&dest) {
        dest
    } else {
        debug!(url = %dest, "dropping unsafe url");
        CowStr::Borrowed(replacement)
    }
}

/// A scheme is whatever precedes the first `:` that comes before any `/`,
/// `?` or `#`. Browsers ignore ASCII whitespace and control characters
/// inside it, so those are stripped before comparing.
fn is_safe_url(dest: &str) -> bool {
    let Some(end) = dest.find([':', '/', '?', '#']) else {
        return true;
    };
    if !dest[end..].starts_with(':') {
        return true;
    }
    let scheme: String = dest[..end]
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    ALLOWED_SCHEMES.contains(&scheme.as_str())
}

fn is_external(dest: &str) -> bool {
    dest.starts_with("http")
}

fn external_link_open(dest: &str, title: &str) -> String {
    let mut tag = String::from("<a href=\"");
    let _ = escape_href(&mut tag, dest);
    tag.push('"');
    if !title.is_empty() {
        tag.push_str(" title=\"");
        let _ = escape_html(&mut tag, title);
        tag.push('"');
    }
    tag.push_str(" target=\"_blank\" rel=\"noopener noreferrer\">");
    tag
}

fn render_code_block(language: Option<&str>, code: &str) -> String {
    let code = code.strip_suffix('\n').unwrap_or(code);
    let mut out = String::with_capacity(code.len() + 160);
    out.push_str("<div class=\"code-block\"><pre><code");
    if let Some(lang) = language {
        out.push_str(" class=\"language-");
        let _ = escape_html(&mut out, lang);
        out.push('"');
    }
    out.push('>');
    let _ = escape_html(&mut out, code);
    out.push_str(
        "</code></pre>\
         <button type=\"button\" class=\"copy-button\" aria-label=\"Copy code to clipboard\">Copy</button>\
         </div>\n",
    );
    out
}
