//! Markdown content pages.
//!
//! Pages are loaded from `content/pages/*.md` at startup, their YAML
//! frontmatter parsed, and the body rendered to HTML once.
//!
//! # Video Shortcodes
//!
//! Use the `{{video}}` shortcode to embed a self-hosted clip:
//!
//! ```markdown
//! {{video "about/wall_painting.webm" poster="about/wall_painting_thumbnail.webp"}}
//! ```
//!
//! This generates a muted, looping `<video>` element.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use regex::Regex;
use serde::Deserialize;

use crate::filters::asset_url;

/// Frontmatter for content pages.
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Quotes rotated through on each view.
    #[serde(default)]
    pub quotes: Vec<String>,
}

/// A rendered page with metadata and HTML content.
#[derive(Debug, Clone)]
pub struct Page {
    pub slug: String,
    pub meta: PageMeta,
    pub content_html: String,
}

impl Page {
    /// The quote for the `turn`-th view, cycling through the list.
    #[must_use]
    pub fn quote(&self, turn: usize) -> Option<&str> {
        let len = self.meta.quotes.len();
        if len == 0 {
            return None;
        }
        self.meta.quotes.get(turn % len).map(String::as_str)
    }
}

/// Content store that holds all loaded pages in memory.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    pages: Arc<HashMap<String, Page>>,
}

impl ContentStore {
    /// Load all pages from `content_dir/pages`.
    ///
    /// A missing directory yields an empty store. Individual pages that fail
    /// to parse are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the pages directory exists but cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let dir = content_dir.join("pages");
        let mut pages = HashMap::new();

        if !dir.exists() {
            tracing::warn!("Pages directory does not exist: {:?}", dir);
            return Ok(Self::default());
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| ContentError::Io(e.to_string()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md") {
                match load_page(&path) {
                    Ok(page) => {
                        tracing::info!("Loaded page: {}", page.slug);
                        pages.insert(page.slug.clone(), page);
                    }
                    Err(e) => {
                        tracing::error!("Failed to load page {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self {
            pages: Arc::new(pages),
        })
    }

    /// Get a page by slug.
    #[must_use]
    pub fn get_page(&self, slug: &str) -> Option<&Page> {
        self.pages.get(slug)
    }
}

/// Load a single page from a markdown file.
fn load_page(path: &Path) -> Result<Page, ContentError> {
    let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

    let slug = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?
        .to_string();

    parse_page(slug, &content)
}

/// Parse frontmatter and render the body.
fn parse_page(slug: String, content: &str) -> Result<Page, ContentError> {
    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<PageMeta> = matter
        .parse(content)
        .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
    let meta = parsed
        .data
        .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

    Ok(Page {
        slug,
        meta,
        content_html: render_markdown(&parsed.content),
    })
}

/// Render markdown to HTML with GitHub Flavored Markdown support.
///
/// Shortcodes are expanded first, so their HTML passes through untouched.
fn render_markdown(content: &str) -> String {
    let processed = process_shortcodes(content);

    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.header_ids = Some(String::new());

    // Allow raw HTML from shortcodes
    options.render.r#unsafe = true;

    markdown_to_html(&processed, &options)
}

// =============================================================================
// Shortcode Processing
// =============================================================================

/// Matches: `{{video "path" ...attributes}}`
static VIDEO_SHORTCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\{\{video\s+"([^"]+)"([^}]*)\}\}"#).expect("Invalid regex"));

/// Regex for extracting key="value" attributes.
static ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\w+)="([^"]*)""#).expect("Invalid regex"));

/// Expand every shortcode in the content.
fn process_shortcodes(content: &str) -> String {
    VIDEO_SHORTCODE_RE
        .replace_all(content, |caps: &regex::Captures| {
            let path = caps.get(1).map_or("", |m| m.as_str());
            let attrs_str = caps.get(2).map_or("", |m| m.as_str());

            let mut poster = None;
            let mut class = String::new();
            for attr_cap in ATTR_RE.captures_iter(attrs_str) {
                let (Some(key), Some(value)) = (attr_cap.get(1), attr_cap.get(2)) else {
                    continue;
                };
                match key.as_str() {
                    "poster" => poster = Some(value.as_str().to_string()),
                    "class" => class = value.as_str().to_string(),
                    _ => {}
                }
            }

            render_video_element(path, poster.as_deref(), &class)
        })
        .into_owned()
}

/// Render a muted, looping `<video>` for a self-hosted clip.
fn render_video_element(path: &str, poster: Option<&str>, class: &str) -> String {
    let src = asset_url(path);
    let mime = if path.ends_with(".mp4") {
        "video/mp4"
    } else {
        "video/webm"
    };
    let poster_attr = poster.map_or_else(String::new, |p| format!(r#" poster="{}""#, asset_url(p)));
    let class_attr = if class.is_empty() {
        String::new()
    } else {
        format!(r#" class="{class}""#)
    };

    format!(
        r#"<video autoplay muted loop playsinline preload="metadata"{poster_attr}{class_attr}>
  <source src="{src}" type="{mime}">
</video>"#
    )
}

/// Content loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ABOUT: &str = r#"---
title: About Detach
description: One shirt, many designs.
quotes:
  - "We were on a break! – Ross Geller"
  - "Wubba Lubba Dub Dub! – Rick Sanchez"
---
## The First Prototype

{{video "about/about2.webm" poster="about/about_thumbnail.webp"}}
"#;

    #[test]
    fn test_parse_page_with_quotes() {
        let page = parse_page("about".to_string(), ABOUT).unwrap();
        assert_eq!(page.meta.title, "About Detach");
        assert_eq!(page.meta.quotes.len(), 2);
        assert!(page.content_html.contains("<h2"));
        assert!(page.content_html.contains("The First Prototype"));
    }

    #[test]
    fn test_quote_rotation() {
        let page = parse_page("about".to_string(), ABOUT).unwrap();
        assert_eq!(page.quote(0), Some("We were on a break! – Ross Geller"));
        assert_eq!(page.quote(1), Some("Wubba Lubba Dub Dub! – Rick Sanchez"));
        assert_eq!(page.quote(2), page.quote(0));
    }

    #[test]
    fn test_page_without_quotes() {
        let page = parse_page("plain".to_string(), "---\ntitle: Plain\n---\nHello").unwrap();
        assert_eq!(page.quote(0), None);
    }

    #[test]
    fn test_video_shortcode() {
        let html = process_shortcodes(r#"{{video "about/demo4.webm" poster="about/demo1.webp" class="wide"}}"#);
        assert!(html.contains(r#"<source src="/static/about/demo4.webm" type="video/webm">"#));
        assert!(html.contains(r#"poster="/static/about/demo1.webp""#));
        assert!(html.contains(r#"class="wide""#));
        assert!(html.contains("muted loop"));
    }

    #[test]
    fn test_missing_frontmatter_is_an_error() {
        assert!(parse_page("x".to_string(), "no frontmatter here").is_err());
    }

    #[test]
    fn test_missing_directory_gives_empty_store() {
        let store = ContentStore::load(Path::new("/nonexistent/detach-content")).unwrap();
        assert!(store.get_page("about").is_none());
    }
}
