//! Main-text extraction from downloaded HTML.
//!
//! Boilerplate removal is delegated to the `readability` crate. When it
//! cannot find an article (or finds only whitespace), paragraph text is
//! collected with `scraper` instead: `<article> p` first, then every `<p>`.
//!
//! The returned text always has the same shape: whitespace inside a paragraph
//! collapsed to single spaces and paragraphs separated by a blank line.
//! Readability's cleaned HTML is split on `<p>` when it has any; otherwise its
//! plain text becomes a single paragraph.

use super::FetchError;
use ego_tree::iter::Edge;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::io::Cursor;
use tracing::debug;
use url::Url;

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static ARTICLE_PARAGRAPHS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article p").expect("article selector is valid"));
static PARAGRAPHS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("paragraph selector is valid"));

/// Deepest element nesting accepted before extraction is attempted.
///
/// Readability scores and tears down its DOM recursively, so a pathologically
/// nested page would overflow the stack and abort the process. Real article
/// markup stays far below this; libxml2-based parsers stop at the same depth.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Extract the main article text from an HTML document.
///
/// `url` is the final (post-redirect) page URL; readability uses it to
/// resolve relative links.
///
/// # Errors
///
/// [`FetchError::Extraction`] when the document nests deeper than
/// [`MAX_NESTING_DEPTH`], or when neither readability nor the paragraph
/// fallback yields any text.
pub fn extract_main_text(html: &str, url: &Url) -> Result<String, FetchError> {
    let document = Html::parse_document(html);
    let depth = nesting_depth(&document);
    if depth > MAX_NESTING_DEPTH {
        return Err(FetchError::Extraction(format!(
            "document nests {depth} levels deep (limit {MAX_NESTING_DEPTH})"
        )));
    }

    let mut cursor = Cursor::new(html.as_bytes());
    let readable = match readability::extractor::extract(&mut cursor, url) {
        Ok(product) => {
            let content = Html::parse_fragment(&product.content);
            let text = collect_paragraphs(&content, &PARAGRAPHS);
            if text.is_empty() {
                collapse_whitespace(&product.text)
            } else {
                text
            }
        }
        Err(_) => {
            debug!(%url, "readability found no article; trying paragraph fallback");
            String::new()
        }
    };
    if !readable.is_empty() {
        return Ok(readable);
    }

    let fallback = paragraph_text(&document);
    if fallback.is_empty() {
        Err(FetchError::Extraction("no main text found".to_string()))
    } else {
        Ok(fallback)
    }
}

/// Maximum node depth of a parsed document, measured without recursion.
pub fn nesting_depth(document: &Html) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    for edge in document.tree.root().traverse() {
        match edge {
            Edge::Open(_) => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            Edge::Close(_) => depth -= 1,
        }
    }
    deepest
}

/// Collapse every run of whitespace to a single space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

fn collect_paragraphs(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .map(|p| collapse_whitespace(&p.text().collect::<String>()))
        .filter(|p| !p.is_empty())
        .join("\n\n")
}

fn paragraph_text(document: &Html) -> String {
    let scoped = collect_paragraphs(document, &ARTICLE_PARAGRAPHS);
    if scoped.is_empty() {
        collect_paragraphs(document, &PARAGRAPHS)
    } else {
        scoped
    }
}
