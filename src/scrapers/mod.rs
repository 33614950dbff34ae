//! Article body fetching and main-text extraction.
//!
//! A fetch has exactly two observable outcomes for the pipeline: body text,
//! or nothing. Fetchers still report *why* they failed through [`FetchError`]
//! so the failure can be inspected in tests and debug logs; the driver in
//! [`crate::pipeline`] is what collapses every error into an empty body.
//!
//! # Submodules
//!
//! - [`article`]: [`ArticleScraper`](article::ArticleScraper), the HTTP-backed fetcher
//! - [`extract`]: boilerplate removal via `readability`, with a paragraph fallback

pub mod article;
pub mod extract;

use thiserror::Error;

/// Why a single URL produced no body text.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),

    #[error("extraction error: {0}")]
    Extraction(String),
}

/// Something that can turn a URL into article body text.
///
/// Implementations must not panic on bad input; every failure is reported
/// through the returned `Result`.
pub trait BodyFetcher {
    /// Download `url` and return its extracted main text.
    async fn fetch_body(&self, url: &str) -> Result<String, FetchError>;
}
