//! HTTP-backed article fetcher.
//!
//! One [`reqwest::Client`] is built per run from the [`FetchConfig`] and
//! reused for every URL. Only `http` and `https` URLs are requested; anything
//! else fails before touching the network.

use super::extract::extract_main_text;
use super::{BodyFetcher, FetchError};
use crate::config::FetchConfig;
use reqwest::{Client, redirect};
use tracing::{debug, instrument};
use url::Url;

/// Fetches article pages over HTTP(S) and extracts their main text.
#[derive(Debug, Clone)]
pub struct ArticleScraper {
    client: Client,
}

impl ArticleScraper {
    /// Build a scraper with the timeout, redirect limit and user agent from `config`.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let policy = if config.max_redirects == 0 {
            redirect::Policy::none()
        } else {
            redirect::Policy::limited(config.max_redirects)
        };

        let client = Client::builder()
            .timeout(config.timeout())
            .redirect(policy)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }
}

impl BodyFetcher for ArticleScraper {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch_body(&self, url: &str) -> Result<String, FetchError> {
        let parsed = parse_http_url(url)?;

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let final_url = response.url().clone();
        // Decoded per the Content-Type charset, UTF-8 when none is given.
        let body = response.text().await?;
        debug!(bytes = body.len(), %final_url, "Downloaded article page");

        extract_main_text(&body, &final_url)
    }
}

fn parse_http_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url.trim()).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl(format!(
            "{url}: unsupported scheme `{other}`"
        ))),
    }
}
