//! Fetch settings for the article scraper.
//!
//! Settings come from three layers, later layers winning:
//!
//! 1. Built-in defaults ([`FetchConfig::default`])
//! 2. An optional YAML file passed with `--config`
//! 3. Command-line flags / environment variables
//!
//! # Example `config.yaml`
//!
//! ```yaml
//! timeout_secs: 15
//! max_redirects: 5
//! user_agent: "Mozilla/5.0 (compatible; research-bot)"
//! ```

use crate::cli::Cli;
use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Per-request timeout applied when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 7;
/// Redirect hops followed before a fetch is abandoned.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_redirects() -> usize {
    DEFAULT_MAX_REDIRECTS
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// HTTP behaviour of [`ArticleScraper`](crate::scrapers::article::ArticleScraper).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FetchConfig {
    /// Whole-request timeout, connect through body, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum redirect hops; `0` disables redirects entirely.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parse a YAML document; missing keys fall back to defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Apply command-line / environment overrides on top of `self`.
    pub fn with_overrides(mut self, args: &Cli) -> Self {
        if let Some(secs) = args.timeout_secs {
            self.timeout_secs = secs;
        }
        if let Some(max) = args.max_redirects {
            self.max_redirects = max;
        }
        if let Some(ref ua) = args.user_agent {
            self.user_agent = ua.clone();
        }
        self
    }
}

/// Load a [`FetchConfig`] from a YAML file.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn load_config(path: impl AsRef<Path>) -> Result<FetchConfig, Box<dyn Error>> {
    let yaml = tokio::fs::read_to_string(path.as_ref()).await?;
    let config = FetchConfig::from_yaml(&yaml)?;
    info!("Loaded fetch configuration");
    debug!(?config, "Fetch configuration contents");
    Ok(config)
}

/// Resolve the effective [`FetchConfig`] for a run.
pub async fn resolve(args: &Cli) -> Result<FetchConfig, Box<dyn Error>> {
    let base = match args.config {
        Some(ref path) => load_config(path).await?,
        None => FetchConfig::default(),
    };
    Ok(base.with_overrides(args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout_secs, 7);
        assert_eq!(config.max_redirects, 10);
        assert!(config.user_agent.starts_with("gdelt_body_scraper/"));
        assert_eq!(config.timeout(), Duration::from_secs(7));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = FetchConfig::from_yaml("timeout_secs: 20\n").unwrap();
        assert_eq!(config.timeout_secs, 20);
        assert_eq!(config.max_redirects, DEFAULT_MAX_REDIRECTS);
        assert_eq!(config.user_agent, default_user_agent());
    }

    #[test]
    fn test_cli_overrides_yaml() {
        let config = FetchConfig::from_yaml("timeout_secs: 20\nmax_redirects: 3\n").unwrap();
        let args = Cli::parse_from([
            "gdelt_body_scraper",
            "-i",
            "in.csv",
            "--max-redirects",
            "0",
            "--user-agent",
            "test-agent",
        ]);

        let config = config.with_overrides(&args);
        assert_eq!(config.timeout_secs, 20);
        assert_eq!(config.max_redirects, 0);
        assert_eq!(config.user_agent, "test-agent");
    }

    #[tokio::test]
    async fn test_resolve_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(&path, "user_agent: from-file\n").await.unwrap();

        let args = Cli::parse_from([
            "gdelt_body_scraper",
            "-i",
            "in.csv",
            "-c",
            path.to_str().unwrap(),
            "--timeout-secs",
            "2",
        ]);

        let config = resolve(&args).await.unwrap();
        assert_eq!(config.user_agent, "from-file");
        assert_eq!(config.timeout_secs, 2);
        assert_eq!(config.max_redirects, DEFAULT_MAX_REDIRECTS);
    }
}
