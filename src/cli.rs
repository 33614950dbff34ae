//! Command-line interface definitions.
//!
//! Every fetch setting can also be provided through an environment variable
//! or a YAML file (see [`crate::config`]).

use crate::outputs::csv::DEFAULT_OUTPUT_FILENAME;
use clap::Parser;

/// Command-line arguments for the body scraper.
///
/// # Examples
///
/// ```sh
/// # Scrape every URL in a GDELT metadata export
/// gdelt_body_scraper -i gdelt_metadata.csv
///
/// # Custom output path and a longer timeout
/// gdelt_body_scraper -i gdelt_metadata.csv -o bodies.csv --timeout-secs 20
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Input metadata CSV (must contain a `url` column)
    #[arg(short, long)]
    pub input: String,

    /// Output CSV path
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILENAME)]
    pub output: String,

    /// Optional path to a YAML fetch configuration
    #[arg(short, long)]
    pub config: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "SCRAPER_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Maximum number of redirects to follow
    #[arg(long, env = "SCRAPER_MAX_REDIRECTS")]
    pub max_redirects: Option<usize>,

    /// User-Agent header sent with each request
    #[arg(long, env = "SCRAPER_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Number of rows shown in the log previews
    #[arg(long, default_value_t = 5)]
    pub preview: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "gdelt_body_scraper",
            "--input",
            "./metadata.csv",
            "--output",
            "./out.csv",
        ]);

        assert_eq!(cli.input, "./metadata.csv");
        assert_eq!(cli.output, "./out.csv");
        assert_eq!(cli.preview, 5);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_default_output() {
        let cli = Cli::parse_from(["gdelt_body_scraper", "-i", "/tmp/metadata.csv"]);

        assert_eq!(cli.input, "/tmp/metadata.csv");
        assert_eq!(cli.output, "gdelt_anglosphere_articles_with_body.csv");
    }

    #[test]
    fn test_cli_requires_input() {
        assert!(Cli::try_parse_from(["gdelt_body_scraper"]).is_err());
    }
}
