//! # GDELT Body Scraper
//!
//! Reads a GDELT metadata CSV, downloads every article URL it lists, extracts
//! the main text of each page, and writes the table back out with an extra
//! `body_text` column.
//!
//! ## Usage
//!
//! ```sh
//! gdelt_body_scraper -i gdelt_metadata.csv -o gdelt_anglosphere_articles_with_body.csv
//! ```
//!
//! ## Architecture
//!
//! A single sequential pipeline:
//! 1. **Loading**: Read the metadata table; a missing `url` column aborts here
//! 2. **Fetching**: Download and extract each URL in row order, one at a time
//! 3. **Appending**: Attach the bodies as `body_text` (failures become `""`)
//! 4. **Output**: Write a UTF-8 CSV with a byte-order mark

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod table;
mod utils;

use cli::Cli;
use scrapers::article::ArticleScraper;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("gdelt_body_scraper starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let fetch_config = config::resolve(&args).await?;
    info!(
        timeout_secs = fetch_config.timeout_secs,
        max_redirects = fetch_config.max_redirects,
        user_agent = %fetch_config.user_agent,
        "Fetch configuration"
    );

    let scraper = ArticleScraper::new(&fetch_config)?;
    let summary = match pipeline::run(&scraper, &args.input, &args.output, args.preview).await {
        Ok(summary) => summary,
        Err(e) => {
            error!(
                input = %args.input,
                output = %args.output,
                error = %e,
                "Run aborted (check the input columns and that the output path is writable)"
            );
            return Err(e.into());
        }
    };
    info!(path = %args.output, "File saved");

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        total = summary.total,
        extracted = summary.extracted,
        empty = summary.empty,
        "Execution complete"
    );

    Ok(())
}
