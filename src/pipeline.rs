//! The sequential load → scrape → append → write pipeline.
//!
//! Rows are fetched strictly one after another in load order. Each URL is
//! fetched exactly once per row it appears in, so a repeated URL is fetched
//! repeatedly. Any fetch failure becomes an empty `body_text`; a run stops
//! before fetching only when the table cannot be loaded or the output
//! location cannot be written.

use crate::models::{ArticleTable, BODY_TEXT_COLUMN, ScrapeSummary, TITLE_COLUMN, TableError};
use crate::outputs::csv::write_table;
use crate::scrapers::BodyFetcher;
use crate::table::load_table;
use crate::utils::{ensure_writable_parent, truncate_for_log};
use futures::stream::{self, StreamExt};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Fetch a body for every URL, in order.
///
/// The returned bodies are aligned 1:1 with `urls`; failed fetches yield `""`.
#[instrument(level = "info", skip_all, fields(total = urls.len()))]
pub async fn scrape_bodies<F: BodyFetcher>(
    fetcher: &F,
    urls: Vec<String>,
) -> (Vec<String>, ScrapeSummary) {
    let total = urls.len();
    let bodies: Vec<String> = stream::iter(urls.into_iter().enumerate())
        .then(|(i, url)| async move {
            let body = match fetcher.fetch_body(&url).await {
                Ok(text) => text,
                Err(e) => {
                    debug!(index = i, %url, error = %e, "No body text");
                    String::new()
                }
            };
            info!(scraped = %format!("{}/{}", i + 1, total), "Scraping article bodies");
            body
        })
        .collect()
        .await;

    let extracted = bodies.iter().filter(|b| !b.is_empty()).count();
    let summary = ScrapeSummary {
        total,
        extracted,
        empty: total - extracted,
    };
    info!(
        total = summary.total,
        extracted = summary.extracted,
        empty = summary.empty,
        "Finished scraping article bodies"
    );
    (bodies, summary)
}

/// Scrape every row of `table` and attach the results as `body_text`.
pub async fn augment_table<F: BodyFetcher>(
    fetcher: &F,
    table: &mut ArticleTable,
) -> Result<ScrapeSummary, TableError> {
    let urls = table.urls().map(str::to_string).collect();
    let (bodies, summary) = scrape_bodies(fetcher, urls).await;
    table.set_body_texts(bodies)?;
    Ok(summary)
}

/// Load `input`, scrape every row, and write the augmented table to `output`.
///
/// The output location is checked only once the table has loaded, so a
/// rejected input leaves the filesystem untouched. `preview` rows are logged
/// after loading and again after scraping.
#[instrument(level = "info", skip_all, fields(input = %input.as_ref().display(), output = %output.as_ref().display()))]
pub async fn run<F: BodyFetcher>(
    fetcher: &F,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    preview: usize,
) -> Result<ScrapeSummary, TableError> {
    let mut table = load_table(input).await?;
    info!(count = table.len(), "articles loaded");
    if table.is_empty() {
        warn!("Metadata table has no rows; writing header only");
    }
    log_preview(&table, preview, false);

    ensure_writable_parent(&output).await?;
    let summary = augment_table(fetcher, &mut table).await?;
    log_preview(&table, preview, true);

    write_table(&table, output).await?;
    Ok(summary)
}

fn log_preview(table: &ArticleTable, rows: usize, with_body: bool) {
    for row in 0..rows.min(table.len()) {
        let title = table.value(row, TITLE_COLUMN).unwrap_or("");
        let url = table.urls().nth(row).unwrap_or("");
        if with_body {
            let body = table.value(row, BODY_TEXT_COLUMN).unwrap_or("");
            info!(
                row,
                title = %truncate_for_log(title, 80),
                body_text = %truncate_for_log(body, 120),
                "Preview"
            );
        } else {
            info!(row, title = %truncate_for_log(title, 80), %url, "Preview");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::FetchError;
    use crate::table::{UTF8_BOM, parse_table};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Returns fixed text per URL and fails for anything unknown.
    struct MockFetcher {
        pages: HashMap<String, String>,
        calls: RefCell<Vec<String>>,
    }

    impl MockFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(u, t)| (u.to_string(), t.to_string()))
                    .collect(),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl BodyFetcher for MockFetcher {
        async fn fetch_body(&self, url: &str) -> Result<String, FetchError> {
            self.calls.borrow_mut().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Extraction(format!("no mock page for {url}")))
        }
    }

    async fn write_input(dir: &Path, contents: &str) -> std::path::PathBuf {
        let path = dir.join("metadata.csv");
        tokio::fs::write(&path, contents).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_scenario_success_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            dir.path(),
            "url,title\nhttp://a.test,A\nhttp://bad.test,B\n",
        )
        .await;
        let output = dir.path().join("out.csv");
        let fetcher = MockFetcher::new(&[("http://a.test", "Hello")]);

        let summary = run(&fetcher, &input, &output, 5).await.unwrap();

        assert_eq!(
            summary,
            ScrapeSummary {
                total: 2,
                extracted: 1,
                empty: 1
            }
        );
        let bytes = tokio::fs::read(&output).await.unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        assert_eq!(
            std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap(),
            "url,title,body_text\nhttp://a.test,A,Hello\nhttp://bad.test,B,\n"
        );
    }

    #[tokio::test]
    async fn test_missing_url_column_fetches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "link,title\nhttp://a.test,A\n").await;
        let output = dir.path().join("out.csv");
        let fetcher = MockFetcher::new(&[("http://a.test", "Hello")]);

        let err = run(&fetcher, &input, &output, 5).await.unwrap_err();

        assert!(matches!(err, TableError::MissingColumn(_)));
        assert!(fetcher.calls().is_empty());
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_rejected_input_creates_no_output_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "link,title\nhttp://a.test,A\n").await;
        let output = dir.path().join("results/run1/out.csv");
        let fetcher = MockFetcher::new(&[]);

        let err = run(&fetcher, &input, &output, 5).await.unwrap_err();

        assert!(matches!(err, TableError::MissingColumn(_)));
        assert!(!dir.path().join("results").exists());
    }

    #[tokio::test]
    async fn test_unwritable_output_fails_before_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "url,title\nhttp://a.test,A\n").await;
        let blocker = dir.path().join("blocker");
        tokio::fs::write(&blocker, b"x").await.unwrap();
        let fetcher = MockFetcher::new(&[("http://a.test", "Hello")]);

        let err = run(&fetcher, &input, blocker.join("out.csv"), 5)
            .await
            .unwrap_err();

        assert!(matches!(err, TableError::Io(_)));
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rows_fetched_in_order_without_dedup() {
        let mut table = parse_table(
            "url,title\nhttp://b.test,B\nhttp://a.test,A\nhttp://b.test,B2\n".as_bytes(),
        )
        .unwrap();
        let fetcher = MockFetcher::new(&[("http://a.test", "Alpha"), ("http://b.test", "Beta")]);

        augment_table(&fetcher, &mut table).await.unwrap();

        assert_eq!(
            fetcher.calls(),
            vec!["http://b.test", "http://a.test", "http://b.test"]
        );
        assert_eq!(table.len(), 3);
        assert_eq!(table.value(0, "body_text"), Some("Beta"));
        assert_eq!(table.value(1, "body_text"), Some("Alpha"));
        assert_eq!(table.value(2, "body_text"), Some("Beta"));
        assert_eq!(table.value(2, "title"), Some("B2"));
    }

    #[tokio::test]
    async fn test_passthrough_columns_unchanged() {
        let input = "title,url,lang,tone\n\"Hi, there\",http://a.test,en,-1.5\n,http://x.test,,\n";
        let original = parse_table(input.as_bytes()).unwrap();
        let mut table = original.clone();
        let fetcher = MockFetcher::new(&[("http://a.test", "Body")]);

        augment_table(&fetcher, &mut table).await.unwrap();

        assert_eq!(table.headers(), &["title", "url", "lang", "tone", "body_text"]);
        for (before, after) in original.records().iter().zip(table.records()) {
            assert_eq!(&after.fields[..before.fields.len()], &before.fields[..]);
        }
        assert_eq!(table.value(1, "body_text"), Some(""));
    }

    #[tokio::test]
    async fn test_empty_table_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "url,title\n").await;
        let output = dir.path().join("out.csv");
        let fetcher = MockFetcher::new(&[]);

        let summary = run(&fetcher, &input, &output, 5).await.unwrap();

        assert_eq!(summary.total, 0);
        let bytes = tokio::fs::read(&output).await.unwrap();
        assert_eq!(&bytes[UTF8_BOM.len()..], b"url,title,body_text\n");
    }

    #[tokio::test]
    async fn test_runs_are_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            dir.path(),
            "url,title\nhttp://a.test,A\nhttp://bad.test,B\nhttp://c.test,\"C, quoted\"\n",
        )
        .await;
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        let fetcher = MockFetcher::new(&[
            ("http://a.test", "Hello"),
            ("http://c.test", "Line one\n\nLine \"two\""),
        ]);

        run(&fetcher, &input, &first, 0).await.unwrap();
        run(&fetcher, &input, &second, 0).await.unwrap();

        let a = tokio::fs::read(&first).await.unwrap();
        let b = tokio::fs::read(&second).await.unwrap();
        assert_eq!(a, b);
    }
}
