//! CSV output for the augmented table.
//!
//! The file is UTF-8 with a leading byte-order mark so spreadsheet tools pick
//! the right encoding. Rows end in `\n` and fields are quoted only when they
//! contain a comma, a quote or a line break. Nothing time-dependent is
//! embedded, so identical tables always render to identical bytes.

use crate::models::{ArticleTable, TableError};
use crate::table::UTF8_BOM;
use ::csv::{QuoteStyle, Terminator, WriterBuilder};
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Default output file name used when no `--output` is given.
pub const DEFAULT_OUTPUT_FILENAME: &str = "gdelt_anglosphere_articles_with_body.csv";

/// Render an [`ArticleTable`] to BOM-prefixed CSV bytes.
pub fn render_table(table: &ArticleTable) -> Result<Vec<u8>, TableError> {
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .quote_style(QuoteStyle::Necessary)
        .from_writer(UTF8_BOM.to_vec());

    wtr.write_record(table.headers())?;
    for record in table.records() {
        wtr.write_record(&record.fields)?;
    }

    wtr.into_inner()
        .map_err(|e| TableError::Io(e.into_error()))
}

/// Write an [`ArticleTable`] to `path` in a single unconditional write.
///
/// An existing file at `path` is overwritten.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn write_table(table: &ArticleTable, path: impl AsRef<Path>) -> Result<(), TableError> {
    let bytes = render_table(table)?;
    fs::write(path.as_ref(), &bytes).await?;
    info!(
        rows = table.len(),
        bytes = bytes.len(),
        "Wrote augmented CSV"
    );
    Ok(())
}
