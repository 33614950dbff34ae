//! Loading the metadata table from comma-separated text.
//!
//! The loader accepts either a byte stream ([`parse_table`]) or a file path
//! ([`load_table`]). The header row must contain a `url` column; nothing
//! else about the rows is validated, URLs included.

use crate::models::{ArticleRecord, ArticleTable, TableError};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

/// UTF-8 byte-order mark, as written by [`crate::outputs::csv`].
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read a metadata table from a file on disk.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn load_table(path: impl AsRef<Path>) -> Result<ArticleTable, TableError> {
    let bytes = fs::read(path.as_ref()).await?;
    let table = parse_table(bytes.as_slice())?;
    info!(
        rows = table.len(),
        columns = table.headers().len(),
        "Loaded metadata table"
    );
    Ok(table)
}

/// Parse a metadata table from any byte stream.
///
/// A leading UTF-8 BOM is skipped. Rows shorter than the header are padded
/// with empty fields; rows longer than the header are rejected.
///
/// # Errors
///
/// - [`TableError::MissingColumn`] if the header lacks `url` (this includes
///   an empty input, which has no header at all)
/// - [`TableError::Malformed`] for a row wider than the header
/// - [`TableError::Csv`] for undecodable input
pub fn parse_table<R: Read>(mut reader: R) -> Result<ArticleTable, TableError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    let input = buf.strip_prefix(UTF8_BOM).unwrap_or(&buf);

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    debug!(?headers, "Parsed header row");

    let width = headers.len();
    let mut records = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let row = row?;
        if row.len() > width {
            return Err(TableError::Malformed {
                row: i + 1,
                expected: width,
                found: row.len(),
            });
        }
        let mut fields: Vec<String> = row.iter().map(str::to_string).collect();
        fields.resize(width, String::new());
        records.push(ArticleRecord::new(fields));
    }

    ArticleTable::new(headers, records)
}
