//! Data models for the metadata table and its scraped article bodies.
//!
//! - [`ArticleRecord`]: one row of the input table, fields aligned with the header
//! - [`ArticleTable`]: the header row plus every record, in load order
//! - [`ScrapeSummary`]: counts reported by the sequential driver
//!
//! The table is materialized fully in memory, gains exactly one derived
//! column (`body_text`) and is then serialized once.

use thiserror::Error;

/// Name of the required input column holding article URLs.
pub const URL_COLUMN: &str = "url";
/// Name of the optional passthrough column holding article titles.
pub const TITLE_COLUMN: &str = "title";
/// Name of the derived column appended after scraping.
pub const BODY_TEXT_COLUMN: &str = "body_text";

/// Errors raised while loading, augmenting or writing an [`ArticleTable`].
#[derive(Error, Debug)]
pub enum TableError {
    #[error("required column `{0}` is missing from the header row")]
    MissingColumn(String),

    #[error("row {row} has {found} fields but the header has {expected}")]
    Malformed {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("expected {expected} body texts, got {found}")]
    RowCountMismatch { expected: usize, found: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single row of the metadata table.
///
/// `fields` is aligned index-for-index with [`ArticleTable::headers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub fields: Vec<String>,
}

impl ArticleRecord {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Field at column position `idx`, or `""` when the row has no such cell.
    pub fn field(&self, idx: usize) -> &str {
        self.fields.get(idx).map(String::as_str).unwrap_or("")
    }
}

/// The loaded metadata table.
///
/// Column order and row order are exactly those of the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleTable {
    headers: Vec<String>,
    records: Vec<ArticleRecord>,
    url_index: usize,
}

impl ArticleTable {
    /// Build a table, locating the required `url` column.
    ///
    /// # Errors
    ///
    /// [`TableError::MissingColumn`] when no header is exactly `url`.
    pub fn new(headers: Vec<String>, records: Vec<ArticleRecord>) -> Result<Self, TableError> {
        let url_index = headers
            .iter()
            .position(|h| h == URL_COLUMN)
            .ok_or_else(|| TableError::MissingColumn(URL_COLUMN.to_string()))?;
        Ok(Self {
            headers,
            records,
            url_index,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of a column by exact header name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Value of column `name` in row `row`, if both exist.
    pub fn value(&self, row: usize, name: &str) -> Option<&str> {
        let idx = self.column(name)?;
        self.records.get(row).map(|r| r.field(idx))
    }

    /// Every URL in row order, duplicates included.
    pub fn urls(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().map(|r| r.field(self.url_index))
    }

    /// Attach the scraped bodies as the `body_text` column.
    ///
    /// The column is appended after the existing ones; if the input already
    /// carried a `body_text` column its values are replaced in place instead.
    ///
    /// # Errors
    ///
    /// [`TableError::RowCountMismatch`] when `bodies` is not aligned 1:1 with
    /// the records. The table is left untouched in that case.
    pub fn set_body_texts(&mut self, bodies: Vec<String>) -> Result<(), TableError> {
        if bodies.len() != self.records.len() {
            return Err(TableError::RowCountMismatch {
                expected: self.records.len(),
                found: bodies.len(),
            });
        }

        match self.column(BODY_TEXT_COLUMN) {
            Some(idx) => {
                for (record, body) in self.records.iter_mut().zip(bodies) {
                    if record.fields.len() <= idx {
                        record.fields.resize(idx + 1, String::new());
                    }
                    record.fields[idx] = body;
                }
            }
            None => {
                let width = self.headers.len();
                self.headers.push(BODY_TEXT_COLUMN.to_string());
                for (record, body) in self.records.iter_mut().zip(bodies) {
                    record.fields.resize(width, String::new());
                    record.fields.push(body);
                }
            }
        }
        Ok(())
    }
}

/// Outcome counts for one scraping pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub total: usize,
    pub extracted: usize,
    pub empty: usize,
}
