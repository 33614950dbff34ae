//! Output generation for the augmented metadata table.
//!
//! # Submodules
//!
//! - [`csv`]: Serializes an [`ArticleTable`](crate::models::ArticleTable) to a
//!   BOM-prefixed UTF-8 CSV file
//!
//! # Output Layout
//!
//! ```text
//! <output>.csv
//! ├── BOM (EF BB BF)
//! ├── header row: original columns..., body_text
//! └── one row per input record, in input order
//! ```

pub mod csv;
