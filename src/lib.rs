//! # table2csv_rs
//!
//! A small CSV serialization helper. Rows of mixed scalar values accumulate
//! in an exporter and render to bytes under a configurable [`Dialect`]:
//! cell separator, row terminator, quote/escape characters and output
//! charset, with a BOM prepended where one is registered for that charset.
//!
//! Number fields are emitted verbatim; everything else is quoted, with
//! interior quote characters escaped. The split is decided by the [`Field`]
//! variant, never guessed from content, so the string `"42"` stays quoted.
//!
//! ## Example
//!
//! ```rust
//! use table2csv_rs::{CsvExporter, Dialect, Field};
//!
//! let mut exporter = CsvExporter::with_dialect(Dialect {
//!     charset: "UTF-8".to_string(),
//!     ..Dialect::default()
//! });
//! exporter.append_row(vec![Field::from(1), Field::from("x\"y")]);
//! exporter.append_row(vec![Field::from(2.5), Field::from("z")]);
//!
//! assert_eq!(exporter.to_csv_string(), "1\t\"x\"\"y\"\r\n2.5\t\"z\"");
//!
//! // Rendered bytes carry the BOM registered for the charset.
//! let bytes = exporter.render().unwrap();
//! assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
//! ```
//!
//! Keyed records project through an ordered key list, and a header-driven
//! convenience reuses the header values as those keys:
//!
//! ```rust
//! use serde_json::json;
//! use table2csv_rs::CsvExporter;
//!
//! let records = vec![
//!     json!({"id": 1, "name": "A"}).as_object().unwrap().clone(),
//!     json!({"id": 2, "name": "B"}).as_object().unwrap().clone(),
//! ];
//! let exporter = CsvExporter::from_table(&["id", "name"], &records).unwrap();
//! assert_eq!(exporter.len(), 3); // header row + two data rows
//! ```

mod common;
mod dialect;
mod error;
mod exporter;

// Re-export public API
pub use common::{Field, Row};
pub use dialect::{bom_for, Dialect};
pub use error::CsvError;
pub use exporter::{CsvDownload, CsvExporter};
