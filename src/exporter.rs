//! Table accumulation and CSV rendering.

use crate::common::{Field, Row};
use crate::dialect::Dialect;
use crate::error::CsvError;
use chrono::Local;
use log::debug;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Content-Type suggested for downloads unless overridden.
const DEFAULT_CONTENT_TYPE: &str = "text/x-csv";

/// A rendered CSV payload ready to hand to an HTTP layer.
///
/// The exporter only supplies bytes, a suggested filename and an optional
/// content-type; headers and transport belong to the caller.
#[derive(Debug, Clone)]
pub struct CsvDownload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: Option<String>,
}

/// Accumulates rows and renders them as CSV bytes per a [`Dialect`].
///
/// Rendering is pure with respect to exporter state: calling [`render`]
/// repeatedly on an unmodified exporter yields byte-identical output.
///
/// [`render`]: CsvExporter::render
#[derive(Debug, Clone)]
pub struct CsvExporter {
    dialect: Dialect,
    rows: Vec<Row>,
    content_type: String,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvExporter {
    /// Empty exporter with the default dialect (CRLF rows, TAB separator,
    /// doubled double-quotes, UCS-2LE output).
    pub fn new() -> Self {
        Self {
            dialect: Dialect::default(),
            rows: Vec::new(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }

    /// Empty exporter with an explicit dialect.
    pub fn with_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::new()
        }
    }

    /// Exporter pre-filled with a header row and keyed records; the header
    /// values double as the projection keys for every record.
    pub fn from_table<S: AsRef<str>>(
        headers: &[S],
        records: &[Map<String, Value>],
    ) -> Result<Self, CsvError> {
        let mut exporter = Self::new();
        exporter.append_table_with_headers(headers, records)?;
        Ok(exporter)
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub fn dialect_mut(&mut self) -> &mut Dialect {
        &mut self.dialect
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Set the content-type suggested by [`to_download`]; an empty string
    /// means "suggest none".
    ///
    /// [`to_download`]: CsvExporter::to_download
    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = content_type.into();
    }

    /// Append one row.
    pub fn append_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Project a keyed record through `keys`, in order, and append the
    /// resulting row. A missing key fails the whole call; nothing is
    /// appended.
    pub fn append_row_by_keys<S: AsRef<str>>(
        &mut self,
        keys: &[S],
        record: &Map<String, Value>,
    ) -> Result<(), CsvError> {
        let mut row = Row::with_capacity(keys.len());
        for key in keys {
            let key = key.as_ref();
            let value = record
                .get(key)
                .ok_or_else(|| CsvError::MissingField(key.to_string()))?;
            row.push(Field::from(value));
        }
        self.append_row(row);
        Ok(())
    }

    /// Append every row of `rows`, preserving order.
    pub fn append_table(&mut self, rows: impl IntoIterator<Item = Row>) {
        self.rows.extend(rows);
    }

    /// Apply [`append_row_by_keys`] to each record in order.
    ///
    /// [`append_row_by_keys`]: CsvExporter::append_row_by_keys
    pub fn append_table_by_keys<S: AsRef<str>>(
        &mut self,
        keys: &[S],
        records: &[Map<String, Value>],
    ) -> Result<(), CsvError> {
        for record in records {
            self.append_row_by_keys(keys, record)?;
        }
        Ok(())
    }

    /// Append `headers` as a literal text row, then one projected row per
    /// record. The header values double as the lookup keys, coupling header
    /// text to record key names.
    pub fn append_table_with_headers<S: AsRef<str>>(
        &mut self,
        headers: &[S],
        records: &[Map<String, Value>],
    ) -> Result<(), CsvError> {
        self.append_row(headers.iter().map(|h| Field::from(h.as_ref())).collect());
        self.append_table_by_keys(headers, records)
    }

    /// The CSV text before charset conversion and BOM prefixing.
    ///
    /// Number fields are emitted verbatim. Text fields are wrapped in the
    /// dialect's quote with each interior quote prefixed by the escape.
    pub fn to_csv_string(&self) -> String {
        let quote = &self.dialect.quote;
        let escaped_quote = format!("{}{}", self.dialect.escape, quote);
        let mut out = String::new();

        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                out.push_str(&self.dialect.terminator);
            }
            for (j, field) in row.iter().enumerate() {
                if j > 0 {
                    out.push_str(&self.dialect.separator);
                }
                match field {
                    Field::Number(n) => out.push_str(&n.to_string()),
                    Field::Text(s) => {
                        out.push_str(quote);
                        out.push_str(&s.replace(quote.as_str(), &escaped_quote));
                        out.push_str(quote);
                    }
                }
            }
        }

        out
    }

    /// Render the accumulated rows to final bytes: dialect-formatted text,
    /// converted to the configured charset, BOM prepended exactly once.
    pub fn render(&self) -> Result<Vec<u8>, CsvError> {
        let text = self.to_csv_string();
        let bytes = self.dialect.prepend_bom(self.dialect.convert_to_charset(&text)?);
        debug!(
            "rendered {} rows into {} bytes ({})",
            self.rows.len(),
            bytes.len(),
            self.dialect.charset
        );
        Ok(bytes)
    }

    /// Render and write to `path`. Returns `Ok(false)` without touching the
    /// file when it already exists and `overwrite` is false.
    pub fn save_as(&self, path: impl AsRef<Path>, overwrite: bool) -> Result<bool, CsvError> {
        let path = path.as_ref();
        if !overwrite && path.exists() {
            debug!("not overwriting existing file {}", path.display());
            return Ok(false);
        }
        fs::write(path, self.render()?)?;
        Ok(true)
    }

    /// Render into a download payload with a timestamped filename such as
    /// `report_2026-08-29_14-05.csv`.
    pub fn to_download(&self, base_name: &str) -> Result<CsvDownload, CsvError> {
        let bytes = self.render()?;
        let file_name = format!(
            "{}_{}.csv",
            base_name,
            Local::now().format("%Y-%m-%d_%H-%M")
        );
        let content_type = if self.content_type.is_empty() {
            None
        } else {
            Some(self.content_type.clone())
        };
        Ok(CsvDownload {
            bytes,
            file_name,
            content_type,
        })
    }
}
