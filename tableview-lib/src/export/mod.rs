//! CSV and XLSX export of the filtered table.
//!
//! Exports cover every row that passes the current filters (in sorted order,
//! across all pages) and every visible data column. The selection column and
//! hidden columns never appear. Cell formatters are not applied; cells are
//! written from their raw values.

mod csv_export;
mod xlsx_export;

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use chrono::NaiveDate;
use chrono::Utc;
use serde_json::Value;

pub use csv_export::to_csv;
pub use xlsx_export::SHEET_NAME;
pub use xlsx_export::column_width;
pub use xlsx_export::to_xlsx;
use crate::error::ExportError;
use crate::model::ColumnDescriptor;
use crate::model::Row;

/// Stem shared by every export file name.
pub const FILE_STEM: &str = "table-data";

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Comma-separated values, every field quoted.
    Csv,
    /// Excel workbook with a single `Data` sheet.
    Xlsx,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// MIME type of the encoded file.
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    /// Encodes `table` in this format.
    pub fn encode(self, table: &ExportTable) -> Result<Vec<u8>, ExportError> {
        match self {
            ExportFormat::Csv => to_csv(table).map(String::into_bytes),
            ExportFormat::Xlsx => to_xlsx(table),
        }
    }
}

/// Builds the export file name for `date`: `table-data-YYYY-MM-DD.<ext>`.
pub fn file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!("{}-{}.{}", FILE_STEM, date.format("%Y-%m-%d"), format.extension())
}

/// Builds the export file name for today's (UTC) date.
pub fn file_name_today(format: ExportFormat) -> String {
    file_name(format, Utc::now().date_naive())
}

/// A column as it appears in an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportColumn {
    /// Field name.
    pub key: String,
    /// Header label.
    pub label: String,
}

/// Snapshot of the rows and columns to export.
///
/// Owns its data so encoding can run off the UI thread while the table
/// keeps changing.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    columns: Vec<ExportColumn>,
    rows: Vec<Vec<Value>>,
}

impl ExportTable {
    /// Captures `rows` projected onto `columns`.
    ///
    /// Selection columns are skipped; callers pass only the columns they
    /// want exported, in display order.
    pub fn new<'a, C, R>(columns: C, rows: R) -> Self
    where
        C: IntoIterator<Item = &'a ColumnDescriptor>,
        R: IntoIterator<Item = &'a Row>,
    {
        let columns: Vec<ExportColumn> = columns
            .into_iter()
            .filter(|c| !c.is_selection())
            .map(|c| ExportColumn {
                key: c.key.clone(),
                label: c.label.clone(),
            })
            .collect();

        let rows = rows
            .into_iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| row.get(&c.key).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Exported columns in order.
    pub fn columns(&self) -> &[ExportColumn] {
        &self.columns
    }

    /// Header labels in column order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.label.as_str())
    }

    /// Cell values, one vector per row in column order.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of data rows (excluding the header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Writes `bytes` to `dir/name` without ever exposing a partial file.
///
/// Each call writes its own uniquely named temporary file in `dir` and
/// renames it into place once complete, so overlapping writes to the same
/// name never share a temporary file. The last rename wins.
pub async fn write_atomic(dir: &Path, name: &str, bytes: Vec<u8>) -> Result<PathBuf, ExportError> {
    let dir = dir.to_path_buf();
    let target = dir.join(name);
    tokio::task::spawn_blocking(move || persist_in(&dir, &target, &bytes)).await?
}

fn persist_in(dir: &Path, target: &Path, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    // Dropping the temporary file on any early return removes it.
    let mut partial = tempfile::Builder::new()
        .prefix(".table-data-")
        .suffix(".partial")
        .tempfile_in(dir)?;
    partial.write_all(bytes)?;
    partial.as_file().sync_all()?;
    partial.persist(target).map_err(|err| err.error)?;
    Ok(target.to_path_buf())
}
