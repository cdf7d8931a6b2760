//! Export error types

/// Errors that can occur while producing an export file.
///
/// An export failure never touches the table's in-memory state, and file
/// exports never leave a partially written file behind.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The delimited-text writer failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The workbook encoder rejected the data.
    #[cfg(feature = "xlsx")]
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// The encoding for this format was not compiled in.
    #[error("{0} export is not available in this build")]
    CodecUnavailable(&'static str),

    /// The encoded output was not valid UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The table is too large for the target format.
    #[error("Too many {what} for {format} export: {count}")]
    TooLarge {
        /// Export format name.
        format: &'static str,
        /// What overflowed ("rows" or "columns").
        what: &'static str,
        /// The offending count.
        count: usize,
    },

    /// Writing the export file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The background encoding task did not complete.
    #[error("Export worker failed: {0}")]
    Worker(String),
}

impl From<tokio::task::JoinError> for ExportError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Worker(err.to_string())
    }
}
