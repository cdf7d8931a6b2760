//! Delimited-text export.

use csv::QuoteStyle;
use csv::Terminator;
use csv::WriterBuilder;

use super::ExportTable;
use crate::error::ExportError;
use crate::model::cell;

/// Encodes `table` as CSV.
///
/// The first record holds the header labels. Every field is wrapped in double
/// quotes with embedded quotes doubled; records are separated by `\n` with no
/// trailing newline. Missing and `null` cells become empty fields, arrays and
/// objects their canonical JSON.
///
/// # Example
///
/// ```
/// use tableview_lib::export::{ExportTable, to_csv};
/// use tableview_lib::model::{ColumnDescriptor, Row};
///
/// let columns = [ColumnDescriptor::new("name", "Name")];
/// let rows = [Row::new().set("name", r#"Dwayne "The Rock" Johnson"#)];
///
/// let csv = to_csv(&ExportTable::new(&columns, &rows)).unwrap();
/// assert_eq!(csv, "\"Name\"\n\"Dwayne \"\"The Rock\"\" Johnson\"");
/// ```
pub fn to_csv(table: &ExportTable) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(table.labels())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|value| cell::stringify(Some(value))))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    let mut text = String::from_utf8(bytes).map_err(|err| ExportError::Encoding(err.to_string()))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}
