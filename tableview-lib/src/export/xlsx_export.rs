//! Workbook export.

use super::ExportTable;
use crate::error::ExportError;

/// Name of the single worksheet in an exported workbook.
pub const SHEET_NAME: &str = "Data";

/// Narrowest column width, in characters.
pub const MIN_COLUMN_WIDTH: usize = 15;

/// Width of an exported column: the header length, but never narrower than
/// [`MIN_COLUMN_WIDTH`].
pub fn column_width(label: &str) -> usize {
    label.chars().count().max(MIN_COLUMN_WIDTH)
}

/// Encodes `table` as an XLSX workbook.
///
/// The workbook holds one sheet named [`SHEET_NAME`] with the header labels in
/// the first row. Numbers and booleans are written as native cells, strings as
/// text, arrays and objects as canonical JSON text; missing and `null` cells
/// are left blank.
#[cfg(feature = "xlsx")]
pub fn to_xlsx(table: &ExportTable) -> Result<Vec<u8>, ExportError> {
    use rust_xlsxwriter::Workbook;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (index, column) in table.columns().iter().enumerate() {
        let col = column_number(index)?;
        sheet.write_string(0, col, &column.label)?;
        sheet.set_column_width(col, column_width(&column.label) as f64)?;
    }

    for (index, row) in table.rows().iter().enumerate() {
        let row_number = u32::try_from(index + 1).map_err(|_| ExportError::TooLarge {
            format: "XLSX",
            what: "rows",
            count: table.row_count(),
        })?;
        for (col, value) in row.iter().enumerate() {
            write_cell(sheet, row_number, column_number(col)?, value)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Reports that workbook export was not compiled in.
#[cfg(not(feature = "xlsx"))]
pub fn to_xlsx(_table: &ExportTable) -> Result<Vec<u8>, ExportError> {
    Err(ExportError::CodecUnavailable("XLSX"))
}

#[cfg(feature = "xlsx")]
fn column_number(index: usize) -> Result<u16, ExportError> {
    u16::try_from(index).map_err(|_| ExportError::TooLarge {
        format: "XLSX",
        what: "columns",
        count: index + 1,
    })
}

#[cfg(feature = "xlsx")]
fn write_cell(
    sheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    value: &serde_json::Value,
) -> Result<(), ExportError> {
    use serde_json::Value;

    use crate::model::cell;

    match value {
        Value::Null => {}
        Value::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
        Value::Number(n) => match n.as_f64() {
            Some(number) => {
                sheet.write_number(row, col, number)?;
            }
            None => {
                sheet.write_string(row, col, n.to_string())?;
            }
        },
        Value::String(s) => {
            sheet.write_string(row, col, s)?;
        }
        Value::Array(_) | Value::Object(_) => {
            sheet.write_string(row, col, cell::canonical_json(value))?;
        }
    }
    Ok(())
}

#[cfg(all(test, feature = "xlsx"))]
mod tests {
    use std::io::Cursor;
    use std::io::Read;

    use calamine::Data;
    use calamine::Reader;
    use calamine::Xlsx;
    use serde_json::json;

    use super::*;
    use crate::model::ColumnDescriptor;
    use crate::model::Row;

    const LONG_LABEL: &str = "A very long column header";

    fn sample() -> Vec<u8> {
        let columns = [
            ColumnDescriptor::new("id", "ID"),
            ColumnDescriptor::new("note", LONG_LABEL),
            ColumnDescriptor::new("active", "Active"),
            ColumnDescriptor::new("tags", "Tags"),
        ];
        let rows = [
            Row::new()
                .set("id", 1)
                .set("note", "first")
                .set("active", true)
                .set("tags", json!({"b": 1, "a": 2})),
            Row::new().set("id", 2.5).set("active", false),
        ];
        to_xlsx(&ExportTable::new(&columns, &rows)).unwrap()
    }

    fn attr<'a>(element: &'a str, name: &str) -> &'a str {
        let key = format!("{}=\"", name);
        let start = element.find(&key).unwrap() + key.len();
        let len = element[start..].find('"').unwrap();
        &element[start..start + len]
    }

    /// Width stored for the 1-based column `col` in the first worksheet.
    fn stored_width(bytes: &[u8], col: u16) -> f64 {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive
            .by_name("xl/worksheets/sheet1.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();

        xml.split("<col ")
            .skip(1)
            .map(|rest| &rest[..rest.find("/>").unwrap()])
            .find(|element| {
                let min: u16 = attr(element, "min").parse().unwrap();
                let max: u16 = attr(element, "max").parse().unwrap();
                (min..=max).contains(&col)
            })
            .map(|element| attr(element, "width").parse().unwrap())
            .unwrap()
    }

    #[test]
    fn test_column_width_minimum() {
        assert_eq!(column_width("ID"), 15);
        assert_eq!(column_width(LONG_LABEL), 25);
    }

    #[test]
    fn test_workbook_sheet_and_cells() {
        let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(sample())).unwrap();
        assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);

        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        let cell = |row: u32, col: u32| range.get_value((row, col)).cloned().unwrap_or(Data::Empty);

        assert_eq!(cell(0, 0), Data::String("ID".into()));
        assert_eq!(cell(0, 1), Data::String(LONG_LABEL.into()));
        assert_eq!(cell(0, 2), Data::String("Active".into()));
        assert_eq!(cell(0, 3), Data::String("Tags".into()));

        assert_eq!(cell(1, 0), Data::Float(1.0));
        assert_eq!(cell(1, 1), Data::String("first".into()));
        assert_eq!(cell(1, 2), Data::Bool(true));
        assert_eq!(cell(1, 3), Data::String(r#"{"a":2,"b":1}"#.into()));

        assert_eq!(cell(2, 0), Data::Float(2.5));
        assert_eq!(cell(2, 1), Data::Empty);
        assert_eq!(cell(2, 2), Data::Bool(false));
    }

    #[test]
    fn test_workbook_column_widths() {
        let bytes = sample();
        let narrow = stored_width(&bytes, 1);
        let long = stored_width(&bytes, 2);

        // Excel stores the character width plus a small padding fraction.
        assert!((15.0..16.0).contains(&narrow), "width {}", narrow);
        assert!((25.0..26.0).contains(&long), "width {}", long);
    }

    #[test]
    fn test_workbook_for_empty_table() {
        let columns = [ColumnDescriptor::new("id", "ID")];
        let bytes = to_xlsx(&ExportTable::new(&columns, &Vec::<Row>::new())).unwrap();

        let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        assert_eq!(range.get_size(), (1, 1));
        assert_eq!(range.get_value((0, 0)), Some(&Data::String("ID".into())));
    }
}
