//! Plain-text rendering of the current page.

use std::fmt::Write;

use tableview_lib::TableView;
use unicode_width::UnicodeWidthStr;

const NO_RESULTS: &str = "No results.";

/// Renders the visible columns and rows as an aligned table followed by the
/// page position and the row-count summary.
pub fn render(view: &TableView) -> String {
    let columns = view.visible_columns();
    let page = view.page_indices();

    let header: Vec<String> = columns
        .iter()
        .map(|c| if c.is_selection() { "[ ]".to_string() } else { c.label.clone() })
        .collect();
    let body: Vec<Vec<String>> = page
        .iter()
        .map(|&index| {
            let row = &view.rows()[index];
            columns
                .iter()
                .map(|c| {
                    if c.is_selection() {
                        let marked = view.is_row_selected(&view.row_id(index));
                        let marker = if marked { "[x]" } else { "[ ]" };
                        marker.to_string()
                    } else {
                        single_line(&c.format(row))
                    }
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            body.iter()
                .map(|cells| cells[i].width())
                .chain(std::iter::once(header[i].width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    if body.is_empty() {
        out.push_str(NO_RESULTS);
        out.push('\n');
    }
    for cells in &body {
        push_line(&mut out, cells, &widths);
    }

    let _ = writeln!(
        out,
        "\nPage {} of {} | {}",
        view.page_index() + 1,
        view.page_count(),
        view.summary()
    );
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{}{}", cell, " ".repeat(width.saturating_sub(cell.width()))))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}
