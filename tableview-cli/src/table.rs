//! Builds a [`TableView`] from files and command-line flags.

use std::path::Path;

use serde_json::Value;
use tableview_lib::model::{ColumnDescriptor, ColumnSpec, Row};
use tableview_lib::view::SortState;
use tableview_lib::{TableConfig, TableView};

use crate::args::ViewArgs;
use crate::error::CliError;

/// Loads the data and column files and applies every view flag.
pub async fn build(args: &ViewArgs, config: TableConfig) -> Result<TableView, CliError> {
    let rows = load_rows(&args.data).await?;
    let columns = match &args.columns {
        Some(path) => load_columns(path).await?,
        None => infer_columns(&rows),
    };
    log::info!("Loaded {} row(s), {} column(s)", rows.len(), columns.len());

    let mut view = TableView::new(columns, config)?.with_rows(rows);
    apply(&mut view, args)?;
    Ok(view)
}

/// Applies the view flags in the order a user would click through them.
pub fn apply(view: &mut TableView, args: &ViewArgs) -> Result<(), CliError> {
    for key in &args.hide {
        view.set_column_visibility(key, false)?;
    }
    for (key, text) in &args.filter {
        view.set_column_filter(key, text.as_str())?;
    }
    if let Some(search) = &args.search {
        view.set_global_filter(search.as_str());
    }
    if let Some((key, direction)) = &args.sort {
        view.set_sort(SortState::by(key.as_str(), *direction))?;
    }
    if let Some(size) = args.page_size {
        view.set_page_size(size)?;
    }
    view.go_to_page(args.page.saturating_sub(1));
    Ok(())
}

async fn read_json(path: &Path) -> Result<Value, CliError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

async fn load_rows(path: &Path) -> Result<Vec<Row>, CliError> {
    let Value::Array(items) = read_json(path).await? else {
        return Err(CliError::InvalidData {
            path: path.to_path_buf(),
            reason: "expected an array of objects".to_string(),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            Row::from_json(item).ok_or_else(|| CliError::InvalidData {
                path: path.to_path_buf(),
                reason: format!("item {} is not an object", index),
            })
        })
        .collect()
}

async fn load_columns(path: &Path) -> Result<Vec<ColumnDescriptor>, CliError> {
    let specs: Vec<ColumnSpec> =
        serde_json::from_value(read_json(path).await?).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(specs.into_iter().map(ColumnDescriptor::from).collect())
}

/// One column per field of the first row, labelled with the field name.
fn infer_columns(rows: &[Row]) -> Vec<ColumnDescriptor> {
    rows.first()
        .map(|row| {
            row.fields()
                .keys()
                .map(|key| ColumnDescriptor::new(key.as_str(), key.as_str()))
                .collect()
        })
        .unwrap_or_default()
}
