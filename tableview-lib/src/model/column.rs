//! Column descriptors

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use super::Row;
use super::cell;
use crate::error::ConfigError;

/// Renders a cell for display. Receives the cell value (`null` when the field
/// is missing) and the whole row.
pub type CellFormatter = Arc<dyn Fn(&Value, &Row) -> String + Send + Sync>;

/// Custom column filter. Receives the cell value (`null` when the field is
/// missing) and the filter text exactly as the user typed it.
pub type FilterPredicate = Arc<dyn Fn(&Value, &str) -> bool + Send + Sync>;

/// Key used for the selection pseudo-column created by the table.
pub const SELECTION_COLUMN_KEY: &str = "select";

/// What a column displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnKind {
    /// A field of the row.
    #[default]
    Data,
    /// The row-selection marker. Never sorted, filtered, hidden or exported.
    Selection,
}

/// Static description of one table column.
///
/// # Example
///
/// ```
/// use tableview_lib::model::ColumnDescriptor;
///
/// let salary = ColumnDescriptor::new("salary", "Salary")
///     .with_filtering(false)
///     .with_formatter(|value, _row| format!("${}", value));
///
/// assert!(salary.sortable);
/// assert!(!salary.filterable);
/// ```
#[derive(Clone)]
pub struct ColumnDescriptor {
    /// Field name this column reads. Unique within a table.
    pub key: String,
    /// Header text.
    pub label: String,
    /// Data or selection column.
    pub kind: ColumnKind,
    /// Whether clicking the header sorts by this column.
    pub sortable: bool,
    /// Whether the user may hide this column.
    pub hideable: bool,
    /// Whether the column takes part in global and per-column filtering.
    pub filterable: bool,
    formatter: Option<CellFormatter>,
    predicate: Option<FilterPredicate>,
}

impl ColumnDescriptor {
    /// Creates a data column with sorting, hiding and filtering enabled.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: ColumnKind::Data,
            sortable: true,
            hideable: true,
            filterable: true,
            formatter: None,
            predicate: None,
        }
    }

    /// Creates the row-selection pseudo-column.
    pub fn selection() -> Self {
        Self {
            key: SELECTION_COLUMN_KEY.to_string(),
            label: String::new(),
            kind: ColumnKind::Selection,
            sortable: false,
            hideable: false,
            filterable: false,
            formatter: None,
            predicate: None,
        }
    }

    /// Enables or disables sorting.
    pub fn with_sorting(mut self, enabled: bool) -> Self {
        self.sortable = enabled;
        self
    }

    /// Enables or disables hiding.
    pub fn with_hiding(mut self, enabled: bool) -> Self {
        self.hideable = enabled;
        self
    }

    /// Enables or disables filtering.
    pub fn with_filtering(mut self, enabled: bool) -> Self {
        self.filterable = enabled;
        self
    }

    /// Sets a custom display formatter.
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Value, &Row) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Sets a custom filter predicate replacing case-insensitive containment.
    pub fn with_filter_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value, &str) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Filters by case-insensitive equality of the whole cell instead of
    /// containment, so `"Active"` no longer matches `"Inactive"`.
    pub fn with_exact_match(self) -> Self {
        self.with_filter_predicate(|value, text| {
            cell::stringify(Some(value)).to_lowercase() == text.to_lowercase()
        })
    }

    /// Returns `true` for the selection pseudo-column.
    pub fn is_selection(&self) -> bool {
        self.kind == ColumnKind::Selection
    }

    /// Returns `true` if the column has a custom formatter.
    pub fn has_formatter(&self) -> bool {
        self.formatter.is_some()
    }

    /// Returns this column's value in `row`.
    pub fn value<'a>(&self, row: &'a Row) -> Option<&'a Value> {
        match self.kind {
            ColumnKind::Data => row.get(&self.key),
            ColumnKind::Selection => None,
        }
    }

    /// Renders this column's cell for display.
    pub fn format(&self, row: &Row) -> String {
        let value = self.value(row);
        match &self.formatter {
            Some(formatter) => formatter(value.unwrap_or(&Value::Null), row),
            None => cell::stringify(value),
        }
    }

    /// Tests `row` against a column filter.
    ///
    /// `text` is the raw filter text; `lowered` is the same text lowercased,
    /// computed once per filter pass by the caller.
    pub(crate) fn matches(&self, row: &Row, text: &str, lowered: &str) -> bool {
        let value = self.value(row);
        match &self.predicate {
            Some(predicate) => predicate(value.unwrap_or(&Value::Null), text),
            None => cell::contains_ignore_case(value, lowered),
        }
    }

    fn validate(&self, position: usize) -> Result<(), ConfigError> {
        if self.key.is_empty() {
            return Err(ConfigError::EmptyKey { position });
        }
        match self.kind {
            ColumnKind::Data if self.label.trim().is_empty() => {
                Err(ConfigError::EmptyLabel(self.key.clone()))
            }
            ColumnKind::Selection if self.sortable || self.hideable || self.filterable => {
                Err(ConfigError::InvalidSelectionColumn(self.key.clone()))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("sortable", &self.sortable)
            .field("hideable", &self.hideable)
            .field("filterable", &self.filterable)
            .field("formatter", &self.formatter.is_some())
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

/// Checks a full descriptor list: every descriptor valid, keys unique, at
/// most one selection column.
pub fn validate_columns(columns: &[ColumnDescriptor]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    let mut selection_seen = false;

    for (position, column) in columns.iter().enumerate() {
        column.validate(position)?;
        if !seen.insert(column.key.as_str()) {
            return Err(ConfigError::DuplicateKey(column.key.clone()));
        }
        if column.is_selection() {
            if selection_seen {
                return Err(ConfigError::DuplicateSelectionColumn(column.key.clone()));
            }
            selection_seen = true;
        }
    }
    Ok(())
}

/// Built-in filter functions selectable from a [`ColumnSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterFn {
    /// Case-insensitive substring containment.
    #[default]
    IncludesString,
    /// Case-insensitive equality.
    EqualsString,
}

/// Serializable column configuration.
///
/// Uses the field names of the JavaScript table configuration the column
/// files are usually exported from (`accessorKey`, `header`, `enable*`).
///
/// # Example
///
/// ```
/// use tableview_lib::model::{ColumnDescriptor, ColumnSpec};
///
/// let spec: ColumnSpec = serde_json::from_str(
///     r#"{"accessorKey": "email", "header": "Email", "enableSorting": false}"#,
/// ).unwrap();
/// let column = ColumnDescriptor::from(spec);
///
/// assert_eq!(column.key, "email");
/// assert!(!column.sortable);
/// assert!(column.filterable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    /// Field name.
    pub accessor_key: String,
    /// Header text.
    pub header: String,
    /// Sorting enabled (default `true`).
    #[serde(default = "enabled")]
    pub enable_sorting: bool,
    /// Hiding enabled (default `true`).
    #[serde(default = "enabled")]
    pub enable_hiding: bool,
    /// Filtering enabled (default `true`).
    #[serde(default = "enabled")]
    pub enable_filtering: bool,
    /// Filter function (default `includesString`).
    #[serde(default)]
    pub filter_fn: FilterFn,
}

fn enabled() -> bool {
    true
}

impl From<ColumnSpec> for ColumnDescriptor {
    fn from(spec: ColumnSpec) -> Self {
        let column = ColumnDescriptor::new(spec.accessor_key, spec.header)
            .with_sorting(spec.enable_sorting)
            .with_hiding(spec.enable_hiding)
            .with_filtering(spec.enable_filtering);
        match spec.filter_fn {
            FilterFn::IncludesString => column,
            FilterFn::EqualsString => column.with_exact_match(),
        }
    }
}
