//! Filter stage.

use std::collections::BTreeMap;

use crate::model::ColumnDescriptor;
use crate::model::Row;
use crate::model::cell;

/// Key under which the global filter is forwarded to server-side hosts.
pub const GLOBAL_FILTER_KEY: &str = "_global";

/// Per-column filter texts plus one global search text.
///
/// An empty text means "no filter": setting a column filter to `""` removes
/// its entry, so every stored entry is active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    columns: BTreeMap<String, String>,
    global: String,
}

impl FilterState {
    /// Creates an empty filter state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column filter and returns the state (builder style).
    pub fn with_column(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.set_column(key, text);
        self
    }

    /// Sets the global filter and returns the state (builder style).
    pub fn with_global(mut self, text: impl Into<String>) -> Self {
        self.set_global(text);
        self
    }

    /// Returns the filter text for a column, if one is active.
    pub fn column(&self, key: &str) -> Option<&str> {
        self.columns.get(key).map(String::as_str)
    }

    /// Iterates over active column filters in key order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Sets a column filter. Returns `true` if the state changed.
    pub fn set_column(&mut self, key: impl Into<String>, text: impl Into<String>) -> bool {
        let key = key.into();
        let text = text.into();
        if text.is_empty() {
            return self.columns.remove(&key).is_some();
        }
        match self.columns.get(&key) {
            Some(current) if *current == text => false,
            _ => {
                self.columns.insert(key, text);
                true
            }
        }
    }

    /// Returns the global filter text (empty when inactive).
    pub fn global(&self) -> &str {
        &self.global
    }

    /// Sets the global filter. Returns `true` if the state changed.
    pub fn set_global(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.global == text {
            return false;
        }
        self.global = text;
        true
    }

    /// Removes every filter. Returns `true` if anything was active.
    pub fn clear(&mut self) -> bool {
        let changed = !self.is_empty();
        self.columns.clear();
        self.global.clear();
        changed
    }

    /// Returns `true` if no filter is active.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.global.is_empty()
    }

    /// Number of active filters, counting the global filter as one.
    pub fn active_count(&self) -> usize {
        self.columns.len() + usize::from(!self.global.is_empty())
    }

    /// Flattens the state into the map forwarded to server-side hosts.
    ///
    /// The global filter, when active, travels under [`GLOBAL_FILTER_KEY`].
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut map = self.columns.clone();
        if !self.global.is_empty() {
            map.insert(GLOBAL_FILTER_KEY.to_string(), self.global.clone());
        }
        map
    }
}

/// Compiled form of a [`FilterState`] with lowercased needles resolved
/// against the column list.
struct FilterPass<'a> {
    global: Option<GlobalFilter<'a>>,
    columns: Vec<ColumnFilter<'a>>,
}

struct GlobalFilter<'a> {
    text: &'a str,
    lowered: String,
    searchable: Vec<&'a ColumnDescriptor>,
}

struct ColumnFilter<'a> {
    key: &'a str,
    column: Option<&'a ColumnDescriptor>,
    text: &'a str,
    lowered: String,
}

impl<'a> FilterPass<'a> {
    fn new(columns: &'a [ColumnDescriptor], state: &'a FilterState) -> Self {
        let global = (!state.global.is_empty()).then(|| GlobalFilter {
            text: &state.global,
            lowered: state.global.to_lowercase(),
            searchable: columns
                .iter()
                .filter(|c| c.filterable && !c.is_selection())
                .collect(),
        });

        let columns = state
            .columns()
            .map(|(key, text)| ColumnFilter {
                key,
                column: columns.iter().find(|c| c.key == key),
                text,
                lowered: text.to_lowercase(),
            })
            .collect();

        Self { global, columns }
    }

    fn matches(&self, row: &Row) -> bool {
        if let Some(global) = &self.global
            && !global
                .searchable
                .iter()
                .any(|c| c.matches(row, global.text, &global.lowered))
        {
            return false;
        }

        self.columns.iter().all(|filter| match filter.column {
            Some(column) => column.matches(row, filter.text, &filter.lowered),
            None => cell::contains_ignore_case(row.get(filter.key), &filter.lowered),
        })
    }
}

/// Returns the positions of the rows that pass every active filter, in
/// dataset order.
pub fn filter_indices(rows: &[Row], columns: &[ColumnDescriptor], state: &FilterState) -> Vec<usize> {
    if state.is_empty() {
        return (0..rows.len()).collect();
    }
    let pass = FilterPass::new(columns, state);
    rows.iter()
        .enumerate()
        .filter(|(_, row)| pass.matches(row))
        .map(|(index, _)| index)
        .collect()
}

/// Applies the global and per-column filters to `rows`.
///
/// A row is kept when at least one filterable column contains the global text
/// and every active column filter matches. Matching is case-insensitive
/// substring containment on the stringified cell unless the column carries a
/// custom predicate.
pub fn apply_filters<'a>(rows: &'a [Row], columns: &[ColumnDescriptor], state: &FilterState) -> Vec<&'a Row> {
    filter_indices(rows, columns, state)
        .into_iter()
        .map(|index| &rows[index])
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("id", "ID"),
            ColumnDescriptor::new("name", "Name"),
            ColumnDescriptor::new("status", "Status"),
            ColumnDescriptor::new("secret", "Secret").with_filtering(false),
        ]
    }

    fn rows() -> Vec<Row> {
        vec![
            Row::new().set("id", 1).set("name", "John Doe").set("status", "Active").set("secret", "alpha"),
            Row::new().set("id", 2).set("name", "Jane Smith").set("status", "Inactive").set("secret", "doe"),
            Row::new().set("id", 3).set("name", "Jim Doe").set("status", "Active"),
        ]
    }

    #[test]
    fn test_empty_state_keeps_everything() {
        let rows = rows();
        assert_eq!(apply_filters(&rows, &columns(), &FilterState::new()).len(), 3);
    }

    #[test]
    fn test_global_filter_is_case_insensitive() {
        let rows = rows();
        let state = FilterState::new().with_global("DOE");
        assert_eq!(filter_indices(&rows, &columns(), &state), vec![0, 2]);
    }

    #[test]
    fn test_global_filter_skips_unfilterable_columns() {
        let rows = rows();
        // "alpha" only appears in the unfilterable column
        let state = FilterState::new().with_global("alpha");
        assert!(filter_indices(&rows, &columns(), &state).is_empty());
    }

    #[test]
    fn test_column_filters_are_anded() {
        let rows = rows();
        let state = FilterState::new().with_column("status", "active").with_column("name", "jim");
        assert_eq!(filter_indices(&rows, &columns(), &state), vec![2]);
    }

    #[test]
    fn test_substring_match_includes_inactive() {
        // "Inactive" contains "active"
        let rows = rows();
        let state = FilterState::new().with_column("status", "active");
        assert_eq!(filter_indices(&rows, &columns(), &state), vec![0, 1, 2]);
    }

    #[test]
    fn test_global_and_column_filters_combine() {
        let rows = rows();
        let state = FilterState::new().with_global("doe").with_column("id", "3");
        assert_eq!(filter_indices(&rows, &columns(), &state), vec![2]);
    }

    #[test]
    fn test_filter_on_object_cell_uses_json() {
        let rows = vec![Row::new().set("meta", json!({"team": "ops"}))];
        let columns = vec![ColumnDescriptor::new("meta", "Meta")];
        let state = FilterState::new().with_column("meta", "\"team\":\"ops\"");
        assert_eq!(filter_indices(&rows, &columns, &state), vec![0]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let rows = rows();
        let state = FilterState::new().with_global("doe");
        let once: Vec<Row> = apply_filters(&rows, &columns(), &state).into_iter().cloned().collect();
        let twice = apply_filters(&once, &columns(), &state);
        assert_eq!(twice.len(), once.len());
    }

    #[test]
    fn test_set_column_empty_removes_entry() {
        let mut state = FilterState::new().with_column("name", "doe");
        assert!(state.set_column("name", ""));
        assert!(state.is_empty());
        assert!(!state.set_column("name", ""));
    }

    #[test]
    fn test_active_count_and_map() {
        let state = FilterState::new().with_column("status", "Active").with_global("doe");
        assert_eq!(state.active_count(), 2);
        let map = state.to_map();
        assert_eq!(map.get("status").map(String::as_str), Some("Active"));
        assert_eq!(map.get(GLOBAL_FILTER_KEY).map(String::as_str), Some("doe"));
    }
}
