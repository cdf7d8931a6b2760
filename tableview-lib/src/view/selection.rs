//! Row selection state.

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::model::RowId;

/// Which rows "select all" acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectAllScope {
    /// Every row matching the current filters, across all pages.
    #[default]
    Filtered,
    /// Only the rows on the current page.
    Page,
}

/// Tracks selected rows by identity.
///
/// A disabled selection ignores every toggle and stays empty.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    enabled: bool,
    selected: HashSet<RowId>,
}

impl Selection {
    /// Creates a selection that ignores toggles.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Creates an empty selection that accepts toggles.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            selected: HashSet::new(),
        }
    }

    /// Returns `true` if rows can be selected.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables selection. Disabling clears it.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.selected.clear();
        }
    }

    /// Toggles one row. Returns `true` if the selection changed.
    pub fn toggle(&mut self, id: RowId) -> bool {
        if !self.enabled {
            return false;
        }
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        true
    }

    /// Toggles a group of rows as a whole.
    ///
    /// If every row in `ids` is already selected they are all deselected;
    /// otherwise they are all selected. Rows outside `ids` are untouched.
    pub fn toggle_all(&mut self, ids: &[RowId]) -> bool {
        if !self.enabled || ids.is_empty() {
            return false;
        }
        if self.all_selected(ids) {
            for id in ids {
                self.selected.remove(id);
            }
        } else {
            self.selected.extend(ids.iter().cloned());
        }
        true
    }

    /// Returns `true` if the row is selected.
    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selected.contains(id)
    }

    /// Returns `true` if `ids` is non-empty and every row in it is selected.
    pub fn all_selected(&self, ids: &[RowId]) -> bool {
        !ids.is_empty() && ids.iter().all(|id| self.selected.contains(id))
    }

    /// Returns `true` if at least one row of `ids` is selected.
    pub fn some_selected(&self, ids: &[RowId]) -> bool {
        ids.iter().any(|id| self.selected.contains(id))
    }

    /// Clears the selection. Returns `true` if anything was selected.
    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    /// Keeps only the rows for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&RowId) -> bool) {
        self.selected.retain(|id| keep(id));
    }

    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Iterates over the selected identities in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &RowId> {
        self.selected.iter()
    }
}
