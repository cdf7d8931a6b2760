//! Table view-state engine.
//!
//! [`TableView`] owns every piece of view state (filters, sort, hidden
//! columns, selection, pagination) and derives the visible rows from it:
//!
//! ```text
//! rows → global filter → column filters → sort → page slice → visible rows
//! ```
//!
//! In local mode each stage runs in-process. In server-side mode the stages
//! are skipped and the host is told about state changes through
//! [`ViewEvent`]s instead; the rows it supplies are shown as they are.

mod bulk;
mod filter;
mod page;
mod selection;
mod sort;

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

pub use bulk::*;
pub use filter::*;
pub use page::*;
pub use selection::*;
pub use sort::*;
use tokio::time::Instant;

use crate::config::TableConfig;
use crate::error::ConfigError;
use crate::error::ExportError;
use crate::error::ViewError;
use crate::export;
use crate::export::ExportFormat;
use crate::export::ExportTable;
use crate::model::ColumnDescriptor;
use crate::model::Row;
use crate::model::RowId;
use crate::model::cell;
use crate::model::validate_columns;
use crate::notify::CoalescingEmitter;
use crate::notify::Notifier;
use crate::notify::ViewEvent;
use crate::server::ServerQuery;
use crate::server::TableResponse;

/// Number of rows before and after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCounts {
    /// Rows passing the filters.
    pub filtered: usize,
    /// Rows in the dataset.
    pub total: usize,
}

/// CSV export held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// Suggested file name (`table-data-YYYY-MM-DD.csv`).
    pub file_name: String,
    /// Encoded CSV text.
    pub contents: String,
}

/// The tabular view-state engine.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tableview_lib::model::{ColumnDescriptor, Row};
/// use tableview_lib::{TableConfig, TableView};
///
/// let columns = vec![
///     ColumnDescriptor::new("id", "ID"),
///     ColumnDescriptor::new("status", "Status").with_exact_match(),
/// ];
/// let rows = vec![
///     Row::new().set("id", 1).set("status", "Active"),
///     Row::new().set("id", 2).set("status", "Inactive"),
///     Row::new().set("id", 3).set("status", "Active"),
/// ];
///
/// let mut view = TableView::new(columns, TableConfig::default())?.with_rows(rows);
/// view.set_column_filter("status", "Active")?;
/// view.toggle_sort("id")?; // ascending
/// view.toggle_sort("id")?; // descending
///
/// let ids: Vec<_> = view.filtered_rows().iter().map(|r| r.get("id").cloned()).collect();
/// assert_eq!(ids, vec![Some(json!(3)), Some(json!(1))]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct TableView {
    config: TableConfig,
    columns: Vec<ColumnDescriptor>,
    rows: Vec<Row>,
    filters: FilterState,
    sort: SortState,
    hidden: HashSet<String>,
    selection: Selection,
    pagination: Pagination,
    total_count: usize,
    loading: bool,
    notifier: Notifier,
    pending_filters: CoalescingEmitter<BTreeMap<String, String>>,
}

impl TableView {
    /// Creates a table with no rows.
    ///
    /// Fails if the column list or the page-size settings are malformed.
    /// When row selection is enabled and no selection column is present, one
    /// is inserted as the first column.
    pub fn new(mut columns: Vec<ColumnDescriptor>, config: TableConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.enable_row_selection && !columns.iter().any(ColumnDescriptor::is_selection) {
            columns.insert(0, ColumnDescriptor::selection());
        }
        validate_columns(&columns)?;

        let selection = if config.enable_row_selection {
            Selection::enabled()
        } else {
            Selection::disabled()
        };

        log::debug!(
            "Created table with {} column(s), server_side={}",
            columns.len(),
            config.server_side
        );

        Ok(Self {
            pagination: Pagination::new(config.page_size),
            pending_filters: CoalescingEmitter::new(config.filter_debounce()),
            columns,
            rows: Vec::new(),
            filters: FilterState::new(),
            sort: SortState::new(),
            hidden: HashSet::new(),
            selection,
            total_count: 0,
            loading: false,
            notifier: Notifier::new(),
            config,
        })
    }

    /// Sets the dataset and returns the table (builder style).
    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.set_rows(rows);
        self
    }

    // =========================================================================
    // Dataset
    // =========================================================================

    /// Returns the configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Returns `true` in server-side mode.
    pub fn is_server_side(&self) -> bool {
        self.config.server_side
    }

    /// Returns every column, including hidden and selection columns.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Returns the full dataset as supplied.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Replaces the dataset.
    ///
    /// Selected rows that are no longer present are dropped from the
    /// selection; the rest stay selected.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        let present: HashSet<RowId> = (0..self.rows.len()).map(|i| self.row_id(i)).collect();
        self.selection.retain(|id| present.contains(id));
        log::debug!("Dataset replaced: {} row(s)", self.rows.len());
    }

    /// Sets the host-reported total row count (server-side mode).
    pub fn set_total_count(&mut self, total_count: usize) {
        self.total_count = total_count;
    }

    /// Host-reported total row count.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Marks the table as waiting for data.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Returns `true` while the host is fetching data.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Identity of the row at dataset position `index`.
    pub fn row_id(&self, index: usize) -> RowId {
        match (&self.config.key_field, self.rows.get(index)) {
            (Some(field), Some(row)) => RowId::Key(cell::stringify(row.get(field))),
            _ => RowId::Index(index),
        }
    }

    fn column(&self, key: &str) -> Result<&ColumnDescriptor, ViewError> {
        self.columns
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| ViewError::UnknownColumn(key.to_string()))
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Registers a listener for [`ViewEvent`]s.
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&ViewEvent) + Send + 'static,
    {
        self.notifier.subscribe(subscriber);
    }

    /// Delivers the pending filter notification if its quiet period is over.
    ///
    /// Returns `true` if a notification went out.
    pub fn flush_due(&mut self) -> bool {
        match self.pending_filters.poll(Instant::now()) {
            Some(filters) => {
                self.notifier.emit(&ViewEvent::FiltersChanged(filters));
                true
            }
            None => false,
        }
    }

    /// When the pending filter notification falls due, if one is waiting.
    pub fn next_notification_deadline(&self) -> Option<Instant> {
        self.pending_filters.deadline()
    }

    /// Returns `true` if a debounced filter notification is waiting.
    pub fn has_pending_notification(&self) -> bool {
        self.pending_filters.is_pending()
    }

    /// Waits out the quiet period and delivers the pending filter
    /// notification. Returns immediately if nothing is pending.
    pub async fn settle(&mut self) -> bool {
        match self.pending_filters.deadline() {
            Some(deadline) => {
                tokio::time::sleep_until(deadline).await;
                self.flush_due()
            }
            None => false,
        }
    }

    fn notify_filters(&mut self) {
        if !self.config.server_side {
            return;
        }
        if self.pending_filters.push(self.filters.to_map(), Instant::now()) {
            log::trace!("Superseded pending filter notification");
        }
    }

    fn notify_sorting(&mut self) {
        if self.config.server_side {
            self.notifier.emit(&ViewEvent::SortingChanged(self.sort.changes()));
        }
    }

    fn notify_pagination(&mut self) {
        if self.config.server_side {
            self.notifier.emit(&ViewEvent::PaginationChanged {
                page_index: self.pagination.page_index,
                page_size: self.pagination.page_size,
            });
        }
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    /// Returns the current filter state.
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Data columns that accept a column filter.
    pub fn filterable_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| c.filterable && !c.is_selection())
    }

    /// Sets the filter text for one column; an empty text removes the filter.
    ///
    /// Any change returns the table to its first page.
    pub fn set_column_filter(&mut self, key: &str, text: impl Into<String>) -> Result<(), ViewError> {
        let column = self.column(key)?;
        if !column.filterable || column.is_selection() {
            log::warn!("Rejected filter on column '{}'", key);
            return Err(ViewError::NotFilterable(key.to_string()));
        }
        if self.filters.set_column(key, text) {
            log::debug!("Column filter '{}' changed", key);
            self.filters_changed();
        }
        Ok(())
    }

    /// Sets the global search text; an empty text removes it.
    pub fn set_global_filter(&mut self, text: impl Into<String>) {
        if self.filters.set_global(text) {
            log::debug!("Global filter changed");
            self.filters_changed();
        }
    }

    /// Removes every filter.
    ///
    /// In server-side mode the host is told right away with an empty filter
    /// map, replacing any notification still waiting out its quiet period.
    pub fn clear_filters(&mut self) {
        let changed = self.filters.clear();
        if self.config.server_side {
            self.pending_filters.cancel();
            self.notifier.emit(&ViewEvent::FiltersChanged(self.filters.to_map()));
        }
        if changed {
            self.reset_page();
        }
    }

    /// Number of active filters, counting the global search as one.
    pub fn active_filter_count(&self) -> usize {
        self.filters.active_count()
    }

    fn filters_changed(&mut self) {
        self.notify_filters();
        self.reset_page();
    }

    fn reset_page(&mut self) {
        if self.pagination.first() {
            self.notify_pagination();
        }
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// Returns the current sort state.
    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    /// Advances a column's sort as a header click would.
    ///
    /// Returns the column's new direction (`None` = unsorted).
    pub fn toggle_sort(&mut self, key: &str) -> Result<Option<Direction>, ViewError> {
        self.ensure_sortable(key)?;
        let direction = self.sort.cycle(key, self.config.sort_cycle);
        log::debug!("Sort on '{}' is now {:?}", key, direction);
        self.notify_sorting();
        Ok(direction)
    }

    /// Replaces the sort order.
    pub fn set_sort(&mut self, sort: SortState) -> Result<(), ViewError> {
        for key in sort.keys() {
            self.ensure_sortable(&key.column_key)?;
        }
        if self.sort != sort {
            self.sort = sort;
            self.notify_sorting();
        }
        Ok(())
    }

    /// Removes any sort.
    pub fn clear_sort(&mut self) {
        if self.sort.clear() {
            self.notify_sorting();
        }
    }

    fn ensure_sortable(&self, key: &str) -> Result<(), ViewError> {
        let column = self.column(key)?;
        if column.sortable && !column.is_selection() {
            Ok(())
        } else {
            log::warn!("Rejected sort on column '{}'", key);
            Err(ViewError::NotSortable(key.to_string()))
        }
    }

    // =========================================================================
    // Column visibility
    // =========================================================================

    /// Shows or hides a column. Returns `true` if visibility changed.
    ///
    /// Showing any column always succeeds; hiding requires a hideable column.
    pub fn set_column_visibility(&mut self, key: &str, visible: bool) -> Result<bool, ViewError> {
        let hideable = self.column(key)?.hideable;
        if visible {
            return Ok(self.hidden.remove(key));
        }
        if !hideable {
            return Err(ViewError::NotHideable(key.to_string()));
        }
        Ok(self.hidden.insert(key.to_string()))
    }

    /// Flips a column's visibility. Returns the new visibility.
    pub fn toggle_column_visibility(&mut self, key: &str) -> Result<bool, ViewError> {
        let visible = !self.is_column_visible(key);
        self.set_column_visibility(key, visible)?;
        Ok(visible)
    }

    /// Makes every column visible again.
    pub fn show_all_columns(&mut self) {
        self.hidden.clear();
    }

    /// Returns `true` if the column is not hidden.
    pub fn is_column_visible(&self, key: &str) -> bool {
        !self.hidden.contains(key)
    }

    /// Visible columns in display order, including the selection column.
    pub fn visible_columns(&self) -> Vec<&ColumnDescriptor> {
        self.columns
            .iter()
            .filter(|c| self.is_column_visible(&c.key))
            .collect()
    }

    /// Columns the user may hide or show.
    pub fn hideable_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| c.hideable)
    }

    // =========================================================================
    // Derived rows
    // =========================================================================

    /// Dataset positions of the filtered, sorted rows.
    ///
    /// In server-side mode the host already filtered and sorted, so this is
    /// every position in order.
    pub fn filtered_indices(&self) -> Vec<usize> {
        if self.config.server_side {
            return (0..self.rows.len()).collect();
        }
        let mut indices = filter_indices(&self.rows, &self.columns, &self.filters);
        sort_indices(&self.rows, &mut indices, &self.sort);
        indices
    }

    /// Filtered, sorted rows across all pages.
    pub fn filtered_rows(&self) -> Vec<&Row> {
        self.filtered_indices()
            .into_iter()
            .map(|index| &self.rows[index])
            .collect()
    }

    /// Dataset positions of the rows on the current page.
    pub fn page_indices(&self) -> Vec<usize> {
        let indices = self.filtered_indices();
        if self.config.server_side {
            return indices;
        }
        paginate(&indices, &self.pagination).rows
    }

    /// Rows on the current page.
    pub fn visible_rows(&self) -> Vec<&Row> {
        self.page_indices()
            .into_iter()
            .map(|index| &self.rows[index])
            .collect()
    }

    /// Rows before and after filtering.
    pub fn row_counts(&self) -> RowCounts {
        RowCounts {
            filtered: self.filtered_row_count(),
            total: self.rows.len(),
        }
    }

    /// Status line for the row count.
    ///
    /// `"{filtered} of {total} row(s)"` locally, `"{total} total rows"` in
    /// server-side mode.
    pub fn summary(&self) -> String {
        if self.config.server_side {
            format!("{} total rows", self.total_count)
        } else {
            let counts = self.row_counts();
            format!("{} of {} row(s)", counts.filtered, counts.total)
        }
    }

    fn filtered_row_count(&self) -> usize {
        if self.config.server_side {
            self.total_count
        } else if self.filters.is_empty() {
            self.rows.len()
        } else {
            filter_indices(&self.rows, &self.columns, &self.filters).len()
        }
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Current page position as stored (may exceed the last page until the
    /// next navigation).
    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Index of the page actually shown.
    pub fn page_index(&self) -> usize {
        self.pagination.clamped(self.filtered_row_count()).page_index
    }

    /// Number of pages (at least 1).
    pub fn page_count(&self) -> usize {
        self.pagination.page_count(self.filtered_row_count())
    }

    /// Page sizes the user may choose from.
    pub fn page_sizes(&self) -> &[usize] {
        &self.config.page_sizes
    }

    /// Returns `true` if a previous page exists.
    pub fn can_previous_page(&self) -> bool {
        self.page_index() > 0
    }

    /// Returns `true` if a next page exists.
    pub fn can_next_page(&self) -> bool {
        self.page_index() + 1 < self.page_count()
    }

    /// Goes to the first page.
    pub fn first_page(&mut self) {
        if self.pagination.first() {
            self.notify_pagination();
        }
    }

    /// Goes back one page; no-op on the first page.
    pub fn previous_page(&mut self) {
        self.pagination = self.pagination.clamped(self.filtered_row_count());
        if self.pagination.previous() {
            self.notify_pagination();
        }
    }

    /// Goes forward one page; no-op on the last page.
    pub fn next_page(&mut self) {
        let count = self.filtered_row_count();
        self.pagination = self.pagination.clamped(count);
        if self.pagination.next(count) {
            self.notify_pagination();
        }
    }

    /// Goes to the last page.
    pub fn last_page(&mut self) {
        if self.pagination.last(self.filtered_row_count()) {
            self.notify_pagination();
        }
    }

    /// Jumps to a page; indexes past the end land on the last page.
    pub fn go_to_page(&mut self, page_index: usize) {
        if self.pagination.jump(page_index, self.filtered_row_count()) {
            self.notify_pagination();
        }
    }

    /// Changes the page size and returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), ViewError> {
        if !self.config.allows_page_size(page_size) {
            return Err(ViewError::PageSizeNotAllowed(page_size));
        }
        if self.pagination.resize(page_size) {
            log::debug!("Page size set to {}", page_size);
            self.notify_pagination();
        }
        Ok(())
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Returns `true` if row selection is enabled.
    pub fn is_row_selection_enabled(&self) -> bool {
        self.selection.is_enabled()
    }

    /// Turns row selection on or off.
    ///
    /// Enabling puts a selection column first if none is present. Disabling
    /// clears the selection and removes the selection column, after which
    /// toggles are no-ops.
    pub fn set_row_selection(&mut self, enabled: bool) {
        if self.selection.is_enabled() == enabled {
            return;
        }
        log::debug!("Row selection {}", if enabled { "enabled" } else { "disabled" });
        self.config.enable_row_selection = enabled;
        self.selection.set_enabled(enabled);
        if enabled {
            if !self.columns.iter().any(ColumnDescriptor::is_selection) {
                self.columns.insert(0, ColumnDescriptor::selection());
            }
        } else {
            self.columns.retain(|c| !c.is_selection());
        }
    }

    /// Toggles one row. No-op when selection is disabled.
    pub fn toggle_row(&mut self, id: RowId) -> bool {
        self.selection.toggle(id)
    }

    /// Toggles every row in the select-all scope.
    ///
    /// If all of them are selected they are deselected, otherwise all are
    /// selected. Rows outside the scope keep their state.
    pub fn toggle_all(&mut self) -> bool {
        let ids = self.select_all_ids();
        self.selection.toggle_all(&ids)
    }

    /// Returns `true` if every row in the select-all scope is selected.
    pub fn is_all_selected(&self) -> bool {
        self.selection.all_selected(&self.select_all_ids())
    }

    /// Returns `true` if some, but not all, rows in the select-all scope are
    /// selected.
    pub fn is_some_selected(&self) -> bool {
        let ids = self.select_all_ids();
        self.selection.some_selected(&ids) && !self.selection.all_selected(&ids)
    }

    /// Returns `true` if the row is selected.
    pub fn is_row_selected(&self, id: &RowId) -> bool {
        self.selection.is_selected(id)
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected rows that pass the current filters, in display order.
    pub fn selected_rows(&self) -> Vec<&Row> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        self.filtered_indices()
            .into_iter()
            .filter(|&index| self.selection.is_selected(&self.row_id(index)))
            .map(|index| &self.rows[index])
            .collect()
    }

    /// Runs a bulk action on the selected rows, then clears the selection.
    ///
    /// Returns the number of rows handed to the action.
    pub fn run_bulk_action(&mut self, action: &BulkAction) -> usize {
        let rows: Vec<Row> = self.selected_rows().into_iter().cloned().collect();
        log::debug!("Running bulk action '{}' on {} row(s)", action.label(), rows.len());
        action.run(&rows);
        self.selection.clear();
        rows.len()
    }

    fn select_all_ids(&self) -> Vec<RowId> {
        let indices = match self.config.select_all_scope {
            SelectAllScope::Filtered => self.filtered_indices(),
            SelectAllScope::Page => self.page_indices(),
        };
        indices.into_iter().map(|index| self.row_id(index)).collect()
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Snapshot of what an export would contain: visible data columns and all
    /// filtered rows.
    pub fn export_table(&self) -> ExportTable {
        ExportTable::new(self.visible_columns(), self.filtered_rows())
    }

    /// Encodes the export as CSV in memory.
    pub fn export_csv(&self) -> Result<CsvExport, ExportError> {
        Ok(CsvExport {
            file_name: export::file_name_today(ExportFormat::Csv),
            contents: export::to_csv(&self.export_table())?,
        })
    }

    /// Encodes the export as an XLSX workbook in memory.
    pub fn export_xlsx(&self) -> Result<Vec<u8>, ExportError> {
        export::to_xlsx(&self.export_table()).inspect_err(|err| {
            log::error!("Error exporting to XLSX: {}", err);
        })
    }

    /// Writes the CSV export into `dir`. Returns the written path.
    pub async fn export_csv_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        self.export_to(dir, ExportFormat::Csv).await
    }

    /// Writes the XLSX export into `dir`. Returns the written path.
    ///
    /// Encoding runs on the blocking thread pool. Concurrent exports on the
    /// same day target the same file name; the last one to finish wins.
    pub async fn export_xlsx_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        self.export_to(dir, ExportFormat::Xlsx).await
    }

    /// Writes the export in `format` into `dir`. Returns the written path.
    ///
    /// Failures are logged and returned; the table state is unaffected and no
    /// partial file is left behind.
    pub async fn export_to(&self, dir: &Path, format: ExportFormat) -> Result<PathBuf, ExportError> {
        let result = write_export(self.export_table(), dir, format).await;
        match &result {
            Ok(path) => log::info!("Exported {} to {}", format.extension(), path.display()),
            Err(err) => log::error!("Error exporting to {}: {}", format.extension(), err),
        }
        result
    }

    // =========================================================================
    // Server-side mode
    // =========================================================================

    /// Request parameters for the page the table currently shows.
    pub fn server_query(&self) -> ServerQuery {
        ServerQuery {
            page: self.pagination.page_index,
            page_size: self.pagination.page_size,
            filters: self.filters.to_map(),
            sorting: self.sort.changes(),
        }
    }

    /// Installs a backend reply: its rows become the dataset and its total
    /// becomes the row count. Clears the loading flag.
    ///
    /// Returns `false` if the reply is for a different page than the one
    /// currently requested (a stale response); it is installed regardless.
    pub fn apply_response(&mut self, response: TableResponse) -> Result<bool, ViewError> {
        if !self.config.server_side {
            return Err(ViewError::RequiresServerMode("Applying a server response"));
        }
        let current = response.page == self.pagination.page_index
            && response.page_size == self.pagination.page_size;
        if !current {
            log::warn!(
                "Response for page {} (size {}) does not match current page {} (size {})",
                response.page,
                response.page_size,
                self.pagination.page_index,
                self.pagination.page_size
            );
        }
        self.total_count = response.total_count;
        self.loading = false;
        self.set_rows(response.data);
        Ok(current)
    }
}

async fn write_export(table: ExportTable, dir: &Path, format: ExportFormat) -> Result<PathBuf, ExportError> {
    let name = export::file_name_today(format);
    let bytes = tokio::task::spawn_blocking(move || format.encode(&table)).await??;
    export::write_atomic(dir, &name, bytes).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("id", "ID").with_hiding(false),
            ColumnDescriptor::new("name", "Name"),
            ColumnDescriptor::new("status", "Status"),
            ColumnDescriptor::new("notes", "Notes").with_sorting(false).with_filtering(false),
        ]
    }

    fn people(count: usize) -> Vec<Row> {
        (1..=count)
            .map(|id| {
                Row::new()
                    .set("id", id)
                    .set("name", format!("Person {}", id))
                    .set("status", if id % 2 == 0 { "Inactive" } else { "Active" })
            })
            .collect()
    }

    fn ids(rows: &[&Row]) -> Vec<u64> {
        rows.iter()
            .map(|r| r.get("id").and_then(|v| v.as_u64()).unwrap())
            .collect()
    }

    fn recorder(view: &mut TableView) -> Arc<Mutex<Vec<ViewEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        view.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
        events
    }

    #[test]
    fn test_new_rejects_bad_columns() {
        let columns = vec![ColumnDescriptor::new("id", "ID"), ColumnDescriptor::new("id", "ID")];
        let err = TableView::new(columns, TableConfig::default()).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateKey("id".into()));
    }

    #[test]
    fn test_row_selection_adds_selection_column() {
        let config = TableConfig::default().with_row_selection(true);
        let view = TableView::new(columns(), config).unwrap();
        assert!(view.columns()[0].is_selection());
        assert_eq!(view.columns().len(), 5);
    }

    #[test]
    fn test_filter_rejects_unfilterable_column() {
        let mut view = TableView::new(columns(), TableConfig::default()).unwrap();
        assert_eq!(
            view.set_column_filter("notes", "x"),
            Err(ViewError::NotFilterable("notes".into()))
        );
        assert_eq!(
            view.set_column_filter("missing", "x"),
            Err(ViewError::UnknownColumn("missing".into()))
        );
    }

    #[test]
    fn test_sort_rejects_unsortable_column() {
        let mut view = TableView::new(columns(), TableConfig::default()).unwrap();
        assert_eq!(view.toggle_sort("notes"), Err(ViewError::NotSortable("notes".into())));
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut view = TableView::new(columns(), TableConfig::default())
            .unwrap()
            .with_rows(people(35));
        view.go_to_page(2);
        assert_eq!(view.page_index(), 2);
        view.set_global_filter("person");
        assert_eq!(view.page_index(), 0);
    }

    #[test]
    fn test_visible_rows_slice_sorted_filtered_rows() {
        let mut view = TableView::new(columns(), TableConfig::default())
            .unwrap()
            .with_rows(people(25));
        view.set_column_filter("status", "Inactive").unwrap();
        view.toggle_sort("id").unwrap();
        view.toggle_sort("id").unwrap();
        assert_eq!(view.page_count(), 2);
        assert_eq!(view.visible_rows().len(), 10);
        view.next_page();
        assert_eq!(ids(&view.visible_rows()), vec![4, 2]);
        assert_eq!(view.summary(), "12 of 25 row(s)");
    }

    #[test]
    fn test_stale_page_index_is_clamped() {
        let mut view = TableView::new(columns(), TableConfig::default())
            .unwrap()
            .with_rows(people(30));
        view.last_page();
        view.set_rows(people(5));
        assert_eq!(view.pagination().page_index, 2);
        assert_eq!(view.page_index(), 0);
        assert_eq!(view.visible_rows().len(), 5);
        assert!(!view.can_next_page());
        assert!(!view.can_previous_page());
    }

    #[test]
    fn test_previous_from_stale_index_moves_from_last_page() {
        let mut view = TableView::new(columns(), TableConfig::default())
            .unwrap()
            .with_rows(people(30));
        view.last_page();
        view.set_rows(people(15));
        view.previous_page();
        assert_eq!(view.pagination().page_index, 0);
    }

    #[test]
    fn test_set_page_size_must_be_allowed() {
        let mut view = TableView::new(columns(), TableConfig::default()).unwrap();
        assert_eq!(view.set_page_size(7), Err(ViewError::PageSizeNotAllowed(7)));
        assert!(view.set_page_size(20).is_ok());
        assert_eq!(view.pagination(), Pagination::new(20));
    }

    #[test]
    fn test_visibility_rules() {
        let mut view = TableView::new(columns(), TableConfig::default()).unwrap();
        assert_eq!(view.set_column_visibility("id", false), Err(ViewError::NotHideable("id".into())));
        assert_eq!(view.toggle_column_visibility("notes"), Ok(false));
        assert!(!view.is_column_visible("notes"));
        assert_eq!(view.visible_columns().len(), 3);
        view.show_all_columns();
        assert!(view.is_column_visible("notes"));
    }

    #[test]
    fn test_export_uses_visible_columns_and_all_filtered_rows() {
        let config = TableConfig::default().with_row_selection(true);
        let mut view = TableView::new(columns(), config)
            .unwrap()
            .with_rows(people(12));
        view.set_column_visibility("notes", false).unwrap();
        view.set_column_visibility("status", false).unwrap();
        view.set_column_filter("status", "Inactive").unwrap();

        let export = view.export_csv().unwrap();
        assert!(export.file_name.starts_with("table-data-"));
        assert!(export.file_name.ends_with(".csv"));

        let lines: Vec<&str> = export.contents.lines().collect();
        assert_eq!(lines[0], r#""ID","Name""#);
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[6], r#""12","Person 12""#);
    }

    #[test]
    fn test_selection_filtered_scope() {
        let config = TableConfig::default().with_row_selection(true);
        let mut view = TableView::new(columns(), config)
            .unwrap()
            .with_rows(people(25));
        view.set_column_filter("status", "Inactive").unwrap();
        assert!(view.toggle_all());
        assert!(view.is_all_selected());
        assert_eq!(view.selected_rows().len(), 12);

        // filtering further hides, but does not drop, selected rows
        view.set_column_filter("name", "Person 2").unwrap();
        assert_eq!(ids(&view.selected_rows()), vec![2, 20, 22, 24]);
    }

    #[test]
    fn test_selection_page_scope() {
        let config = TableConfig::default()
            .with_row_selection(true)
            .with_select_all_scope(SelectAllScope::Page);
        let mut view = TableView::new(columns(), config)
            .unwrap()
            .with_rows(people(25));
        view.toggle_all();
        assert_eq!(view.selected_rows().len(), 10);
        view.next_page();
        assert!(!view.is_all_selected());
        assert!(!view.is_some_selected());
    }

    #[test]
    fn test_selection_by_key_survives_reorder() {
        let config = TableConfig::default()
            .with_row_selection(true)
            .with_key_field("id");
        let mut view = TableView::new(columns(), config)
            .unwrap()
            .with_rows(people(3));
        view.toggle_row(RowId::from("2"));

        let mut reversed = people(3);
        reversed.reverse();
        view.set_rows(reversed);
        assert_eq!(ids(&view.selected_rows()), vec![2]);

        view.set_rows(people(1));
        assert!(view.selected_rows().is_empty());
        assert!(!view.is_row_selected(&RowId::from("2")));
    }

    #[test]
    fn test_selection_disabled_is_noop() {
        let mut view = TableView::new(columns(), TableConfig::default())
            .unwrap()
            .with_rows(people(3));
        assert!(!view.toggle_row(RowId::Index(0)));
        assert!(!view.toggle_all());
        assert!(view.selected_rows().is_empty());
    }

    #[test]
    fn test_set_row_selection_disable_clears() {
        let config = TableConfig::default().with_row_selection(true);
        let mut view = TableView::new(columns(), config)
            .unwrap()
            .with_rows(people(3));
        view.toggle_row(RowId::Index(0));
        view.toggle_row(RowId::Index(2));
        assert_eq!(view.selected_rows().len(), 2);

        view.set_row_selection(false);
        assert!(!view.is_row_selection_enabled());
        assert!(!view.config().enable_row_selection);
        assert!(view.selected_rows().is_empty());
        assert!(!view.columns().iter().any(ColumnDescriptor::is_selection));
        assert!(!view.toggle_row(RowId::Index(1)));
        assert!(!view.toggle_all());
        assert!(view.selected_rows().is_empty());
    }

    #[test]
    fn test_set_row_selection_enable_adds_column() {
        let mut view = TableView::new(columns(), TableConfig::default())
            .unwrap()
            .with_rows(people(3));
        assert!(!view.columns()[0].is_selection());

        view.set_row_selection(true);
        view.set_row_selection(true);
        assert!(view.is_row_selection_enabled());
        assert_eq!(view.columns().iter().filter(|c| c.is_selection()).count(), 1);
        assert!(view.columns()[0].is_selection());
        assert!(view.toggle_row(RowId::Index(1)));
        assert_eq!(view.selected_rows().len(), 1);
    }

    #[test]
    fn test_bulk_action_receives_rows_and_clears() {
        let config = TableConfig::default().with_row_selection(true);
        let mut view = TableView::new(columns(), config)
            .unwrap()
            .with_rows(people(4));
        view.toggle_row(RowId::Index(1));
        view.toggle_row(RowId::Index(3));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let action = BulkAction::new("Mark active", move |rows| {
            sink.lock().unwrap().extend(rows.iter().map(|r| r.get("id").cloned()));
        });

        assert_eq!(view.run_bulk_action(&action), 2);
        assert_eq!(*seen.lock().unwrap(), vec![Some(json!(2)), Some(json!(4))]);
        assert!(view.selected_rows().is_empty());
    }

    #[test]
    fn test_local_mode_emits_nothing() {
        let mut view = TableView::new(columns(), TableConfig::default())
            .unwrap()
            .with_rows(people(30));
        let events = recorder(&mut view);
        view.set_column_filter("name", "1").unwrap();
        view.toggle_sort("id").unwrap();
        view.next_page();
        view.clear_filters();
        assert!(!view.has_pending_notification());
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_server_mode_does_not_touch_rows() {
        let config = TableConfig::default().with_server_side(true);
        let mut view = TableView::new(columns(), config)
            .unwrap()
            .with_rows(people(3));
        view.set_total_count(42);
        view.set_column_filter("status", "Inactive").unwrap();
        view.toggle_sort("id").unwrap();
        view.toggle_sort("id").unwrap();
        assert_eq!(ids(&view.visible_rows()), vec![1, 2, 3]);
        assert_eq!(view.page_count(), 5);
        assert_eq!(view.summary(), "42 total rows");
    }

    #[test]
    fn test_server_mode_sort_and_page_notify_immediately() {
        let config = TableConfig::default().with_server_side(true);
        let mut view = TableView::new(columns(), config).unwrap();
        view.set_total_count(42);
        let events = recorder(&mut view);

        view.toggle_sort("name").unwrap();
        view.next_page();
        view.set_page_size(20).unwrap();

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                ViewEvent::SortingChanged(vec![SortChange {
                    column_key: "name".into(),
                    descending: false
                }]),
                ViewEvent::PaginationChanged {
                    page_index: 1,
                    page_size: 10
                },
                ViewEvent::PaginationChanged {
                    page_index: 0,
                    page_size: 20
                },
            ]
        );
    }

    #[test]
    fn test_apply_response_requires_server_mode() {
        let mut view = TableView::new(columns(), TableConfig::default()).unwrap();
        let response = TableResponse {
            data: people(2),
            total_count: 2,
            page: 0,
            page_size: 10,
        };
        assert!(matches!(
            view.apply_response(response),
            Err(ViewError::RequiresServerMode(_))
        ));
    }

    #[test]
    fn test_apply_response_installs_rows() {
        let config = TableConfig::default().with_server_side(true);
        let mut view = TableView::new(columns(), config).unwrap();
        view.set_loading(true);
        let response = TableResponse {
            data: people(10),
            total_count: 95,
            page: 0,
            page_size: 10,
        };
        assert_eq!(view.apply_response(response), Ok(true));
        assert!(!view.is_loading());
        assert_eq!(view.page_count(), 10);
        assert_eq!(view.visible_rows().len(), 10);

        let stale = TableResponse {
            data: people(10),
            total_count: 95,
            page: 4,
            page_size: 10,
        };
        assert_eq!(view.apply_response(stale), Ok(false));
    }

    #[test]
    fn test_server_query_reflects_state() {
        let config = TableConfig::default().with_server_side(true);
        let mut view = TableView::new(columns(), config).unwrap();
        view.set_total_count(100);
        view.set_global_filter("doe");
        view.toggle_sort("id").unwrap();
        view.toggle_sort("id").unwrap();
        view.go_to_page(3);
        assert_eq!(
            view.server_query().to_query_string(),
            "page=3&pageSize=10&_global=doe&sortBy=id&sortOrder=desc"
        );
    }
}
