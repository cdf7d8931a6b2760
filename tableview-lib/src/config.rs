//! Table configuration

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;
use crate::view::DEFAULT_PAGE_SIZE;
use crate::view::DEFAULT_PAGE_SIZES;
use crate::view::SelectAllScope;
use crate::view::SortCycle;

/// Behavior settings for a [`TableView`](crate::TableView).
///
/// Deserializes from JSON with camelCase keys; every key is optional.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tableview_lib::TableConfig;
///
/// let config = TableConfig::default()
///     .with_server_side(true)
///     .with_page_size(20)
///     .with_filter_debounce(Duration::from_millis(250));
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableConfig {
    /// Delegate filtering, sorting and pagination to the host.
    ///
    /// Default: `false`
    pub server_side: bool,

    /// Page sizes the user may choose from.
    ///
    /// Default: `[10, 20, 30, 40, 50]`
    pub page_sizes: Vec<usize>,

    /// Initial page size. Must be one of `page_sizes`.
    ///
    /// Default: 10
    pub page_size: usize,

    /// Quiet period before a server-side filter change reaches the host.
    ///
    /// Default: 500 ms
    pub filter_debounce_ms: u64,

    /// Header click behavior.
    ///
    /// Default: [`SortCycle::Toggle`]
    pub sort_cycle: SortCycle,

    /// Rows affected by "select all".
    ///
    /// Default: [`SelectAllScope::Filtered`]
    pub select_all_scope: SelectAllScope,

    /// Allow row selection (adds the selection column).
    ///
    /// Default: `false`
    pub enable_row_selection: bool,

    /// Field whose value identifies a row. Rows are identified by position
    /// when unset.
    ///
    /// Default: `None`
    pub key_field: Option<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            server_side: false,
            page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
            page_size: DEFAULT_PAGE_SIZE,
            filter_debounce_ms: 500,
            sort_cycle: SortCycle::default(),
            select_all_scope: SelectAllScope::default(),
            enable_row_selection: false,
            key_field: None,
        }
    }
}

impl TableConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets server-side mode.
    pub fn with_server_side(mut self, server_side: bool) -> Self {
        self.server_side = server_side;
        self
    }

    /// Sets the allowed page sizes.
    pub fn with_page_sizes(mut self, sizes: impl IntoIterator<Item = usize>) -> Self {
        self.page_sizes = sizes.into_iter().collect();
        self
    }

    /// Sets the initial page size.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Sets the server-side filter debounce window.
    pub fn with_filter_debounce(mut self, window: Duration) -> Self {
        self.filter_debounce_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the sort cycle.
    pub fn with_sort_cycle(mut self, cycle: SortCycle) -> Self {
        self.sort_cycle = cycle;
        self
    }

    /// Sets the select-all scope.
    pub fn with_select_all_scope(mut self, scope: SelectAllScope) -> Self {
        self.select_all_scope = scope;
        self
    }

    /// Enables or disables row selection.
    pub fn with_row_selection(mut self, enabled: bool) -> Self {
        self.enable_row_selection = enabled;
        self
    }

    /// Identifies rows by the value of `field` instead of their position.
    pub fn with_key_field(mut self, field: impl Into<String>) -> Self {
        self.key_field = Some(field.into());
        self
    }

    /// Server-side filter debounce window.
    pub fn filter_debounce(&self) -> Duration {
        Duration::from_millis(self.filter_debounce_ms)
    }

    /// Returns `true` if `size` is an allowed page size.
    pub fn allows_page_size(&self, size: usize) -> bool {
        self.page_sizes.contains(&size)
    }

    /// Checks the page-size and key-field settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_sizes.is_empty() {
            return Err(ConfigError::NoPageSizes);
        }
        if self.page_sizes.contains(&0) || self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if !self.allows_page_size(self.page_size) {
            return Err(ConfigError::PageSizeNotAllowed(self.page_size));
        }
        if self.key_field.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::EmptyKeyField);
        }
        Ok(())
    }
}
