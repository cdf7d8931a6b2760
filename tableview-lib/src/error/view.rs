//! View operation error types

/// Errors returned by state-changing operations on a [`TableView`](crate::TableView).
///
/// Filtering, sorting and paging an empty or non-matching dataset is never an
/// error; these only cover requests that name something the table cannot do.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// No column with this key exists.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// The column does not allow sorting.
    #[error("Column '{0}' is not sortable")]
    NotSortable(String),

    /// The column does not allow hiding.
    #[error("Column '{0}' cannot be hidden")]
    NotHideable(String),

    /// The column does not accept a filter.
    #[error("Column '{0}' is not filterable")]
    NotFilterable(String),

    /// The requested page size is not one of the allowed sizes.
    #[error("Page size {0} is not in the allowed set")]
    PageSizeNotAllowed(usize),

    /// The operation only applies to server-delegated tables.
    #[error("{0} requires server-side mode")]
    RequiresServerMode(&'static str),
}
