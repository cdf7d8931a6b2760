//! Configuration error types

/// Errors detected while building a table from its configuration.
///
/// These are raised by [`TableView::new`](crate::TableView::new) before any
/// state exists, so a malformed table never renders.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A column descriptor has an empty key.
    #[error("Column at position {position} has an empty key")]
    EmptyKey {
        /// Zero-based position of the descriptor.
        position: usize,
    },

    /// A data column has an empty display label.
    #[error("Column '{0}' has an empty label")]
    EmptyLabel(String),

    /// Two descriptors share the same key.
    #[error("Duplicate column key: {0}")]
    DuplicateKey(String),

    /// The selection pseudo-column enables sorting, hiding or filtering.
    #[error("Selection column '{0}' only supports row selection")]
    InvalidSelectionColumn(String),

    /// More than one selection pseudo-column was declared.
    #[error("Only one selection column is allowed, found a second one: {0}")]
    DuplicateSelectionColumn(String),

    /// The configured page-size set is empty.
    #[error("No page sizes configured")]
    NoPageSizes,

    /// A page size of zero was configured.
    #[error("Page size must be greater than zero")]
    ZeroPageSize,

    /// The default page size is not one of the allowed sizes.
    #[error("Page size {0} is not in the allowed set")]
    PageSizeNotAllowed(usize),

    /// The row key field is set but empty.
    #[error("Row key field must not be empty")]
    EmptyKeyField,
}
