//! Tabular view-state engine
//!
//! Client-side state machine behind a data table: global and per-column
//! filtering, sorting, column visibility, row selection, pagination, and
//! CSV/XLSX export of the filtered projection. Rendering is left to the host.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tableview_lib::model::{ColumnDescriptor, Row};
//! use tableview_lib::{TableConfig, TableView};
//!
//! let columns = vec![
//!     ColumnDescriptor::new("id", "ID"),
//!     ColumnDescriptor::new("name", "Name"),
//! ];
//! let rows = vec![
//!     Row::new().set("id", 1).set("name", "John Doe"),
//!     Row::new().set("id", 2).set("name", "Jane Smith"),
//! ];
//!
//! let mut view = TableView::new(columns, TableConfig::default())
//!     .unwrap()
//!     .with_rows(rows);
//! view.set_global_filter("doe");
//!
//! let visible = view.visible_rows();
//! assert_eq!(visible.len(), 1);
//! assert_eq!(visible[0].get("id"), Some(&json!(1)));
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod notify;
pub mod server;
pub mod view;

pub use config::TableConfig;
pub use view::TableView;
