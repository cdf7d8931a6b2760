//! Data model types
//!
//! Rows are dynamic records of JSON values; columns describe how the table
//! reads, formats, filters and sorts one field of those records.

pub mod cell;
mod column;
mod row;

pub use column::*;
pub use row::*;
