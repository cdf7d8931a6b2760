//! Server response payload.

use serde::Deserialize;
use serde::Serialize;

use crate::model::Row;

/// One page of rows returned by a backend.
///
/// Matches the JSON shape `{ "data": [...], "totalCount": n, "page": n,
/// "pageSize": n }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableResponse {
    /// Rows of the requested page, already filtered and sorted.
    pub data: Vec<Row>,
    /// Number of rows matching the filters across all pages.
    pub total_count: usize,
    /// Zero-based page index the rows belong to.
    pub page: usize,
    /// Page size the rows were fetched with.
    pub page_size: usize,
}
