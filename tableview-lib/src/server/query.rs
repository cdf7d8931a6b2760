//! Server query parameters.

use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::view::SortChange;

/// Parameters for fetching one page of server-side data.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use tableview_lib::server::ServerQuery;
/// use tableview_lib::view::SortChange;
///
/// let query = ServerQuery {
///     page: 2,
///     page_size: 20,
///     filters: BTreeMap::from([("status".to_string(), "Active".to_string())]),
///     sorting: vec![SortChange { column_key: "name".into(), descending: true }],
/// };
///
/// assert_eq!(
///     query.to_query_string(),
///     "page=2&pageSize=20&status=Active&sortBy=name&sortOrder=desc"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerQuery {
    /// Zero-based page index.
    pub page: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Active filters keyed by column (global search under `_global`).
    pub filters: BTreeMap<String, String>,
    /// Sort keys; only the first entry is sent.
    pub sorting: Vec<SortChange>,
}

impl ServerQuery {
    /// Returns the query parameters in request order.
    ///
    /// `page` and `pageSize` come first, then every non-empty filter, then
    /// `sortBy`/`sortOrder` for the primary sort key if there is one.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];
        pairs.extend(
            self.filters
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        if let Some(primary) = self.sorting.first() {
            let order = if primary.descending { "desc" } else { "asc" };
            pairs.push(("sortBy".to_string(), primary.column_key.clone()));
            pairs.push(("sortOrder".to_string(), order.to_string()));
        }
        pairs
    }

    /// Returns the URL-encoded query string (without a leading `?`).
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_query_pairs())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_query() {
        let query = ServerQuery {
            page_size: 10,
            ..Default::default()
        };
        assert_eq!(query.to_query_string(), "page=0&pageSize=10");
    }

    #[test]
    fn test_empty_filters_are_skipped() {
        let query = ServerQuery {
            page_size: 10,
            filters: BTreeMap::from([
                ("name".to_string(), String::new()),
                ("_global".to_string(), "john doe".to_string()),
            ]),
            ..Default::default()
        };
        assert_eq!(query.to_query_string(), "page=0&pageSize=10&_global=john+doe");
    }

    #[test]
    fn test_only_primary_sort_is_sent() {
        let query = ServerQuery {
            page_size: 10,
            sorting: vec![
                SortChange {
                    column_key: "id".into(),
                    descending: false,
                },
                SortChange {
                    column_key: "name".into(),
                    descending: true,
                },
            ],
            ..Default::default()
        };
        let pairs = query.to_query_pairs();
        assert_eq!(pairs[2], ("sortBy".to_string(), "id".to_string()));
        assert_eq!(pairs[3], ("sortOrder".to_string(), "asc".to_string()));
        assert_eq!(pairs.len(), 4);
    }

    #[test]
    fn test_values_are_encoded() {
        let query = ServerQuery {
            page_size: 10,
            filters: BTreeMap::from([("email".to_string(), "a&b=c@x.io".to_string())]),
            ..Default::default()
        };
        assert_eq!(query.to_query_string(), "page=0&pageSize=10&email=a%26b%3Dc%40x.io");
    }
}
