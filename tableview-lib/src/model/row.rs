//! Dynamic table row

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// A single record displayed as one table line.
///
/// Rows hold field values as JSON values keyed by field name. The engine
/// never mutates a row once it has been handed a dataset.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tableview_lib::model::Row;
///
/// let row = Row::new()
///     .set("id", 1)
///     .set("name", "John Doe")
///     .set("tags", json!(["admin", "ops"]));
///
/// assert_eq!(row.get("name"), Some(&json!("John Doe")));
/// assert!(row.get("email").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: Map<String, Value>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field value and returns the row (builder style).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Sets a field value in place.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the row contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns all fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Builds a row from a JSON value, if it is an object.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for Row {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Identity of a row within a table.
///
/// Rows are identified by position unless the table designates a key field,
/// in which case the stringified value of that field is used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowId {
    /// Position in the dataset.
    Index(usize),
    /// Stringified value of the designated key field.
    Key(String),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Index(index) => write!(f, "#{}", index),
            RowId::Key(key) => f.write_str(key),
        }
    }
}

impl From<usize> for RowId {
    fn from(index: usize) -> Self {
        RowId::Index(index)
    }
}

impl From<&str> for RowId {
    fn from(key: &str) -> Self {
        RowId::Key(key.to_string())
    }
}

impl From<String> for RowId {
    fn from(key: String) -> Self {
        RowId::Key(key)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_json_object() {
        let row = Row::from_json(json!({"id": 1, "name": "Ada"})).unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("id"), Some(&json!(1)));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(Row::from_json(json!([1, 2])).is_none());
        assert!(Row::from_json(json!("row")).is_none());
    }

    #[test]
    fn test_deserialize_transparent() {
        let row: Row = serde_json::from_str(r#"{"status":"Active"}"#).unwrap();
        assert_eq!(row.get("status"), Some(&json!("Active")));
    }

    #[test]
    fn test_row_id_display() {
        assert_eq!(RowId::Index(3).to_string(), "#3");
        assert_eq!(RowId::from("abc").to_string(), "abc");
    }
}
