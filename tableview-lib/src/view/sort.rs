//! Sort stage.

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Row;
use crate::model::cell;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns `true` for [`Direction::Desc`].
    pub fn is_descending(self) -> bool {
        self == Direction::Desc
    }

    /// Returns `"asc"` or `"desc"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// How repeated header clicks move through sort directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortCycle {
    /// unsorted → asc → desc → asc → …
    #[default]
    Toggle,
    /// unsorted → asc → desc → unsorted → …
    ThreeState,
}

/// One entry of a sort order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Column to sort by.
    pub column_key: String,
    /// Sort direction.
    pub direction: Direction,
}

/// Sort change as reported to hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortChange {
    /// Column being sorted.
    pub column_key: String,
    /// `true` for descending order.
    pub descending: bool,
}

impl From<&SortKey> for SortChange {
    fn from(key: &SortKey) -> Self {
        Self {
            column_key: key.column_key.clone(),
            descending: key.direction.is_descending(),
        }
    }
}

/// Ordered list of sort keys; earlier keys take precedence.
///
/// Header clicks keep a single key, but [`SortState::then`] builds
/// multi-column orders and [`apply_sort`] honors them.
///
/// # Example
///
/// ```
/// use tableview_lib::view::{Direction, SortState};
///
/// let sort = SortState::by("status", Direction::Asc).then("id", Direction::Desc);
/// assert_eq!(sort.keys().len(), 2);
/// assert_eq!(sort.direction_of("id"), Some(Direction::Desc));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    keys: Vec<SortKey>,
}

impl SortState {
    /// Creates an empty (unsorted) state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a single-column sort.
    pub fn by(column_key: impl Into<String>, direction: Direction) -> Self {
        Self {
            keys: vec![SortKey {
                column_key: column_key.into(),
                direction,
            }],
        }
    }

    /// Adds a lower-precedence sort key.
    pub fn then(mut self, column_key: impl Into<String>, direction: Direction) -> Self {
        let column_key = column_key.into();
        self.keys.retain(|k| k.column_key != column_key);
        self.keys.push(SortKey { column_key, direction });
        self
    }

    /// Returns the sort keys in precedence order.
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Returns `true` if no sort is applied.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the direction a column is sorted in, if any.
    pub fn direction_of(&self, column_key: &str) -> Option<Direction> {
        self.keys
            .iter()
            .find(|k| k.column_key == column_key)
            .map(|k| k.direction)
    }

    /// Removes all sort keys. Returns `true` if anything was sorted.
    pub fn clear(&mut self) -> bool {
        let changed = !self.keys.is_empty();
        self.keys.clear();
        changed
    }

    /// Advances a column through `cycle` as a header click would.
    ///
    /// Clicking a column other than the current primary sort replaces the
    /// whole order with an ascending sort on that column. Returns the
    /// column's new direction, `None` meaning unsorted.
    pub fn cycle(&mut self, column_key: &str, cycle: SortCycle) -> Option<Direction> {
        let current = match self.keys.as_slice() {
            [only] if only.column_key == column_key => Some(only.direction),
            _ => None,
        };

        let next = match (current, cycle) {
            (None, _) => Some(Direction::Asc),
            (Some(Direction::Asc), _) => Some(Direction::Desc),
            (Some(Direction::Desc), SortCycle::Toggle) => Some(Direction::Asc),
            (Some(Direction::Desc), SortCycle::ThreeState) => None,
        };

        *self = match next {
            Some(direction) => SortState::by(column_key, direction),
            None => SortState::new(),
        };
        next
    }

    /// Converts the state into the list reported to hosts.
    pub fn changes(&self) -> Vec<SortChange> {
        self.keys.iter().map(SortChange::from).collect()
    }
}

/// Orders two rows by every key of `state` in turn.
pub fn compare_rows(a: &Row, b: &Row, state: &SortState) -> Ordering {
    for key in &state.keys {
        let ordering = cell::compare(a.get(&key.column_key), b.get(&key.column_key));
        let ordering = match key.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Sorts rows by `state`. The sort is stable: rows with equal keys keep their
/// relative order, which makes re-applying the same state a no-op.
pub fn apply_sort<'a>(mut rows: Vec<&'a Row>, state: &SortState) -> Vec<&'a Row> {
    if !state.is_empty() {
        rows.sort_by(|a, b| compare_rows(a, b, state));
    }
    rows
}

/// Sorts dataset positions by `state`, comparing the rows they point at.
pub(crate) fn sort_indices(rows: &[Row], indices: &mut [usize], state: &SortState) {
    if !state.is_empty() {
        indices.sort_by(|&a, &b| compare_rows(&rows[a], &rows[b], state));
    }
}
