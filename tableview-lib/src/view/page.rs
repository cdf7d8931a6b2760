//! Pagination stage.

use std::ops::Range;

/// Page sizes offered by default.
pub const DEFAULT_PAGE_SIZES: [usize; 5] = [10, 20, 30, 40, 50];

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Returns the number of pages needed for `row_count` rows.
///
/// Always at least 1, so an empty table still shows "page 1 of 1".
pub fn page_count(row_count: usize, page_size: usize) -> usize {
    row_count.div_ceil(page_size.max(1)).max(1)
}

/// Current page position.
///
/// The page index is not corrected when the row count shrinks; readers use
/// [`Pagination::clamped`] so an out-of-range index renders the last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Zero-based page index.
    pub page_index: usize,
    /// Rows per page.
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    /// Creates a pagination positioned on the first page.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size,
        }
    }

    /// Number of pages for `row_count` rows.
    pub fn page_count(&self, row_count: usize) -> usize {
        page_count(row_count, self.page_size)
    }

    /// Returns a copy whose index lies within `[0, page_count)`.
    pub fn clamped(&self, row_count: usize) -> Self {
        Self {
            page_index: self.page_index.min(self.page_count(row_count) - 1),
            page_size: self.page_size,
        }
    }

    /// Range of row positions covered by the current page.
    pub fn range(&self, row_count: usize) -> Range<usize> {
        let start = self.page_index.saturating_mul(self.page_size).min(row_count);
        let end = start.saturating_add(self.page_size).min(row_count);
        start..end
    }

    /// Returns `true` if there is a page before the current one.
    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    /// Returns `true` if there is a page after the current one.
    pub fn can_next(&self, row_count: usize) -> bool {
        self.page_index + 1 < self.page_count(row_count)
    }

    /// Moves to the first page. Returns `true` if the index changed.
    pub fn first(&mut self) -> bool {
        self.go_to(0)
    }

    /// Moves back one page; no-op on the first page.
    pub fn previous(&mut self) -> bool {
        if !self.can_previous() {
            return false;
        }
        self.page_index -= 1;
        true
    }

    /// Moves forward one page; no-op on the last page.
    pub fn next(&mut self, row_count: usize) -> bool {
        if !self.can_next(row_count) {
            return false;
        }
        self.page_index += 1;
        true
    }

    /// Moves to the last page.
    pub fn last(&mut self, row_count: usize) -> bool {
        self.go_to(self.page_count(row_count) - 1)
    }

    /// Jumps to `page_index`, clamped to the last page.
    pub fn jump(&mut self, page_index: usize, row_count: usize) -> bool {
        self.go_to(page_index.min(self.page_count(row_count) - 1))
    }

    /// Changes the page size and returns to the first page.
    pub fn resize(&mut self, page_size: usize) -> bool {
        let changed = self.page_size != page_size || self.page_index != 0;
        self.page_size = page_size;
        self.page_index = 0;
        changed
    }

    fn go_to(&mut self, page_index: usize) -> bool {
        if self.page_index == page_index {
            return false;
        }
        self.page_index = page_index;
        true
    }
}

/// One page of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice<T> {
    /// Rows on the page.
    pub rows: Vec<T>,
    /// Index of the page actually shown (after clamping).
    pub page_index: usize,
    /// Total number of pages.
    pub page_count: usize,
}

/// Slices `rows` down to the page selected by `pagination`.
///
/// An out-of-range index is clamped to the last page.
pub fn paginate<T: Clone>(rows: &[T], pagination: &Pagination) -> PageSlice<T> {
    let pagination = pagination.clamped(rows.len());
    PageSlice {
        rows: rows[pagination.range(rows.len())].to_vec(),
        page_index: pagination.page_index,
        page_count: pagination.page_count(rows.len()),
    }
}
