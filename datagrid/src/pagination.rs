//! Fixed-size page windowing.

use std::ops::Range;

use serde::Deserialize;
use serde::Serialize;

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered by the page size selector.
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [10, 20, 30, 40, 50];

/// Pagination state.
///
/// All mutators take the current filtered row count and keep `page_index`
/// inside `[0, page_count - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: snap_page_size(page_size),
        }
    }

    /// `max(1, ceil(total / page_size))`.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size.max(1)).max(1)
    }

    /// Pull `page_index` back onto the last page. Returns true if it moved.
    pub fn clamp(&mut self, total: usize) -> bool {
        let last = self.page_count(total) - 1;
        if self.page_index > last {
            self.page_index = last;
            true
        } else {
            false
        }
    }

    pub fn set_page_index(&mut self, index: usize, total: usize) -> bool {
        let index = index.min(self.page_count(total) - 1);
        let changed = self.page_index != index;
        self.page_index = index;
        changed
    }

    /// Change the page size, snapping to the nearest offered option, and
    /// clamp the index. The first visible row is not preserved.
    pub fn set_page_size(&mut self, size: usize, total: usize) -> bool {
        let size = snap_page_size(size);
        let changed = self.page_size != size;
        self.page_size = size;
        self.clamp(total) || changed
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self, total: usize) -> bool {
        self.page_index + 1 < self.page_count(total)
    }

    pub fn previous(&mut self) -> bool {
        if !self.can_previous() {
            return false;
        }
        self.page_index -= 1;
        true
    }

    pub fn next(&mut self, total: usize) -> bool {
        if !self.can_next(total) {
            return false;
        }
        self.page_index += 1;
        true
    }

    pub fn first(&mut self) -> bool {
        self.set_page_index(0, 0)
    }

    pub fn last(&mut self, total: usize) -> bool {
        let last = self.page_count(total) - 1;
        self.set_page_index(last, total)
    }

    /// Range of positions (into the filtered, sorted rows) on the current page.
    pub fn window(&self, total: usize) -> Range<usize> {
        let size = self.page_size.max(1);
        let index = self.page_index.min(self.page_count(total) - 1);
        let start = (index * size).min(total);
        let end = (start + size).min(total);
        start..end
    }
}

/// Snap an arbitrary page size onto the closest entry of [`PAGE_SIZE_OPTIONS`].
pub fn snap_page_size(size: usize) -> usize {
    PAGE_SIZE_OPTIONS
        .iter()
        .copied()
        .min_by_key(|option| option.abs_diff(size))
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        let p = Pagination::default();
        assert_eq!(p.page_count(0), 1);
        assert_eq!(p.page_count(10), 1);
        assert_eq!(p.page_count(11), 2);
        assert_eq!(p.page_count(25), 3);
    }

    #[test]
    fn test_set_page_index_clamps() {
        let mut p = Pagination::default();
        assert!(p.set_page_index(5, 25));
        assert_eq!(p.page_index, 2);
        assert_eq!(p.window(25), 20..25);
    }

    #[test]
    fn test_boundaries_are_noops() {
        let mut p = Pagination::default();
        assert!(!p.previous());
        assert!(p.next(25));
        assert!(p.next(25));
        assert!(!p.next(25));
        assert_eq!(p.page_index, 2);
        assert!(p.first());
        assert!(!p.first());
        assert!(p.last(25));
        assert_eq!(p.page_index, 2);
    }

    #[test]
    fn test_page_size_change_clamps_index() {
        let mut p = Pagination::default();
        p.set_page_index(4, 50);
        assert!(p.set_page_size(50, 50));
        assert_eq!(p.page_size, 50);
        assert_eq!(p.page_index, 0);

        let mut q = Pagination::default();
        q.set_page_index(1, 50);
        q.set_page_size(20, 50);
        // No scroll-position preservation: index stays where it is if valid.
        assert_eq!(q.page_index, 1);
    }

    #[test]
    fn test_snap_page_size() {
        assert_eq!(snap_page_size(0), 10);
        assert_eq!(snap_page_size(24), 20);
        assert_eq!(snap_page_size(26), 30);
        assert_eq!(snap_page_size(1000), 50);
    }

    #[test]
    fn test_empty_window() {
        let p = Pagination::default();
        assert_eq!(p.window(0), 0..0);
    }
}
