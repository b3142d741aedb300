//! Row selection state.
//!
//! Selection is keyed by caller-defined row keys, so it survives
//! re-filtering, re-sorting and page changes. Keys of rows that disappear
//! from the data stay in the set until the caller clears it.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

/// Key-based selection set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    selected: BTreeSet<String>,
}

/// Tri-state of the "select page" header checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    /// Every row on the page is selected.
    Checked,
    /// Some, but not all, rows on the page are selected.
    Indeterminate,
    Unchecked,
}

impl Selection {
    /// Create a new empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all selected keys (sorted).
    pub fn selected(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.contains(key)
    }

    /// Number of keys in the set, including stale ones.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Clear all selection.
    /// Returns the keys that were deselected.
    pub fn clear(&mut self) -> Vec<String> {
        std::mem::take(&mut self.selected).into_iter().collect()
    }

    /// Toggle a key. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.selected.remove(key) {
            false
        } else {
            self.selected.insert(key.to_string());
            true
        }
    }

    /// Set a key's selection. Returns true if anything changed.
    pub fn set(&mut self, key: &str, selected: bool) -> bool {
        if selected {
            self.selected.insert(key.to_string())
        } else {
            self.selected.remove(key)
        }
    }

    /// Select all the given keys.
    /// Returns the keys that were newly selected.
    pub fn select_all<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        keys.into_iter()
            .filter(|key| self.selected.insert(key.to_string()))
            .map(str::to_string)
            .collect()
    }

    /// Deselect all the given keys.
    /// Returns the keys that were removed.
    pub fn deselect_all<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        keys.into_iter()
            .filter(|key| self.selected.remove(*key))
            .map(str::to_string)
            .collect()
    }

    /// Checkbox state for a group of keys (typically the current page).
    pub fn check_state<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> CheckState {
        let mut total = 0;
        let mut selected = 0;
        for key in keys {
            total += 1;
            if self.selected.contains(key) {
                selected += 1;
            }
        }

        match selected {
            0 => CheckState::Unchecked,
            n if n == total => CheckState::Checked,
            _ => CheckState::Indeterminate,
        }
    }

    /// Header checkbox click: select every key in the group unless they are
    /// all selected already, in which case deselect them.
    /// Returns true if anything changed.
    pub fn toggle_group<'a>(&mut self, keys: &[&'a str]) -> bool {
        match self.check_state(keys.iter().copied()) {
            CheckState::Checked => !self.deselect_all(keys.iter().copied()).is_empty(),
            _ => !self.select_all(keys.iter().copied()).is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_set() {
        let mut s = Selection::new();
        assert!(s.toggle("r1"));
        assert!(s.is_selected("r1"));
        assert!(!s.toggle("r1"));
        assert!(s.is_empty());

        assert!(s.set("r2", true));
        assert!(!s.set("r2", true));
        assert!(s.set("r2", false));
    }

    #[test]
    fn test_check_state() {
        let mut s = Selection::new();
        let page = ["a", "b", "c"];
        assert_eq!(s.check_state(page), CheckState::Unchecked);
        s.set("b", true);
        assert_eq!(s.check_state(page), CheckState::Indeterminate);
        s.select_all(page);
        assert_eq!(s.check_state(page), CheckState::Checked);
    }

    #[test]
    fn test_toggle_group_only_touches_group() {
        let mut s = Selection::new();
        s.set("elsewhere", true);
        s.set("a", true);

        assert!(s.toggle_group(&["a", "b"]));
        assert_eq!(s.selected(), vec!["a", "b", "elsewhere"]);

        assert!(s.toggle_group(&["a", "b"]));
        assert_eq!(s.selected(), vec!["elsewhere"]);
    }

    #[test]
    fn test_empty_group_is_unchecked() {
        let mut s = Selection::new();
        assert_eq!(s.check_state(std::iter::empty()), CheckState::Unchecked);
        assert!(!s.toggle_group(&[]));
    }

    #[test]
    fn test_clear_returns_removed() {
        let mut s = Selection::new();
        s.select_all(["x", "y"]);
        assert_eq!(s.clear(), vec!["x", "y"]);
        assert!(s.is_empty());
    }
}
