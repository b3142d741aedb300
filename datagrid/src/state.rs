//! Interactive table state.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::pagination::Pagination;
use crate::preferences::Preferences;
use crate::selection::Selection;
use crate::sort::{ColumnSort, SortDirection};

/// Everything the user can change about a table.
///
/// Seeded from the initial preferences (visibility, sizing) and otherwise
/// empty. Row data is not part of the state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableState {
    /// Active sort; at most one entry.
    pub sorting: Vec<ColumnSort>,
    /// `false` hides a column; absent means visible.
    pub column_visibility: BTreeMap<String, bool>,
    /// Width overrides in pixels.
    pub column_sizing: BTreeMap<String, u32>,
    pub row_selection: Selection,
    pub global_filter: String,
    pub pagination: Pagination,
}

impl TableState {
    /// Fresh state seeded from persisted preferences.
    pub fn from_preferences(preferences: &Preferences, pagination: Pagination) -> Self {
        Self {
            column_visibility: preferences.column_visibility.clone(),
            column_sizing: preferences.column_sizing.clone(),
            pagination,
            ..Self::default()
        }
    }

    /// The persisted subset of the state.
    pub fn preferences(&self) -> Preferences {
        Preferences {
            column_visibility: self.column_visibility.clone(),
            column_sizing: self.column_sizing.clone(),
        }
    }

    pub fn is_column_visible(&self, column_id: &str) -> bool {
        self.column_visibility.get(column_id).copied().unwrap_or(true)
    }

    /// Current sort direction of a column, if it is the sorted one.
    pub fn sort_direction(&self, column_id: &str) -> Option<SortDirection> {
        self.sorting
            .iter()
            .find(|s| s.column_id == column_id)
            .map(|s| s.direction)
    }
}
