//! State transitions of a [`Table`].
//!
//! Every user interaction is a [`TableEvent`]. [`Table::dispatch`] applies it
//! under the table lock and then, with the lock released, runs the caller's
//! callbacks and observers.

use crate::sort::SortAction;
use crate::state::TableState;
use crate::table::{Table, TableInner};

/// A user interaction with the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    /// Header click or explicit sort request.
    Sort { column_id: String, action: SortAction },
    SetColumnVisibility { column_id: String, visible: bool },
    /// Requested width; clamped to the column bounds.
    SetColumnSizing { column_id: String, width: u32 },
    SetGlobalFilter(String),
    SetPageIndex(usize),
    SetPageSize(usize),
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    ToggleRowSelection(String),
    SetRowSelected { key: String, selected: bool },
    /// Header checkbox: select or deselect every row on the current page.
    TogglePageSelection,
    ClearSelection,
    /// Row activation, outside the checkbox and action cells.
    RowClicked(String),
}

/// What an applied event requires once the lock is released.
struct Effects<T> {
    changed: bool,
    selection_changed: bool,
    filter_changed: Option<String>,
    clicked: Option<T>,
}

impl<T> Default for Effects<T> {
    fn default() -> Self {
        Self {
            changed: false,
            selection_changed: false,
            filter_changed: None,
            clicked: None,
        }
    }
}

impl<T> Table<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Apply an event and return the resulting state.
    pub fn dispatch(&self, event: TableEvent) -> TableState {
        self.run(event);
        self.state()
    }

    /// Apply an event. Returns true if the state changed.
    fn run(&self, event: TableEvent) -> bool {
        let effects = match self.inner.write() {
            Ok(mut guard) => self.apply(&mut guard, event),
            Err(_) => return false,
        };

        if effects.selection_changed
            && let Some(callback) = &self.options.on_selected_rows_change
        {
            let rows = self.selected_rows();
            callback(&rows);
        }
        if let Some(query) = &effects.filter_changed
            && let Some(callback) = &self.options.on_global_filter_change
        {
            callback(query);
        }
        if let Some(row) = &effects.clicked
            && let Some(callback) = &self.options.on_row_click
        {
            callback(row);
        }

        let changed = effects.changed || effects.selection_changed;
        if changed {
            self.mark_changed();
        }
        changed
    }

    fn apply(&self, inner: &mut TableInner<T>, event: TableEvent) -> Effects<T> {
        let mut effects = Effects::default();

        match event {
            TableEvent::Sort { column_id, action } => {
                let sortable = inner.column(&column_id).is_some_and(|c| c.is_sortable());
                if !sortable {
                    log::debug!("ignoring sort on column '{}'", column_id);
                    return effects;
                }
                let next = crate::sort::next_sorting(&inner.state.sorting, &column_id, action);
                if next != inner.state.sorting {
                    inner.state.sorting = next;
                    effects.changed = true;
                }
            }

            TableEvent::SetColumnVisibility { column_id, visible } => {
                let hideable = inner.column(&column_id).is_some_and(|c| c.hideable);
                if !hideable {
                    log::debug!("column '{}' cannot be hidden", column_id);
                    return effects;
                }
                if inner.state.is_column_visible(&column_id) == visible {
                    return effects;
                }
                inner.state.column_visibility.insert(column_id, visible);
                inner.bridge.observe(&inner.state.preferences());
                effects.changed = true;
            }

            TableEvent::SetColumnSizing { column_id, width } => {
                let Some(width) = inner
                    .column(&column_id)
                    .filter(|c| c.resizable)
                    .map(|c| c.clamp_width(width))
                else {
                    log::debug!("column '{}' cannot be resized", column_id);
                    return effects;
                };
                if inner.state.column_sizing.get(&column_id) == Some(&width) {
                    return effects;
                }
                inner.state.column_sizing.insert(column_id, width);
                inner.bridge.observe(&inner.state.preferences());
                effects.changed = true;
            }

            TableEvent::SetGlobalFilter(query) => {
                if query == inner.state.global_filter {
                    return effects;
                }
                inner.state.global_filter = query.clone();
                inner.clamp_page();
                effects.changed = true;
                effects.filter_changed = Some(query);
            }

            TableEvent::SetPageIndex(index) => {
                let total = inner.filtered_count();
                effects.changed = inner.state.pagination.set_page_index(index, total);
            }
            TableEvent::SetPageSize(size) => {
                let total = inner.filtered_count();
                effects.changed = inner.state.pagination.set_page_size(size, total);
            }
            TableEvent::NextPage => {
                let total = inner.filtered_count();
                effects.changed = inner.state.pagination.next(total);
            }
            TableEvent::PreviousPage => {
                effects.changed = inner.state.pagination.previous();
            }
            TableEvent::FirstPage => {
                effects.changed = inner.state.pagination.first();
            }
            TableEvent::LastPage => {
                let total = inner.filtered_count();
                effects.changed = inner.state.pagination.last(total);
            }

            TableEvent::ToggleRowSelection(key) => {
                if !self.options.enable_row_selection {
                    return effects;
                }
                inner.state.row_selection.toggle(&key);
                effects.selection_changed = true;
            }
            TableEvent::SetRowSelected { key, selected } => {
                if !self.options.enable_row_selection {
                    return effects;
                }
                effects.selection_changed = inner.state.row_selection.set(&key, selected);
            }
            TableEvent::TogglePageSelection => {
                if !self.options.enable_row_selection {
                    return effects;
                }
                let keys: Vec<String> = inner
                    .page_indices(&self.options.locale)
                    .into_iter()
                    .map(|i| (self.options.key_of)(&inner.rows[i]))
                    .collect();
                let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
                effects.selection_changed = inner.state.row_selection.toggle_group(&keys);
            }
            TableEvent::ClearSelection => {
                effects.selection_changed = !inner.state.row_selection.clear().is_empty();
            }

            TableEvent::RowClicked(key) => {
                effects.clicked = inner
                    .rows
                    .iter()
                    .find(|row| (self.options.key_of)(row) == key)
                    .cloned();
            }
        }

        effects
    }

    // -------------------------------------------------------------------------
    // Convenience setters
    // -------------------------------------------------------------------------

    /// Returns true if the sort changed.
    pub fn set_sorting(&self, column_id: &str, action: SortAction) -> bool {
        self.run(TableEvent::Sort {
            column_id: column_id.to_string(),
            action,
        })
    }

    /// Header click: cycle unsorted, ascending, descending.
    pub fn toggle_sorting(&self, column_id: &str) -> bool {
        self.set_sorting(column_id, SortAction::Toggle)
    }

    pub fn set_column_visibility(&self, column_id: &str, visible: bool) -> bool {
        self.run(TableEvent::SetColumnVisibility {
            column_id: column_id.to_string(),
            visible,
        })
    }

    pub fn set_column_sizing(&self, column_id: &str, width: u32) -> bool {
        self.run(TableEvent::SetColumnSizing {
            column_id: column_id.to_string(),
            width,
        })
    }

    pub fn set_global_filter(&self, query: &str) -> bool {
        self.run(TableEvent::SetGlobalFilter(query.to_string()))
    }

    pub fn set_page_index(&self, index: usize) -> bool {
        self.run(TableEvent::SetPageIndex(index))
    }

    pub fn set_page_size(&self, size: usize) -> bool {
        self.run(TableEvent::SetPageSize(size))
    }

    pub fn next_page(&self) -> bool {
        self.run(TableEvent::NextPage)
    }

    pub fn previous_page(&self) -> bool {
        self.run(TableEvent::PreviousPage)
    }

    pub fn first_page(&self) -> bool {
        self.run(TableEvent::FirstPage)
    }

    pub fn last_page(&self) -> bool {
        self.run(TableEvent::LastPage)
    }

    pub fn toggle_row_selection(&self, key: &str) -> bool {
        self.run(TableEvent::ToggleRowSelection(key.to_string()))
    }

    pub fn set_row_selected(&self, key: &str, selected: bool) -> bool {
        self.run(TableEvent::SetRowSelected {
            key: key.to_string(),
            selected,
        })
    }

    pub fn toggle_page_selection(&self) -> bool {
        self.run(TableEvent::TogglePageSelection)
    }

    pub fn clear_selection(&self) -> bool {
        self.run(TableEvent::ClearSelection)
    }

    /// Forward a row click to the `on_row_click` callback.
    pub fn click_row(&self, key: &str) {
        self.run(TableEvent::RowClicked(key.to_string()));
    }
}
