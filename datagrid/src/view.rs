//! Render model of a table.
//!
//! [`Table::view`] flattens the current state into plain data a renderer can
//! draw without touching the controller: header cells, the visible page of
//! rows, the footer, the column menu and the bulk action bar.

use crate::bulk::BulkActionBar;
use crate::pagination::PAGE_SIZE_OPTIONS;
use crate::selection::CheckState;
use crate::sort::SortDirection;
use crate::table::Table;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub column_id: String,
    pub text: String,
    pub width: u32,
    pub sort: Option<SortDirection>,
    pub sortable: bool,
    pub resizable: bool,
    /// A resize drag is in progress on this column.
    pub resizing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    pub column_id: String,
    pub text: String,
    pub width: u32,
}

/// One row of the current page.
#[derive(Debug, Clone)]
pub struct RowView<T> {
    pub key: String,
    pub selected: bool,
    pub cells: Vec<CellView>,
    pub row: T,
}

/// Full-width row shown when no row passes the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub text: String,
    /// Number of visible columns the row spans.
    pub colspan: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterView {
    /// Rows passing the filter.
    pub total_items: usize,
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub can_previous: bool,
    pub can_next: bool,
    pub text: String,
}

impl FooterView {
    /// "Page x of y", one-based.
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page_index + 1, self.page_count)
    }
}

/// Entry of the column visibility menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnToggle {
    pub id: String,
    pub label: String,
    pub visible: bool,
}

/// Everything needed to draw one frame of the table.
#[derive(Debug, Clone)]
pub struct TableView<T> {
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView<T>>,
    pub empty_state: Option<EmptyState>,
    pub footer: FooterView,
    /// Hideable columns only.
    pub column_menu: Vec<ColumnToggle>,
    /// Header checkbox; `None` when row selection is disabled.
    pub select_all: Option<CheckState>,
    /// Present while at least one selected row is in the data.
    pub bulk_bar: Option<BulkActionBar>,
}

impl<T> Table<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Build the render model for the current state.
    pub fn view(&self) -> TableView<T> {
        let locale = self.display_locale().to_string();

        let (headers, rows, footer, column_menu) = {
            let Ok(guard) = self.inner.read() else {
                return self.empty_view();
            };

            let headers: Vec<HeaderView> = guard
                .visible_columns()
                .map(|column| {
                    let width = guard.column_width(column);
                    let sort = guard.state.sort_direction(&column.id);
                    HeaderView {
                        column_id: column.id.clone(),
                        text: column.render_header(sort, width),
                        width,
                        sort,
                        sortable: column.is_sortable(),
                        resizable: column.resizable,
                        resizing: guard.resizing.as_deref() == Some(column.id.as_str()),
                    }
                })
                .collect();

            let rows: Vec<RowView<T>> = guard
                .page_indices(&locale)
                .into_iter()
                .map(|index| {
                    let row = &guard.rows[index];
                    let key = self.key_of(row);
                    let cells = guard
                        .visible_columns()
                        .map(|column| {
                            let width = guard.column_width(column);
                            CellView {
                                column_id: column.id.clone(),
                                text: column.render_cell(row, &locale, width),
                                width,
                            }
                        })
                        .collect();
                    RowView {
                        selected: guard.state.row_selection.is_selected(&key),
                        key,
                        cells,
                        row: row.clone(),
                    }
                })
                .collect();

            let total = guard.filtered_count();
            let pagination = guard.state.pagination;
            let footer = FooterView {
                total_items: total,
                page_index: pagination.page_index,
                page_count: pagination.page_count(total),
                page_size: pagination.page_size,
                page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
                can_previous: pagination.can_previous(),
                can_next: pagination.can_next(total),
                text: self.footer_text(total),
            };

            let column_menu = guard
                .columns
                .iter()
                .filter(|c| c.hideable)
                .map(|c| ColumnToggle {
                    id: c.id.clone(),
                    label: c.menu_title(),
                    visible: guard.is_visible(c),
                })
                .collect();

            (headers, rows, footer, column_menu)
        };

        let empty_state = rows.is_empty().then(|| EmptyState {
            text: self.options.empty_state_text.clone(),
            colspan: headers.len(),
        });

        let select_all = self
            .row_selection_enabled()
            .then(|| self.page_check_state());

        let bulk_bar = if self.row_selection_enabled() {
            let actions = self.bulk_actions();
            let count = self.selected_count();
            (count > 0).then_some(BulkActionBar { count, actions })
        } else {
            None
        };

        TableView {
            headers,
            rows,
            empty_state,
            footer,
            column_menu,
            select_all,
            bulk_bar,
        }
    }

    fn footer_text(&self, total: usize) -> String {
        match &self.options.footer_text {
            Some(text) => text.clone(),
            None => format!("{} Total Items", total),
        }
    }

    fn empty_view(&self) -> TableView<T> {
        TableView {
            headers: Vec::new(),
            rows: Vec::new(),
            empty_state: Some(EmptyState {
                text: self.options.empty_state_text.clone(),
                colspan: 0,
            }),
            footer: FooterView {
                total_items: 0,
                page_index: 0,
                page_count: 1,
                page_size: 0,
                page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
                can_previous: false,
                can_next: false,
                text: self.footer_text(0),
            },
            column_menu: Vec::new(),
            select_all: None,
            bulk_bar: None,
        }
    }
}
