//! Client-side data tables.
//!
//! A [`Table`] holds a rowset plus the interactive state around it (global
//! filter, sort, pagination, column visibility and widths, row selection)
//! and produces a [`TableView`] for rendering. Column visibility and widths
//! are written back through a debounced [`PreferenceSink`].

pub mod bulk;
pub mod column;
pub mod error;
pub mod events;
pub mod filter;
pub mod pagination;
pub mod preferences;
pub mod resize;
pub mod selection;
pub mod sort;
pub mod state;
pub mod table;
pub mod value;
pub mod view;

pub use bulk::{ActionVariant, BulkAction, BulkActionBar, ClearSelection};
pub use column::{CellContext, ColumnDescriptor, HeaderContext, validate_columns};
pub use error::{ColumnConfigError, PreferenceError};
pub use events::TableEvent;
pub use pagination::{PAGE_SIZE_OPTIONS, Pagination};
pub use preferences::{PreferenceBridge, PreferenceSink, Preferences};
pub use resize::ResizeHandle;
pub use selection::{CheckState, Selection};
pub use sort::{ColumnSort, SortAction, SortDirection};
pub use state::TableState;
pub use table::{SubscriptionId, Table, TableBuilder, TableId};
pub use value::CellValue;
pub use view::{CellView, ColumnToggle, EmptyState, FooterView, HeaderView, RowView, TableView};

pub mod prelude {
    pub use crate::bulk::{ActionVariant, BulkAction, ClearSelection};
    pub use crate::column::ColumnDescriptor;
    pub use crate::events::TableEvent;
    pub use crate::preferences::{PreferenceSink, Preferences, sink_fn};
    pub use crate::selection::CheckState;
    pub use crate::sort::{SortAction, SortDirection};
    pub use crate::table::Table;
    pub use crate::value::CellValue;
    pub use crate::view::TableView;
}
