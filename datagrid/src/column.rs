//! Column descriptors.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::ColumnConfigError;
use crate::sort::SortDirection;
use crate::value::CellValue;

/// Default column width in pixels.
pub const DEFAULT_COLUMN_SIZE: u32 = 150;

/// Lower width bound when a column does not declare `min_size`.
pub const MIN_COLUMN_SIZE: u32 = 40;

/// Reads a cell value out of a row.
pub type Accessor<T> = Arc<dyn Fn(&T) -> CellValue + Send + Sync>;

/// Renders the cell of a row to display text.
pub type CellRenderer<T> = Arc<dyn Fn(&T, &CellContext<'_>) -> String + Send + Sync>;

/// Renders a header to display text.
pub type HeaderRenderer = Arc<dyn Fn(&HeaderContext<'_>) -> String + Send + Sync>;

/// Row comparator for a custom sort order (ascending).
pub type SortComparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// What a cell renderer gets to see besides the row.
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    pub column_id: &'a str,
    /// Accessor output (`Null` for display-only columns).
    pub value: &'a CellValue,
    /// Active display locale.
    pub locale: &'a str,
    /// Current column width in pixels.
    pub width: u32,
}

/// What a header renderer gets to see.
#[derive(Debug, Clone, Copy)]
pub struct HeaderContext<'a> {
    pub column_id: &'a str,
    pub title: &'a str,
    pub sort: Option<SortDirection>,
    pub width: u32,
}

/// Declarative description of one table column.
///
/// A descriptor says how to read, render, sort and size a column. It never
/// holds rows and has no side effects.
///
/// # Examples
///
/// ```
/// use datagrid::{CellValue, ColumnDescriptor};
///
/// struct Product { name: String, kcal: i64 }
///
/// let columns = vec![
///     ColumnDescriptor::new("name")
///         .header("Name")
///         .accessor(|p: &Product| CellValue::from(p.name.as_str()))
///         .size(200)
///         .pinned(),
///     ColumnDescriptor::new("kcal")
///         .header("Kcal")
///         .accessor(|p: &Product| CellValue::from(p.kcal))
///         .cell(|_, cx| format!("{} kcal", cx.value.display(cx.locale)))
///         .size(100),
/// ];
/// assert!(datagrid::validate_columns(&columns).is_ok());
/// ```
pub struct ColumnDescriptor<T> {
    /// Unique identifier within the table.
    pub id: String,
    title: String,
    menu_label: Option<String>,
    header: Option<HeaderRenderer>,
    accessor: Option<Accessor<T>>,
    cell: Option<CellRenderer<T>>,
    comparator: Option<SortComparator<T>>,
    /// Default width in pixels.
    pub size: u32,
    pub min_size: Option<u32>,
    pub max_size: Option<u32>,
    sortable: Option<bool>,
    /// Whether the user may hide this column.
    pub hideable: bool,
    /// Whether the user may drag this column's width.
    pub resizable: bool,
    /// Whether the global filter searches this column.
    pub filterable: bool,
}

impl<T> ColumnDescriptor<T> {
    /// Create a display-only column. Add an accessor to make it sortable and
    /// searchable.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            menu_label: None,
            header: None,
            accessor: None,
            cell: None,
            comparator: None,
            size: DEFAULT_COLUMN_SIZE,
            min_size: None,
            max_size: None,
            sortable: None,
            hideable: true,
            resizable: true,
            filterable: true,
        }
    }

    /// Set the header title.
    pub fn header(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Render the header with a custom function.
    pub fn header_with<F>(mut self, render: F) -> Self
    where
        F: Fn(&HeaderContext<'_>) -> String + Send + Sync + 'static,
    {
        self.header = Some(Arc::new(render));
        self
    }

    /// Label shown in the column visibility menu.
    pub fn menu_label(mut self, label: impl Into<String>) -> Self {
        self.menu_label = Some(label.into());
        self
    }

    /// Read the cell value from a row.
    pub fn accessor<F>(mut self, accessor: F) -> Self
    where
        F: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        self.accessor = Some(Arc::new(accessor));
        self
    }

    /// Render the cell with a custom function.
    ///
    /// Called with the table's state lock held; see [`Table::builder`](crate::Table::builder).
    pub fn cell<F>(mut self, render: F) -> Self
    where
        F: Fn(&T, &CellContext<'_>) -> String + Send + Sync + 'static,
    {
        self.cell = Some(Arc::new(render));
        self
    }

    /// Sort with a custom ascending comparator. Makes the column sortable.
    pub fn sort_with<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.comparator = Some(Arc::new(comparator));
        self.sortable = Some(true);
        self
    }

    /// Set the default width in pixels.
    pub fn size(mut self, px: u32) -> Self {
        self.size = px;
        self
    }

    pub fn min_size(mut self, px: u32) -> Self {
        self.min_size = Some(px);
        self
    }

    pub fn max_size(mut self, px: u32) -> Self {
        self.max_size = Some(px);
        self
    }

    /// Disable sorting even though the column has an accessor.
    pub fn not_sortable(mut self) -> Self {
        self.sortable = Some(false);
        self
    }

    /// Prevent the user from hiding this column.
    pub fn pinned(mut self) -> Self {
        self.hideable = false;
        self
    }

    /// Prevent the user from resizing this column.
    pub fn fixed_width(mut self) -> Self {
        self.resizable = false;
        self
    }

    /// Exclude this column from the global filter.
    pub fn not_filterable(mut self) -> Self {
        self.filterable = false;
        self
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Label for the visibility menu: explicit label, else the id with its
    /// first underscore turned into a space.
    pub fn menu_title(&self) -> String {
        match &self.menu_label {
            Some(label) => label.clone(),
            None => self.id.replacen('_', " ", 1),
        }
    }

    pub fn has_accessor(&self) -> bool {
        self.accessor.is_some()
    }

    /// A column sorts when it has something to sort by and was not opted out.
    pub fn is_sortable(&self) -> bool {
        let can_sort = self.accessor.is_some() || self.comparator.is_some();
        can_sort && self.sortable.unwrap_or(true)
    }

    pub fn comparator(&self) -> Option<&SortComparator<T>> {
        self.comparator.as_ref()
    }

    /// The accessor output for a row, or `Null` for display-only columns.
    pub fn value(&self, row: &T) -> CellValue {
        match &self.accessor {
            Some(accessor) => accessor(row),
            None => CellValue::Null,
        }
    }

    /// Display text for a row's cell.
    pub fn render_cell(&self, row: &T, locale: &str, width: u32) -> String {
        let value = self.value(row);
        match &self.cell {
            Some(render) => render(
                row,
                &CellContext {
                    column_id: &self.id,
                    value: &value,
                    locale,
                    width,
                },
            ),
            None => value.display(locale),
        }
    }

    /// Display text for the header.
    pub fn render_header(&self, sort: Option<SortDirection>, width: u32) -> String {
        match &self.header {
            Some(render) => render(&HeaderContext {
                column_id: &self.id,
                title: &self.title,
                sort,
                width,
            }),
            None => self.title.clone(),
        }
    }

    /// Clamp a requested width into this column's bounds.
    ///
    /// Bounds are `[min_size, max_size]` where given, with a floor of
    /// [`MIN_COLUMN_SIZE`] when no `min_size` is declared.
    pub fn clamp_width(&self, px: u32) -> u32 {
        let min = self.min_size.unwrap_or(MIN_COLUMN_SIZE);
        let max = self.max_size.unwrap_or(u32::MAX).max(min);
        px.clamp(min, max)
    }
}

impl<T> Clone for ColumnDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            menu_label: self.menu_label.clone(),
            header: self.header.clone(),
            accessor: self.accessor.clone(),
            cell: self.cell.clone(),
            comparator: self.comparator.clone(),
            size: self.size,
            min_size: self.min_size,
            max_size: self.max_size,
            sortable: self.sortable,
            hideable: self.hideable,
            resizable: self.resizable,
            filterable: self.filterable,
        }
    }
}

impl<T> fmt::Debug for ColumnDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("size", &self.size)
            .field("min_size", &self.min_size)
            .field("max_size", &self.max_size)
            .field("sortable", &self.is_sortable())
            .field("hideable", &self.hideable)
            .field("resizable", &self.resizable)
            .field("filterable", &self.filterable)
            .finish_non_exhaustive()
    }
}

/// Check a column list for configuration mistakes.
///
/// Meant to be called where columns are declared. The table does not call
/// this to reject anything; it only logs the result.
pub fn validate_columns<T>(columns: &[ColumnDescriptor<T>]) -> Result<(), ColumnConfigError> {
    if columns.is_empty() {
        return Err(ColumnConfigError::Empty);
    }

    let mut seen = HashSet::with_capacity(columns.len());
    for column in columns {
        if !seen.insert(column.id.as_str()) {
            return Err(ColumnConfigError::DuplicateId(column.id.clone()));
        }
    }

    if columns.iter().all(|c| c.hideable) {
        return Err(ColumnConfigError::NoPinnedColumn);
    }

    Ok(())
}
