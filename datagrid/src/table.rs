//! The table controller.
//!
//! [`Table`] owns the interactive state of one table instance and derives
//! the visible rows through a fixed pipeline: filter, then sort, then
//! paginate. State changes go through [`Table::dispatch`] (see
//! [`events`](crate::events)); observers are told about every change.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use crate::bulk::{BulkAction, ClearSelection, SelectionActions};
use crate::column::{ColumnDescriptor, validate_columns};
use crate::filter::filter_rows;
use crate::pagination::Pagination;
use crate::preferences::{DEFAULT_DEBOUNCE, PreferenceBridge, PreferenceSink, Preferences};
use crate::selection::CheckState;
use crate::sort::sort_indices;
use crate::state::TableState;
use crate::value::FALLBACK_LOCALE;

/// Text of the single full-width row shown when nothing matches.
pub const DEFAULT_EMPTY_STATE_TEXT: &str = "No results found.";

/// Extracts the selection key of a row.
pub type KeyFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
pub type RowCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;
pub type RowsCallback<T> = Arc<dyn Fn(&[T]) + Send + Sync>;
pub type FilterCallback = Arc<dyn Fn(&str) + Send + Sync>;
/// Redraw hook, called with the new state after every change.
pub type Observer = Arc<dyn Fn(&TableState) + Send + Sync>;

/// Unique identifier for a Table instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(usize);

impl TableId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__datagrid_{}", self.0)
    }
}

/// Handle returned by [`Table::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

/// Fixed configuration supplied by the caller at build time.
pub(crate) struct TableOptions<T> {
    pub key_of: KeyFn<T>,
    pub enable_row_selection: bool,
    pub on_selected_rows_change: Option<RowsCallback<T>>,
    pub on_global_filter_change: Option<FilterCallback>,
    pub on_row_click: Option<RowCallback<T>>,
    pub selection_actions: Option<SelectionActions<T>>,
    pub empty_state_text: String,
    pub footer_text: Option<String>,
    pub locale: String,
}

/// Internal state for the Table.
pub(crate) struct TableInner<T> {
    pub columns: Vec<ColumnDescriptor<T>>,
    /// Caller-owned snapshot; never mutated in place.
    pub rows: Vec<T>,
    pub state: TableState,
    pub bridge: PreferenceBridge,
    /// Column currently being dragged, if any.
    pub resizing: Option<String>,
}

impl<T> TableInner<T> {
    /// First column with the given id.
    pub fn column(&self, column_id: &str) -> Option<&ColumnDescriptor<T>> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    /// Pinned columns are always shown, whatever the stored visibility says.
    pub fn is_visible(&self, column: &ColumnDescriptor<T>) -> bool {
        !column.hideable || self.state.is_column_visible(&column.id)
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnDescriptor<T>> {
        self.columns.iter().filter(|c| self.is_visible(c))
    }

    /// Effective width: stored override clamped to the column bounds, or the
    /// declared size.
    pub fn column_width(&self, column: &ColumnDescriptor<T>) -> u32 {
        self.state
            .column_sizing
            .get(&column.id)
            .map(|&w| column.clamp_width(w))
            .unwrap_or(column.size)
    }

    pub fn filtered_count(&self) -> usize {
        filter_rows(&self.rows, &self.columns, &self.state.global_filter).len()
    }

    /// Row positions after filtering and sorting.
    pub fn filtered_sorted(&self, locale: &str) -> Vec<usize> {
        let mut indices = filter_rows(&self.rows, &self.columns, &self.state.global_filter);
        if let Some(sort) = self.state.sorting.first()
            && let Some(column) = self.column(&sort.column_id)
            && column.is_sortable()
        {
            sort_indices(&self.rows, &mut indices, column, sort.direction, locale);
        }
        indices
    }

    /// Row positions on the current page.
    pub fn page_indices(&self, locale: &str) -> Vec<usize> {
        let all = self.filtered_sorted(locale);
        let window = self.state.pagination.window(all.len());
        all[window].to_vec()
    }

    pub fn clamp_page(&mut self) -> bool {
        let total = self.filtered_count();
        self.state.pagination.clamp(total)
    }
}

/// A client-side data table over an in-memory rowset.
///
/// `Table<T>` manages a collection of rows with:
/// - Global full-text filtering (AND over whitespace-separated terms)
/// - Single-column sorting
/// - Hideable and resizable columns, persisted through a debounced bridge
/// - Key-based row selection with a bulk action bar
/// - Fixed-size pagination
///
/// Cloning a `Table` yields another handle to the same instance.
///
/// # Example
///
/// ```
/// use datagrid::{CellValue, ColumnDescriptor, Table};
///
/// #[derive(Clone)]
/// struct Tag { id: String, name: String }
///
/// let columns = vec![
///     ColumnDescriptor::new("name")
///         .header("Name")
///         .accessor(|t: &Tag| CellValue::from(t.name.as_str()))
///         .pinned(),
/// ];
/// let table = Table::builder(columns, |t: &Tag| t.id.clone())
///     .data(vec![
///         Tag { id: "1".into(), name: "Vegan".into() },
///         Tag { id: "2".into(), name: "Keto".into() },
///     ])
///     .build();
///
/// table.set_global_filter("veg");
/// assert_eq!(table.filtered_count(), 1);
/// ```
pub struct Table<T> {
    id: TableId,
    pub(crate) inner: Arc<RwLock<TableInner<T>>>,
    pub(crate) options: Arc<TableOptions<T>>,
    observers: Arc<Mutex<Vec<(SubscriptionId, Observer)>>>,
    next_subscription: Arc<AtomicUsize>,
    /// Dirty flag for re-render.
    dirty: Arc<AtomicBool>,
}

impl<T> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: self.inner.clone(),
            options: self.options.clone(),
            observers: self.observers.clone(),
            next_subscription: self.next_subscription.clone(),
            dirty: self.dirty.clone(),
        }
    }
}

impl<T> fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("id", &self.id)
            .field("locale", &self.options.locale)
            .finish_non_exhaustive()
    }
}

impl<T> Table<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Start building a table from its columns and a row key function.
    ///
    /// `key_of`, accessors, comparators and cell renderers run while the
    /// table's state lock is held. They must not call back into the same
    /// table; doing so deadlocks.
    pub fn builder<K>(columns: Vec<ColumnDescriptor<T>>, key_of: K) -> TableBuilder<T>
    where
        K: Fn(&T) -> String + Send + Sync + 'static,
    {
        TableBuilder::new(columns, Arc::new(key_of))
    }

    /// Get the unique ID.
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> TableState {
        self.inner
            .read()
            .map(|g| g.state.clone())
            .unwrap_or_default()
    }

    /// The persisted subset of the current state.
    pub fn preferences(&self) -> Preferences {
        self.state().preferences()
    }

    pub fn display_locale(&self) -> &str {
        &self.options.locale
    }

    pub fn row_selection_enabled(&self) -> bool {
        self.options.enable_row_selection
    }

    /// The key of a row, as used for selection.
    pub fn key_of(&self, row: &T) -> String {
        (self.options.key_of)(row)
    }

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    pub fn columns(&self) -> Vec<ColumnDescriptor<T>> {
        self.inner
            .read()
            .map(|g| g.columns.clone())
            .unwrap_or_default()
    }

    /// Ids of the columns currently shown, in declaration order.
    pub fn visible_column_ids(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|g| g.visible_columns().map(|c| c.id.clone()).collect())
            .unwrap_or_default()
    }

    pub fn is_column_visible(&self, column_id: &str) -> bool {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.column(column_id).map(|c| g.is_visible(c)))
            .unwrap_or(false)
    }

    /// Effective width of a column in pixels.
    pub fn column_width(&self, column_id: &str) -> Option<u32> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.column(column_id).map(|c| g.column_width(c)))
    }

    /// The column being resized, if a drag is in progress.
    pub fn resizing_column(&self) -> Option<String> {
        self.inner.read().ok().and_then(|g| g.resizing.clone())
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// Replace the row data.
    ///
    /// Selection is kept: keys of rows that disappeared stay selected but
    /// stop counting. Call [`clear_selection`](Self::clear_selection) to
    /// reset it.
    pub fn set_data(&self, rows: Vec<T>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.rows = rows;
            guard.clamp_page();
        }
        self.mark_changed();
    }

    /// Get the number of rows.
    pub fn len(&self) -> usize {
        self.inner.read().map(|g| g.rows.len()).unwrap_or(0)
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn rows(&self) -> Vec<T> {
        self.inner
            .read()
            .map(|g| g.rows.clone())
            .unwrap_or_default()
    }

    /// Number of rows passing the global filter.
    pub fn filtered_count(&self) -> usize {
        self.inner.read().map(|g| g.filtered_count()).unwrap_or(0)
    }

    /// Rows after filtering and sorting.
    pub fn filtered_rows(&self) -> Vec<T> {
        self.inner
            .read()
            .map(|g| {
                g.filtered_sorted(&self.options.locale)
                    .into_iter()
                    .map(|i| g.rows[i].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Rows on the current page.
    pub fn page_rows(&self) -> Vec<T> {
        self.inner
            .read()
            .map(|g| {
                g.page_indices(&self.options.locale)
                    .into_iter()
                    .map(|i| g.rows[i].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn page_count(&self) -> usize {
        self.inner
            .read()
            .map(|g| g.state.pagination.page_count(g.filtered_count()))
            .unwrap_or(1)
    }

    pub fn pagination(&self) -> Pagination {
        self.inner
            .read()
            .map(|g| g.state.pagination)
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn is_selected(&self, key: &str) -> bool {
        self.inner
            .read()
            .map(|g| g.state.row_selection.is_selected(key))
            .unwrap_or(false)
    }

    /// Selected rows present in the current data, in data order.
    pub fn selected_rows(&self) -> Vec<T> {
        self.inner
            .read()
            .map(|g| {
                g.rows
                    .iter()
                    .filter(|row| g.state.row_selection.is_selected(&(self.options.key_of)(row)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of selected rows present in the current data.
    pub fn selected_count(&self) -> usize {
        self.selected_rows().len()
    }

    /// State of the "select page" header checkbox.
    pub fn page_check_state(&self) -> CheckState {
        let Ok(guard) = self.inner.read() else {
            return CheckState::Unchecked;
        };
        let keys: Vec<String> = guard
            .page_indices(&self.options.locale)
            .into_iter()
            .map(|i| (self.options.key_of)(&guard.rows[i]))
            .collect();
        guard
            .state
            .row_selection
            .check_state(keys.iter().map(String::as_str))
    }

    /// Handle that clears this table's selection.
    pub fn clear_selection_handle(&self) -> ClearSelection {
        let table = self.clone();
        ClearSelection::new(move || {
            table.clear_selection();
        })
    }

    /// Bulk actions for the current selection; empty when nothing is selected.
    pub fn bulk_actions(&self) -> Vec<BulkAction> {
        let selected = self.selected_rows();
        if selected.is_empty() {
            return Vec::new();
        }

        let clear = self.clear_selection_handle();
        match &self.options.selection_actions {
            Some(actions) => actions(&selected, &clear),
            None => crate::bulk::default_actions(selected.len(), &clear),
        }
    }

    // -------------------------------------------------------------------------
    // Observers
    // -------------------------------------------------------------------------

    /// Register a redraw hook. It runs after every state change, outside any
    /// internal lock.
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&TableState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::SeqCst));
        if let Ok(mut observers) = self.observers.lock() {
            observers.push((id, Arc::new(observer)));
        }
        id
    }

    /// Remove a redraw hook. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers
            .lock()
            .map(|mut observers| {
                let before = observers.len();
                observers.retain(|(sid, _)| *sid != id);
                observers.len() != before
            })
            .unwrap_or(false)
    }

    /// Returns true (and resets the flag) if the table changed since the
    /// last call.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::SeqCst)
    }

    pub(crate) fn mark_changed(&self) {
        self.dirty.store(true, Ordering::SeqCst);

        let observers: Vec<Observer> = self
            .observers
            .lock()
            .map(|g| g.iter().map(|(_, o)| o.clone()).collect())
            .unwrap_or_default();
        if observers.is_empty() {
            return;
        }

        let state = self.state();
        for observer in observers {
            observer(&state);
        }
    }

    /// Tear the table down. A pending preference write is dropped, not
    /// flushed.
    pub fn dispose(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.bridge.dispose();
        }
        if let Ok(mut observers) = self.observers.lock() {
            observers.clear();
        }
        log::debug!("table {} disposed", self.id);
    }

    /// Whether a debounced preference write is waiting to fire.
    pub fn has_pending_preference_write(&self) -> bool {
        self.inner
            .read()
            .map(|g| g.bridge.is_pending())
            .unwrap_or(false)
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`Table`].
pub struct TableBuilder<T> {
    columns: Vec<ColumnDescriptor<T>>,
    rows: Vec<T>,
    key_of: KeyFn<T>,
    initial_preferences: Preferences,
    global_filter: String,
    enable_row_selection: bool,
    on_selected_rows_change: Option<RowsCallback<T>>,
    on_global_filter_change: Option<FilterCallback>,
    on_row_click: Option<RowCallback<T>>,
    selection_actions: Option<SelectionActions<T>>,
    sink: Option<Arc<dyn PreferenceSink>>,
    debounce: Duration,
    empty_state_text: String,
    footer_text: Option<String>,
    locale: String,
    page_size: Option<usize>,
}

impl<T> TableBuilder<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn new(columns: Vec<ColumnDescriptor<T>>, key_of: KeyFn<T>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            key_of,
            initial_preferences: Preferences::default(),
            global_filter: String::new(),
            enable_row_selection: false,
            on_selected_rows_change: None,
            on_global_filter_change: None,
            on_row_click: None,
            selection_actions: None,
            sink: None,
            debounce: DEFAULT_DEBOUNCE,
            empty_state_text: DEFAULT_EMPTY_STATE_TEXT.to_string(),
            footer_text: None,
            locale: FALLBACK_LOCALE.to_string(),
            page_size: None,
        }
    }

    pub fn data(mut self, rows: Vec<T>) -> Self {
        self.rows = rows;
        self
    }

    /// Visibility and sizing read from the user's profile.
    pub fn initial_preferences(mut self, preferences: Preferences) -> Self {
        self.initial_preferences = preferences;
        self
    }

    pub fn global_filter(mut self, query: impl Into<String>) -> Self {
        self.global_filter = query.into();
        self
    }

    pub fn on_global_filter_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_global_filter_change = Some(Arc::new(callback));
        self
    }

    pub fn enable_row_selection(mut self, enabled: bool) -> Self {
        self.enable_row_selection = enabled;
        self
    }

    pub fn on_selected_rows_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&[T]) + Send + Sync + 'static,
    {
        self.on_selected_rows_change = Some(Arc::new(callback));
        self
    }

    /// Bulk actions offered while rows are selected.
    pub fn selection_actions<F>(mut self, actions: F) -> Self
    where
        F: Fn(&[T], &ClearSelection) -> Vec<BulkAction> + Send + Sync + 'static,
    {
        self.selection_actions = Some(Arc::new(actions));
        self
    }

    pub fn on_row_click<F>(mut self, callback: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.on_row_click = Some(Arc::new(callback));
        self
    }

    /// Where visibility/sizing changes are written (debounced).
    pub fn on_preferences_change(mut self, sink: impl PreferenceSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    pub fn preference_debounce(mut self, delay: Duration) -> Self {
        self.debounce = delay;
        self
    }

    pub fn empty_state_text(mut self, text: impl Into<String>) -> Self {
        self.empty_state_text = text.into();
        self
    }

    /// Replaces the default "N Total Items" footer text.
    pub fn footer_text(mut self, text: impl Into<String>) -> Self {
        self.footer_text = Some(text.into());
        self
    }

    /// Locale used to display localized values and to sort them.
    pub fn display_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn build(self) -> Table<T> {
        let id = TableId::new();
        if let Err(e) = validate_columns(&self.columns) {
            log::warn!("table {}: invalid column configuration: {}", id, e);
        }

        let pagination = self
            .page_size
            .map(Pagination::with_page_size)
            .unwrap_or_default();
        let mut state = TableState::from_preferences(&self.initial_preferences, pagination);
        state.global_filter = self.global_filter;

        let bridge = PreferenceBridge::new(&self.initial_preferences, self.sink, self.debounce);

        let mut inner = TableInner {
            columns: self.columns,
            rows: self.rows,
            state,
            bridge,
            resizing: None,
        };
        inner.clamp_page();

        log::debug!(
            "table {} built with {} columns and {} rows",
            id,
            inner.columns.len(),
            inner.rows.len()
        );

        Table {
            id,
            inner: Arc::new(RwLock::new(inner)),
            options: Arc::new(TableOptions {
                key_of: self.key_of,
                enable_row_selection: self.enable_row_selection,
                on_selected_rows_change: self.on_selected_rows_change,
                on_global_filter_change: self.on_global_filter_change,
                on_row_click: self.on_row_click,
                selection_actions: self.selection_actions,
                empty_state_text: self.empty_state_text,
                footer_text: self.footer_text,
                locale: self.locale,
            }),
            observers: Arc::new(Mutex::new(Vec::new())),
            next_subscription: Arc::new(AtomicUsize::new(0)),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }
}
