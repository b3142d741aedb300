//! Bulk actions shown while rows are selected.

use std::fmt;
use std::sync::Arc;

/// Builds the bulk actions for the current selection.
///
/// Called with the selected rows (those still present in the data) and a
/// handle that clears the selection, typically after the action completes.
pub type SelectionActions<T> = Arc<dyn Fn(&[T], &ClearSelection) -> Vec<BulkAction> + Send + Sync>;

/// Handle that empties a table's selection.
#[derive(Clone)]
pub struct ClearSelection {
    clear: Arc<dyn Fn() + Send + Sync>,
}

impl ClearSelection {
    pub(crate) fn new(clear: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            clear: Arc::new(clear),
        }
    }

    pub fn clear(&self) {
        (self.clear)();
    }
}

impl fmt::Debug for ClearSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClearSelection")
    }
}

/// Visual weight of a bulk action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionVariant {
    #[default]
    Default,
    Destructive,
}

/// One button of the bulk action bar.
#[derive(Clone)]
pub struct BulkAction {
    pub id: String,
    pub label: String,
    pub variant: ActionVariant,
    run: Arc<dyn Fn() + Send + Sync>,
}

impl BulkAction {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        run: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            variant: ActionVariant::Default,
            run: Arc::new(run),
        }
    }

    pub fn destructive(mut self) -> Self {
        self.variant = ActionVariant::Destructive;
        self
    }

    /// Run the action.
    pub fn invoke(&self) {
        (self.run)();
    }
}

impl fmt::Debug for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkAction")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}

/// The floating bar shown while at least one row is selected.
#[derive(Debug, Clone)]
pub struct BulkActionBar {
    /// Selected rows present in the current data.
    pub count: usize,
    pub actions: Vec<BulkAction>,
}

/// Placeholder export/delete pair used when the caller supplies no actions.
///
/// Neither touches any data: export only logs, delete logs and resets the
/// selection.
pub fn default_actions(count: usize, clear: &ClearSelection) -> Vec<BulkAction> {
    let clear = clear.clone();
    vec![
        BulkAction::new("export", "Export", move || {
            log::info!("bulk export requested for {} rows (no handler configured)", count);
        }),
        BulkAction::new("delete", "Delete", move || {
            log::info!("bulk delete requested for {} rows (no handler configured)", count);
            clear.clear();
        })
        .destructive(),
    ]
}
