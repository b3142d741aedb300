//! Interactive column resizing.
//!
//! A drag is a stream of pointer deltas relative to the width at drag start.
//! Each delta updates the column width immediately (clamped), so the layout
//! follows the pointer; persistence goes through the usual debounce.

use crate::table::Table;

/// An in-progress resize drag on one column.
///
/// Created by [`Table::begin_resize`]. Dropping the handle ends the drag.
pub struct ResizeHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    table: Table<T>,
    column_id: String,
    start_width: u32,
}

impl<T> ResizeHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn column_id(&self) -> &str {
        &self.column_id
    }

    pub fn start_width(&self) -> u32 {
        self.start_width
    }

    /// Apply a pointer offset from the drag origin. Returns the new width.
    pub fn drag(&self, delta: i32) -> u32 {
        let requested = (i64::from(self.start_width) + i64::from(delta)).clamp(0, i64::from(u32::MAX));
        self.table
            .set_column_sizing(&self.column_id, requested as u32);
        self.table
            .column_width(&self.column_id)
            .unwrap_or(self.start_width)
    }

    /// Apply a recorded sequence of offsets. Returns the final width.
    pub fn apply(&self, deltas: impl IntoIterator<Item = i32>) -> u32 {
        deltas
            .into_iter()
            .fold(self.start_width, |_, delta| self.drag(delta))
    }

    /// End the drag. Returns the final width.
    pub fn finish(self) -> u32 {
        self.table
            .column_width(&self.column_id)
            .unwrap_or(self.start_width)
    }
}

impl<T> Drop for ResizeHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        if let Ok(mut guard) = self.table.inner.write()
            && guard.resizing.as_deref() == Some(self.column_id.as_str())
        {
            guard.resizing = None;
        }
        self.table.mark_changed();
    }
}

impl<T> Table<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Start resizing a column. Returns `None` if the column does not exist or
    /// is not resizable.
    pub fn begin_resize(&self, column_id: &str) -> Option<ResizeHandle<T>> {
        let start_width = {
            let mut guard = self.inner.write().ok()?;
            let width = guard
                .column(column_id)
                .filter(|c| c.resizable)
                .map(|c| guard.column_width(c))?;
            guard.resizing = Some(column_id.to_string());
            width
        };
        self.mark_changed();

        Some(ResizeHandle {
            table: self.clone(),
            column_id: column_id.to_string(),
            start_width,
        })
    }
}
