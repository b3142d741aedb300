//! Error types

/// A column configuration the table cannot honour cleanly.
///
/// Returned by [`validate_columns`](crate::column::validate_columns) at
/// configuration time. The table itself never fails on a bad configuration;
/// it logs a warning and renders whatever it can.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnConfigError {
    /// No columns at all.
    #[error("table has no columns")]
    Empty,

    /// Two descriptors share the same id.
    #[error("duplicate column id '{0}'")]
    DuplicateId(String),

    /// Every column can be hidden, so the user could end up with an empty table.
    #[error("every column is hideable; at least one column must set hideable = false")]
    NoPinnedColumn,
}

/// Failure while persisting column preferences.
///
/// These never cross the table boundary: the preference bridge logs and
/// drops them.
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The external store rejected the write.
    #[error("preference store failed: {0}")]
    Sink(String),
}

impl PreferenceError {
    /// Creates a sink error from any displayable failure.
    pub fn sink(message: impl std::fmt::Display) -> Self {
        Self::Sink(message.to_string())
    }
}
