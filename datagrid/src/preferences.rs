//! Persisted column preferences and the debounced write-through bridge.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::PreferenceError;

/// Delay between the last preference change and the write.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// The user-customizable part of the table state.
///
/// Maps are ordered so the serialized form is canonical and can be compared
/// byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// `false` hides a column; absent means visible.
    #[serde(default)]
    pub column_visibility: BTreeMap<String, bool>,
    /// Column widths in pixels.
    #[serde(default)]
    pub column_sizing: BTreeMap<String, u32>,
}

impl Preferences {
    /// Canonical JSON used for change detection and storage.
    pub fn to_canonical_json(&self) -> Result<String, PreferenceError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// External store for preferences, usually a user profile.
#[async_trait]
pub trait PreferenceSink: Send + Sync {
    /// Persist a snapshot. Errors are logged by the bridge and otherwise
    /// ignored.
    async fn save(&self, preferences: Preferences) -> Result<(), PreferenceError>;
}

/// Adapter turning a plain closure into a [`PreferenceSink`].
pub struct FnSink<F>(F);

/// Wrap a synchronous callback as a preference sink.
///
/// # Example
///
/// ```
/// use datagrid::preferences::{sink_fn, Preferences};
///
/// let sink = sink_fn(|prefs: Preferences| {
///     println!("hidden: {:?}", prefs.column_visibility);
/// });
/// # let _ = sink;
/// ```
pub fn sink_fn<F>(callback: F) -> FnSink<F>
where
    F: Fn(Preferences) + Send + Sync,
{
    FnSink(callback)
}

#[async_trait]
impl<F> PreferenceSink for FnSink<F>
where
    F: Fn(Preferences) + Send + Sync,
{
    async fn save(&self, preferences: Preferences) -> Result<(), PreferenceError> {
        (self.0)(preferences);
        Ok(())
    }
}

#[derive(Debug)]
struct BridgeShared {
    /// Serialized form of the last snapshot handed to the sink (or the
    /// initial snapshot).
    last_written: String,
}

/// Debounced, change-detecting writer of [`Preferences`].
///
/// The seeded snapshot never triggers a write. Each later change cancels the
/// pending timer and arms a new one; when the timer fires the snapshot
/// becomes the new "last written" value and is handed to the sink. A save
/// that has started always runs to completion. A change back to
/// the last written value cancels the pending write.
///
/// Dropping or disposing the bridge cancels a pending write without
/// flushing it, so a change made less than the debounce delay before
/// disposal is lost.
pub struct PreferenceBridge {
    sink: Option<Arc<dyn PreferenceSink>>,
    delay: Duration,
    runtime: Option<Handle>,
    shared: Arc<Mutex<BridgeShared>>,
    pending: Option<JoinHandle<()>>,
}

impl PreferenceBridge {
    /// Create a bridge seeded with `initial`.
    ///
    /// Timers run on the tokio runtime current at construction. Without a
    /// runtime, or without a sink, changes are tracked but never written.
    pub fn new(initial: &Preferences, sink: Option<Arc<dyn PreferenceSink>>, delay: Duration) -> Self {
        let last_written = initial.to_canonical_json().unwrap_or_default();
        let runtime = Handle::try_current().ok();
        if sink.is_some() && runtime.is_none() {
            log::warn!("no tokio runtime available; column preferences will not be persisted");
        }

        Self {
            sink,
            delay,
            runtime,
            shared: Arc::new(Mutex::new(BridgeShared { last_written })),
            pending: None,
        }
    }

    /// Debounce delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Serialized form of the last written (or seeded) snapshot.
    pub fn last_written(&self) -> String {
        self.shared
            .lock()
            .map(|g| g.last_written.clone())
            .unwrap_or_default()
    }

    /// Whether a write is armed and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Report a preference change made after construction.
    pub fn observe(&mut self, preferences: &Preferences) {
        self.cancel_pending();

        let serialized = match preferences.to_canonical_json() {
            Ok(s) => s,
            Err(e) => {
                log::warn!("skipping preference write: {}", e);
                return;
            }
        };

        if serialized == self.last_written() {
            log::debug!("preferences back to last written value; nothing to write");
            return;
        }

        let (Some(sink), Some(runtime)) = (self.sink.clone(), self.runtime.as_ref()) else {
            return;
        };

        let delay = self.delay;
        let shared = self.shared.clone();
        let snapshot = preferences.clone();
        let writer = runtime.clone();

        log::debug!("preference write armed ({:?})", delay);
        // Only the sleep is abortable; a started save always completes.
        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            if let Ok(mut guard) = shared.lock() {
                guard.last_written = serialized;
            }
            writer.spawn(async move {
                if let Err(e) = sink.save(snapshot).await {
                    log::warn!("failed to persist column preferences: {}", e);
                }
            });
        }));
    }

    /// Cancel a pending write without flushing it.
    pub fn dispose(&mut self) {
        if self.is_pending() {
            log::debug!("dropping pending preference write on dispose");
        }
        self.cancel_pending();
    }

    fn cancel_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

impl Drop for PreferenceBridge {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

impl fmt::Debug for PreferenceBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceBridge")
            .field("delay", &self.delay)
            .field("has_sink", &self.sink.is_some())
            .field("has_runtime", &self.runtime.is_some())
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_json_is_sorted_and_camel_case() {
        let mut prefs = Preferences::default();
        prefs.column_visibility.insert("tags".into(), false);
        prefs.column_visibility.insert("brand".into(), true);
        prefs.column_sizing.insert("name".into(), 240);

        assert_eq!(
            prefs.to_canonical_json().unwrap(),
            r#"{"columnVisibility":{"brand":true,"tags":false},"columnSizing":{"name":240}}"#
        );
    }

    #[test]
    fn test_missing_fields_deserialize_empty() {
        let prefs: Preferences = serde_json::from_str(r#"{"columnSizing":{"kcal":90}}"#).unwrap();
        assert!(prefs.column_visibility.is_empty());
        assert_eq!(prefs.column_sizing.get("kcal"), Some(&90));
    }

    #[test]
    fn test_without_runtime_nothing_is_armed() {
        let mut bridge = PreferenceBridge::new(
            &Preferences::default(),
            Some(Arc::new(sink_fn(|_| {}))),
            DEFAULT_DEBOUNCE,
        );
        let mut prefs = Preferences::default();
        prefs.column_visibility.insert("kcal".into(), false);
        bridge.observe(&prefs);
        assert!(!bridge.is_pending());
    }
}
