//! File watcher for hot reloading preset files
//!
//! Watches a preset file for changes and notifies when it should be
//! reloaded. Each debounced change event maps to one commit: reload,
//! validate, regenerate once. Debouncing matters because editors commonly
//! produce several filesystem events per save.

use anyhow::{Result, anyhow};
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{DebouncedEvent, new_debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, channel};
use std::time::Duration;

/// Event emitted when the watched preset changes
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// The preset file was modified
    Modified(PathBuf),
    /// An error occurred while watching
    Error(String),
}

/// Watches one preset file for changes
pub struct PresetWatcher {
    /// The debouncer that handles file watching
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
    /// Receiver for watch events
    receiver: Receiver<WatchEvent>,
    /// Path being watched
    path: PathBuf,
}

impl PresetWatcher {
    /// Start watching `path`
    ///
    /// # Arguments
    ///
    /// * `debounce_ms` - Debounce duration in milliseconds (default: 100)
    pub fn new(path: &Path, debounce_ms: Option<u64>) -> Result<Self> {
        let (tx, rx) = channel();
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let watched = canonical.clone();

        let debounce_duration = Duration::from_millis(debounce_ms.unwrap_or(100));

        let mut debouncer = new_debouncer(
            debounce_duration,
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    for event in events {
                        // All debounced events on the watched path are
                        // treated as modifications
                        if event.path == watched {
                            let _ = tx.send(WatchEvent::Modified(event.path));
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchEvent::Error(format!("Watch error: {e:?}")));
                }
            },
        )
        .map_err(|e| anyhow!("Failed to create file watcher: {e:?}"))?;

        debouncer
            .watcher()
            .watch(&canonical, RecursiveMode::NonRecursive)
            .map_err(|e| anyhow!("Failed to watch preset {}: {e}", canonical.display()))?;

        tracing::info!("Watching preset: {}", canonical.display());

        Ok(Self {
            _debouncer: debouncer,
            receiver: rx,
            path: canonical,
        })
    }

    /// Poll for the next watch event (non-blocking)
    pub fn try_recv(&self) -> Option<WatchEvent> {
        self.receiver.try_recv().ok()
    }

    /// Drain all pending events
    ///
    /// Multiple saves between polls collapse into at most one reload for
    /// the caller, since every event points at the same file.
    pub fn drain_events(&self) -> Vec<WatchEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// The watched preset path
    pub fn path(&self) -> &Path {
        &self.path
    }
}
