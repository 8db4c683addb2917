//! User-visible error notifications.
//!
//! The interceptors never talk to a UI directly. They are handed a
//! `Notifier` at construction and call `error` once per notified failure;
//! suppressed failures (409) never reach it.

use std::sync::{Mutex, PoisonError};

pub trait Notifier: Send + Sync {
    /// Show `text` to the user as an error.
    fn error(&self, text: &str);
}

/// Emits notifications through `log` under the `notify` target. Used when
/// the caller has no UI of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, text: &str) {
        log::warn!(target: "notify", "{text}");
    }
}

/// Keeps every notification in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    texts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn count(&self) -> usize {
        self.texts.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn clear(&self) {
        self.texts.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, text: &str) {
        self.texts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
    }
}
