//! User-visible success/failure reports.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

/// Fire-and-forget. Implementations must not block or fail the caller.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str, kind: NotificationKind);
}

/// Reports notifications as log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Success => tracing::info!(notification = message, "success"),
            NotificationKind::Error => tracing::warn!(notification = message, "error"),
        }
    }
}

/// Records every notification, in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    inner: Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain what has been recorded so far.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, message: &str, kind: NotificationKind) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notification {
                message: message.to_string(),
                kind,
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_records_in_order_and_drains() {
        let sink = MemorySink::new();
        sink.notify("Group created successfully", NotificationKind::Success);
        sink.notify("Failed to delete group", NotificationKind::Error);

        let taken = sink.take();
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[1].kind, NotificationKind::Error);
        assert!(sink.notifications().is_empty());
    }
}
