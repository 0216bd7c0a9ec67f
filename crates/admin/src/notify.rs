//! Transient toast notifications.
//!
//! Every client context owns a [`ToastQueue`]. Components push toasts as
//! operations resolve and the next page render drains them.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

/// Pending toasts kept per session before the oldest are dropped.
const MAX_PENDING: usize = 16;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

impl ToastVariant {
    /// CSS modifier used by the toast template.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Destructive => "destructive",
        }
    }
}

/// A message shown once and then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub title: String,
    pub description: Option<String>,
    pub variant: ToastVariant,
}

impl Toast {
    /// A default-variant toast with only a title.
    #[must_use]
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            variant: ToastVariant::Default,
        }
    }

    /// A destructive toast with only a title.
    #[must_use]
    pub fn error(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            variant: ToastVariant::Destructive,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn is_destructive(&self) -> bool {
        self.variant == ToastVariant::Destructive
    }
}

/// Sink for toasts.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Bounded FIFO of toasts waiting to be rendered.
#[derive(Debug, Default)]
pub struct ToastQueue {
    pending: Mutex<VecDeque<Toast>>,
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every pending toast, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }

    /// Pending toasts without removing them.
    #[must_use]
    pub fn peek(&self) -> Vec<Toast> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, toast: Toast) {
        if toast.is_destructive() {
            tracing::warn!(title = %toast.title, description = ?toast.description, "Error toast");
        } else {
            tracing::debug!(title = %toast.title, "Toast");
        }

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if pending.len() == MAX_PENDING {
            pending.pop_front();
        }
        pending.push_back(toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_is_fifo_and_empties() {
        let queue = ToastQueue::new();
        queue.notify(Toast::success("one"));
        queue.notify(Toast::error("two").with_description("boom"));

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].title, "one");
        assert!(drained[1].is_destructive());
        assert_eq!(drained[1].description.as_deref(), Some("boom"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queue_is_bounded() {
        let queue = ToastQueue::new();
        for i in 0..(MAX_PENDING + 3) {
            queue.notify(Toast::success(format!("toast {i}")));
        }
        let drained = queue.drain();
        assert_eq!(drained.len(), MAX_PENDING);
        assert_eq!(drained[0].title, "toast 3");
    }

    #[test]
    fn test_variant_serializes_lowercase() {
        let json = serde_json::to_value(Toast::error("x")).unwrap_or_default();
        assert_eq!(json["variant"], "destructive");
    }
}
