// ── Toast notifications ──
//
// A shared, ordered list of short-lived messages. Timed toasts remove
// themselves after their duration via a spawned sleep; sticky toasts
// (duration zero) stay until removed.

use std::sync::{Arc, Weak};
use std::time::Duration;

use serde::Serialize;
use strum::Display;
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_DURATION: Duration = Duration::from_secs(5);
pub const ERROR_DURATION: Duration = Duration::from_secs(7);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn default_duration(self) -> Duration {
        match self {
            Self::Error => ERROR_DURATION,
            _ => DEFAULT_DURATION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: Uuid,
    pub kind: ToastKind,
    pub title: String,
    pub message: Option<String>,
    /// Zero means the toast stays until removed.
    pub duration: Duration,
}

impl Toast {
    pub fn is_sticky(&self) -> bool {
        self.duration.is_zero()
    }
}

/// Shared toast list. Cloning yields another handle to the same list.
#[derive(Clone)]
pub struct Notifications {
    toasts: Arc<watch::Sender<Vec<Toast>>>,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifications {
    pub fn new() -> Self {
        let (toasts, _) = watch::channel(Vec::new());
        Self {
            toasts: Arc::new(toasts),
        }
    }

    /// Add a toast and return its id. `duration` falls back to the kind's
    /// default.
    pub fn push(
        &self,
        kind: ToastKind,
        title: impl Into<String>,
        message: Option<String>,
        duration: Option<Duration>,
    ) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            message,
            duration: duration.unwrap_or_else(|| kind.default_duration()),
        };
        let id = toast.id;
        let ttl = toast.duration;
        debug!(%id, %kind, title = %toast.title, "toast added");
        self.toasts.send_modify(|list| list.push(toast));

        if !ttl.is_zero() {
            self.schedule_removal(id, ttl);
        }
        id
    }

    pub fn success(&self, title: impl Into<String>, message: Option<String>) -> Uuid {
        self.push(ToastKind::Success, title, message, None)
    }

    pub fn error(&self, title: impl Into<String>, message: Option<String>) -> Uuid {
        self.push(ToastKind::Error, title, message, None)
    }

    pub fn warning(&self, title: impl Into<String>, message: Option<String>) -> Uuid {
        self.push(ToastKind::Warning, title, message, None)
    }

    pub fn info(&self, title: impl Into<String>, message: Option<String>) -> Uuid {
        self.push(ToastKind::Info, title, message, None)
    }

    /// Remove a toast. Returns `false` if it was already gone.
    pub fn remove(&self, id: Uuid) -> bool {
        self.toasts.send_if_modified(|list| {
            let before = list.len();
            list.retain(|t| t.id != id);
            list.len() != before
        })
    }

    pub fn clear_all(&self) {
        self.toasts.send_if_modified(|list| {
            let had = !list.is_empty();
            list.clear();
            had
        });
    }

    pub fn snapshot(&self) -> Vec<Toast> {
        self.toasts.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.toasts.subscribe()
    }

    /// Outside a runtime nothing is scheduled and the toast stays until
    /// removed by hand.
    fn schedule_removal(&self, id: Uuid, after: Duration) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let weak: Weak<watch::Sender<Vec<Toast>>> = Arc::downgrade(&self.toasts);
        handle.spawn(async move {
            tokio::time::sleep(after).await;
            if let Some(toasts) = weak.upgrade() {
                Notifications { toasts }.remove(id);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_toasts_last_longer() {
        let notes = Notifications::new();
        notes.error("Delete failed", Some("Device not found".into()));
        notes.info("Saved", None);

        let list = notes.snapshot();
        assert_eq!(list[0].duration, ERROR_DURATION);
        assert_eq!(list[1].duration, DEFAULT_DURATION);
    }

    #[test]
    fn remove_and_clear() {
        let notes = Notifications::new();
        let a = notes.success("a", None);
        notes.warning("b", None);

        assert!(notes.remove(a));
        assert!(!notes.remove(a));
        assert_eq!(notes.snapshot().len(), 1);

        notes.clear_all();
        assert!(notes.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn timed_toasts_expire() {
        let notes = Notifications::new();
        notes.success("Saved", None);
        notes.error("Failed", None);

        tokio::time::sleep(Duration::from_secs(6)).await;
        let left = notes.snapshot();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].kind, ToastKind::Error);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(notes.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn sticky_toasts_stay() {
        let notes = Notifications::new();
        let id = notes.push(ToastKind::Info, "Pinned", None, Some(Duration::ZERO));

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(notes.snapshot().len(), 1);
        assert!(notes.snapshot()[0].is_sticky());
        assert!(notes.remove(id));
    }
}
