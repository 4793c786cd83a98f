// ── Loading / error bookkeeping ──
//
// Each container keeps its whole state in one `watch` channel. `track`
// wraps a backend call: flag loading and clear the error, await, then
// apply the result and drop the flag in a single update.

use std::future::Future;

use tokio::sync::watch;
use tracing::debug;

use crate::error::CoreError;

/// Request status shared by every container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub loading: bool,
    /// Message of the most recent failure, cleared when a call starts.
    pub last_error: Option<String>,
}

pub(crate) trait HasStatus {
    fn status_mut(&mut self) -> &mut Status;
}

macro_rules! impl_has_status {
    ($($state:ty),+ $(,)?) => {
        $(impl $crate::store::tracked::HasStatus for $state {
            fn status_mut(&mut self) -> &mut $crate::store::tracked::Status {
                &mut self.status
            }
        })+
    };
}
pub(crate) use impl_has_status;

pub(crate) struct StateCell<S> {
    tx: watch::Sender<S>,
}

impl<S: Clone + Default + HasStatus> StateCell<S> {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(S::default());
        Self { tx }
    }

    pub(crate) fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    pub(crate) fn update(&self, f: impl FnOnce(&mut S)) {
        self.tx.send_modify(f);
    }

    pub(crate) fn clear_error(&self) {
        self.tx
            .send_if_modified(|s| s.status_mut().last_error.take().is_some());
    }

    /// Run `call` with the loading flag raised.
    pub(crate) async fn track<R, E>(
        &self,
        op: &'static str,
        call: impl Future<Output = Result<R, E>>,
        apply: impl FnOnce(&mut S, &R),
    ) -> Result<R, CoreError>
    where
        CoreError: From<E>,
    {
        self.run(op, true, call, apply).await
    }

    /// Like [`track`](Self::track) but leaves the loading flag alone, for
    /// secondary calls that should not blank the primary view.
    pub(crate) async fn track_quiet<R, E>(
        &self,
        op: &'static str,
        call: impl Future<Output = Result<R, E>>,
        apply: impl FnOnce(&mut S, &R),
    ) -> Result<R, CoreError>
    where
        CoreError: From<E>,
    {
        self.run(op, false, call, apply).await
    }

    async fn run<R, E>(
        &self,
        op: &'static str,
        loading: bool,
        call: impl Future<Output = Result<R, E>>,
        apply: impl FnOnce(&mut S, &R),
    ) -> Result<R, CoreError>
    where
        CoreError: From<E>,
    {
        self.tx.send_modify(|s| {
            let status = s.status_mut();
            if loading {
                status.loading = true;
            }
            status.last_error = None;
        });

        let result = call.await.map_err(CoreError::from);

        self.tx.send_modify(|s| {
            match &result {
                Ok(value) => apply(s, value),
                Err(e) => {
                    debug!(op, error = %e, "store operation failed");
                    s.status_mut().last_error = Some(e.to_string());
                }
            }
            if loading {
                s.status_mut().loading = false;
            }
        });
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct Counter {
        value: u32,
        status: Status,
    }

    impl_has_status!(Counter);

    #[tokio::test]
    async fn success_applies_and_resets_loading() {
        let cell: StateCell<Counter> = StateCell::new();
        let out = cell
            .track("add", async { Ok::<_, CoreError>(5) }, |s, v| s.value += v)
            .await
            .unwrap();

        assert_eq!(out, 5);
        let snap = cell.snapshot();
        assert_eq!(snap.value, 5);
        assert!(!snap.status.loading);
        assert!(snap.status.last_error.is_none());
    }

    #[tokio::test]
    async fn failure_records_error_and_leaves_data() {
        let cell: StateCell<Counter> = StateCell::new();
        let err = cell
            .track(
                "add",
                async {
                    Err::<u32, _>(CoreError::Validation {
                        message: "nope".into(),
                    })
                },
                |s, v| s.value += v,
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "nope");
        let snap = cell.snapshot();
        assert_eq!(snap.value, 0);
        assert!(!snap.status.loading);
        assert_eq!(snap.status.last_error.as_deref(), Some("nope"));

        cell.clear_error();
        assert!(cell.snapshot().status.last_error.is_none());
    }

    #[tokio::test]
    async fn loading_is_visible_while_in_flight() {
        let cell: StateCell<Counter> = StateCell::new();
        let rx = cell.subscribe();
        let (release, wait) = tokio::sync::oneshot::channel::<()>();

        let call = cell.track(
            "slow",
            async move {
                wait.await.ok();
                Ok::<_, CoreError>(1)
            },
            |s, v| s.value += v,
        );
        let probe = async {
            tokio::task::yield_now().await;
            let loading = rx.borrow().status.loading;
            release.send(()).ok();
            loading
        };

        let (result, was_loading) = tokio::join!(call, probe);
        assert!(result.is_ok());
        assert!(was_loading);
        assert!(!cell.snapshot().status.loading);
    }
}
