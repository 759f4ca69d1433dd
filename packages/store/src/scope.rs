use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Liveness flag for a mounted view.
///
/// The store's flows are plain futures and do not know which executor polls
/// them. A caller that may outlive the view it reports to (a task spawned
/// outside the view's ownership, a test harness, a native shell) wraps the
/// flow in [`ViewScope::run`] and cancels the scope on teardown; results that
/// arrive afterwards are dropped instead of being applied to state that no
/// longer exists. Every clone shares the same flag.
///
/// A task spawned by a Dioxus component is already aborted when that
/// component unmounts, so there the scope only matters for the window between
/// the future resolving and the task being dropped.
#[derive(Clone, Debug)]
pub struct ViewScope {
    active: Arc<AtomicBool>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn cancel(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Await `fut`, returning its output only if the scope is still active.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        let output = fut.await;
        if self.is_active() {
            Some(output)
        } else {
            tracing::debug!("view gone, dropping result");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_active_scope_delivers() {
        let scope = ViewScope::new();
        assert_eq!(scope.run(async { 7 }).await, Some(7));
    }

    #[tokio::test]
    async fn test_cancelled_scope_drops_late_result() {
        let scope = ViewScope::new();
        let handle = scope.clone();
        let out = scope
            .run(async move {
                handle.cancel();
                7
            })
            .await;
        assert_eq!(out, None);
        assert!(!scope.is_active());
    }

    #[tokio::test]
    async fn test_cancel_from_any_clone_stops_pending_run() {
        let scope = ViewScope::new();
        let teardown = scope.clone();
        let (tx, rx) = tokio::sync::oneshot::channel::<u32>();
        let pending = scope.run(async move { rx.await.unwrap_or(0) });
        teardown.cancel();
        let _ = tx.send(7);
        assert_eq!(pending.await, None);
        assert!(!scope.is_active());
    }
}
