use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

/// Single-assignment latch for side effects that must run at most once,
/// however many times the surrounding code is re-entered.
#[derive(Debug, Default)]
pub struct OnceLatch {
    fired: AtomicBool,
}

impl OnceLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` for the first caller only.
    pub fn try_acquire(&self) -> bool {
        self.fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Run `op` if the latch has not fired yet. Later calls get `None` and `op`
    /// is never polled.
    pub async fn run_once<F, Fut, T>(&self, op: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        if self.try_acquire() {
            Some(op().await)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_first_acquire_wins() {
        let latch = OnceLatch::new();
        assert!(!latch.is_fired());
        assert!(latch.try_acquire());
        assert!(latch.is_fired());
        assert!(!latch.try_acquire());
        assert!(!latch.try_acquire());
    }

    #[tokio::test]
    async fn test_run_once_skips_reentrant_calls() {
        let latch = OnceLatch::new();
        let calls = Cell::new(0);

        let first = latch
            .run_once(|| async {
                calls.set(calls.get() + 1);
                "exchanged"
            })
            .await;
        let second = latch
            .run_once(|| async {
                calls.set(calls.get() + 1);
                "exchanged"
            })
            .await;

        assert_eq!(first, Some("exchanged"));
        assert_eq!(second, None);
        assert_eq!(calls.get(), 1);
    }
}
