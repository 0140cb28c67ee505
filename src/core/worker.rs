//! Per-group worker lifecycle and the spawning seam.

use std::future::Future;
use std::sync::Arc;

use super::matchmaker::{Dispatch, Shared};

/// Abstraction for spawning worker futures on a runtime.
///
/// Called from the matcher thread, which has no ambient async runtime.
pub trait Spawn {
    /// Spawn a detached future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Frees the slot if the worker is dropped before it completes.
struct SlotGuard {
    shared: Arc<Shared>,
    dispatch: Dispatch,
    armed: bool,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        if self.armed {
            self.shared.abandon(&self.dispatch);
        }
    }
}

/// Run one group: activate its slot, clear the dungeon with the lock
/// released, then release the slot and record the completion.
///
/// The guard is armed before the future is returned, so a future dropped
/// without ever being polled still abandons its slot.
pub(crate) fn run_worker(
    shared: Arc<Shared>,
    dispatch: Dispatch,
) -> impl Future<Output = ()> + Send + 'static {
    let mut guard = SlotGuard {
        shared,
        dispatch,
        armed: true,
    };

    async move {
        guard.shared.activate(&dispatch);
        let clear_time = guard.shared.limits().clear_time(dispatch.duration);
        tracing::debug!(
            "party {} clearing for {:?}",
            dispatch.group.id,
            clear_time
        );
        tokio::time::sleep(clear_time).await;

        guard.armed = false;
        guard.shared.complete(&dispatch);
    }
}
