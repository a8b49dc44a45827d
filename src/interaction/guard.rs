use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{trace, warn};

use crate::internal::prelude::*;

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

tokio::task_local! {
    static CURRENT_TASK: TaskKey;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TaskKey {
    guard: u64,
    task: u64,
}

#[derive(Clone)]
struct PendingTask {
    key: u64,
    task: Shared<BoxFuture<'static, ()>>,
}

/// A single-slot holder for the background response task of one interaction.
///
/// [`Self::ensure`] spawns a task into the slot. A task submitted while another one is pending
/// first waits for its predecessor, so bodies submitted to the same guard run one after the other
/// in submission order. [`Self::wait_for_completion`] lets anything else wait for the pending
/// chain before touching the interaction.
pub struct AsyncTaskGuard {
    id: u64,
    slot: Arc<Mutex<Option<PendingTask>>>,
}

impl AsyncTaskGuard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_KEY.fetch_add(1, Ordering::Relaxed),
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Whether a submitted task has not been observed finishing yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Runs `body` as a new tokio task bound to this guard, returning once the task started.
    ///
    /// The task waits for the previously submitted one before polling `body`. An error returned
    /// by `body` is logged and otherwise dropped; wrap the body in something that reports its
    /// failures if they matter. The slot is cleared once the task finishes, whatever its outcome.
    pub async fn ensure<F>(&self, body: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let key = NEXT_KEY.fetch_add(1, Ordering::Relaxed);
        let (started_tx, started_rx) = oneshot::channel();

        {
            let mut slot = self.slot.lock();
            let previous = slot.take().map(|pending| pending.task);
            let task_slot = Arc::clone(&self.slot);

            let task = async move {
                started_tx.send(()).ok();

                if let Some(previous) = previous {
                    previous.await;
                }

                if let Err(why) = body.await {
                    warn!("Background interaction task {key} failed: {why:?}");
                }

                let mut slot = task_slot.lock();
                if slot.as_ref().is_some_and(|pending| pending.key == key) {
                    *slot = None;
                }
            };

            let handle = tokio::spawn(CURRENT_TASK.scope(
                TaskKey {
                    guard: self.id,
                    task: key,
                },
                task,
            ));

            *slot = Some(PendingTask {
                key,
                task: async move {
                    handle.await.ok();
                }
                .boxed()
                .shared(),
            });
        }

        trace!("Guard {} spawned task {key}", self.id);
        started_rx.await.ok();
    }

    /// Waits until the pending task, and every task submitted before it, finished.
    ///
    /// Returns immediately if nothing is pending. Called from inside a task of this guard, only
    /// tasks submitted before the calling one are waited for: a task never waits on itself or on
    /// a task queued behind it.
    pub async fn wait_for_completion(&self) {
        let pending = {
            let slot = self.slot.lock();
            let Some(pending) = slot.as_ref() else {
                return;
            };

            if let Ok(current) = CURRENT_TASK.try_with(|key| *key) {
                if current.guard == self.id && pending.key >= current.task {
                    return;
                }
            }

            pending.clone()
        };

        pending.task.await;

        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|p| p.key == pending.key) {
            *slot = None;
        }
    }
}

impl Default for AsyncTaskGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AsyncTaskGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncTaskGuard")
            .field("id", &self.id)
            .field("pending", &self.is_pending())
            .finish()
    }
}
