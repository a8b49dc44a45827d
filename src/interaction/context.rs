use std::future::Future;
use std::sync::Arc;

use tracing::trace;

use super::InteractionHandle;
use crate::internal::prelude::*;
use crate::model::application::ResponseFlags;

/// Scoped permission to answer an interaction.
///
/// A context brackets one attempt at answering: either a deferral (`deferring = true`), an empty
/// acknowledgement promising a real response later, or a real response. Entering it marks the
/// attempt as in flight on the handle's [`ResponseFlags`], leaving it records the outcome:
///
/// | attempt   | enter                 | exit, success                              | exit, failure |
/// |-----------|-----------------------|--------------------------------------------|---------------|
/// | deferral  | `+DEFERRING`          | `-DEFERRING +DEFERRED`                      | `-DEFERRING`  |
/// | response  | `+RESPONDING`         | `-RESPONDING +RESPONDED`, `-DEFERRED`       | `-RESPONDING` |
///
/// A deferral is not marked if the interaction already is acknowledging or acknowledged, a
/// response is not marked if one already is in flight or done. A context that did not mark its
/// attempt on entry leaves the flags alone on exit. A successful exit of an `ephemeral` context
/// also sets [`ResponseFlags::EPHEMERAL`], unless the interaction was fully acknowledged already.
///
/// Entering waits for the handle's [`AsyncTaskGuard`] first, so attempts on the same interaction
/// never interleave.
///
/// [`AsyncTaskGuard`]: super::AsyncTaskGuard
#[derive(Debug)]
#[must_use]
pub struct InteractionResponseContext {
    handle: Arc<InteractionHandle>,
    deferring: bool,
    ephemeral: bool,
    acquired: bool,
}

impl InteractionResponseContext {
    pub fn new(handle: Arc<InteractionHandle>, deferring: bool, ephemeral: bool) -> Self {
        Self {
            handle,
            deferring,
            ephemeral,
            acquired: false,
        }
    }

    #[must_use]
    pub fn handle(&self) -> &Arc<InteractionHandle> {
        &self.handle
    }

    #[must_use]
    pub fn is_deferring(&self) -> bool {
        self.deferring
    }

    #[must_use]
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    /// Whether entering marked this context's attempt on the handle.
    #[must_use]
    pub fn acquired(&self) -> bool {
        self.acquired
    }

    fn in_flight_bit(&self) -> ResponseFlags {
        if self.deferring {
            ResponseFlags::DEFERRING
        } else {
            ResponseFlags::RESPONDING
        }
    }

    /// Waits for pending attempts on the interaction, then marks this one as in flight.
    pub async fn enter(&mut self) {
        self.handle.guard().wait_for_completion().await;

        let bit = self.in_flight_bit();
        let blocking = if self.deferring {
            ResponseFlags::ACKNOWLEDGING_OR_ACKNOWLEDGED
        } else {
            // An in-flight deferral blocks too, the two attempts are mutually exclusive.
            ResponseFlags::RESPONDING_OR_RESPONDED | ResponseFlags::DEFERRING
        };

        let result = self.handle.update_flags(|flags| {
            (!flags.intersects(blocking)).then_some(flags | bit)
        });

        self.acquired = result.is_ok();
        trace!(
            "Interaction {} entered {} context: {:?}",
            self.handle.id(),
            if self.deferring { "deferring" } else { "responding" },
            self.handle.response_flags(),
        );
    }

    /// Records the outcome of the attempt.
    pub fn exit(&mut self, succeeded: bool) {
        if !std::mem::take(&mut self.acquired) {
            return;
        }

        let bit = self.in_flight_bit();
        let (deferring, ephemeral) = (self.deferring, self.ephemeral);

        let result = self.handle.update_flags(|mut flags| {
            if !succeeded {
                flags.remove(bit);
                return Some(flags);
            }

            if ephemeral && !flags.contains(ResponseFlags::ACKNOWLEDGED) {
                flags.insert(ResponseFlags::EPHEMERAL);
            }

            if deferring {
                if flags.contains(ResponseFlags::DEFERRING) {
                    flags.remove(ResponseFlags::DEFERRING);
                    flags.insert(ResponseFlags::DEFERRED);
                }
            } else if flags.contains(ResponseFlags::RESPONDING) {
                flags.remove(ResponseFlags::RESPONDING | ResponseFlags::DEFERRED);
                flags.insert(ResponseFlags::RESPONDED);
            }

            Some(flags)
        });

        trace!(
            "Interaction {} left context ({}): {:?}",
            self.handle.id(),
            if succeeded { "ok" } else { "failed" },
            result,
        );
    }

    /// Runs `body` inside the context: enters, awaits `body`, and exits according to its result.
    ///
    /// The error is returned unchanged. If the returned future is dropped before `body`
    /// finished, the attempt is recorded as failed.
    pub async fn scope<F, T, E>(&mut self, body: F) -> StdResult<T, E>
    where
        F: Future<Output = StdResult<T, E>>,
    {
        self.enter().await;
        self.run_entered(body).await
    }

    /// Like [`Self::scope`], but only awaits `body` if entering marked this attempt.
    ///
    /// Returns `Ok(None)` without polling `body` when another attempt already is in flight or
    /// done.
    pub async fn acquire<F, T, E>(&mut self, body: F) -> StdResult<Option<T>, E>
    where
        F: Future<Output = StdResult<T, E>>,
    {
        self.enter().await;
        if !self.acquired {
            return Ok(None);
        }

        self.run_entered(body).await.map(Some)
    }

    async fn run_entered<F, T, E>(&mut self, body: F) -> StdResult<T, E>
    where
        F: Future<Output = StdResult<T, E>>,
    {
        let exit = ExitOnDrop {
            context: self,
            succeeded: false,
        };
        let result = body.await;
        exit.finish(result.is_ok());

        result
    }

    /// Submits `body`, run inside this context, to the handle's [`AsyncTaskGuard`].
    ///
    /// Returns as soon as the background task started. Dropping the returned future after that
    /// does not cancel the task; later attempts on the interaction wait for it instead.
    ///
    /// [`AsyncTaskGuard`]: super::AsyncTaskGuard
    pub async fn ensure<F>(mut self, body: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let handle = Arc::clone(&self.handle);
        handle.guard().ensure(async move { self.scope(body).await }).await;
    }
}

struct ExitOnDrop<'a> {
    context: &'a mut InteractionResponseContext,
    succeeded: bool,
}

impl ExitOnDrop<'_> {
    fn finish(mut self, succeeded: bool) {
        self.succeeded = succeeded;
    }
}

impl Drop for ExitOnDrop<'_> {
    fn drop(&mut self) {
        self.context.exit(self.succeeded);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::interaction::tests::handle;
    use crate::model::application::ResponseFlags as F;

    fn send_failure() -> Error {
        Error::Timeout(Duration::from_secs(0))
    }

    #[tokio::test]
    async fn deferral_then_ephemeral_response() {
        let handle = handle(2);

        let mut defer = InteractionResponseContext::new(Arc::clone(&handle), true, false);
        defer.enter().await;
        assert_eq!(handle.response_flags(), F::DEFERRING);
        defer.exit(true);
        assert_eq!(handle.response_flags(), F::DEFERRED);

        let mut respond = InteractionResponseContext::new(Arc::clone(&handle), false, true);
        respond.enter().await;
        assert_eq!(handle.response_flags(), F::DEFERRED | F::RESPONDING);
        respond.exit(true);
        assert_eq!(handle.response_flags(), F::RESPONDED | F::EPHEMERAL);
    }

    #[tokio::test]
    async fn failed_response_rolls_back() {
        let handle = handle(2);
        let mut context = InteractionResponseContext::new(Arc::clone(&handle), false, false);

        let result: Result<()> = context
            .scope(async {
                assert_eq!(handle.response_flags(), F::RESPONDING);
                Err(send_failure())
            })
            .await;

        assert!(result.is_err());
        assert_eq!(handle.response_flags(), F::empty());
    }

    #[tokio::test]
    async fn failed_deferral_rolls_back() {
        let handle = handle(2);
        let mut context = InteractionResponseContext::new(Arc::clone(&handle), true, true);

        let result: Result<()> = context.scope(async { Err(send_failure()) }).await;

        assert!(result.is_err());
        assert!(!handle.response_flags().intersects(F::DEFERRING_OR_DEFERRED));
        assert!(!handle.response_flags().is_ephemeral());
    }

    #[tokio::test]
    async fn deferral_reentry_is_a_no_op() {
        let handle = handle(2);

        let mut first = InteractionResponseContext::new(Arc::clone(&handle), true, false);
        first.enter().await;

        let mut second = InteractionResponseContext::new(Arc::clone(&handle), true, false);
        second.enter().await;
        assert!(!second.acquired());
        assert_eq!(handle.response_flags(), F::DEFERRING);

        second.exit(false);
        assert_eq!(handle.response_flags(), F::DEFERRING);

        first.exit(true);
        assert_eq!(handle.response_flags(), F::DEFERRED);
    }

    #[tokio::test]
    async fn response_is_not_marked_during_in_flight_deferral() {
        let handle = handle(2);

        let mut defer = InteractionResponseContext::new(Arc::clone(&handle), true, false);
        defer.enter().await;

        let mut respond = InteractionResponseContext::new(Arc::clone(&handle), false, false);
        respond.enter().await;
        assert!(!respond.acquired());
        assert!(!handle.response_flags().contains(F::ACKNOWLEDGING));
    }

    #[tokio::test]
    async fn second_response_is_not_recorded() {
        let handle = handle(2);

        let mut first = InteractionResponseContext::new(Arc::clone(&handle), false, false);
        first.scope(async { Ok::<_, Error>(()) }).await.unwrap();

        let mut second = InteractionResponseContext::new(Arc::clone(&handle), false, true);
        second.scope(async { Ok::<_, Error>(()) }).await.unwrap();

        assert_eq!(handle.response_flags(), F::RESPONDED);
    }

    #[tokio::test]
    async fn acquire_skips_body_when_already_acknowledged() {
        let handle = handle(2);
        handle.update_flags(|_| Some(F::DEFERRED)).unwrap();

        let mut context = InteractionResponseContext::new(Arc::clone(&handle), true, false);
        let ran = context.acquire(async { Ok::<_, Error>(()) }).await.unwrap();

        assert!(ran.is_none());
        assert_eq!(handle.response_flags(), F::DEFERRED);
    }

    #[tokio::test]
    async fn dropped_scope_counts_as_failure() {
        let handle = handle(2);
        let mut context = InteractionResponseContext::new(Arc::clone(&handle), false, false);

        let scope = context.scope(std::future::pending::<Result<()>>());
        let timed_out = tokio::time::timeout(Duration::from_millis(5), scope).await;

        assert!(timed_out.is_err());
        assert_eq!(handle.response_flags(), F::empty());
    }

    #[tokio::test]
    async fn ensure_runs_in_background() {
        let handle = handle(2);
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        InteractionResponseContext::new(Arc::clone(&handle), true, false)
            .ensure(async move {
                rx.await.ok();
                Ok(())
            })
            .await;

        assert_eq!(handle.response_flags(), F::DEFERRING);
        tx.send(()).unwrap();

        handle.guard().wait_for_completion().await;
        assert_eq!(handle.response_flags(), F::DEFERRED);
    }
}
