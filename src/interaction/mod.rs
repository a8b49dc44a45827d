//! The response state machine of an interaction.
//!
//! Discord lets a bot answer each interaction exactly once, within three seconds, after which it
//! may send followups for fifteen minutes. An [`InteractionHandle`] tracks how far an interaction
//! got through that lifecycle in its [`ResponseFlags`]. The flags are only changed by an
//! [`InteractionResponseContext`] bracketing each attempt at answering, and attempts on the same
//! handle are serialized by its [`AsyncTaskGuard`].
//!
//! Handles are owned by the [`InteractionRegistry`], which hands out the same handle for every
//! delivery of the same interaction and drops it once it is released.

mod context;
mod guard;
mod registry;

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

pub use self::context::InteractionResponseContext;
pub use self::guard::AsyncTaskGuard;
pub use self::registry::InteractionRegistry;
use crate::constants::{INTERACTION_RESPONSE_WINDOW, INTERACTION_TOKEN_LIFETIME};
use crate::internal::prelude::*;
use crate::model::application::{Interaction, InteractionType, ResponseFlags};
use crate::model::channel::Message;
use crate::model::id::InteractionId;

/// One received interaction and the state of its response.
#[derive(Debug)]
pub struct InteractionHandle {
    interaction: Interaction,
    flags: AtomicU8,
    guard: AsyncTaskGuard,
    response_message: watch::Sender<Option<Message>>,
    received_at: Instant,
}

impl InteractionHandle {
    #[must_use]
    pub fn new(interaction: Interaction) -> Self {
        Self {
            interaction,
            flags: AtomicU8::new(ResponseFlags::empty().bits()),
            guard: AsyncTaskGuard::new(),
            response_message: watch::channel(None).0,
            received_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    #[must_use]
    pub fn id(&self) -> InteractionId {
        self.interaction.id
    }

    #[must_use]
    pub fn kind(&self) -> InteractionType {
        self.interaction.kind
    }

    #[must_use]
    pub fn guard(&self) -> &AsyncTaskGuard {
        &self.guard
    }

    /// A snapshot of the response flags.
    ///
    /// The value may be outdated by the time it is read, but every change to it goes through an
    /// [`InteractionResponseContext`], which serializes on the handle's guard first.
    #[must_use]
    pub fn response_flags(&self) -> ResponseFlags {
        ResponseFlags::from_bits_retain(self.flags.load(Ordering::Acquire))
    }

    pub(crate) fn update_flags(
        &self,
        mut f: impl FnMut(ResponseFlags) -> Option<ResponseFlags>,
    ) -> StdResult<ResponseFlags, ResponseFlags> {
        self.flags
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                f(ResponseFlags::from_bits_retain(bits)).map(|flags| flags.bits())
            })
            .map(ResponseFlags::from_bits_retain)
            .map_err(ResponseFlags::from_bits_retain)
    }

    /// Whether nothing was sent, or is being sent, to the interaction yet.
    #[must_use]
    pub fn is_unanswered(&self) -> bool {
        self.response_flags().is_unanswered()
    }

    #[must_use]
    pub fn is_deferred(&self) -> bool {
        self.response_flags().is_deferred()
    }

    #[must_use]
    pub fn is_responded(&self) -> bool {
        self.response_flags().is_responded()
    }

    #[must_use]
    pub fn is_acknowledged(&self) -> bool {
        self.response_flags().is_acknowledged()
    }

    #[must_use]
    pub fn is_ephemeral(&self) -> bool {
        self.response_flags().is_ephemeral()
    }

    /// How long the interaction has been known.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.received_at.elapsed()
    }

    /// Whether the interaction's token can still be used.
    ///
    /// An interaction must be answered within three seconds. Once acknowledged, its token stays
    /// valid for fifteen minutes.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let lifetime = if self.is_acknowledged() {
            INTERACTION_TOKEN_LIFETIME
        } else {
            INTERACTION_RESPONSE_WINDOW
        };

        self.age() < lifetime
    }

    /// The message created by the first response, if it is known.
    #[must_use]
    pub fn response_message(&self) -> Option<Message> {
        self.response_message.borrow().clone()
    }

    pub(crate) fn set_response_message(&self, message: Message) {
        self.response_message.send_replace(Some(message));
    }

    /// Waits until the message of the first response is known.
    ///
    /// Times out without touching the response flags or any pending background task, which keeps
    /// running.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if no message was published within `timeout`.
    pub async fn wait_for_response_message(&self, timeout: Duration) -> Result<Message> {
        let mut receiver = self.response_message.subscribe();

        let waited = tokio::time::timeout(timeout, receiver.wait_for(Option::is_some)).await;
        let message = match waited {
            Ok(Ok(message)) => (*message).clone(),
            Ok(Err(_)) | Err(_) => None,
        };

        message.ok_or(Error::Timeout(timeout))
    }
}
