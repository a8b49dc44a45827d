//! The HTTP seam used to answer interactions.
//!
//! The library does not talk to Discord's REST API itself. Every network call the response state
//! machine makes goes through an [`InteractionHttp`] implementation that you provide, usually a
//! thin layer over your HTTP client of choice. The library takes care of *which* call to make and
//! *when*; the implementation only has to perform it.
//!
//! Implementations must report failures to reach Discord as [`HttpError::Connection`]. Such
//! failures are swallowed when sending a command's response, while rejected requests
//! ([`HttpError::UnsuccessfulRequest`]) are handed to the error handlers.

mod error;

use async_trait::async_trait;

pub use self::error::{DiscordJsonError, Error as HttpError, ErrorResponse};
use crate::builder::{CreateAutocompleteResponse, CreateInteractionResponseMessage};
use crate::internal::prelude::*;
use crate::model::application::Interaction;
use crate::model::channel::Message;
use crate::model::id::MessageId;

/// The network calls needed to answer an interaction.
///
/// Every method receives the interaction being answered, which carries the id and token the
/// endpoints need. Methods returning a [`Message`] may return `None` if the implementation does
/// not ask Discord for the created message.
///
/// [Discord docs](https://discord.com/developers/docs/interactions/receiving-and-responding#responding-to-an-interaction).
#[async_trait]
pub trait InteractionHttp: Send + Sync {
    /// Sends a `DEFERRED_CHANNEL_MESSAGE_WITH_SOURCE` response: the user sees a loading state
    /// until the real response arrives.
    async fn send_deferred_acknowledgement(
        &self,
        interaction: &Interaction,
        ephemeral: bool,
    ) -> Result<()>;

    /// Sends a `DEFERRED_UPDATE_MESSAGE` response to a component interaction or a form submit.
    async fn send_component_acknowledgement(&self, interaction: &Interaction) -> Result<()>;

    /// Sends a `CHANNEL_MESSAGE_WITH_SOURCE` response.
    async fn send_first_response(
        &self,
        interaction: &Interaction,
        content: &CreateInteractionResponseMessage,
    ) -> Result<Option<Message>>;

    /// Sends an `UPDATE_MESSAGE` response, editing the message the component is attached to.
    async fn update_component_message(
        &self,
        interaction: &Interaction,
        content: &CreateInteractionResponseMessage,
    ) -> Result<Option<Message>>;

    /// Edits the original response, replacing the loading state of a deferral.
    async fn edit_deferred_response(
        &self,
        interaction: &Interaction,
        content: &CreateInteractionResponseMessage,
    ) -> Result<Option<Message>>;

    /// Creates a followup message.
    async fn send_followup(
        &self,
        interaction: &Interaction,
        content: &CreateInteractionResponseMessage,
        ephemeral: bool,
    ) -> Result<Option<Message>>;

    /// Edits a followup message.
    async fn edit_followup(
        &self,
        interaction: &Interaction,
        message_id: MessageId,
        content: &CreateInteractionResponseMessage,
    ) -> Result<Option<Message>>;

    /// Sends an `APPLICATION_COMMAND_AUTOCOMPLETE_RESULT` response.
    async fn send_autocomplete_result(
        &self,
        interaction: &Interaction,
        choices: &CreateAutocompleteResponse,
    ) -> Result<()>;
}
