//! Models relating to channels and the messages sent in them.

use super::application::MessageFlags;
use super::id::{ChannelId, InteractionId, MessageId};
use super::user::User;
use crate::internal::prelude::*;

/// A representation of a message sent in a channel.
///
/// Only the fields the interaction layer reads are typed; embeds and components are kept as raw
/// JSON.
///
/// [Discord docs](https://discord.com/developers/docs/resources/channel#message-object).
#[derive(Clone, Debug, Deserialize, Serialize)]
#[non_exhaustive]
pub struct Message {
    /// The unique Id of the message.
    pub id: MessageId,
    /// The Id of the [`Channel`] that the message was sent to.
    ///
    /// [`Channel`]: https://discord.com/developers/docs/resources/channel#channel-object
    pub channel_id: ChannelId,
    /// The user that sent the message.
    pub author: Option<User>,
    /// The content of the message.
    #[serde(default)]
    pub content: String,
    /// Array of embeds sent with the message.
    #[serde(default)]
    pub embeds: Vec<Value>,
    /// Array of components sent with the message.
    #[serde(default)]
    pub components: Vec<Value>,
    /// Message flags.
    #[serde(default)]
    pub flags: u64,
    /// The Id of the interaction this message answers, if it is an interaction response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_id: Option<InteractionId>,
}

impl Message {
    /// Whether the message is only visible to the user who invoked the interaction it answers.
    #[must_use]
    pub fn is_ephemeral(&self) -> bool {
        MessageFlags::from_bits_truncate(self.flags).contains(MessageFlags::EPHEMERAL)
    }
}
