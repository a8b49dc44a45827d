use bitflags::bitflags;
use serde::de::{Deserialize, Deserializer, Error as DeError};
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::{CommandData, ComponentData, ModalData};
use crate::internal::prelude::*;
use crate::model::channel::Message;
use crate::model::id::{ApplicationId, ChannelId, GuildId, InteractionId};
use crate::model::user::{PartialMember, User};
use crate::model::ModelError;

/// An interaction received from Discord, either through the gateway or the outgoing webhook.
///
/// [Discord docs](https://discord.com/developers/docs/interactions/receiving-and-responding#interaction-object)
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Interaction {
    /// Id of the interaction.
    pub id: InteractionId,
    /// Id of the application this interaction is for.
    pub application_id: ApplicationId,
    /// The type of the interaction.
    pub kind: InteractionType,
    /// The kind-dependent payload.
    pub data: InteractionData,
    /// The guild Id this interaction was sent from, if there is one.
    pub guild_id: Option<GuildId>,
    /// The channel Id this interaction was sent from.
    pub channel_id: Option<ChannelId>,
    /// The member data for the invoking user, if the interaction happened in a guild.
    pub member: Option<PartialMember>,
    /// The `user` object for the invoking user.
    pub user: User,
    /// A continuation token for responding to the interaction.
    pub token: String,
    /// The selected language of the invoking user.
    pub locale: Option<String>,
    /// The guild's preferred locale.
    pub guild_locale: Option<String>,
    /// The message a component is attached to, for component interactions and forms opened from
    /// one.
    pub message: Option<Box<Message>>,
}

/// The kind-dependent data of an [`Interaction`].
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum InteractionData {
    /// The data of an application command or auto-completion interaction.
    Command(CommandData),
    /// The data of a message component interaction.
    Component(ComponentData),
    /// The data of a form submit.
    Modal(ModalData),
    /// Pings carry no data.
    None,
}

impl Interaction {
    /// Whether the interaction is the one Discord considers initial for responses: only
    /// application commands may edit their deferred placeholder.
    #[must_use]
    pub fn is_command(&self) -> bool {
        self.kind == InteractionType::Command
    }

    /// Converts this to a [`CommandData`], for command and auto-completion interactions.
    #[must_use]
    pub fn command_data(&self) -> Option<&CommandData> {
        match &self.data {
            InteractionData::Command(data) => Some(data),
            _ => None,
        }
    }

    /// Converts this to a [`ComponentData`].
    #[must_use]
    pub fn component_data(&self) -> Option<&ComponentData> {
        match &self.data {
            InteractionData::Component(data) => Some(data),
            _ => None,
        }
    }

    /// Converts this to a [`ModalData`].
    #[must_use]
    pub fn modal_data(&self) -> Option<&ModalData> {
        match &self.data {
            InteractionData::Modal(data) => Some(data),
            _ => None,
        }
    }

    /// Like [`Self::command_data`], but reports a [`ModelError`] for other kinds.
    pub fn expect_command_data(&self) -> Result<&CommandData> {
        self.command_data().ok_or(Error::Model(ModelError::InvalidInteractionData(self.kind)))
    }

    /// The custom id of a component interaction or form submit.
    #[must_use]
    pub fn custom_id(&self) -> Option<&str> {
        match &self.data {
            InteractionData::Component(data) => Some(&data.custom_id),
            InteractionData::Modal(data) => Some(&data.custom_id),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct RawInteraction {
    id: InteractionId,
    application_id: ApplicationId,
    #[serde(rename = "type")]
    kind: InteractionType,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    guild_id: Option<GuildId>,
    #[serde(default)]
    channel_id: Option<ChannelId>,
    #[serde(default)]
    member: Option<PartialMember>,
    #[serde(default)]
    user: Option<User>,
    token: String,
    #[serde(default)]
    locale: Option<String>,
    #[serde(default)]
    guild_locale: Option<String>,
    #[serde(default)]
    message: Option<Box<Message>>,
}

// Manual impl needed to emulate integer enum tags
impl<'de> Deserialize<'de> for Interaction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> StdResult<Self, D::Error> {
        let raw = RawInteraction::deserialize(deserializer)?;

        let data = match (raw.kind, raw.data) {
            (InteractionType::Command | InteractionType::Autocomplete, Some(data)) => {
                InteractionData::Command(serde_json::from_value(data).map_err(DeError::custom)?)
            },
            (InteractionType::Component, Some(data)) => {
                InteractionData::Component(serde_json::from_value(data).map_err(DeError::custom)?)
            },
            (InteractionType::Modal, Some(data)) => {
                InteractionData::Modal(serde_json::from_value(data).map_err(DeError::custom)?)
            },
            (InteractionType::Ping, _) => InteractionData::None,
            (InteractionType::Unknown(_), _) => {
                return Err(DeError::custom("Unknown interaction type"))
            },
            (_, None) => return Err(DeError::missing_field("data")),
        };

        let user = match (raw.user, raw.member.as_ref().and_then(|m| m.user.clone())) {
            (Some(user), _) | (None, Some(user)) => user,
            (None, None) => return Err(DeError::missing_field("user")),
        };

        Ok(Self {
            id: raw.id,
            application_id: raw.application_id,
            kind: raw.kind,
            data,
            guild_id: raw.guild_id,
            channel_id: raw.channel_id,
            member: raw.member,
            user,
            token: raw.token,
            locale: raw.locale,
            guild_locale: raw.guild_locale,
            message: raw.message,
        })
    }
}

impl Serialize for Interaction {
    fn serialize<S: Serializer>(&self, serializer: S) -> StdResult<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("application_id", &self.application_id)?;
        map.serialize_entry("type", &self.kind)?;
        match &self.data {
            InteractionData::Command(data) => map.serialize_entry("data", data)?,
            InteractionData::Component(data) => map.serialize_entry("data", data)?,
            InteractionData::Modal(data) => map.serialize_entry("data", data)?,
            InteractionData::None => {},
        }
        if let Some(guild_id) = self.guild_id {
            map.serialize_entry("guild_id", &guild_id)?;
        }
        if let Some(channel_id) = self.channel_id {
            map.serialize_entry("channel_id", &channel_id)?;
        }
        if let Some(member) = &self.member {
            map.serialize_entry("member", member)?;
        }
        map.serialize_entry("user", &self.user)?;
        map.serialize_entry("token", &self.token)?;
        if let Some(locale) = &self.locale {
            map.serialize_entry("locale", locale)?;
        }
        if let Some(guild_locale) = &self.guild_locale {
            map.serialize_entry("guild_locale", guild_locale)?;
        }
        if let Some(message) = &self.message {
            map.serialize_entry("message", message)?;
        }
        map.end()
    }
}

enum_number! {
    /// The type of an Interaction.
    ///
    /// [Discord docs](https://discord.com/developers/docs/interactions/receiving-and-responding#interaction-object-interaction-type).
    #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
    #[serde(from = "u8", into = "u8")]
    #[non_exhaustive]
    pub enum InteractionType {
        Ping = 1,
        Command = 2,
        Component = 3,
        Autocomplete = 4,
        Modal = 5,
        _ => Unknown(u8),
    }
}

bitflags! {
    /// The flags for an interaction response message.
    ///
    /// [Discord docs](https://discord.com/developers/docs/resources/channel#message-object-message-flags)
    /// ([only some are valid in this context](https://discord.com/developers/docs/interactions/receiving-and-responding#interaction-response-object-messages))
    #[derive(Copy, Clone, Default, Debug, Eq, Hash, PartialEq)]
    pub struct MessageFlags: u64 {
        /// Do not include any embeds when serializing this message.
        const SUPPRESS_EMBEDS = 1 << 2;
        /// Interaction message will only be visible to sender and will
        /// be quickly deleted.
        const EPHEMERAL = 1 << 6;
        /// Does not trigger push notifications or desktop notifications.
        const SUPPRESS_NOTIFICATIONS = 1 << 12;
    }
}

impl Serialize for MessageFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> StdResult<S::Ok, S::Error> {
        serializer.serialize_u64(self.bits())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn guild_command_takes_user_from_member() {
        let interaction: Interaction = serde_json::from_value(json!({
            "id": "10",
            "application_id": "20",
            "type": 2,
            "token": "abc",
            "guild_id": "30",
            "channel_id": "40",
            "member": {"user": {"id": "50", "username": "ferris"}, "nick": null},
            "data": {"id": "60", "name": "ping", "type": 1},
        }))
        .unwrap();

        assert_eq!(interaction.kind, InteractionType::Command);
        assert_eq!(interaction.user.name, "ferris");
        assert_eq!(interaction.command_data().unwrap().name, "ping");
        assert!(interaction.is_command());
    }

    #[test]
    fn component_interaction_data() {
        let interaction: Interaction = serde_json::from_value(json!({
            "id": 10,
            "application_id": 20,
            "type": 3,
            "token": "abc",
            "user": {"id": "50", "username": "ferris"},
            "data": {"custom_id": "vote:3", "component_type": 2},
        }))
        .unwrap();

        assert_eq!(interaction.custom_id(), Some("vote:3"));
        assert!(interaction.command_data().is_none());
        assert!(interaction.expect_command_data().is_err());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result = serde_json::from_value::<Interaction>(json!({
            "id": "10",
            "application_id": "20",
            "type": 42,
            "token": "abc",
            "user": {"id": "50", "username": "ferris"},
        }));

        assert!(result.is_err());
    }
}
