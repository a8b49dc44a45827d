//! A collection of newtypes defining type-strong IDs.

id_u64! {
    /// An identifier for an Application.
    ApplicationId;
    /// An identifier for an attachment.
    AttachmentId;
    /// An identifier for a Channel
    ChannelId;
    /// An identifier for a slash command.
    CommandId;
    /// An identifier for a Guild
    GuildId;
    /// An identifier for an interaction.
    InteractionId;
    /// An identifier for a Message
    MessageId;
    /// An identifier for a Role
    RoleId;
    /// An identifier for a User
    UserId;
    /// An identifier for an unspecific entity, such as the value of a mentionable option.
    GenericId;
    /// An identifier for the target of a context menu command, either a user or a message.
    TargetId;
}

impl TargetId {
    /// Converts this [`TargetId`] to [`UserId`].
    #[must_use]
    pub fn to_user_id(self) -> UserId {
        UserId::new(self.get())
    }

    /// Converts this [`TargetId`] to [`MessageId`].
    #[must_use]
    pub fn to_message_id(self) -> MessageId {
        MessageId::new(self.get())
    }
}

impl GenericId {
    /// Converts this [`GenericId`] to [`UserId`].
    #[must_use]
    pub fn to_user_id(self) -> UserId {
        UserId::new(self.get())
    }

    /// Converts this [`GenericId`] to [`RoleId`].
    #[must_use]
    pub fn to_role_id(self) -> RoleId {
        RoleId::new(self.get())
    }
}

/// Used with `#[serde(with = "snowflake")]`
///
/// Discord sends snowflakes as strings; integers are accepted too.
pub(crate) mod snowflake {
    use std::fmt;

    use nonmax::NonMaxU64;
    use serde::de::{Error, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NonMaxU64, D::Error> {
        deserializer.deserialize_any(SnowflakeVisitor)
    }

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(id: &NonMaxU64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&id.get())
    }

    struct SnowflakeVisitor;

    impl<'de> Visitor<'de> for SnowflakeVisitor {
        type Value = NonMaxU64;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a non-max u64 or a string containing one")
        }

        fn visit_u64<E: Error>(self, value: u64) -> Result<Self::Value, E> {
            NonMaxU64::new(value).ok_or_else(|| Error::custom("invalid value, expected non-max"))
        }

        fn visit_i64<E: Error>(self, value: i64) -> Result<Self::Value, E> {
            let value = u64::try_from(value).map_err(Error::custom)?;
            self.visit_u64(value)
        }

        fn visit_str<E: Error>(self, value: &str) -> Result<Self::Value, E> {
            let value = value.parse::<u64>().map_err(Error::custom)?;
            self.visit_u64(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InteractionId, UserId};

    #[test]
    fn test_id_serde() {
        let id = InteractionId::new(175928847299117063);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""175928847299117063""#);

        let from_str: InteractionId = serde_json::from_str(r#""175928847299117063""#).unwrap();
        let from_int: InteractionId = serde_json::from_str("175928847299117063").unwrap();
        assert_eq!(from_str, id);
        assert_eq!(from_int, id);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(UserId::new(12).to_string(), "12");
        assert_eq!(format!("{:?}", UserId::new(12)), "UserId(12)");
    }
}
