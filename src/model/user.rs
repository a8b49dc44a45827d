//! User information-related models.

use std::fmt;

use super::id::UserId;

/// Information about a user.
///
/// [Discord docs](https://discord.com/developers/docs/resources/user#user-object).
#[derive(Clone, Debug, Deserialize, Serialize)]
#[non_exhaustive]
pub struct User {
    /// The unique Id of the user. Can be used to calculate the account's creation date.
    pub id: UserId,
    /// The account's username.
    #[serde(rename = "username")]
    pub name: String,
    /// The user's display name, if it is set.
    #[serde(default)]
    pub global_name: Option<String>,
    /// Indicator of whether the user is a bot.
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// Returns the name shown for the user: their global name when set, otherwise their username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.name)
    }

    /// Returns a string that mentions the user.
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The `member` object sent with interactions that happen inside a guild.
///
/// Only the user is modelled; the remaining guild profile is kept as raw JSON.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[non_exhaustive]
pub struct PartialMember {
    /// The user the member belongs to.
    pub user: Option<User>,
    /// The member's nickname, if any.
    #[serde(default)]
    pub nick: Option<String>,
}
