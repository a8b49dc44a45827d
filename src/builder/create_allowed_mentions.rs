use serde::{Deserialize, Serialize};

use crate::model::id::{RoleId, UserId};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParseValue {
    Everyone,
    Users,
    Roles,
}

/// A builder to manage the allowed mentions on an interaction response.
///
/// # Examples
///
/// ```rust
/// use cadence::builder::{CreateAllowedMentions as Am, CreateInteractionResponseMessage, ParseValue};
/// use cadence::model::id::UserId;
///
/// // Mention only the user 110372470472613888
/// let only_user = CreateInteractionResponseMessage::new()
///     .allowed_mentions(Am::new().users([UserId::new(110372470472613888)]));
///
/// // Mention all roles and users, but not everyone
/// let no_everyone = CreateInteractionResponseMessage::new()
///     .allowed_mentions(Am::new().parse(ParseValue::Users).parse(ParseValue::Roles));
/// # let _ = (only_user, no_everyone);
/// ```
#[derive(Clone, Debug, Default, Serialize)]
#[must_use]
pub struct CreateAllowedMentions {
    parse: Vec<ParseValue>,
    users: Vec<UserId>,
    roles: Vec<RoleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    replied_user: Option<bool>,
}

impl CreateAllowedMentions {
    /// Equivalent to [`Self::default`]: nothing may be mentioned.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value that's allowed to be mentioned.
    ///
    /// If passing in [`ParseValue::Users`] or [`ParseValue::Roles`], note that later calling
    /// [`Self::users`] or [`Self::roles`] will then not work as intended, as the [`ParseValue`]
    /// will take precedence.
    #[inline]
    pub fn parse(mut self, value: ParseValue) -> Self {
        self.parse.push(value);
        self
    }

    /// Sets the *specific* users that will be allowed mentionable.
    #[inline]
    pub fn users(mut self, users: impl IntoIterator<Item = impl Into<UserId>>) -> Self {
        self.users = users.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the *specific* roles that will be allowed mentionable.
    #[inline]
    pub fn roles(mut self, roles: impl IntoIterator<Item = impl Into<RoleId>>) -> Self {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Makes the reply mention/ping the user.
    #[inline]
    pub fn replied_user(mut self, mention_user: bool) -> Self {
        self.replied_user = Some(mention_user);
        self
    }
}
