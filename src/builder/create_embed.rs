//! Developer note:
//!
//! This is a set of embed builders for rich embeds.
//!
//! The only builder that should be exposed is [`CreateEmbed`]. The rest of these have no real
//! reason for being exposed, but are for completeness' sake.
//!
//! Documentation for embeds can be found [here].
//!
//! [here]: https://discord.com/developers/docs/resources/channel#embed-object

use crate::constants::EMBED_MAX_LENGTH;
use crate::model::user::User;
use crate::model::ModelError;

/// A builder to create an embed in a message
///
/// [Discord docs](https://discord.com/developers/docs/resources/channel#embed-object)
#[derive(Clone, Debug, PartialEq, Serialize)]
#[must_use]
pub struct CreateEmbed {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(rename = "color")]
    #[serde(skip_serializing_if = "Option::is_none")]
    colour: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer: Option<CreateEmbedFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<CreateEmbedImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thumbnail: Option<CreateEmbedImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<CreateEmbedAuthor>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    fields: Vec<CreateEmbedField>,
}

impl CreateEmbed {
    /// Equivalent to [`Self::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the author of the embed.
    ///
    /// Refer to the documentation for [`CreateEmbedAuthor`] for more information.
    pub fn author(mut self, author: CreateEmbedAuthor) -> Self {
        self.author = Some(author);
        self
    }

    /// Set the colour of the left-hand side of the embed, as `0xRRGGBB`.
    pub fn colour(mut self, colour: u32) -> Self {
        self.colour = Some(colour);
        self
    }

    /// Set the description of the embed.
    ///
    /// **Note**: This can't be longer than 4096 characters.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set a field. Note that this will not overwrite other fields, and will add to them.
    ///
    /// **Note**: Maximum amount of characters you can put is 256 in a field name and 1024 in a
    /// field value.
    pub fn field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> Self {
        self.fields.push(CreateEmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    /// Set the footer of the embed.
    pub fn footer(mut self, footer: CreateEmbedFooter) -> Self {
        self.footer = Some(footer);
        self
    }

    /// Set the image associated with the embed. This only supports HTTP(S).
    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(CreateEmbedImage {
            url: url.into(),
        });
        self
    }

    /// Set the thumbnail of the embed. This only supports HTTP(S).
    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(CreateEmbedImage {
            url: url.into(),
        });
        self
    }

    /// Set the title of the embed.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the URL to direct to when clicking on the title.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Same as calling [`Self::image`] with "attachment://filename.(jpg, png)".
    ///
    /// Note however, you have to be sure you set an attachment (with [`CreateAttachment`]) with
    /// the same name as `filename`.
    ///
    /// [`CreateAttachment`]: super::CreateAttachment
    pub fn attachment(self, filename: impl Into<String>) -> Self {
        let mut filename = filename.into();
        filename.insert_str(0, "attachment://");
        self.image(filename)
    }

    /// The textual length of the embed, as Discord counts it against [`EMBED_MAX_LENGTH`].
    #[must_use]
    pub fn get_length(&self) -> usize {
        let mut length = 0;
        if let Some(author) = &self.author {
            length += author.name.chars().count();
        }

        if let Some(description) = &self.description {
            length += description.chars().count();
        }

        for field in &self.fields {
            length += field.name.chars().count();
            length += field.value.chars().count();
        }

        if let Some(footer) = &self.footer {
            length += footer.text.chars().count();
        }

        if let Some(title) = &self.title {
            length += title.chars().count();
        }

        length
    }

    pub(crate) fn check_length(&self) -> Result<(), ModelError> {
        let length = self.get_length();
        if length > EMBED_MAX_LENGTH {
            return Err(ModelError::EmbedTooLarge(length - EMBED_MAX_LENGTH));
        }

        Ok(())
    }
}

impl Default for CreateEmbed {
    /// Creates a builder with default values, setting the `type` to `rich`.
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            description: None,
            thumbnail: None,
            image: None,
            footer: None,
            kind: "rich",
            author: None,
            title: None,
            url: None,
            colour: None,
        }
    }
}

/// A builder to create the author data of an embed. See [`CreateEmbed::author`]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[must_use]
pub struct CreateEmbedAuthor {
    #[serde(skip_serializing_if = "Option::is_none")]
    icon_url: Option<String>,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

impl CreateEmbedAuthor {
    /// Creates an author object with the given name, leaving all other fields empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            icon_url: None,
            name: name.into(),
            url: None,
        }
    }

    /// Set the URL of the author's icon.
    pub fn icon_url(mut self, icon_url: impl Into<String>) -> Self {
        self.icon_url = Some(icon_url.into());
        self
    }

    /// Set the author's URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl From<&User> for CreateEmbedAuthor {
    fn from(user: &User) -> Self {
        Self::new(user.display_name())
    }
}

/// A builder to create the footer data for an embed. See [`CreateEmbed::footer`]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[must_use]
pub struct CreateEmbedFooter {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon_url: Option<String>,
}

impl CreateEmbedFooter {
    /// Creates a new footer object with the given text, leaving all other fields empty.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon_url: None,
        }
    }

    /// Set the icon URL's value. This only supports HTTP(S).
    pub fn icon_url(mut self, icon_url: impl Into<String>) -> Self {
        self.icon_url = Some(icon_url.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
struct CreateEmbedField {
    name: String,
    value: String,
    inline: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
struct CreateEmbedImage {
    url: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_rich_embed() {
        let embed = CreateEmbed::new()
            .title("Status")
            .colour(0x00ff00)
            .field("uptime", "3 days", true)
            .footer(CreateEmbedFooter::new("cadence"));

        assert_eq!(
            serde_json::to_value(&embed).unwrap(),
            json!({
                "type": "rich",
                "title": "Status",
                "color": 0x00ff00,
                "footer": {"text": "cadence"},
                "fields": [{"name": "uptime", "value": "3 days", "inline": true}],
            }),
        );
    }

    #[test]
    fn length_counts_textual_parts() {
        let embed = CreateEmbed::new().title("ab").description("cde").field("f", "gh", false);
        assert_eq!(embed.get_length(), 8);
        assert!(embed.check_length().is_ok());

        let huge = CreateEmbed::new().description("x".repeat(EMBED_MAX_LENGTH + 3));
        assert_eq!(huge.check_length(), Err(ModelError::EmbedTooLarge(3)));
    }
}
