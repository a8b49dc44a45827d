use super::{CreateAllowedMentions, CreateAttachment, CreateEmbed};
use crate::constants::{
    AUTOCOMPLETE_CHOICE_LIMIT,
    AUTOCOMPLETE_CHOICE_NAME_LIMIT,
    EMBED_MAX_COUNT,
    MESSAGE_CODE_LIMIT,
};
use crate::internal::prelude::*;
use crate::model::application::MessageFlags;
use crate::model::ModelError;

/// The content of an interaction response or followup message.
///
/// The same body is used for first responses, edits of a deferred response and followups; the
/// [`InteractionHttp`] implementation picks the endpoint.
///
/// [Discord docs](https://discord.com/developers/docs/interactions/receiving-and-responding#interaction-response-object-messages).
///
/// [`InteractionHttp`]: crate::http::InteractionHttp
#[derive(Clone, Debug, Default, Serialize)]
#[must_use]
pub struct CreateInteractionResponseMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    tts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    embeds: Vec<CreateEmbed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allowed_mentions: Option<CreateAllowedMentions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    flags: Option<MessageFlags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    components: Option<Vec<Value>>,

    #[serde(skip)]
    files: Vec<CreateAttachment>,
}

impl CreateInteractionResponseMessage {
    /// Equivalent to [`Self::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the message is text-to-speech.
    ///
    /// Think carefully before setting this to `true`.
    ///
    /// Defaults to `false`.
    pub fn tts(mut self, tts: bool) -> Self {
        self.tts = Some(tts);
        self
    }

    /// Appends a file to the message.
    pub fn add_file(mut self, file: CreateAttachment) -> Self {
        self.files.push(file);
        self
    }

    /// Appends a list of files to the message.
    pub fn add_files(mut self, files: impl IntoIterator<Item = CreateAttachment>) -> Self {
        self.files.extend(files);
        self
    }

    /// Set the content of the message.
    ///
    /// **Note**: Message contents must be under 2000 unicode code points.
    #[inline]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Adds an embed to the message.
    ///
    /// Calling this while editing a message will overwrite existing embeds.
    pub fn add_embed(mut self, embed: CreateEmbed) -> Self {
        self.embeds.push(embed);
        self
    }

    /// Adds multiple embeds for the message.
    ///
    /// Calling this while editing a message will overwrite existing embeds.
    pub fn add_embeds(mut self, embeds: impl IntoIterator<Item = CreateEmbed>) -> Self {
        self.embeds.extend(embeds);
        self
    }

    /// Sets a single embed to include in the message
    ///
    /// Calling this will overwrite the embed list. To append embeds, call [`Self::add_embed`]
    /// instead.
    pub fn embed(self, embed: CreateEmbed) -> Self {
        self.embeds(vec![embed])
    }

    /// Sets a list of embeds to include in the message.
    ///
    /// Calling this will overwrite the embed list. To append embeds, call [`Self::add_embeds`]
    /// instead.
    pub fn embeds(mut self, embeds: Vec<CreateEmbed>) -> Self {
        self.embeds = embeds;
        self
    }

    /// Set the allowed mentions for the message.
    pub fn allowed_mentions(mut self, allowed_mentions: CreateAllowedMentions) -> Self {
        self.allowed_mentions = Some(allowed_mentions);
        self
    }

    /// Sets the flags for the message.
    pub fn flags(mut self, flags: MessageFlags) -> Self {
        self.flags = Some(flags);
        self
    }

    /// Adds or removes the ephemeral flag.
    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        let mut flags = self.flags.unwrap_or_else(MessageFlags::empty);
        flags.set(MessageFlags::EPHEMERAL, ephemeral);

        self.flags = Some(flags);
        self
    }

    /// Sets the components of this message, as raw action rows.
    pub fn components(mut self, components: Vec<Value>) -> Self {
        self.components = Some(components);
        self
    }

    /// Whether the message was flagged to be shown to the invoking user only.
    #[must_use]
    pub fn is_ephemeral(&self) -> bool {
        self.flags.is_some_and(|flags| flags.contains(MessageFlags::EPHEMERAL))
    }

    /// Whether the message would carry nothing visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.as_deref().map_or(true, str::is_empty)
            && self.embeds.is_empty()
            && self.files.is_empty()
            && self.components.as_ref().map_or(true, Vec::is_empty)
    }

    #[must_use]
    pub fn get_content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    #[must_use]
    pub fn get_embeds(&self) -> &[CreateEmbed] {
        &self.embeds
    }

    /// The files to upload along with the message.
    #[must_use]
    pub fn get_files(&self) -> &[CreateAttachment] {
        &self.files
    }

    /// Checks the message against Discord's content and embed limits.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] naming the first limit that is exceeded.
    pub fn check_lengths(&self) -> StdResult<(), ModelError> {
        if let Some(content) = &self.content {
            let length = content.chars().count();
            if length > MESSAGE_CODE_LIMIT {
                return Err(ModelError::MessageTooLong(length - MESSAGE_CODE_LIMIT));
            }
        }

        if self.embeds.len() > EMBED_MAX_COUNT {
            return Err(ModelError::TooManyEmbeds(self.embeds.len() - EMBED_MAX_COUNT));
        }

        self.embeds.iter().try_for_each(CreateEmbed::check_length)
    }
}

/// A single suggestion of an auto-completion response.
///
/// [Discord docs](https://discord.com/developers/docs/interactions/application-commands#application-command-object-application-command-option-choice-structure).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct AutocompleteChoice {
    pub name: String,
    pub value: Value,
}

impl AutocompleteChoice {
    /// Creates a choice. Names longer than Discord allows are cut at a char boundary.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut name = name.into();
        if let Some((index, _)) = name.char_indices().nth(AUTOCOMPLETE_CHOICE_NAME_LIMIT) {
            name.truncate(index);
        }

        Self {
            name,
            value: value.into(),
        }
    }
}

impl From<String> for AutocompleteChoice {
    fn from(value: String) -> Self {
        Self::new(value.clone(), value)
    }
}

impl From<&str> for AutocompleteChoice {
    fn from(value: &str) -> Self {
        Self::new(value, value)
    }
}

/// The body of an auto-completion response.
#[derive(Clone, Debug, Default, Serialize)]
#[must_use]
pub struct CreateAutocompleteResponse {
    choices: Vec<AutocompleteChoice>,
}

impl CreateAutocompleteResponse {
    /// Equivalent to [`Self::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a choice. Choices past the 25th are ignored.
    pub fn add_choice(mut self, choice: impl Into<AutocompleteChoice>) -> Self {
        if self.choices.len() < AUTOCOMPLETE_CHOICE_LIMIT {
            self.choices.push(choice.into());
        }
        self
    }

    /// Sets the choices, keeping the first 25.
    pub fn set_choices(mut self, choices: impl IntoIterator<Item = AutocompleteChoice>) -> Self {
        self.choices = choices.into_iter().take(AUTOCOMPLETE_CHOICE_LIMIT).collect();
        self
    }

    #[must_use]
    pub fn get_choices(&self) -> &[AutocompleteChoice] {
        &self.choices
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ephemeral_sets_message_flag() {
        let message = CreateInteractionResponseMessage::new().content("hi").ephemeral(true);

        assert!(message.is_ephemeral());
        assert_eq!(serde_json::to_value(&message).unwrap(), json!({"content": "hi", "flags": 64}));
        assert!(!message.ephemeral(false).is_ephemeral());
    }

    #[test]
    fn too_long_content_is_rejected() {
        let message = CreateInteractionResponseMessage::new().content("a".repeat(2001));
        assert_eq!(message.check_lengths(), Err(ModelError::MessageTooLong(1)));
    }

    #[test]
    fn emptiness() {
        assert!(CreateInteractionResponseMessage::new().is_empty());
        assert!(CreateInteractionResponseMessage::new().content("").is_empty());
        assert!(!CreateInteractionResponseMessage::new().embed(CreateEmbed::new()).is_empty());
    }

    #[test]
    fn autocomplete_choices_are_capped() {
        let response = CreateAutocompleteResponse::new()
            .set_choices((0..40).map(|i| AutocompleteChoice::new(i.to_string(), i)));
        assert_eq!(response.get_choices().len(), AUTOCOMPLETE_CHOICE_LIMIT);

        let long = AutocompleteChoice::new("\u{e9}".repeat(150), "x");
        assert_eq!(long.name.chars().count(), AUTOCOMPLETE_CHOICE_NAME_LIMIT);
    }
}
