//! Error enum definition wrapping potential model implementation errors.

use std::error::Error as StdError;
use std::fmt;

use super::application::InteractionType;

/// An error returned from the [`model`] module.
///
/// This is always wrapped within the library's [`Error::Model`] variant.
///
/// [`model`]: crate::model
/// [`Error::Model`]: crate::Error::Model
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The interaction payload's `data` did not match the shape its `type` demands.
    InvalidInteractionData(InteractionType),
    /// Indicates that the textual content of an embed exceeds the maximum length.
    ///
    /// The number of characters larger than the limit is provided.
    EmbedTooLarge(usize),
    /// Indicates that a message holds more embeds than Discord allows.
    ///
    /// The number of embeds over the limit is provided.
    TooManyEmbeds(usize),
    /// Indicates that a [`Message`]s content was too long and will not successfully send, as the
    /// length is over 2000 codepoints.
    ///
    /// The number of code points larger than the limit is provided.
    ///
    /// [`Message`]: super::channel::Message
    MessageTooLong(usize),
    /// The interaction's first response was already sent, or is being sent, so it can not be
    /// answered this way anymore.
    AlreadyResponded,
    /// The operation requires an interaction of another kind.
    WrongInteractionKind {
        /// The kind the operation requires.
        expected: InteractionType,
        /// The kind of the interaction it was called with.
        got: InteractionType,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInteractionData(kind) => {
                write!(f, "Interaction data does not match its type ({kind:?}).")
            },
            Self::EmbedTooLarge(_) => f.write_str("Embed too large."),
            Self::TooManyEmbeds(_) => f.write_str("Too many embeds."),
            Self::MessageTooLong(_) => f.write_str("Message too large."),
            Self::AlreadyResponded => f.write_str("Interaction was already responded to."),
            Self::WrongInteractionKind {
                expected,
                got,
            } => write!(f, "Expected a {expected:?} interaction, got {got:?}."),
        }
    }
}

impl StdError for Error {}
