//! A set of constants used by the library.

use std::time::Duration;

/// The maximum length of the textual size of an embed.
pub const EMBED_MAX_LENGTH: usize = 6000;
/// The maximum number of embeds in a message.
pub const EMBED_MAX_COUNT: usize = 10;
/// The maximum unicode code points allowed within a message by Discord.
pub const MESSAGE_CODE_LIMIT: usize = 2000;
/// The maximum number of choices an auto-completion response may carry.
pub const AUTOCOMPLETE_CHOICE_LIMIT: usize = 25;
/// The maximum length of an auto-completion choice's name.
pub const AUTOCOMPLETE_CHOICE_NAME_LIMIT: usize = 100;

/// How long an interaction's token may be used to send its first response.
pub const INTERACTION_RESPONSE_WINDOW: Duration = Duration::from_secs(3);
/// How long an interaction's token remains valid once it was acknowledged.
pub const INTERACTION_TOKEN_LIFETIME: Duration = Duration::from_secs(15 * 60);
