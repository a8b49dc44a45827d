use std::time::Duration;

use crate::constants::MESSAGE_CODE_LIMIT;

/// The configuration of a [`SlashFramework`].
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
///
/// use cadence::framework::slash::{Configuration, SlashFramework};
///
/// let framework = SlashFramework::new().configure(
///     Configuration::new().default_ephemeral(true).response_timeout(Duration::from_secs(30)),
/// );
/// ```
///
/// [`SlashFramework`]: super::SlashFramework
#[derive(Clone, Debug)]
#[must_use]
pub struct Configuration {
    pub(crate) content_limit: usize,
    pub(crate) response_timeout: Duration,
    pub(crate) release_on_completion: bool,
    pub(crate) default_ephemeral: bool,
}

impl Configuration {
    /// Alias for Configuration::default
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of characters responses converted from arbitrary values are truncated to.
    ///
    /// **Note**: Defaults to 2000, Discord's limit.
    pub fn content_limit(mut self, content_limit: usize) -> Self {
        self.content_limit = content_limit;
        self
    }

    /// How long [`Invocation::response_message`] waits for the first response's message.
    ///
    /// **Note**: Defaults to 15 seconds.
    ///
    /// [`Invocation::response_message`]: super::Invocation::response_message
    pub fn response_timeout(mut self, response_timeout: Duration) -> Self {
        self.response_timeout = response_timeout;
        self
    }

    /// Whether an interaction's handle is released from the client's registry once its dispatch
    /// finished. Disable this to keep handles around until they expire, for example to keep
    /// answering an interaction from outside its handler.
    ///
    /// **Note**: Defaults to `true`.
    pub fn release_on_completion(mut self, release_on_completion: bool) -> Self {
        self.release_on_completion = release_on_completion;
        self
    }

    /// Whether responses are only shown to the invoking user, unless a command or one of its
    /// categories says otherwise.
    ///
    /// **Note**: Defaults to `false`.
    pub fn default_ephemeral(mut self, default_ephemeral: bool) -> Self {
        self.default_ephemeral = default_ephemeral;
        self
    }

    #[must_use]
    pub fn get_content_limit(&self) -> usize {
        self.content_limit
    }

    #[must_use]
    pub fn get_response_timeout(&self) -> Duration {
        self.response_timeout
    }
}

impl Default for Configuration {
    /// Builds a default framework configuration, setting the following:
    ///
    /// - **content_limit** to 2000
    /// - **response_timeout** to 15 seconds
    /// - **release_on_completion** to `true`
    /// - **default_ephemeral** to `false`
    fn default() -> Self {
        Self {
            content_limit: MESSAGE_CODE_LIMIT,
            response_timeout: Duration::from_secs(15),
            release_on_completion: true,
            default_ephemeral: false,
        }
    }
}
