use std::error::Error as StdError;
use std::fmt;

/// The JSON body Discord answers a rejected request with.
///
/// [Discord docs](https://discord.com/developers/docs/reference#error-messages).
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct DiscordJsonError {
    /// The error code.
    pub code: isize,
    /// The error message.
    pub message: String,
}

/// A request Discord answered with a non-successful status code.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct ErrorResponse {
    pub status_code: u16,
    pub url: String,
    pub method: &'static str,
    pub error: DiscordJsonError,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(status_code: u16, method: &'static str, url: impl Into<String>) -> Self {
        Self {
            status_code,
            url: url.into(),
            method,
            error: DiscordJsonError::default(),
        }
    }

    /// Sets the decoded error body.
    #[must_use]
    pub fn error(mut self, code: isize, message: impl Into<String>) -> Self {
        self.error = DiscordJsonError {
            code,
            message: message.into(),
        };
        self
    }
}

/// An error reported by an [`InteractionHttp`] implementation.
///
/// [`InteractionHttp`]: super::InteractionHttp
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The request never reached Discord, or its answer never reached us.
    ///
    /// Response sends that fail this way are dropped silently: the interaction most likely
    /// expired or the network is gone, and repeating the request would not help.
    Connection(String),
    /// When a non-successful status code was received for a request.
    UnsuccessfulRequest(ErrorResponse),
}

impl Error {
    /// Returns true when the error is caused by an unsuccessful request
    #[must_use]
    pub fn is_unsuccessful_request(&self) -> bool {
        matches!(self, Self::UnsuccessfulRequest(_))
    }

    /// Returns the status code if the error is an unsuccessful request
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnsuccessfulRequest(res) => Some(res.status_code),
            Self::Connection(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(reason) => write!(f, "Connection failed: {reason}"),
            Self::UnsuccessfulRequest(e) => {
                write!(f, "{} {} failed with {}", e.method, e.url, e.status_code)?;
                if !e.error.message.is_empty() {
                    write!(f, ": {}", e.error.message)?;
                }
                Ok(())
            },
        }
    }
}

impl StdError for Error {}
