use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

#[cfg(feature = "framework")]
use crate::framework::FrameworkError;
use crate::http::HttpError;
use crate::internal::prelude::*;
use crate::model::ModelError;

/// The common result type between most library functions.
///
/// The library exposes functions which, for a result type, exposes only one type, rather than the
/// usual 2 (`Result<T, Error>`). This is because all functions that return a result return
/// cadence's [`Error`], so this is implied, and a "simpler" result is used.
pub type Result<T, E = Error> = StdResult<T, E>;

/// A common error enum returned by most of the library's functionality within a custom
/// [`Result`].
///
/// The most common error types, the [`HttpError`] and [`ModelError`] enums, are both wrapped
/// around this in the form of the [`Self::Http`] and [`Self::Model`] variants.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// An error returned by an [`InteractionHttp`] implementation.
    ///
    /// [`InteractionHttp`]: crate::http::InteractionHttp
    Http(HttpError),
    /// An error from the `serde_json` crate.
    Json(serde_json::Error),
    /// An error from the [`model`] module.
    ///
    /// [`model`]: crate::model
    Model(ModelError),
    /// An error raised while registering commands with the framework.
    #[cfg(feature = "framework")]
    Framework(FrameworkError),
    /// A wait on an interaction did not finish within the given duration.
    Timeout(Duration),
}

impl Error {
    /// Whether this error is a transport level failure, meaning the request never reached Discord
    /// or its answer never reached us.
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Http(HttpError::Connection(_)))
    }
}

impl From<HttpError> for Error {
    fn from(e: HttpError) -> Error {
        Error::Http(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Json(e)
    }
}

impl From<ModelError> for Error {
    fn from(e: ModelError) -> Error {
        Error::Model(e)
    }
}

#[cfg(feature = "framework")]
impl From<FrameworkError> for Error {
    fn from(e: FrameworkError) -> Error {
        Error::Framework(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(inner) => fmt::Display::fmt(&inner, f),
            Self::Json(inner) => fmt::Display::fmt(&inner, f),
            Self::Model(inner) => fmt::Display::fmt(&inner, f),
            #[cfg(feature = "framework")]
            Self::Framework(inner) => fmt::Display::fmt(&inner, f),
            Self::Timeout(duration) => write!(f, "Timed out after {duration:?}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Http(inner) => Some(inner),
            Self::Json(inner) => Some(inner),
            Self::Model(inner) => Some(inner),
            #[cfg(feature = "framework")]
            Self::Framework(inner) => Some(inner),
            Self::Timeout(_) => None,
        }
    }
}
