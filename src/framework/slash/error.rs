use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tracing::{error, trace};

use crate::client::Client;
use crate::interaction::InteractionHandle;
use crate::internal::prelude::*;

/// The error type returned by command handlers.
pub type CommandError = Box<dyn StdError + Send + Sync>;

/// An error producing one of a command's arguments, or finding the command at all.
#[derive(Debug)]
#[non_exhaustive]
pub enum ConversionError {
    /// A category has no child with the name the interaction asked for.
    UnknownSubCommand {
        /// The name the interaction asked for.
        name: String,
        /// The names of the category's children, in registration order.
        valid: Vec<String>,
    },
    /// A required option was not sent.
    MissingOption {
        /// The option's name.
        parameter: String,
    },
    /// An option's converter rejected its value.
    InvalidValue {
        /// The option's name.
        parameter: String,
        /// The value as sent by Discord.
        value: Option<Value>,
        /// Why the converter rejected it.
        reason: CommandError,
    },
    /// The command was not invoked from a context menu, or its target was not resolved.
    MissingTarget,
    /// A value taken from the interaction itself, like a custom id group or a form field, is
    /// missing.
    MissingValue {
        /// The name of the group or field, or `"autocomplete"` for the focused option.
        parameter: String,
    },
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSubCommand {
                name,
                valid,
            } => write!(f, "Unknown sub-command `{name}`, expected one of {valid:?}"),
            Self::MissingOption {
                parameter,
            } => write!(f, "Missing required option `{parameter}`"),
            Self::InvalidValue {
                parameter,
                value,
                reason,
            } => match value {
                Some(value) => write!(f, "Invalid value {value} for `{parameter}`: {reason}"),
                None => write!(f, "Invalid value for `{parameter}`: {reason}"),
            },
            Self::MissingTarget => f.write_str("The command has no resolved target"),
            Self::MissingValue {
                parameter,
            } => write!(f, "Missing value for `{parameter}`"),
        }
    }
}

impl StdError for ConversionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::InvalidValue {
                reason, ..
            } => Some(&**reason),
            _ => None,
        }
    }
}

/// An error surfacing while dispatching an interaction to its handler.
#[derive(Debug)]
#[non_exhaustive]
pub enum DispatchError {
    /// The handler, or one of its arguments, could not be resolved.
    Conversion(ConversionError),
    /// The handler returned an error.
    Command(CommandError),
    /// Sending the handler's response failed for a reason other than the connection.
    Response(Error),
}

impl From<ConversionError> for DispatchError {
    fn from(e: ConversionError) -> Self {
        Self::Conversion(e)
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conversion(inner) => fmt::Display::fmt(inner, f),
            Self::Command(inner) => fmt::Display::fmt(inner, f),
            Self::Response(inner) => write!(f, "Failed to send response: {inner}"),
        }
    }
}

impl StdError for DispatchError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Conversion(inner) => Some(inner),
            Self::Command(inner) => Some(&**inner),
            Self::Response(inner) => Some(inner),
        }
    }
}

/// What an [`ErrorHandler`] is told about a failed dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub struct ErrorContext {
    pub client: Client,
    pub handle: Arc<InteractionHandle>,
    /// The qualified name of the node the error surfaced at, like `"config set"`.
    pub command: String,
    pub error: DispatchError,
}

type ErrorFn = dyn Fn(Arc<ErrorContext>) -> BoxFuture<'static, bool> + Send + Sync;

/// A function handling dispatch errors.
///
/// Handlers are asked in order: the failing command's own, those of its enclosing categories
/// from the innermost outwards, and finally the framework's. The first handler returning `true`
/// consumes the error. A handler may answer the interaction through [`ErrorContext::client`].
#[derive(Clone)]
pub struct ErrorHandler(Arc<ErrorFn>);

impl ErrorHandler {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Arc<ErrorContext>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        Self(Arc::new(move |context| f(context).boxed()))
    }

    pub async fn call(&self, context: Arc<ErrorContext>) -> bool {
        (self.0)(context).await
    }
}

impl fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErrorHandler")
    }
}

/// Offers the error to `handlers` in order, logging it if none consumes it.
pub(crate) async fn report(handlers: Vec<ErrorHandler>, context: ErrorContext) -> bool {
    let context = Arc::new(context);

    for handler in handlers {
        if handler.call(Arc::clone(&context)).await {
            trace!("Error in `{}` consumed by a handler", context.command);
            return true;
        }
    }

    error!(
        "Unhandled error in `{}` for interaction {}: {}",
        context.command,
        context.handle.id(),
        context.error
    );
    false
}
