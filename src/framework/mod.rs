//! The framework is a customizable method of routing received interactions to the code handling
//! them.
//!
//! A framework is handed every interaction the [`Client`] receives, together with the handle
//! tracking its response. The library ships the [`SlashFramework`], which routes application
//! commands through a tree of commands and categories, auto-completion requests to per-parameter
//! auto-completers, and component clicks and form submits to handlers matched by custom id.
//!
//! Implement [`Framework`] yourself if you need a different routing scheme:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use cadence::framework::Framework;
//! use cadence::interaction::InteractionHandle;
//! use cadence::{async_trait, Client};
//!
//! struct Acknowledger;
//!
//! #[async_trait]
//! impl Framework for Acknowledger {
//!     async fn dispatch(&self, client: Client, handle: Arc<InteractionHandle>) {
//!         let _ = client.interaction_acknowledge(&handle, false, true).await;
//!     }
//! }
//! ```
//!
//! [`Client`]: crate::Client
//! [`SlashFramework`]: slash::SlashFramework

pub mod slash;

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::client::Client;
use crate::interaction::InteractionHandle;

/// A framework receiving every interaction the [`Client`] handles.
#[async_trait]
pub trait Framework: Send + Sync {
    /// Routes the interaction to its handler.
    ///
    /// Never fails: errors are expected to be reported by the framework itself.
    async fn dispatch(&self, client: Client, handle: Arc<InteractionHandle>);

    /// Whether the [`Client`] releases the interaction's handle from its registry once
    /// [`Self::dispatch`] returned.
    fn release_on_completion(&self) -> bool {
        true
    }
}

#[async_trait]
impl<F> Framework for Arc<F>
where
    F: Framework + ?Sized,
{
    async fn dispatch(&self, client: Client, handle: Arc<InteractionHandle>) {
        (**self).dispatch(client, handle).await;
    }

    fn release_on_completion(&self) -> bool {
        (**self).release_on_completion()
    }
}

/// An error raised while registering handlers with a framework.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum FrameworkError {
    /// A command is nested deeper than Discord allows: a root command, one level of categories
    /// and one level of sub-commands.
    NestingTooDeep {
        /// The qualified name of the node that is too deep.
        name: String,
        /// Its depth, the root command being `1`.
        depth: usize,
    },
    /// Two siblings, or two root commands of the same kind, share a name.
    DuplicateName {
        /// The qualified name of the parent, empty for root commands.
        parent: String,
        /// The shared name.
        name: String,
    },
    /// A command or category has an empty name.
    EmptyName,
    /// A custom id pattern failed to compile.
    InvalidPattern(String),
}

impl fmt::Display for FrameworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NestingTooDeep {
                name,
                depth,
            } => write!(f, "Command `{name}` is nested {depth} levels deep, at most 3 are allowed"),
            Self::DuplicateName {
                parent,
                name,
            } if parent.is_empty() => write!(f, "Command `{name}` is registered twice"),
            Self::DuplicateName {
                parent,
                name,
            } => write!(f, "`{parent}` has two children named `{name}`"),
            Self::EmptyName => f.write_str("Command names must not be empty"),
            Self::InvalidPattern(why) => write!(f, "Invalid custom id pattern: {why}"),
        }
    }
}

impl StdError for FrameworkError {}
