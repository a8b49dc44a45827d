//! A set of exports which can be helpful to use.
//!
//! Note that the `CadenceError` re-export is equivalent to [`cadence::Error`], although is
//! re-exported as a separate name to remove likely ambiguity with other crate error enums.
//!
//! # Examples
//!
//! Import all of the exports:
//!
//! ```rust
//! use cadence::prelude::*;
//! ```
//!
//! [`cadence::Error`]: crate::Error

pub use tokio::sync::{Mutex, RwLock};
pub use typemap_rev::{TypeMap, TypeMapKey};

pub use crate::client::{Client, ClientBuilder};
pub use crate::error::Error as CadenceError;
#[cfg(feature = "framework")]
pub use crate::framework::{
    slash::{
        CommandCategory,
        CommandFunction,
        ComponentCommand,
        Invocation,
        ParameterConverter,
        Response,
        ResponseStream,
        SlashCommand,
        SlashFramework,
    },
    Framework,
};
pub use crate::http::{HttpError, InteractionHttp};
pub use crate::interaction::InteractionHandle;
pub use crate::model::ModelError;
pub use crate::async_trait;
