//! Cadence is a Rust library for Discord interactions and slash commands.
//!
//! The library receives interactions from whatever gateway or webhook layer you run, tracks how
//! each one has been answered, and routes slash commands, auto-completion requests, component
//! clicks and form submissions to the handlers you register with the [`SlashFramework`].
//!
//! Every interaction may receive exactly one first response. The state of that response lives in
//! the [`InteractionHandle`]'s [`ResponseFlags`], which are only ever changed through an
//! [`InteractionResponseContext`]. Response attempts against the same interaction are serialized
//! by the handle's [`AsyncTaskGuard`], so a background acknowledgement and the command's real
//! response can never race each other.
//!
//! The network calls themselves are not part of this crate. Implement [`InteractionHttp`] on top of
//! your REST client and hand it to the [`Client`].
//!
//! # Installation
//!
//! Add the following to your `Cargo.toml` file:
//!
//! ```toml
//! [dependencies]
//! cadence = "0.1"
//! ```
//!
//! [`SlashFramework`]: crate::framework::slash::SlashFramework
//! [`InteractionHandle`]: crate::interaction::InteractionHandle
//! [`ResponseFlags`]: crate::model::application::ResponseFlags
//! [`InteractionResponseContext`]: crate::interaction::InteractionResponseContext
//! [`AsyncTaskGuard`]: crate::interaction::AsyncTaskGuard
//! [`InteractionHttp`]: crate::http::InteractionHttp
//! [`Client`]: crate::client::Client
#![doc(html_root_url = "https://docs.rs/cadence/*")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![warn(
    unused,
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::clone_on_ref_ptr,
    clippy::non_ascii_literal,
    clippy::fallible_impl_from,
    clippy::let_underscore_must_use,
    clippy::format_push_string,
    clippy::pedantic
)]
#![allow(
    // Allowed as they are too pedantic
    clippy::module_name_repetitions,
    clippy::unreadable_literal,
    clippy::wildcard_imports,
    clippy::too_many_lines,
    clippy::doc_markdown,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

#[macro_use]
extern crate serde;

#[macro_use]
mod internal;

pub mod builder;
pub mod client;
pub mod constants;
#[cfg(feature = "framework")]
pub mod framework;
pub mod http;
pub mod interaction;
pub mod model;
pub mod prelude;

mod error;

pub use crate::client::Client;
pub use crate::error::{Error, Result};

/// Special module that re-exports most public items from this crate.
///
/// Useful, because you don't have to remember the full paths of cadence items.
pub mod all {
    #[doc(no_inline)]
    pub use crate::builder::*;
    #[doc(no_inline)]
    pub use crate::client::*;
    #[doc(no_inline)]
    pub use crate::constants::*;
    #[cfg(feature = "framework")]
    #[doc(no_inline)]
    pub use crate::framework::{slash::*, Framework};
    #[doc(no_inline)]
    pub use crate::http::*;
    #[doc(no_inline)]
    pub use crate::interaction::*;
    #[doc(no_inline)]
    pub use crate::{async_trait, model::prelude::*, Error, Result};
}

// Re-exports of crates used internally which are already publically exposed.
pub use async_trait::async_trait;
pub use {futures, nonmax};
