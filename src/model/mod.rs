//! Mappings of objects received from the API.
//!
//! Only the parts of Discord's payloads that the interaction machinery consumes are modelled here:
//! the interaction itself, its command, component and modal data, and the few entities those
//! reference. Everything else is kept as raw JSON.

pub mod application;
pub mod channel;
pub mod id;
pub mod prelude;
pub mod user;

mod error;

pub use self::error::Error as ModelError;
