//! Models about application commands and the interactions invoking them.

mod command;
pub use command::*;
mod command_interaction;
pub use command_interaction::*;
mod component_interaction;
pub use component_interaction::*;
mod interaction;
pub use interaction::*;
mod modal_interaction;
pub use modal_interaction::*;
mod response_flags;
pub use response_flags::*;
