//! A framework routing application commands, auto-completion requests, component clicks and form
//! submits to registered handlers.
//!
//! Slash commands form trees: a root [`SlashCommand`] wraps either a single [`CommandFunction`]
//! or a [`CommandCategory`] whose children are further categories or functions, up to the three
//! levels Discord allows. A function declares its [`ParameterConverter`]s, which turn the
//! interaction's options into the handler's [`Argument`]s in declared order.
//!
//! What a handler returns is turned into response calls by the framework: text and embeds create
//! the interaction's response, edit its deferral or follow it up depending on what was already
//! sent, and nothing at all acknowledges the interaction. Handlers answering several times return
//! a [`ResponseStream`].
//!
//! # Examples
//!
//! ```rust
//! use cadence::framework::slash::{
//!     CommandCategory,
//!     CommandFunction,
//!     ParameterConverter,
//!     SlashCommand,
//!     SlashFramework,
//! };
//!
//! let config = CommandCategory::new("config")
//!     .ephemeral(true)
//!     .child(
//!         CommandFunction::new("get", |invocation| async move {
//!             let key = invocation.arg(0).and_then(|arg| arg.as_str()).unwrap_or_default();
//!             Ok(format!("`{key}` is not set").into())
//!         })
//!         .parameter(ParameterConverter::option("key")),
//!     )
//!     .child(CommandFunction::new("reset", |_| async { Ok(().into()) }));
//!
//! let framework = SlashFramework::new().command(SlashCommand::new(config))?;
//! # Ok::<_, cadence::Error>(())
//! ```

mod autocomplete;
mod command;
mod component;
mod configuration;
mod converter;
mod error;
mod response;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace};

pub use self::autocomplete::{AutocompleteResult, Autocompleter};
pub use self::command::{
    CommandCategory,
    CommandFunction,
    CommandNode,
    Invocation,
    SlashCommand,
};
use self::command::{Resolution, Route};
pub use self::component::{ComponentCommand, CustomIdMatcher};
pub use self::configuration::Configuration;
use self::converter::ConversionSource;
pub use self::converter::{Argument, OptionConverter, ParameterConverter, Target};
pub use self::error::{
    CommandError,
    ConversionError,
    DispatchError,
    ErrorContext,
    ErrorHandler,
};
pub use self::response::{
    Abort,
    CommandOutput,
    CommandResult,
    EditTarget,
    Feedback,
    Response,
    ResponseAction,
    ResponseMessage,
    ResponseSender,
    ResponseSequence,
    ResponseStream,
    Step,
};
use self::response::ResponseProcessor;
use super::{Framework, FrameworkError};
use crate::client::Client;
use crate::interaction::InteractionHandle;
use crate::internal::prelude::*;
use crate::model::application::{CommandType, InteractionType};

/// A [`Framework`] dispatching interactions through trees of commands.
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct SlashFramework {
    config: Configuration,
    commands: Vec<SlashCommand>,
    components: Vec<ComponentCommand>,
    forms: Vec<ComponentCommand>,
    error_handlers: Vec<ErrorHandler>,
}

impl SlashFramework {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the framework's [`Configuration`].
    pub fn configure(mut self, config: Configuration) -> Self {
        self.config = config;
        self
    }

    /// Registers a root command.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Framework`] if the command tree is nested too deep, contains siblings or
    /// nodes without a name, or if a root command of the same kind and name is already
    /// registered.
    pub fn command(mut self, command: SlashCommand) -> Result<Self> {
        command.validate()?;

        let taken = self
            .commands
            .iter()
            .any(|other| other.kind() == command.kind() && other.name() == command.name());
        if taken {
            return Err(Error::Framework(FrameworkError::DuplicateName {
                parent: String::new(),
                name: command.name().to_owned(),
            }));
        }

        self.commands.push(command);
        Ok(self)
    }

    /// Registers a handler for message component clicks. The first registered command matching
    /// a custom id handles it.
    pub fn component(mut self, command: ComponentCommand) -> Self {
        self.components.push(command);
        self
    }

    /// Registers a handler for form submits. The first registered command matching a custom id
    /// handles it.
    pub fn form(mut self, command: ComponentCommand) -> Self {
        self.forms.push(command);
        self
    }

    /// Adds an error handler asked after those of the failing command and its categories.
    pub fn on_error(mut self, handler: ErrorHandler) -> Self {
        self.error_handlers.push(handler);
        self
    }

    #[must_use]
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    #[must_use]
    pub fn commands(&self) -> &[SlashCommand] {
        &self.commands
    }

    fn find_command(&self, name: &str, kind: CommandType) -> Option<&SlashCommand> {
        self.commands.iter().find(|command| command.kind() == kind && command.name() == name)
    }

    /// Resolves an application command interaction to its handler and runs it.
    #[cfg_attr(
        feature = "tracing_instrument",
        tracing::instrument(skip_all, fields(interaction = %handle.id()))
    )]
    pub async fn dispatch_command(&self, client: &Client, handle: &Arc<InteractionHandle>) {
        let Some(data) = handle.interaction().command_data() else {
            return;
        };

        let Some(command) = self.find_command(&data.name, data.kind) else {
            debug!("No command `{}` ({:?}) registered", data.name, data.kind);
            return;
        };

        match command.resolve(&data.options) {
            Resolution::Found(route) => self.invoke(client, handle, &route, HashMap::new()).await,
            Resolution::Failed(route, why) => self.report(client, handle, &route, why.into()).await,
            Resolution::Nothing => {
                trace!("Command `{}` named no single sub-command", data.name);
            },
        }
    }

    /// Resolves an auto-completion interaction to the auto-completer of its focused option and
    /// sends the suggestions. Does nothing if no command or auto-completer matches.
    #[cfg_attr(
        feature = "tracing_instrument",
        tracing::instrument(skip_all, fields(interaction = %handle.id()))
    )]
    pub async fn dispatch_autocomplete(&self, client: &Client, handle: &Arc<InteractionHandle>) {
        let Some(data) = handle.interaction().command_data() else {
            return;
        };
        let Some(focused) = data.autocomplete() else {
            return;
        };
        let Some(command) = self.find_command(&data.name, data.kind) else {
            return;
        };
        let Resolution::Found(route) = command.resolve(&data.options) else {
            return;
        };
        let Some(autocompleter) = route.autocompleter(focused.name) else {
            trace!("No auto-completer for `{}` of `{}`", focused.name, route.qualified_name());
            return;
        };

        let source = ConversionSource::new(client, handle).options(route.options);
        let args = match source.convert_all(autocompleter.get_parameters()) {
            Ok(args) => args,
            Err(why) => return self.report(client, handle, &route, why.into()).await,
        };

        let invocation = Invocation::new(
            client.clone(),
            Arc::clone(handle),
            args,
            false,
            self.config.response_timeout,
        );

        let result = match autocompleter.call(invocation).await {
            Ok(choices) => {
                match client.interaction_application_command_autocomplete(handle, choices).await {
                    Err(why) if why.is_connection_error() => {
                        debug!("Failed to send suggestions for interaction {}: {why}", handle.id());
                        Ok(())
                    },
                    result => result.map_err(DispatchError::Response),
                }
            },
            Err(why) => Err(DispatchError::Command(why)),
        };

        if let Err(why) = result {
            self.report(client, handle, &route, why).await;
        }
    }

    /// Runs the first component command matching the interaction's custom id.
    #[cfg_attr(
        feature = "tracing_instrument",
        tracing::instrument(skip_all, fields(interaction = %handle.id()))
    )]
    pub async fn dispatch_component(&self, client: &Client, handle: &Arc<InteractionHandle>) {
        self.dispatch_custom_id(&self.components, client, handle).await;
    }

    /// Runs the first form command matching the submitted form's custom id.
    #[cfg_attr(
        feature = "tracing_instrument",
        tracing::instrument(skip_all, fields(interaction = %handle.id()))
    )]
    pub async fn dispatch_form(&self, client: &Client, handle: &Arc<InteractionHandle>) {
        self.dispatch_custom_id(&self.forms, client, handle).await;
    }

    async fn dispatch_custom_id(
        &self,
        commands: &[ComponentCommand],
        client: &Client,
        handle: &Arc<InteractionHandle>,
    ) {
        let Some(custom_id) = handle.interaction().custom_id() else {
            return;
        };

        let found = commands.iter().find_map(|command| {
            command.matcher().captures(custom_id).map(|groups| (command, groups))
        });
        let Some((command, groups)) = found else {
            debug!("No handler for custom id `{custom_id}`");
            return;
        };

        let route = Route::for_function(command.function());
        self.invoke(client, handle, &route, groups).await;
    }

    async fn invoke(
        &self,
        client: &Client,
        handle: &Arc<InteractionHandle>,
        route: &Route<'_>,
        groups: HashMap<String, String>,
    ) {
        let Some(function) = route.function else {
            return;
        };

        let ephemeral = route.ephemeral().unwrap_or(self.config.default_ephemeral);
        let args = {
            let source = ConversionSource::new(client, handle).options(route.options).groups(groups);
            source.convert_all(function.get_parameters())
        };

        let result = match args {
            Ok(args) => {
                trace!("Running `{}` for interaction {}", route.qualified_name(), handle.id());
                let invocation = Invocation::new(
                    client.clone(),
                    Arc::clone(handle),
                    args,
                    ephemeral,
                    self.config.response_timeout,
                );
                let output = function.call(invocation).await;

                let processor = ResponseProcessor {
                    client,
                    handle,
                    ephemeral,
                    content_limit: self.config.content_limit,
                };
                processor.process(output).await
            },
            Err(why) => Err(why.into()),
        };

        if let Err(why) = result {
            self.report(client, handle, route, why).await;
        }
    }

    async fn report(
        &self,
        client: &Client,
        handle: &Arc<InteractionHandle>,
        route: &Route<'_>,
        error: DispatchError,
    ) {
        let context = ErrorContext {
            client: client.clone(),
            handle: Arc::clone(handle),
            command: route.qualified_name(),
            error,
        };

        let handlers = route.error_handlers().chain(&self.error_handlers).cloned().collect();
        error::report(handlers, context).await;
    }
}

#[async_trait]
impl Framework for SlashFramework {
    async fn dispatch(&self, client: Client, handle: Arc<InteractionHandle>) {
        match handle.kind() {
            InteractionType::Command => self.dispatch_command(&client, &handle).await,
            InteractionType::Autocomplete => self.dispatch_autocomplete(&client, &handle).await,
            InteractionType::Component => self.dispatch_component(&client, &handle).await,
            InteractionType::Modal => self.dispatch_form(&client, &handle).await,
            kind => debug!("Ignoring interaction {} of kind {:?}", handle.id(), kind),
        }
    }

    fn release_on_completion(&self) -> bool {
        self.config.release_on_completion
    }
}
