//! The Client contains information about the application and is the entry point for received
//! interactions.
//!
//! A [`Client`] bundles the [`InteractionHttp`] implementation used to answer interactions, the
//! [`InteractionRegistry`] owning the handles of the interactions in flight, user data shared
//! between command invocations and, optionally, a [`Framework`] the interactions are routed to.
//!
//! Hand every interaction you receive to [`Client::handle_interaction`]. Command handlers answer
//! through the `interaction_*` methods, each of which runs its network call inside an
//! [`InteractionResponseContext`] so that the interaction's response state stays consistent.
//!
//! [`Framework`]: crate::framework::Framework

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, trace};
use typemap_rev::{TypeMap, TypeMapKey};

use crate::builder::{
    AutocompleteChoice,
    CreateAutocompleteResponse,
    CreateInteractionResponseMessage,
};
#[cfg(feature = "framework")]
use crate::framework::Framework;
use crate::http::InteractionHttp;
use crate::interaction::{InteractionHandle, InteractionRegistry, InteractionResponseContext};
use crate::internal::prelude::*;
use crate::model::application::{Interaction, InteractionType};
use crate::model::channel::Message;
use crate::model::id::{ApplicationId, MessageId};
use crate::model::ModelError;

/// A builder for the [`Client`].
#[must_use]
pub struct ClientBuilder {
    application_id: ApplicationId,
    http: Arc<dyn InteractionHttp>,
    data: TypeMap,
    #[cfg(feature = "framework")]
    framework: Option<Arc<dyn Framework>>,
}

impl ClientBuilder {
    pub fn new(application_id: ApplicationId, http: impl InteractionHttp + 'static) -> Self {
        Self::new_with_http(application_id, Arc::new(http))
    }

    /// Construct a new builder from an already shared [`InteractionHttp`] implementation.
    pub fn new_with_http(application_id: ApplicationId, http: Arc<dyn InteractionHttp>) -> Self {
        Self {
            application_id,
            http,
            data: TypeMap::new(),
            #[cfg(feature = "framework")]
            framework: None,
        }
    }

    /// Sets the entire [`TypeMap`] that will be available in [`Client::data`]. A [`TypeMap`] must
    /// not be constructed manually: [`Self::type_map_insert`] can be used to insert one type at a
    /// time.
    pub fn type_map(mut self, type_map: TypeMap) -> Self {
        self.data = type_map;
        self
    }

    /// Insert a single `value` into the internal [`TypeMap`] that will be available in
    /// [`Client::data`]. This method can be called multiple times in order to populate the
    /// [`TypeMap`] with `value`s.
    pub fn type_map_insert<T: TypeMapKey>(mut self, value: T::Value) -> Self {
        self.data.insert::<T>(value);
        self
    }

    /// Sets the framework received interactions are routed to.
    #[cfg(feature = "framework")]
    pub fn framework<F>(mut self, framework: F) -> Self
    where
        F: Framework + 'static,
    {
        self.framework = Some(Arc::new(framework));
        self
    }

    pub fn build(self) -> Client {
        Client {
            data: Arc::new(RwLock::new(self.data)),
            application_id: self.application_id,
            http: self.http,
            registry: Arc::new(InteractionRegistry::new()),
            #[cfg(feature = "framework")]
            framework: self.framework,
        }
    }
}

/// The entry point for received interactions and the guarded way to answer them.
///
/// Cloning a client is cheap; every clone shares the same registry, data and framework.
#[derive(Clone)]
pub struct Client {
    /// A TypeMap which requires types to be Send + Sync. This is a map that can be safely shared
    /// across command invocations.
    ///
    /// The purpose of the data field is to be accessible and persistent across invocations; that
    /// is, data can be modified by one command, and will persist through the future and be
    /// accessible through others. This is useful for anything that should "live" through the
    /// program: counters, database connections, custom user caches, etc.
    pub data: Arc<RwLock<TypeMap>>,
    application_id: ApplicationId,
    http: Arc<dyn InteractionHttp>,
    registry: Arc<InteractionRegistry>,
    #[cfg(feature = "framework")]
    framework: Option<Arc<dyn Framework>>,
}

impl Client {
    pub fn builder(
        application_id: ApplicationId,
        http: impl InteractionHttp + 'static,
    ) -> ClientBuilder {
        ClientBuilder::new(application_id, http)
    }

    #[must_use]
    pub fn application_id(&self) -> ApplicationId {
        self.application_id
    }

    #[must_use]
    pub fn http(&self) -> &Arc<dyn InteractionHttp> {
        &self.http
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<InteractionRegistry> {
        &self.registry
    }

    /// Processes a received interaction in a new task.
    ///
    /// The interaction is registered, re-using the handle of an earlier delivery of the same
    /// interaction, and routed to the framework. Once the framework returns, the handle is
    /// released from the registry unless the framework asks to keep it.
    pub fn handle_interaction(&self, interaction: Interaction) -> JoinHandle<()> {
        let handle = self.registry.register(interaction);
        let client = self.clone();

        tokio::spawn(async move {
            trace!("Handling interaction {} ({:?})", handle.id(), handle.kind());
            let release = client.dispatch(&handle).await;

            if release {
                client.registry.release(handle.id());
            }
        })
    }

    #[cfg(feature = "framework")]
    async fn dispatch(&self, handle: &Arc<InteractionHandle>) -> bool {
        if handle.kind() == InteractionType::Ping {
            return true;
        }

        match &self.framework {
            Some(framework) => {
                framework.dispatch(self.clone(), Arc::clone(handle)).await;
                framework.release_on_completion()
            },
            None => {
                debug!("No framework set, dropping interaction {}", handle.id());
                true
            },
        }
    }

    #[cfg(not(feature = "framework"))]
    #[allow(clippy::unused_async)]
    async fn dispatch(&self, handle: &Arc<InteractionHandle>) -> bool {
        debug!("No framework set, dropping interaction {} ({:?})", handle.id(), handle.kind());
        true
    }

    /// Acknowledges the interaction, telling Discord a response will follow.
    ///
    /// Does nothing if the interaction was already acknowledged or answered. If `wait` is false
    /// the request is sent by a background task and the call returns as soon as it started;
    /// later response attempts wait for it.
    pub async fn interaction_acknowledge(
        &self,
        handle: &Arc<InteractionHandle>,
        ephemeral: bool,
        wait: bool,
    ) -> Result<()> {
        let http = Arc::clone(&self.http);
        let interaction_handle = Arc::clone(handle);
        let send = async move {
            http.send_deferred_acknowledgement(interaction_handle.interaction(), ephemeral).await
        };

        self.run_deferring(handle, ephemeral, wait, send).await
    }

    /// Acknowledges a component interaction or form submit without changing the message.
    ///
    /// Does nothing if the interaction was already acknowledged or answered.
    pub async fn interaction_component_acknowledge(
        &self,
        handle: &Arc<InteractionHandle>,
        wait: bool,
    ) -> Result<()> {
        let http = Arc::clone(&self.http);
        let interaction_handle = Arc::clone(handle);
        let send = async move {
            http.send_component_acknowledgement(interaction_handle.interaction()).await
        };

        self.run_deferring(handle, false, wait, send).await
    }

    async fn run_deferring<F>(
        &self,
        handle: &Arc<InteractionHandle>,
        ephemeral: bool,
        wait: bool,
        send: F,
    ) -> Result<()>
    where
        F: std::future::Future<Output = Result<()>> + Send + 'static,
    {
        let mut context = InteractionResponseContext::new(Arc::clone(handle), true, ephemeral);

        if wait {
            context.acquire(send).await?;
        } else {
            handle
                .guard()
                .ensure(async move { context.acquire(send).await.map(|_| ()) })
                .await;
        }

        Ok(())
    }

    /// Sends the first response of the interaction.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::AlreadyResponded`] if a first response was already sent, or is being
    /// sent, and a [`ModelError`] if the content exceeds Discord's limits.
    pub async fn interaction_response_message_create(
        &self,
        handle: &Arc<InteractionHandle>,
        content: &CreateInteractionResponseMessage,
    ) -> Result<Option<Message>> {
        content.check_lengths()?;

        let mut context =
            InteractionResponseContext::new(Arc::clone(handle), false, content.is_ephemeral());
        let message = context
            .acquire(self.http.send_first_response(handle.interaction(), content))
            .await?
            .ok_or(Error::Model(ModelError::AlreadyResponded))?;

        Ok(publish(handle, message))
    }

    /// Answers a component interaction by editing the message the component is attached to.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::WrongInteractionKind`] for other interactions and
    /// [`ModelError::AlreadyResponded`] if a first response was already sent.
    pub async fn interaction_component_message_edit(
        &self,
        handle: &Arc<InteractionHandle>,
        content: &CreateInteractionResponseMessage,
    ) -> Result<Option<Message>> {
        if !matches!(handle.kind(), InteractionType::Component | InteractionType::Modal) {
            return Err(Error::Model(ModelError::WrongInteractionKind {
                expected: InteractionType::Component,
                got: handle.kind(),
            }));
        }
        content.check_lengths()?;

        let mut context = InteractionResponseContext::new(Arc::clone(handle), false, false);
        let message = context
            .acquire(self.http.update_component_message(handle.interaction(), content))
            .await?
            .ok_or(Error::Model(ModelError::AlreadyResponded))?;

        Ok(publish(handle, message))
    }

    /// Edits the original response of the interaction. Replaces the loading state if the
    /// interaction was deferred.
    pub async fn interaction_response_message_edit(
        &self,
        handle: &Arc<InteractionHandle>,
        content: &CreateInteractionResponseMessage,
    ) -> Result<Option<Message>> {
        content.check_lengths()?;

        let mut context = InteractionResponseContext::new(Arc::clone(handle), false, false);
        let message = context
            .scope(self.http.edit_deferred_response(handle.interaction(), content))
            .await?;

        Ok(publish(handle, message))
    }

    /// Sends a followup message.
    ///
    /// The first followup of a deferred interaction replaces its loading state, so it counts as
    /// the first response.
    pub async fn interaction_followup_message_create(
        &self,
        handle: &Arc<InteractionHandle>,
        content: &CreateInteractionResponseMessage,
    ) -> Result<Option<Message>> {
        content.check_lengths()?;

        let ephemeral = content.is_ephemeral();
        let mut context = InteractionResponseContext::new(Arc::clone(handle), false, ephemeral);
        let message = context
            .scope(self.http.send_followup(handle.interaction(), content, ephemeral))
            .await?;

        if context.acquired() {
            return Ok(publish(handle, message));
        }

        Ok(message)
    }

    /// Edits a followup message.
    pub async fn interaction_followup_message_edit(
        &self,
        handle: &Arc<InteractionHandle>,
        message_id: MessageId,
        content: &CreateInteractionResponseMessage,
    ) -> Result<Option<Message>> {
        content.check_lengths()?;

        let mut context = InteractionResponseContext::new(Arc::clone(handle), false, false);
        context.scope(self.http.edit_followup(handle.interaction(), message_id, content)).await
    }

    /// Answers an auto-completion interaction. Only the first 25 choices are sent.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::WrongInteractionKind`] for other interactions and
    /// [`ModelError::AlreadyResponded`] if the interaction was already answered.
    pub async fn interaction_application_command_autocomplete(
        &self,
        handle: &Arc<InteractionHandle>,
        choices: impl IntoIterator<Item = AutocompleteChoice>,
    ) -> Result<()> {
        if handle.kind() != InteractionType::Autocomplete {
            return Err(Error::Model(ModelError::WrongInteractionKind {
                expected: InteractionType::Autocomplete,
                got: handle.kind(),
            }));
        }

        let response = CreateAutocompleteResponse::new().set_choices(choices);
        let mut context = InteractionResponseContext::new(Arc::clone(handle), false, false);

        context
            .acquire(self.http.send_autocomplete_result(handle.interaction(), &response))
            .await?
            .ok_or(Error::Model(ModelError::AlreadyResponded))
    }
}

fn publish(handle: &InteractionHandle, message: Option<Message>) -> Option<Message> {
    if let Some(message) = &message {
        handle.set_response_message(message.clone());
    }

    message
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("application_id", &self.application_id)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
