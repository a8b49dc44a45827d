//! Turning what command handlers return into responses.
//!
//! A handler either returns a single [`Response`], or a [`ResponseStream`] yielding several of
//! them, each answered according to how far the interaction got at that point: the first one
//! becomes the interaction's response, later ones become followups. Returning an [`Abort`] error,
//! or yielding [`Step::Final`], ends the handler with the response it carries.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

use super::error::{CommandError, DispatchError};
use crate::builder::{CreateEmbed, CreateInteractionResponseMessage};
use crate::client::Client;
use crate::interaction::InteractionHandle;
use crate::internal::prelude::*;
use crate::model::application::{InteractionType, ResponseFlags};
use crate::model::channel::Message;
use crate::model::id::MessageId;

/// What a command handler returns.
pub type CommandResult = StdResult<CommandOutput, CommandError>;

/// The outcome of sending a yielded response, handed back to the [`ResponseSequence`].
///
/// Connection failures never show up here: they are logged and reported as `Ok(None)`.
pub type Feedback = Result<Option<Message>>;

/// A single response value.
#[derive(Clone, Debug, Default)]
#[non_exhaustive]
pub enum Response {
    /// Nothing to show. Acknowledges the interaction if it is still unanswered.
    #[default]
    None,
    /// Message content, sent as it is.
    Text(String),
    /// Text converted from an arbitrary value, truncated to the configured content limit.
    Coerced(String),
    Embeds(Vec<CreateEmbed>),
    /// A fully specified message.
    Message(ResponseMessage),
}

impl Response {
    /// Converts any displayable value into a response.
    pub fn display(value: impl fmt::Display) -> Self {
        Self::Coerced(value.to_string())
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    fn target(&self) -> Option<&Arc<InteractionHandle>> {
        match self {
            Self::Message(message) => message.handle.as_ref(),
            _ => None,
        }
    }
}

impl From<()> for Response {
    fn from((): ()) -> Self {
        Self::None
    }
}

impl From<String> for Response {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Response {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<CreateEmbed> for Response {
    fn from(embed: CreateEmbed) -> Self {
        Self::Embeds(vec![embed])
    }
}

impl From<Vec<CreateEmbed>> for Response {
    fn from(embeds: Vec<CreateEmbed>) -> Self {
        Self::Embeds(embeds)
    }
}

impl From<ResponseMessage> for Response {
    fn from(message: ResponseMessage) -> Self {
        Self::Message(message)
    }
}

impl From<CreateInteractionResponseMessage> for Response {
    fn from(message: CreateInteractionResponseMessage) -> Self {
        Self::Message(ResponseMessage::new(message))
    }
}

impl<T: Into<Response>> From<Option<T>> for Response {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

/// Which message a [`ResponseMessage`] replaces.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EditTarget {
    /// The interaction's first response.
    Original,
    Followup(MessageId),
}

/// A response stating exactly what to send.
///
/// Unless told to edit a message, it is sent the same way as any other response: as the first
/// response if there is none yet, otherwise as a followup.
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct ResponseMessage {
    message: CreateInteractionResponseMessage,
    ephemeral: Option<bool>,
    edit: Option<EditTarget>,
    handle: Option<Arc<InteractionHandle>>,
}

impl ResponseMessage {
    pub fn new(message: CreateInteractionResponseMessage) -> Self {
        Self {
            message,
            ..Default::default()
        }
    }

    /// Overrides whether the message is only shown to the invoking user.
    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = Some(ephemeral);
        self
    }

    pub fn edit(mut self, target: EditTarget) -> Self {
        self.edit = Some(target);
        self
    }

    /// Answers another interaction instead of the one being handled, like a button click the
    /// handler waited for.
    pub fn respond_to(mut self, handle: Arc<InteractionHandle>) -> Self {
        self.handle = Some(handle);
        self
    }
}

/// Ends a handler early with the carried response.
///
/// Return it as an error from anywhere in a handler, usually through `?`:
///
/// ```rust
/// use cadence::framework::slash::{Abort, CommandResult};
///
/// fn check_owner(is_owner: bool) -> Result<(), Abort> {
///     if is_owner {
///         Ok(())
///     } else {
///         Err(Abort::new("Only the owner may do that."))
///     }
/// }
///
/// fn command(is_owner: bool) -> CommandResult {
///     check_owner(is_owner)?;
///     Ok("Done.".into())
/// }
/// ```
#[derive(Debug)]
pub struct Abort(pub Response);

impl Abort {
    pub fn new(response: impl Into<Response>) -> Self {
        Self(response.into())
    }
}

impl fmt::Display for Abort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Command aborted")
    }
}

impl StdError for Abort {}

/// What a command handler produced.
#[derive(Debug)]
#[non_exhaustive]
pub enum CommandOutput {
    Response(Response),
    Stream(ResponseStream),
}

impl From<ResponseStream> for CommandOutput {
    fn from(stream: ResponseStream) -> Self {
        Self::Stream(stream)
    }
}

macro_rules! output_from_response {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for CommandOutput {
                fn from(value: $ty) -> Self {
                    Self::Response(value.into())
                }
            }
        )*
    };
}

output_from_response!(
    Response,
    (),
    String,
    &str,
    CreateEmbed,
    Vec<CreateEmbed>,
    ResponseMessage,
    CreateInteractionResponseMessage
);

/// One item of a [`ResponseSequence`].
#[derive(Debug)]
#[non_exhaustive]
pub enum Step {
    /// A response to send. The outcome is handed back with the next call to
    /// [`ResponseSequence::next`].
    Yield(Response),
    /// Ends the sequence, answering with the carried response. An empty one still acknowledges an
    /// unanswered interaction, and a failed send is reported like a handler's single response.
    Final(Response),
}

/// A finite sequence of responses, advanced one step at a time.
#[async_trait]
pub trait ResponseSequence: Send {
    /// Produces the next step. `feedback` is the outcome of the previous step, `None` on the first
    /// call. Returning `None` ends the sequence as if it returned [`Step::Final`] with an empty
    /// response, returning an error ends it and reports the error.
    async fn next(&mut self, feedback: Option<Feedback>) -> Option<StdResult<Step, CommandError>>;
}

/// A handler output yielding several responses.
///
/// # Examples
///
/// ```rust
/// use cadence::framework::slash::{CommandResult, ResponseStream};
///
/// fn progress() -> CommandResult {
///     Ok(ResponseStream::new(|responses| async move {
///         responses.send("Working on it...").await?;
///         Ok("Done!".into())
///     })
///     .into())
/// }
/// ```
pub struct ResponseStream(Box<dyn ResponseSequence>);

impl ResponseStream {
    /// Runs `f`, which yields responses through the given [`ResponseSender`] and finally returns
    /// the last one.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: FnOnce(ResponseSender) -> Fut,
        Fut: Future<Output = StdResult<Response, CommandError>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(1);

        Self(Box::new(Generator {
            steps: rx,
            body: Some(
                f(ResponseSender {
                    steps: tx,
                })
                .boxed(),
            ),
            pending: None,
        }))
    }

    /// Sends `steps` in order. A response that fails to send for another reason than the
    /// connection ends the stream with that error.
    pub fn from_steps<I>(steps: I) -> Self
    where
        I: IntoIterator<Item = Step>,
        I::IntoIter: Send + 'static,
    {
        Self(Box::new(Steps(steps.into_iter())))
    }

    pub fn from_sequence(sequence: impl ResponseSequence + 'static) -> Self {
        Self(Box::new(sequence))
    }

    async fn next(&mut self, feedback: Option<Feedback>) -> Option<StdResult<Step, CommandError>> {
        self.0.next(feedback).await
    }
}

impl fmt::Debug for ResponseStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResponseStream")
    }
}

/// Yields responses from inside a [`ResponseStream::new`] body.
#[derive(Debug)]
pub struct ResponseSender {
    steps: mpsc::Sender<(Response, oneshot::Sender<Feedback>)>,
}

impl ResponseSender {
    /// Sends an intermediate response and waits for its outcome.
    pub async fn send(&self, response: impl Into<Response>) -> Feedback {
        let (tx, rx) = oneshot::channel();
        if self.steps.send((response.into(), tx)).await.is_err() {
            return Ok(None);
        }

        rx.await.unwrap_or(Ok(None))
    }
}

struct Generator {
    steps: mpsc::Receiver<(Response, oneshot::Sender<Feedback>)>,
    body: Option<BoxFuture<'static, StdResult<Response, CommandError>>>,
    pending: Option<oneshot::Sender<Feedback>>,
}

#[async_trait]
impl ResponseSequence for Generator {
    async fn next(&mut self, feedback: Option<Feedback>) -> Option<StdResult<Step, CommandError>> {
        if let Some(pending) = self.pending.take() {
            pending.send(feedback.unwrap_or(Ok(None))).ok();
        }

        let body = self.body.as_mut()?;
        let result = tokio::select! {
            biased;
            Some((response, pending)) = self.steps.recv() => {
                self.pending = Some(pending);
                return Some(Ok(Step::Yield(response)));
            },
            result = body => result,
        };

        self.body = None;
        Some(result.map(Step::Final))
    }
}

struct Steps<I>(I);

#[async_trait]
impl<I> ResponseSequence for Steps<I>
where
    I: Iterator<Item = Step> + Send,
{
    async fn next(&mut self, feedback: Option<Feedback>) -> Option<StdResult<Step, CommandError>> {
        if let Some(Err(why)) = feedback {
            return Some(Err(why.into()));
        }

        self.0.next().map(Ok)
    }
}

/// The network call a [`Response`] turns into.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum ResponseAction {
    /// Nothing to send.
    None,
    /// A deferral of an application command.
    Acknowledge { ephemeral: bool },
    /// A deferred update of a component interaction or form submit.
    ComponentAcknowledge,
    /// The interaction's first response.
    Create(CreateInteractionResponseMessage),
    /// An edit of the first response, or of the loading state of a deferral.
    EditOriginal(CreateInteractionResponseMessage),
    Followup(CreateInteractionResponseMessage),
    EditFollowup(MessageId, CreateInteractionResponseMessage),
}

impl ResponseAction {
    /// Decides how to send `response` to an interaction of `kind` whose response state is
    /// `flags`.
    ///
    /// - Empty responses acknowledge an unanswered interaction, and do nothing otherwise.
    /// - Content is sent as the first response if there is none yet. If the interaction was
    ///   deferred, an application command's loading state is replaced, other kinds get a
    ///   followup. Once responded, content becomes a followup.
    /// - [`Response::Coerced`] text is truncated to `content_limit` characters first.
    /// - A [`ResponseMessage`] told to edit a message always does so.
    #[must_use]
    pub fn derive(
        response: Response,
        flags: ResponseFlags,
        kind: InteractionType,
        ephemeral: bool,
        content_limit: usize,
    ) -> Self {
        let message = match response {
            Response::None => return Self::acknowledge(flags, kind, ephemeral),
            Response::Text(text) if text.is_empty() => {
                return Self::acknowledge(flags, kind, ephemeral)
            },
            Response::Text(text) => {
                CreateInteractionResponseMessage::new().content(text).ephemeral(ephemeral)
            },
            Response::Coerced(text) => {
                let text: String = text.chars().take(content_limit).collect();
                if text.is_empty() {
                    return Self::acknowledge(flags, kind, ephemeral);
                }

                CreateInteractionResponseMessage::new().content(text).ephemeral(ephemeral)
            },
            Response::Embeds(embeds) if embeds.is_empty() => {
                return Self::acknowledge(flags, kind, ephemeral)
            },
            Response::Embeds(embeds) => {
                CreateInteractionResponseMessage::new().embeds(embeds).ephemeral(ephemeral)
            },
            Response::Message(rich) => {
                let ephemeral = rich.ephemeral.unwrap_or(ephemeral || rich.message.is_ephemeral());
                let message = rich.message.ephemeral(ephemeral);

                match rich.edit {
                    Some(EditTarget::Original) => return Self::EditOriginal(message),
                    Some(EditTarget::Followup(id)) => return Self::EditFollowup(id, message),
                    None => message,
                }
            },
        };

        if flags.intersects(ResponseFlags::RESPONDING_OR_RESPONDED) {
            Self::Followup(message)
        } else if flags.intersects(ResponseFlags::DEFERRING_OR_DEFERRED) {
            if kind == InteractionType::Command {
                Self::EditOriginal(message)
            } else {
                Self::Followup(message)
            }
        } else {
            Self::Create(message)
        }
    }

    fn acknowledge(flags: ResponseFlags, kind: InteractionType, ephemeral: bool) -> Self {
        if !flags.is_unanswered() {
            return Self::None;
        }

        match kind {
            InteractionType::Component | InteractionType::Modal => Self::ComponentAcknowledge,
            _ => Self::Acknowledge {
                ephemeral,
            },
        }
    }

    /// Sends the action through the client's guarded response calls.
    pub async fn execute(self, client: &Client, handle: &Arc<InteractionHandle>) -> Feedback {
        match self {
            Self::None => Ok(None),
            Self::Acknowledge {
                ephemeral,
            } => client.interaction_acknowledge(handle, ephemeral, true).await.map(|()| None),
            Self::ComponentAcknowledge => {
                client.interaction_component_acknowledge(handle, true).await.map(|()| None)
            },
            Self::Create(message) => {
                client.interaction_response_message_create(handle, &message).await
            },
            Self::EditOriginal(message) => {
                client.interaction_response_message_edit(handle, &message).await
            },
            Self::Followup(message) => {
                client.interaction_followup_message_create(handle, &message).await
            },
            Self::EditFollowup(id, message) => {
                client.interaction_followup_message_edit(handle, id, &message).await
            },
        }
    }
}

/// Sends the responses of one handler invocation.
pub(crate) struct ResponseProcessor<'a> {
    pub client: &'a Client,
    pub handle: &'a Arc<InteractionHandle>,
    pub ephemeral: bool,
    pub content_limit: usize,
}

impl ResponseProcessor<'_> {
    /// Sends what the handler produced. Errors are returned for the error handlers, except
    /// connection failures, which are only logged.
    pub async fn process(&self, result: CommandResult) -> StdResult<(), DispatchError> {
        match result {
            Ok(CommandOutput::Response(response)) => self.finish(response).await,
            Ok(CommandOutput::Stream(stream)) => self.drive(stream).await,
            Err(why) => self.fail(why).await,
        }
    }

    async fn drive(&self, mut stream: ResponseStream) -> StdResult<(), DispatchError> {
        let mut feedback = None;

        while let Some(step) = stream.next(feedback.take()).await {
            match step {
                Ok(Step::Yield(response)) => feedback = Some(self.send(response).await),
                Ok(Step::Final(response)) => return self.finish(response).await,
                Err(why) => return self.fail(why).await,
            }
        }

        if let Some(Err(why)) = feedback {
            return Err(DispatchError::Response(why));
        }

        self.finish(Response::None).await
    }

    async fn fail(&self, why: CommandError) -> StdResult<(), DispatchError> {
        match why.downcast::<Abort>() {
            Ok(abort) => {
                trace!("Interaction {} aborted", self.handle.id());
                self.finish(abort.0).await
            },
            Err(why) => Err(DispatchError::Command(why)),
        }
    }

    async fn finish(&self, response: Response) -> StdResult<(), DispatchError> {
        self.send(response).await.map(|_| ()).map_err(DispatchError::Response)
    }

    async fn send(&self, response: Response) -> Feedback {
        let handle = response.target().map_or_else(|| Arc::clone(self.handle), Arc::clone);

        // Answer from the settled state, not from behind a background acknowledgement.
        handle.guard().wait_for_completion().await;

        let action = ResponseAction::derive(
            response,
            handle.response_flags(),
            handle.kind(),
            self.ephemeral,
            self.content_limit,
        );
        trace!("Interaction {}: {:?}", handle.id(), action);

        match action.execute(self.client, &handle).await {
            Err(why) if why.is_connection_error() => {
                debug!("Failed to reach Discord answering interaction {}: {why}", handle.id());
                Ok(None)
            },
            result => result,
        }
    }
}
