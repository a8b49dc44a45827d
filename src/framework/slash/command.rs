use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};

use super::autocomplete::Autocompleter;
use super::converter::{Argument, ParameterConverter};
use super::error::{ConversionError, ErrorHandler};
use super::response::CommandResult;
use super::FrameworkError;
use crate::client::Client;
use crate::interaction::InteractionHandle;
use crate::internal::prelude::*;
use crate::model::application::{CommandDataOption, CommandType, Interaction};
use crate::model::channel::Message;

/// Discord allows a root command, one level of groups and one level of sub-commands.
const MAX_DEPTH: usize = 3;

type CommandFn = dyn Fn(Invocation) -> BoxFuture<'static, CommandResult> + Send + Sync;

/// A single call of a command handler.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Invocation {
    client: Client,
    handle: Arc<InteractionHandle>,
    args: Vec<Argument>,
    ephemeral: bool,
    response_timeout: Duration,
}

impl Invocation {
    pub(crate) fn new(
        client: Client,
        handle: Arc<InteractionHandle>,
        args: Vec<Argument>,
        ephemeral: bool,
        response_timeout: Duration,
    ) -> Self {
        Self {
            client,
            handle,
            args,
            ephemeral,
            response_timeout,
        }
    }

    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    #[must_use]
    pub fn handle(&self) -> &Arc<InteractionHandle> {
        &self.handle
    }

    #[must_use]
    pub fn interaction(&self) -> &Interaction {
        self.handle.interaction()
    }

    /// The arguments produced by the command's parameters, in declared order.
    #[must_use]
    pub fn args(&self) -> &[Argument] {
        &self.args
    }

    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&Argument> {
        self.args.get(index)
    }

    #[must_use]
    pub fn into_args(self) -> Vec<Argument> {
        self.args
    }

    /// Whether responses produced by this invocation are only shown to the invoking user.
    #[must_use]
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    /// Waits for the message of the interaction's first response, up to the configured response
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if no message was published in time.
    pub async fn response_message(&self) -> Result<Message> {
        self.handle.wait_for_response_message(self.response_timeout).await
    }
}

/// A command handler, the leaf of a command tree.
///
/// # Examples
///
/// ```rust
/// use cadence::framework::slash::{CommandFunction, ParameterConverter};
///
/// let echo = CommandFunction::new("echo", |invocation| async move {
///     let text = invocation.arg(0).and_then(|arg| arg.as_str()).unwrap_or_default();
///     Ok(text.to_owned().into())
/// })
/// .parameter(ParameterConverter::option("text"));
/// ```
#[derive(Clone)]
#[must_use]
pub struct CommandFunction {
    name: String,
    parameters: Vec<ParameterConverter>,
    autocompleters: Vec<Autocompleter>,
    ephemeral: Option<bool>,
    error_handlers: Vec<ErrorHandler>,
    handler: Arc<CommandFn>,
}

impl CommandFunction {
    pub fn new<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CommandResult> + Send + 'static,
    {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            autocompleters: Vec::new(),
            ephemeral: None,
            error_handlers: Vec::new(),
            handler: Arc::new(move |invocation| f(invocation).boxed()),
        }
    }

    /// Appends a parameter. Parameters are converted in the order they were added.
    pub fn parameter(mut self, parameter: ParameterConverter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn parameters(mut self, parameters: impl IntoIterator<Item = ParameterConverter>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    pub fn autocomplete(mut self, autocompleter: Autocompleter) -> Self {
        self.autocompleters.push(autocompleter);
        self
    }

    /// Whether the command's responses are only shown to the invoking user. Falls back to the
    /// enclosing categories, then to the framework's configuration.
    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = Some(ephemeral);
        self
    }

    pub fn on_error(mut self, handler: ErrorHandler) -> Self {
        self.error_handlers.push(handler);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn get_parameters(&self) -> &[ParameterConverter] {
        &self.parameters
    }

    pub(crate) async fn call(&self, invocation: Invocation) -> CommandResult {
        (self.handler)(invocation).await
    }
}

impl fmt::Debug for CommandFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandFunction")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("autocompleters", &self.autocompleters)
            .field("ephemeral", &self.ephemeral)
            .finish_non_exhaustive()
    }
}

/// A group of commands, routing to the child named by the interaction.
#[derive(Clone, Debug)]
#[must_use]
pub struct CommandCategory {
    name: String,
    children: Vec<CommandNode>,
    autocompleters: Vec<Autocompleter>,
    ephemeral: Option<bool>,
    error_handlers: Vec<ErrorHandler>,
}

impl CommandCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            autocompleters: Vec::new(),
            ephemeral: None,
            error_handlers: Vec::new(),
        }
    }

    pub fn child(mut self, child: impl Into<CommandNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// An auto-completer used by every command in the category lacking its own for a parameter.
    pub fn autocomplete(mut self, autocompleter: Autocompleter) -> Self {
        self.autocompleters.push(autocompleter);
        self
    }

    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = Some(ephemeral);
        self
    }

    pub fn on_error(mut self, handler: ErrorHandler) -> Self {
        self.error_handlers.push(handler);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn children(&self) -> &[CommandNode] {
        &self.children
    }

    /// The names of the children, in registration order.
    #[must_use]
    pub fn child_names(&self) -> Vec<String> {
        self.children.iter().map(|child| child.name().to_owned()).collect()
    }
}

/// A node of a command tree.
#[derive(Clone, Debug)]
pub enum CommandNode {
    Function(CommandFunction),
    Category(CommandCategory),
}

impl CommandNode {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Function(function) => function.name(),
            Self::Category(category) => category.name(),
        }
    }
}

impl From<CommandFunction> for CommandNode {
    fn from(function: CommandFunction) -> Self {
        Self::Function(function)
    }
}

impl From<CommandCategory> for CommandNode {
    fn from(category: CommandCategory) -> Self {
        Self::Category(category)
    }
}

/// A root command as registered with Discord.
#[derive(Clone, Debug)]
#[must_use]
pub struct SlashCommand {
    kind: CommandType,
    node: CommandNode,
}

impl SlashCommand {
    /// A chat input command.
    pub fn new(node: impl Into<CommandNode>) -> Self {
        Self {
            kind: CommandType::ChatInput,
            node: node.into(),
        }
    }

    /// A context menu command on users or messages. Its handler reads the clicked entity through
    /// [`ParameterConverter::Target`].
    pub fn context_menu(kind: CommandType, function: CommandFunction) -> Self {
        Self {
            kind,
            node: function.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.node.name()
    }

    #[must_use]
    pub fn kind(&self) -> CommandType {
        self.kind
    }

    #[must_use]
    pub fn node(&self) -> &CommandNode {
        &self.node
    }

    pub(crate) fn validate(&self) -> StdResult<(), FrameworkError> {
        validate_node(&self.node, "", 1)
    }

    /// Walks the tree along the interaction's sub-command options.
    pub(crate) fn resolve<'a>(&'a self, options: &'a [CommandDataOption]) -> Resolution<'a> {
        let mut node = &self.node;
        let mut options = options;
        let mut route = Route {
            function: None,
            ancestors: Vec::new(),
            path: Vec::new(),
            options,
        };

        loop {
            route.path.push(node.name());

            let category = match node {
                CommandNode::Function(function) => {
                    route.function = Some(function);
                    route.options = options;
                    route.ancestors.reverse();
                    return Resolution::Found(route);
                },
                CommandNode::Category(category) => category,
            };
            route.ancestors.push(category);

            let [option] = options else {
                return Resolution::Nothing;
            };

            match category.children.iter().find(|child| child.name() == option.name) {
                Some(child) => {
                    node = child;
                    options = option.nested().unwrap_or_default();
                },
                None => {
                    route.ancestors.reverse();
                    let error = ConversionError::UnknownSubCommand {
                        name: option.name.clone(),
                        valid: category.child_names(),
                    };
                    return Resolution::Failed(route, error);
                },
            }
        }
    }
}

fn validate_node(node: &CommandNode, parent: &str, depth: usize) -> StdResult<(), FrameworkError> {
    if node.name().is_empty() {
        return Err(FrameworkError::EmptyName);
    }

    let name = qualify(parent, node.name());
    if depth > MAX_DEPTH {
        return Err(FrameworkError::NestingTooDeep {
            name,
            depth,
        });
    }

    if let CommandNode::Category(category) = node {
        for (i, child) in category.children.iter().enumerate() {
            if category.children[..i].iter().any(|other| other.name() == child.name()) {
                return Err(FrameworkError::DuplicateName {
                    parent: name,
                    name: child.name().to_owned(),
                });
            }

            validate_node(child, &name, depth + 1)?;
        }
    }

    Ok(())
}

fn qualify(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_owned()
    } else {
        format!("{parent} {name}")
    }
}

/// Where a dispatch ended up in a command tree.
pub(crate) struct Route<'a> {
    /// The resolved command, `None` if resolution failed at a category.
    pub function: Option<&'a CommandFunction>,
    /// The categories enclosing the resolved node, innermost first.
    pub ancestors: Vec<&'a CommandCategory>,
    pub path: Vec<&'a str>,
    /// The options of the resolved command.
    pub options: &'a [CommandDataOption],
}

impl<'a> Route<'a> {
    pub fn for_function(function: &'a CommandFunction) -> Self {
        Self {
            function: Some(function),
            ancestors: Vec::new(),
            path: vec![function.name()],
            options: &[],
        }
    }

    pub fn qualified_name(&self) -> String {
        self.path.join(" ")
    }

    /// The ephemeral setting of the innermost node that has one.
    pub fn ephemeral(&self) -> Option<bool> {
        self.function
            .and_then(|function| function.ephemeral)
            .or_else(|| self.ancestors.iter().find_map(|category| category.ephemeral))
    }

    /// Error handlers from the innermost node outwards.
    pub fn error_handlers(&self) -> impl Iterator<Item = &'a ErrorHandler> + '_ {
        let own = self.function.map(|function| function.error_handlers.as_slice()).unwrap_or_default();
        own.iter().chain(self.ancestors.iter().flat_map(|category| category.error_handlers.iter()))
    }

    /// The auto-completer for `parameter`, searching from the innermost node outwards.
    pub fn autocompleter(&self, parameter: &str) -> Option<&'a Autocompleter> {
        let own = self.function.map(|function| function.autocompleters.as_slice()).unwrap_or_default();
        own.iter()
            .chain(self.ancestors.iter().flat_map(|category| category.autocompleters.iter()))
            .find(|autocompleter| autocompleter.matches(parameter))
    }
}

pub(crate) enum Resolution<'a> {
    Found(Route<'a>),
    /// A category did not know the requested child.
    Failed(Route<'a>, ConversionError),
    /// The interaction named no single child of a category.
    Nothing,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::application::CommandDataOptionValue as V;

    fn leaf(name: &str) -> CommandFunction {
        CommandFunction::new(name, |_| async { Ok(().into()) })
    }

    fn config() -> SlashCommand {
        SlashCommand::new(
            CommandCategory::new("config")
                .ephemeral(true)
                .child(leaf("set").ephemeral(false))
                .child(leaf("get")),
        )
    }

    #[test]
    fn resolves_sub_command() {
        let command = config();
        let options = vec![CommandDataOption::new(
            "get",
            V::SubCommand(vec![CommandDataOption::new("key", V::String("colour".into()))]),
        )];

        let Resolution::Found(route) = command.resolve(&options) else {
            panic!("expected `config get`");
        };
        assert_eq!(route.qualified_name(), "config get");
        assert_eq!(route.options[0].name, "key");
        assert_eq!(route.ephemeral(), Some(true));
    }

    #[test]
    fn innermost_ephemeral_setting_wins() {
        let command = config();
        let options = vec![CommandDataOption::new("set", V::SubCommand(Vec::new()))];

        let Resolution::Found(route) = command.resolve(&options) else {
            panic!("expected `config set`");
        };
        assert_eq!(route.ephemeral(), Some(false));
    }

    #[test]
    fn unknown_sub_command_lists_children() {
        let command = config();
        let options = vec![CommandDataOption::new("delete", V::SubCommand(Vec::new()))];

        let Resolution::Failed(route, error) = command.resolve(&options) else {
            panic!("expected a failure");
        };
        assert!(route.function.is_none());
        assert_eq!(route.qualified_name(), "config");
        match error {
            ConversionError::UnknownSubCommand {
                name,
                valid,
            } => {
                assert_eq!(name, "delete");
                assert_eq!(valid, ["set", "get"]);
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn category_without_single_option_does_nothing() {
        let command = config();
        assert!(matches!(command.resolve(&[]), Resolution::Nothing));

        let two = vec![
            CommandDataOption::new("set", V::SubCommand(Vec::new())),
            CommandDataOption::new("get", V::SubCommand(Vec::new())),
        ];
        assert!(matches!(command.resolve(&two), Resolution::Nothing));
    }

    #[test]
    fn validation() {
        assert!(config().validate().is_ok());

        let duplicate = SlashCommand::new(CommandCategory::new("a").child(leaf("b")).child(leaf("b")));
        assert_eq!(
            duplicate.validate(),
            Err(FrameworkError::DuplicateName {
                parent: "a".into(),
                name: "b".into(),
            })
        );

        let deep = SlashCommand::new(
            CommandCategory::new("a")
                .child(CommandCategory::new("b").child(CommandCategory::new("c").child(leaf("d")))),
        );
        assert_eq!(
            deep.validate(),
            Err(FrameworkError::NestingTooDeep {
                name: "a b c d".into(),
                depth: 4,
            })
        );

        assert_eq!(SlashCommand::new(leaf("")).validate(), Err(FrameworkError::EmptyName));
    }
}
