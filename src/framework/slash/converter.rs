use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::error::{CommandError, ConversionError};
use crate::client::Client;
use crate::interaction::InteractionHandle;
use crate::internal::prelude::*;
use crate::model::application::{
    CommandDataOption,
    CommandDataOptionValue,
    ResolvedTarget,
};
use crate::model::channel::Message;
use crate::model::id::UserId;
use crate::model::user::{PartialMember, User};

type ConvertFn = dyn Fn(&CommandDataOptionValue) -> StdResult<Value, CommandError> + Send + Sync;

/// Transforms the raw value of an option before it is handed to the command.
#[derive(Clone)]
pub struct OptionConverter(Arc<ConvertFn>);

impl OptionConverter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&CommandDataOptionValue) -> StdResult<Value, CommandError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    fn convert(&self, value: &CommandDataOptionValue) -> StdResult<Value, CommandError> {
        (self.0)(value)
    }
}

impl fmt::Debug for OptionConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OptionConverter")
    }
}

/// Produces one positional argument of a command.
///
/// Option parameters read the option of their name from the interaction. All other variants are
/// filled in from the interaction itself without any lookup.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum ParameterConverter {
    /// The option named `name`.
    Option {
        name: String,
        required: bool,
        converter: Option<OptionConverter>,
    },
    /// The invoking [`Client`].
    Client,
    /// The [`InteractionHandle`] being answered.
    Handle,
    /// The user or message a context menu command was invoked on.
    Target,
    /// The partial input of the focused option, for auto-completers.
    AutocompleteValue,
    /// A named capture group of the custom id pattern a component or form matched.
    Group(String),
    /// The value of a form field, by its custom id.
    Field(String),
    /// The values picked in a select menu.
    Values,
}

impl ParameterConverter {
    /// A required option.
    pub fn option(name: impl Into<String>) -> Self {
        Self::Option {
            name: name.into(),
            required: true,
            converter: None,
        }
    }

    /// An option the user may leave out, producing `Argument::Option(None)`.
    pub fn optional(name: impl Into<String>) -> Self {
        Self::Option {
            name: name.into(),
            required: false,
            converter: None,
        }
    }

    /// A required option whose value is transformed by `converter`.
    pub fn converted<F>(name: impl Into<String>, converter: F) -> Self
    where
        F: Fn(&CommandDataOptionValue) -> StdResult<Value, CommandError> + Send + Sync + 'static,
    {
        Self::Option {
            name: name.into(),
            required: true,
            converter: Some(OptionConverter::new(converter)),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::Group(name.into())
    }

    pub fn field(custom_id: impl Into<String>) -> Self {
        Self::Field(custom_id.into())
    }

    pub(crate) fn convert(
        &self,
        source: &ConversionSource<'_>,
    ) -> StdResult<Argument, ConversionError> {
        match self {
            Self::Option {
                name,
                required,
                converter,
            } => {
                let Some(value) = source.options.get(name.as_str()) else {
                    if *required {
                        return Err(ConversionError::MissingOption {
                            parameter: name.clone(),
                        });
                    }

                    return Ok(Argument::Option(None));
                };

                match converter {
                    Some(converter) => converter.convert(value).map(Argument::Converted).map_err(
                        |reason| ConversionError::InvalidValue {
                            parameter: name.clone(),
                            value: value.to_json(),
                            reason,
                        },
                    ),
                    None => Ok(Argument::Option(Some((*value).clone()))),
                }
            },
            Self::Client => Ok(Argument::Client(source.client.clone())),
            Self::Handle => Ok(Argument::Handle(Arc::clone(source.handle))),
            Self::Target => source
                .handle
                .interaction()
                .command_data()
                .and_then(|data| data.target())
                .map(|target| Argument::Target(target.into()))
                .ok_or(ConversionError::MissingTarget),
            Self::AutocompleteValue => source
                .handle
                .interaction()
                .command_data()
                .and_then(|data| data.autocomplete())
                .map(|option| Argument::Text(option.value.to_owned()))
                .ok_or_else(|| ConversionError::MissingValue {
                    parameter: "autocomplete".into(),
                }),
            Self::Group(name) => source
                .groups
                .get(name)
                .map(|value| Argument::Text(value.clone()))
                .ok_or_else(|| ConversionError::MissingValue {
                    parameter: name.clone(),
                }),
            Self::Field(custom_id) => source
                .handle
                .interaction()
                .modal_data()
                .and_then(|data| data.value_of(custom_id))
                .map(|value| Argument::Text(value.to_owned()))
                .ok_or_else(|| ConversionError::MissingValue {
                    parameter: custom_id.clone(),
                }),
            Self::Values => Ok(Argument::Values(
                source
                    .handle
                    .interaction()
                    .component_data()
                    .map(|data| data.values.clone())
                    .unwrap_or_default(),
            )),
        }
    }
}

/// Everything converters draw their values from.
pub(crate) struct ConversionSource<'a> {
    pub client: &'a Client,
    pub handle: &'a Arc<InteractionHandle>,
    pub options: HashMap<&'a str, &'a CommandDataOptionValue>,
    pub groups: HashMap<String, String>,
}

impl<'a> ConversionSource<'a> {
    pub fn new(client: &'a Client, handle: &'a Arc<InteractionHandle>) -> Self {
        Self {
            client,
            handle,
            options: HashMap::new(),
            groups: HashMap::new(),
        }
    }

    /// Uses the flat option list of the resolved command.
    pub fn options(mut self, options: &'a [CommandDataOption]) -> Self {
        self.options = options.iter().map(|option| (option.name.as_str(), &option.value)).collect();
        self
    }

    pub fn groups(mut self, groups: HashMap<String, String>) -> Self {
        self.groups = groups;
        self
    }

    /// Evaluates `converters` in order, stopping at the first failure.
    pub fn convert_all(
        &self,
        converters: &[ParameterConverter],
    ) -> StdResult<Vec<Argument>, ConversionError> {
        converters.iter().map(|converter| converter.convert(self)).collect()
    }
}

/// The owned counterpart of [`ResolvedTarget`].
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Target {
    User(User, Option<PartialMember>),
    Message(Box<Message>),
}

impl From<ResolvedTarget<'_>> for Target {
    fn from(target: ResolvedTarget<'_>) -> Self {
        match target {
            ResolvedTarget::User(user, member) => Self::User(user.clone(), member.cloned()),
            ResolvedTarget::Message(message) => Self::Message(Box::new(message.clone())),
        }
    }
}

/// One positional argument handed to a command.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Argument {
    /// The value of an option, `None` if an optional option was left out.
    Option(Option<CommandDataOptionValue>),
    /// The result of an [`OptionConverter`].
    Converted(Value),
    Client(Client),
    Handle(Arc<InteractionHandle>),
    Target(Target),
    /// A text value taken from the interaction: the partial input of the focused option, a
    /// custom id group or a form field.
    Text(String),
    /// The values picked in a select menu.
    Values(Vec<String>),
}

impl Argument {
    /// Whether this is an optional option that was left out.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::Option(None))
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Option(Some(value)) => value.as_str(),
            Self::Converted(Value::String(s)) | Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Option(Some(value)) => value.as_i64(),
            Self::Converted(value) => value.as_i64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Option(Some(value)) => value.as_f64(),
            Self::Converted(value) => value.as_f64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Option(Some(value)) => value.as_bool(),
            Self::Converted(value) => value.as_bool(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_user_id(&self) -> Option<UserId> {
        match self {
            Self::Option(Some(value)) => value.as_user_id(),
            Self::Target(Target::User(user, _)) => Some(user.id),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_client(&self) -> Option<&Client> {
        match self {
            Self::Client(client) => Some(client),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_handle(&self) -> Option<&Arc<InteractionHandle>> {
        match self {
            Self::Handle(handle) => Some(handle),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_target(&self) -> Option<&Target> {
        match self {
            Self::Target(target) => Some(target),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_values(&self) -> Option<&[String]> {
        match self {
            Self::Values(values) => Some(values),
            _ => None,
        }
    }

    /// The argument as JSON, for options, converted values and text.
    #[must_use]
    pub fn to_json(&self) -> Option<Value> {
        match self {
            Self::Option(value) => {
                Some(value.as_ref().and_then(CommandDataOptionValue::to_json).unwrap_or_default())
            },
            Self::Converted(value) => Some(value.clone()),
            Self::Text(text) => Some(Value::String(text.clone())),
            Self::Values(values) => Some(values.iter().cloned().map(Value::String).collect()),
            Self::Client(_) | Self::Handle(_) | Self::Target(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::client;
    use crate::interaction::tests::handle;
    use crate::model::application::CommandDataOptionValue as V;

    #[test]
    fn converters_run_in_declared_order() {
        let (client, _) = client();
        let handle = handle(2);
        let options = vec![
            CommandDataOption::new("count", V::Integer(3)),
            CommandDataOption::new("key", V::String("colour".into())),
        ];
        let source = ConversionSource::new(&client, &handle).options(&options);

        let args = source
            .convert_all(&[
                ParameterConverter::option("key"),
                ParameterConverter::optional("value"),
                ParameterConverter::option("count"),
                ParameterConverter::Handle,
            ])
            .unwrap();

        assert_eq!(args[0].as_str(), Some("colour"));
        assert!(args[1].is_none());
        assert_eq!(args[2].as_i64(), Some(3));
        assert!(Arc::ptr_eq(args[3].as_handle().unwrap(), &handle));
    }

    #[test]
    fn failing_converter_stops_conversion() {
        let (client, _) = client();
        let handle = handle(2);
        let options = vec![CommandDataOption::new("count", V::Integer(-1))];
        let source = ConversionSource::new(&client, &handle).options(&options);

        let result = source.convert_all(&[
            ParameterConverter::converted("count", |value| match value.as_i64() {
                Some(n) if n >= 0 => Ok(Value::from(n)),
                _ => Err("must not be negative".into()),
            }),
            ParameterConverter::option("missing"),
        ]);

        match result {
            Err(ConversionError::InvalidValue {
                parameter,
                value,
                ..
            }) => {
                assert_eq!(parameter, "count");
                assert_eq!(value, Some(Value::from(-1)));
            },
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_required_option() {
        let (client, _) = client();
        let handle = handle(2);
        let source = ConversionSource::new(&client, &handle);

        let result = source.convert_all(&[ParameterConverter::option("key")]);
        assert!(matches!(
            result,
            Err(ConversionError::MissingOption { parameter }) if parameter == "key"
        ));
    }

    #[test]
    fn groups_and_missing_target() {
        let (client, _) = client();
        let handle = handle(2);
        let groups = HashMap::from([("page".to_owned(), "4".to_owned())]);
        let source = ConversionSource::new(&client, &handle).groups(groups);

        let args = source.convert_all(&[ParameterConverter::group("page")]).unwrap();
        assert_eq!(args[0].as_str(), Some("4"));

        let result = source.convert_all(&[ParameterConverter::Target]);
        assert!(matches!(result, Err(ConversionError::MissingTarget)));
    }
}
