use std::collections::HashMap;

use regex::Regex;

use super::command::CommandFunction;
use super::FrameworkError;
use crate::internal::prelude::*;

/// How a [`ComponentCommand`] recognises the custom ids it handles.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum CustomIdMatcher {
    /// Any of the listed ids.
    Exact(Vec<String>),
    /// Ids matching the whole pattern. Capture groups become available to the handler through
    /// [`ParameterConverter::group`], by name or by index.
    ///
    /// [`ParameterConverter::group`]: super::ParameterConverter::group
    Pattern(Regex),
}

impl CustomIdMatcher {
    /// Matches `custom_id`, returning the captured groups.
    #[must_use]
    pub fn captures(&self, custom_id: &str) -> Option<HashMap<String, String>> {
        match self {
            Self::Exact(ids) => ids.iter().any(|id| id == custom_id).then(HashMap::new),
            Self::Pattern(regex) => {
                let captures = regex.captures(custom_id)?;
                let mut groups = HashMap::new();

                for (i, name) in regex.capture_names().enumerate().skip(1) {
                    let Some(group) = captures.get(i) else {
                        continue;
                    };

                    groups.insert(i.to_string(), group.as_str().to_owned());
                    if let Some(name) = name {
                        groups.insert(name.to_owned(), group.as_str().to_owned());
                    }
                }

                Some(groups)
            },
        }
    }
}

/// A handler for message component clicks or form submits, selected by custom id.
///
/// # Examples
///
/// ```rust
/// use cadence::framework::slash::{CommandFunction, ComponentCommand, ParameterConverter};
///
/// let vote = ComponentCommand::pattern(
///     r"vote:(?P<poll>\d+):(?P<choice>yes|no)",
///     CommandFunction::new("vote", |invocation| async move {
///         let choice = invocation.arg(1).and_then(|arg| arg.as_str()).unwrap_or_default();
///         Ok(format!("Voted {choice}").into())
///     })
///     .parameters([ParameterConverter::group("poll"), ParameterConverter::group("choice")])
///     .ephemeral(true),
/// )?;
/// # Ok::<_, cadence::framework::FrameworkError>(())
/// ```
#[derive(Clone, Debug)]
#[must_use]
pub struct ComponentCommand {
    matcher: CustomIdMatcher,
    function: CommandFunction,
}

impl ComponentCommand {
    pub fn exact(ids: impl IntoIterator<Item = impl Into<String>>, function: CommandFunction) -> Self {
        Self {
            matcher: CustomIdMatcher::Exact(ids.into_iter().map(Into::into).collect()),
            function,
        }
    }

    /// # Errors
    ///
    /// Returns [`FrameworkError::InvalidPattern`] if `pattern` is not a valid regular expression.
    pub fn pattern(pattern: &str, function: CommandFunction) -> StdResult<Self, FrameworkError> {
        let regex = Regex::new(&format!("^(?:{pattern})$"))
            .map_err(|why| FrameworkError::InvalidPattern(why.to_string()))?;

        Ok(Self {
            matcher: CustomIdMatcher::Pattern(regex),
            function,
        })
    }

    #[must_use]
    pub fn matcher(&self) -> &CustomIdMatcher {
        &self.matcher
    }

    #[must_use]
    pub fn function(&self) -> &CommandFunction {
        &self.function
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> CommandFunction {
        CommandFunction::new("noop", |_| async { Ok(().into()) })
    }

    #[test]
    fn exact_ids() {
        let command = ComponentCommand::exact(["confirm", "cancel"], noop());

        assert_eq!(command.matcher().captures("cancel"), Some(HashMap::new()));
        assert_eq!(command.matcher().captures("cancelled"), None);
    }

    #[test]
    fn pattern_captures_named_and_indexed_groups() {
        let command = ComponentCommand::pattern(r"page:(?P<number>\d+):(\w+)", noop()).unwrap();
        let groups = command.matcher().captures("page:3:next").unwrap();

        assert_eq!(groups["number"], "3");
        assert_eq!(groups["1"], "3");
        assert_eq!(groups["2"], "next");
    }

    #[test]
    fn pattern_must_match_whole_id() {
        let command = ComponentCommand::pattern(r"page:\d+", noop()).unwrap();

        assert!(command.matcher().captures("page:12").is_some());
        assert!(command.matcher().captures("xpage:12").is_none());
        assert!(command.matcher().captures("page:12x").is_none());
    }

    #[test]
    fn invalid_pattern() {
        let error = ComponentCommand::pattern("page:(", noop()).unwrap_err();
        assert!(matches!(error, FrameworkError::InvalidPattern(_)));
    }
}
