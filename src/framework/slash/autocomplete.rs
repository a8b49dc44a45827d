use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use super::converter::ParameterConverter;
use super::error::CommandError;
use super::Invocation;
use crate::builder::AutocompleteChoice;
use crate::internal::prelude::*;

/// The suggestions of an [`Autocompleter`], or why it could not compute them.
pub type AutocompleteResult = StdResult<Vec<AutocompleteChoice>, CommandError>;

type AutocompleteFn = dyn Fn(Invocation) -> BoxFuture<'static, AutocompleteResult> + Send + Sync;

/// Computes the suggestions shown for a focused option.
///
/// An auto-completer is registered for a parameter name and also answers to the usual
/// respellings of it: lowercase, and with `_` and `-` swapped. By default it receives the focused
/// option's partial input as its only argument.
#[derive(Clone)]
#[must_use]
pub struct Autocompleter {
    names: Vec<String>,
    parameters: Vec<ParameterConverter>,
    handler: Arc<AutocompleteFn>,
}

impl Autocompleter {
    pub fn new<F, Fut>(parameter: impl Into<String>, f: F) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AutocompleteResult> + Send + 'static,
    {
        Self {
            names: name_variants(&parameter.into()),
            parameters: vec![ParameterConverter::AutocompleteValue],
            handler: Arc::new(move |invocation| f(invocation).boxed()),
        }
    }

    /// Also answer for `parameter`, and its respellings.
    pub fn alias(mut self, parameter: impl AsRef<str>) -> Self {
        for name in name_variants(parameter.as_ref()) {
            if !self.names.contains(&name) {
                self.names.push(name);
            }
        }
        self
    }

    /// Replaces the arguments the auto-completer receives.
    pub fn parameters(mut self, parameters: Vec<ParameterConverter>) -> Self {
        self.parameters = parameters;
        self
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.names.iter().any(|candidate| candidate == name)
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub(crate) fn get_parameters(&self) -> &[ParameterConverter] {
        &self.parameters
    }

    pub(crate) async fn call(&self, invocation: Invocation) -> AutocompleteResult {
        (self.handler)(invocation).await
    }
}

impl fmt::Debug for Autocompleter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autocompleter")
            .field("names", &self.names)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

fn name_variants(name: &str) -> Vec<String> {
    let lowercase = name.to_lowercase();
    let candidates = [
        name.to_owned(),
        lowercase.clone(),
        name.replace('_', "-"),
        name.replace('-', "_"),
        lowercase.replace('_', "-"),
        lowercase.replace('-', "_"),
    ];

    let mut names = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !names.contains(&candidate) {
            names.push(candidate);
        }
    }

    names
}
