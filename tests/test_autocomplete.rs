mod common;

use std::sync::Arc;

use cadence::builder::AutocompleteChoice;
use cadence::framework::slash::{
    Autocompleter,
    CommandCategory,
    CommandFunction,
    ErrorHandler,
    ParameterConverter,
    SlashCommand,
    SlashFramework,
};
use cadence::interaction::InteractionHandle;
use common::MockHttp;
use parking_lot::Mutex;
use serde_json::{json, Value};

const COLOURS: [&str; 4] = ["red", "green", "blue", "rose"];

fn colours(parameter: &str) -> Autocompleter {
    Autocompleter::new(parameter, |invocation| async move {
        let partial = invocation.arg(0).and_then(|arg| arg.as_str()).unwrap_or_default().to_owned();
        Ok(COLOURS
            .iter()
            .filter(|colour| colour.starts_with(&partial))
            .map(|colour| AutocompleteChoice::new(*colour, *colour))
            .collect())
    })
}

fn noop(name: &str) -> CommandFunction {
    CommandFunction::new(name, |_| async { Ok(().into()) })
}

async fn complete(framework: &SlashFramework, options: Value) -> MockHttp {
    let http = MockHttp::default();
    let client = common::client(&http);
    let handle = Arc::new(InteractionHandle::new(common::autocomplete(1, "paint", options)));

    framework.dispatch_autocomplete(&client, &handle).await;
    http
}

#[tokio::test]
async fn focused_option_is_completed() {
    let command = noop("paint")
        .parameter(ParameterConverter::option("colour-name"))
        .autocomplete(colours("Colour_Name"));
    let framework = SlashFramework::new().command(SlashCommand::new(command)).unwrap();

    let http = complete(
        &framework,
        json!([{"name": "colour-name", "type": 3, "value": "r", "focused": true}]),
    )
    .await;

    assert_eq!(http.calls().len(), 1);
    assert_eq!(http.calls()[0].kind, "autocomplete");
    assert_eq!(http.calls()[0].content.as_deref(), Some("red,rose"));
}

#[tokio::test]
async fn category_completers_are_inherited() {
    let command = CommandCategory::new("paint")
        .autocomplete(colours("colour"))
        .child(noop("wall").parameter(ParameterConverter::option("colour")));
    let framework = SlashFramework::new().command(SlashCommand::new(command)).unwrap();

    let http = complete(
        &framework,
        json!([{"name": "wall", "type": 1, "options": [
            {"name": "colour", "type": 3, "value": "g", "focused": true},
        ]}]),
    )
    .await;

    assert_eq!(http.calls()[0].content.as_deref(), Some("green"));
}

#[tokio::test]
async fn misses_are_silent() {
    let reported = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&reported);
    let wall = noop("wall").parameter(ParameterConverter::option("colour"));
    let command = CommandCategory::new("paint").child(wall.autocomplete(colours("colour")));
    let framework = SlashFramework::new()
        .command(SlashCommand::new(command))
        .unwrap()
        .on_error(ErrorHandler::new(move |_| {
            let counter = Arc::clone(&counter);
            async move {
                *counter.lock() += 1;
                true
            }
        }));

    // No completer for the focused option.
    let http = complete(
        &framework,
        json!([{"name": "wall", "type": 1, "options": [
            {"name": "finish", "type": 3, "value": "", "focused": true},
        ]}]),
    )
    .await;
    assert!(http.calls().is_empty());

    // Unknown sub-command.
    let http = complete(
        &framework,
        json!([{"name": "door", "type": 1, "options": [
            {"name": "colour", "type": 3, "value": "", "focused": true},
        ]}]),
    )
    .await;
    assert!(http.calls().is_empty());

    assert_eq!(*reported.lock(), 0);
}

#[tokio::test]
async fn completer_errors_are_reported() {
    let reported = Arc::new(Mutex::new(Vec::new()));
    let errors = Arc::clone(&reported);
    let failing = Autocompleter::new("colour", |_| async { Err("palette unavailable".into()) });
    let framework = SlashFramework::new()
        .command(SlashCommand::new(noop("paint").autocomplete(failing)))
        .unwrap()
        .on_error(ErrorHandler::new(move |context| {
            let errors = Arc::clone(&errors);
            async move {
                errors.lock().push(context.error.to_string());
                true
            }
        }));

    let http = complete(
        &framework,
        json!([{"name": "colour", "type": 3, "value": "", "focused": true}]),
    )
    .await;

    assert!(http.calls().is_empty());
    assert_eq!(*reported.lock(), ["palette unavailable"]);
}
