mod common;

use std::sync::Arc;

use cadence::framework::slash::{
    Argument,
    CommandFunction,
    ComponentCommand,
    ParameterConverter,
    SlashFramework,
};
use cadence::interaction::InteractionHandle;
use cadence::model::application::Interaction;
use common::MockHttp;
use serde_json::json;

/// Answers with its arguments joined by `|`.
fn echo(name: &str) -> CommandFunction {
    CommandFunction::new(name, |invocation| async move {
        let args = invocation
            .args()
            .iter()
            .map(|arg| match arg {
                Argument::Values(values) => values.join(","),
                other => other.as_str().unwrap_or("-").to_owned(),
            })
            .collect::<Vec<_>>();
        Ok(args.join("|").into())
    })
}

async fn dispatch(framework: &SlashFramework, interaction: Interaction) -> MockHttp {
    let http = MockHttp::default();
    let client = common::client(&http);
    let handle = Arc::new(InteractionHandle::new(interaction));

    if handle.interaction().modal_data().is_some() {
        framework.dispatch_form(&client, &handle).await;
    } else {
        framework.dispatch_component(&client, &handle).await;
    }
    http
}

fn content(http: &MockHttp) -> Option<String> {
    http.calls().first().and_then(|call| call.content.clone())
}

#[tokio::test]
async fn pattern_groups_follow_declared_order() {
    let command = ComponentCommand::pattern(
        r"page:(?P<list>\w+):(?P<number>\d+)",
        echo("page")
            .parameter(ParameterConverter::group("number"))
            .parameter(ParameterConverter::group("list"))
            .parameter(ParameterConverter::group("1")),
    )
    .unwrap();
    let framework = SlashFramework::new().component(command);

    let http = dispatch(&framework, common::button(1, "page:todo:3")).await;

    assert_eq!(content(&http).as_deref(), Some("3|todo|todo"));
}

#[tokio::test]
async fn first_matching_command_wins() {
    let exact = echo("exact").parameter(ParameterConverter::Values);
    let framework = SlashFramework::new()
        .component(ComponentCommand::exact(["delete"], exact))
        .component(ComponentCommand::pattern(r"\w+", echo("any")).unwrap());

    let http = dispatch(&framework, common::select(1, "delete", &["a", "b"])).await;
    assert_eq!(content(&http).as_deref(), Some("a,b"));

    // No arguments, so the empty answer only acknowledges the click.
    let http = dispatch(&framework, common::button(2, "other")).await;
    assert_eq!(http.kinds(), ["component_ack"]);
}

#[tokio::test]
async fn unmatched_custom_id_is_ignored() {
    let framework = SlashFramework::new()
        .component(ComponentCommand::exact(["confirm", "cancel"], echo("confirm")));

    let http = dispatch(&framework, common::button(1, "confirmed")).await;

    assert!(http.calls().is_empty());
}

#[tokio::test]
async fn form_fields_become_arguments() {
    let report = echo("report")
        .parameter(ParameterConverter::field("title"))
        .parameter(ParameterConverter::group("kind"));
    let framework = SlashFramework::new()
        .form(ComponentCommand::pattern(r"report:(?P<kind>bug|idea)", report).unwrap());

    let http = dispatch(
        &framework,
        common::form(1, "report:bug", &[("title", "Crash on start"), ("body", "")]),
    )
    .await;

    assert_eq!(content(&http).as_deref(), Some("Crash on start|bug"));
}

#[tokio::test]
async fn components_do_not_answer_forms() {
    let framework =
        SlashFramework::new().component(ComponentCommand::exact(["report:bug"], echo("report")));

    let http = dispatch(&framework, common::form(1, "report:bug", &[])).await;

    assert!(http.calls().is_empty());
}
