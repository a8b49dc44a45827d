mod common;

use std::time::Duration;

use cadence::framework::slash::{CommandFunction, Configuration, SlashCommand, SlashFramework};
use cadence::model::id::{ApplicationId, InteractionId};
use cadence::Client;
use common::MockHttp;
use serde_json::json;

fn framework(release_on_completion: bool) -> SlashFramework {
    SlashFramework::new()
        .configure(Configuration::new().release_on_completion(release_on_completion))
        .command(SlashCommand::new(CommandFunction::new("ping", |invocation| async move {
            assert!(invocation.handle().is_unanswered());
            Ok("pong".into())
        })))
        .unwrap()
}

#[tokio::test]
async fn handles_are_released_after_dispatch() {
    let http = MockHttp::default();
    let client =
        Client::builder(ApplicationId::new(7), http.clone()).framework(framework(true)).build();

    client.handle_interaction(common::command(1, "ping", json!([]))).await.unwrap();

    assert_eq!(http.kinds(), ["create"]);
    assert!(client.registry().is_empty());
}

#[tokio::test]
async fn handles_can_outlive_dispatch() {
    let http = MockHttp::default();
    let client =
        Client::builder(ApplicationId::new(7), http.clone()).framework(framework(false)).build();

    client.handle_interaction(common::command(1, "ping", json!([]))).await.unwrap();

    let handle = client.registry().get(InteractionId::new(1)).unwrap();
    assert!(handle.is_responded());

    let message = handle.wait_for_response_message(Duration::from_secs(1)).await.unwrap();
    assert_eq!(message.content, "pong");
}

#[tokio::test]
async fn duplicate_deliveries_share_a_handle() {
    let http = MockHttp::default();
    let client = common::client(&http);

    let first = client.registry().register(common::command(1, "ping", json!([])));
    let second = client.registry().register(common::command(1, "ping", json!([])));

    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(client.registry().len(), 1);

    client.registry().release(first.id());
    assert!(client.registry().is_empty());
}

#[tokio::test]
async fn interactions_without_framework_are_dropped() {
    let http = MockHttp::default();
    let client = common::client(&http);

    client.handle_interaction(common::command(1, "ping", json!([]))).await.unwrap();

    assert!(http.calls().is_empty());
    assert!(client.registry().is_empty());
}
