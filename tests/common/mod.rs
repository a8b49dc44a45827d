#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cadence::builder::{CreateAutocompleteResponse, CreateInteractionResponseMessage};
use cadence::http::{HttpError, InteractionHttp};
use cadence::model::application::Interaction;
use cadence::model::channel::Message;
use cadence::model::id::{ApplicationId, MessageId};
use cadence::{async_trait, Client, Result};
use parking_lot::Mutex;
use serde_json::{json, Value};

/// One request received by [`MockHttp`].
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub kind: &'static str,
    pub content: Option<String>,
    pub ephemeral: bool,
}

impl Call {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            content: None,
            ephemeral: false,
        }
    }

    fn with(kind: &'static str, content: &CreateInteractionResponseMessage) -> Self {
        Self {
            kind,
            content: content.get_content().map(ToOwned::to_owned),
            ephemeral: content.is_ephemeral(),
        }
    }
}

/// Records every request and answers with a fresh message, unless a failure was queued.
#[derive(Clone, Default)]
pub struct MockHttp {
    calls: Arc<Mutex<Vec<Call>>>,
    failures: Arc<Mutex<VecDeque<HttpError>>>,
    delay: Arc<Mutex<Option<Duration>>>,
    next_id: Arc<AtomicU64>,
}

impl MockHttp {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.calls.lock().iter().map(|call| call.kind).collect()
    }

    /// Makes the next request fail with `error`.
    pub fn fail_next(&self, error: HttpError) {
        self.failures.lock().push_back(error);
    }

    /// Makes every request take `delay` before it is answered.
    pub fn delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    async fn request(&self, call: Call) -> Result<()> {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.failures.lock().pop_front() {
            return Err(error.into());
        }

        self.calls.lock().push(call);
        Ok(())
    }

    async fn message(&self, call: Call) -> Result<Option<Message>> {
        let content = call.content.clone().unwrap_or_default();
        self.request(call).await?;

        let id = 100 + self.next_id.fetch_add(1, Ordering::Relaxed);
        let message = json!({"id": id.to_string(), "channel_id": "4", "content": content});
        Ok(Some(serde_json::from_value(message)?))
    }
}

#[async_trait]
impl InteractionHttp for MockHttp {
    async fn send_deferred_acknowledgement(
        &self,
        _: &Interaction,
        ephemeral: bool,
    ) -> Result<()> {
        let mut call = Call::new("defer");
        call.ephemeral = ephemeral;
        self.request(call).await
    }

    async fn send_component_acknowledgement(&self, _: &Interaction) -> Result<()> {
        self.request(Call::new("component_ack")).await
    }

    async fn send_first_response(
        &self,
        _: &Interaction,
        content: &CreateInteractionResponseMessage,
    ) -> Result<Option<Message>> {
        self.message(Call::with("create", content)).await
    }

    async fn update_component_message(
        &self,
        _: &Interaction,
        content: &CreateInteractionResponseMessage,
    ) -> Result<Option<Message>> {
        self.message(Call::with("update", content)).await
    }

    async fn edit_deferred_response(
        &self,
        _: &Interaction,
        content: &CreateInteractionResponseMessage,
    ) -> Result<Option<Message>> {
        self.message(Call::with("edit", content)).await
    }

    async fn send_followup(
        &self,
        _: &Interaction,
        content: &CreateInteractionResponseMessage,
        ephemeral: bool,
    ) -> Result<Option<Message>> {
        let mut call = Call::with("followup", content);
        call.ephemeral = ephemeral;
        self.message(call).await
    }

    async fn edit_followup(
        &self,
        _: &Interaction,
        _: MessageId,
        content: &CreateInteractionResponseMessage,
    ) -> Result<Option<Message>> {
        self.message(Call::with("edit_followup", content)).await
    }

    async fn send_autocomplete_result(
        &self,
        _: &Interaction,
        choices: &CreateAutocompleteResponse,
    ) -> Result<()> {
        let names = choices.get_choices().iter().map(|choice| choice.name.clone());
        let mut call = Call::new("autocomplete");
        call.content = Some(names.collect::<Vec<_>>().join(","));
        self.request(call).await
    }
}

pub fn client(http: &MockHttp) -> Client {
    Client::builder(ApplicationId::new(7), http.clone()).build()
}

fn interaction(id: u64, kind: u8, data: Value) -> Interaction {
    serde_json::from_value(json!({
        "id": id.to_string(),
        "application_id": "7",
        "type": kind,
        "token": "token",
        "channel_id": "4",
        "user": {"id": "9", "username": "ferris"},
        "data": data,
    }))
    .unwrap()
}

/// A chat input command invocation.
pub fn command(id: u64, name: &str, options: Value) -> Interaction {
    interaction(id, 2, json!({"id": "1", "name": name, "type": 1, "options": options}))
}

/// An auto-completion request; one of `options` must be `focused`.
pub fn autocomplete(id: u64, name: &str, options: Value) -> Interaction {
    interaction(id, 4, json!({"id": "1", "name": name, "type": 1, "options": options}))
}

pub fn button(id: u64, custom_id: &str) -> Interaction {
    interaction(id, 3, json!({"custom_id": custom_id, "component_type": 2}))
}

pub fn select(id: u64, custom_id: &str, values: &[&str]) -> Interaction {
    interaction(id, 3, json!({"custom_id": custom_id, "component_type": 3, "values": values}))
}

/// A form submit with one text input per `(custom_id, value)` pair.
pub fn form(id: u64, custom_id: &str, fields: &[(&str, &str)]) -> Interaction {
    let rows = fields
        .iter()
        .map(|(custom_id, value)| {
            json!({"type": 1, "components": [{"type": 4, "custom_id": custom_id, "value": value}]})
        })
        .collect::<Vec<_>>();

    interaction(id, 5, json!({"custom_id": custom_id, "components": rows}))
}
