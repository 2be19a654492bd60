use serde_json::{Value, json};
use tablewire_types::{FilloutCredentials, FilloutWebhookState};

use crate::error::Result;
use crate::fillout::client::FilloutClient;
use crate::traits::{HookContext, read_state, write_state};

/// State-store key for one Fillout trigger's subscription.
pub const STATE_KEY: &str = "filloutWebhook";

/// Webhook trigger that fires when one form receives a submission.
pub struct FilloutTrigger {
    form_id: String,
    credentials: FilloutCredentials,
}

impl FilloutTrigger {
    pub fn new(form_id: impl Into<String>, credentials: FilloutCredentials) -> Self {
        Self {
            form_id: form_id.into(),
            credentials,
        }
    }

    /// The service has no webhook lookup endpoint; a stored id means the
    /// subscription is assumed alive.
    pub fn exists(&self, ctx: &mut HookContext<'_>) -> Result<bool> {
        Ok(read_state::<FilloutWebhookState>(ctx.state, STATE_KEY).is_some())
    }

    /// Create the subscription and persist its state.
    pub fn register(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let client = FilloutClient::new(ctx.transport, &self.credentials);
        let created = client.create_webhook(&self.form_id, ctx.callback_url)?;

        let state = FilloutWebhookState {
            webhook_id: created.id.into_string(),
            form_id: self.form_id.clone(),
        };
        write_state(ctx.state, STATE_KEY, &state)
    }

    /// Drop the subscription. Local state is cleared even when the remote
    /// delete fails; the return value reports whether the service
    /// acknowledged it.
    pub fn unregister(&self, ctx: &mut HookContext<'_>) -> Result<bool> {
        let Some(state) = read_state::<FilloutWebhookState>(ctx.state, STATE_KEY) else {
            return Ok(false);
        };

        let client = FilloutClient::new(ctx.transport, &self.credentials);
        let deleted = client.delete_webhook(&state.webhook_id);
        ctx.state.remove(STATE_KEY);
        Ok(deleted.is_ok())
    }

    /// Pass one delivered submission through as a single record.
    ///
    /// String bodies are re-parsed; anything that still is not a JSON
    /// object wraps under a `rawData` key so the workflow always receives
    /// an object.
    pub fn receive(&self, _ctx: &mut HookContext<'_>, body: &Value) -> Result<Vec<Value>> {
        let record = match body {
            Value::Object(_) => body.clone(),
            Value::String(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(map)) => Value::Object(map),
                _ => json!({ "rawData": raw }),
            },
            other => json!({ "rawData": other }),
        };

        Ok(vec![record])
    }
}
