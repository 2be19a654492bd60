use serde_json::Value;
use tablewire_types::{AirtableCredentials, AirtableWebhookState, IncludePolicy};

use crate::airtable::client::AirtableClient;
use crate::airtable::normalize::normalize_payload;
use crate::airtable::schema::{
    CreateWebhookRequest, NotificationPing, WebhookFilters, WebhookIncludes, WebhookOptions,
    WebhookSpecification,
};
use crate::error::{Error, Result};
use crate::traits::{HookContext, read_state, write_state};

/// State-store key for one Airtable trigger's subscription.
pub const STATE_KEY: &str = "airtableWebhook";

/// Record events a trigger can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    RecordCreated,
    RecordUpdated,
}

impl ChangeType {
    pub(crate) fn wire_name(self) -> &'static str {
        match self {
            ChangeType::RecordCreated => "add",
            ChangeType::RecordUpdated => "update",
        }
    }
}

/// Host-supplied parameters for one Airtable trigger node.
#[derive(Debug, Clone)]
pub struct TriggerConfig {
    pub base: String,
    pub table: String,
    /// Field ids whose writes fire the webhook. Empty watches the whole
    /// table.
    pub fields_to_watch: Vec<String>,
    /// Field ids attached as context on every emitted change.
    pub fields_to_include: Vec<String>,
    /// Attach everything delivered in the unchanged snapshot instead of the
    /// allow-list.
    pub include_all_unchanged: bool,
    /// Ask the service to deliver previous cell values. Without them no
    /// change entries can be produced.
    pub include_previous_values: bool,
    pub event_types: Vec<ChangeType>,
}

impl TriggerConfig {
    pub(crate) fn include_policy(&self) -> IncludePolicy {
        if self.include_all_unchanged {
            IncludePolicy::AllUnchanged
        } else {
            IncludePolicy::Fields(self.fields_to_include.clone())
        }
    }

    fn watches(&self, change_type: ChangeType) -> bool {
        self.event_types.contains(&change_type)
    }
}

/// Webhook trigger for one Airtable table.
///
/// The host drives the lifecycle: `exists`/`register` on activation,
/// `receive` per delivered notification, `unregister` on deactivation.
pub struct AirtableTrigger {
    config: TriggerConfig,
    credentials: AirtableCredentials,
}

impl AirtableTrigger {
    pub fn new(config: TriggerConfig, credentials: AirtableCredentials) -> Self {
        Self {
            config,
            credentials,
        }
    }

    /// Whether the stored subscription still exists on the service side.
    ///
    /// A failed lookup reads as "gone": the host then re-registers, and the
    /// stale subscription expires server-side.
    pub fn exists(&self, ctx: &mut HookContext<'_>) -> Result<bool> {
        let Some(state) = read_state::<AirtableWebhookState>(ctx.state, STATE_KEY) else {
            return Ok(false);
        };

        let client = AirtableClient::new(ctx.transport, &self.credentials);
        match client.list_webhooks(&state.base_id) {
            Ok(webhooks) => Ok(webhooks.iter().any(|hook| hook.id == state.webhook_id)),
            Err(_) => Ok(false),
        }
    }

    /// Create the subscription and persist its state.
    pub fn register(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let client = AirtableClient::new(ctx.transport, &self.credentials);
        let request = self.webhook_request(ctx.callback_url);
        let response = client.create_webhook(&self.config.base, &request)?;

        let state = AirtableWebhookState {
            webhook_id: response.id,
            base_id: self.config.base.clone(),
            mac_secret_base64: response.mac_secret_base64,
            cursor: 1,
            expiration_time: response.expiration_time,
        };
        write_state(ctx.state, STATE_KEY, &state)
    }

    /// Drop the subscription.
    ///
    /// Local state is cleared even when the remote delete fails; the return
    /// value reports whether the service acknowledged the delete.
    pub fn unregister(&self, ctx: &mut HookContext<'_>) -> Result<bool> {
        let Some(state) = read_state::<AirtableWebhookState>(ctx.state, STATE_KEY) else {
            return Ok(false);
        };

        let client = AirtableClient::new(ctx.transport, &self.credentials);
        let deleted = client.delete_webhook(&state.base_id, &state.webhook_id);
        ctx.state.remove(STATE_KEY);
        Ok(deleted.is_ok())
    }

    /// Drain new payloads after a notification ping and flatten them into
    /// the records the host emits.
    ///
    /// The advanced cursor is persisted even when nothing normalized, so a
    /// later ping never re-delivers the same batch.
    pub fn receive(&self, ctx: &mut HookContext<'_>, body: &Value) -> Result<Vec<Value>> {
        let mut state: AirtableWebhookState = read_state(ctx.state, STATE_KEY)
            .ok_or_else(|| Error::State("no stored webhook subscription".to_string()))?;

        // Deliveries addressed to an earlier subscription of this workflow
        // are dropped without paging.
        if let Ok(ping) = serde_json::from_value::<NotificationPing>(body.clone()) {
            if ping.webhook.id != state.webhook_id {
                return Ok(Vec::new());
            }
        }

        let client = AirtableClient::new(ctx.transport, &self.credentials);
        let policy = self.config.include_policy();
        let mut records = Vec::new();

        loop {
            let page = client.list_payloads(&state.base_id, &state.webhook_id, state.cursor)?;
            for payload in &page.payloads {
                let normalized = normalize_payload(payload, &policy);
                if self.config.watches(ChangeType::RecordUpdated) {
                    for change in &normalized.changes {
                        records.push(serde_json::to_value(change)?);
                    }
                }
                if self.config.watches(ChangeType::RecordCreated) {
                    for created in &normalized.created {
                        records.push(serde_json::to_value(created)?);
                    }
                }
            }
            state.cursor = page.cursor;
            if !page.might_have_more {
                break;
            }
        }

        write_state(ctx.state, STATE_KEY, &state)?;
        Ok(records)
    }

    fn webhook_request(&self, callback_url: &str) -> CreateWebhookRequest {
        CreateWebhookRequest {
            notification_url: callback_url.to_string(),
            specification: WebhookSpecification {
                options: WebhookOptions {
                    filters: WebhookFilters {
                        data_types: vec!["tableData".to_string()],
                        record_change_scope: Some(self.config.table.clone()),
                        watch_data_in_field_ids: self.config.fields_to_watch.clone(),
                        change_types: self
                            .config
                            .event_types
                            .iter()
                            .map(|event| event.wire_name().to_string())
                            .collect(),
                    },
                    includes: Some(WebhookIncludes {
                        include_previous_cell_values: self.config.include_previous_values,
                        include_cell_values_in_field_ids: (!self.config.fields_to_include.is_empty())
                            .then(|| self.config.fields_to_include.clone()),
                    }),
                },
            },
        }
    }
}
