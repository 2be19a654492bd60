use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subscription state for one Airtable trigger, persisted through the
/// host's workflow-scoped state store under a single key.
///
/// `cursor` is the next payload-page cursor to request; a fresh
/// subscription starts at 1. `mac_secret_base64` is returned by the
/// service at registration time and kept for the host's ingestion layer,
/// which owns delivery signature checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirtableWebhookState {
    pub webhook_id: String,
    pub base_id: String,
    pub mac_secret_base64: String,
    #[serde(default = "initial_cursor")]
    pub cursor: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<DateTime<Utc>>,
}

fn initial_cursor() -> u64 {
    1
}

/// Subscription state for one Fillout trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilloutWebhookState {
    pub webhook_id: String,
    pub form_id: String,
}
