//! Canned webhook payloads and API responses shared across connector tests.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::{Value, json};

/// Write a payload fixture under `dir` for CLI-style tests.
pub fn write_payload_file(dir: &Path, name: &str, value: &Value) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value)?)?;
    Ok(path)
}

/// A webhook payload with one changed record (`fldA` rewritten, `fldB`
/// untouched, `fldC` delivered as unchanged context) and one created
/// record.
pub fn airtable_payload() -> Value {
    json!({
        "timestamp": "2024-03-01T12:00:00.000Z",
        "baseTransactionNumber": 42,
        "changedTablesById": {
            "tblTasks": {
                "changedRecordsById": {
                    "recChanged": {
                        "current": { "cellValuesByFieldId": { "fldA": "x", "fldB": 5 } },
                        "previous": { "cellValuesByFieldId": { "fldA": "y", "fldB": 5 } },
                        "unchanged": { "cellValuesByFieldId": { "fldC": "z" } },
                    }
                },
                "createdRecordsById": {
                    "recNew": {
                        "cellValuesByFieldId": { "fldA": "fresh" },
                        "createdTime": "2024-03-01T11:59:00.000Z",
                    }
                },
            }
        }
    })
}

/// One page of the payload-listing endpoint.
pub fn airtable_payload_page(payloads: Vec<Value>, cursor: u64, might_have_more: bool) -> Value {
    json!({
        "payloads": payloads,
        "cursor": cursor,
        "mightHaveMore": might_have_more,
    })
}

/// Notification ping announcing new payloads for a subscription.
pub fn airtable_ping(base_id: &str, webhook_id: &str) -> Value {
    json!({
        "base": { "id": base_id },
        "webhook": { "id": webhook_id },
        "timestamp": "2024-03-01T12:00:01.000Z",
    })
}

/// Registration response for a fresh Airtable webhook.
pub fn airtable_webhook_created(webhook_id: &str) -> Value {
    json!({
        "id": webhook_id,
        "macSecretBase64": "c2VjcmV0LXNlY3JldA==",
        "expirationTime": "2024-03-08T12:00:00.000Z",
    })
}

/// A delivered Fillout form submission.
pub fn fillout_submission() -> Value {
    json!({
        "submissionId": "sub_123",
        "submissionTime": "2024-03-01T12:00:00.000Z",
        "questions": [
            { "id": "qName", "name": "Name", "value": "Ada" },
            { "id": "qEmail", "name": "Email", "value": "ada@example.com" },
        ],
    })
}
