use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tablewire_types::CellValues;

/// One page of `GET /meta/bases`.
#[derive(Debug, Deserialize)]
pub struct BasesPage {
    #[serde(default)]
    pub bases: Vec<Base>,
    #[serde(default)]
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Base {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub permission_level: Option<String>,
}

/// Response of `GET /meta/bases/{baseId}/tables`.
#[derive(Debug, Deserialize)]
pub struct TableSchemaPage {
    #[serde(default)]
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Table {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldSchema {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub field_type: Option<String>,
}

// --- Webhook registration ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebhookRequest {
    pub notification_url: String,
    pub specification: WebhookSpecification,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookSpecification {
    pub options: WebhookOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookOptions {
    pub filters: WebhookFilters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub includes: Option<WebhookIncludes>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookFilters {
    /// Always `["tableData"]` for record-change subscriptions.
    pub data_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_change_scope: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub watch_data_in_field_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub change_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookIncludes {
    pub include_previous_cell_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_cell_values_in_field_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebhookResponse {
    pub id: String,
    pub mac_secret_base64: String,
    #[serde(default)]
    pub expiration_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookList {
    #[serde(default)]
    pub webhooks: Vec<WebhookInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookInfo {
    pub id: String,
    #[serde(default)]
    pub is_hook_enabled: bool,
    #[serde(default)]
    pub expiration_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshWebhookResponse {
    #[serde(default)]
    pub expiration_time: Option<DateTime<Utc>>,
}

// --- Webhook delivery ---

/// Ping body the service POSTs when new payloads are ready to fetch.
/// Carries no record data; the trigger pages `/payloads` in response.
#[derive(Debug, Deserialize)]
pub struct NotificationPing {
    pub base: ResourceRef,
    pub webhook: ResourceRef,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ResourceRef {
    pub id: String,
}

/// One page of `GET /bases/{baseId}/webhooks/{webhookId}/payloads`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadsPage {
    #[serde(default)]
    pub payloads: Vec<WebhookPayload>,
    /// Cursor to request next; the service returns it pre-advanced.
    pub cursor: u64,
    #[serde(default)]
    pub might_have_more: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub base_transaction_number: Option<u64>,
    #[serde(default)]
    pub changed_tables_by_id: BTreeMap<String, TableChanges>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableChanges {
    #[serde(default)]
    pub changed_records_by_id: BTreeMap<String, ChangedRecord>,
    #[serde(default)]
    pub created_records_by_id: BTreeMap<String, CreatedRecordData>,
}

/// The per-record snapshots delivered for one changed record. Any of the
/// three may be missing depending on the subscription's includes.
#[derive(Debug, Default, Deserialize)]
pub struct ChangedRecord {
    #[serde(default)]
    pub current: Option<CellSnapshot>,
    #[serde(default)]
    pub previous: Option<CellSnapshot>,
    #[serde(default)]
    pub unchanged: Option<CellSnapshot>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellSnapshot {
    #[serde(default)]
    pub cell_values_by_field_id: CellValues,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRecordData {
    #[serde(default)]
    pub cell_values_by_field_id: CellValues,
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_page_tolerates_missing_optionals() {
        let page: PayloadsPage = serde_json::from_value(json!({
            "payloads": [
                {
                    "timestamp": "2024-03-01T12:00:00.000Z",
                    "changedTablesById": {
                        "tbl1": {
                            "changedRecordsById": {
                                "rec1": {
                                    "current": { "cellValuesByFieldId": { "fldA": "x" } },
                                    "previous": { "cellValuesByFieldId": { "fldA": "y" } },
                                }
                            }
                        }
                    }
                },
                {}
            ],
            "cursor": 3,
        }))
        .unwrap();

        assert_eq!(page.cursor, 3);
        assert!(!page.might_have_more);
        assert_eq!(page.payloads.len(), 2);

        let tables = &page.payloads[0].changed_tables_by_id;
        let record = &tables["tbl1"].changed_records_by_id["rec1"];
        assert!(record.current.is_some());
        assert!(record.unchanged.is_none());
        assert!(page.payloads[1].changed_tables_by_id.is_empty());
    }

    #[test]
    fn webhook_request_omits_empty_filter_lists() {
        let request = CreateWebhookRequest {
            notification_url: "https://host.example/hooks/abc".to_string(),
            specification: WebhookSpecification {
                options: WebhookOptions {
                    filters: WebhookFilters {
                        data_types: vec!["tableData".to_string()],
                        record_change_scope: Some("tbl1".to_string()),
                        watch_data_in_field_ids: Vec::new(),
                        change_types: vec!["update".to_string()],
                    },
                    includes: None,
                },
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "notificationUrl": "https://host.example/hooks/abc",
                "specification": {
                    "options": {
                        "filters": {
                            "dataTypes": ["tableData"],
                            "recordChangeScope": "tbl1",
                            "changeTypes": ["update"],
                        }
                    }
                }
            })
        );
    }
}
