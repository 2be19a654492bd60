use serde_json::json;
use tablewire_connectors::airtable::hooks::STATE_KEY;
use tablewire_connectors::airtable::{AirtableTrigger, ChangeType, TriggerConfig};
use tablewire_connectors::{HookContext, Method, StateStore};
use tablewire_testing::{MemoryStateStore, MockTransport, fixtures};
use tablewire_types::{AirtableCredentials, AirtableWebhookState};

fn update_config() -> TriggerConfig {
    TriggerConfig {
        base: "appBase1".to_string(),
        table: "tblTasks".to_string(),
        fields_to_watch: vec!["fldA".to_string()],
        fields_to_include: vec!["fldC".to_string()],
        include_all_unchanged: false,
        include_previous_values: true,
        event_types: vec![ChangeType::RecordUpdated],
    }
}

fn trigger(config: TriggerConfig) -> AirtableTrigger {
    AirtableTrigger::new(config, AirtableCredentials::new("key_test"))
}

fn stored_state(store: &MemoryStateStore) -> AirtableWebhookState {
    serde_json::from_value(store.get(STATE_KEY).expect("no subscription state stored"))
        .expect("stored state has an unexpected shape")
}

#[test]
fn register_creates_webhook_and_stores_state() {
    let transport = MockTransport::new().respond_with(fixtures::airtable_webhook_created("ach123"));
    let mut store = MemoryStateStore::new();
    let mut ctx = HookContext {
        transport: &transport,
        state: &mut store,
        callback_url: "https://host.example/hooks/wf1",
    };

    trigger(update_config()).register(&mut ctx).unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Post);
    assert_eq!(
        requests[0].url,
        "https://api.airtable.com/v0/bases/appBase1/webhooks"
    );
    assert!(
        requests[0]
            .headers
            .contains(&("Authorization".to_string(), "Bearer key_test".to_string()))
    );

    let body = requests[0].body.as_ref().unwrap();
    assert_eq!(body["notificationUrl"], "https://host.example/hooks/wf1");
    let filters = &body["specification"]["options"]["filters"];
    assert_eq!(filters["dataTypes"], json!(["tableData"]));
    assert_eq!(filters["recordChangeScope"], "tblTasks");
    assert_eq!(filters["watchDataInFieldIds"], json!(["fldA"]));
    assert_eq!(filters["changeTypes"], json!(["update"]));
    let includes = &body["specification"]["options"]["includes"];
    assert_eq!(includes["includePreviousCellValues"], true);
    assert_eq!(includes["includeCellValuesInFieldIds"], json!(["fldC"]));

    let state = stored_state(&store);
    assert_eq!(state.webhook_id, "ach123");
    assert_eq!(state.base_id, "appBase1");
    assert_eq!(state.cursor, 1);
    assert!(!state.mac_secret_base64.is_empty());
}

#[test]
fn receive_pages_payloads_and_advances_cursor() {
    let transport = MockTransport::new()
        .respond_with(fixtures::airtable_payload_page(
            vec![fixtures::airtable_payload()],
            2,
            true,
        ))
        .respond_with(fixtures::airtable_payload_page(Vec::new(), 3, false));
    let mut store = MemoryStateStore::new();
    store.set(
        STATE_KEY,
        json!({
            "webhookId": "ach123",
            "baseId": "appBase1",
            "macSecretBase64": "c2VjcmV0",
            "cursor": 1,
        }),
    );
    let mut ctx = HookContext {
        transport: &transport,
        state: &mut store,
        callback_url: "https://host.example/hooks/wf1",
    };

    let records = trigger(update_config())
        .receive(&mut ctx, &fixtures::airtable_ping("appBase1", "ach123"))
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["recordId"], "recChanged");
    assert_eq!(records[0]["fieldId"], "fldA");
    assert_eq!(records[0]["current"], "x");
    assert_eq!(records[0]["previous"], "y");
    assert_eq!(
        records[0]["includedData"],
        json!([{ "fieldId": "fldC", "value": "z" }])
    );

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].url,
        "https://api.airtable.com/v0/bases/appBase1/webhooks/ach123/payloads"
    );
    assert_eq!(requests[0].query_value("cursor"), Some("1"));
    assert_eq!(requests[1].query_value("cursor"), Some("2"));

    assert_eq!(stored_state(&store).cursor, 3);
}

#[test]
fn receive_emits_created_records_when_watched() {
    let mut config = update_config();
    config.event_types = vec![ChangeType::RecordUpdated, ChangeType::RecordCreated];

    let transport = MockTransport::new().respond_with(fixtures::airtable_payload_page(
        vec![fixtures::airtable_payload()],
        2,
        false,
    ));
    let mut store = MemoryStateStore::new();
    store.set(
        STATE_KEY,
        json!({
            "webhookId": "ach123",
            "baseId": "appBase1",
            "macSecretBase64": "c2VjcmV0",
            "cursor": 1,
        }),
    );
    let mut ctx = HookContext {
        transport: &transport,
        state: &mut store,
        callback_url: "https://host.example/hooks/wf1",
    };

    let records = trigger(config)
        .receive(&mut ctx, &fixtures::airtable_ping("appBase1", "ach123"))
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["recordId"], "recNew");
    assert_eq!(records[1]["fields"], json!({ "fldA": "fresh" }));
}

#[test]
fn stale_ping_is_dropped_without_paging() {
    let transport = MockTransport::new();
    let mut store = MemoryStateStore::new();
    store.set(
        STATE_KEY,
        json!({
            "webhookId": "ach123",
            "baseId": "appBase1",
            "macSecretBase64": "c2VjcmV0",
            "cursor": 4,
        }),
    );
    let mut ctx = HookContext {
        transport: &transport,
        state: &mut store,
        callback_url: "https://host.example/hooks/wf1",
    };

    let records = trigger(update_config())
        .receive(&mut ctx, &fixtures::airtable_ping("appBase1", "achStale"))
        .unwrap();

    assert!(records.is_empty());
    assert!(transport.requests().is_empty());
    assert_eq!(stored_state(&store).cursor, 4);
}

#[test]
fn cursor_persists_even_when_nothing_normalized() {
    let transport =
        MockTransport::new().respond_with(fixtures::airtable_payload_page(Vec::new(), 9, false));
    let mut store = MemoryStateStore::new();
    store.set(
        STATE_KEY,
        json!({
            "webhookId": "ach123",
            "baseId": "appBase1",
            "macSecretBase64": "c2VjcmV0",
            "cursor": 7,
        }),
    );
    let mut ctx = HookContext {
        transport: &transport,
        state: &mut store,
        callback_url: "https://host.example/hooks/wf1",
    };

    let records = trigger(update_config())
        .receive(&mut ctx, &fixtures::airtable_ping("appBase1", "ach123"))
        .unwrap();

    assert!(records.is_empty());
    assert_eq!(stored_state(&store).cursor, 9);
}

#[test]
fn exists_checks_stored_id_against_webhook_list() {
    let transport = MockTransport::new().respond_with(json!({
        "webhooks": [
            { "id": "achOther", "isHookEnabled": true },
            { "id": "ach123", "isHookEnabled": true },
        ]
    }));
    let mut store = MemoryStateStore::new();
    store.set(
        STATE_KEY,
        json!({
            "webhookId": "ach123",
            "baseId": "appBase1",
            "macSecretBase64": "c2VjcmV0",
            "cursor": 1,
        }),
    );
    let mut ctx = HookContext {
        transport: &transport,
        state: &mut store,
        callback_url: "https://host.example/hooks/wf1",
    };

    assert!(trigger(update_config()).exists(&mut ctx).unwrap());
    assert_eq!(
        transport.requests()[0].url,
        "https://api.airtable.com/v0/bases/appBase1/webhooks"
    );
}

#[test]
fn exists_without_state_skips_the_api() {
    let transport = MockTransport::new();
    let mut store = MemoryStateStore::new();
    let mut ctx = HookContext {
        transport: &transport,
        state: &mut store,
        callback_url: "https://host.example/hooks/wf1",
    };

    assert!(!trigger(update_config()).exists(&mut ctx).unwrap());
    assert!(transport.requests().is_empty());
}

#[test]
fn exists_treats_lookup_failure_as_gone() {
    let transport = MockTransport::new().fail_with(None, "connection timed out");
    let mut store = MemoryStateStore::new();
    store.set(
        STATE_KEY,
        json!({
            "webhookId": "ach123",
            "baseId": "appBase1",
            "macSecretBase64": "c2VjcmV0",
            "cursor": 1,
        }),
    );
    let mut ctx = HookContext {
        transport: &transport,
        state: &mut store,
        callback_url: "https://host.example/hooks/wf1",
    };

    assert!(!trigger(update_config()).exists(&mut ctx).unwrap());
}

#[test]
fn unregister_clears_state_even_when_delete_fails() {
    let transport = MockTransport::new().fail_with(Some(500), "server error");
    let mut store = MemoryStateStore::new();
    store.set(
        STATE_KEY,
        json!({
            "webhookId": "ach123",
            "baseId": "appBase1",
            "macSecretBase64": "c2VjcmV0",
            "cursor": 1,
        }),
    );
    let mut ctx = HookContext {
        transport: &transport,
        state: &mut store,
        callback_url: "https://host.example/hooks/wf1",
    };

    let acknowledged = trigger(update_config()).unregister(&mut ctx).unwrap();
    assert!(!acknowledged);
    assert!(store.get(STATE_KEY).is_none());

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Delete);
    assert_eq!(
        requests[0].url,
        "https://api.airtable.com/v0/bases/appBase1/webhooks/ach123"
    );
}

#[test]
fn unregister_without_state_is_a_noop() {
    let transport = MockTransport::new();
    let mut store = MemoryStateStore::new();
    let mut ctx = HookContext {
        transport: &transport,
        state: &mut store,
        callback_url: "https://host.example/hooks/wf1",
    };

    assert!(!trigger(update_config()).unregister(&mut ctx).unwrap());
    assert!(transport.requests().is_empty());
}
