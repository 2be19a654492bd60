use serde_json::json;
use tablewire_connectors::airtable::{AirtableClient, options};
use tablewire_testing::MockTransport;
use tablewire_types::AirtableCredentials;

#[test]
fn base_options_follow_offset_pagination() {
    let transport = MockTransport::new()
        .respond_with(json!({
            "bases": [{ "id": "app1", "name": "CRM" }],
            "offset": "itr2",
        }))
        .respond_with(json!({
            "bases": [{ "id": "app2", "name": "Roadmap" }],
        }));
    let credentials = AirtableCredentials::new("key_test");
    let client = AirtableClient::new(&transport, &credentials);

    let bases = options::base_options(&client).unwrap();
    assert_eq!(bases.len(), 2);
    assert_eq!(bases[0].name, "CRM");
    assert_eq!(bases[1].value, "app2");

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url, "https://api.airtable.com/v0/meta/bases");
    assert_eq!(requests[0].query_value("offset"), None);
    assert_eq!(requests[1].query_value("offset"), Some("itr2"));
}

#[test]
fn field_options_resolve_one_table_from_the_base_schema() {
    let transport = MockTransport::new().respond_with(json!({
        "tables": [
            {
                "id": "tbl1",
                "name": "Tasks",
                "fields": [
                    { "id": "fldA", "name": "Name", "type": "singleLineText" },
                    { "id": "fldB", "name": "Done", "type": "checkbox" },
                ],
            },
            { "id": "tbl2", "name": "Projects", "fields": [] },
        ]
    }));
    let credentials = AirtableCredentials::new("key_test");
    let client = AirtableClient::new(&transport, &credentials);

    let fields = options::field_options(&client, "app1", "tbl1").unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].name, "Name");
    assert_eq!(fields[0].value, "fldA");
    assert_eq!(fields[0].description.as_deref(), Some("Type: singleLineText"));

    assert_eq!(
        transport.requests()[0].url,
        "https://api.airtable.com/v0/meta/bases/app1/tables"
    );
}

#[test]
fn field_options_for_an_unknown_table_are_empty() {
    let transport = MockTransport::new().respond_with(json!({
        "tables": [{ "id": "tbl2", "name": "Projects", "fields": [] }]
    }));
    let credentials = AirtableCredentials::new("key_test");
    let client = AirtableClient::new(&transport, &credentials);

    let fields = options::field_options(&client, "app1", "tblMissing").unwrap();
    assert!(fields.is_empty());
}
