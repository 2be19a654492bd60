use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use serde_json::Value;
use tablewire_connectors::airtable::schema::{ChangedRecord, PayloadsPage, WebhookPayload};
use tablewire_connectors::{
    all_connectors, extract_field_changes, normalize_payload, registry::ConnectorKind,
};
use tablewire_types::{CreatedRecord, FieldChange, IncludePolicy};

use crate::args::{Cli, Commands};

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Normalize {
            input,
            include,
            all_unchanged,
            created,
            pretty,
        } => {
            let policy = if all_unchanged {
                IncludePolicy::AllUnchanged
            } else {
                IncludePolicy::Fields(include)
            };
            normalize(&input, &policy, created, pretty)
        }
        Commands::Connectors => {
            list_connectors();
            Ok(())
        }
    }
}

fn normalize(input: &PathBuf, policy: &IncludePolicy, created: bool, pretty: bool) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", input.display()))?;

    let (changes, created_records) = flatten(value, policy)
        .with_context(|| format!("{} is not a recognized payload shape", input.display()))?;

    for change in &changes {
        print_record(&serde_json::to_value(change)?, pretty)?;
    }
    if created {
        for record in &created_records {
            print_record(&serde_json::to_value(record)?, pretty)?;
        }
    }

    Ok(())
}

/// Accepts a full webhook payload, one page of the payload-listing
/// endpoint, or a bare changedRecordsById map.
fn flatten(
    value: Value,
    policy: &IncludePolicy,
) -> Result<(Vec<FieldChange>, Vec<CreatedRecord>)> {
    if value.get("changedTablesById").is_some() {
        let payload: WebhookPayload = serde_json::from_value(value)?;
        let records = normalize_payload(&payload, policy);
        return Ok((records.changes, records.created));
    }

    if value.get("payloads").is_some() {
        let page: PayloadsPage = serde_json::from_value(value)?;
        let mut changes = Vec::new();
        let mut created = Vec::new();
        for payload in &page.payloads {
            let records = normalize_payload(payload, policy);
            changes.extend(records.changes);
            created.extend(records.created);
        }
        return Ok((changes, created));
    }

    let batch: BTreeMap<String, ChangedRecord> = serde_json::from_value(value)?;
    Ok((extract_field_changes(&batch, policy), Vec::new()))
}

fn print_record(record: &Value, pretty: bool) -> Result<()> {
    if pretty {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}

fn list_connectors() {
    let use_color = std::io::stdout().is_terminal();

    for connector in all_connectors() {
        let kind = match connector.kind {
            ConnectorKind::Trigger => "trigger",
            ConnectorKind::Action => "action",
        };
        let name = format!("{:<18}", connector.name);
        let kind = format!("{:<8}", kind);
        if use_color {
            println!("{} {} {}", name.bold(), kind.dimmed(), connector.description);
        } else {
            println!("{} {} {}", name, kind, connector.description);
        }
    }
}
