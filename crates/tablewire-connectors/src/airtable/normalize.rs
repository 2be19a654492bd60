use std::collections::BTreeMap;

use tablewire_types::{CellValues, CreatedRecord, FieldChange, IncludePolicy, IncludedField};

use crate::airtable::schema::{ChangedRecord, CreatedRecordData, WebhookPayload};

/// Flatten a batch of changed records into one entry per rewritten cell.
///
/// A (record, field) pair is reported only when the field id is present in
/// both the current and previous snapshots with structurally different
/// values. Fields appearing for the first time in `current` are creations,
/// not changes, and are skipped; a record without a current snapshot is
/// skipped entirely. Absent or malformed snapshots never error.
pub fn extract_field_changes(
    changed_records_by_id: &BTreeMap<String, ChangedRecord>,
    policy: &IncludePolicy,
) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    for (record_id, record) in changed_records_by_id {
        let Some(current) = record.current.as_ref().map(|s| &s.cell_values_by_field_id) else {
            continue;
        };
        let previous = record.previous.as_ref().map(|s| &s.cell_values_by_field_id);
        let unchanged = record.unchanged.as_ref().map(|s| &s.cell_values_by_field_id);

        for (field_id, current_value) in current {
            let Some(previous_value) = previous.and_then(|cells| cells.get(field_id)) else {
                continue;
            };
            if current_value == previous_value {
                continue;
            }

            changes.push(FieldChange {
                record_id: record_id.clone(),
                field_id: field_id.clone(),
                current: current_value.clone(),
                previous: previous_value.clone(),
                included: included_context(policy, unchanged, current),
            });
        }
    }

    changes
}

/// Select the context fields that ride along with one emitted change.
fn included_context(
    policy: &IncludePolicy,
    unchanged: Option<&CellValues>,
    current: &CellValues,
) -> Vec<IncludedField> {
    match policy {
        IncludePolicy::AllUnchanged => unchanged
            .map(|cells| {
                cells
                    .iter()
                    .map(|(field_id, value)| IncludedField {
                        field_id: field_id.clone(),
                        value: value.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        IncludePolicy::Fields(field_ids) => field_ids
            .iter()
            .filter_map(|field_id| {
                let value = unchanged
                    .and_then(|cells| cells.get(field_id))
                    .or_else(|| current.get(field_id))?;
                Some(IncludedField {
                    field_id: field_id.clone(),
                    value: value.clone(),
                })
            })
            .collect(),
    }
}

/// Flatten the records created in a payload batch.
pub fn extract_created_records(
    created_records_by_id: &BTreeMap<String, CreatedRecordData>,
) -> Vec<CreatedRecord> {
    created_records_by_id
        .iter()
        .map(|(record_id, record)| CreatedRecord {
            record_id: record_id.clone(),
            fields: record.cell_values_by_field_id.clone(),
        })
        .collect()
}

/// Records flattened out of one delivered payload.
#[derive(Debug, Default)]
pub struct PayloadRecords {
    pub changes: Vec<FieldChange>,
    pub created: Vec<CreatedRecord>,
}

/// Run both extractions over every table in one payload.
pub fn normalize_payload(payload: &WebhookPayload, policy: &IncludePolicy) -> PayloadRecords {
    let mut records = PayloadRecords::default();
    for table in payload.changed_tables_by_id.values() {
        records
            .changes
            .extend(extract_field_changes(&table.changed_records_by_id, policy));
        records
            .created
            .extend(extract_created_records(&table.created_records_by_id));
    }
    records
}
