use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field-id → cell-value mapping for one record snapshot.
///
/// Ordered so that batches flatten deterministically regardless of how the
/// service happened to key its JSON objects.
pub type CellValues = BTreeMap<String, Value>;

/// Which context fields ride along with each emitted change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludePolicy {
    /// Attach the listed field ids, in order. Values are taken from the
    /// record's unchanged snapshot when present, from the current snapshot
    /// otherwise; ids found in neither are left out. An empty list attaches
    /// nothing.
    Fields(Vec<String>),
    /// Attach every field delivered in the record's unchanged snapshot.
    AllUnchanged,
}

impl IncludePolicy {
    /// Attach no context at all.
    pub fn none() -> Self {
        IncludePolicy::Fields(Vec::new())
    }
}

impl Default for IncludePolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// One observed cell rewrite, flattened for workflow consumption.
///
/// Emitted only for fields present in both the current and previous
/// snapshots with structurally different values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub record_id: String,
    pub field_id: String,
    pub current: Value,
    pub previous: Value,
    #[serde(rename = "includedData")]
    pub included: Vec<IncludedField>,
}

/// One context field attached to a [`FieldChange`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludedField {
    pub field_id: String,
    pub value: Value,
}

/// A record that appeared for the first time in a payload batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRecord {
    pub record_id: String,
    pub fields: CellValues,
}
