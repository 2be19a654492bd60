pub mod client;
pub mod hooks;
pub mod normalize;
pub mod options;
pub mod schema;

pub use client::AirtableClient;
pub use hooks::{AirtableTrigger, ChangeType, TriggerConfig};
pub use normalize::{PayloadRecords, extract_created_records, extract_field_changes, normalize_payload};
