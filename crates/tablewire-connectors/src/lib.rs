// Error types
pub mod error;

// Host collaborator seams (public API)
pub mod traits;

// Connector implementations
pub mod airtable;
pub mod fillout;

// Connector registry
pub mod registry;

// Traits
pub use traits::{
    ApiRequest, HookContext, Method, StateStore, Transport, TransportError, read_state,
    write_state,
};

// Normalization
pub use airtable::normalize::{
    PayloadRecords, extract_created_records, extract_field_changes, normalize_payload,
};

// Registry
pub use registry::{ConnectorKind, ConnectorMetadata, all_connectors, connector_metadata, connector_names};

// Error types
pub use error::{Error, Result};
