/// How a connector is driven by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorKind {
    /// Starts workflows from incoming webhook deliveries.
    Trigger,
    /// Performs on-demand calls mid-workflow.
    Action,
}

#[derive(Debug, Clone)]
pub struct ConnectorMetadata {
    pub name: &'static str,
    pub kind: ConnectorKind,
    pub description: &'static str,
    pub service_url: &'static str,
}

const CONNECTORS: &[ConnectorMetadata] = &[
    ConnectorMetadata {
        name: "airtable-trigger",
        kind: ConnectorKind::Trigger,
        description: "Emits flattened cell changes from an Airtable table via change webhooks",
        service_url: "https://api.airtable.com/v0",
    },
    ConnectorMetadata {
        name: "fillout-trigger",
        kind: ConnectorKind::Trigger,
        description: "Starts a workflow when a Fillout form receives a submission",
        service_url: "https://api.fillout.com",
    },
    ConnectorMetadata {
        name: "fillout",
        kind: ConnectorKind::Action,
        description: "On-demand access to Fillout forms and submissions",
        service_url: "https://api.fillout.com",
    },
];

pub fn all_connectors() -> &'static [ConnectorMetadata] {
    CONNECTORS
}

pub fn connector_names() -> Vec<&'static str> {
    CONNECTORS.iter().map(|connector| connector.name).collect()
}

pub fn connector_metadata(name: &str) -> Option<&'static ConnectorMetadata> {
    CONNECTORS.iter().find(|connector| connector.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_every_registered_connector() {
        for name in connector_names() {
            assert!(connector_metadata(name).is_some());
        }
        assert!(connector_metadata("asana").is_none());
    }
}
