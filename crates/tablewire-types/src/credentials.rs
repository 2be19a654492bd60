use serde::Deserialize;

/// Decrypted Airtable credential material, handed in by the host per
/// invocation. The host owns storage and encryption.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirtableCredentials {
    pub api_key: String,
}

impl AirtableCredentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

/// Decrypted Fillout credential material.
///
/// `api_url` is configurable for self-hosted or regional deployments and
/// defaults to the public endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilloutCredentials {
    pub api_key: String,
    #[serde(default = "default_fillout_api_url")]
    pub api_url: String,
}

impl FilloutCredentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: default_fillout_api_url(),
        }
    }
}

fn default_fillout_api_url() -> String {
    "https://api.fillout.com".to_string()
}
