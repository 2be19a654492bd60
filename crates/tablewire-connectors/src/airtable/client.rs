use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tablewire_types::AirtableCredentials;

use crate::airtable::schema::{
    Base, BasesPage, CreateWebhookRequest, CreateWebhookResponse, FieldSchema, PayloadsPage,
    RefreshWebhookResponse, Table, TableSchemaPage, WebhookInfo, WebhookList,
};
use crate::error::Result;
use crate::traits::{ApiRequest, Method, Transport};

pub(crate) const API_BASE: &str = "https://api.airtable.com/v0";

/// Thin REST client over the host transport.
///
/// Builds URLs, attaches the bearer token, and decodes responses; all IO
/// happens inside the injected [`Transport`].
pub struct AirtableClient<'a> {
    transport: &'a dyn Transport,
    credentials: &'a AirtableCredentials,
}

impl<'a> AirtableClient<'a> {
    pub fn new(transport: &'a dyn Transport, credentials: &'a AirtableCredentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self
            .transport
            .request(request.bearer(&self.credentials.api_key))?;
        Ok(serde_json::from_value(response)?)
    }

    /// Every base the token can see, following offset pagination.
    pub fn list_bases(&self) -> Result<Vec<Base>> {
        let mut bases = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut request = ApiRequest::new(Method::Get, format!("{}/meta/bases", API_BASE));
            if let Some(offset) = &offset {
                request = request.query("offset", offset);
            }
            let page: BasesPage = self.call(request)?;
            bases.extend(page.bases);
            offset = page.offset;
            if offset.is_none() {
                break;
            }
        }

        Ok(bases)
    }

    /// Full table schema of one base.
    pub fn table_schemas(&self, base_id: &str) -> Result<Vec<Table>> {
        let page: TableSchemaPage = self.call(ApiRequest::new(
            Method::Get,
            format!("{}/meta/bases/{}/tables", API_BASE, base_id),
        ))?;
        Ok(page.tables)
    }

    /// Fields of one table, resolved from the base schema. An unknown table
    /// id resolves to no fields.
    pub fn table_fields(&self, base_id: &str, table_id: &str) -> Result<Vec<FieldSchema>> {
        let tables = self.table_schemas(base_id)?;
        Ok(tables
            .into_iter()
            .find(|table| table.id == table_id)
            .map(|table| table.fields)
            .unwrap_or_default())
    }

    pub fn create_webhook(
        &self,
        base_id: &str,
        request: &CreateWebhookRequest,
    ) -> Result<CreateWebhookResponse> {
        self.call(
            ApiRequest::new(Method::Post, format!("{}/bases/{}/webhooks", API_BASE, base_id))
                .body(serde_json::to_value(request)?),
        )
    }

    pub fn list_webhooks(&self, base_id: &str) -> Result<Vec<WebhookInfo>> {
        let list: WebhookList = self.call(ApiRequest::new(
            Method::Get,
            format!("{}/bases/{}/webhooks", API_BASE, base_id),
        ))?;
        Ok(list.webhooks)
    }

    pub fn delete_webhook(&self, base_id: &str, webhook_id: &str) -> Result<()> {
        self.transport
            .request(
                ApiRequest::new(
                    Method::Delete,
                    format!("{}/bases/{}/webhooks/{}", API_BASE, base_id, webhook_id),
                )
                .bearer(&self.credentials.api_key),
            )?;
        Ok(())
    }

    /// Extend the subscription's expiration window.
    pub fn refresh_webhook(
        &self,
        base_id: &str,
        webhook_id: &str,
    ) -> Result<Option<DateTime<Utc>>> {
        let response: RefreshWebhookResponse = self.call(ApiRequest::new(
            Method::Post,
            format!(
                "{}/bases/{}/webhooks/{}/refresh",
                API_BASE, base_id, webhook_id
            ),
        ))?;
        Ok(response.expiration_time)
    }

    /// One page of change payloads starting at `cursor`.
    pub fn list_payloads(
        &self,
        base_id: &str,
        webhook_id: &str,
        cursor: u64,
    ) -> Result<PayloadsPage> {
        self.call(
            ApiRequest::new(
                Method::Get,
                format!(
                    "{}/bases/{}/webhooks/{}/payloads",
                    API_BASE, base_id, webhook_id
                ),
            )
            .query("cursor", cursor.to_string()),
        )
    }
}
