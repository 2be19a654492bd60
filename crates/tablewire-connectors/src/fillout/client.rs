use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tablewire_types::FilloutCredentials;

use crate::error::Result;
use crate::fillout::schema::{
    CreateSubmissionsResponse, CreateWebhookBody, DeleteWebhookBody, Form, FormMetadata,
    NewSubmission, SubmissionFilters, SubmissionsPage, WebhookCreated,
};
use crate::traits::{ApiRequest, Method, Transport};

/// Thin REST client over the host transport, rooted at the credential's
/// API URL (`/v1/api`).
pub struct FilloutClient<'a> {
    transport: &'a dyn Transport,
    credentials: &'a FilloutCredentials,
}

impl<'a> FilloutClient<'a> {
    pub fn new(transport: &'a dyn Transport, credentials: &'a FilloutCredentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/v1/api{}",
            self.credentials.api_url.trim_end_matches('/'),
            path
        )
    }

    fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self
            .transport
            .request(request.bearer(&self.credentials.api_key))?;
        Ok(serde_json::from_value(response)?)
    }

    pub fn list_forms(&self) -> Result<Vec<Form>> {
        self.call(ApiRequest::new(Method::Get, self.url("/forms")))
    }

    pub fn form_metadata(&self, form_id: &str) -> Result<FormMetadata> {
        self.call(ApiRequest::new(
            Method::Get,
            self.url(&format!("/forms/{}", form_id)),
        ))
    }

    pub fn list_submissions(
        &self,
        form_id: &str,
        filters: &SubmissionFilters,
    ) -> Result<SubmissionsPage> {
        let mut request = ApiRequest::new(
            Method::Get,
            self.url(&format!("/forms/{}/submissions", form_id)),
        );

        if let Some(limit) = filters.limit {
            request = request.query("limit", limit.to_string());
        }
        if let Some(after) = filters.after_date {
            request = request.query("afterDate", after.to_rfc3339());
        }
        if let Some(before) = filters.before_date {
            request = request.query("beforeDate", before.to_rfc3339());
        }
        if let Some(status) = filters.status {
            request = request.query("status", status.wire_name());
        }
        if filters.include_edit_link {
            request = request.query("includeEditLink", "true");
        }
        if let Some(sort) = filters.sort {
            request = request.query("sort", sort.wire_name());
        }
        if let Some(search) = &filters.search {
            request = request.query("search", search);
        }

        self.call(request)
    }

    /// One submission, as delivered. Always requests the edit link so the
    /// record is actionable downstream.
    pub fn get_submission(&self, form_id: &str, submission_id: &str) -> Result<Value> {
        let response = self.transport.request(
            ApiRequest::new(
                Method::Get,
                self.url(&format!("/forms/{}/submissions/{}", form_id, submission_id)),
            )
            .query("includeEditLink", "true")
            .bearer(&self.credentials.api_key),
        )?;
        Ok(response)
    }

    pub fn create_submissions(
        &self,
        form_id: &str,
        submissions: &[NewSubmission],
    ) -> Result<CreateSubmissionsResponse> {
        self.call(
            ApiRequest::new(
                Method::Post,
                self.url(&format!("/forms/{}/submissions", form_id)),
            )
            .body(json!({ "submissions": submissions })),
        )
    }

    pub fn delete_submission(&self, form_id: &str, submission_id: &str) -> Result<()> {
        self.transport.request(
            ApiRequest::new(
                Method::Delete,
                self.url(&format!("/forms/{}/submissions/{}", form_id, submission_id)),
            )
            .bearer(&self.credentials.api_key),
        )?;
        Ok(())
    }

    pub fn create_webhook(&self, form_id: &str, callback_url: &str) -> Result<WebhookCreated> {
        let body = CreateWebhookBody {
            form_id: form_id.to_string(),
            url: callback_url.to_string(),
        };
        self.call(
            ApiRequest::new(Method::Post, self.url("/webhook/create"))
                .body(serde_json::to_value(&body)?),
        )
    }

    pub fn delete_webhook(&self, webhook_id: &str) -> Result<()> {
        let body = DeleteWebhookBody {
            webhook_id: webhook_id.to_string(),
        };
        self.transport.request(
            ApiRequest::new(Method::Post, self.url("/webhook/delete"))
                .body(serde_json::to_value(&body)?)
                .bearer(&self.credentials.api_key),
        )?;
        Ok(())
    }
}
