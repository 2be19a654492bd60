use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// One form visible to the API token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub form_id: String,
    pub name: String,
}

/// Form metadata and its question definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormMetadata {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub question_type: Option<String>,
}

/// One page of a form's submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionsPage {
    #[serde(default)]
    pub responses: Vec<Submission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_responses: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub submission_id: String,
    #[serde(default)]
    pub submission_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub questions: Vec<AnsweredQuestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Value,
}

/// Sort order for submission listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub(crate) fn wire_name(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// Submission status filter. In-progress retrieval needs a business plan or
/// higher on the service side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Finished,
    InProgress,
}

impl SubmissionStatus {
    pub(crate) fn wire_name(self) -> &'static str {
        match self {
            SubmissionStatus::Finished => "finished",
            SubmissionStatus::InProgress => "in_progress",
        }
    }
}

/// Query filters for listing submissions.
#[derive(Debug, Clone, Default)]
pub struct SubmissionFilters {
    pub limit: Option<u32>,
    pub after_date: Option<DateTime<Utc>>,
    pub before_date: Option<DateTime<Utc>>,
    pub status: Option<SubmissionStatus>,
    pub include_edit_link: bool,
    pub sort: Option<SortOrder>,
    pub search: Option<String>,
}

/// Draft of one submission for the create call.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    pub questions: Vec<QuestionAnswer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub url_parameters: Vec<UrlParameter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scheduling: Vec<IdValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub payments: Vec<IdValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<Login>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub id: String,
    pub value: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlParameter {
    pub id: String,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdValue {
    pub id: String,
    pub value: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Login {
    pub email: String,
}

impl NewSubmission {
    /// Reject drafts the service would bounce, before any API call.
    pub fn validate(&self) -> Result<()> {
        for parameter in &self.url_parameters {
            if parameter.id.is_empty() || parameter.name.is_empty() || parameter.value.is_empty() {
                return Err(Error::Invalid(
                    "each URL parameter must have id, name, and value".to_string(),
                ));
            }
        }

        for entry in &self.scheduling {
            if entry.id.is_empty() || !entry.value.is_object() {
                return Err(Error::Invalid(
                    "each scheduling entry must have an id and an object value".to_string(),
                ));
            }
        }

        for entry in &self.payments {
            if entry.id.is_empty() || !entry.value.is_object() {
                return Err(Error::Invalid(
                    "each payment entry must have an id and an object value".to_string(),
                ));
            }
            if entry.value.get("paymentId").is_none() {
                return Err(Error::Invalid(
                    "payment value must contain a paymentId".to_string(),
                ));
            }
        }

        if let Some(login) = &self.login {
            if login.email.is_empty() {
                return Err(Error::Invalid("login must carry an email".to_string()));
            }
        }

        Ok(())
    }
}

/// Response of the submission create call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubmissionsResponse {
    #[serde(default)]
    pub submissions: Vec<Submission>,
}

// --- Webhooks ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebhookBody {
    pub form_id: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct WebhookCreated {
    pub id: WebhookId,
}

/// The service issues numeric webhook ids; older deployments returned
/// strings. Both are carried as strings from here on.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WebhookId {
    Number(u64),
    Text(String),
}

impl WebhookId {
    pub fn into_string(self) -> String {
        match self {
            WebhookId::Number(id) => id.to_string(),
            WebhookId::Text(id) => id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteWebhookBody {
    pub webhook_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_submission_omits_empty_sections() {
        let submission = NewSubmission {
            questions: vec![QuestionAnswer {
                id: "q1".to_string(),
                value: json!("answer"),
            }],
            ..NewSubmission::default()
        };

        let value = serde_json::to_value(&submission).unwrap();
        assert_eq!(
            value,
            json!({ "questions": [{ "id": "q1", "value": "answer" }] })
        );
    }

    #[test]
    fn payment_without_payment_id_is_rejected() {
        let submission = NewSubmission {
            payments: vec![IdValue {
                id: "pay1".to_string(),
                value: json!({ "amount": 100 }),
            }],
            ..NewSubmission::default()
        };

        assert!(matches!(submission.validate(), Err(Error::Invalid(_))));
    }

    #[test]
    fn scheduling_value_must_be_an_object() {
        let submission = NewSubmission {
            scheduling: vec![IdValue {
                id: "slot".to_string(),
                value: json!("2024-05-20T09:00:00.000Z"),
            }],
            ..NewSubmission::default()
        };

        assert!(matches!(submission.validate(), Err(Error::Invalid(_))));
    }

    #[test]
    fn complete_draft_validates() {
        let submission = NewSubmission {
            questions: vec![QuestionAnswer {
                id: "q1".to_string(),
                value: json!("yes"),
            }],
            url_parameters: vec![UrlParameter {
                id: "email".to_string(),
                name: "email".to_string(),
                value: "user@example.com".to_string(),
            }],
            payments: vec![IdValue {
                id: "pay1".to_string(),
                value: json!({ "paymentId": "pi_123" }),
            }],
            login: Some(Login {
                email: "user@example.com".to_string(),
            }),
            ..NewSubmission::default()
        };

        assert!(submission.validate().is_ok());
    }

    #[test]
    fn webhook_id_accepts_numbers_and_strings() {
        let numeric: WebhookCreated = serde_json::from_value(json!({ "id": 4521 })).unwrap();
        assert_eq!(numeric.id.into_string(), "4521");

        let text: WebhookCreated = serde_json::from_value(json!({ "id": "wh_9" })).unwrap();
        assert_eq!(text.id.into_string(), "wh_9");
    }
}
