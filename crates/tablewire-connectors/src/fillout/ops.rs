use chrono::Utc;
use serde_json::{Value, json};
use tablewire_types::FilloutCredentials;

use crate::error::Result;
use crate::fillout::client::FilloutClient;
use crate::fillout::schema::{NewSubmission, SubmissionFilters};
use crate::traits::Transport;

/// The on-demand operations the host can dispatch against Fillout.
#[derive(Debug, Clone)]
pub enum Operation {
    ListForms,
    FormMetadata {
        form_id: String,
    },
    ListSubmissions {
        form_id: String,
        filters: SubmissionFilters,
    },
    GetSubmission {
        form_id: String,
        submission_id: String,
    },
    CreateSubmission {
        form_id: String,
        submission: NewSubmission,
    },
    DeleteSubmission {
        form_id: String,
        submission_id: String,
    },
}

/// Execute one operation and return the records the host emits.
pub fn execute(
    transport: &dyn Transport,
    credentials: &FilloutCredentials,
    operation: &Operation,
) -> Result<Vec<Value>> {
    let client = FilloutClient::new(transport, credentials);

    match operation {
        Operation::ListForms => {
            let forms = client.list_forms()?;
            Ok(vec![json!({ "forms": serde_json::to_value(&forms)? })])
        }

        Operation::FormMetadata { form_id } => {
            let metadata = client.form_metadata(form_id)?;
            Ok(vec![serde_json::to_value(&metadata)?])
        }

        Operation::ListSubmissions { form_id, filters } => {
            let page = client.list_submissions(form_id, filters)?;
            Ok(vec![serde_json::to_value(&page)?])
        }

        Operation::GetSubmission {
            form_id,
            submission_id,
        } => Ok(vec![client.get_submission(form_id, submission_id)?]),

        Operation::CreateSubmission {
            form_id,
            submission,
        } => {
            submission.validate()?;

            // The service rejects drafts without a submission time.
            let mut draft = submission.clone();
            if draft.submission_time.is_none() {
                draft.submission_time = Some(Utc::now());
            }

            let response = client.create_submissions(form_id, std::slice::from_ref(&draft))?;
            Ok(vec![serde_json::to_value(&response)?])
        }

        Operation::DeleteSubmission {
            form_id,
            submission_id,
        } => {
            client.delete_submission(form_id, submission_id)?;
            Ok(vec![json!({
                "success": true,
                "message": format!("Submission {} deleted successfully", submission_id),
            })])
        }
    }
}
