use tablewire_types::SelectOption;

use crate::error::Result;
use crate::fillout::client::FilloutClient;
use crate::fillout::schema::{SortOrder, SubmissionFilters};

/// Dropdown entries for the form picker.
pub fn form_options(client: &FilloutClient<'_>) -> Result<Vec<SelectOption>> {
    Ok(client
        .list_forms()?
        .into_iter()
        .map(|form| SelectOption::new(form.name, form.form_id))
        .collect())
}

/// Dropdown entries for the submission picker: the 50 most recent
/// submissions of one form, labeled by submission time.
pub fn submission_options(
    client: &FilloutClient<'_>,
    form_id: &str,
) -> Result<Vec<SelectOption>> {
    let filters = SubmissionFilters {
        limit: Some(50),
        sort: Some(SortOrder::Descending),
        ..SubmissionFilters::default()
    };

    let page = client.list_submissions(form_id, &filters)?;
    Ok(page
        .responses
        .into_iter()
        .map(|submission| {
            let label = match submission.submission_time {
                Some(time) => format!("Submission from {}", time.format("%Y-%m-%d %H:%M:%S")),
                None => format!("Submission {}", submission.submission_id),
            };
            SelectOption::new(label, submission.submission_id)
        })
        .collect())
}
