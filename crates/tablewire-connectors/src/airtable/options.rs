use tablewire_types::SelectOption;

use crate::airtable::client::AirtableClient;
use crate::error::Result;

/// Dropdown entries for the base picker.
pub fn base_options(client: &AirtableClient<'_>) -> Result<Vec<SelectOption>> {
    Ok(client
        .list_bases()?
        .into_iter()
        .map(|base| SelectOption::new(base.name, base.id))
        .collect())
}

/// Dropdown entries for the table picker of one base.
pub fn table_options(client: &AirtableClient<'_>, base_id: &str) -> Result<Vec<SelectOption>> {
    Ok(client
        .table_schemas(base_id)?
        .into_iter()
        .map(|table| SelectOption::new(table.name, table.id))
        .collect())
}

/// Dropdown entries for the field pickers of one table, annotated with the
/// field type where the schema reports one.
pub fn field_options(
    client: &AirtableClient<'_>,
    base_id: &str,
    table_id: &str,
) -> Result<Vec<SelectOption>> {
    Ok(client
        .table_fields(base_id, table_id)?
        .into_iter()
        .map(|field| {
            let option = SelectOption::new(field.name, field.id);
            match field.field_type {
                Some(field_type) => option.with_description(format!("Type: {}", field_type)),
                None => option,
            }
        })
        .collect())
}
