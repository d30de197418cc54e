//! Translation of a form entry into a signing-service submission.

use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::config::MappingSettings;
use crate::error::{BridgeError, BridgeResult};
use crate::types::{EntryRecord, FieldMapping, SubmissionPayload, Submitter};

/// Copies every entry field named in `table` into a map keyed by its label.
///
/// Fields missing from the entry are skipped; entry fields missing from the
/// table are dropped.
pub fn map_values(entry: &EntryRecord, table: &[FieldMapping]) -> BTreeMap<String, Value> {
    table
        .iter()
        .filter_map(|mapping| {
            entry
                .get(&mapping.source)
                .map(|value| (mapping.label.clone(), value.clone()))
        })
        .collect()
}

/// Builds the submission payload for one entry.
pub fn build_submission(
    entry: &EntryRecord,
    settings: &MappingSettings,
) -> BridgeResult<SubmissionPayload> {
    let template_id = parse_template_id(&settings.template_id)?;

    if settings.email_field.is_empty() {
        return Err(BridgeError::config("No source field configured for email"));
    }
    let email = field_text(entry, &settings.email_field)
        .ok_or_else(|| BridgeError::validation("Missing required email from form data"))?;

    let first_name = identity_field(entry, &settings.first_name_field, "first name", settings)?;
    let last_name = identity_field(entry, &settings.last_name_field, "last name", settings)?;

    let id_type = settings
        .id_type_field
        .as_ref()
        .map(|field| field_text(entry, field));
    let id_number = settings
        .id_number_field
        .as_ref()
        .map(|field| field_text(entry, field));

    let values = map_values(entry, &settings.field_table);
    debug!("Mapped {} of {} configured fields", values.len(), settings.field_table.len());

    Ok(SubmissionPayload {
        template_id,
        send_email: settings.send_email,
        submitters: vec![Submitter {
            first_name,
            last_name,
            email,
            id_type,
            id_number,
            role: settings.role_label.clone(),
            values,
        }],
    })
}

fn parse_template_id(raw: &str) -> BridgeResult<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(BridgeError::config("No signing template id configured"));
    }
    raw.parse::<i64>().map_err(|_| {
        BridgeError::validation(format!("Template id '{}' is not an integer", raw))
    })
}

fn identity_field(
    entry: &EntryRecord,
    field: &str,
    description: &str,
    settings: &MappingSettings,
) -> BridgeResult<String> {
    match field_text(entry, field) {
        Some(text) => Ok(text),
        None if settings.strict_required_fields => Err(BridgeError::validation(format!(
            "Missing required {} from form data (field {})",
            description, field
        ))),
        None => Ok(String::new()),
    }
}

/// Text of an entry field; null and empty strings count as absent.
fn field_text(entry: &EntryRecord, field: &str) -> Option<String> {
    match entry.get(field)? {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
