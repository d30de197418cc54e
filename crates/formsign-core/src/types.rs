// crates/formsign-core/src/types.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One form entry as returned by the form provider, keyed by field id.
pub type EntryRecord = Map<String, Value>;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SubmissionPayload {
    pub template_id: i64,
    pub send_email: bool,
    pub submitters: Vec<Submitter>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Submitter {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    // Outer None: field not part of the profile. Inner None: configured but absent from the entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_type: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<Option<String>>,
    pub role: String,
    pub values: BTreeMap<String, Value>,
}

/// One source field id and the label it is copied under.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub source: String,
    pub label: String,
}

impl FieldMapping {
    pub fn new(source: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            label: label.into(),
        }
    }
}

/// Uniform result of the request handler.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpResult {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl HttpResult {
    pub fn redirect(status_code: u16, location: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Location".to_string(), location.into());
        Self {
            status_code,
            headers,
            body: String::new(),
        }
    }

    pub fn plain_text(status_code: u16, body: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "text/plain".to_string());
        Self {
            status_code,
            headers,
            body: body.into(),
        }
    }
}
