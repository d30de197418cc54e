//! The fetch → map → submit → extract sequence.
//!
//! Collaborators are injected as trait objects so the Lambda handler, the
//! CLI and tests can share one implementation. Each run creates a new
//! signing submission; nothing is deduplicated across runs.

use log::{debug, info};
use std::sync::Arc;

use crate::config::MappingSettings;
use crate::error::{BridgeError, BridgeResult};
use crate::link::extract_signing_link;
use crate::mapper::build_submission;
use crate::redaction::redact_secrets_in_text;
use crate::traits::{EntrySource, SubmissionSink};
use crate::types::SubmissionPayload;

#[derive(Clone)]
pub struct Pipeline {
    source: Arc<dyn EntrySource>,
    sink: Arc<dyn SubmissionSink>,
    mapping: MappingSettings,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn EntrySource>,
        sink: Arc<dyn SubmissionSink>,
        mapping: MappingSettings,
    ) -> Self {
        Self {
            source,
            sink,
            mapping,
        }
    }

    /// Fetches and maps one entry without creating a submission.
    pub async fn prepare(&self, entry_id: &str) -> BridgeResult<SubmissionPayload> {
        let entry_id = entry_id.trim();
        if entry_id.is_empty() {
            return Err(BridgeError::validation("Entry id must not be blank"));
        }

        let entry = self.source.fetch_entry(entry_id).await?;
        info!("Fetched form entry {}", entry_id);
        debug!(
            "Form entry: {}",
            redact_secrets_in_text(&serde_json::Value::Object(entry.clone()).to_string())
        );

        let payload = build_submission(&entry, &self.mapping)?;
        info!("Prepared submission for template {}", payload.template_id);
        Ok(payload)
    }

    /// Runs the whole sequence and returns the signing link.
    pub async fn run(&self, entry_id: &str) -> BridgeResult<String> {
        let payload = self.prepare(entry_id).await?;

        let response = self.sink.create_submission(&payload).await?;
        debug!("Submission response: {}", response);

        let link = extract_signing_link(&response)?;
        info!("Submission link created for entry {}", entry_id);
        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockEntrySource, MockSubmissionSink};
    use crate::types::FieldMapping;
    use serde_json::json;

    fn settings() -> MappingSettings {
        MappingSettings {
            template_id: "1001".to_string(),
            first_name_field: "Field6".to_string(),
            last_name_field: "Field7".to_string(),
            email_field: "Field9".to_string(),
            id_type_field: None,
            id_number_field: None,
            field_table: vec![
                FieldMapping::new("Field6", "First Name"),
                FieldMapping::new("Field7", "Last Name"),
                FieldMapping::new("Field9", "Email"),
            ],
            role_label: "First Party".to_string(),
            send_email: true,
            strict_required_fields: false,
        }
    }

    fn jane() -> serde_json::Map<String, serde_json::Value> {
        json!({"Field6": "Jane", "Field7": "Doe", "Field9": "jane@x.com"})
            .as_object()
            .cloned()
            .unwrap()
    }

    #[tokio::test]
    async fn test_run_returns_signing_link() {
        let mut source = MockEntrySource::new();
        source.expect_fetch_entry().times(1).returning(|entry_id| {
            assert_eq!(entry_id, "123");
            Ok(jane())
        });

        let mut sink = MockSubmissionSink::new();
        sink.expect_create_submission().times(1).returning(|payload| {
            assert_eq!(payload.template_id, 1001);
            assert_eq!(payload.submitters[0].email, "jane@x.com");
            Ok(json!([{"embed_src": "https://sign.example/abc"}]))
        });

        let pipeline = Pipeline::new(Arc::new(source), Arc::new(sink), settings());
        let link = pipeline.run("123").await.unwrap();
        assert_eq!(link, "https://sign.example/abc");
    }

    #[tokio::test]
    async fn test_missing_email_never_submits() {
        let mut source = MockEntrySource::new();
        source.expect_fetch_entry().returning(|_| {
            Ok(json!({"Field6": "Jane"}).as_object().cloned().unwrap())
        });
        let mut sink = MockSubmissionSink::new();
        sink.expect_create_submission().never();

        let pipeline = Pipeline::new(Arc::new(source), Arc::new(sink), settings());
        let err = pipeline.run("123").await.unwrap_err();
        assert!(matches!(err, BridgeError::Validation(_)));
    }

    #[tokio::test]
    async fn test_not_found_stops_pipeline() {
        let mut source = MockEntrySource::new();
        source.expect_fetch_entry().returning(|entry_id| {
            Err(BridgeError::NotFound(format!(
                "No entry found for EntryId: {}",
                entry_id
            )))
        });
        let mut sink = MockSubmissionSink::new();
        sink.expect_create_submission().never();

        let pipeline = Pipeline::new(Arc::new(source), Arc::new(sink), settings());
        let err = pipeline.run("404").await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_repeated_runs_create_separate_submissions() {
        let mut source = MockEntrySource::new();
        source.expect_fetch_entry().times(2).returning(|_| Ok(jane()));
        let mut sink = MockSubmissionSink::new();
        sink.expect_create_submission()
            .times(2)
            .returning(|_| Ok(json!({"submitters": [{"embed_src": "https://sign.example/abc"}]})));

        let pipeline = Pipeline::new(Arc::new(source), Arc::new(sink), settings());
        assert!(pipeline.run("123").await.is_ok());
        assert!(pipeline.run("123").await.is_ok());
    }

    #[tokio::test]
    async fn test_blank_entry_id_never_fetches() {
        let mut source = MockEntrySource::new();
        source.expect_fetch_entry().never();
        let mut sink = MockSubmissionSink::new();
        sink.expect_create_submission().never();

        let pipeline = Pipeline::new(Arc::new(source), Arc::new(sink), settings());
        for entry_id in ["", "  "] {
            let err = pipeline.run(entry_id).await.unwrap_err();
            assert!(matches!(err, BridgeError::Validation(_)));
            let err = pipeline.prepare(entry_id).await.unwrap_err();
            assert!(matches!(err, BridgeError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_entry_id_is_trimmed_before_fetch() {
        let mut source = MockEntrySource::new();
        source.expect_fetch_entry().times(1).returning(|entry_id| {
            assert_eq!(entry_id, "123");
            Ok(jane())
        });
        let sink = MockSubmissionSink::new();

        let pipeline = Pipeline::new(Arc::new(source), Arc::new(sink), settings());
        assert!(pipeline.prepare(" 123 ").await.is_ok());
    }

    #[tokio::test]
    async fn test_prepare_does_not_submit() {
        let mut source = MockEntrySource::new();
        source.expect_fetch_entry().returning(|_| Ok(jane()));
        let mut sink = MockSubmissionSink::new();
        sink.expect_create_submission().never();

        let pipeline = Pipeline::new(Arc::new(source), Arc::new(sink), settings());
        let payload = pipeline.prepare("123").await.unwrap();
        assert_eq!(payload.submitters[0].first_name, "Jane");
        assert_eq!(payload.submitters[0].role, "First Party");
    }
}
