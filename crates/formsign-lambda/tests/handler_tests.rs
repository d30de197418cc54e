use formsign_core::config::{ErrorStatusMode, HandlerSettings, MappingSettings};
use formsign_core::error::BridgeError;
use formsign_core::pipeline::Pipeline;
use formsign_core::traits::{MockEntrySource, MockSubmissionSink};
use formsign_core::types::{FieldMapping, HttpResult};
use formsign_lambda::{status_for, Handler, ProxyRequest};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

fn mapping() -> MappingSettings {
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

fn settings(mode: ErrorStatusMode) -> HandlerSettings {
    HandlerSettings {
        query_param_name: "entry".to_string(),
        redirect_status: 301,
        error_status_mode: mode,
    }
}

fn handler(source: MockEntrySource, sink: MockSubmissionSink, mode: ErrorStatusMode) -> Handler {
    let pipeline = Pipeline::new(Arc::new(source), Arc::new(sink), mapping());
    Handler::new(pipeline, settings(mode))
}

fn untouched() -> (MockEntrySource, MockSubmissionSink) {
    let mut source = MockEntrySource::new();
    source.expect_fetch_entry().never();
    let mut sink = MockSubmissionSink::new();
    sink.expect_create_submission().never();
    (source, sink)
}

fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn test_missing_identifier_is_rejected_without_calls() {
    for params in [query(&[]), query(&[("entry", "")]), query(&[("entry", "   ")]), query(&[("entryId", "123")])] {
        let (source, sink) = untouched();
        let result = handler(source, sink, ErrorStatusMode::Uniform).handle(&params).await;

        assert_eq!(result.status_code, 400);
        assert_eq!(result.headers.get("Content-Type").map(String::as_str), Some("text/plain"));
        assert_eq!(
            result.body,
            "Error: No entry_id provided in query parameter (?entry=EntryId)"
        );
    }
}

#[tokio::test]
async fn test_null_query_string_is_rejected() {
    let (source, sink) = untouched();
    let event: ProxyRequest = serde_json::from_value(json!({
        "httpMethod": "GET",
        "path": "/sign",
        "queryStringParameters": null
    }))
    .unwrap();

    let result = handler(source, sink, ErrorStatusMode::Uniform).handle_event(event).await;
    assert_eq!(result.status_code, 400);
}

#[tokio::test]
async fn test_end_to_end_redirect() {
    let mut source = MockEntrySource::new();
    source.expect_fetch_entry().times(1).returning(|entry_id| {
        assert_eq!(entry_id, "123");
        Ok(json!({"Field6": "Jane", "Field7": "Doe", "Field9": "jane@x.com"})
            .as_object()
            .cloned()
            .unwrap())
    });
    let mut sink = MockSubmissionSink::new();
    sink.expect_create_submission().times(1).returning(|payload| {
        assert_eq!(payload.template_id, 1001);
        assert_eq!(payload.submitters[0].email, "jane@x.com");
        Ok(json!([{"embed_src": "https://sign.example/abc"}]))
    });

    let event: ProxyRequest = serde_json::from_value(json!({
        "queryStringParameters": {"entry": "123"}
    }))
    .unwrap();
    let result = handler(source, sink, ErrorStatusMode::Uniform).handle_event(event).await;

    assert_eq!(result, HttpResult::redirect(301, "https://sign.example/abc"));
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "statusCode": 301,
            "headers": {"Location": "https://sign.example/abc"},
            "body": ""
        })
    );
}

#[tokio::test]
async fn test_unknown_entry_reports_identifier() {
    let mut source = MockEntrySource::new();
    source.expect_fetch_entry().returning(|entry_id| {
        Err(BridgeError::NotFound(format!("No entry found for EntryId: {}", entry_id)))
    });
    let mut sink = MockSubmissionSink::new();
    sink.expect_create_submission().never();

    let result = handler(source, sink, ErrorStatusMode::Uniform)
        .handle(&query(&[("entry", "777")]))
        .await;

    assert_eq!(result.status_code, 500);
    assert!(result.body.starts_with("Error: "));
    assert!(result.body.contains("777"));
    assert_eq!(result.headers.get("Content-Type").map(String::as_str), Some("text/plain"));
}

#[tokio::test]
async fn test_missing_email_is_server_error_by_default() {
    let mut source = MockEntrySource::new();
    source
        .expect_fetch_entry()
        .returning(|_| Ok(json!({"Field6": "Jane"}).as_object().cloned().unwrap()));
    let mut sink = MockSubmissionSink::new();
    sink.expect_create_submission().never();

    let result = handler(source, sink, ErrorStatusMode::Uniform)
        .handle(&query(&[("entry", "123")]))
        .await;

    assert_eq!(result.status_code, 500);
    assert!(result.body.contains("email"));
}

#[tokio::test]
async fn test_classified_mode_reports_client_errors() {
    let mut source = MockEntrySource::new();
    source
        .expect_fetch_entry()
        .returning(|_| Ok(json!({"Field6": "Jane"}).as_object().cloned().unwrap()));
    let mut sink = MockSubmissionSink::new();
    sink.expect_create_submission().never();

    let result = handler(source, sink, ErrorStatusMode::Classified)
        .handle(&query(&[("entry", "123")]))
        .await;

    assert_eq!(result.status_code, 422);
}

#[tokio::test]
async fn test_bad_submission_response_is_server_error() {
    let mut source = MockEntrySource::new();
    source
        .expect_fetch_entry()
        .returning(|_| Ok(json!({"Field9": "jane@x.com"}).as_object().cloned().unwrap()));
    let mut sink = MockSubmissionSink::new();
    sink.expect_create_submission()
        .times(1)
        .returning(|_| Ok(json!({"submitters": []})));

    let result = handler(source, sink, ErrorStatusMode::Uniform)
        .handle(&query(&[("entry", "123")]))
        .await;

    assert_eq!(result.status_code, 500);
    assert_eq!(result.body, "Error: validation error: No submitters in response");
}

#[test]
fn test_status_mapping() {
    let validation = BridgeError::validation("bad");
    let not_found = BridgeError::NotFound("none".to_string());
    let upstream = BridgeError::upstream("docuseal", Some(503), "down");
    let config = BridgeError::config("missing");

    for err in [&validation, &not_found, &upstream, &config] {
        assert_eq!(status_for(err, ErrorStatusMode::Uniform), 500);
    }
    assert_eq!(status_for(&validation, ErrorStatusMode::Classified), 422);
    assert_eq!(status_for(&not_found, ErrorStatusMode::Classified), 404);
    assert_eq!(status_for(&upstream, ErrorStatusMode::Classified), 502);
    assert_eq!(status_for(&config, ErrorStatusMode::Classified), 500);
}
