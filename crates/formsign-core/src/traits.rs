use async_trait::async_trait;
use serde_json::Value;

use crate::error::BridgeResult;
use crate::types::{EntryRecord, SubmissionPayload};

/// Source of form entries, looked up by entry identifier.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait EntrySource: Send + Sync {
    async fn fetch_entry(&self, entry_id: &str) -> BridgeResult<EntryRecord>;
}

/// Destination that creates signing submissions.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Returns the service's response body unchanged.
    async fn create_submission(&self, payload: &SubmissionPayload) -> BridgeResult<Value>;
}
