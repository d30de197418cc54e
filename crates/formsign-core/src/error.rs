use thiserror::Error;

/// Failure kinds raised by the pipeline stages.
///
/// Every stage returns one of these; the request handler is the only place
/// that turns them into a status code and a response body.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A required setting or credential is absent or unusable
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Data from a reachable upstream is malformed or incomplete
    #[error("validation error: {0}")]
    Validation(String),

    /// The form provider returned no matching entry
    #[error("not found: {0}")]
    NotFound(String),

    /// Transport failure or non-success response from a dependency
    #[error("{}", format_upstream(.service, .status, .message))]
    Upstream {
        service: String,
        status: Option<u16>,
        message: String,
    },
}

fn format_upstream(service: &str, status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!(
            "upstream error: {} responded with status {}: {}",
            service, code, message
        ),
        None => format!("upstream error: request to {} failed: {}", service, message),
    }
}

impl BridgeError {
    pub fn config(message: impl Into<String>) -> Self {
        BridgeError::Configuration(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        BridgeError::Validation(message.into())
    }

    pub fn upstream(service: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        BridgeError::Upstream {
            service: service.into(),
            status,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::Configuration(_) => ErrorKind::Configuration,
            BridgeError::Validation(_) => ErrorKind::Validation,
            BridgeError::NotFound(_) => ErrorKind::NotFound,
            BridgeError::Upstream { .. } => ErrorKind::Upstream,
        }
    }
}

/// Fieldless view of [`BridgeError`], used for status mapping and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Validation,
    NotFound,
    Upstream,
}

pub type BridgeResult<T> = Result<T, BridgeError>;
