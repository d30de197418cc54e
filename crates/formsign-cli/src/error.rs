use formsign_core::error::{BridgeError, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    #[error("output error: {0}")]
    Output(String),
}

impl CliError {
    /// Process exit code; argument errors exit with 2 from clap itself.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Bridge(err) => match err.kind() {
                ErrorKind::Configuration => 10,
                ErrorKind::Validation => 11,
                ErrorKind::NotFound => 12,
                ErrorKind::Upstream => 13,
            },
            CliError::Output(_) => 1,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Output(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Output(err.to_string())
    }
}
