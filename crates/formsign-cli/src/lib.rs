//! Local command-line front end for formsign.
//!
//! - [`cli`] - argument parsing and command execution
//! - [`error`] - CLI error type and exit codes

pub mod cli;
pub mod error;
