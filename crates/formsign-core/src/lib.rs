// crates/formsign-core/src/lib.rs
pub mod config;
pub mod error;
pub mod link;
pub mod mapper;
pub mod pipeline;
pub mod redaction;
pub mod traits;
pub mod types;
