//! Error types and result aliases for the clinic assistant.
//!
//! This module defines the core error type [`ClinicError`] and the [`Result`] type alias
//! used throughout the library. Negative availability answers are not errors; they are
//! reported through [`crate::schedule::Availability`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("LLM gateway error: {0}")]
    GatewayError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Tool error: {0}")]
    ToolError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Schedule file error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Malformed schedule row at line {line}: expected 5 fields, found {found}")]
    MalformedRow { line: u64, found: usize },
}

pub type Result<T> = std::result::Result<T, ClinicError>;
