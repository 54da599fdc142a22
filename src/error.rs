use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum QsError {
    #[error("invalid item id: {0}")]
    InvalidItemId(String),

    #[error("invalid property id: {0}")]
    InvalidPropertyId(String),

    #[error("invalid provenance pair: {0}")]
    InvalidProvenance(String),

    #[error("invalid language code: {0}")]
    InvalidLanguage(String),

    #[error("no property mapped for field {0}")]
    UnmappedField(String),

    #[error("config file not found at {0}")]
    MissingConfig(PathBuf),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("failed to read input at {0}")]
    InputRead(PathBuf),

    #[error("failed to parse CSL-JSON input: {0}")]
    InputParse(String),

    #[error("lookup request failed: {0}")]
    LookupHttp(String),

    #[error("lookup service returned status {status}: {message}")]
    LookupStatus { status: u16, message: String },

    #[error("failed to parse lookup response: {0}")]
    LookupParse(String),

    #[error("value cannot be written as a QuickStatements row: {0}")]
    #[diagnostic(help("this is an internal defect: statement values must be single-line"))]
    Unrepresentable(String),
}
