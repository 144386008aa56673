//! Error types for contract generation

use thiserror::Error;

/// Result type for contract operations
pub type Result<T> = std::result::Result<T, ContractError>;

/// Errors that can occur while building, rendering or saving a contract
#[derive(Error, Debug)]
pub enum ContractError {
    /// PDF backend failure
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Font could not be read or parsed
    #[error("Font error: {0}")]
    Font(String),

    /// Clause template failed to render
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// Unknown `--set` field path
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Settings or input file could not be parsed
    #[error("Config error: {0}")]
    Config(String),

    /// Lead submission was rejected or never reached the server
    #[error("{0}")]
    Lead(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for ContractError {
    fn from(e: toml::de::Error) -> Self {
        ContractError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for ContractError {
    fn from(e: toml::ser::Error) -> Self {
        ContractError::Config(e.to_string())
    }
}
