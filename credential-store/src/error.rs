//! Error types for credential stores

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Credential not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<pem::PemError> for StoreError {
    fn from(err: pem::PemError) -> Self {
        StoreError::Parse(err.to_string())
    }
}
