// Central Error Type for the Proxy

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// The ERP could not be reached or answered with a non-JSON body
    #[error("Transport error: {0}")]
    Transport(String),

    /// The ERP answered with a JSON-RPC `error` object
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for failures that originate at the ERP (transport or application level)
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            AppError::Transport(_) | AppError::Backend(_) | AppError::Decode(_)
        )
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: reqwest::Error conversion is handled in the infra-odoo crate
// by converting to AppError::Transport(String)
