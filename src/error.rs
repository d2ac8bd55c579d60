use thiserror::Error;

use crate::vendor::EngineError;

/// SQLSTATE reported when a statement is issued without an open connection.
pub const CONNECTION_NOT_OPEN: &str = "08003";

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("SQL Server client unavailable: {0}")]
    AdapterUnavailable(String),

    #[error("Connection error: {0}")]
    ConnectionFailure(String),

    #[error("Could not select database '{database}': {message}")]
    DatabaseSelectFailure { database: String, message: String },

    #[error("SQL execution error [{code}]: {message} SQL={sql}")]
    ExecutionFailure {
        code: String,
        message: String,
        sql: String,
    },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AdapterError {
    pub(crate) fn execution(error: EngineError, sql: &str) -> Self {
        AdapterError::ExecutionFailure {
            code: error.code,
            message: error.message,
            sql: sql.to_string(),
        }
    }

    pub(crate) fn not_connected(sql: &str) -> Self {
        AdapterError::ExecutionFailure {
            code: CONNECTION_NOT_OPEN.to_string(),
            message: "connection is not open".to_string(),
            sql: sql.to_string(),
        }
    }

    /// Engine error code carried by an execution failure.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            AdapterError::ExecutionFailure { code, .. } => Some(code),
            _ => None,
        }
    }
}
