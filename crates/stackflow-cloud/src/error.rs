//! Stack lifecycle error types

use std::time::Duration;
use thiserror::Error;

/// Stack lifecycle errors
#[derive(Error, Debug)]
pub enum StackError {
    #[error("{operation} failed: {message}")]
    Api { operation: String, message: String },

    #[error("Stack already exists: {0}")]
    AlreadyExists(String),

    #[error("Could not find {name} in list of stacks after waiting {}s", waited.as_secs())]
    VisibilityTimeout { name: String, waited: Duration },

    #[error("Unknown operation: {0}")]
    InvalidOperation(String),

    #[error("Unknown stack status: {0}")]
    InvalidStatus(String),
}

impl StackError {
    pub fn api(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Whether the error is the poller giving up rather than the service failing
    pub fn is_timeout(&self) -> bool {
        matches!(self, StackError::VisibilityTimeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, StackError>;
