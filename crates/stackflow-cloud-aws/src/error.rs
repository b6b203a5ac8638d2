//! CloudFormation provider error types

use stackflow_cloud::StackError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("{operation} failed: {message}")]
    Sdk { operation: &'static str, message: String },

    #[error("Stack already exists: {0}")]
    AlreadyExists(String),

    #[error("{operation} did not finish for {stack}: {message}")]
    WaiterFailed {
        operation: &'static str,
        stack: String,
        message: String,
    },
}

impl From<AwsError> for StackError {
    fn from(err: AwsError) -> Self {
        match err {
            AwsError::AlreadyExists(name) => StackError::AlreadyExists(name),
            AwsError::Sdk { operation, message } => StackError::api(operation, message),
            AwsError::WaiterFailed {
                operation,
                stack,
                message,
            } => StackError::api(operation, format!("waiting on {stack}: {message}")),
        }
    }
}

pub type Result<T> = std::result::Result<T, AwsError>;
