//! AWS CloudFormation provider for StackFlow
//!
//! Implements the `StackProvider` trait on top of `aws-sdk-cloudformation`.
//!
//! # Requirements
//!
//! - AWS credentials resolvable by the default provider chain
//! - A region, from the environment, the shared config, or `--region`
//!
//! # Example
//!
//! ```ignore
//! use stackflow_cloud::{BackoffPolicy, StackLifecycle};
//! use stackflow_cloud_aws::{CloudFormationProvider, DEFAULT_WAITER_TIMEOUT};
//!
//! let provider = CloudFormationProvider::from_env(None, DEFAULT_WAITER_TIMEOUT).await;
//! let lifecycle = StackLifecycle::new(&provider, BackoffPolicy::default());
//!
//! lifecycle.create("my-stack", &template).await?;
//! lifecycle.confirm_visible("my-stack").await?;
//! ```

pub mod error;
pub mod provider;

pub use error::{AwsError, Result};
pub use provider::{CloudFormationProvider, DEFAULT_WAITER_TIMEOUT};
