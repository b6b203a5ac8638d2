//! CloudFormation provider implementation

use crate::error::AwsError;
use async_trait::async_trait;
use aws_sdk_cloudformation::Client;
use aws_sdk_cloudformation::client::Waiters;
use aws_sdk_cloudformation::config::Region;
use aws_sdk_cloudformation::error::DisplayErrorContext;
use aws_sdk_cloudformation::types::StackStatus as CfnStackStatus;
use stackflow_cloud::{StackProvider, StackSnapshot, StackStatus, StackSummary, StatusFilter};
use std::time::Duration;

/// Default bound for the SDK's create/delete waiters
pub const DEFAULT_WAITER_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// AWS CloudFormation provider
pub struct CloudFormationProvider {
    client: Client,
    max_wait: Duration,
}

impl CloudFormationProvider {
    pub fn new(client: Client, max_wait: Duration) -> Self {
        Self { client, max_wait }
    }

    /// Build a client from the shared AWS configuration
    ///
    /// Credentials and region come from the standard provider chain
    /// (`~/.aws/credentials`, `~/.aws/config`, environment). `region`
    /// overrides the configured region.
    pub async fn from_env(region: Option<String>, max_wait: Duration) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let config = loader.load().await;

        match config.region() {
            Some(region) => tracing::debug!("Using AWS region {}", region),
            None => tracing::warn!("No AWS region configured"),
        }

        Self::new(Client::new(&config), max_wait)
    }
}

pub(crate) fn to_sdk_status(status: &StackStatus) -> CfnStackStatus {
    CfnStackStatus::from(status.as_str())
}

pub(crate) fn from_sdk_status(status: &CfnStackStatus) -> StackStatus {
    StackStatus::from_wire(status.as_str())
}

#[async_trait]
impl StackProvider for CloudFormationProvider {
    fn name(&self) -> &str {
        "cloudformation"
    }

    async fn create_stack(&self, name: &str, template_body: &str) -> stackflow_cloud::Result<()> {
        let result = self
            .client
            .create_stack()
            .stack_name(name)
            .template_body(template_body)
            .send()
            .await;

        match result {
            Ok(output) => {
                tracing::debug!(
                    "CreateStack accepted: {}",
                    output.stack_id().unwrap_or(name)
                );
                Ok(())
            }
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_already_exists_exception()) =>
            {
                Err(AwsError::AlreadyExists(name.to_string()).into())
            }
            Err(err) => Err(AwsError::Sdk {
                operation: "CreateStack",
                message: DisplayErrorContext(&err).to_string(),
            }
            .into()),
        }
    }

    async fn wait_for_create_complete(&self, name: &str) -> stackflow_cloud::Result<()> {
        self.client
            .wait_until_stack_create_complete()
            .stack_name(name)
            .wait(self.max_wait)
            .await
            .map_err(|err| AwsError::WaiterFailed {
                operation: "StackCreateComplete",
                stack: name.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            })?;
        Ok(())
    }

    async fn delete_stack(&self, name: &str) -> stackflow_cloud::Result<()> {
        self.client
            .delete_stack()
            .stack_name(name)
            .send()
            .await
            .map_err(|err| AwsError::Sdk {
                operation: "DeleteStack",
                message: DisplayErrorContext(&err).to_string(),
            })?;
        Ok(())
    }

    async fn wait_for_delete_complete(&self, name: &str) -> stackflow_cloud::Result<()> {
        self.client
            .wait_until_stack_delete_complete()
            .stack_name(name)
            .wait(self.max_wait)
            .await
            .map_err(|err| AwsError::WaiterFailed {
                operation: "StackDeleteComplete",
                stack: name.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            })?;
        Ok(())
    }

    async fn list_stacks(&self, filter: &StatusFilter) -> stackflow_cloud::Result<StackSnapshot> {
        let statuses: Vec<CfnStackStatus> = filter.statuses().iter().map(to_sdk_status).collect();
        let mut stacks = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let page = self
                .client
                .list_stacks()
                .set_stack_status_filter(Some(statuses.clone()))
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|err| AwsError::Sdk {
                    operation: "ListStacks",
                    message: DisplayErrorContext(&err).to_string(),
                })?;

            for summary in page.stack_summaries() {
                let Some(name) = summary.stack_name() else {
                    continue;
                };
                let status = summary
                    .stack_status()
                    .map(from_sdk_status)
                    .unwrap_or_else(|| StackStatus::Other("UNKNOWN".to_string()));
                stacks.push(StackSummary::new(name, status));
            }

            match page.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        tracing::debug!("ListStacks returned {} stacks", stacks.len());
        Ok(StackSnapshot::new(stacks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping_round_trips_known_states() {
        for status in StackStatus::ALL.iter() {
            let sdk = to_sdk_status(status);
            assert_eq!(sdk.as_str(), status.as_str());
            assert_eq!(&from_sdk_status(&sdk), status);
        }
    }

    #[test]
    fn test_status_mapping_keeps_unknown_states() {
        let sdk = CfnStackStatus::from("IMPORT_COMPLETE");
        assert_eq!(
            from_sdk_status(&sdk),
            StackStatus::Other("IMPORT_COMPLETE".to_string())
        );
    }

    #[test]
    fn test_error_conversion() {
        let err: stackflow_cloud::StackError = AwsError::Sdk {
            operation: "DeleteStack",
            message: "AccessDenied".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "DeleteStack failed: AccessDenied");

        let err: stackflow_cloud::StackError = AwsError::AlreadyExists("web".to_string()).into();
        assert!(matches!(err, stackflow_cloud::StackError::AlreadyExists(name) if name == "web"));
    }

    #[tokio::test]
    async fn test_provider_name() {
        let config = aws_sdk_cloudformation::Config::builder()
            .behavior_version(aws_sdk_cloudformation::config::BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        let provider =
            CloudFormationProvider::new(Client::from_conf(config), DEFAULT_WAITER_TIMEOUT);
        assert_eq!(provider.name(), "cloudformation");
    }
}
