//! Stack lifecycle driver
//!
//! Wraps a [`StackProvider`] with the create / list / delete steps and the
//! visibility confirmations that follow them. Every step is sequential and
//! any error ends the current operation.

use crate::backoff::BackoffPolicy;
use crate::error::{Result, StackError};
use crate::poller::{Confirmation, PollState, VisibilityPoller};
use crate::provider::StackProvider;
use crate::stack::{StackSnapshot, StackStatus, StackSummary, StatusFilter};

pub struct StackLifecycle<'a, P: StackProvider + ?Sized> {
    provider: &'a P,
    policy: BackoffPolicy,
    filter: StatusFilter,
}

impl<'a, P: StackProvider + ?Sized> StackLifecycle<'a, P> {
    pub fn new(provider: &'a P, policy: BackoffPolicy) -> Self {
        Self {
            provider,
            policy,
            filter: StatusFilter::all(),
        }
    }

    /// Status filter for listings; confirmation polls always use every status
    pub fn with_filter(mut self, filter: StatusFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Create the stack and block until the service reports it done
    pub async fn create(&self, name: &str, template_body: &str) -> Result<()> {
        tracing::info!("Creating stack {} via {}", name, self.provider.name());
        self.provider.create_stack(name, template_body).await?;
        self.provider.wait_for_create_complete(name).await?;
        tracing::info!("Created stack {}", name);
        Ok(())
    }

    /// Every stack matching the configured status filter
    pub async fn list(&self) -> Result<StackSnapshot> {
        let snapshot = self.provider.list_stacks(&self.filter).await?;
        tracing::debug!("Listed {} stacks", snapshot.len());
        Ok(snapshot)
    }

    /// Entries for a single name
    pub async fn list_named(&self, name: &str) -> Result<StackSnapshot> {
        let snapshot = self.list().await?;
        Ok(snapshot.named(name).cloned().collect())
    }

    /// Delete the stack and block until the service reports it gone
    pub async fn delete(&self, name: &str) -> Result<()> {
        tracing::info!("Deleting stack {} via {}", name, self.provider.name());
        self.provider.delete_stack(name).await?;
        self.provider.wait_for_delete_complete(name).await?;
        tracing::info!("Deleted stack {}", name);
        Ok(())
    }

    /// Poll until the name shows up in the list
    pub async fn confirm_visible(&self, name: &str) -> Result<StackSummary> {
        self.confirm(name, Confirmation::Present).await
    }

    /// Poll until the name is listed as `DELETE_COMPLETE`
    pub async fn confirm_deleted(&self, name: &str) -> Result<StackSummary> {
        self.confirm(name, Confirmation::Status(StackStatus::DeleteComplete))
            .await
    }

    async fn confirm(&self, name: &str, condition: Confirmation) -> Result<StackSummary> {
        tracing::debug!("Looking for {} in list of stacks", name);
        let filter = StatusFilter::all();
        let outcome = VisibilityPoller::new(self.provider, &self.policy, &filter)
            .poll(name, &condition)
            .await?;

        match outcome.state {
            PollState::Found(summary) => Ok(summary),
            PollState::TimedOut | PollState::Waiting => Err(StackError::VisibilityTimeout {
                name: name.to_string(),
                waited: outcome.waited,
            }),
        }
    }
}
