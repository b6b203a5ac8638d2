//! Stack provider trait definition

use crate::error::Result;
use crate::stack::{StackSnapshot, StatusFilter};
use async_trait::async_trait;

/// Provisioning service abstraction trait
///
/// The lifecycle driver only talks to the service through this trait.
/// Credentials and session setup belong to the implementation.
#[async_trait]
pub trait StackProvider: Send + Sync {
    /// Returns the provider name (e.g., "cloudformation")
    fn name(&self) -> &str;

    /// Submit a creation request for `name` with the given template body
    async fn create_stack(&self, name: &str, template_body: &str) -> Result<()>;

    /// Block until the service reports the create as finished
    async fn wait_for_create_complete(&self, name: &str) -> Result<()>;

    /// Submit a deletion request for `name`
    async fn delete_stack(&self, name: &str) -> Result<()>;

    /// Block until the service reports the delete as finished
    async fn wait_for_delete_complete(&self, name: &str) -> Result<()>;

    /// Fetch every stack whose status is in `filter`
    async fn list_stacks(&self, filter: &StatusFilter) -> Result<StackSnapshot>;
}
