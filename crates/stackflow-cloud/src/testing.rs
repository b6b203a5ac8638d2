//! In-memory provider for tests
//!
//! Behaves like the real service closely enough for the driver: creates go
//! through `CREATE_IN_PROGRESS`, deletes leave a `DELETE_COMPLETE` entry
//! behind, and new stacks can be hidden from the list for a number of calls.

use crate::error::{Result, StackError};
use crate::provider::StackProvider;
use crate::stack::{StackSnapshot, StackStatus, StackSummary, StatusFilter};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// A recorded provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateStack { name: String, template_body: String },
    WaitForCreate { name: String },
    DeleteStack { name: String },
    WaitForDelete { name: String },
    ListStacks,
}

#[derive(Debug, Default)]
struct Inner {
    /// Newest first, like the service
    stacks: Vec<StackSummary>,
    /// Remaining list calls that omit the stack
    hidden: HashMap<String, u32>,
    calls: Vec<Call>,
}

#[derive(Debug, Default)]
pub struct InMemoryProvider {
    inner: Mutex<Inner>,
    hide_new_for: u32,
    create_error: Option<String>,
    list_error: Option<String>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing stack
    pub fn with_stack(self, name: &str, status: StackStatus) -> Self {
        self.state().stacks.push(StackSummary::new(name, status));
        self
    }

    /// Created stacks stay out of the list for the next `calls` list calls
    pub fn hide_new_stacks_for(mut self, calls: u32) -> Self {
        self.hide_new_for = calls;
        self
    }

    /// Reject every create with this message (e.g. a malformed template)
    pub fn fail_create_with(mut self, message: &str) -> Self {
        self.create_error = Some(message.to_string());
        self
    }

    pub fn fail_list_with(mut self, message: &str) -> Self {
        self.list_error = Some(message.to_string());
        self
    }

    pub fn hide_stack_for(&self, name: &str, calls: u32) {
        self.state().hidden.insert(name.to_string(), calls);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn count_calls(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.state().calls.iter().filter(|c| pred(c)).count()
    }

    /// Current entries regardless of hiding or filters
    pub fn stacks(&self) -> Vec<StackSummary> {
        self.state().stacks.clone()
    }

    fn state(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Inner {
    /// First entry for the name that has not been deleted
    fn live_mut(&mut self, name: &str) -> Option<&mut StackSummary> {
        self.stacks
            .iter_mut()
            .find(|s| s.name == name && s.status != StackStatus::DeleteComplete)
    }
}

#[async_trait]
impl StackProvider for InMemoryProvider {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn create_stack(&self, name: &str, template_body: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::CreateStack {
            name: name.to_string(),
            template_body: template_body.to_string(),
        });

        if let Some(message) = &self.create_error {
            return Err(StackError::api("CreateStack", message.clone()));
        }
        if state.live_mut(name).is_some() {
            return Err(StackError::AlreadyExists(name.to_string()));
        }

        state
            .stacks
            .insert(0, StackSummary::new(name, StackStatus::CreateInProgress));
        if self.hide_new_for > 0 {
            state.hidden.insert(name.to_string(), self.hide_new_for);
        }
        Ok(())
    }

    async fn wait_for_create_complete(&self, name: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::WaitForCreate {
            name: name.to_string(),
        });

        let stack = state
            .live_mut(name)
            .ok_or_else(|| {
                StackError::api("DescribeStacks", format!("Stack with id {} does not exist", name))
            })?;
        if stack.status == StackStatus::CreateInProgress {
            stack.status = StackStatus::CreateComplete;
        }
        Ok(())
    }

    async fn delete_stack(&self, name: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::DeleteStack {
            name: name.to_string(),
        });

        // deleting an unknown stack is not an error for the service either
        if let Some(stack) = state.live_mut(name) {
            stack.status = StackStatus::DeleteInProgress;
        }
        Ok(())
    }

    async fn wait_for_delete_complete(&self, name: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::WaitForDelete {
            name: name.to_string(),
        });

        if let Some(stack) = state.live_mut(name) {
            stack.status = StackStatus::DeleteComplete;
        }
        Ok(())
    }

    async fn list_stacks(&self, filter: &StatusFilter) -> Result<StackSnapshot> {
        let mut state = self.state();
        state.calls.push(Call::ListStacks);

        if let Some(message) = &self.list_error {
            return Err(StackError::api("ListStacks", message.clone()));
        }

        let Inner { stacks, hidden, .. } = &mut *state;
        let snapshot = stacks
            .iter()
            .filter(|s| filter.contains(&s.status))
            .filter(|s| !hidden.get(&s.name).is_some_and(|n| *n > 0))
            .cloned()
            .collect();

        for remaining in hidden.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        Ok(snapshot)
    }
}
