//! Visibility confirmation
//!
//! The list API is eventually consistent with create/delete, so after a
//! change the driver polls the list until the stack shows up the way it
//! expects, backing off exponentially between attempts.

use crate::backoff::BackoffPolicy;
use crate::error::Result;
use crate::provider::StackProvider;
use crate::stack::{StackSnapshot, StackStatus, StackSummary, StatusFilter};
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// What counts as confirmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// The name is in the list
    Present,
    /// The first entry with the name has this status
    Status(StackStatus),
}

impl Confirmation {
    fn matches<'a>(&self, snapshot: &'a StackSnapshot, name: &str) -> Option<&'a StackSummary> {
        let found = snapshot.find(name)?;
        match self {
            Confirmation::Present => Some(found),
            Confirmation::Status(status) if &found.status == status => Some(found),
            Confirmation::Status(_) => None,
        }
    }
}

/// Poller state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    Waiting,
    Found(StackSummary),
    TimedOut,
}

/// Result of a finished poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOutcome {
    /// `Found` or `TimedOut`
    pub state: PollState,

    /// Number of list calls made
    pub attempts: u32,

    /// Time spent sleeping between attempts
    pub waited: Duration,

    /// Entry for the name in the last snapshot, if any
    pub last_seen: Option<StackSummary>,
}

impl PollOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self.state, PollState::Found(_))
    }
}

/// Polls the provider's list until `name` satisfies `condition`
pub struct VisibilityPoller<'a, P: StackProvider + ?Sized> {
    provider: &'a P,
    policy: &'a BackoffPolicy,
    filter: &'a StatusFilter,
}

impl<'a, P: StackProvider + ?Sized> VisibilityPoller<'a, P> {
    pub fn new(provider: &'a P, policy: &'a BackoffPolicy, filter: &'a StatusFilter) -> Self {
        Self {
            provider,
            policy,
            filter,
        }
    }

    /// Run the poll to completion. List errors abort the poll.
    pub async fn poll(&self, name: &str, condition: &Confirmation) -> Result<PollOutcome> {
        let started = Instant::now();
        let mut state = PollState::Waiting;
        let mut attempts = 0;
        let mut waited = Duration::ZERO;
        let mut last_seen = None;

        for delay in self.policy.delays() {
            let remaining = self.policy.max_wait.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                break;
            }
            let delay = delay.min(remaining);
            tracing::debug!("Sleeping {}s before looking for {}", delay.as_secs_f64(), name);
            sleep(delay).await;
            waited += delay;

            let snapshot = self.provider.list_stacks(self.filter).await?;
            attempts += 1;
            last_seen = snapshot.find(name).cloned();

            if let Some(found) = condition.matches(&snapshot, name) {
                tracing::debug!("Found {} with status {} (attempt {})", name, found.status, attempts);
                state = PollState::Found(found.clone());
                break;
            }
            tracing::debug!("{} not confirmed yet (attempt {})", name, attempts);
        }

        if state == PollState::Waiting {
            tracing::warn!(
                "Gave up on {} after {} attempts ({}s)",
                name,
                attempts,
                waited.as_secs()
            );
            state = PollState::TimedOut;
        }

        Ok(PollOutcome {
            state,
            attempts,
            waited,
            last_seen,
        })
    }
}
