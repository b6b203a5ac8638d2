//! StackFlow Cloud
//!
//! Provider abstraction and lifecycle driver for infrastructure stacks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  StackFlow CLI                   │
//! │           (stack -o create|list|delete|all)      │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                stackflow-cloud                   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │            StackLifecycle                 │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌────────────────────────┐  │
//! │  │ BackoffPolicy│  │   VisibilityPoller      │  │
//! │  └──────────────┘  └────────────────────────┘  │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │        trait StackProvider { ... }        │   │
//! │  └──────────────────────────────────────────┘   │
//! └───────┬─────────────────┬───────────────────────┘
//!         │                 │
//! ┌───────▼────────┐ ┌──────▼───────────┐
//! │ cloudformation │ │ in-memory (test) │
//! │    provider    │ │     provider     │
//! └────────────────┘ └──────────────────┘
//! ```

pub mod backoff;
pub mod error;
pub mod lifecycle;
pub mod poller;
pub mod provider;
pub mod stack;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-exports
pub use backoff::BackoffPolicy;
pub use error::{Result, StackError};
pub use lifecycle::StackLifecycle;
pub use poller::{Confirmation, PollOutcome, PollState, VisibilityPoller};
pub use provider::StackProvider;
pub use stack::{Operation, StackSnapshot, StackStatus, StackSummary, StatusFilter};
