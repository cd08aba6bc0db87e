//! Collaborator hooks invoked by the worker loop around polling.
//!
//! - [`Bootstrap`] runs exactly once, before the first poll (task registration, discovery).
//! - [`IdleHook`] runs once per empty poll, before the idle wait, so collaborators can
//!   release resources that would otherwise sit unused through a long quiet period.
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HookError {
    #[error("{hook}: {reason}")]
    Failed { hook: &'static str, reason: String },
}

impl HookError {
    pub fn failed(hook: &'static str, reason: impl Into<String>) -> Self {
        HookError::Failed {
            hook,
            reason: reason.into(),
        }
    }
}

/// One-shot initialization that must finish before the first poll.
///
/// A failure aborts the loop before any task is taken.
#[async_trait]
pub trait Bootstrap: Send + Sync {
    /// Hook name used in logs.
    fn name(&self) -> &'static str {
        "bootstrap"
    }

    async fn bootstrap(&self) -> Result<(), HookError>;
}

/// Resource recycling between empty polls.
///
/// Errors are logged by the loop and otherwise ignored: an idle hook can never stop a worker.
#[async_trait]
pub trait IdleHook: Send + Sync {
    /// Hook name used in logs.
    fn name(&self) -> &'static str {
        "idle"
    }

    async fn on_idle(&self) -> Result<(), HookError>;
}
