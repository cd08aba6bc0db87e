use thiserror::Error;

use drainer_model::ModelError;

use crate::{hooks::HookError, queue::QueueError};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid loop configuration: {0}")]
    Config(#[from] ModelError),

    #[error("bootstrap failed: {0}")]
    Bootstrap(#[source] HookError),

    #[error("queue poll failed: {0}")]
    Queue(#[from] QueueError),
}
