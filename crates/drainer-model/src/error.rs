use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid queue name: {0:?}")]
    InvalidQueueName(String),

    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
