pub mod catalog;
pub mod clock;
pub mod cutoff;
pub mod intent;
pub mod payment;
pub mod pii;
pub mod pricing;
pub mod repository;
pub mod reservation;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    ValidationError(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        CoreError::ValidationError(msg.into())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
