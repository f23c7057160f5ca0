use courtly_core::payment::PaymentError;
use courtly_core::repository::StoreError;
use courtly_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),

    #[error("cannot book a past/soon timeslot")]
    TooSoon,

    #[error("one or more selected slots already reserved")]
    Conflict,

    #[error("payment not completed")]
    PaymentIncomplete,

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error("misconfigured: {0}")]
    Configuration(String),
}

impl BookingError {
    /// Expected outcomes of a booking attempt, as opposed to bad input or a
    /// failing dependency.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            BookingError::TooSoon | BookingError::Conflict | BookingError::PaymentIncomplete
        )
    }
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => BookingError::Conflict,
            other => BookingError::Store(other),
        }
    }
}

impl From<CoreError> for BookingError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) => BookingError::Validation(msg),
        }
    }
}
