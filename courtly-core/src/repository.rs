use async_trait::async_trait;
use uuid::Uuid;

use crate::catalog::Court;
use crate::reservation::{NewReservation, Reservation, SlotKey};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("slot already reserved: {0}")]
    Conflict(SlotKey),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Repository trait for reservation data access
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Paid reservations for `(date, timeslot)`, optionally narrowed to one court.
    async fn find_by_slot(
        &self,
        date: &str,
        timeslot_id: &str,
        court_id: Option<&str>,
    ) -> Result<Vec<Reservation>, StoreError>;

    /// Writes every reservation or none. A batch touching an occupied key
    /// (including a key repeated within the batch) fails with
    /// [`StoreError::Conflict`] and leaves the store unchanged.
    async fn insert_batch(&self, batch: &[NewReservation]) -> Result<Vec<Reservation>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Reservation>, StoreError>;

    /// Every record written for one payment, in slot order.
    async fn find_by_payment_ref(&self, payment_ref: &str) -> Result<Vec<Reservation>, StoreError>;
}

/// Repository trait for the court catalog
#[async_trait]
pub trait CourtRepository: Send + Sync {
    /// Active courts in listing order.
    async fn list_courts(&self) -> Result<Vec<Court>, StoreError>;
}
