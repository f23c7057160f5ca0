//! In-process stores for development and tests.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use tracing::{info, warn};
use uuid::Uuid;

use courtly_core::catalog::{seed_courts, Court};
use courtly_core::repository::{CourtRepository, ReservationRepository, StoreError};
use courtly_core::reservation::{NewReservation, Reservation, ReservationStatus, SlotKey};

/// Reservations held in memory. Check and insert happen under one lock,
/// which gives the same all-or-nothing uniqueness the Postgres index does.
#[derive(Default)]
pub struct InMemoryReservationRepository {
    reservations: Mutex<Vec<Reservation>>,
}

impl InMemoryReservationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Reservation>>, StoreError> {
        self.reservations
            .lock()
            .map_err(|_| StoreError::Unavailable("reservation store lock poisoned".to_string()))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn find_by_slot(
        &self,
        date: &str,
        timeslot_id: &str,
        court_id: Option<&str>,
    ) -> Result<Vec<Reservation>, StoreError> {
        let reservations = self.lock()?;
        Ok(reservations
            .iter()
            .filter(|r| r.status == ReservationStatus::Paid)
            .filter(|r| r.date == date && r.timeslot_id == timeslot_id)
            .filter(|r| court_id.map_or(true, |c| r.court_id == c))
            .cloned()
            .collect())
    }

    async fn insert_batch(&self, batch: &[NewReservation]) -> Result<Vec<Reservation>, StoreError> {
        let mut reservations = self.lock()?;

        let mut taken: HashSet<SlotKey> = reservations
            .iter()
            .filter(|r| r.status == ReservationStatus::Paid)
            .map(Reservation::key)
            .collect();
        for new in batch {
            if new.status == ReservationStatus::Paid && !taken.insert(new.key.clone()) {
                warn!("Reservation conflict on {} for payment {}", new.key, new.payment_ref);
                return Err(StoreError::Conflict(new.key.clone()));
            }
        }

        let written: Vec<Reservation> = batch
            .iter()
            .map(|new| Reservation::from_new(Uuid::new_v4(), new))
            .collect();
        reservations.extend(written.iter().cloned());

        info!("Stored {} reservation(s)", written.len());
        Ok(written)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Reservation>, StoreError> {
        let reservations = self.lock()?;
        Ok(reservations.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_payment_ref(&self, payment_ref: &str) -> Result<Vec<Reservation>, StoreError> {
        let reservations = self.lock()?;
        let mut matches: Vec<Reservation> = reservations
            .iter()
            .filter(|r| r.payment_ref == payment_ref)
            .cloned()
            .collect();
        matches.sort_by(|a, b| (&a.date, &a.timeslot_id).cmp(&(&b.date, &b.timeslot_id)));
        Ok(matches)
    }
}

/// A fixed court list.
pub struct StaticCourtRepository {
    courts: Vec<Court>,
}

impl StaticCourtRepository {
    pub fn new(courts: Vec<Court>) -> Self {
        Self { courts }
    }

    pub fn seeded() -> Self {
        Self::new(seed_courts())
    }
}

#[async_trait]
impl CourtRepository for StaticCourtRepository {
    async fn list_courts(&self) -> Result<Vec<Court>, StoreError> {
        Ok(self.courts.iter().filter(|c| c.active).cloned().collect())
    }
}
