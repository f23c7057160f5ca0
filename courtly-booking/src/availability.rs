use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use courtly_core::catalog::Court;
use courtly_core::repository::{CourtRepository, ReservationRepository, StoreError};
use courtly_core::reservation::SlotKey;

use crate::error::BookingError;

/// Result of a court listing. `Catalog` means no availability question was
/// asked (date or timeslots missing); it says nothing about occupancy.
#[derive(Debug, Clone, PartialEq)]
pub enum CourtListing {
    Catalog(Vec<Court>),
    Available(Vec<Court>),
}

impl CourtListing {
    pub fn courts(&self) -> &[Court] {
        match self {
            CourtListing::Catalog(courts) | CourtListing::Available(courts) => courts,
        }
    }

    pub fn into_courts(self) -> Vec<Court> {
        match self {
            CourtListing::Catalog(courts) | CourtListing::Available(courts) => courts,
        }
    }

    pub fn is_availability_answer(&self) -> bool {
        matches!(self, CourtListing::Available(_))
    }
}

/// Computes free courts from the reservation store. Store failures are
/// returned to the caller, never read as "nothing booked".
#[derive(Clone)]
pub struct AvailabilityChecker {
    reservations: Arc<dyn ReservationRepository>,
    courts: Arc<dyn CourtRepository>,
}

impl AvailabilityChecker {
    pub fn new(reservations: Arc<dyn ReservationRepository>, courts: Arc<dyn CourtRepository>) -> Self {
        Self { reservations, courts }
    }

    /// Courts free for every one of `timeslots` on `date`, in catalog order.
    pub async fn list_courts(&self, date: &str, timeslots: &[String]) -> Result<CourtListing, StoreError> {
        let catalog = self.courts.list_courts().await?;
        if date.trim().is_empty() || timeslots.is_empty() {
            return Ok(CourtListing::Catalog(catalog));
        }

        let occupied = self.occupied_courts(date, timeslots, None).await?;
        debug!("{} court(s) occupied on {} for {:?}", occupied.len(), date, timeslots);

        Ok(CourtListing::Available(
            catalog.into_iter().filter(|c| !occupied.contains(&c.id)).collect(),
        ))
    }

    /// Union of courts holding a paid reservation in any of `timeslots`.
    pub async fn occupied_courts(
        &self,
        date: &str,
        timeslots: &[String],
        court_id: Option<&str>,
    ) -> Result<HashSet<String>, StoreError> {
        let mut occupied = HashSet::new();
        for timeslot in timeslots {
            let matches = self.reservations.find_by_slot(date, timeslot, court_id).await?;
            occupied.extend(matches.into_iter().map(|r| r.court_id));
        }
        Ok(occupied)
    }

    /// Fails with a validation error unless `court_id` is an active court.
    pub async fn ensure_known_court(&self, court_id: &str) -> Result<(), BookingError> {
        let catalog = self.courts.list_courts().await?;
        if catalog.iter().any(|c| c.id == court_id) {
            Ok(())
        } else {
            Err(BookingError::Validation(format!("unknown court {:?}", court_id)))
        }
    }

    pub async fn is_slot_free(&self, key: &SlotKey) -> Result<bool, StoreError> {
        let matches = self
            .reservations
            .find_by_slot(&key.date, &key.timeslot_id, Some(&key.court_id))
            .await?;
        Ok(matches.is_empty())
    }
}
