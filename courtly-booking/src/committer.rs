//! Turns a settled payment into reservation records.
//!
//! Both payment paths end here: hosted checkout confirmation and the mock
//! card flow. A commit re-runs the booking cutoff, re-checks every slot and
//! then writes the whole booking in one atomic store call. The store's
//! uniqueness guarantee is what finally decides a race between two commits
//! for the same slot.

use std::sync::Arc;
use tracing::{error, info, warn};

use courtly_core::clock::{Clock, VenueZone};
use courtly_core::cutoff::check_cutoff;
use courtly_core::intent::CheckoutIntent;
use courtly_core::payment::{CheckoutProvider, PaymentStatus};
use courtly_core::pii::Masked;
use courtly_core::repository::ReservationRepository;
use courtly_core::reservation::{split_amount, NewReservation, Reservation, ReservationStatus, SlotKey};

use crate::availability::AvailabilityChecker;
use crate::error::BookingError;

/// A booking written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedBooking {
    pub payment_ref: String,
    pub reservations: Vec<Reservation>,
}

impl CommittedBooking {
    pub fn total_amount(&self) -> i64 {
        self.reservations.iter().map(|r| r.amount).sum()
    }
}

#[derive(Clone)]
pub struct ReservationCommitter {
    provider: Arc<dyn CheckoutProvider>,
    reservations: Arc<dyn ReservationRepository>,
    availability: AvailabilityChecker,
    zone: VenueZone,
    clock: Arc<dyn Clock>,
}

impl ReservationCommitter {
    pub fn new(
        provider: Arc<dyn CheckoutProvider>,
        reservations: Arc<dyn ReservationRepository>,
        availability: AvailabilityChecker,
        zone: VenueZone,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provider,
            reservations,
            availability,
            zone,
            clock,
        }
    }

    /// Confirms a hosted checkout session after the customer returns from
    /// the provider.
    pub async fn confirm_session(&self, session_id: &str) -> Result<CommittedBooking, BookingError> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(BookingError::Validation("missing session_id".to_string()));
        }

        let session = self.provider.retrieve_session(session_id).await.map_err(|e| {
            error!("Failed to retrieve {} session {}: {}", self.provider.name(), session_id, e);
            e
        })?;
        if session.payment_status != PaymentStatus::Paid {
            warn!("Session {} not paid ({:?}), nothing reserved", session.id, session.payment_status);
            return Err(BookingError::PaymentIncomplete);
        }

        let intent = CheckoutIntent::from_metadata(&session.metadata);
        let email = session.customer_email.unwrap_or_default();
        self.commit(&intent, Masked(email), session.amount_total.unwrap_or(0), &session.id)
            .await
    }

    /// Commits a booking paid outside hosted checkout.
    pub async fn commit_direct(
        &self,
        intent: &CheckoutIntent,
        email: Masked<String>,
        amount_total: i64,
        payment_ref: &str,
    ) -> Result<CommittedBooking, BookingError> {
        self.commit(intent, email, amount_total, payment_ref).await
    }

    async fn commit(
        &self,
        intent: &CheckoutIntent,
        email: Masked<String>,
        amount_total: i64,
        payment_ref: &str,
    ) -> Result<CommittedBooking, BookingError> {
        if intent.date.is_empty() || intent.court_id.is_empty() || intent.timeslots.is_empty() {
            return Err(BookingError::Validation("missing booking details".to_string()));
        }

        let now = self.clock.now_utc();
        let cutoff = check_cutoff(&self.zone, &intent.date, intent.first_timeslot(), now);
        if cutoff.is_rejected() {
            warn!("Refusing {} for {} {:?}: {:?}", payment_ref, intent.date, intent.timeslots, cutoff);
            return Err(BookingError::TooSoon);
        }

        let keys: Vec<SlotKey> = intent
            .timeslots
            .iter()
            .map(|slot| SlotKey::new(intent.date.as_str(), slot.as_str(), intent.court_id.as_str()))
            .collect();
        for key in &keys {
            if !self.availability.is_slot_free(key).await? {
                warn!("Slot {} already reserved, rejecting {}", key, payment_ref);
                return Err(BookingError::Conflict);
            }
        }

        let created_at = now.timestamp();
        let batch: Vec<NewReservation> = keys
            .into_iter()
            .zip(split_amount(amount_total, intent.timeslots.len()))
            .map(|(key, amount)| NewReservation {
                key,
                user_email: email.clone(),
                amount,
                status: ReservationStatus::Paid,
                created_at,
                payment_ref: payment_ref.to_string(),
            })
            .collect();

        let reservations = self.reservations.insert_batch(&batch).await?;
        info!(
            "Reserved {} slot(s) on {} for {} (payment {})",
            reservations.len(),
            intent.court_id,
            intent.date,
            payment_ref
        );
        Ok(CommittedBooking {
            payment_ref: payment_ref.to_string(),
            reservations,
        })
    }
}
