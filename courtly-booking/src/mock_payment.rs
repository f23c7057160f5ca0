//! Demo card payment: any card is accepted and the booking is committed
//! immediately under a generated booking reference.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use courtly_core::clock::Clock;
use courtly_core::intent::CheckoutIntent;
use courtly_core::pii::Masked;
use courtly_core::pricing::SlotPricing;

use crate::availability::AvailabilityChecker;
use crate::committer::{CommittedBooking, ReservationCommitter};
use crate::error::BookingError;

const DEMO_EMAIL_DOMAIN: &str = "demo.com";

#[derive(Debug, Clone, Default)]
pub struct CardDetails {
    pub number: Masked<String>,
    pub name: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: Masked<String>,
}

impl CardDetails {
    pub fn is_complete(&self) -> bool {
        [
            self.number.expose().as_str(),
            self.name.as_str(),
            self.expiry_month.as_str(),
            self.expiry_year.as_str(),
            self.cvv.expose().as_str(),
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }

    /// `Jane Doe` becomes `jane.doe@demo.com`.
    pub fn purchaser_email(&self) -> String {
        let local = self
            .name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(".")
            .to_lowercase();
        format!("{}@{}", local, DEMO_EMAIL_DOMAIN)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockPaymentRequest {
    pub date: String,
    pub court_id: String,
    pub timeslots: Vec<String>,
    /// Client-quoted total; informational only.
    pub amount: i64,
    pub card: CardDetails,
}

#[derive(Debug, Clone)]
pub struct MockPaymentReceipt {
    pub booking_id: String,
    pub booking: CommittedBooking,
}

/// `BK-<millis>-<6 hex>`; the suffix keeps two payments in the same
/// millisecond apart.
pub fn booking_reference(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("BK-{}-{}", now.timestamp_millis(), &suffix[..6])
}

#[derive(Clone)]
pub struct MockPaymentService {
    committer: ReservationCommitter,
    availability: AvailabilityChecker,
    pricing: SlotPricing,
    clock: Arc<dyn Clock>,
}

impl MockPaymentService {
    pub fn new(
        committer: ReservationCommitter,
        availability: AvailabilityChecker,
        pricing: SlotPricing,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            committer,
            availability,
            pricing,
            clock,
        }
    }

    pub async fn process(&self, request: &MockPaymentRequest) -> Result<MockPaymentReceipt, BookingError> {
        if request.date.trim().is_empty() || request.court_id.trim().is_empty() || request.timeslots.is_empty() {
            return Err(BookingError::Validation("missing booking details".to_string()));
        }
        if !request.card.is_complete() {
            return Err(BookingError::Validation("missing card details".to_string()));
        }
        let intent = CheckoutIntent::validated(&request.date, &request.court_id, &request.timeslots)?;
        self.availability.ensure_known_court(&intent.court_id).await?;

        // The charge is priced server-side, like a hosted checkout would be.
        let total = self.pricing.line_item(&intent).total();
        if request.amount != total {
            debug!("Client quoted {} for {} slot(s), charging {}", request.amount, intent.timeslots.len(), total);
        }

        let booking_id = booking_reference(self.clock.now_utc());
        let email = Masked(request.card.purchaser_email());
        let booking = self.committer.commit_direct(&intent, email, total, &booking_id).await?;

        info!("Mock payment {} accepted for {} slot(s)", booking_id, booking.reservations.len());
        Ok(MockPaymentReceipt { booking_id, booking })
    }
}
