use reqwest::Url;
use std::sync::Arc;
use tracing::{error, info, warn};

use courtly_core::clock::{Clock, VenueZone};
use courtly_core::cutoff::check_cutoff;
use courtly_core::intent::CheckoutIntent;
use courtly_core::payment::{CheckoutProvider, CheckoutSessionRequest, PaymentError};
use courtly_core::pricing::SlotPricing;

use crate::availability::AvailabilityChecker;
use crate::error::BookingError;
use crate::mock_provider::SESSION_ID_PLACEHOLDER;

/// Raw checkout input as received from the client.
#[derive(Debug, Clone, Default)]
pub struct CheckoutRequest {
    pub date: String,
    pub court_id: String,
    pub timeslots: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRedirect {
    pub session_id: String,
    pub url: String,
}

/// Validates a booking request and opens a hosted checkout session for it.
/// Nothing is written to the reservation store here.
#[derive(Clone)]
pub struct CheckoutService {
    provider: Arc<dyn CheckoutProvider>,
    availability: AvailabilityChecker,
    pricing: SlotPricing,
    zone: VenueZone,
    clock: Arc<dyn Clock>,
    public_base_url: String,
}

impl CheckoutService {
    pub fn new(
        provider: Arc<dyn CheckoutProvider>,
        availability: AvailabilityChecker,
        pricing: SlotPricing,
        zone: VenueZone,
        clock: Arc<dyn Clock>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            availability,
            pricing,
            zone,
            clock,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn create_session(&self, request: &CheckoutRequest) -> Result<CheckoutRedirect, BookingError> {
        let intent = CheckoutIntent::validated(&request.date, &request.court_id, &request.timeslots)?;
        self.availability.ensure_known_court(&intent.court_id).await?;

        let cutoff = check_cutoff(&self.zone, &intent.date, intent.first_timeslot(), self.clock.now_utc());
        if cutoff.is_rejected() {
            warn!("Rejecting checkout for {} {:?}: {:?}", intent.date, intent.timeslots, cutoff);
            return Err(BookingError::TooSoon);
        }

        let session_request = CheckoutSessionRequest {
            line_item: self.pricing.line_item(&intent),
            metadata: intent.to_metadata(),
            success_url: self.success_url(&intent)?,
            cancel_url: format!("{}/cancel", self.public_base_url),
        };

        let session = self.provider.create_session(&session_request).await.map_err(|e| {
            error!("{} checkout session creation failed: {}", self.provider.name(), e);
            e
        })?;
        let url = session.url.ok_or_else(|| {
            PaymentError::InvalidResponse(format!("session {} has no redirect url", session.id))
        })?;

        info!(
            "Created {} checkout session {} for {} on {} ({} slot(s), {} {})",
            self.provider.name(),
            session.id,
            intent.court_id,
            intent.date,
            intent.timeslots.len(),
            session_request.line_item.total(),
            session_request.line_item.currency
        );
        Ok(CheckoutRedirect {
            session_id: session.id,
            url,
        })
    }

    /// Booking values are query-encoded; the session placeholder stays literal
    /// so the provider can substitute it.
    fn success_url(&self, intent: &CheckoutIntent) -> Result<String, BookingError> {
        let mut url = Url::parse(&format!("{}/success", self.public_base_url))
            .map_err(|e| BookingError::Configuration(format!("public base url: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("date", &intent.date)
            .append_pair("timeslots", &intent.timeslots.join(","))
            .append_pair("court", &intent.court_id);
        Ok(format!("{}&session_id={}", url, SESSION_ID_PLACEHOLDER))
    }
}
