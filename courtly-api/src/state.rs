use std::sync::Arc;

use courtly_booking::{AvailabilityChecker, CheckoutService, MockPaymentService, ReservationCommitter};
use courtly_core::clock::{Clock, VenueZone};
use courtly_core::payment::CheckoutProvider;
use courtly_core::pricing::SlotPricing;
use courtly_core::repository::{CourtRepository, ReservationRepository};
use courtly_store::app_config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub zone: VenueZone,
    pub clock: Arc<dyn Clock>,
    pub reservations: Arc<dyn ReservationRepository>,
    pub availability: AvailabilityChecker,
    pub checkout: CheckoutService,
    pub committer: ReservationCommitter,
    pub mock_payments: MockPaymentService,
}

impl AppState {
    /// Wires the booking services from config and the chosen backends.
    pub fn new(
        config: Config,
        reservations: Arc<dyn ReservationRepository>,
        courts: Arc<dyn CourtRepository>,
        provider: Arc<dyn CheckoutProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let zone = VenueZone::resolve(&config.venue.time_zone);
        let pricing = SlotPricing::new(config.pricing.price_per_slot, config.pricing.currency.as_str());
        let availability = AvailabilityChecker::new(reservations.clone(), courts);

        let checkout = CheckoutService::new(
            provider.clone(),
            availability.clone(),
            pricing.clone(),
            zone.clone(),
            clock.clone(),
            config.payment.public_base_url.as_str(),
        );
        let committer = ReservationCommitter::new(
            provider,
            reservations.clone(),
            availability.clone(),
            zone.clone(),
            clock.clone(),
        );
        let mock_payments =
            MockPaymentService::new(committer.clone(), availability.clone(), pricing, clock.clone());

        Self {
            config: Arc::new(config),
            zone,
            clock,
            reservations,
            availability,
            checkout,
            committer,
            mock_payments,
        }
    }
}
