pub mod availability;
pub mod checkout;
pub mod committer;
pub mod error;
pub mod mock_payment;
pub mod mock_provider;
pub mod stripe;

pub use availability::{AvailabilityChecker, CourtListing};
pub use checkout::{CheckoutRedirect, CheckoutRequest, CheckoutService};
pub use committer::{CommittedBooking, ReservationCommitter};
pub use error::BookingError;
pub use mock_payment::{CardDetails, MockPaymentReceipt, MockPaymentRequest, MockPaymentService};
pub use mock_provider::MockCheckoutProvider;
pub use stripe::StripeCheckoutProvider;
