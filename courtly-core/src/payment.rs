use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::intent::Metadata;
use crate::pricing::LineItem;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    NoPaymentRequired,
    #[serde(other)]
    Unknown,
}

/// Parameters for a hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    pub line_item: LineItem,
    pub metadata: Metadata,
    /// May contain the provider's `{CHECKOUT_SESSION_ID}` placeholder.
    pub success_url: String,
    pub cancel_url: String,
}

/// A hosted checkout session as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    /// Redirect target; only present while the session is open.
    pub url: Option<String>,
    pub payment_status: PaymentStatus,
    /// Minor units.
    pub amount_total: Option<i64>,
    pub customer_email: Option<String>,
    pub metadata: Metadata,
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("payment provider unreachable: {0}")]
    Transport(String),
    #[error("{0}")]
    Provider(String),
    #[error("checkout session not found: {0}")]
    SessionNotFound(String),
    #[error("unexpected payment provider response: {0}")]
    InvalidResponse(String),
}

/// A hosted-checkout payment provider: create a session, later retrieve it.
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn create_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError>;

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, PaymentError>;
}
