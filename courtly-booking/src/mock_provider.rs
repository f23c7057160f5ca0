use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use courtly_core::payment::{
    CheckoutProvider, CheckoutSession, CheckoutSessionRequest, PaymentError, PaymentStatus,
};

pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";
pub const MOCK_CUSTOMER_EMAIL: &str = "guest@demo.com";

/// Provider that settles every session instantly. The redirect URL points
/// straight at the success page, so the front-end flow runs end to end
/// without an external account.
#[derive(Default)]
pub struct MockCheckoutProvider {
    sessions: Mutex<HashMap<String, CheckoutSession>>,
}

impl MockCheckoutProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides a session's payment status, e.g. to simulate an abandoned checkout.
    pub fn set_payment_status(&self, session_id: &str, status: PaymentStatus) -> bool {
        let Ok(mut sessions) = self.sessions.lock() else {
            return false;
        };
        match sessions.get_mut(session_id) {
            Some(session) => {
                session.payment_status = status;
                true
            }
            None => false,
        }
    }

    /// Extracts the session id from a redirect URL this provider produced.
    pub fn session_id_from_url(url: &str) -> Option<&str> {
        url.split("session_id=").nth(1).map(|rest| rest.split('&').next().unwrap_or(rest))
    }
}

#[async_trait]
impl CheckoutProvider for MockCheckoutProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let id = format!("cs_mock_{}", Uuid::new_v4().simple());
        let session = CheckoutSession {
            id: id.clone(),
            url: Some(request.success_url.replace(SESSION_ID_PLACEHOLDER, &id)),
            payment_status: PaymentStatus::Paid,
            amount_total: Some(request.line_item.total()),
            customer_email: Some(MOCK_CUSTOMER_EMAIL.to_string()),
            metadata: request.metadata.clone(),
        };

        self.sessions
            .lock()
            .map_err(|_| PaymentError::Transport("mock session store poisoned".to_string()))?
            .insert(id, session.clone());
        Ok(session)
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, PaymentError> {
        self.sessions
            .lock()
            .map_err(|_| PaymentError::Transport("mock session store poisoned".to_string()))?
            .get(session_id)
            .cloned()
            .ok_or_else(|| PaymentError::SessionNotFound(session_id.to_string()))
    }
}
