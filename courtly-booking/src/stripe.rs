//! Stripe Checkout Sessions over the REST API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

use courtly_core::intent::Metadata;
use courtly_core::payment::{
    CheckoutProvider, CheckoutSession, CheckoutSessionRequest, PaymentError, PaymentStatus,
};

#[derive(Clone)]
pub struct StripeCheckoutProvider {
    http: Client,
    api_base: String,
    secret_key: String,
}

#[derive(Debug, Deserialize)]
struct StripeSession {
    id: String,
    url: Option<String>,
    payment_status: Option<PaymentStatus>,
    amount_total: Option<i64>,
    customer_details: Option<StripeCustomerDetails>,
    customer_email: Option<String>,
    #[serde(default)]
    metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
struct StripeCustomerDetails {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    message: Option<String>,
    code: Option<String>,
}

impl From<StripeSession> for CheckoutSession {
    fn from(s: StripeSession) -> Self {
        let customer_email = s
            .customer_details
            .and_then(|d| d.email)
            .or(s.customer_email);
        CheckoutSession {
            id: s.id,
            url: s.url,
            payment_status: s.payment_status.unwrap_or(PaymentStatus::Unpaid),
            amount_total: s.amount_total,
            customer_email,
            metadata: s.metadata.unwrap_or_default(),
        }
    }
}

/// Form body for `POST /v1/checkout/sessions`, using Stripe's bracketed keys.
pub fn session_form(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let item = &request.line_item;
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
        ("line_items[0][quantity]".to_string(), item.quantity.to_string()),
        ("line_items[0][price_data][currency]".to_string(), item.currency.clone()),
        ("line_items[0][price_data][unit_amount]".to_string(), item.unit_amount.to_string()),
        ("line_items[0][price_data][product_data][name]".to_string(), item.name.clone()),
        (
            "line_items[0][price_data][product_data][description]".to_string(),
            item.description.clone(),
        ),
    ];
    form.extend(
        request
            .metadata
            .iter()
            .map(|(k, v)| (format!("metadata[{}]", k), v.clone())),
    );
    form
}

impl StripeCheckoutProvider {
    pub fn new(secret_key: impl Into<String>, api_base: impl Into<String>, timeout: Duration) -> Result<Self, PaymentError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        })
    }

    fn sessions_url(&self) -> String {
        format!("{}/v1/checkout/sessions", self.api_base)
    }

    /// The session id is pushed as one path segment, so `/`, `?` and `#`
    /// inside it are percent-encoded.
    fn session_url(&self, session_id: &str) -> Result<Url, PaymentError> {
        let mut url = Url::parse(&self.sessions_url())
            .map_err(|e| PaymentError::Transport(format!("invalid api base: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| PaymentError::Transport(format!("api base {} cannot take a path", self.api_base)))?
            .push(session_id);
        Ok(url)
    }

    async fn read_session(&self, response: reqwest::Response, session_id: Option<&str>) -> Result<CheckoutSession, PaymentError> {
        let status = response.status();
        if status.is_success() {
            let session: StripeSession = response
                .json()
                .await
                .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;
            return Ok(session.into());
        }

        let body = response.text().await.unwrap_or_default();
        let envelope = serde_json::from_str::<StripeErrorEnvelope>(&body).ok();
        if let (StatusCode::NOT_FOUND, Some(id)) = (status, session_id) {
            return Err(PaymentError::SessionNotFound(id.to_string()));
        }

        let message = envelope
            .map(|e| match (e.error.message, e.error.code) {
                (Some(message), _) => message,
                (None, Some(code)) => code,
                (None, None) => status.to_string(),
            })
            .unwrap_or_else(|| format!("{}: {}", status, body));
        error!("Stripe request failed with {}: {}", status, message);
        Err(PaymentError::Provider(message))
    }
}

#[async_trait]
impl CheckoutProvider for StripeCheckoutProvider {
    fn name(&self) -> &'static str {
        "stripe"
    }

    async fn create_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        debug!(
            "Creating Stripe session: currency={} unit_amount={} quantity={}",
            request.line_item.currency, request.line_item.unit_amount, request.line_item.quantity
        );
        let response = self
            .http
            .post(self.sessions_url())
            .bearer_auth(&self.secret_key)
            .form(&session_form(request))
            .send()
            .await
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        self.read_session(response, None).await
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, PaymentError> {
        if session_id.is_empty() {
            return Err(PaymentError::SessionNotFound(session_id.to_string()));
        }
        let response = self
            .http
            .get(self.session_url(session_id)?)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        self.read_session(response, Some(session_id)).await
    }
}
