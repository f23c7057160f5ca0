use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use courtly_api::{app, AppState};
use courtly_booking::MockCheckoutProvider;
use courtly_core::clock::FixedClock;
use courtly_store::app_config::Config;
use courtly_store::{InMemoryReservationRepository, StaticCourtRepository};

/// One hour before the first slot of 2025-06-01 in Jakarta.
pub const MORNING: &str = "2025-06-01T07:00:00+07:00";

pub struct TestApp {
    pub router: Router,
    pub reservations: Arc<InMemoryReservationRepository>,
    pub provider: Arc<MockCheckoutProvider>,
}

impl TestApp {
    pub fn at(now: &str) -> Self {
        let reservations = Arc::new(InMemoryReservationRepository::new());
        let provider = Arc::new(MockCheckoutProvider::new());
        let state = AppState::new(
            Config::default(),
            reservations.clone(),
            Arc::new(StaticCourtRepository::seeded()),
            provider.clone(),
            Arc::new(FixedClock::from_rfc3339(now).unwrap()),
        );

        Self {
            router: app(state),
            reservations,
            provider,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

pub fn session_id(redirect_url: &str) -> String {
    MockCheckoutProvider::session_id_from_url(redirect_url)
        .unwrap()
        .to_string()
}
