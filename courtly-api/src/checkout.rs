use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use courtly_booking::CheckoutRequest;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutSessionBody {
    pub date: String,
    pub timeslots: Vec<String>,
    /// Single-slot form accepted when `timeslots` is empty.
    pub timeslot_id: Option<String>,
    pub court_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LegacyCourtQuery {
    pub court: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutSessionResponse {
    pub url: String,
}

impl CheckoutSessionBody {
    fn into_request(self, court_fallback: Option<String>) -> CheckoutRequest {
        let mut timeslots = self.timeslots;
        if timeslots.iter().all(|t| t.trim().is_empty()) {
            timeslots = self.timeslot_id.into_iter().collect();
        }
        let court_id = if self.court_id.trim().is_empty() {
            court_fallback.unwrap_or_default()
        } else {
            self.court_id
        };

        CheckoutRequest {
            date: self.date,
            court_id,
            timeslots,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/checkout-session", post(create_checkout_session))
        .route("/create_checkout_session", post(create_checkout_session))
}

async fn create_checkout_session(
    State(state): State<AppState>,
    Query(legacy): Query<LegacyCourtQuery>,
    body: Result<Json<CheckoutSessionBody>, JsonRejection>,
) -> Result<Json<CheckoutSessionResponse>, AppError> {
    let Json(body) = body.map_err(|e| {
        tracing::debug!("Rejected checkout body: {}", e);
        AppError::ValidationError("invalid body".to_string())
    })?;

    let redirect = state.checkout.create_session(&body.into_request(legacy.court)).await?;

    Ok(Json(CheckoutSessionResponse { url: redirect.url }))
}
