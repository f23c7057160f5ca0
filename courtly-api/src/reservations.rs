use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courtly_core::reservation::Reservation;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsQuery {
    /// Checkout session id or mock booking id.
    pub payment_ref: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReservationsResponse {
    pub reservations: Vec<Reservation>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reservations", get(list_reservations))
        .route("/reservations/{id}", get(get_reservation))
}

/// Every slot booked under one payment, e.g. the `bookingId` returned by
/// `/process-payment` or the `session_id` passed to `/confirm`.
async fn list_reservations(
    State(state): State<AppState>,
    Query(query): Query<ReservationsQuery>,
) -> Result<Json<ReservationsResponse>, AppError> {
    let payment_ref = query
        .payment_ref
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::ValidationError("missing paymentRef".to_string()))?;

    let reservations = state.reservations.find_by_payment_ref(&payment_ref).await?;
    if reservations.is_empty() {
        return Err(AppError::NotFoundError(format!("no reservations for {}", payment_ref)));
    }

    Ok(Json(ReservationsResponse { reservations }))
}

async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Reservation>, AppError> {
    let not_found = || AppError::NotFoundError(format!("reservation {} not found", id));

    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;
    let reservation = state.reservations.get(id).await?.ok_or_else(not_found)?;

    Ok(Json(reservation))
}
