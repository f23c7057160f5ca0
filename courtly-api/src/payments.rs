use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use courtly_booking::{CardDetails, MockPaymentRequest};
use courtly_core::pii::Masked;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessPaymentRequest {
    pub date: String,
    pub timeslots: Vec<String>,
    pub court_id: String,
    pub amount: i64,
    pub card_number: Masked<String>,
    pub card_name: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: Masked<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessPaymentResponse {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            booking_id: None,
            error: Some(error.into()),
        }
    }
}

impl From<ProcessPaymentRequest> for MockPaymentRequest {
    fn from(req: ProcessPaymentRequest) -> Self {
        MockPaymentRequest {
            date: req.date,
            court_id: req.court_id,
            timeslots: req.timeslots,
            amount: req.amount,
            card: CardDetails {
                number: req.card_number,
                name: req.card_name,
                expiry_month: req.expiry_month,
                expiry_year: req.expiry_year,
                cvv: req.cvv,
            },
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/process-payment", post(process_payment))
        .route("/process_payment", post(process_payment))
}

async fn process_payment(
    State(state): State<AppState>,
    body: Result<Json<ProcessPaymentRequest>, JsonRejection>,
) -> (StatusCode, Json<ProcessPaymentResponse>) {
    let Ok(Json(req)) = body else {
        return (StatusCode::BAD_REQUEST, Json(ProcessPaymentResponse::failed("invalid body")));
    };

    match state.mock_payments.process(&MockPaymentRequest::from(req)).await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(ProcessPaymentResponse {
                success: true,
                booking_id: Some(receipt.booking_id),
                error: None,
            }),
        ),
        Err(err) if err.is_rejection() => {
            (StatusCode::OK, Json(ProcessPaymentResponse::failed(err.to_string())))
        }
        Err(err) => {
            let err = AppError::from(err);
            (err.status(), Json(ProcessPaymentResponse::failed(err.public_message())))
        }
    }
}
