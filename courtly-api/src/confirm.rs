use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmQuery {
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfirmResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConfirmResponse {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/confirm", get(confirm))
}

/// Commits the reservations paid for by a checkout session. Conflicts and
/// cutoff violations are ordinary outcomes and answer 200 with `ok: false`.
async fn confirm(
    State(state): State<AppState>,
    Query(query): Query<ConfirmQuery>,
) -> (StatusCode, Json<ConfirmResponse>) {
    let session_id = query.session_id.unwrap_or_default();
    if session_id.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, Json(ConfirmResponse::failed("missing session_id")));
    }

    match state.committer.confirm_session(&session_id).await {
        Ok(_) => (StatusCode::OK, Json(ConfirmResponse { ok: true, error: None })),
        Err(err) if err.is_rejection() => (StatusCode::OK, Json(ConfirmResponse::failed(err.to_string()))),
        Err(err) => {
            let err = AppError::from(err);
            (err.status(), Json(ConfirmResponse::failed(err.public_message())))
        }
    }
}
