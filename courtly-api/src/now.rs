use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Server time as the venue sees it, for client-side slot greying.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NowResponse {
    pub now_unix_ms: i64,
    #[serde(rename = "nowISO")]
    pub now_iso: String,
    pub timezone: String,
    pub utc_offset_minutes: i32,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/now", get(now))
}

async fn now(State(state): State<AppState>) -> Json<NowResponse> {
    let now = state.zone.now(state.clock.as_ref());
    Json(NowResponse {
        now_unix_ms: now.instant.timestamp_millis(),
        now_iso: now.iso,
        timezone: state.zone.name().to_string(),
        utc_offset_minutes: now.utc_offset_minutes,
    })
}
