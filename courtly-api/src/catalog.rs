use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use courtly_core::catalog::{generate_timeslots, parse_timeslot_csv, Court, Timeslot};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct TimeslotsResponse {
    pub timeslots: Vec<Timeslot>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CourtsQuery {
    pub date: Option<String>,
    pub timeslots: Option<String>,
    /// Older front-ends send a single slot under this name.
    pub timeslot: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtSummary {
    pub id: String,
    pub name: String,
}

impl From<Court> for CourtSummary {
    fn from(court: Court) -> Self {
        Self {
            id: court.id,
            name: court.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CourtsResponse {
    pub courts: Vec<CourtSummary>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/timeslots", get(list_timeslots))
        .route("/courts", get(list_courts))
}

async fn list_timeslots() -> Json<TimeslotsResponse> {
    Json(TimeslotsResponse {
        timeslots: generate_timeslots(),
    })
}

async fn list_courts(
    State(state): State<AppState>,
    Query(query): Query<CourtsQuery>,
) -> Result<Json<CourtsResponse>, AppError> {
    let date = query.date.unwrap_or_default();
    let csv = query.timeslots.or(query.timeslot).unwrap_or_default();
    let timeslots = parse_timeslot_csv(&csv);

    let listing = state.availability.list_courts(&date, &timeslots).await?;

    Ok(Json(CourtsResponse {
        courts: listing.into_courts().into_iter().map(CourtSummary::from).collect(),
    }))
}
