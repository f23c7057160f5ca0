use axum::{
    http::{header, Method},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod catalog;
pub mod checkout;
pub mod confirm;
pub mod error;
pub mod now;
pub mod payments;
pub mod reservations;
pub mod state;

pub use error::AppError;
pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    // Same routes at the root and under /api for proxied front-ends.
    Router::new()
        .merge(api_routes())
        .nest("/api", api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(catalog::routes())
        .merge(checkout::routes())
        .merge(confirm::routes())
        .merge(payments::routes())
        .merge(now::routes())
        .merge(reservations::routes())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
