use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/record", post(handlers::record_form))
        .route("/api/today", get(handlers::get_today))
        .route("/api/widget", get(handlers::get_widget))
        .route("/api/record", post(handlers::record))
        .with_state(state)
}
