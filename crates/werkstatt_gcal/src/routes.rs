// --- File: crates/werkstatt_gcal/src/routes.rs ---

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::handlers::{get_calendar_events_handler, GcalState};

/// Calendar routes, nested under `/api` by the backend.
pub fn routes(state: Arc<GcalState>) -> Router {
    Router::new()
        .route("/calendar/events", get(get_calendar_events_handler))
        .with_state(state)
}
