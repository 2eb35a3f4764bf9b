// --- File: crates/werkstatt_common/src/routes.rs ---

use axum::{routing::get, Router};

use crate::handlers::liveness_handler;

/// Routes shared by every deployment, mounted at the root.
pub fn routes() -> Router {
    Router::new().route("/", get(liveness_handler))
}
