// --- File: crates/werkstatt_appointments/src/routes.rs ---
use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::auth::{admin_auth_middleware, AdminAuthState};
use crate::handlers::{
    create_appointment_handler, delete_appointment_handler, list_appointments_handler,
    update_status_handler, AppointmentsState,
};

/// Public booking route plus the admin routes behind the bearer check.
pub fn routes(state: Arc<AppointmentsState>, auth: Arc<AdminAuthState>) -> Router {
    let public = Router::new().route("/appointments", post(create_appointment_handler));

    let admin = Router::new()
        .route("/appointments", get(list_appointments_handler))
        .route("/appointments/{id}", delete(delete_appointment_handler))
        .route("/appointments/{id}/status", patch(update_status_handler))
        .route_layer(middleware::from_fn_with_state(auth, admin_auth_middleware));

    public.merge(admin).with_state(state)
}
