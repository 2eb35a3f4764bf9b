// --- File: crates/werkstatt_appointments/src/handlers.rs ---
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use werkstatt_common::models::{AppointmentView, BookingRequest};
use werkstatt_common::{validation_error, WerkstattError};

use crate::admin::AdminQueryService;
use crate::booking::AppointmentService;

// State for the appointment handlers
#[derive(Clone)]
pub struct AppointmentsState {
    pub booking: Arc<AppointmentService>,
    pub admin: Arc<AdminQueryService>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingResponse {
    pub success: bool,
    #[cfg_attr(feature = "openapi", schema(example = "apt_1741593600000_1a2b3c4d"))]
    pub id: String,
    pub gcal_event_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AppointmentListResponse {
    pub success: bool,
    pub events: Vec<AppointmentView>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StatusUpdateRequest {
    #[cfg_attr(feature = "openapi", schema(example = "confirmed"))]
    pub status: Option<String>,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, WerkstattError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| validation_error(rejection.body_text()))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/appointments",
    request_body = BookingRequest,
    responses(
        (status = 200, description = "Appointment booked", body = BookingResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 500, description = "Calendar, storage or mail failure")
    ),
    tag = "Appointments"
))]
pub async fn create_appointment_handler(
    State(state): State<Arc<AppointmentsState>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<BookingResponse>, WerkstattError> {
    let request = json_body(payload)?;
    let outcome = state.booking.create_appointment(request).await?;
    Ok(Json(BookingResponse {
        success: true,
        id: outcome.id,
        gcal_event_id: outcome.gcal_event_id,
    }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/appointments",
    responses(
        (status = 200, description = "Upcoming calendar appointments", body = AppointmentListResponse),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 500, description = "Calendar failure")
    ),
    security(("bearer" = [])),
    tag = "Admin"
))]
pub async fn list_appointments_handler(
    State(state): State<Arc<AppointmentsState>>,
) -> Result<Json<AppointmentListResponse>, WerkstattError> {
    let events = state.admin.list_upcoming().await?;
    Ok(Json(AppointmentListResponse {
        success: true,
        events,
    }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/appointments/{id}",
    params(("id" = String, Path, description = "Remote calendar event id")),
    responses(
        (status = 200, description = "Appointment deleted", body = SuccessResponse),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Calendar or storage failure")
    ),
    security(("bearer" = [])),
    tag = "Admin"
))]
pub async fn delete_appointment_handler(
    State(state): State<Arc<AppointmentsState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, WerkstattError> {
    state.admin.delete_appointment(&id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    patch,
    path = "/appointments/{id}/status",
    params(("id" = String, Path, description = "Remote calendar event id")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status updated", body = SuccessResponse),
        (status = 400, description = "Missing or unknown status"),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Calendar failure")
    ),
    security(("bearer" = [])),
    tag = "Admin"
))]
pub async fn update_status_handler(
    State(state): State<Arc<AppointmentsState>>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, WerkstattError> {
    let request = json_body(payload)?;
    state.admin.set_status(&id, request.status.as_deref()).await?;
    Ok(Json(SuccessResponse { success: true }))
}
