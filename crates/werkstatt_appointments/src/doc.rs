// --- File: crates/werkstatt_appointments/src/doc.rs ---
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::{
    AppointmentListResponse, BookingResponse, StatusUpdateRequest, SuccessResponse,
};
use werkstatt_common::models::{Attendee, AppointmentView, BookingRequest, ResponseStatus};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::create_appointment_handler,
        crate::handlers::list_appointments_handler,
        crate::handlers::delete_appointment_handler,
        crate::handlers::update_status_handler,
    ),
    components(schemas(
        BookingRequest,
        BookingResponse,
        AppointmentListResponse,
        AppointmentView,
        Attendee,
        ResponseStatus,
        StatusUpdateRequest,
        SuccessResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Appointments", description = "Public booking"),
        (name = "Admin", description = "Appointment administration")
    ),
    servers(
        (url = "/api", description = "Werkstatt API server")
    )
)]
pub struct AppointmentsApiDoc;
