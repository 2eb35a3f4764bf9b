// File: crates/werkstatt_gcal/src/doc.rs
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::CalendarOverview;
use werkstatt_common::models::{Attendee, BlockedSlot, RemoteCalendarEvent, ResponseStatus};

#[derive(OpenApi)]
#[openapi(
    paths(crate::handlers::get_calendar_events_handler),
    components(schemas(CalendarOverview, RemoteCalendarEvent, Attendee, ResponseStatus, BlockedSlot)),
    tags(
        (name = "Calendar", description = "Google Calendar events and blocked slots")
    ),
    servers(
        (url = "/api", description = "Werkstatt API server")
    )
)]
pub struct GcalApiDoc;
