// File: crates/werkstatt_gcal/src/handlers.rs
use axum::{extract::State, response::Json};
use chrono::Utc;
use std::sync::Arc;
use werkstatt_common::services::CalendarService;
use werkstatt_common::WerkstattError;

use crate::logic::{calendar_overview, CalendarOverview};

// Shared state needed by the calendar handlers
#[derive(Clone)]
pub struct GcalState {
    pub calendar: Arc<dyn CalendarService>,
}

/// Upcoming calendar events and the time slots they block.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/calendar/events",
    responses(
        (status = 200, description = "Upcoming events and blocked slots", body = CalendarOverview),
        (status = 500, description = "Calendar not configured or provider error")
    ),
    tag = "Calendar"
))]
pub async fn get_calendar_events_handler(
    State(state): State<Arc<GcalState>>,
) -> Result<Json<CalendarOverview>, WerkstattError> {
    let overview = calendar_overview(state.calendar.as_ref(), Utc::now()).await?;
    Ok(Json(overview))
}
