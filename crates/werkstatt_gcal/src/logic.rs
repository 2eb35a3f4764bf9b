// --- File: crates/werkstatt_gcal/src/logic.rs ---
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use werkstatt_common::models::{BlockedSlot, RemoteCalendarEvent};
use werkstatt_common::services::CalendarService;
use werkstatt_common::WerkstattError;

/// Upcoming events shown to the booking UI.
pub const OVERVIEW_MAX_RESULTS: i32 = 50;

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarOverview {
    pub success: bool,
    pub events: Vec<RemoteCalendarEvent>,
    pub blocked_slots: Vec<BlockedSlot>,
}

/// Start/end of every timed event. All-day events and events without both
/// bounds do not block anything.
pub fn blocked_slots(events: &[RemoteCalendarEvent]) -> Vec<BlockedSlot> {
    events
        .iter()
        .filter(|e| !e.all_day)
        .filter_map(|e| match (&e.start, &e.end) {
            (Some(start), Some(end)) => Some(BlockedSlot {
                start: start.clone(),
                end: end.clone(),
            }),
            _ => None,
        })
        .collect()
}

/// Events from `now` on plus the slots they block.
pub async fn calendar_overview(
    calendar: &dyn CalendarService,
    now: DateTime<Utc>,
) -> Result<CalendarOverview, WerkstattError> {
    let events = calendar.list_events(now, OVERVIEW_MAX_RESULTS).await?;
    let blocked_slots = blocked_slots(&events);
    Ok(CalendarOverview {
        success: true,
        events,
        blocked_slots,
    })
}
