// --- File: crates/werkstatt_gcal/src/service.rs ---
//! Google Calendar implementation of the `CalendarService` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use google_calendar3::api::{Event, EventAttendee, EventDateTime};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use werkstatt_common::models::{Attendee, NewCalendarEvent, RemoteCalendarEvent, ResponseStatus};
use werkstatt_common::services::CalendarService;
use werkstatt_common::WerkstattError;
use werkstatt_config::AppConfig;

use crate::auth::{create_calendar_hub, HubType};

const SERVICE_NAME: &str = "Google Calendar";
const SEND_UPDATES_ALL: &str = "all";

/// Errors that can occur when interacting with Google Calendar.
#[derive(Error, Debug)]
pub enum GcalServiceError {
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_calendar3::Error),
    #[error("Event not found: {0}")]
    NotFound(String),
    #[error("Calendar authentication failed: {0}")]
    AuthError(String),
    #[error("Calendar not configured")]
    NotConfigured,
    #[error("Malformed event from provider: {0}")]
    MalformedEvent(String),
}

impl From<GcalServiceError> for WerkstattError {
    fn from(err: GcalServiceError) -> Self {
        match err {
            GcalServiceError::NotFound(id) => WerkstattError::NotFoundError(format!("event {}", id)),
            GcalServiceError::NotConfigured => {
                WerkstattError::ConfigError("calendar not configured".to_string())
            }
            GcalServiceError::AuthError(message) => WerkstattError::ConfigError(message),
            other => WerkstattError::ExternalServiceError {
                service_name: SERVICE_NAME.to_string(),
                message: other.to_string(),
            },
        }
    }
}

/// True when Google reports the event as missing (404) or already deleted (410).
pub fn is_not_found(err: &google_calendar3::Error) -> bool {
    let code = match err {
        google_calendar3::Error::BadRequest(body) => body["error"]["code"].as_u64(),
        google_calendar3::Error::Failure(response) => Some(u64::from(response.status().as_u16())),
        _ => None,
    };
    matches!(code, Some(404) | Some(410))
}

pub(crate) fn map_api_error(event_id: &str, err: google_calendar3::Error) -> GcalServiceError {
    if is_not_found(&err) {
        GcalServiceError::NotFound(event_id.to_string())
    } else {
        GcalServiceError::ApiError(err)
    }
}

fn format_event_time(time: Option<&EventDateTime>) -> (Option<String>, bool) {
    match time {
        Some(EventDateTime {
            date_time: Some(date_time),
            ..
        }) => (Some(date_time.to_rfc3339()), false),
        Some(EventDateTime { date: Some(date), .. }) => (Some(date.to_string()), true),
        _ => (None, false),
    }
}

/// Reduces a provider event to the fields the backend reads.
pub fn to_remote_event(event: Event) -> Result<RemoteCalendarEvent, GcalServiceError> {
    let id = event
        .id
        .ok_or_else(|| GcalServiceError::MalformedEvent("event without id".to_string()))?;
    let (start, all_day) = format_event_time(event.start.as_ref());
    let (end, _) = format_event_time(event.end.as_ref());

    let attendees = event
        .attendees
        .unwrap_or_default()
        .into_iter()
        .filter_map(|a| {
            let email = a.email?;
            Some(Attendee {
                email,
                response_status: ResponseStatus::from_provider(a.response_status.as_deref()),
            })
        })
        .collect();

    Ok(RemoteCalendarEvent {
        id,
        summary: event.summary,
        description: event.description,
        start,
        end,
        all_day,
        attendees,
    })
}

/// Sets `email`'s response in a provider attendee list, appending the attendee if absent.
///
/// Every other attendee entry is passed through untouched.
pub fn rewrite_attendee_status(
    mut attendees: Vec<EventAttendee>,
    email: &str,
    status: ResponseStatus,
) -> Vec<EventAttendee> {
    let existing = attendees.iter_mut().find(|a| {
        a.email
            .as_deref()
            .is_some_and(|e| e.eq_ignore_ascii_case(email))
    });
    match existing {
        Some(attendee) => attendee.response_status = Some(status.as_str().to_string()),
        None => attendees.push(EventAttendee {
            email: Some(email.to_string()),
            response_status: Some(status.as_str().to_string()),
            ..Default::default()
        }),
    }
    attendees
}

/// Provider event for a new booking.
pub fn build_event(event: NewCalendarEvent) -> Event {
    let attendees: Vec<EventAttendee> = event
        .attendees
        .into_iter()
        .map(|email| EventAttendee {
            email: Some(email),
            ..Default::default()
        })
        .collect();

    Event {
        summary: Some(event.summary),
        description: Some(event.description),
        start: Some(EventDateTime {
            date_time: Some(event.start),
            ..Default::default()
        }),
        end: Some(EventDateTime {
            date_time: Some(event.end),
            ..Default::default()
        }),
        attendees: (!attendees.is_empty()).then_some(attendees),
        ..Default::default()
    }
}

/// Google Calendar service implementation.
pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
    calendar_id: String,
}

impl GoogleCalendarService {
    pub fn new(calendar_hub: Arc<HubType>, calendar_id: impl Into<String>) -> Self {
        Self {
            calendar_hub,
            calendar_id: calendar_id.into(),
        }
    }

    async fn fetch(&self, event_id: &str) -> Result<Event, GcalServiceError> {
        let (_response, event) = self
            .calendar_hub
            .events()
            .get(&self.calendar_id, event_id)
            .doit()
            .await
            .map_err(|e| map_api_error(event_id, e))?;
        Ok(event)
    }
}

#[async_trait]
impl CalendarService for GoogleCalendarService {
    fn is_configured(&self) -> bool {
        true
    }

    async fn insert_event(&self, event: NewCalendarEvent) -> Result<Option<String>, WerkstattError> {
        let (_response, created) = self
            .calendar_hub
            .events()
            .insert(build_event(event), &self.calendar_id)
            .send_updates(SEND_UPDATES_ALL)
            .doit()
            .await
            .map_err(GcalServiceError::from)?;

        info!("Created calendar event {:?}", created.id);
        Ok(created.id)
    }

    async fn list_events(
        &self,
        time_min: DateTime<Utc>,
        max_results: i32,
    ) -> Result<Vec<RemoteCalendarEvent>, WerkstattError> {
        let (_response, events) = self
            .calendar_hub
            .events()
            .list(&self.calendar_id)
            .time_min(time_min)
            .max_results(max_results)
            .single_events(true)
            .order_by("startTime")
            .doit()
            .await
            .map_err(GcalServiceError::from)?;

        let mut result = Vec::new();
        for event in events.items.unwrap_or_default() {
            match to_remote_event(event) {
                Ok(remote) => result.push(remote),
                Err(e) => warn!("Skipping calendar event: {}", e),
            }
        }
        Ok(result)
    }

    async fn get_event(&self, event_id: &str) -> Result<RemoteCalendarEvent, WerkstattError> {
        let event = self.fetch(event_id).await?;
        Ok(to_remote_event(event)?)
    }

    async fn patch_attendee_status(
        &self,
        event_id: &str,
        attendee_email: &str,
        status: ResponseStatus,
    ) -> Result<RemoteCalendarEvent, WerkstattError> {
        let current = self.fetch(event_id).await?;
        let attendees = rewrite_attendee_status(
            current.attendees.unwrap_or_default(),
            attendee_email,
            status,
        );

        let patch = Event {
            attendees: Some(attendees),
            ..Default::default()
        };
        let (_response, patched) = self
            .calendar_hub
            .events()
            .patch(patch, &self.calendar_id, event_id)
            .send_updates(SEND_UPDATES_ALL)
            .doit()
            .await
            .map_err(|e| map_api_error(event_id, e))?;

        info!("Event {}: {} is now {}", event_id, attendee_email, status);
        Ok(to_remote_event(patched)?)
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), WerkstattError> {
        self.calendar_hub
            .events()
            .delete(&self.calendar_id, event_id)
            .send_updates(SEND_UPDATES_ALL)
            .doit()
            .await
            .map_err(|e| map_api_error(event_id, e))?;

        info!("Deleted calendar event {}", event_id);
        Ok(())
    }
}

/// Stand-in when no calendar id is configured. Bookings still work, unsynced.
#[derive(Debug, Default)]
pub struct DisabledCalendarService;

#[async_trait]
impl CalendarService for DisabledCalendarService {
    fn is_configured(&self) -> bool {
        false
    }

    async fn insert_event(&self, _event: NewCalendarEvent) -> Result<Option<String>, WerkstattError> {
        Ok(None)
    }

    async fn list_events(
        &self,
        _time_min: DateTime<Utc>,
        _max_results: i32,
    ) -> Result<Vec<RemoteCalendarEvent>, WerkstattError> {
        Err(GcalServiceError::NotConfigured.into())
    }

    async fn get_event(&self, _event_id: &str) -> Result<RemoteCalendarEvent, WerkstattError> {
        Err(GcalServiceError::NotConfigured.into())
    }

    async fn patch_attendee_status(
        &self,
        _event_id: &str,
        _attendee_email: &str,
        _status: ResponseStatus,
    ) -> Result<RemoteCalendarEvent, WerkstattError> {
        Err(GcalServiceError::NotConfigured.into())
    }

    async fn delete_event(&self, _event_id: &str) -> Result<(), WerkstattError> {
        Err(GcalServiceError::NotConfigured.into())
    }
}

/// Picks the calendar implementation for this deployment.
pub async fn create_calendar_service(
    config: &AppConfig,
) -> Result<Arc<dyn CalendarService>, GcalServiceError> {
    let (Some(calendar_id), Some(gcal)) = (config.calendar_id(), config.gcal.as_ref()) else {
        warn!("No calendar id configured, bookings will not be synced to a calendar");
        return Ok(Arc::new(DisabledCalendarService));
    };

    let hub = create_calendar_hub(gcal).await?;
    info!("Google Calendar sync enabled for {}", calendar_id);
    Ok(Arc::new(GoogleCalendarService::new(Arc::new(hub), calendar_id)))
}
