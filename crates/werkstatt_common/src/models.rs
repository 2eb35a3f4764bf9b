// --- File: crates/werkstatt_common/src/models.rs ---

// Data shared between the booking flow, the admin queries, the calendar gateway
// and the reminder job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_SUMMARY: &str = "Unbenannter Termin";
pub const DEFAULT_DESCRIPTION: &str = "-";

/// Local status of an appointment record.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    Declined,
    Tentative,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Declined => "declined",
            AppointmentStatus::Tentative => "tentative",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attendee response as the calendar provider spells it.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ResponseStatus {
    Accepted,
    Declined,
    Tentative,
    #[default]
    #[serde(other)]
    NeedsAction,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Accepted => "accepted",
            ResponseStatus::Declined => "declined",
            ResponseStatus::Tentative => "tentative",
            ResponseStatus::NeedsAction => "needsAction",
        }
    }

    /// Reads a provider value. Anything unknown or missing counts as `needsAction`.
    pub fn from_provider(value: Option<&str>) -> Self {
        match value {
            Some("accepted") => ResponseStatus::Accepted,
            Some("declined") => ResponseStatus::Declined,
            Some("tentative") => ResponseStatus::Tentative,
            _ => ResponseStatus::NeedsAction,
        }
    }

    /// Parses a status from either the local or the provider vocabulary.
    ///
    /// `confirmed` and `accepted` both mean accepted, `pending` and `needsAction`
    /// both mean no answer yet. Matching ignores ASCII case.
    pub fn parse_any(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "confirmed" | "accepted" => Some(ResponseStatus::Accepted),
            "declined" => Some(ResponseStatus::Declined),
            "tentative" => Some(ResponseStatus::Tentative),
            "pending" | "needsaction" => Some(ResponseStatus::NeedsAction),
            _ => None,
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ResponseStatus> for AppointmentStatus {
    fn from(status: ResponseStatus) -> Self {
        match status {
            ResponseStatus::Accepted => AppointmentStatus::Confirmed,
            ResponseStatus::Declined => AppointmentStatus::Declined,
            ResponseStatus::Tentative => AppointmentStatus::Tentative,
            ResponseStatus::NeedsAction => AppointmentStatus::Pending,
        }
    }
}

impl From<AppointmentStatus> for ResponseStatus {
    fn from(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Confirmed => ResponseStatus::Accepted,
            AppointmentStatus::Declined => ResponseStatus::Declined,
            AppointmentStatus::Tentative => ResponseStatus::Tentative,
            AppointmentStatus::Pending => ResponseStatus::NeedsAction,
        }
    }
}

/// Local mirror record of one booking request, as stored in the JSON file.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    #[serde(default)]
    pub status: AppointmentStatus,
    /// Id of the remote calendar event, `None` when the calendar sync was skipped.
    #[serde(rename = "gcal_event_id", alias = "remote_event_id", default)]
    pub remote_event_id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub start_iso: String,
    pub end_iso: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Incoming booking request. Every field is optional here so missing ones can
/// be reported together instead of failing on the first.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub notes: Option<String>,
    pub start_iso: Option<String>,
    pub end_iso: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
    #[serde(rename = "responseStatus", default)]
    pub response_status: ResponseStatus,
}

/// Provider-owned calendar event, reduced to what the backend reads.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteCalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    /// RFC 3339 timestamp, or `YYYY-MM-DD` for all-day events.
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
}

impl RemoteCalendarEvent {
    /// Response of the attendee matching `email` (case-insensitive).
    pub fn attendee_status(&self, email: &str) -> ResponseStatus {
        self.attendees
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .map(|a| a.response_status)
            .unwrap_or_default()
    }

    /// Sets the response of the attendee matching `email`, appending the attendee if absent.
    pub fn set_attendee_status(&mut self, email: &str, status: ResponseStatus) {
        match self
            .attendees
            .iter_mut()
            .find(|a| a.email.eq_ignore_ascii_case(email))
        {
            Some(attendee) => attendee.response_status = status,
            None => self.attendees.push(Attendee {
                email: email.to_string(),
                response_status: status,
            }),
        }
    }
}

/// Event to create in the remote calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCalendarEvent {
    pub summary: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub attendees: Vec<String>,
}

/// Flattened event for the admin list.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentView {
    pub id: String,
    pub summary: String,
    pub description: String,
    pub start_iso: Option<String>,
    pub end_iso: Option<String>,
    pub attendees: Vec<Attendee>,
    pub status: ResponseStatus,
}

impl AppointmentView {
    /// Builds the admin view; `status` is the shop's own response on the event.
    pub fn from_event(event: RemoteCalendarEvent, shop_email: Option<&str>) -> Self {
        let status = shop_email
            .map(|email| event.attendee_status(email))
            .unwrap_or_default();
        Self {
            id: event.id,
            summary: event
                .summary
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
            description: event
                .description
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            start_iso: event.start,
            end_iso: event.end,
            attendees: event.attendees,
            status,
        }
    }
}

/// Time range already taken by a timed calendar event.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedSlot {
    pub start: String,
    pub end: String,
}
