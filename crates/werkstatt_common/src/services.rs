// --- File: crates/werkstatt_common/src/services.rs ---
//! Service abstractions for external services.
//!
//! The booking flow, the admin queries and the reminder job only see these
//! traits, so tests can swap in the doubles from [`crate::testing`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WerkstattError;
use crate::models::{NewCalendarEvent, RemoteCalendarEvent, ResponseStatus};

/// Operations on the shop's remote calendar.
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Whether a target calendar is configured at all.
    fn is_configured(&self) -> bool;

    /// Creates an event and notifies all attendees.
    ///
    /// Returns `None` without calling the provider when no calendar is configured.
    async fn insert_event(&self, event: NewCalendarEvent) -> Result<Option<String>, WerkstattError>;

    /// Single (expanded) events starting at or after `time_min`, ordered by start time.
    async fn list_events(
        &self,
        time_min: DateTime<Utc>,
        max_results: i32,
    ) -> Result<Vec<RemoteCalendarEvent>, WerkstattError>;

    /// Fetches one event. `NotFoundError` if the provider reports it missing.
    async fn get_event(&self, event_id: &str) -> Result<RemoteCalendarEvent, WerkstattError>;

    /// Read-modify-write of the attendee list, setting `attendee_email`'s response.
    ///
    /// The attendee is appended when absent. There is no guard against concurrent
    /// patches of the same event; the last write wins.
    async fn patch_attendee_status(
        &self,
        event_id: &str,
        attendee_email: &str,
        status: ResponseStatus,
    ) -> Result<RemoteCalendarEvent, WerkstattError>;

    /// Deletes an event and notifies attendees. `NotFoundError` if already gone.
    async fn delete_event(&self, event_id: &str) -> Result<(), WerkstattError>;
}

/// An outgoing mail, optionally carrying a calendar invite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    /// ICS document, attached as `termin.ics`.
    pub ics: Option<String>,
}

/// Represents the result of a notification operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationResult {
    /// Provider message id, if the provider returns one.
    pub id: String,
    pub status: String,
}

/// A trait for notification service operations.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Sends one mail. Failures are `DeliveryError` with the provider's message.
    async fn send(&self, message: EmailMessage) -> Result<NotificationResult, WerkstattError>;
}
