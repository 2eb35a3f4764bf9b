// --- File: crates/werkstatt_common/src/testing.rs ---
//! In-memory doubles for the service traits. Enabled with the `testing` feature.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::{config_error, delivery_error, external_service_error, not_found, WerkstattError};
use crate::models::{Attendee, NewCalendarEvent, RemoteCalendarEvent, ResponseStatus};
use crate::services::{CalendarService, EmailMessage, NotificationResult, NotificationService};

fn lock_poisoned<T>(_: T) -> WerkstattError {
    WerkstattError::InternalError("mock state lock poisoned".to_string())
}

fn event_start(event: &RemoteCalendarEvent) -> Option<DateTime<Utc>> {
    let start = event.start.as_deref()?;
    if event.all_day {
        NaiveDate::parse_from_str(start, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    } else {
        DateTime::parse_from_rfc3339(start)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Calendar double keeping events in memory.
pub struct InMemoryCalendarService {
    configured: bool,
    events: Mutex<Vec<RemoteCalendarEvent>>,
    next_id: AtomicUsize,
    fail_inserts: AtomicBool,
    fail_deletes: AtomicBool,
}

impl InMemoryCalendarService {
    pub fn new() -> Self {
        Self {
            configured: true,
            events: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            fail_inserts: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
        }
    }

    /// Behaves like a deployment without a calendar id.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn with_events(events: Vec<RemoteCalendarEvent>) -> Self {
        let service = Self::new();
        if let Ok(mut guard) = service.events.lock() {
            *guard = events;
        }
        service
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of every stored event.
    pub fn events(&self) -> Vec<RemoteCalendarEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl Default for InMemoryCalendarService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CalendarService for InMemoryCalendarService {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn insert_event(&self, event: NewCalendarEvent) -> Result<Option<String>, WerkstattError> {
        if !self.configured {
            return Ok(None);
        }
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(external_service_error("Google Calendar", "insert rejected"));
        }

        let id = format!("evt_{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let remote = RemoteCalendarEvent {
            id: id.clone(),
            summary: Some(event.summary),
            description: Some(event.description),
            start: Some(event.start.to_rfc3339()),
            end: Some(event.end.to_rfc3339()),
            all_day: false,
            attendees: event
                .attendees
                .into_iter()
                .map(|email| Attendee {
                    email,
                    response_status: ResponseStatus::NeedsAction,
                })
                .collect(),
        };
        self.events.lock().map_err(lock_poisoned)?.push(remote);
        Ok(Some(id))
    }

    async fn list_events(
        &self,
        time_min: DateTime<Utc>,
        max_results: i32,
    ) -> Result<Vec<RemoteCalendarEvent>, WerkstattError> {
        if !self.configured {
            return Err(config_error("calendar not configured"));
        }
        let mut events: Vec<(DateTime<Utc>, RemoteCalendarEvent)> = self
            .events
            .lock()
            .map_err(lock_poisoned)?
            .iter()
            .filter_map(|e| event_start(e).map(|start| (start, e.clone())))
            .filter(|(start, _)| *start >= time_min)
            .collect();
        events.sort_by_key(|(start, _)| *start);
        Ok(events
            .into_iter()
            .take(usize::try_from(max_results).unwrap_or(0))
            .map(|(_, e)| e)
            .collect())
    }

    async fn get_event(&self, event_id: &str) -> Result<RemoteCalendarEvent, WerkstattError> {
        if !self.configured {
            return Err(config_error("calendar not configured"));
        }
        self.events
            .lock()
            .map_err(lock_poisoned)?
            .iter()
            .find(|e| e.id == event_id)
            .cloned()
            .ok_or_else(|| not_found(format!("event {}", event_id)))
    }

    async fn patch_attendee_status(
        &self,
        event_id: &str,
        attendee_email: &str,
        status: ResponseStatus,
    ) -> Result<RemoteCalendarEvent, WerkstattError> {
        if !self.configured {
            return Err(config_error("calendar not configured"));
        }
        let mut events = self.events.lock().map_err(lock_poisoned)?;
        let event = events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| not_found(format!("event {}", event_id)))?;
        event.set_attendee_status(attendee_email, status);
        Ok(event.clone())
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), WerkstattError> {
        if !self.configured {
            return Err(config_error("calendar not configured"));
        }
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(external_service_error("Google Calendar", "delete rejected"));
        }
        let mut events = self.events.lock().map_err(lock_poisoned)?;
        let before = events.len();
        events.retain(|e| e.id != event_id);
        if events.len() == before {
            return Err(not_found(format!("event {}", event_id)));
        }
        Ok(())
    }
}

/// Mailer double that records every message it accepts.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails with a delivery error.
    pub fn failing() -> Self {
        let mailer = Self::default();
        mailer.fail.store(true, Ordering::SeqCst);
        mailer
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl NotificationService for RecordingMailer {
    async fn send(&self, message: EmailMessage) -> Result<NotificationResult, WerkstattError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(delivery_error(format!("mailbox unavailable for {}", message.to)));
        }
        let mut sent = self.sent.lock().map_err(lock_poisoned)?;
        sent.push(message);
        Ok(NotificationResult {
            id: format!("msg_{}", sent.len()),
            status: "sent".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_event(start: DateTime<Utc>) -> NewCalendarEvent {
        NewCalendarEvent {
            summary: "Werkstatt: Ölwechsel – Max".to_string(),
            description: "Kunde: Max".to_string(),
            start,
            end: start + Duration::hours(1),
            attendees: vec!["werkstatt@example.com".to_string()],
        }
    }

    #[tokio::test]
    async fn test_in_memory_calendar_lifecycle() {
        let calendar = InMemoryCalendarService::new();
        let now = Utc::now();

        let later = calendar.insert_event(new_event(now + Duration::hours(5))).await.unwrap().unwrap();
        let sooner = calendar.insert_event(new_event(now + Duration::hours(1))).await.unwrap().unwrap();

        let listed = calendar.list_events(now, 10).await.unwrap();
        assert_eq!(listed.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(), vec![sooner.as_str(), later.as_str()]);

        calendar.delete_event(&sooner).await.unwrap();
        assert!(matches!(
            calendar.delete_event(&sooner).await,
            Err(WerkstattError::NotFoundError(_))
        ));
        assert_eq!(calendar.list_events(now, 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_calendar_skips_inserts() {
        let calendar = InMemoryCalendarService::unconfigured();
        let id = calendar.insert_event(new_event(Utc::now())).await.unwrap();
        assert!(id.is_none());
        assert!(calendar.events().is_empty());
    }

    #[tokio::test]
    async fn test_recording_mailer() {
        let mailer = RecordingMailer::new();
        let message = EmailMessage {
            to: "kunde@example.com".to_string(),
            subject: "Hallo".to_string(),
            text: "Text".to_string(),
            ics: None,
        };
        mailer.send(message.clone()).await.unwrap();
        assert_eq!(mailer.sent(), vec![message.clone()]);

        let failing = RecordingMailer::failing();
        assert!(matches!(
            failing.send(message).await,
            Err(WerkstattError::DeliveryError(_))
        ));
    }
}
