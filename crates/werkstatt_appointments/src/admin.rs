// --- File: crates/werkstatt_appointments/src/admin.rs ---
//! Admin operations on the remote calendar and the local mirror.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use werkstatt_common::models::{AppointmentView, RemoteCalendarEvent, ResponseStatus};
use werkstatt_common::services::CalendarService;
use werkstatt_common::{config_error, validation_error, WerkstattError};
use werkstatt_config::AppConfig;
use werkstatt_gcal::logic::{calendar_overview, CalendarOverview};
use werkstatt_store::AppointmentRepository;

pub const MISSING_PARAMS_MESSAGE: &str = "Fehlende Parameter";

/// How far back the admin list reaches.
pub const LIST_LOOKBACK_HOURS: i64 = 24;
pub const LIST_MAX_RESULTS: i32 = 100;

pub struct AdminQueryService {
    config: Arc<AppConfig>,
    calendar: Arc<dyn CalendarService>,
    repository: Arc<dyn AppointmentRepository>,
}

impl AdminQueryService {
    pub fn new(
        config: Arc<AppConfig>,
        calendar: Arc<dyn CalendarService>,
        repository: Arc<dyn AppointmentRepository>,
    ) -> Self {
        Self {
            config,
            calendar,
            repository,
        }
    }

    pub async fn list_upcoming(&self) -> Result<Vec<AppointmentView>, WerkstattError> {
        self.list_upcoming_at(Utc::now()).await
    }

    /// Events from `now - 24h` on, with the shop's own response as status.
    pub async fn list_upcoming_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<AppointmentView>, WerkstattError> {
        let time_min = now - Duration::hours(LIST_LOOKBACK_HOURS);
        let events = self.calendar.list_events(time_min, LIST_MAX_RESULTS).await?;
        let shop_email = self.config.shop_email();
        Ok(events
            .into_iter()
            .map(|event| AppointmentView::from_event(event, shop_email))
            .collect())
    }

    pub async fn calendar_overview(&self) -> Result<CalendarOverview, WerkstattError> {
        calendar_overview(self.calendar.as_ref(), Utc::now()).await
    }

    /// Deletes the remote event, then every local record linked to it.
    ///
    /// Returns the number of local records removed. A failed remote delete
    /// leaves the local file untouched.
    pub async fn delete_appointment(&self, event_id: &str) -> Result<usize, WerkstattError> {
        let event_id = event_id.trim();
        if event_id.is_empty() {
            return Err(validation_error(MISSING_PARAMS_MESSAGE));
        }

        self.calendar.delete_event(event_id).await?;
        let removed = self.repository.remove_by_remote_event_id(event_id).await?;
        info!("Deleted event {} ({} local records)", event_id, removed);
        Ok(removed)
    }

    /// Sets the shop's attendee response on `event_id`.
    ///
    /// `status` may use either vocabulary (`confirmed` or `accepted`, ...).
    /// The local mirror is updated afterwards; a failure there is only logged.
    pub async fn set_status(
        &self,
        event_id: &str,
        status: Option<&str>,
    ) -> Result<RemoteCalendarEvent, WerkstattError> {
        let event_id = event_id.trim();
        let status = status.map(str::trim).filter(|s| !s.is_empty());
        let (false, Some(raw_status)) = (event_id.is_empty(), status) else {
            return Err(validation_error(MISSING_PARAMS_MESSAGE));
        };
        let status = ResponseStatus::parse_any(raw_status)
            .ok_or_else(|| validation_error(format!("Unbekannter Status: {}", raw_status)))?;
        let shop_email = self
            .config
            .shop_email()
            .ok_or_else(|| config_error("shop.email is required to set the attendee status"))?;

        let event = self
            .calendar
            .patch_attendee_status(event_id, shop_email, status)
            .await?;

        match self
            .repository
            .update_status_by_remote_event_id(event_id, status.into())
            .await
        {
            Ok(updated) => info!("Event {} set to {} ({} local records)", event_id, status, updated),
            Err(e) => warn!("Event {} set to {}, local mirror not updated: {}", event_id, status, e),
        }
        Ok(event)
    }
}
