// --- File: crates/werkstatt_appointments/src/booking.rs ---
//! Booking flow: validate, sync to the calendar, persist, confirm by mail.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;
use werkstatt_common::models::{Appointment, AppointmentStatus, BookingRequest, NewCalendarEvent};
use werkstatt_common::services::{CalendarService, EmailMessage, NotificationService};
use werkstatt_common::time::parse_iso_datetime;
use werkstatt_common::{validation_error, WerkstattError};
use werkstatt_config::AppConfig;
use werkstatt_mail::{build_ics, IcsInvite};
use werkstatt_store::AppointmentRepository;

pub const MISSING_FIELDS_MESSAGE: &str = "Pflichtfelder fehlen";
pub const CONFIRMATION_SUBJECT: &str = "Termin-Anfrage erhalten";
pub const SHOP_NOTIFICATION_SUBJECT: &str = "Neue Termin-Anfrage";
const DEFAULT_SERVICE_LABEL: &str = "Service";
const EMPTY_FIELD: &str = "-";

/// Result of a successful booking.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingOutcome {
    /// Local appointment id
    pub id: String,
    /// Remote calendar event id, `None` when the calendar sync was skipped
    pub gcal_event_id: Option<String>,
}

/// A booking request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBooking {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub notes: Option<String>,
    pub start_iso: String,
    pub end_iso: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

fn required(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Checks required fields and the time range. Local times are read in `tz`.
pub fn validate_booking(request: BookingRequest, tz: Tz) -> Result<ValidatedBooking, WerkstattError> {
    let name = required(&request.name);
    let email = required(&request.email);
    let start_iso = required(&request.start_iso);
    let end_iso = required(&request.end_iso);

    let missing: Vec<&str> = [
        ("name", name.is_none()),
        ("email", email.is_none()),
        ("start_iso", start_iso.is_none()),
        ("end_iso", end_iso.is_none()),
    ]
    .into_iter()
    .filter_map(|(field, absent)| absent.then_some(field))
    .collect();

    let (Some(name), Some(email), Some(start_iso), Some(end_iso)) = (name, email, start_iso, end_iso)
    else {
        return Err(validation_error(format!(
            "{}: {}",
            MISSING_FIELDS_MESSAGE,
            missing.join(", ")
        )));
    };

    let start = parse_iso_datetime(&start_iso, tz)
        .ok_or_else(|| validation_error(format!("Ungültiges Datum in start_iso: {}", start_iso)))?;
    let end = parse_iso_datetime(&end_iso, tz)
        .ok_or_else(|| validation_error(format!("Ungültiges Datum in end_iso: {}", end_iso)))?;
    if start >= end {
        return Err(validation_error("start_iso muss vor end_iso liegen"));
    }

    Ok(ValidatedBooking {
        name,
        email,
        phone: optional(request.phone),
        service: optional(request.service),
        notes: optional(request.notes),
        start_iso,
        end_iso,
        start,
        end,
    })
}

pub fn event_summary(shop_name: &str, booking: &ValidatedBooking) -> String {
    format!(
        "{}: {} – {}",
        shop_name,
        booking.service.as_deref().unwrap_or(DEFAULT_SERVICE_LABEL),
        booking.name
    )
}

pub fn event_description(booking: &ValidatedBooking) -> String {
    format!(
        "Kunde: {}\nE-Mail: {}\nTelefon: {}\n\nNotizen: {}",
        booking.name,
        booking.email,
        booking.phone.as_deref().unwrap_or(EMPTY_FIELD),
        booking.notes.as_deref().unwrap_or(EMPTY_FIELD)
    )
}

pub fn confirmation_text(booking: &ValidatedBooking, shop_name: &str) -> String {
    format!(
        "Hallo {},\n\nvielen Dank für Ihre Anfrage.\nIhr Terminwunsch: {}\n\nWir melden uns zur Bestätigung.\n\nViele Grüße\n{}",
        booking.name, booking.start_iso, shop_name
    )
}

fn shop_notification_text(booking: &ValidatedBooking, description: &str) -> String {
    format!(
        "Neue Termin-Anfrage\n\nBeginn: {}\nEnde: {}\n\n{}",
        booking.start_iso, booking.end_iso, description
    )
}

/// `apt_<unix millis>_<8 hex chars>`
pub fn new_appointment_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("apt_{}_{}", now.timestamp_millis(), &suffix[..8])
}

/// Handles public booking requests.
pub struct AppointmentService {
    config: Arc<AppConfig>,
    calendar: Arc<dyn CalendarService>,
    repository: Arc<dyn AppointmentRepository>,
    mailer: Arc<dyn NotificationService>,
}

impl AppointmentService {
    pub fn new(
        config: Arc<AppConfig>,
        calendar: Arc<dyn CalendarService>,
        repository: Arc<dyn AppointmentRepository>,
        mailer: Arc<dyn NotificationService>,
    ) -> Self {
        Self {
            config,
            calendar,
            repository,
            mailer,
        }
    }

    /// Books an appointment.
    ///
    /// Steps run in order and are not rolled back: calendar insert, local
    /// record, customer confirmation, optional shop notification.
    pub async fn create_appointment(
        &self,
        request: BookingRequest,
    ) -> Result<BookingOutcome, WerkstattError> {
        let booking = validate_booking(request, self.config.time_zone())?;
        let now = Utc::now();
        let id = new_appointment_id(now);
        let shop_name = self.config.shop.name.as_str();
        let shop_email = self.config.shop_email();

        let summary = event_summary(shop_name, &booking);
        let description = event_description(&booking);

        let gcal_event_id = self
            .calendar
            .insert_event(NewCalendarEvent {
                summary: summary.clone(),
                description: description.clone(),
                start: booking.start,
                end: booking.end,
                attendees: shop_email.map(str::to_string).into_iter().collect(),
            })
            .await?;
        if gcal_event_id.is_none() {
            warn!("Appointment {} not synced to a calendar", id);
        }

        self.repository
            .append(Appointment {
                id: id.clone(),
                status: AppointmentStatus::Pending,
                remote_event_id: gcal_event_id.clone(),
                name: booking.name.clone(),
                email: booking.email.clone(),
                phone: booking.phone.clone(),
                service: booking.service.clone(),
                notes: booking.notes.clone(),
                start_iso: booking.start_iso.clone(),
                end_iso: booking.end_iso.clone(),
                created_at: Some(now),
            })
            .await?;
        info!("Appointment {} stored (event {:?})", id, gcal_event_id);

        let ics = build_ics(&IcsInvite {
            uid: id.clone(),
            summary,
            description: description.clone(),
            start: booking.start,
            end: booking.end,
            organizer_name: shop_name.to_string(),
            organizer_email: shop_email.map(str::to_string),
        });
        self.deliver(EmailMessage {
            to: booking.email.clone(),
            subject: CONFIRMATION_SUBJECT.to_string(),
            text: confirmation_text(&booking, shop_name),
            ics: Some(ics),
        })
        .await?;

        if self.config.mail.notify_shop_on_booking {
            match shop_email {
                Some(shop_email) => {
                    self.deliver(EmailMessage {
                        to: shop_email.to_string(),
                        subject: SHOP_NOTIFICATION_SUBJECT.to_string(),
                        text: shop_notification_text(&booking, &description),
                        ics: None,
                    })
                    .await?
                }
                None => warn!("notify_shop_on_booking is set but shop.email is empty"),
            }
        }

        Ok(BookingOutcome { id, gcal_event_id })
    }

    async fn deliver(&self, message: EmailMessage) -> Result<(), WerkstattError> {
        let to = message.to.clone();
        match self.mailer.send(message).await {
            Ok(_) => Ok(()),
            Err(e) if self.config.mail.fail_request_on_delivery_error => Err(e),
            Err(e) => {
                error!("Mail to {} failed, booking kept: {}", to, e);
                Ok(())
            }
        }
    }
}
