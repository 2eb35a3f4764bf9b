// --- File: crates/werkstatt_appointments/src/reminder.rs ---
//! Reminder sweep over the local appointment file.
//!
//! Meant to run from a scheduler (cron, systemd timer). Nothing records that a
//! reminder went out, so two runs inside the same window both send one.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use werkstatt_common::models::Appointment;
use werkstatt_common::services::{EmailMessage, NotificationService};
use werkstatt_common::time::parse_iso_datetime;
use werkstatt_common::WerkstattError;
use werkstatt_config::AppConfig;
use werkstatt_store::AppointmentRepository;

pub const REMINDER_SUBJECT: &str = "Erinnerung an Ihren Werkstatttermin";
const DEFAULT_SERVICE_LABEL: &str = "Werkstatt-Service";
const REMINDER_TIME_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Counts from one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReminderReport {
    pub checked: usize,
    pub sent: usize,
    pub failed: usize,
    /// Records whose start time could not be parsed
    pub skipped: usize,
}

/// True when `hours_until_start` lies strictly inside `hours_before ± window_hours`.
pub fn is_due(hours_until_start: f64, hours_before: f64, window_hours: f64) -> bool {
    hours_until_start > hours_before - window_hours && hours_until_start < hours_before + window_hours
}

pub fn hours_until(start: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (start - now).num_milliseconds() as f64 / 3_600_000.0
}

pub fn reminder_text(appointment: &Appointment, start: DateTime<Utc>, tz: Tz, shop_name: &str) -> String {
    format!(
        "Hallo {},\n\nErinnerung an Ihren Werkstatttermin:\n📅 {}\n🔧 {}\n\nFalls Sie verhindert sind, geben Sie uns bitte kurz Bescheid.\n\nViele Grüße\n{}",
        appointment.name,
        start.with_timezone(&tz).format(REMINDER_TIME_FORMAT),
        appointment.service.as_deref().unwrap_or(DEFAULT_SERVICE_LABEL),
        shop_name
    )
}

pub struct ReminderSweeper {
    config: Arc<AppConfig>,
    repository: Arc<dyn AppointmentRepository>,
    mailer: Arc<dyn NotificationService>,
}

impl ReminderSweeper {
    pub fn new(
        config: Arc<AppConfig>,
        repository: Arc<dyn AppointmentRepository>,
        mailer: Arc<dyn NotificationService>,
    ) -> Self {
        Self {
            config,
            repository,
            mailer,
        }
    }

    pub async fn run(&self) -> Result<ReminderReport, WerkstattError> {
        self.run_at(Utc::now()).await
    }

    /// Sends a reminder for every appointment due at `now`. A failed send is
    /// counted and the sweep goes on.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<ReminderReport, WerkstattError> {
        let appointments = self.repository.find_all().await?;
        let tz = self.config.time_zone();
        let reminder = &self.config.reminder;
        let mut report = ReminderReport::default();

        for appointment in &appointments {
            report.checked += 1;
            let Some(start) = parse_iso_datetime(&appointment.start_iso, tz) else {
                warn!(
                    "Appointment {}: cannot parse start '{}'",
                    appointment.id, appointment.start_iso
                );
                report.skipped += 1;
                continue;
            };

            if !is_due(hours_until(start, now), reminder.hours_before, reminder.window_hours) {
                continue;
            }

            let message = EmailMessage {
                to: appointment.email.clone(),
                subject: REMINDER_SUBJECT.to_string(),
                text: reminder_text(appointment, start, tz, &self.config.shop.name),
                ics: None,
            };
            match self.mailer.send(message).await {
                Ok(_) => {
                    info!("Reminder sent to {} for {}", appointment.email, appointment.id);
                    report.sent += 1;
                }
                Err(e) => {
                    error!("Reminder for {} failed: {}", appointment.id, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "Reminder sweep done: {} checked, {} sent, {} failed, {} skipped",
            report.checked, report.sent, report.failed, report.skipped
        );
        Ok(report)
    }
}
