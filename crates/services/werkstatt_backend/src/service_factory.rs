// --- File: crates/services/werkstatt_backend/src/service_factory.rs ---
//! Builds the external services once at start-up.

use std::sync::Arc;
use tracing::info;
use werkstatt_common::services::{CalendarService, NotificationService};
use werkstatt_common::WerkstattError;
use werkstatt_config::AppConfig;
use werkstatt_gcal::create_calendar_service;
use werkstatt_mail::create_mailer;
use werkstatt_store::{AppointmentRepository, RepositoryFactory};

/// Holds the calendar, store and mailer implementations chosen by the configuration.
#[derive(Clone)]
pub struct WerkstattServiceFactory {
    config: Arc<AppConfig>,
    calendar: Arc<dyn CalendarService>,
    repository: Arc<dyn AppointmentRepository>,
    mailer: Arc<dyn NotificationService>,
}

impl WerkstattServiceFactory {
    /// Initializes every service for the HTTP server.
    pub async fn new(config: Arc<AppConfig>) -> Result<Self, WerkstattError> {
        info!("Initializing services...");
        let calendar = create_calendar_service(&config).await?;
        let repository = RepositoryFactory::new().from_app_config(&config).await?;
        let mailer = create_mailer(&config, config.mail.transport)?;
        Ok(Self::from_parts(config, calendar, repository, mailer))
    }

    /// Assembles a factory from ready-made services.
    pub fn from_parts(
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

    pub fn config(&self) -> Arc<AppConfig> {
        self.config.clone()
    }

    pub fn calendar(&self) -> Arc<dyn CalendarService> {
        self.calendar.clone()
    }

    pub fn repository(&self) -> Arc<dyn AppointmentRepository> {
        self.repository.clone()
    }

    pub fn mailer(&self) -> Arc<dyn NotificationService> {
        self.mailer.clone()
    }
}
