use async_trait::async_trait;
use mockall::mock;
use std::sync::Arc;
use werkstatt_common::models::{Appointment, AppointmentStatus, BookingRequest};
use werkstatt_common::services::{EmailMessage, NotificationResult, NotificationService};
use werkstatt_common::WerkstattError;
use werkstatt_config::AppConfig;

pub const SHOP_EMAIL: &str = "werkstatt@example.com";
pub const SHOP_NAME: &str = "Autohaus Müller";

mock! {
    pub Mailer {}

    #[async_trait]
    impl NotificationService for Mailer {
        async fn send(&self, message: EmailMessage) -> Result<NotificationResult, WerkstattError>;
    }
}

pub fn config() -> AppConfig {
    let mut config = AppConfig::default();
    config.shop.name = SHOP_NAME.to_string();
    config.shop.email = SHOP_EMAIL.to_string();
    config
}

pub fn shared(config: AppConfig) -> Arc<AppConfig> {
    Arc::new(config)
}

pub fn booking_request() -> BookingRequest {
    BookingRequest {
        name: Some("Max Mustermann".to_string()),
        email: Some("max@example.com".to_string()),
        phone: Some("0151 2345678".to_string()),
        service: Some("Ölwechsel".to_string()),
        notes: None,
        start_iso: Some("2030-03-10T09:00:00+01:00".to_string()),
        end_iso: Some("2030-03-10T10:00:00+01:00".to_string()),
    }
}

pub fn appointment(id: &str, remote: Option<&str>, start_iso: &str) -> Appointment {
    Appointment {
        id: id.to_string(),
        status: AppointmentStatus::Pending,
        remote_event_id: remote.map(str::to_string),
        name: "Erika Musterfrau".to_string(),
        email: "erika@example.com".to_string(),
        phone: None,
        service: Some("Inspektion".to_string()),
        notes: None,
        start_iso: start_iso.to_string(),
        end_iso: start_iso.to_string(),
        created_at: None,
    }
}

pub fn sent_ok() -> Result<NotificationResult, WerkstattError> {
    Ok(NotificationResult {
        id: "msg_1".to_string(),
        status: "sent".to_string(),
    })
}
