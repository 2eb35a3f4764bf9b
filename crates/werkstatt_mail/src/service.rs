use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};
use werkstatt_common::services::{EmailMessage, NotificationResult, NotificationService};
use werkstatt_common::{config_error, WerkstattError};
use werkstatt_config::{AppConfig, MailTransport, ShopConfig};

use crate::error::MailError;
use crate::resend::ResendMailer;
use crate::smtp::SmtpMailer;

/// Used when `mail.transport = "disabled"`. Every send fails.
#[derive(Debug, Default)]
pub struct DisabledMailer;

#[async_trait]
impl NotificationService for DisabledMailer {
    async fn send(&self, message: EmailMessage) -> Result<NotificationResult, WerkstattError> {
        warn!("Mail transport disabled, not sending '{}' to {}", message.subject, message.to);
        Err(config_error("mail transport disabled"))
    }
}

/// `"<shop name> <shop email>"`, the sender of every mail.
pub fn sender_address(shop: &ShopConfig) -> Result<String, MailError> {
    let email = shop.email.trim();
    if email.is_empty() {
        return Err(MailError::Config("shop.email is required to send mail".to_string()));
    }
    Ok(format!("{} <{}>", shop.name.trim(), email))
}

/// Builds the mailer for `transport`. The server passes `mail.transport`, the
/// reminder job `AppConfig::reminder_transport()`.
pub fn create_mailer(
    config: &AppConfig,
    transport: MailTransport,
) -> Result<Arc<dyn NotificationService>, MailError> {
    match transport {
        MailTransport::Disabled => {
            warn!("Mail delivery is disabled");
            Ok(Arc::new(DisabledMailer))
        }
        MailTransport::Resend => {
            let resend = config
                .mail
                .resend
                .as_ref()
                .ok_or_else(|| MailError::Config("mail.resend section missing".to_string()))?;
            let mailer = ResendMailer::new(resend, sender_address(&config.shop)?)?;
            info!("Mail delivery via Resend ({})", resend.api_url);
            Ok(Arc::new(mailer))
        }
        MailTransport::Smtp => {
            let smtp = config
                .mail
                .smtp
                .as_ref()
                .ok_or_else(|| MailError::Config("mail.smtp section missing".to_string()))?;
            let mailer = SmtpMailer::new(smtp, &sender_address(&config.shop)?)?;
            info!("Mail delivery via SMTP relay {}:{}", smtp.host, smtp.port);
            Ok(Arc::new(mailer))
        }
    }
}
