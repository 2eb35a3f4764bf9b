use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};
use werkstatt_common::services::{EmailMessage, NotificationResult, NotificationService};
use werkstatt_common::WerkstattError;
use werkstatt_config::SmtpConfig;

use crate::error::MailError;
use crate::{ICS_CONTENT_TYPE, ICS_FILENAME};

/// Sends mail through an SMTP relay (STARTTLS, optional login).
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig, from: &str) -> Result<Self, MailError> {
        if config.host.trim().is_empty() {
            return Err(MailError::Config("mail.smtp.host is empty".to_string()));
        }
        let from = parse_mailbox(from)?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| MailError::Config(format!("{}: {}", config.host, e)))?
            .port(config.port);
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| MailError::Message(format!("{}: {}", address, e)))
}

/// Assembles the MIME message. With an invite the text and the ICS file go
/// into a `multipart/mixed` body.
pub fn build_message(from: &Mailbox, message: &EmailMessage) -> Result<Message, MailError> {
    let builder = Message::builder()
        .from(from.clone())
        .to(parse_mailbox(&message.to)?)
        .subject(message.subject.clone());

    let built = match message.ics.as_deref() {
        Some(ics) => {
            let content_type = ContentType::parse(ICS_CONTENT_TYPE)
                .map_err(|e| MailError::Message(e.to_string()))?;
            builder.multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(message.text.clone()))
                    .singlepart(
                        Attachment::new(ICS_FILENAME.to_string()).body(ics.to_string(), content_type),
                    ),
            )
        }
        None => builder
            .header(ContentType::TEXT_PLAIN)
            .body(message.text.clone()),
    };

    built.map_err(|e| MailError::Message(e.to_string()))
}

#[async_trait]
impl NotificationService for SmtpMailer {
    async fn send(&self, message: EmailMessage) -> Result<NotificationResult, WerkstattError> {
        let email = build_message(&self.from, &message)?;

        let response = self.transport.send(email).await.map_err(|e| {
            error!("SMTP delivery to {} failed: {}", message.to, e);
            MailError::Smtp(e.to_string())
        })?;

        info!("Mail sent to {} via SMTP ({})", message.to, message.subject);
        let id = response.message().next().unwrap_or_default().to_string();
        Ok(NotificationResult {
            id,
            status: "sent".to_string(),
        })
    }
}
