use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};
use werkstatt_common::services::{EmailMessage, NotificationResult, NotificationService};
use werkstatt_common::{WerkstattError, HTTP_CLIENT};
use werkstatt_config::ResendConfig;

use crate::error::{MailError, DEFAULT_FAILURE_MESSAGE};
use crate::{ICS_CONTENT_TYPE, ICS_FILENAME};

#[derive(Serialize, Debug)]
struct ResendAttachment<'a> {
    filename: &'a str,
    /// Base64 of the raw file.
    content: String,
    content_type: &'a str,
}

#[derive(Serialize, Debug)]
struct ResendEmail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<ResendAttachment<'a>>,
}

/// Sends mail through the Resend HTTP API.
pub struct ResendMailer {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl ResendMailer {
    pub fn new(config: &ResendConfig, from: impl Into<String>) -> Result<Self, MailError> {
        Self::with_client(HTTP_CLIENT.clone(), config, from)
    }

    pub fn with_client(
        client: Client,
        config: &ResendConfig,
        from: impl Into<String>,
    ) -> Result<Self, MailError> {
        if config.api_key.trim().is_empty() {
            return Err(MailError::Config("mail.resend.api_key is empty".to_string()));
        }
        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            from: from.into(),
        })
    }

    async fn deliver(&self, message: &EmailMessage) -> Result<NotificationResult, MailError> {
        let attachments = message
            .ics
            .as_deref()
            .map(|ics| ResendAttachment {
                filename: ICS_FILENAME,
                content: STANDARD.encode(ics.as_bytes()),
                content_type: ICS_CONTENT_TYPE,
            })
            .into_iter()
            .collect();

        let payload = ResendEmail {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.text,
            attachments,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let message = body["message"]
                .as_str()
                .unwrap_or(DEFAULT_FAILURE_MESSAGE)
                .to_string();
            error!("Resend returned {}: {}", status, message);
            return Err(MailError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        Ok(NotificationResult {
            id: body["id"].as_str().unwrap_or_default().to_string(),
            status: "sent".to_string(),
        })
    }
}

#[async_trait]
impl NotificationService for ResendMailer {
    async fn send(&self, message: EmailMessage) -> Result<NotificationResult, WerkstattError> {
        let result = self.deliver(&message).await?;
        info!("Mail sent to {} ({})", message.to, message.subject);
        Ok(result)
    }
}
