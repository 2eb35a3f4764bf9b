use thiserror::Error;
use werkstatt_common::WerkstattError;

/// Fallback when the provider rejects a mail without saying why.
pub const DEFAULT_FAILURE_MESSAGE: &str = "E-Mail-Versand fehlgeschlagen";

/// Mail-specific error types.
#[derive(Error, Debug)]
pub enum MailError {
    /// Missing or incomplete transport configuration
    #[error("Mail configuration missing or incomplete: {0}")]
    Config(String),

    /// The HTTP request to the mail API failed
    #[error("Mail API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The mail API rejected the message
    #[error("{message}")]
    Provider { status: u16, message: String },

    /// SMTP dialogue failed
    #[error("SMTP delivery failed: {0}")]
    Smtp(String),

    /// The message could not be assembled (bad address, bad header)
    #[error("Invalid message: {0}")]
    Message(String),
}

impl From<MailError> for WerkstattError {
    fn from(err: MailError) -> Self {
        match err {
            MailError::Config(message) => WerkstattError::ConfigError(message),
            other => WerkstattError::DeliveryError(other.to_string()),
        }
    }
}
