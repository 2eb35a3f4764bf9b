// --- File: crates/werkstatt_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all Werkstatt errors.
///
/// Each crate keeps its own error enum and implements `From<CrateError> for WerkstattError`,
/// so handlers can use `?` and get the mapped HTTP status for free.
#[derive(Error, Debug)]
pub enum WerkstattError {
    /// Missing or malformed request input
    #[error("{0}")]
    ValidationError(String),

    /// The referenced remote calendar event does not exist
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Missing or wrong admin credentials
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Client exceeded the request budget
    #[error("Rate limited: {0}")]
    RateLimitError(String),

    /// Calendar provider or other downstream call failed
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Outgoing mail was rejected or could not be sent
    #[error("Delivery error: {0}")]
    DeliveryError(String),

    /// Reading or writing the local appointment file failed
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for WerkstattError {
    fn status_code(&self) -> u16 {
        match self {
            WerkstattError::ValidationError(_) => 400,
            WerkstattError::AuthError(_) => 401,
            WerkstattError::NotFoundError(_) => 404,
            WerkstattError::RateLimitError(_) => 429,
            WerkstattError::ExternalServiceError { .. } => 500,
            WerkstattError::DeliveryError(_) => 500,
            WerkstattError::StorageError(_) => 500,
            WerkstattError::ConfigError(_) => 500,
            WerkstattError::InternalError(_) => 500,
        }
    }
}

// Common error conversions
impl From<reqwest::Error> for WerkstattError {
    fn from(err: reqwest::Error) -> Self {
        WerkstattError::ExternalServiceError {
            service_name: "http".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for WerkstattError {
    fn from(err: serde_json::Error) -> Self {
        WerkstattError::InternalError(format!("invalid JSON: {}", err))
    }
}

impl From<std::io::Error> for WerkstattError {
    fn from(err: std::io::Error) -> Self {
        WerkstattError::StorageError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> WerkstattError {
    WerkstattError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> WerkstattError {
    WerkstattError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> WerkstattError {
    WerkstattError::NotFoundError(message.to_string())
}

pub fn auth_error<T: fmt::Display>(message: T) -> WerkstattError {
    WerkstattError::AuthError(message.to_string())
}

pub fn delivery_error<T: fmt::Display>(message: T) -> WerkstattError {
    WerkstattError::DeliveryError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> WerkstattError {
    WerkstattError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}
