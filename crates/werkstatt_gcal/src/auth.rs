// File: crates/werkstatt_gcal/src/auth.rs
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator, ServiceAccountKey},
    CalendarHub,
};
use serde_json::json;
use std::path::Path;
use werkstatt_config::GcalConfig;

use crate::service::GcalServiceError;

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Builds a service-account key from the inline `client_email` / `private_key` pair.
pub fn inline_service_account_key(
    client_email: &str,
    private_key: &str,
) -> Result<ServiceAccountKey, GcalServiceError> {
    if client_email.trim().is_empty() || private_key.trim().is_empty() {
        return Err(GcalServiceError::AuthError(
            "client_email and private_key must both be set".to_string(),
        ));
    }
    serde_json::from_value(json!({
        "type": "service_account",
        "client_email": client_email,
        "private_key": private_key,
        "token_uri": TOKEN_URI,
    }))
    .map_err(|e| GcalServiceError::AuthError(format!("invalid service account key: {}", e)))
}

/// Resolves the service-account key: a key file wins over the inline pair.
pub async fn service_account_key(config: &GcalConfig) -> Result<ServiceAccountKey, GcalServiceError> {
    if let Some(key_path) = config.key_path.as_deref().filter(|p| !p.trim().is_empty()) {
        return read_service_account_key(Path::new(key_path))
            .await
            .map_err(|e| GcalServiceError::AuthError(format!("{}: {}", key_path, e)));
    }

    match (config.client_email.as_deref(), config.private_key.as_deref()) {
        (Some(email), Some(key)) => inline_service_account_key(email, key),
        _ => Err(GcalServiceError::AuthError(
            "neither key_path nor client_email/private_key configured".to_string(),
        )),
    }
}

pub async fn create_calendar_hub(config: &GcalConfig) -> Result<HubType, GcalServiceError> {
    let sa_key = service_account_key(config).await?;

    let auth = ServiceAccountAuthenticator::builder(sa_key)
        .build()
        .await
        .map_err(|e| GcalServiceError::AuthError(e.to_string()))?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(|e| GcalServiceError::AuthError(format!("TLS roots: {}", e)))?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    Ok(CalendarHub::new(client, auth))
}
