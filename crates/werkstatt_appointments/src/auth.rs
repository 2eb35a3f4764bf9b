// --- File: crates/werkstatt_appointments/src/auth.rs ---

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use constant_time_eq::constant_time_eq;
use std::sync::Arc;
use tracing::{debug, warn};
use werkstatt_common::auth_error;
use werkstatt_config::AppConfig;

const BEARER_PREFIX: &str = "Bearer ";

/// Expected admin token; `None` leaves the admin routes open.
#[derive(Clone, Debug, Default)]
pub struct AdminAuthState {
    token: Option<String>,
}

impl AdminAuthState {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let state = Self::new(config.admin.api_token.clone());
        if !state.is_enabled() {
            warn!("admin.api_token not set, admin endpoints are unauthenticated");
        }
        state
    }

    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
}

/// Checks `Authorization: Bearer <token>` against the configured admin token.
pub async fn admin_auth_middleware(
    State(auth): State<Arc<AdminAuthState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = auth.token.as_deref() else {
        return next.run(req).await;
    };

    match bearer_token(&req) {
        Some(provided) if constant_time_eq(provided.as_bytes(), expected.as_bytes()) => {
            debug!("Admin request authenticated");
            next.run(req).await
        }
        Some(_) => {
            warn!("Admin request with invalid token: {} {}", req.method(), req.uri());
            auth_error("invalid token").into_response()
        }
        None => {
            warn!("Admin request without bearer token: {} {}", req.method(), req.uri());
            auth_error("missing bearer token").into_response()
        }
    }
}
