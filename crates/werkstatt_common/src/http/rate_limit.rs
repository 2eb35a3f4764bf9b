// --- File: crates/werkstatt_common/src/http/rate_limit.rs ---
//! Fixed-window request limiting per client.
//!
//! Behind a trusted proxy the client is the last `X-Forwarded-For` hop, the one
//! the proxy appended itself. Otherwise it is the peer socket address.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use werkstatt_config::AppConfig;

use crate::error::WerkstattError;

const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
const UNKNOWN_CLIENT: &str = "unknown";
// Expired windows are swept once the table grows past this size.
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    trust_proxy: bool,
    buckets: DashMap<String, Window>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration, trust_proxy: bool) -> Self {
        Self {
            max_requests,
            window,
            trust_proxy,
            buckets: DashMap::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.rate_limit.max_requests,
            Duration::from_secs(config.rate_limit.window_secs),
            config.server.trust_proxy,
        )
    }

    pub fn trust_proxy(&self) -> bool {
        self.trust_proxy
    }

    /// Counts one request for `key`.
    ///
    /// Returns the remaining budget, or the time until the window resets when the
    /// budget is exhausted.
    pub fn check(&self, key: &str) -> Result<u32, Duration> {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> Result<u32, Duration> {
        if self.buckets.len() > PRUNE_THRESHOLD {
            self.prune(now);
        }

        let mut entry = self.buckets.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        let elapsed = now.saturating_duration_since(entry.started);
        if elapsed >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        if entry.count >= self.max_requests {
            let elapsed = now.saturating_duration_since(entry.started);
            return Err(self.window.saturating_sub(elapsed));
        }

        entry.count += 1;
        Ok(self.max_requests - entry.count)
    }

    /// Drops every window that has already expired.
    pub fn prune(&self, now: Instant) {
        let window = self.window;
        self.buckets
            .retain(|_, w| now.saturating_duration_since(w.started) < window);
    }
}

/// Derives the rate limit key for a request.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> String {
    if trust_proxy {
        let forwarded = headers
            .get(FORWARDED_FOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.rsplit(',').next())
            .map(str::trim)
            .filter(|hop| !hop.is_empty());
        if let Some(hop) = forwarded {
            return hop.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Axum middleware enforcing the limiter. Rejected requests get 429 with `Retry-After`.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = client_key(req.headers(), peer, limiter.trust_proxy());

    match limiter.check(&key) {
        Ok(_) => next.run(req).await,
        Err(retry_after) => {
            tracing::warn!("Rate limit exceeded for client {}", key);
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            let mut response = WerkstattError::RateLimitError(
                "Zu viele Anfragen, bitte später erneut versuchen".to_string(),
            )
            .into_response();
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs.max(1)));
            response
        }
    }
}
