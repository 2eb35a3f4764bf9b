// --- File: crates/werkstatt_common/src/lib.rs ---

pub mod error; // Error taxonomy and HTTP status mapping
pub mod handlers; // Liveness handler
pub mod http; // Error responses, outbound client, rate limiting
pub mod logging;
pub mod models; // Shared data structures
pub mod routes;
pub mod services; // Calendar and notification traits
pub mod time;

#[cfg(feature = "testing")]
pub mod testing;

// Re-export the routes function to be used by the main backend service
pub use routes::routes;

pub use error::{
    auth_error, config_error, delivery_error, external_service_error, not_found, validation_error,
    HttpStatusCode, WerkstattError,
};

pub use http::{
    client::HTTP_CLIENT,
    rate_limit::{rate_limit_middleware, RateLimiter},
    IntoHttpResponse,
};

pub use logging::{init, init_with_level};

pub use services::{CalendarService, EmailMessage, NotificationResult, NotificationService};
