// --- File: crates/werkstatt_appointments/src/lib.rs ---
pub mod admin;
pub mod auth;
pub mod booking;
#[cfg(feature = "openapi")]
pub mod doc;
pub mod handlers;
pub mod reminder;
pub mod routes;
#[cfg(test)]
mod test_support;

pub use admin::AdminQueryService;
pub use auth::AdminAuthState;
pub use booking::{AppointmentService, BookingOutcome};
pub use handlers::AppointmentsState;
pub use reminder::{ReminderReport, ReminderSweeper};
pub use routes::routes;
