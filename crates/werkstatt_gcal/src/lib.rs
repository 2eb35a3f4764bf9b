// --- File: crates/werkstatt_gcal/src/lib.rs ---
pub mod auth;
#[cfg(test)]
mod auth_test;
pub mod doc;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_test;
pub mod routes;
pub mod service;
#[cfg(test)]
mod service_test;

pub use handlers::GcalState;
pub use service::{create_calendar_service, DisabledCalendarService, GoogleCalendarService};
