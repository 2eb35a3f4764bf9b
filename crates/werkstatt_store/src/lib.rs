//! Local appointment store for the Werkstatt backend
//!
//! Every booking is mirrored into a JSON file next to the server. The file is
//! the system of record for what was requested; the remote calendar owns the
//! attendee responses. The reminder job reads the same file.
//!
//! # Example
//!
//! ```rust,no_run
//! use werkstatt_store::{AppointmentRepository, JsonFileRepository};
//!
//! async fn count() -> Result<usize, werkstatt_store::StoreError> {
//!     let repository = JsonFileRepository::new("data/appointments.json");
//!     Ok(repository.find_all().await?.len())
//! }
//! ```

pub mod error;
pub mod factory;
pub mod json_file;
pub mod memory;
pub mod repository;

pub use error::StoreError;
pub use factory::RepositoryFactory;
pub use json_file::JsonFileRepository;
pub use memory::InMemoryAppointmentRepository;
pub use repository::AppointmentRepository;
