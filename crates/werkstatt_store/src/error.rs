//! Error types for the appointment store

use thiserror::Error;
use werkstatt_common::WerkstattError;

/// Errors that can occur when reading or writing appointments
#[derive(Debug, Error)]
pub enum StoreError {
    /// File system error
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store file does not hold a JSON array of appointments
    #[error("Store file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    /// In-memory state lock was poisoned
    #[error("Store lock error: {0}")]
    LockError(String),

    /// Blocking file task panicked or was cancelled
    #[error("Store task failed: {0}")]
    TaskError(String),
}

impl From<StoreError> for WerkstattError {
    fn from(err: StoreError) -> Self {
        WerkstattError::StorageError(err.to_string())
    }
}
