//! Factory for creating the appointment store from configuration

use crate::error::StoreError;
use crate::json_file::JsonFileRepository;
use crate::repository::AppointmentRepository;
use std::sync::Arc;
use tracing::info;
use werkstatt_config::AppConfig;

#[derive(Debug, Clone, Default)]
pub struct RepositoryFactory;

impl RepositoryFactory {
    pub fn new() -> Self {
        Self
    }

    /// Opens the JSON file store at `store.path`, creating an empty one if missing.
    pub async fn from_app_config(
        &self,
        config: &AppConfig,
    ) -> Result<Arc<dyn AppointmentRepository>, StoreError> {
        let repository = JsonFileRepository::new(&config.store.path);
        repository.init().await?;
        info!("Appointment store ready at {}", repository.path().display());
        Ok(Arc::new(repository))
    }
}
