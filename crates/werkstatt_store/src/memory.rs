//! In-memory appointment store, used by tests and as a drop-in when no file is wanted.

use async_trait::async_trait;
use std::sync::Mutex;
use werkstatt_common::models::{Appointment, AppointmentStatus};

use crate::error::StoreError;
use crate::repository::{remove_linked, update_linked, AppointmentRepository};

#[derive(Debug, Default)]
pub struct InMemoryAppointmentRepository {
    appointments: Mutex<Vec<Appointment>>,
}

impl InMemoryAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_appointments(appointments: Vec<Appointment>) -> Self {
        Self {
            appointments: Mutex::new(appointments),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Appointment>>, StoreError> {
        self.appointments
            .lock()
            .map_err(|e| StoreError::LockError(e.to_string()))
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn find_all(&self) -> Result<Vec<Appointment>, StoreError> {
        Ok(self.lock()?.clone())
    }

    async fn append(&self, appointment: Appointment) -> Result<(), StoreError> {
        self.lock()?.push(appointment);
        Ok(())
    }

    async fn remove_by_remote_event_id(&self, remote_event_id: &str) -> Result<usize, StoreError> {
        Ok(remove_linked(&mut *self.lock()?, remote_event_id))
    }

    async fn update_status_by_remote_event_id(
        &self,
        remote_event_id: &str,
        status: AppointmentStatus,
    ) -> Result<usize, StoreError> {
        Ok(update_linked(&mut self.lock()?, remote_event_id, status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment(id: &str, remote: Option<&str>) -> Appointment {
        Appointment {
            id: id.to_string(),
            status: AppointmentStatus::Pending,
            remote_event_id: remote.map(str::to_string),
            name: "Erika".to_string(),
            email: "erika@example.com".to_string(),
            phone: Some("0151 1234567".to_string()),
            service: None,
            notes: None,
            start_iso: "2025-03-10T09:00:00Z".to_string(),
            end_iso: "2025-03-10T10:00:00Z".to_string(),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_records_without_remote_id_are_never_matched() {
        let repo = InMemoryAppointmentRepository::with_appointments(vec![
            appointment("apt_1", None),
            appointment("apt_2", Some("evt_2")),
        ]);

        assert_eq!(repo.remove_by_remote_event_id("").await.unwrap(), 0);
        assert_eq!(
            repo.update_status_by_remote_event_id("evt_2", AppointmentStatus::Declined)
                .await
                .unwrap(),
            1
        );

        let all = repo.find_all().await.unwrap();
        assert_eq!(all[0].status, AppointmentStatus::Pending);
        assert_eq!(all[1].status, AppointmentStatus::Declined);
    }

    #[tokio::test]
    async fn test_duplicate_links_are_all_removed() {
        let repo = InMemoryAppointmentRepository::new();
        repo.append(appointment("apt_1", Some("evt_1"))).await.unwrap();
        repo.append(appointment("apt_2", Some("evt_1"))).await.unwrap();

        assert_eq!(repo.remove_by_remote_event_id("evt_1").await.unwrap(), 2);
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
