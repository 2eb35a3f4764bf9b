//! Repository trait for the local appointment mirror
//!
//! The booking flow and the reminder job only depend on this trait. The JSON
//! file and in-memory implementations share the same contract.

use async_trait::async_trait;
use werkstatt_common::models::{Appointment, AppointmentStatus};

use crate::error::StoreError;

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Every stored appointment in insertion order. A store that was never
    /// written reads as empty.
    async fn find_all(&self) -> Result<Vec<Appointment>, StoreError>;

    /// Appends one appointment.
    async fn append(&self, appointment: Appointment) -> Result<(), StoreError>;

    /// Removes every record linked to `remote_event_id` and returns how many went.
    async fn remove_by_remote_event_id(&self, remote_event_id: &str) -> Result<usize, StoreError>;

    /// Sets `status` on every record linked to `remote_event_id` and returns how many changed.
    async fn update_status_by_remote_event_id(
        &self,
        remote_event_id: &str,
        status: AppointmentStatus,
    ) -> Result<usize, StoreError>;
}

pub(crate) fn remove_linked(all: &mut Vec<Appointment>, remote_event_id: &str) -> usize {
    let before = all.len();
    all.retain(|a| a.remote_event_id.as_deref() != Some(remote_event_id));
    before - all.len()
}

pub(crate) fn update_linked(
    all: &mut [Appointment],
    remote_event_id: &str,
    status: AppointmentStatus,
) -> usize {
    let mut changed = 0;
    for appointment in all
        .iter_mut()
        .filter(|a| a.remote_event_id.as_deref() == Some(remote_event_id))
    {
        appointment.status = status;
        changed += 1;
    }
    changed
}
