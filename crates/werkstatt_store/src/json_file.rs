//! JSON file backed appointment store
//!
//! The file holds one pretty-printed JSON array and is rewritten wholesale on
//! every mutation. Writers in the same process are serialized by a mutex; the
//! server and the reminder job additionally coordinate through an advisory lock
//! on a `<file>.lock` sidecar. The rewrite goes to a temp file in the same
//! directory that is then renamed over the original.

use async_trait::async_trait;
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::debug;
use werkstatt_common::models::{Appointment, AppointmentStatus};

use crate::error::StoreError;
use crate::repository::{remove_linked, update_linked, AppointmentRepository};

/// Held while a read-modify-write cycle runs. Dropping the file releases the lock.
struct SidecarLock {
    _file: File,
}

impl SidecarLock {
    fn acquire(store_path: &Path) -> Result<Self, StoreError> {
        let mut lock_path = OsString::from(store_path.as_os_str());
        lock_path.push(".lock");

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(PathBuf::from(lock_path))?;
        FileExt::lock_exclusive(&file)?;
        Ok(Self { _file: file })
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

fn read_file(path: &Path) -> Result<Vec<Appointment>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&content)?)
}

fn write_file(path: &Path, appointments: &[Appointment]) -> Result<(), StoreError> {
    let dir = parent_dir(path);
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, appointments)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

/// Appointment store backed by a single JSON file.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Creates the parent directory and an empty array file if missing.
    pub async fn init(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            fs::create_dir_all(parent_dir(&path))?;
            let _lock = SidecarLock::acquire(&path)?;
            if !path.exists() {
                debug!("Creating empty appointment store at {}", path.display());
                write_file(&path, &[])?;
            }
            Ok(())
        })
        .await
        .map_err(|e| StoreError::TaskError(e.to_string()))?
    }

    /// Runs `f` on the full list under both locks. The file is only rewritten
    /// when `f` reports at least one change.
    async fn mutate<F>(&self, f: F) -> Result<usize, StoreError>
    where
        F: FnOnce(&mut Vec<Appointment>) -> usize + Send + 'static,
    {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            fs::create_dir_all(parent_dir(&path))?;
            let _lock = SidecarLock::acquire(&path)?;
            let mut all = read_file(&path)?;
            let changed = f(&mut all);
            if changed > 0 {
                write_file(&path, &all)?;
            }
            Ok(changed)
        })
        .await
        .map_err(|e| StoreError::TaskError(e.to_string()))?
    }
}

#[async_trait]
impl AppointmentRepository for JsonFileRepository {
    async fn find_all(&self) -> Result<Vec<Appointment>, StoreError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_file(&path))
            .await
            .map_err(|e| StoreError::TaskError(e.to_string()))?
    }

    async fn append(&self, appointment: Appointment) -> Result<(), StoreError> {
        self.mutate(move |all| {
            all.push(appointment);
            1
        })
        .await?;
        Ok(())
    }

    async fn remove_by_remote_event_id(&self, remote_event_id: &str) -> Result<usize, StoreError> {
        let remote_event_id = remote_event_id.to_string();
        self.mutate(move |all| remove_linked(all, &remote_event_id))
            .await
    }

    async fn update_status_by_remote_event_id(
        &self,
        remote_event_id: &str,
        status: AppointmentStatus,
    ) -> Result<usize, StoreError> {
        let remote_event_id = remote_event_id.to_string();
        self.mutate(move |all| update_linked(all, &remote_event_id, status))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn appointment(id: &str, remote: Option<&str>) -> Appointment {
        Appointment {
            id: id.to_string(),
            status: AppointmentStatus::Pending,
            remote_event_id: remote.map(str::to_string),
            name: "Max Mustermann".to_string(),
            email: "max@example.com".to_string(),
            phone: None,
            service: Some("Inspektion".to_string()),
            notes: None,
            start_iso: "2025-03-10T09:00:00+01:00".to_string(),
            end_iso: "2025-03-10T10:00:00+01:00".to_string(),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("appointments.json"));

        assert!(!repo.exists());
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_init_creates_directory_and_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("appointments.json");
        let repo = JsonFileRepository::new(&path);

        repo.init().await.unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
        // a second init leaves existing content alone
        repo.append(appointment("apt_1", None)).await.unwrap();
        repo.init().await.unwrap();
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_append_writes_pretty_json_with_legacy_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appointments.json");
        let repo = JsonFileRepository::new(&path);

        repo.append(appointment("apt_1", Some("evt_1"))).await.unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[\n  {"));
        assert!(content.contains("\"gcal_event_id\": \"evt_1\""));
    }

    #[tokio::test]
    async fn test_remove_and_update_by_remote_event_id() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("appointments.json"));
        repo.append(appointment("apt_1", Some("evt_1"))).await.unwrap();
        repo.append(appointment("apt_2", Some("evt_2"))).await.unwrap();
        repo.append(appointment("apt_3", None)).await.unwrap();

        let changed = repo
            .update_status_by_remote_event_id("evt_2", AppointmentStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(changed, 1);

        let removed = repo.remove_by_remote_event_id("evt_1").await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(repo.remove_by_remote_event_id("evt_1").await.unwrap(), 0);

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "apt_2");
        assert_eq!(all[0].status, AppointmentStatus::Confirmed);
        assert_eq!(all[1].id, "apt_3");
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Arc::new(JsonFileRepository::new(dir.path().join("appointments.json")));

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.append(appointment(&format!("apt_{}", i), None))
                        .await
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(repo.find_all().await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appointments.json");
        fs::write(&path, "{ not an array").unwrap();
        let repo = JsonFileRepository::new(&path);

        assert!(matches!(
            repo.find_all().await,
            Err(StoreError::Serialization(_))
        ));
    }
}
