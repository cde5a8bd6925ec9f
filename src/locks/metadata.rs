//! Holder metadata written into filesystem lock files.
//!
//! The advisory lock itself lives in the kernel; the file contents only tell
//! a human (or `carbonlock status`) who took the lock last. A lock file whose
//! metadata names a live process may still be free: the metadata is not
//! cleared on release.

use super::types::LockPurpose;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock holder metadata stored in lock files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockMetadata {
    /// Owner of the lock (e.g., `user@HOST`).
    pub owner: String,

    /// Process ID of the lock holder (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    /// Timestamp when the lock was taken (RFC3339).
    pub created_at: DateTime<Utc>,

    /// Stable name of the lock purpose.
    pub purpose: String,
}

impl LockMetadata {
    /// Create metadata for the current process with the current timestamp.
    pub fn new(purpose: LockPurpose) -> Self {
        Self {
            owner: get_owner_string(),
            pid: Some(std::process::id()),
            created_at: Utc::now(),
            purpose: purpose.as_str().to_string(),
        }
    }

    /// Serialize metadata to a JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Calculate the age of the lock.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.created_at)
    }

    /// Format the age as a human-readable string.
    pub fn age_string(&self) -> String {
        let age = self.age();
        let minutes = age.num_minutes();
        let hours = age.num_hours();
        let days = age.num_days();

        if days > 0 {
            format!("{}d {}h", days, hours % 24)
        } else if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else {
            format!("{}m", minutes)
        }
    }
}

/// Read the metadata of the last holder of a lock file.
///
/// Returns `Ok(None)` for a missing or empty file, or one whose contents are
/// not holder metadata (lock files created by other tools).
pub fn read_holder<P: AsRef<Path>>(path: P) -> io::Result<Option<LockMetadata>> {
    let content = match fs::read_to_string(path.as_ref()) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    if content.trim().is_empty() {
        return Ok(None);
    }

    Ok(serde_json::from_str(&content).ok())
}

/// Get the owner string for lock metadata.
pub(crate) fn get_owner_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Identifier unique to one lock handle: `user@HOST:pid:sequence`.
///
/// Handles in the same process get distinct ids so that the non-local
/// backends can tell them apart.
pub(crate) fn holder_id() -> String {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    let sequence = NEXT.fetch_add(1, Ordering::Relaxed);
    format!("{}:{}:{}", get_owner_string(), std::process::id(), sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn metadata_creation() {
        let meta = LockMetadata::new(LockPurpose::Compaction);

        assert!(meta.owner.contains('@'));
        assert_eq!(meta.pid, Some(std::process::id()));
        assert_eq!(meta.purpose, "compaction");
        assert!(meta.age().num_minutes() < 1);
    }

    #[test]
    fn metadata_age_string() {
        let mut meta = LockMetadata::new(LockPurpose::Metadata);
        assert!(meta.age_string().ends_with('m'));

        meta.created_at = Utc::now() - Duration::hours(2);
        assert!(meta.age_string().contains('h'));

        meta.created_at = Utc::now() - Duration::days(3);
        assert!(meta.age_string().contains('d'));
    }

    #[test]
    fn holder_ids_are_unique_per_handle() {
        let a = holder_id();
        let b = holder_id();
        assert_ne!(a, b);
        assert!(a.contains(&std::process::id().to_string()));
    }

    #[test]
    fn read_holder_parses_written_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("meta.lock");
        let meta = LockMetadata::new(LockPurpose::TableStatus);
        fs::write(&path, meta.to_json().unwrap()).unwrap();

        let holder = read_holder(&path).unwrap().unwrap();
        assert_eq!(holder.owner, meta.owner);
        assert_eq!(holder.purpose, "table_status");
    }

    #[test]
    fn read_holder_tolerates_missing_empty_and_foreign_files() {
        let temp_dir = TempDir::new().unwrap();

        let missing = temp_dir.path().join("missing.lock");
        assert!(read_holder(&missing).unwrap().is_none());

        let empty = temp_dir.path().join("empty.lock");
        fs::write(&empty, "").unwrap();
        assert!(read_holder(&empty).unwrap().is_none());

        let foreign = temp_dir.path().join("foreign.lock");
        fs::write(&foreign, "12345\n").unwrap();
        assert!(read_holder(&foreign).unwrap().is_none());
    }
}
