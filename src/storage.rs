//! Storage-location classification and lock-file primitives.
//!
//! Lock backends are chosen per location: anything on the local filesystem
//! gets an OS advisory lock, shared storage goes through a coordination
//! service or distributed-filesystem leases. The classifier is a trait so an
//! embedding engine can plug in its own notion of "local".

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

const HDFS_PREFIX: &str = "hdfs://";
const VIEWFS_PREFIX: &str = "viewfs://";
const FILE_PREFIX: &str = "file://";

/// Kind of storage system a location lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// Local (or locally mounted) filesystem.
    Local,
    /// Hadoop distributed filesystem.
    Hdfs,
    /// Federated view over several distributed filesystems.
    ViewFs,
}

impl StorageKind {
    pub fn is_local(&self) -> bool {
        matches!(self, StorageKind::Local)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Local => "local",
            StorageKind::Hdfs => "hdfs",
            StorageKind::ViewFs => "viewfs",
        }
    }
}

/// Classifies a storage location.
pub trait StorageClassifier: Send + Sync {
    fn classify(&self, location: &str) -> StorageKind;
}

/// Classifier keyed on the URI scheme of the location.
///
/// `hdfs://` and `viewfs://` are distributed; everything else, including
/// `file://` URIs and bare paths, is local.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemeClassifier;

impl StorageClassifier for SchemeClassifier {
    fn classify(&self, location: &str) -> StorageKind {
        let lower = location.trim_start().to_ascii_lowercase();
        if lower.starts_with(HDFS_PREFIX) {
            StorageKind::Hdfs
        } else if lower.starts_with(VIEWFS_PREFIX) {
            StorageKind::ViewFs
        } else {
            StorageKind::Local
        }
    }
}

/// Convert a local location (bare path or `file://` URI) to a filesystem path.
pub fn to_local_path(location: &str) -> PathBuf {
    match location.strip_prefix(FILE_PREFIX) {
        Some(rest) => PathBuf::from(rest),
        None => PathBuf::from(location),
    }
}

/// Whether a lock file exists at `path`.
pub fn lock_file_exists(path: &Path) -> bool {
    path.exists()
}

/// Create an empty lock file with create-new semantics.
///
/// Returns `Ok(true)` if this call created the file and `Ok(false)` if it
/// already existed (for instance because a competing process won the
/// creation race). Parent directories are not created.
pub fn create_new_lock_file(path: &Path) -> io::Result<bool> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e),
    }
}
