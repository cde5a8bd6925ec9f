//! Filesystem lock backend.
//!
//! Locks are exclusive, whole-file advisory locks taken through [`fs4`] on a
//! lock file derived from the [`LockIdentity`]. The kernel arbitrates between
//! competitors, including two handles inside the same process, since every
//! handle opens its own file description.
//!
//! # Lock File Location
//!
//! ```text
//! {location}/meta.lock        purpose = metadata
//! {location}                  any other purpose
//! ```
//!
//! Lock files are created on first use and never deleted: removing a lock
//! file while another process has it open but not yet locked would let two
//! owners lock two different inodes.

use super::handle::{report_fault, LockHandle};
use super::metadata::LockMetadata;
use super::types::LockIdentity;
use crate::error::LockFault;
use crate::storage;
use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Lock backend for locations on a local or locally mounted filesystem.
#[derive(Debug)]
pub struct FilesystemLockHandle {
    identity: LockIdentity,
    path: PathBuf,
    /// Open write handle; present from a successful acquire until release.
    file: Option<File>,
    held: bool,
}

impl FilesystemLockHandle {
    pub fn new(identity: LockIdentity) -> Self {
        let path = storage::to_local_path(&identity.lock_path());
        Self {
            identity,
            path,
            file: None,
            held: false,
        }
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether any owner, this handle included, currently holds the lock.
    ///
    /// Checks through a separate read-only handle and leaves the lock file
    /// untouched, so the last holder's metadata survives the check.
    pub fn probe_locked(&self) -> std::io::Result<bool> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };

        match file.try_lock_exclusive() {
            Ok(true) => {
                FileExt::unlock(&file)?;
                Ok(false)
            }
            Ok(false) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(true),
            Err(e) => Err(e),
        }
    }

    fn try_lock(&self) -> Result<File, LockFault> {
        if !storage::lock_file_exists(&self.path) {
            storage::create_new_lock_file(&self.path).map_err(|source| LockFault::Create {
                path: self.path.clone(),
                source,
            })?;
        }

        // Never truncate here: the current holder's metadata lives in this file.
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|source| LockFault::Io {
                path: self.path.clone(),
                source,
            })?;

        match file.try_lock_exclusive() {
            Ok(true) => Ok(file),
            Ok(false) => Err(LockFault::Conflict {
                path: self.path.clone(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Err(LockFault::Conflict {
                path: self.path.clone(),
            }),
            Err(source) => Err(LockFault::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    // Best effort; the lock is held whether or not this succeeds.
    fn write_holder(&self, mut file: &File) {
        let result = LockMetadata::new(self.identity.purpose())
            .to_json()
            .map_err(std::io::Error::other)
            .and_then(|json| {
                file.set_len(0)?;
                file.write_all(json.as_bytes())
            });

        if let Err(e) = result {
            warn!(
                lock_path = %self.path.display(),
                "Failed to record lock holder: {}",
                e
            );
        }
    }
}

impl LockHandle for FilesystemLockHandle {
    fn identity(&self) -> &LockIdentity {
        &self.identity
    }

    /// A second `acquire` on a held handle is a no-op that reports `true`.
    fn acquire(&mut self) -> bool {
        if self.held {
            debug!(lock_path = %self.path.display(), "Lock already held by this handle");
            return true;
        }

        match self.try_lock() {
            Ok(file) => {
                self.write_holder(&file);
                self.file = Some(file);
                self.held = true;
                debug!(lock_path = %self.path.display(), "Lock acquired");
                true
            }
            Err(fault) => {
                report_fault(&self.identity, &fault);
                false
            }
        }
    }

    fn release(&mut self) -> bool {
        let mut status = true;

        if self.held
            && let Some(file) = self.file.as_ref()
            && let Err(source) = FileExt::unlock(file)
        {
            let fault = LockFault::Release {
                path: self.path.clone(),
                source,
            };
            report_fault(&self.identity, &fault);
            status = false;
        }
        self.held = false;

        // The handle is closed on every path. A failure here is only logged:
        // the returned status reflects the unlock step alone.
        if let Some(file) = self.file.take() {
            if let Err(source) = file.sync_all() {
                let fault = LockFault::Close {
                    path: self.path.clone(),
                    source,
                };
                report_fault(&self.identity, &fault);
            }
            drop(file);
        }

        if status {
            debug!(lock_path = %self.path.display(), "Lock released");
        }
        status
    }

    fn is_held(&self) -> bool {
        self.held
    }
}

impl Drop for FilesystemLockHandle {
    fn drop(&mut self) {
        if self.held {
            debug!(lock_path = %self.path.display(), "Lock handle dropped while held");
            self.release();
        }
    }
}
