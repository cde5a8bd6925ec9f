//! Distributed-filesystem lease lock backend.
//!
//! The effective lock path is opened under a single-writer lease; the
//! filesystem refuses a second lease on the same path until the first is
//! given back or expires.

use super::handle::{report_fault, LockHandle};
use super::metadata::holder_id;
use super::types::LockIdentity;
use crate::error::LockFault;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Client of a distributed filesystem that grants single-writer leases.
pub trait LeaseClient: Send + Sync {
    /// Take the write lease on `path`. Returns `Ok(false)` if someone else
    /// holds it.
    fn try_acquire_lease(&self, path: &str, holder: &str) -> io::Result<bool>;

    /// Give back a lease taken by `holder`.
    fn release_lease(&self, path: &str, holder: &str) -> io::Result<()>;
}

/// Lock backend for shared storage when the coordination service is disabled.
pub struct LeaseLockHandle {
    identity: LockIdentity,
    path: String,
    holder: String,
    client: Arc<dyn LeaseClient>,
    held: bool,
}

impl LeaseLockHandle {
    pub fn new(identity: LockIdentity, client: Arc<dyn LeaseClient>) -> Self {
        let path = identity.lock_path();
        Self {
            identity,
            path,
            holder: holder_id(),
            client,
            held: false,
        }
    }

    /// Path the lease is taken on.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Debug for LeaseLockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeaseLockHandle")
            .field("identity", &self.identity)
            .field("path", &self.path)
            .field("holder", &self.holder)
            .field("held", &self.held)
            .finish()
    }
}

impl LockHandle for LeaseLockHandle {
    fn identity(&self) -> &LockIdentity {
        &self.identity
    }

    fn acquire(&mut self) -> bool {
        if self.held {
            return true;
        }

        let fault = match self.client.try_acquire_lease(&self.path, &self.holder) {
            Ok(true) => {
                self.held = true;
                debug!(lock_path = %self.path, "Lease acquired");
                return true;
            }
            Ok(false) => LockFault::Conflict {
                path: PathBuf::from(&self.path),
            },
            Err(source) => LockFault::Io {
                path: PathBuf::from(&self.path),
                source,
            },
        };

        report_fault(&self.identity, &fault);
        false
    }

    fn release(&mut self) -> bool {
        if !self.held {
            return true;
        }
        self.held = false;

        match self.client.release_lease(&self.path, &self.holder) {
            Ok(()) => {
                debug!(lock_path = %self.path, "Lease released");
                true
            }
            Err(source) => {
                let fault = LockFault::Release {
                    path: PathBuf::from(&self.path),
                    source,
                };
                report_fault(&self.identity, &fault);
                false
            }
        }
    }

    fn is_held(&self) -> bool {
        self.held
    }
}

impl Drop for LeaseLockHandle {
    fn drop(&mut self) {
        if self.held {
            self.release();
        }
    }
}
