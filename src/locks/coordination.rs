//! Coordination-service lock backend.
//!
//! A lock is an ephemeral node named after the effective lock path, created
//! under a configurable root. Whoever creates the node holds the lock; the
//! service deletes ephemeral nodes of dead sessions on its own.

use super::handle::{report_fault, LockHandle};
use super::metadata::holder_id;
use super::types::LockIdentity;
use crate::error::LockFault;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Client of a coordination service (ZooKeeper-style ephemeral nodes).
pub trait CoordinationClient: Send + Sync {
    /// Create an ephemeral node. Returns `Ok(false)` if the node exists.
    fn try_create_ephemeral(&self, node: &str, owner: &str) -> io::Result<bool>;

    /// Delete a node.
    fn delete(&self, node: &str) -> io::Result<()>;
}

/// Node path for an identity under `root`.
///
/// `%` and `/` in the lock path are percent-escaped so the lock is always a
/// direct child of `root`.
pub fn node_path(root: &str, identity: &LockIdentity) -> String {
    let escaped = identity
        .lock_path()
        .replace('%', "%25")
        .replace('/', "%2F");
    format!("{}/{}", root.trim_end_matches('/'), escaped)
}

/// Lock backend for shared storage when the coordination service is enabled.
pub struct CoordinationLockHandle {
    identity: LockIdentity,
    node: String,
    owner: String,
    client: Arc<dyn CoordinationClient>,
    held: bool,
}

impl CoordinationLockHandle {
    pub fn new(identity: LockIdentity, root: &str, client: Arc<dyn CoordinationClient>) -> Self {
        let node = node_path(root, &identity);
        Self {
            identity,
            node,
            owner: holder_id(),
            client,
            held: false,
        }
    }

    /// Node that represents this lock.
    pub fn node(&self) -> &str {
        &self.node
    }
}

impl fmt::Debug for CoordinationLockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoordinationLockHandle")
            .field("identity", &self.identity)
            .field("node", &self.node)
            .field("owner", &self.owner)
            .field("held", &self.held)
            .finish()
    }
}

impl LockHandle for CoordinationLockHandle {
    fn identity(&self) -> &LockIdentity {
        &self.identity
    }

    fn acquire(&mut self) -> bool {
        if self.held {
            return true;
        }

        let fault = match self.client.try_create_ephemeral(&self.node, &self.owner) {
            Ok(true) => {
                self.held = true;
                debug!(node = %self.node, "Coordination lock acquired");
                return true;
            }
            Ok(false) => LockFault::Conflict {
                path: PathBuf::from(&self.node),
            },
            Err(source) => LockFault::Io {
                path: PathBuf::from(&self.node),
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

        match self.client.delete(&self.node) {
            Ok(()) => {
                debug!(node = %self.node, "Coordination lock released");
                true
            }
            Err(source) => {
                let fault = LockFault::Release {
                    path: PathBuf::from(&self.node),
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

impl Drop for CoordinationLockHandle {
    fn drop(&mut self) {
        if self.held {
            self.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locks::memory::{MemoryCoordination, UnconfiguredClient};
    use crate::locks::LockPurpose;

    fn identity() -> LockIdentity {
        LockIdentity::new("hdfs://nn/warehouse/t1", LockPurpose::Metadata)
    }

    #[test]
    fn node_path_is_direct_child_of_root() {
        let node = node_path("/carbonlocks/", &identity());
        assert_eq!(node, "/carbonlocks/hdfs:%2F%2Fnn%2Fwarehouse%2Ft1%2Fmeta.lock");
        assert_eq!(node.matches('/').count(), 2);
    }

    #[test]
    fn node_path_escapes_percent() {
        let a = LockIdentity::new("hdfs://nn/a%2Fb", LockPurpose::TableStatus);
        let b = LockIdentity::new("hdfs://nn/a/b", LockPurpose::TableStatus);
        assert_ne!(node_path("/locks", &a), node_path("/locks", &b));
    }

    #[test]
    fn exclusive_between_handles() {
        let client = Arc::new(MemoryCoordination::new());
        let mut first = CoordinationLockHandle::new(identity(), "/carbonlocks", client.clone());
        let mut second = CoordinationLockHandle::new(identity(), "/carbonlocks", client.clone());

        assert!(first.acquire());
        assert!(!second.acquire());
        assert!(client.contains(first.node()));

        assert!(first.release());
        assert!(!client.contains(first.node()));
        assert!(second.acquire());
        assert!(second.release());
    }

    #[test]
    fn release_without_acquire_does_not_touch_service() {
        let client = Arc::new(MemoryCoordination::new());
        let mut holder = CoordinationLockHandle::new(identity(), "/carbonlocks", client.clone());
        let mut idle = CoordinationLockHandle::new(identity(), "/carbonlocks", client.clone());

        assert!(holder.acquire());
        assert!(idle.release());
        assert!(client.contains(holder.node()));
        assert!(holder.release());
    }

    #[test]
    fn release_failure_is_reported_as_false() {
        let client = Arc::new(MemoryCoordination::new());
        let mut handle = CoordinationLockHandle::new(identity(), "/carbonlocks", client.clone());

        assert!(handle.acquire());
        // Node vanished behind our back, e.g. session expiry
        client.expire(handle.node());
        assert!(!handle.release());
        assert!(!handle.is_held());
    }

    #[test]
    fn unconfigured_client_never_grants_lock() {
        let client = Arc::new(UnconfiguredClient::new("coordination"));
        let mut handle = CoordinationLockHandle::new(identity(), "/carbonlocks", client);

        assert!(!handle.acquire());
        assert!(handle.release());
    }
}
