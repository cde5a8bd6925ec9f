//! In-process clients for the non-local backends.
//!
//! [`MemoryCoordination`] and [`MemoryLeases`] give exclusion between
//! threads of one process. They are useful for embedding and for tests; they
//! provide no cross-process exclusion.

use super::coordination::CoordinationClient;
use super::lease::LeaseClient;
use std::collections::HashMap;
use std::io;
use std::sync::{Mutex, MutexGuard};

fn lock_map(map: &Mutex<HashMap<String, String>>) -> MutexGuard<'_, HashMap<String, String>> {
    map.lock().unwrap_or_else(|poison| poison.into_inner())
}

/// Coordination service kept in memory.
#[derive(Debug, Default)]
pub struct MemoryCoordination {
    /// node -> owner
    nodes: Mutex<HashMap<String, String>>,
}

impl MemoryCoordination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `node` currently exists.
    pub fn contains(&self, node: &str) -> bool {
        lock_map(&self.nodes).contains_key(node)
    }

    /// Drop `node` as if its owner's session had expired.
    pub fn expire(&self, node: &str) {
        lock_map(&self.nodes).remove(node);
    }
}

impl CoordinationClient for MemoryCoordination {
    fn try_create_ephemeral(&self, node: &str, owner: &str) -> io::Result<bool> {
        let mut nodes = lock_map(&self.nodes);
        if nodes.contains_key(node) {
            return Ok(false);
        }
        nodes.insert(node.to_string(), owner.to_string());
        Ok(true)
    }

    fn delete(&self, node: &str) -> io::Result<()> {
        match lock_map(&self.nodes).remove(node) {
            Some(_) => Ok(()),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("node '{}' does not exist", node),
            )),
        }
    }
}

/// Lease table kept in memory.
#[derive(Debug, Default)]
pub struct MemoryLeases {
    /// path -> holder
    leases: Mutex<HashMap<String, String>>,
}

impl MemoryLeases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current holder of the lease on `path`.
    pub fn holder_of(&self, path: &str) -> Option<String> {
        lock_map(&self.leases).get(path).cloned()
    }
}

impl LeaseClient for MemoryLeases {
    fn try_acquire_lease(&self, path: &str, holder: &str) -> io::Result<bool> {
        let mut leases = lock_map(&self.leases);
        match leases.get(path) {
            Some(current) => Ok(current == holder),
            None => {
                leases.insert(path.to_string(), holder.to_string());
                Ok(true)
            }
        }
    }

    fn release_lease(&self, path: &str, holder: &str) -> io::Result<()> {
        let mut leases = lock_map(&self.leases);
        match leases.get(path) {
            Some(current) if current == holder => {
                leases.remove(path);
                Ok(())
            }
            Some(current) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("lease on '{}' is held by {}", path, current),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no lease on '{}'", path),
            )),
        }
    }
}

/// Stand-in used when no client was supplied for a backend.
///
/// Every call fails with [`io::ErrorKind::Unsupported`], so handles built on
/// it simply never obtain the lock.
#[derive(Debug, Clone, Copy)]
pub struct UnconfiguredClient {
    backend: &'static str,
}

impl UnconfiguredClient {
    pub fn new(backend: &'static str) -> Self {
        Self { backend }
    }

    fn unsupported(&self) -> io::Error {
        io::Error::new(
            io::ErrorKind::Unsupported,
            format!("no {} client configured", self.backend),
        )
    }
}

impl CoordinationClient for UnconfiguredClient {
    fn try_create_ephemeral(&self, _node: &str, _owner: &str) -> io::Result<bool> {
        Err(self.unsupported())
    }

    fn delete(&self, _node: &str) -> io::Result<()> {
        Err(self.unsupported())
    }
}

impl LeaseClient for UnconfiguredClient {
    fn try_acquire_lease(&self, _path: &str, _holder: &str) -> io::Result<bool> {
        Err(self.unsupported())
    }

    fn release_lease(&self, _path: &str, _holder: &str) -> io::Result<()> {
        Err(self.unsupported())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn coordination_node_is_exclusive() {
        let client = MemoryCoordination::new();

        assert!(client.try_create_ephemeral("/locks/a", "one").unwrap());
        assert!(!client.try_create_ephemeral("/locks/a", "two").unwrap());
        assert!(client.try_create_ephemeral("/locks/b", "two").unwrap());

        client.delete("/locks/a").unwrap();
        assert!(client.delete("/locks/a").is_err());
    }

    #[test]
    fn lease_release_checks_holder() {
        let client = MemoryLeases::new();

        assert!(client.try_acquire_lease("/t1/meta.lock", "one").unwrap());
        assert!(!client.try_acquire_lease("/t1/meta.lock", "two").unwrap());

        let err = client.release_lease("/t1/meta.lock", "two").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);

        client.release_lease("/t1/meta.lock", "one").unwrap();
        assert_eq!(client.holder_of("/t1/meta.lock"), None);
    }

    #[test]
    fn only_one_thread_wins_a_node() {
        let client = Arc::new(MemoryCoordination::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let client = client.clone();
                thread::spawn(move || {
                    client
                        .try_create_ephemeral("/locks/race", &format!("owner-{i}"))
                        .unwrap()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }

    #[test]
    fn unconfigured_client_is_unsupported() {
        let client = UnconfiguredClient::new("lease");
        let err = client.try_acquire_lease("/t1", "me").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
        assert!(err.to_string().contains("lease"));
    }
}
