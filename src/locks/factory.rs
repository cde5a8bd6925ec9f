//! Backend selection.
//!
//! Local locations always get the filesystem backend. Shared storage goes to
//! the coordination service when it is enabled, and to distributed-filesystem
//! leases otherwise. The coordination service is only expected to exist in
//! shared-storage deployments, hence the order.

use super::coordination::{CoordinationClient, CoordinationLockHandle};
use super::handle::LockHandle;
use super::lease::{LeaseClient, LeaseLockHandle};
use super::local::FilesystemLockHandle;
use super::memory::UnconfiguredClient;
use super::retry::{RetryPolicy, RetryingAcquirer};
use super::types::LockIdentity;
use crate::config::LockConfig;
use crate::storage::{SchemeClassifier, StorageClassifier, StorageKind};
use std::sync::Arc;
use tracing::debug;

/// Which backend serves a lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// OS advisory lock on a local file.
    Filesystem,
    /// Ephemeral node in a coordination service.
    Coordination,
    /// Single-writer lease on a distributed filesystem.
    Lease,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Filesystem => "filesystem",
            BackendKind::Coordination => "coordination",
            BackendKind::Lease => "lease",
        }
    }
}

/// Pick the backend for a location of the given storage kind.
pub fn select_backend(kind: StorageKind, coordination_enabled: bool) -> BackendKind {
    if kind.is_local() {
        BackendKind::Filesystem
    } else if coordination_enabled {
        BackendKind::Coordination
    } else {
        BackendKind::Lease
    }
}

/// A lock handle from any backend.
#[derive(Debug)]
pub enum LockBackend {
    Filesystem(FilesystemLockHandle),
    Coordination(CoordinationLockHandle),
    Lease(LeaseLockHandle),
}

impl LockBackend {
    pub fn kind(&self) -> BackendKind {
        match self {
            LockBackend::Filesystem(_) => BackendKind::Filesystem,
            LockBackend::Coordination(_) => BackendKind::Coordination,
            LockBackend::Lease(_) => BackendKind::Lease,
        }
    }

    fn handle(&self) -> &dyn LockHandle {
        match self {
            LockBackend::Filesystem(h) => h,
            LockBackend::Coordination(h) => h,
            LockBackend::Lease(h) => h,
        }
    }

    fn handle_mut(&mut self) -> &mut dyn LockHandle {
        match self {
            LockBackend::Filesystem(h) => h,
            LockBackend::Coordination(h) => h,
            LockBackend::Lease(h) => h,
        }
    }
}

impl LockHandle for LockBackend {
    fn identity(&self) -> &LockIdentity {
        self.handle().identity()
    }

    fn acquire(&mut self) -> bool {
        self.handle_mut().acquire()
    }

    fn release(&mut self) -> bool {
        self.handle_mut().release()
    }

    fn is_held(&self) -> bool {
        self.handle().is_held()
    }
}

/// Builds lock handles for identities.
///
/// The coordination flag and retry policy are resolved once, from the
/// [`LockConfig`] handed to [`LockFactory::new`], and never change afterwards.
/// Non-local clients default to [`UnconfiguredClient`], which never grants a
/// lock; supply real ones with the `with_*` methods.
pub struct LockFactory {
    classifier: Arc<dyn StorageClassifier>,
    coordination_enabled: bool,
    coordination_root: String,
    retry_policy: RetryPolicy,
    coordination: Arc<dyn CoordinationClient>,
    leases: Arc<dyn LeaseClient>,
}

impl LockFactory {
    pub fn new(config: &LockConfig) -> Self {
        Self {
            classifier: Arc::new(SchemeClassifier),
            coordination_enabled: config.coordination_enabled(),
            coordination_root: config.coordination_root.clone(),
            retry_policy: config.retry_policy(),
            coordination: Arc::new(UnconfiguredClient::new("coordination")),
            leases: Arc::new(UnconfiguredClient::new("lease")),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn StorageClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_coordination_client(mut self, client: Arc<dyn CoordinationClient>) -> Self {
        self.coordination = client;
        self
    }

    pub fn with_lease_client(mut self, client: Arc<dyn LeaseClient>) -> Self {
        self.leases = client;
        self
    }

    pub fn coordination_enabled(&self) -> bool {
        self.coordination_enabled
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    /// Backend that [`LockFactory::lock`] would pick for `location`.
    pub fn backend_for(&self, location: &str) -> BackendKind {
        select_backend(
            self.classifier.classify(location),
            self.coordination_enabled,
        )
    }

    /// New, unheld handle for `identity`.
    pub fn lock(&self, identity: LockIdentity) -> LockBackend {
        let kind = self.backend_for(identity.location());
        debug!(lock = %identity, backend = kind.as_str(), "Selected lock backend");

        match kind {
            BackendKind::Filesystem => LockBackend::Filesystem(FilesystemLockHandle::new(identity)),
            BackendKind::Coordination => LockBackend::Coordination(CoordinationLockHandle::new(
                identity,
                &self.coordination_root,
                self.coordination.clone(),
            )),
            BackendKind::Lease => {
                LockBackend::Lease(LeaseLockHandle::new(identity, self.leases.clone()))
            }
        }
    }

    /// New handle for `identity` wrapped in the configured retry policy.
    pub fn retrying_lock(&self, identity: LockIdentity) -> RetryingAcquirer<LockBackend> {
        RetryingAcquirer::new(self.lock(identity), self.retry_policy)
    }
}
