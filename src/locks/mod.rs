//! Locking subsystem for carbonlock.
//!
//! A caller names a resource with a [`LockIdentity`] (storage location plus
//! [`LockPurpose`]), asks a [`LockFactory`] for a handle, and drives it
//! through the [`LockHandle`] contract:
//!
//! ```no_run
//! use carbonlock::config::LockConfig;
//! use carbonlock::locks::{LockFactory, LockHandle, LockIdentity, LockPurpose};
//!
//! let factory = LockFactory::new(&LockConfig::default());
//! let mut lock = factory.retrying_lock(LockIdentity::new("/data/t1", LockPurpose::Metadata));
//!
//! if lock.acquire() {
//!     // mutate table metadata
//!     lock.release();
//! }
//! ```
//!
//! # Backends
//!
//! - Local paths: exclusive advisory lock on a lock file
//! - Shared storage with the coordination service enabled: ephemeral node
//! - Shared storage otherwise: single-writer lease
//!
//! # Failure Model
//!
//! `acquire` and `release` return booleans. Conflicts and I/O failures are
//! logged through `tracing` and never propagate.

mod coordination;
mod factory;
mod handle;
mod lease;
mod local;
pub mod memory;
mod metadata;
mod retry;
mod types;


// Re-export public API
pub use coordination::{node_path, CoordinationClient, CoordinationLockHandle};
pub use factory::{select_backend, BackendKind, LockBackend, LockFactory};
pub use handle::LockHandle;
pub use lease::{LeaseClient, LeaseLockHandle};
pub use local::FilesystemLockHandle;
pub use metadata::{read_holder, LockMetadata};
pub use retry::{RetryPolicy, RetryingAcquirer, DEFAULT_ATTEMPTS, DEFAULT_INTERVAL};
pub use types::{LockIdentity, LockPurpose};
