//! Carbonlock: advisory locks for serializing storage metadata mutations.
//!
//! Writers on different processes, machines or file systems name a resource
//! (storage location plus purpose) and take a lock on it before mutating
//! table metadata, table status, running compaction and the like. The
//! backend is chosen per location; see [`locks`] for the contract and
//! [`config`] for the tunables.

pub mod config;
pub mod error;
pub mod exit_codes;
pub mod locks;
pub mod logging;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;
