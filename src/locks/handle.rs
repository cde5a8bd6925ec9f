//! The capability contract shared by every lock backend.

use super::types::LockIdentity;
use crate::error::LockFault;
use tracing::{debug, warn};

/// A lock on one [`LockIdentity`], owned by exactly one caller.
///
/// Handles move through `Unheld -> Held -> Unheld`. Both operations are
/// single, non-blocking attempts that report a plain boolean: conflicts and
/// I/O failures are logged by the backend and never surface as errors, so a
/// caller only ever branches on "got it" or "did not get it".
///
/// Methods take `&mut self`; a handle is not meant to be shared between
/// owners. Use one handle per owner and let the backend arbitrate.
pub trait LockHandle: Send {
    /// The resource this handle locks.
    fn identity(&self) -> &LockIdentity;

    /// Try once to take the lock. Returns `true` iff the lock is now held.
    fn acquire(&mut self) -> bool;

    /// Give the lock up.
    ///
    /// Returns `true` when there was nothing to release. Any OS or client
    /// resources tied to the handle are freed whatever the result.
    fn release(&mut self) -> bool;

    /// Whether the last `acquire` succeeded and no `release` followed.
    fn is_held(&self) -> bool;
}

impl<H: LockHandle + ?Sized> LockHandle for Box<H> {
    fn identity(&self) -> &LockIdentity {
        (**self).identity()
    }

    fn acquire(&mut self) -> bool {
        (**self).acquire()
    }

    fn release(&mut self) -> bool {
        (**self).release()
    }

    fn is_held(&self) -> bool {
        (**self).is_held()
    }
}

/// Log a backend fault that is about to be collapsed to `false`.
///
/// Conflicts are the expected outcome of contention and stay at debug level.
pub(crate) fn report_fault(identity: &LockIdentity, fault: &LockFault) {
    if fault.is_conflict() {
        debug!(lock = %identity, "{}", fault);
    } else {
        warn!(lock = %identity, "{}", fault);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify object safety.
    fn _assert_dyn_lock_handle(_: &dyn LockHandle) {}
}
