//! Debug-only reentrancy guard.
//!
//! Detects a thread entering a bucket it already holds locked. Bucket locks
//! are not reentrant, so a callback that calls back into its own bucket
//! would deadlock; in debug builds the nested entry panics instead. In
//! release builds this compiles to a zero-cost no-op.
//!
//! Ownership is recorded as a per-thread tag: the address of a thread-local,
//! which is non-zero and distinct for every live thread.

#[cfg(not(debug_assertions))]
use core::marker::PhantomData;
#[cfg(debug_assertions)]
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(debug_assertions)]
const UNOWNED: usize = 0;

#[cfg(debug_assertions)]
fn current_thread_tag() -> usize {
    thread_local! {
        static TAG: u8 = const { 0 };
    }
    TAG.with(|t| t as *const u8 as usize)
}

/// Per-instance reentrancy tracker. Embed this next to the lock it guards:
/// call `check()` before acquiring the lock and keep the guard returned by
/// `enter()` alive until just before releasing it.
#[derive(Debug)]
pub struct DebugReentrancy {
    #[cfg(debug_assertions)]
    owner: AtomicUsize,
}

impl DebugReentrancy {
    /// Create a new reentrancy tracker. Const so it can be a field default.
    pub const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            owner: AtomicUsize::new(UNOWNED),
        }
    }

    /// Panics in debug builds if the calling thread is already inside.
    #[inline]
    pub fn check(&self) {
        #[cfg(debug_assertions)]
        {
            // Only the owning thread ever stores its own tag, so a relaxed
            // load is enough to see it.
            let owner = self.owner.load(Ordering::Relaxed);
            assert!(
                owner != current_thread_tag(),
                "reentrancy detected: nested entry into a locked bucket"
            );
        }
    }

    /// Record the calling thread as the owner. Must only be called while the
    /// guarded lock is held.
    #[inline]
    pub fn enter(&self) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            self.owner.store(current_thread_tag(), Ordering::Relaxed);
            ReentrancyGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            ReentrancyGuard { _z: PhantomData }
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by `DebugReentrancy::enter`.
pub struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl<'a> Drop for ReentrancyGuard<'a> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert_eq!(
                self.owner.owner.load(Ordering::Relaxed),
                current_thread_tag()
            );
            self.owner.owner.store(UNOWNED, Ordering::Relaxed);
        }
    }
}
