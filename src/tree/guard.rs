//! Single-writer critical section around structural mutations
//!
//! Insert and delete read interval bounds and then shift them across several
//! statements, so no two of them may interleave. Tree assembly takes the shared side
//! of the same lock for the whole traversal so it never observes a half-shifted tree.

use std::sync::atomic::{AtomicU8, Ordering};
use std::thread::{self, ThreadId};
use std::time::Duration;

use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::error::{ServerError, ServerResult};

const IDLE: u8 = 0;
const LOCKED: u8 = 1;

/// Observable guard state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// No mutation in flight
    Idle,
    /// A mutation holds the exclusive section
    Locked,
}

/// Exclusive section for mutations, shared section for reads
#[derive(Debug)]
pub struct MutationGuard {
    lock: RwLock<()>,
    state: AtomicU8,
    holder: Mutex<Option<ThreadId>>,
    timeout: Duration,
}

/// Proof that the caller owns the exclusive section
///
/// Dropping the permit returns the guard to `Idle`.
#[derive(Debug)]
pub struct MutationPermit<'a> {
    guard: &'a MutationGuard,
    _write: RwLockWriteGuard<'a, ()>,
}

/// Shared section held while a tree is assembled
#[derive(Debug)]
pub struct ReadPermit<'a> {
    _read: RwLockReadGuard<'a, ()>,
}

impl MutationGuard {
    /// Create a guard whose waits give up after `timeout`
    pub fn new(timeout: Duration) -> Self {
        Self {
            lock: RwLock::new(()),
            state: AtomicU8::new(IDLE),
            holder: Mutex::new(None),
            timeout,
        }
    }

    /// Current state
    pub fn state(&self) -> GuardState {
        match self.state.load(Ordering::Acquire) {
            LOCKED => GuardState::Locked,
            _ => GuardState::Idle,
        }
    }

    /// Enter the exclusive section, waiting up to the configured timeout
    ///
    /// # Panics
    /// If the calling thread already holds a mutation permit. A mutation nested in a
    /// mutation is a programming error.
    pub fn mutate(&self) -> ServerResult<MutationPermit<'_>> {
        self.assert_not_nested();
        let write = self.lock.try_write_for(self.timeout).ok_or_else(|| {
            ServerError::ConcurrencyViolation(format!(
                "mutation lock not acquired within {} ms",
                self.timeout.as_millis()
            ))
        })?;
        Ok(self.enter(write))
    }

    /// Enter the exclusive section only if nothing else holds it
    pub fn try_mutate(&self) -> ServerResult<MutationPermit<'_>> {
        self.assert_not_nested();
        let write = self.lock.try_write().ok_or_else(|| {
            ServerError::ConcurrencyViolation("another mutation is in flight".into())
        })?;
        Ok(self.enter(write))
    }

    /// Enter the shared section, waiting up to the configured timeout
    pub fn read(&self) -> ServerResult<ReadPermit<'_>> {
        let read = self.lock.try_read_for(self.timeout).ok_or_else(|| {
            ServerError::ConcurrencyViolation(format!(
                "read lock not acquired within {} ms",
                self.timeout.as_millis()
            ))
        })?;
        Ok(ReadPermit { _read: read })
    }

    fn assert_not_nested(&self) {
        let current = thread::current().id();
        let nested = *self.holder.lock() == Some(current);
        if nested {
            panic!("nested tree mutation on {:?}", current);
        }
    }

    fn enter<'a>(&'a self, write: RwLockWriteGuard<'a, ()>) -> MutationPermit<'a> {
        *self.holder.lock() = Some(thread::current().id());
        self.state.store(LOCKED, Ordering::Release);
        debug!("mutation lock acquired");
        MutationPermit {
            guard: self,
            _write: write,
        }
    }
}

impl Drop for MutationPermit<'_> {
    fn drop(&mut self) {
        *self.guard.holder.lock() = None;
        self.guard.state.store(IDLE, Ordering::Release);
        debug!("mutation lock released");
    }
}
