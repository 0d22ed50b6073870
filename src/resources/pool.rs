//! Capacity-gated resource pool
//!
//! A counting semaphore over a fixed capacity. Admission is decided inside a
//! short critical section; the permit is then held for the service time with
//! the pool's lock released, so several holders can be inside at once.

use crate::types::ResourceKind;
use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors returned by pool admission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The pool was closed while the caller was waiting or before it asked
    #[error("{0} pool is shut down")]
    Shutdown(ResourceKind),
}

#[derive(Debug, Default)]
struct PoolState {
    in_use: usize,
    peak_in_use: usize,
    closed: bool,
    granted: u64,
    rejected: u64,
}

/// Bounded-capacity admission gate shared by concurrent guests
#[derive(Debug)]
pub struct ResourcePool {
    kind: ResourceKind,
    capacity: usize,
    state: Mutex<PoolState>,
    freed: Condvar,
}

/// Usage counters for one pool, taken at a single instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Which resource the pool gates
    pub kind: ResourceKind,
    /// Fixed capacity
    pub capacity: usize,
    /// Permits currently held
    pub in_use: usize,
    /// Highest number of permits ever held at once
    pub peak_in_use: usize,
    /// Permits handed out over the pool's lifetime
    pub granted: u64,
    /// Non-blocking attempts turned away because the pool was full
    pub rejected: u64,
}

impl ResourcePool {
    /// Create an open pool with the given capacity
    pub fn new(kind: ResourceKind, capacity: usize) -> Self {
        Self { kind, capacity, state: Mutex::new(PoolState::default()), freed: Condvar::new() }
    }

    /// Block until a unit of capacity is free, then take it
    pub fn acquire(&self) -> Result<Permit<'_>, PoolError> {
        let mut state = self.state.lock();
        while !state.closed && state.in_use >= self.capacity {
            self.freed.wait(&mut state);
        }
        if state.closed {
            return Err(PoolError::Shutdown(self.kind));
        }
        Ok(self.admit(&mut state))
    }

    /// Take a unit of capacity only if one is free right now
    ///
    /// Returns `Ok(None)` when the pool is saturated.
    pub fn try_acquire(&self) -> Result<Option<Permit<'_>>, PoolError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(PoolError::Shutdown(self.kind));
        }
        if state.in_use >= self.capacity {
            state.rejected += 1;
            debug!(resource = %self.kind, in_use = state.in_use, "Pool saturated");
            return Ok(None);
        }
        Ok(Some(self.admit(&mut state)))
    }

    fn admit(&self, state: &mut PoolState) -> Permit<'_> {
        state.in_use += 1;
        state.granted += 1;
        state.peak_in_use = state.peak_in_use.max(state.in_use);
        debug!(resource = %self.kind, in_use = state.in_use, capacity = self.capacity, "Permit granted");
        Permit { pool: self, released: false }
    }

    fn release_one(&self) {
        let mut state = self.state.lock();
        state.in_use = state.in_use.saturating_sub(1);
        debug!(resource = %self.kind, in_use = state.in_use, "Permit released");
        drop(state);
        self.freed.notify_one();
    }

    /// Close the pool: pending and future acquires fail with `Shutdown`
    ///
    /// Permits already held stay valid and may still be released.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        drop(state);
        self.freed.notify_all();
    }

    /// Which resource the pool gates
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Fixed capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently held
    pub fn in_use(&self) -> usize {
        self.state.lock().in_use
    }

    /// Capacity not currently held
    pub fn available(&self) -> usize {
        self.capacity.saturating_sub(self.in_use())
    }

    /// Highest number of permits ever held at once
    pub fn peak_in_use(&self) -> usize {
        self.state.lock().peak_in_use
    }

    /// Whether the pool has been closed
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Snapshot of the pool's counters
    pub fn stats(&self) -> PoolStats {
        let state = self.state.lock();
        PoolStats {
            kind: self.kind,
            capacity: self.capacity,
            in_use: state.in_use,
            peak_in_use: state.peak_in_use,
            granted: state.granted,
            rejected: state.rejected,
        }
    }
}

/// One unit of a pool's capacity, returned when dropped
#[derive(Debug)]
#[must_use = "dropping a permit releases it immediately"]
pub struct Permit<'a> {
    pool: &'a ResourcePool,
    released: bool,
}

impl Permit<'_> {
    /// Which resource this permit belongs to
    pub fn kind(&self) -> ResourceKind {
        self.pool.kind
    }

    /// Give the capacity back to the pool
    pub fn release(mut self) {
        self.released = true;
        self.pool.release_one();
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if !self.released {
            self.pool.release_one();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_acquire_and_release() {
        let pool = ResourcePool::new(ResourceKind::Bellhop, 2);
        assert_eq!(pool.available(), 2);

        let first = pool.acquire().unwrap();
        let second = pool.acquire().unwrap();
        assert_eq!(pool.in_use(), 2);
        assert_eq!(pool.available(), 0);
        assert_eq!(first.kind(), ResourceKind::Bellhop);

        first.release();
        assert_eq!(pool.in_use(), 1);
        drop(second);
        assert_eq!(pool.in_use(), 0);
        assert_eq!(pool.peak_in_use(), 2);
    }

    #[test]
    fn test_try_acquire_when_saturated() {
        let pool = ResourcePool::new(ResourceKind::BarSeat, 1);
        let held = pool.try_acquire().unwrap();
        assert!(held.is_some());
        assert!(pool.try_acquire().unwrap().is_none());

        drop(held);
        assert!(pool.try_acquire().unwrap().is_some());
        assert_eq!(pool.stats().rejected, 1);
        assert_eq!(pool.stats().granted, 2);
    }

    #[test]
    fn test_zero_capacity_never_admits() {
        let pool = ResourcePool::new(ResourceKind::BarSeat, 0);
        assert!(pool.try_acquire().unwrap().is_none());
        assert_eq!(pool.peak_in_use(), 0);
    }

    #[test]
    fn test_close_rejects_new_acquires() {
        let pool = ResourcePool::new(ResourceKind::Receptionist, 3);
        let held = pool.acquire().unwrap();
        pool.close();

        assert!(pool.is_closed());
        assert_eq!(pool.acquire().unwrap_err(), PoolError::Shutdown(ResourceKind::Receptionist));
        assert!(pool.try_acquire().is_err());

        // held permits are still returned after close
        drop(held);
        assert_eq!(pool.in_use(), 0);
    }

    #[test]
    fn test_close_wakes_blocked_acquirers() {
        let pool = ResourcePool::new(ResourceKind::Receptionist, 1);
        let held = pool.acquire().unwrap();

        thread::scope(|scope| {
            let waiter = scope.spawn(|| pool.acquire().map(|_| ()));
            thread::sleep(Duration::from_millis(30));
            pool.close();
            assert_eq!(
                waiter.join().unwrap(),
                Err(PoolError::Shutdown(ResourceKind::Receptionist))
            );
        });

        drop(held);
    }

    #[test]
    fn test_capacity_never_exceeded_under_contention() {
        let capacity = 3;
        let pool = ResourcePool::new(ResourceKind::Housekeeper, capacity);
        let inside = AtomicUsize::new(0);
        let max_inside = AtomicUsize::new(0);

        thread::scope(|scope| {
            for _ in 0..12 {
                scope.spawn(|| {
                    for _ in 0..5 {
                        let permit = pool.acquire().unwrap();
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        max_inside.fetch_max(now, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(1));
                        inside.fetch_sub(1, Ordering::SeqCst);
                        permit.release();
                    }
                });
            }
        });

        assert!(max_inside.load(Ordering::SeqCst) <= capacity);
        assert!(pool.peak_in_use() <= capacity);
        assert_eq!(pool.in_use(), 0);
        assert_eq!(pool.stats().granted, 60);
    }
}
