//! Global shutdown signal
//!
//! A latch shared by every guest of a run. Once triggered it stays triggered;
//! service-time holds wait on it so a shutdown cuts them short.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Default)]
struct Latch {
    triggered: Mutex<bool>,
    wake: Condvar,
}

/// Cloneable handle to a one-way shutdown latch
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    inner: Arc<Latch>,
}

/// The hold was interrupted because shutdown was triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

impl ShutdownSignal {
    /// Create an untriggered signal
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger shutdown and wake every sleeper
    pub fn trigger(&self) {
        let mut triggered = self.inner.triggered.lock();
        if !*triggered {
            debug!("Shutdown signal triggered");
            *triggered = true;
        }
        self.inner.wake.notify_all();
    }

    /// Whether shutdown has been triggered
    pub fn is_triggered(&self) -> bool {
        *self.inner.triggered.lock()
    }

    /// Sleep for `duration`, returning early if shutdown is triggered
    pub fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        let mut triggered = self.inner.triggered.lock();
        if *triggered {
            return Err(Interrupted);
        }
        if duration.is_zero() {
            return Ok(());
        }

        // A hold too long to represent as an instant only ends on shutdown
        let Some(deadline) = Instant::now().checked_add(duration) else {
            while !*triggered {
                self.inner.wake.wait(&mut triggered);
            }
            return Err(Interrupted);
        };
        while !*triggered {
            if self.inner.wake.wait_until(&mut triggered, deadline).timed_out() {
                return if *triggered { Err(Interrupted) } else { Ok(()) };
            }
        }
        Err(Interrupted)
    }
}
