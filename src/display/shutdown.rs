//! The stop handshake between a render loop and whatever interrupts it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};

/// Two-sided shutdown handshake.
///
/// An interrupting context (a Ctrl-C handler, a window-close callback)
/// calls [`request_stop`](Self::request_stop) and blocks. The owning
/// thread polls [`should_stop`](Self::should_stop) once per frame, tears
/// the display down and calls [`acknowledge`](Self::acknowledge), which
/// releases the requester. The screen buffer is therefore never freed out
/// from under an in-flight render.
///
/// The wait loops on a predicate under the mutex, so a stop requested
/// after the acknowledge has already happened returns immediately, and a
/// spurious condvar wakeup goes back to sleep.
#[derive(Debug, Default)]
pub struct ShutdownCoordinator {
    stop: AtomicBool,
    done: Mutex<bool>,
    finished: Condvar,
}

impl ShutdownCoordinator {
    /// Create a coordinator with no stop requested.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stop: AtomicBool::new(false),
            done: Mutex::new(false),
            finished: Condvar::new(),
        }
    }

    /// Whether a stop has been requested. Checked once per frame by the
    /// owning thread; lock-free.
    #[inline]
    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Request a stop and block until the owning thread acknowledges.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
        let mut done = self.done.lock().unwrap_or_else(PoisonError::into_inner);
        while !*done {
            done = self
                .finished
                .wait(done)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Mark teardown complete and wake every blocked requester. Idempotent.
    pub fn acknowledge(&self) {
        let mut done = self.done.lock().unwrap_or_else(PoisonError::into_inner);
        *done = true;
        self.finished.notify_all();
    }

    /// Whether teardown has been acknowledged.
    pub fn is_acknowledged(&self) -> bool {
        *self.done.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
