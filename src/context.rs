//! Cancellation tokens propagated through the transformed calling convention.
//!
//! Every function in supervised code receives a [`Context`] as its first
//! parameter and passes it on at every call site. The token is a shared,
//! one-shot, monotonic cancellation flag: once [`Context::cancel`] fires it
//! can never be un-fired, and the trigger is attributed to exactly one
//! caller. Tokens derive into children with [`Context::child`]; cancelling a
//! parent fans out to every child, while cancelling a child leaves the
//! parent untouched.
//!
//! Cancellation is advisory. Nothing preempts a task that never looks at its
//! token; it is each task's responsibility to observe the flag (directly or
//! through helpers such as [`crate::time::sleep`]) and wind down promptly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, RwLock};
use std::time::{Duration, Instant};

struct State {
    cancelled: AtomicBool,
    /// Guards the condvar; waiters re-check the flag under this lock so a
    /// concurrent `cancel` cannot slip between the check and the wait.
    wait_lock: Mutex<()>,
    wake: Condvar,
    children: RwLock<Vec<Context>>,
}

/// A shared cancellation token.
///
/// Clones observe the same flag. The root of a program is created with
/// [`Context::background`]; supervised tasks receive a token derived from
/// their supervisor.
#[derive(Clone)]
pub struct Context {
    state: Arc<State>,
}

impl Context {
    /// Creates a fresh root token that nothing has cancelled.
    #[must_use]
    pub fn background() -> Self {
        Self {
            state: Arc::new(State {
                cancelled: AtomicBool::new(false),
                wait_lock: Mutex::new(()),
                wake: Condvar::new(),
                children: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Derives a child token.
    ///
    /// Cancelling `self` cancels the child; a child derived from an
    /// already-cancelled parent starts out cancelled.
    #[must_use]
    pub fn child(&self) -> Self {
        let child = Self::background();
        self.state
            .children
            .write()
            .expect("lock poisoned")
            .push(child.clone());
        // The parent may have fired while we were registering.
        if self.is_cancelled() {
            child.cancel();
        }
        child
    }

    /// Requests cancellation.
    ///
    /// One-shot and monotonic: returns true for exactly one caller across
    /// the token's lifetime, false for every later attempt.
    pub fn cancel(&self) -> bool {
        if self
            .state
            .cancelled
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        // Any waiter that read `false` still holds `wait_lock` until it
        // blocks on the condvar; taking the lock here means the notification
        // below cannot be lost.
        drop(self.state.wait_lock.lock().expect("lock poisoned"));
        self.state.wake.notify_all();

        // Fan out to children without holding the child list lock.
        let children = {
            let children = self.state.children.read().expect("lock poisoned");
            children.clone()
        };
        for child in children {
            child.cancel();
        }
        true
    }

    /// Returns true if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Blocks the calling thread until the token is cancelled.
    pub fn cancelled(&self) {
        let mut guard = self.state.wait_lock.lock().expect("lock poisoned");
        while !self.is_cancelled() {
            guard = self.state.wake.wait(guard).expect("lock poisoned");
        }
    }

    /// Blocks until the token is cancelled or `timeout` elapses.
    ///
    /// Returns true if cancellation happened within the window.
    #[must_use]
    pub fn cancelled_within(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut guard = self.state.wait_lock.lock().expect("lock poisoned");
        while !self.is_cancelled() {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (next, _timed_out) = self
                .state
                .wake
                .wait_timeout(guard, deadline - now)
                .expect("lock poisoned");
            guard = next;
        }
        true
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
