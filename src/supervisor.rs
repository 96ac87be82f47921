//! The supervisor: tracks launched tasks, aggregates their first failure,
//! and cancels outstanding siblings when one of them fails.
//!
//! # Lifecycle
//!
//! A supervisor is **active** from [`Supervisor::new`]. It starts
//! **cancelling** the instant a task reports the first failure (or when the
//! creator calls [`Supervisor::close`]): the supervisor's token fires and
//! every task holding a derived token observes it. It is **closed** once the
//! pending count has drained back to zero and the creator has called the
//! terminal `wait`/`close` operation.
//!
//! # Handle validity
//!
//! `Supervisor` is a cheap cloneable handle. `Supervisor::default()` is the
//! *never-created* handle, the rendition of a declared-but-unassigned
//! supervisor variable in dialect code. Every operation except `close`
//! treats such a handle as programmer misuse and panics at the point of use;
//! `close` alone is a no-op, so it can serve as an unconditional cleanup
//! step on paths where creation may not have happened.
//!
//! # Internal calling convention
//!
//! [`Supervisor::start`], [`Supervisor::stop`] and [`Supervisor::context`]
//! are invoked by transpiler-generated launch blocks and take no token.
//! [`Supervisor::wait`], [`Supervisor::err`] and [`Supervisor::close`] are
//! reached from dialect call sites, which pass the caller's token under the
//! transformed calling convention; the token is accepted and ignored.

use core::fmt;
use std::sync::{Arc, Condvar, Mutex};

use crate::context::Context;
use crate::error::{TaskError, TaskResult};

const INVALID_HANDLE: &str = "supervisor handle used before creation";

struct State {
    /// Launched-but-not-finished tasks. `start` increments before the task
    /// body may run; `stop` decrements exactly once per task.
    pending: usize,
    /// First error reported by any task. Never overwritten once set.
    first_error: Option<TaskError>,
}

struct Inner {
    token: Context,
    state: Mutex<State>,
    drained: Condvar,
}

/// Handle to a group of supervised tasks.
#[derive(Clone, Default)]
pub struct Supervisor {
    inner: Option<Arc<Inner>>,
}

impl Supervisor {
    /// Creates an active supervisor with a fresh cancellation token, no
    /// pending tasks and no recorded error.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Some(Arc::new(Inner {
                token: Context::background(),
                state: Mutex::new(State {
                    pending: 0,
                    first_error: None,
                }),
                drained: Condvar::new(),
            })),
        }
    }

    fn inner(&self) -> &Inner {
        self.inner.as_deref().expect(INVALID_HANDLE)
    }

    /// Registers a task about to be scheduled.
    ///
    /// Must be called before the task body can run, so a `wait` issued
    /// right after a launch can never observe a drained supervisor while
    /// the task is still on its way in.
    ///
    /// # Panics
    ///
    /// Panics on a never-created handle.
    pub fn start(&self) {
        let inner = self.inner();
        let mut state = inner.state.lock().expect("lock poisoned");
        state.pending += 1;
    }

    /// Records a finished task and its outcome.
    ///
    /// The first `Err` to arrive is retained and fires the supervisor's
    /// token; an `Ok` never counts as the first error. Setting the error and
    /// decrementing the pending count happen under one lock, so two failing
    /// tasks cannot both win and no reader can observe a half-applied stop.
    ///
    /// # Panics
    ///
    /// Panics on a never-created handle, or on a `stop` without a matching
    /// `start`.
    pub fn stop(&self, result: TaskResult) {
        let inner = self.inner();
        let mut state = inner.state.lock().expect("lock poisoned");
        if state.first_error.is_none() {
            if let Err(err) = result {
                state.first_error = Some(err);
                inner.token.cancel();
            }
        }
        assert!(state.pending > 0, "stop without a matching start");
        state.pending -= 1;
        if state.pending == 0 {
            inner.drained.notify_all();
        }
    }

    /// Blocks until every launched task has finished, then returns the
    /// first recorded error, if any.
    ///
    /// Intended for a single draining caller.
    ///
    /// # Panics
    ///
    /// Panics on a never-created handle.
    pub fn wait(&self, _ctx: &Context) -> TaskResult {
        let inner = self.inner();
        let mut state = inner.state.lock().expect("lock poisoned");
        while state.pending > 0 {
            state = inner.drained.wait(state).expect("lock poisoned");
        }
        match &state.first_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Non-blocking snapshot of the first recorded error.
    ///
    /// Suitable for periodic health polling; does not wait for tasks to
    /// drain.
    ///
    /// # Panics
    ///
    /// Panics on a never-created handle.
    #[must_use]
    pub fn err(&self, _ctx: &Context) -> Option<TaskError> {
        self.inner()
            .state
            .lock()
            .expect("lock poisoned")
            .first_error
            .clone()
    }

    /// Returns the supervisor's token, handed to every launched task.
    ///
    /// # Panics
    ///
    /// Panics on a never-created handle.
    #[must_use]
    pub fn context(&self) -> Context {
        self.inner().token.clone()
    }

    /// Cancels all tasks and blocks until they drain, discarding the error.
    ///
    /// Safe on a never-created handle, where it does nothing.
    pub fn close(&self, ctx: &Context) {
        let Some(inner) = self.inner.as_deref() else {
            return;
        };
        inner.token.cancel();
        let _ = self.wait(ctx);
    }
}

impl fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            None => f.write_str("Supervisor(uninitialized)"),
            Some(inner) => match inner.state.try_lock() {
                Ok(state) => f
                    .debug_struct("Supervisor")
                    .field("pending", &state.pending)
                    .field("failed", &state.first_error.is_some())
                    .finish(),
                Err(_) => f.write_str("Supervisor(busy)"),
            },
        }
    }
}
