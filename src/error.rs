//! Task error values aggregated by the supervisor.
//!
//! A supervised task reports its outcome as a [`TaskResult`]. The supervisor
//! retains the first [`TaskError`] it sees and hands that same value to every
//! later `wait`/`err` caller, so the payload lives behind an `Arc` and clones
//! are cheap.

use core::fmt;
use std::error::Error as StdError;
use std::sync::Arc;

/// Outcome of a supervised task.
pub type TaskResult = Result<(), TaskError>;

/// The kind of task failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The task observed cancellation and stopped early.
    Cancelled,
    /// The task failed with an application error.
    Failed,
}

struct Inner {
    kind: ErrorKind,
    message: String,
    source: Option<Arc<dyn StdError + Send + Sync + 'static>>,
}

/// A cloneable error value reported by a supervised task.
///
/// Equality compares the kind and message, which lets callers compare the
/// error drained from a supervisor against the one a task reported.
#[derive(Clone)]
pub struct TaskError {
    inner: Arc<Inner>,
}

impl TaskError {
    /// Creates an application failure with the given message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                kind: ErrorKind::Failed,
                message: message.into(),
                source: None,
            }),
        }
    }

    /// Creates the error a task reports when it stops because its token fired.
    #[must_use]
    pub fn cancelled() -> Self {
        Self {
            inner: Arc::new(Inner {
                kind: ErrorKind::Cancelled,
                message: "task cancelled".to_owned(),
                source: None,
            }),
        }
    }

    /// Wraps an arbitrary error, keeping it reachable through `source`.
    #[must_use]
    pub fn wrap<E>(source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                kind: ErrorKind::Failed,
                message: source.to_string(),
                source: Some(Arc::new(source)),
            }),
        }
    }

    /// Returns the kind of failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.inner.kind
    }

    /// Returns true if this error reports cancellation rather than failure.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.kind == ErrorKind::Cancelled
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.inner.message
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.message)
    }
}

impl fmt::Debug for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskError")
            .field("kind", &self.inner.kind)
            .field("message", &self.inner.message)
            .finish()
    }
}

impl StdError for TaskError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|source| &**source as &(dyn StdError + 'static))
    }
}

impl PartialEq for TaskError {
    fn eq(&self, other: &Self) -> bool {
        self.inner.kind == other.inner.kind && self.inner.message == other.inner.message
    }
}

impl Eq for TaskError {}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, TaskError};
    use std::error::Error as StdError;

    #[test]
    fn failed_carries_message_and_kind() {
        let err = TaskError::failed("disk on fire");
        assert_eq!(err.kind(), ErrorKind::Failed);
        assert_eq!(err.message(), "disk on fire");
        assert_eq!(err.to_string(), "disk on fire");
        assert!(!err.is_cancelled());
    }

    #[test]
    fn cancelled_is_marked_as_such() {
        let err = TaskError::cancelled();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert!(err.is_cancelled());
    }

    #[test]
    fn clones_compare_equal() {
        let err = TaskError::failed("boom");
        assert_eq!(err, err.clone());
        assert_ne!(err, TaskError::failed("bang"));
        assert_ne!(TaskError::cancelled(), TaskError::failed("task cancelled"));
    }

    #[test]
    fn wrap_preserves_the_source_chain() {
        let io = std::io::Error::other("socket gone");
        let err = TaskError::wrap(io);
        assert_eq!(err.message(), "socket gone");
        assert!(err.source().is_some());
    }
}
