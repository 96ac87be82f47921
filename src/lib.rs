//! Warden: structured concurrency runtime for the warden dialect.
//!
//! # Overview
//!
//! Warden is the runtime half of a two-piece system. The companion
//! `warden-transpile` tool rewrites warden dialect sources (`*.wdn`) into
//! plain Rust: every function gains a cancellation token as its first
//! parameter, every call site forwards it, and `launch(sup, f(..))`
//! statements expand into supervised thread spawns. The expanded code links
//! against this crate.
//!
//! # Core Guarantees
//!
//! - **No orphan tasks**: every launched task is registered with its
//!   supervisor before it starts and deregistered exactly once when it
//!   finishes, success or failure
//! - **First error wins**: a supervisor retains the first failure reported
//!   by any of its tasks and never overwrites it
//! - **Cancellation fan-out**: the first failure (or an explicit `close`)
//!   fires the supervisor's token, which every task under it can observe
//! - **One-shot cancellation**: tokens trigger at most once and never
//!   un-trigger
//! - **Loud misuse**: operating on a never-created supervisor handle panics
//!   at the point of use; only `close` tolerates it, to support
//!   unconditional cleanup
//!
//! # Module Structure
//!
//! - [`context`]: cancellation tokens (root, child derivation, waits)
//! - [`supervisor`]: the supervised task group handle
//! - [`error`]: cloneable task error values
//! - [`time`]: cancellation-aware sleeping

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

pub mod context;
pub mod error;
pub mod supervisor;
pub mod time;

pub use context::Context;
pub use error::{ErrorKind, TaskError, TaskResult};
pub use supervisor::Supervisor;
