//! Source-to-source transpiler for the warden dialect.
//!
//! # Overview
//!
//! The warden dialect is Rust syntax plus four reserved forms: the
//! `supervisor` sentinel type, the `make(supervisor)` constructor, the
//! two-operand `launch(sup, call(..))` directive, and the `callee.raw(..)`
//! escape hatch for code outside the transformed calling convention. This
//! crate rewrites dialect units (`*.wdn`) into plain Rust that links
//! against the `warden` runtime:
//!
//! - every function type gains `__ctx: &__context::Context` as its first
//!   parameter, and every non-exempt call forwards the caller's token
//! - `make(supervisor)` becomes `__warden::Supervisor::new()`, and the
//!   sentinel type is substituted everywhere a type can appear
//! - `launch` statements erase into supervised `std::thread::spawn` blocks
//!   with start-before-schedule registration
//! - a `main` entry point is renamed and wrapped so the program root
//!   constructs the initial token
//! - the host's raw `spawn` primitive is a fatal diagnostic
//!
//! The underlying parser and printer are external collaborators: `syn`
//! parses units, `prettyplease` serializes them, and the pipeline only owns
//! the tree in between.
//!
//! # Module Structure
//!
//! - [`pipeline`]: the fixed pass ordering, rendering, and entry points
//! - [`discover`]: suffix-convention unit discovery and per-unit I/O
//! - [`diag`]: fatal, position-carrying diagnostics

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc)]

mod convention;
pub mod diag;
pub mod discover;
mod entry;
mod intrinsics;
mod launch;
pub mod pipeline;
mod reject;
mod sentinel;
mod util;

pub use diag::{Error, Pos};
pub use pipeline::{transpile_source, Flags};
