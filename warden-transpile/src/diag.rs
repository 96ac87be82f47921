//! Fatal diagnostics for the transpiler.
//!
//! Every error here aborts the whole run: one malformed unit fails the
//! entire tree, with no partial output written for it. Diagnostics that
//! point at a construct carry a [`Pos`] so the message is human-locatable.

use core::fmt;
use std::path::{Path, PathBuf};

use proc_macro2::Span;

/// A source position, displayed as `unit:line:column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pos {
    /// Path of the unit under transformation.
    pub unit: PathBuf,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
}

impl Pos {
    pub(crate) fn of(unit: &Path, span: Span) -> Self {
        let start = span.start();
        Self {
            unit: unit.to_path_buf(),
            line: start.line,
            column: start.column + 1,
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.unit.display(), self.line, self.column)
    }
}

/// Fatal transpiler errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The unit is not syntactically valid dialect source.
    #[error("{}: parsing failed: {source}", .unit.display())]
    Parse {
        /// Path of the unit.
        unit: PathBuf,
        /// Parser diagnostic.
        source: syn::Error,
    },

    /// The unit uses the host language's unsupervised spawn primitive.
    #[error("raw task spawn is not allowed, use launch instead ({pos})")]
    RawSpawn {
        /// Position of the offending call.
        pos: Pos,
    },

    /// A launch directive was given the wrong number of operands.
    #[error("launch expects 2 arguments, has {found} ({pos})")]
    LaunchArity {
        /// Number of operands actually present.
        found: usize,
        /// Position of the directive.
        pos: Pos,
    },

    /// A launch directive's second operand is not a call expression.
    #[error("launch's second argument must be a call ({pos})")]
    LaunchOperand {
        /// Position of the operand.
        pos: Pos,
    },

    /// The mutated tree failed to re-parse; the raw output is surfaced for
    /// inspection.
    #[error("{}: formatting failed: {source}\n--- raw output ---\n{raw}", .unit.display())]
    Reformat {
        /// Path of the unit.
        unit: PathBuf,
        /// Parser diagnostic from the re-parse.
        source: syn::Error,
        /// The unformatted token text that failed to re-parse.
        raw: String,
    },

    /// Reading an input or writing an output failed.
    #[error("{}: {source}", .path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The discovery root could not be turned into a search pattern.
    #[error("walking {}: {source}", .root.display())]
    Pattern {
        /// Discovery root.
        root: PathBuf,
        /// Underlying pattern error.
        source: glob::PatternError,
    },

    /// Enumerating units under the discovery root failed.
    #[error("walking {}: {source}", .root.display())]
    Walk {
        /// Discovery root.
        root: PathBuf,
        /// Underlying walk error.
        source: glob::GlobError,
    },
}
