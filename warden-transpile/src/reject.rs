//! Pass 1: refuse the host language's unsupervised spawn primitive.
//!
//! A task started outside a supervisor can neither be cancelled nor have
//! its error collected, which breaks the structured-concurrency guarantee
//! for the whole program. Any call spelled `spawn`, whether bare,
//! path-qualified or in method position, is therefore a fatal diagnostic
//! pointing at the offending call. The launch expansion itself emits `std::thread::spawn`,
//! but only after this pass has run.

use std::path::Path;

use syn::spanned::Spanned;
use syn::visit_mut::{self, VisitMut};
use syn::{Expr, ExprCall, ExprMethodCall};

use crate::diag::{Error, Pos};

struct RejectRawSpawn<'a> {
    unit: &'a Path,
    error: Option<Error>,
}

impl RejectRawSpawn<'_> {
    fn flag(&mut self, span: proc_macro2::Span) {
        if self.error.is_none() {
            self.error = Some(Error::RawSpawn {
                pos: Pos::of(self.unit, span),
            });
        }
    }
}

impl VisitMut for RejectRawSpawn<'_> {
    fn visit_expr_call_mut(&mut self, node: &mut ExprCall) {
        if let Expr::Path(path) = &*node.func {
            if let Some(segment) = path.path.segments.last() {
                if segment.ident == "spawn" {
                    self.flag(node.func.span());
                }
            }
        }
        visit_mut::visit_expr_call_mut(self, node);
    }

    fn visit_expr_method_call_mut(&mut self, node: &mut ExprMethodCall) {
        if node.method == "spawn" {
            self.flag(node.method.span());
        }
        visit_mut::visit_expr_method_call_mut(self, node);
    }
}

/// Walks the unit and fails on the first raw spawn, in source order.
pub(crate) fn run(unit: &Path, file: &mut syn::File) -> Result<(), Error> {
    let mut pass = RejectRawSpawn { unit, error: None };
    pass.visit_file_mut(file);
    match pass.error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
