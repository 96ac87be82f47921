//! Shared syntax-tree inspection helpers for the rewrite passes.

use syn::{Expr, Ident, Path, PathArguments};

/// Returns the identifier of a bare, unqualified single-segment path
/// (`foo`, but not `a::foo`, `::foo`, `foo::<T>` or `<T as X>::foo`).
pub(crate) fn bare_path_ident(path: &Path) -> Option<&Ident> {
    if path.leading_colon.is_some() || path.segments.len() != 1 {
        return None;
    }
    let segment = &path.segments[0];
    if !matches!(segment.arguments, PathArguments::None) {
        return None;
    }
    Some(&segment.ident)
}

/// Returns the identifier of an expression that is a bare path.
pub(crate) fn bare_expr_ident(expr: &Expr) -> Option<&Ident> {
    let Expr::Path(path) = expr else { return None };
    if path.qself.is_some() {
        return None;
    }
    bare_path_ident(&path.path)
}
