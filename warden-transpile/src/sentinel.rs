//! Pass 4: substitute the supervisor sentinel type.
//!
//! Dialect code names the supervisor type with the reserved identifier
//! `supervisor`. One generic type traversal replaces every such reference
//! with the concrete runtime type, wherever a type can appear (struct
//! fields, let/const/static ascriptions, type aliases, casts, generic
//! arguments, fn-pointer parameters), plus the path of a `supervisor { .. }`
//! struct literal, which is the one type reference that lives in expression
//! position. Exhaustiveness falls out of the traversal rather than a
//! per-node-kind switch.

use syn::visit_mut::{self, VisitMut};
use syn::{parse_quote, ExprStruct, Type};

use crate::util::bare_path_ident;

const SENTINEL: &str = "supervisor";

/// The substitution pass.
#[derive(Default)]
pub(crate) struct SubstituteSentinel {
    /// True once any reference was rewritten; gates the runtime import.
    pub(crate) substituted: bool,
}

impl VisitMut for SubstituteSentinel {
    fn visit_type_mut(&mut self, ty: &mut Type) {
        if let Type::Path(path) = ty {
            if path.qself.is_none()
                && bare_path_ident(&path.path).is_some_and(|ident| ident == SENTINEL)
            {
                *ty = parse_quote!(__warden::Supervisor);
                self.substituted = true;
                return;
            }
        }
        visit_mut::visit_type_mut(self, ty);
    }

    fn visit_expr_struct_mut(&mut self, node: &mut ExprStruct) {
        if node.qself.is_none()
            && bare_path_ident(&node.path).is_some_and(|ident| ident == SENTINEL)
        {
            node.path = parse_quote!(__warden::Supervisor);
            self.substituted = true;
        }
        visit_mut::visit_expr_struct_mut(self, node);
    }
}
