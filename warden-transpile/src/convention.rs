//! Passes 2 and 3: the cancellation-token calling convention.
//!
//! Pass 2 prepends the synthetic `__ctx: &__context::Context` parameter to
//! every function signature and bare-fn type in the unit. Pass 3 makes call
//! sites match: every call forwards the enclosing scope's `__ctx` as its
//! first argument, unless one of the exemptions applies. The two overrides
//! (supervisor construction and the raw escape hatch) are checked before
//! the default rule, since each replaces it outright.

use syn::punctuated::Punctuated;
use syn::visit_mut::{self, VisitMut};
use syn::{
    parse_quote, BareFnArg, Expr, ExprCall, FnArg, Signature, TypeBareFn,
};

use crate::intrinsics::is_intrinsic;
use crate::util::bare_expr_ident;

/// Pass 2: inject the context parameter into every function type.
#[derive(Default)]
pub(crate) struct InjectContextParam {
    /// True once any signature was rewritten; gates the context import.
    pub(crate) injected: bool,
}

impl VisitMut for InjectContextParam {
    fn visit_signature_mut(&mut self, sig: &mut Signature) {
        let param: FnArg = parse_quote!(__ctx: &__context::Context);
        // A receiver is syntactically pinned to slot 0; the token goes
        // right behind it there, at the front everywhere else.
        let at = usize::from(matches!(sig.inputs.first(), Some(FnArg::Receiver(_))));
        sig.inputs.insert(at, param);
        self.injected = true;
        visit_mut::visit_signature_mut(self, sig);
    }

    fn visit_type_bare_fn_mut(&mut self, ty: &mut TypeBareFn) {
        let param: BareFnArg = parse_quote!(&__context::Context);
        ty.inputs.insert(0, param);
        self.injected = true;
        visit_mut::visit_type_bare_fn_mut(self, ty);
    }
}

/// Pass 3: propagate the token at call sites.
#[derive(Default)]
pub(crate) struct PropagateContext {
    /// True once a `make(supervisor)` was rewritten; gates the runtime
    /// import.
    pub(crate) made_supervisor: bool,
}

impl PropagateContext {
    fn rewrite_call(&mut self, call: &mut ExprCall) {
        if let Some(name) = bare_expr_ident(&call.func) {
            if name == "make" && call.args.len() == 1 && is_supervisor_sentinel(&call.args[0]) {
                call.func = Box::new(parse_quote!(__warden::Supervisor::new));
                call.args = Punctuated::new();
                self.made_supervisor = true;
                return;
            }
            if is_intrinsic(&name.to_string()) {
                return;
            }
        }
        call.args.insert(0, parse_quote!(__ctx));
    }
}

impl VisitMut for PropagateContext {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        match expr {
            // The raw escape hatch: `callee.raw(args)` becomes a plain call
            // of the callee, with no token and no marker left behind.
            Expr::MethodCall(marked) if marked.method == "raw" && marked.turbofish.is_none() => {
                let unwrapped = ExprCall {
                    attrs: std::mem::take(&mut marked.attrs),
                    func: marked.receiver.clone(),
                    paren_token: marked.paren_token,
                    args: std::mem::take(&mut marked.args),
                };
                *expr = Expr::Call(unwrapped);
            }
            Expr::Call(call) => self.rewrite_call(call),
            Expr::MethodCall(call) => {
                call.args.insert(0, parse_quote!(__ctx));
            }
            _ => {}
        }
        visit_mut::visit_expr_mut(self, expr);
    }
}

fn is_supervisor_sentinel(expr: &Expr) -> bool {
    bare_expr_ident(expr).is_some_and(|ident| ident == "supervisor")
}

#[cfg(test)]
mod tests {
    use super::{InjectContextParam, PropagateContext};
    use syn::visit_mut::VisitMut;

    fn inject(source: &str) -> String {
        let mut file = syn::parse_file(source).expect("test source parses");
        let mut pass = InjectContextParam::default();
        pass.visit_file_mut(&mut file);
        assert!(pass.injected);
        prettyplease::unparse(&file)
    }

    fn propagate(source: &str) -> String {
        let mut file = syn::parse_file(source).expect("test source parses");
        PropagateContext::default().visit_file_mut(&mut file);
        prettyplease::unparse(&file)
    }

    #[test]
    fn free_functions_gain_the_token_first() {
        let out = inject("fn add(a: u32, b: u32) -> u32 { a + b }");
        assert!(
            out.contains("fn add(__ctx: &__context::Context, a: u32, b: u32) -> u32"),
            "unexpected output: {out}"
        );
    }

    #[test]
    fn methods_keep_the_receiver_in_front() {
        let out = inject("impl S { fn go(&mut self, n: u32) {} }");
        assert!(
            out.contains("fn go(&mut self, __ctx: &__context::Context, n: u32)"),
            "unexpected output: {out}"
        );
    }

    #[test]
    fn trait_declarations_follow_the_convention() {
        let out = inject("trait Step { fn step(&self) -> u32; }");
        assert!(out.contains("fn step(&self, __ctx: &__context::Context) -> u32;"));
    }

    #[test]
    fn bare_fn_types_gain_a_token_slot() {
        let out = inject("struct Hook { callback: fn(u32) -> bool }");
        assert!(
            out.contains("callback: fn(&__context::Context, u32) -> bool"),
            "unexpected output: {out}"
        );
    }

    #[test]
    fn calls_forward_the_enclosing_token() {
        let out = propagate("fn f() { helper(1, 2); }");
        assert!(out.contains("helper(__ctx, 1, 2)"), "unexpected output: {out}");
    }

    #[test]
    fn qualified_calls_also_forward_the_token() {
        let out = propagate("fn f() { lib::helper(); }");
        assert!(out.contains("lib::helper(__ctx)"));
    }

    #[test]
    fn method_calls_forward_the_token() {
        let out = propagate("fn f(s: S) { s.step(7); }");
        assert!(out.contains("s.step(__ctx, 7)"), "unexpected output: {out}");
    }

    #[test]
    fn intrinsics_keep_their_argument_lists() {
        let out = propagate("fn f() -> Result<(), E> { drop(x); Ok(()) }");
        assert!(out.contains("drop(x)"), "unexpected output: {out}");
        assert!(out.contains("Ok(())"), "unexpected output: {out}");
    }

    #[test]
    fn nested_calls_inside_intrinsics_are_still_rewritten() {
        let out = propagate("fn f() { drop(helper()); }");
        assert!(out.contains("drop(helper(__ctx))"), "unexpected output: {out}");
    }

    #[test]
    fn supervisor_construction_becomes_the_runtime_constructor() {
        let mut file = syn::parse_file("fn f() { let s = make(supervisor); }").expect("parses");
        let mut pass = PropagateContext::default();
        pass.visit_file_mut(&mut file);
        assert!(pass.made_supervisor);
        let out = prettyplease::unparse(&file);
        assert!(
            out.contains("let s = __warden::Supervisor::new();"),
            "unexpected output: {out}"
        );
    }

    #[test]
    fn make_with_other_arguments_stays_exempt_but_unrewritten() {
        let mut file = syn::parse_file("fn f() { make(buffer, 16); }").expect("parses");
        let mut pass = PropagateContext::default();
        pass.visit_file_mut(&mut file);
        assert!(!pass.made_supervisor);
        let out = prettyplease::unparse(&file);
        assert!(out.contains("make(buffer, 16)"));
    }

    #[test]
    fn raw_marker_unwraps_without_a_token() {
        let out = propagate("fn f() { std::thread::sleep.raw(d); }");
        assert!(out.contains("std::thread::sleep(d)"), "unexpected output: {out}");
        assert!(!out.contains("raw"), "marker survived: {out}");
    }

    #[test]
    fn raw_marker_covers_ufcs_method_interop() {
        let out = propagate("fn f(v: Vec<u32>) { Vec::push.raw(&mut v, 1); }");
        assert!(out.contains("Vec::push(&mut v, 1)"), "unexpected output: {out}");
    }

    #[test]
    fn arguments_of_a_raw_call_still_follow_the_convention() {
        let out = propagate("fn f() { external.raw(helper()); }");
        assert!(
            out.contains("external(helper(__ctx))"),
            "unexpected output: {out}"
        );
    }

    #[test]
    fn launch_is_left_for_the_expansion_pass() {
        let out = propagate("fn f(s: S) { launch(s, worker(1)); }");
        assert!(
            out.contains("launch(s, worker(__ctx, 1))"),
            "unexpected output: {out}"
        );
    }
}
