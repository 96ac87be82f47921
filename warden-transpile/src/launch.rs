//! Pass 5: expand supervised launch statements.
//!
//! A statement `launch(sup, f(args...));` erases into a block that binds the
//! supervisor, registers the task, and schedules the call on its own thread:
//!
//! ```text
//! {
//!     let __supervisor = sup.clone();
//!     __supervisor.start();
//!     std::thread::spawn({
//!         let __supervisor = __supervisor.clone();
//!         move || {
//!             let __err = f(&__supervisor.context(), args...);
//!             __supervisor.stop(__err);
//!         }
//!     });
//! }
//! ```
//!
//! `start` runs synchronously before the spawn, so a `wait` issued right
//! after the statement can never observe a drained supervisor before the
//! task has truly begun. The inner call's first argument, which pass 3 set
//! to the enclosing scope's token, is overwritten with the supervisor's own
//! derived token, so cancelling the supervisor reaches the task.

use std::path::Path;

use proc_macro2::Span;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::visit_mut::{self, VisitMut};
use syn::{
    parse_quote, token, Block, Expr, ExprBlock, ExprCall, ExprMethodCall, Ident, Stmt,
};

use crate::diag::{Error, Pos};
use crate::util::bare_expr_ident;

struct ExpandLaunch<'a> {
    unit: &'a Path,
    error: Option<Error>,
}

impl ExpandLaunch<'_> {
    fn expand(&self, directive: &ExprCall) -> Result<Block, Error> {
        if directive.args.len() != 2 {
            return Err(Error::LaunchArity {
                found: directive.args.len(),
                pos: Pos::of(self.unit, directive.func.span()),
            });
        }
        let supervisor = directive.args[0].clone();
        let Expr::Call(mut task) = directive.args[1].clone() else {
            return Err(Error::LaunchOperand {
                pos: Pos::of(self.unit, directive.args[1].span()),
            });
        };

        // Pass 3 put the enclosing scope's token in slot 0; the launched
        // task runs under the supervisor's token instead. An exempt callee
        // has no token slot yet, so the token is inserted rather than
        // overwritten there.
        let derived: Expr = parse_quote!(&__supervisor.context());
        if task.args.is_empty() {
            task.args.insert(0, derived);
        } else {
            task.args[0] = derived;
        }

        // `sup.clone()` built structurally so that a non-trivial supervisor
        // expression keeps its own precedence when printed.
        let bind = Expr::MethodCall(ExprMethodCall {
            attrs: Vec::new(),
            receiver: Box::new(supervisor),
            dot_token: token::Dot::default(),
            method: Ident::new("clone", Span::call_site()),
            turbofish: None,
            paren_token: token::Paren::default(),
            args: Punctuated::new(),
        });

        Ok(parse_quote! {{
            let __supervisor = #bind;
            __supervisor.start();
            std::thread::spawn({
                let __supervisor = __supervisor.clone();
                move || {
                    let __err = #task;
                    __supervisor.stop(__err);
                }
            });
        }})
    }
}

impl VisitMut for ExpandLaunch<'_> {
    fn visit_block_mut(&mut self, block: &mut Block) {
        for stmt in &mut block.stmts {
            let (directive, semi) = match stmt {
                Stmt::Expr(Expr::Call(call), semi) => (call, *semi),
                _ => continue,
            };
            match bare_expr_ident(&directive.func) {
                Some(ident) if ident == "launch" => {}
                _ => continue,
            }
            match self.expand(directive) {
                Ok(expanded) => {
                    *stmt = Stmt::Expr(
                        Expr::Block(ExprBlock {
                            attrs: Vec::new(),
                            label: None,
                            block: expanded,
                        }),
                        semi,
                    );
                }
                Err(error) => {
                    if self.error.is_none() {
                        self.error = Some(error);
                    }
                }
            }
        }
        visit_mut::visit_block_mut(self, block);
    }
}

/// Expands every launch statement in the unit, failing on the first
/// malformed directive in source order.
pub(crate) fn run(unit: &Path, file: &mut syn::File) -> Result<(), Error> {
    let mut pass = ExpandLaunch { unit, error: None };
    pass.visit_file_mut(file);
    match pass.error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
