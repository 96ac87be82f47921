//! Passes 6 and 7: entry-point wrapping and import wiring.
//!
//! After pass 2 the dialect's `main` takes the synthetic token parameter,
//! which the host's program loader does not supply. Pass 6 renames it
//! `__main` and appends a fresh `main` whose only job is to construct the
//! root token and delegate. Pass 7 prepends the `use` declarations the
//! rewritten unit needs, each at most once, as requested by the flags the
//! earlier passes collected.

use syn::{parse_quote, Ident, Item};

/// Renames a top-level `fn main` to `__main` and appends the wrapper.
///
/// Returns true if the unit declared an entry point.
pub(crate) fn wrap_entry_point(file: &mut syn::File) -> bool {
    let mut has_main = false;
    for item in &mut file.items {
        if let Item::Fn(func) = item {
            if func.sig.ident == "main" {
                has_main = true;
                func.sig.ident = Ident::new("__main", func.sig.ident.span());
            }
        }
    }
    if has_main {
        file.items.push(parse_quote! {
            fn main() {
                let _ = __main(&__context::Context::background());
            }
        });
    }
    has_main
}

/// Prepends the import declarations the rewritten unit relies on.
pub(crate) fn wire_imports(file: &mut syn::File, needs_context: bool, needs_runtime: bool) {
    if needs_runtime {
        file.items.insert(0, parse_quote!(use warden as __warden;));
    }
    if needs_context {
        file.items
            .insert(0, parse_quote!(use warden::context as __context;));
    }
}
