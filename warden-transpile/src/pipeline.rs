//! The fixed, ordered rewrite pipeline.
//!
//! One parsed unit goes through passes 1–7 exactly once, in order; each pass
//! is a full traversal and none is re-applied. The mutated tree is then
//! rendered: serialized to raw token text, re-parsed as a well-formedness
//! check, and pretty-printed. Any fatal condition aborts the unit, and with
//! it the whole run, with a position-carrying diagnostic.

use std::path::Path;

use quote::ToTokens;
use syn::visit_mut::VisitMut;

use crate::convention::{InjectContextParam, PropagateContext};
use crate::diag::Error;
use crate::sentinel::SubstituteSentinel;
use crate::{entry, launch, reject};

/// Import requirements collected while the passes run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    /// The unit references the cancellation-context facility.
    pub needs_context: bool,
    /// The unit references the supervisor runtime.
    pub needs_runtime: bool,
}

/// Applies passes 1–7 to a parsed unit in place.
pub fn rewrite(unit: &Path, file: &mut syn::File) -> Result<Flags, Error> {
    let mut flags = Flags::default();

    // 1. Unsupervised concurrency is rejected before anything is rewritten.
    reject::run(unit, file)?;

    // 2. Every function type takes the token first.
    let mut inject = InjectContextParam::default();
    inject.visit_file_mut(file);
    flags.needs_context |= inject.injected;

    // 3. Call sites forward it, modulo intrinsics, the escape hatch and
    //    supervisor construction.
    let mut propagate = PropagateContext::default();
    propagate.visit_file_mut(file);
    flags.needs_runtime |= propagate.made_supervisor;

    // 4. The sentinel type becomes the runtime supervisor type.
    let mut substitute = SubstituteSentinel::default();
    substitute.visit_file_mut(file);
    flags.needs_runtime |= substitute.substituted;

    // 5. Launch directives erase into supervised spawn blocks.
    launch::run(unit, file)?;

    // 6. The entry point is renamed and wrapped.
    flags.needs_context |= entry::wrap_entry_point(file);

    // 7. Imports, each at most once.
    entry::wire_imports(file, flags.needs_context, flags.needs_runtime);

    tracing::debug!(
        unit = %unit.display(),
        needs_context = flags.needs_context,
        needs_runtime = flags.needs_runtime,
        "pipeline complete"
    );
    Ok(flags)
}

/// Renders a rewritten tree to formatted source text.
///
/// The tree is serialized to raw token text and re-parsed before
/// pretty-printing; a re-parse failure means the pipeline produced an
/// invalid tree, and the diagnostic carries the raw text for inspection.
pub fn render(unit: &Path, file: &syn::File) -> Result<String, Error> {
    let raw = file.to_token_stream().to_string();
    let reparsed = syn::parse_file(&raw).map_err(|source| Error::Reformat {
        unit: unit.to_path_buf(),
        source,
        raw: raw.clone(),
    })?;
    Ok(prettyplease::unparse(&reparsed))
}

/// Parses, rewrites and renders one unit of dialect source.
pub fn transpile_source(unit: &Path, source: &str) -> Result<String, Error> {
    let mut file = syn::parse_file(source).map_err(|source| Error::Parse {
        unit: unit.to_path_buf(),
        source,
    })?;
    rewrite(unit, &mut file)?;
    render(unit, &file)
}
