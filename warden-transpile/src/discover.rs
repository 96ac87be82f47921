//! Unit discovery and per-unit transpilation.
//!
//! Inputs are found under a root directory by the fixed suffix convention:
//! every `*.wdn` file is a unit, and its output lands next to it with the
//! suffix replaced by `.rs`. The first failing unit aborts the whole run;
//! nothing is written for a unit that fails.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::diag::Error;
use crate::pipeline;

/// Input suffix marking a dialect unit.
pub const INPUT_SUFFIX: &str = "wdn";
/// Suffix of generated output.
pub const OUTPUT_SUFFIX: &str = "rs";

/// Transpiles every unit under `root`; returns how many were written.
pub fn transpile_tree(root: &Path) -> Result<usize, Error> {
    let pattern = format!(
        "{}/**/*.{INPUT_SUFFIX}",
        glob::Pattern::escape(&root.display().to_string())
    );
    let entries = glob::glob(&pattern).map_err(|source| Error::Pattern {
        root: root.to_path_buf(),
        source,
    })?;

    let mut written = 0;
    for entry in entries {
        let input = entry.map_err(|source| Error::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if !input.is_file() {
            continue;
        }
        transpile_unit(&input)?;
        written += 1;
    }
    Ok(written)
}

/// Transpiles one unit, writing the output next to it.
///
/// Returns the output path on success.
pub fn transpile_unit(input: &Path) -> Result<PathBuf, Error> {
    let output = output_path(input);
    info!(unit = %input.display(), "transpiling");
    let source = fs::read_to_string(input).map_err(|source| Error::Io {
        path: input.to_path_buf(),
        source,
    })?;
    let formatted = pipeline::transpile_source(input, &source)?;
    fs::write(&output, formatted).map_err(|source| Error::Io {
        path: output.clone(),
        source,
    })?;
    debug!(out = %output.display(), "wrote output");
    Ok(output)
}

fn output_path(input: &Path) -> PathBuf {
    input.with_extension(OUTPUT_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::output_path;
    use std::path::{Path, PathBuf};

    #[test]
    fn the_suffix_convention_maps_inputs_to_siblings() {
        assert_eq!(
            output_path(Path::new("proj/sub/unit.wdn")),
            PathBuf::from("proj/sub/unit.rs")
        );
    }
}
