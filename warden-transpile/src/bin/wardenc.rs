//! The warden dialect transpiler CLI.
//!
//! `wardenc [directory]` transpiles every `*.wdn` unit under the directory
//! (default: the current one) into a sibling `.rs` file. Usage errors exit
//! with clap's status 2; a failing unit aborts the run with status 1.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Transpile warden dialect units into Rust.
#[derive(Parser, Debug)]
#[command(name = "wardenc", version, about = "Warden dialect transpiler")]
struct Cli {
    /// Root directory to scan for `*.wdn` units.
    #[arg(default_value = ".")]
    root: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    match warden_transpile::discover::transpile_tree(&cli.root) {
        Ok(written) => {
            tracing::info!(written, "transpilation complete");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("wardenc: {err}");
            ExitCode::FAILURE
        }
    }
}
