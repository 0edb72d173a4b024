//! gopbind: generate Go+ runtime bindings for Go package snapshots.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use gopbind_core::JsonFileLoader;
use tracing_subscriber::EnvFilter;

use manifest::GopbindManifest;

#[derive(Parser)]
#[command(name = "gopbind", version, about = "Go+ binding generator for Go packages")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate exports.go for one or more package snapshots
    Export {
        /// Snapshot files or package paths (resolved as <root>/<path>.json)
        #[arg(required = true)]
        snapshots: Vec<String>,
        /// Output directory (default: current directory)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Directory package paths are resolved against
        #[arg(long)]
        root: Option<PathBuf>,
        /// Manifest file (default: nearest gopbind.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Export only these symbols (exact names or Prefix* patterns)
        #[arg(long)]
        only: Vec<String>,
        /// Also export internal and vendored packages
        #[arg(long)]
        include_internal: bool,
    },
    /// Show what a snapshot would export without writing files
    Inspect {
        /// Snapshot file or package path
        snapshot: String,
        /// Directory package paths are resolved against
        #[arg(long)]
        root: Option<PathBuf>,
        /// Manifest file (default: nearest gopbind.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Inspect only these symbols (exact names or Prefix* patterns)
        #[arg(long)]
        only: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Export {
            snapshots,
            out,
            root,
            config,
            only,
            include_internal,
        } => {
            let manifest = load_manifest(&cwd, config.as_deref())?;
            let filter = manifest.filter(&only);
            let out_dir = out.unwrap_or_else(|| cwd.clone());
            let summary = commands::export::run(
                &loader(root),
                &snapshots,
                &out_dir,
                &manifest.export,
                &filter,
                include_internal,
            );
            println!(
                "{} written, {} skipped, {} failed",
                summary.written.len(),
                summary.skipped.len(),
                summary.failed.len()
            );
            if !summary.failed.is_empty() {
                anyhow::bail!("{} package(s) failed to export", summary.failed.len());
            }
            Ok(())
        }

        Commands::Inspect {
            snapshot,
            root,
            config,
            only,
        } => {
            let manifest = load_manifest(&cwd, config.as_deref())?;
            let filter = manifest.filter(&only);
            commands::inspect::run(&loader(root), &snapshot, &manifest.export, &filter)
        }
    }
}

fn loader(root: Option<PathBuf>) -> JsonFileLoader {
    match root {
        Some(root) => JsonFileLoader::with_root(root),
        None => JsonFileLoader::new(),
    }
}

/// Load an explicit manifest, or the nearest `gopbind.toml` upward from `cwd`.
/// Falls back to defaults when none is found.
fn load_manifest(cwd: &Path, explicit: Option<&Path>) -> anyhow::Result<GopbindManifest> {
    if let Some(path) = explicit {
        return GopbindManifest::load(path);
    }
    Ok(GopbindManifest::find_and_load(cwd)?
        .map(|(manifest, _)| manifest)
        .unwrap_or_default())
}
