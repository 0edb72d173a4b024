//! `gopbind export`: generate `exports.go` files for package snapshots.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gopbind_core::SnapshotLoader;
use gopbind_export::{export_package, Artifact, ExportConfig, SymbolFilter};

/// Outcome counts of one export batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub written: Vec<PathBuf>,
    /// Packages left out because their path is internal or vendored.
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

/// Whether a package path has an `internal` or `vendor` segment.
pub fn is_private_package(path: &str) -> bool {
    path.split('/').any(|seg| seg == "internal" || seg == "vendor")
}

/// Export each package reference and write the artifacts under `out_dir`.
///
/// A failing package is reported and the batch continues.
pub fn run(
    loader: &dyn SnapshotLoader,
    packages: &[String],
    out_dir: &Path,
    config: &ExportConfig,
    filter: &dyn SymbolFilter,
    include_internal: bool,
) -> ExportSummary {
    let mut summary = ExportSummary::default();
    for package in packages {
        match export_one(loader, package, out_dir, config, filter, include_internal) {
            Ok(Some(path)) => summary.written.push(path),
            Ok(None) => summary.skipped.push(package.clone()),
            Err(e) => {
                tracing::error!(package = %package, "export failed: {e:#}");
                eprintln!("FAIL {package}: {e:#}");
                summary.failed.push(package.clone());
            }
        }
    }
    summary
}

fn export_one(
    loader: &dyn SnapshotLoader,
    package: &str,
    out_dir: &Path,
    config: &ExportConfig,
    filter: &dyn SymbolFilter,
    include_internal: bool,
) -> Result<Option<PathBuf>> {
    let snapshot = loader
        .load(package)
        .with_context(|| format!("loading snapshot {package}"))?;
    if !include_internal && is_private_package(&snapshot.package_path) {
        tracing::info!(package = %snapshot.package_path, "skipping internal package");
        println!("skip {}", snapshot.package_path);
        return Ok(None);
    }

    let artifact = export_package(&snapshot, config, filter)
        .with_context(|| format!("exporting {}", snapshot.package_path))?;
    for skipped in &artifact.report.skipped {
        println!("  warning, {skipped}");
    }
    let path = write_artifact(out_dir, &artifact)?;
    println!(
        "ok   {} -> {} ({} registrations, {} skipped)",
        artifact.package_path,
        path.display(),
        artifact.report.emitted(),
        artifact.report.skipped.len()
    );
    Ok(Some(path))
}

/// Write an artifact to `<out_dir>/<package_path>/exports.go`.
pub fn write_artifact(out_dir: &Path, artifact: &Artifact) -> Result<PathBuf> {
    let path = out_dir.join(artifact.relative_path());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(&path, &artifact.text).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
