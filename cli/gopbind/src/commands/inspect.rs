//! `gopbind inspect`: show what a snapshot would export without writing files.

use anyhow::{Context, Result};
use gopbind_core::SnapshotLoader;
use gopbind_export::{classify, export_package, ExportConfig, SymbolFilter};

/// Print classified symbol counts, registration counts and skip diagnostics.
pub fn run(
    loader: &dyn SnapshotLoader,
    package: &str,
    config: &ExportConfig,
    filter: &dyn SymbolFilter,
) -> Result<()> {
    let snapshot = loader
        .load(package)
        .with_context(|| format!("loading snapshot {package}"))?;
    let classified = classify(&snapshot, filter);
    let artifact = export_package(&snapshot, config, filter)
        .with_context(|| format!("exporting {}", snapshot.package_path))?;
    let report = &artifact.report;

    println!("--- {} ({}) ---", snapshot.package_path, snapshot.package_name);
    println!("  Declarations: {}", snapshot.declarations.len());
    println!();
    println!("  {:<8} {:>10} {:>10}", "", "classified", "registered");
    println!("  {:<8} {:>10} {:>10}", "consts", classified.consts.len(), report.consts);
    println!("  {:<8} {:>10} {:>10}", "vars", classified.vars.len(), report.vars);
    println!("  {:<8} {:>10} {:>10}", "types", classified.types.len(), report.types);
    println!(
        "  {:<8} {:>10} {:>10}",
        "funcs",
        classified.funcs.len(),
        report.funcs + report.funcvs
    );

    if !report.skipped.is_empty() {
        println!();
        println!("--- Skipped ({}) ---", report.skipped.len());
        for skipped in &report.skipped {
            println!("  {skipped}");
        }
    }
    Ok(())
}
