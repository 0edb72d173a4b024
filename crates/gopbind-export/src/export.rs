//! Package export pipeline.

use gopbind_core::{ModuleSnapshot, SnapshotLoader, TypeRenderer};

use crate::adapter::synthesize;
use crate::classify::classify;
use crate::config::ExportConfig;
use crate::constructor::{has_constructor, ZeroConstructor};
use crate::emit::Emitter;
use crate::error::{ExportError, Result};
use crate::filter::SymbolFilter;
use crate::mapper::TypeMapping;
use crate::report::{ExportReport, SymbolKind};

/// File name of the generated registration source.
pub const ARTIFACT_FILE_NAME: &str = "exports.go";

/// The generated registration source for one package.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub package_path: String,
    pub file_name: String,
    pub text: String,
    pub report: ExportReport,
}

impl Artifact {
    /// Output path relative to the output root: `<package_path>/exports.go`.
    pub fn relative_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.package_path).join(&self.file_name)
    }
}

/// Export one package snapshot.
///
/// Per-symbol problems never fail the export; they end up in
/// [`Artifact::report`]. Only an empty declaration table is fatal.
pub fn export_package(
    snapshot: &ModuleSnapshot,
    config: &ExportConfig,
    filter: &dyn SymbolFilter,
) -> Result<Artifact> {
    if snapshot.declarations.is_empty() {
        return Err(ExportError::EmptySnapshot {
            package: snapshot.package_path.clone(),
        });
    }
    tracing::info!(package = %snapshot.package_path, "exporting package");

    let classified = classify(snapshot, filter);
    let renderer = TypeRenderer::new(&snapshot.package_path, &snapshot.package_name);
    let mut emitter = Emitter::new(config, &renderer);
    emitter.report_mut().skipped.extend(classified.skipped.iter().cloned());

    for c in &classified.consts {
        emitter.add_const(c);
    }
    for v in &classified.vars {
        emitter.add_var(v);
    }

    let mut handles = Vec::new();
    for t in &classified.types {
        if emitter.add_type(t) == Some(TypeMapping::Handle) {
            handles.push(t.name.as_str());
        }
    }

    // Fixed-arity functions claim binding names before variadic ones.
    let (fixed, variadic): (Vec<_>, Vec<_>) =
        classified.funcs.iter().partition(|f| !f.is_variadic());
    for f in fixed {
        match synthesize(f, &renderer) {
            Ok(plan) => emitter.add_func(f, &plan),
            Err(reason) => emitter
                .report_mut()
                .skip(&f.display_name(), SymbolKind::Func, reason),
        }
    }

    if config.zero_constructors {
        for name in handles {
            if has_constructor(snapshot, name) {
                continue;
            }
            tracing::debug!(ty = name, "synthesizing zero-value constructor");
            emitter.add_constructor(&ZeroConstructor::new(name, &renderer));
        }
    }

    for f in variadic {
        match synthesize(f, &renderer) {
            Ok(plan) => emitter.add_func(f, &plan),
            Err(reason) => emitter
                .report_mut()
                .skip(&f.display_name(), SymbolKind::Func, reason),
        }
    }

    let (text, report) = emitter.finish();
    tracing::info!(
        package = %snapshot.package_path,
        emitted = report.emitted(),
        skipped = report.skipped.len(),
        "package exported"
    );
    Ok(Artifact {
        package_path: snapshot.package_path.clone(),
        file_name: ARTIFACT_FILE_NAME.to_string(),
        text,
        report,
    })
}

/// Load a package through `loader`, then export it.
pub fn export_from(
    loader: &dyn SnapshotLoader,
    package: &str,
    config: &ExportConfig,
    filter: &dyn SymbolFilter,
) -> Result<Artifact> {
    let snapshot = loader.load(package)?;
    export_package(&snapshot, config, filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::AcceptAll;
    use gopbind_core::CoreError;

    struct Missing;

    impl SnapshotLoader for Missing {
        fn load(&self, package: &str) -> gopbind_core::error::Result<ModuleSnapshot> {
            Err(CoreError::InvalidSnapshot {
                detail: format!("no snapshot for {package}"),
            })
        }
    }

    #[test]
    fn empty_snapshot_is_fatal() {
        let snap = ModuleSnapshot::new("example.com/empty", "empty", Vec::new());
        let err = export_package(&snap, &ExportConfig::default(), &AcceptAll).unwrap_err();
        assert!(matches!(err, ExportError::EmptySnapshot { ref package } if package == "example.com/empty"));
    }

    #[test]
    fn load_failures_propagate() {
        let err = export_from(&Missing, "example.com/x", &ExportConfig::default(), &AcceptAll)
            .unwrap_err();
        assert!(matches!(err, ExportError::Load(_)));
        assert!(err.to_string().contains("no snapshot for example.com/x"));
    }
}
