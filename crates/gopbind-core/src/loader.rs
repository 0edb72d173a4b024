//! Snapshot acquisition boundary.
//!
//! The exporter never inspects source code itself. A [`SnapshotLoader`]
//! turns a package reference into a [`ModuleSnapshot`]; the bundled
//! [`JsonFileLoader`] reads snapshots a build tool has already dumped.

use std::path::PathBuf;

use crate::error::{CoreError, Result};
use crate::snapshot::ModuleSnapshot;

/// Acquires the declaration table for a package reference.
pub trait SnapshotLoader {
    fn load(&self, package: &str) -> Result<ModuleSnapshot>;
}

/// Loads `<root>/<package>.json`, or the path itself when it names a `.json` file.
#[derive(Debug, Clone, Default)]
pub struct JsonFileLoader {
    root: Option<PathBuf>,
}

impl JsonFileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve package references relative to `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, package: &str) -> PathBuf {
        let file = if package.ends_with(".json") {
            PathBuf::from(package)
        } else {
            PathBuf::from(format!("{package}.json"))
        };
        match &self.root {
            Some(root) if file.is_relative() => root.join(file),
            _ => file,
        }
    }
}

impl SnapshotLoader for JsonFileLoader {
    fn load(&self, package: &str) -> Result<ModuleSnapshot> {
        let path = self.resolve(package);
        if !path.is_file() {
            return Err(CoreError::InvalidSnapshot {
                detail: format!("snapshot file not found: {}", path.display()),
            });
        }
        ModuleSnapshot::load(&path)
    }
}
