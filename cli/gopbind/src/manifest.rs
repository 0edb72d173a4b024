//! `gopbind.toml` manifest parsing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gopbind_export::{ExportConfig, NameFilter};
use serde::{Deserialize, Serialize};

/// File name searched for when no `--config` is given.
pub const MANIFEST_FILE: &str = "gopbind.toml";

/// The top-level manifest structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GopbindManifest {
    /// Naming and feature switches for generated files.
    pub export: ExportConfig,
    /// Symbol selection.
    pub filter: FilterConfig,
}

/// `[filter]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Exact names or `Prefix*` patterns. Empty exports everything.
    pub only: Vec<String>,
}

impl GopbindManifest {
    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Search upward from `start_dir` for a `gopbind.toml` file and load it.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                return Ok(Some((Self::load(&candidate)?, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing gopbind.toml")
    }

    /// Build the symbol filter, with command-line names taking precedence.
    pub fn filter(&self, only: &[String]) -> NameFilter {
        if only.is_empty() {
            NameFilter::from_patterns(&self.filter.only)
        } else {
            NameFilter::from_patterns(only)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gopbind_export::SymbolFilter;

    #[test]
    fn empty_manifest_uses_defaults() {
        let manifest = GopbindManifest::from_str("").unwrap();
        assert_eq!(manifest.export, ExportConfig::default());
        assert!(manifest.filter(&[]).is_empty());
    }

    #[test]
    fn parses_export_and_filter_tables() {
        let manifest = GopbindManifest::from_str(
            r#"
[export]
runtime_alias = "qlang"
zero_constructors = false

[filter]
only = ["Add", "Point*"]
"#,
        )
        .unwrap();
        assert_eq!(manifest.export.runtime_alias, "qlang");
        assert_eq!(manifest.export.instance, "I");
        assert!(!manifest.export.zero_constructors);

        let filter = manifest.filter(&[]);
        assert!(filter.accept("Point.Scale"));
        assert!(!filter.accept("Sub"));

        let overridden = manifest.filter(&["Sub".to_string()]);
        assert!(overridden.accept("Sub"));
        assert!(!overridden.accept("Add"));
    }

    #[test]
    fn finds_manifest_in_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "[export]\ninstance = \"P\"\n").unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let (manifest, found) = GopbindManifest::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(manifest.export.instance, "P");
        assert_eq!(found, dir.path());
    }

    #[test]
    fn invalid_toml_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        std::fs::write(&path, "[export\n").unwrap();
        let err = GopbindManifest::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }
}
