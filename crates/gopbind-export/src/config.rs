//! Export configuration.
//!
//! Naming choices for the generated file (runtime instance name, import
//! aliases) travel with each export call instead of living in globals, so
//! independent packages can be exported with different settings.

use serde::{Deserialize, Serialize};

/// Naming and feature switches for one export run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Name of the package instance variable (`var I = ...`).
    pub instance: String,
    /// Alias under which the runtime package is imported.
    pub runtime_alias: String,
    /// Import path of the runtime package.
    pub runtime_import: String,
    /// Alias under which the kind-tag package is imported.
    pub spec_alias: String,
    /// Import path of the kind-tag package.
    pub spec_import: String,
    /// Synthesize zero-value constructors for struct types without a `New<Type>` function.
    pub zero_constructors: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            instance: "I".to_string(),
            runtime_alias: "gop".to_string(),
            runtime_import: "github.com/qiniu/goplus/gop".to_string(),
            spec_alias: "qspec".to_string(),
            spec_import: "github.com/qiniu/goplus/exec.spec".to_string(),
            zero_constructors: true,
        }
    }
}

impl ExportConfig {
    /// Reference to a symbol of the kind-tag package, e.g. `qspec.TyInt`.
    pub fn spec(&self, ident: &str) -> String {
        format!("{}.{ident}", self.spec_alias)
    }

    /// Adapter context type, e.g. `*gop.Context`.
    pub fn context_type(&self) -> String {
        format!("*{}.Context", self.runtime_alias)
    }

    /// Import line for the runtime package.
    pub fn runtime_import_line(&self) -> String {
        import_line(&self.runtime_alias, &self.runtime_import)
    }

    /// Import line for the kind-tag package.
    pub fn spec_import_line(&self) -> String {
        import_line(&self.spec_alias, &self.spec_import)
    }
}

/// Omit the alias when it matches the last path segment.
fn import_line(alias: &str, path: &str) -> String {
    let base = path.rsplit('/').next().unwrap_or(path);
    if alias.is_empty() || alias == base {
        format!("{path:?}")
    } else {
        format!("{alias} {path:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_aliases() {
        let config = ExportConfig::default();
        assert_eq!(config.spec("TyInt"), "qspec.TyInt");
        assert_eq!(config.context_type(), "*gop.Context");
        assert_eq!(
            config.runtime_import_line(),
            "\"github.com/qiniu/goplus/gop\""
        );
        assert_eq!(
            config.spec_import_line(),
            "qspec \"github.com/qiniu/goplus/exec.spec\""
        );
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: ExportConfig =
            serde_json::from_str(r#"{ "runtime_alias": "qlang", "zero_constructors": false }"#)
                .unwrap();
        assert_eq!(config.runtime_alias, "qlang");
        assert_eq!(config.instance, "I");
        assert!(!config.zero_constructors);
        assert_eq!(
            config.runtime_import_line(),
            "qlang \"github.com/qiniu/goplus/gop\""
        );
    }
}
