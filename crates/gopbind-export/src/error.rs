//! Export error types.
//!
//! Two tiers: [`ExportError`] aborts a package export, [`SkipReason`]
//! excludes a single symbol while the rest of the batch continues.

use gopbind_core::CoreError;

/// Errors that abort the export of a whole package.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The snapshot could not be acquired.
    #[error("failed to load snapshot: {0}")]
    Load(#[from] CoreError),

    /// The declaration table holds nothing to export.
    #[error("package {package} has an empty declaration table")]
    EmptySnapshot { package: String },
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Why a single symbol was left out of the artifact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    /// A parameter or result type the host runtime cannot carry.
    #[error("unsupported {position} type {ty} ({shape})")]
    UnsupportedType {
        position: String,
        ty: String,
        shape: &'static str,
    },

    /// A parameter names a type that cannot be constructed outside its package.
    #[error("param {index} type is internal {ty}")]
    UnexportedParam { index: usize, ty: String },

    /// A method receiver whose base type has a shape methods cannot be bridged on.
    #[error("unsupported receiver shape {shape} for type {receiver}")]
    UnsupportedReceiver {
        receiver: String,
        shape: &'static str,
    },

    /// Another symbol already claimed the binding name.
    #[error("binding name {name:?} is ambiguous, already registered")]
    AmbiguousBinding { name: String },

    /// A constant whose kind has no runtime mapping.
    #[error("constant has no runtime mapping: {detail}")]
    UnmappedConstant { detail: String },

    /// A type declaration whose shape has no runtime mapping.
    #[error("type has no runtime mapping ({shape})")]
    UnmappedType { shape: &'static str },

    /// A declaration kind the classifier does not export.
    #[error("unrecognised declaration kind {kind}")]
    Unrecognised { kind: &'static str },
}
