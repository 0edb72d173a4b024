//! Module snapshot model for gopbind.
//!
//! Describes the exported surface of a Go package as plain data: the
//! declarations a Symbol Loader found at package scope (and the methods
//! declared on package types), each carrying a [`TypeDescriptor`] that
//! captures the native type shape.
//!
//! ## Modules
//!
//! - [`types`]: Closed type descriptor universe and signatures
//! - [`snapshot`]: `ModuleSnapshot` and its declarations
//! - [`render`]: Go source rendering of type descriptors
//! - [`loader`]: Snapshot acquisition boundary

pub mod error;
pub mod loader;
pub mod render;
pub mod snapshot;
pub mod types;

// Re-export key types for convenience
pub use error::CoreError;
pub use loader::{JsonFileLoader, SnapshotLoader};
pub use render::TypeRenderer;
pub use snapshot::{DeclKind, Declaration, LiteralKind, ModuleSnapshot, Scope};
pub use types::{BasicKind, ChanDir, NamedType, Param, Receiver, Signature, TypeDescriptor};
