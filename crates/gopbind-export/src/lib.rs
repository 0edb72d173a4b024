//! Binding generation for exposing Go packages to the Go+ runtime.
//!
//! Turns a [`ModuleSnapshot`](gopbind_core::ModuleSnapshot) into one Go
//! source file that registers the package's exported constants, variables,
//! types and functions with a runtime package instance. Each function gets
//! a generated adapter that bridges the runtime's stack-based calling
//! convention to the native call.
//!
//! ## Pipeline
//!
//! 1. [`classify`]: split declarations into symbol groups
//! 2. [`mapper`]: map types and constants to runtime kinds
//! 3. [`signature`]: break signatures into fixed params, tail and results
//! 4. [`adapter`]: synthesize adapter procedures
//! 5. [`emit`]: claim binding names and assemble the artifact
//!
//! [`export::export_package`] runs all stages for one snapshot.

pub mod adapter;
pub mod classify;
pub mod config;
pub mod constructor;
pub mod emit;
pub mod error;
pub mod export;
pub mod filter;
pub mod mapper;
pub mod report;
pub mod signature;

// Re-export key types for convenience
pub use adapter::{synthesize, AdapterPlan, ArgConversion, CallTarget, TailPlan};
pub use classify::{classify, ClassifiedPackage, FuncSymbol};
pub use config::ExportConfig;
pub use error::{ExportError, SkipReason};
pub use export::{export_from, export_package, Artifact, ARTIFACT_FILE_NAME};
pub use filter::{AcceptAll, NameFilter, SymbolFilter};
pub use report::{ExportReport, Skipped, SymbolKind};
