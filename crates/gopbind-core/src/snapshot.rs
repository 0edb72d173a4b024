//! Module snapshot parsing.
//!
//! A snapshot is the immutable declaration table of one Go package, as
//! produced by a Symbol Loader. It is read once per export and never mutated
//! after [`ModuleSnapshot::parse`] returns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::{is_exported_name, Signature, TypeDescriptor};

/// The declaration table of a single package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSnapshot {
    /// Import path (e.g., "strings", "example.com/geo").
    pub package_path: String,
    /// Package name used to qualify references in generated code.
    pub package_name: String,
    /// Declarations in loader order.
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

/// The lexical parent of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Declared at package scope.
    #[default]
    Package,
    /// Declared inside a function body.
    Local,
    /// A struct field.
    Field,
    /// A method, declared with a receiver.
    Method,
}

/// Kind of a constant's literal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralKind {
    Bool,
    String,
    Int,
    Float,
    Complex,
    Unknown,
}

/// A single declaration in the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    /// Explicit export flag; derived from the name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported: Option<bool>,
    #[serde(default)]
    pub scope: Scope,
    pub kind: DeclKind,
}

/// What a declaration declares.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "decl", rename_all = "snake_case")]
pub enum DeclKind {
    Const {
        literal_kind: LiteralKind,
        /// Exact source text of the constant value (`3.14159`, `"abc"`, `-1`).
        literal_text: String,
        ty: TypeDescriptor,
    },
    Var {
        ty: TypeDescriptor,
    },
    Func {
        signature: Signature,
    },
    TypeName {
        underlying: TypeDescriptor,
    },
    Label,
    PackageName,
}

impl DeclKind {
    /// Short kind name for diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            DeclKind::Const { .. } => "const",
            DeclKind::Var { .. } => "var",
            DeclKind::Func { .. } => "func",
            DeclKind::TypeName { .. } => "type",
            DeclKind::Label => "label",
            DeclKind::PackageName => "package name",
        }
    }
}

impl Declaration {
    /// Whether the declaration is visible outside its package.
    pub fn is_exported(&self) -> bool {
        self.exported.unwrap_or_else(|| is_exported_name(&self.name))
    }

    pub fn constant(name: &str, literal_kind: LiteralKind, literal_text: &str, ty: TypeDescriptor) -> Self {
        Self::package_level(
            name,
            DeclKind::Const {
                literal_kind,
                literal_text: literal_text.to_string(),
                ty,
            },
        )
    }

    pub fn var(name: &str, ty: TypeDescriptor) -> Self {
        Self::package_level(name, DeclKind::Var { ty })
    }

    pub fn func(name: &str, signature: Signature) -> Self {
        let scope = if signature.receiver.is_some() {
            Scope::Method
        } else {
            Scope::Package
        };
        Self {
            name: name.to_string(),
            exported: None,
            scope,
            kind: DeclKind::Func { signature },
        }
    }

    pub fn type_name(name: &str, underlying: TypeDescriptor) -> Self {
        Self::package_level(name, DeclKind::TypeName { underlying })
    }

    fn package_level(name: &str, kind: DeclKind) -> Self {
        Self {
            name: name.to_string(),
            exported: None,
            scope: Scope::Package,
            kind,
        }
    }
}

impl ModuleSnapshot {
    pub fn new(package_path: &str, package_name: &str, declarations: Vec<Declaration>) -> Self {
        let mut snapshot = Self {
            package_path: package_path.to_string(),
            package_name: package_name.to_string(),
            declarations,
        };
        snapshot.link_named_types();
        snapshot
    }

    /// Parse a snapshot from a JSON string.
    pub fn parse(input: &str) -> Result<Self> {
        let mut snapshot: ModuleSnapshot = serde_json::from_str(input)?;

        if snapshot.package_path.trim().is_empty() {
            return Err(CoreError::InvalidSnapshot {
                detail: "package_path is required".to_string(),
            });
        }
        if snapshot.package_name.trim().is_empty() {
            return Err(CoreError::InvalidSnapshot {
                detail: format!("package_name is required for {}", snapshot.package_path),
            });
        }

        snapshot.link_named_types();
        Ok(snapshot)
    }

    /// Parse a snapshot from a file path.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Qualified reference to a package-level symbol, e.g. `strings.Repeat`.
    pub fn qualified_name(&self, name: &str) -> String {
        format!("{}.{name}", self.package_name)
    }

    /// Package-scope type declaration by name.
    pub fn type_decl(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| {
            d.name == name && d.scope == Scope::Package && matches!(d.kind, DeclKind::TypeName { .. })
        })
    }

    /// Fill in the underlying shape of references to this package's own
    /// named types from its type declarations.
    ///
    /// Linking is one level deep: a filled-in shape is not itself linked,
    /// so self-referential types terminate.
    fn link_named_types(&mut self) {
        let table: HashMap<String, TypeDescriptor> = self
            .declarations
            .iter()
            .filter(|d| d.scope == Scope::Package)
            .filter_map(|d| match &d.kind {
                DeclKind::TypeName { underlying } => Some((d.name.clone(), underlying.clone())),
                _ => None,
            })
            .collect();
        if table.is_empty() {
            return;
        }

        let path = self.package_path.clone();
        for decl in &mut self.declarations {
            match &mut decl.kind {
                DeclKind::Const { ty, .. } | DeclKind::Var { ty } => link(ty, &path, &table),
                DeclKind::Func { signature } => link_signature(signature, &path, &table),
                DeclKind::TypeName { underlying } => link(underlying, &path, &table),
                DeclKind::Label | DeclKind::PackageName => {}
            }
        }
    }
}

fn link(ty: &mut TypeDescriptor, path: &str, table: &HashMap<String, TypeDescriptor>) {
    match ty {
        TypeDescriptor::Basic { .. } => {}
        TypeDescriptor::Named(named) => {
            if let Some(underlying) = named.underlying.as_deref_mut() {
                link(underlying, path, table);
            } else if named.package == path {
                if let Some(shape) = table.get(&named.name) {
                    named.underlying = Some(Box::new(shape.clone()));
                }
            }
        }
        TypeDescriptor::Pointer { elem }
        | TypeDescriptor::Slice { elem }
        | TypeDescriptor::Array { elem, .. }
        | TypeDescriptor::Chan { elem, .. } => link(elem, path, table),
        TypeDescriptor::Map { key, value } => {
            link(key, path, table);
            link(value, path, table);
        }
        TypeDescriptor::Struct { fields } => {
            for field in fields {
                link(&mut field.ty, path, table);
            }
        }
        TypeDescriptor::Interface { methods } => {
            for method in methods {
                link_signature(&mut method.signature, path, table);
            }
        }
        TypeDescriptor::Signature(sig) => link_signature(sig, path, table),
    }
}

fn link_signature(sig: &mut Signature, path: &str, table: &HashMap<String, TypeDescriptor>) {
    for p in sig.params.iter_mut().chain(sig.results.iter_mut()) {
        link(&mut p.ty, path, table);
    }
    if let Some(recv) = &mut sig.receiver {
        link(&mut recv.ty, path, table);
    }
}
