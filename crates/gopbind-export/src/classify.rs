//! Symbol classification.
//!
//! Splits a snapshot's declarations into constants, variables, functions
//! (free functions and methods) and types. Only exported declarations whose
//! lexical parent is the package scope are admitted as free symbols; methods
//! are attached to their receiver's base type when that type is an exported
//! package-level type with a shape methods can be bridged on.

use gopbind_core::{
    DeclKind, Declaration, LiteralKind, ModuleSnapshot, Scope, Signature, TypeDescriptor,
};

use crate::error::SkipReason;
use crate::filter::SymbolFilter;
use crate::report::{Skipped, SymbolKind};

/// An exported constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstSymbol {
    pub name: String,
    pub literal_kind: LiteralKind,
    pub literal_text: String,
    pub ty: TypeDescriptor,
}

/// An exported variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarSymbol {
    pub name: String,
    pub ty: TypeDescriptor,
}

/// An exported free function or method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncSymbol {
    pub name: String,
    pub signature: Signature,
    /// Base type name of the receiver, for methods.
    pub receiver: Option<String>,
}

impl FuncSymbol {
    pub fn free(name: &str, signature: Signature) -> Self {
        Self {
            name: name.to_string(),
            signature,
            receiver: None,
        }
    }

    /// Display name used for sorting and filtering: `Name` or `Type.Name`.
    pub fn display_name(&self) -> String {
        match &self.receiver {
            Some(recv) => format!("{recv}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Whether the method has a pointer receiver.
    pub fn has_pointer_receiver(&self) -> bool {
        self.signature
            .receiver
            .as_ref()
            .is_some_and(|r| matches!(r.ty, TypeDescriptor::Pointer { .. }))
    }

    /// Public binding name: `Name`, `(Type).Name` or `(*Type).Name`.
    pub fn binding_name(&self) -> String {
        match &self.receiver {
            Some(recv) if self.has_pointer_receiver() => format!("(*{recv}).{}", self.name),
            Some(recv) => format!("({recv}).{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Go expression naming the function value: `pkg.Name` or a method expression.
    pub fn call_name(&self, package: &str) -> String {
        match &self.receiver {
            Some(recv) if self.has_pointer_receiver() => {
                format!("(*{package}.{recv}).{}", self.name)
            }
            Some(recv) => format!("({package}.{recv}).{}", self.name),
            None => format!("{package}.{}", self.name),
        }
    }

    /// Name of the generated adapter procedure.
    pub fn exec_name(&self) -> String {
        match &self.receiver {
            Some(recv) => format!("execm{recv}{}", self.name),
            None => format!("exec{}", self.name),
        }
    }

    pub fn is_variadic(&self) -> bool {
        self.signature.variadic
    }
}

/// An exported type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSymbol {
    pub name: String,
    pub underlying: TypeDescriptor,
}

/// A snapshot split into sorted symbol groups.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedPackage {
    pub consts: Vec<ConstSymbol>,
    pub vars: Vec<VarSymbol>,
    pub funcs: Vec<FuncSymbol>,
    pub types: Vec<TypeSymbol>,
    /// Declarations excluded during classification.
    pub skipped: Vec<Skipped>,
}

impl ClassifiedPackage {
    /// Sort every group by display name. The sort is stable.
    pub fn sort(&mut self) {
        self.consts.sort_by(|a, b| a.name.cmp(&b.name));
        self.vars.sort_by(|a, b| a.name.cmp(&b.name));
        self.types.sort_by(|a, b| a.name.cmp(&b.name));
        self.funcs.sort_by_cached_key(FuncSymbol::display_name);
    }

    pub fn is_empty(&self) -> bool {
        self.consts.is_empty() && self.vars.is_empty() && self.funcs.is_empty() && self.types.is_empty()
    }

    fn skip(&mut self, symbol: String, kind: SymbolKind, reason: SkipReason) {
        tracing::warn!(%kind, %symbol, %reason, "skipping declaration");
        self.skipped.push(Skipped {
            symbol,
            kind,
            reason,
        });
    }
}

/// Classify the exported declarations of a snapshot.
///
/// Returns the groups already sorted by display name.
pub fn classify(snapshot: &ModuleSnapshot, filter: &dyn SymbolFilter) -> ClassifiedPackage {
    let mut out = ClassifiedPackage::default();

    for decl in &snapshot.declarations {
        if !decl.is_exported() {
            continue;
        }
        match decl.scope {
            Scope::Package => classify_package_level(snapshot, decl, filter, &mut out),
            Scope::Method => classify_method(snapshot, decl, filter, &mut out),
            // Locals and struct fields are never top-level.
            Scope::Local | Scope::Field => {}
        }
    }

    out.sort();
    tracing::debug!(
        package = %snapshot.package_path,
        consts = out.consts.len(),
        vars = out.vars.len(),
        funcs = out.funcs.len(),
        types = out.types.len(),
        "classified declarations"
    );
    out
}

fn classify_package_level(
    snapshot: &ModuleSnapshot,
    decl: &Declaration,
    filter: &dyn SymbolFilter,
    out: &mut ClassifiedPackage,
) {
    match &decl.kind {
        DeclKind::Func { signature } if signature.receiver.is_some() => {
            classify_method(snapshot, decl, filter, out);
        }
        DeclKind::Label | DeclKind::PackageName => {
            out.skip(
                decl.name.clone(),
                SymbolKind::Other,
                SkipReason::Unrecognised {
                    kind: decl.kind.label(),
                },
            );
        }
        _ if !filter.accept(&decl.name) => {}
        DeclKind::Const {
            literal_kind,
            literal_text,
            ty,
        } => out.consts.push(ConstSymbol {
            name: decl.name.clone(),
            literal_kind: *literal_kind,
            literal_text: literal_text.clone(),
            ty: ty.clone(),
        }),
        DeclKind::Var { ty } => out.vars.push(VarSymbol {
            name: decl.name.clone(),
            ty: ty.clone(),
        }),
        DeclKind::Func { signature } => out.funcs.push(FuncSymbol::free(&decl.name, signature.clone())),
        DeclKind::TypeName { underlying } => out.types.push(TypeSymbol {
            name: decl.name.clone(),
            underlying: underlying.clone(),
        }),
    }
}

fn classify_method(
    snapshot: &ModuleSnapshot,
    decl: &Declaration,
    filter: &dyn SymbolFilter,
    out: &mut ClassifiedPackage,
) {
    let DeclKind::Func { signature } = &decl.kind else {
        // Only methods carry the method scope; anything else is loader noise.
        out.skip(
            decl.name.clone(),
            SymbolKind::Other,
            SkipReason::Unrecognised {
                kind: decl.kind.label(),
            },
        );
        return;
    };
    let Some(recv) = &signature.receiver else {
        out.skip(
            decl.name.clone(),
            SymbolKind::Func,
            SkipReason::Unrecognised {
                kind: "method without receiver",
            },
        );
        return;
    };

    let named = match recv.ty.base_named() {
        Some(named) => named,
        None if matches!(recv.ty, TypeDescriptor::Interface { .. }) => {
            tracing::debug!(method = %decl.name, "dropping interface method");
            return;
        }
        None => {
            out.skip(
                decl.name.clone(),
                SymbolKind::Func,
                SkipReason::UnsupportedReceiver {
                    receiver: recv.ty.shape_name().to_string(),
                    shape: recv.ty.shape_name(),
                },
            );
            return;
        }
    };

    // The receiver must be a top-level exported type of this package.
    if named.package != snapshot.package_path || !named.is_exported() {
        return;
    }
    let Some(type_decl) = snapshot.type_decl(&named.name) else {
        return;
    };
    if !type_decl.is_exported() {
        return;
    }
    let DeclKind::TypeName { underlying } = &type_decl.kind else {
        return;
    };

    let method = FuncSymbol {
        name: decl.name.clone(),
        signature: signature.clone(),
        receiver: Some(named.name.clone()),
    };
    let shown = method.display_name();
    if !filter.accept(&shown) {
        return;
    }

    match underlying {
        TypeDescriptor::Struct { .. }
        | TypeDescriptor::Basic { .. }
        | TypeDescriptor::Slice { .. }
        | TypeDescriptor::Map { .. }
        | TypeDescriptor::Signature(_) => out.funcs.push(method),
        TypeDescriptor::Interface { .. } => {
            tracing::debug!(method = %shown, "dropping method on interface type");
        }
        other => out.skip(
            shown,
            SymbolKind::Func,
            SkipReason::UnsupportedReceiver {
                receiver: named.name.clone(),
                shape: other.shape_name(),
            },
        ),
    }
}
