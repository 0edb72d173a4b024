//! Zero-value constructors.
//!
//! Struct types registered as opaque host types cannot be instantiated from
//! script code unless the package offers a constructor. When it offers
//! none, a `new<Type>` helper returning `new(pkg.Type)` is generated and
//! bound as `New<Type>`.

use gopbind_core::{DeclKind, ModuleSnapshot, Scope, TypeRenderer};

use crate::adapter::{AdapterPlan, CallTarget};

/// A generated constructor for one struct type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroConstructor {
    pub type_name: String,
    /// Go helper function name, `new<Type>`.
    pub helper: String,
    /// Binding name, `New<Type>`.
    pub binding: String,
    /// `*pkg.Type`
    pub result_ty: String,
    pub plan: AdapterPlan,
}

impl ZeroConstructor {
    pub fn new(type_name: &str, renderer: &TypeRenderer) -> Self {
        let helper = format!("new{type_name}");
        let binding = format!("New{type_name}");
        let result_ty = format!("*{}.{type_name}", renderer.package_name());
        let plan = AdapterPlan {
            exec_name: format!("exec{binding}"),
            comment: format!("func {helper}() {result_ty}"),
            fixed_arity: 0,
            variadic: None,
            args: Vec::new(),
            call: CallTarget::Direct(helper.clone()),
            results: 1,
        };
        Self {
            type_name: type_name.to_string(),
            helper,
            binding,
            result_ty,
            plan,
        }
    }

    /// Go source of the helper function.
    pub fn helper_source(&self) -> String {
        let elem = self.result_ty.trim_start_matches('*');
        format!(
            "func {}() {} {{\n\treturn new({elem})\n}}",
            self.helper, self.result_ty
        )
    }
}

/// Whether the package already declares an exported function whose name
/// starts with `New<Type>`. Consulted on the whole snapshot, ignoring filters.
pub fn has_constructor(snapshot: &ModuleSnapshot, type_name: &str) -> bool {
    let prefix = format!("New{type_name}");
    snapshot.declarations.iter().any(|decl| {
        decl.scope == Scope::Package
            && decl.is_exported()
            && decl.name.starts_with(&prefix)
            && matches!(&decl.kind, DeclKind::Func { signature } if signature.receiver.is_none())
    })
}
