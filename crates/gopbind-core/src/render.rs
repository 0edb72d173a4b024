//! Go source rendering of type descriptors.
//!
//! Named types are qualified by package *name*, not import path: types from
//! the exported package use its display name, foreign types use the last
//! segment of their import path, predeclared types (`error`) stay bare.

use crate::types::{ChanDir, NamedType, Param, Signature, TypeDescriptor};

/// Renders type descriptors as Go type expressions.
#[derive(Debug, Clone)]
pub struct TypeRenderer {
    package_path: String,
    package_name: String,
}

impl TypeRenderer {
    pub fn new(package_path: &str, package_name: &str) -> Self {
        Self {
            package_path: package_path.to_string(),
            package_name: package_name.to_string(),
        }
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn package_path(&self) -> &str {
        &self.package_path
    }

    /// Package qualifier for a named type (empty for predeclared types).
    pub fn qualifier<'a>(&'a self, named: &'a NamedType) -> &'a str {
        if named.package.is_empty() {
            ""
        } else if named.package == self.package_path {
            &self.package_name
        } else {
            named
                .package
                .rsplit('/')
                .next()
                .unwrap_or(named.package.as_str())
        }
    }

    /// Qualified name of a named type, e.g. `time.Duration`.
    pub fn named(&self, named: &NamedType) -> String {
        match self.qualifier(named) {
            "" => named.name.clone(),
            q => format!("{q}.{}", named.name),
        }
    }

    /// Render a type expression.
    pub fn render(&self, ty: &TypeDescriptor) -> String {
        match ty {
            TypeDescriptor::Basic { basic } => basic.name().to_string(),
            TypeDescriptor::Named(named) => self.named(named),
            TypeDescriptor::Pointer { elem } => format!("*{}", self.render(elem)),
            TypeDescriptor::Slice { elem } => format!("[]{}", self.render(elem)),
            TypeDescriptor::Array { len, elem } => format!("[{len}]{}", self.render(elem)),
            TypeDescriptor::Map { key, value } => {
                format!("map[{}]{}", self.render(key), self.render(value))
            }
            TypeDescriptor::Chan { dir, elem } => match dir {
                ChanDir::Both => format!("chan {}", self.render(elem)),
                ChanDir::Send => format!("chan<- {}", self.render(elem)),
                ChanDir::Recv => format!("<-chan {}", self.render(elem)),
            },
            TypeDescriptor::Struct { fields } => {
                if fields.is_empty() {
                    return "struct{}".to_string();
                }
                let parts: Vec<String> = fields
                    .iter()
                    .map(|f| {
                        if f.embedded {
                            self.render(&f.ty)
                        } else {
                            format!("{} {}", f.name, self.render(&f.ty))
                        }
                    })
                    .collect();
                format!("struct{{{}}}", parts.join("; "))
            }
            TypeDescriptor::Interface { methods } => {
                if methods.is_empty() {
                    return "interface{}".to_string();
                }
                let parts: Vec<String> = methods
                    .iter()
                    .map(|m| format!("{}{}", m.name, self.signature_tail(&m.signature)))
                    .collect();
                format!("interface{{{}}}", parts.join("; "))
            }
            TypeDescriptor::Signature(sig) => format!("func{}", self.signature_tail(sig)),
        }
    }

    /// Render `(params) results` for a signature.
    pub fn signature_tail(&self, sig: &Signature) -> String {
        let last = sig.params.len().saturating_sub(1);
        let params: Vec<String> = sig
            .params
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let ty = if sig.variadic && i == last {
                    match &p.ty {
                        TypeDescriptor::Slice { elem } => format!("...{}", self.render(elem)),
                        other => format!("...{}", self.render(other)),
                    }
                } else {
                    self.render(&p.ty)
                };
                self.param(p, ty)
            })
            .collect();

        let mut out = format!("({})", params.join(", "));
        match sig.results.as_slice() {
            [] => {}
            [single] if single.name.is_empty() => {
                out.push(' ');
                out.push_str(&self.render(&single.ty));
            }
            results => {
                let rendered: Vec<String> = results
                    .iter()
                    .map(|r| self.param(r, self.render(&r.ty)))
                    .collect();
                out.push_str(&format!(" ({})", rendered.join(", ")));
            }
        }
        out
    }

    /// Render a full declaration line: `func pkg.Name(...)` or `func (recv) Name(...)`.
    pub fn func_decl(&self, name: &str, sig: &Signature) -> String {
        match &sig.receiver {
            Some(recv) => {
                let ty = self.render(&recv.ty);
                let recv = if recv.name.is_empty() {
                    ty
                } else {
                    format!("{} {ty}", recv.name)
                };
                format!("func ({recv}) {name}{}", self.signature_tail(sig))
            }
            None => format!(
                "func {}.{name}{}",
                self.package_name,
                self.signature_tail(sig)
            ),
        }
    }

    fn param(&self, p: &Param, ty: String) -> String {
        if p.name.is_empty() {
            ty
        } else {
            format!("{} {ty}", p.name)
        }
    }
}
