//! Type descriptors for the exported surface of a Go package.
//!
//! A [`TypeDescriptor`] is a closed sum over the native type shapes the
//! exporter understands. Every stage of the pipeline dispatches on it with a
//! `match`; there is no open-ended type hierarchy.

use serde::{Deserialize, Serialize};

/// Predeclared basic kinds, including the untyped constant kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,
    // untyped constant kinds
    UntypedBool,
    UntypedInt,
    UntypedRune,
    UntypedFloat,
    UntypedComplex,
    UntypedString,
    UntypedNil,
}

impl BasicKind {
    /// Go spelling of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Uintptr => "uintptr",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Complex64 => "complex64",
            BasicKind::Complex128 => "complex128",
            BasicKind::String => "string",
            BasicKind::UnsafePointer => "unsafe.Pointer",
            BasicKind::UntypedBool => "untyped bool",
            BasicKind::UntypedInt => "untyped int",
            BasicKind::UntypedRune => "untyped rune",
            BasicKind::UntypedFloat => "untyped float",
            BasicKind::UntypedComplex => "untyped complex",
            BasicKind::UntypedString => "untyped string",
            BasicKind::UntypedNil => "untyped nil",
        }
    }

    /// Whether this is one of the untyped constant kinds.
    pub fn is_untyped(&self) -> bool {
        matches!(
            self,
            BasicKind::UntypedBool
                | BasicKind::UntypedInt
                | BasicKind::UntypedRune
                | BasicKind::UntypedFloat
                | BasicKind::UntypedComplex
                | BasicKind::UntypedString
                | BasicKind::UntypedNil
        )
    }
}

impl std::fmt::Display for BasicKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChanDir {
    #[default]
    Both,
    Send,
    Recv,
}

/// A declared (named) type reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedType {
    /// Import path of the declaring package (empty for predeclared types such as `error`).
    #[serde(default)]
    pub package: String,
    /// Type name.
    pub name: String,
    /// Explicit export flag; derived from the name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported: Option<bool>,
    /// Underlying shape. May be omitted for types declared in the snapshot's
    /// own package; [`crate::ModuleSnapshot::parse`] links those from the
    /// package's type declarations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying: Option<Box<TypeDescriptor>>,
}

impl NamedType {
    /// Whether the type can be named from outside its declaring package.
    pub fn is_exported(&self) -> bool {
        self.exported.unwrap_or_else(|| is_exported_name(&self.name))
    }

    /// Predeclared types (`error`, `any`) have no declaring package.
    pub fn is_predeclared(&self) -> bool {
        self.package.is_empty()
    }

    /// The underlying shape, if known.
    pub fn underlying(&self) -> Option<&TypeDescriptor> {
        self.underlying.as_deref()
    }
}

/// A struct field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub ty: TypeDescriptor,
    #[serde(default)]
    pub embedded: bool,
}

/// A method in an interface's method set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceMethod {
    pub name: String,
    pub signature: Signature,
}

/// A function parameter or result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name (may be empty if unnamed).
    #[serde(default)]
    pub name: String,
    pub ty: TypeDescriptor,
}

impl Param {
    pub fn new(name: &str, ty: TypeDescriptor) -> Self {
        Self {
            name: name.to_string(),
            ty,
        }
    }

    pub fn unnamed(ty: TypeDescriptor) -> Self {
        Self {
            name: String::new(),
            ty,
        }
    }
}

/// A method receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receiver {
    #[serde(default)]
    pub name: String,
    /// `Named` for value receivers, `Pointer(Named)` for pointer receivers.
    pub ty: TypeDescriptor,
}

/// A function or method signature.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub results: Vec<Param>,
    /// The last parameter is a `Slice` collecting a variadic tail.
    #[serde(default)]
    pub variadic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<Box<Receiver>>,
}

impl Signature {
    pub fn new(params: Vec<Param>, results: Vec<Param>) -> Self {
        Self {
            params,
            results,
            variadic: false,
            receiver: None,
        }
    }

    pub fn with_variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn with_receiver(mut self, name: &str, ty: TypeDescriptor) -> Self {
        self.receiver = Some(Box::new(Receiver {
            name: name.to_string(),
            ty,
        }));
        self
    }
}

/// The shape of a native type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDescriptor {
    /// Predeclared basic type.
    Basic { basic: BasicKind },
    /// Declared type.
    Named(NamedType),
    /// `*T`
    Pointer { elem: Box<TypeDescriptor> },
    /// `[]T`
    Slice { elem: Box<TypeDescriptor> },
    /// `[N]T`
    Array { len: u64, elem: Box<TypeDescriptor> },
    /// `map[K]V`
    Map {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    /// `chan T`
    Chan {
        #[serde(default)]
        dir: ChanDir,
        elem: Box<TypeDescriptor>,
    },
    /// `struct { ... }`
    Struct {
        #[serde(default)]
        fields: Vec<Field>,
    },
    /// `interface { ... }`
    Interface {
        #[serde(default)]
        methods: Vec<InterfaceMethod>,
    },
    /// `func(...) ...`
    Signature(Signature),
}

impl TypeDescriptor {
    pub fn basic(kind: BasicKind) -> Self {
        TypeDescriptor::Basic { basic: kind }
    }

    /// A named type with a known underlying shape.
    pub fn named(package: &str, name: &str, underlying: TypeDescriptor) -> Self {
        TypeDescriptor::Named(NamedType {
            package: package.to_string(),
            name: name.to_string(),
            exported: None,
            underlying: Some(Box::new(underlying)),
        })
    }

    /// A named type whose underlying shape is resolved later (or unknown).
    pub fn named_ref(package: &str, name: &str) -> Self {
        TypeDescriptor::Named(NamedType {
            package: package.to_string(),
            name: name.to_string(),
            exported: None,
            underlying: None,
        })
    }

    pub fn pointer(elem: TypeDescriptor) -> Self {
        TypeDescriptor::Pointer {
            elem: Box::new(elem),
        }
    }

    pub fn slice(elem: TypeDescriptor) -> Self {
        TypeDescriptor::Slice {
            elem: Box::new(elem),
        }
    }

    /// The empty interface, `any`.
    pub fn any() -> Self {
        TypeDescriptor::Interface {
            methods: Vec::new(),
        }
    }

    /// Whether this is the empty interface.
    pub fn is_empty_interface(&self) -> bool {
        matches!(self, TypeDescriptor::Interface { methods } if methods.is_empty())
    }

    /// The named type, looking through one level of pointer.
    pub fn base_named(&self) -> Option<&NamedType> {
        match self {
            TypeDescriptor::Named(named) => Some(named),
            TypeDescriptor::Pointer { elem } => match elem.as_ref() {
                TypeDescriptor::Named(named) => Some(named),
                _ => None,
            },
            _ => None,
        }
    }

    /// The underlying shape: itself for unnamed types, the declared shape for named ones.
    pub fn underlying(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::Named(named) => named.underlying(),
            other => Some(other),
        }
    }

    /// Short shape name for diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            TypeDescriptor::Basic { .. } => "basic",
            TypeDescriptor::Named(_) => "named",
            TypeDescriptor::Pointer { .. } => "pointer",
            TypeDescriptor::Slice { .. } => "slice",
            TypeDescriptor::Array { .. } => "array",
            TypeDescriptor::Map { .. } => "map",
            TypeDescriptor::Chan { .. } => "chan",
            TypeDescriptor::Struct { .. } => "struct",
            TypeDescriptor::Interface { .. } => "interface",
            TypeDescriptor::Signature(_) => "signature",
        }
    }

    /// Find the first reachable type (pre-order, including `self`) matching `pred`.
    ///
    /// The walk does not descend into the underlying shape of named types.
    pub fn find(&self, pred: &mut dyn FnMut(&TypeDescriptor) -> bool) -> Option<&TypeDescriptor> {
        if pred(self) {
            return Some(self);
        }
        match self {
            TypeDescriptor::Basic { .. } | TypeDescriptor::Named(_) => None,
            TypeDescriptor::Pointer { elem }
            | TypeDescriptor::Slice { elem }
            | TypeDescriptor::Array { elem, .. }
            | TypeDescriptor::Chan { elem, .. } => elem.find(pred),
            TypeDescriptor::Map { key, value } => key.find(pred).or_else(|| value.find(pred)),
            TypeDescriptor::Struct { fields } => fields.iter().find_map(|f| f.ty.find(pred)),
            TypeDescriptor::Interface { methods } => methods
                .iter()
                .find_map(|m| find_in_signature(&m.signature, pred)),
            TypeDescriptor::Signature(sig) => find_in_signature(sig, pred),
        }
    }
}

fn find_in_signature<'a>(
    sig: &'a Signature,
    pred: &mut dyn FnMut(&TypeDescriptor) -> bool,
) -> Option<&'a TypeDescriptor> {
    sig.params
        .iter()
        .chain(sig.results.iter())
        .find_map(|p| p.ty.find(pred))
}

/// Go's export rule: the identifier starts with an upper-case letter.
pub fn is_exported_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> TypeDescriptor {
        TypeDescriptor::named(
            "example.com/geo",
            "Point",
            TypeDescriptor::Struct { fields: Vec::new() },
        )
    }

    #[test]
    fn basic_names() {
        assert_eq!(BasicKind::Int64.name(), "int64");
        assert_eq!(BasicKind::UnsafePointer.name(), "unsafe.Pointer");
        assert_eq!(BasicKind::UntypedFloat.to_string(), "untyped float");
        assert!(BasicKind::UntypedNil.is_untyped());
        assert!(!BasicKind::Uintptr.is_untyped());
    }

    #[test]
    fn export_rule() {
        assert!(is_exported_name("Reader"));
        assert!(!is_exported_name("reader"));
        assert!(!is_exported_name("_x"));
        assert!(!is_exported_name(""));
    }

    #[test]
    fn explicit_export_flag_wins() {
        let named = NamedType {
            package: "p".to_string(),
            name: "Hidden".to_string(),
            exported: Some(false),
            underlying: None,
        };
        assert!(!named.is_exported());
    }

    #[test]
    fn base_named_looks_through_one_pointer() {
        let ptr = TypeDescriptor::pointer(point());
        assert_eq!(ptr.base_named().unwrap().name, "Point");
        let ptr_ptr = TypeDescriptor::pointer(ptr);
        assert!(ptr_ptr.base_named().is_none());
        assert!(TypeDescriptor::basic(BasicKind::Int).base_named().is_none());
    }

    #[test]
    fn find_reaches_map_values_and_signatures() {
        let chan = TypeDescriptor::Chan {
            dir: ChanDir::Recv,
            elem: Box::new(TypeDescriptor::basic(BasicKind::Int)),
        };
        let map = TypeDescriptor::Map {
            key: Box::new(TypeDescriptor::basic(BasicKind::String)),
            value: Box::new(TypeDescriptor::Signature(Signature::new(
                vec![Param::unnamed(chan)],
                Vec::new(),
            ))),
        };
        let found = map.find(&mut |t| matches!(t, TypeDescriptor::Chan { .. }));
        assert_eq!(found.map(TypeDescriptor::shape_name), Some("chan"));
    }

    #[test]
    fn find_stops_at_named_types() {
        let hidden = TypeDescriptor::named(
            "p",
            "Wrapper",
            TypeDescriptor::Struct {
                fields: vec![Field {
                    name: "c".to_string(),
                    ty: TypeDescriptor::Chan {
                        dir: ChanDir::Both,
                        elem: Box::new(TypeDescriptor::basic(BasicKind::Int)),
                    },
                    embedded: false,
                }],
            },
        );
        assert!(hidden
            .find(&mut |t| matches!(t, TypeDescriptor::Chan { .. }))
            .is_none());
    }

    #[test]
    fn deserialize_tagged_shapes() {
        let json = r#"{"kind":"pointer","elem":{"kind":"named","package":"bytes","name":"Buffer"}}"#;
        let ty: TypeDescriptor = serde_json::from_str(json).unwrap();
        let named = ty.base_named().unwrap();
        assert_eq!(named.package, "bytes");
        assert!(named.underlying().is_none());

        let json = r#"{"kind":"basic","basic":"unsafe_pointer"}"#;
        let ty: TypeDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(ty, TypeDescriptor::basic(BasicKind::UnsafePointer));
    }

    #[test]
    fn method_signature_serde_round_trip() {
        let point = TypeDescriptor::named_ref("example.com/geo", "Point");
        let sig = Signature::new(
            vec![Param::new("k", TypeDescriptor::basic(BasicKind::Int))],
            Vec::new(),
        )
        .with_receiver("p", TypeDescriptor::pointer(point));
        let ty = TypeDescriptor::Signature(sig);

        let json = serde_json::to_string(&ty).unwrap();
        assert!(json.contains(r#""receiver":{"name":"p""#));
        let back: TypeDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ty);

        let TypeDescriptor::Signature(sig) = back else {
            panic!("expected signature");
        };
        let recv = sig.receiver.unwrap();
        assert_eq!(recv.ty.base_named().unwrap().name, "Point");
    }

    #[test]
    fn empty_interface_is_any() {
        assert!(TypeDescriptor::any().is_empty_interface());
        let stringer = TypeDescriptor::Interface {
            methods: vec![InterfaceMethod {
                name: "String".to_string(),
                signature: Signature::new(
                    Vec::new(),
                    vec![Param::unnamed(TypeDescriptor::basic(BasicKind::String))],
                ),
            }],
        };
        assert!(!stringer.is_empty_interface());
    }
}
