//! Mapping between native type shapes and host runtime kinds.
//!
//! Three mappings live here:
//! - basic kinds to the runtime's kind tags (`qspec.TyInt64`),
//! - untyped constants to the runtime's unbound-constant tags,
//! - declared types to a kind tag, an opaque runtime type handle, or nothing.
//!
//! It also decides which parameter and result types an adapter can carry.

use std::fmt;

use gopbind_core::{BasicKind, LiteralKind, NamedType, TypeDescriptor};

use crate::config::ExportConfig;
use crate::error::SkipReason;

/// Kind tag of a primitive type, as understood by the host runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindTag {
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
}

impl KindTag {
    /// Kind tag of a typed basic kind. Untyped kinds have none.
    pub fn from_basic(kind: BasicKind) -> Option<Self> {
        let tag = match kind {
            BasicKind::Bool => KindTag::Bool,
            BasicKind::Int => KindTag::Int,
            BasicKind::Int8 => KindTag::Int8,
            BasicKind::Int16 => KindTag::Int16,
            BasicKind::Int32 => KindTag::Int32,
            BasicKind::Int64 => KindTag::Int64,
            BasicKind::Uint => KindTag::Uint,
            BasicKind::Uint8 => KindTag::Uint8,
            BasicKind::Uint16 => KindTag::Uint16,
            BasicKind::Uint32 => KindTag::Uint32,
            BasicKind::Uint64 => KindTag::Uint64,
            BasicKind::Uintptr => KindTag::Uintptr,
            BasicKind::Float32 => KindTag::Float32,
            BasicKind::Float64 => KindTag::Float64,
            BasicKind::Complex64 => KindTag::Complex64,
            BasicKind::Complex128 => KindTag::Complex128,
            BasicKind::String => KindTag::String,
            BasicKind::UnsafePointer => KindTag::UnsafePointer,
            BasicKind::UntypedBool
            | BasicKind::UntypedInt
            | BasicKind::UntypedRune
            | BasicKind::UntypedFloat
            | BasicKind::UntypedComplex
            | BasicKind::UntypedString
            | BasicKind::UntypedNil => return None,
        };
        Some(tag)
    }

    /// Identifier in the kind-tag package.
    pub fn ident(&self) -> &'static str {
        match self {
            KindTag::Bool => "TyBool",
            KindTag::Int => "TyInt",
            KindTag::Int8 => "TyInt8",
            KindTag::Int16 => "TyInt16",
            KindTag::Int32 => "TyInt32",
            KindTag::Int64 => "TyInt64",
            KindTag::Uint => "TyUint",
            KindTag::Uint8 => "TyUint8",
            KindTag::Uint16 => "TyUint16",
            KindTag::Uint32 => "TyUint32",
            KindTag::Uint64 => "TyUint64",
            KindTag::Uintptr => "TyUintptr",
            KindTag::Float32 => "TyFloat32",
            KindTag::Float64 => "TyFloat64",
            KindTag::Complex64 => "TyComplex64",
            KindTag::Complex128 => "TyComplex128",
            KindTag::String => "TyString",
            KindTag::UnsafePointer => "TyUnsafePointer",
        }
    }

    /// Qualified reference, e.g. `qspec.TyInt64`.
    pub fn render(&self, config: &ExportConfig) -> String {
        config.spec(self.ident())
    }

    /// Matching `reflect.Kind` constant, e.g. `reflect.Int64`.
    pub fn reflect_kind(&self) -> String {
        format!("reflect.{}", self.ident().trim_start_matches("Ty"))
    }
}

/// Tag of an untyped literal constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnboundTag {
    Bool,
    Int,
    Rune,
    Float,
    Complex,
    String,
    Nil,
}

impl UnboundTag {
    pub fn from_basic(kind: BasicKind) -> Option<Self> {
        match kind {
            BasicKind::UntypedBool => Some(UnboundTag::Bool),
            BasicKind::UntypedInt => Some(UnboundTag::Int),
            BasicKind::UntypedRune => Some(UnboundTag::Rune),
            BasicKind::UntypedFloat => Some(UnboundTag::Float),
            BasicKind::UntypedComplex => Some(UnboundTag::Complex),
            BasicKind::UntypedString => Some(UnboundTag::String),
            BasicKind::UntypedNil => Some(UnboundTag::Nil),
            _ => None,
        }
    }

    /// Runtime reference. Untyped booleans are plain `reflect.Bool`.
    pub fn render(&self, config: &ExportConfig) -> String {
        match self {
            UnboundTag::Bool => "reflect.Bool".to_string(),
            UnboundTag::Int => config.spec("ConstUnboundInt"),
            UnboundTag::Rune => config.spec("ConstUnboundRune"),
            UnboundTag::Float => config.spec("ConstUnboundFloat"),
            UnboundTag::Complex => config.spec("ConstUnboundComplex"),
            UnboundTag::String => config.spec("ConstUnboundString"),
            UnboundTag::Nil => config.spec("ConstUnboundPtr"),
        }
    }
}

impl fmt::Display for UnboundTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnboundTag::Bool => write!(f, "untyped-bool"),
            UnboundTag::Int => write!(f, "untyped-int"),
            UnboundTag::Rune => write!(f, "untyped-rune"),
            UnboundTag::Float => write!(f, "untyped-float"),
            UnboundTag::Complex => write!(f, "untyped-complex"),
            UnboundTag::String => write!(f, "untyped-string"),
            UnboundTag::Nil => write!(f, "untyped-nil"),
        }
    }
}

/// Runtime kind of a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstKind {
    Unbound(UnboundTag),
    /// Typed constants register under their `reflect.Kind`.
    Bound(KindTag),
}

impl ConstKind {
    pub fn render(&self, config: &ExportConfig) -> String {
        match self {
            ConstKind::Unbound(tag) => tag.render(config),
            ConstKind::Bound(tag) => tag.reflect_kind(),
        }
    }

    /// Whether the rendered tag references the `reflect` package.
    pub fn uses_reflect(&self) -> bool {
        matches!(self, ConstKind::Unbound(UnboundTag::Bool) | ConstKind::Bound(_))
    }
}

/// Width class of an integer constant's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeClass {
    /// Fits a 32-bit signed integer.
    Normal,
    /// Negative and wider than 32 bits.
    Int64,
    /// Non-negative and wider than 32 bits.
    Uint64,
}

impl RangeClass {
    /// Wrap a value expression so it is not truncated by the host's default numeric width.
    pub fn wrap(&self, value: &str) -> String {
        match self {
            RangeClass::Normal => value.to_string(),
            RangeClass::Int64 => format!("int64({value})"),
            RangeClass::Uint64 => format!("uint64({value})"),
        }
    }
}

/// Classify an integer literal by whether its decimal text fits 32 bits.
pub fn classify_int_literal(text: &str) -> RangeClass {
    let text = text.trim();
    if text.parse::<i32>().is_ok() {
        RangeClass::Normal
    } else if text.starts_with('-') {
        RangeClass::Int64
    } else {
        RangeClass::Uint64
    }
}

/// How a constant is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstMapping {
    pub kind: ConstKind,
    pub range: RangeClass,
}

/// Map a constant to its runtime kind and range class.
pub fn map_const(
    literal_kind: LiteralKind,
    literal_text: &str,
    ty: &TypeDescriptor,
) -> Result<ConstMapping, SkipReason> {
    if literal_kind == LiteralKind::Unknown {
        return Err(SkipReason::UnmappedConstant {
            detail: "unknown literal kind".to_string(),
        });
    }
    let basic = match ty.underlying() {
        Some(TypeDescriptor::Basic { basic }) => *basic,
        Some(other) => {
            return Err(SkipReason::UnmappedConstant {
                detail: format!("{} is not a basic type", other.shape_name()),
            })
        }
        None => {
            return Err(SkipReason::UnmappedConstant {
                detail: "underlying type unknown".to_string(),
            })
        }
    };

    let kind = match (UnboundTag::from_basic(basic), KindTag::from_basic(basic)) {
        (Some(tag), _) => ConstKind::Unbound(tag),
        (None, Some(tag)) => ConstKind::Bound(tag),
        (None, None) => {
            return Err(SkipReason::UnmappedConstant {
                detail: format!("no kind for {basic}"),
            })
        }
    };

    let range = if literal_kind == LiteralKind::Int {
        classify_int_literal(literal_text)
    } else {
        RangeClass::Normal
    };

    Ok(ConstMapping { kind, range })
}

/// Runtime representation of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeMapping {
    /// Registered under a primitive kind tag.
    Kind(KindTag),
    /// Registered as an opaque host type through its runtime type handle.
    Handle,
    /// No runtime representation; the type is not registered.
    Unsupported(&'static str),
}

/// Map the underlying shape of a type declaration.
pub fn map_type(underlying: &TypeDescriptor) -> TypeMapping {
    match underlying {
        TypeDescriptor::Struct { .. } => TypeMapping::Handle,
        TypeDescriptor::Basic { basic } => match KindTag::from_basic(*basic) {
            Some(tag) => TypeMapping::Kind(tag),
            None => TypeMapping::Unsupported("untyped"),
        },
        TypeDescriptor::Named(named) => match named.underlying() {
            Some(inner) => map_type(inner),
            None => TypeMapping::Unsupported("named"),
        },
        other => TypeMapping::Unsupported(other.shape_name()),
    }
}

/// Where a type occurs in a signature, for admissibility checks and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Param(usize),
    Result(usize),
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Param(i) => write!(f, "param {i}"),
            Position::Result(i) => write!(f, "result {i}"),
        }
    }
}

/// Check that an adapter can carry a value of type `ty` at `position`.
///
/// Channels cannot cross into the host runtime. Parameters must not
/// mention unexported named types, since host code cannot construct them.
pub fn check_value_type(
    ty: &TypeDescriptor,
    position: Position,
    render: &dyn Fn(&TypeDescriptor) -> String,
) -> Result<(), SkipReason> {
    if let Some(chan) = ty.find(&mut |t| matches!(t, TypeDescriptor::Chan { .. })) {
        return Err(SkipReason::UnsupportedType {
            position: position.to_string(),
            ty: render(chan),
            shape: chan.shape_name(),
        });
    }
    if let Some(basic) = ty.find(&mut |t| matches!(t, TypeDescriptor::Basic { basic } if basic.is_untyped())) {
        return Err(SkipReason::UnsupportedType {
            position: position.to_string(),
            ty: render(basic),
            shape: basic.shape_name(),
        });
    }
    if let Position::Param(index) = position {
        let hidden = ty.find(&mut |t| matches!(t, TypeDescriptor::Named(n) if !n.is_predeclared() && !n.is_exported()));
        if let Some(hidden) = hidden {
            return Err(SkipReason::UnexportedParam {
                index,
                ty: render(hidden),
            });
        }
    }
    Ok(())
}

/// The basic type a named parameter must be asserted as before converting,
/// when the named type's name differs from its basic underlying type.
pub fn numeric_conversion(named: &NamedType, qualified: &str) -> Option<BasicKind> {
    match named.underlying() {
        Some(TypeDescriptor::Basic { basic }) if basic.name() != qualified => Some(*basic),
        _ => None,
    }
}
