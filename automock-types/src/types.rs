// Type descriptors produced by the checker
// Immutable after construction; named types refer to their declaration by identity

use serde::{Deserialize, Serialize};

/// Built-in types that need no import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BasicKind {
    Bool,
    String,
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
    Byte,
    Rune,
}

impl BasicKind {
    pub const ALL: [BasicKind; 19] = [
        BasicKind::Bool,
        BasicKind::String,
        BasicKind::Int,
        BasicKind::Int8,
        BasicKind::Int16,
        BasicKind::Int32,
        BasicKind::Int64,
        BasicKind::Uint,
        BasicKind::Uint8,
        BasicKind::Uint16,
        BasicKind::Uint32,
        BasicKind::Uint64,
        BasicKind::Uintptr,
        BasicKind::Float32,
        BasicKind::Float64,
        BasicKind::Complex64,
        BasicKind::Complex128,
        BasicKind::Byte,
        BasicKind::Rune,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::String => "string",
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
            BasicKind::Byte => "byte",
            BasicKind::Rune => "rune",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }
}

/// Identity of the package owning a named type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageRef {
    /// Module path, e.g. `github.com/acme/model`
    pub path: String,
    /// Short name from the package clause, e.g. `model`
    pub name: String,
}

impl PackageRef {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// A declared type, referenced by identity.
/// `package` is `None` for predeclared types such as `error`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Named {
    pub package: Option<PackageRef>,
    pub name: String,
}

impl Named {
    pub fn new(package: Option<PackageRef>, name: impl Into<String>) -> Self {
        Self {
            package,
            name: name.into(),
        }
    }
}

/// One element of a tuple (parameter or result)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Var {
    pub name: Option<String>,
    pub ty: Type,
}

/// Ordered, possibly empty list of typed elements
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tuple {
    pub vars: Vec<Var>,
}

impl Tuple {
    pub fn new(vars: Vec<Var>) -> Self {
        Self { vars }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn at(&self, index: usize) -> Option<&Var> {
        self.vars.get(index)
    }

    pub fn types(&self) -> impl Iterator<Item = &Type> {
        self.vars.iter().map(|v| &v.ty)
    }
}

/// Function signature. For variadic signatures the last parameter has slice type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Signature {
    pub params: Tuple,
    pub results: Tuple,
    pub variadic: bool,
}

/// A function or method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Func {
    pub name: String,
    pub signature: Signature,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructField {
    pub name: String,
    pub ty: Type,
    pub embedded: bool,
    pub tag: Option<String>,
}

/// Interface type with its complete method set (explicit and embedded), sorted by name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Interface {
    pub methods: Vec<Func>,
    pub embedded: Vec<Type>,
}

impl Interface {
    pub fn method(&self, name: &str) -> Option<&Func> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// Type descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    Basic(BasicKind),
    Slice(Box<Type>),
    Pointer(Box<Type>),
    Named(Named),
    Tuple(Tuple),
    Array { len: String, elem: Box<Type> },
    Map { key: Box<Type>, value: Box<Type> },
    Chan { dir: ChanDir, elem: Box<Type> },
    Signature(Box<Signature>),
    Struct(Vec<StructField>),
    Interface(Box<Interface>),
}

impl Type {
    pub fn slice(elem: Type) -> Self {
        Type::Slice(Box::new(elem))
    }

    pub fn pointer(elem: Type) -> Self {
        Type::Pointer(Box::new(elem))
    }

    pub fn named(package: Option<PackageRef>, name: impl Into<String>) -> Self {
        Type::Named(Named::new(package, name))
    }

    pub fn as_named(&self) -> Option<&Named> {
        match self {
            Type::Named(named) => Some(named),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&Interface> {
        match self {
            Type::Interface(iface) => Some(iface),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_names_round_trip() {
        for kind in BasicKind::ALL {
            assert_eq!(BasicKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(BasicKind::from_name("error"), None);
    }

    #[test]
    fn test_tuple_accessors() {
        let tuple = Tuple::new(vec![
            Var {
                name: Some("ctx".to_string()),
                ty: Type::named(Some(PackageRef::new("context", "context")), "Context"),
            },
            Var {
                name: None,
                ty: Type::Basic(BasicKind::Int),
            },
        ]);

        assert_eq!(tuple.len(), 2);
        assert_eq!(tuple.at(1).map(|v| &v.ty), Some(&Type::Basic(BasicKind::Int)));
        assert!(tuple.at(2).is_none());
        assert_eq!(tuple.types().filter(|t| t.as_named().is_some()).count(), 1);
    }
}
