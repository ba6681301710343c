// Package symbol tables

use crate::types::{Func, Interface, PackageRef, Type};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A declared type name. For aliases `underlying` is the aliased type itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeName {
    pub name: String,
    pub underlying: Type,
    pub is_alias: bool,
    /// Methods declared with this type as receiver base, sorted by name
    pub methods: Vec<Func>,
}

/// Package-level variable or constant; untyped declarations have no type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    pub name: String,
    pub ty: Option<Type>,
}

/// Top-level declaration in a package scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Object {
    TypeName(TypeName),
    Func(Func),
    Var(Value),
    Const(Value),
}

impl Object {
    pub fn name(&self) -> &str {
        match self {
            Object::TypeName(t) => &t.name,
            Object::Func(f) => &f.name,
            Object::Var(v) | Object::Const(v) => &v.name,
        }
    }

    pub fn as_type_name(&self) -> Option<&TypeName> {
        match self {
            Object::TypeName(t) => Some(t),
            _ => None,
        }
    }
}

/// Result of loading one module: its identity and top-level declarations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub path: String,
    pub name: String,
    /// Module paths imported by the package's files (sorted, unique)
    pub imports: Vec<String>,
    pub scope: BTreeMap<String, Object>,
}

impl Package {
    /// Package with no declarations
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            imports: Vec::new(),
            scope: BTreeMap::new(),
        }
    }

    pub fn reference(&self) -> PackageRef {
        PackageRef::new(self.path.clone(), self.name.clone())
    }

    pub fn lookup(&self, name: &str) -> Option<&Object> {
        self.scope.get(name)
    }

    pub fn type_name(&self, name: &str) -> Option<&TypeName> {
        self.lookup(name).and_then(Object::as_type_name)
    }

    /// Interface type declared as `name` (through a defined type or alias)
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.type_name(name).and_then(|t| t.underlying.as_interface())
    }

    /// Declared names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scope.keys().map(String::as_str)
    }

    /// Names of all declared interface types
    pub fn interface_names(&self) -> Vec<&str> {
        self.scope
            .values()
            .filter_map(Object::as_type_name)
            .filter(|t| t.underlying.as_interface().is_some())
            .map(|t| t.name.as_str())
            .collect()
    }

    pub fn methods_of(&self, type_name: &str) -> &[Func] {
        self.type_name(type_name)
            .map(|t| t.methods.as_slice())
            .unwrap_or(&[])
    }
}
