//! Import usage tracking.
//!
//! Generated code that mentions a type must import every package owning a
//! named type inside it. [`ImportTracker`] walks type descriptors and keeps
//! the set of those packages, leaving out the package being generated into.

use automock_types::{Signature, Type};
use std::collections::BTreeMap;

/// Module path -> short name used to refer to it
pub type ImportSet = BTreeMap<String, String>;

pub trait ImportUsage {
    /// Record the imports `ty` needs
    fn add_imports_from(&mut self, ty: &Type);

    /// Imports recorded so far
    fn imports(&self) -> &ImportSet;
}

/// Tracker bound to the short name of the package code is generated into
#[derive(Debug, Clone)]
pub struct ImportTracker {
    current: String,
    imports: ImportSet,
}

impl ImportTracker {
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
            imports: ImportSet::new(),
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Record the imports of a method's parameters and results
    pub fn add_signature(&mut self, signature: &Signature) {
        for ty in signature.params.types().chain(signature.results.types()) {
            self.add_imports_from(ty);
        }
    }

    pub fn into_imports(self) -> ImportSet {
        self.imports
    }
}

impl ImportUsage for ImportTracker {
    fn add_imports_from(&mut self, ty: &Type) {
        match ty {
            Type::Basic(_) => {}
            Type::Slice(elem) | Type::Pointer(elem) => self.add_imports_from(elem),
            Type::Named(named) => {
                let Some(owner) = &named.package else {
                    return;
                };
                if owner.name == self.current {
                    return;
                }
                if !self.imports.contains_key(&owner.path) {
                    log::debug!("{} needs import {}", self.current, owner.path);
                    self.imports.insert(owner.path.clone(), owner.name.clone());
                }
            }
            Type::Tuple(tuple) => {
                for ty in tuple.types() {
                    self.add_imports_from(ty);
                }
            }
            // Composite shapes are not walked
            Type::Array { .. }
            | Type::Map { .. }
            | Type::Chan { .. }
            | Type::Signature(_)
            | Type::Struct(_)
            | Type::Interface(_) => {}
        }
    }

    fn imports(&self) -> &ImportSet {
        &self.imports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use automock_types::{BasicKind, PackageRef, Tuple, Var};

    fn named(path: &str, name: &str, ty: &str) -> Type {
        Type::named(Some(PackageRef::new(path, name)), ty)
    }

    fn tuple(types: Vec<Type>) -> Type {
        Type::Tuple(Tuple::new(
            types.into_iter().map(|ty| Var { name: None, ty }).collect(),
        ))
    }

    #[test]
    fn test_basic_is_noop() {
        let mut tracker = ImportTracker::new("foo");
        tracker.add_imports_from(&Type::Basic(BasicKind::Int));
        tracker.add_imports_from(&Type::slice(Type::Basic(BasicKind::String)));
        assert!(tracker.imports().is_empty());
    }

    #[test]
    fn test_self_import_excluded() {
        let mut tracker = ImportTracker::new("foo");
        tracker.add_imports_from(&named("example.com/foo", "foo", "Thing"));
        tracker.add_imports_from(&Type::pointer(named("example.com/foo", "foo", "Other")));
        assert!(tracker.imports().is_empty());
    }

    #[test]
    fn test_predeclared_named_is_noop() {
        let mut tracker = ImportTracker::new("foo");
        tracker.add_imports_from(&automock_types::universe::error_type());
        assert!(tracker.imports().is_empty());
    }

    #[test]
    fn test_structural_recursion() {
        let mut tracker = ImportTracker::new("foo");
        tracker.add_imports_from(&tuple(vec![
            Type::slice(named("example.com/bar", "bar", "B")),
            Type::pointer(named("example.com/baz", "baz", "Z")),
        ]));

        let expected: ImportSet = [
            ("example.com/bar".to_string(), "bar".to_string()),
            ("example.com/baz".to_string(), "baz".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(tracker.imports(), &expected);
    }

    #[test]
    fn test_no_duplicates() {
        let mut tracker = ImportTracker::new("foo");
        let ty = named("example.com/bar", "bar", "B");
        tracker.add_imports_from(&ty);
        tracker.add_imports_from(&ty);
        tracker.add_imports_from(&Type::slice(Type::slice(ty)));
        assert_eq!(tracker.imports().len(), 1);
    }

    #[test]
    fn test_composites_not_walked() {
        let mut tracker = ImportTracker::new("foo");
        tracker.add_imports_from(&Type::Map {
            key: Box::new(Type::Basic(BasicKind::String)),
            value: Box::new(named("example.com/bar", "bar", "B")),
        });
        tracker.add_imports_from(&Type::Chan {
            dir: automock_types::ChanDir::Both,
            elem: Box::new(named("example.com/bar", "bar", "B")),
        });
        assert!(tracker.imports().is_empty());
    }

    #[test]
    fn test_add_signature() {
        let signature = Signature {
            params: Tuple::new(vec![Var {
                name: Some("ctx".to_string()),
                ty: named("context", "context", "Context"),
            }]),
            results: Tuple::new(vec![Var {
                name: None,
                ty: automock_types::universe::error_type(),
            }]),
            variadic: false,
        };
        let mut tracker = ImportTracker::new("store");
        tracker.add_signature(&signature);
        assert_eq!(
            tracker.into_imports().get("context").map(String::as_str),
            Some("context")
        );
    }
}
