// Predeclared identifiers

use crate::package::{Object, Package, TypeName};
use crate::types::{BasicKind, Func, Interface, Named, Signature, Tuple, Type, Var};

pub const ERROR: &str = "error";
pub const ANY: &str = "any";
pub const UNSAFE: &str = "unsafe";

/// The predeclared `error` type: a named type with no owning package
pub fn error_type() -> Type {
    Type::Named(Named::new(None, ERROR))
}

/// Underlying type of `error`: interface { Error() string }
pub fn error_interface() -> Interface {
    Interface {
        methods: vec![Func {
            name: "Error".to_string(),
            signature: Signature {
                params: Tuple::default(),
                results: Tuple::new(vec![Var {
                    name: None,
                    ty: Type::Basic(BasicKind::String),
                }]),
                variadic: false,
            },
        }],
        embedded: Vec::new(),
    }
}

/// Resolve a predeclared type name
pub fn lookup(name: &str) -> Option<Type> {
    match name {
        ERROR => Some(error_type()),
        ANY => Some(Type::Interface(Box::default())),
        _ => BasicKind::from_name(name).map(Type::Basic),
    }
}

/// Underlying type of a predeclared named type
pub fn underlying(named: &Named) -> Option<Type> {
    match (named.package.as_ref(), named.name.as_str()) {
        (None, ERROR) => Some(Type::Interface(Box::new(error_interface()))),
        _ => None,
    }
}

/// The built-in `unsafe` package. Only `Pointer` is declared; its
/// underlying type is approximated by `uintptr`.
pub fn unsafe_package() -> Package {
    let mut pkg = Package::new(UNSAFE, UNSAFE);
    pkg.scope.insert(
        "Pointer".to_string(),
        Object::TypeName(TypeName {
            name: "Pointer".to_string(),
            underlying: Type::Basic(BasicKind::Uintptr),
            is_alias: false,
            methods: Vec::new(),
        }),
    );
    pkg
}

/// All predeclared type names (for suggestions)
pub fn names() -> Vec<String> {
    let mut names: Vec<String> = BasicKind::ALL.iter().map(|k| k.name().to_string()).collect();
    names.push(ERROR.to_string());
    names.push(ANY.to_string());
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_unowned_named() {
        let ty = lookup("error").unwrap();
        assert_eq!(ty.as_named().and_then(|n| n.package.as_ref()), None);
        let iface = underlying(ty.as_named().unwrap()).unwrap();
        assert!(iface.as_interface().unwrap().method("Error").is_some());
    }

    #[test]
    fn test_basic_and_unknown() {
        assert_eq!(lookup("rune"), Some(Type::Basic(BasicKind::Rune)));
        assert!(matches!(lookup("any"), Some(Type::Interface(_))));
        assert_eq!(lookup("Store"), None);
    }

    #[test]
    fn test_unsafe_declares_pointer() {
        let pkg = unsafe_package();
        assert_eq!(pkg.path, "unsafe");
        assert!(pkg.type_name("Pointer").is_some());
    }
}
