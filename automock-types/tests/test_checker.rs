// Declaration checker tests: parse real source text, check it against a
// fixed set of importable packages

use automock_parser::Parser;
use automock_types::*;
use std::collections::HashMap;
use std::rc::Rc;

#[cfg(test)]
mod checker_tests {
    use super::*;

    /// Importer over already-checked packages; records every request
    #[derive(Default)]
    struct MapImporter {
        packages: HashMap<String, Rc<Package>>,
        requests: Vec<String>,
    }

    impl MapImporter {
        fn with(mut self, path: &str, sources: &[&str]) -> Self {
            let files = parse_all(sources);
            let pkg = check(path, &files, &mut self).expect("dependency failed to check");
            self.packages.insert(path.to_string(), Rc::new(pkg));
            self.requests.clear();
            self
        }
    }

    impl Importer for MapImporter {
        fn import(&mut self, path: &str) -> Result<Rc<Package>, ImportError> {
            self.requests.push(path.to_string());
            self.packages
                .get(path)
                .cloned()
                .ok_or_else(|| format!("cannot find package {}", path).into())
        }
    }

    fn parse_all(sources: &[&str]) -> Vec<automock_ast::SourceFile> {
        sources
            .iter()
            .enumerate()
            .map(|(i, src)| {
                Parser::with_file(&format!("file{}.go", i), src)
                    .unwrap()
                    .parse_file()
                    .unwrap()
            })
            .collect()
    }

    fn check_sources(
        importer: &mut MapImporter,
        path: &str,
        sources: &[&str],
    ) -> Result<Package, TypeCheckError> {
        let files = parse_all(sources);
        check(path, &files, importer)
    }

    const MODEL: &str = r#"
package model

type ID string

type Item struct {
	ID    ID `json:"id"`
	Value []byte
}

type Closer interface {
	Close() error
}
"#;

    fn importer() -> MapImporter {
        MapImporter::default().with("github.com/acme/model", &[MODEL])
    }

    #[test]
    fn test_empty_package() {
        let mut imp = importer();
        let pkg = check_sources(&mut imp, "github.com/acme/empty", &[]).unwrap();
        assert_eq!(pkg.name, "empty");
        assert_eq!(pkg.path, "github.com/acme/empty");
        assert!(pkg.scope.is_empty());
    }

    #[test]
    fn test_interface_with_imported_types() {
        let src = r#"
package store

import "github.com/acme/model"

type Store interface {
	model.Closer
	Get(id model.ID) (*model.Item, error)
	Put(items ...*model.Item) error
}
"#;
        let mut imp = importer();
        let pkg = check_sources(&mut imp, "github.com/acme/store", &[src]).unwrap();
        assert_eq!(imp.requests, vec!["github.com/acme/model"]);
        assert_eq!(pkg.imports, vec!["github.com/acme/model"]);

        let store = pkg.interface("Store").unwrap();
        let names: Vec<_> = store.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Close", "Get", "Put"]);

        let get = store.method("Get").unwrap();
        let model = PackageRef::new("github.com/acme/model", "model");
        assert_eq!(
            get.signature.params.at(0).unwrap().ty,
            Type::named(Some(model.clone()), "ID")
        );
        assert_eq!(
            get.signature.results.at(0).unwrap().ty,
            Type::pointer(Type::named(Some(model), "Item"))
        );
        assert_eq!(get.signature.results.at(1).unwrap().ty, universe::error_type());

        let put = store.method("Put").unwrap();
        assert!(put.signature.variadic);
        assert_eq!(
            signature_string(&put.signature, &RelativeTo { path: "x".into() }),
            "(items ...*model.Item) error"
        );
    }

    #[test]
    fn test_unsafe_is_built_in() {
        let src = r#"
package raw

import "unsafe"

type Buffer interface {
	Addr() unsafe.Pointer
}
"#;
        let mut imp = importer();
        let pkg = check_sources(&mut imp, "example/raw", &[src]).unwrap();
        assert!(imp.requests.is_empty());
        assert_eq!(pkg.imports, vec!["unsafe"]);

        let addr = pkg.interface("Buffer").unwrap().method("Addr").unwrap();
        assert_eq!(
            addr.signature.results.at(0).unwrap().ty,
            Type::named(Some(PackageRef::new("unsafe", "unsafe")), "Pointer")
        );
    }

    #[test]
    fn test_local_named_types_and_methods() {
        let src = r#"
package cache

type Key string

func (k Key) String() string { return string(k) }

type Cache interface {
	Lookup(k Key) (value []byte, ok bool)
}

var Default Cache
const Size = 16
"#;
        let mut imp = importer();
        let pkg = check_sources(&mut imp, "github.com/acme/cache", &[src]).unwrap();

        let key = pkg.type_name("Key").unwrap();
        assert_eq!(key.underlying, Type::Basic(BasicKind::String));
        assert_eq!(pkg.methods_of("Key")[0].name, "String");

        let lookup = pkg.interface("Cache").unwrap().method("Lookup").unwrap();
        assert_eq!(
            lookup.signature.params.at(0).unwrap().ty,
            Type::named(Some(PackageRef::new("github.com/acme/cache", "cache")), "Key")
        );
        assert_eq!(lookup.signature.results.len(), 2);

        assert!(matches!(pkg.lookup("Default"), Some(Object::Var(v)) if v.ty.is_some()));
        assert!(matches!(pkg.lookup("Size"), Some(Object::Const(v)) if v.ty.is_none()));
    }

    #[test]
    fn test_declarations_across_files() {
        let a = "package multi\n\ntype Reader interface { Read() Chunk }\n";
        let b = "package multi\n\ntype Chunk []byte\n";
        let mut imp = importer();
        let pkg = check_sources(&mut imp, "example/multi", &[a, b]).unwrap();
        assert_eq!(pkg.interface_names(), vec!["Reader"]);
        assert_eq!(pkg.type_name("Chunk").unwrap().underlying, Type::slice(Type::Basic(BasicKind::Byte)));
    }

    #[test]
    fn test_alias_resolves_to_target() {
        let src = r#"
package alias

import m "github.com/acme/model"

type Closer = m.Closer
type Bytes = []byte

type Sink interface {
	Closer
	Write(b Bytes) error
}
"#;
        let mut imp = importer();
        let pkg = check_sources(&mut imp, "example/alias", &[src]).unwrap();
        let sink = pkg.interface("Sink").unwrap();
        assert!(sink.method("Close").is_some());
        assert_eq!(
            sink.method("Write").unwrap().signature.params.at(0).unwrap().ty,
            Type::slice(Type::Basic(BasicKind::Byte))
        );
    }

    #[test]
    fn test_embedded_error_interface() {
        let src = "package errs\n\ntype Coded interface {\n\terror\n\tCode() int\n}\n";
        let mut imp = importer();
        let pkg = check_sources(&mut imp, "example/errs", &[src]).unwrap();
        let coded = pkg.interface("Coded").unwrap();
        assert!(coded.method("Error").is_some());
        assert_eq!(coded.embedded, vec![universe::error_type()]);
    }

    #[test]
    fn test_self_referential_interface_is_valid() {
        let src = "package tree\n\ntype Node interface {\n\tChildren() []Node\n}\n";
        let mut imp = importer();
        assert!(check_sources(&mut imp, "example/tree", &[src]).is_ok());
    }

    #[test]
    fn test_recursive_embedding_rejected() {
        let src = "package loop\n\ntype A interface { B }\ntype B interface { A }\n";
        let mut imp = importer();
        let err = check_sources(&mut imp, "example/loop", &[src]).unwrap_err();
        assert!(matches!(err, TypeCheckError::InvalidRecursiveType { .. }), "{err}");
    }

    #[test]
    fn test_undefined_name_has_suggestion() {
        let src = "package bad\n\ntype Store interface {\n\tGet() Strng\n}\n";
        let mut imp = importer();
        let err = check_sources(&mut imp, "example/bad", &[src]).unwrap_err();
        match &err {
            TypeCheckError::Undefined { name, suggestions, span } => {
                assert_eq!(name, "Strng");
                assert!(suggestions.contains(&"string".to_string()));
                assert_eq!((span.line, span.column), (4, 8));
                assert_eq!(span.file, "file0.go");
            }
            other => panic!("Expected Undefined, got {:?}", other),
        }
        let diagnostic = err.to_diagnostic();
        assert!(diagnostic.help.unwrap().contains("string"));
    }

    #[test]
    fn test_unexported_and_missing_qualified_names() {
        let mut imp = importer();
        let src = "package q\n\nimport \"github.com/acme/model\"\n\ntype T interface { F() model.id }\n";
        let err = check_sources(&mut imp, "example/q", &[src]).unwrap_err();
        assert!(matches!(err, TypeCheckError::Unexported { .. }), "{err}");

        let src = "package q\n\nimport \"github.com/acme/model\"\n\ntype T interface { F() model.Itme }\n";
        let err = check_sources(&mut imp, "example/q", &[src]).unwrap_err();
        match err {
            TypeCheckError::Undefined { name, suggestions, .. } => {
                assert_eq!(name, "model.Itme");
                assert_eq!(suggestions, vec!["Item".to_string()]);
            }
            other => panic!("Expected Undefined, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_package_qualifier() {
        let src = "package q\n\ntype T interface { F() modle.Item }\n";
        let mut imp = importer();
        let err = check_sources(&mut imp, "example/q", &[src]).unwrap_err();
        assert!(matches!(err, TypeCheckError::UnknownPackage { ref name, .. } if name == "modle"));
    }

    #[test]
    fn test_failed_import_is_reported() {
        let src = "package q\n\nimport \"github.com/acme/missing\"\n";
        let mut imp = importer();
        let err = check_sources(&mut imp, "example/q", &[src]).unwrap_err();
        match err {
            TypeCheckError::ImportFailed { path, source, .. } => {
                assert_eq!(path, "github.com/acme/missing");
                assert!(source.to_string().contains("cannot find package"));
            }
            other => panic!("Expected ImportFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_import_is_loaded_but_not_bound() {
        let src = "package q\n\nimport _ \"github.com/acme/model\"\n\ntype T interface { F() model.ID }\n";
        let mut imp = importer();
        let err = check_sources(&mut imp, "example/q", &[src]).unwrap_err();
        assert_eq!(imp.requests, vec!["github.com/acme/model"]);
        assert!(matches!(err, TypeCheckError::UnknownPackage { .. }));
    }

    #[test]
    fn test_dot_import_rejected() {
        let src = "package q\n\nimport . \"github.com/acme/model\"\n";
        let mut imp = importer();
        let err = check_sources(&mut imp, "example/q", &[src]).unwrap_err();
        assert!(matches!(err, TypeCheckError::DotImport { .. }));
        assert!(imp.requests.is_empty());
    }

    #[test]
    fn test_package_clause_mismatch() {
        let a = "package one\n";
        let b = "package two\n";
        let mut imp = importer();
        let err = check_sources(&mut imp, "example/one", &[a, b]).unwrap_err();
        match err {
            TypeCheckError::MismatchedPackage { expected, found, span } => {
                assert_eq!(expected, "one");
                assert_eq!(found, "two");
                assert_eq!(span.file, "file1.go");
            }
            other => panic!("Expected MismatchedPackage, got {:?}", other),
        }
    }

    #[test]
    fn test_redeclaration() {
        let a = "package dup\n\ntype Store interface{}\n";
        let b = "package dup\n\nvar Store int\n";
        let mut imp = importer();
        let err = check_sources(&mut imp, "example/dup", &[a, b]).unwrap_err();
        assert!(matches!(err, TypeCheckError::Redeclared { ref name, .. } if name == "Store"));
    }

    #[test]
    fn test_conflicting_embedded_methods() {
        let src = r#"
package conflict

type A interface { Close() error }
type B interface { Close() }
type C interface {
	A
	B
}
"#;
        let mut imp = importer();
        let err = check_sources(&mut imp, "example/conflict", &[src]).unwrap_err();
        assert!(matches!(err, TypeCheckError::DuplicateMethod { ref name, .. } if name == "Close"));
    }

    #[test]
    fn test_identical_embedded_methods_merge() {
        let src = r#"
package merge

type A interface { Close() error }
type B interface { Close() error; Flush() }
type C interface {
	A
	B
}
"#;
        let mut imp = importer();
        let pkg = check_sources(&mut imp, "example/merge", &[src]).unwrap();
        assert_eq!(pkg.interface("C").unwrap().methods.len(), 2);
    }

    #[test]
    fn test_embedding_non_interface() {
        let src = "package emb\n\ntype N int\ntype I interface { N }\n";
        let mut imp = importer();
        let err = check_sources(&mut imp, "example/emb", &[src]).unwrap_err();
        assert!(matches!(err, TypeCheckError::InvalidEmbedding { ref name, .. } if name == "N"));
    }

    #[test]
    fn test_method_on_foreign_type() {
        let src = "package recv\n\nfunc (s *Missing) Close() {}\n";
        let mut imp = importer();
        let err = check_sources(&mut imp, "example/recv", &[src]).unwrap_err();
        assert!(matches!(err, TypeCheckError::InvalidReceiver { .. }));
    }

    #[test]
    fn test_value_used_as_type() {
        let src = "package val\n\nvar Limit int\n\ntype I interface { Max() Limit }\n";
        let mut imp = importer();
        let err = check_sources(&mut imp, "example/val", &[src]).unwrap_err();
        assert!(matches!(err, TypeCheckError::NotAType { .. }));
    }

    #[test]
    fn test_struct_fields() {
        let mut imp = importer();
        let model = imp.import("github.com/acme/model").unwrap();
        let Type::Struct(fields) = &model.type_name("Item").unwrap().underlying else {
            panic!("Expected struct");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].tag.as_deref(), Some("json:\"id\""));
        assert!(!fields[0].embedded);
    }
}
