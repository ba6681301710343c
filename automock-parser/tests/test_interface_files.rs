use automock_ast::*;
use automock_parser::{ParseError, Parser};

const STORE_SOURCE: &str = r#"// Package store persists items.
package store

import (
	"context"
	"time"

	"github.com/acme/model"
)

// Store is implemented by every backend.
type Store interface {
	Get(ctx context.Context, id model.ID) (*model.Item, error)
	Put(ctx context.Context, items ...*model.Item) error
	Expire(ttl time.Duration)
	Close() error
}

type memory struct {
	items map[model.ID]*model.Item
}

func (m *memory) Close() error { return nil }

func New() Store {
	return &memory{items: map[model.ID]*model.Item{}}
}
"#;

#[test]
fn test_store_interface_file() {
    let mut parser = Parser::with_file("store.go", STORE_SOURCE).expect("Parser::new failed");
    let file = parser.parse_file().expect("Parse failed");

    assert_eq!(file.path, "store.go");
    assert_eq!(file.package.name, "store");
    assert_eq!(file.imports.len(), 3);
    assert_eq!(file.decls.len(), 4);

    let store = file.type_specs().find(|s| s.name.name == "Store").unwrap();
    let TypeExpr::Interface(elems) = &store.ty else {
        panic!("Expected interface, got {:?}", store.ty);
    };
    let names: Vec<_> = elems
        .iter()
        .filter_map(|e| match e {
            InterfaceElem::Method { name, .. } => Some(name.name.as_str()),
            InterfaceElem::Embedded(_) => None,
        })
        .collect();
    assert_eq!(names, vec!["Get", "Put", "Expire", "Close"]);

    if let InterfaceElem::Method { signature, .. } = &elems[1] {
        assert!(signature.is_variadic());
    }
}

#[test]
fn test_positions_are_recorded() {
    let mut parser = Parser::with_file("store.go", STORE_SOURCE).unwrap();
    let file = parser.parse_file().unwrap();

    let store = file.type_specs().find(|s| s.name.name == "Store").unwrap();
    assert_eq!(store.name.pos, Pos { line: 12, column: 6 });
}

#[test]
fn test_syntax_error_reports_file_and_line() {
    let source = "package store\n\ntype Store interface {\n\tGet(key string\n}\n";
    let err = Parser::with_file("broken.go", source)
        .unwrap()
        .parse_file()
        .unwrap_err();

    match err {
        ParseError::SyntaxError { location, .. } => {
            assert_eq!(location.file, "broken.go");
            assert_eq!(location.line, 4);
        }
        other => panic!("Expected syntax error, got {:?}", other),
    }
}
