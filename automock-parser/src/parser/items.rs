// Top-level declarations: imports, types, functions, variables, constants

use super::Parser;
use crate::ParseError;
use automock_ast::*;
use automock_lexer::Token;

impl<'a> Parser<'a> {
    pub(crate) fn parse_import_decl(
        &mut self,
        imports: &mut Vec<ImportSpec>,
    ) -> Result<(), ParseError> {
        if !self.match_token(&Token::LParen) {
            imports.push(self.parse_import_spec()?);
            return Ok(());
        }

        while !self.check(&Token::RParen) {
            if self.is_at_end() {
                return Err(self.error("Unterminated import group"));
            }
            imports.push(self.parse_import_spec()?);
            self.expect_group_separator()?;
        }
        self.consume(&Token::RParen, "Expected ')' after import group")
    }

    fn parse_import_spec(&mut self) -> Result<ImportSpec, ParseError> {
        let pos = self.current_pos();
        let name = match self.peek() {
            Some(Token::Dot) => {
                self.advance();
                Some(ImportName::Dot)
            }
            Some(Token::Ident(name)) if name == "_" => {
                self.advance();
                Some(ImportName::Blank)
            }
            Some(Token::Ident(_)) => Some(ImportName::Named(self.expect_ident("Expected import name")?)),
            _ => None,
        };
        let path = self.expect_string("Expected import path string")?;
        if path.is_empty() {
            return Err(self.error("Import path must not be empty"));
        }

        Ok(ImportSpec { name, path, pos })
    }

    pub(crate) fn parse_top_level_decl(&mut self, decls: &mut Vec<Decl>) -> Result<(), ParseError> {
        match self.peek() {
            Some(Token::Type) => {
                self.advance();
                self.parse_group(decls, |p| Ok(Decl::Type(p.parse_type_spec()?)))
            }
            Some(Token::Var) => {
                self.advance();
                self.parse_group(decls, |p| Ok(Decl::Var(p.parse_value_spec()?)))
            }
            Some(Token::Const) => {
                self.advance();
                self.parse_group(decls, |p| Ok(Decl::Const(p.parse_value_spec()?)))
            }
            Some(Token::Func) => {
                self.advance();
                if let Some(func) = self.parse_func_decl()? {
                    decls.push(Decl::Func(func));
                }
                Ok(())
            }
            _ => Err(self.error("Expected top-level declaration (type, func, var, const)")),
        }
    }

    /// `kw spec` or `kw ( spec; spec; ... )`
    fn parse_group<F>(&mut self, decls: &mut Vec<Decl>, mut spec: F) -> Result<(), ParseError>
    where
        F: FnMut(&mut Self) -> Result<Decl, ParseError>,
    {
        if !self.match_token(&Token::LParen) {
            decls.push(spec(self)?);
            return Ok(());
        }

        while !self.check(&Token::RParen) {
            if self.is_at_end() {
                return Err(self.error("Unterminated declaration group"));
            }
            decls.push(spec(self)?);
            self.expect_group_separator()?;
        }
        self.consume(&Token::RParen, "Expected ')' after declaration group")
    }

    fn parse_type_spec(&mut self) -> Result<TypeSpec, ParseError> {
        let name = self.expect_ident("Expected type name")?;
        if self.check(&Token::LBracket) && self.is_type_parameter_list() {
            return Err(self.unsupported("type parameters"));
        }
        let is_alias = self.match_token(&Token::Eq);
        let ty = self.parse_type()?;

        Ok(TypeSpec { name, is_alias, ty })
    }

    /// `[T any]` after a type name, as opposed to an array length `[N]` or `[pkg.N]`
    fn is_type_parameter_list(&self) -> bool {
        let after_ident = match self.tokens.get(self.current + 1) {
            Some(t) if matches!(t.token, Token::Ident(_)) => self.tokens.get(self.current + 2),
            _ => return false,
        };
        !matches!(
            after_ident.map(|t| &t.token),
            Some(Token::RBracket) | Some(Token::Dot)
        )
    }

    fn parse_value_spec(&mut self) -> Result<ValueSpec, ParseError> {
        let mut names = vec![self.expect_ident("Expected identifier")?];
        while self.match_token(&Token::Comma) {
            names.push(self.expect_ident("Expected identifier after ','")?);
        }

        let ty = if self.starts_type() {
            Some(self.parse_type()?)
        } else {
            None
        };

        if self.match_token(&Token::Eq) {
            self.skip_expression_list()?;
        }

        Ok(ValueSpec { names, ty })
    }

    /// `None` for a generic function: its declaration is skipped and it
    /// contributes no symbol
    fn parse_func_decl(&mut self) -> Result<Option<FuncDecl>, ParseError> {
        let receiver = if self.check(&Token::LParen) {
            Some(self.parse_receiver()?)
        } else {
            None
        };

        let name = self.expect_ident("Expected function name")?;
        if receiver.is_none() && self.check(&Token::LBracket) {
            self.skip_signature()?;
            if self.check(&Token::LBrace) {
                self.skip_block()?;
            }
            return Ok(None);
        }
        let signature = self.parse_signature()?;

        if self.check(&Token::LBrace) {
            self.skip_block()?;
        }

        Ok(Some(FuncDecl {
            receiver,
            name,
            signature,
        }))
    }

    /// Skip type parameters, parameters and results up to the body or the
    /// end of the declaration. `struct {` and `interface {` open type
    /// literals, any other `{` at depth zero opens the body.
    fn skip_signature(&mut self) -> Result<(), ParseError> {
        let mut depth = 0usize;
        let mut after_type_keyword = false;

        loop {
            match self.peek() {
                None => return Ok(()),
                Some(Token::Semicolon) if depth == 0 => return Ok(()),
                Some(Token::LBrace) if depth == 0 && !after_type_keyword => return Ok(()),
                Some(Token::LParen) | Some(Token::LBracket) | Some(Token::LBrace) => depth += 1,
                Some(Token::RParen) | Some(Token::RBracket) | Some(Token::RBrace) => {
                    if depth == 0 {
                        return Err(self.error("Unbalanced delimiter in function signature"));
                    }
                    depth -= 1;
                }
                Some(_) => {}
            }
            after_type_keyword = matches!(self.peek(), Some(Token::Struct) | Some(Token::Interface));
            self.advance();
        }
    }

    /// (s *Store), (Store), (*Store)
    fn parse_receiver(&mut self) -> Result<Receiver, ParseError> {
        self.consume(&Token::LParen, "Expected '(' before receiver")?;

        let name = if matches!(self.peek(), Some(Token::Ident(_)))
            && !self.check_next(&Token::RParen)
            && !self.check_next(&Token::LBracket)
        {
            Some(self.expect_ident("Expected receiver name")?)
        } else {
            None
        };
        let pointer = self.match_token(&Token::Star);
        let base = self.expect_ident("Expected receiver type")?;
        if self.check(&Token::LBracket) {
            return Err(self.unsupported("generic receivers"));
        }

        self.consume(&Token::RParen, "Expected ')' after receiver")?;
        Ok(Receiver {
            name,
            pointer,
            base,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::Parser;
    use automock_ast::*;

    fn parse(source: &str) -> SourceFile {
        Parser::new(source).unwrap().parse_file().unwrap()
    }

    #[test]
    fn test_import_forms() {
        let file = parse(
            r#"package a

import "context"

import (
	"io"
	myfmt "fmt"
	_ "embed"
	. "strings"
)
"#,
        );

        let paths: Vec<_> = file.imports.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["context", "io", "fmt", "embed", "strings"]);
        assert_eq!(file.imports[1].name, None);
        assert!(matches!(&file.imports[2].name, Some(ImportName::Named(id)) if id.name == "myfmt"));
        assert_eq!(file.imports[3].name, Some(ImportName::Blank));
        assert_eq!(file.imports[4].name, Some(ImportName::Dot));
    }

    #[test]
    fn test_grouped_types_and_alias() {
        let file = parse("package a\ntype (\n\tID string\n\tKey = ID\n)\n");
        let specs: Vec<_> = file.type_specs().collect();

        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].name.name, "ID");
        assert!(!specs[0].is_alias);
        assert!(specs[1].is_alias);
    }

    #[test]
    fn test_method_body_is_skipped() {
        let file = parse(
            r#"package a

func (s *store) Get(key string) (string, error) {
	if v, ok := s.items[key]; ok {
		return v, nil
	}
	return "", errNotFound
}
"#,
        );

        match &file.decls[0] {
            Decl::Func(func) => {
                let receiver = func.receiver.as_ref().unwrap();
                assert!(receiver.pointer);
                assert_eq!(receiver.base.name, "store");
                assert_eq!(func.name.name, "Get");
                assert_eq!(func.signature.results.len(), 2);
            }
            other => panic!("Expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_var_and_const_initializers_skipped() {
        let file = parse(
            r#"package a

var (
	errNotFound = errors.New("not found")
	handler func(int) error = func(n int) error { return nil }
)

const (
	A Mode = iota
	B
)
"#,
        );

        assert_eq!(file.decls.len(), 4);
        match &file.decls[1] {
            Decl::Var(spec) => assert!(matches!(spec.ty, Some(TypeExpr::Func(_)))),
            other => panic!("Expected var, got {:?}", other),
        }
        match &file.decls[3] {
            Decl::Const(spec) => {
                assert_eq!(spec.names[0].name, "B");
                assert!(spec.ty.is_none());
            }
            other => panic!("Expected const, got {:?}", other),
        }
    }

    #[test]
    fn test_generic_type_rejected() {
        let err = Parser::new("package a\ntype List[T any] struct{}\n")
            .unwrap()
            .parse_file()
            .unwrap_err();
        assert!(matches!(err, crate::ParseError::Unsupported { .. }));
    }

    #[test]
    fn test_generic_func_is_skipped() {
        let file = parse(
            r#"package a

func Map[T any](xs []T, f func(T) T) []T {
	out := make([]T, 0, len(xs))
	for _, x := range xs {
		out = append(out, f(x))
	}
	return out
}

func Zero[T interface{ ~int | ~string }]() struct{ v T } { return struct{ v T }{} }

func Keep(n int) int
"#,
        );

        assert_eq!(file.decls.len(), 1);
        match &file.decls[0] {
            Decl::Func(func) => assert_eq!(func.name.name, "Keep"),
            other => panic!("Expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_array_type_decl_not_mistaken_for_generics() {
        let file = parse("package a\ntype Buf [size]byte\n");
        let spec = file.type_specs().next().unwrap();
        assert!(matches!(spec.ty, TypeExpr::Array { .. }));
    }
}
