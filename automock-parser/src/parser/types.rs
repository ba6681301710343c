// Type expressions and signatures

use super::Parser;
use crate::ParseError;
use automock_ast::*;
use automock_lexer::Token;

/// One comma-separated entry of a parameter list before grouping
enum ParamEntry {
    /// A lone identifier: a parameter name or a type name, decided by the whole list
    Bare(Ident),
    Named(Ident, TypeExpr),
    Type(TypeExpr),
}

impl<'a> Parser<'a> {
    pub(crate) fn starts_type(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::Ident(_))
                | Some(Token::Star)
                | Some(Token::LBracket)
                | Some(Token::LParen)
                | Some(Token::Func)
                | Some(Token::Map)
                | Some(Token::Chan)
                | Some(Token::Interface)
                | Some(Token::Struct)
                | Some(Token::Arrow)
        )
    }

    pub(crate) fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        match self.peek() {
            Some(Token::Ident(_)) => self.parse_type_name(),
            Some(Token::Star) => {
                self.advance();
                Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            Some(Token::LBracket) => {
                self.advance();
                if self.match_token(&Token::RBracket) {
                    return Ok(TypeExpr::Slice(Box::new(self.parse_type()?)));
                }
                let len = self.collect_array_length()?;
                let elem = Box::new(self.parse_type()?);
                Ok(TypeExpr::Array { len, elem })
            }
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_type()?;
                self.consume(&Token::RParen, "Expected ')' after parenthesized type")?;
                Ok(inner)
            }
            Some(Token::Func) => {
                self.advance();
                Ok(TypeExpr::Func(self.parse_signature()?))
            }
            Some(Token::Map) => {
                self.advance();
                self.consume(&Token::LBracket, "Expected '[' after 'map'")?;
                let key = Box::new(self.parse_type()?);
                self.consume(&Token::RBracket, "Expected ']' after map key type")?;
                let value = Box::new(self.parse_type()?);
                Ok(TypeExpr::Map { key, value })
            }
            Some(Token::Chan) => {
                self.advance();
                let dir = if self.match_token(&Token::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                let elem = Box::new(self.parse_type()?);
                Ok(TypeExpr::Chan { dir, elem })
            }
            Some(Token::Arrow) => {
                self.advance();
                self.consume(&Token::Chan, "Expected 'chan' after '<-'")?;
                let elem = Box::new(self.parse_type()?);
                Ok(TypeExpr::Chan {
                    dir: ChanDir::Recv,
                    elem,
                })
            }
            Some(Token::Interface) => {
                self.advance();
                self.parse_interface_body()
            }
            Some(Token::Struct) => {
                self.advance();
                self.parse_struct_body()
            }
            _ => Err(self.error("Expected type")),
        }
    }

    /// Name or pkg.Name
    fn parse_type_name(&mut self) -> Result<TypeExpr, ParseError> {
        let first = self.expect_ident("Expected type name")?;
        let ty = if self.match_token(&Token::Dot) {
            let name = self.expect_ident("Expected type name after '.'")?;
            TypeExpr::Qualified {
                package: first,
                name,
            }
        } else {
            TypeExpr::Name(first)
        };

        if self.check(&Token::LBracket) {
            return Err(self.unsupported("generic type instantiations"));
        }
        Ok(ty)
    }

    /// Array length expression as written, up to the matching ']'
    fn collect_array_length(&mut self) -> Result<String, ParseError> {
        let start = match self.tokens.get(self.current) {
            Some(token) => token.span.start,
            None => return Err(self.error("Expected array length")),
        };
        let mut end = start;
        let mut depth = 0usize;

        loop {
            match self.peek() {
                None => return Err(self.error("Unterminated array length")),
                Some(Token::RBracket) if depth == 0 => break,
                Some(Token::LBracket) | Some(Token::LParen) => depth += 1,
                Some(Token::RBracket) | Some(Token::RParen) => depth = depth.saturating_sub(1),
                Some(_) => {}
            }
            if let Some(token) = self.tokens.get(self.current) {
                end = token.span.end;
            }
            self.advance();
        }
        self.consume(&Token::RBracket, "Expected ']' after array length")?;

        Ok(self.source[start..end].trim().to_string())
    }

    /// (params) [results]
    pub(crate) fn parse_signature(&mut self) -> Result<FuncType, ParseError> {
        let params = self.parse_parameters(true)?;
        let results = if self.check(&Token::LParen) {
            self.parse_parameters(false)?
        } else if self.starts_type() {
            vec![Field::unnamed(self.parse_type()?)]
        } else {
            Vec::new()
        };

        Ok(FuncType { params, results })
    }

    /// Parameter or result list.
    /// Either every entry is named (`a, b int, c string`) or none is (`int, error`).
    fn parse_parameters(&mut self, allow_variadic: bool) -> Result<Vec<Field>, ParseError> {
        self.consume(&Token::LParen, "Expected '('")?;
        let mut entries = Vec::new();

        while !self.check(&Token::RParen) {
            let entry = self.parse_param_entry(allow_variadic)?;
            entries.push(entry);
            if !self.match_token(&Token::Comma) {
                break;
            }
        }
        self.consume(&Token::RParen, "Expected ')' after parameter list")?;

        self.group_parameters(entries)
    }

    fn parse_param_entry(&mut self, allow_variadic: bool) -> Result<ParamEntry, ParseError> {
        if matches!(self.peek(), Some(Token::Ident(_))) {
            if self.check_next(&Token::Dot) {
                return Ok(ParamEntry::Type(self.parse_type()?));
            }
            if self.check_next(&Token::Comma) || self.check_next(&Token::RParen) {
                return Ok(ParamEntry::Bare(self.expect_ident("Expected parameter")?));
            }
            let name = self.expect_ident("Expected parameter name")?;
            let ty = self.parse_param_type(allow_variadic)?;
            return Ok(ParamEntry::Named(name, ty));
        }

        Ok(ParamEntry::Type(self.parse_param_type(allow_variadic)?))
    }

    fn parse_param_type(&mut self, allow_variadic: bool) -> Result<TypeExpr, ParseError> {
        if self.check(&Token::Ellipsis) {
            if !allow_variadic {
                return Err(self.error("Variadic '...' is only allowed in parameters"));
            }
            self.advance();
            return Ok(TypeExpr::Ellipsis(Box::new(self.parse_type()?)));
        }
        self.parse_type()
    }

    fn group_parameters(&self, entries: Vec<ParamEntry>) -> Result<Vec<Field>, ParseError> {
        let named = entries.iter().any(|e| matches!(e, ParamEntry::Named(..)));
        let mut fields = Vec::new();

        if !named {
            for entry in entries {
                let ty = match entry {
                    ParamEntry::Bare(ident) => TypeExpr::Name(ident),
                    ParamEntry::Type(ty) | ParamEntry::Named(_, ty) => ty,
                };
                fields.push(Field::unnamed(ty));
            }
        } else {
            let mut pending = Vec::new();
            for entry in entries {
                match entry {
                    ParamEntry::Bare(ident) => pending.push(ident),
                    ParamEntry::Named(name, ty) => {
                        pending.push(name);
                        fields.push(Field {
                            names: std::mem::take(&mut pending),
                            ty,
                            tag: None,
                        });
                    }
                    ParamEntry::Type(_) => {
                        return Err(self.error("Mixed named and unnamed parameters"));
                    }
                }
            }
            if !pending.is_empty() {
                return Err(self.error("Missing parameter type"));
            }
        }

        let last = fields.len().saturating_sub(1);
        for (i, field) in fields.iter().enumerate() {
            let variadic = matches!(field.ty, TypeExpr::Ellipsis(_));
            if variadic && (i != last || field.names.len() > 1) {
                return Err(self.error("Only the final parameter can be variadic"));
            }
        }

        Ok(fields)
    }

    fn parse_interface_body(&mut self) -> Result<TypeExpr, ParseError> {
        self.consume(&Token::LBrace, "Expected '{' after 'interface'")?;
        let mut elems = Vec::new();

        while !self.check(&Token::RBrace) {
            if self.match_token(&Token::Semicolon) {
                continue;
            }
            if self.check(&Token::Tilde) {
                return Err(self.unsupported("type constraint elements"));
            }

            let elem = if matches!(self.peek(), Some(Token::Ident(_)))
                && self.check_next(&Token::LParen)
            {
                let name = self.expect_ident("Expected method name")?;
                let signature = self.parse_signature()?;
                InterfaceElem::Method { name, signature }
            } else {
                InterfaceElem::Embedded(self.parse_type()?)
            };

            if self.check(&Token::Pipe) {
                return Err(self.unsupported("type constraint elements"));
            }
            elems.push(elem);

            if !self.match_token(&Token::Semicolon) && !self.check(&Token::RBrace) {
                return Err(self.error("Expected ';' or '}' after interface element"));
            }
        }
        self.consume(&Token::RBrace, "Expected '}' to close interface")?;

        Ok(TypeExpr::Interface(elems))
    }

    fn parse_struct_body(&mut self) -> Result<TypeExpr, ParseError> {
        self.consume(&Token::LBrace, "Expected '{' after 'struct'")?;
        let mut fields = Vec::new();

        while !self.check(&Token::RBrace) {
            if self.match_token(&Token::Semicolon) {
                continue;
            }
            let mut field = self.parse_struct_field()?;
            if let Some(Token::StringLiteral(tag)) = self.peek() {
                field.tag = Some(tag.clone());
                self.advance();
            }
            fields.push(field);

            if !self.match_token(&Token::Semicolon) && !self.check(&Token::RBrace) {
                return Err(self.error("Expected ';' or '}' after struct field"));
            }
        }
        self.consume(&Token::RBrace, "Expected '}' to close struct")?;

        Ok(TypeExpr::Struct(fields))
    }

    fn parse_struct_field(&mut self) -> Result<Field, ParseError> {
        let embedded = match self.peek() {
            Some(Token::Star) => true,
            Some(Token::Ident(_)) => {
                self.check_next(&Token::Dot)
                    || self.check_next(&Token::Semicolon)
                    || self.check_next(&Token::RBrace)
                    || matches!(
                        self.tokens.get(self.current + 1).map(|t| &t.token),
                        Some(Token::StringLiteral(_))
                    )
            }
            _ => return Err(self.error("Expected struct field")),
        };

        if embedded {
            return Ok(Field::unnamed(self.parse_type()?));
        }

        let mut names = vec![self.expect_ident("Expected field name")?];
        while self.match_token(&Token::Comma) {
            names.push(self.expect_ident("Expected field name after ','")?);
        }
        let ty = self.parse_type()?;

        Ok(Field {
            names,
            ty,
            tag: None,
        })
    }
}
