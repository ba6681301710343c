// Recursive-descent parser for Go-style declaration sources
// Only declarations are kept; function bodies and initializers are skipped

use crate::{ParseError, SourceLocation};
use automock_ast::*;
use automock_lexer::{Lexer, Token, TokenSpan};

mod items;
mod types;

pub struct Parser<'a> {
    pub(crate) tokens: Vec<TokenSpan>,
    pub(crate) current: usize,
    pub(crate) source: &'a str,
    pub(crate) file: String,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Result<Self, ParseError> {
        Self::with_file("<input>", source)
    }

    /// Create a parser whose error locations and positions name `file`
    pub fn with_file(file: &str, source: &'a str) -> Result<Self, ParseError> {
        // A leading byte order mark is not part of the first token
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        let mut tokens = Vec::new();
        for result in Lexer::new(source) {
            match result {
                Ok(token) => tokens.push(token),
                Err(automock_lexer::LexError::InvalidToken { span }) => {
                    return Err(ParseError::LexerError {
                        location: SourceLocation::from_span(file, source, span),
                    })
                }
            }
        }

        Ok(Self {
            tokens,
            current: 0,
            source,
            file: file.to_string(),
        })
    }

    /// Tokens produced by the lexer (with inserted semicolons)
    pub fn tokens(&self) -> &[TokenSpan] {
        &self.tokens
    }

    pub fn parse_file(&mut self) -> Result<SourceFile, ParseError> {
        self.consume(&Token::Package, "Expected 'package' clause")?;
        let package = self.expect_ident("Expected package name")?;
        self.expect_terminator()?;

        let mut imports = Vec::new();
        while self.check(&Token::Import) {
            self.advance();
            self.parse_import_decl(&mut imports)?;
            self.expect_terminator()?;
        }

        let mut decls = Vec::new();
        while !self.is_at_end() {
            if self.match_token(&Token::Semicolon) {
                continue;
            }
            if self.check(&Token::Import) {
                return Err(self.error("Imports must appear before other declarations"));
            }
            self.parse_top_level_decl(&mut decls)?;
            self.expect_terminator()?;
        }

        Ok(SourceFile {
            path: self.file.clone(),
            package,
            imports,
            decls,
        })
    }

    // ==================== Helper Methods ====================

    pub(crate) fn match_token(&mut self, kind: &Token) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, kind: &Token) -> bool {
        match self.peek() {
            Some(token) => std::mem::discriminant(token) == std::mem::discriminant(kind),
            None => false,
        }
    }

    pub(crate) fn check_next(&self, kind: &Token) -> bool {
        match self.tokens.get(self.current + 1) {
            Some(next) => std::mem::discriminant(&next.token) == std::mem::discriminant(kind),
            None => false,
        }
    }

    pub(crate) fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current).map(|t| &t.token)
    }

    pub(crate) fn consume(&mut self, kind: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    pub(crate) fn expect_ident(&mut self, message: &str) -> Result<Ident, ParseError> {
        let pos = self.current_pos();
        match self.peek() {
            Some(Token::Ident(name)) => {
                let ident = Ident::new(name.clone(), pos);
                self.advance();
                Ok(ident)
            }
            _ => Err(self.error(message)),
        }
    }

    pub(crate) fn expect_string(&mut self, message: &str) -> Result<String, ParseError> {
        match self.peek() {
            Some(Token::StringLiteral(value)) => {
                let value = value.clone();
                self.advance();
                Ok(value)
            }
            _ => Err(self.error(message)),
        }
    }

    /// A declaration ends with ';' (possibly inserted) or the end of input
    pub(crate) fn expect_terminator(&mut self) -> Result<(), ParseError> {
        if self.match_token(&Token::Semicolon) || self.is_at_end() {
            Ok(())
        } else {
            Err(self.error("Expected ';' or newline after declaration"))
        }
    }

    /// Inside a parenthesized group, a spec ends with ';' or the closing ')'
    pub(crate) fn expect_group_separator(&mut self) -> Result<(), ParseError> {
        if self.match_token(&Token::Semicolon) || self.check(&Token::RParen) {
            Ok(())
        } else {
            Err(self.error("Expected ';' or ')' in declaration group"))
        }
    }

    fn current_span(&self) -> std::ops::Range<usize> {
        match self.tokens.get(self.current) {
            Some(token) => token.span.clone(),
            None => self.source.len()..self.source.len(),
        }
    }

    pub(crate) fn location(&self) -> SourceLocation {
        SourceLocation::from_span(&self.file, self.source, self.current_span())
    }

    pub(crate) fn current_pos(&self) -> Pos {
        let location = self.location();
        Pos {
            line: location.line,
            column: location.column,
        }
    }

    pub(crate) fn error(&self, message: &str) -> ParseError {
        let message = match self.peek() {
            Some(token) => format!("{} (found {:?})", message, token),
            None => format!("{} (found end of file)", message),
        };
        ParseError::SyntaxError {
            location: self.location(),
            message,
        }
    }

    pub(crate) fn unsupported(&self, feature: &'static str) -> ParseError {
        ParseError::Unsupported {
            location: self.location(),
            feature,
        }
    }

    /// Skip a balanced `{ ... }` block (function bodies)
    pub(crate) fn skip_block(&mut self) -> Result<(), ParseError> {
        self.consume(&Token::LBrace, "Expected '{'")?;
        let mut depth = 1usize;

        while depth > 0 {
            match self.peek() {
                Some(Token::LBrace) => depth += 1,
                Some(Token::RBrace) => depth -= 1,
                Some(_) => {}
                None => return Err(self.error("Unterminated block")),
            }
            self.advance();
        }

        Ok(())
    }

    /// Skip an initializer expression list up to the ';' or ')' that ends the spec
    pub(crate) fn skip_expression_list(&mut self) -> Result<(), ParseError> {
        let mut depth = 0usize;

        loop {
            match self.peek() {
                None => return Ok(()),
                Some(Token::Semicolon) if depth == 0 => return Ok(()),
                Some(Token::RParen) if depth == 0 => return Ok(()),
                Some(Token::LParen) | Some(Token::LBracket) | Some(Token::LBrace) => depth += 1,
                Some(Token::RParen) | Some(Token::RBracket) | Some(Token::RBrace) => {
                    if depth == 0 {
                        return Err(self.error("Unbalanced delimiter in initializer"));
                    }
                    depth -= 1;
                }
                Some(_) => {}
            }
            self.advance();
        }
    }
}
