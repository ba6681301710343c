use logos::Logos;

/// Helper function to unescape interpreted string literals
fn unescape_string(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('a') => result.push('\x07'),
            Some('b') => result.push('\x08'),
            Some('f') => result.push('\x0C'),
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('v') => result.push('\x0B'),
            Some('"') => result.push('"'),
            Some('\'') => result.push('\''),
            Some('\\') => result.push('\\'),
            Some(kind @ ('x' | 'u' | 'U')) => {
                let width = match kind {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let hex: String = chars.by_ref().take(width).collect();
                if let Some(decoded) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
                {
                    result.push(decoded);
                }
            }
            Some(first @ '0'..='7') => {
                let mut octal = String::from(first);
                while octal.len() < 3 {
                    match chars.peek() {
                        Some(c @ '0'..='7') => {
                            octal.push(*c);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                if let Some(decoded) = u32::from_str_radix(&octal, 8).ok().and_then(char::from_u32)
                {
                    result.push(decoded);
                }
            }
            Some(c) => {
                result.push('\\');
                result.push(c);
            }
            None => result.push('\\'),
        }
    }

    result
}

/// Token types for Go-style declaration sources
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
pub enum Token {
    // Keywords
    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("type")]
    Type,
    #[token("func")]
    Func,
    #[token("var")]
    Var,
    #[token("const")]
    Const,
    #[token("struct")]
    Struct,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("chan")]
    Chan,
    #[token("return")]
    Return,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("fallthrough")]
    Fallthrough,

    // Operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Ampersand,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    LShift,
    #[token(">>")]
    RShift,
    #[token("&^")]
    AndNot,
    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("<-")]
    Arrow,
    #[token("++")]
    Increment,
    #[token("--")]
    Decrement,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("=")]
    Eq,
    #[token(":=")]
    Define,
    #[token("!")]
    Not,
    #[token("~")]
    Tilde,

    // Compound assignment
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpersandEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<=")]
    LShiftEq,
    #[token(">>=")]
    RShiftEq,
    #[token("&^=")]
    AndNotEq,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,

    // Literals (kept as source text, the parser never evaluates them)
    #[regex(r"(?:[0-9][0-9_]*(?:\.[0-9_]*)?(?:[eE][+-]?[0-9_]+)?|\.[0-9][0-9_]*(?:[eE][+-]?[0-9_]+)?)i", |lex| lex.slice().to_string())]
    ImaginaryLiteral(String),

    #[regex(r"[0-9][0-9_]*\.[0-9_]*(?:[eE][+-]?[0-9_]+)?|[0-9][0-9_]*[eE][+-]?[0-9_]+|\.[0-9][0-9_]*(?:[eE][+-]?[0-9_]+)?", |lex| lex.slice().to_string())]
    FloatLiteral(String),

    #[regex(r"0[xX][0-9a-fA-F_]+|0[oO][0-7_]+|0[bB][01_]+|[0-9][0-9_]*", |lex| lex.slice().to_string())]
    IntLiteral(String),

    #[regex(r"'(?:[^'\\\n]|\\[^\n][^'\n]*)'", |lex| {
        let s = lex.slice();
        unescape_string(&s[1..s.len()-1])
    })]
    RuneLiteral(String),

    #[regex(r#""(?:[^"\\\n]|\\[^\n])*""#, |lex| {
        let s = lex.slice();
        unescape_string(&s[1..s.len()-1])
    })]
    // Raw strings keep their content verbatim
    #[regex(r"`[^`]*`", |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    StringLiteral(String),

    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*", |lex| lex.slice().to_string())]
    Ident(String),

    // Layout tokens, consumed by `Lexer` for semicolon insertion and never yielded
    #[token("\n")]
    Newline,

    #[regex(r"/\*(?:[^*]|\*+[^*/])*\*+/", |lex| lex.slice().contains('\n'))]
    BlockComment(bool),

    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,
}

impl Token {
    /// Whether a newline directly after this token terminates the statement
    pub fn ends_statement(&self) -> bool {
        matches!(
            self,
            Token::Ident(_)
                | Token::IntLiteral(_)
                | Token::FloatLiteral(_)
                | Token::ImaginaryLiteral(_)
                | Token::RuneLiteral(_)
                | Token::StringLiteral(_)
                | Token::Return
                | Token::Break
                | Token::Continue
                | Token::Fallthrough
                | Token::Increment
                | Token::Decrement
                | Token::RParen
                | Token::RBracket
                | Token::RBrace
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenSpan {
    pub token: Token,
    pub span: std::ops::Range<usize>,
}

/// Token stream with automatic semicolon insertion.
///
/// A newline (or a block comment spanning lines) becomes a `Semicolon` when the
/// token before it can end a statement; otherwise it is dropped. The same rule
/// applies once at end of input.
pub struct Lexer<'source> {
    inner: logos::Lexer<'source, Token>,
    insert_semicolon: bool,
    finished: bool,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Self {
        Self {
            inner: Token::lexer(source),
            insert_semicolon: false,
            finished: false,
        }
    }

    fn implicit_semicolon(&mut self, span: std::ops::Range<usize>) -> TokenSpan {
        self.insert_semicolon = false;
        TokenSpan {
            token: Token::Semicolon,
            span,
        }
    }
}

impl<'source> Iterator for Lexer<'source> {
    type Item = Result<TokenSpan, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(token) = self.inner.next() else {
                if self.finished {
                    return None;
                }
                self.finished = true;
                if self.insert_semicolon {
                    let end = self.inner.source().len();
                    return Some(Ok(self.implicit_semicolon(end..end)));
                }
                return None;
            };
            let span = self.inner.span();

            match token {
                Ok(Token::Newline) | Ok(Token::BlockComment(true)) => {
                    if self.insert_semicolon {
                        return Some(Ok(self.implicit_semicolon(span)));
                    }
                }
                Ok(Token::BlockComment(false)) => {}
                Ok(tok) => {
                    self.insert_semicolon = tok.ends_statement();
                    return Some(Ok(TokenSpan { token: tok, span }));
                }
                Err(_) => return Some(Err(LexError::InvalidToken { span })),
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("Invalid token at {span:?}")]
    InvalidToken { span: std::ops::Range<usize> },
}
