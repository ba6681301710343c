use thiserror::Error;

// Modular parser structure
mod parser;
pub use parser::Parser;

/// Source code location for error reporting
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

impl SourceLocation {
    pub fn from_span(file: &str, source: &str, span: std::ops::Range<usize>) -> Self {
        let start = span.start.min(source.len());
        let before = &source[..start];
        let line = before.matches('\n').count() + 1;
        let column = before.rfind('\n').map_or(start, |pos| start - pos - 1) + 1;
        let length = span.end.saturating_sub(span.start);

        Self {
            file: file.to_string(),
            line,
            column,
            length,
        }
    }

    pub fn unknown() -> Self {
        Self {
            file: "<unknown>".to_string(),
            line: 0,
            column: 0,
            length: 0,
        }
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Parse error at {location}: {message}")]
    SyntaxError {
        location: SourceLocation,
        message: String,
    },
    #[error("Lexer error at {location}: invalid token")]
    LexerError { location: SourceLocation },
    #[error("{location}: {feature} are not supported")]
    Unsupported {
        location: SourceLocation,
        feature: &'static str,
    },
}

impl ParseError {
    pub fn location(&self) -> &SourceLocation {
        match self {
            ParseError::SyntaxError { location, .. }
            | ParseError::LexerError { location }
            | ParseError::Unsupported { location, .. } => location,
        }
    }
}
