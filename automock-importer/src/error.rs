use automock_diagnostics::{error_codes, Diagnostic, ErrorLevel, Span};
use automock_parser::ParseError;
use automock_types::TypeCheckError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of the precompiled package database
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("no package database available for {path}")]
    Unavailable { path: String },

    #[error("no export data for {path}")]
    NotFound { path: String },

    #[error("could not read export data {}: {source}", file.display())]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed export data {}: {reason}", file.display())]
    Malformed { file: PathBuf, reason: String },
}

/// Source-tree failure that is recovered by falling back to the database
#[derive(Error, Debug)]
pub enum SourceTreeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Check(#[from] TypeCheckError),

    #[error("{}:{line}:{column}: source is not valid UTF-8", file.display())]
    Encoding {
        file: PathBuf,
        line: usize,
        column: usize,
    },
}

impl SourceTreeError {
    /// Encoding error pointing at the first invalid byte of `bytes`
    pub fn encoding(file: PathBuf, bytes: &[u8], valid_up_to: usize) -> Self {
        let valid = &bytes[..valid_up_to];
        let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = valid
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        SourceTreeError::Encoding {
            file,
            line,
            column: valid_up_to - line_start + 1,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            SourceTreeError::Check(err) => err.to_diagnostic(),
            SourceTreeError::Parse(err) => {
                let loc = err.location();
                let message = match err {
                    ParseError::SyntaxError { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                Diagnostic::error(
                    error_codes::TYPE_CHECK_FAILED,
                    message,
                    Span::new(loc.file.clone(), loc.line, loc.column, loc.length),
                )
            }
            SourceTreeError::Encoding { file, line, column } => Diagnostic::error(
                error_codes::TYPE_CHECK_FAILED,
                "source is not valid UTF-8".to_string(),
                Span::new(file.display().to_string(), *line, *column, 1),
            ),
        }
    }
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("could not read {}: {source}", file.display())]
    FileRead {
        path: String,
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("import cycle not allowed: {}", cycle.join(" -> "))]
    ImportCycle { cycle: Vec<String> },

    #[error("cannot resolve package {path}: {source}")]
    Unresolved {
        path: String,
        #[source]
        source: DatabaseError,
        /// Source-tree error that was discarded in favor of the database
        discarded: Option<Box<SourceTreeError>>,
    },
}

impl ResolveError {
    /// Diagnostics for display: the failure itself plus, as a warning,
    /// the source-tree error that triggered the fallback
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let primary = Diagnostic::error(
            error_codes::UNRESOLVED_PACKAGE,
            self.to_string(),
            Span::unknown(),
        );

        match self {
            ResolveError::Unresolved {
                discarded: Some(discarded),
                ..
            } => {
                let mut secondary = discarded.to_diagnostic();
                secondary.level = ErrorLevel::Warning;
                secondary.code = error_codes::SOURCE_TREE_DISCARDED.to_string();
                vec![
                    primary.with_note("the source tree was found but could not be loaded".to_string()),
                    secondary,
                ]
            }
            ResolveError::ImportCycle { .. } => vec![primary
                .with_help("break the cycle or provide export data for one of the packages".to_string())],
            _ => vec![primary],
        }
    }
}
