use automock_diagnostics::{error_codes, fuzzy, Diagnostic, Span};
use thiserror::Error;

/// Error produced by a nested import while checking a package
pub type ImportError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum TypeCheckError {
    #[error("{span}: package {found}; expected package {expected}")]
    MismatchedPackage {
        span: Span,
        expected: String,
        found: String,
    },

    #[error("{span}: could not import {path}: {source}")]
    ImportFailed {
        span: Span,
        path: String,
        #[source]
        source: ImportError,
    },

    #[error("{span}: dot-import of {path} is not supported")]
    DotImport { span: Span, path: String },

    #[error("{span}: {name} redeclared in this block")]
    Redeclared { span: Span, name: String },

    #[error("{span}: undefined: {name}")]
    Undefined {
        span: Span,
        name: String,
        suggestions: Vec<String>,
    },

    #[error("{span}: undefined package {name}")]
    UnknownPackage {
        span: Span,
        name: String,
        suggestions: Vec<String>,
    },

    #[error("{span}: name {name} not exported by package {package}")]
    Unexported {
        span: Span,
        package: String,
        name: String,
    },

    #[error("{span}: {name} is not a type")]
    NotAType { span: Span, name: String },

    #[error("{span}: invalid recursive type {name}")]
    InvalidRecursiveType { span: Span, name: String },

    #[error("{span}: interface embeds non-interface type {name}")]
    InvalidEmbedding { span: Span, name: String },

    #[error("{span}: duplicate method {name}")]
    DuplicateMethod { span: Span, name: String },

    #[error("{span}: invalid receiver type {name}")]
    InvalidReceiver { span: Span, name: String },
}

impl TypeCheckError {
    pub fn span(&self) -> &Span {
        match self {
            TypeCheckError::MismatchedPackage { span, .. }
            | TypeCheckError::ImportFailed { span, .. }
            | TypeCheckError::DotImport { span, .. }
            | TypeCheckError::Redeclared { span, .. }
            | TypeCheckError::Undefined { span, .. }
            | TypeCheckError::UnknownPackage { span, .. }
            | TypeCheckError::Unexported { span, .. }
            | TypeCheckError::NotAType { span, .. }
            | TypeCheckError::InvalidRecursiveType { span, .. }
            | TypeCheckError::InvalidEmbedding { span, .. }
            | TypeCheckError::DuplicateMethod { span, .. }
            | TypeCheckError::InvalidReceiver { span, .. } => span,
        }
    }

    /// Render as a diagnostic, with suggestions where the checker found any
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = match self {
            TypeCheckError::Undefined { .. } | TypeCheckError::UnknownPackage { .. } => {
                error_codes::UNDEFINED_NAME
            }
            _ => error_codes::TYPE_CHECK_FAILED,
        };
        let message = self.to_string();
        let message = message
            .strip_prefix(&format!("{}: ", self.span()))
            .map(str::to_string)
            .unwrap_or(message);

        let diagnostic = Diagnostic::error(code, message, self.span().clone());
        match self {
            TypeCheckError::Undefined { suggestions, .. }
            | TypeCheckError::UnknownPackage { suggestions, .. } => {
                match fuzzy::did_you_mean(suggestions) {
                    Some(help) => diagnostic.with_help(help),
                    None => diagnostic,
                }
            }
            TypeCheckError::ImportFailed { source, .. } => {
                diagnostic.with_note(format!("caused by: {}", source))
            }
            _ => diagnostic,
        }
    }
}
