// Diagnostics for package resolution and type checking
// Rust-style rendering with locations, notes, help and "did you mean" suggestions

use colored::Colorize;
use std::fmt;

/// Source code location (line, column, file)
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

impl Span {
    pub fn new(file: impl Into<String>, line: usize, column: usize, length: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            length,
        }
    }

    pub fn unknown() -> Self {
        Self::new("<unknown>", 0, 0, 0)
    }

    pub fn is_known(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLevel {
    Error,
    Warning,
    Note,
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorLevel::Error => write!(f, "{}", "error".red().bold()),
            ErrorLevel::Warning => write!(f, "{}", "warning".yellow().bold()),
            ErrorLevel::Note => write!(f, "{}", "note".cyan().bold()),
        }
    }
}

/// Structured diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: ErrorLevel,
    pub code: String,
    pub message: String,
    pub span: Span,
    pub notes: Vec<String>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn new(level: ErrorLevel, code: &str, message: String, span: Span) -> Self {
        Self {
            level,
            code: code.to_string(),
            message,
            span,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn error(code: &str, message: String, span: Span) -> Self {
        Self::new(ErrorLevel::Error, code, message, span)
    }

    pub fn warning(code: &str, message: String, span: Span) -> Self {
        Self::new(ErrorLevel::Warning, code, message, span)
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    /// Format diagnostic with a highlighted line from `source_code`
    pub fn format(&self, source_code: &str) -> String {
        let mut output = self.header();

        if let Some(snippet) = self.get_source_snippet(source_code) {
            output.push_str(&snippet);
        }
        output.push_str(&self.trailer());

        output
    }

    fn header(&self) -> String {
        let mut output = if self.code.is_empty() {
            format!("{}: {}\n", self.level, self.message.bold())
        } else {
            format!("{}[{}]: {}\n", self.level, self.code, self.message.bold())
        };

        if self.span.is_known() {
            output.push_str(&format!(" {} {}\n", "-->".cyan().bold(), self.span));
        }
        output
    }

    fn trailer(&self) -> String {
        let mut output = String::new();

        for note in &self.notes {
            output.push_str(&format!(" {} {}\n", "=".cyan().bold(), note.cyan()));
        }

        if let Some(help) = &self.help {
            output.push_str(&format!(" {} {}\n", "help:".green().bold(), help));
        }

        output
    }

    /// Extract source code snippet with error highlight
    fn get_source_snippet(&self, source_code: &str) -> Option<String> {
        if !self.span.is_known() {
            return None;
        }
        let line = source_code.lines().nth(self.span.line - 1)?;
        let line_num_width = self.span.line.to_string().len().max(2);

        let mut snippet = String::new();
        snippet.push_str(&format!(" {}\n", " ".repeat(line_num_width + 1).cyan()));
        snippet.push_str(&format!(
            " {} {} {}\n",
            format!("{:>width$}", self.span.line, width = line_num_width)
                .cyan()
                .bold(),
            "|".cyan().bold(),
            line
        ));

        let padding = " ".repeat(self.span.column.saturating_sub(1) + 1);
        let underline = "^".repeat(self.span.length.max(1));
        snippet.push_str(&format!(
            " {} {}{}\n",
            " ".repeat(line_num_width).cyan(),
            padding,
            underline.red().bold()
        ));

        Some(snippet)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.header(), self.trailer())
    }
}

/// Diagnostic codes
pub mod error_codes {
    // Errors (E0001-E9999)
    pub const UNRESOLVED_PACKAGE: &str = "E0001";
    pub const TYPE_CHECK_FAILED: &str = "E0002";
    pub const UNDEFINED_NAME: &str = "E0003";
    pub const UNKNOWN_INTERFACE: &str = "E0004";
    pub const NOT_AN_INTERFACE: &str = "E0005";
    pub const EXPORT_FAILED: &str = "E0006";

    // Warnings (W0001-W9999)
    pub const SOURCE_TREE_DISCARDED: &str = "W0001";
}

/// Fuzzy matching utilities for "did you mean?" suggestions
pub mod fuzzy {
    use strsim::jaro_winkler;

    /// Find similar names using fuzzy matching (Jaro-Winkler similarity).
    /// Returns up to `max_suggestions` names with similarity above `threshold`.
    pub fn find_similar_names<S: AsRef<str>>(
        target: &str,
        candidates: &[S],
        threshold: f64,
        max_suggestions: usize,
    ) -> Vec<String> {
        let mut scored: Vec<(&str, f64)> = candidates
            .iter()
            .map(|candidate| {
                let candidate = candidate.as_ref();
                (candidate, jaro_winkler(target, candidate))
            })
            .filter(|(_, score)| *score > threshold)
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        scored
            .into_iter()
            .take(max_suggestions)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Render suggestions as a help line, if there are any
    pub fn did_you_mean(suggestions: &[String]) -> Option<String> {
        match suggestions {
            [] => None,
            [only] => Some(format!("did you mean `{}`?", only)),
            many => Some(format!(
                "did you mean one of: {}?",
                many.iter()
                    .map(|s| format!("`{}`", s))
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}
