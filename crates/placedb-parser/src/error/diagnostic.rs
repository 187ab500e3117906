//! The core diagnostic type.

use std::fmt;

use crate::{
    error::{ErrorCode, Label, Severity},
    span::Span,
};

/// A single error or warning with labelled source spans.
///
/// ```text
/// error[E201]: `NumNodes` declares 4 nodes but 3 were found
///   --> tiny.nodes:3:1
///    |
///  3 | NumNodes : 4
///    | ^^^^^^^^^^^^ declared here
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use placedb_parser::{Diagnostic, ErrorCode, Span};
    /// let diag = Diagnostic::error("undefined node `o7`")
    ///     .with_code(ErrorCode::E300)
    ///     .with_label(Span::new(0..2), "not in the .nodes file");
    /// assert_eq!(diag.to_string(), "error[E300]: undefined node `o7`");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_defaults() {
        let diag = Diagnostic::error("bad line");

        assert!(diag.severity().is_error());
        assert_eq!(diag.message(), "bad line");
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::error("node `a` is defined multiple times")
            .with_code(ErrorCode::E301)
            .with_label(Span::new(40..41), "duplicate definition")
            .with_secondary_label(Span::new(10..11), "first defined here")
            .with_help("rename one of the nodes");

        assert_eq!(diag.code(), Some(ErrorCode::E301));
        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_primary());
        assert!(diag.labels()[1].is_secondary());
        assert_eq!(diag.help(), Some("rename one of the nodes"));
    }

    #[test]
    fn test_diagnostic_display() {
        let with_code = Diagnostic::error("unexpected token").with_code(ErrorCode::E100);
        let without_code = Diagnostic::warning("empty net");

        assert_eq!(with_code.to_string(), "error[E100]: unexpected token");
        assert_eq!(without_code.to_string(), "warning: empty net");
    }
}
