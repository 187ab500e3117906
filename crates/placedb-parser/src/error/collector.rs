//! Accumulates diagnostics so that one pass reports every bad line.

use log::warn;

use crate::error::{Diagnostic, ParseError};

#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Returns `Err` with every diagnostic if any of them is an error.
    ///
    /// Warnings alone are logged and dropped.
    pub fn finish(self) -> Result<(), ParseError> {
        if self.has_errors {
            return Err(ParseError::new(self.diagnostics));
        }
        for diagnostic in &self.diagnostics {
            warn!(diagnostic:% = diagnostic; "Parser warning");
        }
        Ok(())
    }

    /// Like [`DiagnosticCollector::finish`], yielding `value` on success.
    pub fn finish_with<T>(self, value: T) -> Result<T, ParseError> {
        self.finish().map(|()| value)
    }

    /// Turns everything collected so far into an error, for callers that
    /// have no value to return.
    pub fn into_error(self) -> ParseError {
        ParseError::new(self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, span::Span};

    #[test]
    fn test_empty_collector_is_ok() {
        assert!(DiagnosticCollector::new().finish().is_ok());
    }

    #[test]
    fn test_warnings_only_is_ok() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("unused weight"));

        assert!(!collector.has_errors());
        assert_eq!(collector.finish_with(7), Ok(7));
    }

    #[test]
    fn test_errors_keep_every_diagnostic() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(
            Diagnostic::error("bad line")
                .with_code(ErrorCode::E100)
                .with_label(Span::new(10..20), "here"),
        );
        collector.emit(Diagnostic::warning("suspicious line"));
        collector.emit(Diagnostic::error("another bad line"));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 3);
        assert_eq!(err.diagnostics()[0].message(), "bad line");
    }
}
