//! Diagnostics reported while parsing placement files.
//!
//! Every problem is a [`Diagnostic`] with an [`ErrorCode`], a message and
//! labelled spans into the offending file. A file reports all of its bad
//! lines at once through a [`DiagnosticCollector`], which turns them into a
//! single [`ParseError`].

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
