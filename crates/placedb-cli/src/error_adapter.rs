//! Error adapter for converting PlaceDbError to miette diagnostics.
//!
//! Parse failures carry the text of the file they came from, so each of
//! their diagnostics is rendered with a source snippet. A load failure is
//! reported as its own line followed by whatever caused it.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, NamedSource, SourceSpan};

use placedb::PlaceDbError;
use placedb_parser::{Diagnostic, Span};

/// Adapter for a single parser diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    file: String,
    src: NamedSource<String>,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter for a diagnostic of the file `file`.
    pub fn new(diag: &'a Diagnostic, file: impl Into<String>, src: &str) -> Self {
        let file = file.into();
        Self {
            diag,
            src: NamedSource::new(&file, src.to_string()),
            file,
        }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .field("file", &self.file)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        if self.diag.severity().is_warning() {
            Some(miette::Severity::Warning)
        } else {
            Some(miette::Severity::Error)
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for [`PlaceDbError`] variants without source locations.
pub struct ErrorAdapter<'a>(pub &'a PlaceDbError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.0 {
            // The cause is reported separately by `to_reportables`.
            PlaceDbError::Load { .. } => None,
            err => std::error::Error::source(err),
        }
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            PlaceDbError::Io(_) => "placedb::io",
            PlaceDbError::Parse { .. } => "placedb::parse",
            PlaceDbError::Build(_) => "placedb::build",
            PlaceDbError::UnsupportedFormat { .. } => "placedb::unsupported_format",
            PlaceDbError::Params(_) => "placedb::params",
            PlaceDbError::Load { .. } => "placedb::load",
            PlaceDbError::Reader(_) => "placedb::reader",
            PlaceDbError::RowLookup(_) => "placedb::row_lookup",
            PlaceDbError::OffGrid { .. } => "placedb::off_grid",
            PlaceDbError::ShortSolution { .. } => "placedb::short_solution",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            PlaceDbError::UnsupportedFormat { .. } => {
                "only Bookshelf designs can be read by this tool"
            }
            PlaceDbError::RowLookup(_) | PlaceDbError::OffGrid { .. } => {
                "the solution moves a node outside the placement rows"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }
}

/// An error ready to be rendered by miette.
pub type Reportable<'a> = Box<dyn MietteDiagnostic + 'a>;

fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`PlaceDbError`] into a list of reportable errors.
///
/// [`PlaceDbError::Parse`] yields one [`Reportable`] per diagnostic.
/// [`PlaceDbError::Load`] yields itself followed by the reportables of its
/// cause. Every other variant yields a single [`Reportable`].
pub fn to_reportables(err: &PlaceDbError) -> Vec<Reportable<'_>> {
    match err {
        PlaceDbError::Parse {
            err: parse_err,
            path,
            src,
        } => {
            let file = path.display().to_string();
            parse_err
                .diagnostics()
                .iter()
                .map(|d| {
                    Box::new(DiagnosticAdapter::new(d, file.clone(), src)) as Reportable<'_>
                })
                .collect()
        }
        PlaceDbError::Load { source, .. } => {
            let mut reportables = vec![Box::new(ErrorAdapter(err)) as Reportable<'_>];
            reportables.extend(to_reportables(source));
            reportables
        }
        _ => vec![Box::new(ErrorAdapter(err)) as Reportable<'_>],
    }
}
