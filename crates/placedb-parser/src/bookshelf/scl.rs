use log::debug;
use winnow::Parser as _;

use placedb_core::orient::Orient;

use crate::{
    bookshelf::resolve_orient,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    lexer::tokenize,
    parser::{
        IResult, Input, Line, attribute, check_count, colon, keyword, split_lines, strip_header,
        word,
    },
    span::{Span, Spanned},
};

/// The content of a `.scl` file.
#[derive(Debug, Clone, PartialEq)]
pub struct SclFile {
    pub rows: Vec<RowRecord>,
}

/// One `CoreRow Horizontal ... End` block.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRecord {
    /// Span of the `CoreRow` line.
    pub span: Span,
    /// Bottom edge of the row.
    pub coordinate: f64,
    pub height: f64,
    pub site_width: f64,
    pub site_spacing: f64,
    pub site_orient: Orient,
    /// Left edge of the row.
    pub subrow_origin: f64,
    pub num_sites: usize,
}

impl RowRecord {
    /// Right edge of the row.
    pub fn end_x(&self) -> f64 {
        self.subrow_origin + self.num_sites as f64 * self.site_spacing
    }
}

fn core_row<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<()> {
    keyword("CoreRow").parse_next(input)?;
    keyword("Horizontal").parse_next(input)?;
    Ok(())
}

/// `<name> : <word>`
fn word_attribute<'t, 'src: 't>(
    name: &'static str,
) -> impl FnMut(&mut Input<'t, 'src>) -> IResult<Spanned<&'src str>> {
    move |input: &mut Input<'t, 'src>| {
        keyword(name).parse_next(input)?;
        colon.parse_next(input)?;
        word.parse_next(input)
    }
}

/// `SubrowOrigin : <x> NumSites : <n>`
fn subrow<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<(f64, usize)> {
    let origin = attribute::<f64>("SubrowOrigin").parse_next(input)?;
    let num_sites = attribute::<usize>("NumSites").parse_next(input)?;
    Ok((origin.into_inner(), num_sites.into_inner()))
}

/// A `CoreRow` block whose `End` has not been read yet.
#[derive(Default)]
struct OpenRow {
    span: Span,
    coordinate: Option<f64>,
    height: Option<f64>,
    site_width: Option<f64>,
    site_spacing: Option<f64>,
    site_orient: Option<Orient>,
    subrow: Option<(f64, usize)>,
}

impl OpenRow {
    fn new(span: Span) -> Self {
        Self {
            span,
            ..Self::default()
        }
    }

    fn set(&mut self, line: &Line<'_, '_>) -> Result<(), Diagnostic> {
        if line.starts_with("Coordinate") {
            self.coordinate = Some(line.parse(attribute::<f64>("Coordinate"))?.into_inner());
        } else if line.starts_with("Height") {
            self.height = Some(line.parse(attribute::<f64>("Height"))?.into_inner());
        } else if line.starts_with("Sitewidth") {
            self.site_width = Some(line.parse(attribute::<f64>("Sitewidth"))?.into_inner());
        } else if line.starts_with("Sitespacing") {
            self.site_spacing = Some(line.parse(attribute::<f64>("Sitespacing"))?.into_inner());
        } else if line.starts_with("Siteorient") {
            let orient = line.parse(word_attribute("Siteorient"))?;
            self.site_orient = Some(resolve_orient(orient)?);
        } else if line.starts_with("Sitesymmetry") {
            line.parse(word_attribute("Sitesymmetry"))?;
        } else {
            self.subrow = Some(line.parse(subrow)?);
        }
        Ok(())
    }

    fn close(self, end: Span) -> Result<RowRecord, Diagnostic> {
        let missing = [
            ("Coordinate", self.coordinate.is_none()),
            ("Height", self.height.is_none()),
            ("SubrowOrigin", self.subrow.is_none()),
        ]
        .into_iter()
        .filter(|(_, missing)| *missing)
        .map(|(name, _)| format!("`{name}`"))
        .collect::<Vec<_>>();

        let (Some(coordinate), Some(height), Some((subrow_origin, num_sites))) =
            (self.coordinate, self.height, self.subrow)
        else {
            return Err(Diagnostic::error(format!("row is missing {}", missing.join(", ")))
                .with_code(ErrorCode::E205)
                .with_label(self.span, ErrorCode::E205.description())
                .with_secondary_label(end, "row ends here"));
        };

        let site_width = self.site_width.unwrap_or(1.0);
        Ok(RowRecord {
            span: self.span,
            coordinate,
            height,
            site_width,
            site_spacing: self.site_spacing.unwrap_or(site_width),
            site_orient: self.site_orient.unwrap_or(Orient::N),
            subrow_origin,
            num_sites,
        })
    }
}

fn unterminated(span: Span) -> Diagnostic {
    Diagnostic::error("row is never closed")
        .with_code(ErrorCode::E204)
        .with_label(span, ErrorCode::E204.description())
        .with_help("close the row with an `End` line")
}

const ROW_ATTRIBUTES: [&str; 7] = [
    "Coordinate",
    "Height",
    "Sitewidth",
    "Sitespacing",
    "Siteorient",
    "Sitesymmetry",
    "SubrowOrigin",
];

/// Parses a `.scl` file.
///
/// `Sitewidth` defaults to 1, `Sitespacing` to the site width and
/// `Siteorient` to `N`. `Sitesymmetry` is read and ignored.
///
/// # Errors
///
/// Returns every malformed line, rows that are never closed or lack a
/// required attribute, attributes outside of a row, and a `NumRows` count
/// that does not match the rows found.
pub fn parse_scl(source: &str) -> Result<SclFile, ParseError> {
    let tokens = tokenize(source)?;
    let lines = split_lines(&tokens);
    let mut diagnostics = DiagnosticCollector::new();

    let mut num_rows = None;
    let mut rows = Vec::new();
    let mut open: Option<OpenRow> = None;

    for line in strip_header(&lines, "scl", &mut diagnostics) {
        let parsed = if line.starts_with("NumRows") {
            line.parse(attribute("NumRows"))
                .map(|count| num_rows = Some(count))
        } else if line.starts_with("CoreRow") {
            line.parse(core_row).map(|()| {
                if let Some(row) = open.replace(OpenRow::new(line.span())) {
                    diagnostics.emit(unterminated(row.span));
                }
            })
        } else if line.starts_with("End") {
            line.parse(keyword("End")).and_then(|end| match open.take() {
                Some(row) => row.close(end).map(|row| rows.push(row)),
                None => Err(Diagnostic::error("`End` outside of a row")
                    .with_code(ErrorCode::E202)
                    .with_label(end, ErrorCode::E202.description())),
            })
        } else if ROW_ATTRIBUTES.iter().any(|name| line.starts_with(name)) {
            match open.as_mut() {
                Some(row) => row.set(line),
                None => Err(Diagnostic::error("row attribute outside of a row")
                    .with_code(ErrorCode::E202)
                    .with_label(line.span(), ErrorCode::E202.description())
                    .with_help("start the row with a `CoreRow Horizontal` line")),
            }
        } else {
            line.parse(core_row)
        };
        if let Err(diagnostic) = parsed {
            diagnostics.emit(diagnostic);
        }
    }
    if let Some(row) = open {
        diagnostics.emit(unterminated(row.span));
    }

    let file = SclFile { rows };
    check_count(&mut diagnostics, "rows", num_rows, file.rows.len());

    debug!(num_rows = file.rows.len(); "Parsed scl file");
    diagnostics.finish_with(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCL: &str = "\
UCLA scl 1.0

NumRows : 2

CoreRow Horizontal
  Coordinate    :  0
  Height        :  10
  Sitewidth     :  1
  Sitespacing   :  1
  Siteorient    :  N
  Sitesymmetry  :  Y
  SubrowOrigin  :  0  NumSites  :  100
End
CoreRow Horizontal
  Coordinate    :  10
  Height        :  10
  Siteorient    :  FS
  SubrowOrigin  :  5  Numsites  :  50
End
";

    #[test]
    fn test_parse_scl() {
        let file = parse_scl(SCL).unwrap();

        assert_eq!(file.rows.len(), 2);
        let first = &file.rows[0];
        assert_eq!(first.coordinate, 0.0);
        assert_eq!(first.height, 10.0);
        assert_eq!(first.site_orient, Orient::N);
        assert_eq!(first.end_x(), 100.0);

        let second = &file.rows[1];
        assert_eq!(second.site_orient, Orient::FS);
        assert_eq!(second.site_width, 1.0);
        assert_eq!(second.site_spacing, 1.0);
        assert_eq!(second.subrow_origin, 5.0);
        assert_eq!(second.end_x(), 55.0);
    }

    #[test]
    fn test_unterminated_row() {
        let source = "UCLA scl 1.0\nCoreRow Horizontal\nCoordinate : 0\n";
        let err = parse_scl(source).unwrap_err();

        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E204));
        assert_eq!(diag.labels()[0].span(), Span::new(13..31));
    }

    #[test]
    fn test_nested_row() {
        let source = "\
UCLA scl 1.0
CoreRow Horizontal
CoreRow Horizontal
Coordinate : 0
Height : 1
SubrowOrigin : 0 NumSites : 4
End
";
        let err = parse_scl(source).unwrap_err();

        assert_eq!(err.diagnostics().len(), 1);
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E204));
    }

    #[test]
    fn test_missing_attributes() {
        let source = "UCLA scl 1.0\nCoreRow Horizontal\nCoordinate : 0\nEnd\n";
        let err = parse_scl(source).unwrap_err();

        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E205));
        assert_eq!(diag.message(), "row is missing `Height`, `SubrowOrigin`");
    }

    #[test]
    fn test_attribute_outside_row() {
        let source = "UCLA scl 1.0\nHeight : 10\n";
        let err = parse_scl(source).unwrap_err();

        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E202));
    }

    #[test]
    fn test_vertical_row_is_rejected() {
        let source = "UCLA scl 1.0\nCoreRow Vertical\nEnd\n";
        let err = parse_scl(source).unwrap_err();

        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.message(), "unexpected `Vertical`, expected `Horizontal`");
    }
}
