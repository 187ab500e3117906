use log::debug;
use winnow::Parser as _;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    lexer::tokenize,
    parser::{IResult, Input, at_end, colon, split_lines, word},
    span::{Span, Spanned},
};

/// The file names listed by an `.aux` file, as written in it.
#[derive(Debug, Clone, PartialEq)]
pub struct AuxFile<'src> {
    /// Placement kind, usually `RowBasedPlacement`.
    pub kind: Spanned<&'src str>,
    pub nodes: Spanned<&'src str>,
    pub nets: Spanned<&'src str>,
    pub pl: Spanned<&'src str>,
    pub scl: Spanned<&'src str>,
    pub wts: Option<Spanned<&'src str>>,
}

struct AuxLine<'src> {
    kind: Spanned<&'src str>,
    files: Vec<Spanned<&'src str>>,
}

/// `<kind> : <file>...`
fn aux_line<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<AuxLine<'src>> {
    let kind = word.parse_next(input)?;
    colon.parse_next(input)?;
    let mut files = vec![word.parse_next(input)?];
    while !at_end(input) {
        files.push(word.parse_next(input)?);
    }
    Ok(AuxLine { kind, files })
}

/// Files found so far, by role.
#[derive(Default)]
struct Listed<'src> {
    nodes: Option<Spanned<&'src str>>,
    nets: Option<Spanned<&'src str>>,
    wts: Option<Spanned<&'src str>>,
    pl: Option<Spanned<&'src str>>,
    scl: Option<Spanned<&'src str>>,
}

impl<'src> Listed<'src> {
    fn slot(&mut self, file: &str) -> Option<&mut Option<Spanned<&'src str>>> {
        let (_, extension) = file.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "nodes" => Some(&mut self.nodes),
            "nets" => Some(&mut self.nets),
            "wts" => Some(&mut self.wts),
            "pl" => Some(&mut self.pl),
            "scl" => Some(&mut self.scl),
            _ => None,
        }
    }
}

/// Parses an `.aux` file.
///
/// The single design line is `<kind> : <file>...`. Files are matched to
/// their role by extension, ignoring ASCII case, and files with other
/// extensions are skipped with a warning.
///
/// # Errors
///
/// Returns a malformed or repeated design line, repeated file kinds, and
/// a missing `.nodes`, `.nets`, `.pl` or `.scl` entry. The `.wts` file is
/// optional.
pub fn parse_aux(source: &str) -> Result<AuxFile<'_>, ParseError> {
    let tokens = tokenize(source)?;
    let lines = split_lines(&tokens);
    let mut diagnostics = DiagnosticCollector::new();

    let Some((first, rest)) = lines.split_first() else {
        return Err(Diagnostic::error("empty aux file")
            .with_code(ErrorCode::E101)
            .with_label(Span::default(), "expected `<kind> : <files>`")
            .into());
    };
    for extra in rest {
        diagnostics.emit(
            Diagnostic::error("aux file lists more than one design")
                .with_code(ErrorCode::E301)
                .with_label(extra.span(), "duplicate definition")
                .with_secondary_label(first.span(), "first defined here"),
        );
    }

    let line = match first.parse(aux_line) {
        Ok(line) => line,
        Err(diagnostic) => {
            diagnostics.emit(diagnostic);
            return Err(diagnostics.into_error());
        }
    };

    let mut listed = Listed::default();
    for file in line.files {
        match listed.slot(file.inner()) {
            Some(Some(previous)) => diagnostics.emit(
                Diagnostic::error(format!("`{}` repeats a file kind", file.inner()))
                    .with_code(ErrorCode::E301)
                    .with_label(file.span(), "duplicate definition")
                    .with_secondary_label(previous.span(), "first defined here"),
            ),
            Some(slot) => *slot = Some(file),
            None => diagnostics.emit(
                Diagnostic::warning(format!("ignoring `{}`", file.inner()))
                    .with_label(file.span(), "unknown file kind"),
            ),
        }
    }

    let kind = line.kind;
    let (Some(nodes), Some(nets), Some(pl), Some(scl)) =
        (listed.nodes, listed.nets, listed.pl, listed.scl)
    else {
        let required = [
            ("nodes", listed.nodes),
            ("nets", listed.nets),
            ("pl", listed.pl),
            ("scl", listed.scl),
        ];
        for (extension, _) in required.iter().filter(|(_, file)| file.is_none()) {
            diagnostics.emit(
                Diagnostic::error(format!("no `.{extension}` file listed"))
                    .with_code(ErrorCode::E302)
                    .with_label(kind.span(), ErrorCode::E302.description()),
            );
        }
        return Err(diagnostics.into_error());
    };

    debug!(kind:% = kind.inner(); "Parsed aux file");
    diagnostics.finish_with(AuxFile {
        kind,
        nodes,
        nets,
        pl,
        scl,
        wts: listed.wts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Severity;

    #[test]
    fn test_parse_aux() {
        let source = "RowBasedPlacement : tiny.nodes tiny.nets tiny.wts tiny.pl tiny.scl\n";
        let aux = parse_aux(source).unwrap();

        assert_eq!(*aux.kind.inner(), "RowBasedPlacement");
        assert_eq!(*aux.nodes.inner(), "tiny.nodes");
        assert_eq!(*aux.nets.inner(), "tiny.nets");
        assert_eq!(*aux.pl.inner(), "tiny.pl");
        assert_eq!(*aux.scl.inner(), "tiny.scl");
        assert_eq!(aux.wts.map(|wts| *wts.inner()), Some("tiny.wts"));
    }

    #[test]
    fn test_order_and_case_do_not_matter() {
        let aux = parse_aux("RowBasedPlacement : a.SCL a.PL a.Nets a.nodes\n").unwrap();

        assert_eq!(*aux.scl.inner(), "a.SCL");
        assert!(aux.wts.is_none());
    }

    #[test]
    fn test_missing_files() {
        let err = parse_aux("RowBasedPlacement : a.nodes a.nets\n").unwrap_err();

        let messages = err
            .diagnostics()
            .iter()
            .map(|diag| diag.message())
            .collect::<Vec<_>>();
        assert_eq!(messages, ["no `.pl` file listed", "no `.scl` file listed"]);
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E302));
        assert_eq!(err.diagnostics()[0].labels()[0].span(), Span::new(0..17));
    }

    #[test]
    fn test_unknown_file_is_a_warning() {
        let source = "RowBasedPlacement : a.nodes a.nets a.pl a.scl a.shapes\n";
        assert!(parse_aux(source).is_ok());

        let err = parse_aux("RowBasedPlacement : a.shapes\n").unwrap_err();
        assert_eq!(err.diagnostics()[0].severity(), Severity::Warning);
    }

    #[test]
    fn test_empty_aux() {
        let err = parse_aux("# nothing here\n").unwrap_err();

        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E101));
    }
}
