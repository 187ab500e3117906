use log::debug;
use winnow::{Parser as _, token::any};

use placedb_core::orient::Orient;

use crate::{
    bookshelf::resolve_orient,
    error::{DiagnosticCollector, ParseError},
    lexer::tokenize,
    parser::{Context, IResult, Input, at_end, number, opt_colon, split_lines, strip_header, word},
    span::Spanned,
    tokens::{PositionedToken, Token},
};

/// The content of a `.pl` file.
#[derive(Debug, Clone, PartialEq)]
pub struct PlFile<'src> {
    pub records: Vec<PlRecord<'src>>,
}

/// Fixed flags of a `.pl` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlStatus {
    /// `/FIXED`
    Fixed,
    /// `/FIXED_NI`, fixed but overlappable.
    FixedNi,
}

impl PlStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PlStatus::Fixed => "/FIXED",
            PlStatus::FixedNi => "/FIXED_NI",
        }
    }
}

/// `name x y [: orient] [/FIXED | /FIXED_NI]`
#[derive(Debug, Clone, PartialEq)]
pub struct PlRecord<'src> {
    pub name: Spanned<&'src str>,
    pub x: f64,
    pub y: f64,
    pub orient: Option<Orient>,
    pub status: Option<PlStatus>,
}

fn pl_status<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<PlStatus> {
    any.verify_map(|token: &PositionedToken<'src>| match token.token {
        Token::Word(text) if text.eq_ignore_ascii_case("/FIXED") => Some(PlStatus::Fixed),
        Token::Word(text) if text.eq_ignore_ascii_case("/FIXED_NI") => Some(PlStatus::FixedNi),
        _ => None,
    })
    .context(Context::Label("`/FIXED` or `/FIXED_NI`"))
    .parse_next(input)
}

struct RawRecord<'src> {
    name: Spanned<&'src str>,
    x: f64,
    y: f64,
    orient: Option<Spanned<&'src str>>,
    status: Option<PlStatus>,
}

fn pl_record<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<RawRecord<'src>> {
    let name = word.parse_next(input)?;
    let x = number::<f64>.parse_next(input)?;
    let y = number::<f64>.parse_next(input)?;
    let orient = if opt_colon.parse_next(input)? {
        Some(word.parse_next(input)?)
    } else {
        None
    };
    let status = if at_end(input) {
        None
    } else {
        Some(pl_status.parse_next(input)?)
    };

    Ok(RawRecord {
        name,
        x: x.into_inner(),
        y: y.into_inner(),
        orient,
        status,
    })
}

/// Parses a `.pl` file.
///
/// The `UCLA pl` header is required. Nodes are not resolved, so the same
/// parser reads both initial placements and solutions.
///
/// # Errors
///
/// Returns every malformed line and every unrecognized orientation.
pub fn parse_pl(source: &str) -> Result<PlFile<'_>, ParseError> {
    let tokens = tokenize(source)?;
    let lines = split_lines(&tokens);
    let mut diagnostics = DiagnosticCollector::new();
    let mut records = Vec::new();

    for line in strip_header(&lines, "pl", &mut diagnostics) {
        let parsed = line.parse(pl_record).and_then(|raw| {
            let orient = raw.orient.map(resolve_orient).transpose()?;
            records.push(PlRecord {
                name: raw.name,
                x: raw.x,
                y: raw.y,
                orient,
                status: raw.status,
            });
            Ok(())
        });
        if let Err(diagnostic) = parsed {
            diagnostics.emit(diagnostic);
        }
    }

    debug!(num_records = records.len(); "Parsed pl file");
    diagnostics.finish_with(PlFile { records })
}
