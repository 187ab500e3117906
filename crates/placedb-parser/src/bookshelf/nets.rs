use log::debug;
use winnow::{Parser as _, combinator::peek, token::any};

use placedb_core::net::PinDirection;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    lexer::tokenize,
    parser::{
        Context, IResult, Input, at_end, attribute, check_count, colon, keyword, number,
        opt_colon, split_lines, strip_header, word,
    },
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// The content of a `.nets` file.
#[derive(Debug, Clone, PartialEq)]
pub struct NetsFile<'src> {
    pub nets: Vec<NetRecord<'src>>,
}

impl NetsFile<'_> {
    pub fn num_pins(&self) -> usize {
        self.nets.iter().map(|net| net.pins.len()).sum()
    }
}

/// A `NetDegree : k [name]` line and the pin lines following it.
#[derive(Debug, Clone, PartialEq)]
pub struct NetRecord<'src> {
    pub name: Option<Spanned<&'src str>>,
    pub pins: Vec<PinRecord<'src>>,
}

/// `node [I|O|B] [: dx dy]`
#[derive(Debug, Clone, PartialEq)]
pub struct PinRecord<'src> {
    pub node: Spanned<&'src str>,
    pub direction: PinDirection,
    /// Offset from the centre of the node.
    pub offset: (f64, f64),
}

struct NetHeader<'src> {
    degree: Spanned<usize>,
    name: Option<Spanned<&'src str>>,
}

fn net_header<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<NetHeader<'src>> {
    keyword("NetDegree").parse_next(input)?;
    colon.parse_next(input)?;
    let degree = number.parse_next(input)?;
    let name = if at_end(input) {
        None
    } else {
        Some(word.parse_next(input)?)
    };
    Ok(NetHeader { degree, name })
}

fn pin_direction<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<PinDirection> {
    any.verify_map(|token: &PositionedToken<'src>| match token.token {
        Token::Word(text) => text.parse().ok(),
        _ => None,
    })
    .context(Context::Label("pin direction"))
    .parse_next(input)
}

fn pin_record<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<PinRecord<'src>> {
    let node = word.parse_next(input)?;
    let direction = if at_end(input) || peek(colon).parse_next(input).is_ok() {
        PinDirection::default()
    } else {
        pin_direction.parse_next(input)?
    };
    let offset = if opt_colon.parse_next(input)? {
        let dx = number::<f64>.parse_next(input)?;
        let dy = number::<f64>.parse_next(input)?;
        (dx.into_inner(), dy.into_inner())
    } else {
        (0.0, 0.0)
    };

    Ok(PinRecord {
        node,
        direction,
        offset,
    })
}

/// A net whose pins are still being read.
struct OpenNet<'src> {
    record: NetRecord<'src>,
    degree: Spanned<usize>,
}

impl<'src> OpenNet<'src> {
    fn close(self, diagnostics: &mut DiagnosticCollector) -> NetRecord<'src> {
        let found = self.record.pins.len();
        if *self.degree.inner() != found {
            let name = self
                .record
                .name
                .map_or_else(|| "net".to_string(), |name| format!("net `{}`", name.inner()));
            diagnostics.emit(
                Diagnostic::error(format!(
                    "{name} declares {} pins but {found} follow",
                    self.degree.inner()
                ))
                .with_code(ErrorCode::E201)
                .with_label(self.degree.span(), "declared here"),
            );
        }
        self.record
    }
}

/// Parses a `.nets` file.
///
/// # Errors
///
/// Returns every malformed line, pins outside of a net, and `NumNets`,
/// `NumPins` or `NetDegree` counts that do not match the records.
pub fn parse_nets(source: &str) -> Result<NetsFile<'_>, ParseError> {
    let tokens = tokenize(source)?;
    let lines = split_lines(&tokens);
    let mut diagnostics = DiagnosticCollector::new();

    let mut num_nets = None;
    let mut num_pins = None;
    let mut nets = Vec::new();
    let mut open: Option<OpenNet<'_>> = None;

    for line in strip_header(&lines, "nets", &mut diagnostics) {
        let parsed = if line.starts_with("NumNets") {
            line.parse(attribute("NumNets"))
                .map(|count| num_nets = Some(count))
        } else if line.starts_with("NumPins") {
            line.parse(attribute("NumPins"))
                .map(|count| num_pins = Some(count))
        } else if line.starts_with("NetDegree") {
            line.parse(net_header).map(|header| {
                if let Some(net) = open.take() {
                    nets.push(net.close(&mut diagnostics));
                }
                open = Some(OpenNet {
                    record: NetRecord {
                        name: header.name,
                        pins: Vec::new(),
                    },
                    degree: header.degree,
                });
            })
        } else {
            line.parse(pin_record).and_then(|pin| match open.as_mut() {
                Some(net) => {
                    net.record.pins.push(pin);
                    Ok(())
                }
                None => Err(pin_outside_net(line.span())),
            })
        };
        if let Err(diagnostic) = parsed {
            diagnostics.emit(diagnostic);
        }
    }
    if let Some(net) = open.take() {
        nets.push(net.close(&mut diagnostics));
    }

    let file = NetsFile { nets };
    check_count(&mut diagnostics, "nets", num_nets, file.nets.len());
    check_count(&mut diagnostics, "pins", num_pins, file.num_pins());

    debug!(num_nets = file.nets.len(), num_pins = file.num_pins(); "Parsed nets file");
    diagnostics.finish_with(file)
}

fn pin_outside_net(span: Span) -> Diagnostic {
    Diagnostic::error("pin outside of a net")
        .with_code(ErrorCode::E202)
        .with_label(span, ErrorCode::E202.description())
        .with_help("start the net with a `NetDegree : <pins> <name>` line")
}
