use log::debug;
use winnow::Parser as _;

use crate::{
    error::{DiagnosticCollector, ParseError},
    lexer::tokenize,
    parser::{IResult, Input, number, split_lines, strip_header, word},
    span::Spanned,
};

/// The content of a `.wts` file.
#[derive(Debug, Clone, PartialEq)]
pub struct WtsFile<'src> {
    pub weights: Vec<WeightRecord<'src>>,
}

/// `name weight`
#[derive(Debug, Clone, PartialEq)]
pub struct WeightRecord<'src> {
    pub name: Spanned<&'src str>,
    pub weight: f64,
}

fn weight_record<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<WeightRecord<'src>> {
    let name = word.parse_next(input)?;
    let weight = number::<f64>.parse_next(input)?;
    Ok(WeightRecord {
        name,
        weight: weight.into_inner(),
    })
}

/// Parses a `.wts` file.
///
/// # Errors
///
/// Returns every malformed line.
pub fn parse_wts(source: &str) -> Result<WtsFile<'_>, ParseError> {
    let tokens = tokenize(source)?;
    let lines = split_lines(&tokens);
    let mut diagnostics = DiagnosticCollector::new();
    let mut weights = Vec::new();

    for line in strip_header(&lines, "wts", &mut diagnostics) {
        match line.parse(weight_record) {
            Ok(record) => weights.push(record),
            Err(diagnostic) => diagnostics.emit(diagnostic),
        }
    }

    debug!(num_weights = weights.len(); "Parsed wts file");
    diagnostics.finish_with(WtsFile { weights })
}
