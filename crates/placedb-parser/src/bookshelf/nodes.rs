use std::collections::HashMap;

use log::debug;
use winnow::{Parser as _, token::any};

use placedb_core::node::NodeKind;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    lexer::tokenize,
    parser::{
        Context, IResult, Input, at_end, attribute, check_count, number, split_lines,
        strip_header, word,
    },
    span::Spanned,
    tokens::{PositionedToken, Token},
};

/// The content of a `.nodes` file.
#[derive(Debug, Clone, PartialEq)]
pub struct NodesFile<'src> {
    pub nodes: Vec<NodeRecord<'src>>,
}

impl NodesFile<'_> {
    /// Number of `terminal` and `terminal_NI` nodes.
    pub fn num_terminals(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.kind != NodeKind::Cell)
            .count()
    }
}

/// `name width height [terminal | terminal_NI]`
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord<'src> {
    pub name: Spanned<&'src str>,
    pub width: f64,
    pub height: f64,
    /// [`NodeKind::Cell`] unless flagged as a terminal.
    pub kind: NodeKind,
}

fn terminal_flag<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<NodeKind> {
    any.verify_map(|token: &PositionedToken<'src>| match token.token {
        Token::Word(text) if text.eq_ignore_ascii_case("terminal") => Some(NodeKind::Terminal),
        Token::Word(text) if text.eq_ignore_ascii_case("terminal_NI") => {
            Some(NodeKind::TerminalNi)
        }
        _ => None,
    })
    .context(Context::Label("`terminal` or `terminal_NI`"))
    .parse_next(input)
}

fn node_record<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<NodeRecord<'src>> {
    let name = word.parse_next(input)?;
    let width = number::<f64>.parse_next(input)?;
    let height = number::<f64>.parse_next(input)?;
    let kind = if at_end(input) {
        NodeKind::Cell
    } else {
        terminal_flag.parse_next(input)?
    };

    Ok(NodeRecord {
        name,
        width: width.into_inner(),
        height: height.into_inner(),
        kind,
    })
}

/// Parses a `.nodes` file.
///
/// # Errors
///
/// Returns every malformed line, a `NumNodes` or `NumTerminals` count that
/// does not match the records, and node names defined more than once.
pub fn parse_nodes(source: &str) -> Result<NodesFile<'_>, ParseError> {
    let tokens = tokenize(source)?;
    let lines = split_lines(&tokens);
    let mut diagnostics = DiagnosticCollector::new();

    let mut num_nodes = None;
    let mut num_terminals = None;
    let mut nodes: Vec<NodeRecord<'_>> = Vec::new();
    let mut first_seen = HashMap::new();

    for line in strip_header(&lines, "nodes", &mut diagnostics) {
        let parsed = if line.starts_with("NumNodes") {
            line.parse(attribute("NumNodes"))
                .map(|count| num_nodes = Some(count))
        } else if line.starts_with("NumTerminals") {
            line.parse(attribute("NumTerminals"))
                .map(|count| num_terminals = Some(count))
        } else {
            line.parse(node_record).and_then(|record| {
                if let Some(&first) = first_seen.get(record.name.inner()) {
                    return Err(Diagnostic::error(format!(
                        "node `{}` is defined multiple times",
                        record.name.inner()
                    ))
                    .with_code(ErrorCode::E301)
                    .with_label(record.name.span(), "duplicate definition")
                    .with_secondary_label(first, "first defined here"));
                }
                first_seen.insert(*record.name.inner(), record.name.span());
                nodes.push(record);
                Ok(())
            })
        };
        if let Err(diagnostic) = parsed {
            diagnostics.emit(diagnostic);
        }
    }

    let file = NodesFile { nodes };
    check_count(&mut diagnostics, "nodes", num_nodes, file.nodes.len());
    check_count(
        &mut diagnostics,
        "terminals",
        num_terminals,
        file.num_terminals(),
    );

    debug!(
        num_nodes = file.nodes.len(),
        num_terminals = file.num_terminals();
        "Parsed nodes file"
    );
    diagnostics.finish_with(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;

    const NODES: &str = "\
UCLA nodes 1.0
# generated

NumNodes : 4
NumTerminals : 2
  o0  4 10
  o1  6 10
  p0  20 20 terminal
  p1  1 1 terminal_NI
";

    #[test]
    fn test_parse_nodes() {
        let file = parse_nodes(NODES).unwrap();

        assert_eq!(file.nodes.len(), 4);
        assert_eq!(file.num_terminals(), 2);
        assert_eq!(*file.nodes[1].name.inner(), "o1");
        assert_eq!(file.nodes[1].width, 6.0);
        assert_eq!(file.nodes[0].kind, NodeKind::Cell);
        assert_eq!(file.nodes[2].kind, NodeKind::Terminal);
        assert_eq!(file.nodes[3].kind, NodeKind::TerminalNi);
    }

    #[test]
    fn test_count_mismatch() {
        let source = "UCLA nodes 1.0\nNumNodes : 3\na 1 1\n";
        let err = parse_nodes(source).unwrap_err();

        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E201));
        assert_eq!(diag.message(), "3 nodes declared but 1 found");
        assert_eq!(diag.labels()[0].span(), Span::new(26..27));
    }

    #[test]
    fn test_every_bad_line_is_reported() {
        let source = "UCLA nodes 1.0\na 1\nb x 2\nc 1 1 fixed\nd 1 1\n";
        let err = parse_nodes(source).unwrap_err();

        let codes = err
            .diagnostics()
            .iter()
            .map(|diag| diag.code())
            .collect::<Vec<_>>();
        assert_eq!(
            codes,
            [
                Some(ErrorCode::E101),
                Some(ErrorCode::E100),
                Some(ErrorCode::E100)
            ]
        );
    }

    #[test]
    fn test_duplicate_node() {
        let source = "UCLA nodes 1.0\na 1 1\na 2 2\n";
        let err = parse_nodes(source).unwrap_err();

        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E301));
        assert_eq!(diag.labels()[0].span(), Span::new(21..22));
        assert_eq!(diag.labels()[1].span(), Span::new(15..16));
    }
}
