//! Token-level combinators shared by the Bookshelf file parsers.
//!
//! Bookshelf records never span lines, so each file is split into [`Line`]s
//! and every line is parsed on its own. A malformed line becomes one
//! [`Diagnostic`] and parsing resumes with the next line.

use std::str::FromStr;

use winnow::{
    Parser as _,
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// What the parser expected when it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// A kind of token, such as "number".
    Label(&'static str),
    /// A specific keyword, compared case-insensitively.
    Keyword(&'static str),
}

pub(crate) type Input<'t, 'src> = TokenSlice<'t, PositionedToken<'src>>;
pub(crate) type IResult<O> = Result<O, ErrMode<ContextError<Context>>>;

/// Any word.
pub(crate) fn word<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<Spanned<&'src str>> {
    any.verify_map(|token: &PositionedToken<'src>| match token.token {
        Token::Word(text) => Some(Spanned::new(text, token.span)),
        _ => None,
    })
    .context(Context::Label("name"))
    .parse_next(input)
}

/// The word `name`, ignoring ASCII case.
pub(crate) fn keyword<'t, 'src: 't>(
    name: &'static str,
) -> impl FnMut(&mut Input<'t, 'src>) -> IResult<Span> {
    move |input: &mut Input<'t, 'src>| {
        any.verify_map(|token: &PositionedToken<'src>| match token.token {
            Token::Word(text) if text.eq_ignore_ascii_case(name) => Some(token.span),
            _ => None,
        })
        .context(Context::Keyword(name))
        .parse_next(input)
    }
}

pub(crate) fn colon<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'src>| token.token == Token::Colon)
        .void()
        .context(Context::Label("`:`"))
        .parse_next(input)
}

/// A word that parses as `T`.
pub(crate) fn number<'t, 'src, T: FromStr>(input: &mut Input<'t, 'src>) -> IResult<Spanned<T>> {
    any.verify_map(|token: &PositionedToken<'src>| match token.token {
        Token::Word(text) => text.parse().ok().map(|value| Spanned::new(value, token.span)),
        _ => None,
    })
    .context(Context::Label("number"))
    .parse_next(input)
}

/// `<name> : <number>`, the shape of count and attribute lines.
pub(crate) fn attribute<'t, 'src: 't, T: FromStr>(
    name: &'static str,
) -> impl FnMut(&mut Input<'t, 'src>) -> IResult<Spanned<T>> {
    move |input: &mut Input<'t, 'src>| {
        keyword(name).parse_next(input)?;
        colon.parse_next(input)?;
        number.parse_next(input)
    }
}

/// Returns `true` if the next token is a colon, consuming it.
pub(crate) fn opt_colon<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<bool> {
    let checkpoint = input.checkpoint();
    match colon.parse_next(input) {
        Ok(()) => Ok(true),
        Err(ErrMode::Backtrack(_)) => {
            input.reset(&checkpoint);
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

/// Returns `true` if no tokens are left on the line.
pub(crate) fn at_end(input: &Input<'_, '_>) -> bool {
    input.eof_offset() == 0
}

/// One non-empty line, without its newline token.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'t, 'src> {
    tokens: &'t [PositionedToken<'src>],
}

impl<'t, 'src> Line<'t, 'src> {
    /// Span from the first to the last token of the line.
    pub(crate) fn span(&self) -> Span {
        match (self.tokens.first(), self.tokens.last()) {
            (Some(first), Some(last)) => first.span.union(last.span),
            _ => Span::default(),
        }
    }

    /// Returns `true` if the line starts with `name`, ignoring ASCII case.
    pub(crate) fn starts_with(&self, name: &str) -> bool {
        matches!(
            self.tokens.first(),
            Some(PositionedToken { token: Token::Word(text), .. }) if text.eq_ignore_ascii_case(name)
        )
    }

    /// Runs `parser` over the whole line.
    ///
    /// # Errors
    ///
    /// Returns an `E100` diagnostic at the offending token, or `E101` if the
    /// line ended before `parser` was done. Tokens left over after a
    /// successful parse are also reported as `E100`.
    pub(crate) fn parse<O>(
        &self,
        mut parser: impl FnMut(&mut Input<'t, 'src>) -> IResult<O>,
    ) -> Result<O, Diagnostic> {
        let mut input = TokenSlice::new(self.tokens);
        let value = match parser(&mut input) {
            Ok(value) => value,
            Err(err) => return Err(self.convert_error(err, input.eof_offset())),
        };

        let consumed = self.tokens.len() - input.eof_offset();
        match self.tokens.get(consumed) {
            Some(extra) => Err(Diagnostic::error(format!(
                "unexpected {} after the end of the record",
                extra.token
            ))
            .with_code(ErrorCode::E100)
            .with_label(extra.span, ErrorCode::E100.description())
            .with_help("remove the trailing tokens")),
            None => Ok(value),
        }
    }

    fn convert_error(&self, err: ErrMode<ContextError<Context>>, remaining: usize) -> Diagnostic {
        let err = match err {
            ErrMode::Backtrack(err) | ErrMode::Cut(err) => err,
            ErrMode::Incomplete(_) => ContextError::new(),
        };
        let expected = err
            .context()
            .map(|context| match context {
                Context::Label(label) => (*label).to_string(),
                Context::Keyword(name) => format!("`{name}`"),
            })
            .collect::<Vec<_>>();
        let expected = match expected.first() {
            Some(first) => format!(", expected {first}"),
            None => String::new(),
        };

        let position = self.tokens.len() - remaining;
        match self.tokens.get(position) {
            Some(token) => Diagnostic::error(format!("unexpected {}{expected}", token.token))
                .with_code(ErrorCode::E100)
                .with_label(token.span, ErrorCode::E100.description()),
            None => {
                let end = self.span().end();
                Diagnostic::error(format!("line ended too early{expected}"))
                    .with_code(ErrorCode::E101)
                    .with_label(Span::new(end..end), "line ends here")
            }
        }
    }
}

/// Splits a token stream into its non-empty lines.
pub(crate) fn split_lines<'t, 'src>(tokens: &'t [PositionedToken<'src>]) -> Vec<Line<'t, 'src>> {
    tokens
        .split(|token| token.token == Token::Newline)
        .filter(|tokens| !tokens.is_empty())
        .map(|tokens| Line { tokens })
        .collect()
}

/// `UCLA <kind> <version>`
fn header<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<Spanned<&'src str>> {
    keyword("UCLA").parse_next(input)?;
    let kind = word.parse_next(input)?;
    number::<f64>.parse_next(input)?;
    Ok(kind)
}

/// Checks the `UCLA <kind> <version>` header and returns the lines after it.
///
/// A missing header is reported, and the first line is then parsed as a
/// record.
pub(crate) fn strip_header<'a, 't, 'src>(
    lines: &'a [Line<'t, 'src>],
    kind: &str,
    diagnostics: &mut DiagnosticCollector,
) -> &'a [Line<'t, 'src>] {
    let Some((first, rest)) = lines.split_first() else {
        diagnostics.emit(
            Diagnostic::error(format!("missing `UCLA {kind}` header"))
                .with_code(ErrorCode::E200)
                .with_label(Span::default(), "file is empty"),
        );
        return lines;
    };

    if !first.starts_with("UCLA") {
        diagnostics.emit(
            Diagnostic::error(format!("missing `UCLA {kind}` header"))
                .with_code(ErrorCode::E200)
                .with_label(first.span(), "expected the header before this line")
                .with_help(format!("start the file with `UCLA {kind} 1.0`")),
        );
        return lines;
    }

    match first.parse(header) {
        Ok(found) if found.inner().eq_ignore_ascii_case(kind) => {}
        Ok(found) => diagnostics.emit(
            Diagnostic::error(format!(
                "expected a `{kind}` file, found `{}`",
                found.inner()
            ))
            .with_code(ErrorCode::E200)
            .with_label(found.span(), ErrorCode::E200.description()),
        ),
        Err(diagnostic) => diagnostics.emit(diagnostic),
    }
    rest
}

/// Reports a declared count that differs from the number of records found.
pub(crate) fn check_count(
    diagnostics: &mut DiagnosticCollector,
    what: &str,
    declared: Option<Spanned<usize>>,
    found: usize,
) {
    let Some(declared) = declared else {
        return;
    };
    if *declared.inner() != found {
        diagnostics.emit(
            Diagnostic::error(format!(
                "{} {what} declared but {found} found",
                declared.inner()
            ))
            .with_code(ErrorCode::E201)
            .with_label(declared.span(), "declared here"),
        );
    }
}
