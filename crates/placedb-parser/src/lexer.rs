//! Lexical analyzer for Bookshelf files.
//!
//! [`tokenize`] splits the source into words, colons and newlines. Blanks
//! and `#` comments are skipped; the only lexical error is a stray control
//! character, and every one of them is reported in a single pass.

use winnow::{
    Parser as _,
    combinator::{alt, preceded, repeat},
    error::{ContextError, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::take_while,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError>;

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !c.is_control() && c != ':' && c != '#'
}

/// Blanks other than newlines, including the `\r` of `\r\n`.
fn blank<'a>(input: &mut Input<'a>) -> IResult<()> {
    take_while(1.., |c: char| c.is_whitespace() && c != '\n')
        .void()
        .parse_next(input)
}

/// A `#` comment up to, but excluding, the newline.
fn comment<'a>(input: &mut Input<'a>) -> IResult<()> {
    preceded('#', take_while(0.., |c: char| c != '\n'))
        .void()
        .parse_next(input)
}

fn trivia<'a>(input: &mut Input<'a>) -> IResult<()> {
    repeat(0.., alt((blank, comment))).parse_next(input)
}

fn token<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        '\n'.value(Token::Newline),
        ':'.value(Token::Colon),
        take_while(1.., is_word_char).map(Token::Word),
    ))
    .parse_next(input)
}

fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<PositionedToken<'a>> {
    let start = input.current_token_start();
    let token = token.parse_next(input)?;
    let end = input.current_token_start();

    Ok(PositionedToken::new(token, Span::new(start..end)))
}

struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    fn tokenize(&mut self, mut input: Input<'a>) {
        loop {
            // `trivia` only fails on incomplete input, which a complete slice never is
            let _ = trivia(&mut input);
            if input.is_empty() {
                break;
            }

            let checkpoint = input.checkpoint();
            match positioned_token(&mut input) {
                Ok(token) => self.tokens.push(token),
                Err(_) => {
                    input.reset(&checkpoint);
                    let start = input.current_token_start();
                    let bad = input.next_token();
                    let end = start + bad.map_or(1, char::len_utf8);
                    self.diagnostics.emit(
                        Diagnostic::error(format!(
                            "unexpected character {:?}",
                            bad.unwrap_or_default()
                        ))
                        .with_code(ErrorCode::E001)
                        .with_label(Span::new(start..end), ErrorCode::E001.description())
                        .with_help("remove the control character"),
                    );
                }
            }
        }

        // A file without a trailing newline still ends its last line.
        if !matches!(
            self.tokens.last(),
            None | Some(PositionedToken {
                token: Token::Newline,
                ..
            })
        ) {
            let end = input.current_token_start();
            self.tokens
                .push(PositionedToken::new(Token::Newline, Span::new(end..end)));
        }
    }

    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish_with(self.tokens)
    }
}

/// Splits `source` into tokens, collecting every lexical error.
///
/// A non-empty token stream always ends with [`Token::Newline`].
pub fn tokenize(source: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let mut lexer = Lexer::new();
    lexer.tokenize(LocatingSlice::new(source));
    lexer.finish()
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    /// Words joined by blanks lex back into the same words, one line each.
    fn check_words_roundtrip(lines: &[Vec<String>]) -> Result<(), TestCaseError> {
        let source = lines
            .iter()
            .map(|words| words.join(" \t"))
            .collect::<Vec<_>>()
            .join("\n");
        let tokens = tokenize(&source).map_err(|err| TestCaseError::fail(err.to_string()))?;

        let words = tokens
            .iter()
            .filter_map(|token| match token.token {
                Token::Word(text) => Some(text.to_string()),
                _ => None,
            })
            .collect::<Vec<_>>();
        let expected = lines.iter().flatten().cloned().collect::<Vec<_>>();
        prop_assert_eq!(words, expected);

        for token in &tokens {
            if let Token::Word(text) = token.token {
                prop_assert_eq!(&source[token.span.to_range()], text);
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn words_roundtrip(lines in prop::collection::vec(
            prop::collection::vec("[A-Za-z0-9_./-]{1,8}", 1..6),
            1..6,
        )) {
            check_words_roundtrip(&lines)?;
        }
    }
}
