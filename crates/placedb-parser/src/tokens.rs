//! Tokens of the Bookshelf family of formats.
//!
//! Bookshelf files are line oriented, so newlines are significant tokens
//! while other whitespace and `#` comments are dropped by the lexer.

use std::fmt;

use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'src> {
    /// Any run of characters other than whitespace, `:` and `#`.
    Word(&'src str),
    Colon,
    Newline,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(text) => write!(f, "`{text}`"),
            Token::Colon => write!(f, "`:`"),
            Token::Newline => write!(f, "end of line"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}
