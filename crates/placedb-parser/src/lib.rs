//! # Placedb Parser
//!
//! Parsers for the Bookshelf placement format. Each file of a Bookshelf
//! design is tokenized, split into lines and parsed line by line, so a
//! single pass reports every malformed record with its source span.
//!
//! ## Usage
//!
//! ```
//! # use placedb_parser::{ParseError, bookshelf::parse_nodes};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "\
//! UCLA nodes 1.0
//! NumNodes : 2
//! NumTerminals : 1
//!   o0  4 10
//!   p0  2 2 terminal
//! ";
//!
//!     let nodes = parse_nodes(source)?;
//!     assert_eq!(nodes.num_terminals(), 1);
//!     Ok(())
//! }
//! ```

pub mod bookshelf;
mod error;
mod lexer;
mod parser;
mod span;
mod tokens;

pub use error::{Diagnostic, DiagnosticCollector, ErrorCode, Label, ParseError, Severity};
pub use span::{Span, Spanned};
