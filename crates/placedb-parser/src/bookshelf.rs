//! Parsers for the Bookshelf placement format.
//!
//! A Bookshelf design is a set of plain-text files listed by an `.aux` file:
//!
//! | file     | content                                         |
//! |----------|-------------------------------------------------|
//! | `.nodes` | node names, sizes and terminal flags            |
//! | `.nets`  | nets with their pins and pin offsets            |
//! | `.wts`   | net weights                                     |
//! | `.pl`    | node positions, orientations and fixed flags    |
//! | `.scl`   | placement rows                                  |
//!
//! Each `parse_*` function handles one file and borrows names from its
//! source text. Resolving names across files is left to the caller.

mod aux;
mod nets;
mod nodes;
mod pl;
mod scl;
mod wts;

pub use aux::{AuxFile, parse_aux};
pub use nets::{NetRecord, NetsFile, PinRecord, parse_nets};
pub use nodes::{NodeRecord, NodesFile, parse_nodes};
pub use pl::{PlFile, PlRecord, PlStatus, parse_pl};
pub use scl::{RowRecord, SclFile, parse_scl};
pub use wts::{WeightRecord, WtsFile, parse_wts};

use placedb_core::orient::Orient;

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Spanned,
};

/// Parses an orientation given by name (`FS`) or by numeric code (`5`).
///
/// ```
/// # use placedb_core::orient::Orient;
/// # use placedb_parser::bookshelf::parse_orient;
/// assert_eq!(parse_orient("FS"), Some(Orient::FS));
/// assert_eq!(parse_orient("1"), Some(Orient::S));
/// assert_eq!(parse_orient("R90"), None);
/// ```
pub fn parse_orient(text: &str) -> Option<Orient> {
    match text.parse::<u8>() {
        Ok(code) => Orient::from_code(code),
        Err(_) => text.parse().ok(),
    }
}

fn resolve_orient(word: Spanned<&str>) -> Result<Orient, Diagnostic> {
    parse_orient(word.inner()).ok_or_else(|| {
        Diagnostic::error(format!("invalid orientation `{}`", word.inner()))
            .with_code(ErrorCode::E203)
            .with_label(word.span(), ErrorCode::E203.description())
            .with_help("use one of N, S, W, E, FN, FS, FW, FE or a code from 0 to 7")
    })
}
