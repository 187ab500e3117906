//! Error types for placedb operations.
//!
//! [`PlaceDbError`] covers loading a design, applying a solution and
//! writing one back.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use placedb_core::{db::BuildError, geometry::Coord, node::NodeId, row::OutOfRange};
use placedb_parser::ParseError;

/// An input format the loader knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputFormat {
    Lef,
    Def,
    Verilog,
    Bookshelf,
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Lef => write!(f, "LEF"),
            InputFormat::Def => write!(f, "DEF"),
            InputFormat::Verilog => write!(f, "Verilog"),
            InputFormat::Bookshelf => write!(f, "Bookshelf"),
        }
    }
}

/// The main error type for placedb operations.
///
/// # Diagnostic Variants
///
/// `Parse` keeps the source text next to the parser diagnostics so callers
/// can render them with snippets. Reader failures arrive wrapped in `Load`,
/// which names the format being read.
#[derive(Debug, Error)]
pub enum PlaceDbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{}: {err}", .path.display())]
    Parse {
        err: ParseError,
        path: PathBuf,
        src: String,
    },

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("no reader is registered for {format} input")]
    UnsupportedFormat { format: InputFormat },

    #[error("{0}")]
    Params(#[from] clap::Error),

    #[error("failed to read input {format} files")]
    Load {
        format: InputFormat,
        #[source]
        source: Box<PlaceDbError>,
    },

    /// Failure reported by an externally supplied reader.
    #[error(transparent)]
    Reader(Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    RowLookup(#[from] OutOfRange),

    /// A solution moves a node so far right that it no longer fits on the grid.
    #[error("node {node} at x = {x} extends past the end of the grid")]
    OffGrid { node: NodeId, x: Coord },

    #[error("{axis} solution has {len} entries but the design has {expected} movable nodes")]
    ShortSolution {
        axis: &'static str,
        len: usize,
        expected: usize,
    },
}

impl PlaceDbError {
    /// Create a new `Parse` error with the file it came from.
    pub fn new_parse_error(err: ParseError, path: impl Into<PathBuf>, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            path: path.into(),
            src: src.into(),
        }
    }

    /// Wrap a reader failure with the format it was reading.
    pub fn load(format: InputFormat, source: PlaceDbError) -> Self {
        Self::Load {
            format,
            source: Box::new(source),
        }
    }
}
