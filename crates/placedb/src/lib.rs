//! placedb - A placement database for VLSI designs.
//!
//! Loads a design from Bookshelf files (or LEF/DEF/Verilog through
//! caller-supplied readers), applies coordinate solutions produced by a
//! placer, and writes placements back as DEF or Bookshelf.
//!
//! # Example
//!
//! ```rust,no_run
//! use placedb::{Loader, SolutionFormat};
//!
//! let mut db = Loader::default()
//!     .read_bookshelf("adaptec1/adaptec1.aux")
//!     .expect("Failed to load design");
//!
//! let xs = vec![0.0_f64; db.num_movable()];
//! let ys = vec![0.0_f64; db.num_movable()];
//! placedb::apply(&mut db, &xs, &ys).expect("Failed to apply solution");
//!
//! placedb::write::<f64>(&db, "adaptec1.gp.pl", SolutionFormat::Bookshelf, None, None);
//! ```

pub mod config;

mod apply;
mod coord;
mod error;
mod load;
mod snapshot;
mod write;

pub use placedb_core::{db, geometry, net, node, orient, row};

pub use apply::{apply, reconcile_orient};
pub use coord::SolutionCoord;
pub use error::{InputFormat, PlaceDbError};
pub use load::{BookshelfReader, FormatReader, Loader, ReaderSet, read_solution_arrays};
pub use snapshot::Snapshot;
pub use write::{SolutionFormat, try_write, write};
