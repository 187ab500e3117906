//! Writing placement solutions to disk.
//!
//! [`write`] and [`try_write`] serialize the database in one of the
//! [`SolutionFormat`]s. Optional coordinate arrays replace the positions of
//! the movable nodes for that one write; the database itself is never
//! modified.

mod bookshelf;
mod def;

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use clap::ValueEnum;
use log::{debug, error, info};
use serde::Deserialize;

use placedb_core::{db::PlaceDb, geometry::Point, node::PlaceStatus};

use crate::{coord::SolutionCoord, error::PlaceDbError};

/// Output format of a placement solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SolutionFormat {
    /// A complete DEF file: header, die area, rows, components and pins.
    Def,
    /// Only the `COMPONENTS` section of a DEF file.
    DefSimple,
    /// A Bookshelf `.pl` file.
    #[default]
    Bookshelf,
    /// A full Bookshelf design: `.aux`, `.nodes`, `.nets`, `.wts`, `.scl`
    /// and `.pl` files sharing the stem of the output path.
    BookshelfAll,
}

/// Position and status of a node as written, after overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    position: Point,
    status: PlaceStatus,
}

/// Resolves the position of every node for one write.
///
/// An override array replaces the movable nodes' coordinate on its axis
/// when it covers all of them; a shorter array is ignored. Unplaced nodes
/// that receive an override are written as placed.
fn placements<T: SolutionCoord>(
    db: &PlaceDb,
    xs: Option<&[T]>,
    ys: Option<&[T]>,
) -> Vec<Placement> {
    let num_movable = db.num_movable();
    let xs = usable_override("x", xs, num_movable);
    let ys = usable_override("y", ys, num_movable);
    let overridden = xs.is_some() || ys.is_some();

    db.nodes()
        .iter()
        .map(|node| {
            let mut placement = Placement {
                position: node.position(),
                status: node.status(),
            };
            if node.id() >= num_movable {
                return placement;
            }
            if let Some(xs) = xs {
                placement.position = placement.position.with_x(xs[node.id()].to_grid());
            }
            if let Some(ys) = ys {
                placement.position = placement.position.with_y(ys[node.id()].to_grid());
            }
            if overridden && placement.status == PlaceStatus::Unplaced {
                placement.status = PlaceStatus::Placed;
            }
            placement
        })
        .collect()
}

/// Keeps an override array only if it covers every movable node.
fn usable_override<'a, T>(
    axis: &'static str,
    values: Option<&'a [T]>,
    num_movable: usize,
) -> Option<&'a [T]> {
    match values {
        Some(values) if values.len() >= num_movable => Some(values),
        Some(values) => {
            debug!(
                axis = axis,
                len = values.len(),
                num_movable = num_movable;
                "Ignoring short coordinate override"
            );
            None
        }
        None => None,
    }
}

/// Writes the placement of `db` to `path`.
///
/// Returns `false` and logs the cause if the output could not be written.
/// See [`try_write`] for the handling of `xs` and `ys`.
pub fn write<T: SolutionCoord>(
    db: &PlaceDb,
    path: impl AsRef<Path>,
    format: SolutionFormat,
    xs: Option<&[T]>,
    ys: Option<&[T]>,
) -> bool {
    let path = path.as_ref();
    match try_write(db, path, format, xs, ys) {
        Ok(()) => true,
        Err(err) => {
            error!(path:? = path, format:? = format, err:% = err; "Failed to write solution");
            false
        }
    }
}

/// Writes the placement of `db` to `path`, reporting failures.
///
/// `xs` and `ys`, when given and at least [`PlaceDb::num_movable`] long,
/// replace the coordinates of the movable nodes for this write only. Values
/// are snapped to the grid. Shorter arrays are ignored.
///
/// # Errors
///
/// Returns [`PlaceDbError::Io`] if a file cannot be created or written.
pub fn try_write<T: SolutionCoord>(
    db: &PlaceDb,
    path: impl AsRef<Path>,
    format: SolutionFormat,
    xs: Option<&[T]>,
    ys: Option<&[T]>,
) -> Result<(), PlaceDbError> {
    let path = path.as_ref();
    let placements = placements(db, xs, ys);

    info!(path:? = path, format:? = format; "Writing solution");
    match format {
        SolutionFormat::Def => write_file(path, |out| def::write_def(out, db, &placements))?,
        SolutionFormat::DefSimple => {
            write_file(path, |out| def::write_components(out, db, &placements))?
        }
        SolutionFormat::Bookshelf => {
            write_file(path, |out| bookshelf::write_pl(out, db, &placements))?
        }
        SolutionFormat::BookshelfAll => bookshelf::write_all(db, &placements, path)?,
    }
    debug!(path:? = path; "Solution written");
    Ok(())
}

/// Creates `path` and fills it through a buffered writer.
fn write_file(
    path: &Path,
    contents: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    contents(&mut out)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use placedb_core::{
        db::PlaceDbBuilder,
        geometry::{Bounds, Size},
        node::NodeKind,
        orient::Orient,
        row::Row,
    };

    use super::*;

    fn small_db() -> PlaceDb {
        let mut builder = PlaceDbBuilder::new();
        builder.add_row(Row::new("r0", Bounds::new(0, 0, 40, 10), 1, Orient::N));
        builder
            .add_node("c0", None, Size::new(4, 10), NodeKind::Cell)
            .unwrap();
        builder
            .add_node("c1", None, Size::new(4, 10), NodeKind::Cell)
            .unwrap();
        let terminal = builder
            .add_node("t0", None, Size::new(2, 2), NodeKind::Terminal)
            .unwrap();
        builder
            .place_node(terminal, Point::new(30, 0), Some(Orient::N), PlaceStatus::Fixed)
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_override_replaces_movable_only() {
        let db = small_db();

        let placements = placements(&db, Some(&[1.4, 2.6, 99.0][..]), None);

        assert_eq!(placements[0].position, Point::new(1, 0));
        assert_eq!(placements[1].position, Point::new(3, 0));
        assert_eq!(placements[0].status, PlaceStatus::Placed);
        assert_eq!(placements[2].position, Point::new(30, 0));
        assert_eq!(placements[2].status, PlaceStatus::Fixed);
    }

    #[test]
    fn test_short_override_is_ignored() {
        let db = small_db();

        let with_short = placements(&db, Some(&[5.0_f32][..]), Some(&[][..]));
        let without = placements::<f32>(&db, None, None);

        assert_eq!(with_short, without);
        assert_eq!(without[0].status, PlaceStatus::Unplaced);
    }

    #[test]
    fn test_far_override_is_written_saturated() {
        let db = small_db();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("far.pl");

        let placements = placements(&db, Some(&[3.0e9, 0.0][..]), Some(&[-3.0e9, 0.0][..]));
        assert_eq!(placements[0].position, Point::new(i32::MAX, i32::MIN));

        assert!(write(&db, &path, SolutionFormat::Bookshelf, Some(&[3.0e9, 0.0][..]), None));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains(&format!("c0 {} 0", i32::MAX)));
    }

    #[test]
    fn test_write_pl_file() {
        let db = small_db();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pl");

        assert!(write::<f64>(&db, &path, SolutionFormat::Bookshelf, None, None));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("UCLA pl 1.0\n"));
        assert!(content.contains("t0 30 0 : N /FIXED\n"));
    }

    #[test]
    fn test_write_failure_returns_false() {
        let db = small_db();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.pl");

        assert!(!write::<f64>(&db, &path, SolutionFormat::Bookshelf, None, None));
        assert!(matches!(
            try_write::<f64>(&db, &path, SolutionFormat::Def, None, None),
            Err(PlaceDbError::Io(_))
        ));
    }

    #[test]
    fn test_format_names() {
        let format: SolutionFormat = serde_json::from_str("\"bookshelf-all\"").unwrap();

        assert_eq!(format, SolutionFormat::BookshelfAll);
        assert_eq!(
            SolutionFormat::from_str("def-simple", true),
            Ok(SolutionFormat::DefSimple)
        );
    }
}
