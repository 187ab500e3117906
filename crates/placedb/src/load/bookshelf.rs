//! Built-in Bookshelf reader.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, error, info, warn};

use placedb_core::{
    db::{PinSpec, PlaceDb, PlaceDbBuilder},
    geometry::{Bounds, Point, Size, round_to_grid},
    node::{NodeKind, PlaceStatus},
    row::Row,
};
use placedb_parser::{
    Diagnostic, DiagnosticCollector, ErrorCode, ParseError, Spanned,
    bookshelf::{self, PinRecord},
};

use crate::{config::UserParams, error::PlaceDbError};

use super::FormatReader;

/// Reads the design listed by `bookshelf_aux_input`.
///
/// Files named by the `.aux` file are resolved relative to its directory.
/// The design takes the name of the `.aux` file unless an earlier reader
/// already set one.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookshelfReader;

impl FormatReader for BookshelfReader {
    fn read(&self, params: &UserParams, builder: &mut PlaceDbBuilder) -> Result<(), PlaceDbError> {
        match params.bookshelf_aux_input() {
            Some(aux) => read_design(aux, builder),
            None => Ok(()),
        }
    }
}

/// Text of one input file, kept for error reporting.
struct Source {
    path: PathBuf,
    text: String,
}

impl Source {
    fn read(path: impl Into<PathBuf>) -> Result<Self, PlaceDbError> {
        let path = path.into();
        debug!(path:? = path; "Reading file");
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Self { path, text }),
            Err(err) => {
                error!(path:? = path, err:err; "Failed to read file");
                Err(err.into())
            }
        }
    }

    fn error(&self, err: ParseError) -> PlaceDbError {
        PlaceDbError::new_parse_error(err, &self.path, self.text.as_str())
    }
}

fn undefined_node(name: &Spanned<&str>) -> Diagnostic {
    Diagnostic::error(format!("undefined node `{}`", name.inner()))
        .with_code(ErrorCode::E300)
        .with_label(name.span(), ErrorCode::E300.description())
}

fn read_design(aux_path: &Path, builder: &mut PlaceDbBuilder) -> Result<(), PlaceDbError> {
    let aux_source = Source::read(aux_path)?;
    let aux = bookshelf::parse_aux(&aux_source.text).map_err(|err| aux_source.error(err))?;
    let dir = aux_path.parent().unwrap_or_else(|| Path::new(""));
    let sibling = |name: &Spanned<&str>| dir.join(*name.inner());

    if builder.design_name().is_empty() {
        if let Some(stem) = aux_path.file_stem().and_then(|stem| stem.to_str()) {
            builder.set_design_name(stem);
        }
    }

    read_nodes(&Source::read(sibling(&aux.nodes))?, builder)?;
    read_nets(&Source::read(sibling(&aux.nets))?, builder)?;
    if let Some(wts) = &aux.wts {
        read_wts(&Source::read(sibling(wts))?, builder)?;
    }
    read_scl(&Source::read(sibling(&aux.scl))?, builder)?;
    read_pl(&Source::read(sibling(&aux.pl))?, builder)?;

    info!(
        aux:? = aux_path,
        num_nodes = builder.num_nodes(),
        num_rows = builder.num_rows();
        "Bookshelf design read"
    );
    Ok(())
}

/// Terminals are fixed at the origin until the `.pl` file places them.
fn read_nodes(source: &Source, builder: &mut PlaceDbBuilder) -> Result<(), PlaceDbError> {
    let file = bookshelf::parse_nodes(&source.text).map_err(|err| source.error(err))?;
    for record in &file.nodes {
        let size = Size::new(round_to_grid(record.width), round_to_grid(record.height));
        let id = builder.add_node(*record.name.inner(), None, size, record.kind)?;
        if record.kind != NodeKind::Cell {
            builder.place_node(id, Point::default(), None, PlaceStatus::Fixed)?;
        }
    }
    debug!(
        num_nodes = file.nodes.len(),
        num_terminals = file.num_terminals();
        "Nodes read"
    );
    Ok(())
}

/// Bookshelf offsets are measured from the node centre.
fn pin_spec(builder: &PlaceDbBuilder, pin: &PinRecord<'_>) -> Result<PinSpec, Diagnostic> {
    let node = builder
        .node_id(pin.node.inner())
        .ok_or_else(|| undefined_node(&pin.node))?;
    let (half_width, half_height) = builder.node(node).map_or((0.0, 0.0), |node| {
        (f64::from(node.width()) / 2.0, f64::from(node.height()) / 2.0)
    });
    let (dx, dy) = pin.offset;
    Ok(PinSpec {
        node,
        offset: (dx + half_width, dy + half_height),
        direction: pin.direction,
    })
}

fn read_nets(source: &Source, builder: &mut PlaceDbBuilder) -> Result<(), PlaceDbError> {
    let file = bookshelf::parse_nets(&source.text).map_err(|err| source.error(err))?;
    let mut diagnostics = DiagnosticCollector::new();

    for (index, record) in file.nets.iter().enumerate() {
        let pins = record
            .pins
            .iter()
            .map(|pin| pin_spec(builder, pin))
            .collect::<Result<Vec<_>, _>>();
        match pins {
            Ok(pins) => {
                let name = record
                    .name
                    .as_ref()
                    .map_or_else(|| format!("net{index}"), |name| name.inner().to_string());
                builder.add_net(name, 1.0, pins)?;
            }
            Err(diagnostic) => diagnostics.emit(diagnostic),
        }
    }

    diagnostics.finish().map_err(|err| source.error(err))?;
    debug!(num_nets = file.nets.len(), num_pins = file.num_pins(); "Nets read");
    Ok(())
}

fn read_wts(source: &Source, builder: &mut PlaceDbBuilder) -> Result<(), PlaceDbError> {
    let file = bookshelf::parse_wts(&source.text).map_err(|err| source.error(err))?;
    for record in &file.weights {
        if let Err(err) = builder.set_net_weight(record.name.inner(), record.weight) {
            warn!(err:% = err; "Ignoring net weight");
        }
    }
    Ok(())
}

fn read_scl(source: &Source, builder: &mut PlaceDbBuilder) -> Result<(), PlaceDbError> {
    let file = bookshelf::parse_scl(&source.text).map_err(|err| source.error(err))?;
    for record in &file.rows {
        let bounds = Bounds::new(
            round_to_grid(record.subrow_origin),
            round_to_grid(record.coordinate),
            round_to_grid(record.end_x()),
            round_to_grid(record.coordinate + record.height),
        );
        let name = format!("row{}", builder.num_rows());
        builder.add_row(Row::new(
            name,
            bounds,
            round_to_grid(record.site_width),
            record.site_orient,
        ));
    }
    debug!(num_rows = file.rows.len(); "Rows read");
    Ok(())
}

/// Places the listed nodes. A `/FIXED` flag fixes a node, and nodes that
/// are already fixed stay fixed; everything else becomes placed. Without
/// an orientation the node keeps its current one.
fn read_pl(source: &Source, builder: &mut PlaceDbBuilder) -> Result<usize, PlaceDbError> {
    let file = bookshelf::parse_pl(&source.text).map_err(|err| source.error(err))?;
    let mut diagnostics = DiagnosticCollector::new();

    for record in &file.records {
        let Some(id) = builder.node_id(record.name.inner()) else {
            diagnostics.emit(undefined_node(&record.name));
            continue;
        };
        let Some(node) = builder.node(id) else {
            continue;
        };
        let status = match (record.status, node.status()) {
            (Some(_), _) | (None, PlaceStatus::Fixed) => PlaceStatus::Fixed,
            _ => PlaceStatus::Placed,
        };
        let orient = record.orient.or(node.orient());
        let position = Point::new(round_to_grid(record.x), round_to_grid(record.y));
        builder.place_node(id, position, orient, status)?;
    }

    diagnostics.finish().map_err(|err| source.error(err))?;
    Ok(file.records.len())
}

/// Overlays a separate `.pl` file on the nodes read so far.
pub(super) fn overlay_pl(path: &Path, builder: &mut PlaceDbBuilder) -> Result<(), PlaceDbError> {
    let source = Source::read(path)?;
    let num_records = read_pl(&source, builder)?;
    info!(path:? = path, num_records = num_records; "Placement overlaid");
    Ok(())
}

/// Reads a `.pl` file as solution arrays for [`crate::apply`].
///
/// The arrays cover every node of `db` by id. Nodes missing from the file
/// keep their current coordinates.
///
/// # Errors
///
/// Returns [`PlaceDbError::Io`] if the file cannot be read and
/// [`PlaceDbError::Parse`] if it is malformed or names an unknown node.
pub fn read_solution_arrays(
    db: &PlaceDb,
    path: impl AsRef<Path>,
) -> Result<(Vec<f64>, Vec<f64>), PlaceDbError> {
    let source = Source::read(path.as_ref())?;
    let file = bookshelf::parse_pl(&source.text).map_err(|err| source.error(err))?;

    let mut xs = db
        .nodes()
        .iter()
        .map(|node| f64::from(node.xl()))
        .collect::<Vec<_>>();
    let mut ys = db
        .nodes()
        .iter()
        .map(|node| f64::from(node.yl()))
        .collect::<Vec<_>>();

    let mut diagnostics = DiagnosticCollector::new();
    for record in &file.records {
        match db.node_by_name(record.name.inner()) {
            Some(id) => {
                xs[id] = record.x;
                ys[id] = record.y;
            }
            None => diagnostics.emit(undefined_node(&record.name)),
        }
    }
    diagnostics.finish().map_err(|err| source.error(err))?;

    Ok((xs, ys))
}
