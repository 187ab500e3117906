//! Bookshelf output.

use std::{
    io::{self, Write},
    path::Path,
};

use placedb_core::{
    db::PlaceDb,
    node::{Node, NodeKind, PlaceStatus},
};

use super::{Placement, write_file};

/// `/FIXED` or `/FIXED_NI` for fixed nodes.
fn fixed_flag(node: &Node, placement: &Placement) -> Option<&'static str> {
    match (placement.status, node.kind()) {
        (PlaceStatus::Fixed, NodeKind::TerminalNi) => Some("/FIXED_NI"),
        (PlaceStatus::Fixed, _) => Some("/FIXED"),
        _ => None,
    }
}

pub(super) fn write_pl(
    out: &mut impl Write,
    db: &PlaceDb,
    placements: &[Placement],
) -> io::Result<()> {
    writeln!(out, "UCLA pl 1.0")?;
    writeln!(out)?;
    for (node, placement) in db.nodes().iter().zip(placements) {
        let name = db.node_property(node.id()).name();
        let position = placement.position;
        write!(out, "{name} {} {}", position.x(), position.y())?;
        if let Some(orient) = node.orient() {
            write!(out, " : {orient}")?;
        }
        if let Some(flag) = fixed_flag(node, placement) {
            write!(out, " {flag}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_nodes(out: &mut impl Write, db: &PlaceDb) -> io::Result<()> {
    writeln!(out, "UCLA nodes 1.0")?;
    writeln!(out)?;
    writeln!(out, "NumNodes : {}", db.num_nodes())?;
    writeln!(out, "NumTerminals : {}", db.num_fixed())?;
    for node in db.nodes() {
        let name = db.node_property(node.id()).name();
        write!(out, "  {name} {} {}", node.width(), node.height())?;
        match (node.is_fixed(), node.kind()) {
            (true, NodeKind::TerminalNi) => write!(out, " terminal_NI")?,
            (true, _) => write!(out, " terminal")?,
            (false, _) => {}
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Pin offsets are written relative to the centre of their node.
fn write_nets(out: &mut impl Write, db: &PlaceDb) -> io::Result<()> {
    writeln!(out, "UCLA nets 1.0")?;
    writeln!(out)?;
    writeln!(out, "NumNets : {}", db.nets().len())?;
    writeln!(out, "NumPins : {}", db.pins().len())?;
    for net in db.nets() {
        writeln!(out, "NetDegree : {} {}", net.degree(), net.name())?;
        for &pin_id in net.pins() {
            let pin = db.pin(pin_id);
            let node = db.node(pin.node());
            let dx = pin.offset_x() - f64::from(node.width()) / 2.0;
            let dy = pin.offset_y() - f64::from(node.height()) / 2.0;
            writeln!(
                out,
                "  {} {} : {dx} {dy}",
                db.node_property(node.id()).name(),
                pin.direction().code()
            )?;
        }
    }
    Ok(())
}

fn write_wts(out: &mut impl Write, db: &PlaceDb) -> io::Result<()> {
    writeln!(out, "UCLA wts 1.0")?;
    writeln!(out)?;
    for net in db.nets() {
        writeln!(out, "{} {}", net.name(), net.weight())?;
    }
    Ok(())
}

fn write_scl(out: &mut impl Write, db: &PlaceDb) -> io::Result<()> {
    writeln!(out, "UCLA scl 1.0")?;
    writeln!(out)?;
    writeln!(out, "NumRows : {}", db.rows().len())?;
    writeln!(out)?;
    for row in db.rows() {
        writeln!(out, "CoreRow Horizontal")?;
        writeln!(out, "  Coordinate    : {}", row.yl())?;
        writeln!(out, "  Height        : {}", row.height())?;
        writeln!(out, "  Sitewidth     : {}", row.site_width())?;
        writeln!(out, "  Sitespacing   : {}", row.site_width())?;
        writeln!(out, "  Siteorient    : {}", row.orient())?;
        writeln!(out, "  Sitesymmetry  : Y")?;
        writeln!(
            out,
            "  SubrowOrigin  : {}  NumSites : {}",
            row.xl(),
            row.num_sites()
        )?;
        writeln!(out, "End")?;
    }
    Ok(())
}

/// Writes the complete design next to `path`, one file per extension.
pub(super) fn write_all(db: &PlaceDb, placements: &[Placement], path: &Path) -> io::Result<()> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("placedb");
    let sibling = |extension: &str| path.with_file_name(format!("{stem}.{extension}"));

    write_file(&sibling("nodes"), |out| write_nodes(out, db))?;
    write_file(&sibling("nets"), |out| write_nets(out, db))?;
    write_file(&sibling("wts"), |out| write_wts(out, db))?;
    write_file(&sibling("scl"), |out| write_scl(out, db))?;
    write_file(&sibling("pl"), |out| write_pl(out, db, placements))?;
    write_file(&sibling("aux"), |out| {
        writeln!(
            out,
            "RowBasedPlacement : {stem}.nodes {stem}.nets {stem}.wts {stem}.pl {stem}.scl"
        )
    })
}
