//! DEF output.

use std::{
    collections::HashMap,
    io::{self, Write},
};

use placedb_core::{
    db::PlaceDb,
    net::Pin,
    node::{Node, NodeId, NodeKind, PlaceStatus},
    orient::Orient,
};

use super::Placement;

/// `+ PLACED ( x y ) N`, or `+ UNPLACED`.
fn placement_clause(node: &Node, placement: &Placement) -> String {
    let orient = node.orient().unwrap_or(Orient::N);
    let position = placement.position;
    match placement.status {
        PlaceStatus::Unplaced => "+ UNPLACED".to_string(),
        status => format!("+ {status} ( {} {} ) {orient}", position.x(), position.y()),
    }
}

/// Writes the `COMPONENTS` section. IO pins are left to the `PINS` section.
pub(super) fn write_components(
    out: &mut impl Write,
    db: &PlaceDb,
    placements: &[Placement],
) -> io::Result<()> {
    let components = db
        .nodes()
        .iter()
        .zip(placements)
        .filter(|(node, _)| node.kind() != NodeKind::IoPin)
        .collect::<Vec<_>>();

    writeln!(out, "COMPONENTS {} ;", components.len())?;
    for (node, placement) in components {
        let property = db.node_property(node.id());
        let macro_name = property.macro_name().unwrap_or(property.name());
        writeln!(
            out,
            "   - {} {macro_name} {} ;",
            property.name(),
            placement_clause(node, placement)
        )?;
    }
    writeln!(out, "END COMPONENTS")?;
    Ok(())
}

fn write_pins(out: &mut impl Write, db: &PlaceDb, placements: &[Placement]) -> io::Result<()> {
    let mut first_pin: HashMap<NodeId, &Pin> = HashMap::new();
    for pin in db.pins() {
        first_pin.entry(pin.node()).or_insert(pin);
    }
    let io_pins = db
        .nodes()
        .iter()
        .zip(placements)
        .filter(|(node, _)| node.kind() == NodeKind::IoPin)
        .collect::<Vec<_>>();

    writeln!(out, "PINS {} ;", io_pins.len())?;
    for (node, placement) in io_pins {
        write!(out, "   - {}", db.node_property(node.id()).name())?;
        if let Some(pin) = first_pin.get(&node.id()) {
            write!(
                out,
                " + NET {} + DIRECTION {}",
                db.net(pin.net()).name(),
                pin.direction()
            )?;
        }
        writeln!(out, " {} ;", placement_clause(node, placement))?;
    }
    writeln!(out, "END PINS")?;
    Ok(())
}

/// Writes a self-contained DEF file.
pub(super) fn write_def(
    out: &mut impl Write,
    db: &PlaceDb,
    placements: &[Placement],
) -> io::Result<()> {
    writeln!(out, "VERSION 5.8 ;")?;
    writeln!(out, "DIVIDERCHAR \"/\" ;")?;
    writeln!(out, "BUSBITCHARS \"[]\" ;")?;
    writeln!(out, "DESIGN {} ;", design_name(db))?;
    writeln!(out, "UNITS DISTANCE MICRONS {} ;", db.dbu())?;
    writeln!(out)?;

    let die = db.die_area();
    writeln!(
        out,
        "DIEAREA ( {} {} ) ( {} {} ) ;",
        die.min_x(),
        die.min_y(),
        die.max_x(),
        die.max_y()
    )?;
    writeln!(out)?;

    for row in db.rows() {
        writeln!(
            out,
            "ROW {} core {} {} {} DO {} BY 1 STEP {} 0 ;",
            row.name(),
            row.xl(),
            row.yl(),
            row.orient(),
            row.num_sites(),
            row.site_width()
        )?;
    }
    writeln!(out)?;

    write_components(out, db, placements)?;
    writeln!(out)?;
    write_pins(out, db, placements)?;
    writeln!(out)?;
    writeln!(out, "END DESIGN")?;
    Ok(())
}

fn design_name(db: &PlaceDb) -> &str {
    match db.design_name() {
        "" => "placedb",
        name => name,
    }
}

#[cfg(test)]
mod tests {
    use placedb_core::{
        db::{PinSpec, PlaceDbBuilder},
        geometry::{Bounds, Point, Size},
        net::PinDirection,
        row::Row,
    };

    use super::*;

    fn def_db() -> PlaceDb {
        let mut builder = PlaceDbBuilder::new();
        builder.set_design_name("adder");
        builder.set_dbu(1000);
        builder.add_row(Row::new("row_0", Bounds::new(0, 0, 100, 10), 1, Orient::FS));
        builder
            .add_node("u0", Some("NAND2".to_string()), Size::new(4, 10), NodeKind::Cell)
            .unwrap();
        let macro_id = builder
            .add_node("m0", None, Size::new(20, 20), NodeKind::Terminal)
            .unwrap();
        builder
            .place_node(macro_id, Point::new(50, 0), Some(Orient::S), PlaceStatus::Fixed)
            .unwrap();
        let pad = builder
            .add_node("clk", None, Size::new(1, 1), NodeKind::IoPin)
            .unwrap();
        builder
            .place_node(pad, Point::new(0, 5), Some(Orient::N), PlaceStatus::Fixed)
            .unwrap();
        builder
            .add_net(
                "clk_net",
                1.0,
                [PinSpec {
                    node: pad,
                    offset: (0.0, 0.0),
                    direction: PinDirection::Input,
                }],
            )
            .unwrap();
        builder.build().unwrap()
    }

    fn render(db: &PlaceDb, placements: &[Placement], simple: bool) -> String {
        let mut out = Vec::new();
        if simple {
            write_components(&mut out, db, placements).unwrap();
        } else {
            write_def(&mut out, db, placements).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    fn placements(db: &PlaceDb) -> Vec<Placement> {
        db.nodes()
            .iter()
            .map(|node| Placement {
                position: node.position(),
                status: node.status(),
            })
            .collect()
    }

    #[test]
    fn test_components() {
        let db = def_db();
        let mut placements = placements(&db);
        placements[0] = Placement {
            position: Point::new(7, 0),
            status: PlaceStatus::Placed,
        };

        let def = render(&db, &placements, true);

        assert_eq!(
            def,
            "COMPONENTS 2 ;\n   - u0 NAND2 + PLACED ( 7 0 ) N ;\n   - m0 m0 + FIXED ( 50 0 ) S ;\nEND COMPONENTS\n"
        );
    }

    #[test]
    fn test_unplaced_component() {
        let db = def_db();

        let def = render(&db, &placements(&db), true);

        assert!(def.contains("   - u0 NAND2 + UNPLACED ;\n"));
    }

    #[test]
    fn test_full_def() {
        let db = def_db();

        let def = render(&db, &placements(&db), false);

        assert!(def.starts_with("VERSION 5.8 ;\n"));
        assert!(def.contains("DESIGN adder ;\n"));
        assert!(def.contains("UNITS DISTANCE MICRONS 1000 ;\n"));
        assert!(def.contains("ROW row_0 core 0 0 FS DO 100 BY 1 STEP 1 0 ;\n"));
        assert!(def.contains("PINS 1 ;\n"));
        assert!(
            def.contains("   - clk + NET clk_net + DIRECTION INPUT + FIXED ( 0 5 ) N ;\n")
        );
        assert!(def.ends_with("END DESIGN\n"));
    }
}
