//! Flat, array-oriented view of a database.
//!
//! A [`Snapshot`] lays the database out as parallel arrays indexed by node,
//! net and pin id, the shape numerical placers consume. It is a copy: later
//! changes to the database are not reflected.

use serde::Serialize;

use placedb_core::{
    db::PlaceDb,
    geometry::Coord,
    net::{NetId, PinDirection, PinId},
    node::NodeId,
    orient::Orient,
};

/// Array projection of a [`PlaceDb`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub design_name: String,

    pub num_nodes: usize,
    pub num_movable_nodes: usize,
    /// Fixed nodes, including [`Snapshot::num_terminal_nis`].
    pub num_terminals: usize,
    pub num_terminal_nis: usize,

    pub node_names: Vec<String>,
    pub node_x: Vec<Coord>,
    pub node_y: Vec<Coord>,
    pub node_size_x: Vec<Coord>,
    pub node_size_y: Vec<Coord>,
    pub node_orient: Vec<Option<Orient>>,

    pub net_names: Vec<String>,
    pub net_weights: Vec<f64>,
    /// Pins of every net, concatenated in net order.
    pub flat_net2pin_map: Vec<PinId>,
    /// Start of each net in `flat_net2pin_map`, with a final end marker.
    pub flat_net2pin_start_map: Vec<usize>,

    pub pin2node_map: Vec<NodeId>,
    pub pin2net_map: Vec<NetId>,
    /// Pin offsets from the lower-left corner of their node.
    pub pin_offset_x: Vec<f64>,
    pub pin_offset_y: Vec<f64>,
    pub pin_direction: Vec<PinDirection>,

    /// `[xl, yl, xh, yh]` of every row.
    pub rows: Vec<[Coord; 4]>,
    pub xl: Coord,
    pub yl: Coord,
    pub xh: Coord,
    pub yh: Coord,
    pub row_height: Coord,
    pub site_width: Coord,
}

impl Snapshot {
    pub fn from_db(db: &PlaceDb) -> Self {
        let nodes = db.nodes();

        let mut flat_net2pin_map = Vec::with_capacity(db.pins().len());
        let mut flat_net2pin_start_map = Vec::with_capacity(db.nets().len() + 1);
        for net in db.nets() {
            flat_net2pin_start_map.push(flat_net2pin_map.len());
            flat_net2pin_map.extend_from_slice(net.pins());
        }
        flat_net2pin_start_map.push(flat_net2pin_map.len());

        Self {
            design_name: db.design_name().to_string(),
            num_nodes: db.num_nodes(),
            num_movable_nodes: db.num_movable(),
            num_terminals: db.num_fixed(),
            num_terminal_nis: db.num_terminal_nis(),
            node_names: nodes
                .iter()
                .map(|node| db.node_property(node.id()).name().to_string())
                .collect(),
            node_x: nodes.iter().map(|node| node.xl()).collect(),
            node_y: nodes.iter().map(|node| node.yl()).collect(),
            node_size_x: nodes.iter().map(|node| node.width()).collect(),
            node_size_y: nodes.iter().map(|node| node.height()).collect(),
            node_orient: nodes.iter().map(|node| node.orient()).collect(),
            net_names: db.nets().iter().map(|net| net.name().to_string()).collect(),
            net_weights: db.nets().iter().map(|net| net.weight()).collect(),
            flat_net2pin_map,
            flat_net2pin_start_map,
            pin2node_map: db.pins().iter().map(|pin| pin.node()).collect(),
            pin2net_map: db.pins().iter().map(|pin| pin.net()).collect(),
            pin_offset_x: db.pins().iter().map(|pin| pin.offset_x()).collect(),
            pin_offset_y: db.pins().iter().map(|pin| pin.offset_y()).collect(),
            pin_direction: db.pins().iter().map(|pin| pin.direction()).collect(),
            rows: db
                .rows()
                .iter()
                .map(|row| [row.xl(), row.yl(), row.xh(), row.yh()])
                .collect(),
            xl: db.xl(),
            yl: db.yl(),
            xh: db.xh(),
            yh: db.yh(),
            row_height: db.row_height(),
            site_width: db.site_width(),
        }
    }
}
