//! Incremental construction of a [`PlaceDb`].
//!
//! Readers for the various input formats populate a shared
//! [`PlaceDbBuilder`] one after another; [`PlaceDbBuilder::build`] then
//! establishes the final node order and the row index.

use indexmap::IndexMap;
use log::debug;
use thiserror::Error;

use super::PlaceDb;
use crate::{
    geometry::{Bounds, Point, Size},
    net::{Net, NetId, Pin, PinDirection},
    node::{Node, NodeId, NodeKind, NodeProperty, PlaceStatus},
    orient::Orient,
    row::{Row, RowIndex},
};

/// Errors raised while populating or finalizing a database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("node `{0}` is defined more than once")]
    DuplicateNode(String),

    #[error("net `{0}` is defined more than once")]
    DuplicateNet(String),

    #[error("unknown net `{0}`")]
    UnknownNet(String),

    #[error("node id {0} does not exist")]
    InvalidNodeId(NodeId),

    #[error("row `{0}` has an empty extent")]
    EmptyRow(String),

    #[error("rows `{0}` and `{1}` overlap vertically")]
    OverlappingRows(String, String),
}

/// One pin of a net under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PinSpec {
    /// Node the pin belongs to, as returned by [`PlaceDbBuilder::add_node`].
    pub node: NodeId,
    /// Offset from the node's lower-left corner.
    pub offset: (f64, f64),
    pub direction: PinDirection,
}

/// Accumulates design data from one or more readers.
///
/// Node ids handed out by the builder are insertion indices; they are only
/// valid until [`PlaceDbBuilder::build`] renumbers the nodes.
#[derive(Debug, Clone)]
pub struct PlaceDbBuilder {
    design_name: String,
    dbu: u32,
    die_area: Option<Bounds>,
    nodes: Vec<Node>,
    node_properties: Vec<NodeProperty>,
    node_lookup: IndexMap<String, NodeId>,
    rows: Vec<Row>,
    nets: Vec<Net>,
    net_lookup: IndexMap<String, NetId>,
    pins: Vec<Pin>,
}

impl Default for PlaceDbBuilder {
    fn default() -> Self {
        Self {
            design_name: String::new(),
            dbu: 1,
            die_area: None,
            nodes: Vec::new(),
            node_properties: Vec::new(),
            node_lookup: IndexMap::new(),
            rows: Vec::new(),
            nets: Vec::new(),
            net_lookup: IndexMap::new(),
            pins: Vec::new(),
        }
    }
}

impl PlaceDbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn design_name(&self) -> &str {
        &self.design_name
    }

    pub fn set_design_name(&mut self, name: impl Into<String>) {
        self.design_name = name.into();
    }

    /// Sets the database units per micron.
    pub fn set_dbu(&mut self, dbu: u32) {
        self.dbu = dbu;
    }

    /// Sets the die area explicitly; otherwise it is derived on build.
    pub fn set_die_area(&mut self, die_area: Bounds) {
        self.die_area = Some(die_area);
    }

    /// Adds an unplaced node and returns its provisional id.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DuplicateNode`] if a node with the same name exists.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        macro_name: Option<String>,
        size: Size,
        kind: NodeKind,
    ) -> Result<NodeId, BuildError> {
        let name = name.into();
        if self.node_lookup.contains_key(&name) {
            return Err(BuildError::DuplicateNode(name));
        }

        let id = self.nodes.len();
        self.nodes.push(Node::new(id, size, kind));
        self.node_properties
            .push(NodeProperty::new(name.clone(), macro_name));
        self.node_lookup.insert(name, id);
        Ok(id)
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.node_lookup.get(name).copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Sets the position, orientation and status of a node.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidNodeId`] if `id` was not handed out by this builder.
    pub fn place_node(
        &mut self,
        id: NodeId,
        position: Point,
        orient: Option<Orient>,
        status: PlaceStatus,
    ) -> Result<(), BuildError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or(BuildError::InvalidNodeId(id))?;
        node.move_to(position);
        node.set_orient(orient);
        node.set_status(status);
        Ok(())
    }

    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Adds a net with its pins and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DuplicateNet`] for a repeated name and
    /// [`BuildError::InvalidNodeId`] for a pin on an unknown node.
    pub fn add_net(
        &mut self,
        name: impl Into<String>,
        weight: f64,
        pins: impl IntoIterator<Item = PinSpec>,
    ) -> Result<NetId, BuildError> {
        let name = name.into();
        if self.net_lookup.contains_key(&name) {
            return Err(BuildError::DuplicateNet(name));
        }

        let net_id = self.nets.len();
        let first_pin = self.pins.len();
        for spec in pins {
            if spec.node >= self.nodes.len() {
                self.pins.truncate(first_pin);
                return Err(BuildError::InvalidNodeId(spec.node));
            }
            let pin_id = self.pins.len();
            self.pins.push(Pin::new(
                pin_id,
                spec.node,
                net_id,
                spec.offset,
                spec.direction,
            ));
        }

        let pin_ids = (first_pin..self.pins.len()).collect();
        self.nets.push(Net::new(net_id, name.clone(), weight, pin_ids));
        self.net_lookup.insert(name, net_id);
        Ok(net_id)
    }

    /// # Errors
    ///
    /// Returns [`BuildError::UnknownNet`] if no net has this name.
    pub fn set_net_weight(&mut self, name: &str, weight: f64) -> Result<(), BuildError> {
        let id = self
            .net_lookup
            .get(name)
            .copied()
            .ok_or_else(|| BuildError::UnknownNet(name.to_string()))?;
        self.nets[id].set_weight(weight);
        Ok(())
    }

    pub fn has_nets(&self) -> bool {
        !self.nets.is_empty()
    }

    /// Finalizes the database.
    ///
    /// Nodes are stably reordered into movable, fixed, and fixed non-image
    /// groups and renumbered; pins follow their nodes. Rows are sorted by
    /// `(yl, xl)` and indexed. Without an explicit die area, the bounding box
    /// of the rows (or else of the nodes) is used.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::EmptyRow`] for a row with zero or negative height
    /// and [`BuildError::OverlappingRows`] when two rows share part of their
    /// y range. Split rows covering exactly the same y range are allowed.
    pub fn build(self) -> Result<PlaceDb, BuildError> {
        let Self {
            design_name,
            dbu,
            die_area,
            nodes,
            node_properties,
            nets,
            mut rows,
            mut pins,
            ..
        } = self;

        if let Some(row) = rows.iter().find(|row| row.height() <= 0) {
            return Err(BuildError::EmptyRow(row.name().to_string()));
        }

        let mut entries = nodes.into_iter().zip(node_properties).collect::<Vec<_>>();
        entries.sort_by_key(|(node, _)| placement_group(node));

        let mut remap = vec![0; entries.len()];
        for (new_id, (node, _)) in entries.iter_mut().enumerate() {
            remap[node.id()] = new_id;
            node.set_id(new_id);
        }
        for pin in &mut pins {
            pin.set_node(remap[pin.node()]);
        }

        let (nodes, node_properties): (Vec<_>, Vec<_>) = entries.into_iter().unzip();
        let node_lookup = node_properties
            .iter()
            .enumerate()
            .map(|(id, property)| (property.name().to_string(), id))
            .collect::<IndexMap<_, _>>();
        let num_movable = nodes.iter().take_while(|node| node.is_movable()).count();

        rows.sort_by_key(|row| (row.yl(), row.xl()));
        if let Some(pair) = rows.windows(2).find(|pair| {
            let (below, above) = (&pair[0], &pair[1]);
            above.yl() < below.yh() && (above.yl(), above.yh()) != (below.yl(), below.yh())
        }) {
            return Err(BuildError::OverlappingRows(
                pair[0].name().to_string(),
                pair[1].name().to_string(),
            ));
        }
        for (id, row) in rows.iter_mut().enumerate() {
            row.set_id(id);
        }
        let row_index = RowIndex::new(&rows);

        let die_area = die_area
            .or_else(|| rows.iter().map(Row::bounds).reduce(Bounds::merge))
            .or_else(|| nodes.iter().map(Node::bounds).reduce(Bounds::merge))
            .unwrap_or_default();

        debug!(
            num_nodes = nodes.len(),
            num_movable = num_movable,
            num_rows = rows.len(),
            num_nets = nets.len();
            "Placement database built"
        );

        Ok(PlaceDb {
            design_name,
            dbu,
            die_area,
            nodes,
            node_properties,
            node_lookup,
            num_movable,
            rows,
            row_index,
            nets,
            pins,
        })
    }
}

/// Sort key establishing the movable, fixed, fixed non-image order.
fn placement_group(node: &Node) -> u8 {
    match (node.is_movable(), node.kind()) {
        (true, _) => 0,
        (false, NodeKind::TerminalNi) => 2,
        (false, _) => 1,
    }
}
