//! The placement database aggregate.
//!
//! [`PlaceDb`] owns the nodes, rows, nets and pins of one design. It is
//! produced once by [`PlaceDbBuilder::build`], which fixes the node order:
//! every movable node comes before every fixed node, and fixed nodes that
//! cells may overlap (`terminal_NI`) come last. External coordinate arrays are
//! indexed positionally against this order, so it never changes afterwards.

mod builder;

pub use builder::{BuildError, PinSpec, PlaceDbBuilder};

use indexmap::IndexMap;

use crate::{
    geometry::{Area, Bounds, Coord},
    net::{Net, NetId, Pin, PinId},
    node::{Node, NodeId, NodeKind, NodeProperty},
    orient::Orient,
    row::{OutOfRange, Row, RowId, RowIndex},
};

/// A placement database for one design.
#[derive(Debug, Clone)]
pub struct PlaceDb {
    design_name: String,
    dbu: u32,
    die_area: Bounds,
    nodes: Vec<Node>,
    node_properties: Vec<NodeProperty>,
    node_lookup: IndexMap<String, NodeId>,
    num_movable: usize,
    rows: Vec<Row>,
    row_index: RowIndex,
    nets: Vec<Net>,
    pins: Vec<Pin>,
}

impl PlaceDb {
    /// Name of the design, taken from the input files.
    pub fn design_name(&self) -> &str {
        &self.design_name
    }

    /// Database units per micron.
    pub fn dbu(&self) -> u32 {
        self.dbu
    }

    pub fn die_area(&self) -> Bounds {
        self.die_area
    }

    pub fn xl(&self) -> Coord {
        self.die_area.min_x()
    }

    pub fn yl(&self) -> Coord {
        self.die_area.min_y()
    }

    pub fn xh(&self) -> Coord {
        self.die_area.max_x()
    }

    pub fn yh(&self) -> Coord {
        self.die_area.max_y()
    }

    pub fn width(&self) -> Coord {
        self.die_area.width()
    }

    pub fn height(&self) -> Coord {
        self.die_area.height()
    }

    /// All nodes, movable ones first.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All nodes, movable ones first.
    ///
    /// The slice can be mutated in place but not reordered, which keeps the
    /// movable prefix intact.
    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// # Panics
    ///
    /// Panics if `id` is not a valid node id.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// # Panics
    ///
    /// Panics if `id` is not a valid node id.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    /// # Panics
    ///
    /// Panics if `id` is not a valid node id.
    pub fn node_property(&self, id: NodeId) -> &NodeProperty {
        &self.node_properties[id]
    }

    /// Looks a node up by instance name.
    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.node_lookup.get(name).copied()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Size of the movable prefix of [`PlaceDb::nodes`].
    pub fn num_movable(&self) -> usize {
        self.num_movable
    }

    pub fn num_fixed(&self) -> usize {
        self.nodes.len() - self.num_movable
    }

    /// Number of fixed nodes that cells may overlap. They form the tail of the node order.
    pub fn num_terminal_nis(&self) -> usize {
        self.count_kind(NodeKind::TerminalNi)
    }

    pub fn num_io_pin(&self) -> usize {
        self.count_kind(NodeKind::IoPin)
    }

    /// Number of nodes taller than a row.
    pub fn num_macro(&self) -> usize {
        let row_height = self.row_height();
        if row_height <= 0 {
            return 0;
        }
        self.nodes
            .iter()
            .filter(|node| matches!(node.kind(), NodeKind::Cell | NodeKind::Terminal))
            .filter(|node| node.height() > row_height)
            .count()
    }

    /// Rows sorted by their lower y-coordinate.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// # Panics
    ///
    /// Panics if `id` is not a valid row id.
    pub fn row(&self, id: RowId) -> &Row {
        &self.rows[id]
    }

    pub fn row_index(&self) -> &RowIndex {
        &self.row_index
    }

    /// Returns the row whose y-range contains `y`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] if no row contains `y`.
    pub fn row_at(&self, y: Coord) -> Result<RowId, OutOfRange> {
        self.row_index.row_at(y)
    }

    /// The orientation mandated by row `id`.
    pub fn row_orient(&self, id: RowId) -> Orient {
        self.rows[id].orient()
    }

    /// Height of the shortest row, or zero without rows.
    pub fn row_height(&self) -> Coord {
        self.rows.iter().map(Row::height).min().unwrap_or(0)
    }

    /// Site width of the first row, or zero without rows.
    pub fn site_width(&self) -> Coord {
        self.rows.first().map_or(0, Row::site_width)
    }

    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    /// # Panics
    ///
    /// Panics if `id` is not a valid net id.
    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id]
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// # Panics
    ///
    /// Panics if `id` is not a valid pin id.
    pub fn pin(&self, id: PinId) -> &Pin {
        &self.pins[id]
    }

    /// Total area of the movable nodes.
    pub fn movable_area(&self) -> Area {
        self.nodes[..self.num_movable].iter().map(Node::area).sum()
    }

    /// Ratio of movable area to the row area left free by fixed nodes.
    ///
    /// Returns zero when no row area is available.
    pub fn compute_movable_util(&self) -> f64 {
        let row_area: Area = self.rows.iter().map(|row| row.bounds().area()).sum();
        let blocked: Area = self.nodes[self.num_movable..]
            .iter()
            .filter(|node| node.kind() != NodeKind::TerminalNi)
            .map(|node| self.area_in_rows(node.bounds()))
            .sum();
        let free = row_area - blocked;
        if free <= 0 {
            return 0.0;
        }
        self.movable_area() as f64 / free as f64
    }

    /// Returns `true` if every movable node precedes every fixed node.
    pub fn is_partitioned(&self) -> bool {
        self.nodes[..self.num_movable].iter().all(Node::is_movable)
            && self.nodes[self.num_movable..].iter().all(Node::is_fixed)
    }

    fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|node| node.kind() == kind).count()
    }

    /// Area of `bounds` covered by rows, visiting only rows overlapping its y-range.
    fn area_in_rows(&self, bounds: Bounds) -> Area {
        let first = self.rows.partition_point(|row| row.yh() <= bounds.min_y());
        self.rows[first..]
            .iter()
            .take_while(|row| row.yl() < bounds.max_y())
            .map(|row| row.bounds().overlap_area(bounds))
            .sum()
    }
}
