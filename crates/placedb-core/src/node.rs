//! Placeable nodes: standard cells, macros, terminals and IO pins.
//!
//! A [`Node`] carries the geometry the placer works with: its lower-left
//! position, its size, its [`PlaceStatus`] and its orientation. Names and
//! master cells live beside it in [`NodeProperty`], indexed by the same id.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Area, Bounds, Coord, Point, Size},
    orient::Orient,
};

/// Index of a node in the database's node order.
pub type NodeId = usize;

/// Placement status of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaceStatus {
    /// No position has been committed yet.
    #[default]
    Unplaced,
    /// Positioned by a placer; may move again.
    Placed,
    /// Positioned by the designer; never moved.
    Fixed,
}

impl PlaceStatus {
    /// Returns `true` unless the status is [`PlaceStatus::Fixed`].
    pub fn is_movable(self) -> bool {
        !matches!(self, PlaceStatus::Fixed)
    }
}

impl fmt::Display for PlaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceStatus::Unplaced => write!(f, "UNPLACED"),
            PlaceStatus::Placed => write!(f, "PLACED"),
            PlaceStatus::Fixed => write!(f, "FIXED"),
        }
    }
}

/// What a node represents in the netlist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// A standard cell or macro instance.
    #[default]
    Cell,
    /// A fixed object that blocks placement (Bookshelf `terminal`).
    Terminal,
    /// A fixed object that cells may overlap (Bookshelf `terminal_NI`).
    TerminalNi,
    /// A top-level IO pin of the design.
    IoPin,
}

/// A placeable object in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    bounds: Bounds,
    status: PlaceStatus,
    orient: Option<Orient>,
    kind: NodeKind,
}

impl Node {
    /// Creates an unplaced node at the origin with unknown orientation.
    pub fn new(id: NodeId, size: Size, kind: NodeKind) -> Self {
        Self {
            id,
            bounds: Bounds::from_origin(Point::default(), size),
            status: PlaceStatus::Unplaced,
            orient: None,
            kind,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn status(&self) -> PlaceStatus {
        self.status
    }

    /// The orientation, or `None` while it is still undetermined.
    pub fn orient(&self) -> Option<Orient> {
        self.orient
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Lower-left corner.
    pub fn position(&self) -> Point {
        self.bounds.min_point()
    }

    pub fn size(&self) -> Size {
        self.bounds.to_size()
    }

    pub fn xl(&self) -> Coord {
        self.bounds.min_x()
    }

    pub fn yl(&self) -> Coord {
        self.bounds.min_y()
    }

    pub fn xh(&self) -> Coord {
        self.bounds.max_x()
    }

    pub fn yh(&self) -> Coord {
        self.bounds.max_y()
    }

    pub fn width(&self) -> Coord {
        self.bounds.width()
    }

    pub fn height(&self) -> Coord {
        self.bounds.height()
    }

    pub fn area(&self) -> Area {
        self.bounds.area()
    }

    pub fn is_fixed(&self) -> bool {
        !self.status.is_movable()
    }

    pub fn is_movable(&self) -> bool {
        self.status.is_movable()
    }

    /// Moves the node so that its lower-left corner is at `position`.
    pub fn move_to(&mut self, position: Point) {
        self.bounds = self.bounds.moved_to(position);
    }

    pub fn set_status(&mut self, status: PlaceStatus) {
        self.status = status;
    }

    pub fn set_orient(&mut self, orient: Option<Orient>) {
        self.orient = orient;
    }

    /// Reassigns the id; only the database builder renumbers nodes.
    pub(crate) fn set_id(&mut self, id: NodeId) {
        self.id = id;
    }
}

/// Descriptive data of a node that the placer never touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeProperty {
    name: String,
    macro_name: Option<String>,
}

impl NodeProperty {
    pub fn new(name: impl Into<String>, macro_name: Option<String>) -> Self {
        Self {
            name: name.into(),
            macro_name,
        }
    }

    /// Instance name of the node.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the master cell, when the source format provides one.
    pub fn macro_name(&self) -> Option<&str> {
        self.macro_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_unplaced() {
        let node = Node::new(3, Size::new(8, 12), NodeKind::Cell);

        assert_eq!(node.id(), 3);
        assert_eq!(node.status(), PlaceStatus::Unplaced);
        assert_eq!(node.orient(), None);
        assert_eq!(node.position(), Point::new(0, 0));
        assert_eq!(node.area(), 96);
        assert!(node.is_movable());
    }

    #[test]
    fn test_move_to_keeps_size() {
        let mut node = Node::new(0, Size::new(8, 12), NodeKind::Cell);
        node.move_to(Point::new(100, 36));

        assert_eq!(node.xl(), 100);
        assert_eq!(node.yl(), 36);
        assert_eq!(node.xh(), 108);
        assert_eq!(node.yh(), 48);
    }

    #[test]
    fn test_fixed_status() {
        let mut node = Node::new(0, Size::new(1, 1), NodeKind::Terminal);
        node.set_status(PlaceStatus::Fixed);

        assert!(node.is_fixed());
        assert!(!node.is_movable());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(PlaceStatus::Unplaced.to_string(), "UNPLACED");
        assert_eq!(PlaceStatus::Placed.to_string(), "PLACED");
        assert_eq!(PlaceStatus::Fixed.to_string(), "FIXED");
    }
}
