//! Nets and the pins that connect them to nodes.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::node::NodeId;

/// Index of a net in the database.
pub type NetId = usize;

/// Index of a pin in the database.
pub type PinId = usize;

/// Signal direction of a pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinDirection {
    Input,
    Output,
    #[default]
    Inout,
}

impl PinDirection {
    /// The single-letter Bookshelf code (`I`, `O`, `B`).
    pub fn code(self) -> &'static str {
        match self {
            PinDirection::Input => "I",
            PinDirection::Output => "O",
            PinDirection::Inout => "B",
        }
    }
}

impl fmt::Display for PinDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinDirection::Input => write!(f, "INPUT"),
            PinDirection::Output => write!(f, "OUTPUT"),
            PinDirection::Inout => write!(f, "INOUT"),
        }
    }
}

/// Error returned for an unrecognized pin direction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid pin direction `{0}`")]
pub struct ParsePinDirectionError(String);

impl FromStr for PinDirection {
    type Err = ParsePinDirectionError;

    /// Accepts Bookshelf codes and the spelled-out DEF/Verilog names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "I" | "INPUT" => Ok(PinDirection::Input),
            "O" | "OUTPUT" => Ok(PinDirection::Output),
            "B" | "INOUT" => Ok(PinDirection::Inout),
            _ => Err(ParsePinDirectionError(s.to_string())),
        }
    }
}

/// A connection point of a node onto a net.
///
/// The offset is measured from the node's lower-left corner in its `N`
/// orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    id: PinId,
    node: NodeId,
    net: NetId,
    offset_x: f64,
    offset_y: f64,
    direction: PinDirection,
}

impl Pin {
    pub fn new(
        id: PinId,
        node: NodeId,
        net: NetId,
        offset: (f64, f64),
        direction: PinDirection,
    ) -> Self {
        Self {
            id,
            node,
            net,
            offset_x: offset.0,
            offset_y: offset.1,
            direction,
        }
    }

    pub fn id(&self) -> PinId {
        self.id
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn net(&self) -> NetId {
        self.net
    }

    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    pub fn direction(&self) -> PinDirection {
        self.direction
    }

    pub(crate) fn set_node(&mut self, node: NodeId) {
        self.node = node;
    }
}

/// A net and the pins it connects, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Net {
    id: NetId,
    name: String,
    weight: f64,
    pins: Vec<PinId>,
}

impl Net {
    pub fn new(id: NetId, name: impl Into<String>, weight: f64, pins: Vec<PinId>) -> Self {
        Self {
            id,
            name: name.into(),
            weight,
            pins,
        }
    }

    pub fn id(&self) -> NetId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn pins(&self) -> &[PinId] {
        &self.pins
    }

    /// Number of pins on the net.
    pub fn degree(&self) -> usize {
        self.pins.len()
    }

    pub(crate) fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }
}
