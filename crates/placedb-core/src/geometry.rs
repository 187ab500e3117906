//! Geometric primitives on the database's integer grid.
//!
//! All placement coordinates live on an integer grid whose unit is the
//! database unit (DBU). Floating point values coming from a solver are
//! rounded onto this grid before they enter the database.
//!
//! # Overview
//!
//! - [`Coord`] - A single coordinate on the grid
//! - [`Point`] - A 2D position, usually a lower-left corner
//! - [`Size`] - Width and height
//! - [`Bounds`] - An axis-aligned box, closed at the low edges and open at the high edges
//!
//! # Coordinate System
//!
//! ```text
//!    +Y
//!     ▲
//!     │
//!     │
//!   (0,0) ────────► +X
//! ```
//!
//! Y increases upward, matching DEF and Bookshelf.

use serde::{Deserialize, Serialize};

/// A coordinate on the database grid.
pub type Coord = i32;

/// An area on the database grid. Wider than [`Coord`] so products cannot overflow.
pub type Area = i64;

/// Rounds a floating point value onto the grid, half away from zero.
///
/// Values outside the [`Coord`] range saturate.
///
/// # Examples
///
/// ```
/// # use placedb_core::geometry::round_to_grid;
/// assert_eq!(round_to_grid(5.4), 5);
/// assert_eq!(round_to_grid(3.6), 4);
/// assert_eq!(round_to_grid(2.5), 3);
/// assert_eq!(round_to_grid(-2.5), -3);
/// ```
pub fn round_to_grid(value: f64) -> Coord {
    value.round() as Coord
}

/// A position on the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    x: Coord,
    y: Coord,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> Coord {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> Coord {
        self.y
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: Coord) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: Coord) -> Self {
        self.y = y;
        self
    }
}

/// Width and height of a footprint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    width: Coord,
    height: Coord,
}

impl Size {
    pub fn new(width: Coord, height: Coord) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> Coord {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> Coord {
        self.height
    }

    /// Returns the area covered by this size
    pub fn area(self) -> Area {
        Area::from(self.width) * Area::from(self.height)
    }

    /// Returns true if either dimension is zero
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// An axis-aligned box `[min_x, max_x) × [min_y, max_y)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    min_x: Coord,
    min_y: Coord,
    max_x: Coord,
    max_y: Coord,
}

impl Bounds {
    /// Creates bounds from its four edges.
    pub fn new(min_x: Coord, min_y: Coord, max_x: Coord, max_y: Coord) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates bounds from a lower-left corner and a size.
    ///
    /// High edges past the end of the grid saturate at [`Coord::MAX`].
    pub fn from_origin(origin: Point, size: Size) -> Self {
        Self {
            min_x: origin.x,
            min_y: origin.y,
            max_x: origin.x.saturating_add(size.width),
            max_y: origin.y.saturating_add(size.height),
        }
    }

    /// Creates bounds from a lower-left corner and a size, or `None` if a
    /// high edge would fall past the end of the grid.
    pub fn checked_from_origin(origin: Point, size: Size) -> Option<Self> {
        Some(Self {
            min_x: origin.x,
            min_y: origin.y,
            max_x: origin.x.checked_add(size.width)?,
            max_y: origin.y.checked_add(size.height)?,
        })
    }

    pub fn min_x(self) -> Coord {
        self.min_x
    }

    pub fn min_y(self) -> Coord {
        self.min_y
    }

    pub fn max_x(self) -> Coord {
        self.max_x
    }

    pub fn max_y(self) -> Coord {
        self.max_y
    }

    /// Returns the lower-left corner
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn width(self) -> Coord {
        self.max_x.saturating_sub(self.min_x)
    }

    pub fn height(self) -> Coord {
        self.max_y.saturating_sub(self.min_y)
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn area(self) -> Area {
        self.to_size().area()
    }

    /// Returns true if `y` lies in `[min_y, max_y)`.
    pub fn contains_y(self, y: Coord) -> bool {
        self.min_y <= y && y < self.max_y
    }

    /// Moves the box so that its lower-left corner is at `origin`, keeping its size.
    pub fn moved_to(self, origin: Point) -> Self {
        Self::from_origin(origin, self.to_size())
    }

    /// Smallest box containing both boxes.
    pub fn merge(self, other: Bounds) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Area shared by both boxes, zero if they are disjoint.
    pub fn overlap_area(self, other: Bounds) -> Area {
        let width =
            Area::from(self.max_x.min(other.max_x)) - Area::from(self.min_x.max(other.min_x));
        let height =
            Area::from(self.max_y.min(other.max_y)) - Area::from(self.min_y.max(other.min_y));
        if width <= 0 || height <= 0 {
            return 0;
        }
        width * height
    }
}
