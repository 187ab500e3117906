//! Placement rows and the index that maps a y-coordinate to its row.

use thiserror::Error;

use crate::{
    geometry::{Bounds, Coord},
    orient::Orient,
};

/// Index of a row in the database's row order (sorted by y).
pub type RowId = usize;

/// A horizontal placement track.
///
/// Every cell placed in the row must take the row's orientation, up to the
/// flips the applier is allowed to perform. Adjacent rows usually alternate
/// between `N` and `FS` so that power rails abut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    id: RowId,
    name: String,
    bounds: Bounds,
    site_width: Coord,
    orient: Orient,
}

impl Row {
    pub fn new(name: impl Into<String>, bounds: Bounds, site_width: Coord, orient: Orient) -> Self {
        Self {
            id: 0,
            name: name.into(),
            bounds,
            site_width,
            orient,
        }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
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

    pub fn height(&self) -> Coord {
        self.bounds.height()
    }

    pub fn site_width(&self) -> Coord {
        self.site_width
    }

    /// Number of whole sites that fit in the row.
    pub fn num_sites(&self) -> Coord {
        if self.site_width > 0 {
            self.bounds.width() / self.site_width
        } else {
            0
        }
    }

    /// The orientation mandated for cells in this row.
    pub fn orient(&self) -> Orient {
        self.orient
    }

    pub(crate) fn set_id(&mut self, id: RowId) {
        self.id = id;
    }
}

/// No row covers the requested y-coordinate.
///
/// Raised when a node is moved outside the placement area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no placement row contains y = {y}")]
pub struct OutOfRange {
    pub y: Coord,
}

/// Sorted row boundaries supporting point lookup by y.
#[derive(Debug, Clone, Default)]
pub struct RowIndex {
    /// `(yl, yh, row)` sorted by `yl`.
    spans: Vec<(Coord, Coord, RowId)>,
}

impl RowIndex {
    /// Builds the index over rows that are already sorted by `yl`.
    pub fn new(rows: &[Row]) -> Self {
        let spans = rows.iter().map(|row| (row.yl(), row.yh(), row.id())).collect::<Vec<_>>();
        debug_assert!(spans.windows(2).all(|pair| pair[0].0 <= pair[1].0));
        Self { spans }
    }

    /// Returns the row whose `[yl, yh)` range contains `y`.
    ///
    /// When several rows start at the same `yl` (split rows), the last of
    /// them is returned; they share a height and an orientation.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] if no row contains `y`.
    pub fn row_at(&self, y: Coord) -> Result<RowId, OutOfRange> {
        let upper = self.spans.partition_point(|&(yl, _, _)| yl <= y);
        let (_, yh, row) = upper
            .checked_sub(1)
            .map(|idx| self.spans[idx])
            .ok_or(OutOfRange { y })?;
        if y < yh { Ok(row) } else { Err(OutOfRange { y }) }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(spans: &[(Coord, Coord, Orient)]) -> Vec<Row> {
        spans
            .iter()
            .enumerate()
            .map(|(idx, &(yl, yh, orient))| {
                let mut row = Row::new(format!("row{idx}"), Bounds::new(0, yl, 100, yh), 1, orient);
                row.set_id(idx);
                row
            })
            .collect()
    }

    #[test]
    fn test_row_at_finds_containing_row() {
        let index = RowIndex::new(&rows(&[(0, 10, Orient::N), (10, 20, Orient::FS)]));

        assert_eq!(index.row_at(0), Ok(0));
        assert_eq!(index.row_at(9), Ok(0));
        assert_eq!(index.row_at(10), Ok(1));
        assert_eq!(index.row_at(19), Ok(1));
    }

    #[test]
    fn test_row_at_outside_rows() {
        let index = RowIndex::new(&rows(&[(0, 10, Orient::N), (10, 20, Orient::FS)]));

        assert_eq!(index.row_at(-1), Err(OutOfRange { y: -1 }));
        assert_eq!(index.row_at(20), Err(OutOfRange { y: 20 }));
    }

    #[test]
    fn test_row_at_in_gap() {
        let index = RowIndex::new(&rows(&[(0, 10, Orient::N), (30, 40, Orient::FS)]));

        assert_eq!(index.row_at(15), Err(OutOfRange { y: 15 }));
        assert_eq!(index.row_at(35), Ok(1));
    }

    #[test]
    fn test_row_at_empty_index() {
        let index = RowIndex::default();

        assert!(index.is_empty());
        assert_eq!(index.row_at(0), Err(OutOfRange { y: 0 }));
    }

    #[test]
    fn test_num_sites() {
        let row = Row::new("core", Bounds::new(10, 0, 110, 12), 4, Orient::N);
        assert_eq!(row.num_sites(), 25);
        assert_eq!(row.height(), 12);
    }
}
