//! Committing a placement solution to the database.

use log::{debug, info};

use placedb_core::{
    db::PlaceDb,
    geometry::{Point, Size},
    node::{NodeId, PlaceStatus},
    orient::Orient,
    row::OutOfRange,
};

use crate::{coord::SolutionCoord, error::PlaceDbError};

/// Chooses the orientation of a cell placed in a row mandating `target`.
///
/// An unknown orientation takes the row's. A cell that only differs from
/// the row by a vertical flip takes the row's orientation; a cell that
/// differs by both flips is flipped vertically. Every other combination,
/// including a pure horizontal mismatch, keeps the current orientation.
///
/// Flips follow the DEF meaning of the orientation names: `vflip(N)` is
/// `FS` (mirrored about the x axis) and `hflip(N)` is `FN`. Tools that call
/// `FN` the vertical flip of `N` expect an `N` cell to become `FN` in both an
/// `FN` and an `FS` row. Here it becomes `FS` in an `FS` row and stays `N`
/// in an `FN` row.
///
/// ```
/// # use placedb::reconcile_orient;
/// # use placedb_core::orient::Orient;
/// assert_eq!(reconcile_orient(None, Orient::FS), Orient::FS);
/// assert_eq!(reconcile_orient(Some(Orient::N), Orient::FS), Orient::FS);
/// assert_eq!(reconcile_orient(Some(Orient::FN), Orient::FS), Orient::S);
/// assert_eq!(reconcile_orient(Some(Orient::N), Orient::FN), Orient::N);
/// ```
pub fn reconcile_orient(current: Option<Orient>, target: Orient) -> Orient {
    let Some(current) = current else {
        return target;
    };
    if target == current.vflip() {
        target
    } else if target == current.vflip().hflip() {
        current.vflip()
    } else {
        current
    }
}

/// Moves every movable node to its solution coordinates.
///
/// Node `id` in `0..num_movable()` goes to `(xs[id], ys[id])` snapped to the
/// grid, becomes [`PlaceStatus::Placed`], and has its orientation reconciled
/// with the row now containing its lower edge (see [`reconcile_orient`]).
/// An empty array leaves that axis unchanged. Fixed nodes are never touched.
///
/// # Errors
///
/// - [`PlaceDbError::ShortSolution`] if a non-empty array has fewer entries
///   than there are movable nodes. Nothing is modified in that case.
/// - [`PlaceDbError::RowLookup`] if a node lands outside every row. Nodes
///   processed before it, and the node itself, keep their new position.
///   A node whose top edge would pass the end of the grid is not moved.
/// - [`PlaceDbError::OffGrid`] if a node's right edge would pass the end of
///   the grid. That node is not moved; earlier nodes keep their new position.
pub fn apply<T: SolutionCoord>(db: &mut PlaceDb, xs: &[T], ys: &[T]) -> Result<(), PlaceDbError> {
    let num_movable = db.num_movable();
    check_len("x", xs.len(), num_movable)?;
    check_len("y", ys.len(), num_movable)?;

    info!(num_movable = num_movable; "Applying placement solution");
    for id in 0..num_movable {
        let node = db.node_mut(id);
        if node.is_fixed() {
            continue;
        }

        let mut position = node.position();
        if let Some(x) = xs.get(id) {
            position = position.with_x(x.to_grid());
        }
        if let Some(y) = ys.get(id) {
            position = position.with_y(y.to_grid());
        }
        check_fits(id, position, node.size())?;
        node.move_to(position);
        node.set_status(PlaceStatus::Placed);

        let row = db.row_at(position.y())?;
        let target = db.row_orient(row);
        let node = db.node_mut(id);
        node.set_orient(Some(reconcile_orient(node.orient(), target)));
    }

    debug!(num_movable = num_movable; "Placement solution applied");
    Ok(())
}

/// Rejects a position whose far edges do not fit on the grid.
fn check_fits(id: NodeId, position: Point, size: Size) -> Result<(), PlaceDbError> {
    if position.y().checked_add(size.height()).is_none() {
        return Err(OutOfRange { y: position.y() }.into());
    }
    if position.x().checked_add(size.width()).is_none() {
        return Err(PlaceDbError::OffGrid {
            node: id,
            x: position.x(),
        });
    }
    Ok(())
}

fn check_len(axis: &'static str, len: usize, expected: usize) -> Result<(), PlaceDbError> {
    if len == 0 || len >= expected {
        return Ok(());
    }
    Err(PlaceDbError::ShortSolution {
        axis,
        len,
        expected,
    })
}

#[cfg(test)]
mod tests {
    use placedb_core::{
        db::PlaceDbBuilder,
        geometry::{Bounds, Coord},
        node::NodeKind,
        row::Row,
    };

    use super::*;

    /// Rows `[0, 10)` facing N and `[10, 20)` facing FS, three cells and a
    /// fixed terminal.
    pub(super) fn two_row_db() -> PlaceDb {
        let mut builder = PlaceDbBuilder::new();
        builder.add_row(Row::new("r0", Bounds::new(0, 0, 100, 10), 1, Orient::N));
        builder.add_row(Row::new("r1", Bounds::new(0, 10, 100, 20), 1, Orient::FS));
        for name in ["c0", "c1", "c2"] {
            builder
                .add_node(name, None, Size::new(4, 10), NodeKind::Cell)
                .unwrap();
        }
        let terminal = builder
            .add_node("t0", None, Size::new(2, 2), NodeKind::Terminal)
            .unwrap();
        builder
            .place_node(terminal, Point::new(50, 5), Some(Orient::N), PlaceStatus::Fixed)
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_apply_moves_and_places() {
        let mut db = two_row_db();

        apply(&mut db, &[5.4, 20.0, 30.0], &[3.6, 12.0, 0.0]).unwrap();

        let c0 = db.node(0);
        assert_eq!(c0.position(), Point::new(5, 4));
        assert_eq!(c0.status(), PlaceStatus::Placed);
        assert_eq!(c0.orient(), Some(Orient::N));
        assert_eq!(db.node(1).orient(), Some(Orient::FS));
    }

    #[test]
    fn test_fixed_nodes_are_untouched() {
        let mut db = two_row_db();
        let before = db.node(3).clone();

        apply(&mut db, &[0.0, 0.0, 0.0, 99.0], &[0.0, 0.0, 0.0, 19.0]).unwrap();

        assert_eq!(db.node(3), &before);
        assert_eq!(db.num_movable(), 3);
    }

    #[test]
    fn test_empty_axis_is_unchanged() {
        let mut db = two_row_db();
        db.node_mut(1).move_to(Point::new(7, 0));

        apply::<f32>(&mut db, &[], &[11.0, 12.0, 13.0]).unwrap();

        assert_eq!(db.node(1).position(), Point::new(7, 12));
    }

    #[test]
    fn test_short_solution_changes_nothing() {
        let mut db = two_row_db();
        let before = db.nodes().to_vec();

        let err = apply(&mut db, &[1.0, 2.0], &[1.0, 2.0, 3.0]).unwrap_err();

        assert!(matches!(
            err,
            PlaceDbError::ShortSolution {
                axis: "x",
                len: 2,
                expected: 3
            }
        ));
        assert_eq!(db.nodes(), before.as_slice());
    }

    #[test]
    fn test_out_of_range_keeps_earlier_nodes() {
        let mut db = two_row_db();

        let err = apply(&mut db, &[1.0, 2.0, 3.0], &[1.0, 25.0, 3.0]).unwrap_err();

        assert!(matches!(err, PlaceDbError::RowLookup(range) if range.y == 25));
        assert_eq!(db.node(0).status(), PlaceStatus::Placed);
        assert_eq!(db.node(1).position(), Point::new(2, 25));
        assert_eq!(db.node(1).orient(), None);
        assert_eq!(db.node(2).status(), PlaceStatus::Unplaced);
    }

    #[test]
    fn test_far_away_node_is_out_of_range() {
        let mut db = two_row_db();

        let err = apply(&mut db, &[1.0, 2.0, 3.0], &[0.0, 3.0e9, 0.0]).unwrap_err();

        assert!(matches!(err, PlaceDbError::RowLookup(range) if range.y == Coord::MAX));
        assert_eq!(db.node(0).position(), Point::new(1, 0));
        assert_eq!(db.node(1).position(), Point::new(0, 0));
        assert_eq!(db.node(1).status(), PlaceStatus::Unplaced);
    }

    #[test]
    fn test_node_past_the_right_edge_is_off_grid() {
        let mut db = two_row_db();

        let err = apply(&mut db, &[1.0, 2.0, 3.0e9], &[0.0, 0.0, 0.0]).unwrap_err();

        assert!(matches!(
            err,
            PlaceDbError::OffGrid { node: 2, x } if x == Coord::MAX
        ));
        assert_eq!(db.node(1).status(), PlaceStatus::Placed);
        assert_eq!(db.node(2).status(), PlaceStatus::Unplaced);
    }

    #[test]
    fn test_orientation_in_flipped_row() {
        let mut db = two_row_db();
        db.node_mut(0).set_orient(Some(Orient::N));
        db.node_mut(1).set_orient(Some(Orient::FN));
        db.node_mut(2).set_orient(Some(Orient::FS));

        apply(&mut db, &[0.0, 10.0, 20.0], &[10.0, 10.0, 10.0]).unwrap();

        assert_eq!(db.node(0).orient(), Some(Orient::FS));
        assert_eq!(db.node(1).orient(), Some(Orient::S));
        assert_eq!(db.node(2).orient(), Some(Orient::FS));
    }

    #[test]
    fn test_apply_is_repeatable() {
        let mut db = two_row_db();

        apply(&mut db, &[1.0, 2.0, 3.0], &[0.0, 10.0, 0.0]).unwrap();
        apply(&mut db, &[4.0, 5.0, 6.0], &[10.0, 0.0, 10.0]).unwrap();

        assert_eq!(db.num_movable(), 3);
        assert_eq!(db.node(0).orient(), Some(Orient::FS));
        assert_eq!(db.node(1).orient(), Some(Orient::N));
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn orient_strategy() -> impl Strategy<Value = Orient> {
        prop::sample::select(Orient::ALL.to_vec())
    }

    /// The result is always the row's orientation or one of the two
    /// vertical relatives of the current one.
    fn check_result_is_bounded(current: Orient, target: Orient) -> Result<(), TestCaseError> {
        let result = reconcile_orient(Some(current), target);
        prop_assert!(result == target || result == current || result == current.vflip());
        Ok(())
    }

    /// A cell already matching its row, or off only horizontally, stays.
    fn check_horizontal_mismatch_is_kept(current: Orient) -> Result<(), TestCaseError> {
        prop_assert_eq!(reconcile_orient(Some(current), current), current);
        prop_assert_eq!(reconcile_orient(Some(current), current.hflip()), current);
        Ok(())
    }

    /// Any solution coordinate either lands in a row or is reported.
    fn check_far_coordinates_are_reported(x: f64, y: f64) -> Result<(), TestCaseError> {
        let mut db = super::tests::two_row_db();

        match apply(&mut db, &[x, 0.0, 0.0], &[y, 0.0, 0.0]) {
            Ok(()) => prop_assert!((0..20).contains(&db.node(0).yl())),
            Err(PlaceDbError::RowLookup(range)) => prop_assert!(!(0..20).contains(&range.y)),
            Err(PlaceDbError::OffGrid { node, .. }) => {
                prop_assert_eq!(node, 0);
                prop_assert_eq!(db.node(0).status(), PlaceStatus::Unplaced);
            }
            Err(err) => prop_assert!(false, "unexpected error: {err}"),
        }
        Ok(())
    }

    /// A second pass in the same row changes nothing.
    fn check_idempotent(current: Orient, target: Orient) -> Result<(), TestCaseError> {
        let once = reconcile_orient(Some(current), target);
        prop_assert_eq!(reconcile_orient(Some(once), target), once);
        Ok(())
    }

    proptest! {
        #[test]
        fn result_is_bounded(current in orient_strategy(), target in orient_strategy()) {
            check_result_is_bounded(current, target)?;
        }

        #[test]
        fn horizontal_mismatch_is_kept(current in orient_strategy()) {
            check_horizontal_mismatch_is_kept(current)?;
        }

        #[test]
        fn far_y_is_reported(y in -1.0e12f64..1.0e12) {
            check_far_coordinates_are_reported(5.0, y)?;
        }

        #[test]
        fn far_coordinates_are_reported(x in -1.0e12f64..1.0e12, y in -40.0f64..40.0) {
            check_far_coordinates_are_reported(x, y)?;
        }

        #[test]
        fn idempotent(current in orient_strategy(), target in orient_strategy()) {
            check_idempotent(current, target)?;
        }
    }
}
