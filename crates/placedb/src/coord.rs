//! Floating-point element types accepted for solution arrays.

use placedb_core::geometry::{Coord, round_to_grid};

mod sealed {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// An element of a caller-supplied coordinate array.
///
/// Implemented for `f32` and `f64`. Values are snapped to the integer grid
/// by rounding half away from zero.
pub trait SolutionCoord: Copy + sealed::Sealed {
    fn to_grid(self) -> Coord;
}

impl SolutionCoord for f32 {
    fn to_grid(self) -> Coord {
        round_to_grid(f64::from(self))
    }
}

impl SolutionCoord for f64 {
    fn to_grid(self) -> Coord {
        round_to_grid(self)
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn check_f32_and_f64_agree(value: f32) -> Result<(), TestCaseError> {
        prop_assert_eq!(value.to_grid(), f64::from(value).to_grid());
        Ok(())
    }

    fn check_within_half_a_unit(value: f64) -> Result<(), TestCaseError> {
        let snapped = f64::from(value.to_grid());
        prop_assert!((snapped - value).abs() <= 0.5);
        Ok(())
    }

    proptest! {
        #[test]
        fn f32_and_f64_agree(value in -1.0e6_f32..1.0e6) {
            check_f32_and_f64_agree(value)?;
        }

        #[test]
        fn within_half_a_unit(value in -1.0e6_f64..1.0e6) {
            check_within_half_a_unit(value)?;
        }
    }
}
