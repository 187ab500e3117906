//! Cell orientations and the flip algebra over them.
//!
//! A standard cell can be placed in one of eight orientations: the four
//! rotations of its footprint and the mirror image of each. The names follow
//! the DEF convention:
//!
//! | name | transform        | name | transform          |
//! |------|------------------|------|--------------------|
//! | `N`  | identity         | `FN` | mirror about Y     |
//! | `W`  | rotate 90° CCW   | `FE` | mirror about Y, 90°|
//! | `S`  | rotate 180°      | `FS` | mirror about X     |
//! | `E`  | rotate 270° CCW  | `FW` | mirror about X, 90°|
//!
//! Two flips act on this set:
//!
//! - [`Orient::vflip`] mirrors across the horizontal axis (top becomes bottom),
//! - [`Orient::hflip`] mirrors across the vertical axis (left becomes right).
//!
//! Both are involutions, they commute, and neither has a fixed point. Their
//! composition is a 180° rotation.
//!
//! A node whose orientation has not been decided yet carries
//! `Option<Orient>::None` instead of a ninth variant.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the eight orientations of a cell footprint.
///
/// # Examples
///
/// ```
/// # use placedb_core::orient::Orient;
/// assert_eq!(Orient::N.vflip(), Orient::FS);
/// assert_eq!(Orient::N.hflip(), Orient::FN);
/// assert_eq!(Orient::N.vflip().hflip(), Orient::S);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orient {
    N,
    S,
    W,
    E,
    FN,
    FS,
    FW,
    FE,
}

impl Orient {
    /// All orientations, in the order of their numeric codes.
    pub const ALL: [Orient; 8] = [
        Orient::N,
        Orient::S,
        Orient::W,
        Orient::E,
        Orient::FN,
        Orient::FS,
        Orient::FW,
        Orient::FE,
    ];

    /// Mirror across the horizontal axis.
    pub fn vflip(self) -> Self {
        let (turns, mirrored) = self.decompose();
        Self::compose(6 - turns, !mirrored)
    }

    /// Mirror across the vertical axis.
    pub fn hflip(self) -> Self {
        let (turns, mirrored) = self.decompose();
        Self::compose(4 - turns, !mirrored)
    }

    /// Counter-clockwise rotation of the footprint in degrees, applied after
    /// the optional mirror about the Y axis.
    pub fn rotation(self) -> u16 {
        u16::from(self.decompose().0) * 90
    }

    /// Returns `true` for the four `F*` orientations.
    pub fn is_mirrored(self) -> bool {
        self.decompose().1
    }

    /// Orientation for a numeric code, as found in older Bookshelf row files.
    ///
    /// Codes `0..=7` map onto [`Orient::ALL`] in order.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// The DEF name of this orientation.
    pub fn as_str(self) -> &'static str {
        match self {
            Orient::N => "N",
            Orient::S => "S",
            Orient::W => "W",
            Orient::E => "E",
            Orient::FN => "FN",
            Orient::FS => "FS",
            Orient::FW => "FW",
            Orient::FE => "FE",
        }
    }

    /// Splits the orientation into `(quarter_turns, mirrored)` such that the
    /// transform is `R(90° * quarter_turns) * MY^mirrored`.
    fn decompose(self) -> (u8, bool) {
        match self {
            Orient::N => (0, false),
            Orient::W => (1, false),
            Orient::S => (2, false),
            Orient::E => (3, false),
            Orient::FN => (0, true),
            Orient::FE => (1, true),
            Orient::FS => (2, true),
            Orient::FW => (3, true),
        }
    }

    fn compose(quarter_turns: u8, mirrored: bool) -> Self {
        match (quarter_turns % 4, mirrored) {
            (0, false) => Orient::N,
            (1, false) => Orient::W,
            (2, false) => Orient::S,
            (3, false) => Orient::E,
            (0, true) => Orient::FN,
            (1, true) => Orient::FE,
            (2, true) => Orient::FS,
            (_, true) => Orient::FW,
            (_, false) => unreachable!("quarter turns are reduced modulo 4"),
        }
    }
}

impl fmt::Display for Orient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the eight orientation names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid orientation `{0}`")]
pub struct ParseOrientError(String);

impl FromStr for Orient {
    type Err = ParseOrientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|orient| orient.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseOrientError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vflip_table() {
        assert_eq!(Orient::N.vflip(), Orient::FS);
        assert_eq!(Orient::S.vflip(), Orient::FN);
        assert_eq!(Orient::W.vflip(), Orient::FE);
        assert_eq!(Orient::E.vflip(), Orient::FW);
        assert_eq!(Orient::FN.vflip(), Orient::S);
        assert_eq!(Orient::FS.vflip(), Orient::N);
        assert_eq!(Orient::FW.vflip(), Orient::E);
        assert_eq!(Orient::FE.vflip(), Orient::W);
    }

    #[test]
    fn test_hflip_table() {
        assert_eq!(Orient::N.hflip(), Orient::FN);
        assert_eq!(Orient::S.hflip(), Orient::FS);
        assert_eq!(Orient::W.hflip(), Orient::FW);
        assert_eq!(Orient::E.hflip(), Orient::FE);
        assert_eq!(Orient::FN.hflip(), Orient::N);
        assert_eq!(Orient::FS.hflip(), Orient::S);
        assert_eq!(Orient::FW.hflip(), Orient::W);
        assert_eq!(Orient::FE.hflip(), Orient::E);
    }

    #[test]
    fn test_double_flip_is_half_turn() {
        for orient in Orient::ALL {
            let flipped = orient.vflip().hflip();
            assert_eq!(flipped.is_mirrored(), orient.is_mirrored());
            assert_eq!((flipped.rotation() + 360 - orient.rotation()) % 360, 180);
        }
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Orient::from_code(0), Some(Orient::N));
        assert_eq!(Orient::from_code(1), Some(Orient::S));
        assert_eq!(Orient::from_code(5), Some(Orient::FS));
        assert_eq!(Orient::from_code(8), None);
    }

    #[test]
    fn test_parse_and_display() {
        for orient in Orient::ALL {
            assert_eq!(orient.to_string().parse::<Orient>(), Ok(orient));
        }
        assert_eq!("fs".parse::<Orient>(), Ok(Orient::FS));
        assert_eq!(
            "R0".parse::<Orient>().unwrap_err().to_string(),
            "invalid orientation `R0`"
        );
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn orient_strategy() -> impl Strategy<Value = Orient> {
        prop::sample::select(Orient::ALL.to_vec())
    }

    /// Flipping twice along the same axis restores the orientation.
    fn check_flips_are_involutions(orient: Orient) -> Result<(), TestCaseError> {
        prop_assert_eq!(orient.vflip().vflip(), orient);
        prop_assert_eq!(orient.hflip().hflip(), orient);
        Ok(())
    }

    /// The order of the two flips does not matter.
    fn check_flips_commute(orient: Orient) -> Result<(), TestCaseError> {
        prop_assert_eq!(orient.vflip().hflip(), orient.hflip().vflip());
        Ok(())
    }

    /// No orientation maps to itself under either flip.
    fn check_flips_have_no_fixed_point(orient: Orient) -> Result<(), TestCaseError> {
        prop_assert_ne!(orient.vflip(), orient);
        prop_assert_ne!(orient.hflip(), orient);
        prop_assert_ne!(orient.vflip(), orient.hflip());
        Ok(())
    }

    proptest! {
        #[test]
        fn flips_are_involutions(orient in orient_strategy()) {
            check_flips_are_involutions(orient)?;
        }

        #[test]
        fn flips_commute(orient in orient_strategy()) {
            check_flips_commute(orient)?;
        }

        #[test]
        fn flips_have_no_fixed_point(orient in orient_strategy()) {
            check_flips_have_no_fixed_point(orient)?;
        }
    }
}
