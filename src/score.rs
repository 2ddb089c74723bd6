/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

/// A numerical representation of the evaluation of a position / move, in units of material.
///
/// Material values are whole pieces (a Pawn is worth 1), not centipawns.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Score(pub i32);

impl Score {
    /// Best possible score: a position that is won for the maximizing side.
    ///
    /// One less than [`i32::MAX`], so it can be negated and compared safely.
    pub const MAX: Self = Self(i32::MAX - 1);

    /// Worst possible score: a position that is lost for the maximizing side.
    ///
    /// One more than [`i32::MIN`], so it can be negated and compared safely.
    pub const MIN: Self = Self(i32::MIN + 1);

    /// Score held before any move has been considered.
    ///
    /// This is strictly below [`Score::MIN`], so the first move looked at always replaces it.
    pub const NONE: Self = Self(i32::MIN);

    /// Score of an equal position.
    pub const DRAW: Self = Self(0);
}

macro_rules! impl_binary_op {
    ($trait:tt, $fn:ident) => {
        impl std::ops::$trait for Score {
            type Output = Self;

            #[inline(always)]
            fn $fn(self, rhs: Self) -> Self::Output {
                Self(self.0.$fn(rhs.0))
            }
        }

        impl std::ops::$trait<i32> for Score {
            type Output = Self;

            #[inline(always)]
            fn $fn(self, rhs: i32) -> Self::Output {
                Self(self.0.$fn(rhs))
            }
        }
    };
}

impl_binary_op!(Add, add);
impl_binary_op!(Sub, sub);

impl PartialEq<i32> for Score {
    fn eq(&self, other: &i32) -> bool {
        self.0.eq(other)
    }
}

impl PartialOrd<i32> for Score {
    fn partial_cmp(&self, other: &i32) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}

impl fmt::Display for Score {
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for Score {
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::MAX => write!(f, "{} (max)", self.0),
            Self::MIN => write!(f, "{} (min)", self.0),
            Self::NONE => write!(f, "{} (none)", self.0),
            _ => write!(f, "{}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_ordering() {
        assert!(Score::NONE < Score::MIN);
        assert!(Score::MIN < Score::DRAW);
        assert!(Score::DRAW < Score::MAX);
        assert!(Score::MAX < Score(i32::MAX));
    }

    #[test]
    fn test_arithmetic() {
        let score = Score(5) - Score(3);
        assert_eq!(score, 2);
        assert_eq!(score + 4, Score(6));
        assert_eq!(Score::MIN - 1, Score::NONE);
        assert!(score + 4 > 5);
    }
}
