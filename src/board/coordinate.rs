/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Result};

use super::{Color, BOARD_SIZE};

/// Represents a single location on an `8x8` chess board, as a rank/file pair.
///
/// Ranks and files are zero-indexed, so `a1` is `(0, 0)` and `h8` is `(7, 7)`.
///
/// No validation is done on construction: a [`Coordinate`] may point anywhere,
/// including off of the board. Bounds are checked by the code that consumes it,
/// through [`Coordinate::is_valid`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    rank: i8,
    file: i8,
}

impl Coordinate {
    /// The "no coordinate" sentinel, `(-1, -1)`.
    ///
    /// Used wherever a square may be absent, such as the en passant target.
    pub const NONE: Self = Self::new(-1, -1);

    /// Creates a new [`Coordinate`] from a rank and a file.
    ///
    /// # Example
    /// ```
    /// # use tadpole::Coordinate;
    /// let e4 = Coordinate::new(3, 4);
    /// assert_eq!(e4.to_string(), "e4");
    /// ```
    #[inline(always)]
    pub const fn new(rank: i8, file: i8) -> Self {
        Self { rank, file }
    }

    /// The rank (row) of this [`Coordinate`].
    #[inline(always)]
    pub const fn rank(&self) -> i8 {
        self.rank
    }

    /// The file (column) of this [`Coordinate`].
    #[inline(always)]
    pub const fn file(&self) -> i8 {
        self.file
    }

    /// Returns `true` if this [`Coordinate`] lies on the board.
    ///
    /// # Example
    /// ```
    /// # use tadpole::Coordinate;
    /// assert!(Coordinate::new(0, 7).is_valid());
    /// assert!(!Coordinate::new(8, 0).is_valid());
    /// assert!(!Coordinate::NONE.is_valid());
    /// ```
    #[inline(always)]
    pub const fn is_valid(&self) -> bool {
        self.rank >= 0 && self.file >= 0 && self.rank < BOARD_SIZE && self.file < BOARD_SIZE
    }

    /// Returns `true` if this is the [`Coordinate::NONE`] sentinel.
    #[inline(always)]
    pub const fn is_none(&self) -> bool {
        self.rank == Self::NONE.rank && self.file == Self::NONE.file
    }

    /// Creates a new [`Coordinate`] shifted by the provided rank and file offsets.
    ///
    /// The result may be off the board.
    #[inline(always)]
    pub const fn offset(&self, ranks: i8, files: i8) -> Self {
        Self::new(self.rank + ranks, self.file + files)
    }

    /// Creates a new [`Coordinate`] `n` ranks "forward" from the perspective of `color`.
    ///
    /// White moves up the board (increasing rank), Black moves down.
    #[inline(always)]
    pub const fn forward_by(&self, color: Color, n: i8) -> Self {
        self.offset(n * color.direction(), 0)
    }

    /// Creates a [`Coordinate`] from a string, according to the [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    ///
    /// The string `"-"` yields [`Coordinate::NONE`].
    ///
    /// Will return a [`anyhow::Error`] if the string is not a valid square.
    ///
    /// # Example
    /// ```
    /// # use tadpole::Coordinate;
    /// let b7 = Coordinate::from_uci("b7");
    /// assert!(b7.is_ok());
    /// assert_eq!(b7.unwrap(), Coordinate::new(6, 1));
    ///
    /// assert!(Coordinate::from_uci("z9").is_err());
    /// ```
    pub fn from_uci(square: &str) -> Result<Self> {
        if square == "-" {
            return Ok(Self::NONE);
        }

        let mut chars = square.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("Square must be exactly two characters, like \"e4\". Got {square:?}");
        };

        let file = match file {
            'a'..='h' => (file as u8 - b'a') as i8,
            'A'..='H' => (file as u8 - b'A') as i8,
            _ => bail!("Invalid file in square {square:?}: must be between [a,h]"),
        };

        let rank = rank
            .to_digit(10)
            .filter(|r| (1..=8).contains(r))
            .ok_or(anyhow!(
                "Invalid rank in square {square:?}: must be between [1,8]"
            ))? as i8
            - 1;

        Ok(Self::new(rank, file))
    }

    /// Converts this [`Coordinate`] to a string in algebraic notation, such as `"e4"`.
    ///
    /// Off-board coordinates (including the sentinel) are rendered as `"-"`.
    #[inline(always)]
    pub fn to_uci(&self) -> String {
        self.to_string()
    }
}

impl Default for Coordinate {
    /// A default [`Coordinate`] is the [`Coordinate::NONE`] sentinel.
    #[inline(always)]
    fn default() -> Self {
        Self::NONE
    }
}

impl FromStr for Coordinate {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            let file = (b'a' + self.file as u8) as char;
            write!(f, "{file}{}", self.rank + 1)
        } else {
            write!(f, "-")
        }
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({}, {})", self.rank, self.file)
    }
}
