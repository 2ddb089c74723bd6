/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Result};

use super::{Coordinate, BOARD_SIZE};

/// Represents the color of a player or piece.
///
/// In Western chess, White traditionally moves first, and therefore [`Color`] defaults to [`Color::White`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[repr(u8)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::White, Self::Black]
    }

    /// Returns `true` if this [`Color`] is Black.
    #[inline(always)]
    pub const fn is_black(&self) -> bool {
        matches!(self, Self::Black)
    }

    /// Returns this [`Color`]'s opposite / inverse / enemy.
    ///
    /// # Example
    /// ```
    /// # use tadpole::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// The rank delta of a single step "forward" for this [`Color`].
    ///
    /// `1` for White, `-1` for Black.
    #[inline(always)]
    pub const fn direction(&self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    /// The rank this [`Color`]'s pieces start on.
    ///
    /// # Example
    /// ```
    /// # use tadpole::Color;
    /// assert_eq!(Color::White.back_rank(), 0);
    /// assert_eq!(Color::Black.back_rank(), 7);
    /// ```
    #[inline(always)]
    pub const fn back_rank(&self) -> i8 {
        match self {
            Self::White => 0,
            Self::Black => BOARD_SIZE - 1,
        }
    }

    /// The rank this [`Color`]'s pawns start on.
    #[inline(always)]
    pub const fn pawn_rank(&self) -> i8 {
        self.back_rank() + self.direction()
    }

    /// The rank on which this [`Color`]'s pawns promote.
    #[inline(always)]
    pub const fn promotion_rank(&self) -> i8 {
        self.opponent().back_rank()
    }

    /// Creates a [`Color`] from a `char`, according to the [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    ///
    /// # Example
    /// ```
    /// # use tadpole::Color;
    /// let white = Color::from_uci('w');
    /// assert!(white.is_ok());
    /// assert_eq!(white.unwrap(), Color::White);
    ///
    /// let err = Color::from_uci('x');
    /// assert!(err.is_err());
    /// ```
    #[inline(always)]
    pub fn from_uci(color: char) -> Result<Self> {
        match color {
            'w' | 'W' => Ok(Self::White),
            'b' | 'B' => Ok(Self::Black),
            _ => bail!("Color must be either 'w' or 'b' (case-insensitive). Found {color:?}"),
        }
    }

    /// Creates a [`Color`] based on the ASCII case of the provided character, with uppercase being White and lowercase being Black.
    #[inline(always)]
    pub const fn from_case(c: char) -> Self {
        if c.is_ascii_lowercase() {
            Self::Black
        } else {
            Self::White
        }
    }

    /// Converts this [`Color`] to a char, according to the [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    #[inline(always)]
    pub const fn to_uci(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    /// Fetches a human-readable name for this [`Color`].
    ///
    /// # Example
    /// ```
    /// # use tadpole::Color;
    /// assert_eq!(Color::White.name(), "white");
    /// ```
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_uci(c),
            _ => bail!("Color must be a single character, 'w' or 'b'. Found {s:?}"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

/// Represents the kind (or "role") that a chess piece can be.
///
/// These have no [`Color`] associated with them. See [`Piece`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[repr(u8)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Number of piece variants.
    pub const COUNT: usize = 6;

    /// An array of all 6 [`PieceKind`]s.
    ///
    /// In the order: `Pawn`, `Knight`, `Bishop`, `Rook`, `Queen`, `King`.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        use PieceKind::*;
        [Pawn, Knight, Bishop, Rook, Queen, King]
    }

    /// The [`PieceKind`]s a Pawn may promote to, in the order promotions are generated.
    #[inline(always)]
    pub const fn promotions() -> [Self; 4] {
        use PieceKind::*;
        [Knight, Bishop, Rook, Queen]
    }

    /// Returns the material value of this [`PieceKind`], as used by the search heuristic.
    ///
    /// The King is not "invaluable" here: it is worth 4, like in the classic assignment tables.
    ///
    /// # Example
    /// ```
    /// # use tadpole::PieceKind;
    /// assert_eq!(PieceKind::Queen.value(), 9);
    /// assert_eq!(PieceKind::King.value(), 4);
    /// ```
    #[inline(always)]
    pub const fn value(&self) -> i32 {
        match self {
            Self::Pawn => 1,
            Self::Knight => 3,
            Self::Bishop => 3,
            Self::Rook => 5,
            Self::Queen => 9,
            Self::King => 4,
        }
    }

    /// Creates a new [`PieceKind`] from a character, according to the [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    ///
    /// Will return a [`anyhow::Error`] if `kind` is not a valid character.
    ///
    /// # Example
    /// ```
    /// # use tadpole::PieceKind;
    /// let queen = PieceKind::from_uci('Q');
    /// assert!(queen.is_ok());
    /// assert_eq!(queen.unwrap(), PieceKind::Queen);
    /// ```
    #[inline(always)]
    pub fn from_uci(kind: char) -> Result<Self> {
        match kind {
            'P' | 'p' => Ok(Self::Pawn),
            'N' | 'n' => Ok(Self::Knight),
            'B' | 'b' => Ok(Self::Bishop),
            'R' | 'r' => Ok(Self::Rook),
            'Q' | 'q' => Ok(Self::Queen),
            'K' | 'k' => Ok(Self::King),
            _ => bail!("Invalid char for PieceKind: Got {kind:?}."),
        }
    }

    /// Converts this [`PieceKind`] to a character, according to the [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    ///
    /// Will always be a lowercase letter.
    #[inline(always)]
    pub const fn to_uci(&self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }

    /// Fetches a human-readable name for this [`PieceKind`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

/// Represents a chess piece standing on the board.
///
/// A [`Piece`] knows its own location and whether it has ever moved,
/// but holds no reference to the [`crate::Board`] it stands on.
/// Any operation that needs the surrounding position receives the board explicitly.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Piece {
    kind: PieceKind,
    color: Color,
    coordinate: Coordinate,
    moved: bool,
}

impl Piece {
    /// Creates a new [`Piece`] at `coordinate`.
    #[inline(always)]
    pub const fn new(kind: PieceKind, color: Color, coordinate: Coordinate, moved: bool) -> Self {
        Self {
            kind,
            color,
            coordinate,
            moved,
        }
    }

    /// The [`PieceKind`] of this piece.
    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// The [`Color`] of this piece.
    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// The [`Coordinate`] this piece currently stands on.
    #[inline(always)]
    pub const fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Returns `true` if this piece has moved at any point in the game.
    #[inline(always)]
    pub const fn has_moved(&self) -> bool {
        self.moved
    }

    #[inline(always)]
    pub const fn is_pawn(&self) -> bool {
        matches!(self.kind, PieceKind::Pawn)
    }

    #[inline(always)]
    pub const fn is_rook(&self) -> bool {
        matches!(self.kind, PieceKind::Rook)
    }

    #[inline(always)]
    pub const fn is_king(&self) -> bool {
        matches!(self.kind, PieceKind::King)
    }

    /// Relocates this piece to `coordinate` and flags it as moved.
    #[inline(always)]
    pub(crate) fn relocate(&mut self, coordinate: Coordinate) {
        self.coordinate = coordinate;
        self.moved = true;
    }

    /// Converts this [`Piece`] to a character in FEN notation: uppercase for White, lowercase for Black.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Color, Coordinate, Piece, PieceKind};
    /// let knight = Piece::new(PieceKind::Knight, Color::White, Coordinate::new(0, 1), false);
    /// assert_eq!(knight.char(), 'N');
    /// ```
    #[inline(always)]
    pub const fn char(&self) -> char {
        let c = self.kind.to_uci();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}
