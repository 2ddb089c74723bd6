/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use anyhow::{anyhow, bail, Result};

use super::{Board, Coordinate, PieceKind};

/// A list of moves, as produced by move generation.
pub type MoveList = Vec<Move>;

/// Represents the different kinds of moves that can be made during a chess game.
///
/// Captures are not a separate kind: a [`MoveKind::Normal`] move may land on an enemy piece.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Default)]
pub enum MoveKind {
    /// A piece moving from one square to another, possibly capturing whatever stood there.
    #[default]
    Normal,

    /// Involves the King and a Rook sliding past each other on the King's side of the board.
    ShortCastle,

    /// Involves the King and a Rook sliding past each other on the Queen's side of the board.
    LongCastle,

    /// A Pawn capturing an enemy Pawn that just advanced two squares past it.
    EnPassantCapture,

    /// A special case on a Pawn's first move, wherein it can advance two squares forward.
    PawnDoublePush,

    /// Involves a Pawn reaching the opponent's side of the board and becoming a [`PieceKind::Knight`].
    PromoteKnight,

    /// Involves a Pawn reaching the opponent's side of the board and becoming a [`PieceKind::Bishop`].
    PromoteBishop,

    /// Involves a Pawn reaching the opponent's side of the board and becoming a [`PieceKind::Rook`].
    PromoteRook,

    /// Involves a Pawn reaching the opponent's side of the board and becoming a [`PieceKind::Queen`].
    PromoteQueen,
}

impl MoveKind {
    /// Creates a new [`MoveKind`] that is a promotion to the provided [`PieceKind`].
    ///
    /// # Panics
    /// This function will panic if `promotion` is not a Knight, Bishop, Rook, or Queen.
    #[inline(always)]
    pub fn promotion(promotion: PieceKind) -> Self {
        match promotion {
            PieceKind::Knight => Self::PromoteKnight,
            PieceKind::Bishop => Self::PromoteBishop,
            PieceKind::Rook => Self::PromoteRook,
            PieceKind::Queen => Self::PromoteQueen,
            _ => unreachable!("cannot promote to a {}", promotion.name()),
        }
    }
}

impl fmt::Display for MoveKind {
    /// Displays a human-readable description for this [`MoveKind`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Normal => "Normal",
            Self::PawnDoublePush => "Pawn Double Push",
            Self::EnPassantCapture => "En Passant Capture",
            Self::ShortCastle => "Short Castle",
            Self::LongCastle => "Long Castle",
            Self::PromoteQueen => "Promotion (Queen)",
            Self::PromoteKnight => "Promotion (Knight)",
            Self::PromoteRook => "Promotion (Rook)",
            Self::PromoteBishop => "Promotion (Bishop)",
        };

        write!(f, "{s}")
    }
}

/// Represents a move made on a chess board: an origin, a destination, and a [`MoveKind`].
///
/// Two moves are equal if they share an origin and a destination.
/// The [`MoveKind`] is *not* part of a move's identity, so looking up `e7e8` will match any of its promotions.
#[derive(Clone, Copy, Default)]
pub struct Move {
    from: Coordinate,
    to: Coordinate,
    kind: MoveKind,
}

impl Move {
    /// Creates a new [`Move`] from the given [`Coordinate`]s and a [`MoveKind`].
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Coordinate, Move, MoveKind};
    /// let e2e4 = Move::new(Coordinate::new(1, 4), Coordinate::new(3, 4), MoveKind::PawnDoublePush);
    /// assert_eq!(e2e4.to_string(), "e2e4");
    /// ```
    #[inline(always)]
    pub const fn new(from: Coordinate, to: Coordinate, kind: MoveKind) -> Self {
        Self { from, to, kind }
    }

    /// Creates a [`MoveKind::Normal`] move.
    #[inline(always)]
    pub const fn normal(from: Coordinate, to: Coordinate) -> Self {
        Self::new(from, to, MoveKind::Normal)
    }

    /// Fetches the source (or "from") part of this [`Move`].
    #[inline(always)]
    pub const fn from(&self) -> Coordinate {
        self.from
    }

    /// Fetches the destination (or "to") part of this [`Move`].
    #[inline(always)]
    pub const fn to(&self) -> Coordinate {
        self.to
    }

    /// Fetches the [`MoveKind`] part of this [`Move`].
    #[inline(always)]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    /// Returns `true` if this [`Move`] is en passant.
    #[inline(always)]
    pub const fn is_en_passant(&self) -> bool {
        matches!(self.kind, MoveKind::EnPassantCapture)
    }

    /// Returns `true` if this [`Move`] is a castle on either side.
    #[inline(always)]
    pub const fn is_castle(&self) -> bool {
        matches!(self.kind, MoveKind::ShortCastle | MoveKind::LongCastle)
    }

    /// Returns `true` if this [`Move`] is a pawn advancing two squares.
    #[inline(always)]
    pub const fn is_pawn_double_push(&self) -> bool {
        matches!(self.kind, MoveKind::PawnDoublePush)
    }

    /// If this [`Move`] is a promotion, returns the [`PieceKind`] being promoted to.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Coordinate, Move, MoveKind, PieceKind};
    /// let b7b8n = Move::new(Coordinate::new(6, 1), Coordinate::new(7, 1), MoveKind::PromoteKnight);
    /// assert_eq!(b7b8n.promotion(), Some(PieceKind::Knight));
    /// ```
    #[inline(always)]
    pub const fn promotion(&self) -> Option<PieceKind> {
        match self.kind {
            MoveKind::PromoteKnight => Some(PieceKind::Knight),
            MoveKind::PromoteBishop => Some(PieceKind::Bishop),
            MoveKind::PromoteRook => Some(PieceKind::Rook),
            MoveKind::PromoteQueen => Some(PieceKind::Queen),
            _ => None,
        }
    }

    /// Creates a [`Move`] from a string, according to the [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation, extracting extra info from the provided [`Board`].
    ///
    /// The [`MoveKind`] is inferred from the piece being moved:
    /// a Pawn moving two ranks is a double push, a Pawn moving onto the en passant target is en passant,
    /// a King moving two files is a castle, and a trailing `n`/`b`/`r`/`q` is a promotion.
    ///
    /// Will return a [`anyhow::Error`] if the string is invalid in any way.
    /// This does *not* check that the move is legal.
    ///
    /// # Example
    /// ```
    /// # use tadpole::*;
    /// let board = Board::default();
    /// let e2e4 = Move::from_uci(&board, "e2e4").unwrap();
    /// assert_eq!(e2e4.kind(), MoveKind::PawnDoublePush);
    /// ```
    pub fn from_uci(board: &Board, uci: &str) -> Result<Self> {
        let from = uci.get(0..2).ok_or(anyhow!(
            "Move str must contain a `from` square. Got {uci:?}"
        ))?;
        let to = uci
            .get(2..4)
            .ok_or(anyhow!("Move str must contain a `to` square. Got {uci:?}"))?;

        let from = Coordinate::from_uci(from)?;
        let to = Coordinate::from_uci(to)?;
        if !from.is_valid() || !to.is_valid() {
            bail!("Move str must contain two real squares. Got {uci:?}");
        }

        let piece = board.piece_at(from).ok_or(anyhow!(
            "No piece found at {from} when parsing {uci:?} on position {board}"
        ))?;

        // If there is a promotion char, attempt to convert it to a PieceKind
        let promotion = match uci.get(4..) {
            None | Some("") => None,
            Some(promote) => {
                let mut chars = promote.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(PieceKind::from_uci(c)?),
                    _ => bail!("Invalid promotion suffix {promote:?} in {uci:?}"),
                }
            }
        };

        let kind = match (piece.kind(), promotion) {
            (PieceKind::Pawn, Some(promotion)) => match promotion {
                PieceKind::Pawn | PieceKind::King => {
                    bail!("Cannot promote to a {} in {uci:?}", promotion.name())
                }
                _ => MoveKind::promotion(promotion),
            },
            (_, Some(_)) => bail!("Only pawns may promote. Got {uci:?}"),
            (PieceKind::Pawn, None) if from.rank().abs_diff(to.rank()) == 2 => {
                MoveKind::PawnDoublePush
            }
            (PieceKind::Pawn, None) if to == board.ep_target() => MoveKind::EnPassantCapture,
            (PieceKind::King, None) if to.file() - from.file() == 2 => MoveKind::ShortCastle,
            (PieceKind::King, None) if from.file() - to.file() == 2 => MoveKind::LongCastle,
            _ => MoveKind::Normal,
        };

        Ok(Self::new(from, to, kind))
    }

    /// Converts this [`Move`] to a string, according to the [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Coordinate, Move, MoveKind};
    /// let e7e8q = Move::new(Coordinate::new(6, 4), Coordinate::new(7, 4), MoveKind::PromoteQueen);
    /// assert_eq!(e7e8q.to_uci(), "e7e8q");
    /// ```
    #[inline(always)]
    pub fn to_uci(&self) -> String {
        if let Some(promote) = self.promotion() {
            format!("{}{}{}", self.from, self.to, promote)
        } else {
            format!("{}{}", self.from, self.to)
        }
    }
}

impl PartialEq for Move {
    /// Moves compare by origin and destination only.
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
    }
}

impl fmt::Display for Move {
    /// A [`Move`] is displayed in its UCI format.
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for Move {
    /// Debug formatting displays the UCI string and the [`MoveKind`] in a human-readable format.
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({})", self.kind)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn sq(s: &str) -> Coordinate {
        s.parse().unwrap()
    }

    /// Helper function to assert that the `uci` move is parsed as `expected` on the position created from `fen`.
    fn test_move_parse(fen: &str, uci: &str, expected: MoveKind) {
        let board = fen.parse::<Board>().unwrap();

        let mv = Move::from_uci(&board, uci);
        assert!(mv.is_ok(), "{}", mv.unwrap_err());
        let mv = mv.unwrap();
        assert_eq!(mv.to_uci(), uci.to_ascii_lowercase());
        assert_eq!(mv.kind(), expected, "{mv:?} is incorrect for {fen}");
    }

    #[test]
    fn test_move_equality_ignores_kind() {
        let a = Move::new(sq("e7"), sq("e8"), MoveKind::PromoteQueen);
        let b = Move::new(sq("e7"), sq("e8"), MoveKind::PromoteKnight);
        let c = Move::normal(sq("e7"), sq("d8"));
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Move> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_move_promotion() {
        let (from, to) = (sq("a7"), sq("a8"));
        assert_eq!(Move::normal(from, to).promotion(), None);
        for kind in PieceKind::promotions() {
            let mv = Move::new(from, to, MoveKind::promotion(kind));
            assert_eq!(mv.promotion(), Some(kind));
        }
    }

    #[test]
    fn test_move_parsing() {
        let pawn_fen = "2n1k3/1P6/8/5pP1/5n2/2P1P3/P7/4K3 w - f6 0 1";

        test_move_parse(pawn_fen, "a2a3", MoveKind::Normal);
        test_move_parse(pawn_fen, "a2a4", MoveKind::PawnDoublePush);
        test_move_parse(pawn_fen, "e3f4", MoveKind::Normal);
        test_move_parse(pawn_fen, "g5f6", MoveKind::EnPassantCapture);
        test_move_parse(pawn_fen, "b7b8q", MoveKind::PromoteQueen);
        test_move_parse(pawn_fen, "b7b8N", MoveKind::PromoteKnight);
        test_move_parse(pawn_fen, "b7c8r", MoveKind::PromoteRook);

        let king_fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        test_move_parse(king_fen, "e1g1", MoveKind::ShortCastle);
        test_move_parse(king_fen, "e1c1", MoveKind::LongCastle);
        test_move_parse(king_fen, "e8g8", MoveKind::ShortCastle);
        test_move_parse(king_fen, "e1f1", MoveKind::Normal);
    }

    #[test]
    fn test_move_parsing_errors() {
        let board = Board::default();
        assert!(Move::from_uci(&board, "").is_err());
        assert!(Move::from_uci(&board, "e2").is_err());
        assert!(Move::from_uci(&board, "e2e9").is_err());
        assert!(Move::from_uci(&board, "e4e5").is_err(), "e4 is empty");
        assert!(Move::from_uci(&board, "e2e4k").is_err());
        assert!(Move::from_uci(&board, "g1f3q").is_err());
        assert!(Move::from_uci(&board, "e2e4qq").is_err());
    }
}
