/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Context, Result};

use super::{
    Color, Coordinate, Move, MoveKind, MoveList, Piece, PieceKind, BOARD_SIZE, DRAW_COUNTER_LIMIT,
    FEN_STARTPOS, REPETITION_THRESHOLD,
};

/// Number of half-moves compared by the repetition check in [`Board::draw`].
const REPETITION_WINDOW: usize = 8;

/// Represents the full state of a chess game.
///
/// This owns every [`Piece`] on the board, along with the move history, en passant target,
/// draw counter, and the side to move.
///
/// A [`Board`] is a plain value: cloning it produces a fully independent game,
/// which is how both the legality filter and the search explore moves.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    /// The `8x8` grid, indexed as `grid[rank][file]`.
    grid: [[Option<Piece>; BOARD_SIZE as usize]; BOARD_SIZE as usize],

    /// Every move played on this board, in order.
    history: Vec<Move>,

    /// The square a Pawn just skipped over with a double push, or [`Coordinate::NONE`].
    ep_target: Coordinate,

    /// Used to declare draws.
    ///
    /// - Incremented after each move.
    /// - Reset after a capture or a pawn moves.
    draw_counter: u32,

    /// The [`Color`] of the current player.
    side_to_move: Color,

    /// Number of moves since the beginning of the game.
    ///
    /// A fullmove is a complete turn by White and then by Black.
    fullmove: u32,
}

impl Board {
    /// Creates a new, empty [`Board`] with the following properties:
    /// * No pieces on the board
    /// * White moves first
    /// * No en passant target
    /// * Draw counter set to 0
    /// * Fullmove counter set to 1
    ///
    /// # Example
    /// ```
    /// # use tadpole::Board;
    /// let board = Board::new();
    /// assert_eq!(board.to_fen(), "8/8/8/8/8/8/8/8 w - - 0 1");
    /// ```
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            grid: Default::default(),
            history: Vec::new(),
            ep_target: Coordinate::NONE,
            draw_counter: 0,
            side_to_move: Color::White,
            fullmove: 1,
        }
    }

    /// Creates a new [`Board`] from the provided FEN string.
    ///
    /// Missing trailing fields default to `w - - 0 1`.
    /// The half-move clock becomes the draw counter.
    ///
    /// FEN has no notion of which pieces have moved, so that is derived:
    /// * A Pawn is unmoved only on its starting rank.
    /// * A Rook is unmoved only in a corner of its own back rank, with the matching castling right.
    /// * A King is unmoved if its side has any castling right.
    /// * Every other piece is unmoved.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Board, FEN_STARTPOS};
    /// let board = Board::from_fen(FEN_STARTPOS).unwrap();
    /// assert_eq!(board.to_fen(), FEN_STARTPOS);
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut board = Self::new();
        let mut split = fen.split_ascii_whitespace();

        let placements = split
            .next()
            .ok_or(anyhow!("FEN string must have piece placements."))?;

        let active_color = split.next().unwrap_or("w");
        board.side_to_move = active_color
            .parse()
            .with_context(|| format!("Invalid side to move in FEN {fen:?}"))?;

        let castling = split.next().unwrap_or("-");
        if castling != "-" {
            if let Some(c) = castling.chars().find(|c| !"KQkq".contains(*c)) {
                bail!("Invalid castling right {c:?} in FEN {fen:?}");
            }
        }

        board.place_fen_pieces(placements, castling)?;

        let en_passant_target = split.next().unwrap_or("-");
        board.ep_target = Coordinate::from_uci(en_passant_target)
            .with_context(|| format!("Invalid en passant target in FEN {fen:?}"))?;

        let halfmove = split.next().unwrap_or("0");
        board.draw_counter = halfmove.parse().or(Err(anyhow!(
            "FEN string must have valid halfmove counter. Got {halfmove:?}"
        )))?;

        let fullmove = split.next().unwrap_or("1");
        board.fullmove = fullmove.parse().or(Err(anyhow!(
            "FEN string must have valid fullmove counter. Got {fullmove:?}"
        )))?;

        Ok(board)
    }

    /// Places the pieces described by the first field of a FEN string.
    fn place_fen_pieces(&mut self, placements: &str, castling: &str) -> Result<()> {
        let ranks = placements.split('/').collect::<Vec<_>>();
        if ranks.len() != BOARD_SIZE as usize {
            bail!(
                "FEN placements must have {BOARD_SIZE} ranks. Got {} in {placements:?}",
                ranks.len()
            );
        }

        // FEN lists rank 8 first
        for (rank, row) in (0..BOARD_SIZE).rev().zip(ranks) {
            let mut file = 0;
            for c in row.chars() {
                if let Some(empty) = c.to_digit(10).filter(|n| (1..=8).contains(n)) {
                    file += empty as i8;
                    if file > BOARD_SIZE {
                        bail!("Rank {row:?} in FEN placements is longer than {BOARD_SIZE} squares");
                    }
                    continue;
                }

                if file >= BOARD_SIZE {
                    bail!("Rank {row:?} in FEN placements is longer than {BOARD_SIZE} squares");
                }

                let kind = PieceKind::from_uci(c)
                    .with_context(|| format!("Invalid piece {c:?} in FEN placements"))?;
                let color = Color::from_case(c);
                let coordinate = Coordinate::new(rank, file);
                let moved = !Self::starts_unmoved(kind, color, coordinate, castling);

                self.place(Piece::new(kind, color, coordinate, moved));
                file += 1;
            }

            if file != BOARD_SIZE {
                bail!("Rank {row:?} in FEN placements must cover exactly {BOARD_SIZE} squares");
            }
        }

        Ok(())
    }

    /// Determines whether a piece loaded from FEN should be treated as never having moved.
    fn starts_unmoved(kind: PieceKind, color: Color, at: Coordinate, castling: &str) -> bool {
        let (short, long) = match color {
            Color::White => ('K', 'Q'),
            Color::Black => ('k', 'q'),
        };

        match kind {
            PieceKind::Pawn => at.rank() == color.pawn_rank(),
            PieceKind::Rook if at.rank() == color.back_rank() => match at.file() {
                0 => castling.contains(long),
                7 => castling.contains(short),
                _ => false,
            },
            PieceKind::Rook => false,
            PieceKind::King => castling.contains(short) || castling.contains(long),
            _ => true,
        }
    }

    /// Generates a FEN string from this [`Board`].
    ///
    /// Castling rights are derived from which Kings and corner Rooks are unmoved.
    ///
    /// # Example
    /// ```
    /// # use tadpole::Board;
    /// let board = Board::default();
    /// assert_eq!(board.to_fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    /// ```
    pub fn to_fen(&self) -> String {
        format!("{self}")
    }

    /// Places `piece` on the board, at its own coordinate, replacing anything that was there.
    ///
    /// Pieces with an off-board coordinate are ignored.
    #[inline(always)]
    pub fn place(&mut self, piece: Piece) {
        let at = piece.coordinate();
        debug_assert!(at.is_valid(), "Cannot place {piece} on {at:?}");
        if at.is_valid() {
            self.grid[at.rank() as usize][at.file() as usize] = Some(piece);
        }
    }

    /// Removes and returns the piece at `coordinate`, if there is one.
    #[inline(always)]
    fn take(&mut self, coordinate: Coordinate) -> Option<Piece> {
        if coordinate.is_valid() {
            self.grid[coordinate.rank() as usize][coordinate.file() as usize].take()
        } else {
            None
        }
    }

    /// Fetches the piece at `coordinate`, if there is one.
    ///
    /// Off-board coordinates are simply empty.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Board, Coordinate, PieceKind};
    /// let board = Board::default();
    /// assert_eq!(board.piece_at(Coordinate::new(0, 4)).unwrap().kind(), PieceKind::King);
    /// assert!(board.piece_at(Coordinate::new(4, 4)).is_none());
    /// assert!(board.piece_at(Coordinate::NONE).is_none());
    /// ```
    #[inline(always)]
    pub fn piece_at(&self, coordinate: Coordinate) -> Option<&Piece> {
        if coordinate.is_valid() {
            self.grid[coordinate.rank() as usize][coordinate.file() as usize].as_ref()
        } else {
            None
        }
    }

    /// An iterator over every piece on the board, from `a1` through `h8`, file by file within each rank.
    #[inline(always)]
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.grid.iter().flatten().flatten()
    }

    /// An iterator over every piece of the provided [`Color`], in the same order as [`Board::pieces`].
    #[inline(always)]
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces().filter(move |piece| piece.color() == color)
    }

    /// Finds the King of the provided [`Color`], if it is on the board.
    #[inline(always)]
    pub fn king(&self, color: Color) -> Option<Coordinate> {
        self.pieces_of(color)
            .find(|piece| piece.is_king())
            .map(|king| king.coordinate())
    }

    /// Generates all legal moves for `color`, piece by piece.
    pub fn legal_moves(&self, color: Color) -> MoveList {
        self.pieces_of(color)
            .flat_map(|piece| piece.legal_moves(self, false))
            .collect()
    }

    /// Generates all legal moves for the piece at `coordinate`, if there is one.
    pub fn legal_moves_from(&self, coordinate: Coordinate) -> MoveList {
        self.piece_at(coordinate)
            .map(|piece| piece.legal_moves(self, false))
            .unwrap_or_default()
    }

    /// Returns `true` if any piece of `color`'s opponent attacks a King of `color`.
    pub fn in_check(&self, color: Color) -> bool {
        self.pieces_of(color.opponent()).any(|attacker| {
            attacker.legal_moves(self, true).iter().any(|mv| {
                matches!(self.piece_at(mv.to()), Some(victim) if victim.is_king() && victim.color() == color)
            })
        })
    }

    /// Returns `true` if `color` is in check and has no legal moves.
    pub fn checkmated(&self, color: Color) -> bool {
        self.in_check(color) && !self.has_legal_moves(color)
    }

    /// Returns `true` if `color` is not in check but has no legal moves.
    pub fn stalemated(&self, color: Color) -> bool {
        !self.in_check(color) && !self.has_legal_moves(color)
    }

    /// Returns `true` if any piece of `color` has at least one legal move.
    fn has_legal_moves(&self, color: Color) -> bool {
        self.pieces_of(color)
            .any(|piece| !piece.legal_moves(self, false).is_empty())
    }

    /// Returns `true` if the game is drawn.
    ///
    /// Below a draw counter of 8 this is never a draw, and at 50 it always is.
    /// In between, it is a draw if the last 4 half-moves each repeat the half-move played 4 plies earlier.
    /// Only origins and destinations are compared, not the resulting positions.
    pub fn draw(&self) -> bool {
        if self.draw_counter < REPETITION_THRESHOLD {
            return false;
        }
        if self.draw_counter >= DRAW_COUNTER_LIMIT {
            return true;
        }

        // A loaded draw counter can outrun the recorded history
        let n = self.history.len();
        if n < REPETITION_WINDOW {
            return false;
        }

        (n - REPETITION_WINDOW / 2..n).all(|i| self.history[i] == self.history[i - REPETITION_WINDOW / 2])
    }

    /// Applies the move to this board.
    ///
    /// The move is *not* checked for legality: only pass moves obtained from [`Board::legal_moves`].
    /// Applying a move from an empty square does nothing.
    pub fn make_move(&mut self, mv: Move) {
        let (from, to) = (mv.from(), mv.to());

        let Some(mut piece) = self.take(from) else {
            debug_assert!(false, "Attempted to play {mv:?} from an empty square on {self}");
            return;
        };
        let color = piece.color();

        // Anything on the destination is captured
        let captured = self.take(to);
        if captured.is_some() || piece.is_pawn() {
            self.draw_counter = 0;
        } else {
            self.draw_counter += 1;
        }

        piece.relocate(to);

        self.ep_target = if mv.is_pawn_double_push() {
            from.forward_by(color, 1)
        } else {
            Coordinate::NONE
        };

        self.history.push(mv);

        match mv.kind() {
            MoveKind::PromoteKnight
            | MoveKind::PromoteBishop
            | MoveKind::PromoteRook
            | MoveKind::PromoteQueen => {
                if let Some(promotion) = mv.promotion() {
                    piece = Piece::new(promotion, color, to, true);
                }
            }

            MoveKind::ShortCastle => {
                self.castle_rook(Coordinate::new(to.rank(), BOARD_SIZE - 1), to.offset(0, -1))
            }

            MoveKind::LongCastle => self.castle_rook(Coordinate::new(to.rank(), 0), to.offset(0, 1)),

            // The captured Pawn sits just behind the destination
            MoveKind::EnPassantCapture => {
                self.take(to.forward_by(color, -1));
            }

            MoveKind::Normal | MoveKind::PawnDoublePush => {}
        }

        self.place(piece);

        if color.is_black() {
            self.fullmove += 1;
        }
        self.side_to_move = color.opponent();
    }

    /// Moves the castling Rook from its corner to `to`.
    fn castle_rook(&mut self, corner: Coordinate, to: Coordinate) {
        if let Some(mut rook) = self.take(corner) {
            rook.relocate(to);
            self.place(rook);
        }
    }

    /// Copies `self` and returns a [`Board`] after having applied the provided [`Move`].
    #[inline(always)]
    pub fn with_move_made(&self, mv: Move) -> Self {
        let mut copied = self.clone();
        copied.make_move(mv);
        copied
    }

    /// Returns the current player as a [`Color`].
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Toggles the current player, without making a move.
    #[inline(always)]
    pub fn toggle_side_to_move(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
    }

    /// Every move made on this board, oldest first.
    #[inline(always)]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// The square skipped over by a Pawn's double push on the previous move, or [`Coordinate::NONE`].
    #[inline(always)]
    pub const fn ep_target(&self) -> Coordinate {
        self.ep_target
    }

    /// The number of half-moves since the last capture or Pawn move.
    #[inline(always)]
    pub const fn draw_counter(&self) -> u32 {
        self.draw_counter
    }

    /// The current fullmove number.
    #[inline(always)]
    pub const fn fullmove(&self) -> u32 {
        self.fullmove
    }

    /// Returns `true` if `color` could still castle towards the corner on `rook_file`, given that nothing is in the way.
    fn has_castling_right(&self, color: Color, rook_file: i8) -> bool {
        let rank = color.back_rank();
        let king_unmoved = self
            .pieces_of(color)
            .any(|piece| piece.is_king() && !piece.has_moved() && piece.coordinate().rank() == rank);
        let rook_unmoved = matches!(
            self.piece_at(Coordinate::new(rank, rook_file)),
            Some(rook) if rook.is_rook() && rook.color() == color && !rook.has_moved()
        );

        king_unmoved && rook_unmoved
    }

    /// Returns the castling rights of the current position in standard FEN notation.
    pub fn castling_rights_uci(&self) -> String {
        let mut castling = String::with_capacity(4);

        for (color, file, c) in [
            (Color::White, BOARD_SIZE - 1, 'K'),
            (Color::White, 0, 'Q'),
            (Color::Black, BOARD_SIZE - 1, 'k'),
            (Color::Black, 0, 'q'),
        ] {
            if self.has_castling_right(color, file) {
                castling.push(c);
            }
        }

        // If no side can castle, use a hyphen
        if castling.is_empty() {
            castling = String::from("-");
        }
        castling
    }

    /// Generates the placement field of a FEN string.
    fn placements_fen(&self) -> String {
        let mut placements = String::with_capacity(64);

        for rank in (0..BOARD_SIZE).rev() {
            let mut empty = 0;
            for file in 0..BOARD_SIZE {
                match self.piece_at(Coordinate::new(rank, file)) {
                    Some(piece) => {
                        if empty > 0 {
                            placements.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placements.push(piece.char());
                    }
                    None => empty += 1,
                }
            }

            if empty > 0 {
                placements.push_str(&empty.to_string());
            }
            if rank > 0 {
                placements.push('/');
            }
        }

        placements
    }
}

impl Default for Board {
    /// The standard starting position.
    #[inline(always)]
    fn default() -> Self {
        Self::from_fen(FEN_STARTPOS).unwrap_or_else(|_| Self::new())
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl fmt::Display for Board {
    /// Display this board's FEN string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.placements_fen(),
            self.side_to_move,
            self.castling_rights_uci(),
            self.ep_target,
            self.draw_counter,
            self.fullmove
        )
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..BOARD_SIZE).rev() {
            write!(f, "{}|", rank + 1)?;
            for file in 0..BOARD_SIZE {
                let piece = self.piece_at(Coordinate::new(rank, file));
                let piece_char = piece.map(|p| p.char()).unwrap_or('.');
                write!(f, " {piece_char}")?;
            }

            match rank {
                6 => write!(f, "           FEN: {self}")?,
                5 => write!(f, "          Side: {}", self.side_to_move.name())?,
                4 => write!(f, "      Castling: {}", self.castling_rights_uci())?,
                3 => write!(f, "            EP: {}", self.ep_target)?,
                2 => write!(f, "  Draw counter: {}", self.draw_counter)?,
                1 => write!(f, "     Full-move: {}", self.fullmove)?,
                0 => write!(f, "       History: {} plies", self.history.len())?,
                _ => {}
            }
            writeln!(f)?;
        }
        write!(f, " +")?;
        for _ in 0..BOARD_SIZE {
            write!(f, "--")?;
        }
        write!(f, "\n   ")?;
        for file in 0..BOARD_SIZE {
            write!(f, "{} ", (b'a' + file as u8) as char)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FEN_KIWIPETE;

    fn sq(s: &str) -> Coordinate {
        s.parse().unwrap()
    }

    /// Finds the legal move from `from` to `to` for the side to move.
    fn find(board: &Board, from: &str, to: &str) -> Move {
        let target = Move::normal(sq(from), sq(to));
        board
            .legal_moves(board.side_to_move())
            .into_iter()
            .find(|mv| *mv == target)
            .unwrap_or_else(|| panic!("{from}{to} is not legal on {board}"))
    }

    #[test]
    fn test_fen_round_trip() {
        for fen in [
            FEN_STARTPOS,
            FEN_KIWIPETE,
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2",
            "r3k2r/8/8/8/8/8/8/R3K2R b Kq - 12 40",
        ] {
            let board = Board::from_fen(fen).unwrap();
            assert_eq!(board.to_fen(), fen);
        }
    }

    #[test]
    fn test_fen_defaults_and_errors() {
        let board = Board::from_fen("8/8/8/8/8/8/8/4K2k").unwrap();
        assert_eq!(board.to_fen(), "8/8/8/8/8/8/8/4K2k w - - 0 1");

        assert!(Board::from_fen("").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(Board::from_fen("9/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(Board::from_fen("ppppppppp/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(Board::from_fen("7/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(Board::from_fen("x7/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8/8 x - - 0 1").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8/8 w X - 0 1").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8/8 w - z9 0 1").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8/8 w - - a 1").is_err());
        assert!(Board::from_fen("44/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(Board::from_fen("8888888888888888/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(Board::from_fen(&format!("{}/8/8/8/8/8/8/8 w - - 0 1", "8".repeat(33))).is_err());
    }

    #[test]
    fn test_fen_moved_flags() {
        let board = Board::from_fen("r3k2r/8/8/8/8/P7/1P6/R3K2R w Kq - 0 1").unwrap();
        let moved = |s: &str| board.piece_at(sq(s)).unwrap().has_moved();

        assert!(moved("a3"), "pawns off their home rank have moved");
        assert!(!moved("b2"));
        assert!(!moved("h1"));
        assert!(moved("a1"), "white has no long castling right");
        assert!(!moved("a8"));
        assert!(moved("h8"), "black has no short castling right");
        assert!(!moved("e1"));
        assert!(!moved("e8"));
    }

    #[test]
    fn test_out_of_range_lookups_are_empty() {
        let board = Board::default();
        assert!(board.piece_at(Coordinate::new(-1, 0)).is_none());
        assert!(board.piece_at(Coordinate::new(0, 8)).is_none());
        assert!(board.piece_at(Coordinate::new(100, -100)).is_none());
    }

    #[test]
    fn test_pieces_of() {
        let board = Board::default();
        assert_eq!(board.pieces_of(Color::White).count(), 16);
        assert_eq!(board.pieces_of(Color::Black).count(), 16);
        assert!(board.pieces_of(Color::Black).all(|p| p.color() == Color::Black));
        assert_eq!(board.king(Color::Black), Some(sq("e8")));
        assert_eq!(board.pieces().next().unwrap().coordinate(), sq("a1"));
    }

    #[test]
    fn test_start_position_moves() {
        let board = Board::default();
        assert_eq!(board.legal_moves(Color::White).len(), 20);
        assert_eq!(board.legal_moves(Color::Black).len(), 20);
        assert_eq!(board.legal_moves_from(sq("g1")).len(), 2);
        assert!(board.legal_moves_from(sq("e4")).is_empty());
        assert!(!board.in_check(Color::White));
        assert!(!board.checkmated(Color::White));
        assert!(!board.stalemated(Color::White));
        assert!(!board.draw());
    }

    #[test]
    fn test_make_move_relocates() {
        let mut board = Board::default();
        let mv = find(&board, "g1", "f3");
        board.make_move(mv);

        assert!(board.piece_at(sq("g1")).is_none());
        let knight = board.piece_at(sq("f3")).unwrap();
        assert_eq!(knight.kind(), PieceKind::Knight);
        assert_eq!(knight.color(), Color::White);
        assert!(knight.has_moved());
        assert_eq!(knight.coordinate(), sq("f3"));

        assert_eq!(board.side_to_move(), Color::Black);
        assert_eq!(board.draw_counter(), 1);
        assert_eq!(board.history(), [mv]);
        assert_eq!(board.fullmove(), 1);

        board.make_move(find(&board, "g8", "f6"));
        assert_eq!(board.draw_counter(), 2);
        assert_eq!(board.fullmove(), 2);
    }

    #[test]
    fn test_double_push_sets_and_clears_ep_target() {
        let mut board = Board::default();
        let mv = find(&board, "e2", "e4");
        assert!(mv.is_pawn_double_push());

        board.make_move(mv);
        assert_eq!(board.ep_target(), sq("e3"));
        assert_eq!(board.draw_counter(), 0);

        // A single push never sets the target, and any move clears it
        board.make_move(find(&board, "a7", "a6"));
        assert!(board.ep_target().is_none());
    }

    #[test]
    fn test_en_passant_removes_captured_pawn() {
        let mut board = Board::from_fen("4k3/3p4/8/4P3/8/8/8/4K3 b - - 3 1").unwrap();
        board.make_move(find(&board, "d7", "d5"));
        assert_eq!(board.ep_target(), sq("d6"));
        assert_eq!(board.draw_counter(), 0);

        let ep = find(&board, "e5", "d6");
        assert!(ep.is_en_passant());
        board.make_move(ep);

        assert!(board.piece_at(sq("d5")).is_none());
        assert!(board.piece_at(sq("e5")).is_none());
        assert_eq!(board.piece_at(sq("d6")).unwrap().kind(), PieceKind::Pawn);
        assert!(board.ep_target().is_none());
        assert_eq!(board.pieces_of(Color::Black).count(), 1);
    }

    #[test]
    fn test_capture_resets_draw_counter() {
        let mut board = Board::from_fen("4k3/8/8/3p4/8/8/8/3RK3 w - - 7 1").unwrap();
        board.make_move(find(&board, "d1", "d2"));
        assert_eq!(board.draw_counter(), 8);
        board.make_move(find(&board, "e8", "e7"));
        assert_eq!(board.draw_counter(), 9);
        board.make_move(find(&board, "d2", "d5"));
        assert_eq!(board.draw_counter(), 0);
    }

    #[test]
    fn test_quiet_pawn_move_resets_draw_counter() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 6 10").unwrap();
        board.make_move(find(&board, "e1", "d1"));
        assert_eq!(board.draw_counter(), 7);
        board.make_move(find(&board, "e8", "d8"));
        assert_eq!(board.draw_counter(), 8);

        board.make_move(find(&board, "e2", "e3"));
        assert_eq!(board.draw_counter(), 0);
        assert!(board.ep_target().is_none());
    }

    #[test]
    fn test_promotion_replaces_pawn() {
        let mut board = Board::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = board.legal_moves_from(sq("a7"));
        assert_eq!(moves.len(), 8);

        let underpromote = moves
            .into_iter()
            .find(|mv| mv.to() == sq("b8") && mv.promotion() == Some(PieceKind::Rook))
            .unwrap();
        board.make_move(underpromote);

        assert!(board.piece_at(sq("a7")).is_none());
        let rook = board.piece_at(sq("b8")).unwrap();
        assert_eq!(rook.kind(), PieceKind::Rook);
        assert_eq!(rook.color(), Color::White);
        assert!(rook.has_moved());
        assert_eq!(board.pieces_of(Color::Black).count(), 1);
    }

    #[test]
    fn test_castling_moves_rook() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();

        let short = board.with_move_made(find(&board, "e1", "g1"));
        assert_eq!(short.piece_at(sq("g1")).unwrap().kind(), PieceKind::King);
        assert_eq!(short.piece_at(sq("f1")).unwrap().kind(), PieceKind::Rook);
        assert!(short.piece_at(sq("f1")).unwrap().has_moved());
        assert!(short.piece_at(sq("h1")).is_none());
        assert!(short.piece_at(sq("e1")).is_none());
        assert_eq!(short.castling_rights_uci(), "kq");

        let long = board.with_move_made(find(&board, "e1", "c1"));
        assert_eq!(long.piece_at(sq("c1")).unwrap().kind(), PieceKind::King);
        assert_eq!(long.piece_at(sq("d1")).unwrap().kind(), PieceKind::Rook);
        assert!(long.piece_at(sq("a1")).is_none());

        let black = short.with_move_made(find(&short, "e8", "c8"));
        assert_eq!(black.piece_at(sq("d8")).unwrap().kind(), PieceKind::Rook);
        assert_eq!(black.castling_rights_uci(), "-");
    }

    #[test]
    fn test_checkmate_and_stalemate() {
        // Fool's mate
        let mate = Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
        assert!(mate.in_check(Color::White));
        assert!(mate.checkmated(Color::White));
        assert!(!mate.stalemated(Color::White));
        assert!(mate.legal_moves(Color::White).is_empty());

        let stalemate = Board::from_fen("k7/8/KQ6/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!stalemate.in_check(Color::Black));
        assert!(stalemate.stalemated(Color::Black));
        assert!(!stalemate.checkmated(Color::Black));

        let check = Board::from_fen("k7/8/1K6/8/8/8/8/Q7 b - - 0 1").unwrap();
        assert!(check.in_check(Color::Black));
        assert!(!check.checkmated(Color::Black));
        assert!(!check.stalemated(Color::Black));
    }

    #[test]
    fn test_draw_by_counter() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 7 1").unwrap();
        assert!(!board.draw());

        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 50 1").unwrap();
        assert!(board.draw());

        // Counter is in range, but there is no history to repeat
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 20 1").unwrap();
        assert!(!board.draw());
    }

    #[test]
    fn test_draw_by_repetition() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let shuffle = [("e1", "d1"), ("e8", "d8"), ("d1", "e1"), ("d8", "e8")];

        for (from, to) in shuffle {
            board.make_move(find(&board, from, to));
            assert!(!board.draw());
        }

        for (i, (from, to)) in shuffle.into_iter().enumerate() {
            board.make_move(find(&board, from, to));
            assert_eq!(board.draw(), i == 3, "after repeated move {i}");
        }
        assert_eq!(board.draw_counter(), 8);

        // Breaking the cycle ends the repetition
        board.make_move(find(&board, "e1", "f1"));
        assert!(!board.draw());
    }
}
