/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Board, Coordinate, Move, MoveKind, MoveList, Piece, PieceKind};

/// Knight jumps, counter-clockwise starting from "two up, one right".
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

/// Ray directions for Rooks (and Queens).
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (0, -1), (-1, 0), (0, 1)];

/// Ray directions for Bishops (and Queens).
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

impl Piece {
    /// Generates every move this piece could geometrically make on `board`.
    ///
    /// These are *pseudo-legal*: they ignore whether the move leaves the mover in check,
    /// may target a friendly piece, and (for Knights and Kings) may even land off of the board.
    /// See [`Piece::legal_moves`] for the filtered set.
    ///
    /// If `in_check_mode` is set, castling is never generated.
    /// This is how attacked squares are computed without recursing into check detection forever.
    pub fn candidate_moves(&self, board: &Board, in_check_mode: bool) -> MoveList {
        let mut moves = MoveList::new();

        match self.kind() {
            PieceKind::Pawn => self.pawn_moves(board, &mut moves),
            PieceKind::Knight => self.jumps(&KNIGHT_OFFSETS, &mut moves),
            PieceKind::Bishop => self.rays(board, &DIAGONALS, &mut moves),
            PieceKind::Rook => self.rays(board, &ORTHOGONALS, &mut moves),
            PieceKind::Queen => {
                self.rays(board, &ORTHOGONALS, &mut moves);
                self.rays(board, &DIAGONALS, &mut moves);
            }
            PieceKind::King => {
                self.king_steps(&mut moves);
                if !in_check_mode {
                    self.castles(board, &mut moves);
                }
            }
        }

        moves
    }

    /// Generates the moves this piece may make on `board`.
    ///
    /// Candidates landing off of the board or on a friendly piece are always discarded.
    /// Unless `in_check_mode` is set, every remaining candidate is played out on a copy of `board`,
    /// and kept only if it does not leave this piece's King in check.
    pub fn legal_moves(&self, board: &Board, in_check_mode: bool) -> MoveList {
        self.candidate_moves(board, in_check_mode)
            .into_iter()
            .filter(|mv| mv.to().is_valid())
            .filter(|mv| {
                !matches!(board.piece_at(mv.to()), Some(occupant) if occupant.color() == self.color())
            })
            .filter(|mv| in_check_mode || !board.with_move_made(*mv).in_check(self.color()))
            .collect()
    }

    /// Pushes a move onto `to`, expanding it into all four promotions if `to` is on the last rank.
    fn push_pawn_move(&self, to: Coordinate, moves: &mut MoveList) {
        let from = self.coordinate();
        if to.rank() == self.color().promotion_rank() {
            moves.extend(
                PieceKind::promotions()
                    .into_iter()
                    .map(|kind| Move::new(from, to, MoveKind::promotion(kind))),
            );
        } else {
            moves.push(Move::normal(from, to));
        }
    }

    fn pawn_moves(&self, board: &Board, moves: &mut MoveList) {
        let color = self.color();
        let from = self.coordinate();

        // Pushes require empty squares
        let single = from.forward_by(color, 1);
        if single.is_valid() && board.piece_at(single).is_none() {
            self.push_pawn_move(single, moves);

            let double = from.forward_by(color, 2);
            if !self.has_moved() && double.is_valid() && board.piece_at(double).is_none() {
                moves.push(Move::new(from, double, MoveKind::PawnDoublePush));
            }
        }

        // Captures require an occupied square, or the en passant target
        let ep_target = board.ep_target();
        for file_offset in [-1, 1] {
            let to = single.offset(0, file_offset);
            if !to.is_valid() {
                continue;
            }

            if !ep_target.is_none() && to == ep_target {
                moves.push(Move::new(from, to, MoveKind::EnPassantCapture));
            } else if board.piece_at(to).is_some() {
                self.push_pawn_move(to, moves);
            }
        }
    }

    /// Fixed-offset moves, proposed whether or not they land on the board.
    fn jumps(&self, offsets: &[(i8, i8)], moves: &mut MoveList) {
        let from = self.coordinate();
        moves.extend(
            offsets
                .iter()
                .map(|&(ranks, files)| Move::normal(from, from.offset(ranks, files))),
        );
    }

    /// Sliding moves: each ray runs until it leaves the board, stopping *on* the first occupied square.
    fn rays(&self, board: &Board, directions: &[(i8, i8)], moves: &mut MoveList) {
        let from = self.coordinate();
        for &(ranks, files) in directions {
            let mut to = from.offset(ranks, files);
            while to.is_valid() {
                moves.push(Move::normal(from, to));
                if board.piece_at(to).is_some() {
                    break;
                }
                to = to.offset(ranks, files);
            }
        }
    }

    fn king_steps(&self, moves: &mut MoveList) {
        let from = self.coordinate();
        for ranks in -1..=1 {
            for files in -1..=1 {
                if ranks != 0 || files != 0 {
                    moves.push(Move::normal(from, from.offset(ranks, files)));
                }
            }
        }
    }

    /// Castling toward either corner of the King's rank.
    ///
    /// Requires an unmoved King that is not in check, an unmoved Rook in the corner,
    /// nothing standing between them, and the square the King crosses not being attacked.
    /// Whether the King's destination is attacked is left to [`Piece::legal_moves`].
    fn castles(&self, board: &Board, moves: &mut MoveList) {
        let color = self.color();
        let from = self.coordinate();
        if self.has_moved() || board.in_check(color) {
            return;
        }

        for rook_file in [0, 7] {
            let rook_square = Coordinate::new(from.rank(), rook_file);
            let has_rook = board
                .piece_at(rook_square)
                .is_some_and(|rook| rook.is_rook() && rook.color() == color && !rook.has_moved());
            if !has_rook {
                continue;
            }

            let direction = if from.file() < rook_file { 1 } else { -1 };

            let mut between = from.offset(0, direction);
            let mut blocked = false;
            while between.file() != rook_file {
                if board.piece_at(between).is_some() {
                    blocked = true;
                    break;
                }
                between = between.offset(0, direction);
            }
            if blocked {
                continue;
            }

            let crossing = from.offset(0, direction);
            if board
                .with_move_made(Move::normal(from, crossing))
                .in_check(color)
            {
                continue;
            }

            let kind = if direction > 0 {
                MoveKind::ShortCastle
            } else {
                MoveKind::LongCastle
            };
            moves.push(Move::new(from, from.offset(0, 2 * direction), kind));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    fn sq(s: &str) -> Coordinate {
        s.parse().unwrap()
    }

    fn legal_from(fen: &str, square: &str) -> MoveList {
        let board: Board = fen.parse().unwrap();
        let piece = board.piece_at(sq(square)).unwrap();
        piece.legal_moves(&board, false)
    }

    fn destinations(moves: &MoveList) -> Vec<String> {
        let mut dests = moves.iter().map(|mv| mv.to().to_string()).collect::<Vec<_>>();
        dests.sort();
        dests
    }

    #[test]
    fn test_knight_candidates_include_off_board() {
        let board: Board = "8/8/8/8/8/8/8/N3K2k w - - 0 1".parse().unwrap();
        let knight = board.piece_at(sq("a1")).unwrap();
        assert_eq!(knight.candidate_moves(&board, false).len(), 8);
        assert_eq!(destinations(&knight.legal_moves(&board, false)), ["b3", "c2"]);
    }

    #[test]
    fn test_rays_stop_on_occupied_square() {
        // Rook on d4, friendly pawn on d6, enemy pawn on f4
        let moves = legal_from("k7/8/3P4/8/3R1p2/8/8/K7 w - - 0 1", "d4");
        assert_eq!(
            destinations(&moves),
            ["a4", "b4", "c4", "d1", "d2", "d3", "d5", "e4", "f4"]
        );
    }

    #[test]
    fn test_bishop_and_queen_rays() {
        let bishop = legal_from("k7/8/8/8/8/8/8/K1B5 w - - 0 1", "c1");
        assert_eq!(destinations(&bishop), ["a3", "b2", "d2", "e3", "f4", "g5", "h6"]);

        let queen = legal_from("k7/8/8/8/8/8/8/K2Q4 w - - 0 1", "d1");
        // Seven up the file, two left (blocked by the King), four right, seven diagonally
        assert_eq!(queen.len(), 20);
    }

    #[test]
    fn test_pawn_pushes_and_promotions() {
        let fen = "3nk3/2P5/8/8/8/8/4P3/4K3 w - - 0 1";

        let e2 = legal_from(fen, "e2");
        assert_eq!(destinations(&e2), ["e3", "e4"]);
        assert!(e2.iter().any(|mv| mv.is_pawn_double_push()));

        // c7 can push to c8 or capture d8, each with four promotions
        let c7 = legal_from(fen, "c7");
        assert_eq!(c7.len(), 8);
        assert!(c7.iter().all(|mv| mv.promotion().is_some()));
    }

    #[test]
    fn test_blocked_pawn_cannot_double_push() {
        let moves = legal_from("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1", "e2");
        assert!(moves.is_empty());

        let moves = legal_from("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1", "e2");
        assert_eq!(destinations(&moves), ["e3"]);
    }

    #[test]
    fn test_en_passant_candidate() {
        let moves = legal_from("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", "e5");
        assert!(moves
            .iter()
            .any(|mv| mv.is_en_passant() && mv.to() == sq("d6")));
    }

    #[test]
    fn test_pinned_piece_has_no_moves() {
        // The knight on e2 is pinned against its King by the rook on e8
        let moves = legal_from("4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1", "e2");
        assert!(moves.is_empty());
    }

    #[test]
    fn test_castling_both_sides() {
        let moves = legal_from("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1", "e1");
        let castles = moves.iter().filter(|mv| mv.is_castle()).collect::<Vec<_>>();
        assert_eq!(castles.len(), 2);
        assert!(moves
            .iter()
            .any(|mv| mv.kind() == MoveKind::ShortCastle && mv.to() == sq("g1")));
        assert!(moves
            .iter()
            .any(|mv| mv.kind() == MoveKind::LongCastle && mv.to() == sq("c1")));
    }

    #[test]
    fn test_no_castling_through_attack() {
        // Black rook on f8 attacks f1, which the King must cross to castle short
        let moves = legal_from("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1", "e1");
        assert!(!moves.iter().any(|mv| mv.kind() == MoveKind::ShortCastle));
        assert!(moves.iter().any(|mv| mv.kind() == MoveKind::LongCastle));
    }

    #[test]
    fn test_no_castling_out_of_check_or_when_blocked() {
        let in_check = legal_from("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1", "e1");
        assert!(!in_check.iter().any(|mv| mv.is_castle()));

        // Knight on b1 blocks the long castle, even though the King never crosses b1
        let blocked = legal_from("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1", "e1");
        assert!(!blocked.iter().any(|mv| mv.kind() == MoveKind::LongCastle));
        assert!(blocked.iter().any(|mv| mv.kind() == MoveKind::ShortCastle));
    }

    #[test]
    fn test_no_castling_without_rights() {
        let moves = legal_from("4k3/8/8/8/8/8/8/R3K2R w - - 0 1", "e1");
        assert!(!moves.iter().any(|mv| mv.is_castle()));
    }

    #[test]
    fn test_enemy_corner_rook_never_allows_castling() {
        let mut board: Board = "k7/8/8/8/8/8/8/8 w - - 0 1".parse().unwrap();
        board.place(Piece::new(PieceKind::King, Color::White, sq("e1"), false));
        board.place(Piece::new(PieceKind::Rook, Color::Black, sq("h1"), false));

        // With an open path the enemy Rook gives check
        assert!(board.in_check(Color::White));
        let king = board.piece_at(sq("e1")).unwrap();
        assert!(!king.legal_moves(&board, false).iter().any(|mv| mv.is_castle()));

        // Closing the path blocks the castle as well
        board.place(Piece::new(PieceKind::Knight, Color::White, sq("f1"), false));
        assert!(!board.in_check(Color::White));
        let king = board.piece_at(sq("e1")).unwrap();
        assert!(!king.legal_moves(&board, false).iter().any(|mv| mv.is_castle()));
    }

    #[test]
    fn test_check_mode_skips_castling_and_self_check_filter() {
        let board: Board = "4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1".parse().unwrap();
        let king = board.piece_at(sq("e1")).unwrap();

        // e2 is attacked by the rook on e8, but check mode does not care
        let attacks = king.legal_moves(&board, true);
        assert!(attacks.iter().any(|mv| mv.to() == sq("e2")));
        assert!(!attacks.iter().any(|mv| mv.is_castle()));

        let legal = king.legal_moves(&board, false);
        assert!(!legal.iter().any(|mv| mv.to() == sq("e2")));
    }
}
