/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{Board, Color, Coordinate, Score, BOARD_SIZE};

/// Encapsulates the logic of scoring a chess position.
///
/// Positions are scored purely on material, from the perspective of a given [`Color`]:
/// a positive number means that color has more material than its opponent.
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    /// The board whose position to evaluate.
    board: &'a Board,
}

impl<'a> Evaluator<'a> {
    /// Construct a new [`Evaluator`] for the provided board.
    #[inline(always)]
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }

    /// Evaluate this position from the side-to-move's perspective.
    #[inline(always)]
    pub fn eval(&self) -> Score {
        self.eval_for(self.board.side_to_move())
    }

    /// Evaluate this position from `color`'s perspective.
    ///
    /// This is the sum of `color`'s piece values minus the sum of its opponent's.
    pub fn eval_for(&self, color: Color) -> Score {
        self.board.pieces().fold(Score::DRAW, |score, piece| {
            let value = piece.kind().value();
            if piece.color() == color {
                score + value
            } else {
                score - value
            }
        })
    }

    /// Sums the value of every piece of `color` on the board.
    fn material_of(&self, color: Color) -> i32 {
        self.board
            .pieces_of(color)
            .map(|piece| piece.kind().value())
            .sum()
    }
}

impl fmt::Display for Evaluator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = self.board.side_to_move();

        write!(f, "  +")?;
        for _ in 0..BOARD_SIZE {
            write!(f, "---+")?;
        }
        writeln!(f)?;

        for rank in (0..BOARD_SIZE).rev() {
            write!(f, "{} |", rank + 1)?;
            for file in 0..BOARD_SIZE {
                let cell = match self.board.piece_at(Coordinate::new(rank, file)) {
                    Some(piece) if piece.color() == color => format!("+{}", piece.kind().value()),
                    Some(piece) => format!("-{}", piece.kind().value()),
                    None => String::new(),
                };
                write!(f, "{cell:^3}|")?;
            }
            writeln!(f)?;
        }

        write!(f, "  +")?;
        for _ in 0..BOARD_SIZE {
            write!(f, "---+")?;
        }
        write!(f, "\n   ")?;
        for file in 0..BOARD_SIZE {
            write!(f, " {}  ", (b'a' + file as u8) as char)?;
        }

        let score = self.eval_for(color);
        let winning_side = if score > Score::DRAW {
            Some(color)
        } else if score < Score::DRAW {
            Some(color.opponent())
        } else {
            None
        };

        writeln!(f, "\n\nPerspective: {}", color.name())?;
        writeln!(f, "Material: {} vs {}", self.material_of(color), self.material_of(color.opponent()))?;
        write!(
            f,
            "Winning side: {}",
            winning_side.map(|c| c.name()).unwrap_or("N/A")
        )
    }
}

/// Computes the difference in material on the board.
///
/// If positive, `color` has more material.
/// If negative, `color.opponent()` has more material.
/// If zero, both sides have equal material.
#[inline(always)]
pub fn material_score(board: &Board, color: Color) -> Score {
    Evaluator::new(board).eval_for(color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PieceKind;

    #[test]
    fn test_startpos_is_even() {
        let board = Board::default();
        assert_eq!(material_score(&board, Color::White), Score::DRAW);
        assert_eq!(material_score(&board, Color::Black), Score::DRAW);
        assert_eq!(Evaluator::new(&board).eval(), Score::DRAW);
    }

    #[test]
    fn test_material_is_antisymmetric() {
        // White is up a rook and down a knight
        let board: Board = "rn2k3/8/8/8/8/8/8/R3K2R w - - 0 1".parse().unwrap();
        assert_eq!(material_score(&board, Color::White), Score(2));
        assert_eq!(material_score(&board, Color::Black), Score(-2));
    }

    #[test]
    fn test_king_has_value() {
        let board: Board = "4k3/8/8/8/8/8/8/8 w - - 0 1".parse().unwrap();
        assert_eq!(PieceKind::King.value(), 4);
        assert_eq!(material_score(&board, Color::White), Score(-4));
    }

    #[test]
    fn test_display_does_not_panic() {
        let board = Board::default();
        let text = Evaluator::new(&board).to_string();
        assert!(text.contains("Winning side: N/A"));
    }
}
