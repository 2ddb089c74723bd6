/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Instant;

use log::{debug, info};

use crate::{material_score, Board, Color, Move, Score};

/// Exclusive upper bound on the depths searched by default.
///
/// With a value of `3`, iterative deepening runs depths `1` and `2`.
pub const MAX_DEPTH: usize = 3;

/// The result of a search, containing the best move found, score, and total nodes searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchResult {
    /// Number of nodes searched.
    pub nodes: u64,

    /// Best move found during the search.
    ///
    /// This is `None` only if the searching side had no legal moves.
    pub bestmove: Option<Move>,

    /// Evaluation of the position after `bestmove` is made.
    pub score: Score,

    /// The depth that produced `bestmove`.
    pub depth: usize,
}

impl Default for SearchResult {
    /// A default search result should initialize to a *very bad* value,
    /// since there isn't a move to play.
    #[inline(always)]
    fn default() -> Self {
        Self {
            nodes: 0,
            bestmove: None,
            score: Score::NONE,
            depth: 0,
        }
    }
}

/// Configuration variables for executing a [`Search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Exclusive upper bound on the depths run by iterative deepening.
    ///
    /// Depths `1..max_depth` are searched, so a value of `1` or less searches nothing.
    pub max_depth: usize,
}

impl Default for SearchConfig {
    #[inline(always)]
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
        }
    }
}

/// Executes a depth-limited [minimax](https://www.chessprogramming.org/Minimax) search for one side.
///
/// Every branch is explored on its own clone of the board, and there is no pruning,
/// so the result depends only on the position, the searching color, and the config.
pub struct Search<'a> {
    /// The board to search on.
    ///
    /// This board will be copied when moves are applied to it.
    board: &'a Board,

    /// The side choosing a move.
    color: Color,

    /// The result of the search, updated as-needed during search.
    result: SearchResult,

    /// Configuration variables for this instance of the search.
    config: SearchConfig,
}

impl<'a> Search<'a> {
    /// Construct a new [`Search`] instance to choose a move for `color` on the provided [`Board`].
    #[inline(always)]
    pub fn new(board: &'a Board, color: Color, config: SearchConfig) -> Self {
        Self {
            board,
            color,
            result: SearchResult::default(),
            config,
        }
    }

    /// Start the search, returning its results.
    ///
    /// This is the entrypoint of the search, and logs a summary before and after calling [`Self::iterative_deepening`].
    pub fn start(mut self) -> SearchResult {
        info!(
            "Starting search for {} on {:?} with max depth {}",
            self.color.name(),
            self.board.to_fen(),
            self.config.max_depth
        );
        let starttime = Instant::now();

        let res = self.iterative_deepening();

        info!(
            "Search concluded after {} nodes in {:?}: bestmove {} score {:?}",
            res.nodes,
            starttime.elapsed(),
            res.bestmove.map(|mv| mv.to_string()).unwrap_or_else(|| String::from("(none)")),
            res.score
        );

        res
    }

    /// Performs [iterative deepening](https://www.chessprogramming.org/Iterative_Deepening) (ID) on the Search's position.
    ///
    /// Each depth is searched from scratch. A deeper result only replaces the current one
    /// if its score is strictly greater, so a tie keeps the shallower move.
    fn iterative_deepening(&mut self) -> SearchResult {
        let mut res = self.result;
        let board = self.board;

        for depth in 1..self.config.max_depth {
            let (bestmove, score) = self.max_choice(board, depth);

            debug!(
                "depth {depth} nodes {} bestmove {} score {score:?}",
                self.result.nodes,
                bestmove.map(|mv| mv.to_string()).unwrap_or_else(|| String::from("(none)")),
            );

            if score > res.score {
                res.bestmove = bestmove;
                res.score = score;
                res.depth = depth;
            }
        }

        res.nodes = self.result.nodes;
        self.result = res;
        res
    }

    /// Picks the move for the searching side whose reply tree scores highest at `depth`.
    ///
    /// Ties keep the first move generated.
    fn max_choice(&mut self, board: &Board, depth: usize) -> (Option<Move>, Score) {
        let mut best = (None, Score::NONE);

        for mv in board.legal_moves(self.color) {
            let new_board = board.with_move_made(mv);
            let score = self.min_value(&new_board, depth - 1);
            debug!("  depth {depth} move {mv} score {score:?}");

            if score > best.1 {
                best = (Some(mv), score);
            }
        }

        best
    }

    /// Scores a position in which the opponent of the searching side replies.
    ///
    /// Drawing or stalemating the opponent is the worst outcome, and checking it is the best.
    fn min_value(&mut self, board: &Board, depth: usize) -> Score {
        self.result.nodes += 1;
        let opponent = self.color.opponent();

        if board.draw() || board.stalemated(opponent) {
            return Score::MIN;
        }
        if board.in_check(opponent) {
            return Score::MAX;
        }
        if depth == 0 {
            return material_score(board, self.color);
        }

        board
            .legal_moves(opponent)
            .into_iter()
            .fold(Score::MAX, |score, mv| {
                score.min(self.max_value(&board.with_move_made(mv), depth - 1))
            })
    }

    /// Scores a position in which the searching side moves.
    ///
    /// Reaching a draw or stalemate here is the best outcome, and being in check is the worst.
    fn max_value(&mut self, board: &Board, depth: usize) -> Score {
        self.result.nodes += 1;

        if board.draw() || board.stalemated(self.color) {
            return Score::MAX;
        }
        if board.in_check(self.color) {
            return Score::MIN;
        }
        if depth == 0 {
            return material_score(board, self.color);
        }

        board
            .legal_moves(self.color)
            .into_iter()
            .fold(Score::MIN, |score, mv| {
                score.max(self.min_value(&board.with_move_made(mv), depth - 1))
            })
    }
}

/// Chooses a move for `color` on `board` using the default [`SearchConfig`].
///
/// Returns `None` if `color` has no legal moves.
///
/// # Example
/// ```
/// # use tadpole::{find_move, Board, Color};
/// let board = Board::default();
/// let mv = find_move(&board, Color::White).unwrap();
/// assert!(board.legal_moves(Color::White).contains(&mv));
/// ```
pub fn find_move(board: &Board, color: Color) -> Option<Move> {
    Search::new(board, color, SearchConfig::default())
        .start()
        .bestmove
}
