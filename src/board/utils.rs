/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// FEN string for the starting position of chess.
pub const FEN_STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A popular FEN string for debugging move generation.
pub const FEN_KIWIPETE: &str =
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

/// Width and height of the board.
pub const BOARD_SIZE: i8 = 8;

/// Draw counter value below which [`crate::Board::draw`] never reports a draw.
pub const REPETITION_THRESHOLD: u32 = 8;

/// Draw counter value at which [`crate::Board::draw`] always reports a draw.
pub const DRAW_COUNTER_LIMIT: u32 = 50;
