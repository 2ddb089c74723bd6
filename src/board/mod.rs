/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Locations on the board.
mod coordinate;

/// Per-piece move geometry and legality filtering.
mod movegen;

/// Moves and move kinds.
mod moves;

/// Performance testing of move generation.
mod perft;

/// Colors, kinds of pieces, and the pieces themselves.
mod piece;

/// The board: piece placement, game state, and move application.
mod position;

/// Misc constants.
mod utils;

pub use coordinate::*;
pub use moves::*;
pub use perft::*;
pub use piece::*;
pub use position::*;
pub use utils::*;
