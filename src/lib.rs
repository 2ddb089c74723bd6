/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Chess rules: the board, its pieces, and move generation.
mod board;

/// Command-line argument and command parsing.
mod cli;

/// Code related to the engine's functionality, such as user input handling and self-play.
mod engine;

/// Evaluation of chess positions.
mod eval;

/// Numerical scores produced by evaluation and search.
mod score;

/// Main engine logic; all search related code.
mod search;

pub use board::*;
pub use cli::*;
pub use engine::*;
pub use eval::*;
pub use score::*;
pub use search::*;
