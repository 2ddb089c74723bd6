/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use clap::Parser;

use crate::Coordinate;

/// Command-line arguments for the engine binary.
#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// FEN string of the position to start from.
    ///
    /// Defaults to the standard starting position.
    #[arg(short, long)]
    pub fen: Option<String>,

    /// A single engine command to execute before exiting, such as `go --depth 3` or `perft 4`.
    ///
    /// If omitted, commands are read from `stdin`, one per line.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// A command to be sent to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<ENGINE COMMAND>")
)]
pub enum EngineCommand {
    /// Print a visual representation of the current board state.
    #[command(alias = "d")]
    Display,

    /// Print an evaluation of the current position.
    Eval {
        /// If set, the material of every piece will be printed alongside the score.
        #[arg(short, long, default_value = "false")]
        pretty: bool,
    },

    /// Quit the engine.
    #[command(alias = "quit")]
    Exit,

    /// Generate and print a FEN string for the current position.
    Fen,

    /// Flips the side-to-move without making a move.
    Flip,

    /// Search the current position and print the best move for the side to move.
    Go {
        /// Exclusive depth limit for iterative deepening.
        #[arg(short, long, required = false)]
        depth: Option<usize>,
    },

    /// Apply the provided move to the board, if it is legal for the side to move.
    #[command(alias = "move")]
    MakeMove { mv_string: String },

    /// Shows all legal moves in the current position, or for a specific piece.
    Moves {
        square: Option<Coordinate>,

        /// If set, moves will be printed using their debug formatter, which displays what kind of move it is (castle, en passant, etc.).
        #[arg(short, long, default_value = "false")]
        debug: bool,

        /// If set, moves will be sorted in alphabetical order.
        ///
        /// By default, moves are printed in generation order.
        #[arg(short, long, default_value = "false")]
        sort: bool,
    },

    /// Performs a perft on the current position at the supplied depth, printing total node count.
    Perft { depth: usize },

    /// Let the engine play against itself from the current position until the game ends.
    Play {
        /// Stop after this many half-moves, even if the game has not ended.
        #[arg(short, long, required = false)]
        plies: Option<usize>,

        /// Exclusive depth limit for iterative deepening on every move.
        #[arg(short, long, required = false)]
        depth: Option<usize>,
    },

    /// Set the position, then optionally apply moves to it.
    ///
    /// Accepts `startpos`, `kiwipete`, or a FEN string (optionally prefixed with `fen`),
    /// followed by `moves <move>...`.
    Position {
        #[arg(
            required = true,
            trailing_var_arg = true,
            allow_hyphen_values = true
        )]
        args: Vec<String>,
    },

    /// Performs a split perft on the current position at the supplied depth.
    #[command(alias = "sperft")]
    Splitperft { depth: usize },
}

impl FromStr for EngineCommand {
    type Err = clap::Error;
    /// Attempt to parse an [`EngineCommand`] from a string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse_from(s.split_ascii_whitespace())
    }
}
