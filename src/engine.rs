/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt, io,
    sync::mpsc::{channel, Receiver, Sender},
    thread,
};

use anyhow::{anyhow, bail, Context, Result};
use log::{info, warn};

use crate::{
    print_perft, Board, Color, EngineCommand, Evaluator, Move, Search, SearchConfig, FEN_KIWIPETE,
    MAX_DEPTH,
};

/// How a game of self-play ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The side to move was checkmated.
    Checkmate { winner: Color },

    /// The side to move had no legal moves, but was not in check.
    Stalemate,

    /// The draw counter or the repetition rule ended the game.
    Draw,

    /// The ply limit was reached before the game ended.
    Unfinished,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkmate { winner } => write!(f, "Checkmate: {} wins", winner.name()),
            Self::Stalemate => write!(f, "Stalemate"),
            Self::Draw => write!(f, "Draw"),
            Self::Unfinished => write!(f, "Ply limit reached"),
        }
    }
}

/// The tadpole chess engine.
#[derive(Debug)]
pub struct Engine {
    /// The current state of the chess board, as known to the engine.
    ///
    /// This is modified whenever moves are played or new positions are given.
    board: Board,

    /// One half of a channel, responsible for sending commands to the engine to execute.
    sender: Sender<EngineCommand>,

    /// One half of a channel, responsible for receiving commands for the engine to execute.
    receiver: Receiver<EngineCommand>,
}

impl Engine {
    /// Constructs a new [`Engine`] instance on the standard starting position.
    pub fn new() -> Self {
        let (sender, receiver) = channel();

        Self {
            board: Board::default(),
            sender,
            receiver,
        }
    }

    /// Returns a string of the engine's name and current version.
    pub fn name(&self) -> String {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// The engine's current position.
    #[inline(always)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Replaces the engine's current position.
    #[inline(always)]
    pub fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    /// Execute the main event loop for the engine.
    ///
    /// This function spawns a thread to handle input from `stdin` and waits on received commands.
    /// Errors from individual commands are printed and the loop keeps running.
    pub fn run(&mut self) -> Result<()> {
        // Spawn a separate thread for handling user input
        let sender = self.sender.clone();
        thread::spawn(|| {
            if let Err(err) = input_handler(sender) {
                eprintln!("Input handler thread stopping after fatal error: {err}");
            }
        });

        info!("{} ready on {}", self.name(), self.board);

        // Loop on user input
        while let Ok(cmd) = self.receiver.recv() {
            if cmd == EngineCommand::Exit {
                break;
            }

            // Keep running, even on error
            if let Err(e) = self.execute(cmd) {
                eprintln!("Error: {e:#}");
            }
        }

        Ok(())
    }

    /// Executes a single [`EngineCommand`] on the current position.
    ///
    /// [`EngineCommand::Exit`] does nothing here; it is handled by [`Engine::run`].
    pub fn execute(&mut self, cmd: EngineCommand) -> Result<()> {
        match cmd {
            EngineCommand::Display => println!("{:?}", self.board),

            EngineCommand::Eval { pretty } => self.eval(pretty),

            EngineCommand::Exit => {}

            EngineCommand::Fen => println!("{}", self.board.to_fen()),

            EngineCommand::Flip => self.board.toggle_side_to_move(),

            EngineCommand::Go { depth } => {
                self.go(search_config(depth)?);
            }

            EngineCommand::MakeMove { mv_string } => {
                let mv = self.make_move(&mv_string)?;
                info!("Played {mv:?}");
            }

            EngineCommand::Moves {
                square,
                debug,
                sort,
            } => self.moves(square, debug, sort),

            EngineCommand::Perft { depth } => {
                print_perft::<false>(&self.board, depth);
            }

            EngineCommand::Play { plies, depth } => {
                let outcome = self.play(plies, search_config(depth)?);
                println!("{outcome}");
            }

            EngineCommand::Position { args } => self.position(&args)?,

            EngineCommand::Splitperft { depth } => {
                print_perft::<true>(&self.board, depth);
            }
        };

        Ok(())
    }

    /// Executes the `eval` command, printing an evaluation of the current position.
    fn eval(&self, pretty: bool) {
        let evaluator = Evaluator::new(&self.board);
        if pretty {
            print!("{evaluator}\n\nScore: ");
        }

        println!("{}", evaluator.eval());
    }

    /// Executes the `moves` command, printing legal moves for the side to move, or for the piece on `square`.
    fn moves(&self, square: Option<crate::Coordinate>, debug: bool, sort: bool) {
        let mut moves = if let Some(square) = square {
            self.board.legal_moves_from(square)
        } else {
            self.board.legal_moves(self.board.side_to_move())
        };

        if sort {
            moves.sort_by_key(|mv| mv.to_string());
        }

        // If there are none, print "(none)"
        let moves_string = if moves.is_empty() {
            String::from("(none)")
        } else {
            // Otherwise, join them by comma-space
            moves
                .into_iter()
                .map(|mv| {
                    if debug {
                        format!("{mv:?}")
                    } else {
                        mv.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!("{moves_string}");
    }

    /// Executes the `go` command, searching for the side to move and printing the best move.
    fn go(&self, config: SearchConfig) -> Option<Move> {
        let res = Search::new(&self.board, self.board.side_to_move(), config).start();

        println!(
            "info depth {} score {} nodes {}",
            res.depth, res.score, res.nodes
        );
        match res.bestmove {
            Some(mv) => println!("bestmove {mv}"),
            None => println!("bestmove (none)"),
        }

        res.bestmove
    }

    /// Applies the move described by `mv_str`, if it is legal for the side to move.
    fn make_move(&mut self, mv_str: &str) -> Result<Move> {
        let mv = legal_move(&self.board, mv_str)?;
        self.board.make_move(mv);
        Ok(mv)
    }

    /// Set the position from `args`, which holds a position (`startpos`, `kiwipete`, or a FEN string)
    /// optionally followed by `moves` and a list of moves to apply one-by-one.
    ///
    /// The current position is left untouched if anything fails to parse.
    fn position(&mut self, args: &[String]) -> Result<()> {
        let mut split = args.split(|arg| arg == "moves");
        let setup = split.next().unwrap_or_default();

        let mut board: Board = match setup {
            [] => bail!("Position requires `startpos`, `kiwipete`, or a FEN string"),
            [name] if name == "startpos" => Board::default(),
            [name] if name == "kiwipete" => FEN_KIWIPETE.parse()?,
            [keyword, fields @ ..] if keyword == "fen" => fields.join(" ").parse()?,
            fields => fields.join(" ").parse()?,
        };

        // Apply the provided moves
        for mv_str in split.flatten() {
            let mv = legal_move(&board, mv_str)
                .with_context(|| format!("Failed to apply moves to {board}"))?;
            board.make_move(mv);
        }

        self.board = board;
        Ok(())
    }

    /// Lets the engine play both sides from the current position, printing each move as it is made.
    ///
    /// Stops when the game ends or after `plies` half-moves, whichever comes first.
    pub fn play(&mut self, plies: Option<usize>, config: SearchConfig) -> Outcome {
        let mut played = 0;

        let outcome = loop {
            let color = self.board.side_to_move();

            if self.board.checkmated(color) {
                break Outcome::Checkmate {
                    winner: color.opponent(),
                };
            }
            if self.board.stalemated(color) {
                break Outcome::Stalemate;
            }
            if self.board.draw() {
                break Outcome::Draw;
            }
            if plies.is_some_and(|limit| played >= limit) {
                break Outcome::Unfinished;
            }

            let Some(mv) = Search::new(&self.board, color, config).start().bestmove else {
                // Only reachable if the config searches no depths at all
                warn!("Search for {} found no move on {}", color.name(), self.board);
                break Outcome::Unfinished;
            };

            self.board.make_move(mv);
            played += 1;
            println!("{:>3}. {:<5} {mv}", self.board.history().len(), color.name());
        };

        info!("Self-play ended after {played} plies: {outcome}");
        outcome
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the [`SearchConfig`] for a `go` or `play` command.
///
/// Depths are an exclusive bound, so anything below `2` would search nothing.
fn search_config(depth: Option<usize>) -> Result<SearchConfig> {
    let max_depth = depth.unwrap_or(MAX_DEPTH);
    if max_depth < 2 {
        bail!("Search depth must be at least 2. Got {max_depth}");
    }
    Ok(SearchConfig { max_depth })
}

/// Parses `mv_str` on `board` and finds the matching legal move for the side to move.
fn legal_move(board: &Board, mv_str: &str) -> Result<Move> {
    let mv = Move::from_uci(board, mv_str)?;
    let color = board.side_to_move();

    board
        .legal_moves(color)
        .into_iter()
        .find(|legal| *legal == mv && legal.promotion() == mv.promotion())
        .ok_or(anyhow!(
            "{mv_str:?} is not a legal move for {} on {board}",
            color.name()
        ))
}

/// Loops endlessly to await input via `stdin`, sending all successfully-parsed commands through the supplied `sender`.
fn input_handler(sender: Sender<EngineCommand>) -> Result<()> {
    let mut buffer = String::with_capacity(2048);

    loop {
        // Clear the buffer, read input, and trim the trailing newline
        buffer.clear();
        let bytes = io::stdin()
            .read_line(&mut buffer)
            .context("Failed to read line when parsing commands")?;

        // For ctrl + d
        if 0 == bytes {
            sender
                .send(EngineCommand::Exit)
                .context("Failed to send 'exit' command after receiving empty input")?;

            return Ok(());
        }

        // Trim any leading/trailing whitespace
        let buf = buffer.trim();

        // Ignore empty lines
        if buf.is_empty() {
            continue;
        }

        match buf.parse::<EngineCommand>() {
            Ok(cmd) => sender
                .send(cmd)
                .context("Failed to send command to engine")?,

            // If an invalid command was received, just print the error and continue running
            Err(err) => eprintln!("{err}"),
        }
    }
}
