/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::{Context, Result};
use clap::{error::ErrorKind, Parser};
use tadpole::{Cli, Engine, EngineCommand};

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("{} encountered an error: {e:#}", env!("CARGO_PKG_NAME"));
        std::process::exit(1);
    }
}

/// Sets up the engine from the command-line arguments, then runs either the single supplied command or the command loop.
fn run(cli: Cli) -> Result<()> {
    let mut engine = Engine::new();

    if let Some(fen) = cli.fen {
        let board = fen
            .parse()
            .with_context(|| format!("Failed to load starting position {fen:?}"))?;
        engine.set_board(board);
    }

    if cli.command.is_empty() {
        return engine.run();
    }

    match EngineCommand::try_parse_from(&cli.command) {
        Ok(cmd) => engine.execute(cmd),

        // Edge case: `--help` and `--version` are both "error" cases according to Clap
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            println!("{e}");
            Ok(())
        }

        Err(e) => Err(e.into()),
    }
}
