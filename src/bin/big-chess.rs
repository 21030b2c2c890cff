// Copyright 2023 Tobin Edwards
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

use anyhow::{bail, Result};
use big_chess::{
    Board, BoardConfiguration, Color, MoveGenerator, Scenario, ScenarioDirectory, ScenarioLibrary,
    Square,
};
use clap::{Parser, Subcommand};
use std::io::stderr;
use std::path::PathBuf;
use tracing::Level;

/// Inspect and edit big-chess scenarios.
#[derive(Parser)]
#[command(author, version, about, name = "big-chess")]
struct Cli {
    /// Verbosity level.
    #[arg(short, long, default_value = "info")]
    verbosity: Level,

    /// Directory holding the `<name>.json` scenario files.
    #[arg(short, long, default_value = "Scenarios")]
    scenarios: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the saved scenarios.
    List,
    /// Print a scenario's configuration and board.
    Show { name: String },
    /// Print the permitted moves of the piece on a square.
    Moves { name: String, x: i32, y: i32 },
    /// Replace the other color with a reflection of `color`.
    Mirror {
        name: String,
        color: Color,
        /// Save under this name instead of overwriting.
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Save a new scenario.
    New {
        name: String,
        /// Ignored with `--standard`.
        #[arg(short, long, default_value_t = 8)]
        length: i32,
        #[arg(short, long, default_value_t = 1)]
        action_points: i32,
        /// Start from the classic layout instead of an empty board.
        #[arg(long)]
        standard: bool,
    },
}

fn show(board: &Board) {
    let config = board.config();
    println!(
        "length {} | action points {} | sections {}",
        config.board_length(),
        config.action_points_per_turn(),
        config.section_count()
    );
    print!("{}", board);
    for color in [Color::White, Color::Black] {
        println!("{}: {:?}", color, board.status(color));
    }
}

impl Cli {
    fn run(self) -> Result<()> {
        tracing_subscriber::fmt()
            .with_max_level(self.verbosity)
            .with_writer(stderr)
            .try_init()
            .map_err(anyhow::Error::msg)?;

        let library = ScenarioDirectory::new(self.scenarios);
        match self.command {
            Command::List => {
                for name in library.list()? {
                    println!("{}", name);
                }
            }
            Command::Show { name } => {
                show(&Board::from_scenario(&library.read(&name)?)?);
            }
            Command::Moves { name, x, y } => {
                let board = Board::from_scenario(&library.read(&name)?)?;
                let square = Square::new(x, y);
                let Some(piece) = board.piece_at(square) else {
                    bail!("no piece at {}", square);
                };
                for mv in board.permitted_moves(piece) {
                    println!("{}", mv);
                }
            }
            Command::Mirror {
                name,
                color,
                output,
            } => {
                let mut board = Board::from_scenario(&library.read(&name)?)?;
                let placed = board.mirror(color);
                let target = output.unwrap_or(name);
                library.write(&target, &board.to_scenario())?;
                println!("placed {} pieces, saved as {}", placed, target);
            }
            Command::New {
                name,
                length,
                action_points,
                standard,
            } => {
                let mut scenario = if standard {
                    Scenario::standard()
                } else {
                    Scenario {
                        data: BoardConfiguration::new(length, 1).into(),
                        ..Scenario::default()
                    }
                };
                scenario.data.action_points = action_points;
                scenario.validate()?;
                library.write(&name, &scenario)?;
                show(&Board::from_scenario(&scenario)?);
            }
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    Cli::parse().run()
}
