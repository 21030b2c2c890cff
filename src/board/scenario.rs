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

//! Scenario documents: a board configuration plus a piece layout.
//!
//! Only the stable parts of a piece are saved (square, type and color).
//! Ids are handed out again on load and every piece comes back as not yet
//! moved, so castling and the pawn double step become available again.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use super::config::{
    BoardConfiguration, DEFAULT_ACTION_POINTS, DEFAULT_BOARD_LENGTH, DEFAULT_SECTION_COUNT,
    MAX_BOARD_LENGTH,
};
use super::event::Event;
use super::material::{Color, Piece, PieceType};
use super::square::Square;
use super::Board;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Malformed scenario document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid scenario: {0}")]
    Invalid(String),
    #[error("Scenario \"{0}\" does not exist")]
    NotFound(String),
    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
use ScenarioError::*;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Scenario {
    #[serde(default)]
    pub board: SerializedBoard,
    #[serde(default)]
    pub data: SerializedBoardData,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct SerializedBoard {
    #[serde(default)]
    pub pieces: Vec<SerializedPiece>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SerializedPiece {
    pub position: SerializedPosition,
    #[serde(rename = "type")]
    pub piece_type: PieceType,
    pub color: Color,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SerializedPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct SerializedBoardData {
    #[serde(default = "default_section_count")]
    pub section_count: i32,
    #[serde(default = "default_board_length")]
    pub board_length: i32,
    #[serde(default = "default_action_points")]
    pub action_points: i32,
}

fn default_section_count() -> i32 {
    DEFAULT_SECTION_COUNT
}
fn default_board_length() -> i32 {
    DEFAULT_BOARD_LENGTH
}
fn default_action_points() -> i32 {
    DEFAULT_ACTION_POINTS
}

impl Default for SerializedBoardData {
    fn default() -> Self {
        BoardConfiguration::default().into()
    }
}

impl From<BoardConfiguration> for SerializedBoardData {
    fn from(value: BoardConfiguration) -> Self {
        Self {
            section_count: value.section_count(),
            board_length: value.board_length(),
            action_points: value.action_points_per_turn(),
        }
    }
}

impl From<SerializedBoardData> for BoardConfiguration {
    fn from(value: SerializedBoardData) -> Self {
        let mut config = BoardConfiguration::new(value.board_length, value.action_points);
        config.set_section_count(value.section_count);
        config
    }
}

impl From<Square> for SerializedPosition {
    fn from(value: Square) -> Self {
        Self { x: value.x, y: value.y }
    }
}

impl From<SerializedPosition> for Square {
    fn from(value: SerializedPosition) -> Self {
        Square::new(value.x, value.y)
    }
}

impl From<&Piece> for SerializedPiece {
    fn from(value: &Piece) -> Self {
        Self {
            position: value.position.into(),
            piece_type: value.piece_type,
            color: value.color,
        }
    }
}

impl SerializedPiece {
    pub fn new(piece_type: PieceType, color: Color, square: Square) -> Self {
        Self {
            position: square.into(),
            piece_type,
            color,
        }
    }

    /// A piece template ready for `PieceStore::add_piece`.
    pub fn to_piece(&self) -> Piece {
        Piece::new(self.piece_type, self.color, self.position.into())
    }
}

impl Scenario {
    /// The classic 8x8 starting array. Black occupies the top two rows and
    /// White the bottom two.
    pub fn standard() -> Self {
        use PieceType::*;
        const BACK_RANK: [PieceType; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        let mut pieces = Vec::with_capacity(32);
        for (x, piece_type) in (0..).zip(BACK_RANK) {
            pieces.push(SerializedPiece::new(piece_type, Color::Black, Square::new(x, 0)));
            pieces.push(SerializedPiece::new(Pawn, Color::Black, Square::new(x, 1)));
            pieces.push(SerializedPiece::new(Pawn, Color::White, Square::new(x, 6)));
            pieces.push(SerializedPiece::new(piece_type, Color::White, Square::new(x, 7)));
        }
        Self {
            board: SerializedBoard { pieces },
            data: SerializedBoardData::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let scenario: Self = serde_json::from_str(json).map_err(Parse)?;
        Ok(scenario)
    }

    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(self).map_err(Parse)?;
        Ok(json)
    }

    pub fn config(&self) -> BoardConfiguration {
        self.data.into()
    }

    /// Checks that the document describes a board that can exist: every
    /// dimension at least 1, a side no longer than `MAX_BOARD_LENGTH`, every
    /// piece on the board and no two pieces on one square.
    pub fn validate(&self) -> Result<()> {
        let data = &self.data;
        if data.board_length < 1 || data.action_points < 1 || data.section_count < 1 {
            return Err(Invalid(format!(
                "board_length, action_points and section_count must be at least 1 (got {}, {}, {})",
                data.board_length, data.action_points, data.section_count
            ))
            .into());
        }
        if data.board_length > MAX_BOARD_LENGTH {
            return Err(Invalid(format!(
                "board_length may be at most {} (got {})",
                MAX_BOARD_LENGTH, data.board_length
            ))
            .into());
        }
        let config = self.config();
        let mut occupied = HashSet::new();
        for piece in &self.board.pieces {
            let square: Square = piece.position.into();
            if !config.contains(square) {
                return Err(Invalid(format!("{} {} at {} is off the board", piece.color, piece.piece_type, square)).into());
            }
            if !occupied.insert(square) {
                return Err(Invalid(format!("more than one piece at {}", square)).into());
            }
        }
        Ok(())
    }
}

impl From<&Board> for Scenario {
    fn from(board: &Board) -> Self {
        Self {
            board: SerializedBoard {
                pieces: board.pieces().iter().map(SerializedPiece::from).collect(),
            },
            data: (*board.config()).into(),
        }
    }
}

impl Board {
    pub fn from_scenario(scenario: &Scenario) -> Result<Self> {
        let mut board = Board::default();
        board.load_scenario(scenario)?;
        board.drain_events();
        Ok(board)
    }

    pub fn to_scenario(&self) -> Scenario {
        self.into()
    }

    /// Replaces the configuration and every piece. An invalid scenario is
    /// rejected before anything changes.
    pub fn load_scenario(&mut self, scenario: &Scenario) -> Result<()> {
        scenario.validate()?;
        let config = scenario.config();
        self.clear();
        self.config = Arc::new(config);
        self.emit(Event::ConfigurationChanged(config));
        for piece in &scenario.board.pieces {
            self.add_piece(piece.to_piece());
        }
        debug!(pieces = self.pieces.len(), "loaded scenario");
        Ok(())
    }
}

/// Named scenario documents kept somewhere outside the engine.
pub trait ScenarioLibrary {
    fn list(&self) -> Result<Vec<String>>;
    fn read(&self, name: &str) -> Result<Scenario>;
    fn write(&self, name: &str, scenario: &Scenario) -> Result<()>;
}

/// A directory of `<name>.json` files.
#[derive(Debug, Clone)]
pub struct ScenarioDirectory {
    root: PathBuf,
}

const EXTENSION: &str = "json";

impl ScenarioDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name).with_extension(EXTENSION)
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ScenarioError + '_ {
    move |source| Io {
        path: path.to_path_buf(),
        source,
    }
}

impl ScenarioLibrary for ScenarioDirectory {
    fn list(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(io_error(&self.root))? {
            let path = entry.map_err(io_error(&self.root))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Scenario> {
        let path = self.path_of(name);
        if !path.exists() {
            return Err(NotFound(name.to_string()).into());
        }
        let json = fs::read_to_string(&path).map_err(io_error(&path))?;
        let scenario = Scenario::from_json(&json)?;
        info!(name, path = %path.display(), "read scenario");
        Ok(scenario)
    }

    fn write(&self, name: &str, scenario: &Scenario) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(io_error(&self.root))?;
        let path = self.path_of(name);
        fs::write(&path, scenario.to_json()?).map_err(io_error(&path))?;
        info!(name, path = %path.display(), "wrote scenario");
        Ok(())
    }
}
