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

//! Chess board of any size, with any set of pieces
//!
//! A _board_ holds a configuration and the pieces standing on it and
//! answers rules questions about them. The following features are
//! supported:
//!
//! [x] Square boards from 1x1 upwards
//! [x] Standard piece movement, including castling with any unmoved rook
//!     in a straight line from an unmoved king
//! [x] Pawn promotion on the far edge
//! [x] Check, checkmate and stalemate detection
//! [x] Free-form editing (placing, deleting, mirroring, resizing)
//! [x] Saving and loading scenarios as JSON
//! [ ] En passant
//! [ ] Draw rules (fifty moves, repetition, insufficient material)
//!
//! Some of the key abstractions include:
//!
//! * A `Square` is an `(x, y)` grid coordinate with `(0, 0)` in the
//!   top-left corner. Squares may lie off the board; `Offset` is the
//!   difference between two squares and `Direction` names the eight
//!   single steps.
//!
//! * A `Piece` is a value: id, square, type, color and whether it has
//!   moved. Moving or promoting a piece replaces the value in the store.
//!   Promotion also replaces the id.
//!
//! * `PieceStore` owns the live pieces. Every mutation is reported to an
//!   `Observer` as an `Event`. A `Board` records its events until they are
//!   drained with `drain_events`.
//!
//! * A `Move` carries a snapshot of the piece before it moves and its
//!   destination. Castling chains the rook's move onto the king's.
//!
//! * `MoveGenerator` computes pseudo-legal moves and filters them down to
//!   permitted moves by playing each one on a cloned board and checking
//!   whether the mover's king is left in check. Clones share the
//!   configuration and copy only the pieces.
//!

use std::fmt;
use std::sync::Arc;

mod castling;
mod config;
mod editor;
mod event;
mod material;
mod moves;
mod scenario;
mod square;
mod store;

pub use castling::*;
pub use config::*;
pub use event::*;
pub use material::*;
pub use moves::*;
pub use scenario::*;
pub use square::*;
pub use store::*;

use PieceType::King;

pub trait Turn {
    fn turn(&self) -> Color;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardStatus {
    /// The color has at least one permitted move and is not in check.
    Playable,
    /// In check, with at least one way out.
    Check,
    CheckMate,
    StaleMate,
}

#[derive(Debug)]
pub struct Board {
    config: Arc<BoardConfiguration>,
    pieces: PieceStore,
    events: Vec<Event>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardConfiguration::default())
    }
}

/// Copies the pieces and shares the configuration. The copy starts with
/// no recorded events.
impl Clone for Board {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            pieces: self.pieces.clone(),
            events: Vec::new(),
        }
    }
}

impl AsRef<Self> for Board {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl Castling for Board {}

impl MoveGenerator for Board {}

impl Board {
    pub fn new(config: BoardConfiguration) -> Self {
        Self {
            config: Arc::new(config),
            pieces: PieceStore::new(),
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &BoardConfiguration {
        &self.config
    }
    #[inline]
    pub fn pieces(&self) -> &PieceStore {
        &self.pieces
    }
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.pieces.piece_at(square)
    }
    #[inline]
    pub fn get_piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id)
    }
    #[inline]
    pub fn contains(&self, square: Square) -> bool {
        self.config.contains(square)
    }
    /// On the board and unoccupied.
    #[inline]
    pub fn is_empty_square(&self, square: Square) -> bool {
        self.contains(square) && self.piece_at(square).is_none()
    }
    #[inline]
    pub fn is_enemy_at(&self, square: Square, color: Color) -> bool {
        self.piece_at(square).is_some_and(|piece| piece.color != color)
    }
    #[inline]
    pub fn is_empty_or_enemy(&self, square: Square, color: Color) -> bool {
        self.is_empty_square(square) || self.is_enemy_at(square, color)
    }

    /// Whether any enemy piece could move onto the king of `color`.
    ///
    /// A color with no king, or with more than one, is never in check.
    /// The editor can produce such boards and play must carry on.
    pub fn is_in_check(&self, color: Color) -> bool {
        if self.pieces.count(King, color) != 1 {
            return false;
        }
        let Some(king) = self
            .pieces
            .of_color(color)
            .find(|piece| piece.piece_type == King)
        else {
            return false;
        };
        self.pieces.of_color(!color).any(|piece| {
            self.standard_moves(piece)
                .iter()
                .any(|mv| mv.final_position == king.position)
        })
    }

    pub fn has_any_valid_move(&self, color: Color) -> bool {
        self.pieces
            .of_color(color)
            .any(|piece| !self.permitted_moves(piece).is_empty())
    }

    pub fn status(&self, color: Color) -> BoardStatus {
        use BoardStatus::*;
        match (self.is_in_check(color), self.has_any_valid_move(color)) {
            (false, true) => Playable,
            (true, true) => Check,
            (true, false) => CheckMate,
            (false, false) => StaleMate,
        }
    }

    /// Every permitted move for every piece of `color`.
    pub fn all_permitted_moves(&self, color: Color) -> Vec<Move> {
        self.pieces
            .of_color(color)
            .flat_map(|piece| self.permitted_moves(piece))
            .collect()
    }

    pub fn add_piece(&mut self, template: Piece) -> Option<Piece> {
        self.pieces.add_piece(template, &mut self.events)
    }
    pub fn execute_move(&mut self, mv: &Move) -> bool {
        self.pieces.execute_move(mv, &mut self.events)
    }
    pub fn capture_piece(&mut self, id: PieceId) -> Option<Piece> {
        self.pieces.capture_piece(id, &mut self.events)
    }
    pub fn delete_piece(&mut self, id: PieceId) -> Option<Piece> {
        self.pieces.delete_piece(id, &mut self.events)
    }
    pub fn promote(&mut self, id: PieceId, piece_type: PieceType) -> Option<Piece> {
        self.pieces.promote(id, piece_type, &mut self.events)
    }

    /// Events recorded since the last drain, oldest first.
    #[inline]
    pub fn events(&self) -> &[Event] {
        &self.events
    }
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
    pub(crate) fn emit(&mut self, event: Event) {
        self.events.notify(event);
    }

    fn config_mut(&mut self) -> &mut BoardConfiguration {
        Arc::make_mut(&mut self.config)
    }
}

/// Renders the board one row per line, `.` for an empty square and the
/// piece symbol otherwise (upper case White, lower case Black).
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let length = self.config.board_length();
        for y in 0..length {
            for x in 0..length {
                let c = match self.piece_at(Square::new(x, y)) {
                    Some(piece) => piece.symbol(),
                    None => '.',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
