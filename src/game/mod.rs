// Copyright 2026 Tobin Edwards
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

//! Turns, action points and the end of the game.
//!
//! A turn is worth `action_points_per_turn` actions. Every executed move
//! costs one, except that a pawn reaching the far edge leaves its action
//! open until the promotion is chosen. When the points run out the turn
//! passes, unless the other side cannot move, in which case the game is
//! over.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tracing::{debug, info, instrument, warn};

use crate::board::{
    Board, Castling, Color, Event, Move, MoveError, MoveGenerator, Piece, PieceId, PieceType,
    Promotion, Scenario, Square, Turn,
};

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Victory,
    Stalemate,
}

/// `color` is the winner of a victory, or the side left without a move in
/// a stalemate.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameOver {
    pub color: Color,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    AwaitingMove { color: Color, points_remaining: i32 },
    AwaitingPromotion(PieceId),
    GameOver(GameOver),
}

#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    current_turn: Color,
    pending_action_points: i32,
    pending_promotion: Option<PieceId>,
    game_over: Option<GameOver>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Board::default())
    }
}

impl AsRef<Board> for GameState {
    fn as_ref(&self) -> &Board {
        &self.board
    }
}
impl Castling for GameState {}
impl MoveGenerator for GameState {}

impl Turn for GameState {
    fn turn(&self) -> Color {
        self.current_turn
    }
}

impl GameState {
    /// White to move with a full set of action points.
    pub fn new(board: Board) -> Self {
        let pending_action_points = board.config().action_points_per_turn();
        Self {
            board,
            current_turn: Color::White,
            pending_action_points,
            pending_promotion: None,
            game_over: None,
        }
    }

    pub fn standard() -> Result<Self> {
        Ok(Self::new(Board::from_scenario(&Scenario::standard())?))
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }
    /// Direct access for editing. Nothing here is checked against the turn
    /// or the rules.
    #[inline]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
    #[inline]
    pub fn pending_action_points(&self) -> i32 {
        self.pending_action_points
    }
    #[inline]
    pub fn pending_promotion(&self) -> Option<PieceId> {
        self.pending_promotion
    }
    #[inline]
    pub fn game_over(&self) -> Option<GameOver> {
        self.game_over
    }

    pub fn phase(&self) -> Phase {
        if let Some(game_over) = self.game_over {
            return Phase::GameOver(game_over);
        }
        match self.pending_promotion {
            Some(id) => Phase::AwaitingPromotion(id),
            None => Phase::AwaitingMove {
                color: self.current_turn,
                points_remaining: self.pending_action_points,
            },
        }
    }

    /// Events from the board and from the turn sequence, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.board.drain_events()
    }

    /// Looks up the permitted move of the piece `id` to `destination`,
    /// provided the piece belongs to the side on move.
    pub fn legal_move(&self, id: PieceId, destination: Square) -> Result<Move> {
        let piece = self.board.get_piece(id).ok_or(MoveError::UnknownPiece(id))?;
        if piece.color != self.current_turn {
            return Err(MoveError::NotYourTurn(piece.color).into());
        }
        self.validate_move(id, destination)
    }

    /// Plays a move already known to be permitted.
    ///
    /// Ignored with a warning while a promotion is pending, when no action
    /// points are left, or once the game is over. Returns whether the move
    /// was played.
    #[instrument(level = "debug", skip(self))]
    pub fn request_move_piece(&mut self, mv: &Move) -> bool {
        if let Some(game_over) = self.game_over {
            warn!(?game_over, "the game is over");
            return false;
        }
        if let Some(id) = self.pending_promotion {
            warn!(%id, "a promotion is pending");
            return false;
        }
        if self.pending_action_points <= 0 {
            warn!(color = %self.current_turn, "no action points left");
            return false;
        }
        if !self.board.execute_move(mv) {
            return false;
        }
        debug!(%mv, "played");

        let Some(moved) = self.board.get_piece(mv.piece_before.id).copied() else {
            self.complete_action();
            return true;
        };
        if self.reached_far_edge(&moved) {
            self.pending_promotion = Some(moved.id);
            self.board.emit(Event::PromotionRequested(moved));
        } else {
            self.complete_action();
        }
        true
    }

    /// Replaces the pawn waiting for promotion and completes its action.
    #[instrument(level = "debug", skip(self))]
    pub fn finish_promote_piece(&mut self, id: PieceId, promotion: Promotion) -> Option<Piece> {
        if self.pending_promotion != Some(id) {
            warn!(%id, pending = ?self.pending_promotion, "no promotion pending for this piece");
            return None;
        }
        let promoted = self.board.promote(id, promotion.into())?;
        self.pending_promotion = None;
        debug!(%promoted, "promoted");
        self.complete_action();
        Some(promoted)
    }

    /// Passes the turn without any rules checks. Meant for editing
    /// sessions. Refused while a promotion is pending.
    pub fn force_next_turn(&mut self) -> bool {
        if let Some(id) = self.pending_promotion {
            warn!(%id, "finish the pending promotion before passing the turn");
            return false;
        }
        self.change_turn(!self.current_turn);
        true
    }

    /// Places a piece of the color on move.
    pub fn place_piece(&mut self, piece_type: PieceType, square: Square) -> Option<Piece> {
        self.board.place_piece(piece_type, self.current_turn, square)
    }

    /// Drags a piece to any square on the board, capturing whatever stands
    /// there. No rules apply and no action point is spent.
    pub fn editor_move(&mut self, id: PieceId, destination: Square) -> bool {
        let Some(piece) = self.board.get_piece(id).copied() else {
            warn!(%id, "cannot move a missing piece");
            return false;
        };
        if !self.board.contains(destination) || piece.position == destination {
            warn!(%piece, %destination, "not a valid editor destination");
            return false;
        }
        self.board.execute_move(&Move::normal(piece, destination))
    }

    /// Replaces the board and starts over with White to move.
    pub fn load_scenario(&mut self, scenario: &Scenario) -> Result<()> {
        self.board.load_scenario(scenario)?;
        self.current_turn = Color::White;
        self.pending_action_points = self.board.config().action_points_per_turn();
        self.pending_promotion = None;
        self.game_over = None;
        info!(pieces = self.board.pieces().len(), "new game from scenario");
        Ok(())
    }

    fn reached_far_edge(&self, piece: &Piece) -> bool {
        piece.piece_type == PieceType::Pawn
            && !self.board.contains(piece.position + piece.color.forward())
    }

    fn complete_action(&mut self) {
        self.board.emit(Event::ActionCompleted(self.current_turn));
        self.pending_action_points -= 1;
        if self.pending_action_points <= 0 || !self.board.has_any_valid_move(self.current_turn) {
            self.end_turn();
        }
    }

    #[instrument(level = "debug", skip(self))]
    fn end_turn(&mut self) {
        let mover = self.current_turn;
        let opponent = !mover;
        if self.board.has_any_valid_move(opponent) {
            self.change_turn(opponent);
            return;
        }
        let game_over = if self.board.is_in_check(opponent) {
            GameOver {
                color: mover,
                outcome: Outcome::Victory,
            }
        } else {
            GameOver {
                color: opponent,
                outcome: Outcome::Stalemate,
            }
        };
        info!(color = %game_over.color, outcome = %game_over.outcome, "game over");
        self.game_over = Some(game_over);
        self.board.emit(Event::GameEnded(game_over));
    }

    fn change_turn(&mut self, color: Color) {
        self.current_turn = color;
        self.pending_action_points = self.board.config().action_points_per_turn();
        debug!(%color, points = self.pending_action_points, "turn changed");
        self.board.emit(Event::TurnChanged(color));
    }
}
