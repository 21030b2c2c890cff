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

use anyhow::Result;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;
use thiserror::Error;

use super::castling::Castling;
use super::event::Silent;
use super::material::{Color, Piece, PieceId, PieceType};
use super::square::{Direction, Offset, Square};
use super::Board;

use PieceType::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MoveError {
    #[error("No piece with id {0}")]
    UnknownPiece(PieceId),
    #[error("Not a permitted move to {0}")]
    NotPermitted(Square),
    #[error("It is not {0}'s turn")]
    NotYourTurn(Color),
}
use MoveError::*;

/// Relocation of one piece, optionally followed by another. Only castling
/// chains a second move (the rook's).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub piece_before: Piece,
    pub final_position: Square,
    pub next: Option<Box<Move>>,
}

impl Move {
    pub fn normal(piece_before: Piece, final_position: Square) -> Self {
        Self {
            piece_before,
            final_position,
            next: None,
        }
    }

    pub fn castle(king: Piece, king_position: Square, rook_move: Move) -> Self {
        Self {
            piece_before: king,
            final_position: king_position,
            next: Some(Box::new(rook_move)),
        }
    }

    #[inline]
    pub fn piece_after(&self) -> Piece {
        self.piece_before.with_position(self.final_position)
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        self.next.is_some()
    }

    /// This move followed by every chained move.
    pub fn legs(&self) -> impl Iterator<Item = &Move> {
        std::iter::successors(Some(self), |mv| mv.next.as_deref())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}->{}",
            self.piece_before.color,
            self.piece_before.piece_type,
            self.piece_before.position,
            self.final_position
        )?;
        if let Some(next) = &self.next {
            write!(f, " with {}", next)?;
        }
        Ok(())
    }
}

/// Move generation over a board.
///
/// * `standard_moves` follow piece geometry and occupancy only.
/// * `normal_moves` add castling. These are the pseudo-legal moves.
/// * `permitted_moves` keep the pseudo-legal moves that do not leave the
///   mover's own king in check, found by playing each one on a copy of
///   the board.
pub trait MoveGenerator: AsRef<Board> + Castling {
    fn validate_move(&self, id: PieceId, destination: Square) -> Result<Move> {
        let board: &Board = self.as_ref();
        let piece = board.get_piece(id).ok_or(UnknownPiece(id))?;
        self.permitted_moves(piece)
            .into_iter()
            .find(|mv| mv.final_position == destination)
            .ok_or_else(|| NotPermitted(destination).into())
    }

    fn permitted_moves(&self, piece: &Piece) -> Vec<Move> {
        let board: &Board = self.as_ref();
        self.normal_moves(piece)
            .into_iter()
            .filter(|mv| {
                let mut next = board.clone();
                next.pieces.execute_move(mv, &mut Silent);
                !next.is_in_check(piece.color)
            })
            .collect()
    }

    fn normal_moves(&self, piece: &Piece) -> Vec<Move> {
        let mut result = self.standard_moves(piece);
        if piece.piece_type == King && !piece.has_moved {
            let board: &Board = self.as_ref();
            if !board.is_in_check(piece.color) {
                result.extend(self.castle_moves(piece));
            }
        }
        result
    }

    fn standard_moves(&self, piece: &Piece) -> Vec<Move> {
        match piece.piece_type {
            King => self.step_moves(piece, KING_OFFSETS.iter()),
            Queen => self.line_moves(piece, Direction::iter()),
            Rook => self.line_moves(piece, Direction::CARDINALS.into_iter()),
            Bishop => self.line_moves(piece, Direction::DIAGONALS.into_iter()),
            Knight => self.step_moves(piece, KNIGHT_OFFSETS.iter()),
            Pawn => self.pawn_moves(piece),
        }
    }

    fn step_moves<'a>(&self, piece: &Piece, offsets: impl Iterator<Item = &'a Offset>) -> Vec<Move> {
        let board: &Board = self.as_ref();
        offsets
            .map(|offset| piece.position + offset)
            .filter(|dest| board.is_empty_or_enemy(*dest, piece.color))
            .map(|dest| Move::normal(*piece, dest))
            .collect()
    }

    fn line_moves(&self, piece: &Piece, directions: impl Iterator<Item = Direction>) -> Vec<Move> {
        let board: &Board = self.as_ref();
        let mut result = Vec::new();
        for direction in directions {
            let step = direction.offset();
            let mut dest = piece.position + step;
            while board.is_empty_square(dest) {
                result.push(Move::normal(*piece, dest));
                dest += step;
            }
            // the ray ends on a capture only if the blocker is an enemy
            if board.is_enemy_at(dest, piece.color) {
                result.push(Move::normal(*piece, dest));
            }
        }
        result
    }

    fn pawn_moves(&self, piece: &Piece) -> Vec<Move> {
        let board: &Board = self.as_ref();
        let forward = piece.color.forward();
        let mut result = Vec::new();
        let one_step = piece.position + forward;
        if board.is_empty_square(one_step) {
            result.push(Move::normal(*piece, one_step));
            let two_steps = one_step + forward;
            if !piece.has_moved && board.is_empty_square(two_steps) {
                result.push(Move::normal(*piece, two_steps));
            }
        }
        for side in [Direction::Left, Direction::Right] {
            let dest = one_step + side;
            if board.is_enemy_at(dest, piece.color) {
                result.push(Move::normal(*piece, dest));
            }
        }
        result
    }
}

static KING_OFFSETS: Lazy<Vec<Offset>> = Lazy::new(|| Direction::iter().map(Offset::from).collect());

const KNIGHT_OFFSETS: [Offset; 8] = [
    Offset::new(1, 2),
    Offset::new(1, -2),
    Offset::new(2, 1),
    Offset::new(2, -1),
    Offset::new(-2, 1),
    Offset::new(-2, -1),
    Offset::new(-1, -2),
    Offset::new(-1, 2),
];
