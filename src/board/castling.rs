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

use super::material::{Piece, PieceType};
use super::moves::Move;
use super::square::{Direction, Offset, Square};
use super::Board;

/// Castling on boards of any size and layout.
///
/// An unmoved king may castle with the first piece it sees along any of
/// the four cardinal directions, provided that piece is an unmoved rook
/// of the same color. The king lands two squares towards the rook and
/// the rook lands on the square the king passed over. Whether the king is
/// in check is for the caller to decide before asking.
pub trait Castling: AsRef<Board> {
    fn castle_moves(&self, king: &Piece) -> Vec<Move> {
        let mut result = Vec::new();
        if king.piece_type != PieceType::King || king.has_moved {
            return result;
        }
        let board: &Board = self.as_ref();
        for direction in Direction::CARDINALS {
            let Some(rook) = self.scan(king.position, direction.offset()) else {
                continue;
            };
            if rook.color != king.color || rook.piece_type != PieceType::Rook || rook.has_moved {
                continue;
            }
            let Some(step) = (rook.position - king.position).to_unit() else {
                continue;
            };
            let rook_dest = king.position + step;
            let king_dest = king.position + step * 2;
            if board.is_empty_or_enemy(king_dest, king.color) {
                result.push(Move::castle(*king, king_dest, Move::normal(rook, rook_dest)));
            }
        }
        result
    }

    /// The first piece found stepping away from `from`, if any lies
    /// within the board.
    fn scan(&self, from: Square, step: Offset) -> Option<Piece> {
        let board: &Board = self.as_ref();
        let mut square = from + step;
        while board.is_empty_square(square) {
            square += step;
        }
        board.piece_at(square).copied()
    }
}
