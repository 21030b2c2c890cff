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

//! Board editing. None of these operations consult the rules.

use tracing::{debug, warn};

use super::event::Event;
use super::material::{Color, Piece, PieceId, PieceType};
use super::square::Square;
use super::Board;

impl Board {
    /// Puts a new piece on an empty square of the board.
    pub fn place_piece(&mut self, piece_type: PieceType, color: Color, square: Square) -> Option<Piece> {
        if !self.is_empty_square(square) {
            warn!(%square, "can only place a piece on an empty square");
            return None;
        }
        self.add_piece(Piece::new(piece_type, color, square))
    }

    /// Takes a piece off the board without it counting as a capture.
    pub fn remove_piece(&mut self, id: PieceId) -> Option<Piece> {
        self.delete_piece(id)
    }

    /// Deletes every piece.
    pub fn clear(&mut self) {
        self.pieces.clear(&mut self.events);
    }

    /// Replaces the pieces of the other color with a reflection of the
    /// pieces of `source` across the horizontal midline. A reflection that
    /// lands on an occupied square is skipped.
    ///
    /// Returns the number of pieces placed.
    pub fn mirror(&mut self, source: Color) -> usize {
        let target = !source;
        let doomed: Vec<PieceId> = self.pieces.of_color(target).map(|piece| piece.id).collect();
        for id in doomed {
            self.delete_piece(id);
        }

        let length = self.config.board_length();
        let originals: Vec<Piece> = self.pieces.of_color(source).copied().collect();
        let mut placed = 0;
        for piece in originals {
            let square = piece.position.mirrored(length);
            if self.piece_at(square).is_some() {
                warn!(%square, "mirror would overwrite a piece, skipping");
                continue;
            }
            if self.add_piece(Piece::new(piece.piece_type, target, square)).is_some() {
                placed += 1;
            }
        }
        debug!(%source, placed, "mirrored board");
        placed
    }

    /// Resizes the board. Pieces that end up outside it are deleted.
    pub fn set_board_length(&mut self, board_length: i32) {
        self.config_mut().set_board_length(board_length);
        let config = *self.config;
        let outside: Vec<PieceId> = self
            .pieces
            .iter()
            .filter(|piece| !config.contains(piece.position))
            .map(|piece| piece.id)
            .collect();
        for id in outside {
            self.delete_piece(id);
        }
        self.emit(Event::ConfigurationChanged(config));
    }

    pub fn set_action_points(&mut self, action_points_per_turn: i32) {
        self.config_mut().set_action_points_per_turn(action_points_per_turn);
        self.emit(Event::ConfigurationChanged(*self.config));
    }

    pub fn set_section_count(&mut self, section_count: i32) {
        self.config_mut().set_section_count(section_count);
        self.emit(Event::ConfigurationChanged(*self.config));
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn test_place_only_on_empty_squares() {
        let mut board = Board::default();
        let king = board
            .place_piece(PieceType::King, Color::White, Square::new(4, 7))
            .unwrap();
        assert_eq!(board.get_piece(king.id), Some(&king));
        assert!(board
            .place_piece(PieceType::Queen, Color::Black, Square::new(4, 7))
            .is_none());
        assert!(board
            .place_piece(PieceType::Queen, Color::Black, Square::new(8, 7))
            .is_none());
        assert_eq!(board.pieces().len(), 1);
    }
    #[test]
    fn test_remove_is_not_a_capture() {
        let mut board = Board::default();
        let rook = board
            .place_piece(PieceType::Rook, Color::Black, Square::new(0, 0))
            .unwrap();
        board.drain_events();
        board.remove_piece(rook.id);
        assert_eq!(board.drain_events(), vec![Event::PieceDeleted(rook)]);
    }
    #[test]
    fn test_mirror_replaces_other_color() {
        let mut board = Board::default();
        board.place_piece(PieceType::King, Color::White, Square::new(4, 7));
        board.place_piece(PieceType::Pawn, Color::White, Square::new(3, 6));
        board.place_piece(PieceType::Queen, Color::Black, Square::new(0, 0));
        assert_eq!(board.mirror(Color::White), 2);

        let king = board.piece_at(Square::new(4, 0)).unwrap();
        assert_eq!((king.piece_type, king.color), (PieceType::King, Color::Black));
        let pawn = board.piece_at(Square::new(3, 1)).unwrap();
        assert_eq!((pawn.piece_type, pawn.color), (PieceType::Pawn, Color::Black));
        assert!(board.piece_at(Square::new(0, 0)).is_none());
        assert_eq!(board.pieces().len(), 4);
    }
    #[test]
    fn test_mirror_skips_occupied_destination() {
        let mut board = Board::new(BoardConfiguration::new(5, 1));
        // the middle row reflects onto itself
        board.place_piece(PieceType::Rook, Color::Black, Square::new(2, 2));
        assert_eq!(board.mirror(Color::Black), 0);
        assert_eq!(board.pieces().len(), 1);
    }
    #[test]
    fn test_resize_drops_pieces_outside_and_notifies() {
        let mut board = Board::default();
        let inside = board
            .place_piece(PieceType::King, Color::White, Square::new(1, 1))
            .unwrap();
        let outside = board
            .place_piece(PieceType::King, Color::Black, Square::new(6, 6))
            .unwrap();
        board.drain_events();
        board.set_board_length(4);
        assert_eq!(board.config().board_length(), 4);
        assert!(board.get_piece(inside.id).is_some());
        assert_eq!(
            board.drain_events(),
            vec![
                Event::PieceDeleted(outside),
                Event::ConfigurationChanged(BoardConfiguration::new(4, 1)),
            ]
        );
    }
    #[test]
    fn test_action_points_change_notifies() {
        let mut board = Board::default();
        board.set_action_points(3);
        board.set_action_points(0);
        let events = board.drain_events();
        assert_eq!(events.len(), 2);
        assert_eq!(board.config().action_points_per_turn(), 1);
    }
    #[test]
    fn test_section_count_change_notifies() {
        let mut board = Board::default();
        board.set_section_count(4);
        assert_eq!(board.config().section_count(), 4);
        board.set_section_count(-1);
        assert_eq!(board.config().section_count(), 1);

        let mut four = BoardConfiguration::default();
        four.set_section_count(4);
        assert_eq!(
            board.drain_events(),
            vec![
                Event::ConfigurationChanged(four),
                Event::ConfigurationChanged(BoardConfiguration::default()),
            ]
        );
    }
    #[test]
    fn test_resizing_a_clone_leaves_original_alone() {
        let board = Board::default();
        let mut copy = board.clone();
        copy.set_board_length(12);
        assert_eq!(board.config().board_length(), 8);
        assert_eq!(copy.config().board_length(), 12);
    }
}
