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

use serde::{Deserialize, Serialize};

use super::square::Square;

pub const DEFAULT_BOARD_LENGTH: i32 = 8;
pub const DEFAULT_ACTION_POINTS: i32 = 1;
pub const DEFAULT_SECTION_COUNT: i32 = 1;
/// Largest supported side length. Square arithmetic stays far from
/// `i32` overflow below it.
pub const MAX_BOARD_LENGTH: i32 = 1024;

/// Per-game parameters. Every value is at least 1 and the side length is
/// at most `MAX_BOARD_LENGTH`; setters clamp.
///
/// A board is always square, `board_length` squares on a side.
/// `section_count` only groups squares visually and has no bearing on
/// the rules.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardConfiguration {
    board_length: i32,
    action_points_per_turn: i32,
    section_count: i32,
}

impl Default for BoardConfiguration {
    fn default() -> Self {
        Self {
            board_length: DEFAULT_BOARD_LENGTH,
            action_points_per_turn: DEFAULT_ACTION_POINTS,
            section_count: DEFAULT_SECTION_COUNT,
        }
    }
}

impl BoardConfiguration {
    pub fn new(board_length: i32, action_points_per_turn: i32) -> Self {
        Self {
            board_length: board_length.clamp(1, MAX_BOARD_LENGTH),
            action_points_per_turn: action_points_per_turn.max(1),
            section_count: DEFAULT_SECTION_COUNT,
        }
    }

    #[inline]
    pub fn board_length(&self) -> i32 {
        self.board_length
    }
    #[inline]
    pub fn action_points_per_turn(&self) -> i32 {
        self.action_points_per_turn
    }
    #[inline]
    pub fn section_count(&self) -> i32 {
        self.section_count
    }

    pub(crate) fn set_board_length(&mut self, value: i32) {
        self.board_length = value.clamp(1, MAX_BOARD_LENGTH);
    }
    pub(crate) fn set_action_points_per_turn(&mut self, value: i32) {
        self.action_points_per_turn = value.max(1);
    }
    pub(crate) fn set_section_count(&mut self, value: i32) {
        self.section_count = value.max(1);
    }

    #[inline]
    pub fn contains(&self, square: Square) -> bool {
        square.x >= 0 && square.y >= 0 && square.x < self.board_length && square.y < self.board_length
    }

    /// Every square of the board, row by row from the top-left corner.
    pub fn squares(&self) -> impl Iterator<Item = Square> {
        let length = self.board_length;
        (0..length).flat_map(move |y| (0..length).map(move |x| Square::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn test_default_is_classic_board() {
        let config = BoardConfiguration::default();
        assert_eq!(config.board_length(), 8);
        assert_eq!(config.action_points_per_turn(), 1);
        assert_eq!(config.section_count(), 1);
    }
    #[test]
    fn test_values_are_clamped_to_one() {
        let mut config = BoardConfiguration::new(0, -3);
        assert_eq!(config.board_length(), 1);
        assert_eq!(config.action_points_per_turn(), 1);
        config.set_section_count(0);
        assert_eq!(config.section_count(), 1);
    }
    #[test]
    fn test_length_is_capped() {
        let mut config = BoardConfiguration::new(i32::MAX, 1);
        assert_eq!(config.board_length(), MAX_BOARD_LENGTH);
        config.set_board_length(MAX_BOARD_LENGTH + 1);
        assert_eq!(config.board_length(), MAX_BOARD_LENGTH);
        config.set_board_length(MAX_BOARD_LENGTH);
        assert_eq!(config.board_length(), MAX_BOARD_LENGTH);
    }
    #[test]
    fn test_contains_edges() {
        let config = BoardConfiguration::new(6, 1);
        assert!(config.contains(Square::new(0, 0)));
        assert!(config.contains(Square::new(5, 5)));
        assert!(!config.contains(Square::new(6, 0)));
        assert!(!config.contains(Square::new(0, -1)));
    }
    #[test]
    fn test_squares_cover_board() {
        let config = BoardConfiguration::new(3, 1);
        let squares: Vec<Square> = config.squares().collect();
        assert_eq!(squares.len(), 9);
        assert_eq!(squares[0], Square::new(0, 0));
        assert_eq!(squares[8], Square::new(2, 2));
    }
}
