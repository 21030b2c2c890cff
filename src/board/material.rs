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
use std::fmt;
use std::ops::Not;
use strum_macros::{Display, EnumIter, EnumString};

use super::square::{Direction, Offset, Square};

#[derive(
    Debug, Serialize, Deserialize, Display, EnumString, Clone, Copy, PartialEq, Eq, Hash, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Color {
    White,
    Black,
}

use Color::{Black, White};

impl Color {
    /// The direction this color's pawns advance in. White moves up the
    /// screen (decreasing `y`), Black moves down.
    #[inline]
    pub const fn forward(&self) -> Offset {
        match self {
            White => Direction::Up.offset(),
            Black => Direction::Down.offset(),
        }
    }
}

impl Not for Color {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        match self {
            White => Black,
            Black => White,
        }
    }
}

#[derive(
    Debug, Serialize, Deserialize, Display, EnumString, Clone, Copy, PartialEq, Eq, Hash, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

use PieceType::*;

impl PieceType {
    /// Single-letter symbol, upper case for White and lower case for Black.
    pub fn symbol(&self, color: Color) -> char {
        let c = match self {
            Pawn => 'p',
            Knight => 'n',
            Bishop => 'b',
            Rook => 'r',
            Queen => 'q',
            King => 'k',
        };
        match color {
            White => c.to_ascii_uppercase(),
            Black => c,
        }
    }
}

/// The piece types a pawn is normally promoted to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl From<Promotion> for PieceType {
    fn from(value: Promotion) -> Self {
        match value {
            Promotion::Queen => Queen,
            Promotion::Rook => Rook,
            Promotion::Bishop => Bishop,
            Promotion::Knight => Knight,
        }
    }
}

impl TryFrom<PieceType> for Promotion {
    type Error = PieceType;
    fn try_from(value: PieceType) -> Result<Self, Self::Error> {
        match value {
            Queen => Ok(Promotion::Queen),
            Rook => Ok(Promotion::Rook),
            Bishop => Ok(Promotion::Bishop),
            Knight => Ok(Promotion::Knight),
            other => Err(other),
        }
    }
}

/// Identifies a live piece within one `PieceStore`. Ids are handed out in
/// increasing order and never reused.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PieceId(u32);

impl PieceId {
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }
    #[inline]
    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chess piece as it stands at one moment. Pieces are values: moving or
/// promoting a piece produces a new `Piece` rather than changing this one.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: PieceId,
    pub position: Square,
    pub piece_type: PieceType,
    pub color: Color,
    pub has_moved: bool,
}

impl Piece {
    /// A template for `PieceStore::add_piece`, which assigns the real id.
    #[inline]
    pub const fn new(piece_type: PieceType, color: Color, position: Square) -> Self {
        Self {
            id: PieceId(0),
            position,
            piece_type,
            color,
            has_moved: false,
        }
    }

    #[inline]
    pub const fn white(piece_type: PieceType, position: Square) -> Self {
        Self::new(piece_type, White, position)
    }

    #[inline]
    pub const fn black(piece_type: PieceType, position: Square) -> Self {
        Self::new(piece_type, Black, position)
    }

    #[inline]
    pub const fn with_id(self, id: PieceId) -> Self {
        Self { id, ..self }
    }

    #[inline]
    pub const fn with_position(self, position: Square) -> Self {
        Self { position, ..self }
    }

    #[inline]
    pub const fn with_type(self, piece_type: PieceType) -> Self {
        Self { piece_type, ..self }
    }

    #[inline]
    pub const fn with_moved(self, has_moved: bool) -> Self {
        Self { has_moved, ..self }
    }

    #[inline]
    pub fn symbol(&self) -> char {
        self.piece_type.symbol(self.color)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} at {}",
            self.id, self.color, self.piece_type, self.position
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::*;
    use std::str::FromStr;

    #[test]
    fn test_forward_is_opposite_per_color() {
        assert_eq!(Color::White.forward(), Offset::new(0, -1));
        assert_eq!(Color::Black.forward(), -Color::White.forward());
    }
    #[test]
    fn test_not_flips_color() {
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(!!Color::White, Color::White);
    }
    #[test]
    fn test_parse_names_case_insensitively() {
        assert_eq!(Color::from_str("black").unwrap(), Color::Black);
        assert_eq!(PieceType::from_str("QUEEN").unwrap(), PieceType::Queen);
        assert!(PieceType::from_str("archbishop").is_err());
    }
    #[test]
    fn test_promotion_conversions() {
        assert_eq!(PieceType::from(Promotion::Knight), PieceType::Knight);
        assert_eq!(Promotion::try_from(PieceType::Rook), Ok(Promotion::Rook));
        assert_eq!(Promotion::try_from(PieceType::King), Err(PieceType::King));
    }
    #[test]
    fn test_piece_builders_keep_other_fields() {
        let piece = Piece::white(PieceType::Pawn, Square::new(3, 6));
        let moved = piece.with_position(Square::new(3, 4)).with_moved(true);
        assert_eq!(moved.piece_type, PieceType::Pawn);
        assert_eq!(moved.color, Color::White);
        assert!(moved.has_moved);
        assert!(!piece.has_moved);
        assert_eq!(piece.to_string(), "[0] White Pawn at (3,6)");
    }
}
