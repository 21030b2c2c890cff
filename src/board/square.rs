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
use std::ops::{Add, AddAssign, Mul, Neg, Sub};
use strum_macros::EnumIter;

/// A grid coordinate. `(0, 0)` is the top-left corner of the board; `x`
/// grows to the right and `y` grows downwards.
///
/// A `Square` is not tied to any board size, so it may lie outside the
/// board. Use `BoardConfiguration::contains` to check.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Square {
    pub x: i32,
    pub y: i32,
}

impl Square {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The square reflected across the horizontal midline of a board
    /// with sides of `board_length` squares.
    #[inline]
    pub const fn mirrored(self, board_length: i32) -> Self {
        Self::new(self.x, board_length - self.y - 1)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Square {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Reduces an orthogonal or diagonal offset to a single step in the
    /// same direction. Any other offset (including zero) has no unit.
    pub fn to_unit(self) -> Option<Self> {
        let (x, y) = match (self.x, self.y) {
            (0, 0) => return None,
            (x, y) if x == 0 || y == 0 || x.abs() == y.abs() => (x.signum(), y.signum()),
            _ => return None,
        };
        Some(Self { x, y })
    }
}

impl Neg for Offset {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

impl Add for Offset {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<i32> for Offset {
    type Output = Self;
    fn mul(self, rhs: i32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Add<Offset> for Square {
    type Output = Square;
    fn add(self, rhs: Offset) -> Self::Output {
        Square::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Add<&Offset> for Square {
    type Output = Square;
    fn add(self, rhs: &Offset) -> Self::Output {
        self + *rhs
    }
}

impl AddAssign<Offset> for Square {
    fn add_assign(&mut self, rhs: Offset) {
        *self = *self + rhs;
    }
}

impl Sub for Square {
    type Output = Offset;
    fn sub(self, rhs: Self) -> Self::Output {
        Offset::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Direction {
    UpLeft,
    Up,
    UpRight,
    Left,
    Right,
    DownLeft,
    Down,
    DownRight,
}

use Direction::*;

impl Direction {
    pub const CARDINALS: [Direction; 4] = [Down, Up, Left, Right];
    pub const DIAGONALS: [Direction; 4] = [DownRight, UpRight, DownLeft, UpLeft];

    #[inline]
    pub const fn offset(self) -> Offset {
        match self {
            UpLeft => Offset::new(-1, -1),
            Up => Offset::new(0, -1),
            UpRight => Offset::new(1, -1),
            Left => Offset::new(-1, 0),
            Right => Offset::new(1, 0),
            DownLeft => Offset::new(-1, 1),
            Down => Offset::new(0, 1),
            DownRight => Offset::new(1, 1),
        }
    }

    #[inline]
    pub const fn is_cardinal(self) -> bool {
        matches!(self, Up | Down | Left | Right)
    }
}

impl From<Direction> for Offset {
    fn from(value: Direction) -> Self {
        value.offset()
    }
}

impl Add<Direction> for Square {
    type Output = Square;
    fn add(self, rhs: Direction) -> Self::Output {
        self + rhs.offset()
    }
}

#[cfg(test)]
mod tests {
    use crate::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_unit_of_orthogonal_offset() {
        assert_eq!(Offset::new(3, 0).to_unit(), Some(Offset::new(1, 0)));
        assert_eq!(Offset::new(0, -5).to_unit(), Some(Offset::new(0, -1)));
    }
    #[test]
    fn test_unit_of_diagonal_offset() {
        assert_eq!(Offset::new(-2, 2).to_unit(), Some(Offset::new(-1, 1)));
    }
    #[test]
    fn test_no_unit_for_knight_offset_or_zero() {
        assert_eq!(Offset::new(1, 2).to_unit(), None);
        assert_eq!(Offset::new(0, 0).to_unit(), None);
    }
    #[test]
    fn test_square_difference_is_offset() {
        let a = Square::new(7, 0);
        let b = Square::new(4, 0);
        assert_eq!(a - b, Offset::new(3, 0));
        assert_eq!(b + (a - b), a);
    }
    #[test]
    fn test_directions_are_distinct_unit_steps() {
        let offsets: Vec<Offset> = Direction::iter().map(Offset::from).collect();
        assert_eq!(offsets.len(), 8);
        for offset in &offsets {
            assert_eq!(offset.to_unit(), Some(*offset));
        }
        assert_eq!(Direction::iter().filter(|d| d.is_cardinal()).count(), 4);
    }
    #[test]
    fn test_stepping_off_the_edge_of_i32_saturates() {
        let mut square = Square::new(i32::MAX - 1, i32::MIN);
        square += Offset::new(2, -1);
        assert_eq!(square, Square::new(i32::MAX, i32::MIN));
    }
    #[test]
    fn test_mirrored_square() {
        assert_eq!(Square::new(2, 0).mirrored(8), Square::new(2, 7));
        assert_eq!(Square::new(2, 6).mirrored(8), Square::new(2, 1));
    }
}
