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

use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use super::event::{Event, Observer};
use super::material::{Color, Piece, PieceId, PieceType};
use super::moves::Move;
use super::square::Square;

/// The live pieces of one board, keyed by id.
///
/// Ids come from a counter that only ever increases, so an id that has
/// been captured, deleted or promoted away is never seen again. At most
/// one piece stands on any square.
#[derive(Debug, Clone, Default)]
pub struct PieceStore {
    pieces: BTreeMap<PieceId, Piece>,
    squares: HashMap<Square, PieceId>,
    id_pool: PieceId,
}

impl PieceStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
    #[inline]
    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.squares.get(&square).and_then(|id| self.pieces.get(id))
    }
    /// Pieces in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }
    pub fn ids(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.pieces.keys().copied()
    }
    pub fn of_color(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.iter().filter(move |piece| piece.color == color)
    }
    pub fn count(&self, piece_type: PieceType, color: Color) -> usize {
        self.of_color(color)
            .filter(|piece| piece.piece_type == piece_type)
            .count()
    }

    /// Adds a copy of `template` under a fresh id. The template's own id
    /// is ignored. Refuses to stack a piece on an occupied square.
    pub fn add_piece(&mut self, template: Piece, observer: &mut impl Observer) -> Option<Piece> {
        if let Some(occupant) = self.piece_at(template.position) {
            warn!(%occupant, "cannot add a piece on an occupied square");
            return None;
        }
        let id = self.id_pool;
        self.id_pool = id.next();
        let piece = template.with_id(id);
        self.pieces.insert(id, piece);
        self.squares.insert(piece.position, id);
        observer.notify(Event::PieceAdded(piece));
        Some(piece)
    }

    /// Relocates the moving piece, capturing whatever stood on the
    /// destination first, then applies any chained move.
    ///
    /// Every leg's snapshot must match the store before anything changes.
    /// If one is missing or no longer where the move says it is, nothing
    /// happens and the result is false.
    pub fn execute_move(&mut self, mv: &Move, observer: &mut impl Observer) -> bool {
        if !mv.legs().all(|leg| self.is_current(&leg.piece_before)) {
            return false;
        }
        for leg in mv.legs() {
            self.move_piece(leg, observer);
        }
        true
    }

    fn is_current(&self, snapshot: &Piece) -> bool {
        match self.pieces.get(&snapshot.id) {
            Some(piece) if piece.position == snapshot.position => true,
            Some(piece) => {
                warn!(%piece, expected = %snapshot.position, "move snapshot is stale");
                false
            }
            None => {
                warn!(id = %snapshot.id, "cannot move a missing piece");
                false
            }
        }
    }

    fn move_piece(&mut self, leg: &Move, observer: &mut impl Observer) {
        let id = leg.piece_before.id;
        if let Some(occupant) = self.piece_at(leg.final_position).copied() {
            if occupant.id != id {
                self.capture_piece(occupant.id, observer);
            }
        }
        let Some(current) = self.pieces.get(&id).copied() else {
            return;
        };
        let moved = current.with_position(leg.final_position).with_moved(true);
        self.squares.remove(&current.position);
        self.squares.insert(moved.position, id);
        self.pieces.insert(id, moved);
        observer.notify(Event::PieceMoved(leg.clone()));
    }

    pub fn capture_piece(&mut self, id: PieceId, observer: &mut impl Observer) -> Option<Piece> {
        match self.pieces.get(&id) {
            Some(piece) => {
                observer.notify(Event::PieceCaptured(*piece));
                self.delete_piece(id, observer)
            }
            None => {
                warn!(%id, "cannot capture a missing piece");
                None
            }
        }
    }

    /// Removes a piece without reporting a capture.
    pub fn delete_piece(&mut self, id: PieceId, observer: &mut impl Observer) -> Option<Piece> {
        match self.pieces.remove(&id) {
            Some(piece) => {
                self.squares.remove(&piece.position);
                observer.notify(Event::PieceDeleted(piece));
                Some(piece)
            }
            None => {
                warn!(%id, "cannot delete a missing piece");
                None
            }
        }
    }

    /// Replaces a piece with one of another type on the same square. The
    /// replacement gets a new id.
    pub fn promote(
        &mut self,
        id: PieceId,
        piece_type: PieceType,
        observer: &mut impl Observer,
    ) -> Option<Piece> {
        let Some(old) = self.pieces.get(&id).copied() else {
            warn!(%id, %piece_type, "cannot promote a missing piece");
            return None;
        };
        self.delete_piece(id, observer);
        let piece = self.add_piece(old.with_type(piece_type), observer)?;
        observer.notify(Event::PiecePromoted(piece));
        Some(piece)
    }

    /// Deletes every piece. The id counter keeps running.
    pub fn clear(&mut self, observer: &mut impl Observer) {
        let ids: Vec<PieceId> = self.ids().collect();
        for id in ids {
            self.delete_piece(id, observer);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    fn store_with(pieces: &[Piece]) -> PieceStore {
        let mut store = PieceStore::new();
        for piece in pieces {
            store.add_piece(*piece, &mut Silent).unwrap();
        }
        store
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut store = store_with(&[Piece::white(PieceType::Rook, Square::new(0, 0))]);
        let first = store.ids().next().unwrap();
        store.delete_piece(first, &mut Silent);
        let second = store
            .add_piece(Piece::white(PieceType::Rook, Square::new(0, 0)), &mut Silent)
            .unwrap();
        assert!(second.id > first);
    }
    #[test]
    fn test_add_refuses_occupied_square() {
        let mut store = store_with(&[Piece::white(PieceType::Rook, Square::new(0, 0))]);
        let mut events = Vec::new();
        let result = store.add_piece(Piece::black(PieceType::Rook, Square::new(0, 0)), &mut events);
        assert!(result.is_none());
        assert!(events.is_empty());
        assert_eq!(store.len(), 1);
    }
    #[test]
    fn test_move_captures_before_moving() {
        let mut store = store_with(&[
            Piece::white(PieceType::Rook, Square::new(0, 0)),
            Piece::black(PieceType::Knight, Square::new(0, 5)),
        ]);
        let rook = *store.piece_at(Square::new(0, 0)).unwrap();
        let knight = *store.piece_at(Square::new(0, 5)).unwrap();
        let mv = Move::normal(rook, Square::new(0, 5));
        let mut events = Vec::new();
        assert!(store.execute_move(&mv, &mut events));
        assert_eq!(
            events,
            vec![
                Event::PieceCaptured(knight),
                Event::PieceDeleted(knight),
                Event::PieceMoved(mv),
            ]
        );
        let moved = store.piece_at(Square::new(0, 5)).unwrap();
        assert_eq!(moved.id, rook.id);
        assert!(moved.has_moved);
        assert!(store.piece_at(Square::new(0, 0)).is_none());
        assert!(store.get(knight.id).is_none());
    }
    #[test]
    fn test_stale_move_is_ignored() {
        let mut store = store_with(&[Piece::white(PieceType::Rook, Square::new(0, 0))]);
        let rook = *store.piece_at(Square::new(0, 0)).unwrap();
        store.execute_move(&Move::normal(rook, Square::new(0, 3)), &mut Silent);
        let mut events = Vec::new();
        assert!(!store.execute_move(&Move::normal(rook, Square::new(0, 6)), &mut events));
        assert!(events.is_empty());
        assert_eq!(store.get(rook.id).unwrap().position, Square::new(0, 3));
    }
    #[test]
    fn test_chained_move_with_stale_leg_changes_nothing() {
        let mut store = store_with(&[
            Piece::white(PieceType::King, Square::new(4, 7)),
            Piece::white(PieceType::Rook, Square::new(7, 7)),
        ]);
        let king = *store.piece_at(Square::new(4, 7)).unwrap();
        let rook = *store.piece_at(Square::new(7, 7)).unwrap();
        let stale_rook = rook.with_position(Square::new(7, 6));
        let castle = Move::castle(king, Square::new(6, 7), Move::normal(stale_rook, Square::new(5, 7)));
        let mut events = Vec::new();
        assert!(!store.execute_move(&castle, &mut events));
        assert!(events.is_empty());
        assert_eq!(store.get(king.id), Some(&king));
        assert_eq!(store.get(rook.id), Some(&rook));
    }
    #[test]
    fn test_castle_reports_each_leg() {
        let mut store = store_with(&[
            Piece::white(PieceType::King, Square::new(4, 7)),
            Piece::white(PieceType::Rook, Square::new(7, 7)),
        ]);
        let king = *store.piece_at(Square::new(4, 7)).unwrap();
        let rook = *store.piece_at(Square::new(7, 7)).unwrap();
        let rook_move = Move::normal(rook, Square::new(5, 7));
        let castle = Move::castle(king, Square::new(6, 7), rook_move.clone());
        let mut events = Vec::new();
        assert!(store.execute_move(&castle, &mut events));
        assert_eq!(
            events,
            vec![Event::PieceMoved(castle), Event::PieceMoved(rook_move)]
        );
    }
    #[test]
    fn test_capture_fires_capture_then_delete() {
        let mut store = store_with(&[Piece::black(PieceType::Bishop, Square::new(2, 2))]);
        let bishop = *store.piece_at(Square::new(2, 2)).unwrap();
        let mut events = Vec::new();
        store.capture_piece(bishop.id, &mut events);
        assert_eq!(
            events,
            vec![Event::PieceCaptured(bishop), Event::PieceDeleted(bishop)]
        );
    }
    #[test]
    fn test_unknown_ids_change_nothing() {
        let mut store = store_with(&[Piece::black(PieceType::Bishop, Square::new(2, 2))]);
        let missing = PieceId::new(42);
        let mut events = Vec::new();
        assert!(store.capture_piece(missing, &mut events).is_none());
        assert!(store.delete_piece(missing, &mut events).is_none());
        assert!(store.promote(missing, PieceType::Queen, &mut events).is_none());
        assert!(events.is_empty());
        assert_eq!(store.len(), 1);
    }
    #[test]
    fn test_promote_replaces_identity() {
        let mut store = store_with(&[Piece::white(PieceType::Pawn, Square::new(3, 0))]);
        let pawn = *store.piece_at(Square::new(3, 0)).unwrap();
        let mut events = Vec::new();
        let queen = store.promote(pawn.id, PieceType::Queen, &mut events).unwrap();
        assert_ne!(queen.id, pawn.id);
        assert_eq!(queen.piece_type, PieceType::Queen);
        assert_eq!(queen.position, pawn.position);
        assert_eq!(
            events,
            vec![
                Event::PieceDeleted(pawn),
                Event::PieceAdded(queen),
                Event::PiecePromoted(queen),
            ]
        );
    }
    #[test]
    fn test_clone_is_independent() {
        let store = store_with(&[Piece::white(PieceType::King, Square::new(4, 7))]);
        let mut copy = store.clone();
        let king = *copy.piece_at(Square::new(4, 7)).unwrap();
        copy.execute_move(&Move::normal(king, Square::new(4, 6)), &mut Silent);
        assert!(store.piece_at(Square::new(4, 7)).is_some());
        assert!(copy.piece_at(Square::new(4, 7)).is_none());
    }
    #[test]
    fn test_count_by_type_and_color() {
        let store = store_with(&[
            Piece::white(PieceType::King, Square::new(0, 0)),
            Piece::white(PieceType::King, Square::new(1, 0)),
            Piece::black(PieceType::King, Square::new(2, 0)),
        ]);
        assert_eq!(store.count(PieceType::King, Color::White), 2);
        assert_eq!(store.count(PieceType::King, Color::Black), 1);
        assert_eq!(store.count(PieceType::Queen, Color::Black), 0);
    }
}
