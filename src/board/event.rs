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

use super::config::BoardConfiguration;
use super::material::{Color, Piece};
use super::moves::Move;
use crate::game::GameOver;

/// Everything a board or game reports to the outside world. Events are
/// produced synchronously, in the order the mutations happen.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Event {
    PieceAdded(Piece),
    /// One leg of a move. A castle produces two of these, king first.
    PieceMoved(Move),
    /// Always followed by `PieceDeleted` for the same piece.
    PieceCaptured(Piece),
    PieceDeleted(Piece),
    /// Carries the replacement piece, which has a new id.
    PiecePromoted(Piece),
    ConfigurationChanged(BoardConfiguration),
    /// The given color spent one action point.
    ActionCompleted(Color),
    TurnChanged(Color),
    PromotionRequested(Piece),
    GameEnded(GameOver),
}

/// Receives events as mutations happen. Observers must not call back into
/// the object that is notifying them.
pub trait Observer {
    fn notify(&mut self, event: Event);
}

impl Observer for Vec<Event> {
    #[inline]
    fn notify(&mut self, event: Event) {
        self.push(event);
    }
}

/// Drops every event. Used for speculative boards.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Observer for Silent {
    #[inline]
    fn notify(&mut self, _event: Event) {}
}
