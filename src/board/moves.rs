/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use super::{Piece, Position, Square};

/// A move of a single piece from one square to another.
///
/// Besides its two squares, a [`Move`] may carry a snapshot of the board around it:
/// the piece that was on `from` and the piece that was on `to` when the move was created
/// with [`Move::in_position`]. The snapshot is only used for rendering and for [`Move::is_capture`];
/// it never goes stale, because it is copied out of the [`Position`] rather than pointing into it.
///
/// Two moves are equal if their squares are equal, regardless of any snapshot.
#[derive(Clone, Copy)]
pub struct Move {
    from: Square,
    to: Square,

    /// Piece on `from` at creation time, or `None` if unknown.
    piece: Option<Piece>,

    /// Piece on `to` at creation time.
    victim: Option<Piece>,
}

impl Move {
    /// Creates a move between two squares without knowing what is being moved.
    ///
    /// # Example
    /// ```
    /// # use kibitz::{Move, Square};
    /// let mv = Move::new(Square::E2, Square::E4);
    /// assert_eq!(mv.to_string(), "?e2-e4");
    /// ```
    #[inline(always)]
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            piece: None,
            victim: None,
        }
    }

    /// Creates a move between two squares, recording which pieces occupy them in `position`.
    ///
    /// # Example
    /// ```
    /// # use kibitz::{Move, Piece, Position, Square};
    /// let mut position = Position::new();
    /// position.add_piece(Piece::WHITE_KNIGHT, Square::B1);
    /// let mv = Move::in_position(&position, Square::B1, Square::C3);
    /// assert_eq!(mv.to_string(), "Nb1-c3");
    /// ```
    #[inline(always)]
    pub const fn in_position(position: &Position, from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            piece: position.get_piece(from),
            victim: position.get_piece(to),
        }
    }

    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// The piece being moved, if this move was created with [`Move::in_position`] and `from` was occupied.
    #[inline(always)]
    pub const fn piece(&self) -> Option<Piece> {
        self.piece
    }

    /// Returns `true` if the destination held a piece of the opposite color to the mover when this move was created.
    ///
    /// Always `false` when the mover is unknown.
    #[inline(always)]
    pub fn is_capture(&self) -> bool {
        match (self.piece, self.victim) {
            (Some(piece), Some(victim)) => piece.is_enemy_of(victim),
            _ => false,
        }
    }

    /// Returns `true` if this is a King moving two files along its home rank.
    #[inline(always)]
    pub fn is_castle(&self) -> bool {
        self.piece.is_some_and(|piece| piece.is_king()) && self.from.distance_files(self.to) > 1
    }

    /// Renders this move as a bare `from` + `to` pair, such as `e2e4`.
    #[inline(always)]
    pub fn to_uci(&self) -> String {
        format!("{}{}", self.from, self.to)
    }
}

impl PartialEq for Move {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
    }
}

impl fmt::Display for Move {
    /// Piece letter (empty for pawns, `?` if unknown), origin, `-` or `x`, destination. For example `Nb1-c3`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = self.piece.map_or("?", |piece| piece.kind().san_letter());
        let separator = if self.is_capture() { 'x' } else { '-' };
        write!(f, "{letter}{}{separator}{}", self.from, self.to)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({})", self.to_uci())
    }
}
