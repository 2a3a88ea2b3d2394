/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Move generation, validation, and attacked squares.
mod movegen;

/// A single move between two squares.
mod moves;

/// Parsing of short algebraic notation.
mod notation;

/// Colors, kinds, and pieces.
mod piece;

/// Piece placement and castling rights.
mod position;

/// Squares, files, and ranks.
mod square;

pub use movegen::*;
pub use moves::*;
pub use notation::*;
pub use piece::*;
pub use position::*;
pub use square::*;
