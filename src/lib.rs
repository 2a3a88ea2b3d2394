/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Pieces, squares, positions, move generation, and algebraic notation.
mod board;

/// Commands understood by the console.
mod cli;

/// The interactive console: user input handling and the command loop.
mod console;

/// A game in progress, alternating turns between two players.
mod game;

pub use board::*;
pub use cli::*;
pub use console::*;
pub use game::*;
