/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Deref};

use crate::{parse_algebraic_notation, Color, Move, NotationError, Position};

/// A game in progress: a [`Position`], whose turn it is, and how many turns have been played.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Game {
    /// Current placement of the pieces.
    position: Position,

    /// Color of the player whose turn it is.
    side_to_move: Color,

    /// Starts at 1 and increments after every Black move.
    fullmoves: usize,
}

impl Game {
    /// Starts a game from `position`, with `side_to_move` to play first.
    pub fn new(position: Position, side_to_move: Color) -> Self {
        Self {
            position,
            side_to_move,
            fullmoves: 1,
        }
    }

    #[inline(always)]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    /// Mutable access to the board, for setting up positions by hand.
    ///
    /// Changes made here are not checked for legality and do not pass the turn.
    #[inline(always)]
    pub fn position_mut(&mut self) -> &mut Position {
        &mut self.position
    }

    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline(always)]
    pub const fn fullmoves(&self) -> usize {
        self.fullmoves
    }

    /// Parses `notation` for the side to move and, if it is legal, plays it.
    ///
    /// On failure, the game is left exactly as it was.
    ///
    /// # Example
    /// ```
    /// # use kibitz::{Color, Game, Piece, Square};
    /// let mut game = Game::default();
    /// game.play("e4").unwrap();
    /// game.play("e5").unwrap();
    /// assert!(game.play("e5").is_err());
    ///
    /// assert_eq!(game.side_to_move(), Color::White);
    /// assert_eq!(game.fullmoves(), 2);
    /// assert_eq!(game.get_piece(Square::E5), Some(Piece::BLACK_PAWN));
    /// ```
    pub fn play(&mut self, notation: &str) -> Result<Move, NotationError> {
        let mv = parse_algebraic_notation(notation, self.side_to_move, &self.position)?;
        self.make_move(mv);
        Ok(mv)
    }

    /// Applies `mv` and passes the turn. No enforcement of legality.
    pub fn make_move(&mut self, mv: Move) {
        self.position.make_move(mv.from(), mv.to());

        if self.side_to_move.is_black() {
            self.fullmoves += 1;
        }
        self.side_to_move = self.side_to_move.opponent();
    }
}

impl Deref for Game {
    type Target = Position;
    /// A [`Game`] immutably dereferences to its [`Position`].
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.position
    }
}

impl Default for Game {
    /// The standard starting position, White to move.
    #[inline(always)]
    fn default() -> Self {
        Self::new(Position::starting(), Color::White)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Turn {} ({})", self.fullmoves, self.side_to_move)?;
        write!(f, "{}", self.position)
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{self}\n\nCastling: {}",
            self.position.castling_rights_uci()
        )
    }
}
