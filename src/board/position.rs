/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Index};

use super::{Color, File, Piece, PieceKind, Rank, Square};

/// Which of a player's castling pieces have left their home squares.
///
/// Every flag is monotonic: once set, it is never cleared for the lifetime of the [`Position`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub struct CastlingRights {
    king_moved: bool,
    /// The Rook that started on the a-file.
    rook_a_moved: bool,
    /// The Rook that started on the h-file.
    rook_h_moved: bool,
}

impl CastlingRights {
    /// Returns `true` if neither the King nor the h-file Rook have moved.
    #[inline(always)]
    pub const fn short(&self) -> bool {
        !self.king_moved && !self.rook_h_moved
    }

    /// Returns `true` if neither the King nor the a-file Rook have moved.
    #[inline(always)]
    pub const fn long(&self) -> bool {
        !self.king_moved && !self.rook_a_moved
    }

    #[inline(always)]
    pub const fn king_moved(&self) -> bool {
        self.king_moved
    }

    #[inline(always)]
    pub const fn rook_a_moved(&self) -> bool {
        self.rook_a_moved
    }

    #[inline(always)]
    pub const fn rook_h_moved(&self) -> bool {
        self.rook_h_moved
    }
}

/// A chess board: 64 cells, each either empty or holding a [`Piece`], plus the castling flags of both players.
///
/// A [`Position`] knows nothing about whose turn it is. Moves applied through [`Position::make_move`]
/// are not validated; legality is established beforehand with [`crate::move_is_valid`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Flattened `rank * 8 + file` cells.
    cells: [Option<Piece>; Square::COUNT],

    /// Castling flags, indexed by [`Color`].
    castling: [CastlingRights; Color::COUNT],
}

impl Position {
    /// Creates an empty board with no castling flags set.
    ///
    /// # Example
    /// ```
    /// # use kibitz::{Position, Square};
    /// let position = Position::new();
    /// assert!(!position.has_piece(Square::E2));
    /// ```
    pub const fn new() -> Self {
        Self {
            cells: [None; Square::COUNT],
            castling: [CastlingRights {
                king_moved: false,
                rook_a_moved: false,
                rook_h_moved: false,
            }; Color::COUNT],
        }
    }

    /// Creates the standard starting layout: all 32 pieces on their home squares, every castling right available.
    ///
    /// # Example
    /// ```
    /// # use kibitz::{Piece, Position, Square};
    /// let position = Position::starting();
    /// assert_eq!(position.get_piece(Square::E1), Some(Piece::WHITE_KING));
    /// assert_eq!(position.get_piece(Square::D8), Some(Piece::BLACK_QUEEN));
    /// ```
    pub fn starting() -> Self {
        use PieceKind::*;
        const BACK_RANK: [PieceKind; File::COUNT] =
            [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut position = Self::new();
        for color in Color::all() {
            for (file, kind) in File::iter().zip(BACK_RANK) {
                position.add_piece(
                    Piece::new(color, kind),
                    Square::new(file, color.home_rank()),
                );
                position.add_piece(
                    Piece::new(color, Pawn),
                    Square::new(file, color.pawn_rank()),
                );
            }
        }

        position
    }

    /// Returns `true` if any piece occupies `square`.
    #[inline(always)]
    pub const fn has_piece(&self, square: Square) -> bool {
        self.cells[square.index()].is_some()
    }

    /// Fetches the piece on `square`, or `None` if it is empty.
    #[inline(always)]
    pub const fn get_piece(&self, square: Square) -> Option<Piece> {
        self.cells[square.index()]
    }

    /// Places `piece` on `square`, overwriting whatever was there.
    #[inline(always)]
    pub fn add_piece(&mut self, piece: Piece, square: Square) {
        self.cells[square] = Some(piece);
    }

    /// Empties `square`.
    #[inline(always)]
    pub fn remove_piece(&mut self, square: Square) {
        self.cells[square] = None;
    }

    /// Removes and returns the piece on `square`, if there was one.
    #[inline(always)]
    fn take(&mut self, square: Square) -> Option<Piece> {
        self.cells[square].take()
    }

    /// Every square holding exactly `piece` (same kind *and* color), in ascending square order.
    ///
    /// # Example
    /// ```
    /// # use kibitz::{Piece, Position, Square};
    /// let position = Position::starting();
    /// assert_eq!(position.find_pieces(Piece::BLACK_KNIGHT), vec![Square::B8, Square::G8]);
    /// ```
    pub fn find_pieces(&self, piece: Piece) -> Vec<Square> {
        self.iter()
            .filter_map(|(square, occupant)| (occupant == piece).then_some(square))
            .collect()
    }

    /// Location of `color`'s King, if it has one.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.find_pieces(Piece::new(color, PieceKind::King))
            .into_iter()
            .next()
    }

    /// Iterates over all occupied squares and the pieces on them.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| Some((square, self.get_piece(square)?)))
    }

    #[inline(always)]
    pub const fn castling_rights(&self, color: Color) -> &CastlingRights {
        &self.castling[color.index()]
    }

    /// Returns `false` once `color`'s King or h-file Rook has moved.
    ///
    /// Does not look at the squares between them, nor at whether any of them are attacked.
    #[inline(always)]
    pub const fn short_castling_possible(&self, color: Color) -> bool {
        self.castling_rights(color).short()
    }

    /// Returns `false` once `color`'s King or a-file Rook has moved.
    ///
    /// Does not look at the squares between them, nor at whether any of them are attacked.
    #[inline(always)]
    pub const fn long_castling_possible(&self, color: Color) -> bool {
        self.castling_rights(color).long()
    }

    /// Remaining castling rights in the familiar `KQkq` form, or `-` if none remain.
    pub fn castling_rights_uci(&self) -> String {
        let mut rights = String::with_capacity(4);
        if self.short_castling_possible(Color::White) {
            rights.push('K');
        }
        if self.long_castling_possible(Color::White) {
            rights.push('Q');
        }
        if self.short_castling_possible(Color::Black) {
            rights.push('k');
        }
        if self.long_castling_possible(Color::Black) {
            rights.push('q');
        }

        if rights.is_empty() {
            rights.push('-');
        }
        rights
    }

    /// Moves the piece on `from` to `to`, capturing anything on `to`. No enforcement of legality.
    ///
    /// Moving a King or a Rook off the a- or h-file permanently revokes the matching castling rights.
    /// A King moving more than one file is a castle: the matching Rook is relocated to the other side of the King
    /// within this same call.
    ///
    /// If `from` is empty, nothing happens.
    pub fn make_move(&mut self, from: Square, to: Square) {
        let Some(piece) = self.take(from) else {
            return;
        };
        let color = piece.color();

        match piece.kind() {
            PieceKind::King => {
                self.castling[color.index()].king_moved = true;

                if from.distance_files(to) > 1 {
                    self.castle_rook(color, to.file());
                }
            }

            PieceKind::Rook if from.file() == File::A => {
                self.castling[color.index()].rook_a_moved = true;
            }

            PieceKind::Rook if from.file() == File::H => {
                self.castling[color.index()].rook_h_moved = true;
            }

            _ => {}
        }

        self.add_piece(piece, to);
    }

    /// Relocates `color`'s castling Rook for a King landing on `king_file`, revoking that side's rights.
    fn castle_rook(&mut self, color: Color, king_file: File) {
        let rank = color.home_rank();
        let (rook_from, rook_to) = if king_file == File::C {
            self.castling[color.index()].rook_a_moved = true;
            (Square::new(File::A, rank), Square::new(File::D, rank))
        } else {
            self.castling[color.index()].rook_h_moved = true;
            (Square::new(File::H, rank), Square::new(File::F, rank))
        };

        log::debug!("{color} castles: rook {rook_from} -> {rook_to}");
        if let Some(rook) = self.take(rook_from) {
            self.add_piece(rook, rook_to);
        }
    }
}

impl Default for Position {
    /// The standard starting layout. See [`Position::starting`].
    #[inline(always)]
    fn default() -> Self {
        Self::starting()
    }
}

impl Index<Square> for Position {
    type Output = Option<Piece>;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self.cells[index]
    }
}

impl fmt::Display for Position {
    /// Draws the board with rank 8 at the top, uppercase for White and lowercase for Black.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            write!(f, "{rank}| ")?;
            for file in File::iter() {
                match self.get_piece(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{piece} ")?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }

        write!(f, " +")?;
        for _ in File::iter() {
            write!(f, "--")?;
        }
        write!(f, "\n   ")?;
        for file in File::iter() {
            write!(f, "{file} ")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}\n\nCastling: {}", self.castling_rights_uci())
    }
}
