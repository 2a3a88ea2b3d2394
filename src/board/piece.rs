/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Neg, str::FromStr};

use anyhow::{bail, Result};

use super::{Rank, Square};

/// The color of a player or a piece.
///
/// White moves first, so [`Color`] defaults to [`Color::White`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[repr(u8)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::White, Self::Black]
    }

    #[inline(always)]
    pub const fn is_white(&self) -> bool {
        matches!(self, Self::White)
    }

    #[inline(always)]
    pub const fn is_black(&self) -> bool {
        matches!(self, Self::Black)
    }

    /// Returns this [`Color`]'s opponent.
    ///
    /// # Example
    /// ```
    /// # use kibitz::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Direction in which this color's pawns advance: `+1` rank for White, `-1` for Black.
    #[inline(always)]
    pub const fn forward(&self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    /// Rank on which this color's King and Rooks start.
    #[inline(always)]
    pub const fn home_rank(&self) -> Rank {
        match self {
            Self::White => Rank::ONE,
            Self::Black => Rank::EIGHT,
        }
    }

    /// Rank on which this color's pawns start, and from which they may advance two squares.
    #[inline(always)]
    pub const fn pawn_rank(&self) -> Rank {
        match self {
            Self::White => Rank::TWO,
            Self::Black => Rank::SEVEN,
        }
    }

    /// Square on which this color's King starts, and from which it may castle.
    #[inline(always)]
    pub const fn king_home(&self) -> Square {
        match self {
            Self::White => Square::E1,
            Self::Black => Square::E8,
        }
    }

    /// Uses `&self` to index into lists of size [`Color::COUNT`].
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Human-readable name of this [`Color`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl Neg for Color {
    type Output = Self;
    /// Negating [`Color::White`] yields [`Color::Black`] and vice versa.
    #[inline(always)]
    fn neg(self) -> Self::Output {
        self.opponent()
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Self::White),
            "b" | "black" => Ok(Self::Black),
            _ => bail!("Color must be either \"white\" or \"black\". Got {s:?}"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The kind (or "role") of a chess piece, without any [`Color`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[repr(u8)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const COUNT: usize = 6;

    /// All six kinds, in the order: `Pawn`, `Knight`, `Bishop`, `Rook`, `Queen`, `King`.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        use PieceKind::*;
        [Pawn, Knight, Bishop, Rook, Queen, King]
    }

    /// Converts the bits produced by [`PieceKind::bits`] back into a kind.
    #[inline(always)]
    const fn from_bits(bits: u8) -> Self {
        match bits {
            0 => Self::Pawn,
            1 => Self::Knight,
            2 => Self::Bishop,
            3 => Self::Rook,
            4 => Self::Queen,
            _ => Self::King,
        }
    }

    #[inline(always)]
    const fn bits(&self) -> u8 {
        *self as u8
    }

    /// Parses the uppercase piece letter used by algebraic notation (`K`, `Q`, `B`, `N`, `R`).
    ///
    /// Pawns have no letter in algebraic notation, so `None` is returned for them and for any other character.
    ///
    /// # Example
    /// ```
    /// # use kibitz::PieceKind;
    /// assert_eq!(PieceKind::from_san_letter('N'), Some(PieceKind::Knight));
    /// assert_eq!(PieceKind::from_san_letter('n'), None);
    /// assert_eq!(PieceKind::from_san_letter('P'), None);
    /// ```
    #[inline(always)]
    pub const fn from_san_letter(letter: char) -> Option<Self> {
        match letter {
            'K' => Some(Self::King),
            'Q' => Some(Self::Queen),
            'B' => Some(Self::Bishop),
            'N' => Some(Self::Knight),
            'R' => Some(Self::Rook),
            _ => None,
        }
    }

    /// The letter this kind is written with in algebraic notation. Empty for pawns.
    #[inline(always)]
    pub const fn san_letter(&self) -> &'static str {
        match self {
            Self::Pawn => "",
            Self::Knight => "N",
            Self::Bishop => "B",
            Self::Rook => "R",
            Self::Queen => "Q",
            Self::King => "K",
        }
    }

    /// Creates a new [`PieceKind`] from a case-insensitive letter, including `p` for pawns.
    pub fn from_char(kind: char) -> Result<Self> {
        match kind.to_ascii_lowercase() {
            'p' => Ok(Self::Pawn),
            'n' => Ok(Self::Knight),
            'b' => Ok(Self::Bishop),
            'r' => Ok(Self::Rook),
            'q' => Ok(Self::Queen),
            'k' => Ok(Self::King),
            _ => bail!("Invalid char for PieceKind: Got {kind:?}."),
        }
    }

    /// Lowercase letter for this kind.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A chess piece: a [`PieceKind`] paired with a [`Color`].
///
/// Internally, this is a `u8` with the following bit pattern:
/// ```text
///     0000 0 000
///      |   |  |
///      |   |  +- The PieceKind.
///      |   +- The Color. `0` for White, `1` for Black.
///      +- Unused.
/// ```
///
/// An empty square holds no piece at all, so "no piece" is always written `Option::<Piece>::None`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Piece(u8);

impl Piece {
    pub const WHITE_PAWN: Self = Self::new(Color::White, PieceKind::Pawn);
    pub const WHITE_KNIGHT: Self = Self::new(Color::White, PieceKind::Knight);
    pub const WHITE_BISHOP: Self = Self::new(Color::White, PieceKind::Bishop);
    pub const WHITE_ROOK: Self = Self::new(Color::White, PieceKind::Rook);
    pub const WHITE_QUEEN: Self = Self::new(Color::White, PieceKind::Queen);
    pub const WHITE_KING: Self = Self::new(Color::White, PieceKind::King);

    pub const BLACK_PAWN: Self = Self::new(Color::Black, PieceKind::Pawn);
    pub const BLACK_KNIGHT: Self = Self::new(Color::Black, PieceKind::Knight);
    pub const BLACK_BISHOP: Self = Self::new(Color::Black, PieceKind::Bishop);
    pub const BLACK_ROOK: Self = Self::new(Color::Black, PieceKind::Rook);
    pub const BLACK_QUEEN: Self = Self::new(Color::Black, PieceKind::Queen);
    pub const BLACK_KING: Self = Self::new(Color::Black, PieceKind::King);

    const COLOR_BITS: u8 = 3;
    const KIND_MASK: u8 = 0b0000_0111;

    /// Creates a new [`Piece`] from the given [`Color`] and [`PieceKind`].
    ///
    /// # Example
    /// ```
    /// # use kibitz::{Piece, Color, PieceKind};
    /// let white_knight = Piece::new(Color::White, PieceKind::Knight);
    /// assert_eq!(white_knight.to_string(), "N");
    /// ```
    #[inline(always)]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self((color as u8) << Self::COLOR_BITS | kind.bits())
    }

    #[inline(always)]
    pub const fn color(&self) -> Color {
        if self.0 >> Self::COLOR_BITS == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        PieceKind::from_bits(self.0 & Self::KIND_MASK)
    }

    /// Returns `true` if this piece and `other` belong to different players.
    #[inline(always)]
    pub const fn is_enemy_of(&self, other: Self) -> bool {
        self.color().index() != other.color().index()
    }

    #[inline(always)]
    pub const fn is_king(&self) -> bool {
        matches!(self.kind(), PieceKind::King)
    }

    /// Creates a [`Piece`] from a letter: uppercase for White, lowercase for Black.
    ///
    /// # Example
    /// ```
    /// # use kibitz::{Piece, Color, PieceKind};
    /// let black_rook = Piece::from_char('r').unwrap();
    /// assert_eq!(black_rook, Piece::new(Color::Black, PieceKind::Rook));
    /// ```
    pub fn from_char(piece: char) -> Result<Self> {
        let kind = PieceKind::from_char(piece)?;
        let color = if piece.is_ascii_lowercase() {
            Color::Black
        } else {
            Color::White
        };
        Ok(Self::new(color, kind))
    }

    /// Letter for this piece: uppercase for White, lowercase for Black.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self.color() {
            Color::White => self.kind().char().to_ascii_uppercase(),
            Color::Black => self.kind().char(),
        }
    }
}

impl FromStr for Piece {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(piece), None) = (chars.next(), chars.next()) else {
            bail!("Piece must be a single character. Got {s:?}");
        };
        Self::from_char(piece)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color().name(), self.kind().name())
    }
}
