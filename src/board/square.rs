/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use anyhow::{bail, Context, Result};

/// Declares the 64 named square constants, one rank at a time.
macro_rules! named_squares {
    ($($rank:ident => [$($name:ident),+]),+ $(,)?) => {
        $(
            named_squares!(@rank $rank, 0u8, $($name),+);
        )+
    };
    (@rank $rank:ident, $file:expr, $name:ident $(, $rest:ident)*) => {
        pub const $name: Self = Self::new(File($file), Rank::$rank);
        named_squares!(@rank $rank, $file + 1, $($rest),*);
    };
    (@rank $rank:ident, $file:expr,) => {};
    (@rank $rank:ident, $file:expr) => {};
}

/// A single cell of an `8x8` board.
///
/// Squares are indexed with least-significant file mapping, so `index = rank * 8 + file`:
/// ```text
/// 8| 56 57 58 59 60 61 62 63
/// 7| 48 49 50 51 52 53 54 55
/// 6| 40 41 42 43 44 45 46 47
/// 5| 32 33 34 35 36 37 38 39
/// 4| 24 25 26 27 28 29 30 31
/// 3| 16 17 18 19 20 21 22 23
/// 2|  8  9 10 11 12 13 14 15
/// 1|  0  1  2  3  4  5  6  7
///  +------------------------
///    a  b  c  d  e  f  g  h
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Square(pub(crate) u8);

impl Square {
    named_squares! {
        ONE => [A1, B1, C1, D1, E1, F1, G1, H1],
        TWO => [A2, B2, C2, D2, E2, F2, G2, H2],
        THREE => [A3, B3, C3, D3, E3, F3, G3, H3],
        FOUR => [A4, B4, C4, D4, E4, F4, G4, H4],
        FIVE => [A5, B5, C5, D5, E5, F5, G5, H5],
        SIX => [A6, B6, C6, D6, E6, F6, G6, H6],
        SEVEN => [A7, B7, C7, D7, E7, F7, G7, H7],
        EIGHT => [A8, B8, C8, D8, E8, F8, G8, H8],
    }

    pub const COUNT: usize = 64;

    const FILE_MASK: u8 = 0b0000_0111;
    const RANK_SHIFT: u8 = 3;

    /// Returns an iterator over all 64 squares, starting at `a1` and ending at `h8`.
    ///
    /// # Example
    /// ```
    /// # use kibitz::Square;
    /// let mut iter = Square::iter();
    /// assert_eq!(iter.len(), 64);
    /// assert_eq!(iter.next(), Some(Square::A1));
    /// assert_eq!(iter.last(), Some(Square::H8));
    /// ```
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }

    /// Creates a new [`Square`] from the provided [`File`] and [`Rank`].
    #[inline(always)]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self(file.0 | rank.0 << Self::RANK_SHIFT)
    }

    /// Creates a new [`Square`] from its flattened `rank * 8 + file` index.
    #[inline(always)]
    pub fn from_index(index: usize) -> Result<Self> {
        if index >= Self::COUNT {
            bail!("Invalid index for Square: Must be between [0, 63]. Got {index}");
        }

        Ok(Self(index as u8))
    }

    #[inline(always)]
    pub const fn file(&self) -> File {
        File(self.0 & Self::FILE_MASK)
    }

    #[inline(always)]
    pub const fn rank(&self) -> Rank {
        Rank(self.0 >> Self::RANK_SHIFT)
    }

    /// Flattened `rank * 8 + file` index of this square, for indexing into 64-cell arrays.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Attempt to offset this [`Square`] by the file and rank deltas.
    ///
    /// Returns `None` if the result would fall off the board.
    ///
    /// # Example
    /// ```
    /// # use kibitz::Square;
    /// assert_eq!(Square::C4.offset(1, 2), Some(Square::D6));
    /// assert_eq!(Square::A1.offset(-1, 0), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let Some(file) = self.file().offset(file_delta) else {
            return None;
        };

        let Some(rank) = self.rank().offset(rank_delta) else {
            return None;
        };

        Some(Self::new(file, rank))
    }

    /// Number of files between this square and `other`.
    #[inline(always)]
    pub const fn distance_files(&self, other: Self) -> u8 {
        self.file().0.abs_diff(other.file().0)
    }

    /// Number of ranks between this square and `other`.
    #[inline(always)]
    pub const fn distance_ranks(&self, other: Self) -> u8 {
        self.rank().0.abs_diff(other.rank().0)
    }

    /// Returns `true` if `other` is one of the (up to) 8 squares surrounding this one.
    #[inline(always)]
    pub const fn is_adjacent_to(&self, other: Self) -> bool {
        self.0 != other.0 && self.distance_files(other) <= 1 && self.distance_ranks(other) <= 1
    }

    /// Parses a square from its two-character name, such as `e4`.
    ///
    /// # Example
    /// ```
    /// # use kibitz::Square;
    /// assert_eq!(Square::from_uci("c4").unwrap(), Square::C4);
    /// assert!(Square::from_uci("z0").is_err());
    /// ```
    pub fn from_uci(square: &str) -> Result<Self> {
        let mut chars = square.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("Invalid Square string: String must contain exactly 2 characters. Got {square:?}");
        };

        Ok(Self::new(File::from_char(file)?, Rank::from_char(rank)?))
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    /// Wrapper from [`Square::from_uci`].
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl<T> Index<Square> for [T; Square::COUNT] {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Square> for [T; Square::COUNT] {
    #[inline(always)]
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl fmt::Debug for Square {
    /// Displays the square name along with its internal index.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({})", self.0)
    }
}

/// One of the eight ranks (rows) of the board. Rank `1` is White's home rank.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Rank(pub(crate) u8);

impl Rank {
    pub const ONE: Self = Self(0);
    pub const TWO: Self = Self(1);
    pub const THREE: Self = Self(2);
    pub const FOUR: Self = Self(3);
    pub const FIVE: Self = Self(4);
    pub const SIX: Self = Self(5);
    pub const SEVEN: Self = Self(6);
    pub const EIGHT: Self = Self(7);

    pub const MAX: u8 = 7;
    pub const COUNT: usize = 8;

    /// Returns an iterator over all ranks, in ascending order.
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (0..=Self::MAX).map(Self)
    }

    /// Construct a new [`Rank`] from a zero-based value.
    pub fn new(rank: u8) -> Result<Self> {
        if rank > Self::MAX {
            bail!("Invalid int for Rank: Must be between [0, {}]. Got {rank}", Self::MAX);
        }

        Ok(Self(rank))
    }

    /// Parses a rank from its notation digit, `'1'` through `'8'`.
    pub fn from_char(rank: char) -> Result<Self> {
        let rank_int = rank
            .to_digit(10)
            .and_then(|digit| digit.checked_sub(1))
            .context(format!("Invalid char for Rank: Must be between [1, 8]. Got {rank:?}"))?;

        Self::new(rank_int as u8)
    }

    #[inline(always)]
    pub const fn inner(&self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub const fn char(&self) -> char {
        (self.0 + b'1') as char
    }

    /// Offsets this rank by `delta`, returning `None` if the result is off the board.
    #[inline(always)]
    pub const fn offset(self, delta: i8) -> Option<Self> {
        let rank = self.0 as i8 + delta;
        if rank < 0 || rank > Self::MAX as i8 {
            None
        } else {
            Some(Self(rank as u8))
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;
    #[inline(always)]
    fn try_from(value: char) -> Result<Self, Self::Error> {
        Self::from_char(value)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

impl fmt::Debug for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.char(), self.0)
    }
}

/// One of the eight files (columns) of the board, `a` through `h`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct File(pub(crate) u8);

impl File {
    pub const A: Self = Self(0);
    pub const B: Self = Self(1);
    pub const C: Self = Self(2);
    pub const D: Self = Self(3);
    pub const E: Self = Self(4);
    pub const F: Self = Self(5);
    pub const G: Self = Self(6);
    pub const H: Self = Self(7);

    pub const MAX: u8 = 7;
    pub const COUNT: usize = 8;

    /// Returns an iterator over all files, from `a` to `h`.
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (0..=Self::MAX).map(Self)
    }

    pub fn new(file: u8) -> Result<Self> {
        if file > Self::MAX {
            bail!("Invalid int for File: Must be between [0, {}]. Got {file}", Self::MAX);
        }

        Ok(Self(file))
    }

    /// Parses a file from its lowercase notation letter, `'a'` through `'h'`.
    ///
    /// Uppercase letters are rejected, since they name pieces in algebraic notation.
    pub fn from_char(file: char) -> Result<Self> {
        if !('a'..='h').contains(&file) {
            bail!("Invalid char for File: Must be between ['a', 'h']. Got {file:?}");
        }

        Self::new(file as u8 - b'a')
    }

    #[inline(always)]
    pub const fn inner(&self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub const fn char(&self) -> char {
        (self.0 + b'a') as char
    }

    /// Offsets this file by `delta`, returning `None` if the result is off the board.
    #[inline(always)]
    pub const fn offset(self, delta: i8) -> Option<Self> {
        let file = self.0 as i8 + delta;
        if file < 0 || file > Self::MAX as i8 {
            None
        } else {
            Some(Self(file as u8))
        }
    }
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;
    #[inline(always)]
    fn try_from(value: char) -> Result<Self, Self::Error> {
        Self::from_char(value)
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.char(), self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squares() {
        assert_eq!(Square::new(File(0), Rank(0)).to_string(), "a1");
        assert_eq!(Square::new(File(7), Rank(0)).to_string(), "h1");
        assert_eq!(Square::new(File(0), Rank(7)).to_string(), "a8");
        assert_eq!(Square::new(File(7), Rank(7)).to_string(), "h8");

        // Flattened index is rank * 8 + file
        assert_eq!(Square::D4.index(), 27);
        assert_eq!(Square::E2.index(), 12);
        assert_eq!(Square::H8.index(), 63);
    }

    #[test]
    fn test_named_constants_match_coordinates() {
        for square in Square::iter() {
            let name = square.to_string();
            assert_eq!(Square::from_uci(&name).unwrap(), square);
        }
        assert_eq!(Square::G7.file(), File::G);
        assert_eq!(Square::G7.rank(), Rank::SEVEN);
    }

    #[test]
    fn test_parsing() {
        assert_eq!(Rank::ONE, Rank::try_from('1').unwrap());
        assert_eq!(Rank::EIGHT, Rank::try_from('8').unwrap());
        assert_eq!(File::A, File::try_from('a').unwrap());
        assert_eq!(File::H, File::try_from('h').unwrap());

        assert!(Rank::try_from('0').is_err());
        assert!(Rank::try_from('9').is_err());
        assert!(File::try_from('i').is_err());
        assert!(File::try_from('B').is_err());

        assert_eq!("d4".parse::<Square>().unwrap(), Square::D4);
        assert!("a".parse::<Square>().is_err());
        assert!("a1x".parse::<Square>().is_err());
        assert!("".parse::<Square>().is_err());
        assert!(Square::from_index(64).is_err());
    }

    #[test]
    fn test_offsets() {
        assert_eq!(Square::E4.offset(-1, 1), Some(Square::D5));
        assert_eq!(Square::H8.offset(1, 0), None);
        assert_eq!(Square::H8.offset(0, 1), None);
        assert_eq!(Square::A1.offset(0, -1), None);
        assert_eq!(Square::B1.offset(-1, 2), Some(Square::A3));
    }

    #[test]
    fn test_adjacency() {
        assert!(Square::E4.is_adjacent_to(Square::D5));
        assert!(Square::E4.is_adjacent_to(Square::E3));
        assert!(!Square::E4.is_adjacent_to(Square::E4));
        assert!(!Square::E4.is_adjacent_to(Square::E6));
        assert!(!Square::A1.is_adjacent_to(Square::H1));
    }

    #[test]
    fn test_indexing() {
        let mut board = [0; 64];
        board[Square::D5] = u8::MAX;
        assert_eq!(board[35], u8::MAX);
    }
}
