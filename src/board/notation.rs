/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use log::{debug, trace};
use thiserror::Error;

use super::{move_is_valid, Color, File, Move, Piece, PieceKind, Position, Rank, Square};

/// Reasons a piece of short algebraic notation could not be turned into a [`Move`].
///
/// Every variant carries the notation that was being parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    /// The text could not be read as notation at all, or had text left over after the move.
    #[error("Malformed notation {notation:?}: {reason}")]
    Malformed { notation: String, reason: String },

    /// The mover has no piece of the named kind on the board.
    #[error("No {piece:?} on the board to play {notation:?}")]
    NoMatchingPiece { notation: String, piece: Piece },

    /// None of the candidate pieces can legally reach the destination.
    #[error("No legal move found for {notation:?}")]
    NoLegalMove { notation: String },

    /// More than one piece can legally reach the destination.
    #[error("{notation:?} is ambiguous between {}", join_moves(.candidates))]
    AmbiguousMove {
        notation: String,
        candidates: Vec<Move>,
    },

    /// The notation declared a capture, but the destination holds no enemy piece.
    #[error("{notation:?} declares a capture, but {mv} captures nothing")]
    CaptureMismatch { notation: String, mv: Move },
}

fn join_moves(moves: &[Move]) -> String {
    moves
        .iter()
        .map(|mv| mv.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Which side of the board a King castles towards.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum CastlingSide {
    Short,
    Long,
}

impl CastlingSide {
    /// Recognizes both the zero and the letter-O spellings.
    fn from_notation(notation: &str) -> Option<Self> {
        match notation {
            "0-0" | "O-O" => Some(Self::Short),
            "0-0-0" | "O-O-O" => Some(Self::Long),
            _ => None,
        }
    }

    /// The file the King lands on.
    const fn king_destination(&self) -> File {
        match self {
            Self::Short => File::G,
            Self::Long => File::C,
        }
    }
}

/// Parses a move written in short algebraic notation, such as `e4`, `Nf3`, `exd5`, `R1xe4` or `0-0`,
/// for the pieces of `color` in `position`.
///
/// The parsed move is checked against the move generator, so only legal moves are ever returned.
/// Nothing is modified: apply the result with [`Position::make_move`].
///
/// Check (`+`) and mate (`#`) suffixes are not recognized and count as trailing text.
///
/// # Example
/// ```
/// # use kibitz::{parse_algebraic_notation, Color, Move, Position, Square};
/// let position = Position::starting();
/// let mv = parse_algebraic_notation("Nf3", Color::White, &position).unwrap();
/// assert_eq!(mv, Move::new(Square::G1, Square::F3));
/// assert_eq!(mv.to_string(), "Ng1-f3");
///
/// assert!(parse_algebraic_notation("Nd4", Color::White, &position).is_err());
/// ```
pub fn parse_algebraic_notation(
    notation: &str,
    color: Color,
    position: &Position,
) -> Result<Move, NotationError> {
    debug!("Parsing {notation:?} for {color}");

    if let Some(side) = CastlingSide::from_notation(notation) {
        return parse_castling(notation, side, color, position);
    }

    let malformed = |reason: &str| NotationError::Malformed {
        notation: notation.to_string(),
        reason: reason.to_string(),
    };

    let mut rest = notation;

    // An absent piece letter means a pawn is moving
    let Some(first) = rest.chars().next() else {
        return Err(malformed("Notation is empty"));
    };
    let kind = match PieceKind::from_san_letter(first) {
        Some(kind) => {
            rest = &rest[first.len_utf8()..];
            kind
        }
        None => PieceKind::Pawn,
    };

    let piece = Piece::new(color, kind);
    let origins = position.find_pieces(piece);
    if origins.is_empty() {
        return Err(NotationError::NoMatchingPiece {
            notation: notation.to_string(),
            piece,
        });
    }

    // These only disambiguate if a full destination square follows them
    let mut file_hint = take_file(&mut rest);
    let mut rank_hint = take_rank(&mut rest);
    let after_hints = rest;

    let mut expects_capture = take_capture_marker(&mut rest);

    let destination = match take_square(&mut rest) {
        Some(square) => square,
        None => match (file_hint, rank_hint) {
            (Some(file), Some(rank)) => {
                let square = Square::new(file, rank);
                debug!("No square after {file}{rank} in {notation:?}; reading {square} as the destination");
                rest = after_hints;
                expects_capture = false;
                file_hint = None;
                rank_hint = None;
                square
            }
            _ => return Err(malformed("Expected a destination square")),
        },
    };

    let candidates = origins
        .into_iter()
        .map(|from| Move::in_position(position, from, destination))
        .filter(|mv| move_is_valid(position, mv))
        .filter(|mv| file_hint.map_or(true, |file| mv.from().file() == file))
        .filter(|mv| rank_hint.map_or(true, |rank| mv.from().rank() == rank))
        .collect::<Vec<_>>();
    trace!("Candidates for {notation:?}: {candidates:?}");

    if candidates.len() > 1 {
        return Err(NotationError::AmbiguousMove {
            notation: notation.to_string(),
            candidates,
        });
    }
    let Some(&mv) = candidates.first() else {
        return Err(NotationError::NoLegalMove {
            notation: notation.to_string(),
        });
    };

    if expects_capture && !mv.is_capture() {
        return Err(NotationError::CaptureMismatch {
            notation: notation.to_string(),
            mv,
        });
    }

    if !rest.is_empty() {
        return Err(malformed(&format!("Unexpected trailing text {rest:?}")));
    }

    debug!("Parsed {notation:?} as {mv}");
    Ok(mv)
}

/// Castling is a King move from its home square, validated like any other King move.
fn parse_castling(
    notation: &str,
    side: CastlingSide,
    color: Color,
    position: &Position,
) -> Result<Move, NotationError> {
    let from = color.king_home();
    let king = Piece::new(color, PieceKind::King);

    if position.get_piece(from) != Some(king) {
        return Err(NotationError::NoMatchingPiece {
            notation: notation.to_string(),
            piece: king,
        });
    }

    let to = Square::new(side.king_destination(), color.home_rank());
    let mv = Move::in_position(position, from, to);

    if move_is_valid(position, &mv) {
        debug!("Parsed {notation:?} as {side:?} castling: {mv}");
        Ok(mv)
    } else {
        Err(NotationError::NoLegalMove {
            notation: notation.to_string(),
        })
    }
}

/// Consumes a file letter from the front of `text`, if there is one.
fn take_file(text: &mut &str) -> Option<File> {
    let file = File::from_char(text.chars().next()?).ok()?;
    *text = &text[1..];
    Some(file)
}

/// Consumes a rank digit from the front of `text`, if there is one.
fn take_rank(text: &mut &str) -> Option<Rank> {
    let rank = Rank::from_char(text.chars().next()?).ok()?;
    *text = &text[1..];
    Some(rank)
}

/// Consumes a full square from the front of `text`, leaving `text` untouched if there isn't one.
fn take_square(text: &mut &str) -> Option<Square> {
    let mut attempt = *text;
    let file = take_file(&mut attempt)?;
    let rank = take_rank(&mut attempt)?;
    *text = attempt;
    Some(Square::new(file, rank))
}

/// Consumes an `x` or `:` capture marker, returning whether one was present.
fn take_capture_marker(text: &mut &str) -> bool {
    match text.strip_prefix(&['x', ':'][..]) {
        Some(remaining) => {
            *text = remaining;
            true
        }
        None => false,
    }
}
