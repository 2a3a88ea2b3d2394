/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::HashSet;

use once_cell::sync::Lazy;

use super::{Color, File, Move, Piece, PieceKind, Position, Square};

/// A `(file, rank)` step on the board.
type Delta = (i8, i8);

/// The four diagonal directions.
static BISHOP_DIRECTIONS: Lazy<Vec<Delta>> = Lazy::new(|| {
    let mut directions = Vec::with_capacity(4);
    for df in [-1, 1] {
        for dr in [-1, 1] {
            directions.push((df, dr));
        }
    }
    directions
});

/// The four orthogonal directions.
static ROOK_DIRECTIONS: Lazy<Vec<Delta>> = Lazy::new(|| {
    let mut directions = Vec::with_capacity(4);
    for df in -1i8..=1 {
        for dr in -1i8..=1 {
            if df.abs() + dr.abs() == 1 {
                directions.push((df, dr));
            }
        }
    }
    directions
});

/// All eight directions. Also the eight single steps of a King.
static QUEEN_DIRECTIONS: Lazy<Vec<Delta>> = Lazy::new(|| {
    let mut directions = Vec::with_capacity(8);
    for df in -1i8..=1 {
        for dr in -1i8..=1 {
            if df != 0 || dr != 0 {
                directions.push((df, dr));
            }
        }
    }
    directions
});

/// The eight L-shaped leaps of a Knight.
static KNIGHT_DELTAS: Lazy<Vec<Delta>> = Lazy::new(|| {
    let mut deltas = Vec::with_capacity(8);
    for df in -2i8..=2 {
        for dr in -2i8..=2 {
            if df.abs() + dr.abs() == 3 {
                deltas.push((df, dr));
            }
        }
    }
    deltas
});

/// Generates every destination the piece on `square` may move to.
///
/// Returns an empty list if `square` is empty.
///
/// Moves are pseudo-legal with respect to pins: a move that exposes the mover's own King is still generated.
/// King moves, however, never step onto an attacked square or next to the enemy King.
///
/// # Example
/// ```
/// # use kibitz::{generate_moves_for_piece, Position, Square};
/// let position = Position::starting();
/// assert_eq!(generate_moves_for_piece(&position, Square::B1).len(), 2);
/// assert!(generate_moves_for_piece(&position, Square::E4).is_empty());
/// ```
pub fn generate_moves_for_piece(position: &Position, square: Square) -> Vec<Move> {
    let Some(piece) = position.get_piece(square) else {
        return Vec::new();
    };

    match piece.kind() {
        PieceKind::Pawn => pawn_moves(position, square, piece),
        PieceKind::Knight => knight_moves(position, square, piece),
        PieceKind::Bishop => sliding_moves(position, square, piece, &BISHOP_DIRECTIONS),
        PieceKind::Rook => sliding_moves(position, square, piece, &ROOK_DIRECTIONS),
        PieceKind::Queen => sliding_moves(position, square, piece, &QUEEN_DIRECTIONS),
        PieceKind::King => king_moves(position, square, piece),
    }
}

/// Generates the moves of every piece of `color`, in ascending order of origin square.
pub fn generate_moves_for_color(position: &Position, color: Color) -> Vec<Move> {
    position
        .iter()
        .filter(|(_, piece)| piece.color() == color)
        .flat_map(|(square, _)| generate_moves_for_piece(position, square))
        .collect()
}

/// Returns `true` if `mv.to()` is among the destinations generated for the piece on `mv.from()`.
///
/// # Example
/// ```
/// # use kibitz::{move_is_valid, Move, Position, Square};
/// let position = Position::starting();
/// assert!(move_is_valid(&position, &Move::new(Square::E2, Square::E4)));
/// assert!(!move_is_valid(&position, &Move::new(Square::E2, Square::E5)));
/// ```
pub fn move_is_valid(position: &Position, mv: &Move) -> bool {
    generate_moves_for_piece(position, mv.from())
        .iter()
        .any(|candidate| candidate.to() == mv.to())
}

/// Every square that a piece of `color` could capture on, were an enemy piece standing there.
///
/// This differs from the union of `color`'s move destinations in two places:
///  - Pawns threaten both forward diagonals whether or not anything stands there.
///  - Kings threaten their plain adjacent steps only. They are generated without an attacked-square set and
///    without the rule keeping Kings apart, which would otherwise need the opposing King's threats in turn.
pub fn squares_under_attack(position: &Position, color: Color) -> HashSet<Square> {
    let mut attacked = HashSet::new();

    for (square, piece) in position.iter().filter(|(_, piece)| piece.color() == color) {
        match piece.kind() {
            PieceKind::Pawn => attacked.extend(pawn_attacks(position, square, piece)),

            PieceKind::King => attacked.extend(
                king_steps(position, square, piece, &HashSet::new(), None)
                    .into_iter()
                    .map(|mv| mv.to()),
            ),

            _ => attacked.extend(
                generate_moves_for_piece(position, square)
                    .into_iter()
                    .map(|mv| mv.to()),
            ),
        }
    }

    attacked
}

/// Returns `true` if `square` is empty or holds a piece that `piece` could capture.
#[inline(always)]
fn is_free_or_enemy(position: &Position, square: Square, piece: Piece) -> bool {
    position
        .get_piece(square)
        .map_or(true, |occupant| occupant.is_enemy_of(piece))
}

fn pawn_moves(position: &Position, from: Square, pawn: Piece) -> Vec<Move> {
    let mut moves = Vec::with_capacity(4);
    let forward = pawn.color().forward();

    // Pushes are blocked by any piece, friend or foe
    if let Some(one_step) = from.offset(0, forward) {
        if !position.has_piece(one_step) {
            moves.push(Move::in_position(position, from, one_step));

            if from.rank() == pawn.color().pawn_rank() {
                if let Some(two_steps) = from.offset(0, 2 * forward) {
                    if !position.has_piece(two_steps) {
                        moves.push(Move::in_position(position, from, two_steps));
                    }
                }
            }
        }
    }

    // Diagonals are only ever captures
    for df in [-1, 1] {
        let Some(to) = from.offset(df, forward) else {
            continue;
        };

        if position
            .get_piece(to)
            .is_some_and(|occupant| occupant.is_enemy_of(pawn))
        {
            moves.push(Move::in_position(position, from, to));
        }
    }

    moves
}

/// Both forward diagonals of a pawn, empty or not, unless a friendly piece stands there.
fn pawn_attacks(position: &Position, from: Square, pawn: Piece) -> impl Iterator<Item = Square> + '_ {
    let forward = pawn.color().forward();
    [-1, 1]
        .into_iter()
        .filter_map(move |df| from.offset(df, forward))
        .filter(move |&to| is_free_or_enemy(position, to, pawn))
}

fn knight_moves(position: &Position, from: Square, knight: Piece) -> Vec<Move> {
    KNIGHT_DELTAS
        .iter()
        .filter_map(|&(df, dr)| from.offset(df, dr))
        .filter(|&to| is_free_or_enemy(position, to, knight))
        .map(|to| Move::in_position(position, from, to))
        .collect()
}

/// Walks outward along each direction until the edge of the board or the first occupied square,
/// which is included only if it holds an enemy piece.
fn sliding_moves(position: &Position, from: Square, slider: Piece, directions: &[Delta]) -> Vec<Move> {
    let mut moves = Vec::new();

    for &(df, dr) in directions {
        let mut current = from;
        while let Some(to) = current.offset(df, dr) {
            match position.get_piece(to) {
                None => moves.push(Move::in_position(position, from, to)),
                Some(occupant) => {
                    if occupant.is_enemy_of(slider) {
                        moves.push(Move::in_position(position, from, to));
                    }
                    break;
                }
            }
            current = to;
        }
    }

    moves
}

fn king_moves(position: &Position, from: Square, king: Piece) -> Vec<Move> {
    let color = king.color();
    let attacked = squares_under_attack(position, color.opponent());
    let enemy_king = position.king_square(color.opponent());

    let mut moves = king_steps(position, from, king, &attacked, enemy_king);
    moves.extend(castling_moves(position, from, king, &attacked));
    moves
}

/// Single King steps onto squares that are free or hold an enemy, are not in `attacked`,
/// and are not within one step of `enemy_king`.
///
/// The square of the enemy King itself is also within one step, so it can never be "captured" this way.
fn king_steps(
    position: &Position,
    from: Square,
    king: Piece,
    attacked: &HashSet<Square>,
    enemy_king: Option<Square>,
) -> Vec<Move> {
    QUEEN_DIRECTIONS
        .iter()
        .filter_map(|&(df, dr)| from.offset(df, dr))
        .filter(|&to| is_free_or_enemy(position, to, king))
        .filter(|to| !attacked.contains(to))
        .filter(|&to| {
            enemy_king.map_or(true, |enemy| {
                to.distance_files(enemy) > 1 || to.distance_ranks(enemy) > 1
            })
        })
        .map(|to| Move::in_position(position, from, to))
        .collect()
}

/// Castling moves for a King standing on its home square.
///
/// The King must not be attacked, and neither may any square it passes over or lands on.
/// The Rook's own path may be attacked.
fn castling_moves(
    position: &Position,
    from: Square,
    king: Piece,
    attacked: &HashSet<Square>,
) -> Vec<Move> {
    let color = king.color();
    let mut moves = Vec::with_capacity(2);

    if from != color.king_home() || attacked.contains(&from) {
        return moves;
    }

    let rank = color.home_rank();
    let rook = Piece::new(color, PieceKind::Rook);
    let square = |file| Square::new(file, rank);
    let all_empty = |files: &[File]| files.iter().all(|&file| !position.has_piece(square(file)));
    let none_attacked = |files: &[File]| files.iter().all(|&file| !attacked.contains(&square(file)));

    if position.short_castling_possible(color)
        && position.get_piece(square(File::H)) == Some(rook)
        && all_empty(&[File::F, File::G])
        && none_attacked(&[File::F, File::G])
    {
        moves.push(Move::in_position(position, from, square(File::G)));
    }

    // The b-file must be empty for the Rook to pass, but the King never crosses it
    if position.long_castling_possible(color)
        && position.get_piece(square(File::A)) == Some(rook)
        && all_empty(&[File::B, File::C, File::D])
        && none_attacked(&[File::D, File::C])
    {
        moves.push(Move::in_position(position, from, square(File::C)));
    }

    moves
}

#[cfg(test)]
mod test {
    use super::*;

    /// Builds a position holding exactly the provided pieces.
    fn position_with(pieces: &[(Piece, Square)]) -> Position {
        let mut position = Position::new();
        for &(piece, square) in pieces {
            position.add_piece(piece, square);
        }
        position
    }

    /// Checks that the moves generated from `from` reach exactly `legal`, ignoring order.
    fn destinations_match(position: &Position, from: Square, legal: &[Square]) {
        let moves = generate_moves_for_piece(position, from);
        let mut found = moves.iter().map(|mv| mv.to()).collect::<Vec<_>>();
        let mut expected = legal.to_vec();
        found.sort();
        expected.sort();
        assert_eq!(found, expected, "\nMoves from {from}: {moves:?}");
    }

    #[test]
    fn direction_tables() {
        assert_eq!(BISHOP_DIRECTIONS.len(), 4);
        assert_eq!(ROOK_DIRECTIONS.len(), 4);
        assert_eq!(QUEEN_DIRECTIONS.len(), 8);
        assert_eq!(KNIGHT_DELTAS.len(), 8);
        assert!(KNIGHT_DELTAS
            .iter()
            .all(|&(df, dr)| df != 0 && dr != 0 && df.abs() + dr.abs() == 3));
    }

    #[test]
    fn direction_tables_are_shared_across_threads() {
        let handles = (0..4)
            .map(|_| std::thread::spawn(|| QUEEN_DIRECTIONS.as_ptr() as usize))
            .collect::<Vec<_>>();
        let addresses = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<HashSet<_>>();
        assert_eq!(addresses.len(), 1);
    }

    #[test]
    fn empty_square_has_no_moves() {
        let position = Position::starting();
        for square in Square::iter().filter(|&sq| !position.has_piece(sq)) {
            assert!(generate_moves_for_piece(&position, square).is_empty());
        }
    }

    /* Pawns */

    #[test]
    fn white_pawn_on_starting_rank() {
        let position = position_with(&[(Piece::WHITE_PAWN, Square::E2)]);
        destinations_match(&position, Square::E2, &[Square::E3, Square::E4]);
    }

    #[test]
    fn black_pawn_moves_down() {
        let position = position_with(&[(Piece::BLACK_PAWN, Square::E2)]);
        destinations_match(&position, Square::E2, &[Square::E1]);

        let position = position_with(&[(Piece::BLACK_PAWN, Square::D7)]);
        destinations_match(&position, Square::D7, &[Square::D6, Square::D5]);
    }

    #[test]
    fn pawn_blocked_by_any_piece() {
        for blocker in [Piece::WHITE_KNIGHT, Piece::BLACK_KNIGHT] {
            let position = position_with(&[(Piece::WHITE_PAWN, Square::E2), (blocker, Square::E3)]);
            destinations_match(&position, Square::E2, &[]);
        }
    }

    #[test]
    fn pawn_blocked_on_two_square_advance() {
        let position = position_with(&[
            (Piece::WHITE_PAWN, Square::E2),
            (Piece::WHITE_KNIGHT, Square::E4),
        ]);
        destinations_match(&position, Square::E2, &[Square::E3]);
    }

    #[test]
    fn pawn_off_starting_rank_advances_once() {
        let position = position_with(&[(Piece::WHITE_PAWN, Square::E3)]);
        destinations_match(&position, Square::E3, &[Square::E4]);
    }

    #[test]
    fn pawn_captures_diagonally() {
        let position = position_with(&[
            (Piece::WHITE_PAWN, Square::E4),
            (Piece::BLACK_BISHOP, Square::D5),
            (Piece::BLACK_KNIGHT, Square::F5),
        ]);
        destinations_match(&position, Square::E4, &[Square::E5, Square::D5, Square::F5]);
    }

    #[test]
    fn pawn_cannot_capture_own_pieces() {
        let position = position_with(&[
            (Piece::WHITE_PAWN, Square::E4),
            (Piece::WHITE_BISHOP, Square::D5),
            (Piece::WHITE_KNIGHT, Square::F5),
        ]);
        destinations_match(&position, Square::E4, &[Square::E5]);
    }

    #[test]
    fn pawn_on_edge_file() {
        let position = position_with(&[
            (Piece::WHITE_PAWN, Square::A3),
            (Piece::BLACK_BISHOP, Square::B4),
        ]);
        destinations_match(&position, Square::A3, &[Square::A4, Square::B4]);

        let position = position_with(&[
            (Piece::BLACK_PAWN, Square::H6),
            (Piece::WHITE_BISHOP, Square::G5),
        ]);
        destinations_match(&position, Square::H6, &[Square::H5, Square::G5]);
    }

    #[test]
    fn pawn_on_last_rank_has_no_moves() {
        let position = position_with(&[(Piece::WHITE_PAWN, Square::C8)]);
        destinations_match(&position, Square::C8, &[]);
    }

    /* Sliders */

    #[test]
    fn bishop_cornered() {
        let position = position_with(&[(Piece::WHITE_BISHOP, Square::A1)]);
        assert_eq!(generate_moves_for_piece(&position, Square::A1).len(), 7);
        // The direction table is only built once, so a second call does not double up
        assert_eq!(generate_moves_for_piece(&position, Square::A1).len(), 7);
    }

    #[test]
    fn bishop_in_the_middle_of_an_empty_board() {
        let position = position_with(&[(Piece::WHITE_BISHOP, Square::E4)]);
        destinations_match(
            &position,
            Square::E4,
            &[
                Square::D3,
                Square::C2,
                Square::B1,
                Square::D5,
                Square::C6,
                Square::B7,
                Square::A8,
                Square::F3,
                Square::G2,
                Square::H1,
                Square::F5,
                Square::G6,
                Square::H7,
            ],
        );
    }

    #[test]
    fn bishop_blocked_by_enemies() {
        let position = position_with(&[
            (Piece::WHITE_BISHOP, Square::E4),
            (Piece::BLACK_BISHOP, Square::G6),
            (Piece::BLACK_BISHOP, Square::F3),
            (Piece::BLACK_BISHOP, Square::D5),
            (Piece::BLACK_BISHOP, Square::D3),
        ]);
        destinations_match(
            &position,
            Square::E4,
            &[Square::F5, Square::G6, Square::F3, Square::D5, Square::D3],
        );
    }

    #[test]
    fn bishop_blocked_by_friends() {
        let position = position_with(&[
            (Piece::WHITE_BISHOP, Square::E4),
            (Piece::WHITE_BISHOP, Square::G6),
            (Piece::WHITE_BISHOP, Square::F3),
            (Piece::WHITE_BISHOP, Square::D5),
            (Piece::WHITE_BISHOP, Square::D3),
        ]);
        destinations_match(&position, Square::E4, &[Square::F5]);
    }

    #[test]
    fn bishops_in_opposite_corners() {
        let position = position_with(&[
            (Piece::WHITE_BISHOP, Square::A1),
            (Piece::WHITE_BISHOP, Square::H8),
        ]);
        assert_eq!(generate_moves_for_piece(&position, Square::A1).len(), 6);
        assert_eq!(generate_moves_for_piece(&position, Square::H8).len(), 6);

        let position = position_with(&[
            (Piece::WHITE_BISHOP, Square::A1),
            (Piece::BLACK_BISHOP, Square::H8),
        ]);
        assert_eq!(generate_moves_for_piece(&position, Square::A1).len(), 7);
        assert_eq!(generate_moves_for_piece(&position, Square::H8).len(), 7);
    }

    #[test]
    fn rook_cornered() {
        let position = position_with(&[(Piece::BLACK_ROOK, Square::H8)]);
        assert_eq!(generate_moves_for_piece(&position, Square::H8).len(), 14);
    }

    #[test]
    fn rook_blockers() {
        let position = position_with(&[
            (Piece::WHITE_ROOK, Square::D4),
            (Piece::WHITE_PAWN, Square::D2),
            (Piece::BLACK_PAWN, Square::D6),
            (Piece::BLACK_KNIGHT, Square::B4),
        ]);
        destinations_match(
            &position,
            Square::D4,
            &[
                Square::D3,
                Square::D5,
                Square::D6,
                Square::B4,
                Square::C4,
                Square::E4,
                Square::F4,
                Square::G4,
                Square::H4,
            ],
        );
    }

    #[test]
    fn queen_in_the_middle_of_an_empty_board() {
        let position = position_with(&[(Piece::WHITE_QUEEN, Square::D4)]);
        assert_eq!(generate_moves_for_piece(&position, Square::D4).len(), 27);
    }

    /* Knights */

    #[test]
    fn knight_in_the_middle_of_an_empty_board() {
        let position = position_with(&[(Piece::BLACK_KNIGHT, Square::C6)]);
        destinations_match(
            &position,
            Square::C6,
            &[
                Square::B8,
                Square::D8,
                Square::E7,
                Square::E5,
                Square::D4,
                Square::B4,
                Square::A5,
                Square::A7,
            ],
        );
    }

    #[test]
    fn knight_in_a_corner() {
        let position = position_with(&[(Piece::WHITE_KNIGHT, Square::A1)]);
        destinations_match(&position, Square::A1, &[Square::B3, Square::C2]);
    }

    #[test]
    fn knight_on_starting_position() {
        let position = Position::starting();
        destinations_match(&position, Square::B1, &[Square::A3, Square::C3]);
    }

    #[test]
    fn knight_leaps_over_blockers() {
        let mut position = position_with(&[(Piece::BLACK_KNIGHT, Square::C6)]);
        for square in [
            Square::B5,
            Square::B6,
            Square::B7,
            Square::C5,
            Square::C7,
            Square::D5,
            Square::D6,
            Square::D7,
        ] {
            position.add_piece(Piece::BLACK_ROOK, square);
        }
        assert_eq!(generate_moves_for_piece(&position, Square::C6).len(), 8);
    }

    #[test]
    fn knight_captures_enemies_only() {
        let position = position_with(&[
            (Piece::WHITE_KNIGHT, Square::A1),
            (Piece::BLACK_PAWN, Square::B3),
            (Piece::BLACK_PAWN, Square::C2),
        ]);
        destinations_match(&position, Square::A1, &[Square::B3, Square::C2]);

        let position = position_with(&[
            (Piece::WHITE_KNIGHT, Square::A1),
            (Piece::WHITE_PAWN, Square::B3),
            (Piece::WHITE_PAWN, Square::C2),
        ]);
        destinations_match(&position, Square::A1, &[]);
    }

    /* Kings */

    #[test]
    fn king_in_the_middle_of_an_empty_board() {
        let position = position_with(&[(Piece::BLACK_KING, Square::C6)]);
        assert_eq!(generate_moves_for_piece(&position, Square::C6).len(), 8);
    }

    #[test]
    fn king_on_starting_position() {
        let position = Position::starting();
        destinations_match(&position, Square::E1, &[]);
    }

    #[test]
    fn king_cannot_approach_enemy_king() {
        let position = position_with(&[
            (Piece::BLACK_KING, Square::A1),
            (Piece::WHITE_KING, Square::C2),
        ]);
        destinations_match(&position, Square::A1, &[Square::A2]);
    }

    #[test]
    fn kings_never_generate_adjacent_squares() {
        let position = position_with(&[
            (Piece::WHITE_KING, Square::D4),
            (Piece::BLACK_KING, Square::F5),
        ]);
        for (from, enemy) in [(Square::D4, Square::F5), (Square::F5, Square::D4)] {
            for mv in generate_moves_for_piece(&position, from) {
                assert!(
                    mv.to().distance_files(enemy) > 1 || mv.to().distance_ranks(enemy) > 1,
                    "{mv} lands next to the enemy king"
                );
            }
        }
    }

    #[test]
    fn king_can_capture() {
        let position = position_with(&[
            (Piece::BLACK_KING, Square::A1),
            (Piece::WHITE_QUEEN, Square::B2),
        ]);
        destinations_match(&position, Square::A1, &[Square::B2]);
    }

    #[test]
    fn king_avoids_pawn_diagonals() {
        let position = position_with(&[
            (Piece::WHITE_KING, Square::E4),
            (Piece::BLACK_PAWN, Square::D6),
        ]);
        let moves = generate_moves_for_piece(&position, Square::E4);
        assert!(!moves.contains(&Move::new(Square::E4, Square::E5)));
        assert!(!moves.contains(&Move::new(Square::E4, Square::C5)));
        assert!(moves.contains(&Move::new(Square::E4, Square::D5)));
    }

    #[test]
    fn king_can_castle() {
        let position = position_with(&[
            (Piece::WHITE_KING, Square::E1),
            (Piece::WHITE_ROOK, Square::H1),
        ]);
        destinations_match(
            &position,
            Square::E1,
            &[
                Square::E2,
                Square::D1,
                Square::F1,
                Square::D2,
                Square::F2,
                Square::G1,
            ],
        );
    }

    #[test]
    fn king_cannot_castle_with_an_enemy_rook() {
        let position = position_with(&[
            (Piece::WHITE_KING, Square::E1),
            (Piece::BLACK_ROOK, Square::H1),
        ]);
        let moves = generate_moves_for_piece(&position, Square::E1);
        assert!(!moves.contains(&Move::new(Square::E1, Square::G1)));
    }

    #[test]
    fn king_cannot_castle_through_pieces() {
        let position = position_with(&[
            (Piece::WHITE_KING, Square::E1),
            (Piece::WHITE_ROOK, Square::A1),
            (Piece::WHITE_KNIGHT, Square::B1),
        ]);
        let moves = generate_moves_for_piece(&position, Square::E1);
        assert!(!moves.contains(&Move::new(Square::E1, Square::C1)));
    }

    #[test]
    fn king_cannot_castle_after_moving() {
        let mut position = position_with(&[
            (Piece::WHITE_KING, Square::E1),
            (Piece::WHITE_PAWN, Square::D2),
            (Piece::WHITE_PAWN, Square::E2),
            (Piece::WHITE_PAWN, Square::F2),
            (Piece::WHITE_ROOK, Square::H1),
        ]);
        position.make_move(Square::E1, Square::D1);
        position.make_move(Square::D1, Square::E1);
        destinations_match(&position, Square::E1, &[Square::D1, Square::F1]);
    }

    #[test]
    fn king_cannot_castle_after_rook_has_moved() {
        let mut position = position_with(&[
            (Piece::WHITE_KING, Square::E1),
            (Piece::WHITE_PAWN, Square::D2),
            (Piece::WHITE_PAWN, Square::E2),
            (Piece::WHITE_PAWN, Square::F2),
            (Piece::WHITE_ROOK, Square::A1),
        ]);
        position.make_move(Square::A1, Square::B1);
        position.make_move(Square::B1, Square::A1);
        destinations_match(&position, Square::E1, &[Square::D1, Square::F1]);
    }

    #[test]
    fn king_cannot_castle_when_in_check() {
        let position = position_with(&[
            (Piece::BLACK_KING, Square::E8),
            (Piece::BLACK_ROOK, Square::H8),
            (Piece::WHITE_QUEEN, Square::E4),
        ]);
        destinations_match(
            &position,
            Square::E8,
            &[Square::D8, Square::F8, Square::D7, Square::F7],
        );
    }

    #[test]
    fn king_cannot_castle_through_attacked_squares() {
        let mut position = position_with(&[
            (Piece::BLACK_KING, Square::E8),
            (Piece::BLACK_ROOK, Square::A8),
            (Piece::WHITE_BISHOP, Square::H4),
            (Piece::WHITE_ROOK, Square::H7),
        ]);
        destinations_match(&position, Square::E8, &[Square::F8]);

        // Protect the castling route
        position.add_piece(Piece::BLACK_PAWN, Square::F6);
        destinations_match(&position, Square::E8, &[Square::F8, Square::D8, Square::C8]);
    }

    #[test]
    fn king_cannot_castle_onto_attacked_square() {
        let mut position = position_with(&[
            (Piece::BLACK_KING, Square::E8),
            (Piece::BLACK_ROOK, Square::A8),
            (Piece::WHITE_BISHOP, Square::H3),
            (Piece::WHITE_ROOK, Square::H7),
        ]);
        destinations_match(&position, Square::E8, &[Square::D8, Square::F8]);

        // Protect the castling destination
        position.add_piece(Piece::BLACK_PAWN, Square::E6);
        destinations_match(&position, Square::E8, &[Square::D8, Square::F8, Square::C8]);
    }

    #[test]
    fn rook_may_castle_through_attacked_squares() {
        let position = position_with(&[
            (Piece::BLACK_KING, Square::E8),
            (Piece::BLACK_ROOK, Square::A8),
            (Piece::WHITE_ROOK, Square::B1),
            (Piece::WHITE_ROOK, Square::H7),
        ]);
        destinations_match(&position, Square::E8, &[Square::F8, Square::D8, Square::C8]);
    }

    #[test]
    fn rook_may_castle_while_attacked() {
        let position = position_with(&[
            (Piece::BLACK_KING, Square::E8),
            (Piece::BLACK_ROOK, Square::A8),
            (Piece::WHITE_ROOK, Square::A1),
            (Piece::WHITE_ROOK, Square::H7),
        ]);
        destinations_match(&position, Square::E8, &[Square::F8, Square::D8, Square::C8]);
    }

    /* Attacked squares */

    #[test]
    fn pawn_attacks_empty_squares() {
        let position = position_with(&[(Piece::WHITE_PAWN, Square::B3)]);
        let attacked = squares_under_attack(&position, Color::White);
        assert_eq!(attacked, HashSet::from([Square::A4, Square::C4]));
    }

    #[test]
    fn pawn_attacks_enemies_but_not_friends() {
        let position = position_with(&[
            (Piece::BLACK_PAWN, Square::B2),
            (Piece::WHITE_KNIGHT, Square::C1),
            (Piece::BLACK_BISHOP, Square::A1),
        ]);
        let attacked = squares_under_attack(&position, Color::Black);
        assert!(attacked.contains(&Square::C1));
        assert!(!attacked.contains(&Square::A1));
        assert!(!attacked.contains(&Square::B1));
    }

    #[test]
    fn knight_attacks_eight_squares() {
        let position = position_with(&[
            (Piece::WHITE_KNIGHT, Square::E4),
            (Piece::BLACK_KNIGHT, Square::G5),
        ]);
        assert_eq!(squares_under_attack(&position, Color::White).len(), 8);
    }

    #[test]
    fn king_attacks_ignore_the_enemy_king() {
        let position = position_with(&[
            (Piece::WHITE_KING, Square::D4),
            (Piece::BLACK_KING, Square::F4),
        ]);
        let attacked = squares_under_attack(&position, Color::White);
        assert_eq!(attacked.len(), 8);
        assert!(attacked.contains(&Square::E4));
    }

    #[test]
    fn every_generated_move_is_valid() {
        let mut position = Position::starting();
        position.make_move(Square::E2, Square::E4);
        position.make_move(Square::D7, Square::D5);
        position.make_move(Square::G1, Square::F3);

        for color in Color::all() {
            for mv in generate_moves_for_color(&position, color) {
                assert!(move_is_valid(&position, &mv), "{mv} was not valid");
            }
        }
    }

    #[test]
    fn starting_position_has_twenty_moves_per_side() {
        let position = Position::starting();
        assert_eq!(generate_moves_for_color(&position, Color::White).len(), 20);
        assert_eq!(generate_moves_for_color(&position, Color::Black).len(), 20);
    }
}
