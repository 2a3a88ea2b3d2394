/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use clap::{error::ErrorKind, CommandFactory, Parser};

use crate::{Color, Piece, Square};

/// A command to be sent to the console.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<COMMAND> | <MOVE>")
)]
pub enum ConsoleCommand {
    /// Print every square attacked by a color.
    ///
    /// Defaults to the side to move.
    Attacks { color: Option<Color> },

    /// Print the castling rights that remain, such as `KQkq`.
    Castling,

    /// Print a visual representation of the current board state.
    #[command(aliases = ["d", "print"])]
    Display,

    /// Quit the console.
    #[command(alias = "quit")]
    Exit,

    /// Shows all moves for the side to move, or for the piece on a specific square.
    Moves {
        square: Option<Square>,

        /// If set, moves will be sorted in alphabetical order.
        ///
        /// By default, moves are listed in order of their origin square.
        #[arg(short, long, default_value = "false")]
        sort: bool,
    },

    /// Start over from the standard starting position.
    New,

    /// Place a piece on the provided square.
    ///
    /// No enforcement of legality, and the turn does not pass.
    Place { piece: Piece, square: Square },

    /// Remove the piece at the provided square.
    Take { square: Square },

    /// Play a move written in short algebraic notation, such as `e4`, `Nxf3` or `0-0`.
    #[command(skip)]
    Play { notation: String },
}

impl FromStr for ConsoleCommand {
    type Err = clap::Error;
    /// Attempt to parse a [`ConsoleCommand`] from a string.
    ///
    /// If this fails and the input is a single word that does not name a command,
    /// it is taken to be a move in algebraic notation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words = s.split_ascii_whitespace().collect::<Vec<_>>();

        match Self::try_parse_from(words.iter().copied()) {
            Ok(cmd) => Ok(cmd),

            // `help` is reported as an error, but it is not a move
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                Err(e)
            }

            Err(e) => match words.as_slice() {
                [word] if Self::command().find_subcommand(word).is_none() => Ok(Self::Play {
                    notation: word.to_string(),
                }),
                _ => Err(e),
            },
        }
    }
}
