/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    io,
    sync::mpsc::{channel, Receiver, Sender},
    thread,
};

use anyhow::{bail, Context, Result};
use log::debug;

use crate::{
    generate_moves_for_color, generate_moves_for_piece, squares_under_attack, ConsoleCommand,
    Game, Move,
};

/// An interactive two-player chess board on the terminal.
#[derive(Debug)]
pub struct Console {
    /// The game being played.
    ///
    /// This is modified whenever moves are played or pieces are placed,
    /// and is reset by the `new` command.
    game: Game,

    /// One half of a channel, responsible for sending commands to the console to execute.
    sender: Sender<ConsoleCommand>,

    /// One half of a channel, responsible for receiving commands for the console to execute.
    receiver: Receiver<ConsoleCommand>,
}

impl Console {
    /// Constructs a new [`Console`] instance to be executed with [`Console::run`].
    pub fn new() -> Self {
        let (sender, receiver) = channel();

        Self {
            game: Game::default(),
            sender,
            receiver,
        }
    }

    /// Returns a string of the console's name and current version.
    pub fn name(&self) -> String {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    #[inline(always)]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// Sends a [`ConsoleCommand`] to the console to be executed once [`Console::run`] is called.
    pub fn send_command(&self, command: ConsoleCommand) -> Result<()> {
        self.sender
            .send(command)
            .context("Failed to queue command for the console")
    }

    /// Execute the main event loop for the console.
    ///
    /// This function spawns a thread to handle input from `stdin` and waits on received commands.
    pub fn run(&mut self) -> Result<()> {
        // Spawn a separate thread for handling user input
        let sender = self.sender.clone();
        thread::spawn(|| {
            if let Err(err) = input_handler(sender) {
                debug!("Input handler thread stopping: {err}");
            }
        });

        println!("{}\n\n{}", self.name(), self.game);

        // Loop on user input
        while let Ok(cmd) = self.receiver.recv() {
            debug!("Received {cmd:?}");

            if cmd == ConsoleCommand::Exit {
                break;
            }

            // Keep running, even on error
            match self.execute(cmd) {
                Ok(output) if output.is_empty() => {}
                Ok(output) => println!("{output}"),
                Err(e) => eprintln!("Error: {e:#}"),
            }
        }

        Ok(())
    }

    /// Executes a single command, returning whatever it has to say.
    ///
    /// [`ConsoleCommand::Exit`] has no effect here, since it is up to the caller to stop sending commands.
    pub fn execute(&mut self, command: ConsoleCommand) -> Result<String> {
        let output = match command {
            ConsoleCommand::Attacks { color } => {
                let color = color.unwrap_or(self.game.side_to_move());
                let mut squares = squares_under_attack(self.game.position(), color)
                    .into_iter()
                    .collect::<Vec<_>>();
                squares.sort();

                if squares.is_empty() {
                    String::from("(none)")
                } else {
                    squares
                        .into_iter()
                        .map(|square| square.to_string())
                        .collect::<Vec<_>>()
                        .join(" ")
                }
            }

            ConsoleCommand::Castling => self.game.castling_rights_uci(),

            ConsoleCommand::Display => self.game.to_string(),

            ConsoleCommand::Exit => String::new(),

            ConsoleCommand::Moves { square, sort } => {
                let moves = if let Some(square) = square {
                    generate_moves_for_piece(self.game.position(), square)
                } else {
                    generate_moves_for_color(self.game.position(), self.game.side_to_move())
                };

                moves_to_string(moves, sort)
            }

            ConsoleCommand::New => {
                self.game = Game::default();
                self.game.to_string()
            }

            ConsoleCommand::Place { piece, square } => {
                self.game.position_mut().add_piece(piece, square);
                String::new()
            }

            ConsoleCommand::Take { square } => {
                if !self.game.has_piece(square) {
                    bail!("There is no piece on {square}");
                }
                self.game.position_mut().remove_piece(square);
                String::new()
            }

            ConsoleCommand::Play { notation } => {
                let mv = self
                    .game
                    .play(&notation)
                    .with_context(|| format!("Couldn't play {notation:?}"))?;
                format!("{mv}\n\n{}", self.game)
            }
        };

        Ok(output)
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

/// Joins moves by comma-space, or `(none)` if there are none.
fn moves_to_string(moves: Vec<Move>, sort: bool) -> String {
    if moves.is_empty() {
        return String::from("(none)");
    }

    let mut moves = moves.into_iter().map(|mv| mv.to_string()).collect::<Vec<_>>();
    if sort {
        moves.sort();
    }
    moves.join(", ")
}

/// Loops endlessly to await input via `stdin`, sending all successfully-parsed commands through the supplied `sender`.
fn input_handler(sender: Sender<ConsoleCommand>) -> Result<()> {
    let mut buffer = String::with_capacity(256);

    loop {
        // Clear the buffer, read input, and trim the trailing newline
        buffer.clear();
        let bytes = io::stdin()
            .read_line(&mut buffer)
            .context("Failed to read line from stdin")?;

        // For ctrl + d
        if 0 == bytes {
            sender
                .send(ConsoleCommand::Exit)
                .context("Failed to send 'exit' command after receiving empty input")?;

            bail!("Console received input of 0 bytes and is quitting");
        }

        let buf = buffer.trim();

        // Ignore empty lines
        if buf.is_empty() {
            continue;
        }

        match buf.parse::<ConsoleCommand>() {
            Ok(cmd) => sender
                .send(cmd)
                .context("Failed to send command to console")?,

            // If it was neither a command nor a move, print a usage message.
            Err(err) => eprintln!("{err}"),
        }
    }
}
