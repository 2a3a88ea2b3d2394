/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use clap::error::ErrorKind;
use kibitz::{Console, ConsoleCommand};

fn main() {
    env_logger::init();

    let mut console = Console::new();

    // Skip the executable name
    let args = std::env::args().skip(1).collect::<Vec<_>>();

    // Greedily match the longest run of arguments that forms a command, then continue after it
    let mut arg_idx = args.len();
    let mut parsed_idx = 0;
    while parsed_idx < arg_idx {
        let slice = args[parsed_idx..arg_idx].join(" ");

        match slice.parse::<ConsoleCommand>() {
            Ok(cmd) => {
                log::debug!("Queued {cmd:?} from the command line");
                if let Err(e) = console.send_command(cmd) {
                    eprintln!("{e:#}");
                }
                parsed_idx = arg_idx;
                arg_idx = args.len();
            }

            // Edge case: `--help` and `--version` are both "error" cases according to Clap
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                println!("{e}");
                parsed_idx = arg_idx;
                arg_idx = args.len();
            }

            // Nothing starting here parses, so skip this argument entirely
            Err(e) if arg_idx - parsed_idx == 1 => {
                eprintln!("ERROR on input {slice:?}:\n{e}");
                parsed_idx = arg_idx;
                arg_idx = args.len();
            }

            Err(_) => arg_idx -= 1,
        }
    }

    if let Err(e) = console.run() {
        eprintln!("{} encountered an error: {e:#}", env!("CARGO_PKG_NAME"));
    }
}
