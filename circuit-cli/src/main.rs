//! Command-line entry point for the circuit crossing verifier
//!
//! Reads a `wire`/`done` layer description from standard input and writes
//! one of three outputs to standard output, selected by the `TRACE`
//! environment variable (see [`circuit_cli::output::Mode`]). No flags;
//! `clap` is used only for `--help`/`--version` ergonomics.

use std::io::{self, BufReader};
use std::process::ExitCode;

use circuit_cli::{input, output};
use clap::Parser;

/// Detects crossings between axis-aligned wires in a circuit layer
#[derive(Parser)]
#[command(version, about)]
struct Cli;

fn main() -> ExitCode {
    env_logger::init();
    Cli::parse();

    let stdin = io::stdin();
    let reader = BufReader::new(stdin.lock());

    let result = input::read_layer(reader).and_then(|layer| {
        let mode = output::Mode::from_env();
        let mut stdout = io::stdout().lock();
        output::run(&layer, mode, &mut stdout)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("circuit-cli: {err}");
            ExitCode::FAILURE
        }
    }
}
