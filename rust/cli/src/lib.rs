//! # yam CLI library
//!
//! Command-line driver for the Yam dice engine. It plays the caller's part
//! around the engine: it owns the dice set, applies hold gestures, rolls
//! through a seeded adapter and prints or records the results.
//!
//! ## Main Entry Point
//!
//! [`run`] parses arguments and dispatches to a subcommand, writing to the
//! given streams and returning the process exit code.
//!
//! ```
//! use std::io;
//! let args = vec!["yam", "eval", "--dice", "6,6,6,6,6"];
//! let code = yam_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `eval`: Evaluate five faces
//! - `roll`: Hold dice and roll the rest
//! - `sim`: Simulate solo turns, optionally writing a JSONL roll history
//! - `stats`: Summarize a roll history
//! - `cfg`: Display the resolved configuration

use clap::Parser;
use std::io::Write;
pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod io_utils;
pub mod logging;
pub mod ui;

use cli::{Commands, YamCli};
use commands::{
    RollArgs, handle_cfg_command, handle_eval_command, handle_roll_command, handle_sim_command,
    handle_stats_command,
};

pub use error::CliError;

/// Parses `args` and runs the selected command.
///
/// Returns `0` on success and `2` on any error, including usage errors.
/// `--help` and `--version` print to `out` and return `0`.
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match YamCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return exit_code::ERROR;
                    }
                    exit_code::SUCCESS
                }
                _ => {
                    let _ = write!(err, "{}", e);
                    exit_code::ERROR
                }
            };
        }
    };

    let result = match cli.cmd {
        Commands::Cfg => handle_cfg_command(out),
        Commands::Eval { dice, json } => handle_eval_command(&dice, json, out),
        Commands::Stats { input } => handle_stats_command(&input, out, err),
        Commands::Roll {
            dice,
            hold,
            hold_value,
            seed,
            juggle,
            json,
        } => config::load()
            .map_err(|e| CliError::Config(e.to_string()))
            .and_then(|cfg| {
                let args = RollArgs {
                    dice,
                    hold,
                    hold_value,
                    seed,
                    juggle,
                    json,
                };
                handle_roll_command(args, &cfg, out)
            }),
        Commands::Sim {
            turns,
            output,
            seed,
        } => config::load()
            .map_err(|e| CliError::Config(e.to_string()))
            .and_then(|cfg| handle_sim_command(turns, output, seed, &cfg, out)),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}
