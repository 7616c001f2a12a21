//! Command handler modules for the `yam` CLI.
//!
//! Each command lives in its own file and exposes
//! `handle_COMMAND_command(...) -> Result<(), CliError>`, taking its output
//! streams as `&mut dyn Write`.

mod cfg;
mod eval;
mod roll;
mod sim;
mod stats;

pub use cfg::handle_cfg_command;
pub use eval::handle_eval_command;
pub use roll::{RollArgs, handle_roll_command};
pub use sim::handle_sim_command;
pub use stats::handle_stats_command;

use crate::error::CliError;
use yam_engine::dice_set::DiceSet;

/// Current-thread runtime driving the roll coordinator.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?)
}

pub(crate) fn parse_dice(text: &str) -> Result<DiceSet, CliError> {
    text.parse::<DiceSet>()
        .map_err(|e| CliError::InvalidInput(e.to_string()))
}
