//! `roll`: apply hold gestures, then roll the remaining dice once.

use crate::commands::{eval::write_report, parse_dice, runtime};
use crate::config::Config;
use crate::error::CliError;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use yam_engine::combination::evaluate;
use yam_engine::dice_set::DiceSet;
use yam_engine::die::{DICE_COUNT, is_face};
use yam_engine::roll::RollCoordinator;
use yam_engine::roller::SeededRoller;
use yam_engine::selection::toggle_held_by_value;

#[derive(Debug, Clone, Default)]
pub struct RollArgs {
    pub dice: Option<String>,
    pub hold: Vec<usize>,
    pub hold_value: Option<u8>,
    pub seed: Option<u64>,
    pub juggle: bool,
    pub json: bool,
}

pub fn handle_roll_command(
    args: RollArgs,
    cfg: &Config,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let mut dice = match &args.dice {
        Some(text) => parse_dice(text)?,
        None => DiceSet::new(),
    };
    apply_holds(&mut dice, &args.hold, args.hold_value)?;

    let seed = args.seed.or(cfg.seed).unwrap_or_else(rand::random);
    let roller = SeededRoller::new(seed).with_settle_delay(cfg.settle_delay());
    let coordinator = RollCoordinator::new(Arc::new(roller));
    let request = cfg.roll_request(args.juggle);

    let outcome = runtime()?.block_on(coordinator.roll_unheld(&mut dice, &request))?;
    tracing::debug!(seed, rolled = ?outcome.rolled, "roll command finished");

    if args.json {
        let line = json!({
            "seed": seed,
            "rolled": outcome.rolled,
            "held": dice.held_mask(),
            "evaluation": evaluate(&dice),
        });
        writeln!(out, "{}", line)?;
    } else {
        writeln!(out, "Seed: {}", seed)?;
        if outcome.is_empty() {
            writeln!(out, "All dice held, nothing rolled")?;
        } else {
            writeln!(out, "Rolled: {:?}", outcome.rolled)?;
        }
        write_report(&dice, out)?;
    }
    Ok(())
}

fn apply_holds(dice: &mut DiceSet, hold: &[usize], hold_value: Option<u8>) -> Result<(), CliError> {
    for &index in hold {
        if index >= DICE_COUNT {
            return Err(CliError::InvalidInput(format!(
                "hold index {} out of range (0-{})",
                index,
                DICE_COUNT - 1
            )));
        }
        // holding is idempotent, a repeated index stays held
        dice.set_held(index, true);
    }
    if let Some(face) = hold_value {
        if !is_face(face) {
            return Err(CliError::InvalidInput(format!(
                "hold value {} is not a face (1-6)",
                face
            )));
        }
        if toggle_held_by_value(dice, face, true) == 0 {
            tracing::debug!(face, "no die shows the held value");
        }
    }
    Ok(())
}
