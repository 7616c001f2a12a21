//! `sim`: solo turns of up to three rolls.
//!
//! Each turn starts from unrolled dice. After every roll the player keeps
//! the most common face and rerolls the rest; a Yam ends the turn early.

use crate::commands::runtime;
use crate::config::Config;
use crate::error::CliError;
use crate::ui::percent;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;
use yam_engine::combination::{Combination, CombinationEvaluator};
use yam_engine::dice_set::DiceSet;
use yam_engine::logger::{RollLogger, RollRecord};
use yam_engine::roll::RollCoordinator;
use yam_engine::roller::SeededRoller;
use yam_engine::selection::toggle_held_by_value;

const ROLLS_PER_TURN: usize = 3;

pub fn handle_sim_command(
    turns: u32,
    output: Option<String>,
    seed: Option<u64>,
    cfg: &Config,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if turns == 0 {
        return Err(CliError::InvalidInput("turns must be at least 1".into()));
    }
    let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
    let coordinator = RollCoordinator::new(Arc::new(
        SeededRoller::new(seed).with_settle_delay(cfg.settle_delay()),
    ));
    let request = cfg.roll_request(false);
    let mut logger = match &output {
        Some(path) => Some(RollLogger::create(path)?),
        None => None,
    };

    let rt = runtime()?;
    let mut tally: BTreeMap<Combination, u64> = BTreeMap::new();
    let mut rolls = 0u64;
    let mut dice = DiceSet::new();

    for _ in 0..turns {
        dice.clear();
        for _ in 0..ROLLS_PER_TURN {
            let outcome = rt.block_on(coordinator.roll_unheld(&mut dice, &request))?;
            rolls += 1;
            if let Some(logger) = logger.as_mut() {
                let id = logger.next_id();
                logger.write(&RollRecord::from_dice(id, Some(seed), &dice, outcome.rolled))?;
            }
            let eval = CombinationEvaluator::from(&dice);
            if eval.is_yam() {
                break;
            }
            dice.release_all();
            if let Some(face) = eval.counts().most_common() {
                toggle_held_by_value(&mut dice, face, true);
            }
        }
        for combo in CombinationEvaluator::from(&dice).combinations() {
            *tally.entry(combo).or_default() += 1;
        }
    }
    tracing::info!(turns, rolls, seed, "simulation finished");

    writeln!(out, "Seed: {}", seed)?;
    writeln!(out, "Turns: {}  Rolls: {}", turns, rolls)?;
    for combo in Combination::all() {
        let n = tally.get(&combo).copied().unwrap_or(0);
        writeln!(
            out,
            "  {:<16} {:>6} ({}%)",
            combo.label(),
            n,
            percent(n, turns as u64)
        )?;
    }
    if let Some(path) = output {
        writeln!(out, "Rolls written to {}", path)?;
    }
    Ok(())
}
