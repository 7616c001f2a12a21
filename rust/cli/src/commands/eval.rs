//! `eval`: combination report for five given faces.

use crate::commands::parse_dice;
use crate::error::CliError;
use std::io::Write;
use yam_engine::combination::{CombinationEvaluator, evaluate};
use yam_engine::dice_set::DiceSet;

pub fn handle_eval_command(dice: &str, json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let set = parse_dice(dice)?;
    if json {
        let line = serde_json::to_string(&evaluate(&set)).map_err(std::io::Error::other)?;
        writeln!(out, "{}", line)?;
    } else {
        write_report(&set, out)?;
    }
    Ok(())
}

/// Human-readable summary shared with `roll`.
pub(crate) fn write_report(set: &DiceSet, out: &mut dyn Write) -> Result<(), CliError> {
    let eval = CombinationEvaluator::from(set);
    writeln!(out, "Dice: {}", set)?;
    writeln!(out, "Total: {}", eval.total())?;
    writeln!(out, "Counts: {:?}", eval.counts().as_array())?;
    let combos = eval.combinations();
    if combos.is_empty() {
        writeln!(out, "Combinations: none")?;
    } else {
        let labels: Vec<&str> = combos.iter().map(|c| c.label()).collect();
        writeln!(out, "Combinations: {}", labels.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_report_lists_combinations() {
        let mut out = Vec::new();
        handle_eval_command("2,2,2,5,5", false, &mut out).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("Total: 16"));
        assert!(s.contains("Combinations: three of a kind, full house"));
    }

    #[test]
    fn nothing_reports_none() {
        let mut out = Vec::new();
        handle_eval_command("1 1 2 2 6", false, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Combinations: none"));
    }

    #[test]
    fn bad_dice_is_invalid_input() {
        let mut out = Vec::new();
        let err = handle_eval_command("1,2,3", false, &mut out).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }
}
