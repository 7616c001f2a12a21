//! `stats`: combination frequencies over a JSONL roll history.

use crate::error::CliError;
use crate::io_utils::read_text_auto;
use crate::ui::{self, percent};
use std::collections::BTreeMap;
use std::io::Write;
use yam_engine::combination::{Combination, CombinationEvaluator};
use yam_engine::logger::RollRecord;

pub fn handle_stats_command(
    input: &str,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let content = read_text_auto(input)?;
    let has_trailing_nl = content.ends_with('\n');
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();

    let mut rolls = 0u64;
    let mut corrupted = 0u64;
    let mut skipped = 0u64;
    let mut mismatched = 0u64;
    let mut total_sum = 0u64;
    let mut tally: BTreeMap<Combination, u64> = BTreeMap::new();

    for (i, line) in lines.iter().enumerate() {
        let rec: RollRecord = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(_) => {
                // a torn final line is an interrupted write, not corruption
                if i == lines.len() - 1 && !has_trailing_nl {
                    skipped += 1;
                } else {
                    corrupted += 1;
                }
                continue;
            }
        };
        let eval = CombinationEvaluator::from_values(rec.values);
        if eval.combinations() != rec.combinations || eval.total() != rec.total {
            mismatched += 1;
        }
        rolls += 1;
        total_sum += eval.total() as u64;
        for combo in eval.combinations() {
            *tally.entry(combo).or_default() += 1;
        }
    }

    if corrupted > 0 {
        ui::display_warning(err, &format!("Skipped {} corrupted record(s)", corrupted))?;
    }
    if skipped > 0 {
        ui::display_warning(err, "Discarded incomplete final record")?;
    }
    if mismatched > 0 {
        ui::display_warning(
            err,
            &format!("{} record(s) disagree with their dice; recomputed", mismatched),
        )?;
    }

    let average = if rolls == 0 {
        0.0
    } else {
        total_sum as f64 / rolls as f64
    };
    writeln!(out, "Rolls: {}", rolls)?;
    writeln!(out, "Average total: {:.2}", average)?;
    for combo in Combination::all() {
        let n = tally.get(&combo).copied().unwrap_or(0);
        writeln!(out, "  {:<16} {:>6} ({}%)", combo.label(), n, percent(n, rolls))?;
    }
    Ok(())
}
