use serde::{Deserialize, Serialize};

use crate::combination::{evaluate, Combination};
use crate::dice_set::DiceSet;
use crate::die::DICE_COUNT;

/// One completed roll as written to a JSONL roll history.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RollRecord {
    /// Unique identifier for this roll (format: YYYYMMDD-NNNNNN)
    pub roll_id: String,
    /// Seed of the roller that produced the faces, when known
    pub seed: Option<u64>,
    /// Faces after the roll, in index order
    pub values: [u8; DICE_COUNT],
    /// Which dice were held during the roll
    pub held: [bool; DICE_COUNT],
    /// Indices that were rolled
    pub rolled: Vec<usize>,
    pub total: u32,
    pub combinations: Vec<Combination>,
    /// Timestamp (RFC3339), filled in on write when missing
    #[serde(default)]
    pub ts: Option<String>,
}

impl RollRecord {
    pub fn from_dice(
        roll_id: String,
        seed: Option<u64>,
        dice: &DiceSet,
        rolled: Vec<usize>,
    ) -> Self {
        let eval = evaluate(dice);
        Self {
            roll_id,
            seed,
            values: eval.values,
            held: dice.held_mask(),
            rolled,
            total: eval.total,
            combinations: eval.combinations,
            ts: None,
        }
    }
}

pub fn format_roll_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct RollLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl RollLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    /// Logger that only hands out ids, for tests and dry runs.
    pub fn detached(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_roll_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &RollRecord) -> std::io::Result<()> {
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
