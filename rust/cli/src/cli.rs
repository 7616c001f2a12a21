//! Command-line surface of `yam`.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "yam",
    version,
    about = "Yam dice: hold, roll and read combinations"
)]
pub struct YamCli {
    /// Debug logging for the yam crates (overridden by YAM_LOG / RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate five face values
    Eval {
        /// Five faces, e.g. 1,2,3,4,5
        #[arg(long)]
        dice: String,
        #[arg(long)]
        json: bool,
    },
    /// Roll every die that is not held
    Roll {
        /// Current faces before the roll (default: unrolled)
        #[arg(long)]
        dice: Option<String>,
        /// Indices (0-4) to hold
        #[arg(long, value_delimiter = ',')]
        hold: Vec<usize>,
        /// Hold every die showing this face
        #[arg(long)]
        hold_value: Option<u8>,
        #[arg(long)]
        seed: Option<u64>,
        /// Rattle the dice until the juggle timeout
        #[arg(long)]
        juggle: bool,
        #[arg(long)]
        json: bool,
    },
    /// Play solo turns of up to three rolls and report combination frequencies
    Sim {
        #[arg(long, default_value_t = 100)]
        turns: u32,
        /// Write every roll as JSONL
        #[arg(long)]
        output: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Summarize a JSONL roll history
    Stats {
        #[arg(long)]
        input: String,
    },
    /// Show the resolved configuration
    Cfg,
}
