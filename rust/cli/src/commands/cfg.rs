//! `cfg`: the resolved configuration and where each value came from.

use crate::config;
use crate::error::CliError;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let resolved = config::load_with_sources().map_err(|e| CliError::Config(e.to_string()))?;

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "seed": { "value": config.seed, "source": sources.seed },
        "settle_ms": { "value": config.settle_ms, "source": sources.settle_ms },
        "juggle": { "value": config.juggle, "source": sources.juggle },
        "juggle_timeout_ms": {
            "value": config.juggle_timeout_ms,
            "source": sources.juggle_timeout_ms,
        },
        "style": { "value": config.style, "source": sources.style },
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
