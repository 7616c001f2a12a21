use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

use yam_engine::roll::RollRequest;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    /// Delay before each die settles, in milliseconds
    pub settle_ms: u64,
    /// Rattle the dice on every roll
    pub juggle: bool,
    /// How long a rattle lasts, in milliseconds
    pub juggle_timeout_ms: u64,
    pub style: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub settle_ms: ValueSource,
    pub juggle: ValueSource,
    pub juggle_timeout_ms: ValueSource,
    pub style: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            settle_ms: ValueSource::Default,
            juggle: ValueSource::Default,
            juggle_timeout_ms: ValueSource::Default,
            style: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            settle_ms: 0,
            juggle: false,
            juggle_timeout_ms: 250,
            style: None,
        }
    }
}

impl Config {
    /// Roll request for this configuration; `juggle` forces rattling on.
    pub fn roll_request(&self, juggle: bool) -> RollRequest {
        let mut req = RollRequest::default();
        if let Some(style) = &self.style {
            req = req.with_style(style.clone());
        }
        if juggle || self.juggle {
            req = req
                .juggling()
                .with_juggle_timeout(Duration::from_millis(self.juggle_timeout_ms));
        }
        req
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Defaults, then the TOML file named by `YAM_CONFIG`, then `YAM_*` variables.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("YAM_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.settle_ms {
            cfg.settle_ms = v;
            sources.settle_ms = ValueSource::File;
        }
        if let Some(v) = f.juggle {
            cfg.juggle = v;
            sources.juggle = ValueSource::File;
        }
        if let Some(v) = f.juggle_timeout_ms {
            cfg.juggle_timeout_ms = v;
            sources.juggle_timeout_ms = ValueSource::File;
        }
        if let Some(v) = f.style {
            cfg.style = Some(v);
            sources.style = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var("YAM_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(ms) = std::env::var("YAM_SETTLE_MS")
        && !ms.is_empty()
    {
        cfg.settle_ms = ms
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid settle_ms".into()))?;
        sources.settle_ms = ValueSource::Env;
    }
    if let Ok(j) = std::env::var("YAM_JUGGLE")
        && !j.is_empty()
    {
        cfg.juggle = parse_bool(&j).ok_or_else(|| ConfigError::Invalid("Invalid juggle".into()))?;
        sources.juggle = ValueSource::Env;
    }
    if let Ok(ms) = std::env::var("YAM_JUGGLE_TIMEOUT_MS")
        && !ms.is_empty()
    {
        cfg.juggle_timeout_ms = ms
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid juggle_timeout_ms".into()))?;
        sources.juggle_timeout_ms = ValueSource::Env;
    }
    if let Ok(style) = std::env::var("YAM_STYLE")
        && !style.is_empty()
    {
        cfg.style = Some(style);
        sources.style = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    settle_ms: Option<u64>,
    #[serde(default)]
    juggle: Option<bool>,
    #[serde(default)]
    juggle_timeout_ms: Option<u64>,
    #[serde(default)]
    style: Option<String>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.juggle && cfg.juggle_timeout_ms == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: juggle_timeout_ms must be >0 when juggle is on".into(),
        ));
    }
    if cfg.settle_ms > 10_000 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: settle_ms must be <=10000".into(),
        ));
    }
    Ok(())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
