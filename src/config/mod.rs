use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::generator::GeneratorSettings;

const DEFAULT_OUTPUT: &str = "positions.json";
const DEFAULT_COUNT: usize = 150;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Number of positions per run.
    pub count: usize,
    pub output_path: PathBuf,
    /// Fixed seed for reproducible ledgers; entropy-seeded when unset.
    pub seed: Option<u64>,
    pub generator: GeneratorSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            seed: None,
            generator: GeneratorSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults, set but
    /// malformed keys are errors.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = GeneratorSettings::default();

        let config = Self {
            count: parse_or(&lookup, "FIXTURE_COUNT", DEFAULT_COUNT)?,
            output_path: lookup("FIXTURE_OUTPUT")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| DEFAULT_OUTPUT.into()),
            seed: lookup("FIXTURE_SEED")
                .map(|raw| raw.trim().parse::<u64>())
                .transpose()
                .map_err(|e| anyhow::anyhow!("FIXTURE_SEED is not a valid u64: {e}"))?,
            generator: GeneratorSettings {
                open_probability: parse_or(
                    &lookup,
                    "FIXTURE_OPEN_PROBABILITY",
                    defaults.open_probability,
                )?,
                open_price_jitter: parse_or(
                    &lookup,
                    "FIXTURE_OPEN_PRICE_JITTER",
                    defaults.open_price_jitter,
                )?,
                close_price_jitter: parse_or(
                    &lookup,
                    "FIXTURE_CLOSE_PRICE_JITTER",
                    defaults.close_price_jitter,
                )?,
                max_holding_days: parse_or(
                    &lookup,
                    "FIXTURE_MAX_HOLDING_DAYS",
                    defaults.max_holding_days,
                )?,
            },
        };

        config.generator.validate()?;
        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{key} has invalid value {raw:?}: {e}")),
        None => Ok(default),
    }
}
