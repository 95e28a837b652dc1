use std::path::PathBuf;

use thiserror::Error;

use crate::assessment::scoring::ScoringMode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    Sqlite(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub scoring: ScoringMode,
    /// Pins the placeholder score draws.
    pub score_seed: Option<u64>,
    /// JSON catalog to use instead of the built-in questions.
    pub catalog_path: Option<PathBuf>,
    pub storage: StorageKind,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, which returns `None` for unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let scoring = match lookup("ASSESSMENT_SCORING") {
            Some(raw) => raw.parse::<ScoringMode>().map_err(|reason| ConfigError::Invalid {
                name: "ASSESSMENT_SCORING",
                reason,
            })?,
            None => ScoringMode::default(),
        };

        let score_seed = lookup("ASSESSMENT_SCORE_SEED")
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    name: "ASSESSMENT_SCORE_SEED",
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let catalog_path = lookup("ASSESSMENT_CATALOG")
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        let storage = match lookup("DIALOGUE_STORAGE") {
            None => StorageKind::Memory,
            Some(raw) => parse_storage(&raw)?,
        };

        Ok(Self {
            scoring,
            score_seed,
            catalog_path,
            storage,
        })
    }
}

fn parse_storage(raw: &str) -> Result<StorageKind, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("memory") {
        return Ok(StorageKind::Memory);
    }
    match raw.split_once(':') {
        Some(("sqlite", path)) if !path.is_empty() => Ok(StorageKind::Sqlite(PathBuf::from(path))),
        _ => Err(ConfigError::Invalid {
            name: "DIALOGUE_STORAGE",
            reason: format!("expected \"memory\" or \"sqlite:<path>\", got {raw:?}"),
        }),
    }
}
