//! Named bot profiles: a strategy type plus AI weight overrides.
//! Loaded from TOML at runtime for the game and arena CLIs.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::engine::bot_strategy::{BotStrategy, HeuristicStrategy, RandomStrategy};
use crate::error::LudoError;
use crate::games::ludo::ai::AiWeights;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    #[default]
    Heuristic,
    Random,
}

/// A named bot profile.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct BotProfile {
    pub description: Option<String>,
    #[serde(default)]
    pub strategy_type: StrategyType,
    /// Partial overrides; weights not listed keep their defaults.
    #[serde(default)]
    pub weights: AiWeights,
}

impl BotProfile {
    pub fn build_strategy(&self) -> Box<dyn BotStrategy> {
        match self.strategy_type {
            StrategyType::Random => Box::new(RandomStrategy),
            StrategyType::Heuristic => Box::new(HeuristicStrategy::new(self.weights)),
        }
    }
}

/// Maps difficulty tiers to profile names.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProductionConfig {
    pub easy: Option<String>,
    pub medium: Option<String>,
    pub hard: Option<String>,
    pub default: Option<String>,
}

impl ProductionConfig {
    /// Resolve a difficulty tier to a profile name.
    pub fn resolve(&self, difficulty: &str) -> Option<&str> {
        match difficulty {
            "easy" => self.easy.as_deref(),
            "medium" => self.medium.as_deref(),
            "hard" => self.hard.as_deref(),
            _ => self.default.as_deref(),
        }
    }
}

/// Top-level TOML file structure.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct BotProfilesFile {
    #[serde(default)]
    pub profiles: HashMap<String, BotProfile>,
    #[serde(default)]
    pub production: ProductionConfig,
}

impl BotProfilesFile {
    /// Look up `name` as a profile, then as a difficulty tier, then as a
    /// built-in strategy (`heuristic` or `random`). An unmapped `default`
    /// tier falls back to `heuristic`.
    pub fn profile(&self, name: &str) -> Result<BotProfile, LudoError> {
        if let Some(p) = self.profiles.get(name) {
            return Ok(p.clone());
        }
        if matches!(name, "easy" | "medium" | "hard" | "default") {
            if let Some(p) = self.production.resolve(name).and_then(|n| self.profiles.get(n)) {
                return Ok(p.clone());
            }
        }
        match name {
            "heuristic" | "default" => Ok(BotProfile::default()),
            "random" => Ok(BotProfile {
                strategy_type: StrategyType::Random,
                ..Default::default()
            }),
            other => Err(LudoError::UnknownProfile(other.to_string())),
        }
    }

    pub fn strategy(&self, name: &str) -> Result<Box<dyn BotStrategy>, LudoError> {
        Ok(self.profile(name)?.build_strategy())
    }
}

/// Load profiles from a TOML file at the given path.
pub fn load_profiles(path: &Path) -> Result<BotProfilesFile, LudoError> {
    let content = std::fs::read_to_string(path).map_err(|source| LudoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| LudoError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

/// Try to load profiles from well-known paths, returning a default if none found.
pub fn load_default_profiles() -> BotProfilesFile {
    let candidates = [
        "bot_profiles.toml",
        "../bot_profiles.toml",
        "/etc/ludo/bot_profiles.toml",
    ];
    for path in &candidates {
        let p = Path::new(path);
        if p.exists() {
            match load_profiles(p) {
                Ok(profiles) => {
                    tracing::info!(path = %p.display(), count = profiles.profiles.len(), "loaded bot profiles");
                    return profiles;
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "failed to load bot profiles");
                }
            }
        }
    }
    tracing::info!("no bot_profiles.toml found, using built-in defaults");
    BotProfilesFile::default()
}
