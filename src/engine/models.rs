//! Session configuration and game results shared by the session, arena and CLIs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::games::ludo::types::{Color, PlayerCount};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub player_count: PlayerCount,
    /// Computer control per seat, indexed by `Color::index()`.
    #[serde(default)]
    pub computer: [bool; 4],
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl GameConfig {
    pub fn new(player_count: PlayerCount) -> Self {
        Self {
            player_count,
            ..Default::default()
        }
    }

    pub fn seats(&self) -> &'static [Color] {
        self.player_count.seats()
    }

    pub fn is_computer(&self, color: Color) -> bool {
        self.computer[color.index()]
    }

    pub fn set_computer(&mut self, color: Color, computer: bool) {
        self.computer[color.index()] = computer;
    }

    /// Active seats under computer control.
    pub fn computer_seats(&self) -> Vec<Color> {
        self.seats()
            .iter()
            .copied()
            .filter(|&c| self.is_computer(c))
            .collect()
    }
}

/// Outcome of one finished (or abandoned) game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Option<Color>,
    /// Finished tokens per seat.
    pub finished: BTreeMap<Color, usize>,
    pub rolls: u32,
    #[serde(default = "default_reason")]
    pub reason: String,
}

fn default_reason() -> String {
    "normal".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computer_seats_only_lists_active_seats() {
        let mut config = GameConfig::new(PlayerCount::Two);
        config.set_computer(Color::Yellow, true);
        config.set_computer(Color::Green, true);
        assert_eq!(config.computer_seats(), vec![Color::Yellow]);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: GameConfig = toml::from_str("player_count = 3").unwrap();
        assert_eq!(config.player_count, PlayerCount::Three);
        assert_eq!(config.computer, [false; 4]);
        assert!(toml::from_str::<GameConfig>("player_count = 5").is_err());
    }
}
