//! Injectable randomness for dice rolls and AI tie-breaks.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::Rng;

use crate::games::ludo::rules::DIE_FACES;

/// Source of the two kinds of randomness the game needs.
pub trait RandomSource {
    /// Uniform die face in `1..=6`.
    fn roll_die(&mut self) -> u8;

    /// `true` with the given probability.
    fn chance(&mut self, probability: f64) -> bool;
}

impl RandomSource for StdRng {
    fn roll_die(&mut self) -> u8 {
        self.gen_range(1..=DIE_FACES)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.gen_bool(probability.clamp(0.0, 1.0))
    }
}

/// Replays queued dice and coin flips; for tests and scripted games.
///
/// Running out of dice is a programming error and panics. Running out of
/// coin flips answers `false`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    rolls: VecDeque<u8>,
    flips: VecDeque<bool>,
}

impl ScriptedSource {
    pub fn new(rolls: impl IntoIterator<Item = u8>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            flips: VecDeque::new(),
        }
    }

    pub fn with_flips(mut self, flips: impl IntoIterator<Item = bool>) -> Self {
        self.flips.extend(flips);
        self
    }

    pub fn push_roll(&mut self, value: u8) {
        self.rolls.push_back(value);
    }

    pub fn remaining_rolls(&self) -> usize {
        self.rolls.len()
    }
}

impl RandomSource for ScriptedSource {
    fn roll_die(&mut self) -> u8 {
        let value = self.rolls.pop_front().expect("scripted dice exhausted");
        assert!(
            (1..=DIE_FACES).contains(&value),
            "scripted die value {value} out of range"
        );
        value
    }

    fn chance(&mut self, _probability: f64) -> bool {
        self.flips.pop_front().unwrap_or(false)
    }
}

/// Roll one die.
pub fn roll_dice(rng: &mut dyn RandomSource) -> u8 {
    rng.roll_die()
}
