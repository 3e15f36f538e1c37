//! Bot-vs-bot arena runner.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::engine::bot_strategy::BotStrategy;
use crate::engine::models::{GameConfig, GameResult};
use crate::engine::rng::roll_dice;
use crate::error::LudoError;
use crate::games::ludo::controller::{reduce, GameState, Trigger, TurnPhase};
use crate::games::ludo::types::{Color, PlayerCount, TokenState};

/// Reducer steps before a game is abandoned as a draw.
const MAX_STEPS: usize = 20_000;

/// Aggregated results from an arena run.
pub struct ArenaResult {
    pub num_games: usize,
    pub wins: HashMap<String, usize>,
    pub draws: usize,
    /// Finished tokens per game, per strategy.
    pub total_scores: HashMap<String, Vec<f64>>,
    pub rolls: Vec<u32>,
    pub game_durations_ms: Vec<f64>,
}

impl ArenaResult {
    pub fn win_rate(&self, name: &str) -> f64 {
        *self.wins.get(name).unwrap_or(&0) as f64 / self.num_games.max(1) as f64
    }

    pub fn avg_score(&self, name: &str) -> f64 {
        let scores = self.total_scores.get(name);
        match scores {
            Some(s) if !s.is_empty() => s.iter().sum::<f64>() / s.len() as f64,
            _ => 0.0,
        }
    }

    pub fn score_stddev(&self, name: &str) -> f64 {
        let scores = match self.total_scores.get(name) {
            Some(s) if s.len() >= 2 => s,
            _ => return 0.0,
        };
        let avg = self.avg_score(name);
        let variance = scores.iter().map(|s| (s - avg).powi(2)).sum::<f64>() / (scores.len() - 1) as f64;
        variance.sqrt()
    }

    /// Wilson score interval for the win rate.
    pub fn confidence_interval_95(&self, name: &str) -> (f64, f64) {
        let n = self.num_games;
        if n == 0 {
            return (0.0, 0.0);
        }
        let p = self.win_rate(name);
        let z = 1.96_f64;
        let denom = 1.0 + z * z / n as f64;
        let center = (p + z * z / (2.0 * n as f64)) / denom;
        let margin = z * ((p * (1.0 - p) + z * z / (4.0 * n as f64)) / n as f64).sqrt() / denom;
        ((center - margin).max(0.0), (center + margin).min(1.0))
    }

    pub fn avg_rolls(&self) -> f64 {
        if self.rolls.is_empty() {
            return 0.0;
        }
        self.rolls.iter().map(|&r| r as f64).sum::<f64>() / self.rolls.len() as f64
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Arena Results ({} games)", self.num_games)];
        lines.push("=".repeat(60));
        let mut names: Vec<&String> = self.wins.keys().collect();
        names.sort();
        for name in names {
            let wr = self.win_rate(name);
            let (ci_lo, ci_hi) = self.confidence_interval_95(name);
            let avg = self.avg_score(name);
            let std = self.score_stddev(name);
            lines.push(format!(
                "  {:>12}: {:3} wins ({:5.1}%)  [95% CI: {:.1}%-{:.1}%]  home={:3.1} +/- {:3.1}",
                name,
                self.wins[name],
                wr * 100.0,
                ci_lo * 100.0,
                ci_hi * 100.0,
                avg,
                std,
            ));
        }
        lines.push(format!("  {:>12}: {}", "Draws", self.draws));
        lines.push(format!("  Avg rolls per game: {:.1}", self.avg_rolls()));
        if !self.game_durations_ms.is_empty() {
            let avg_ms = self.game_durations_ms.iter().sum::<f64>() / self.game_durations_ms.len() as f64;
            let total_s = self.game_durations_ms.iter().sum::<f64>() / 1000.0;
            lines.push(format!("  Avg game: {:.2}ms  |  Total: {:.1}s", avg_ms, total_s));
        }
        lines.join("\n")
    }
}

struct PlayedGame {
    /// Strategy name per seat, in seat order.
    seating: Vec<String>,
    seats: &'static [Color],
    result: GameResult,
    elapsed_ms: f64,
}

/// Run `num_games` between the given strategies, one seat each, and return
/// aggregated stats. Games run in parallel; game `i` is seeded with
/// `base_seed + i` so runs are reproducible.
pub fn run_arena(
    strategies: &HashMap<String, Box<dyn BotStrategy>>,
    num_games: usize,
    base_seed: u64,
    alternate_seats: bool,
    progress_callback: Option<&(dyn Fn(usize, usize) + Sync)>,
) -> Result<ArenaResult, LudoError> {
    let mut strategy_names: Vec<String> = strategies.keys().cloned().collect();
    strategy_names.sort();
    let num_players = strategy_names.len();
    let player_count = u8::try_from(num_players)
        .ok()
        .and_then(|n| PlayerCount::try_from(n).ok())
        .ok_or(LudoError::InvalidPlayerCount(num_players.min(u8::MAX as usize) as u8))?;

    tracing::info!(
        games = num_games,
        players = ?strategy_names,
        base_seed,
        alternate_seats,
        "arena started"
    );

    let done = AtomicUsize::new(0);
    let played: Vec<PlayedGame> = (0..num_games)
        .into_par_iter()
        .map(|game_idx| {
            let seating: Vec<String> = (0..num_players)
                .map(|i| {
                    let offset = if alternate_seats { game_idx } else { 0 };
                    strategy_names[(i + offset) % num_players].clone()
                })
                .collect();
            let bots: Vec<&dyn BotStrategy> =
                seating.iter().map(|n| strategies[n].as_ref()).collect();

            let mut config = GameConfig::new(player_count);
            config.random_seed = Some(base_seed + game_idx as u64);

            let t0 = Instant::now();
            let result = play_one_game(&config, &bots);
            let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;

            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(cb) = progress_callback {
                cb(finished, num_games);
            }
            PlayedGame {
                seating,
                seats: config.seats(),
                result,
                elapsed_ms,
            }
        })
        .collect();

    let mut result = ArenaResult {
        num_games,
        wins: strategy_names.iter().map(|n| (n.clone(), 0)).collect(),
        draws: 0,
        total_scores: strategy_names.iter().map(|n| (n.clone(), Vec::new())).collect(),
        rolls: Vec::with_capacity(num_games),
        game_durations_ms: Vec::with_capacity(num_games),
    };

    for game in played {
        result.game_durations_ms.push(game.elapsed_ms);
        result.rolls.push(game.result.rolls);
        for (name, color) in game.seating.iter().zip(game.seats) {
            let home = game.result.finished.get(color).copied().unwrap_or(0);
            if let Some(scores) = result.total_scores.get_mut(name) {
                scores.push(home as f64);
            }
        }
        match game.result.winner {
            Some(winner) => {
                let seat = game.seats.iter().position(|&c| c == winner);
                if let Some(count) = seat.and_then(|i| result.wins.get_mut(&game.seating[i])) {
                    *count += 1;
                }
            }
            None => result.draws += 1,
        }
    }

    tracing::info!(games = num_games, draws = result.draws, "arena finished");
    Ok(result)
}

/// Play one seeded game to completion, `bots[i]` controlling seat `i`.
pub fn play_one_game(config: &GameConfig, bots: &[&dyn BotStrategy]) -> GameResult {
    let seats = config.seats();
    assert_eq!(bots.len(), seats.len(), "one bot per seat");
    let mut rng = match config.random_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut state = GameState::started(config.clone());
    let mut reason = "normal";
    let mut steps = 0;
    while state.phase != TurnPhase::GameOver {
        if steps == MAX_STEPS {
            tracing::warn!(seed = ?config.random_seed, steps, "game abandoned");
            reason = "step_limit";
            break;
        }
        steps += 1;

        let trigger = match (state.phase, state.dice) {
            (TurnPhase::AwaitingSelection, Some(dice)) => {
                let seat = seats
                    .iter()
                    .position(|&c| c == state.current)
                    .unwrap_or_else(|| panic!("current player {} has no seat", state.current));
                let pick = bots[seat]
                    .choose_token(&state.board, state.current, dice, &mut rng)
                    .filter(|id| state.moveable.contains(id))
                    .or_else(|| state.moveable.first().copied());
                match pick {
                    Some(id) => Trigger::Select(id),
                    None => panic!("awaiting selection with no moveable tokens"),
                }
            }
            _ => Trigger::Roll(roll_dice(&mut rng)),
        };
        state = match reduce(&state, trigger) {
            Ok(t) => t.state,
            Err(rejection) => panic!("arena trigger rejected: {rejection}"),
        };
    }

    let finished: BTreeMap<Color, usize> = seats
        .iter()
        .map(|&c| (c, state.board.count_in_state(c, TokenState::Finished)))
        .collect();
    GameResult {
        winner: state.winner,
        finished,
        rolls: state.rolls,
        reason: reason.to_string(),
    }
}
