//! Bot strategy trait and implementations.

use crate::engine::rng::RandomSource;
use crate::games::ludo::ai::{choose_token, AiWeights};
use crate::games::ludo::rules::legal_moves;
use crate::games::ludo::types::{BoardState, Color, TokenId};

/// A bot picks which token to move after a roll.
pub trait BotStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// `None` only when `color` has no legal move for `dice`.
    fn choose_token(
        &self,
        board: &BoardState,
        color: Color,
        dice: u8,
        rng: &mut dyn RandomSource,
    ) -> Option<TokenId>;
}

/// Picks a uniformly random legal token.
pub struct RandomStrategy;

impl BotStrategy for RandomStrategy {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_token(
        &self,
        board: &BoardState,
        color: Color,
        dice: u8,
        rng: &mut dyn RandomSource,
    ) -> Option<TokenId> {
        // Reservoir pick: keep the i-th candidate with probability 1/(i+1).
        let mut picked = None;
        for (i, id) in legal_moves(board, color, dice).into_iter().enumerate() {
            if i == 0 || rng.chance(1.0 / (i + 1) as f64) {
                picked = Some(id);
            }
        }
        picked
    }
}

/// The scoring bot from [`crate::games::ludo::ai`].
#[derive(Default)]
pub struct HeuristicStrategy {
    pub weights: AiWeights,
}

impl HeuristicStrategy {
    pub fn new(weights: AiWeights) -> Self {
        Self { weights }
    }
}

impl BotStrategy for HeuristicStrategy {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn choose_token(
        &self,
        board: &BoardState,
        color: Color,
        dice: u8,
        rng: &mut dyn RandomSource,
    ) -> Option<TokenId> {
        choose_token(board, color, dice, &self.weights, rng)
    }
}
