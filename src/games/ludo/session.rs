//! A running game: the reducer state plus the dice source and the bot that
//! plays computer seats. Front-ends talk to this type.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::controller::{can_roll, reduce, GameState, Rejection, Trigger, TurnPhase};
use super::events::GameEvent;
use super::rules::legal_moves;
use super::types::{Color, TokenId};
use super::view::GameView;
use crate::engine::bot_strategy::{BotStrategy, HeuristicStrategy};
use crate::engine::models::GameConfig;
use crate::engine::rng::{roll_dice, RandomSource};

/// Computer turns chained by [`LudoSession::run_computer`] before giving up.
const MAX_COMPUTER_STEPS: usize = 20_000;

/// Events produced by one accepted trigger and the view after it.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub events: Vec<GameEvent>,
    pub view: GameView,
}

pub struct LudoSession<R: RandomSource = StdRng> {
    state: GameState,
    rng: R,
    bot: Box<dyn BotStrategy>,
}

impl LudoSession<StdRng> {
    /// Seeded from `config.random_seed` when set, otherwise from entropy.
    pub fn from_config(config: GameConfig) -> Self {
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(config, rng)
    }
}

impl<R: RandomSource> LudoSession<R> {
    pub fn new(config: GameConfig, rng: R) -> Self {
        Self {
            state: GameState::setup(config),
            rng,
            bot: Box::new(HeuristicStrategy::default()),
        }
    }

    pub fn with_bot(mut self, bot: Box<dyn BotStrategy>) -> Self {
        self.bot = bot;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn view(&self) -> GameView {
        self.state.view()
    }

    pub fn phase(&self) -> TurnPhase {
        self.state.phase
    }

    pub fn bot_name(&self) -> &str {
        self.bot.name()
    }

    /// Feed one trigger to the reducer. A rejected trigger leaves the
    /// session untouched.
    pub fn dispatch(&mut self, trigger: Trigger) -> Result<StepResult, Rejection> {
        match reduce(&self.state, trigger) {
            Ok(transition) => {
                self.state = transition.state;
                for event in &transition.events {
                    tracing::trace!(?event, "game event");
                }
                Ok(StepResult {
                    events: transition.events,
                    view: self.state.view(),
                })
            }
            Err(rejection) => {
                tracing::debug!(?trigger, %rejection, "trigger ignored");
                Err(rejection)
            }
        }
    }

    pub fn set_player_count(&mut self, n: u8) -> Result<StepResult, Rejection> {
        self.dispatch(Trigger::SetPlayerCount(n))
    }

    pub fn toggle_computer(&mut self, color: Color) -> Result<StepResult, Rejection> {
        self.dispatch(Trigger::ToggleComputer(color))
    }

    pub fn start(&mut self) -> Result<StepResult, Rejection> {
        self.dispatch(Trigger::Start)
    }

    /// Roll the die for the current player. No die is drawn when the roll
    /// would be rejected.
    pub fn roll(&mut self) -> Result<StepResult, Rejection> {
        can_roll(&self.state)?;
        let value = roll_dice(&mut self.rng);
        self.dispatch(Trigger::Roll(value))
    }

    pub fn select(&mut self, id: TokenId) -> Result<StepResult, Rejection> {
        self.dispatch(Trigger::Select(id))
    }

    pub fn reset(&mut self) -> Result<StepResult, Rejection> {
        self.dispatch(Trigger::Reset)
    }

    /// Tokens the current player may move with the last roll.
    pub fn legal_moves(&self) -> Vec<TokenId> {
        match (self.state.phase, self.state.dice) {
            (TurnPhase::AwaitingSelection, Some(dice)) => {
                legal_moves(&self.state.board, self.state.current, dice)
            }
            _ => Vec::new(),
        }
    }

    pub fn is_computer_turn(&self) -> bool {
        self.state.is_computer_turn()
    }

    /// Take one action for a computer seat: roll, or pick a token.
    /// Returns `None` when it is not a computer's turn.
    pub fn step_computer(&mut self) -> Result<Option<StepResult>, Rejection> {
        if !self.is_computer_turn() {
            return Ok(None);
        }
        let step = match self.state.phase {
            TurnPhase::AwaitingRoll => self.roll()?,
            TurnPhase::AwaitingSelection => {
                let id = self.pick_for_computer();
                tracing::debug!(player = %self.state.current, token = %id, bot = self.bot.name(), "computer move");
                self.select(id)?
            }
            _ => return Ok(None),
        };
        Ok(Some(step))
    }

    /// Play computer turns until a human is to act or the game ends.
    pub fn run_computer(&mut self) -> Result<Vec<GameEvent>, Rejection> {
        let mut events = Vec::new();
        for _ in 0..MAX_COMPUTER_STEPS {
            match self.step_computer()? {
                Some(step) => events.extend(step.events),
                None => return Ok(events),
            }
        }
        tracing::warn!(steps = MAX_COMPUTER_STEPS, "computer turns did not settle");
        Ok(events)
    }

    fn pick_for_computer(&mut self) -> TokenId {
        let dice = self
            .state
            .dice
            .unwrap_or_else(|| panic!("awaiting selection without a dice value"));
        self.bot
            .choose_token(&self.state.board, self.state.current, dice, &mut self.rng)
            .filter(|id| self.state.moveable.contains(id))
            .or_else(|| self.state.moveable.first().copied())
            .unwrap_or_else(|| panic!("awaiting selection with no moveable tokens"))
    }
}
