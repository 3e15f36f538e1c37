//! Turn controller: a pure reducer from `(state, trigger)` to the next state.
//!
//! Phases run `Setup -> AwaitingRoll -> AwaitingSelection -> AwaitingRoll ...`
//! until a seat finishes all four tokens and the game enters `GameOver`.
//! Resolving a selection happens synchronously inside [`reduce`]; any pacing
//! or animation is left to the caller.

use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::rules::{
    apply_move, check_winner, legal_moves, move_path, next_player, next_seat, BONUS_ROLL,
    DIE_FACES, MAX_CONSECUTIVE_SIXES,
};
use super::types::{BoardState, Color, PlayerCount, TokenId};
use crate::engine::models::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    Setup,
    AwaitingRoll,
    AwaitingSelection,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    SetPlayerCount(u8),
    ToggleComputer(Color),
    Start,
    /// A die has been rolled with this value.
    Roll(u8),
    Select(TokenId),
    Reset,
}

/// Why a trigger was ignored. The state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("{trigger} is not accepted while {phase:?}")]
    WrongPhase {
        trigger: &'static str,
        phase: TurnPhase,
    },
    #[error("die value {0} is outside 1..=6")]
    InvalidDie(u8),
    #[error("token {0} cannot move now")]
    NotMoveable(TokenId),
    #[error("player count must be 2, 3 or 4, got {0}")]
    InvalidPlayerCount(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: TurnPhase,
    pub config: GameConfig,
    pub board: BoardState,
    pub current: Color,
    /// Last roll; kept across a bonus turn, cleared when the turn passes.
    pub dice: Option<u8>,
    pub consecutive_sixes: u8,
    pub moveable: Vec<TokenId>,
    pub winner: Option<Color>,
    pub message: String,
    pub rolls: u32,
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: GameState,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Pre-game state for `config`; tokens shown at base.
    pub fn setup(config: GameConfig) -> Self {
        let seats = config.seats();
        Self {
            phase: TurnPhase::Setup,
            board: BoardState::new(seats),
            current: seats[0],
            dice: None,
            consecutive_sixes: 0,
            moveable: Vec::new(),
            winner: None,
            message: "Choose players and start the game.".into(),
            rolls: 0,
            config,
        }
    }

    /// A game already past setup, waiting on the first roll.
    pub fn started(config: GameConfig) -> Self {
        let seats = config.seats();
        Self {
            phase: TurnPhase::AwaitingRoll,
            message: roll_prompt(seats[0]),
            ..Self::setup(config)
        }
    }

    pub fn seats(&self) -> &'static [Color] {
        self.config.seats()
    }

    pub fn is_computer_turn(&self) -> bool {
        matches!(self.phase, TurnPhase::AwaitingRoll | TurnPhase::AwaitingSelection)
            && self.config.is_computer(self.current)
    }

    fn pass_turn(&self, message: String) -> GameState {
        let next = next_seat(self.current, self.seats());
        GameState {
            phase: TurnPhase::AwaitingRoll,
            current: next,
            consecutive_sixes: 0,
            moveable: Vec::new(),
            message,
            ..self.clone()
        }
    }
}

fn roll_prompt(color: Color) -> String {
    format!("{color}'s turn. Roll the dice!")
}

fn expect_phase(
    state: &GameState,
    phase: TurnPhase,
    trigger: &'static str,
) -> Result<(), Rejection> {
    if state.phase == phase {
        Ok(())
    } else {
        Err(Rejection::WrongPhase {
            trigger,
            phase: state.phase,
        })
    }
}

/// Advance `state` by one trigger.
pub fn reduce(state: &GameState, trigger: Trigger) -> Result<Transition, Rejection> {
    match trigger {
        Trigger::SetPlayerCount(n) => set_player_count(state, n),
        Trigger::ToggleComputer(color) => toggle_computer(state, color),
        Trigger::Start => start(state),
        Trigger::Roll(value) => roll(state, value),
        Trigger::Select(id) => select(state, id),
        Trigger::Reset => Ok(reset(state)),
    }
}

/// Check that a roll would be accepted before drawing a die for it.
pub fn can_roll(state: &GameState) -> Result<(), Rejection> {
    expect_phase(state, TurnPhase::AwaitingRoll, "roll")
}

fn set_player_count(state: &GameState, n: u8) -> Result<Transition, Rejection> {
    expect_phase(state, TurnPhase::Setup, "set player count")?;
    let count = PlayerCount::try_from(n).map_err(|_| Rejection::InvalidPlayerCount(n))?;
    let config = GameConfig {
        player_count: count,
        ..state.config.clone()
    };
    Ok(Transition {
        state: GameState::setup(config),
        events: vec![],
    })
}

fn toggle_computer(state: &GameState, color: Color) -> Result<Transition, Rejection> {
    expect_phase(state, TurnPhase::Setup, "toggle computer")?;
    let mut next = state.clone();
    let flag = !next.config.is_computer(color);
    next.config.set_computer(color, flag);
    Ok(Transition {
        state: next,
        events: vec![],
    })
}

fn start(state: &GameState) -> Result<Transition, Rejection> {
    expect_phase(state, TurnPhase::Setup, "start")?;
    let next = GameState::started(state.config.clone());
    tracing::info!(
        seats = ?next.seats(),
        computer = ?next.config.computer_seats(),
        "game started"
    );
    let events = vec![GameEvent::GameStarted {
        seats: next.seats().to_vec(),
        computer: next.config.computer_seats(),
    }];
    Ok(Transition { state: next, events })
}

fn reset(state: &GameState) -> Transition {
    Transition {
        state: GameState::setup(state.config.clone()),
        events: vec![GameEvent::GameReset],
    }
}

fn roll(state: &GameState, value: u8) -> Result<Transition, Rejection> {
    can_roll(state)?;
    if !(1..=DIE_FACES).contains(&value) {
        return Err(Rejection::InvalidDie(value));
    }

    let player = state.current;
    let mut events = vec![GameEvent::DiceRolled { player, value }];
    let rolled = GameState {
        dice: Some(value),
        rolls: state.rolls + 1,
        ..state.clone()
    };

    if value == BONUS_ROLL && state.consecutive_sixes + 1 >= MAX_CONSECUTIVE_SIXES {
        let next = next_seat(player, state.seats());
        tracing::debug!(%player, "third six in a row, turn forfeited");
        events.push(GameEvent::TurnForfeited { player });
        events.push(GameEvent::TurnChanged { player: next });
        let state = rolled.pass_turn(format!("Three 6s in a row! Turn lost. {next}'s turn."));
        return Ok(Transition { state, events });
    }

    let moveable = legal_moves(&state.board, player, value);

    if moveable.is_empty() {
        let next = next_seat(player, state.seats());
        tracing::debug!(%player, value, "no legal moves");
        events.push(GameEvent::NoMoves { player, value });
        events.push(GameEvent::TurnChanged { player: next });
        let state = rolled.pass_turn(format!("No moves available. {next}'s turn."));
        return Ok(Transition { state, events });
    }

    let message = if moveable.len() == 1 {
        format!("Rolled {value}! Click your token to move.")
    } else {
        format!("Rolled {value}! Choose a token to move.")
    };
    let state = GameState {
        phase: TurnPhase::AwaitingSelection,
        consecutive_sixes: if value == BONUS_ROLL {
            state.consecutive_sixes + 1
        } else {
            0
        },
        moveable,
        message,
        ..rolled
    };
    Ok(Transition { state, events })
}

fn select(state: &GameState, id: TokenId) -> Result<Transition, Rejection> {
    expect_phase(state, TurnPhase::AwaitingSelection, "select")?;
    if !state.moveable.contains(&id) {
        return Err(Rejection::NotMoveable(id));
    }
    let dice = state
        .dice
        .unwrap_or_else(|| panic!("awaiting selection without a dice value"));
    let player = state.current;

    let path = move_path(state.board.token(id), dice);
    let outcome = apply_move(&state.board, id, dice);
    let mut events = vec![GameEvent::TokenMoved {
        token: id,
        from: outcome.from,
        to: outcome.to,
        kind: outcome.kind,
        path,
    }];
    if let Some(cap) = outcome.captured {
        events.push(GameEvent::TokenCaptured {
            by: id,
            victim: cap.token,
            cell: cap.cell,
        });
    }

    let resolved = GameState {
        board: outcome.board,
        moveable: Vec::new(),
        ..state.clone()
    };

    if check_winner(&resolved.board, player) {
        tracing::info!(winner = %player, rolls = resolved.rolls, "game over");
        events.push(GameEvent::GameWon { winner: player });
        let state = GameState {
            phase: TurnPhase::GameOver,
            winner: Some(player),
            message: format!("{player} wins!"),
            ..resolved
        };
        return Ok(Transition { state, events });
    }

    let captured = outcome.captured.is_some();
    let next = next_player(player, dice, captured, state.seats());
    let prefix = if captured { "Capture! " } else { "" };

    let state = if next == player {
        events.push(GameEvent::BonusTurn { player });
        GameState {
            phase: TurnPhase::AwaitingRoll,
            message: format!("{prefix}Bonus turn for {player}! Roll again."),
            ..resolved
        }
    } else {
        events.push(GameEvent::TurnChanged { player: next });
        GameState {
            phase: TurnPhase::AwaitingRoll,
            current: next,
            dice: None,
            consecutive_sixes: 0,
            message: format!("{prefix}{next}'s turn."),
            ..resolved
        }
    };
    Ok(Transition { state, events })
}
