//! Events emitted by turn transitions, and the sound cues they trigger.

use serde::{Deserialize, Serialize};

use super::board::Coord;
use super::rules::MoveKind;
use super::types::{Color, TokenId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum GameEvent {
    GameStarted {
        seats: Vec<Color>,
        computer: Vec<Color>,
    },
    DiceRolled {
        player: Color,
        value: u8,
    },
    TurnForfeited {
        player: Color,
    },
    NoMoves {
        player: Color,
        value: u8,
    },
    TokenMoved {
        token: TokenId,
        from: Option<u8>,
        to: u8,
        kind: MoveKind,
        path: Vec<Coord>,
    },
    TokenCaptured {
        by: TokenId,
        victim: TokenId,
        cell: usize,
    },
    BonusTurn {
        player: Color,
    },
    TurnChanged {
        player: Color,
    },
    GameWon {
        winner: Color,
    },
    GameReset,
}

/// Discrete sound triggers for the audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    DiceRoll,
    Six,
    TokenOut,
    TokenMove,
    TokenHome,
    Capture,
    NoMoves,
    TurnChange,
    Win,
}

impl GameEvent {
    pub fn sound_cue(&self) -> Option<SoundCue> {
        match self {
            GameEvent::DiceRolled { value: 6, .. } => Some(SoundCue::Six),
            GameEvent::DiceRolled { .. } => Some(SoundCue::DiceRoll),
            GameEvent::TurnForfeited { .. } | GameEvent::NoMoves { .. } => Some(SoundCue::NoMoves),
            GameEvent::TokenMoved { kind, .. } => Some(match kind {
                MoveKind::Released => SoundCue::TokenOut,
                MoveKind::Finished => SoundCue::TokenHome,
                MoveKind::Advanced | MoveKind::EnteredHomeLane => SoundCue::TokenMove,
            }),
            GameEvent::TokenCaptured { .. } => Some(SoundCue::Capture),
            GameEvent::TurnChanged { .. } => Some(SoundCue::TurnChange),
            GameEvent::GameWon { .. } => Some(SoundCue::Win),
            GameEvent::GameStarted { .. } | GameEvent::BonusTurn { .. } | GameEvent::GameReset => {
                None
            }
        }
    }
}
