//! Ludo rules engine: board geometry, token model, move rules, the AI and
//! the turn controller.

pub mod ai;
pub mod board;
pub mod controller;
pub mod events;
pub mod rules;
pub mod session;
pub mod types;
pub mod view;

pub use controller::{reduce, GameState, Rejection, Transition, Trigger, TurnPhase};
pub use session::{LudoSession, StepResult};
pub use types::{BoardState, Color, PlayerCount, Token, TokenId, TokenState};
