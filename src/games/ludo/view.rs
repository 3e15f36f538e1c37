//! Public snapshot handed to presentation layers.

use serde::Serialize;

use super::board::{token_coord, Coord};
use super::controller::{GameState, TurnPhase};
use super::types::{Color, TokenId, TokenState};

#[derive(Debug, Clone, Serialize)]
pub struct TokenView {
    pub id: TokenId,
    pub state: TokenState,
    pub progress: Option<u8>,
    pub coord: Coord,
    pub moveable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerSummary {
    pub color: Color,
    pub name: &'static str,
    pub computer: bool,
    pub at_base: usize,
    pub on_board: usize,
    pub finished: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameView {
    pub phase: TurnPhase,
    pub current: Color,
    pub current_is_computer: bool,
    pub dice: Option<u8>,
    pub moveable: Vec<TokenId>,
    pub winner: Option<Color>,
    pub message: String,
    pub tokens: Vec<TokenView>,
    pub players: Vec<PlayerSummary>,
}

impl GameState {
    pub fn view(&self) -> GameView {
        let tokens = self
            .board
            .iter_tokens()
            .map(|t| TokenView {
                id: t.id(),
                state: t.state,
                progress: t.progress,
                coord: token_coord(t),
                moveable: self.moveable.contains(&t.id()),
            })
            .collect();

        let players = self
            .board
            .seats()
            .map(|color| PlayerSummary {
                color,
                name: color.name(),
                computer: self.config.is_computer(color),
                at_base: self.board.count_in_state(color, TokenState::AtBase),
                on_board: self.board.count_in_state(color, TokenState::OnBoard),
                finished: self.board.count_in_state(color, TokenState::Finished),
            })
            .collect();

        GameView {
            phase: self.phase,
            current: self.current,
            current_is_computer: self.config.is_computer(self.current),
            dice: self.dice,
            moveable: self.moveable.clone(),
            winner: self.winner,
            message: self.message.clone(),
            tokens,
            players,
        }
    }
}
