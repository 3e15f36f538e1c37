//! Domain types for Ludo: colors, tokens and the board snapshot.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::board::{ring_cell_for, FINISH, HOME_LANE_START};
use crate::error::LudoError;

pub const TOKENS_PER_PLAYER: usize = 4;

/// One of the four fixed seats. Seat identity never changes during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Green, Color::Yellow, Color::Blue];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Color> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Green => "Green",
            Color::Yellow => "Yellow",
            Color::Blue => "Blue",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = LudoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" | "0" => Ok(Color::Red),
            "green" | "1" => Ok(Color::Green),
            "yellow" | "2" => Ok(Color::Yellow),
            "blue" | "3" => Ok(Color::Blue),
            _ => Err(LudoError::UnknownColor(s.to_string())),
        }
    }
}

/// Supported player counts. Anything else is rejected at the boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayerCount {
    Two,
    Three,
    #[default]
    Four,
}

impl PlayerCount {
    /// Active seats in turn order. Two players sit opposite each other.
    pub fn seats(self) -> &'static [Color] {
        match self {
            PlayerCount::Two => &[Color::Red, Color::Yellow],
            PlayerCount::Three => &[Color::Red, Color::Green, Color::Yellow],
            PlayerCount::Four => &Color::ALL,
        }
    }
}

impl TryFrom<u8> for PlayerCount {
    type Error = LudoError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            2 => Ok(PlayerCount::Two),
            3 => Ok(PlayerCount::Three),
            4 => Ok(PlayerCount::Four),
            other => Err(LudoError::InvalidPlayerCount(other)),
        }
    }
}

impl From<PlayerCount> for u8 {
    fn from(count: PlayerCount) -> u8 {
        count.seats().len() as u8
    }
}

/// Identifies one token: its owner and its slot 0-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId {
    pub color: Color,
    pub index: u8,
}

impl TokenId {
    pub fn new(color: Color, index: u8) -> Self {
        Self { color, index }
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.color.name().to_ascii_lowercase(), self.index)
    }
}

impl FromStr for TokenId {
    type Err = LudoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || LudoError::UnknownToken(s.to_string());
        let (color, index) = s.trim().split_once('-').ok_or_else(bad)?;
        let color: Color = color.parse().map_err(|_| bad())?;
        let index: u8 = index.parse().map_err(|_| bad())?;
        if index as usize >= TOKENS_PER_PLAYER {
            return Err(bad());
        }
        Ok(TokenId::new(color, index))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenState {
    AtBase,
    OnBoard,
    Finished,
}

/// A single token. `progress` is `None` exactly when the token is at base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub owner: Color,
    pub index: u8,
    pub state: TokenState,
    pub progress: Option<u8>,
}

impl Token {
    pub fn at_base(owner: Color, index: u8) -> Self {
        Self {
            owner,
            index,
            state: TokenState::AtBase,
            progress: None,
        }
    }

    pub fn id(&self) -> TokenId {
        TokenId::new(self.owner, self.index)
    }

    /// Absolute ring cell, only while on the shared ring.
    pub fn ring_cell(&self) -> Option<usize> {
        match (self.state, self.progress) {
            (TokenState::OnBoard, Some(p)) => ring_cell_for(self.owner, p),
            _ => None,
        }
    }

    pub fn in_home_lane(&self) -> bool {
        self.state == TokenState::OnBoard
            && matches!(self.progress, Some(p) if (HOME_LANE_START..FINISH).contains(&p))
    }

    pub fn place(&mut self, progress: u8) {
        self.progress = Some(progress);
        self.state = if progress >= FINISH {
            TokenState::Finished
        } else {
            TokenState::OnBoard
        };
    }

    pub(crate) fn send_home(&mut self) {
        self.state = TokenState::AtBase;
        self.progress = None;
    }
}

/// The four tokens of one active color. Shared between snapshots until written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTokens {
    pub color: Color,
    pub tokens: Arc<[Token; TOKENS_PER_PLAYER]>,
}

/// Immutable snapshot of every token in play.
///
/// Updates copy only the token arrays they touch, so older snapshots stay
/// valid for anyone still holding them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    players: Vec<PlayerTokens>,
}

impl BoardState {
    /// All tokens at base for each active seat, in turn order.
    pub fn new(seats: &[Color]) -> Self {
        let players = seats
            .iter()
            .map(|&color| PlayerTokens {
                color,
                tokens: Arc::new(std::array::from_fn(|i| Token::at_base(color, i as u8))),
            })
            .collect();
        Self { players }
    }

    /// Active seats in turn order.
    pub fn seats(&self) -> impl Iterator<Item = Color> + '_ {
        self.players.iter().map(|p| p.color)
    }

    pub fn tokens_of(&self, color: Color) -> &[Token; TOKENS_PER_PLAYER] {
        &self.player(color).tokens
    }

    pub fn token(&self, id: TokenId) -> &Token {
        self.tokens_of(id.color)
            .get(id.index as usize)
            .unwrap_or_else(|| panic!("token {id} does not exist"))
    }

    pub fn iter_tokens(&self) -> impl Iterator<Item = &Token> + '_ {
        self.players.iter().flat_map(|p| p.tokens.iter())
    }

    /// Opposing tokens currently on the shared ring.
    pub fn opponents_on_ring(&self, color: Color) -> impl Iterator<Item = &Token> + '_ {
        self.players
            .iter()
            .filter(move |p| p.color != color)
            .flat_map(|p| p.tokens.iter())
            .filter(|t| t.ring_cell().is_some())
    }

    pub fn count_in_state(&self, color: Color, state: TokenState) -> usize {
        self.tokens_of(color).iter().filter(|t| t.state == state).count()
    }

    /// New snapshot with one token moved to `progress` (`None` = back to base).
    /// Bypasses the rules; meant for setting up positions.
    pub fn with_token(&self, id: TokenId, progress: Option<u8>) -> BoardState {
        let mut next = self.clone();
        let token = next.token_mut(id);
        match progress {
            Some(p) => token.place(p.min(FINISH)),
            None => token.send_home(),
        }
        next
    }

    /// Copy-on-write access to one token.
    pub(crate) fn token_mut(&mut self, id: TokenId) -> &mut Token {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.color == id.color)
            .unwrap_or_else(|| panic!("{} is not an active seat", id.color));
        &mut Arc::make_mut(&mut player.tokens)[id.index as usize]
    }

    fn player(&self, color: Color) -> &PlayerTokens {
        self.players
            .iter()
            .find(|p| p.color == color)
            .unwrap_or_else(|| panic!("{color} is not an active seat"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_count_boundaries() {
        assert!(PlayerCount::try_from(1).is_err());
        assert!(PlayerCount::try_from(5).is_err());
        assert_eq!(PlayerCount::try_from(2).unwrap().seats(), &[Color::Red, Color::Yellow]);
        assert_eq!(PlayerCount::try_from(3).unwrap().seats().len(), 3);
        assert_eq!(u8::from(PlayerCount::Four), 4);
    }

    #[test]
    fn token_id_parse_and_display() {
        let id: TokenId = "green-2".parse().unwrap();
        assert_eq!(id, TokenId::new(Color::Green, 2));
        assert_eq!(id.to_string(), "green-2");
        assert!("green-4".parse::<TokenId>().is_err());
        assert!("purple-1".parse::<TokenId>().is_err());
    }

    #[test]
    fn new_board_has_four_tokens_at_base() {
        let board = BoardState::new(PlayerCount::Three.seats());
        assert_eq!(board.iter_tokens().count(), 12);
        for token in board.iter_tokens() {
            assert_eq!(token.state, TokenState::AtBase);
            assert_eq!(token.progress, None);
        }
    }

    #[test]
    fn writes_do_not_touch_old_snapshots() {
        let before = BoardState::new(PlayerCount::Two.seats());
        let mut after = before.clone();
        after.token_mut(TokenId::new(Color::Red, 1)).place(0);

        assert_eq!(before.token(TokenId::new(Color::Red, 1)).state, TokenState::AtBase);
        assert_eq!(after.token(TokenId::new(Color::Red, 1)).state, TokenState::OnBoard);
        // Untouched seats still share storage.
        assert!(Arc::ptr_eq(&before.players[1].tokens, &after.players[1].tokens));
    }

    #[test]
    fn home_lane_and_ring_cell() {
        let mut t = Token::at_base(Color::Green, 0);
        assert_eq!(t.ring_cell(), None);
        t.place(10);
        assert_eq!(t.ring_cell(), Some(23));
        t.place(53);
        assert!(t.in_home_lane());
        assert_eq!(t.ring_cell(), None);
        t.place(FINISH);
        assert_eq!(t.state, TokenState::Finished);
        assert!(!t.in_home_lane());
    }

    #[test]
    #[should_panic(expected = "not an active seat")]
    fn inactive_seat_lookup_panics() {
        let board = BoardState::new(PlayerCount::Two.seats());
        board.tokens_of(Color::Green);
    }
}
