//! Move engine: legality, move application with captures, win detection
//! and turn rotation. Every function here is pure; boards go in, new
//! boards come out.

use serde::{Deserialize, Serialize};

use super::board::{
    is_safe_cell, progress_coord, ring_cell_for, Coord, FINISH, HOME_LANE_START, RING_LEN,
};
use super::types::{BoardState, Color, Token, TokenId, TokenState};

pub const DIE_FACES: u8 = 6;
/// Rolling this releases a token from base and earns a bonus turn.
pub const BONUS_ROLL: u8 = 6;
/// Consecutive bonus rolls that forfeit the turn.
pub const MAX_CONSECUTIVE_SIXES: u8 = 3;

/// What happened to the moved token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// Left base onto its entry cell.
    Released,
    /// Moved along the shared ring.
    Advanced,
    /// Moved into (or along) its home lane.
    EnteredHomeLane,
    Finished,
}

/// An opposing token sent back to base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub token: TokenId,
    /// Progress the victim had travelled before being captured.
    pub progress: u8,
    pub cell: usize,
}

#[derive(Debug, Clone)]
pub struct MoveOutcome {
    pub board: BoardState,
    pub token: TokenId,
    pub from: Option<u8>,
    pub to: u8,
    pub kind: MoveKind,
    pub captured: Option<Capture>,
}

/// Whether `token` may move with `dice`.
///
/// Tokens at base need a six, finished tokens never move, and tokens on the
/// board must land exactly on the finish or short of it.
pub fn is_legal(token: &Token, dice: u8) -> bool {
    match token.state {
        TokenState::AtBase => dice == BONUS_ROLL,
        TokenState::Finished => false,
        TokenState::OnBoard => match token.progress {
            Some(p) => p.saturating_add(dice) <= FINISH,
            None => false,
        },
    }
}

/// Tokens of `color` that can move with `dice`, in slot order.
pub fn legal_moves(board: &BoardState, color: Color, dice: u8) -> Vec<TokenId> {
    board
        .tokens_of(color)
        .iter()
        .filter(|t| is_legal(t, dice))
        .map(Token::id)
        .collect()
}

/// Legal moves with interchangeable tokens collapsed to the lowest slot.
///
/// Tokens that share a progress (all tokens at base, or a stack on one
/// cell) produce the same outcome, so a six with a full base is one move.
pub fn distinct_moves(board: &BoardState, color: Color, dice: u8) -> Vec<TokenId> {
    let mut seen: Vec<Option<u8>> = Vec::with_capacity(4);
    let mut out = Vec::new();
    for t in board.tokens_of(color).iter().filter(|t| is_legal(t, dice)) {
        if !seen.contains(&t.progress) {
            seen.push(t.progress);
            out.push(t.id());
        }
    }
    out
}

/// Target progress of a legal move.
pub fn destination(token: &Token, dice: u8) -> u8 {
    match token.progress {
        None => 0,
        Some(p) => p + dice,
    }
}

/// Apply a legal move and resolve any capture, returning a new snapshot.
///
/// # Panics
///
/// If the move is not legal; callers must check [`is_legal`] first.
pub fn apply_move(board: &BoardState, id: TokenId, dice: u8) -> MoveOutcome {
    let token = *board.token(id);
    assert!(
        is_legal(&token, dice),
        "illegal move: {id} with dice {dice} from {:?}",
        token.progress
    );

    let to = destination(&token, dice);
    let kind = match (token.state, to) {
        (TokenState::AtBase, _) => MoveKind::Released,
        (_, p) if p >= FINISH => MoveKind::Finished,
        (_, p) if p >= HOME_LANE_START => MoveKind::EnteredHomeLane,
        _ => MoveKind::Advanced,
    };

    let mut next = board.clone();
    let moved = next.token_mut(id);
    moved.place(to);
    let landing = moved.ring_cell();

    let captured = landing.and_then(|cell| resolve_capture(&mut next, id.color, cell));

    MoveOutcome {
        board: next,
        token: id,
        from: token.progress,
        to,
        kind,
        captured,
    }
}

/// Send the first opposing token found on `cell` back to base.
fn resolve_capture(board: &mut BoardState, mover: Color, cell: usize) -> Option<Capture> {
    if is_safe_cell(cell) {
        return None;
    }
    let victim = board
        .opponents_on_ring(mover)
        .find(|t| t.ring_cell() == Some(cell))
        .copied()?;

    board.token_mut(victim.id()).send_home();
    Some(Capture {
        token: victim.id(),
        progress: victim.progress.unwrap_or(0),
        cell,
    })
}

pub fn check_winner(board: &BoardState, color: Color) -> bool {
    board
        .tokens_of(color)
        .iter()
        .all(|t| t.state == TokenState::Finished)
}

/// The seat after `current` in fixed rotation.
pub fn next_seat(current: Color, seats: &[Color]) -> Color {
    let pos = seats
        .iter()
        .position(|&c| c == current)
        .unwrap_or_else(|| panic!("{current} is not an active seat"));
    seats[(pos + 1) % seats.len()]
}

/// A six or a capture keeps the turn; anything else passes it on.
pub fn next_player(current: Color, dice: u8, captured: bool, seats: &[Color]) -> Color {
    if dice == BONUS_ROLL || captured {
        current
    } else {
        next_seat(current, seats)
    }
}

/// Cells a token passes through one step at a time, ending on its destination.
/// A release is a single hop onto the entry cell.
pub fn move_path(token: &Token, dice: u8) -> Vec<Coord> {
    match token.progress {
        None => vec![progress_coord(token.owner, 0)],
        Some(p) => (p + 1..=p + dice)
            .map(|step| progress_coord(token.owner, step.min(FINISH)))
            .collect(),
    }
}

/// Whether a token at `progress` could reach ring `cell` with some die face,
/// returning the smallest such face.
pub fn reaches_with(color: Color, progress: u8, cell: usize) -> Option<u8> {
    (1..=DIE_FACES).find(|&d| {
        let target = progress as usize + d as usize;
        target < RING_LEN && ring_cell_for(color, target as u8) == Some(cell)
    })
}
