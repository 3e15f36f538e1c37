//! Board geometry: the 52-cell ring, home lanes, base slots and safe cells
//! laid out on a 15x15 grid. Coordinates are `(col, row)`.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::types::{Color, Token, TokenState};

/// A cell on the 15x15 board grid, `(col, row)`.
pub type Coord = (u8, u8);

pub const BOARD_SIZE: u8 = 15;
pub const RING_LEN: usize = 52;
pub const HOME_LANE_LEN: usize = 6;
/// Progress of the first home-lane cell.
pub const HOME_LANE_START: u8 = 52;
/// Progress of a finished token.
pub const FINISH: u8 = 56;
pub const CENTER: Coord = (7, 7);

/// The shared ring, clockwise from Red's entry cell.
pub const RING: [Coord; RING_LEN] = [
    (1, 6), (2, 6), (3, 6), (4, 6), (5, 6),
    (6, 5), (6, 4), (6, 3), (6, 2), (6, 1), (6, 0),
    (7, 0), (8, 0),
    (8, 1), (8, 2), (8, 3), (8, 4), (8, 5),
    (9, 6), (10, 6), (11, 6), (12, 6), (13, 6), (14, 6),
    (14, 7), (14, 8),
    (13, 8), (12, 8), (11, 8), (10, 8), (9, 8),
    (8, 9), (8, 10), (8, 11), (8, 12), (8, 13), (8, 14),
    (7, 14), (6, 14),
    (6, 13), (6, 12), (6, 11), (6, 10), (6, 9),
    (5, 8), (4, 8), (3, 8), (2, 8), (1, 8), (0, 8),
    (0, 7), (0, 6),
];

/// Ring index where each color's tokens enter, indexed by `Color::index()`.
pub const ENTRY_OFFSETS: [usize; 4] = [0, 13, 26, 39];

/// Star cells. Every entry offset is among them.
pub const SAFE_CELLS: [usize; 8] = [0, 8, 13, 21, 26, 34, 39, 47];

const HOME_LANES: [[Coord; HOME_LANE_LEN]; 4] = [
    [(1, 7), (2, 7), (3, 7), (4, 7), (5, 7), (6, 7)],
    [(7, 1), (7, 2), (7, 3), (7, 4), (7, 5), (7, 6)],
    [(13, 7), (12, 7), (11, 7), (10, 7), (9, 7), (8, 7)],
    [(7, 13), (7, 12), (7, 11), (7, 10), (7, 9), (7, 8)],
];

const BASE_SLOTS: [[Coord; 4]; 4] = [
    [(2, 2), (3, 2), (2, 3), (3, 3)],
    [(11, 2), (12, 2), (11, 3), (12, 3)],
    [(11, 11), (12, 11), (11, 12), (12, 12)],
    [(2, 11), (3, 11), (2, 12), (3, 12)],
];

static RING_LOOKUP: Lazy<HashMap<Coord, usize>> = Lazy::new(|| {
    RING.iter().enumerate().map(|(i, &c)| (c, i)).collect()
});

#[inline]
pub fn ring_coord(index: usize) -> Coord {
    RING[index % RING_LEN]
}

/// Inverse of [`ring_coord`]; `None` for cells off the ring.
pub fn ring_index_at(coord: Coord) -> Option<usize> {
    RING_LOOKUP.get(&coord).copied()
}

#[inline]
pub fn entry_offset(color: Color) -> usize {
    ENTRY_OFFSETS[color.index()]
}

#[inline]
pub fn is_safe_cell(index: usize) -> bool {
    SAFE_CELLS.contains(&index)
}

pub fn home_lane(color: Color) -> &'static [Coord; HOME_LANE_LEN] {
    &HOME_LANES[color.index()]
}

pub fn base_slots(color: Color) -> &'static [Coord; 4] {
    &BASE_SLOTS[color.index()]
}

/// Absolute ring cell for a color's progress, `None` once past the ring.
#[inline]
pub fn ring_cell_for(color: Color, progress: u8) -> Option<usize> {
    if (progress as usize) < RING_LEN {
        Some((entry_offset(color) + progress as usize) % RING_LEN)
    } else {
        None
    }
}

/// Board cell a token is drawn on.
pub fn token_coord(token: &Token) -> Coord {
    match token.state {
        TokenState::AtBase => base_slots(token.owner)[token.index as usize],
        TokenState::Finished => CENTER,
        TokenState::OnBoard => progress_coord(token.owner, token.progress.unwrap_or(0)),
    }
}

/// Board cell for a color's progress value on its personal path.
pub fn progress_coord(color: Color, progress: u8) -> Coord {
    match ring_cell_for(color, progress) {
        Some(cell) => RING[cell],
        None if progress >= FINISH => CENTER,
        None => home_lane(color)[(progress - HOME_LANE_START) as usize],
    }
}
