//! Heuristic token selection for computer-controlled seats.
//!
//! Each legal candidate is scored by simulating the move and summing weighted
//! terms: finishing, capturing, releasing from base, landing safe, entering
//! the home lane, progress, and the threat opponents pose to the landing cell
//! and to the cell being left. The top score wins, except that near-ties are
//! sometimes broken in favour of the runner-up so play is less predictable.

use serde::{Deserialize, Serialize};

use super::board::is_safe_cell;
use super::rules::{apply_move, legal_moves, reaches_with, MoveKind, BONUS_ROLL, DIE_FACES};
use super::types::{BoardState, Color, TokenId, TokenState};
use crate::engine::rng::RandomSource;

/// Tunable weights for [`score_move`]. Defaults are the standard bot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiWeights {
    pub finish: i32,
    pub capture: i32,
    pub deep_capture_bonus: i32,
    /// Victims that had travelled further than this are worth the bonus.
    pub deep_capture_progress: u8,
    pub release_first: i32,
    pub release_second: i32,
    pub release_other: i32,
    pub safe_landing: i32,
    pub home_lane: i32,
    pub progress_factor: i32,
    /// Threat of an opponent `d` steps away is `(7 - d) * threat_unit`.
    pub threat_unit: i32,
    pub escape_bonus: i32,
    pub leave_safe_on_six: i32,
    /// The leave-safe penalty only applies below this progress.
    pub leave_safe_max_progress: u8,
    pub tie_margin: i32,
    pub tie_pick_second: f64,
}

impl Default for AiWeights {
    fn default() -> Self {
        Self {
            finish: 1000,
            capture: 800,
            deep_capture_bonus: 200,
            deep_capture_progress: 30,
            release_first: 700,
            release_second: 400,
            release_other: 200,
            safe_landing: 300,
            home_lane: 350,
            progress_factor: 3,
            threat_unit: 20,
            escape_bonus: 150,
            leave_safe_on_six: 100,
            leave_safe_max_progress: 46,
            tie_margin: 50,
            tie_pick_second: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub token: TokenId,
    pub score: i32,
}

/// How exposed ring `cell` is to the opponents of `color`.
///
/// Every opposing token that can land there with one die counts once, using
/// the smallest face that reaches it; nearer threats weigh more.
pub fn threat_score(board: &BoardState, color: Color, cell: usize, w: &AiWeights) -> i32 {
    board
        .opponents_on_ring(color)
        .filter_map(|t| reaches_with(t.owner, t.progress.unwrap_or(0), cell))
        .map(|d| (DIE_FACES as i32 + 1 - d as i32) * w.threat_unit)
        .sum()
}

/// Score one legal move for its owner.
pub fn score_move(board: &BoardState, id: TokenId, dice: u8, w: &AiWeights) -> i32 {
    let token = *board.token(id);
    let outcome = apply_move(board, id, dice);
    let mut score = 0;

    if outcome.kind == MoveKind::Finished {
        score += w.finish;
    }

    if let Some(cap) = outcome.captured {
        score += w.capture;
        if cap.progress > w.deep_capture_progress {
            score += w.deep_capture_bonus;
        }
    }

    if token.state == TokenState::AtBase {
        let on_board = board.count_in_state(id.color, TokenState::OnBoard);
        let finished = board.count_in_state(id.color, TokenState::Finished);
        score += match on_board {
            0 => w.release_first,
            1 if finished < 3 => w.release_second,
            _ => w.release_other,
        };
        return score;
    }

    let progress = token.progress.unwrap_or(0);

    match outcome.board.token(id).ring_cell() {
        Some(cell) if is_safe_cell(cell) => score += w.safe_landing,
        Some(cell) => score -= threat_score(&outcome.board, id.color, cell, w),
        None => {}
    }

    if outcome.kind == MoveKind::EnteredHomeLane {
        score += w.home_lane;
    }

    score += w.progress_factor * progress as i32;

    if let Some(current) = token.ring_cell() {
        if is_safe_cell(current) {
            if dice == BONUS_ROLL && progress < w.leave_safe_max_progress {
                score -= w.leave_safe_on_six;
            }
        } else if threat_score(board, id.color, current, w) > 0 {
            score += w.escape_bonus;
        }
    }

    score
}

/// Score every legal move for `color`, best first. Equal scores keep slot order.
pub fn rank_moves(board: &BoardState, color: Color, dice: u8, w: &AiWeights) -> Vec<ScoredMove> {
    let mut scored: Vec<ScoredMove> = legal_moves(board, color, dice)
        .into_iter()
        .map(|token| ScoredMove {
            token,
            score: score_move(board, token, dice, w),
        })
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Pick the token a computer player moves, or `None` without legal moves.
pub fn choose_token(
    board: &BoardState,
    color: Color,
    dice: u8,
    w: &AiWeights,
    rng: &mut dyn RandomSource,
) -> Option<TokenId> {
    let legal = legal_moves(board, color, dice);
    match legal.len() {
        0 => return None,
        1 => return Some(legal[0]),
        _ => {}
    }

    let ranked = rank_moves(board, color, dice, w);
    for m in &ranked {
        tracing::trace!(token = %m.token, score = m.score, dice, "scored candidate");
    }

    let (best, second) = (ranked[0], ranked[1]);
    if (best.score - second.score).abs() < w.tie_margin && rng.chance(w.tie_pick_second) {
        return Some(second.token);
    }
    Some(best.token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::ScriptedSource;
    use crate::games::ludo::types::PlayerCount;

    fn id(color: Color, index: u8) -> TokenId {
        TokenId::new(color, index)
    }

    fn four() -> BoardState {
        BoardState::new(PlayerCount::Four.seats())
    }

    fn w() -> AiWeights {
        AiWeights::default()
    }

    #[test]
    fn no_moves_and_single_move() {
        let board = four();
        let mut rng = ScriptedSource::default();
        assert_eq!(choose_token(&board, Color::Red, 3, &w(), &mut rng), None);

        let board = board.with_token(id(Color::Red, 2), Some(5));
        assert_eq!(
            choose_token(&board, Color::Red, 3, &w(), &mut rng),
            Some(id(Color::Red, 2))
        );
    }

    #[test]
    fn threat_counts_nearest_face_once_per_token() {
        // Green at progress 45 is on cell 6, four steps short of cell 10.
        let board = four().with_token(id(Color::Green, 0), Some(45));
        assert_eq!(threat_score(&board, Color::Red, 10, &w()), (7 - 4) * 20);
        // A second threatening token adds its own term.
        let board = board.with_token(id(Color::Green, 1), Some(48));
        assert_eq!(threat_score(&board, Color::Red, 10, &w()), 60 + 120);
        // Own tokens never threaten.
        assert_eq!(threat_score(&board, Color::Green, 10, &w()), 0);
    }

    #[test]
    fn home_lane_tokens_do_not_threaten() {
        let board = four().with_token(id(Color::Green, 0), Some(53));
        for cell in 0..52 {
            assert_eq!(threat_score(&board, Color::Red, cell, &w()), 0);
        }
    }

    #[test]
    fn release_weight_depends_on_board_presence() {
        let board = four();
        assert_eq!(score_move(&board, id(Color::Red, 0), 6, &w()), 700);

        let board = board.with_token(id(Color::Red, 1), Some(20));
        assert_eq!(score_move(&board, id(Color::Red, 0), 6, &w()), 400);

        let board = board.with_token(id(Color::Red, 2), Some(22));
        assert_eq!(score_move(&board, id(Color::Red, 0), 6, &w()), 200);
    }

    #[test]
    fn capture_scores_and_deep_bonus() {
        // Red at 3 lands on cell 5 where Yellow (progress 31, deep) sits.
        let board = four()
            .with_token(id(Color::Red, 0), Some(3))
            .with_token(id(Color::Yellow, 0), Some(31));
        let score = score_move(&board, id(Color::Red, 0), 2, &w());
        // capture + deep bonus + progress 3*3, no threats remain on cell 5.
        assert_eq!(score, 800 + 200 + 9);
    }

    #[test]
    fn safe_landing_and_home_lane() {
        let board = four().with_token(id(Color::Red, 0), Some(5));
        // 5 + 3 = star cell 8.
        assert_eq!(score_move(&board, id(Color::Red, 0), 3, &w()), 300 + 15);

        let board = four().with_token(id(Color::Red, 0), Some(50));
        assert_eq!(score_move(&board, id(Color::Red, 0), 3, &w()), 350 + 150);
    }

    #[test]
    fn danger_and_escape() {
        // Red at 10 is threatened by Green at 45 (cell 6 -> 10 with a 4).
        let board = four()
            .with_token(id(Color::Red, 0), Some(10))
            .with_token(id(Color::Green, 0), Some(45));
        // Moving 1 lands on cell 11, five steps from Green: -(7-5)*20 = -40.
        // Escape bonus +150, progress 30.
        assert_eq!(score_move(&board, id(Color::Red, 0), 1, &w()), 30 - 40 + 150);
    }

    #[test]
    fn leaving_safety_on_six_is_discouraged() {
        let board = four().with_token(id(Color::Red, 0), Some(8));
        // 8 -> 14: plain cell with no threats.
        assert_eq!(score_move(&board, id(Color::Red, 0), 6, &w()), 24 - 100);
    }

    #[test]
    fn finishing_beats_advancing() {
        let board = four()
            .with_token(id(Color::Red, 0), Some(51))
            .with_token(id(Color::Red, 1), Some(20))
            .with_token(id(Color::Green, 0), Some(1));
        // Even a coin flip favouring the runner-up cannot pick red-1.
        let mut rng = ScriptedSource::default().with_flips([true; 8]);
        for _ in 0..8 {
            assert_eq!(
                choose_token(&board, Color::Red, 5, &w(), &mut rng),
                Some(id(Color::Red, 0))
            );
        }
    }

    #[test]
    fn near_tie_can_pick_runner_up() {
        // Two identical tokens on plain cells produce equal scores.
        let board = four()
            .with_token(id(Color::Red, 0), Some(2))
            .with_token(id(Color::Red, 1), Some(2));
        let ranked = rank_moves(&board, Color::Red, 1, &w());
        assert_eq!(ranked[0].score, ranked[1].score);

        let mut heads = ScriptedSource::default().with_flips([true]);
        assert_eq!(
            choose_token(&board, Color::Red, 1, &w(), &mut heads),
            Some(ranked[1].token)
        );
        let mut tails = ScriptedSource::default().with_flips([false]);
        assert_eq!(
            choose_token(&board, Color::Red, 1, &w(), &mut tails),
            Some(ranked[0].token)
        );
    }
}
