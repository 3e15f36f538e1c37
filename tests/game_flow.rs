//! End-to-end rule checks through the public API: the move engine, the AI
//! and the turn controller driven the way a front-end drives them.

use rand::rngs::StdRng;
use rand::SeedableRng;

use ludo_engine::engine::models::GameConfig;
use ludo_engine::engine::rng::{roll_dice, ScriptedSource};
use ludo_engine::games::ludo::ai::{choose_token, AiWeights};
use ludo_engine::games::ludo::board::{entry_offset, is_safe_cell, ring_cell_for, FINISH, RING_LEN};
use ludo_engine::games::ludo::events::{GameEvent, SoundCue};
use ludo_engine::games::ludo::rules::{
    apply_move, check_winner, distinct_moves, is_legal, legal_moves, next_player, MoveKind,
};
use ludo_engine::games::ludo::{
    reduce, BoardState, Color, GameState, LudoSession, PlayerCount, Token, TokenId, TokenState,
    Trigger, TurnPhase,
};

fn id(color: Color, index: u8) -> TokenId {
    TokenId::new(color, index)
}

fn apply(state: &GameState, trigger: Trigger) -> (GameState, Vec<GameEvent>) {
    let t = reduce(state, trigger).expect("trigger rejected");
    (t.state, t.events)
}

/// Play a seeded game with first-legal-token selection, calling `check`
/// after every transition.
fn self_play(seed: u64, count: PlayerCount, mut check: impl FnMut(&GameState, &[GameEvent])) -> GameState {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = GameState::started(GameConfig::new(count));
    for _ in 0..50_000 {
        if state.phase == TurnPhase::GameOver {
            break;
        }
        let trigger = match state.phase {
            TurnPhase::AwaitingSelection => Trigger::Select(state.moveable[0]),
            _ => Trigger::Roll(roll_dice(&mut rng)),
        };
        let (next, events) = apply(&state, trigger);
        check(&next, &events);
        state = next;
    }
    state
}

#[test]
fn legality_matches_rule_for_every_state_and_face() {
    let mut tokens = vec![Token::at_base(Color::Blue, 0)];
    for p in 0..=FINISH {
        let mut t = Token::at_base(Color::Blue, 1);
        t.place(p);
        tokens.push(t);
    }
    for t in &tokens {
        for d in 1..=6u8 {
            let expected = match t.state {
                TokenState::AtBase => d == 6,
                TokenState::OnBoard => t.progress.unwrap() + d <= FINISH,
                TokenState::Finished => false,
            };
            assert_eq!(is_legal(t, d), expected, "{t:?} with {d}");
        }
    }
}

#[test]
fn captures_never_happen_on_safe_cells() {
    for seed in 0..6 {
        self_play(seed, PlayerCount::Four, |state, events| {
            for e in events {
                if let GameEvent::TokenCaptured { cell, .. } = e {
                    assert!(!is_safe_cell(*cell), "capture on safe cell {cell}");
                }
            }
            // Two colors only ever share a ring cell when it is safe.
            let on_ring: Vec<_> = state
                .board
                .iter_tokens()
                .filter_map(|t| t.ring_cell().map(|c| (t.owner, c)))
                .collect();
            for (i, &(a, ca)) in on_ring.iter().enumerate() {
                for &(b, cb) in &on_ring[i + 1..] {
                    if a != b && ca == cb {
                        assert!(is_safe_cell(ca), "{a} and {b} share unsafe cell {ca}");
                    }
                }
            }
        });
    }
}

#[test]
fn ring_cell_follows_entry_offset_after_plain_moves() {
    self_play(21, PlayerCount::Three, |state, events| {
        for e in events {
            if let GameEvent::TokenMoved { token, to, kind, .. } = e {
                if matches!(kind, MoveKind::Released | MoveKind::Advanced) {
                    let t = state.board.token(*token);
                    if t.state == TokenState::OnBoard {
                        let expected = (entry_offset(token.color) + *to as usize) % RING_LEN;
                        assert_eq!(t.ring_cell(), Some(expected));
                    }
                }
            }
        }
    });
}

#[test]
fn winner_only_with_all_four_finished() {
    let mut board = BoardState::new(PlayerCount::Two.seats());
    for i in 0..4 {
        assert!(!check_winner(&board, Color::Yellow));
        board = board.with_token(id(Color::Yellow, i), Some(55));
        assert!(!check_winner(&board, Color::Yellow));
        board = board.with_token(id(Color::Yellow, i), Some(FINISH));
    }
    assert!(check_winner(&board, Color::Yellow));
    assert!(!check_winner(&board, Color::Red));
}

#[test]
fn turn_retention_and_rotation() {
    for count in [PlayerCount::Two, PlayerCount::Three, PlayerCount::Four] {
        let seats = count.seats();
        for (i, &seat) in seats.iter().enumerate() {
            let following = seats[(i + 1) % seats.len()];
            assert_eq!(next_player(seat, 6, false, seats), seat);
            assert_eq!(next_player(seat, 2, true, seats), seat);
            for d in 1..=5 {
                assert_eq!(next_player(seat, d, false, seats), following);
            }
        }
    }
}

#[test]
fn three_sixes_forfeit_without_moving() {
    let mut session = LudoSession::new(
        GameConfig::new(PlayerCount::Two),
        ScriptedSource::new([6, 6, 6]),
    );
    session.start().unwrap();

    session.roll().unwrap();
    session.select(id(Color::Red, 0)).unwrap();
    session.roll().unwrap();
    session.select(id(Color::Red, 0)).unwrap();
    assert_eq!(session.state().consecutive_sixes, 2);
    let before = session.state().board.clone();

    let step = session.roll().unwrap();
    assert!(step.events.contains(&GameEvent::TurnForfeited { player: Color::Red }));
    assert_eq!(session.state().current, Color::Yellow);
    assert_eq!(session.state().consecutive_sixes, 0);
    assert_eq!(session.state().board, before);
    assert!(step.view.message.starts_with("Three 6s in a row!"));
}

#[test]
fn first_six_releases_and_keeps_turn() {
    let state = GameState::started(GameConfig::new(PlayerCount::Two));
    assert_eq!(state.seats(), &[Color::Red, Color::Yellow]);

    let (rolled, _) = apply(&state, Trigger::Roll(6));
    assert_eq!(rolled.phase, TurnPhase::AwaitingSelection);
    assert_eq!(
        distinct_moves(&rolled.board, Color::Red, 6),
        vec![id(Color::Red, 0)]
    );

    let (moved, events) = apply(&rolled, Trigger::Select(id(Color::Red, 0)));
    let token = moved.board.token(id(Color::Red, 0));
    assert_eq!(token.state, TokenState::OnBoard);
    assert_eq!(token.progress, Some(0));
    assert_eq!(moved.current, Color::Red);
    assert_eq!(moved.phase, TurnPhase::AwaitingRoll);
    assert!(events
        .iter()
        .any(|e| e.sound_cue() == Some(SoundCue::TokenOut)));
}

#[test]
fn landing_on_an_opponent_captures_it() {
    let mut state = GameState::started(GameConfig::new(PlayerCount::Two));
    state.board = state
        .board
        .with_token(id(Color::Red, 0), Some(10))
        .with_token(id(Color::Yellow, 0), Some(33));
    state.current = Color::Yellow;
    let cell = ring_cell_for(Color::Red, 10).unwrap();
    assert_eq!(cell, entry_offset(Color::Red) + 10);
    assert!(!is_safe_cell(cell));
    assert_eq!(ring_cell_for(Color::Yellow, 36), Some(cell));

    let outcome = apply_move(&state.board, id(Color::Yellow, 0), 3);
    let captured = outcome.captured.expect("capture reported");
    assert_eq!(captured.token, id(Color::Red, 0));
    assert_eq!(captured.progress, 10);

    let (rolled, _) = apply(&state, Trigger::Roll(3));
    let (after, events) = apply(&rolled, Trigger::Select(id(Color::Yellow, 0)));
    let victim = after.board.token(id(Color::Red, 0));
    assert_eq!(victim.state, TokenState::AtBase);
    assert_eq!(victim.progress, None);
    assert_eq!(after.current, Color::Yellow, "capture earns a bonus turn");
    assert!(events.contains(&GameEvent::TokenCaptured {
        by: id(Color::Yellow, 0),
        victim: id(Color::Red, 0),
        cell,
    }));
}

#[test]
fn exact_roll_needed_to_finish() {
    let board = BoardState::new(PlayerCount::Four.seats())
        .with_token(id(Color::Green, 0), Some(54))
        .with_token(id(Color::Green, 1), Some(50));

    assert!(!is_legal(board.token(id(Color::Green, 0)), 3));
    assert_eq!(legal_moves(&board, Color::Green, 3), vec![id(Color::Green, 1)]);

    let outcome = apply_move(&board, id(Color::Green, 1), 6);
    let finished = outcome.board.token(id(Color::Green, 1));
    assert_eq!(finished.progress, Some(FINISH));
    assert_eq!(finished.state, TokenState::Finished);
    assert_eq!(outcome.kind, MoveKind::Finished);
    assert!(outcome.captured.is_none());
}

#[test]
fn ai_always_takes_the_finishing_move() {
    // Red-1 could escape a threat onto a safe cell, but finishing outranks it.
    let board = BoardState::new(PlayerCount::Two.seats())
        .with_token(id(Color::Red, 0), Some(50))
        .with_token(id(Color::Red, 1), Some(2))
        .with_token(id(Color::Yellow, 0), Some(25));
    let w = AiWeights::default();

    for flip in [false, true] {
        let mut rng = ScriptedSource::default().with_flips([flip]);
        assert_eq!(
            choose_token(&board, Color::Red, 6, &w, &mut rng),
            Some(id(Color::Red, 0))
        );
    }
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..20 {
        assert_eq!(
            choose_token(&board, Color::Red, 6, &w, &mut rng),
            Some(id(Color::Red, 0))
        );
    }
}

#[test]
fn seeded_games_are_reproducible_and_end_with_one_winner() {
    let a = self_play(99, PlayerCount::Four, |_, _| {});
    let b = self_play(99, PlayerCount::Four, |_, _| {});
    assert_eq!(a, b);
    assert_eq!(a.phase, TurnPhase::GameOver);
    let winner = a.winner.unwrap();
    assert!(check_winner(&a.board, winner));
    assert_eq!(a.message, format!("{winner} wins!"));
}
