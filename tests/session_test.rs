//! Tests for the per-game state machine: alternation, retries, terminal states.

use gomoku_arena::{
    BOARD_SIZE, Color, GameResult, GameSession, Move, PlaceError, Proposal, RetryPolicy,
    SessionError, TurnState, Verdict,
};
use gomoku_arena::games::gomoku::{FORFEIT_REASON, RejectReason};

fn started() -> GameSession {
    let mut session = GameSession::default();
    session.start().expect("Start failed");
    session
}

fn play(session: &mut GameSession, row: usize, col: usize) -> Verdict {
    session
        .submit(Proposal::Move(Move::new(row, col)), RetryPolicy::Counted)
        .expect("Submit failed")
}

fn garbage() -> Proposal {
    Proposal::Unparsable {
        response: "I am not sure (7,7)".to_string(),
    }
}

#[test]
fn test_black_moves_first_and_colors_alternate() {
    let mut session = GameSession::default();
    assert_eq!(session.state(), &TurnState::Idle);
    assert_eq!(session.start().expect("Start failed"), Color::Black);

    for i in 0..10 {
        let expected = if i % 2 == 0 { Color::Black } else { Color::White };
        assert_eq!(session.to_move(), Some(expected));
        play(&mut session, i, 0);
    }

    let colors: Vec<Color> = session.history().iter().map(|(c, _)| *c).collect();
    for (i, color) in colors.iter().enumerate() {
        let expected = if i % 2 == 0 { Color::Black } else { Color::White };
        assert_eq!(*color, expected);
    }
}

#[test]
fn test_start_twice_fails() {
    let mut session = started();
    assert_eq!(session.start(), Err(SessionError::AlreadyStarted));
}

#[test]
fn test_vertical_five_wins() {
    let mut session = started();
    for (row, col) in [(7, 7), (7, 8), (6, 7), (7, 9), (5, 7), (7, 10), (4, 7)] {
        play(&mut session, row, col);
    }
    // Four in a column is not yet a win.
    assert_eq!(session.result(), GameResult::InProgress);
    play(&mut session, 7, 11);

    match play(&mut session, 3, 7) {
        Verdict::Accepted { color, mv, result } => {
            assert_eq!(color, Color::Black);
            assert_eq!(mv, Move::new(3, 7));
            assert_eq!(result, GameResult::Win(Color::Black));
        }
        other => panic!("Expected accepted move, got {:?}", other),
    }
    assert!(session.is_over());
    assert_eq!(session.result(), GameResult::Win(Color::Black));

    let before = session.snapshot();
    let err = session
        .submit(Proposal::Move(Move::new(0, 0)), RetryPolicy::Counted)
        .expect_err("Terminal session accepted a move");
    assert!(matches!(err, SessionError::NotAwaitingMove(TurnState::Terminal(_))));
    assert_eq!(session.snapshot(), before);
}

#[test]
fn test_rejected_move_keeps_turn_and_board() {
    let mut session = started();
    play(&mut session, 7, 7);
    let before = session.snapshot();

    let verdict = play(&mut session, 7, 7);

    assert_eq!(
        verdict,
        Verdict::Rejected {
            color: Color::White,
            reason: RejectReason::Placement(PlaceError::CellOccupied(Move::new(7, 7))),
            attempts: 1,
            result: GameResult::InProgress,
        }
    );
    assert_eq!(session.snapshot(), before);
    assert_eq!(session.to_move(), Some(Color::White));
}

#[test]
fn test_three_invalid_responses_forfeit() {
    let mut session = started();
    play(&mut session, 7, 7);

    for attempt in 1..=2u8 {
        match session.submit(garbage(), RetryPolicy::Counted).expect("Submit failed") {
            Verdict::Rejected {
                attempts, result, ..
            } => {
                assert_eq!(attempts, attempt);
                assert_eq!(result, GameResult::InProgress);
            }
            other => panic!("Expected rejection, got {:?}", other),
        }
    }

    let verdict = session
        .submit(garbage(), RetryPolicy::Counted)
        .expect("Submit failed");
    let forfeit = GameResult::Forfeit {
        color: Color::White,
        reason: FORFEIT_REASON.to_string(),
    };
    match verdict {
        Verdict::Rejected {
            attempts, result, ..
        } => {
            assert_eq!(attempts, 3);
            assert_eq!(result, forfeit);
        }
        other => panic!("Expected rejection, got {:?}", other),
    }
    assert_eq!(session.result(), forfeit);
    assert_eq!(forfeit.winner(), Some(Color::Black));
}

#[test]
fn test_accepted_move_resets_retry_counter() {
    let mut session = started();
    session.submit(garbage(), RetryPolicy::Counted).expect("Submit failed");
    session.submit(garbage(), RetryPolicy::Counted).expect("Submit failed");
    assert_eq!(session.retries(Color::Black), 2);

    play(&mut session, 0, 0);
    assert_eq!(session.retries(Color::Black), 0);

    play(&mut session, 1, 1);
    session.submit(garbage(), RetryPolicy::Counted).expect("Submit failed");
    session.submit(garbage(), RetryPolicy::Counted).expect("Submit failed");
    assert_eq!(session.to_move(), Some(Color::Black), "Two failures must not forfeit");
}

#[test]
fn test_unlimited_policy_never_forfeits() {
    let mut session = started();
    play(&mut session, 7, 7);
    for _ in 0..20 {
        let verdict = session
            .submit(Proposal::Move(Move::new(7, 7)), RetryPolicy::Unlimited)
            .expect("Submit failed");
        assert!(matches!(
            verdict,
            Verdict::Rejected {
                attempts: 0,
                result: GameResult::InProgress,
                ..
            }
        ));
    }
    assert_eq!(session.to_move(), Some(Color::White));
}

#[test]
fn test_terminal_state_is_absorbing() {
    let mut session = started();
    for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2), (1, 2), (0, 3), (1, 3), (0, 4)] {
        play(&mut session, row, col);
    }
    assert_eq!(session.result(), GameResult::Win(Color::Black));
    let before = session.snapshot();

    let err = session
        .submit(Proposal::Move(Move::new(5, 5)), RetryPolicy::Counted)
        .unwrap_err();

    assert!(matches!(err, SessionError::NotAwaitingMove(TurnState::Terminal(_))));
    assert_eq!(session.snapshot(), before);
    assert!(session.abort(Color::White, "late".to_string()).is_err());
    assert!(session.declare_draw().is_err());
}

#[test]
fn test_submit_before_start_fails() {
    let mut session = GameSession::default();
    let err = session
        .submit(Proposal::Move(Move::new(0, 0)), RetryPolicy::Counted)
        .unwrap_err();
    assert_eq!(err, SessionError::NotAwaitingMove(TurnState::Idle));
}

#[test]
fn test_full_board_without_five_is_draw() {
    // Pairs of columns alternate colors, shifted each row: no run reaches five.
    let (black, white): (Vec<Move>, Vec<Move>) = (0..BOARD_SIZE)
        .flat_map(|row| (0..BOARD_SIZE).map(move |col| Move::new(row, col)))
        .partition(|mv| (mv.col / 2 + mv.row) % 2 == 0);
    assert_eq!(black.len(), white.len() + 1);

    let mut session = started();
    let mut result = GameResult::InProgress;
    for (i, mv) in black.iter().enumerate() {
        result = accepted_result(play(&mut session, mv.row, mv.col));
        if let Some(w) = white.get(i) {
            assert_eq!(result, GameResult::InProgress);
            result = accepted_result(play(&mut session, w.row, w.col));
            assert_eq!(result, GameResult::InProgress);
        }
    }

    assert_eq!(result, GameResult::Draw);
    assert!(session.board().is_full());
}

fn accepted_result(verdict: Verdict) -> GameResult {
    match verdict {
        Verdict::Accepted { result, .. } => result,
        other => panic!("Expected accepted move, got {:?}", other),
    }
}

#[test]
fn test_communication_abort() {
    let mut session = started();
    let result = session
        .abort(Color::Black, "connection refused".to_string())
        .expect("Abort failed");
    assert_eq!(
        result,
        GameResult::Aborted {
            color: Color::Black,
            message: "connection refused".to_string()
        }
    );
    assert_eq!(result.winner(), None);
    assert!(session.is_over());
}

#[test]
fn test_restart_returns_to_idle() {
    let mut session = started();
    play(&mut session, 7, 7);
    session.restart();

    assert_eq!(session.state(), &TurnState::Idle);
    assert_eq!(session.board().stone_count(), 0);
    assert!(session.history().is_empty());
    assert_eq!(session.start().expect("Start failed"), Color::Black);
}
