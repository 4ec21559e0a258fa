#![allow(non_snake_case)]

use engine::{
    Difficulty, FieldLayout, GameSession, GameVariant, RevealOutcome, SessionState,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn fresh_session(seed: u64, difficulty: Difficulty) -> GameSession {
    let mut rng = StdRng::seed_from_u64(seed);
    GameSession::new(difficulty, GameVariant::Enhanced, &mut rng)
}

#[test]
fn reveal__a_field_cell_always_transitions_to_lost() {
    for seed in 0..25 {
        // given
        let mut session = fresh_session(seed, Difficulty::Medium);
        let field = session.layout().field_cells()[0];

        // when
        let outcome = session.reveal(field).unwrap();

        // then
        assert_eq!(outcome, RevealOutcome::FieldHit);
        assert_eq!(session.state(), SessionState::Lost);
        assert_eq!(session.triggered_field(), Some(field));
    }
}

#[test]
fn reveal__clearing_every_safe_cell_always_transitions_to_won() {
    for seed in 0..25 {
        // given
        let mut session = fresh_session(seed, Difficulty::Beginner);
        let safe_cells = session.safe_unrevealed();

        // when
        let mut last = RevealOutcome::NoChange;
        for pos in safe_cells {
            last = session.reveal(pos).unwrap();
        }

        // then
        assert!(matches!(last, RevealOutcome::Won { .. }));
        assert_eq!(session.state(), SessionState::Won);
        assert_eq!(session.safe_cells_left(), 0);
    }
}

#[test]
fn reveal__score_grows_monotonically_while_safe() {
    let mut session = fresh_session(3, Difficulty::Easy);
    let mut previous = 0;

    for pos in session.safe_unrevealed() {
        let before = session.state();
        if before != SessionState::Playing {
            break;
        }
        session.reveal(pos).unwrap();
        assert!(session.score() >= previous);
        previous = session.score();
    }
}

#[test]
fn reveal__flags_shield_cells_until_removed() {
    // given
    let layout = FieldLayout::from_cells(4, &[(0, 0)]).unwrap();
    let mut session =
        GameSession::from_layout(Difficulty::Medium, GameVariant::Classic, layout);
    session.toggle_flag((0, 0)).unwrap();

    // when: a reveal on the flagged field is swallowed
    assert_eq!(session.reveal((0, 0)).unwrap(), RevealOutcome::NoChange);
    assert_eq!(session.state(), SessionState::Playing);

    // then: unflagging exposes it again
    session.toggle_flag((0, 0)).unwrap();
    assert_eq!(session.reveal((0, 0)).unwrap(), RevealOutcome::FieldHit);
}

#[test]
fn reveal__win_grants_the_flat_bonus_over_accumulated_points() {
    // given a board with one field and three safe cells
    let layout = FieldLayout::from_cells(2, &[(1, 1)]).unwrap();
    let mut session =
        GameSession::from_layout(Difficulty::Medium, GameVariant::Classic, layout);

    // when
    session.reveal((0, 0)).unwrap();
    session.reveal((0, 1)).unwrap();
    let score_before_win = session.score();
    session.reveal((1, 0)).unwrap();

    // then
    assert_eq!(session.state(), SessionState::Won);
    assert!(session.score() >= score_before_win + 1000);
}
