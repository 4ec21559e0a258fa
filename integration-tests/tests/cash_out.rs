#![allow(non_snake_case)]

use economy::HouseLedger;
use engine::{Difficulty, GameSession, GameVariant, SessionState};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn cash_out__settlement_flows_through_the_ledger() {
    // given a funded house and a game with some progress
    let mut ledger = HouseLedger::funded(100.0);
    let bet = 5.0;
    ledger.process_bet(bet).unwrap();

    let mut rng = StdRng::seed_from_u64(9);
    let mut session = GameSession::new(Difficulty::Medium, GameVariant::Enhanced, &mut rng);
    for pos in session.safe_unrevealed().into_iter().take(4) {
        session.reveal(pos).unwrap();
    }
    assert!(session.can_cash_out(bet));

    // when
    let gross = session.cash_out(bet).unwrap();
    let settled = ledger.apply_house_edge(gross);
    let payout = ledger.process_win(settled).unwrap();

    // then
    assert_eq!(session.state(), SessionState::CashedOut);
    assert!(settled <= gross);
    assert!(payout.winnings >= 0.0);
    assert!(payout.new_house_balance >= 0.0);
    assert!((ledger.stats().total_winnings_paid - settled).abs() < 1e-9);
}

#[test]
fn cash_out__is_rejected_before_any_reveal() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut session = GameSession::new(Difficulty::Easy, GameVariant::Classic, &mut rng);

    assert!(!session.can_cash_out(1.0));
    assert!(session.cash_out(1.0).is_err());
    assert_eq!(session.state(), SessionState::Playing);
}

#[test]
fn cash_out__winnings_scale_with_the_bet() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut session = GameSession::new(Difficulty::Hard, GameVariant::Enhanced, &mut rng);
    for pos in session.safe_unrevealed().into_iter().take(6) {
        session.reveal(pos).unwrap();
    }

    let small = session.current_winnings(1.0);
    let large = session.current_winnings(10.0);
    assert!(large > small);
    assert!((large / small - 10.0).abs() < 1e-6);
}

#[test]
fn cash_out__settled_amount_never_exceeds_the_house_cap() {
    // given a nearly broke house
    let mut ledger = HouseLedger::funded(2.0);
    ledger.process_bet(1000.0).unwrap();

    let mut rng = StdRng::seed_from_u64(12);
    let mut session = GameSession::new(Difficulty::Master, GameVariant::Enhanced, &mut rng);
    for pos in session.safe_unrevealed().into_iter().take(40) {
        if session.state() != SessionState::Playing {
            break;
        }
        session.reveal(pos).unwrap();
    }

    // when
    let gross = session.current_winnings(1000.0);
    let settled = ledger.apply_house_edge(gross);

    // then
    assert!(settled <= ledger.house_balance() * 0.9 + 1e-9);
    assert!(ledger.process_win(settled.max(0.01)).is_ok() || settled == 0.0);
}
