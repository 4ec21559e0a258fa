#![allow(non_snake_case)]

use economy::HouseLedger;
use engine::Difficulty;
use proptest::prelude::*;

proptest! {
    #[test]
    fn solvency__the_house_balance_never_goes_negative(
        funding in 1.0f64..1000.0,
        ops in prop::collection::vec((0.01f64..250.0, 0u8..3u8), 1..60),
    ) {
        let mut ledger = HouseLedger::funded(funding);

        for (amount, op) in ops {
            match op {
                0 => {
                    let _ = ledger.process_bet(amount);
                }
                1 => {
                    // settle a win the way the client does: edge first
                    let settled = ledger.apply_house_edge(amount);
                    if settled > 0.0 {
                        ledger.process_win(settled).unwrap();
                    }
                }
                _ => {
                    let _ = ledger.process_loss(amount);
                }
            }
            prop_assert!(ledger.house_balance() >= 0.0);
            prop_assert!(ledger.stats().total_winnings_paid >= 0.0);
        }
    }

    #[test]
    fn solvency__capped_winnings_respect_ninety_percent_of_the_house(
        funding in 0.0f64..500.0,
        bet in 0.01f64..100.0,
        score in 0u32..20_000,
        revealed in 1u16..60,
        total_safe in 60u16..226,
    ) {
        let ledger = HouseLedger::funded(funding);
        let winnings = ledger.calculate_winnings(
            bet,
            score,
            revealed,
            total_safe,
            Difficulty::Hard.config().field_probability,
        );

        prop_assert!(winnings >= 0.0);
        prop_assert!(winnings <= funding * 0.9 + 1e-9);
    }

    #[test]
    fn solvency__engine_winnings_are_never_negative(
        bet in 0.0f64..100.0,
        score in 0u32..50_000,
        revealed in 0u16..226,
        boosts in 0u32..4,
    ) {
        let winnings = engine::winnings(
            bet,
            score,
            revealed,
            226,
            Difficulty::Master,
            boosts,
            true,
        );
        prop_assert!(winnings >= 0.0);
        if revealed == 0 {
            prop_assert_eq!(winnings, 0.0);
        }
    }
}

#[test]
fn solvency__a_win_cycle_conserves_the_ledger_totals() {
    // given
    let mut ledger = HouseLedger::funded(200.0);
    let starting = ledger.house_balance();

    // when: a player bets, loses, bets again, and cashes a capped win
    ledger.process_bet(10.0).unwrap();
    let fee = ledger.process_loss(10.0);
    ledger.process_bet(10.0).unwrap();
    let settled = ledger.apply_house_edge(40.0);
    ledger.process_win(settled).unwrap();

    // then
    let stats = ledger.stats();
    let expected_balance = starting + fee - settled;
    assert!((stats.house_balance - expected_balance).abs() < 1e-9);
    assert!((stats.game_pool - 20.0).abs() < 1e-9);
    assert!((stats.total_winnings_paid - settled).abs() < 1e-9);
}
