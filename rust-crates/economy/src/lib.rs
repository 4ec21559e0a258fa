//! Simulated house ledger for the game client.
//!
//! This is deliberately not a settlement system: balances are in-memory
//! f64 MATIC counters that vanish on restart. The contract is the economic
//! authority; the ledger only mirrors what a solvent house would allow.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = core::result::Result<T, EconomyError>;

#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum EconomyError {
    #[error("invalid bet amount")]
    InvalidBet,
    #[error("invalid winnings")]
    InvalidWinnings,
    #[error("insufficient house balance")]
    InsufficientHouseBalance,
}

/// Default house funding in MATIC when no environment override is set.
pub const DEFAULT_HOUSE_FUNDING: f64 = 100.0;

/// Fraction of winnings and lost bets retained by the house.
pub const DEFAULT_HOUSE_FEE: f64 = 0.05;

/// The house may never commit more than this fraction of its balance to a
/// single payout.
const MAX_PAYOUT_FRACTION: f64 = 0.9;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HouseStats {
    pub house_balance: f64,
    pub total_winnings_paid: f64,
    pub game_pool: f64,
    pub house_fee: f64,
    pub profit: f64,
}

/// Outcome of a successful payout.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Payout {
    pub winnings: f64,
    pub new_house_balance: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HouseLedger {
    house_balance: f64,
    total_winnings_paid: f64,
    game_pool: f64,
    house_fee: f64,
}

impl Default for HouseLedger {
    fn default() -> Self {
        Self::new(DEFAULT_HOUSE_FEE)
    }
}

impl HouseLedger {
    pub fn new(house_fee: f64) -> Self {
        Self {
            house_balance: 0.0,
            total_winnings_paid: 0.0,
            game_pool: 0.0,
            house_fee,
        }
    }

    /// Convenience constructor matching the default funded state.
    pub fn funded(amount: f64) -> Self {
        let mut ledger = Self::default();
        ledger.fund_house(amount);
        ledger
    }

    pub fn house_balance(&self) -> f64 {
        self.house_balance
    }

    pub fn house_fee(&self) -> f64 {
        self.house_fee
    }

    pub fn game_pool(&self) -> f64 {
        self.game_pool
    }

    /// Credits the house balance (admin/operator action).
    pub fn fund_house(&mut self, amount: f64) {
        self.house_balance += amount;
        tracing::info!(amount, balance = self.house_balance, "house funded");
    }

    /// Takes a bet into the game pool.
    pub fn process_bet(&mut self, bet_amount: f64) -> Result<f64> {
        if bet_amount <= 0.0 {
            return Err(EconomyError::InvalidBet);
        }
        self.game_pool += bet_amount;
        Ok(self.game_pool)
    }

    /// Winnings for a finished or cashed-out game after the house fee,
    /// capped so the house never commits more than 90% of its balance.
    pub fn calculate_winnings(
        &self,
        bet_amount: f64,
        score: u32,
        revealed_cells: u16,
        total_safe_cells: u16,
        difficulty_probability: f64,
    ) -> f64 {
        if revealed_cells == 0 {
            return 0.0;
        }

        let score_multiplier = (f64::from(score) / 1000.0).max(0.1);
        let progress_multiplier =
            (f64::from(revealed_cells) / f64::from(total_safe_cells.max(1))).max(0.1);
        let difficulty_multiplier = difficulty_probability + 0.5;

        let base_winnings =
            bet_amount * score_multiplier * progress_multiplier * difficulty_multiplier;
        self.apply_house_edge(base_winnings)
    }

    /// Applies the fee and the payout cap to a gross winnings figure.
    pub fn apply_house_edge(&self, gross_winnings: f64) -> f64 {
        let net_winnings = gross_winnings - gross_winnings * self.house_fee;
        let max_payout = self.house_balance * MAX_PAYOUT_FRACTION;
        net_winnings.min(max_payout).max(0.0)
    }

    /// Pays winnings out of the house balance.
    pub fn process_win(&mut self, winnings: f64) -> Result<Payout> {
        if winnings <= 0.0 {
            return Err(EconomyError::InvalidWinnings);
        }
        if winnings > self.house_balance {
            return Err(EconomyError::InsufficientHouseBalance);
        }

        self.house_balance -= winnings;
        self.total_winnings_paid += winnings;
        tracing::info!(winnings, balance = self.house_balance, "winnings paid");

        Ok(Payout {
            winnings,
            new_house_balance: self.house_balance,
        })
    }

    /// A lost game leaves the bet in the pool; the house keeps its fee.
    pub fn process_loss(&mut self, bet_amount: f64) -> f64 {
        let fee = bet_amount * self.house_fee;
        self.house_balance += fee;
        fee
    }

    pub fn stats(&self) -> HouseStats {
        HouseStats {
            house_balance: self.house_balance,
            total_winnings_paid: self.total_winnings_paid,
            game_pool: self.game_pool,
            house_fee: self.house_fee,
            profit: self.house_balance - self.game_pool,
        }
    }

    /// Zeroes every counter (admin action); the fee fraction is kept.
    pub fn reset(&mut self) {
        self.house_balance = 0.0;
        self.total_winnings_paid = 0.0;
        self.game_pool = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bets_accumulate_in_the_pool() {
        let mut ledger = HouseLedger::funded(100.0);
        assert_eq!(ledger.process_bet(2.5), Ok(2.5));
        assert_eq!(ledger.process_bet(1.5), Ok(4.0));
        assert_eq!(ledger.process_bet(0.0), Err(EconomyError::InvalidBet));
        assert_eq!(ledger.process_bet(-1.0), Err(EconomyError::InvalidBet));
    }

    #[test]
    fn winnings_apply_the_house_fee() {
        let ledger = HouseLedger::funded(1000.0);
        // multipliers: 1.0 * 1.0 * 1.0 = 1.0, fee 5%
        let winnings = ledger.calculate_winnings(10.0, 1000, 20, 20, 0.5);
        assert!((winnings - 9.5).abs() < 1e-9);
    }

    #[test]
    fn winnings_cap_at_ninety_percent_of_the_house() {
        let ledger = HouseLedger::funded(10.0);
        let winnings = ledger.calculate_winnings(1000.0, 9000, 20, 20, 0.7);
        assert!((winnings - 9.0).abs() < 1e-9);
    }

    #[test]
    fn winnings_are_zero_without_reveals_and_never_negative() {
        let ledger = HouseLedger::funded(100.0);
        assert_eq!(ledger.calculate_winnings(10.0, 5000, 0, 20, 0.5), 0.0);
        let broke = HouseLedger::new(DEFAULT_HOUSE_FEE);
        assert_eq!(broke.calculate_winnings(10.0, 1000, 5, 20, 0.5), 0.0);
    }

    #[test]
    fn payouts_debit_the_house() {
        let mut ledger = HouseLedger::funded(100.0);
        let payout = ledger.process_win(30.0).unwrap();
        assert_eq!(payout.new_house_balance, 70.0);
        assert_eq!(ledger.stats().total_winnings_paid, 30.0);
    }

    #[test]
    fn payouts_beyond_the_balance_are_rejected() {
        let mut ledger = HouseLedger::funded(10.0);
        assert_eq!(
            ledger.process_win(10.5),
            Err(EconomyError::InsufficientHouseBalance)
        );
        assert_eq!(ledger.process_win(-2.0), Err(EconomyError::InvalidWinnings));
        assert_eq!(ledger.house_balance(), 10.0);
    }

    #[test]
    fn losses_credit_the_fee_to_the_house() {
        let mut ledger = HouseLedger::funded(100.0);
        let fee = ledger.process_loss(10.0);
        assert!((fee - 0.5).abs() < 1e-9);
        assert!((ledger.house_balance() - 100.5).abs() < 1e-9);
    }

    #[test]
    fn stats_report_profit_relative_to_the_pool() {
        let mut ledger = HouseLedger::funded(100.0);
        ledger.process_bet(20.0).unwrap();
        let stats = ledger.stats();
        assert_eq!(stats.game_pool, 20.0);
        assert_eq!(stats.profit, 80.0);
    }

    #[test]
    fn reset_keeps_the_fee_fraction() {
        let mut ledger = HouseLedger::funded(100.0);
        ledger.process_bet(5.0).unwrap();
        ledger.reset();
        assert_eq!(ledger.house_balance(), 0.0);
        assert_eq!(ledger.game_pool(), 0.0);
        assert_eq!(ledger.house_fee(), DEFAULT_HOUSE_FEE);
    }
}
