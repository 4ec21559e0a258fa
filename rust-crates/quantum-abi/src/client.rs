use alloy::primitives::{Address, B256, I256, TxHash, U256};
use alloy::providers::{DynProvider, PendingTransactionError};
use thiserror::Error;

use crate::QuantumGrid;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Contract(#[from] alloy::contract::Error),
    #[error(transparent)]
    Confirmation(#[from] PendingTransactionError),
}

/// Decoded `getStats()` tuple with honest field names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractStats {
    pub house_balance: U256,
    pub total_games_played: U256,
    pub total_winnings_paid: U256,
    pub house_fee_bps: U256,
    pub min_bet: U256,
    pub max_bet: U256,
    pub matic_price: I256,
}

/// Thin typed client over the deployed contract. Mutating calls wait for
/// inclusion and hand back the transaction hash; read calls decode into
/// plain values.
#[derive(Clone, Debug)]
pub struct QuantumGridClient {
    address: Address,
    provider: DynProvider,
}

impl QuantumGridClient {
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self { address, provider }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn start_game(
        &self,
        grid_size: u64,
        quantum_fields: u64,
        difficulty_tier: u64,
        bet_wei: U256,
    ) -> ClientResult<TxHash> {
        let contract = QuantumGrid::new(self.address, self.provider.clone());
        let tx_hash = contract
            .startGame(
                U256::from(grid_size),
                U256::from(quantum_fields),
                U256::from(difficulty_tier),
            )
            .value(bet_wei)
            .send()
            .await?
            .watch()
            .await?;
        Ok(tx_hash)
    }

    pub async fn submit_game_result(
        &self,
        score: u64,
        revealed_cells: u64,
        revealed_positions: Vec<u32>,
        game_hash: B256,
    ) -> ClientResult<TxHash> {
        let positions = revealed_positions.into_iter().map(U256::from).collect();
        let contract = QuantumGrid::new(self.address, self.provider.clone());
        let tx_hash = contract
            .submitGameResult(
                U256::from(score),
                U256::from(revealed_cells),
                positions,
                game_hash,
            )
            .send()
            .await?
            .watch()
            .await?;
        Ok(tx_hash)
    }

    pub async fn claim_winnings(&self) -> ClientResult<TxHash> {
        let contract = QuantumGrid::new(self.address, self.provider.clone());
        let tx_hash = contract.claimWinnings().send().await?.watch().await?;
        Ok(tx_hash)
    }

    pub async fn fund_house(&self, amount_wei: U256) -> ClientResult<TxHash> {
        let contract = QuantumGrid::new(self.address, self.provider.clone());
        let tx_hash = contract
            .fundHouse()
            .value(amount_wei)
            .send()
            .await?
            .watch()
            .await?;
        Ok(tx_hash)
    }

    pub async fn player_winnings(&self, player: Address) -> ClientResult<U256> {
        let contract = QuantumGrid::new(self.address, self.provider.clone());
        Ok(contract.getPlayerWinnings(player).call().await?)
    }

    pub async fn house_balance(&self) -> ClientResult<U256> {
        let contract = QuantumGrid::new(self.address, self.provider.clone());
        Ok(contract.getHouseBalance().call().await?)
    }

    pub async fn player_stats(&self, player: Address) -> ClientResult<QuantumGrid::PlayerStats> {
        let contract = QuantumGrid::new(self.address, self.provider.clone());
        Ok(contract.getPlayerStats(player).call().await?)
    }

    pub async fn daily_leaderboard(&self) -> ClientResult<Vec<QuantumGrid::LeaderboardEntry>> {
        let contract = QuantumGrid::new(self.address, self.provider.clone());
        Ok(contract.getDailyLeaderboard().call().await?)
    }

    pub async fn weekly_leaderboard(&self) -> ClientResult<Vec<QuantumGrid::LeaderboardEntry>> {
        let contract = QuantumGrid::new(self.address, self.provider.clone());
        Ok(contract.getWeeklyLeaderboard().call().await?)
    }

    pub async fn all_time_leaderboard(
        &self,
    ) -> ClientResult<Vec<QuantumGrid::LeaderboardEntry>> {
        let contract = QuantumGrid::new(self.address, self.provider.clone());
        Ok(contract.getAllTimeLeaderboard().call().await?)
    }

    pub async fn matic_price(&self) -> ClientResult<I256> {
        let contract = QuantumGrid::new(self.address, self.provider.clone());
        Ok(contract.getMaticPrice().call().await?)
    }

    pub async fn stats(&self) -> ClientResult<ContractStats> {
        let contract = QuantumGrid::new(self.address, self.provider.clone());
        let raw = contract.getStats().call().await?;
        Ok(ContractStats {
            house_balance: raw._houseBalance,
            total_games_played: raw._totalGamesPlayed,
            total_winnings_paid: raw._totalWinningsPaid,
            house_fee_bps: raw._houseFee,
            min_bet: raw._minBet,
            max_bet: raw._maxBet,
            matic_price: raw._maticPrice,
        })
    }
}
