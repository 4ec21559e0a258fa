//! Typed interface to the QuantumGrid contract.
//!
//! The contract itself lives outside this repository; everything here
//! encodes calls against its ABI. The bindings are shared by the game
//! client, the deploy CLI, and the testnet bank.

use alloy::sol;

pub use client::*;
pub use commitment::*;
pub use networks::*;

mod client;
mod commitment;
mod networks;

sol! {
    #[sol(rpc)]
    contract QuantumGrid {
        struct PlayerStats {
            uint256 totalGamesPlayed;
            uint256 totalWinnings;
            uint256 bestScore;
            uint256 winStreak;
            uint256 longestWinStreak;
            uint256 lastGameTime;
        }

        struct LeaderboardEntry {
            address player;
            uint256 score;
            uint256 timestamp;
        }

        function startGame(uint256 gridSize, uint256 quantumFields, uint256 difficulty) external payable;
        function submitGameResult(uint256 score, uint256 revealedCells, uint256[] calldata revealedPositions, bytes32 gameHash) external;
        function claimWinnings() external;
        function fundHouse() external payable;
        function getPlayerWinnings(address player) external view returns (uint256);
        function getHouseBalance() external view returns (uint256);
        function getPlayerStats(address player) external view returns (PlayerStats memory);
        function getDailyLeaderboard() external view returns (LeaderboardEntry[] memory);
        function getWeeklyLeaderboard() external view returns (LeaderboardEntry[] memory);
        function getAllTimeLeaderboard() external view returns (LeaderboardEntry[] memory);
        function getMaticPrice() external view returns (int256);
        function getStats() external view returns (uint256 _houseBalance, uint256 _totalGamesPlayed, uint256 _totalWinningsPaid, uint256 _houseFee, uint256 _minBet, uint256 _maxBet, int256 _maticPrice);

        event GameStarted(address indexed player, uint256 betAmount, uint256 gridSize, uint256 quantumFields, uint256 difficulty);
        event GameCompleted(address indexed player, uint256 betAmount, uint256 score, uint256 winnings, bool won);
        event WinningsClaimed(address indexed player, uint256 amount);
        event LeaderboardUpdated(address indexed player, uint256 score, uint256 position);
        event PlayerStatsUpdated(address indexed player, uint256 totalGames, uint256 totalWinnings, uint256 bestScore);
    }
}

sol! {
    // LINK is an ERC-677 token; the funding tooling only needs the ERC-20
    // surface.
    #[sol(rpc)]
    contract LinkToken {
        function transfer(address to, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
    }
}
