use serde::{Deserialize, Serialize};

use crate::Difficulty;

/// Lifetime player statistics, persisted by the client between sessions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub total_games_played: u64,
    pub total_winnings: f64,
    pub best_score: u32,
    pub win_streak: u32,
    pub longest_win_streak: u32,
    #[serde(default)]
    pub wins: u64,
    #[serde(default)]
    pub total_score: u64,
    #[serde(default)]
    pub last_game_time: i64,
}

impl PlayerStats {
    pub fn record_win(&mut self, score: u32, winnings: f64, timestamp: i64) {
        self.total_games_played += 1;
        self.wins += 1;
        self.total_winnings += winnings;
        self.best_score = self.best_score.max(score);
        self.win_streak += 1;
        self.longest_win_streak = self.longest_win_streak.max(self.win_streak);
        self.total_score += u64::from(score);
        self.last_game_time = timestamp;
    }

    pub fn record_loss(&mut self, score: u32, timestamp: i64) {
        self.total_games_played += 1;
        self.win_streak = 0;
        self.total_score += u64::from(score);
        self.last_game_time = timestamp;
    }

    pub fn win_rate(&self) -> f64 {
        if self.total_games_played == 0 {
            0.0
        } else {
            self.wins as f64 / self.total_games_played as f64
        }
    }

    pub fn average_score(&self) -> f64 {
        if self.total_games_played == 0 {
            0.0
        } else {
            self.total_score as f64 / self.total_games_played as f64
        }
    }
}

const ADJUSTMENT_MIN_GAMES: u64 = 5;

/// Steps the difficulty up for players who win big consistently and down
/// for players who are struggling. No-op before five games.
pub fn adjust_difficulty(current: Difficulty, stats: &PlayerStats) -> Difficulty {
    if stats.total_games_played < ADJUSTMENT_MIN_GAMES {
        return current;
    }

    let win_rate = stats.win_rate();
    let average_score = stats.average_score();

    if win_rate > 0.8 && average_score > 1000.0 {
        current.step_up()
    } else if win_rate < 0.3 && average_score < 500.0 {
        current.step_down()
    } else {
        current
    }
}
