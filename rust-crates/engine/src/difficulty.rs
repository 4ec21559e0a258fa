use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Per-difficulty tuning knobs.
///
/// `field_probability` is the difficulty's nominal risk level; it feeds the
/// score and winnings multipliers, not the field placement itself.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DifficultyConfig {
    pub field_probability: f64,
    pub quantum_fields: u16,
    pub grid_size: u8,
    pub hint_frequency: f64,
    pub power_up_frequency: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Easy,
    Medium,
    Hard,
    Expert,
    Master,
}

impl Difficulty {
    pub const ALL: [Difficulty; 6] = [
        Difficulty::Beginner,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
        Difficulty::Master,
    ];

    pub const fn config(self) -> DifficultyConfig {
        match self {
            Difficulty::Beginner => DifficultyConfig {
                field_probability: 0.15,
                quantum_fields: 6,
                grid_size: 6,
                hint_frequency: 0.3,
                power_up_frequency: 0.4,
            },
            Difficulty::Easy => DifficultyConfig {
                field_probability: 0.25,
                quantum_fields: 8,
                grid_size: 8,
                hint_frequency: 0.25,
                power_up_frequency: 0.3,
            },
            Difficulty::Medium => DifficultyConfig {
                field_probability: 0.4,
                quantum_fields: 12,
                grid_size: 8,
                hint_frequency: 0.2,
                power_up_frequency: 0.25,
            },
            Difficulty::Hard => DifficultyConfig {
                field_probability: 0.6,
                quantum_fields: 16,
                grid_size: 10,
                hint_frequency: 0.15,
                power_up_frequency: 0.2,
            },
            Difficulty::Expert => DifficultyConfig {
                field_probability: 0.75,
                quantum_fields: 20,
                grid_size: 12,
                hint_frequency: 0.1,
                power_up_frequency: 0.15,
            },
            Difficulty::Master => DifficultyConfig {
                field_probability: 0.9,
                quantum_fields: 30,
                grid_size: 16,
                hint_frequency: 0.05,
                power_up_frequency: 0.1,
            },
        }
    }

    /// Difficulty tier value expected by the contract's `startGame`.
    pub const fn contract_tier(self) -> u8 {
        match self {
            Difficulty::Easy => 30,
            Difficulty::Medium => 50,
            Difficulty::Hard => 70,
            _ => 50,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
            Difficulty::Master => "master",
        }
    }

    pub fn step_up(self) -> Difficulty {
        let idx = Self::ALL.iter().position(|&d| d == self).unwrap_or(0);
        Self::ALL[(idx + 1).min(Self::ALL.len() - 1)]
    }

    pub fn step_down(self) -> Difficulty {
        let idx = Self::ALL.iter().position(|&d| d == self).unwrap_or(0);
        Self::ALL[idx.saturating_sub(1)]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(raw: &str) -> core::result::Result<Self, Self::Err> {
        Difficulty::ALL
            .iter()
            .copied()
            .find(|d| d.label() == raw.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown difficulty: {raw}"))
    }
}
