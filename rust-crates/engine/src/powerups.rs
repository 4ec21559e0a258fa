use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{GameSession, Pos, neighbors};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    QuantumScanner,
    FieldDetector,
    TimeFreeze,
    SafeReveal,
    ProbabilityBoost,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::QuantumScanner,
        PowerUpKind::FieldDetector,
        PowerUpKind::TimeFreeze,
        PowerUpKind::SafeReveal,
        PowerUpKind::ProbabilityBoost,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            PowerUpKind::QuantumScanner => "Quantum Scanner",
            PowerUpKind::FieldDetector => "Field Detector",
            PowerUpKind::TimeFreeze => "Time Freeze",
            PowerUpKind::SafeReveal => "Safe Reveal",
            PowerUpKind::ProbabilityBoost => "Probability Boost",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            PowerUpKind::QuantumScanner => "Reveals probability of adjacent cells",
            PowerUpKind::FieldDetector => "Marks all quantum fields in a 3x3 area",
            PowerUpKind::TimeFreeze => "Gives you extra time to think",
            PowerUpKind::SafeReveal => "Automatically reveals a safe cell",
            PowerUpKind::ProbabilityBoost => "Increases score multiplier by 50%",
        }
    }

    pub const fn cost(self) -> u32 {
        match self {
            PowerUpKind::QuantumScanner => 50,
            PowerUpKind::FieldDetector => 100,
            PowerUpKind::TimeFreeze => 75,
            PowerUpKind::SafeReveal => 200,
            PowerUpKind::ProbabilityBoost => 150,
        }
    }

    pub const fn duration_secs(self) -> u32 {
        match self {
            PowerUpKind::TimeFreeze => 30,
            PowerUpKind::ProbabilityBoost => 5,
            _ => 1,
        }
    }
}

/// A scanned unrevealed cell and whether it hides a field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReading {
    pub pos: Pos,
    pub is_field: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PowerUpEffect {
    ScannedCells(Vec<ScanReading>),
    DetectedFields(Vec<Pos>),
    TimeExtension(u32),
    RevealedSafe(Option<Pos>),
    ScoreBoost(f64),
}

/// Rolls for a power-up drop using the difficulty's drop frequency; the
/// kind itself is uniform over the catalog.
pub fn spawn_power_up(session: &GameSession, rng: &mut impl Rng) -> Option<PowerUpKind> {
    let frequency = session.difficulty().config().power_up_frequency;
    if rng.random::<f64>() > frequency {
        return None;
    }
    let idx = rng.random_range(0..PowerUpKind::ALL.len());
    Some(PowerUpKind::ALL[idx])
}

/// Resolves a power-up against the current board. The session itself is
/// not mutated here; the caller applies reveals and boosts so the UI can
/// narrate each effect.
pub fn apply_power_up(
    kind: PowerUpKind,
    session: &GameSession,
    rng: &mut impl Rng,
) -> PowerUpEffect {
    match kind {
        PowerUpKind::QuantumScanner => PowerUpEffect::ScannedCells(scan_adjacent(session)),
        PowerUpKind::FieldDetector => {
            PowerUpEffect::DetectedFields(session.layout().field_cells().to_vec())
        }
        PowerUpKind::TimeFreeze => {
            PowerUpEffect::TimeExtension(PowerUpKind::TimeFreeze.duration_secs())
        }
        PowerUpKind::SafeReveal => {
            let candidates = session.safe_unrevealed();
            let choice = if candidates.is_empty() {
                None
            } else {
                Some(candidates[rng.random_range(0..candidates.len())])
            };
            PowerUpEffect::RevealedSafe(choice)
        }
        PowerUpKind::ProbabilityBoost => PowerUpEffect::ScoreBoost(1.5),
    }
}

/// Unrevealed neighbors of every revealed cell, each reported once.
fn scan_adjacent(session: &GameSession) -> Vec<ScanReading> {
    let size = session.grid_size();
    let mut seen = BTreeSet::new();
    let mut readings = Vec::new();
    for row in 0..size {
        for col in 0..size {
            if !session.is_revealed((row, col)) {
                continue;
            }
            for pos in neighbors((row, col), size) {
                if !session.is_revealed(pos) && seen.insert(pos) {
                    readings.push(ScanReading {
                        pos,
                        is_field: session.layout().contains_field(pos),
                    });
                }
            }
        }
    }
    readings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Difficulty, FieldLayout, GameVariant};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn session(fields: &[Pos]) -> GameSession {
        let layout = FieldLayout::from_cells(4, fields).unwrap();
        GameSession::from_layout(Difficulty::Medium, GameVariant::Enhanced, layout)
    }

    #[test]
    fn scanner_reports_each_unrevealed_neighbor_once() {
        let mut game = session(&[(0, 0)]);
        game.reveal((1, 1)).unwrap();
        game.reveal((1, 2)).unwrap();

        let effect = apply_power_up(
            PowerUpKind::QuantumScanner,
            &game,
            &mut StdRng::seed_from_u64(0),
        );
        let PowerUpEffect::ScannedCells(readings) = effect else {
            panic!("expected scan readings");
        };

        let positions: Vec<Pos> = readings.iter().map(|r| r.pos).collect();
        let mut deduped = positions.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(positions.len(), deduped.len());
        assert!(readings.iter().any(|r| r.pos == (0, 0) && r.is_field));
    }

    #[test]
    fn detector_reports_every_field() {
        let game = session(&[(0, 0), (3, 3)]);
        let effect = apply_power_up(
            PowerUpKind::FieldDetector,
            &game,
            &mut StdRng::seed_from_u64(0),
        );
        assert_eq!(
            effect,
            PowerUpEffect::DetectedFields(vec![(0, 0), (3, 3)])
        );
    }

    #[test]
    fn safe_reveal_only_picks_safe_unrevealed_cells() {
        let mut game = session(&[(0, 0), (0, 1)]);
        game.reveal((3, 3)).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..20 {
            let effect = apply_power_up(PowerUpKind::SafeReveal, &game, &mut rng);
            let PowerUpEffect::RevealedSafe(Some(pos)) = effect else {
                panic!("expected a safe cell");
            };
            assert!(!game.layout().contains_field(pos));
            assert!(!game.is_revealed(pos));
        }
    }

    #[test]
    fn safe_reveal_yields_nothing_on_a_cleared_board() {
        let mut game = session(&[(0, 0)]);
        for pos in game.safe_unrevealed() {
            let _ = game.reveal(pos);
        }
        let effect =
            apply_power_up(PowerUpKind::SafeReveal, &game, &mut StdRng::seed_from_u64(0));
        assert_eq!(effect, PowerUpEffect::RevealedSafe(None));
    }

    #[test]
    fn spawn_honors_the_drop_frequency() {
        let game = session(&[(0, 0)]);
        let mut rng = StdRng::seed_from_u64(3);
        let drops = (0..400)
            .filter(|_| spawn_power_up(&game, &mut rng).is_some())
            .count();
        // medium drops 25% of the time
        assert!((50..=150).contains(&drops), "unexpected drop count {drops}");
    }
}
