use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{GameSession, Pos};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintKind {
    Safe,
    Risky,
    Adjacent,
    Pattern,
}

impl HintKind {
    pub const fn message(self) -> &'static str {
        match self {
            HintKind::Safe => "This cell appears to be safe based on quantum field analysis",
            HintKind::Risky => "High probability of quantum field - proceed with caution",
            HintKind::Adjacent => "Adjacent cells contain quantum fields",
            HintKind::Pattern => {
                "Following the quantum field pattern, this area is likely safe"
            }
        }
    }

    pub const fn confidence(self) -> f64 {
        match self {
            HintKind::Safe => 0.8,
            HintKind::Risky => 0.9,
            HintKind::Adjacent => 0.7,
            HintKind::Pattern => 0.6,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hint {
    pub kind: HintKind,
    pub target: Pos,
    pub confidence: f64,
}

impl Hint {
    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

/// Classifies `target` into a hint, gated by the difficulty's hint
/// frequency. Returns `None` most of the time by design of the frequency
/// table.
pub fn generate_hint(
    session: &GameSession,
    target: Pos,
    rng: &mut impl Rng,
) -> Option<Hint> {
    let frequency = session.difficulty().config().hint_frequency;
    if rng.random::<f64>() > frequency {
        return None;
    }

    let probability = session.probability(target);
    let adjacent_fields = session.adjacent_field_count(target);

    let kind = if probability < 0.2 {
        HintKind::Safe
    } else if probability > 0.7 {
        HintKind::Risky
    } else if adjacent_fields > 0 {
        HintKind::Adjacent
    } else {
        HintKind::Pattern
    };

    Some(Hint {
        kind,
        target,
        confidence: kind.confidence(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Difficulty, FieldLayout, GameVariant};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn session(fields: &[Pos]) -> GameSession {
        let layout = FieldLayout::from_cells(6, fields).unwrap();
        GameSession::from_layout(Difficulty::Beginner, GameVariant::Enhanced, layout)
    }

    /// Seed chosen so the first draw passes the beginner hint gate.
    fn passing_rng() -> StdRng {
        let mut probe = 0;
        loop {
            let mut rng = StdRng::seed_from_u64(probe);
            if rng.random::<f64>() <= 0.3 {
                return StdRng::seed_from_u64(probe);
            }
            probe += 1;
        }
    }

    #[test]
    fn far_cells_classify_as_safe() {
        let game = session(&[(0, 0)]);
        let hint = generate_hint(&game, (5, 5), &mut passing_rng()).unwrap();
        assert_eq!(hint.kind, HintKind::Safe);
        assert_eq!(hint.confidence, 0.8);
    }

    #[test]
    fn surrounded_cells_classify_as_risky() {
        let game = session(&[(0, 0), (0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)]);
        let hint = generate_hint(&game, (1, 1), &mut passing_rng()).unwrap();
        assert_eq!(hint.kind, HintKind::Risky);
    }

    #[test]
    fn hint_gate_mostly_stays_silent_on_master() {
        let layout = FieldLayout::from_cells(6, &[(0, 0)]).unwrap();
        // master has a 5% hint rate; over many draws the vast majority miss
        let game =
            GameSession::from_layout(Difficulty::Master, GameVariant::Enhanced, layout);
        let mut rng = StdRng::seed_from_u64(11);
        let produced = (0..200)
            .filter(|_| generate_hint(&game, (5, 5), &mut rng).is_some())
            .count();
        assert!(produced < 40, "hint gate produced {produced}/200");
    }
}
