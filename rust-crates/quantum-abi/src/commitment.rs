use alloy::primitives::{B256, keccak256};
use serde::Serialize;

/// Field position as serialized into the commitment JSON.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldPos {
    pub row: u8,
    pub col: u8,
}

#[derive(Serialize)]
struct Commitment<'a> {
    grid: &'a [Vec<u8>],
    #[serde(rename = "quantumFields")]
    quantum_fields: &'a [FieldPos],
    difficulty: u8,
    timestamp: i64,
}

/// keccak256 over the canonical JSON encoding of the finished board. The
/// contract stores this hash with the submitted result; nothing on this
/// side ever verifies it.
pub fn game_commitment_hash(
    grid: &[Vec<u8>],
    quantum_fields: &[FieldPos],
    difficulty_tier: u8,
    timestamp_ms: i64,
) -> B256 {
    let commitment = Commitment {
        grid,
        quantum_fields,
        difficulty: difficulty_tier,
        timestamp: timestamp_ms,
    };
    let encoded =
        serde_json::to_vec(&commitment).expect("commitment serialization cannot fail");
    keccak256(&encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> Vec<Vec<u8>> {
        vec![vec![0, 1], vec![1, 0]]
    }

    #[test]
    fn identical_games_hash_identically() {
        let fields = [FieldPos { row: 0, col: 1 }, FieldPos { row: 1, col: 0 }];
        let a = game_commitment_hash(&sample_grid(), &fields, 50, 1_700_000_000_000);
        let b = game_commitment_hash(&sample_grid(), &fields, 50, 1_700_000_000_000);
        assert_eq!(a, b);
    }

    #[test]
    fn any_component_changes_the_hash() {
        let fields = [FieldPos { row: 0, col: 1 }];
        let base = game_commitment_hash(&sample_grid(), &fields, 50, 1);

        let other_grid = vec![vec![1, 0], vec![0, 1]];
        assert_ne!(game_commitment_hash(&other_grid, &fields, 50, 1), base);
        assert_ne!(game_commitment_hash(&sample_grid(), &[], 50, 1), base);
        assert_ne!(game_commitment_hash(&sample_grid(), &fields, 70, 1), base);
        assert_ne!(game_commitment_hash(&sample_grid(), &fields, 50, 2), base);
    }
}
