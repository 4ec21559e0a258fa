use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{FieldLayout, Pos, distance, neighbors};

/// Which risk heuristic drives probabilities and scoring.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbabilityModel {
    /// Plain neighbor counting, 12.5% per adjacent field, capped at 80%.
    Classic,
    /// Neighbor counting plus pattern and distance heuristics, capped at 95%.
    Advanced,
}

const CLASSIC_NEIGHBOR_WEIGHT: f64 = 0.125;
const CLASSIC_CAP: f64 = 0.8;
const ADVANCED_NEIGHBOR_WEIGHT: f64 = 0.15;
const ADVANCED_CAP: f64 = 0.95;
const PATTERN_CAP: f64 = 0.3;
const CLUSTER_RADIUS: i16 = 2;

/// Per-cell risk scores in `[0, 1]`, derived once from a field layout.
/// Field cells are pinned to 1.0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityMatrix {
    values: Array2<f64>,
}

impl ProbabilityMatrix {
    pub fn for_model(model: ProbabilityModel, layout: &FieldLayout) -> Self {
        match model {
            ProbabilityModel::Classic => Self::classic(layout),
            ProbabilityModel::Advanced => Self::advanced(layout),
        }
    }

    pub fn classic(layout: &FieldLayout) -> Self {
        Self::build(layout, |layout, pos| {
            let adjacent = f64::from(layout.adjacent_field_count(pos));
            (adjacent * CLASSIC_NEIGHBOR_WEIGHT).min(CLASSIC_CAP)
        })
    }

    pub fn advanced(layout: &FieldLayout) -> Self {
        Self::build(layout, |layout, pos| {
            let adjacent = f64::from(layout.adjacent_field_count(pos));
            let probability = adjacent * ADVANCED_NEIGHBOR_WEIGHT
                + pattern_bonus(layout, pos)
                + distance_decay(layout, pos);
            // the corner adjustment can push an empty corner below zero
            probability.clamp(0.0, ADVANCED_CAP)
        })
    }

    fn build(layout: &FieldLayout, cell_value: impl Fn(&FieldLayout, Pos) -> f64) -> Self {
        let size = layout.size() as usize;
        let mut values = Array2::zeros((size, size));
        for row in 0..layout.size() {
            for col in 0..layout.size() {
                let pos = (row, col);
                values[(row as usize, col as usize)] = if layout.contains_field(pos) {
                    1.0
                } else {
                    cell_value(layout, pos)
                };
            }
        }
        Self { values }
    }

    pub fn value(&self, pos: Pos) -> f64 {
        self.values[(pos.0 as usize, pos.1 as usize)]
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}

/// Heuristic adjustment from field clustering, edge, and corner placement,
/// capped at 30%.
fn pattern_bonus(layout: &FieldLayout, pos: Pos) -> f64 {
    let bonus = cluster_score(layout, pos) * 0.1
        + edge_score(layout, pos) * 0.05
        + corner_score(layout, pos) * 0.08;
    bonus.min(PATTERN_CAP)
}

fn cluster_score(layout: &FieldLayout, pos: Pos) -> f64 {
    let size = i16::from(layout.size());
    let mut score = 0.0;
    for dr in -CLUSTER_RADIUS..=CLUSTER_RADIUS {
        for dc in -CLUSTER_RADIUS..=CLUSTER_RADIUS {
            let row = i16::from(pos.0) + dr;
            let col = i16::from(pos.1) + dc;
            if row < 0 || row >= size || col < 0 || col >= size {
                continue;
            }
            if layout.contains_field((row as u8, col as u8)) {
                let d = f64::from(dr * dr + dc * dc).sqrt();
                score += (1.0 - d / f64::from(CLUSTER_RADIUS)).max(0.0);
            }
        }
    }
    score
}

fn edge_score(layout: &FieldLayout, pos: Pos) -> f64 {
    let edge = layout.size() - 1;
    if pos.0 == 0 || pos.0 == edge || pos.1 == 0 || pos.1 == edge {
        let adjacent = neighbors(pos, layout.size())
            .filter(|&p| layout.contains_field(p))
            .count();
        adjacent as f64 * 0.1
    } else {
        0.0
    }
}

fn corner_score(layout: &FieldLayout, pos: Pos) -> f64 {
    let edge = layout.size() - 1;
    let is_corner = (pos.0 == 0 || pos.0 == edge) && (pos.1 == 0 || pos.1 == edge);
    if is_corner { -0.1 } else { 0.0 }
}

/// Cells near fields are riskier: a term for the closest field plus a
/// weaker term for the mean distance over every field.
fn distance_decay(layout: &FieldLayout, pos: Pos) -> f64 {
    let fields = layout.field_cells();
    if fields.is_empty() {
        return 0.0;
    }

    let mut min_distance = f64::INFINITY;
    let mut total_distance = 0.0;
    for &field in fields {
        let d = distance(pos, field);
        min_distance = min_distance.min(d);
        total_distance += d;
    }

    let nearest = (0.3 - min_distance * 0.05).max(0.0);
    let average = total_distance / fields.len() as f64;
    let spread = (0.1 - average * 0.02).max(0.0);
    nearest + spread
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Difficulty;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn every_value_stays_within_unit_range() {
        for difficulty in Difficulty::ALL {
            let mut rng = StdRng::seed_from_u64(99);
            let layout = FieldLayout::generate(&difficulty.config(), &mut rng);
            for model in [ProbabilityModel::Classic, ProbabilityModel::Advanced] {
                let matrix = ProbabilityMatrix::for_model(model, &layout);
                for value in matrix.iter() {
                    assert!((0.0..=1.0).contains(&value), "{model:?}: {value}");
                }
            }
        }
    }

    #[test]
    fn field_cells_are_pinned_to_one() {
        let layout = FieldLayout::from_cells(6, &[(2, 2), (5, 0)]).unwrap();
        for model in [ProbabilityModel::Classic, ProbabilityModel::Advanced] {
            let matrix = ProbabilityMatrix::for_model(model, &layout);
            assert_eq!(matrix.value((2, 2)), 1.0);
            assert_eq!(matrix.value((5, 0)), 1.0);
        }
    }

    #[test]
    fn classic_counts_neighbors_at_one_eighth_each() {
        let layout = FieldLayout::from_cells(4, &[(0, 0), (0, 2)]).unwrap();
        let matrix = ProbabilityMatrix::classic(&layout);
        // (0,1) touches both fields, (3,3) touches none.
        assert_eq!(matrix.value((0, 1)), 0.25);
        assert_eq!(matrix.value((3, 3)), 0.0);
    }

    #[test]
    fn classic_caps_at_eighty_percent() {
        let ring = [
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 0),
            (1, 2),
            (2, 0),
            (2, 1),
            (2, 2),
        ];
        let layout = FieldLayout::from_cells(3, &ring).unwrap();
        let matrix = ProbabilityMatrix::classic(&layout);
        assert_eq!(matrix.value((1, 1)), 0.8);
    }

    #[test]
    fn advanced_exceeds_classic_near_dense_clusters() {
        let layout = FieldLayout::from_cells(6, &[(1, 1), (1, 2), (2, 1)]).unwrap();
        let classic = ProbabilityMatrix::classic(&layout);
        let advanced = ProbabilityMatrix::advanced(&layout);
        assert!(advanced.value((2, 2)) > classic.value((2, 2)));
    }
}
