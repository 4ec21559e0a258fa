use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Coord, DifficultyConfig, GameError, Pos, Result, neighbors};

/// Placement of quantum fields on a square grid, fixed for the lifetime of
/// one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldLayout {
    field_mask: Array2<bool>,
    field_cells: Vec<Pos>,
}

impl FieldLayout {
    /// Places fields by uniform sampling without replacement: draw cells
    /// until the requested count of distinct empty cells is filled.
    pub fn generate(config: &DifficultyConfig, rng: &mut impl Rng) -> Self {
        let size = config.grid_size;
        let total = u16::from(size) * u16::from(size);
        let mut requested = config.quantum_fields;
        if requested > total {
            tracing::warn!(
                requested,
                total,
                "field count exceeds the grid, clamping to a full grid"
            );
            requested = total;
        }

        let mut field_mask = Array2::from_elem((size as usize, size as usize), false);
        let mut field_cells = Vec::with_capacity(requested as usize);
        while field_cells.len() < requested as usize {
            let row = rng.random_range(0..size);
            let col = rng.random_range(0..size);
            if !field_mask[(row as usize, col as usize)] {
                field_mask[(row as usize, col as usize)] = true;
                field_cells.push((row, col));
            }
        }

        Self {
            field_mask,
            field_cells,
        }
    }

    /// Builds a layout from explicit field positions. Used by tests and
    /// fixtures where the board must be known in advance.
    pub fn from_cells(size: Coord, cells: &[Pos]) -> Result<Self> {
        let mut field_mask = Array2::from_elem((size as usize, size as usize), false);
        let mut field_cells = Vec::with_capacity(cells.len());
        for &(row, col) in cells {
            if row >= size || col >= size {
                return Err(GameError::InvalidCell);
            }
            if !field_mask[(row as usize, col as usize)] {
                field_mask[(row as usize, col as usize)] = true;
                field_cells.push((row, col));
            }
        }
        Ok(Self {
            field_mask,
            field_cells,
        })
    }

    pub fn size(&self) -> Coord {
        self.field_mask.dim().0 as Coord
    }

    pub fn total_cells(&self) -> u16 {
        self.field_mask.len() as u16
    }

    pub fn field_count(&self) -> u16 {
        self.field_cells.len() as u16
    }

    pub fn safe_cell_count(&self) -> u16 {
        self.total_cells() - self.field_count()
    }

    pub fn field_cells(&self) -> &[Pos] {
        &self.field_cells
    }

    pub fn contains_field(&self, pos: Pos) -> bool {
        self.field_mask[(pos.0 as usize, pos.1 as usize)]
    }

    pub fn validate(&self, pos: Pos) -> Result<Pos> {
        let size = self.size();
        if pos.0 < size && pos.1 < size {
            Ok(pos)
        } else {
            Err(GameError::InvalidCell)
        }
    }

    pub fn adjacent_field_count(&self, pos: Pos) -> u8 {
        neighbors(pos, self.size())
            .filter(|&p| self.contains_field(p))
            .count() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Difficulty;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generate_places_exactly_the_configured_field_count() {
        for difficulty in Difficulty::ALL {
            let config = difficulty.config();
            let mut rng = StdRng::seed_from_u64(7);
            let layout = FieldLayout::generate(&config, &mut rng);

            assert_eq!(layout.field_count(), config.quantum_fields);
            let mask_count = layout
                .field_cells()
                .iter()
                .filter(|&&pos| layout.contains_field(pos))
                .count();
            assert_eq!(mask_count as u16, config.quantum_fields);
        }
    }

    #[test]
    fn generate_clamps_when_overfilled() {
        let config = DifficultyConfig {
            field_probability: 0.5,
            quantum_fields: 99,
            grid_size: 3,
            hint_frequency: 0.0,
            power_up_frequency: 0.0,
        };
        let mut rng = StdRng::seed_from_u64(0);
        let layout = FieldLayout::generate(&config, &mut rng);
        assert_eq!(layout.field_count(), 9);
        assert_eq!(layout.safe_cell_count(), 0);
    }

    #[test]
    fn from_cells_rejects_out_of_bounds() {
        assert_eq!(
            FieldLayout::from_cells(4, &[(4, 0)]),
            Err(GameError::InvalidCell)
        );
    }

    #[test]
    fn adjacent_field_count_scans_the_eight_neighborhood() {
        let layout = FieldLayout::from_cells(4, &[(0, 0), (1, 1), (3, 3)]).unwrap();
        assert_eq!(layout.adjacent_field_count((0, 1)), 2);
        assert_eq!(layout.adjacent_field_count((2, 2)), 2);
        assert_eq!(layout.adjacent_field_count((3, 0)), 0);
    }
}
