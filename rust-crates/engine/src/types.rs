/// Single coordinate axis used for grid width, height, and positions.
pub type Coord = u8;

/// Grid position as `(row, col)`.
pub type Pos = (Coord, Coord);

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `pos`, returning a value only while it stays inside a
/// `size` x `size` grid.
fn apply_delta(pos: Pos, delta: (i8, i8), size: Coord) -> Option<Pos> {
    let (row, col) = pos;
    let (dr, dc) = delta;

    let next_row = row.checked_add_signed(dr)?;
    if next_row >= size {
        return None;
    }

    let next_col = col.checked_add_signed(dc)?;
    if next_col >= size {
        return None;
    }

    Some((next_row, next_col))
}

/// Iterates the 8-neighborhood of `pos` within a `size` x `size` grid.
pub fn neighbors(pos: Pos, size: Coord) -> impl Iterator<Item = Pos> {
    DISPLACEMENTS
        .iter()
        .filter_map(move |&delta| apply_delta(pos, delta, size))
}

/// Flat cell index (`row * size + col`) used when encoding revealed
/// positions for the contract.
pub fn flat_index(pos: Pos, size: Coord) -> u32 {
    u32::from(pos.0) * u32::from(size) + u32::from(pos.1)
}

/// Euclidean distance between two grid positions.
pub fn distance(a: Pos, b: Pos) -> f64 {
    let dr = f64::from(a.0) - f64::from(b.0);
    let dc = f64::from(a.1) - f64::from(b.1);
    (dr * dr + dc * dc).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_clips_at_grid_edges() {
        let corner: Vec<Pos> = neighbors((0, 0), 4).collect();
        assert_eq!(corner, vec![(0, 1), (1, 0), (1, 1)]);

        let center: Vec<Pos> = neighbors((1, 1), 3).collect();
        assert_eq!(center.len(), 8);
    }

    #[test]
    fn flat_index_is_row_major() {
        assert_eq!(flat_index((0, 0), 8), 0);
        assert_eq!(flat_index((1, 0), 8), 8);
        assert_eq!(flat_index((2, 3), 8), 19);
    }
}
