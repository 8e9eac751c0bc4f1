// Horizontal world border.
//
// The border is an axis-aligned rectangle in X/Z. A cell column is usable
// when its whole 1x1 footprint overlaps the interior; placing a block needs
// one more block of margin, since the block being placed against must also
// sit inside the border.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldBorder {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl WorldBorder {
    /// A square border of side `size` centered on `(center_x, center_z)`.
    pub fn centered(center_x: f64, center_z: f64, size: f64) -> Self {
        let half = size / 2.0;
        Self {
            min_x: center_x - half,
            max_x: center_x + half,
            min_z: center_z - half,
            max_z: center_z + half,
        }
    }

    /// No effective border.
    pub fn unbounded() -> Self {
        Self::centered(0.0, 0.0, 60_000_000.0)
    }

    /// The column `(x, z)` lies inside the border.
    pub fn entirely_contains(&self, x: i32, z: i32) -> bool {
        let (x, z) = (x as f64, z as f64);
        x + 1.0 > self.min_x && x < self.max_x && z + 1.0 > self.min_z && z < self.max_z
    }

    /// A block may be placed in column `(x, z)`.
    pub fn can_place_at(&self, x: i32, z: i32) -> bool {
        let (x, z) = (x as f64, z as f64);
        x > self.min_x && x + 1.0 < self.max_x && z > self.min_z && z + 1.0 < self.max_z
    }
}

impl Default for WorldBorder {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_has_one_block_inset() {
        let border = WorldBorder {
            min_x: 0.0,
            max_x: 10.0,
            min_z: 0.0,
            max_z: 10.0,
        };
        assert!(border.entirely_contains(0, 0));
        assert!(border.entirely_contains(9, 9));
        assert!(!border.entirely_contains(10, 5));
        assert!(!border.entirely_contains(-1, 5));

        assert!(!border.can_place_at(0, 5));
        assert!(border.can_place_at(1, 5));
        assert!(border.can_place_at(8, 8));
        assert!(!border.can_place_at(9, 5));
    }

    #[test]
    fn centered_border() {
        let border = WorldBorder::centered(0.0, 0.0, 20.0);
        assert!(border.entirely_contains(-10, 9));
        assert!(!border.entirely_contains(10, 0));
        assert!(WorldBorder::default().can_place_at(1_000_000, -1_000_000));
    }
}
