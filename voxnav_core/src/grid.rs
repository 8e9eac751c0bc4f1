// Dense 2-bit packed pathing classification.
//
// Stores one `PathingBlockType` per cell, four cells per byte, using the
// `to_u2`/`from_u2` encoding from `block_type.rs`. Each Y layer starts on a
// byte boundary so layers can be filled independently; construction runs
// one layer per rayon task.
//
// A grid is built once from a captured `VoxelWorld` and never modified
// afterwards, so it can be shared across search threads behind an `Arc`.

use crate::block_type::PathingBlockType;
use crate::types::VoxelCoord;
use crate::world::VoxelWorld;
use rayon::prelude::*;

#[derive(Clone, Debug)]
pub struct PathingGrid {
    bits: Vec<u8>,
    origin: VoxelCoord,
    size_x: u32,
    size_y: u32,
    size_z: u32,
    layer_bytes: usize,
}

impl PathingGrid {
    /// Classify every cell of `world`.
    pub fn build(world: &VoxelWorld) -> Self {
        let (sx, sy, sz) = (world.size_x, world.size_y, world.size_z);
        let layer_cells = sx as usize * sz as usize;
        let layer_bytes = layer_cells.div_ceil(4);
        let mut bits = vec![0u8; layer_bytes * sy as usize];
        let origin = world.origin;

        if layer_bytes > 0 {
            bits.par_chunks_mut(layer_bytes)
                .enumerate()
                .for_each(|(dy, layer)| {
                    let y = origin.y + dy as i32;
                    for i in 0..layer_cells {
                        let x = origin.x + (i % sx as usize) as i32;
                        let z = origin.z + (i / sx as usize) as i32;
                        let class = world.get(VoxelCoord::new(x, y, z)).pathing_type();
                        layer[i / 4] |= class.to_u2() << ((i % 4) * 2);
                    }
                });
        }

        Self {
            bits,
            origin,
            size_x: sx,
            size_y: sy,
            size_z: sz,
            layer_bytes,
        }
    }

    /// Classification at `pos`, or `None` outside the grid.
    pub fn get(&self, pos: VoxelCoord) -> Option<PathingBlockType> {
        if pos.x < self.origin.x
            || pos.y < self.origin.y
            || pos.z < self.origin.z
            || pos.x.abs_diff(self.origin.x) >= self.size_x
            || pos.y.abs_diff(self.origin.y) >= self.size_y
            || pos.z.abs_diff(self.origin.z) >= self.size_z
        {
            return None;
        }
        let dx = pos.x.abs_diff(self.origin.x);
        let dy = pos.y.abs_diff(self.origin.y);
        let dz = pos.z.abs_diff(self.origin.z);
        let i = dx as usize + dz as usize * self.size_x as usize;
        let byte = self.bits[dy as usize * self.layer_bytes + i / 4];
        Some(PathingBlockType::from_u2(byte >> ((i % 4) * 2)))
    }

    /// Heap bytes used by the packed storage.
    pub fn packed_len(&self) -> usize {
        self.bits.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BlockKind;

    #[test]
    fn matches_world_classification() {
        let mut world = VoxelWorld::with_origin(VoxelCoord::new(-3, 10, 2), 7, 5, 3);
        world.fill_layer(10, BlockKind::Stone);
        world.set(VoxelCoord::new(0, 11, 3), BlockKind::Water);
        world.set(VoxelCoord::new(2, 12, 4), BlockKind::Lava);
        world.set(VoxelCoord::new(-3, 14, 2), BlockKind::Glass);

        let grid = PathingGrid::build(&world);
        for y in 10..15 {
            for z in 2..5 {
                for x in -3..4 {
                    let pos = VoxelCoord::new(x, y, z);
                    assert_eq!(grid.get(pos), Some(world.get(pos).pathing_type()), "{pos}");
                }
            }
        }
    }

    #[test]
    fn packs_four_cells_per_byte() {
        // 7 * 3 = 21 cells per layer -> 6 bytes, 5 layers.
        let world = VoxelWorld::new(7, 5, 3);
        let grid = PathingGrid::build(&world);
        assert_eq!(grid.packed_len(), 30);
    }

    #[test]
    fn outside_grid_is_none() {
        let grid = PathingGrid::build(&VoxelWorld::new(4, 4, 4));
        assert_eq!(grid.get(VoxelCoord::new(4, 0, 0)), None);
        assert_eq!(grid.get(VoxelCoord::new(0, -1, 0)), None);
        let world = VoxelWorld::with_origin(VoxelCoord::new(-8, -8, -8), 16, 16, 16);
        let grid = PathingGrid::build(&world);
        assert_eq!(grid.get(VoxelCoord::new(i32::MAX, 0, 0)), None);
        assert_eq!(grid.get(VoxelCoord::new(0, i32::MIN, i32::MAX)), None);
    }

    #[test]
    fn empty_world_builds() {
        let grid = PathingGrid::build(&VoxelWorld::default());
        assert_eq!(grid.packed_len(), 0);
        assert_eq!(grid.get(VoxelCoord::new(0, 0, 0)), None);
    }
}
