// Block-state access and the dense voxel world.
//
// `BlockStateProvider` is the seam to whatever owns live world state: a
// block lookup plus a chunk-loaded check. `VoxelWorld` is the crate's own
// dense implementation, stored as a flat `Vec<BlockKind>` indexed by
// `x + z * size_x + y * size_x * size_z` relative to an origin, giving O(1)
// reads. Out-of-bounds reads and reads in unloaded chunks return `None`
// from `block_at` and `BlockKind::Unknown` from `get`.
//
// `VoxelWorld::capture` deep-copies a region of any provider. It is how a
// planning pass destined for a worker thread detaches from a live world the
// main thread keeps mutating (see `CalculationContext::for_worker_thread`).
// Capture runs one Y layer per rayon task.
//
// See also: `grid.rs` for the packed classification cache built on top,
// `context.rs` which reads blocks through `BlockAccess`.

use crate::types::{BlockKind, VoxelCoord, chunk_of};
use rayon::prelude::*;
use rustc_hash::FxHashSet;

/// Read access to block states.
pub trait BlockStateProvider {
    /// Block at `pos`, or `None` when the cell cannot be read (unloaded
    /// chunk, outside the world).
    fn block_at(&self, pos: VoxelCoord) -> Option<BlockKind>;

    /// Whether the chunk containing column `(x, z)` is loaded.
    fn is_chunk_loaded(&self, x: i32, z: i32) -> bool;
}

/// Dense 3D voxel grid.
#[derive(Clone, Debug, Default)]
pub struct VoxelWorld {
    /// Flat storage: index = x + z * size_x + y * size_x * size_z, relative
    /// to `origin`.
    voxels: Vec<BlockKind>,
    /// Chunk columns `(x >> 4, z >> 4)` that are currently unloaded.
    unloaded_chunks: FxHashSet<(i32, i32)>,
    pub origin: VoxelCoord,
    pub size_x: u32,
    pub size_y: u32,
    pub size_z: u32,
}

impl VoxelWorld {
    /// Create a new world filled with `Air`, with its minimum corner at the
    /// coordinate origin.
    pub fn new(size_x: u32, size_y: u32, size_z: u32) -> Self {
        Self::with_origin(VoxelCoord::new(0, 0, 0), size_x, size_y, size_z)
    }

    /// Create a new world filled with `Air`, with its minimum corner at
    /// `origin`.
    pub fn with_origin(origin: VoxelCoord, size_x: u32, size_y: u32, size_z: u32) -> Self {
        let total = (size_x as usize) * (size_y as usize) * (size_z as usize);
        Self {
            voxels: vec![BlockKind::Air; total],
            unloaded_chunks: FxHashSet::default(),
            origin,
            size_x,
            size_y,
            size_z,
        }
    }

    /// Deep-copy the region `[origin, origin + size)` out of any provider.
    ///
    /// Unreadable cells become `Unknown`, and chunks the provider reports as
    /// unloaded across the whole region stay unloaded in the copy.
    pub fn capture<P>(provider: &P, origin: VoxelCoord, size: (u32, u32, u32)) -> Self
    where
        P: BlockStateProvider + Sync + ?Sized,
    {
        let (size_x, size_y, size_z) = size;
        let mut world = Self::with_origin(origin, size_x, size_y, size_z);
        let layer = (size_x as usize) * (size_z as usize);
        if layer == 0 || size_y == 0 {
            return world;
        }

        world
            .voxels
            .par_chunks_mut(layer)
            .enumerate()
            .for_each(|(dy, cells)| {
                let y = origin.y + dy as i32;
                for (i, cell) in cells.iter_mut().enumerate() {
                    let x = origin.x + (i % size_x as usize) as i32;
                    let z = origin.z + (i / size_x as usize) as i32;
                    *cell = provider
                        .block_at(VoxelCoord::new(x, y, z))
                        .unwrap_or(BlockKind::Unknown);
                }
            });

        // A chunk stays unloaded in the copy only if none of its captured
        // columns is loaded. Partly captured chunks keep their loaded columns
        // readable; the copy's own bounds cover the rest.
        let mut seen = FxHashSet::default();
        let mut loaded = FxHashSet::default();
        for dz in 0..size_z as i32 {
            for dx in 0..size_x as i32 {
                let (x, z) = (origin.x + dx, origin.z + dz);
                let chunk = chunk_of(x, z);
                seen.insert(chunk);
                if provider.is_chunk_loaded(x, z) {
                    loaded.insert(chunk);
                }
            }
        }
        world.unloaded_chunks = seen.difference(&loaded).copied().collect();
        world
    }

    /// Check whether a coordinate is within bounds.
    pub fn in_bounds(&self, coord: VoxelCoord) -> bool {
        self.column_in_bounds(coord.x, coord.z)
            && coord.y >= self.origin.y
            && coord.y.abs_diff(self.origin.y) < self.size_y
    }

    fn column_in_bounds(&self, x: i32, z: i32) -> bool {
        x >= self.origin.x
            && z >= self.origin.z
            && x.abs_diff(self.origin.x) < self.size_x
            && z.abs_diff(self.origin.z) < self.size_z
    }

    /// Convert a coordinate to a flat index. Returns `None` if out of bounds.
    fn index(&self, coord: VoxelCoord) -> Option<usize> {
        if self.in_bounds(coord) {
            let x = coord.x.abs_diff(self.origin.x) as usize;
            let y = coord.y.abs_diff(self.origin.y) as usize;
            let z = coord.z.abs_diff(self.origin.z) as usize;
            let sx = self.size_x as usize;
            let sz = self.size_z as usize;
            Some(x + z * sx + y * sx * sz)
        } else {
            None
        }
    }

    /// Read a voxel. Returns `Unknown` for unreadable coordinates.
    pub fn get(&self, coord: VoxelCoord) -> BlockKind {
        self.block_at(coord).unwrap_or(BlockKind::Unknown)
    }

    /// Write a voxel. No-op for out-of-bounds coordinates.
    pub fn set(&mut self, coord: VoxelCoord, block: BlockKind) {
        if let Some(i) = self.index(coord) {
            self.voxels[i] = block;
        }
    }

    /// Fill every cell at height `y` with `block`.
    pub fn fill_layer(&mut self, y: i32, block: BlockKind) {
        for dz in 0..self.size_z as i32 {
            for dx in 0..self.size_x as i32 {
                let coord = VoxelCoord::new(self.origin.x + dx, y, self.origin.z + dz);
                self.set(coord, block);
            }
        }
    }

    pub fn unload_chunk(&mut self, chunk: (i32, i32)) {
        self.unloaded_chunks.insert(chunk);
    }

    pub fn load_chunk(&mut self, chunk: (i32, i32)) {
        self.unloaded_chunks.remove(&chunk);
    }
}

impl BlockStateProvider for VoxelWorld {
    fn block_at(&self, pos: VoxelCoord) -> Option<BlockKind> {
        if !self.is_chunk_loaded(pos.x, pos.z) {
            return None;
        }
        self.index(pos).map(|i| self.voxels[i])
    }

    fn is_chunk_loaded(&self, x: i32, z: i32) -> bool {
        self.column_in_bounds(x, z) && !self.unloaded_chunks.contains(&chunk_of(x, z))
    }
}
