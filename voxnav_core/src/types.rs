// Core types shared across the cost model.
//
// Defines spatial coordinates (`VoxelCoord`), block materials (`BlockKind`),
// dimensions, and block faces. All types derive `Serialize` and `Deserialize`
// so configs and goals can be stored as JSON.
//
// See also: `block_type.rs` for the 2-bit pathing classification each
// `BlockKind` maps to, `agent.rs` for the tool classes used by `hardness()`.

use crate::block_type::PathingBlockType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of a chunk column in voxels along X and Z.
pub const CHUNK_WIDTH: i32 = 16;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A position in the 3D voxel grid. Each component is in voxel units.
///
/// - X: east  (positive) / west  (negative)
/// - Y: up    (positive) / down  (negative)
/// - Z: south (positive) / north (negative)
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct VoxelCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Manhattan distance between two coordinates. Total over the whole
    /// `i32` range.
    pub fn manhattan_distance(self, other: Self) -> u64 {
        u64::from(self.x.abs_diff(other.x))
            + u64::from(self.y.abs_diff(other.y))
            + u64::from(self.z.abs_diff(other.z))
    }

    /// Chunk column containing this coordinate. Uses arithmetic shift so
    /// negative coordinates land in the correct chunk.
    pub const fn chunk_xz(self) -> (i32, i32) {
        chunk_of(self.x, self.z)
    }
}

/// Chunk column containing the column `(x, z)`.
pub const fn chunk_of(x: i32, z: i32) -> (i32, i32) {
    (x >> 4, z >> 4)
}

impl fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the six block faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Facing {
    /// The face of a block at `target` seen from `from`, when the two are
    /// face-adjacent or share a column/row. Returns `None` for coincident
    /// positions and for pure diagonals, where no single face is closest.
    pub fn from_offset(from: VoxelCoord, target: VoxelCoord) -> Option<Self> {
        use std::cmp::Ordering::{Equal, Greater, Less};
        let axes = (from.x.cmp(&target.x), from.y.cmp(&target.y), from.z.cmp(&target.z));
        match axes {
            (Greater, Equal, Equal) => Some(Facing::East),
            (Less, Equal, Equal) => Some(Facing::West),
            (Equal, Equal, Greater) => Some(Facing::South),
            (Equal, Equal, Less) => Some(Facing::North),
            (Equal, Greater, Equal) => Some(Facing::Up),
            (Equal, Less, Equal) => Some(Facing::Down),
            _ => None,
        }
    }
}

/// The world dimension the agent is currently in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    #[default]
    Overworld,
    Nether,
    End,
}

// ---------------------------------------------------------------------------
// Block materials
// ---------------------------------------------------------------------------

/// Tool family that breaks a material fastest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolClass {
    Hand,
    Pickaxe,
    Shovel,
    Axe,
}

/// The material of a single voxel.
///
/// `Unknown` stands for any cell whose state could not be read (unloaded
/// chunk, outside the captured region). It is never breakable and classifies
/// as `Avoid`, so lookup failures never open an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockKind {
    #[default]
    Air,
    Water,
    Lava,
    Fire,
    Cactus,
    MagmaBlock,
    Cobweb,
    Stone,
    Dirt,
    Grass,
    Sand,
    Gravel,
    Cobblestone,
    Planks,
    Log,
    Leaves,
    Glass,
    Obsidian,
    Bedrock,
    Unknown,
}

impl BlockKind {
    /// Pathing relevance of this material.
    pub const fn pathing_type(self) -> PathingBlockType {
        match self {
            BlockKind::Air => PathingBlockType::Air,
            BlockKind::Water => PathingBlockType::Water,
            BlockKind::Lava
            | BlockKind::Fire
            | BlockKind::Cactus
            | BlockKind::MagmaBlock
            | BlockKind::Cobweb
            | BlockKind::Unknown => PathingBlockType::Avoid,
            _ => PathingBlockType::Solid,
        }
    }

    /// Whether any tool can ever remove this block.
    pub const fn is_breakable(self) -> bool {
        !matches!(
            self,
            BlockKind::Air
                | BlockKind::Water
                | BlockKind::Lava
                | BlockKind::Fire
                | BlockKind::Bedrock
                | BlockKind::Unknown
        )
    }

    /// Break hardness. Zero means the block breaks instantly.
    pub const fn hardness(self) -> f64 {
        match self {
            BlockKind::Fire => 0.0,
            BlockKind::Leaves => 0.2,
            BlockKind::Cactus | BlockKind::Glass => 0.4,
            BlockKind::Dirt | BlockKind::Sand | BlockKind::MagmaBlock => 0.5,
            BlockKind::Grass | BlockKind::Gravel => 0.6,
            BlockKind::Stone => 1.5,
            BlockKind::Cobblestone | BlockKind::Planks | BlockKind::Log => 2.0,
            BlockKind::Cobweb => 4.0,
            BlockKind::Obsidian => 50.0,
            BlockKind::Air
            | BlockKind::Water
            | BlockKind::Lava
            | BlockKind::Bedrock
            | BlockKind::Unknown => f64::INFINITY,
        }
    }

    pub const fn preferred_tool(self) -> ToolClass {
        match self {
            BlockKind::Stone
            | BlockKind::Cobblestone
            | BlockKind::Obsidian
            | BlockKind::MagmaBlock => ToolClass::Pickaxe,
            BlockKind::Dirt | BlockKind::Grass | BlockKind::Sand | BlockKind::Gravel => {
                ToolClass::Shovel
            }
            BlockKind::Planks | BlockKind::Log => ToolClass::Axe,
            _ => ToolClass::Hand,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voxel_coord_manhattan_distance() {
        let a = VoxelCoord::new(0, 0, 0);
        let b = VoxelCoord::new(3, 4, 5);
        assert_eq!(a.manhattan_distance(b), 12);
        assert_eq!(b.manhattan_distance(a), 12);
    }

    #[test]
    fn manhattan_distance_spans_full_range() {
        let low = VoxelCoord::new(i32::MIN, i32::MIN, i32::MIN);
        let high = VoxelCoord::new(i32::MAX, i32::MAX, i32::MAX);
        assert_eq!(low.manhattan_distance(high), 3 * u64::from(u32::MAX));
    }

    #[test]
    fn chunk_of_negative_coords() {
        assert_eq!(chunk_of(0, 0), (0, 0));
        assert_eq!(chunk_of(15, 16), (0, 1));
        assert_eq!(chunk_of(-1, -16), (-1, -1));
        assert_eq!(chunk_of(-17, 0), (-2, 0));
    }

    #[test]
    fn facing_from_cardinal_offsets() {
        let target = VoxelCoord::new(5, 64, 5);
        let facing = |x, y, z| Facing::from_offset(VoxelCoord::new(x, y, z), target);
        assert_eq!(facing(6, 64, 5), Some(Facing::East));
        assert_eq!(facing(5, 64, 4), Some(Facing::North));
        assert_eq!(facing(5, 65, 5), Some(Facing::Up));
        assert_eq!(facing(6, 64, 6), None);
        assert_eq!(Facing::from_offset(target, target), None);
    }

    #[test]
    fn facing_at_range_ends() {
        let east = VoxelCoord::new(i32::MAX, 0, 0);
        let west = VoxelCoord::new(i32::MIN, 0, 0);
        assert_eq!(Facing::from_offset(east, west), Some(Facing::East));
        assert_eq!(Facing::from_offset(west, east), Some(Facing::West));
        let top = VoxelCoord::new(0, i32::MAX, 0);
        let bottom = VoxelCoord::new(0, i32::MIN, 0);
        assert_eq!(Facing::from_offset(bottom, top), Some(Facing::Down));
    }

    #[test]
    fn unknown_blocks_are_conservative() {
        assert_eq!(BlockKind::Unknown.pathing_type(), PathingBlockType::Avoid);
        assert!(!BlockKind::Unknown.is_breakable());
        assert!(!BlockKind::Bedrock.is_breakable());
        assert!(BlockKind::Stone.is_breakable());
    }

    #[test]
    fn classification_covers_materials() {
        assert_eq!(BlockKind::Air.pathing_type(), PathingBlockType::Air);
        assert_eq!(BlockKind::Water.pathing_type(), PathingBlockType::Water);
        assert_eq!(BlockKind::Lava.pathing_type(), PathingBlockType::Avoid);
        assert_eq!(BlockKind::Obsidian.pathing_type(), PathingBlockType::Solid);
    }
}
