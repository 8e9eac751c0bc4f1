// Two-bit pathing classification of a voxel.
//
// Every material collapses to one of four pathing classes. The class is
// stored as two independent bits so a dense cache can pack four cells per
// byte (see `grid.rs`). The bit layout is fixed:
//
//   Air   = 0b00
//   Water = 0b01
//   Avoid = 0b10
//   Solid = 0b11
//
// `from_bits` must stay the exact inverse of `bits`; the packed cache
// depends on it.

use serde::{Deserialize, Serialize};

/// Pathing relevance of a voxel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathingBlockType {
    Air,
    Water,
    Avoid,
    Solid,
}

impl PathingBlockType {
    pub const ALL: [PathingBlockType; 4] = [
        PathingBlockType::Air,
        PathingBlockType::Water,
        PathingBlockType::Avoid,
        PathingBlockType::Solid,
    ];

    /// The `(high, low)` bit pair for this class.
    pub const fn bits(self) -> (bool, bool) {
        match self {
            PathingBlockType::Air => (false, false),
            PathingBlockType::Water => (false, true),
            PathingBlockType::Avoid => (true, false),
            PathingBlockType::Solid => (true, true),
        }
    }

    pub const fn from_bits(b1: bool, b2: bool) -> Self {
        match (b1, b2) {
            (false, false) => PathingBlockType::Air,
            (false, true) => PathingBlockType::Water,
            (true, false) => PathingBlockType::Avoid,
            (true, true) => PathingBlockType::Solid,
        }
    }

    /// Both bits as the low two bits of a byte.
    pub const fn to_u2(self) -> u8 {
        let (hi, lo) = self.bits();
        ((hi as u8) << 1) | lo as u8
    }

    /// Inverse of `to_u2`. Bits above the low two are ignored.
    pub const fn from_u2(v: u8) -> Self {
        Self::from_bits(v & 0b10 != 0, v & 0b01 != 0)
    }

    /// Whether the agent can stand or walk through this cell without
    /// breaking anything.
    pub const fn is_passable(self) -> bool {
        matches!(self, PathingBlockType::Air | PathingBlockType::Water)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_bijection() {
        for v in PathingBlockType::ALL {
            let (b1, b2) = v.bits();
            assert_eq!(PathingBlockType::from_bits(b1, b2), v);
            assert_eq!(PathingBlockType::from_u2(v.to_u2()), v);
        }
    }

    #[test]
    fn bit_pairs_are_distinct() {
        let mut seen = [false; 4];
        for v in PathingBlockType::ALL {
            let idx = v.to_u2() as usize;
            assert!(!seen[idx], "{v:?} shares a bit pattern");
            seen[idx] = true;
        }
    }

    #[test]
    fn known_bit_patterns() {
        assert_eq!(PathingBlockType::from_bits(true, false), PathingBlockType::Avoid);
        assert_eq!(PathingBlockType::from_bits(false, false), PathingBlockType::Air);
        assert_eq!(PathingBlockType::from_bits(false, true), PathingBlockType::Water);
        assert_eq!(PathingBlockType::from_bits(true, true), PathingBlockType::Solid);
    }

    #[test]
    fn from_u2_ignores_high_bits() {
        assert_eq!(PathingBlockType::from_u2(0b1111_1101), PathingBlockType::Water);
    }
}
