// Protection policy hook.
//
// A protection policy says whether a cell must not be broken or built in,
// regardless of any other permission. The context asks it before approving
// any break or place cost. A policy that cannot answer returns
// `PolicyError`, and the context then treats the cell as protected: an
// unreachable policy never silently permits an action.

use crate::error::PolicyError;
use crate::types::VoxelCoord;

pub trait ProtectionPolicy: Send + Sync {
    /// `Ok(true)` if `pos` is protected.
    fn is_protected(&self, pos: VoxelCoord) -> Result<bool, PolicyError>;
}

/// Nothing is protected.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProtection;

impl ProtectionPolicy for NoProtection {
    fn is_protected(&self, _pos: VoxelCoord) -> Result<bool, PolicyError> {
        Ok(false)
    }
}

/// Inclusive axis-aligned boxes of protected cells.
#[derive(Clone, Debug, Default)]
pub struct ProtectedRegions {
    regions: Vec<(VoxelCoord, VoxelCoord)>,
}

impl ProtectedRegions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Protect every cell between `a` and `b` inclusive, in any corner order.
    pub fn with_region(mut self, a: VoxelCoord, b: VoxelCoord) -> Self {
        let min = VoxelCoord::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
        let max = VoxelCoord::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));
        self.regions.push((min, max));
        self
    }
}

impl ProtectionPolicy for ProtectedRegions {
    fn is_protected(&self, pos: VoxelCoord) -> Result<bool, PolicyError> {
        Ok(self.regions.iter().any(|(min, max)| {
            (min.x..=max.x).contains(&pos.x)
                && (min.y..=max.y).contains(&pos.y)
                && (min.z..=max.z).contains(&pos.z)
        }))
    }
}
