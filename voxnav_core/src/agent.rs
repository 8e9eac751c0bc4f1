// Captured agent capabilities.
//
// `AgentSnapshot` is a plain copy of the inventory, hunger, and enchantment
// state a planning pass depends on. The caller fills it from the live agent
// on the thread that owns it, then hands it to `CalculationContext::new`,
// which derives everything it needs immediately. Later changes to the live
// agent never reach an in-flight context.
//
// `ToolSet` holds the best break speed per tool family. It answers
// "how fast can this agent break that material" without touching the live
// inventory.

use crate::types::{BlockKind, Dimension, ToolClass};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Break speed of the best tool in each family. Families with no tool break
/// at hand speed (1.0).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolSet {
    speeds: FxHashMap<ToolClass, f64>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tool. Keeps the fastest speed seen per family; non-finite or
    /// non-positive speeds are ignored.
    pub fn with_tool(mut self, class: ToolClass, speed: f64) -> Self {
        if speed.is_finite() && speed > 0.0 {
            let entry = self.speeds.entry(class).or_insert(speed);
            if speed > *entry {
                *entry = speed;
            }
        }
        self
    }

    /// Best speed available against a material.
    pub fn speed_for(&self, kind: BlockKind) -> f64 {
        let hand = 1.0;
        match kind.preferred_tool() {
            ToolClass::Hand => hand,
            class => self.speeds.get(&class).copied().unwrap_or(hand).max(hand),
        }
    }

    /// Fraction of a block broken per tick. Zero means the block cannot be
    /// broken at all; values of 1.0 or more break within one tick.
    pub fn strength_vs(&self, kind: BlockKind) -> f64 {
        if !kind.is_breakable() {
            return 0.0;
        }
        let hardness = kind.hardness();
        if hardness <= 0.0 {
            return 1.0;
        }
        self.speed_for(kind) / hardness / 30.0
    }
}

/// Agent state captured for one planning pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Number of disposable blocks the agent may place.
    pub throwaway_count: u32,
    /// A water bucket sits in a hotbar slot.
    pub water_bucket_in_hotbar: bool,
    pub food_level: u32,
    pub feather_falling: u32,
    pub frost_walker: u32,
    pub depth_strider: u32,
    pub dimension: Dimension,
    pub tools: ToolSet,
}
