// CalculationContext: the frozen per-search snapshot of world, agent, and
// configuration state.
//
// A context is built once at the start of a planning pass and read by the
// edge-cost evaluator for every candidate move. Construction copies every
// mutable input into owned fields: permission flags and tunables from
// `NavConfig`, derived capability flags from `AgentSnapshot`, the world
// border, and the protection policy handle. Enchantment effects are resolved
// to plain numbers here, once.
//
// Block access comes in two flavours (`BlockAccess`):
//
// - `Live` borrows a provider. The borrow checker guarantees nobody mutates
//   the world while the context exists, so this is safe for a search running
//   on the caller's thread or inside a scoped thread.
// - `Snapshot` owns a deep copy behind an `Arc` plus its packed
//   classification grid. This is the choice when the search runs on a worker
//   while the owning thread keeps mutating the live world; the context is
//   `'static` and `thread_safe()` reports `true`.
//
// Every query is a total, non-blocking read. Infeasible actions return
// `COST_INF`; policy failures and unreadable cells resolve to infeasible.
//
// See also: `config.rs` for the tunables, `agent.rs` for the captured agent
// state, `search.rs` for the reference consumer.

use crate::agent::{AgentSnapshot, ToolSet};
use crate::block_type::PathingBlockType;
use crate::border::WorldBorder;
use crate::config::NavConfig;
use crate::costs::{
    COST_INF, SPRINT_ONE_BLOCK_COST, WALK_ONE_BLOCK_COST, WALK_ONE_IN_WATER_COST, is_infeasible,
};
use crate::error::NavError;
use crate::goal::Goal;
use crate::grid::PathingGrid;
use crate::protection::{NoProtection, ProtectionPolicy};
use crate::types::{BlockKind, Dimension, VoxelCoord};
use crate::world::{BlockStateProvider, VoxelWorld};
use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::Arc;

/// Falls shorter than this are handled by plain descents.
pub const MIN_FALL_HEIGHT: u32 = 3;

/// Depth strider levels above this have no further effect.
pub const MAX_DEPTH_STRIDER: u32 = 3;

/// Fall-damage mitigation granted by a feather falling level.
pub fn feather_falling_mitigation(level: u32) -> f64 {
    match level {
        0 => 0.12,
        1 => 0.24,
        2 => 0.36,
        _ => 0.48,
    }
}

/// Per-block cost of moving through water with the given depth strider
/// level: a linear blend from swimming to walking.
pub fn water_walk_speed(depth_strider: u32) -> f64 {
    let mult = depth_strider.min(MAX_DEPTH_STRIDER) as f64 / MAX_DEPTH_STRIDER as f64;
    WALK_ONE_IN_WATER_COST * (1.0 - mult) + WALK_ONE_BLOCK_COST * mult
}

// ---------------------------------------------------------------------------
// Block access
// ---------------------------------------------------------------------------

/// How a context reads block states.
pub enum BlockAccess<'w> {
    Live(&'w (dyn BlockStateProvider + Sync)),
    Snapshot {
        world: Arc<VoxelWorld>,
        grid: Arc<PathingGrid>,
    },
}

impl BlockAccess<'_> {
    fn get(&self, pos: VoxelCoord) -> BlockKind {
        match self {
            BlockAccess::Live(provider) => provider.block_at(pos).unwrap_or(BlockKind::Unknown),
            BlockAccess::Snapshot { world, .. } => world.get(pos),
        }
    }

    fn is_loaded(&self, x: i32, z: i32) -> bool {
        match self {
            BlockAccess::Live(provider) => provider.is_chunk_loaded(x, z),
            BlockAccess::Snapshot { world, .. } => world.is_chunk_loaded(x, z),
        }
    }

    fn pathing_type(&self, pos: VoxelCoord) -> PathingBlockType {
        match self {
            BlockAccess::Live(_) => self.get(pos).pathing_type(),
            BlockAccess::Snapshot { grid, .. } => {
                grid.get(pos).unwrap_or(PathingBlockType::Avoid)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Captured config
// ---------------------------------------------------------------------------

/// Permission flags copied from the config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Permissions {
    pub allow_break: bool,
    pub allow_place: bool,
    pub allow_parkour: bool,
    pub allow_parkour_place: bool,
    pub allow_parkour_ascend: bool,
    pub allow_jump_at_build_limit: bool,
    pub allow_diagonal_descend: bool,
    pub allow_diagonal_ascend: bool,
    pub allow_downward: bool,
    pub assume_walk_on_water: bool,
    /// Never enabled from config; only specialised callers falling on
    /// purpose would want it.
    pub allow_fall_into_lava: bool,
}

/// Numeric tunables copied from the config.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tunables {
    pub heuristic_scale: f64,
    pub place_block_cost: f64,
    pub break_block_additional_cost: f64,
    pub backtrack_cost_favoring_coefficient: f64,
    pub jump_penalty: f64,
    pub walk_on_water_one_penalty: f64,
}

// ---------------------------------------------------------------------------
// CalculationContext
// ---------------------------------------------------------------------------

pub struct CalculationContext<'w> {
    blocks: BlockAccess<'w>,
    protection: Arc<dyn ProtectionPolicy>,
    tools: ToolSet,
    permissions: Permissions,
    tunables: Tunables,
    allow_break_anyway: FxHashSet<BlockKind>,
    has_throwaway: bool,
    has_water_bucket: bool,
    can_sprint: bool,
    frost_walker: bool,
    water_walk_speed: f64,
    feather_falling_mitigation: f64,
    max_fall_height_no_water: u32,
    max_fall_height_bucket: u32,
    world_border: WorldBorder,
}

impl<'w> CalculationContext<'w> {
    /// Context that reads blocks straight from `world` for as long as it
    /// lives.
    ///
    /// `config` must already pass [`NavConfig::validate`]; debug builds
    /// assert it. Use [`CalculationContext::try_new`] for a config from an
    /// untrusted source.
    pub fn new(
        world: &'w (dyn BlockStateProvider + Sync),
        agent: &AgentSnapshot,
        config: &NavConfig,
        world_border: WorldBorder,
    ) -> Self {
        Self::from_parts(BlockAccess::Live(world), agent, config, world_border)
    }

    /// Like [`CalculationContext::new`], but rejects a config that fails
    /// validation instead of letting NaN or negative tunables reach the
    /// cost queries.
    pub fn try_new(
        world: &'w (dyn BlockStateProvider + Sync),
        agent: &AgentSnapshot,
        config: &NavConfig,
        world_border: WorldBorder,
    ) -> Result<Self, NavError> {
        config.validate()?;
        Ok(Self::new(world, agent, config, world_border))
    }

    fn from_parts(
        blocks: BlockAccess<'w>,
        agent: &AgentSnapshot,
        config: &NavConfig,
        world_border: WorldBorder,
    ) -> Self {
        debug_assert!(config.validate().is_ok(), "nav config failed validation");
        let permissions = Permissions {
            allow_break: config.allow_break,
            allow_place: config.allow_place,
            allow_parkour: config.allow_parkour,
            allow_parkour_place: config.allow_parkour_place,
            allow_parkour_ascend: config.allow_parkour_ascend,
            allow_jump_at_build_limit: config.allow_jump_at_build_limit,
            allow_diagonal_descend: config.allow_diagonal_descend,
            allow_diagonal_ascend: config.allow_diagonal_ascend,
            allow_downward: config.allow_downward,
            assume_walk_on_water: config.assume_walk_on_water,
            allow_fall_into_lava: false,
        };
        let tunables = Tunables {
            heuristic_scale: config.heuristic_scale,
            place_block_cost: config.block_placement_penalty,
            break_block_additional_cost: config.block_break_additional_penalty,
            backtrack_cost_favoring_coefficient: config.backtrack_cost_favoring_coefficient,
            jump_penalty: config.jump_penalty,
            walk_on_water_one_penalty: config.walk_on_water_one_penalty,
        };

        let has_throwaway = config.allow_place && agent.throwaway_count > 0;
        let has_water_bucket = config.allow_water_bucket_fall
            && agent.water_bucket_in_hotbar
            && agent.dimension != Dimension::Nether;
        let can_sprint = config.allow_sprint && agent.food_level > config.sprint_food_threshold;

        let mitigation = feather_falling_mitigation(agent.feather_falling);
        let max_fall_height_no_water = (config.max_fall_height_no_water as f64 + mitigation) as u32;
        let max_fall_height_bucket = (config.max_fall_height_bucket as f64 + mitigation) as u32;

        if agent.depth_strider > MAX_DEPTH_STRIDER {
            log::warn!(
                "depth strider {} capped at {}",
                agent.depth_strider,
                MAX_DEPTH_STRIDER
            );
        }

        let ctx = Self {
            blocks,
            protection: Arc::new(NoProtection),
            tools: agent.tools.clone(),
            permissions,
            tunables,
            allow_break_anyway: config.allow_break_anyway.iter().copied().collect(),
            has_throwaway,
            has_water_bucket,
            can_sprint,
            frost_walker: agent.frost_walker > 0,
            water_walk_speed: water_walk_speed(agent.depth_strider),
            feather_falling_mitigation: mitigation,
            max_fall_height_no_water,
            max_fall_height_bucket,
            world_border,
        };
        log::debug!("built calculation context: {ctx:?}");
        ctx
    }

    /// Replace the protection policy. Consumes the context, so this can only
    /// happen before it is handed to a search.
    pub fn with_protection(mut self, policy: Arc<dyn ProtectionPolicy>) -> Self {
        self.protection = policy;
        self
    }

    // -- block access -------------------------------------------------------

    /// Block at `pos`. Unreadable cells are `Unknown`.
    pub fn get(&self, pos: VoxelCoord) -> BlockKind {
        self.blocks.get(pos)
    }

    pub fn is_loaded(&self, x: i32, z: i32) -> bool {
        self.blocks.is_loaded(x, z)
    }

    /// Pathing class at `pos`. Unreadable cells are `Avoid`.
    pub fn pathing_type(&self, pos: VoxelCoord) -> PathingBlockType {
        self.blocks.pathing_type(pos)
    }

    /// Whether block reads are backed by an owned copy, making the context
    /// independent of the live world.
    pub fn thread_safe(&self) -> bool {
        matches!(self.blocks, BlockAccess::Snapshot { .. })
    }

    // -- captured state -----------------------------------------------------

    pub fn permissions(&self) -> &Permissions {
        &self.permissions
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    pub fn world_border(&self) -> &WorldBorder {
        &self.world_border
    }

    pub fn has_throwaway(&self) -> bool {
        self.has_throwaway
    }

    pub fn has_water_bucket(&self) -> bool {
        self.has_water_bucket
    }

    pub fn can_sprint(&self) -> bool {
        self.can_sprint
    }

    pub fn frost_walker(&self) -> bool {
        self.frost_walker
    }

    pub fn water_walk_speed(&self) -> f64 {
        self.water_walk_speed
    }

    pub fn feather_falling_mitigation(&self) -> f64 {
        self.feather_falling_mitigation
    }

    pub fn min_fall_height(&self) -> u32 {
        MIN_FALL_HEIGHT
    }

    pub fn max_fall_height_no_water(&self) -> u32 {
        self.max_fall_height_no_water
    }

    pub fn max_fall_height_bucket(&self) -> u32 {
        self.max_fall_height_bucket
    }

    /// Highest fall the agent will take right now.
    pub fn max_fall_height(&self) -> u32 {
        if self.has_water_bucket {
            self.max_fall_height_bucket
        } else {
            self.max_fall_height_no_water
        }
    }

    pub fn heuristic_scale(&self) -> f64 {
        self.tunables.heuristic_scale
    }

    // -- cost queries -------------------------------------------------------

    /// Heuristic of `goal` at `pos`, scaled for this search.
    pub fn estimate<G: Goal + ?Sized>(&self, goal: &G, pos: VoxelCoord) -> f64 {
        goal.heuristic(pos, self.tunables.heuristic_scale)
    }

    /// Cost of one block of flat horizontal movement.
    pub fn horizontal_step_cost(&self) -> f64 {
        if self.can_sprint {
            SPRINT_ONE_BLOCK_COST
        } else {
            WALK_ONE_BLOCK_COST
        }
    }

    /// Cost of one block of movement across water.
    pub fn water_surface_cost(&self) -> f64 {
        if self.frost_walker {
            WALK_ONE_BLOCK_COST
        } else if self.permissions.assume_walk_on_water {
            WALK_ONE_BLOCK_COST + self.tunables.walk_on_water_one_penalty
        } else {
            self.water_walk_speed
        }
    }

    /// Cost of placing a throwaway block at `pos`, currently holding
    /// `current`.
    pub fn cost_of_placing_at(&self, pos: VoxelCoord, current: BlockKind) -> f64 {
        if !self.has_throwaway {
            return COST_INF;
        }
        if current == BlockKind::Unknown {
            return COST_INF;
        }
        if self.is_possibly_protected(pos) {
            return COST_INF;
        }
        if !self.world_border.can_place_at(pos.x, pos.z) {
            return COST_INF;
        }
        self.tunables.place_block_cost
    }

    /// Multiplier on the cost of breaking `current` at `pos`: `1.0` when
    /// allowed, `COST_INF` otherwise.
    pub fn break_cost_multiplier_at(&self, pos: VoxelCoord, current: BlockKind) -> f64 {
        if !self.permissions.allow_break && !self.allow_break_anyway.contains(&current) {
            return COST_INF;
        }
        if current == BlockKind::Unknown {
            return COST_INF;
        }
        if self.is_possibly_protected(pos) {
            return COST_INF;
        }
        1.0
    }

    /// Ticks to clear `current` at `pos` with the best captured tool.
    /// Passable cells cost nothing.
    pub fn mining_duration_ticks(&self, pos: VoxelCoord, current: BlockKind) -> f64 {
        if current.pathing_type().is_passable() {
            return 0.0;
        }
        let mult = self.break_cost_multiplier_at(pos, current);
        if is_infeasible(mult) {
            return COST_INF;
        }
        let strength = self.tools.strength_vs(current);
        if strength <= 0.0 {
            return COST_INF;
        }
        (1.0 / strength + self.tunables.break_block_additional_cost) * mult
    }

    /// Cost of using a water bucket to break a fall.
    pub fn place_bucket_cost(&self) -> f64 {
        self.tunables.place_block_cost
    }

    /// Conservative protection check. A policy that cannot answer counts as
    /// protected.
    pub fn is_possibly_protected(&self, pos: VoxelCoord) -> bool {
        self.protection.is_protected(pos).unwrap_or(true)
    }
}

impl CalculationContext<'static> {
    /// Context over an owned copy of the world, for a search running on a
    /// thread other than the one mutating the live world. Build the copy with
    /// `world.clone()` or `VoxelWorld::capture`.
    ///
    /// The same validation contract as [`CalculationContext::new`] applies.
    pub fn for_worker_thread(
        snapshot: VoxelWorld,
        agent: &AgentSnapshot,
        config: &NavConfig,
        world_border: WorldBorder,
    ) -> Self {
        let grid = Arc::new(PathingGrid::build(&snapshot));
        let blocks = BlockAccess::Snapshot {
            world: Arc::new(snapshot),
            grid,
        };
        Self::from_parts(blocks, agent, config, world_border)
    }
}

impl fmt::Debug for CalculationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalculationContext")
            .field("thread_safe", &self.thread_safe())
            .field("permissions", &self.permissions)
            .field("tunables", &self.tunables)
            .field("has_throwaway", &self.has_throwaway)
            .field("has_water_bucket", &self.has_water_bucket)
            .field("can_sprint", &self.can_sprint)
            .field("frost_walker", &self.frost_walker)
            .field("water_walk_speed", &self.water_walk_speed)
            .field("max_fall_height_no_water", &self.max_fall_height_no_water)
            .field("max_fall_height_bucket", &self.max_fall_height_bucket)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PolicyError;
    use crate::goal::NavGoal;
    use crate::protection::ProtectedRegions;
    use crate::types::ToolClass;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn stocked_agent() -> AgentSnapshot {
        AgentSnapshot {
            throwaway_count: 64,
            food_level: 20,
            ..AgentSnapshot::default()
        }
    }

    fn flat_world() -> VoxelWorld {
        let mut world = VoxelWorld::new(32, 16, 32);
        world.fill_layer(0, BlockKind::Stone);
        world
    }

    struct Unreachable;

    impl ProtectionPolicy for Unreachable {
        fn is_protected(&self, _pos: VoxelCoord) -> Result<bool, PolicyError> {
            Err(PolicyError::Unreachable("region service offline".into()))
        }
    }

    #[test]
    fn placing_without_material_is_infeasible() {
        let world = flat_world();
        let agent = AgentSnapshot {
            throwaway_count: 0,
            ..stocked_agent()
        };
        let ctx =
            CalculationContext::new(&world, &agent, &NavConfig::default(), WorldBorder::default());
        for pos in [
            VoxelCoord::new(1, 1, 1),
            VoxelCoord::new(20, 5, 7),
            VoxelCoord::new(-400, 90, 12),
        ] {
            assert_eq!(ctx.cost_of_placing_at(pos, BlockKind::Air), COST_INF);
        }
    }

    #[test]
    fn placing_disabled_by_config() {
        let world = flat_world();
        let config = NavConfig {
            allow_place: false,
            ..NavConfig::default()
        };
        let ctx =
            CalculationContext::new(&world, &stocked_agent(), &config, WorldBorder::default());
        assert!(!ctx.has_throwaway());
        assert_eq!(ctx.cost_of_placing_at(VoxelCoord::new(2, 1, 2), BlockKind::Air), COST_INF);
    }

    #[test]
    fn placing_costs_the_penalty() {
        let world = flat_world();
        let ctx = CalculationContext::new(
            &world,
            &stocked_agent(),
            &NavConfig::default(),
            WorldBorder::default(),
        );
        let pos = VoxelCoord::new(2, 1, 2);
        assert_eq!(ctx.cost_of_placing_at(pos, BlockKind::Air), 20.0);
        assert_eq!(ctx.place_bucket_cost(), 20.0);
    }

    #[test]
    fn placing_respects_world_border() {
        let world = flat_world();
        let border = WorldBorder {
            min_x: 0.0,
            max_x: 10.0,
            min_z: 0.0,
            max_z: 10.0,
        };
        let ctx = CalculationContext::new(&world, &stocked_agent(), &NavConfig::default(), border);
        assert_eq!(ctx.cost_of_placing_at(VoxelCoord::new(0, 1, 5), BlockKind::Air), COST_INF);
        assert_eq!(ctx.cost_of_placing_at(VoxelCoord::new(9, 1, 5), BlockKind::Air), COST_INF);
        assert_eq!(ctx.cost_of_placing_at(VoxelCoord::new(5, 1, 5), BlockKind::Air), 20.0);
    }

    #[test]
    fn protected_cells_are_infeasible() {
        let world = flat_world();
        let policy = ProtectedRegions::new()
            .with_region(VoxelCoord::new(0, 0, 0), VoxelCoord::new(3, 3, 3));
        let ctx = CalculationContext::new(
            &world,
            &stocked_agent(),
            &NavConfig::default(),
            WorldBorder::default(),
        )
        .with_protection(Arc::new(policy));
        let inside = VoxelCoord::new(2, 0, 2);
        let outside = VoxelCoord::new(8, 0, 8);
        assert!(ctx.is_possibly_protected(inside));
        assert_eq!(ctx.cost_of_placing_at(inside, BlockKind::Air), COST_INF);
        assert_eq!(ctx.break_cost_multiplier_at(inside, BlockKind::Stone), COST_INF);
        assert_eq!(ctx.break_cost_multiplier_at(outside, BlockKind::Stone), 1.0);
    }

    #[test]
    fn unreachable_policy_fails_closed() {
        let world = flat_world();
        let ctx = CalculationContext::new(
            &world,
            &stocked_agent(),
            &NavConfig::default(),
            WorldBorder::default(),
        )
        .with_protection(Arc::new(Unreachable));
        let pos = VoxelCoord::new(8, 0, 8);
        assert!(ctx.is_possibly_protected(pos));
        assert_eq!(ctx.cost_of_placing_at(pos, BlockKind::Air), COST_INF);
        assert_eq!(ctx.break_cost_multiplier_at(pos, BlockKind::Stone), COST_INF);
    }

    #[test]
    fn default_policy_protects_nothing() {
        let world = flat_world();
        let ctx = CalculationContext::new(
            &world,
            &stocked_agent(),
            &NavConfig::default(),
            WorldBorder::default(),
        );
        assert!(!ctx.is_possibly_protected(VoxelCoord::new(1, 0, 1)));
    }

    #[test]
    fn break_anyway_exceptions() {
        let world = flat_world();
        let config = NavConfig {
            allow_break: false,
            allow_break_anyway: vec![BlockKind::Leaves],
            ..NavConfig::default()
        };
        let ctx =
            CalculationContext::new(&world, &stocked_agent(), &config, WorldBorder::default());
        let pos = VoxelCoord::new(4, 1, 4);
        assert_eq!(ctx.break_cost_multiplier_at(pos, BlockKind::Stone), COST_INF);
        assert_eq!(ctx.break_cost_multiplier_at(pos, BlockKind::Leaves), 1.0);
    }

    #[test]
    fn unloaded_cells_are_infeasible() {
        let mut world = flat_world();
        world.unload_chunk((1, 1));
        let ctx = CalculationContext::new(
            &world,
            &stocked_agent(),
            &NavConfig::default(),
            WorldBorder::default(),
        );
        let pos = VoxelCoord::new(20, 0, 20);
        assert!(!ctx.is_loaded(20, 20));
        assert_eq!(ctx.get(pos), BlockKind::Unknown);
        assert_eq!(ctx.pathing_type(pos), PathingBlockType::Avoid);
        assert_eq!(ctx.cost_of_placing_at(pos, ctx.get(pos)), COST_INF);
        assert_eq!(ctx.break_cost_multiplier_at(pos, ctx.get(pos)), COST_INF);
        assert_eq!(ctx.mining_duration_ticks(pos, ctx.get(pos)), COST_INF);
    }

    #[test]
    fn mining_duration_uses_tools() {
        let world = flat_world();
        let bare = CalculationContext::new(
            &world,
            &stocked_agent(),
            &NavConfig::default(),
            WorldBorder::default(),
        );
        let agent = AgentSnapshot {
            tools: ToolSet::new().with_tool(ToolClass::Pickaxe, 6.0),
            ..stocked_agent()
        };
        let equipped =
            CalculationContext::new(&world, &agent, &NavConfig::default(), WorldBorder::default());
        let pos = VoxelCoord::new(3, 0, 3);
        // Hand: 1 / (1 / 1.5 / 30) = 45 ticks, plus the 2 tick penalty.
        assert!(close(bare.mining_duration_ticks(pos, BlockKind::Stone), 47.0));
        assert!(close(equipped.mining_duration_ticks(pos, BlockKind::Stone), 9.5));
        assert_eq!(bare.mining_duration_ticks(pos, BlockKind::Air), 0.0);
        assert_eq!(bare.mining_duration_ticks(pos, BlockKind::Bedrock), COST_INF);
    }

    #[test]
    fn feather_falling_tiers() {
        assert_eq!(feather_falling_mitigation(0), 0.12);
        assert_eq!(feather_falling_mitigation(1), 0.24);
        assert_eq!(feather_falling_mitigation(2), 0.36);
        assert_eq!(feather_falling_mitigation(3), 0.48);
        assert_eq!(feather_falling_mitigation(9), 0.48);
    }

    #[test]
    fn fall_ceilings_floor_the_mitigated_setting() {
        let world = flat_world();
        let agent = AgentSnapshot {
            feather_falling: 4,
            ..stocked_agent()
        };
        let ctx =
            CalculationContext::new(&world, &agent, &NavConfig::default(), WorldBorder::default());
        assert_eq!(ctx.feather_falling_mitigation(), 0.48);
        assert_eq!(ctx.max_fall_height_no_water(), 3);
        assert_eq!(ctx.max_fall_height_bucket(), 20);
        assert_eq!(ctx.min_fall_height(), 3);
    }

    #[test]
    fn water_bucket_unusable_in_nether() {
        let world = flat_world();
        let agent = AgentSnapshot {
            water_bucket_in_hotbar: true,
            ..stocked_agent()
        };
        let overworld =
            CalculationContext::new(&world, &agent, &NavConfig::default(), WorldBorder::default());
        assert!(overworld.has_water_bucket());
        assert_eq!(overworld.max_fall_height(), 20);

        let nether_agent = AgentSnapshot {
            dimension: Dimension::Nether,
            ..agent
        };
        let nether = CalculationContext::new(
            &world,
            &nether_agent,
            &NavConfig::default(),
            WorldBorder::default(),
        );
        assert!(!nether.has_water_bucket());
        assert_eq!(nether.max_fall_height(), 3);
    }

    #[test]
    fn sprint_needs_food_above_threshold() {
        let world = flat_world();
        let hungry = AgentSnapshot {
            food_level: 6,
            ..stocked_agent()
        };
        let ctx =
            CalculationContext::new(&world, &hungry, &NavConfig::default(), WorldBorder::default());
        assert!(!ctx.can_sprint());
        assert_eq!(ctx.horizontal_step_cost(), WALK_ONE_BLOCK_COST);

        let fed = AgentSnapshot {
            food_level: 7,
            ..stocked_agent()
        };
        let ctx =
            CalculationContext::new(&world, &fed, &NavConfig::default(), WorldBorder::default());
        assert!(ctx.can_sprint());
        assert_eq!(ctx.horizontal_step_cost(), SPRINT_ONE_BLOCK_COST);
    }

    #[test]
    fn depth_strider_blend_is_capped() {
        assert!(close(water_walk_speed(0), WALK_ONE_IN_WATER_COST));
        assert!(close(water_walk_speed(3), WALK_ONE_BLOCK_COST));
        assert!(close(water_walk_speed(7), WALK_ONE_BLOCK_COST));
        let one = water_walk_speed(1);
        assert!(close(
            one,
            WALK_ONE_IN_WATER_COST * (2.0 / 3.0) + WALK_ONE_BLOCK_COST / 3.0
        ));
    }

    #[test]
    fn water_surface_cost_modes() {
        let world = flat_world();
        let swimmer = CalculationContext::new(
            &world,
            &stocked_agent(),
            &NavConfig::default(),
            WorldBorder::default(),
        );
        assert!(close(swimmer.water_surface_cost(), WALK_ONE_IN_WATER_COST));

        let frost = AgentSnapshot {
            frost_walker: 2,
            ..stocked_agent()
        };
        let walker =
            CalculationContext::new(&world, &frost, &NavConfig::default(), WorldBorder::default());
        assert!(walker.frost_walker());
        assert_eq!(walker.water_surface_cost(), WALK_ONE_BLOCK_COST);

        let config = NavConfig {
            assume_walk_on_water: true,
            ..NavConfig::default()
        };
        let assumed =
            CalculationContext::new(&world, &stocked_agent(), &config, WorldBorder::default());
        assert!(close(assumed.water_surface_cost(), WALK_ONE_BLOCK_COST + 3.0));
    }

    #[test]
    fn estimate_applies_heuristic_scale() {
        let world = flat_world();
        let config = NavConfig {
            heuristic_scale: 2.0,
            ..NavConfig::default()
        };
        let ctx =
            CalculationContext::new(&world, &stocked_agent(), &config, WorldBorder::default());
        let goal = NavGoal::column(0, 5);
        assert!(close(ctx.estimate(&goal, VoxelCoord::new(0, 0, 0)), 10.0));
    }

    #[test]
    fn live_context_is_not_thread_safe() {
        let world = flat_world();
        let ctx = CalculationContext::new(
            &world,
            &stocked_agent(),
            &NavConfig::default(),
            WorldBorder::default(),
        );
        assert!(!ctx.thread_safe());
    }

    #[test]
    fn worker_context_ignores_later_world_changes() {
        let mut world = flat_world();
        let ctx = CalculationContext::for_worker_thread(
            world.clone(),
            &stocked_agent(),
            &NavConfig::default(),
            WorldBorder::default(),
        );
        assert!(ctx.thread_safe());

        let pos = VoxelCoord::new(5, 0, 5);
        world.set(pos, BlockKind::Water);
        world.unload_chunk((0, 0));

        assert_eq!(ctx.get(pos), BlockKind::Stone);
        assert_eq!(ctx.pathing_type(pos), PathingBlockType::Solid);
        assert!(ctx.is_loaded(5, 5));
    }

    #[test]
    fn worker_context_ignores_later_agent_changes() {
        let world = flat_world();
        let mut agent = stocked_agent();
        let ctx = CalculationContext::for_worker_thread(
            world,
            &agent,
            &NavConfig::default(),
            WorldBorder::default(),
        );
        agent.throwaway_count = 0;
        agent.food_level = 0;
        assert!(ctx.has_throwaway());
        assert!(ctx.can_sprint());
    }

    #[test]
    fn snapshot_and_live_agree() {
        let mut world = flat_world();
        world.set(VoxelCoord::new(3, 1, 3), BlockKind::Water);
        world.set(VoxelCoord::new(4, 1, 3), BlockKind::Lava);
        let agent = stocked_agent();
        let config = NavConfig::default();
        let live = CalculationContext::new(&world, &agent, &config, WorldBorder::default());
        let copy = CalculationContext::for_worker_thread(
            world.clone(),
            &agent,
            &config,
            WorldBorder::default(),
        );
        for x in -1..33 {
            for y in -1..4 {
                let pos = VoxelCoord::new(x, y, 3);
                assert_eq!(live.get(pos), copy.get(pos), "{pos}");
                assert_eq!(live.pathing_type(pos), copy.pathing_type(pos), "{pos}");
            }
        }
    }

    #[test]
    fn partial_chunk_capture_agrees_with_live() {
        let mut world = VoxelWorld::with_origin(VoxelCoord::new(4, 0, 0), 28, 8, 32);
        world.fill_layer(0, BlockKind::Stone);
        let agent = stocked_agent();
        let config = NavConfig::default();
        let live = CalculationContext::new(&world, &agent, &config, WorldBorder::default());
        let snapshot = VoxelWorld::capture(&world, VoxelCoord::new(0, 0, 0), (32, 8, 32));
        let border = WorldBorder::default();
        let copy = CalculationContext::for_worker_thread(snapshot, &agent, &config, border);
        for x in 4..32 {
            assert_eq!(live.is_loaded(x, 3), copy.is_loaded(x, 3), "x={x}");
            for y in 0..3 {
                let pos = VoxelCoord::new(x, y, 3);
                assert_eq!(live.get(pos), copy.get(pos), "{pos}");
            }
        }
        assert_eq!(copy.get(VoxelCoord::new(8, 0, 3)), BlockKind::Stone);
    }

    #[test]
    fn try_new_rejects_invalid_config() {
        let world = flat_world();
        let agent = stocked_agent();
        let nan_scale = NavConfig {
            heuristic_scale: f64::NAN,
            ..NavConfig::default()
        };
        let border = WorldBorder::default();
        let result = CalculationContext::try_new(&world, &agent, &nan_scale, border);
        assert!(matches!(
            result,
            Err(NavError::InvalidTunable {
                name: "heuristic_scale",
                ..
            })
        ));
        let negative = NavConfig {
            jump_penalty: -1.0,
            ..NavConfig::default()
        };
        assert!(CalculationContext::try_new(&world, &agent, &negative, border).is_err());
        let valid = NavConfig::default();
        assert!(CalculationContext::try_new(&world, &agent, &valid, border).is_ok());
    }

    #[test]
    fn contexts_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CalculationContext<'static>>();
    }
}
