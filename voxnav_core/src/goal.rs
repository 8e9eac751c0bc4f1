// Goals: target regions of the grid, each with a membership test and an
// admissible distance estimate.
//
// `Goal` is the contract the search consumes. `NavGoal` is the crate's
// closed set of goal shapes:
//
// - `Block`:  stand exactly at a position.
// - `Column`: reach an X/Z column at any height.
// - `Level`:  reach a Y level anywhere.
// - `Place`:  stand next to a target cell so a block can be placed into it.
//
// Membership tests are pure. The search calls `is_in_goal` on every
// candidate node, so nothing here may act on the world. Work that should
// happen once the agent actually arrives (placing the block for a `Place`
// goal) is described by `arrival_action` and handed out exactly once by
// `ArrivalLatch`; the plan executor runs it, never the search.
//
// Heuristics are built from the action cost table (see `costs.rs`):
// horizontal distance is octile distance times `scale`, vertical distance
// is priced per level by `level_heuristic`. Equality and hashing look only
// at the variant and its coordinates, so goals can key caches and be
// deduplicated.

use crate::costs::{FALL_N_BLOCKS_COST, JUMP_ONE_BLOCK_COST, SQRT_2};
use crate::math::fast_floor;
use crate::types::{BlockKind, Facing, VoxelCoord};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A target region plus an admissible estimate of the cost to reach it.
pub trait Goal: fmt::Debug + Send + Sync {
    /// Whether `pos` satisfies the goal. Must be a pure predicate.
    fn is_in_goal(&self, pos: VoxelCoord) -> bool;

    /// Lower bound on the cost from `pos` to the goal. `scale` is the
    /// per-block horizontal cost configured for this search.
    fn heuristic(&self, pos: VoxelCoord, scale: f64) -> f64;
}

// ---------------------------------------------------------------------------
// Heuristic building blocks
// ---------------------------------------------------------------------------

/// Octile horizontal distance: diagonal steps cost sqrt(2), the rest 1.
pub fn column_heuristic(x_diff: f64, z_diff: f64, scale: f64) -> f64 {
    let x = x_diff.abs();
    let z = z_diff.abs();
    let (straight, diagonal) = if x < z { (z - x, x) } else { (x - z, z) };
    (diagonal * SQRT_2 + straight) * scale
}

/// Vertical distance from `current_y` to `goal_y`. Ascending costs one jump
/// per level. Descending costs half a two-block fall per level, since
/// drops chain into one another and into walks.
pub fn level_heuristic(goal_y: i32, current_y: i32) -> f64 {
    vertical_heuristic(span(current_y, goal_y))
}

/// Estimate for standing `above` levels over the goal height (negative
/// when below it).
fn vertical_heuristic(above: i64) -> f64 {
    match above.cmp(&0) {
        Ordering::Greater => FALL_N_BLOCKS_COST[2] / 2.0 * above as f64,
        Ordering::Less => -above as f64 * JUMP_ONE_BLOCK_COST,
        Ordering::Equal => 0.0,
    }
}

/// Combined vertical and horizontal estimate for a displacement of
/// `(x_diff, y_diff, z_diff)` from a single target cell.
pub fn block_heuristic(x_diff: i64, y_diff: i64, z_diff: i64, scale: f64) -> f64 {
    vertical_heuristic(y_diff) + column_heuristic(x_diff as f64, z_diff as f64, scale)
}

/// `a - b` without overflow at the ends of the `i32` range.
fn span(a: i32, b: i32) -> i64 {
    i64::from(a) - i64::from(b)
}

// ---------------------------------------------------------------------------
// Place goals
// ---------------------------------------------------------------------------

/// Which neighbours of a place target count as "next to" it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Adjacency {
    /// The four face-adjacent cells at the target's height.
    #[default]
    Cardinal,
    /// All eight surrounding cells at the target's height.
    Ring,
}

/// A cell to place a block into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceTarget {
    pub pos: VoxelCoord,
    pub material: BlockKind,
    /// Face to click when placing. When unset, the face toward the agent's
    /// arrival cell is used.
    pub preferred_facing: Option<Facing>,
    pub adjacency: Adjacency,
}

impl PlaceTarget {
    pub fn new(pos: VoxelCoord, material: BlockKind) -> Self {
        Self {
            pos,
            material,
            preferred_facing: None,
            adjacency: Adjacency::Cardinal,
        }
    }

    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.preferred_facing = Some(facing);
        self
    }

    pub fn with_adjacency(mut self, adjacency: Adjacency) -> Self {
        self.adjacency = adjacency;
        self
    }

    fn is_adjacent(&self, pos: VoxelCoord) -> bool {
        if pos.y != self.pos.y {
            return false;
        }
        let dx = span(pos.x, self.pos.x).abs();
        let dz = span(pos.z, self.pos.z).abs();
        if dx > 1 || dz > 1 || (dx == 0 && dz == 0) {
            return false;
        }
        match self.adjacency {
            Adjacency::Cardinal => dx == 0 || dz == 0,
            Adjacency::Ring => true,
        }
    }

    /// Distance to the 3x3 box around the target, which contains every
    /// adjacent cell under either rule.
    fn heuristic(&self, pos: VoxelCoord, scale: f64) -> f64 {
        let gap_x = (span(pos.x, self.pos.x).abs() - 1).max(0);
        let gap_z = (span(pos.z, self.pos.z).abs() - 1).max(0);
        level_heuristic(self.pos.y, pos.y) + column_heuristic(gap_x as f64, gap_z as f64, scale)
    }
}

/// Something the plan executor should do once, after arrival is confirmed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrivalAction {
    PlaceBlock {
        at: VoxelCoord,
        material: BlockKind,
        facing: Facing,
    },
}

// ---------------------------------------------------------------------------
// NavGoal
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum NavGoal {
    Block(VoxelCoord),
    Column { x: i32, z: i32 },
    Level { level: i32 },
    Place(PlaceTarget),
}

/// Identity used for equality and hashing: variant plus coordinates only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum GoalKey {
    Block(VoxelCoord),
    Column(i32, i32),
    Level(i32),
    Place(VoxelCoord),
}

impl NavGoal {
    pub fn column(x: i32, z: i32) -> Self {
        NavGoal::Column { x, z }
    }

    pub fn level(level: i32) -> Self {
        NavGoal::Level { level }
    }

    /// Level goal `blocks` above `current_y`.
    pub fn levels_up(current_y: i32, blocks: u32) -> Self {
        Self::level(current_y.saturating_add_unsigned(blocks))
    }

    /// Level goal `blocks` below `current_y`.
    pub fn levels_down(current_y: i32, blocks: u32) -> Self {
        Self::level(current_y.saturating_sub_unsigned(blocks))
    }

    /// Column goal `distance` blocks from `origin` along `yaw_degrees`
    /// (0 faces +Z, 90 faces -X).
    pub fn column_from_direction(origin: [f64; 3], yaw_degrees: f32, distance: f64) -> Self {
        let theta = (yaw_degrees as f64).to_radians();
        let x = origin[0] - theta.sin() * distance;
        let z = origin[2] + theta.cos() * distance;
        Self::column(fast_floor(x), fast_floor(z))
    }

    /// The specific cell this goal is about, if it has one.
    pub fn target_pos(&self) -> Option<VoxelCoord> {
        match self {
            NavGoal::Block(pos) => Some(*pos),
            NavGoal::Place(target) => Some(target.pos),
            NavGoal::Column { .. } | NavGoal::Level { .. } => None,
        }
    }

    fn key(&self) -> GoalKey {
        match *self {
            NavGoal::Block(pos) => GoalKey::Block(pos),
            NavGoal::Column { x, z } => GoalKey::Column(x, z),
            NavGoal::Level { level } => GoalKey::Level(level),
            NavGoal::Place(target) => GoalKey::Place(target.pos),
        }
    }

    /// The action to run after confirmed arrival at `arrived_at`, if any.
    /// Pure: it only describes the action.
    pub fn arrival_action(&self, arrived_at: VoxelCoord) -> Option<ArrivalAction> {
        let NavGoal::Place(target) = self else {
            return None;
        };
        if !target.is_adjacent(arrived_at) {
            return None;
        }
        // Diagonal arrivals fall back to the face on the X axis.
        let facing = target
            .preferred_facing
            .or_else(|| Facing::from_offset(arrived_at, target.pos))
            .or_else(|| {
                Facing::from_offset(
                    VoxelCoord::new(arrived_at.x, target.pos.y, target.pos.z),
                    target.pos,
                )
            })?;
        Some(ArrivalAction::PlaceBlock {
            at: target.pos,
            material: target.material,
            facing,
        })
    }
}

impl Goal for NavGoal {
    fn is_in_goal(&self, pos: VoxelCoord) -> bool {
        match self {
            NavGoal::Block(target) => pos == *target,
            NavGoal::Column { x, z } => pos.x == *x && pos.z == *z,
            NavGoal::Level { level } => pos.y == *level,
            NavGoal::Place(target) => target.is_adjacent(pos),
        }
    }

    fn heuristic(&self, pos: VoxelCoord, scale: f64) -> f64 {
        match self {
            NavGoal::Block(target) => block_heuristic(
                span(pos.x, target.x),
                span(pos.y, target.y),
                span(pos.z, target.z),
                scale,
            ),
            NavGoal::Column { x, z } => {
                column_heuristic(span(pos.x, *x) as f64, span(pos.z, *z) as f64, scale)
            }
            NavGoal::Level { level } => level_heuristic(*level, pos.y),
            NavGoal::Place(target) => target.heuristic(pos, scale),
        }
    }
}

impl PartialEq for NavGoal {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for NavGoal {}

impl Hash for NavGoal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for NavGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavGoal::Block(pos) => write!(f, "Block{pos}"),
            NavGoal::Column { x, z } => write!(f, "Column(x={x}, z={z})"),
            NavGoal::Level { level } => write!(f, "Level(y={level})"),
            NavGoal::Place(target) => write!(f, "Place{} {:?}", target.pos, target.material),
        }
    }
}

// ---------------------------------------------------------------------------
// Arrival hook
// ---------------------------------------------------------------------------

/// Releases a goal's arrival action at most once.
///
/// The executor owns one latch per navigation request and calls `release`
/// when it confirms arrival; repeated confirmations (re-plans, jitter at the
/// destination) get `None`.
#[derive(Debug, Default)]
pub struct ArrivalLatch {
    fired: bool,
}

impl ArrivalLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn release(&mut self, goal: &NavGoal, arrived_at: VoxelCoord) -> Option<ArrivalAction> {
        if self.fired {
            return None;
        }
        let action = goal.arrival_action(arrived_at)?;
        self.fired = true;
        Some(action)
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}
