// Reference A* over the primitive move lattice.
//
// A deliberately relaxed planner: horizontal and falling moves ignore
// terrain, so the lattice is obstacle-free. Moves that place or break a
// block (pillaring, digging down) consult the context at the affected cell,
// which makes permissions, protection, the world border, and tool strength
// visible in path costs. The planner exists to measure true lattice costs
// for heuristic validation and benchmarking; it is not a movement planner.
//
// Structure follows a classic A*: a `BinaryHeap` min-heap via reversed
// ordering, with g-scores, came-from links, and the closed set stored in
// `Vec`s indexed by position within a cube around the start. Ties break on
// the cell index so results are deterministic. Disabling the heuristic
// turns the search into Dijkstra.
//
// See also: `context.rs` for the cost queries, `costs.rs` for the action
// prices, `goal.rs` for the heuristics being validated.

use crate::context::CalculationContext;
use crate::costs::{
    COST_INF, SQRT_2, WALK_OFF_BLOCK_COST, ascend_cost, descend_cost, fall_cost_for_height,
    is_infeasible, pillar_cost,
};
use crate::goal::Goal;
use crate::types::VoxelCoord;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

const CARDINALS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONALS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Traverse,
    Diagonal,
    Ascend,
    DiagonalAscend,
    Descend,
    DiagonalDescend,
    /// A fall past the unassisted ceiling, caught with a water bucket.
    BucketFall,
    /// Jump and place a block underneath.
    Pillar,
    /// Break the block below and drop into it.
    Downward,
}

/// One edge of the lattice, as an offset from the current cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Move {
    pub kind: MoveKind,
    pub dx: i32,
    pub dy: i32,
    pub dz: i32,
    /// Position-independent part of the cost.
    pub base_cost: f64,
}

impl Move {
    fn new(kind: MoveKind, dx: i32, dy: i32, dz: i32, base_cost: f64) -> Self {
        Self {
            kind,
            dx,
            dy,
            dz,
            base_cost,
        }
    }

    /// Full cost of taking this move from `from`.
    pub fn cost_from(&self, ctx: &CalculationContext<'_>, from: VoxelCoord) -> f64 {
        match self.kind {
            MoveKind::Pillar => pillar_cost(ctx.cost_of_placing_at(from, ctx.get(from))),
            MoveKind::Downward => {
                let below = from.offset(0, -1, 0);
                let mining = ctx.mining_duration_ticks(below, ctx.get(below));
                if is_infeasible(mining) {
                    COST_INF
                } else {
                    self.base_cost + mining
                }
            }
            _ => self.base_cost,
        }
    }
}

/// Every move the context permits, with base costs.
pub fn primitive_moves(ctx: &CalculationContext<'_>) -> SmallVec<[Move; 32]> {
    let permissions = ctx.permissions();
    let horizontal = ctx.horizontal_step_cost();
    let jump_penalty = ctx.tunables().jump_penalty;
    let mut moves = SmallVec::new();

    for (dx, dz) in CARDINALS {
        moves.push(Move::new(MoveKind::Traverse, dx, 0, dz, horizontal));
        moves.push(Move::new(
            MoveKind::Ascend,
            dx,
            1,
            dz,
            ascend_cost(horizontal) + jump_penalty,
        ));
        for height in 1..=ctx.max_fall_height_no_water() {
            moves.push(Move::new(
                MoveKind::Descend,
                dx,
                -(height as i32),
                dz,
                descend_cost(height),
            ));
        }
        if ctx.has_water_bucket() {
            for height in ctx.max_fall_height_no_water() + 1..=ctx.max_fall_height_bucket() {
                moves.push(Move::new(
                    MoveKind::BucketFall,
                    dx,
                    -(height as i32),
                    dz,
                    descend_cost(height) + ctx.place_bucket_cost(),
                ));
            }
        }
    }

    for (dx, dz) in DIAGONALS {
        moves.push(Move::new(MoveKind::Diagonal, dx, 0, dz, horizontal * SQRT_2));
        if permissions.allow_diagonal_ascend {
            moves.push(Move::new(
                MoveKind::DiagonalAscend,
                dx,
                1,
                dz,
                ascend_cost(horizontal * SQRT_2) + jump_penalty,
            ));
        }
        if permissions.allow_diagonal_descend {
            // Walking off diagonally covers the extra horizontal distance.
            let walk_off_extra = WALK_OFF_BLOCK_COST * (SQRT_2 - 1.0);
            for height in 1..=ctx.max_fall_height_no_water() {
                moves.push(Move::new(
                    MoveKind::DiagonalDescend,
                    dx,
                    -(height as i32),
                    dz,
                    descend_cost(height) + walk_off_extra,
                ));
            }
        }
    }

    if ctx.has_throwaway() {
        moves.push(Move::new(MoveKind::Pillar, 0, 1, 0, 0.0));
    }
    if permissions.allow_downward && permissions.allow_break {
        moves.push(Move::new(MoveKind::Downward, 0, -1, 0, fall_cost_for_height(1)));
    }
    moves
}

// ---------------------------------------------------------------------------
// Favoring
// ---------------------------------------------------------------------------

/// Cost multipliers for cells on a previously travelled path, so a replan
/// prefers to retrace it.
#[derive(Clone, Debug, Default)]
pub struct Favoring {
    multipliers: FxHashMap<VoxelCoord, f64>,
}

impl Favoring {
    /// No cell is favored.
    pub fn none() -> Self {
        Self::default()
    }

    /// Favor every cell of `previous` with `coefficient`.
    pub fn new(previous: &[VoxelCoord], coefficient: f64) -> Self {
        let mut multipliers = FxHashMap::default();
        if coefficient != 1.0 {
            for &pos in previous {
                multipliers.insert(pos, coefficient);
            }
        }
        Self { multipliers }
    }

    /// Favor `previous` with the context's backtrack coefficient.
    pub fn from_context(previous: &[VoxelCoord], ctx: &CalculationContext<'_>) -> Self {
        Self::new(previous, ctx.tunables().backtrack_cost_favoring_coefficient)
    }

    pub fn is_empty(&self) -> bool {
        self.multipliers.is_empty()
    }

    /// Multiplier for entering `pos`.
    pub fn multiplier(&self, pos: VoxelCoord) -> f64 {
        self.multipliers.get(&pos).copied().unwrap_or(1.0)
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchLimits {
    /// Half-width of the cube around the start that the search may visit.
    pub radius: u32,
    /// Give up after this many node expansions.
    pub max_expansions: usize,
    /// Use the goal heuristic. Without it the search is Dijkstra.
    pub use_heuristic: bool,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            radius: 16,
            max_expansions: 200_000,
            use_heuristic: true,
        }
    }
}

/// The result of a successful search.
#[derive(Clone, Debug)]
pub struct PathResult {
    /// Cells from start to goal (inclusive).
    pub positions: Vec<VoxelCoord>,
    pub total_cost: f64,
    /// Nodes expanded before the goal was reached.
    pub expanded: usize,
}

impl PathResult {
    pub fn end(&self) -> Option<VoxelCoord> {
        self.positions.last().copied()
    }
}

/// Entry in the open set (min-heap via reversed ordering).
struct OpenEntry {
    index: usize,
    f_score: f64,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f_score.total_cmp(&other.f_score) == Ordering::Equal && self.index == other.index
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: smallest f_score is "greatest".
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Cube of cells centered on the search start.
struct SearchBox {
    min: VoxelCoord,
    side: usize,
}

impl SearchBox {
    fn around(center: VoxelCoord, radius: u32) -> Self {
        let r = radius as i32;
        Self {
            min: center.offset(-r, -r, -r),
            side: 2 * radius as usize + 1,
        }
    }

    fn len(&self) -> usize {
        self.side * self.side * self.side
    }

    fn index(&self, pos: VoxelCoord) -> Option<usize> {
        let dx = pos.x.checked_sub(self.min.x)?;
        let dy = pos.y.checked_sub(self.min.y)?;
        let dz = pos.z.checked_sub(self.min.z)?;
        if dx < 0 || dy < 0 || dz < 0 {
            return None;
        }
        let (dx, dy, dz) = (dx as usize, dy as usize, dz as usize);
        if dx >= self.side || dy >= self.side || dz >= self.side {
            return None;
        }
        Some(dx + dz * self.side + dy * self.side * self.side)
    }

    fn position(&self, index: usize) -> VoxelCoord {
        let layer = self.side * self.side;
        let dy = index / layer;
        let rem = index % layer;
        let dz = rem / self.side;
        let dx = rem % self.side;
        self.min.offset(dx as i32, dy as i32, dz as i32)
    }
}

/// Cheapest path from `start` into `goal` over the lattice priced by `ctx`.
///
/// Returns `None` if no goal cell is reachable inside the search cube or
/// the expansion cap is hit first.
pub fn find_path<G: Goal + ?Sized>(
    ctx: &CalculationContext<'_>,
    start: VoxelCoord,
    goal: &G,
    limits: &SearchLimits,
    favoring: &Favoring,
) -> Option<PathResult> {
    let bounds = SearchBox::around(start, limits.radius);
    let moves = primitive_moves(ctx);
    let heuristic = |pos: VoxelCoord| {
        if limits.use_heuristic {
            ctx.estimate(goal, pos)
        } else {
            0.0
        }
    };

    let n = bounds.len();
    let mut g_score = vec![f64::INFINITY; n];
    let mut came_from: Vec<Option<usize>> = vec![None; n];
    let mut closed = vec![false; n];

    let start_index = bounds.index(start)?;
    g_score[start_index] = 0.0;

    let mut open = BinaryHeap::new();
    open.push(OpenEntry {
        index: start_index,
        f_score: heuristic(start),
    });

    let mut expanded = 0usize;
    while let Some(current) = open.pop() {
        let ci = current.index;
        if closed[ci] {
            continue;
        }
        let pos = bounds.position(ci);

        if goal.is_in_goal(pos) {
            let result = reconstruct_path(&bounds, &came_from, ci, g_score[ci], expanded);
            log::debug!(
                "lattice search {start} -> {goal:?}: cost {:.3}, {} steps, {expanded} expanded",
                result.total_cost,
                result.positions.len() - 1,
            );
            return Some(result);
        }

        closed[ci] = true;
        expanded += 1;
        if expanded > limits.max_expansions {
            break;
        }

        let current_g = g_score[ci];
        for mv in &moves {
            let next = pos.offset(mv.dx, mv.dy, mv.dz);
            let Some(ni) = bounds.index(next) else {
                continue;
            };
            if closed[ni] {
                continue;
            }
            let cost = mv.cost_from(ctx, pos);
            if is_infeasible(cost) {
                continue;
            }
            let tentative_g = current_g + cost * favoring.multiplier(next);
            if tentative_g < g_score[ni] {
                g_score[ni] = tentative_g;
                came_from[ni] = Some(ci);
                open.push(OpenEntry {
                    index: ni,
                    f_score: tentative_g + heuristic(next),
                });
            }
        }
    }

    log::debug!("lattice search {start} -> {goal:?}: no path, {expanded} expanded");
    None
}

/// Cheapest lattice cost from `start` to every reachable cell of the search
/// cube. The heuristic setting in `limits` is ignored.
pub fn cost_field(
    ctx: &CalculationContext<'_>,
    start: VoxelCoord,
    limits: &SearchLimits,
    favoring: &Favoring,
) -> FxHashMap<VoxelCoord, f64> {
    let bounds = SearchBox::around(start, limits.radius);
    let moves = primitive_moves(ctx);
    let mut settled = FxHashMap::default();
    let Some(start_index) = bounds.index(start) else {
        return settled;
    };

    let mut g_score = vec![f64::INFINITY; bounds.len()];
    g_score[start_index] = 0.0;
    let mut open = BinaryHeap::new();
    open.push(OpenEntry {
        index: start_index,
        f_score: 0.0,
    });

    while let Some(current) = open.pop() {
        let ci = current.index;
        let pos = bounds.position(ci);
        if settled.contains_key(&pos) {
            continue;
        }
        let current_g = g_score[ci];
        settled.insert(pos, current_g);
        if settled.len() > limits.max_expansions {
            break;
        }

        for mv in &moves {
            let next = pos.offset(mv.dx, mv.dy, mv.dz);
            let Some(ni) = bounds.index(next) else {
                continue;
            };
            let cost = mv.cost_from(ctx, pos);
            if is_infeasible(cost) {
                continue;
            }
            let tentative_g = current_g + cost * favoring.multiplier(next);
            if tentative_g < g_score[ni] {
                g_score[ni] = tentative_g;
                open.push(OpenEntry {
                    index: ni,
                    f_score: tentative_g,
                });
            }
        }
    }

    log::debug!("cost field from {start}: {} cells settled", settled.len());
    settled
}

fn reconstruct_path(
    bounds: &SearchBox,
    came_from: &[Option<usize>],
    end: usize,
    total_cost: f64,
    expanded: usize,
) -> PathResult {
    let mut positions = vec![bounds.position(end)];
    let mut current = end;
    while let Some(prev) = came_from[current] {
        positions.push(bounds.position(prev));
        current = prev;
    }
    positions.reverse();
    PathResult {
        positions,
        total_cost,
        expanded,
    }
}
