// Action cost table: the primitive movement costs, in game ticks.
//
// All costs are expressed in ticks (1/20 s). Horizontal costs come from the
// agent's top speed in blocks per second; fall costs come from integrating
// the per-tick fall velocity with drag. Every heuristic in `goal.rs` is built
// from these entries and must stay at or below the cheapest combination of
// them covering the same displacement.
//
// The fall table is generated at compile time, so lookups are a bounds check
// and an array read.
//
// Composite moves (ascend, descend, pillar) are priced as the sum of their
// horizontal and vertical components. That keeps each composite move at
// least as expensive as the heuristic drop it produces, which is what makes
// the goal heuristics consistent over the primitive lattice.

/// Sentinel cost for an action that cannot be taken. Any cost at or above it
/// means "this edge does not exist".
pub const COST_INF: f64 = 1_000_000.0;

pub const WALK_ONE_BLOCK_COST: f64 = 20.0 / 4.317;
pub const WALK_ONE_IN_WATER_COST: f64 = 20.0 / 2.2;
pub const WALK_ONE_OVER_SOUL_SAND_COST: f64 = WALK_ONE_BLOCK_COST * 2.0;
pub const LADDER_UP_ONE_COST: f64 = 20.0 / 2.35;
pub const LADDER_DOWN_ONE_COST: f64 = 20.0 / 3.0;
pub const SNEAK_ONE_BLOCK_COST: f64 = 20.0 / 1.3;
pub const SPRINT_ONE_BLOCK_COST: f64 = 20.0 / 5.612;
pub const SPRINT_MULTIPLIER: f64 = SPRINT_ONE_BLOCK_COST / WALK_ONE_BLOCK_COST;

/// Walking off the edge of a block: most of a walk, the rest is airborne.
pub const WALK_OFF_BLOCK_COST: f64 = WALK_ONE_BLOCK_COST * 0.8;
/// Re-centering on the landing block after a fall.
pub const CENTER_AFTER_FALL_COST: f64 = WALK_ONE_BLOCK_COST - WALK_OFF_BLOCK_COST;

pub const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// Number of tabulated fall heights (0..FALL_TABLE_LEN blocks).
pub const FALL_TABLE_LEN: usize = 256;

/// Ticks needed to fall `n` blocks from rest, indexed by `n`.
pub const FALL_N_BLOCKS_COST: [f64; FALL_TABLE_LEN] = generate_fall_table();

pub const FALL_1_25_BLOCKS_COST: f64 = distance_to_ticks(1.25);
pub const FALL_0_25_BLOCKS_COST: f64 = distance_to_ticks(0.25);

/// Cost of a one-block jump: the time to rise 1.25 blocks and come down the
/// 0.25 overshoot, which is symmetric with falling the same distances.
pub const JUMP_ONE_BLOCK_COST: f64 = FALL_1_25_BLOCKS_COST - FALL_0_25_BLOCKS_COST;

const GRAVITY_TERMINAL: f64 = 3.92;
const DRAG: f64 = 0.98;

/// Downward distance covered during tick `ticks` of a fall from rest.
pub const fn velocity(ticks: u32) -> f64 {
    let mut decay = 1.0;
    let mut i = 0;
    while i < ticks {
        decay *= DRAG;
        i += 1;
    }
    (decay - 1.0) * -GRAVITY_TERMINAL
}

/// Fractional ticks needed to fall `distance` blocks from rest.
pub const fn distance_to_ticks(distance: f64) -> f64 {
    if distance == 0.0 {
        return 0.0;
    }
    let mut remaining = distance;
    let mut ticks: u32 = 0;
    // Same multiplication sequence as `velocity`, kept incremental.
    let mut decay = 1.0;
    loop {
        let fall = (decay - 1.0) * -GRAVITY_TERMINAL;
        if remaining <= fall {
            return ticks as f64 + remaining / fall;
        }
        remaining -= fall;
        ticks += 1;
        decay *= DRAG;
    }
}

const fn generate_fall_table() -> [f64; FALL_TABLE_LEN] {
    let mut table = [0.0; FALL_TABLE_LEN];
    let mut i = 0;
    while i < FALL_TABLE_LEN {
        table[i] = distance_to_ticks(i as f64);
        i += 1;
    }
    table
}

/// Fall cost for a drop of `height` blocks. Heights past the table are
/// treated as infeasible.
#[inline]
pub fn fall_cost_for_height(height: u32) -> f64 {
    FALL_N_BLOCKS_COST
        .get(height as usize)
        .copied()
        .unwrap_or(COST_INF)
}

/// Whether a cost means the action is unavailable.
#[inline]
pub fn is_infeasible(cost: f64) -> bool {
    cost >= COST_INF || cost.is_nan()
}

/// Step up one block while moving one block horizontally.
#[inline]
pub fn ascend_cost(horizontal: f64) -> f64 {
    horizontal + JUMP_ONE_BLOCK_COST
}

/// Walk off a ledge and drop `height` blocks.
#[inline]
pub fn descend_cost(height: u32) -> f64 {
    WALK_OFF_BLOCK_COST + fall_cost_for_height(height) + CENTER_AFTER_FALL_COST
}

/// Jump straight up and place a block underneath.
#[inline]
pub fn pillar_cost(place_cost: f64) -> f64 {
    JUMP_ONE_BLOCK_COST + place_cost
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn horizontal_costs() {
        assert!(close(WALK_ONE_BLOCK_COST, 4.632_846_884_410_47));
        assert!(close(SPRINT_ONE_BLOCK_COST, 3.563_791_874_554_526));
        assert!(close(WALK_ONE_IN_WATER_COST, 9.090_909_090_909_09));
        assert!(SPRINT_ONE_BLOCK_COST < WALK_ONE_BLOCK_COST);
        assert!(close(WALK_OFF_BLOCK_COST + CENTER_AFTER_FALL_COST, WALK_ONE_BLOCK_COST));
    }

    #[test]
    fn fall_table_values() {
        assert_eq!(FALL_N_BLOCKS_COST[0], 0.0);
        assert!(close(FALL_N_BLOCKS_COST[1], 5.614_724_090_637_819));
        assert!(close(FALL_N_BLOCKS_COST[2], 7.788_078_404_071_102));
        assert!(close(FALL_N_BLOCKS_COST[3], 9.468_673_486_383_276));
    }

    #[test]
    fn fall_table_is_strictly_increasing() {
        for n in 1..FALL_TABLE_LEN {
            assert!(FALL_N_BLOCKS_COST[n] > FALL_N_BLOCKS_COST[n - 1], "height {n}");
        }
    }

    #[test]
    fn jump_cost() {
        assert!(close(JUMP_ONE_BLOCK_COST, 3.163_397_248_098_739_6));
    }

    #[test]
    fn velocity_starts_at_rest() {
        assert_eq!(velocity(0), 0.0);
        assert!(close(velocity(1), 0.0784));
        assert!(velocity(200) < GRAVITY_TERMINAL);
    }

    #[test]
    fn out_of_table_fall_is_infeasible() {
        assert!(is_infeasible(fall_cost_for_height(FALL_TABLE_LEN as u32)));
        assert!(!is_infeasible(fall_cost_for_height(3)));
        assert!(is_infeasible(descend_cost(10_000)));
    }

    #[test]
    fn composite_moves_cover_components() {
        assert!(ascend_cost(SPRINT_ONE_BLOCK_COST) >= JUMP_ONE_BLOCK_COST + SPRINT_ONE_BLOCK_COST);
        assert!(descend_cost(1) > FALL_N_BLOCKS_COST[1]);
        assert!(close(pillar_cost(20.0), JUMP_ONE_BLOCK_COST + 20.0));
    }
}
