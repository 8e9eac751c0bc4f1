// voxnav_core: goal heuristics and movement-cost model for voxel pathfinding.
//
// This crate turns world state, agent capabilities, and runtime configuration
// into the two things a best-first search needs: an admissible distance
// estimate toward a goal, and per-action edge costs. It does not own the
// search itself beyond a small reference implementation used to validate the
// heuristics, and it never performs an in-world action.
//
// Module overview:
// - `types.rs`:      VoxelCoord, BlockKind materials, Dimension, Facing.
// - `block_type.rs`: PathingBlockType: the 2-bit pathing classification.
// - `grid.rs`:       PathingGrid: dense 2-bit packed classification cache.
// - `costs.rs`:      Action cost table (walk/sprint/swim/jump/fall-by-height).
// - `math.rs`:       Fast floor/ceil helpers.
// - `goal.rs`:       Goal trait, NavGoal variants, arrival hook.
// - `config.rs`:     NavConfig: every tunable and permission flag, from JSON.
// - `error.rs`:      NavError / PolicyError.
// - `agent.rs`:      AgentSnapshot + ToolSet: captured agent capabilities.
// - `border.rs`:     WorldBorder: horizontal region the agent may use.
// - `world.rs`:      BlockStateProvider trait + dense VoxelWorld.
// - `protection.rs`: ProtectionPolicy hook (fails closed).
// - `context.rs`:    CalculationContext: the frozen per-search snapshot.
// - `search.rs`:     Relaxed A* over the primitive move lattice.
//
// **Critical constraint: snapshot purity.** Every query on a Goal or a
// CalculationContext is a pure read over data captured at construction. No
// query blocks, allocates per call, or observes later mutation of the live
// world or agent.

pub mod agent;
pub mod block_type;
pub mod border;
pub mod config;
pub mod context;
pub mod costs;
pub mod error;
pub mod goal;
pub mod grid;
pub mod math;
pub mod protection;
pub mod search;
pub mod types;
pub mod world;
