//! Deterministic simulation ordering via `SystemSet` phases.
//!
//! These sets establish a contract for system execution order within the
//! `FixedUpdate` schedule. Plugins place their systems into the appropriate
//! set so that inter-plugin ordering is explicit and testable rather than
//! relying on implicit timing assumptions.
//!
//! # FixedUpdate phases (`SimulationSet`)
//!
//! ```text
//! PreSim  →  Simulation  →  PostSim
//! ```
//!
//! * **PreSim** – Queued action execution, tick counter, emitter timer.
//!   These set up per-tick state that the core simulation reads.
//! * **Simulation** – The water engine proper: drop integration and
//!   collision resolution, pool diffusion, grid water-level sync. Systems
//!   inside this set carry explicit `.after()` edges because they all write
//!   the shared `PoolMap`/`TileGrid` resources.
//! * **PostSim** – Aggregation and reporting: collectible contact checks
//!   and water statistics. These read simulation state so downstream
//!   consumers (rendering, host UI) can rely on their output next frame.

use bevy::prelude::*;

/// Ordered phases for systems running in the `FixedUpdate` schedule.
///
/// Configured as a chain: `PreSim` → `Simulation` → `PostSim`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Pre-simulation setup: action queue, tick counter, drop emission.
    PreSim,
    /// Core simulation: falling phase, settling phase, level sync.
    Simulation,
    /// Post-simulation aggregation: collectibles, stats.
    PostSim,
}
