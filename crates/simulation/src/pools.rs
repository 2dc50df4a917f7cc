//! Pooled water storage and pressure diffusion (the settling phase).
//!
//! The `PoolMap` resource tracks an absolute water quantity per grid cell,
//! decoupled in units from the normalized `water_level` the tiles expose to
//! renderers and collectible checks. Once per tick, after the falling phase:
//!   1. Every wet cell first tries to push water straight down; only when
//!      that attempt is blocked or capacity-capped (and the cell holds more
//!      than `SPREAD_MIN_QUANTITY`) does it also push sideways.
//!   2. Every cell touched by a transfer or settlement is re-synced into
//!      `TileGrid.water_level`; entries that decayed to
//!      `PRUNE_THRESHOLD` or below are pruned back to zero.

use bevy::prelude::*;

use crate::config::{
    FLOW_RATE, MAX_WATER_PER_TILE, MIN_PRESSURE_DIFF, MIN_TRANSFER, PRUNE_THRESHOLD,
    SPREAD_MIN_QUANTITY, WATER_REACHED_THRESHOLD,
};
use crate::grid::TileGrid;
use crate::simulation_sets::SimulationSet;

/// Outcome of one directional flow attempt between two cells.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FlowAttempt {
    /// Nothing moved: target off-grid or solid, differential at or under
    /// `MIN_PRESSURE_DIFF`, or the computed amount under `MIN_TRANSFER`.
    Blocked,
    /// Water moved. `capped` is true iff the destination's remaining
    /// capacity was the binding bound (the transfer wanted to send more).
    Moved { capped: bool },
}

/// Per-cell absolute water quantity, dense, with `0.0` as the "no pool
/// here" sentinel. Quantities are invariantly within
/// `[0, MAX_WATER_PER_TILE]`; every write clamps.
#[derive(Resource)]
pub struct PoolMap {
    quantities: Vec<f32>,
    /// Cells whose quantity changed since the last sync pass.
    dirty: Vec<bool>,
    width: usize,
    height: usize,
}

impl Default for PoolMap {
    fn default() -> Self {
        Self::new(crate::config::GRID_WIDTH, crate::config::GRID_HEIGHT)
    }
}

impl PoolMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            quantities: vec![0.0; width * height],
            dirty: vec![false; width * height],
            width,
            height,
        }
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width + x as usize
    }

    /// Absolute quantity at a cell; off-grid reads as zero.
    #[inline]
    pub fn quantity(&self, x: i32, y: i32) -> f32 {
        if self.in_bounds(x, y) {
            self.quantities[self.index(x, y)]
        } else {
            0.0
        }
    }

    /// Normalized level in [0, 1]: quantity over per-tile capacity.
    #[inline]
    pub fn level_at(&self, x: i32, y: i32) -> f32 {
        self.quantity(x, y) / MAX_WATER_PER_TILE
    }

    /// True once the normalized level at a cell meets the threshold.
    pub fn has_water_reached(&self, x: i32, y: i32, threshold: f32) -> bool {
        self.level_at(x, y) >= threshold
    }

    /// `has_water_reached` with the standard threshold.
    pub fn has_water(&self, x: i32, y: i32) -> bool {
        self.has_water_reached(x, y, WATER_REACHED_THRESHOLD)
    }

    /// Store a quantity, clamped to capacity, and mark the cell dirty.
    /// No-op off-grid.
    pub fn set_quantity(&mut self, x: i32, y: i32, quantity: f32) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.quantities[idx] = quantity.clamp(0.0, MAX_WATER_PER_TILE);
            self.dirty[idx] = true;
        }
    }

    /// Deposit one settled drop's worth of water (+1, capped at capacity).
    pub fn settle(&mut self, x: i32, y: i32) {
        let current = self.quantity(x, y);
        self.set_quantity(x, y, current + 1.0);
    }

    /// Total pooled water across the grid.
    pub fn total(&self) -> f32 {
        self.quantities.iter().sum()
    }

    /// Largest quantity held by any single cell.
    pub fn max_quantity(&self) -> f32 {
        self.quantities.iter().fold(0.0_f32, |acc, &q| acc.max(q))
    }

    /// Number of cells holding more than the prune threshold.
    pub fn wet_cells(&self) -> usize {
        self.quantities
            .iter()
            .filter(|&&q| q > PRUNE_THRESHOLD)
            .count()
    }

    /// Drop every pool and pending dirty flag (level reset).
    pub fn clear(&mut self) {
        self.quantities.iter_mut().for_each(|q| *q = 0.0);
        self.dirty.iter_mut().for_each(|d| *d = false);
    }
}

/// Attempt one transfer from `(fx, fy)` toward `(tx, ty)`.
///
/// The moved amount is the minimum of four bounds: the fixed `FLOW_RATE`
/// cap, half the pressure differential, 30% of the source quantity, and the
/// destination's remaining capacity. Differentials at or under
/// `MIN_PRESSURE_DIFF` and amounts at or under `MIN_TRANSFER` move nothing.
fn try_flow(pools: &mut PoolMap, grid: &TileGrid, fx: i32, fy: i32, tx: i32, ty: i32) -> FlowAttempt {
    if !grid.can_flow_into(tx, ty) {
        return FlowAttempt::Blocked;
    }

    let from_q = pools.quantity(fx, fy);
    let to_q = pools.quantity(tx, ty);

    let pressure_diff = from_q - to_q;
    if pressure_diff <= MIN_PRESSURE_DIFF {
        return FlowAttempt::Blocked;
    }

    let desired = FLOW_RATE.min(pressure_diff * 0.5).min(from_q * 0.3);
    let room = MAX_WATER_PER_TILE - to_q;
    let amount = desired.min(room);
    if amount <= MIN_TRANSFER {
        return FlowAttempt::Blocked;
    }

    pools.set_quantity(fx, fy, from_q - amount);
    pools.set_quantity(tx, ty, to_q + amount);
    FlowAttempt::Moved {
        capped: room < desired,
    }
}

/// One full diffusion pass over every wet cell, in row-major order.
///
/// Down first; sideways only when the cell held more than
/// `SPREAD_MIN_QUANTITY` at the start of its turn AND the downward attempt
/// could not absorb its full allowance (blocked or capacity-capped). The
/// pass mutates in place, so later cells see earlier transfers within the
/// same tick; the converged outcome does not depend on this ordering.
pub fn flow_pass(pools: &mut PoolMap, grid: &TileGrid) {
    for idx in 0..pools.quantities.len() {
        let quantity = pools.quantities[idx];
        if quantity <= 0.0 {
            continue;
        }
        let x = (idx % pools.width) as i32;
        let y = (idx / pools.width) as i32;

        let down = try_flow(pools, grid, x, y, x, y + 1);

        let spread = quantity > SPREAD_MIN_QUANTITY
            && matches!(down, FlowAttempt::Blocked | FlowAttempt::Moved { capped: true });
        if spread {
            try_flow(pools, grid, x, y, x - 1, y);
            try_flow(pools, grid, x, y, x + 1, y);
        }
    }
}

/// Push normalized levels for every dirty cell back into the grid, pruning
/// entries that decayed to `PRUNE_THRESHOLD` or below.
pub fn sync_pass(pools: &mut PoolMap, grid: &mut TileGrid) {
    for idx in 0..pools.dirty.len() {
        if !pools.dirty[idx] {
            continue;
        }
        pools.dirty[idx] = false;

        let x = (idx % pools.width) as i32;
        let y = (idx / pools.width) as i32;
        let quantity = pools.quantities[idx];
        if quantity > PRUNE_THRESHOLD {
            grid.set_water_level(x, y, quantity / MAX_WATER_PER_TILE);
        } else {
            pools.quantities[idx] = 0.0;
            grid.set_water_level(x, y, 0.0);
        }
    }
}

/// Settling-phase system: diffusion, then level sync.
pub fn update_pools(mut pools: ResMut<PoolMap>, mut grid: ResMut<TileGrid>) {
    flow_pass(&mut pools, &grid);
    sync_pass(&mut pools, &mut grid);
}

pub struct PoolsPlugin;

impl Plugin for PoolsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PoolMap>().add_systems(
            FixedUpdate,
            update_pools
                .after(crate::drops::update_drops)
                .in_set(SimulationSet::Simulation),
        );
    }
}
