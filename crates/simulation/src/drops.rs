//! In-flight water drops and collision resolution (the falling phase).
//!
//! Drops are massless tracers whose only job is to deliver discrete water
//! increments into the `PoolMap`. Each tick every live drop accelerates
//! under gravity, integrates its position, re-derives its grid cell, and
//! resolves against the tile grid: settle onto a floor, deflect sideways
//! out of a solid, or fall on. Drops never interact with each other, so
//! array order carries no correctness weight; the set compacts in place
//! with a read/write cursor.

use bevy::prelude::*;

use crate::config::{GRAVITY, OFF_GRID_MARGIN, SIDE_FLOW_DAMPING, TILE_SIZE};
use crate::grid::{TileGrid, TileKind};
use crate::pools::PoolMap;
use crate::simulation_sets::SimulationSet;

/// One falling drop: continuous pixel position and velocity, plus the grid
/// cell derived from the position each tick.
#[derive(Debug, Clone, Copy)]
pub struct WaterDrop {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub cell_x: i32,
    pub cell_y: i32,
}

impl WaterDrop {
    /// Drop at a pixel position with an initial horizontal velocity.
    pub fn at(x: f32, y: f32, vx: f32) -> Self {
        let (cell_x, cell_y) = TileGrid::world_to_grid(x, y);
        Self {
            x,
            y,
            vx,
            vy: 0.0,
            cell_x,
            cell_y,
        }
    }
}

/// The collection of live drops, exclusively owned here.
#[derive(Resource, Default)]
pub struct DropSet {
    pub drops: Vec<WaterDrop>,
}

impl DropSet {
    pub fn len(&self) -> usize {
        self.drops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }
}

/// Cosmetic one-shot splash at a cell, emitted whenever a drop settles.
/// Consumed by rendering collaborators; the simulation never reads it back.
#[derive(Event, Debug, Clone, Copy)]
pub struct SplashEvent {
    pub x: i32,
    pub y: i32,
}

/// What became of a drop after one integration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropFate {
    /// Still falling; keep it for the next tick.
    Falling,
    /// Converted into pool water at the given cell.
    Settled { x: i32, y: i32 },
    /// Destroyed without settling: fell past the grid, or was stuck with
    /// every escape blocked (the water is lost by design).
    Lost,
}

/// Advance one drop by one tick and resolve its collision state.
pub fn step_drop(drop: &mut WaterDrop, grid: &TileGrid, pools: &mut PoolMap) -> DropFate {
    drop.vy += GRAVITY;
    drop.x += drop.vx;
    drop.y += drop.vy;

    let (cx, cy) = TileGrid::world_to_grid(drop.x, drop.y);
    drop.cell_x = cx;
    drop.cell_y = cy;

    if let Some(current) = grid.get(cx, cy) {
        // Floor reached: nothing below admits water and we sit in an open
        // cell, so the drop becomes pool quantity right here.
        if !grid.can_flow_into(cx, cy + 1) && current.kind == TileKind::Empty {
            pools.settle(cx, cy);
            return DropFate::Settled { x: cx, y: cy };
        }

        // Embedded in a solid (possible after a lateral deflection last
        // tick): try to escape sideways, preferring the travel direction.
        if current.kind.is_solid() {
            let dir: i32 = if drop.vx >= 0.0 { 1 } else { -1 };
            if grid.can_flow_into(cx + dir, cy) {
                let (px, _) = TileGrid::grid_to_world(cx + dir, cy);
                drop.x = px;
                drop.cell_x = cx + dir;
                drop.vx *= SIDE_FLOW_DAMPING;
            } else if grid.can_flow_into(cx - dir, cy) {
                let (px, _) = TileGrid::grid_to_world(cx - dir, cy);
                drop.x = px;
                drop.cell_x = cx - dir;
                drop.vx = -drop.vx * SIDE_FLOW_DAMPING;
            } else {
                // Both sides blocked: deposit one cell up if that cell is
                // open, then destroy the drop either way.
                if grid.can_flow_into(cx, cy - 1) {
                    pools.settle(cx, cy - 1);
                    return DropFate::Settled { x: cx, y: cy - 1 };
                }
                return DropFate::Lost;
            }
        }
    }

    // Off-grid disposal: unresolved drops past the bottom margin are gone.
    if drop.y > grid.height as f32 * TILE_SIZE + OFF_GRID_MARGIN {
        return DropFate::Lost;
    }

    DropFate::Falling
}

/// Falling-phase system: one `step_drop` per live drop, in array order,
/// compacting survivors in place and emitting a splash per settlement.
pub fn update_drops(
    grid: Res<TileGrid>,
    mut drops: ResMut<DropSet>,
    mut pools: ResMut<PoolMap>,
    mut splashes: EventWriter<SplashEvent>,
) {
    let mut write = 0;
    for read in 0..drops.drops.len() {
        let mut drop = drops.drops[read];
        match step_drop(&mut drop, &grid, &mut pools) {
            DropFate::Falling => {
                drops.drops[write] = drop;
                write += 1;
            }
            DropFate::Settled { x, y } => {
                splashes.send(SplashEvent { x, y });
            }
            DropFate::Lost => {}
        }
    }
    drops.drops.truncate(write);
}

pub struct DropsPlugin;

impl Plugin for DropsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DropSet>()
            .add_event::<SplashEvent>()
            .add_systems(
                FixedUpdate,
                update_drops.in_set(SimulationSet::Simulation),
            );
    }
}
