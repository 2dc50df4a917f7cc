//! Timed drop emitter at the level's water source cell.
//!
//! The emitter is a plain accumulated-time counter (a repeating `Timer`
//! ticked from fixed-schedule delta time), so tests can drive it
//! deterministically with virtual time; there is no wall-clock dependency.
//! Start/stop are explicit external operations via the action queue and are
//! independent of the falling/settling phases.

use bevy::prelude::*;
use rand::Rng;

use crate::config::{DROP_INTERVAL, SPAWN_JITTER_VX, SPAWN_JITTER_X, TILE_SIZE};
use crate::drops::{DropSet, WaterDrop};
use crate::grid::TileGrid;
use crate::sim_rng::SimRng;
use crate::simulation_sets::SimulationSet;

/// Emitter state: the configured source cell, its repeating interval
/// timer, and whether it is currently running.
#[derive(Resource)]
pub struct WaterSource {
    pub cell: (i32, i32),
    pub timer: Timer,
    pub active: bool,
}

impl Default for WaterSource {
    fn default() -> Self {
        Self {
            cell: (0, 0),
            timer: Timer::from_seconds(DROP_INTERVAL, TimerMode::Repeating),
            active: false,
        }
    }
}

impl WaterSource {
    /// Begin emitting from the given cell. Restarts the interval so the
    /// first drop arrives one full interval after the start command.
    pub fn start(&mut self, cell: (i32, i32)) {
        self.cell = cell;
        self.timer.reset();
        self.active = true;
    }

    /// Stop emitting. Idempotent.
    pub fn stop(&mut self) {
        self.active = false;
    }
}

/// Build one emitted drop: the source cell's pixel center, shifted half a
/// tile down, with small random jitter on x position and x velocity.
pub fn spawn_drop(cell: (i32, i32), rng: &mut impl Rng) -> WaterDrop {
    let (px, py) = TileGrid::grid_to_world(cell.0, cell.1);
    let x = px + (rng.gen::<f32>() - 0.5) * (SPAWN_JITTER_X * 2.0);
    let vx = (rng.gen::<f32>() - 0.5) * (SPAWN_JITTER_VX * 2.0);
    WaterDrop::at(x, py + TILE_SIZE * 0.5, vx)
}

/// Emitter system: while active, materialize one drop per elapsed interval.
pub fn emit_drops(
    time: Res<Time>,
    mut source: ResMut<WaterSource>,
    mut drops: ResMut<DropSet>,
    mut rng: ResMut<SimRng>,
) {
    if !source.active {
        return;
    }
    source.timer.tick(time.delta());
    for _ in 0..source.timer.times_finished_this_tick() {
        let drop = spawn_drop(source.cell, &mut rng.0);
        drops.drops.push(drop);
    }
}

pub struct WaterSourcePlugin;

impl Plugin for WaterSourcePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WaterSource>().add_systems(
            FixedUpdate,
            emit_drops
                .after(crate::game_actions::execute_queued_actions)
                .in_set(SimulationSet::PreSim),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_spawn_drop_jitter_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (cx, cy) = TileGrid::grid_to_world(5, 1);
        for _ in 0..100 {
            let drop = spawn_drop((5, 1), &mut rng);
            assert!((drop.x - cx).abs() <= SPAWN_JITTER_X);
            assert_eq!(drop.y, cy + TILE_SIZE * 0.5);
            assert!(drop.vx.abs() <= SPAWN_JITTER_VX);
            assert_eq!(drop.vy, 0.0);
        }
    }

    #[test]
    fn test_spawn_drop_lands_in_cell_below_source() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let drop = spawn_drop((5, 1), &mut rng);
            // Half a tile down puts the drop at the top edge of the cell
            // below the source.
            assert_eq!(drop.cell_y, 2);
        }
    }

    #[test]
    fn test_start_is_per_cell_and_stop_is_idempotent() {
        let mut source = WaterSource::default();
        source.start((4, 1));
        assert!(source.active);
        assert_eq!(source.cell, (4, 1));
        source.stop();
        source.stop();
        assert!(!source.active);
    }
}
