//! Aggregate water statistics for hosts and tooling.
//!
//! Recomputed every tick in PostSim from the pool map and drop set, so
//! external readers get a consistent snapshot without walking the grids
//! themselves.

use bevy::prelude::*;

use crate::config::MAX_WATER_PER_TILE;
use crate::drops::DropSet;
use crate::pools::PoolMap;
use crate::simulation_sets::SimulationSet;

#[derive(Resource, Default, Debug, Clone)]
pub struct WaterStats {
    /// Sum of all pool quantities (absolute units).
    pub total_water: f32,
    /// Cells holding more than the prune threshold.
    pub wet_cells: u32,
    /// Drops currently in flight.
    pub active_drops: u32,
    /// Highest normalized level across the grid.
    pub max_level: f32,
}

pub fn update_water_stats(
    pools: Res<PoolMap>,
    drops: Res<DropSet>,
    mut stats: ResMut<WaterStats>,
) {
    stats.total_water = pools.total();
    stats.wet_cells = pools.wet_cells() as u32;
    stats.active_drops = drops.len() as u32;
    stats.max_level = pools.max_quantity() / MAX_WATER_PER_TILE;
}

pub struct StatsPlugin;

impl Plugin for StatsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WaterStats>().add_systems(
            FixedUpdate,
            update_water_stats.in_set(SimulationSet::PostSim),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_reflect_pool_state() {
        let mut pools = PoolMap::new(4, 4);
        pools.set_quantity(1, 1, 4.0);
        pools.set_quantity(2, 2, 6.0);
        let mut drops = DropSet::default();
        drops
            .drops
            .push(crate::drops::WaterDrop::at(10.0, 10.0, 0.0));

        let mut stats = WaterStats::default();
        stats.total_water = pools.total();
        stats.wet_cells = pools.wet_cells() as u32;
        stats.active_drops = drops.len() as u32;
        stats.max_level = pools.max_quantity() / MAX_WATER_PER_TILE;

        assert_eq!(stats.total_water, 10.0);
        assert_eq!(stats.wet_cells, 2);
        assert_eq!(stats.active_drops, 1);
        assert!((stats.max_level - 0.6).abs() < 1e-6);
    }
}
