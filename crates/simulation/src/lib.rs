use bevy::prelude::*;

pub mod collectibles;
pub mod config;
pub mod drops;
pub mod game_actions;
pub mod grid;
pub mod level;
pub mod pools;
pub mod sim_rng;
pub mod simulation_sets;
pub mod stats;
pub mod terrain;
pub mod water_source;

#[cfg(test)]
pub mod test_harness;

pub use simulation_sets::SimulationSet;

// ---------------------------------------------------------------------------
// Core resources
// ---------------------------------------------------------------------------

/// Global tick counter incremented each FixedUpdate pass.
#[derive(Resource, Default)]
pub struct TickCounter(pub u64);

pub fn advance_tick(mut tick: ResMut<TickCounter>) {
    tick.0 = tick.0.wrapping_add(1);
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// The whole water-flow engine: grid, falling drops, pool diffusion, source
/// emitter, collectibles, action queue, and stats, wired into `FixedUpdate`
/// in three chained phases (PreSim → Simulation → PostSim).
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(config::TICK_RATE))
            .init_resource::<TickCounter>()
            .init_resource::<grid::TileGrid>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::PreSim,
                    SimulationSet::Simulation,
                    SimulationSet::PostSim,
                )
                    .chain(),
            )
            .add_systems(Startup, level::init_world)
            .add_systems(FixedUpdate, advance_tick.in_set(SimulationSet::PreSim));

        app.add_plugins((
            sim_rng::SimRngPlugin,
            game_actions::GameActionsPlugin,
            water_source::WaterSourcePlugin,
            drops::DropsPlugin,
            pools::PoolsPlugin,
            collectibles::CollectiblesPlugin,
            stats::StatsPlugin,
        ));
    }
}
