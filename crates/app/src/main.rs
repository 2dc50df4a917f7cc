//! Headless demo driver for the water-flow simulation.
//!
//! Loads the built-in "Bathtime Fun" level, digs a shaft from the source
//! down to a gallery holding the Ducky, starts the water flow, and logs
//! progress once per simulated second until the Ducky is collected (or a
//! time limit passes).

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use simulation::collectibles::LevelProgress;
use simulation::config::TICK_RATE;
use simulation::game_actions::{ActionQueue, GameAction};
use simulation::stats::WaterStats;
use simulation::{SimulationPlugin, SimulationSet, TickCounter};

/// Stop the demo after 30 simulated seconds even if nothing was collected.
const MAX_TICKS: u64 = 1800;

fn main() {
    App::new()
        .add_plugins(
            MinimalPlugins
                .set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                    1.0 / TICK_RATE,
                ))),
        )
        .add_plugins(LogPlugin::default())
        .add_plugins(SimulationPlugin)
        .add_systems(Startup, queue_demo_actions)
        .add_systems(
            FixedUpdate,
            report_progress
                .after(simulation::stats::update_water_stats)
                .in_set(SimulationSet::PostSim),
        )
        .run();
}

/// Dig a shaft under the source, a gallery across to the Ducky at (3, 7),
/// and open the tap.
fn queue_demo_actions(mut queue: ResMut<ActionQueue>) {
    for y in 2..=7 {
        queue.push(GameAction::Excavate { x: 5, y });
    }
    queue.push(GameAction::Excavate { x: 4, y: 7 });
    queue.push(GameAction::Excavate { x: 3, y: 7 });
    queue.push(GameAction::StartFlow);
}

fn report_progress(
    tick: Res<TickCounter>,
    stats: Res<WaterStats>,
    progress: Res<LevelProgress>,
    mut exit: EventWriter<AppExit>,
) {
    if tick.0 > 0 && tick.0 % TICK_RATE as u64 == 0 {
        info!(
            "t={:>4}s water={:>6.2} wet_cells={} drops={} collected={}/{}",
            tick.0 / TICK_RATE as u64,
            stats.total_water,
            stats.wet_cells,
            stats.active_drops,
            progress.collected,
            progress.total
        );
    }

    if progress.collected > 0 || tick.0 >= MAX_TICKS {
        info!(
            "demo finished after {} ticks: {}/{} collected, {:.2} units pooled",
            tick.0, progress.collected, progress.total, stats.total_water
        );
        exit.send(AppExit::Success);
    }
}
