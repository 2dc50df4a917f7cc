//! # TestBasin: headless integration test harness
//!
//! Wraps `bevy::app::App` + `SimulationPlugin` for driving the water engine
//! without a window or renderer. Virtual time advances by exactly one fixed
//! timestep per tick, so scenarios are fully deterministic.

use std::time::Duration;

use bevy::app::App;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::collectibles::Collectible;
use crate::config::TICK_RATE;
use crate::drops::{DropSet, WaterDrop};
use crate::game_actions::{ActionQueue, ActionResultLog, GameAction};
use crate::grid::{TileGrid, TileKind};
use crate::level::{load_level, LevelData, SkipWorldInit};
use crate::pools::PoolMap;
use crate::stats::WaterStats;
use crate::water_source::WaterSource;
use crate::SimulationPlugin;

/// A headless app wrapping `SimulationPlugin` for integration testing.
pub struct TestBasin {
    app: App,
}

impl TestBasin {
    /// Blank world: default-size all-Empty grid, no level, no collectibles.
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);

        // Pin the clock: every `app.update()` advances time by exactly one
        // fixed timestep, so tick counts are reproducible bit-for-bit (no
        // wall-clock leakage into the fixed accumulator).
        app.insert_resource(TimeUpdateStrategy::ManualDuration(
            Duration::from_secs_f64(1.0 / TICK_RATE),
        ));

        // Insert the marker BEFORE SimulationPlugin so init_world skips.
        app.insert_resource(SkipWorldInit);
        app.add_plugins(SimulationPlugin);

        // Run one update so Startup systems execute (init_world no-ops).
        app.update();

        Self { app }
    }

    /// World with a specific level loaded (tiles generated, collectibles
    /// spawned, emitter configured but stopped).
    pub fn from_level(level: LevelData) -> Self {
        let mut basin = Self::new();
        load_level(basin.app.world_mut(), level);
        basin
    }

    // -----------------------------------------------------------------------
    // World setup
    // -----------------------------------------------------------------------

    /// Replace the tile grid (and size the pool map to match).
    pub fn with_grid(mut self, grid: TileGrid) -> Self {
        let (w, h) = (grid.width, grid.height);
        self.app.world_mut().insert_resource(grid);
        self.app.world_mut().insert_resource(PoolMap::new(w, h));
        self
    }

    /// Set one tile's kind directly.
    pub fn set_tile(&mut self, x: i32, y: i32, kind: TileKind) {
        let mut grid = self.app.world_mut().resource_mut::<TileGrid>();
        if let Some(tile) = grid.get_mut(x, y) {
            tile.kind = kind;
        }
    }

    /// Set a pool quantity directly (marks the cell dirty, as a settlement
    /// would).
    pub fn set_pool(&mut self, x: i32, y: i32, quantity: f32) {
        self.app
            .world_mut()
            .resource_mut::<PoolMap>()
            .set_quantity(x, y, quantity);
    }

    /// Add an in-flight drop at a pixel position.
    pub fn spawn_drop(&mut self, x: f32, y: f32, vx: f32) {
        self.app
            .world_mut()
            .resource_mut::<DropSet>()
            .drops
            .push(WaterDrop::at(x, y, vx));
    }

    /// Queue a game action for the next tick.
    pub fn queue(&mut self, action: GameAction) {
        self.app
            .world_mut()
            .resource_mut::<ActionQueue>()
            .push(action);
    }

    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Run N fixed-update ticks. With the manual time strategy every
    /// `app.update()` is exactly one simulation tick.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.update();
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn grid(&self) -> &TileGrid {
        self.app.world().resource::<TileGrid>()
    }

    pub fn pools(&self) -> &PoolMap {
        self.app.world().resource::<PoolMap>()
    }

    pub fn drops(&self) -> &DropSet {
        self.app.world().resource::<DropSet>()
    }

    pub fn source(&self) -> &WaterSource {
        self.app.world().resource::<WaterSource>()
    }

    pub fn stats(&self) -> &WaterStats {
        self.app.world().resource::<WaterStats>()
    }

    pub fn action_log(&self) -> &ActionResultLog {
        self.app.world().resource::<ActionResultLog>()
    }

    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    /// Normalized water level at a cell (pool quantity over capacity).
    pub fn water_level_at(&self, x: i32, y: i32) -> f32 {
        self.pools().level_at(x, y)
    }

    /// Snapshot of the collectible at a cell, if any.
    pub fn collectible_at(&mut self, cell: (i32, i32)) -> Option<Collectible> {
        let world = self.app.world_mut();
        world
            .query::<&Collectible>()
            .iter(world)
            .find(|c| c.cell == cell)
            .cloned()
    }
}

impl Default for TestBasin {
    fn default() -> Self {
        Self::new()
    }
}
