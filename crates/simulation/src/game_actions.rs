//! External command boundary: a queue of game actions drained at the start
//! of every fixed-update tick.
//!
//! Hosts (input handling, UI, scripted drivers) push [`GameAction`]s at any
//! time; the executor applies them in order during PreSim and records an
//! [`ActionResult`] per action in the [`ActionResultLog`]. Rejections are
//! data, not errors: excavating a tile that is already open simply logs
//! a failure the caller may inspect.
//!
//! Because the executor is the only entry point for resets and new games,
//! those operations are atomic with respect to the tick boundary.

use bevy::prelude::*;

use crate::grid::TileGrid;
use crate::level::{load_level, ActiveLevel};
use crate::sim_rng::SimRng;
use crate::simulation_sets::SimulationSet;
use crate::water_source::WaterSource;

/// Commands a host can issue against the simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum GameAction {
    /// Reseed the RNG and regenerate the active level.
    NewGame { seed: u64 },
    /// Convert a Dirt/Rock tile to Empty (player dig gesture).
    Excavate { x: i32, y: i32 },
    /// Begin emitting drops from the active level's source cell.
    StartFlow,
    /// Stop emitting. Idempotent.
    StopFlow,
    /// Clear drops and pools and regenerate the active level.
    ResetLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    Success,
    Error(ActionError),
}

impl ActionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    OutOfBounds,
    /// The target tile is not Dirt or Rock.
    NotExcavatable,
    /// No level has been loaded yet.
    NoActiveLevel,
}

/// Pending actions, applied in push order on the next tick.
#[derive(Resource, Debug, Default)]
pub struct ActionQueue {
    pending: Vec<GameAction>,
}

impl ActionQueue {
    pub fn push(&mut self, action: GameAction) {
        self.pending.push(action);
    }

    pub fn drain(&mut self) -> Vec<GameAction> {
        self.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Rolling log of executed actions and their outcomes.
#[derive(Resource, Debug)]
pub struct ActionResultLog {
    pub entries: Vec<(GameAction, ActionResult)>,
    pub max_entries: usize,
}

impl Default for ActionResultLog {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            max_entries: 200,
        }
    }
}

impl ActionResultLog {
    pub fn push(&mut self, action: GameAction, result: ActionResult) {
        self.entries.push((action, result));
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(0..excess);
        }
    }

    pub fn last_result(&self) -> Option<&ActionResult> {
        self.entries.last().map(|(_, result)| result)
    }
}

/// Drains all pending actions and executes them in order. Exclusive system:
/// new-game/reset replace whole resources and respawn entities.
pub fn execute_queued_actions(world: &mut World) {
    let actions = world.resource_mut::<ActionQueue>().drain();
    for action in actions {
        let result = execute_single(world, &action);
        world
            .resource_mut::<ActionResultLog>()
            .push(action, result);
    }
}

fn execute_single(world: &mut World, action: &GameAction) -> ActionResult {
    match action {
        GameAction::NewGame { seed } => {
            world.resource_mut::<SimRng>().reseed(*seed);
            match active_level(world) {
                Some(level) => {
                    load_level(world, level);
                    ActionResult::Success
                }
                None => ActionResult::Error(ActionError::NoActiveLevel),
            }
        }
        GameAction::Excavate { x, y } => execute_excavate(world, *x, *y),
        GameAction::StartFlow => match world.get_resource::<ActiveLevel>() {
            Some(active) => {
                let cell = active.0.source;
                world.resource_mut::<WaterSource>().start(cell);
                info!("water flow started at {:?}", cell);
                ActionResult::Success
            }
            None => {
                warn!("start-flow rejected: no level loaded");
                ActionResult::Error(ActionError::NoActiveLevel)
            }
        },
        GameAction::StopFlow => {
            world.resource_mut::<WaterSource>().stop();
            info!("water flow stopped");
            ActionResult::Success
        }
        GameAction::ResetLevel => match active_level(world) {
            Some(level) => {
                load_level(world, level);
                ActionResult::Success
            }
            None => ActionResult::Error(ActionError::NoActiveLevel),
        },
    }
}

fn active_level(world: &World) -> Option<crate::level::LevelData> {
    world.get_resource::<ActiveLevel>().map(|a| a.0.clone())
}

fn execute_excavate(world: &mut World, x: i32, y: i32) -> ActionResult {
    let mut grid = world.resource_mut::<TileGrid>();
    if !grid.in_bounds(x, y) {
        warn!("excavate rejected: ({}, {}) is off the grid", x, y);
        return ActionResult::Error(ActionError::OutOfBounds);
    }
    if grid.excavate(x, y) {
        ActionResult::Success
    } else {
        ActionResult::Error(ActionError::NotExcavatable)
    }
}

pub struct GameActionsPlugin;

impl Plugin for GameActionsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActionQueue>()
            .init_resource::<ActionResultLog>()
            .add_systems(
                FixedUpdate,
                execute_queued_actions.in_set(SimulationSet::PreSim),
            );
    }
}
