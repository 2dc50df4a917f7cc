//! Level configuration data and world initialization.
//!
//! A level is plain data supplied by an external loader: grid dimensions,
//! the water-source cell, and collectible placements. Loading a level
//! replaces the grid, pool map, drop set, emitter, and collectible entities
//! atomically, always between ticks (either at startup or from the action
//! executor in PreSim).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collectibles::{Collectible, CollectibleKind, LevelProgress};
use crate::drops::DropSet;
use crate::grid::TileGrid;
use crate::pools::PoolMap;
use crate::sim_rng::SimRng;
use crate::terrain::generate_tiles;
use crate::water_source::WaterSource;

/// One collectible placement in a level definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectibleSpawn {
    pub cell: (i32, i32),
    pub kind: CollectibleKind,
}

/// Plain level geometry/configuration. No on-disk format is defined here;
/// hosts hand this in deserialized from wherever they keep levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelData {
    pub name: String,
    pub grid_width: usize,
    pub grid_height: usize,
    /// Cell the source emitter pours from.
    pub source: (i32, i32),
    pub collectibles: Vec<CollectibleSpawn>,
}

impl LevelData {
    /// Built-in level 1: "Bathtime Fun".
    pub fn bathtime() -> Self {
        Self {
            name: "Bathtime Fun".to_string(),
            grid_width: 12,
            grid_height: 12,
            source: (5, 1),
            collectibles: vec![
                CollectibleSpawn {
                    cell: (3, 7),
                    kind: CollectibleKind::Ducky,
                },
                CollectibleSpawn {
                    cell: (8, 8),
                    kind: CollectibleKind::Bubble,
                },
            ],
        }
    }

    /// Built-in level 2: "Secret Garden".
    pub fn garden() -> Self {
        Self {
            name: "Secret Garden".to_string(),
            grid_width: 12,
            grid_height: 12,
            source: (2, 1),
            collectibles: vec![
                CollectibleSpawn {
                    cell: (5, 5),
                    kind: CollectibleKind::Flower,
                },
                CollectibleSpawn {
                    cell: (8, 3),
                    kind: CollectibleKind::Leaf,
                },
                CollectibleSpawn {
                    cell: (4, 8),
                    kind: CollectibleKind::Pot,
                },
            ],
        }
    }
}

/// The currently loaded level definition.
#[derive(Resource, Debug, Clone)]
pub struct ActiveLevel(pub LevelData);

/// Marker resource that, when present, causes `init_world` to skip loading
/// the default level. Used by the test harness to start from a blank slate.
#[derive(Resource)]
pub struct SkipWorldInit;

/// Replace all per-level state with a freshly generated instance of
/// `level`. Clears drops and pools, regenerates tiles from `SimRng`,
/// respawns collectible entities, and leaves the emitter stopped.
pub fn load_level(world: &mut World, level: LevelData) {
    let mut grid = TileGrid::new(level.grid_width, level.grid_height);
    world.resource_scope(|_world, mut rng: Mut<SimRng>| {
        generate_tiles(&mut grid, &mut rng.0);
    });
    world.insert_resource(grid);
    world.insert_resource(PoolMap::new(level.grid_width, level.grid_height));
    world.insert_resource(DropSet::default());

    let mut source = WaterSource::default();
    source.cell = level.source;
    world.insert_resource(source);

    let stale: Vec<Entity> = world
        .query_filtered::<Entity, With<Collectible>>()
        .iter(world)
        .collect();
    for entity in stale {
        world.despawn(entity);
    }
    for spawn in &level.collectibles {
        world.spawn(Collectible::new(spawn.cell, spawn.kind));
    }
    world.insert_resource(LevelProgress {
        collected: 0,
        total: level.collectibles.len() as u32,
    });

    info!(
        "loaded level '{}' ({}x{}, source {:?}, {} collectibles)",
        level.name,
        level.grid_width,
        level.grid_height,
        level.source,
        level.collectibles.len()
    );
    world.insert_resource(ActiveLevel(level));
}

/// Startup system: load the first built-in level unless the harness asked
/// for a blank world.
pub fn init_world(world: &mut World) {
    if world.contains_resource::<SkipWorldInit>() {
        return;
    }
    load_level(world, LevelData::bathtime());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileKind;

    fn blank_world() -> World {
        let mut world = World::new();
        world.insert_resource(SimRng::from_seed_u64(11));
        world
    }

    #[test]
    fn test_load_level_builds_matching_grid() {
        let mut world = blank_world();
        load_level(&mut world, LevelData::bathtime());
        let grid = world.resource::<TileGrid>();
        assert_eq!(grid.width, 12);
        assert_eq!(grid.height, 12);
        // Sky rows stay clear so the source has room to pour.
        assert_eq!(grid.get(5, 1).unwrap().kind, TileKind::Empty);
    }

    #[test]
    fn test_load_level_spawns_collectibles() {
        let mut world = blank_world();
        load_level(&mut world, LevelData::garden());
        let count = world
            .query_filtered::<Entity, With<Collectible>>()
            .iter(&world)
            .count();
        assert_eq!(count, 3);
        let progress = world.resource::<LevelProgress>();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.collected, 0);
    }

    #[test]
    fn test_reload_replaces_collectibles() {
        let mut world = blank_world();
        load_level(&mut world, LevelData::garden());
        load_level(&mut world, LevelData::bathtime());
        let count = world
            .query_filtered::<Entity, With<Collectible>>()
            .iter(&world)
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_load_level_leaves_emitter_stopped() {
        let mut world = blank_world();
        load_level(&mut world, LevelData::bathtime());
        let source = world.resource::<WaterSource>();
        assert!(!source.active);
        assert_eq!(source.cell, (5, 1));
    }

    #[test]
    fn test_level_data_round_trips_through_serde() {
        let level = LevelData::garden();
        let json = serde_json::to_string(&level).expect("serialize");
        let back: LevelData = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.name, level.name);
        assert_eq!(back.source, level.source);
        assert_eq!(back.collectibles.len(), level.collectibles.len());
    }
}
