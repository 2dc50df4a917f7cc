//! Collectible objects that react to pooled water reaching their cell.
//!
//! Each collectible sits at a grid cell and exposes a water-contact
//! predicate: contact happens once the normalized pool level at its cell
//! meets the kind's collection threshold. The engine checks every
//! uncollected collectible once per tick (PostSim) and emits a
//! `CollectibleCollectedEvent` for the host scene; collection is one-shot.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::pools::PoolMap;
use crate::simulation_sets::SimulationSet;

/// Collectible presets and their collection thresholds (normalized water
/// level in [0, 1] required for contact).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectibleKind {
    // Bathtime theme
    Ducky,
    Bubble,
    Boat,
    // Garden theme
    Flower,
    Leaf,
    Pot,
    // Desert theme
    Cactus,
    Gem,
    Bottle,
}

impl CollectibleKind {
    pub fn threshold(self) -> f32 {
        match self {
            CollectibleKind::Ducky => 0.8,
            CollectibleKind::Bubble => 0.5,
            CollectibleKind::Boat => 0.8,
            CollectibleKind::Flower => 0.6,
            CollectibleKind::Leaf => 0.4,
            CollectibleKind::Pot => 0.8,
            CollectibleKind::Cactus => 1.0,
            CollectibleKind::Gem => 0.9,
            CollectibleKind::Bottle => 0.7,
        }
    }
}

/// A collectible entity on the grid. The simulation only reads its cell
/// and predicate; everything visual belongs to the host.
#[derive(Component, Debug, Clone)]
pub struct Collectible {
    pub cell: (i32, i32),
    pub kind: CollectibleKind,
    pub threshold: f32,
    pub collected: bool,
}

impl Collectible {
    pub fn new(cell: (i32, i32), kind: CollectibleKind) -> Self {
        Self {
            cell,
            kind,
            threshold: kind.threshold(),
            collected: false,
        }
    }

    /// Water-contact predicate: true when an uncollected collectible sees
    /// a pool level at or above its threshold.
    pub fn water_contact(&self, level: f32) -> bool {
        !self.collected && level >= self.threshold
    }
}

/// One-directional notification to the host scene.
#[derive(Event, Debug, Clone)]
pub struct CollectibleCollectedEvent {
    pub entity: Entity,
    pub kind: CollectibleKind,
    pub cell: (i32, i32),
}

/// Collected/total counts for the active level.
#[derive(Resource, Default, Debug, Clone)]
pub struct LevelProgress {
    pub collected: u32,
    pub total: u32,
}

impl LevelProgress {
    pub fn complete(&self) -> bool {
        self.total > 0 && self.collected >= self.total
    }
}

/// PostSim check: query each uncollected collectible's pool level and emit
/// a collection event when its predicate reports contact.
pub fn check_collectibles(
    pools: Res<PoolMap>,
    mut collectibles: Query<(Entity, &mut Collectible)>,
    mut progress: ResMut<LevelProgress>,
    mut events: EventWriter<CollectibleCollectedEvent>,
) {
    for (entity, mut collectible) in &mut collectibles {
        let level = pools.level_at(collectible.cell.0, collectible.cell.1);
        if collectible.water_contact(level) {
            collectible.collected = true;
            progress.collected += 1;
            info!(
                "collected {:?} at ({}, {}): {}/{}",
                collectible.kind,
                collectible.cell.0,
                collectible.cell.1,
                progress.collected,
                progress.total
            );
            events.send(CollectibleCollectedEvent {
                entity,
                kind: collectible.kind,
                cell: collectible.cell,
            });
        }
    }
}

pub struct CollectiblesPlugin;

impl Plugin for CollectiblesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelProgress>()
            .add_event::<CollectibleCollectedEvent>()
            .add_systems(
                FixedUpdate,
                check_collectibles.in_set(SimulationSet::PostSim),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_requires_threshold() {
        let c = Collectible::new((3, 7), CollectibleKind::Bubble);
        assert!(!c.water_contact(0.49));
        assert!(c.water_contact(0.5));
        assert!(c.water_contact(1.0));
    }

    #[test]
    fn test_collected_never_reports_contact() {
        let mut c = Collectible::new((3, 7), CollectibleKind::Leaf);
        assert!(c.water_contact(0.9));
        c.collected = true;
        assert!(!c.water_contact(0.9));
    }

    #[test]
    fn test_kind_thresholds_cover_presets() {
        assert_eq!(CollectibleKind::Ducky.threshold(), 0.8);
        assert_eq!(CollectibleKind::Leaf.threshold(), 0.4);
        assert_eq!(CollectibleKind::Cactus.threshold(), 1.0);
        for kind in [
            CollectibleKind::Ducky,
            CollectibleKind::Bubble,
            CollectibleKind::Boat,
            CollectibleKind::Flower,
            CollectibleKind::Leaf,
            CollectibleKind::Pot,
            CollectibleKind::Cactus,
            CollectibleKind::Gem,
            CollectibleKind::Bottle,
        ] {
            let t = kind.threshold();
            assert!((0.0..=1.0).contains(&t));
        }
    }

    #[test]
    fn test_progress_complete() {
        let mut progress = LevelProgress::default();
        assert!(!progress.complete());
        progress.total = 2;
        progress.collected = 1;
        assert!(!progress.complete());
        progress.collected = 2;
        assert!(progress.complete());
    }
}
