use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::TILE_SIZE;

/// Solidity classification of a tile.
///
/// `Water` is a display/semantic marker only; for flow purposes it behaves
/// exactly like `Empty`. Solids are `Dirt` and `Rock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Empty,
    Dirt,
    Rock,
    Water,
}

impl TileKind {
    /// Dirt and Rock block water; Empty and Water admit it.
    pub fn is_solid(self) -> bool {
        matches!(self, TileKind::Dirt | TileKind::Rock)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    /// Normalized fill fraction in [0, 1], derived from the pool map by the
    /// sync pass. Read-only for everything except `set_water_level`.
    pub water_level: f32,
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            kind: TileKind::Empty,
            water_level: 0.0,
        }
    }
}

/// Fixed-size tile grid addressed by `(x, y)` with y increasing downward
/// (the gravity direction). All lookups are bounds-checked: any coordinate
/// outside `[0, width) x [0, height)` reads as "no tile".
#[derive(Resource, Serialize, Deserialize)]
pub struct TileGrid {
    pub tiles: Vec<Tile>,
    pub width: usize,
    pub height: usize,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::new(crate::config::GRID_WIDTH, crate::config::GRID_HEIGHT)
    }
}

impl TileGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            tiles: vec![Tile::default(); width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width + x as usize
    }

    /// Bounds-checked lookup; `None` for any off-grid coordinate.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        if self.in_bounds(x, y) {
            Some(&self.tiles[self.index(x, y)])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.tiles[idx])
        } else {
            None
        }
    }

    /// True iff the tile exists and water may occupy it (Empty or Water).
    /// Off-grid counts as "cannot flow here".
    #[inline]
    pub fn can_flow_into(&self, x: i32, y: i32) -> bool {
        matches!(
            self.get(x, y),
            Some(tile) if !tile.kind.is_solid()
        )
    }

    /// Convert a Dirt or Rock tile to Empty. Returns false (and leaves the
    /// grid unchanged) for Empty/Water tiles and off-grid coordinates.
    pub fn excavate(&mut self, x: i32, y: i32) -> bool {
        match self.get_mut(x, y) {
            Some(tile) if tile.kind.is_solid() => {
                tile.kind = TileKind::Empty;
                true
            }
            _ => false,
        }
    }

    /// Store a normalized water level, clamped to [0, 1]. No-op off-grid.
    pub fn set_water_level(&mut self, x: i32, y: i32, level: f32) {
        if let Some(tile) = self.get_mut(x, y) {
            tile.water_level = level.clamp(0.0, 1.0);
        }
    }

    /// Pixel position of a cell's center.
    pub fn grid_to_world(x: i32, y: i32) -> (f32, f32) {
        let px = x as f32 * TILE_SIZE + TILE_SIZE * 0.5;
        let py = y as f32 * TILE_SIZE + TILE_SIZE * 0.5;
        (px, py)
    }

    /// Cell containing a pixel position. Exact inverse of `grid_to_world`
    /// on cell centers; drops rely on this when re-deriving their cell.
    pub fn world_to_grid(px: f32, py: f32) -> (i32, i32) {
        let gx = (px / TILE_SIZE).floor() as i32;
        let gy = (py / TILE_SIZE).floor() as i32;
        (gx, gy)
    }
}
