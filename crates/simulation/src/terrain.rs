use rand::Rng;

use crate::config::{ROCK_CHANCE, SKY_ROWS};
use crate::grid::{TileGrid, TileKind};

/// Populate every cell of the grid: the top `SKY_ROWS` rows stay Empty
/// (spawn clearance), the rest is Dirt with a `ROCK_CHANCE` fraction of
/// Rock. Deterministic for a fixed RNG sequence.
pub fn generate_tiles(grid: &mut TileGrid, rng: &mut impl Rng) {
    for y in 0..grid.height as i32 {
        for x in 0..grid.width as i32 {
            let kind = if y < SKY_ROWS {
                TileKind::Empty
            } else if rng.gen_bool(ROCK_CHANCE) {
                TileKind::Rock
            } else {
                TileKind::Dirt
            };
            if let Some(tile) = grid.get_mut(x, y) {
                tile.kind = kind;
                tile.water_level = 0.0;
            }
        }
    }
}
