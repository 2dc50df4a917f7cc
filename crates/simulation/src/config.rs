/// Default grid dimensions used when no level data overrides them.
pub const GRID_WIDTH: usize = 12;
pub const GRID_HEIGHT: usize = 12;

/// Tile edge length in pixels. The pixel↔cell mapping in `grid.rs` and the
/// drop integrator both use this value, so they stay exact inverses.
pub const TILE_SIZE: f32 = 40.0;

/// Simulation tick rate (Hz). One `FixedUpdate` pass per tick.
pub const TICK_RATE: f64 = 60.0;

/// Rows at the top of the grid forced to Empty (spawn clearance / open sky).
pub const SKY_ROWS: i32 = 2;

/// Fraction of below-sky cells that generate as Rock instead of Dirt.
pub const ROCK_CHANCE: f64 = 0.1;

/// Downward acceleration applied to every in-flight drop, per tick.
pub const GRAVITY: f32 = 0.3;

/// Vertical margin (pixels) below the grid before an unresolved drop is
/// discarded.
pub const OFF_GRID_MARGIN: f32 = 50.0;

/// Horizontal damping applied when a drop is deflected sideways out of a
/// solid tile.
pub const SIDE_FLOW_DAMPING: f32 = 0.8;

/// Seconds between drops while the source emitter is active.
pub const DROP_INTERVAL: f32 = 0.15;

/// Half-range of the positional x jitter applied to emitted drops (pixels).
pub const SPAWN_JITTER_X: f32 = 5.0;

/// Half-range of the initial horizontal velocity of emitted drops.
pub const SPAWN_JITTER_VX: f32 = 0.25;

/// Absolute water capacity of a single tile. Tile `water_level` is the pool
/// quantity divided by this.
pub const MAX_WATER_PER_TILE: f32 = 10.0;

/// Upper bound on the quantity moved by one diffusion transfer.
pub const FLOW_RATE: f32 = 2.0;

/// Pressure differentials at or below this never transfer (kills
/// oscillation from rounding).
pub const MIN_PRESSURE_DIFF: f32 = 0.1;

/// Transfers at or below this amount are skipped (numerical floor).
pub const MIN_TRANSFER: f32 = 0.05;

/// A pool only spreads sideways once its quantity exceeds this; thin films
/// stay put.
pub const SPREAD_MIN_QUANTITY: f32 = 1.0;

/// Pool entries at or below this are pruned to zero during the sync pass.
pub const PRUNE_THRESHOLD: f32 = 0.1;

/// Default normalized level for `has_water_reached` queries.
pub const WATER_REACHED_THRESHOLD: f32 = 0.1;
