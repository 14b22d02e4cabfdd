//! Maze Chase - simulation core of a maze-chase arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (timestep, movement, ghost AI, collisions, game state)
//! - `config`: Data-driven level tuning and maze layout
//! - `error`: Configuration and layout errors

pub mod config;
pub mod error;
pub mod sim;

pub use config::{GameConfig, LevelConfig, SpeedTable};
pub use error::{SimError, SimResult};

use glam::{IVec2, Vec2};

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one arcade frame)
    pub const FIXED_DT: f32 = 1.0 / 60.0;
    /// Simulation steps per second
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Largest real frame delta accepted by the timestep loop (seconds)
    pub const MAX_DT: f32 = 0.1;

    /// Distance from a tile center (pixels) that still counts as "at center"
    pub const CENTER_EPS: f32 = 2.0;
    /// Swept collision radius, in tiles
    pub const COLLISION_RADIUS_TILES: f32 = 0.8;

    /// Ghost capture scores, indexed by combo count - 1
    pub const COMBO_SCORES: [u32; 4] = [200, 400, 800, 1600];

    /// Lead distance (tiles) for the ambusher's target
    pub const AMBUSH_LEAD_TILES: i32 = 4;
    /// Lead distance (tiles) for the fickle pursuer's pivot
    pub const PIVOT_LEAD_TILES: i32 = 2;
    /// The shy pursuer only chases while farther than this (tiles)
    pub const SHY_DISTANCE_TILES: f32 = 8.0;

    /// Mouth animation cycles per second while the player moves
    pub const MOUTH_CYCLES_PER_SECOND: f32 = 8.0;
}

/// Convert a duration in seconds to whole simulation ticks
#[inline]
pub fn seconds_to_ticks(seconds: f32) -> u32 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * consts::TICKS_PER_SECOND as f32).round() as u32
}

/// Pixel-space center of a tile
#[inline]
pub fn tile_center(tile: IVec2, tile_size: f32) -> Vec2 {
    (tile.as_vec2() + Vec2::splat(0.5)) * tile_size
}

/// Tile containing a pixel-space point (floor division)
#[inline]
pub fn tile_of(pos: Vec2, tile_size: f32) -> IVec2 {
    (pos / tile_size).floor().as_ivec2()
}
