//! Error types for configuration and maze loading
//!
//! Errors only surface while building a simulation. Once a `GameState` exists,
//! ticks never fail: anomalies are logged and corrected in place.

use glam::IVec2;
use thiserror::Error;

/// Errors raised while loading configuration or constructing a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// Maze layout has no rows or no columns
    #[error("maze layout is empty")]
    EmptyLayout,
    /// Maze layout rows have different widths
    #[error("maze row {row} has width {width}, expected {expected}")]
    RaggedLayout {
        row: usize,
        width: usize,
        expected: usize,
    },
    /// Unrecognized glyph in the maze layout
    #[error("unknown maze glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },
    /// Configured tunnel row is outside the maze or not open at both edges
    #[error("row {0} cannot be used as a tunnel row")]
    InvalidTunnelRow(i32),
    /// A spawn tile is blocked and no walkable tile exists nearby
    #[error("{agent} spawn {tile} is not walkable and nothing walkable lies within {radius} tiles")]
    UnreachableSpawn {
        agent: String,
        tile: IVec2,
        radius: i32,
    },
    /// Structurally invalid configuration values
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// Config JSON could not be parsed
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for simulation setup.
pub type SimResult<T> = Result<T, SimError>;
