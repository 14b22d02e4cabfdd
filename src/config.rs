//! Game configuration
//!
//! Level tuning, maze layout and spawn points. Loaded from JSON by the outer
//! game shell; `Default` is the classic arcade setup.

use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::sim::agent::PursuerKind;
use crate::sim::direction::Direction;
use crate::sim::schedule::Mode;

/// Classic 28x31 board (see `sim::maze` for the legend)
pub const CLASSIC_LAYOUT: [&str; 31] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##          ##.######",
    "######.## ###--### ##.######",
    "######.## #______# ##.######",
    "      .   #______#   .      ",
    "######.## #______# ##.######",
    "######.## ######## ##.######",
    "######.##          ##.######",
    "######.## ######## ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......  .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

/// Movement speeds for one level, in tiles per second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedTable {
    pub player: f32,
    pub pursuer: f32,
    pub frightened: f32,
    pub eaten: f32,
}

impl SpeedTable {
    /// Arcade base speed: 75.75 px/s on an 8 px tile
    const FULL: f32 = 9.47;

    fn scaled(player: f32, pursuer: f32, frightened: f32) -> Self {
        Self {
            player: Self::FULL * player,
            pursuer: Self::FULL * pursuer,
            frightened: Self::FULL * frightened,
            eaten: Self::FULL * 1.6,
        }
    }
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self::scaled(0.80, 0.75, 0.50)
    }
}

/// One schedule entry; `seconds == None` is the unbounded final phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseConfig {
    pub mode: Mode,
    pub seconds: Option<f32>,
}

impl PhaseConfig {
    fn scatter(seconds: f32) -> Self {
        Self {
            mode: Mode::Scatter,
            seconds: Some(seconds),
        }
    }

    fn chase(seconds: Option<f32>) -> Self {
        Self {
            mode: Mode::Chase,
            seconds,
        }
    }
}

/// Per-level tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub speeds: SpeedTable,
    pub mode_phases: Vec<PhaseConfig>,
    pub frightened_seconds: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            speeds: SpeedTable::default(),
            mode_phases: vec![
                PhaseConfig::scatter(7.0),
                PhaseConfig::chase(Some(20.0)),
                PhaseConfig::scatter(7.0),
                PhaseConfig::chase(Some(20.0)),
                PhaseConfig::scatter(5.0),
                PhaseConfig::chase(Some(20.0)),
                PhaseConfig::scatter(5.0),
                PhaseConfig::chase(None),
            ],
            frightened_seconds: 6.0,
        }
    }
}

impl LevelConfig {
    /// Levels 2-4: long third chase, near-instant final scatter
    fn middle(frightened_seconds: f32) -> Self {
        Self {
            speeds: SpeedTable::scaled(0.90, 0.85, 0.55),
            mode_phases: vec![
                PhaseConfig::scatter(7.0),
                PhaseConfig::chase(Some(20.0)),
                PhaseConfig::scatter(7.0),
                PhaseConfig::chase(Some(20.0)),
                PhaseConfig::scatter(5.0),
                PhaseConfig::chase(Some(1033.0)),
                PhaseConfig::scatter(1.0 / 60.0),
                PhaseConfig::chase(None),
            ],
            frightened_seconds,
        }
    }

    /// Level 5 onward
    fn late(frightened_seconds: f32) -> Self {
        Self {
            speeds: SpeedTable::scaled(1.00, 0.95, 0.60),
            mode_phases: vec![
                PhaseConfig::scatter(5.0),
                PhaseConfig::chase(Some(20.0)),
                PhaseConfig::scatter(5.0),
                PhaseConfig::chase(Some(20.0)),
                PhaseConfig::scatter(5.0),
                PhaseConfig::chase(Some(1037.0)),
                PhaseConfig::scatter(1.0 / 60.0),
                PhaseConfig::chase(None),
            ],
            frightened_seconds,
        }
    }
}

/// Player start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSetup {
    pub spawn: IVec2,
    pub direction: Direction,
}

/// Pursuer start and personality
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PursuerSetup {
    pub kind: PursuerKind,
    pub spawn: IVec2,
    pub direction: Direction,
    pub scatter_corner: IVec2,
    /// Time spent in the ghost house before leaving
    pub dwell_seconds: f32,
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Tile edge length in pixels
    pub tile_size: f32,
    /// Tunnel row; auto-detected from the layout when absent
    pub tunnel_row: Option<i32>,
    pub layout: Vec<String>,

    pub lives: u8,
    /// One bonus life awarded at this score
    pub extra_life_score: Option<u64>,
    pub pellet_score: u32,
    pub power_pellet_score: u32,

    // === Phase pauses ===
    pub ready_seconds: f32,
    pub death_seconds: f32,
    pub level_clear_seconds: f32,

    // === Spawns ===
    pub player: PlayerSetup,
    pub pursuers: Vec<PursuerSetup>,
    /// Tile just outside the ghost house door
    pub house_exit: IVec2,
    /// Tile an eaten pursuer returns to
    pub house_home: IVec2,
    /// How far to look for a walkable substitute for a blocked spawn
    pub spawn_search_radius: i32,
    /// Eaten pursuers still travelling after this long are put home directly
    pub eaten_return_seconds: f32,

    pub levels: Vec<LevelConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_size: 16.0,
            tunnel_row: Some(14),
            layout: CLASSIC_LAYOUT.iter().map(|l| l.to_string()).collect(),

            lives: 3,
            extra_life_score: Some(10_000),
            pellet_score: 10,
            power_pellet_score: 50,

            ready_seconds: 2.0,
            death_seconds: 1.5,
            level_clear_seconds: 2.0,

            player: PlayerSetup {
                spawn: IVec2::new(13, 23),
                direction: Direction::Left,
            },
            pursuers: vec![
                PursuerSetup {
                    kind: PursuerKind::Shadow,
                    spawn: IVec2::new(13, 11),
                    direction: Direction::Left,
                    scatter_corner: IVec2::new(25, -3),
                    dwell_seconds: 0.0,
                },
                PursuerSetup {
                    kind: PursuerKind::Ambush,
                    spawn: IVec2::new(13, 14),
                    direction: Direction::Up,
                    scatter_corner: IVec2::new(2, -3),
                    dwell_seconds: 1.0,
                },
                PursuerSetup {
                    kind: PursuerKind::Fickle,
                    spawn: IVec2::new(11, 14),
                    direction: Direction::Up,
                    scatter_corner: IVec2::new(27, 31),
                    dwell_seconds: 4.0,
                },
                PursuerSetup {
                    kind: PursuerKind::Shy,
                    spawn: IVec2::new(16, 14),
                    direction: Direction::Up,
                    scatter_corner: IVec2::new(0, 31),
                    dwell_seconds: 7.0,
                },
            ],
            house_exit: IVec2::new(13, 11),
            house_home: IVec2::new(13, 14),
            spawn_search_radius: 3,
            eaten_return_seconds: 10.0,

            levels: vec![
                LevelConfig::default(),
                LevelConfig::middle(5.0),
                LevelConfig::middle(4.0),
                LevelConfig::middle(3.0),
                LevelConfig::late(2.0),
            ],
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Tuning for a 0-based level index; past the table, the last entry repeats
    pub fn level(&self, index: u32) -> &LevelConfig {
        let last = self.levels.len().saturating_sub(1);
        &self.levels[(index as usize).min(last)]
    }

    /// Structural checks that do not need the parsed maze
    pub fn validate(&self) -> SimResult<()> {
        let invalid = |msg: String| Err(SimError::InvalidConfig(msg));

        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return invalid(format!("tile_size must be positive, got {}", self.tile_size));
        }
        if self.levels.is_empty() {
            return invalid("at least one level is required".into());
        }
        if self.lives == 0 {
            return invalid("lives must be at least 1".into());
        }
        if self.spawn_search_radius < 0 {
            return invalid("spawn_search_radius cannot be negative".into());
        }

        for (i, level) in self.levels.iter().enumerate() {
            let speeds = [
                level.speeds.player,
                level.speeds.pursuer,
                level.speeds.frightened,
                level.speeds.eaten,
            ];
            if speeds.iter().any(|s| !s.is_finite() || *s < 0.0) {
                return invalid(format!("level {i}: speeds must be finite and non-negative"));
            }
            if !level.frightened_seconds.is_finite() || level.frightened_seconds < 0.0 {
                return invalid(format!("level {i}: bad frightened_seconds"));
            }
            for phase in &level.mode_phases {
                if !matches!(phase.mode, Mode::Scatter | Mode::Chase) {
                    return invalid(format!(
                        "level {i}: schedule may only contain scatter and chase, found {:?}",
                        phase.mode
                    ));
                }
                if phase.seconds.is_some_and(|s| !s.is_finite() || s < 0.0) {
                    return invalid(format!("level {i}: bad phase duration"));
                }
            }
        }

        Ok(())
    }
}
