//! Player and pursuer entities
//!
//! Both wrap a [`MovementState`]; everything else here is per-role
//! bookkeeping (facing and mouth animation for the player, mode, timers and
//! ghost-house state for pursuers).

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::maze::{MazeGrid, TileKind, Traversal};
use super::movement::{MovementState, StepOutcome};
use super::schedule::Mode;
use crate::config::{LevelConfig, PlayerSetup, PursuerSetup, SpeedTable};
use crate::consts::MOUTH_CYCLES_PER_SECOND;
use crate::seconds_to_ticks;

/// The player-controlled agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub movement: MovementState,
    spawn: IVec2,
    spawn_dir: Direction,
    /// Last non-NONE heading; survives stops so lead targets stay stable
    facing: Direction,
    /// Mouth animation phase in [0, 1)
    mouth_phase: f32,
    pub dying: bool,
}

impl Player {
    pub fn new(setup: &PlayerSetup, tile_size: f32, speeds: &SpeedTable) -> Self {
        Self {
            movement: MovementState::at_tile(
                setup.spawn,
                tile_size,
                setup.direction,
                speeds.player * tile_size,
            ),
            spawn: setup.spawn,
            spawn_dir: setup.direction,
            facing: setup.direction,
            mouth_phase: 0.0,
            dying: false,
        }
    }

    /// Back to the spawn tile with the level's speed
    pub fn reset(&mut self, tile_size: f32, speeds: &SpeedTable) {
        self.movement.place(self.spawn, tile_size, self.spawn_dir);
        self.movement.set_base_speed(speeds.player * tile_size);
        self.facing = self.spawn_dir;
        self.mouth_phase = 0.0;
        self.dying = false;
    }

    pub fn set_desired_direction(&mut self, dir: Direction) {
        if !dir.is_none() {
            self.movement.queue_direction(dir);
        }
    }

    pub fn advance(&mut self, maze: &MazeGrid, dt: f32) -> StepOutcome {
        let outcome = self.movement.advance(maze, Traversal::Player, dt);
        let dir = self.movement.direction();
        if !dir.is_none() {
            self.facing = dir;
        }
        if self.movement.is_moving() {
            self.mouth_phase = (self.mouth_phase + dt * MOUTH_CYCLES_PER_SECOND).fract();
        }
        outcome
    }

    #[inline]
    pub fn tile(&self) -> IVec2 {
        self.movement.grid()
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.movement.pos()
    }

    #[inline]
    pub fn facing(&self) -> Direction {
        self.facing
    }

    #[inline]
    pub fn mouth_phase(&self) -> f32 {
        self.mouth_phase
    }

    #[inline]
    pub fn spawn(&self) -> IVec2 {
        self.spawn
    }
}

/// Pursuer personality. Each kind picks its chase target differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PursuerKind {
    /// Type A: heads straight for the player
    Shadow,
    /// Type B: aims ahead of the player
    Ambush,
    /// Type C: mirrors the shadow around a point ahead of the player
    Fickle,
    /// Type D: chases from afar, retreats when close
    Shy,
}

impl PursuerKind {
    pub fn name(self) -> &'static str {
        match self {
            PursuerKind::Shadow => "shadow",
            PursuerKind::Ambush => "ambush",
            PursuerKind::Fickle => "fickle",
            PursuerKind::Shy => "shy",
        }
    }
}

/// Where a pursuer stands relative to the ghost house
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HouseState {
    /// Parked inside until the dwell timer runs out
    Waiting { ticks_left: u32 },
    /// Walking out through the door
    Leaving,
    Outside,
}

/// Shared ghost-house locations and limits handed to the timer update
#[derive(Debug, Clone, Copy)]
pub struct HouseTiles {
    pub home: IVec2,
    pub exit: IVec2,
    /// Ticks an eaten pursuer may spend returning before being put home
    pub eaten_bound: u32,
}

/// One AI-controlled chaser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pursuer {
    pub id: usize,
    pub kind: PursuerKind,
    pub movement: MovementState,
    mode: Mode,
    target: IVec2,
    frightened_ticks: u32,
    eaten_ticks: u32,
    house: HouseState,
    spawn: IVec2,
    spawn_dir: Direction,
    dwell_ticks: u32,
    scatter_corner: IVec2,
    /// Tile the last direction decision was made on
    last_decision: Option<IVec2>,
}

impl Pursuer {
    pub fn new(
        id: usize,
        setup: &PursuerSetup,
        spawn: IVec2,
        maze: &MazeGrid,
        level: &LevelConfig,
        mode: Mode,
    ) -> Self {
        let mut pursuer = Self {
            id,
            kind: setup.kind,
            movement: MovementState::at_tile(spawn, maze.tile_size(), setup.direction, 0.0),
            mode,
            target: setup.scatter_corner,
            frightened_ticks: 0,
            eaten_ticks: 0,
            house: HouseState::Outside,
            spawn,
            spawn_dir: setup.direction,
            dwell_ticks: seconds_to_ticks(setup.dwell_seconds),
            scatter_corner: setup.scatter_corner,
            last_decision: None,
        };
        pursuer.reset(maze, level, mode);
        pursuer
    }

    /// Restore spawn position, direction and mode; clear every timer
    pub fn reset(&mut self, maze: &MazeGrid, level: &LevelConfig, mode: Mode) {
        self.movement.place(self.spawn, maze.tile_size(), self.spawn_dir);
        self.mode = mode;
        self.target = self.scatter_corner;
        self.frightened_ticks = 0;
        self.eaten_ticks = 0;
        self.last_decision = None;
        self.house = if maze.tile(self.spawn) == TileKind::GhostHouse {
            HouseState::Waiting {
                ticks_left: self.dwell_ticks,
            }
        } else {
            HouseState::Outside
        };
        self.apply_speed(&level.speeds, maze.tile_size());
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn target(&self) -> IVec2 {
        self.target
    }

    #[inline]
    pub fn house(&self) -> HouseState {
        self.house
    }

    #[inline]
    pub fn tile(&self) -> IVec2 {
        self.movement.grid()
    }

    #[inline]
    pub fn scatter_corner(&self) -> IVec2 {
        self.scatter_corner
    }

    #[inline]
    pub fn frightened_ticks(&self) -> u32 {
        self.frightened_ticks
    }

    #[inline]
    pub fn is_frightened(&self) -> bool {
        self.mode == Mode::Frightened
    }

    #[inline]
    pub fn is_eaten(&self) -> bool {
        self.mode == Mode::Eaten
    }

    #[inline]
    pub fn is_waiting(&self) -> bool {
        matches!(self.house, HouseState::Waiting { .. })
    }

    /// Door tiles are only for pursuers heading in or out of the house
    pub fn may_use_door(&self) -> bool {
        self.mode == Mode::Eaten || self.house == HouseState::Leaving
    }

    pub(crate) fn set_target(&mut self, target: IVec2) {
        self.target = target;
    }

    pub(crate) fn last_decision(&self) -> Option<IVec2> {
        self.last_decision
    }

    pub(crate) fn set_last_decision(&mut self, tile: Option<IVec2>) {
        self.last_decision = tile;
    }

    fn reverse(&mut self) {
        if self.house == HouseState::Outside {
            self.movement.reverse();
            self.last_decision = None;
        }
    }

    /// Speed for the current mode, in pixels per second
    pub fn apply_speed(&mut self, speeds: &SpeedTable, tile_size: f32) {
        let tiles_per_second = match self.mode {
            Mode::Eaten => speeds.eaten,
            Mode::Frightened => speeds.frightened,
            Mode::Scatter | Mode::Chase => speeds.pursuer,
        };
        self.movement.set_base_speed(tiles_per_second * tile_size);
    }

    /// React to a global scatter/chase switch.
    ///
    /// Frightened and eaten pursuers keep their mode; they pick up the
    /// schedule's mode when they recover.
    pub fn on_schedule_change(&mut self, mode: Mode) -> bool {
        if matches!(self.mode, Mode::Frightened | Mode::Eaten) {
            return false;
        }
        self.mode = mode;
        self.reverse();
        true
    }

    /// Capsule effect. Eaten pursuers are unaffected; zero ticks only reverses.
    pub fn frighten(&mut self, ticks: u32) -> bool {
        if self.mode == Mode::Eaten {
            return false;
        }
        self.reverse();
        if ticks == 0 {
            return false;
        }
        self.mode = Mode::Frightened;
        self.frightened_ticks = ticks;
        true
    }

    /// Caught while frightened: head home
    pub fn mark_eaten(&mut self) {
        self.mode = Mode::Eaten;
        self.frightened_ticks = 0;
        self.eaten_ticks = 0;
        self.last_decision = None;
    }

    /// Per-tick timer bookkeeping: dwell, frightened expiry, eaten return.
    pub fn update_timers(&mut self, global: Mode, house: &HouseTiles, tile_size: f32) {
        match self.house {
            HouseState::Waiting { ticks_left } => {
                self.house = match ticks_left {
                    0 | 1 => {
                        log::debug!("Pursuer {} ({}) leaving house", self.id, self.kind.name());
                        self.last_decision = None;
                        HouseState::Leaving
                    }
                    n => HouseState::Waiting { ticks_left: n - 1 },
                };
            }
            HouseState::Leaving if self.tile() == house.exit && self.mode != Mode::Eaten => {
                self.house = HouseState::Outside;
            }
            _ => {}
        }

        match self.mode {
            Mode::Frightened => {
                self.frightened_ticks = self.frightened_ticks.saturating_sub(1);
                if self.frightened_ticks == 0 {
                    self.mode = global;
                }
            }
            Mode::Eaten => {
                self.eaten_ticks = self.eaten_ticks.saturating_add(1);
                if self.tile() == house.home {
                    self.return_home(global);
                } else if self.eaten_ticks >= house.eaten_bound {
                    log::warn!(
                        "Pursuer {} still not home after {} ticks, relocating to {}",
                        self.id,
                        self.eaten_ticks,
                        house.home
                    );
                    self.movement.place(house.home, tile_size, Direction::Up);
                    self.return_home(global);
                }
            }
            Mode::Scatter | Mode::Chase => {}
        }
    }

    fn return_home(&mut self, global: Mode) {
        self.mode = global;
        self.eaten_ticks = 0;
        self.house = HouseState::Leaving;
        self.last_decision = None;
    }
}
