//! Game state definitions
//!
//! `GameState` owns every piece of mutable simulation state. It is only
//! mutated by `tick()` and the explicit lifecycle entry points below.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::agent::{HouseState, HouseTiles, Player, Pursuer, PursuerKind};
use super::ai::TargetContext;
use super::collision::ComboCounter;
use super::direction::Direction;
use super::maze::{MazeGrid, Traversal};
use super::schedule::{Mode, ModeSchedule};
use crate::config::{GameConfig, LevelConfig};
use crate::error::{SimError, SimResult};
use crate::seconds_to_ticks;

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Countdown before play starts or resumes
    Ready,
    /// Active gameplay
    Playing,
    /// Frozen until the next pause toggle
    Paused,
    /// Death animation; respawn or game over follows
    Dying,
    /// Board cleared; next level follows
    LevelComplete,
    /// Out of lives
    GameOver,
}

/// Gameplay events queued for audio/UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    PelletEaten { tile: IVec2, score: u32 },
    CapsuleActivated { tile: IVec2, score: u32 },
    GhostEaten { pursuer_id: usize, score: u32 },
    PlayerDied { lives_left: u8 },
    ModeChanged { mode: Mode },
    LevelCleared { level: u32 },
    ExtraLife { lives: u8 },
    GameOver { score: u64 },
}

/// Complete simulation state (deterministic for a given config and seed)
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Current level index (0-based)
    pub level: u32,
    pub maze: MazeGrid,
    pub player: Player,
    /// Pursuers in fixed processing order
    pub pursuers: Vec<Pursuer>,
    pub schedule: ModeSchedule,
    pub combo: ComboCounter,
    pub score: u64,
    pub lives: u8,
    pub phase: GamePhase,
    /// Ticks left in the current Ready/Dying/LevelComplete countdown
    pub phase_ticks: u32,
    /// Phase to return to when unpaused
    pub(crate) resume_phase: GamePhase,
    /// Simulation tick counter (Playing ticks only)
    pub time_ticks: u64,
    pub(crate) house: HouseTiles,
    extra_life_awarded: bool,
    events: Vec<SimEvent>,
}

/// Map a configured spawn tile onto the maze, substituting a nearby walkable
/// tile when the configured one is blocked.
fn resolve_spawn(
    maze: &MazeGrid,
    agent: &str,
    tile: IVec2,
    radius: i32,
    traversal: Traversal,
) -> SimResult<IVec2> {
    match maze.nearest_walkable(tile, radius, traversal) {
        Some(found) if found == tile => Ok(tile),
        Some(found) => {
            log::warn!("Spawn {tile} for {agent} is not walkable, using {found}");
            Ok(found)
        }
        None => Err(SimError::UnreachableSpawn {
            agent: agent.to_string(),
            tile,
            radius,
        }),
    }
}

impl GameState {
    /// Build a fresh game from a configuration
    pub fn new(config: GameConfig, seed: u64) -> SimResult<Self> {
        config.validate()?;
        let maze = MazeGrid::parse(&config.layout, config.tile_size, config.tunnel_row)?;
        let radius = config.spawn_search_radius;

        let mut player_setup = config.player;
        player_setup.spawn =
            resolve_spawn(&maze, "player", player_setup.spawn, radius, Traversal::Player)?;

        let pursuer_spawn =
            |name: &str, tile: IVec2| resolve_spawn(&maze, name, tile, radius, Traversal::Pursuer);

        let house = HouseTiles {
            home: pursuer_spawn("house home", config.house_home)?,
            exit: pursuer_spawn("house exit", config.house_exit)?,
            eaten_bound: seconds_to_ticks(config.eaten_return_seconds),
        };

        let level = config.level(0);
        let schedule = ModeSchedule::for_level(level);
        let player = Player::new(&player_setup, config.tile_size, &level.speeds);

        let mut pursuers = Vec::with_capacity(config.pursuers.len());
        for (id, setup) in config.pursuers.iter().enumerate() {
            let spawn = pursuer_spawn(setup.kind.name(), setup.spawn)?;
            let mode = schedule.current_mode();
            pursuers.push(Pursuer::new(id, setup, spawn, &maze, level, mode));
        }

        let ready_ticks = seconds_to_ticks(config.ready_seconds);
        let lives = config.lives;

        log::info!(
            "New game: seed {seed}, {}x{} maze, {} pellets, {} pursuers",
            maze.width(),
            maze.height(),
            maze.pellets_remaining(),
            pursuers.len()
        );

        Ok(Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level: 0,
            maze,
            player,
            pursuers,
            schedule,
            combo: ComboCounter::default(),
            score: 0,
            lives,
            phase: GamePhase::Ready,
            phase_ticks: ready_ticks,
            resume_phase: GamePhase::Ready,
            time_ticks: 0,
            house,
            extra_life_awarded: false,
            events: Vec::new(),
        })
    }

    /// Tuning for the current level
    pub fn level_config(&self) -> &LevelConfig {
        self.config.level(self.level)
    }

    #[inline]
    pub fn pellets_remaining(&self) -> usize {
        self.maze.pellets_remaining()
    }

    /// Player intent from the input collaborator
    pub fn set_desired_direction(&mut self, dir: Direction) {
        self.player.set_desired_direction(dir);
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Start over from level 1 with full lives and the original seed
    pub fn reset(&mut self) {
        self.score = 0;
        self.lives = self.config.lives;
        self.extra_life_awarded = false;
        self.time_ticks = 0;
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.events.clear();
        self.start_level(0);
    }

    /// Move on to the next level
    pub fn advance_level(&mut self) {
        self.start_level(self.level + 1);
    }

    fn start_level(&mut self, level: u32) {
        self.level = level;
        self.maze.reset_pellets();
        self.schedule = ModeSchedule::for_level(self.config.level(level));
        log::info!(
            "Level {} start: {} pellets",
            level + 1,
            self.maze.pellets_remaining()
        );
        self.respawn();
    }

    /// Put every agent back on its spawn tile after a death or level change.
    /// The global schedule keeps running across deaths.
    pub fn respawn(&mut self) {
        let tile_size = self.maze.tile_size();
        let level = self.config.level(self.level);
        let mode = self.schedule.current_mode();

        self.player.reset(tile_size, &level.speeds);
        for pursuer in &mut self.pursuers {
            pursuer.reset(&self.maze, level, mode);
        }
        self.combo.reset();
        self.phase = GamePhase::Ready;
        self.phase_ticks = seconds_to_ticks(self.config.ready_seconds);
        log::info!("Respawn: {} lives, score {}", self.lives, self.score);
    }

    /// Add points, awarding the bonus life the first time the threshold is passed
    pub(crate) fn add_score(&mut self, points: u32) {
        self.score += points as u64;
        if let Some(threshold) = self.config.extra_life_score {
            if !self.extra_life_awarded && self.score >= threshold {
                self.extra_life_awarded = true;
                self.lives = self.lives.saturating_add(1);
                log::info!("Extra life at {} points", self.score);
                self.push_event(SimEvent::ExtraLife { lives: self.lives });
            }
        }
    }

    /// Inputs shared by every pursuer's target selection this tick
    pub fn target_context(&self) -> TargetContext {
        TargetContext {
            player_tile: self.player.tile(),
            player_facing: self.player.facing(),
            shadow_tile: self
                .pursuers
                .iter()
                .find(|p| p.kind == PursuerKind::Shadow)
                .map(Pursuer::tile),
            house_exit: self.house.exit,
            house_home: self.house.home,
        }
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time_ticks: self.time_ticks,
            level: self.level,
            score: self.score,
            lives: self.lives,
            phase: self.phase,
            global_mode: self.schedule.current_mode(),
            pellets_remaining: self.pellets_remaining(),
            player: PlayerView {
                pos: self.player.pos(),
                grid: self.player.tile(),
                direction: self.player.movement.direction(),
                facing: self.player.facing(),
                mouth_phase: self.player.mouth_phase(),
                dying: self.player.dying,
            },
            pursuers: self
                .pursuers
                .iter()
                .map(|p| PursuerView {
                    id: p.id,
                    kind: p.kind,
                    pos: p.movement.pos(),
                    grid: p.tile(),
                    direction: p.movement.direction(),
                    mode: p.mode(),
                    target: p.target(),
                    frightened_ticks: p.frightened_ticks(),
                    house: p.house(),
                })
                .collect(),
        }
    }
}

/// Player fields a renderer needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub grid: IVec2,
    pub direction: Direction,
    pub facing: Direction,
    pub mouth_phase: f32,
    pub dying: bool,
}

/// Pursuer fields a renderer needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PursuerView {
    pub id: usize,
    pub kind: PursuerKind,
    pub pos: Vec2,
    pub grid: IVec2,
    pub direction: Direction,
    pub mode: Mode,
    pub target: IVec2,
    pub frightened_ticks: u32,
    pub house: HouseState,
}

/// Serializable per-frame view of the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time_ticks: u64,
    pub level: u32,
    pub score: u64,
    pub lives: u8,
    pub phase: GamePhase,
    pub global_mode: Mode,
    pub pellets_remaining: usize,
    pub player: PlayerView,
    pub pursuers: Vec<PursuerView>,
}
