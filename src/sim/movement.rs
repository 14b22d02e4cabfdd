//! Tile movement engine
//!
//! Agents carry a continuous pixel position and the grid tile containing it.
//! Each tick the engine walks the agent forward by `speed * dt`, stopping at
//! every tile center it reaches to decide whether a buffered turn can be taken
//! or whether the way ahead is blocked. A single tick may cross several tiles.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::direction::{Direction, DirectionBuffer};
use super::maze::{MazeGrid, Traversal};
use super::warp::apply_tunnel_warp;
use crate::consts::CENTER_EPS;

/// Upper bound on center/segment iterations per tick
const MAX_SEGMENTS: usize = 64;
/// Leftover distance below this is dropped
const MIN_STEP: f32 = 1e-4;

/// Where an agent was before its most recent tile change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrevPosition {
    pub pos: Vec2,
    pub grid: IVec2,
}

/// What happened during one `advance`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub tiles_crossed: u32,
    pub warped: bool,
    pub stopped: bool,
}

/// Position and heading of one agent. Only the movement engine mutates it
/// during a tick; renderers read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementState {
    pub(crate) pos: Vec2,
    pub(crate) grid: IVec2,
    pub(crate) prev: Option<PrevPosition>,
    pub(crate) buffer: DirectionBuffer,
    pub(crate) speed: f32,
    pub(crate) base_speed: f32,
    pub(crate) is_moving: bool,
}

impl MovementState {
    /// Agent resting on the center of `tile`
    pub fn at_tile(tile: IVec2, tile_size: f32, dir: Direction, speed: f32) -> Self {
        Self {
            pos: crate::tile_center(tile, tile_size),
            grid: tile,
            prev: None,
            buffer: DirectionBuffer::new(dir),
            speed,
            base_speed: speed,
            is_moving: false,
        }
    }

    /// Teleport to a tile center, forgetting history and pending turns
    pub fn place(&mut self, tile: IVec2, tile_size: f32, dir: Direction) {
        self.pos = crate::tile_center(tile, tile_size);
        self.grid = tile;
        self.prev = None;
        self.buffer = DirectionBuffer::new(dir);
        self.is_moving = false;
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn grid(&self) -> IVec2 {
        self.grid
    }

    #[inline]
    pub fn prev(&self) -> Option<PrevPosition> {
        self.prev
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.buffer.current()
    }

    #[inline]
    pub fn buffered(&self) -> Direction {
        self.buffer.buffered()
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn set_base_speed(&mut self, speed: f32) {
        self.base_speed = speed;
        self.speed = speed;
    }

    /// Request a turn (reversals apply immediately)
    pub fn queue_direction(&mut self, dir: Direction) {
        self.buffer.queue(dir);
    }

    /// Reverse in place, dropping any pending turn
    pub fn reverse(&mut self) {
        let reversed = self.buffer.current().opposite();
        self.buffer.apply(reversed);
    }

    /// Recompute the tile from the continuous position if they disagree.
    ///
    /// The continuous position is ground truth.
    fn reconcile_grid(&mut self, maze: &MazeGrid) {
        if !self.pos.is_finite() {
            log::warn!(
                "Non-finite position {:?} on tile {}, snapping to its center",
                self.pos,
                self.grid
            );
            self.pos = maze.tile_center(self.grid);
            return;
        }
        let expected = maze.tile_of(self.pos);
        if expected != self.grid {
            log::warn!(
                "Grid {} out of sync with position {:?}, correcting to {}",
                self.grid,
                self.pos,
                expected
            );
            self.grid = expected;
        }
    }

    fn halt(&mut self, center: Vec2, outcome: &mut StepOutcome) {
        self.pos = center;
        self.buffer.stop();
        self.is_moving = false;
        outcome.stopped = true;
    }

    /// Advance one fixed step of `dt` seconds.
    pub fn advance(&mut self, maze: &MazeGrid, traversal: Traversal, dt: f32) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        self.reconcile_grid(maze);
        let start_pos = self.pos;
        let start_grid = self.grid;

        if apply_tunnel_warp(self, maze) {
            outcome.warped = true;
            self.finish(start_pos, start_grid);
            return outcome;
        }

        let distance = self.speed * dt;
        let idle = self.buffer.current().is_none() && self.buffer.buffered().is_none();
        if !distance.is_finite() || distance <= 0.0 || idle {
            self.is_moving = false;
            return outcome;
        }

        let can_enter = |tile: IVec2| maze.is_open_for(tile, traversal);
        let tile_size = maze.tile_size();
        let mut remaining = distance;
        let mut decided: Option<IVec2> = None;

        for _ in 0..MAX_SEGMENTS {
            let center = maze.tile_center(self.grid);
            let current = self.buffer.current();
            let heading = current.vector();
            // Signed distance to the center along the heading (> 0: ahead)
            let along = heading.dot(center - self.pos);

            if decided != Some(self.grid) {
                let buffered = self.buffer.buffered();
                let reaches = !current.is_none()
                    && along >= 0.0
                    && (along <= remaining || along <= CENTER_EPS);
                // Just past the center with a usable turn pending
                let corner = !current.is_none()
                    && along < 0.0
                    && -along <= CENTER_EPS
                    && !buffered.is_none()
                    && can_enter(self.grid + buffered.offset());

                if reaches || corner || current.is_none() {
                    if reaches {
                        remaining = (remaining - along).max(0.0);
                    }
                    self.pos = center;
                    decided = Some(self.grid);

                    let grid = self.grid;
                    let turned = self
                        .buffer
                        .apply_if_can_move(|d| can_enter(grid + d.offset()));
                    let dir = self.buffer.current();
                    if !turned && (dir.is_none() || !can_enter(grid + dir.offset())) {
                        self.halt(center, &mut outcome);
                        break;
                    }
                    continue;
                }
            }

            if current.is_none() || remaining <= MIN_STEP {
                break;
            }

            if along > 0.0 {
                // Center still ahead and out of reach this tick
                self.pos += heading * remaining.min(along);
                break;
            }

            if !can_enter(self.grid + current.offset()) {
                // Past the center toward a wall: never go further
                self.halt(center, &mut outcome);
                break;
            }

            let to_next_center = tile_size + along;
            let step = remaining.min(to_next_center);
            self.pos += heading * step;
            remaining -= step;

            let tile = maze.tile_of(self.pos);
            if tile != self.grid {
                self.grid = tile;
                outcome.tiles_crossed += 1;
            }

            if apply_tunnel_warp(self, maze) {
                outcome.warped = true;
            }
            if remaining <= MIN_STEP {
                break;
            }
        }

        if !outcome.stopped {
            self.is_moving = !self.buffer.current().is_none();
        }
        self.finish(start_pos, start_grid);
        outcome
    }

    /// Record history only when the tile actually changed this tick
    fn finish(&mut self, start_pos: Vec2, start_grid: IVec2) {
        if self.grid != start_grid {
            self.prev = Some(PrevPosition {
                pos: start_pos,
                grid: start_grid,
            });
        }
    }
}
