//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically. One call
//! is one `FIXED_DT` step; the phase countdowns (ready, dying, level clear)
//! also run here so the whole game is driven by `tick` alone.

use serde::{Deserialize, Serialize};

use super::ai::update_pursuer;
use super::collision::{CollisionResult, resolve_collisions};
use super::direction::Direction;
use super::maze::{PelletKind, Traversal};
use super::state::{GamePhase, GameState, SimEvent};
use crate::consts::FIXED_DT;
use crate::seconds_to_ticks;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Desired player direction, if the input collaborator has one
    pub direction: Option<Direction>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one fixed timestep.
///
/// Returns the collision results produced this tick (empty outside of
/// active play).
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<CollisionResult> {
    if input.pause {
        match state.phase {
            GamePhase::Playing | GamePhase::Ready => {
                state.resume_phase = state.phase;
                state.phase = GamePhase::Paused;
                log::debug!("Paused");
            }
            GamePhase::Paused => {
                state.phase = state.resume_phase;
                log::debug!("Resumed");
            }
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return Vec::new(),
        GamePhase::Dying => {
            if count_down(state) {
                finish_death(state);
            }
            return Vec::new();
        }
        GamePhase::LevelComplete => {
            if count_down(state) {
                state.advance_level();
            }
            return Vec::new();
        }
        GamePhase::Ready | GamePhase::Playing => {}
    }

    // Turns may be pre-buffered during the ready countdown
    if let Some(dir) = input.direction {
        state.set_desired_direction(dir);
    }

    if state.phase == GamePhase::Ready {
        if count_down(state) {
            state.phase = GamePhase::Playing;
            log::debug!("Go");
        }
        return Vec::new();
    }

    state.time_ticks += 1;
    step_playing(state)
}

/// Decrement the phase countdown; true once it has run out
fn count_down(state: &mut GameState) -> bool {
    state.phase_ticks = state.phase_ticks.saturating_sub(1);
    state.phase_ticks == 0
}

fn finish_death(state: &mut GameState) {
    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        log::info!("Game over: score {}", state.score);
        let score = state.score;
        state.push_event(SimEvent::GameOver { score });
    } else {
        state.respawn();
    }
}

/// One step of active play
fn step_playing(state: &mut GameState) -> Vec<CollisionResult> {
    let tile_size = state.maze.tile_size();

    // (a) Global scatter/chase schedule
    if let Some(mode) = state.schedule.advance() {
        log::debug!("Schedule switched to {mode:?} at tick {}", state.time_ticks);
        for pursuer in &mut state.pursuers {
            pursuer.on_schedule_change(mode);
        }
        state.push_event(SimEvent::ModeChanged { mode });
    }

    // (b) Per-pursuer timers
    let global = state.schedule.current_mode();
    let house = state.house;
    for pursuer in &mut state.pursuers {
        pursuer.update_timers(global, &house, tile_size);
    }

    // (c) Targets and turn decisions
    let ctx = state.target_context();
    for pursuer in &mut state.pursuers {
        update_pursuer(pursuer, &ctx, &state.maze, &mut state.rng);
    }

    // (d) Movement: player first, pellets right after, then pursuers in order
    state.player.advance(&state.maze, FIXED_DT);
    consume_pellet(state);

    let speeds = state.config.level(state.level).speeds;
    for pursuer in &mut state.pursuers {
        pursuer.apply_speed(&speeds, tile_size);
        if pursuer.is_waiting() {
            continue;
        }
        pursuer
            .movement
            .advance(&state.maze, Traversal::Pursuer, FIXED_DT);
    }

    // (e) Collisions
    let results = resolve_collisions(
        &state.player.movement,
        &mut state.pursuers,
        &mut state.combo,
        tile_size,
    );
    for result in &results {
        match *result {
            CollisionResult::GhostEaten { score, pursuer_id } => {
                state.add_score(score);
                state.push_event(SimEvent::GhostEaten { pursuer_id, score });
            }
            CollisionResult::PacmanDied => {
                state.lives = state.lives.saturating_sub(1);
                state.player.dying = true;
                state.phase = GamePhase::Dying;
                state.phase_ticks = seconds_to_ticks(state.config.death_seconds).max(1);
                log::info!("Player died, {} lives left", state.lives);
                let lives_left = state.lives;
                state.push_event(SimEvent::PlayerDied { lives_left });
            }
        }
    }

    if state.phase == GamePhase::Playing && state.pellets_remaining() == 0 {
        state.phase = GamePhase::LevelComplete;
        state.phase_ticks = seconds_to_ticks(state.config.level_clear_seconds).max(1);
        log::info!("Level {} cleared, score {}", state.level + 1, state.score);
        let level = state.level;
        state.push_event(SimEvent::LevelCleared { level });
    }

    results
}

/// Eat whatever lies on the player's tile
fn consume_pellet(state: &mut GameState) {
    let tile = state.player.tile();
    match state.maze.take_pellet(tile) {
        Some(PelletKind::Pellet) => {
            let score = state.config.pellet_score;
            state.add_score(score);
            state.push_event(SimEvent::PelletEaten { tile, score });
        }
        Some(PelletKind::PowerPellet) => {
            let score = state.config.power_pellet_score;
            state.add_score(score);
            state.combo.reset();

            let ticks = seconds_to_ticks(state.config.level(state.level).frightened_seconds);
            for pursuer in &mut state.pursuers {
                pursuer.frighten(ticks);
            }
            log::debug!("Capsule at {tile}: frightened for {ticks} ticks");
            state.push_event(SimEvent::CapsuleActivated { tile, score });
        }
        Some(PelletKind::None) | None => {}
    }
}
