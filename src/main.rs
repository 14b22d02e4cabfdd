//! Maze Chase headless driver
//!
//! Drives the simulation from a synthetic, jittery frame clock with a seeded
//! autopilot at the controls, logs gameplay events, and prints the final
//! snapshot as JSON. An optional first argument names a JSON config file.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use maze_chase::sim::{
    Direction, FixedTimestep, GamePhase, GameState, SimEvent, TickInput, Traversal, tick,
};
use maze_chase::{GameConfig, SimResult};

const SEED: u64 = 0x5EED;
/// Two minutes of display frames
const FRAMES: u32 = 60 * 120;

/// Random walk: pick a new open direction when stopped, or now and then
fn autopilot(state: &GameState, rng: &mut Pcg32) -> Option<Direction> {
    let player = &state.player.movement;
    if player.is_moving() && !rng.random_bool(0.03) {
        return None;
    }
    let open: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|d| {
            state
                .maze
                .is_open_for(player.grid() + d.offset(), Traversal::Player)
        })
        .collect();
    if open.is_empty() {
        return None;
    }
    Some(open[rng.random_range(0..open.len())])
}

fn log_event(frame: u32, event: &SimEvent) {
    match event {
        SimEvent::PelletEaten { .. } => log::trace!("[{frame}] {event:?}"),
        SimEvent::ModeChanged { .. } | SimEvent::CapsuleActivated { .. } => {
            log::debug!("[{frame}] {event:?}")
        }
        _ => log::info!("[{frame}] {event:?}"),
    }
}

fn run() -> SimResult<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    let mut state = GameState::new(config, SEED)?;
    let mut timestep = FixedTimestep::new();
    let mut clock = Pcg32::seed_from_u64(SEED ^ 0xC10C);
    let mut pilot = Pcg32::seed_from_u64(SEED ^ 0xA070);

    for frame in 0..FRAMES {
        // 50-70 Hz display with the occasional stall
        let dt = if clock.random_bool(0.01) {
            0.25
        } else {
            clock.random_range(1.0 / 70.0..1.0 / 50.0)
        };

        timestep.update(dt, |_| {
            let input = TickInput {
                direction: autopilot(&state, &mut pilot),
                pause: false,
            };
            tick(&mut state, &input);
        });

        for event in state.drain_events() {
            log_event(frame, &event);
        }
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    log::info!(
        "Stopped after {} ticks: level {}, score {}, lives {}",
        timestep.total_steps(),
        state.level + 1,
        state.score,
        state.lives
    );
    println!("{}", serde_json::to_string_pretty(&state.snapshot())?);
    Ok(())
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    if let Err(err) = run() {
        log::error!("{err}");
        eprintln!("maze-chase: {err}");
        std::process::exit(1);
    }
}
