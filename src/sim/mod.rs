//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (pursuers processed by index)
//! - No rendering or platform dependencies

pub mod agent;
pub mod ai;
pub mod collision;
pub mod direction;
pub mod maze;
pub mod movement;
pub mod schedule;
pub mod state;
pub mod tick;
pub mod timestep;
pub mod warp;

pub use agent::{HouseState, Player, Pursuer, PursuerKind};
pub use ai::{TargetContext, choose_direction, select_target};
pub use collision::{CollisionResult, ComboCounter, resolve_collisions};
pub use direction::{Direction, DirectionBuffer};
pub use maze::{MazeGrid, PelletKind, TileKind, Traversal};
pub use movement::{MovementState, PrevPosition, StepOutcome};
pub use schedule::{Mode, ModePhase, ModeSchedule};
pub use state::{GamePhase, GameState, PlayerView, PursuerView, SimEvent, Snapshot};
pub use tick::{TickInput, tick};
pub use timestep::FixedTimestep;
pub use warp::apply_tunnel_warp;
