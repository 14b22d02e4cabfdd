//! Tunnel warp between the two portal tiles of the tunnel row

use glam::IVec2;

use super::maze::MazeGrid;
use super::movement::MovementState;

/// Relocate an agent that has run off either end of the tunnel row.
///
/// The agent lands on the opposite portal's center; only x changes. The
/// previous-position record is left untouched so a crossing check spanning
/// the warp compares against where the agent really came from.
///
/// Returns true if the agent was moved.
pub fn apply_tunnel_warp(agent: &mut MovementState, maze: &MazeGrid) -> bool {
    let Some((west, east)) = maze.portals() else {
        return false;
    };
    if agent.grid.y != west.y {
        return false;
    }

    let dest = if agent.pos.x < 0.0 {
        east
    } else if agent.pos.x > maze.pixel_width() {
        west
    } else {
        return false;
    };

    agent.pos.x = maze.tile_center(dest).x;
    agent.grid = IVec2::new(dest.x, agent.grid.y);
    log::trace!("Tunnel warp to {}", agent.grid);
    true
}
