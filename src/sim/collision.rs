//! Player/pursuer collision detection and capture scoring
//!
//! Three tests run in priority order for each pursuer:
//! 1. Crossing: the two swapped tiles (catches a pass-through within one tick)
//! 2. Same tile
//! 3. Swept circle fallback when either side lacks a previous position

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::agent::Pursuer;
use super::movement::MovementState;
use crate::consts::{COLLISION_RADIUS_TILES, COMBO_SCORES};

/// Outcome of one player/pursuer contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollisionResult {
    PacmanDied,
    GhostEaten { score: u32, pursuer_id: usize },
}

impl CollisionResult {
    pub fn score(&self) -> u32 {
        match self {
            CollisionResult::PacmanDied => 0,
            CollisionResult::GhostEaten { score, .. } => *score,
        }
    }
}

/// Which test detected a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Crossing,
    SameTile,
    Swept,
}

/// Capture counter for the current capsule
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ComboCounter {
    count: u32,
}

impl ComboCounter {
    pub fn count(&self) -> u32 {
        self.count
    }

    /// A new capsule starts a fresh combo
    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// Register a capture and return its score
    pub fn next_score(&mut self) -> u32 {
        self.count = self.count.saturating_add(1);
        let index = (self.count as usize - 1).min(COMBO_SCORES.len() - 1);
        COMBO_SCORES[index]
    }
}

/// Shortest distance from `point` to segment `a..b`
fn point_segment_distance(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// Start of the agent's last move, or its current position if unknown
fn segment_start(agent: &MovementState) -> Vec2 {
    agent.prev().map_or(agent.pos(), |prev| prev.pos)
}

/// Detect contact between two agents
pub fn detect_contact(a: &MovementState, b: &MovementState, tile_size: f32) -> Option<ContactKind> {
    if let (Some(pa), Some(pb)) = (a.prev(), b.prev()) {
        if pa.grid == b.grid() && a.grid() == pb.grid {
            return Some(ContactKind::Crossing);
        }
    }

    if a.grid() == b.grid() {
        return Some(ContactKind::SameTile);
    }

    if a.prev().is_none() || b.prev().is_none() {
        let radius = COLLISION_RADIUS_TILES * tile_size;
        let a_hit = point_segment_distance(b.pos(), segment_start(a), a.pos()) <= radius;
        let b_hit = point_segment_distance(a.pos(), segment_start(b), b.pos()) <= radius;
        if a_hit || b_hit {
            return Some(ContactKind::Swept);
        }
    }

    None
}

/// Check the player against every pursuer in order.
///
/// Eaten pursuers are ignored. A frightened pursuer is captured (and marked
/// eaten) for the next combo score; any other contact kills the player and
/// ends evaluation for this tick.
pub fn resolve_collisions(
    player: &MovementState,
    pursuers: &mut [Pursuer],
    combo: &mut ComboCounter,
    tile_size: f32,
) -> Vec<CollisionResult> {
    let mut results = Vec::new();

    for pursuer in pursuers.iter_mut() {
        if pursuer.is_eaten() {
            continue;
        }
        let Some(contact) = detect_contact(player, &pursuer.movement, tile_size) else {
            continue;
        };

        if pursuer.is_frightened() {
            let score = combo.next_score();
            pursuer.mark_eaten();
            log::debug!(
                "Pursuer {} captured ({:?}), combo {} for {} points",
                pursuer.id,
                contact,
                combo.count(),
                score
            );
            results.push(CollisionResult::GhostEaten {
                score,
                pursuer_id: pursuer.id,
            });
        } else {
            log::debug!("Player caught by pursuer {} ({:?})", pursuer.id, contact);
            results.push(CollisionResult::PacmanDied);
            break;
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LevelConfig, PursuerSetup};
    use crate::sim::agent::PursuerKind;
    use crate::sim::direction::Direction;
    use crate::sim::maze::MazeGrid;
    use crate::sim::movement::PrevPosition;
    use crate::sim::schedule::Mode;
    use glam::IVec2;

    const TILE: f32 = 16.0;

    const ROOM: [&str; 8] = [
        "########",
        "#......#",
        "#......#",
        "#......#",
        "#......#",
        "#......#",
        "#......#",
        "########",
    ];

    fn maze() -> MazeGrid {
        MazeGrid::parse(&ROOM, TILE, None).unwrap()
    }

    fn agent(tile: IVec2) -> MovementState {
        MovementState::at_tile(tile, TILE, Direction::Left, 60.0)
    }

    /// Agent that moved from `from` to `to` on its last tile change
    fn moved(from: IVec2, to: IVec2) -> MovementState {
        let mut state = agent(to);
        state.prev = Some(PrevPosition {
            pos: crate::tile_center(from, TILE),
            grid: from,
        });
        state
    }

    fn pursuer(id: usize, tile: IVec2) -> Pursuer {
        let setup = PursuerSetup {
            kind: PursuerKind::Shadow,
            spawn: tile,
            direction: Direction::Left,
            scatter_corner: IVec2::ZERO,
            dwell_seconds: 0.0,
        };
        Pursuer::new(id, &setup, tile, &maze(), &LevelConfig::default(), Mode::Chase)
    }

    #[test]
    fn test_crossing_detected() {
        let player = moved(IVec2::new(5, 5), IVec2::new(6, 5));
        let ghost = moved(IVec2::new(6, 5), IVec2::new(5, 5));
        assert_eq!(
            detect_contact(&player, &ghost, TILE),
            Some(ContactKind::Crossing)
        );
    }

    #[test]
    fn test_crossing_kills_or_captures() {
        let player = moved(IVec2::new(5, 5), IVec2::new(6, 5));

        let mut pursuers = vec![pursuer(0, IVec2::new(5, 5))];
        pursuers[0].movement = moved(IVec2::new(6, 5), IVec2::new(5, 5));
        let mut combo = ComboCounter::default();
        let results = resolve_collisions(&player, &mut pursuers, &mut combo, TILE);
        assert_eq!(results, vec![CollisionResult::PacmanDied]);
        assert_eq!(results[0].score(), 0);

        let mut pursuers = vec![pursuer(2, IVec2::new(5, 5))];
        pursuers[0].frighten(600);
        pursuers[0].movement = moved(IVec2::new(6, 5), IVec2::new(5, 5));
        let results = resolve_collisions(&player, &mut pursuers, &mut combo, TILE);
        assert_eq!(
            results,
            vec![CollisionResult::GhostEaten {
                score: 200,
                pursuer_id: 2
            }]
        );
        assert!(pursuers[0].is_eaten());
    }

    #[test]
    fn test_same_tile_and_apart() {
        let a = moved(IVec2::new(2, 2), IVec2::new(3, 2));
        let b = moved(IVec2::new(3, 3), IVec2::new(3, 2));
        assert_eq!(detect_contact(&a, &b, TILE), Some(ContactKind::SameTile));

        let far = moved(IVec2::new(5, 5), IVec2::new(5, 4));
        assert_eq!(detect_contact(&a, &far, TILE), None);
    }

    #[test]
    fn test_swept_fallback_without_history() {
        let player = agent(IVec2::new(5, 5));
        let mut ghost = agent(IVec2::new(6, 5));
        // 12 px from the player's center, inside the 12.8 px radius
        ghost.pos = player.pos() + Vec2::new(12.0, 0.0);
        assert_eq!(detect_contact(&player, &ghost, TILE), Some(ContactKind::Swept));

        ghost.pos = player.pos() + Vec2::new(14.0, 0.0);
        assert_eq!(detect_contact(&player, &ghost, TILE), None);
    }

    #[test]
    fn test_swept_uses_segment_of_agent_with_history() {
        // Ghost swept past the player's center in one step
        let player = agent(IVec2::new(3, 3));
        let mut ghost = moved(IVec2::new(2, 3), IVec2::new(4, 3));
        ghost.prev = Some(PrevPosition {
            pos: player.pos() - Vec2::new(20.0, 3.0),
            grid: IVec2::new(2, 3),
        });
        ghost.pos = player.pos() + Vec2::new(20.0, 3.0);
        assert_eq!(detect_contact(&player, &ghost, TILE), Some(ContactKind::Swept));
    }

    #[test]
    fn test_eaten_pursuer_never_collides() {
        let player = agent(IVec2::new(3, 3));
        let mut pursuers = vec![pursuer(0, IVec2::new(3, 3))];
        pursuers[0].mark_eaten();
        let mut combo = ComboCounter::default();
        assert!(resolve_collisions(&player, &mut pursuers, &mut combo, TILE).is_empty());
    }

    #[test]
    fn test_combo_scores() {
        let player = agent(IVec2::new(3, 3));
        let mut pursuers: Vec<Pursuer> = (0..5).map(|id| pursuer(id, IVec2::new(3, 3))).collect();
        for p in &mut pursuers {
            p.frighten(600);
        }
        let mut combo = ComboCounter::default();
        let scores: Vec<u32> = resolve_collisions(&player, &mut pursuers, &mut combo, TILE)
            .iter()
            .map(CollisionResult::score)
            .collect();
        assert_eq!(scores, vec![200, 400, 800, 1600, 1600]);

        combo.reset();
        assert_eq!(combo.next_score(), 200);
    }

    #[test]
    fn test_death_stops_evaluation() {
        let player = agent(IVec2::new(3, 3));
        let mut pursuers = vec![pursuer(0, IVec2::new(3, 3)), pursuer(1, IVec2::new(3, 3))];
        pursuers[1].frighten(600);
        let mut combo = ComboCounter::default();
        let results = resolve_collisions(&player, &mut pursuers, &mut combo, TILE);
        assert_eq!(results, vec![CollisionResult::PacmanDied]);
        assert!(pursuers[1].is_frightened());
        assert_eq!(combo.count(), 0);
    }

    #[test]
    fn test_point_segment_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!((point_segment_distance(Vec2::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-5);
        assert!((point_segment_distance(Vec2::new(-4.0, 3.0), a, b) - 5.0).abs() < 1e-5);
        assert!((point_segment_distance(Vec2::new(1.0, 1.0), a, a) - 2f32.sqrt()).abs() < 1e-5);
    }
}
