//! Pursuer AI: per-kind target selection and direction arbitration
//!
//! A pursuer commits to one exit direction per tile. The choice is made when
//! it enters a tile (or while it stands still) and queued into its direction
//! buffer; the movement engine takes the turn at the tile center.

use glam::IVec2;
use rand::Rng;

use super::agent::{HouseState, Pursuer, PursuerKind};
use super::direction::Direction;
use super::maze::{MazeGrid, TileKind};
use super::schedule::Mode;
use crate::consts::{AMBUSH_LEAD_TILES, PIVOT_LEAD_TILES, SHY_DISTANCE_TILES};

/// World facts every pursuer's target depends on
#[derive(Debug, Clone, Copy)]
pub struct TargetContext {
    pub player_tile: IVec2,
    pub player_facing: Direction,
    /// Tile of the first shadow-type pursuer, if there is one
    pub shadow_tile: Option<IVec2>,
    pub house_exit: IVec2,
    pub house_home: IVec2,
}

/// Tile `lead` steps ahead of the player.
///
/// Facing up also shifts the point `lead` tiles left, reproducing the arcade
/// overflow quirk.
fn lead_tile(ctx: &TargetContext, lead: i32) -> IVec2 {
    let mut tile = ctx.player_tile + ctx.player_facing.offset() * lead;
    if ctx.player_facing == Direction::Up {
        tile.x -= lead;
    }
    tile
}

/// Chase-mode target for one pursuer kind
pub fn chase_target(
    kind: PursuerKind,
    pursuer_tile: IVec2,
    scatter_corner: IVec2,
    ctx: &TargetContext,
) -> IVec2 {
    match kind {
        PursuerKind::Shadow => ctx.player_tile,
        PursuerKind::Ambush => lead_tile(ctx, AMBUSH_LEAD_TILES),
        PursuerKind::Fickle => {
            let pivot = ctx.player_tile + ctx.player_facing.offset() * PIVOT_LEAD_TILES;
            match ctx.shadow_tile {
                Some(shadow) => pivot * 2 - shadow,
                None => pivot,
            }
        }
        PursuerKind::Shy => {
            let distance = (pursuer_tile - ctx.player_tile).as_vec2().length();
            if distance > SHY_DISTANCE_TILES {
                ctx.player_tile
            } else {
                scatter_corner
            }
        }
    }
}

/// Where the pursuer is heading this tick
pub fn select_target(pursuer: &Pursuer, ctx: &TargetContext) -> IVec2 {
    if pursuer.mode() == Mode::Eaten {
        return ctx.house_home;
    }
    if pursuer.house() == HouseState::Leaving {
        return ctx.house_exit;
    }
    match pursuer.mode() {
        Mode::Chase => chase_target(pursuer.kind, pursuer.tile(), pursuer.scatter_corner(), ctx),
        // Frightened pursuers wander; the corner is only kept for display
        Mode::Scatter | Mode::Frightened | Mode::Eaten => pursuer.scatter_corner(),
    }
}

/// Pick the exit direction from `tile`.
///
/// Candidates are the open neighbors in `Direction::ALL` order, minus the
/// reverse of `current` unless nothing else is open. Door tiles count only
/// when `allow_door` is set. Frightened pursuers pick uniformly at random;
/// everyone else takes the candidate closest to `target`, first in order on
/// ties. Returns `Direction::None` when boxed in.
pub fn choose_direction<R: Rng>(
    maze: &MazeGrid,
    tile: IVec2,
    current: Direction,
    target: IVec2,
    frightened: bool,
    allow_door: bool,
    rng: &mut R,
) -> Direction {
    let passable = |dir: Direction| {
        let next = tile + dir.offset();
        match maze.tile(next) {
            TileKind::GhostHouseDoor => allow_door,
            kind => kind.is_open(),
        }
    };

    let open: Vec<Direction> = Direction::ALL.into_iter().filter(|d| passable(*d)).collect();
    let reverse = current.opposite();
    let forward: Vec<Direction> = open.iter().copied().filter(|d| *d != reverse).collect();
    let candidates = if forward.is_empty() { open } else { forward };

    if candidates.is_empty() {
        return Direction::None;
    }

    if frightened {
        return candidates[rng.random_range(0..candidates.len())];
    }

    let mut best = candidates[0];
    let mut best_dist = i32::MAX;
    for dir in candidates {
        let dist = (tile + dir.offset() - target).length_squared();
        if dist < best_dist {
            best = dir;
            best_dist = dist;
        }
    }
    best
}

/// Refresh the target and, once per tile, queue the next turn.
pub fn update_pursuer<R: Rng>(
    pursuer: &mut Pursuer,
    ctx: &TargetContext,
    maze: &MazeGrid,
    rng: &mut R,
) {
    if pursuer.is_waiting() {
        return;
    }

    let target = select_target(pursuer, ctx);
    pursuer.set_target(target);

    let tile = pursuer.tile();
    let stationary = !pursuer.movement.is_moving();
    if pursuer.last_decision() == Some(tile) && !stationary {
        return;
    }

    let current = pursuer.movement.direction();
    // Leaving the house always takes the direct route out
    let wander = pursuer.is_frightened() && pursuer.house() == HouseState::Outside;
    let dir = choose_direction(
        maze,
        tile,
        current,
        target,
        wander,
        pursuer.may_use_door(),
        rng,
    );
    pursuer.set_last_decision(Some(tile));

    if dir.is_none() {
        return;
    }
    if !current.is_none() && dir == current.opposite() {
        // Dead end: run into the center, stop, and turn from standstill
        return;
    }
    pursuer.movement.queue_direction(dir);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LevelConfig, PursuerSetup};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const TILE: f32 = 16.0;

    const OPEN: [&str; 5] = ["#####", "#...#", "#...#", "#...#", "#####"];
    const DEAD_END: [&str; 3] = ["#####", "#...#", "#####"];
    const DOOR: [&str; 5] = ["#####", "#...#", "##-##", "##_##", "#####"];

    fn maze(layout: &[&str]) -> MazeGrid {
        MazeGrid::parse(layout, TILE, None).unwrap()
    }

    fn ctx(player_tile: IVec2, player_facing: Direction) -> TargetContext {
        TargetContext {
            player_tile,
            player_facing,
            shadow_tile: None,
            house_exit: IVec2::new(13, 11),
            house_home: IVec2::new(13, 14),
        }
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_ambush_target_up_quirk() {
        let ctx = ctx(IVec2::new(10, 10), Direction::Up);
        let target = chase_target(PursuerKind::Ambush, IVec2::ZERO, IVec2::ZERO, &ctx);
        assert_eq!(target, IVec2::new(6, 6));
    }

    #[test]
    fn test_ambush_target_other_facings() {
        let right = ctx(IVec2::new(10, 10), Direction::Right);
        assert_eq!(
            chase_target(PursuerKind::Ambush, IVec2::ZERO, IVec2::ZERO, &right),
            IVec2::new(14, 10)
        );
        let down = ctx(IVec2::new(10, 10), Direction::Down);
        assert_eq!(
            chase_target(PursuerKind::Ambush, IVec2::ZERO, IVec2::ZERO, &down),
            IVec2::new(10, 14)
        );
    }

    #[test]
    fn test_shadow_targets_player() {
        let ctx = ctx(IVec2::new(3, 7), Direction::Left);
        assert_eq!(
            chase_target(PursuerKind::Shadow, IVec2::ZERO, IVec2::ZERO, &ctx),
            IVec2::new(3, 7)
        );
    }

    #[test]
    fn test_fickle_mirrors_shadow_around_pivot() {
        let mut ctx = ctx(IVec2::new(10, 10), Direction::Right);
        // Without a shadow the pivot itself is the target
        assert_eq!(
            chase_target(PursuerKind::Fickle, IVec2::ZERO, IVec2::ZERO, &ctx),
            IVec2::new(12, 10)
        );
        ctx.shadow_tile = Some(IVec2::new(8, 9));
        assert_eq!(
            chase_target(PursuerKind::Fickle, IVec2::ZERO, IVec2::ZERO, &ctx),
            IVec2::new(16, 11)
        );
    }

    #[test]
    fn test_shy_retreats_when_close() {
        let ctx = ctx(IVec2::new(10, 10), Direction::Left);
        let corner = IVec2::new(0, 31);
        assert_eq!(
            chase_target(PursuerKind::Shy, IVec2::new(10, 1), corner, &ctx),
            IVec2::new(10, 10)
        );
        // Exactly 8 tiles away is not "farther than 8"
        assert_eq!(chase_target(PursuerKind::Shy, IVec2::new(10, 2), corner, &ctx), corner);
        assert_eq!(chase_target(PursuerKind::Shy, IVec2::new(11, 11), corner, &ctx), corner);
    }

    #[test]
    fn test_closest_candidate_wins() {
        let maze = maze(&OPEN);
        let dir = choose_direction(
            &maze,
            IVec2::new(2, 2),
            Direction::Right,
            IVec2::new(2, -5),
            false,
            false,
            &mut rng(),
        );
        assert_eq!(dir, Direction::Up);
    }

    #[test]
    fn test_ties_follow_enumeration_order() {
        let maze = maze(&OPEN);
        // Target on the tile itself: every neighbor is at distance 1
        let dir = choose_direction(
            &maze,
            IVec2::new(2, 2),
            Direction::Up,
            IVec2::new(2, 2),
            false,
            false,
            &mut rng(),
        );
        assert_eq!(dir, Direction::Up);

        let dir = choose_direction(
            &maze,
            IVec2::new(2, 2),
            Direction::Down,
            IVec2::new(2, 2),
            false,
            false,
            &mut rng(),
        );
        assert_eq!(dir, Direction::Down);
    }

    #[test]
    fn test_reverse_excluded_unless_only_option() {
        let maze = maze(&OPEN);
        // Target straight behind: still may not reverse
        let dir = choose_direction(
            &maze,
            IVec2::new(2, 2),
            Direction::Right,
            IVec2::new(-10, 2),
            false,
            false,
            &mut rng(),
        );
        assert_ne!(dir, Direction::Left);

        let dead_end = self::maze(&DEAD_END);
        let dir = choose_direction(
            &dead_end,
            IVec2::new(1, 1),
            Direction::Left,
            IVec2::new(-10, 1),
            false,
            false,
            &mut rng(),
        );
        assert_eq!(dir, Direction::Right);
    }

    #[test]
    fn test_door_only_when_allowed() {
        let maze = maze(&DOOR);
        let home = IVec2::new(2, 3);
        let outside = choose_direction(
            &maze,
            IVec2::new(2, 1),
            Direction::Left,
            home,
            false,
            false,
            &mut rng(),
        );
        assert_eq!(outside, Direction::Left);

        let returning = choose_direction(
            &maze,
            IVec2::new(2, 1),
            Direction::Left,
            home,
            false,
            true,
            &mut rng(),
        );
        assert_eq!(returning, Direction::Down);
    }

    #[test]
    fn test_frightened_choice_is_seeded() {
        let maze = maze(&OPEN);
        let mut a = rng();
        let mut b = rng();
        let mut seen = Vec::new();
        for _ in 0..200 {
            let da = choose_direction(
                &maze,
                IVec2::new(2, 2),
                Direction::Right,
                IVec2::ZERO,
                true,
                false,
                &mut a,
            );
            let db = choose_direction(
                &maze,
                IVec2::new(2, 2),
                Direction::Right,
                IVec2::ZERO,
                true,
                false,
                &mut b,
            );
            assert_eq!(da, db);
            assert_ne!(da, Direction::Left);
            if !seen.contains(&da) {
                seen.push(da);
            }
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_boxed_in_returns_none() {
        let maze = maze(&["###", "#.#", "###"]);
        let dir = choose_direction(
            &maze,
            IVec2::new(1, 1),
            Direction::None,
            IVec2::ZERO,
            false,
            false,
            &mut rng(),
        );
        assert_eq!(dir, Direction::None);
    }

    #[test]
    fn test_update_decides_once_per_tile() {
        let maze = maze(&OPEN);
        let level = LevelConfig::default();
        let setup = PursuerSetup {
            kind: PursuerKind::Shadow,
            spawn: IVec2::new(1, 2),
            direction: Direction::Right,
            scatter_corner: IVec2::new(3, -3),
            dwell_seconds: 0.0,
        };
        let mut pursuer = Pursuer::new(0, &setup, setup.spawn, &maze, &level, Mode::Scatter);
        let ctx = ctx(IVec2::new(3, 3), Direction::Left);
        let mut rng = rng();

        update_pursuer(&mut pursuer, &ctx, &maze, &mut rng);
        assert_eq!(pursuer.target(), IVec2::new(3, -3));
        assert_eq!(pursuer.last_decision(), Some(IVec2::new(1, 2)));
        assert_eq!(pursuer.movement.buffered(), Direction::Up);

        // Moving on the same tile: the queued turn stands
        pursuer.movement.is_moving = true;
        pursuer.movement.queue_direction(Direction::Down);
        update_pursuer(&mut pursuer, &ctx, &maze, &mut rng);
        assert_eq!(pursuer.movement.buffered(), Direction::Down);
    }

    #[test]
    fn test_waiting_pursuer_does_not_think() {
        let maze = maze(&DOOR);
        let level = LevelConfig::default();
        let setup = PursuerSetup {
            kind: PursuerKind::Shy,
            spawn: IVec2::new(2, 3),
            direction: Direction::Up,
            scatter_corner: IVec2::new(0, 0),
            dwell_seconds: 3.0,
        };
        let mut pursuer = Pursuer::new(3, &setup, setup.spawn, &maze, &level, Mode::Chase);
        update_pursuer(&mut pursuer, &ctx(IVec2::new(1, 1), Direction::Left), &maze, &mut rng());
        assert_eq!(pursuer.last_decision(), None);
        assert_eq!(pursuer.movement.buffered(), Direction::None);
    }
}
