//! Direction vocabulary and the per-agent turn buffer

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// One of the four grid directions, or no direction at all.
///
/// Screen convention: y grows downward, so `Up` is `(0, -1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    /// Fixed enumeration order used wherever directions are scanned
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step in tile space
    #[inline]
    pub const fn offset(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
            Direction::None => IVec2::ZERO,
        }
    }

    /// Unit vector in pixel space
    #[inline]
    pub fn vector(self) -> Vec2 {
        self.offset().as_vec2()
    }

    /// Sprite rotation in radians (Right = 0, clockwise in screen space)
    pub fn angle(self) -> f32 {
        use std::f32::consts::{FRAC_PI_2, PI};
        match self {
            Direction::Right | Direction::None => 0.0,
            Direction::Down => FRAC_PI_2,
            Direction::Left => PI,
            Direction::Up => -FRAC_PI_2,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self == Direction::None
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Current heading plus at most one pending turn.
///
/// Turns are only promoted at tile centers by the movement engine; a reversal
/// is the one request that takes effect immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DirectionBuffer {
    current: Direction,
    buffered: Direction,
}

impl DirectionBuffer {
    pub fn new(current: Direction) -> Self {
        Self {
            current,
            buffered: Direction::None,
        }
    }

    #[inline]
    pub fn current(&self) -> Direction {
        self.current
    }

    #[inline]
    pub fn buffered(&self) -> Direction {
        self.buffered
    }

    /// Request a direction change.
    ///
    /// The exact opposite of the current heading is applied at once; anything
    /// else waits in the buffer, replacing any earlier pending turn.
    pub fn queue(&mut self, dir: Direction) {
        if dir != Direction::None && dir == self.current.opposite() {
            self.apply(dir);
        } else {
            self.buffered = dir;
        }
    }

    /// Promote the buffered turn if `can_move` accepts it.
    pub fn apply_if_can_move(&mut self, can_move: impl FnOnce(Direction) -> bool) -> bool {
        if self.buffered == Direction::None || !can_move(self.buffered) {
            return false;
        }
        self.current = self.buffered;
        self.buffered = Direction::None;
        true
    }

    /// Set the heading unconditionally and drop any pending turn
    pub fn apply(&mut self, dir: Direction) {
        self.current = dir;
        self.buffered = Direction::None;
    }

    /// Drop the heading but keep the pending turn
    pub fn stop(&mut self) {
        self.current = Direction::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for dir in Direction::ALL {
            assert_ne!(dir.opposite(), dir);
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.offset() + dir.opposite().offset(), IVec2::ZERO);
        }
        assert_eq!(Direction::None.opposite(), Direction::None);
    }

    #[test]
    fn test_queue_reversal_applies_immediately() {
        for dir in Direction::ALL {
            let mut buffer = DirectionBuffer::new(dir);
            // A pending right-angle turn is dropped by the reversal
            let turn = Direction::ALL
                .into_iter()
                .find(|d| d.offset().dot(dir.offset()) == 0)
                .unwrap();
            buffer.queue(turn);
            assert_eq!(buffer.buffered(), turn);
            buffer.queue(dir.opposite());
            assert_eq!(buffer.current(), dir.opposite());
            assert_eq!(buffer.buffered(), Direction::None);
        }
    }

    #[test]
    fn test_queue_turn_is_buffered() {
        let mut buffer = DirectionBuffer::new(Direction::Left);
        buffer.queue(Direction::Up);
        assert_eq!(buffer.current(), Direction::Left);
        assert_eq!(buffer.buffered(), Direction::Up);

        // Later request replaces the pending one
        buffer.queue(Direction::Down);
        assert_eq!(buffer.buffered(), Direction::Down);
    }

    #[test]
    fn test_queue_from_standstill_is_buffered() {
        let mut buffer = DirectionBuffer::new(Direction::None);
        buffer.queue(Direction::Right);
        assert_eq!(buffer.current(), Direction::None);
        assert_eq!(buffer.buffered(), Direction::Right);
    }

    #[test]
    fn test_apply_if_can_move() {
        let mut buffer = DirectionBuffer::new(Direction::Left);
        buffer.queue(Direction::Up);

        assert!(!buffer.apply_if_can_move(|_| false));
        assert_eq!(buffer.current(), Direction::Left);
        assert_eq!(buffer.buffered(), Direction::Up);

        assert!(buffer.apply_if_can_move(|d| d == Direction::Up));
        assert_eq!(buffer.current(), Direction::Up);
        assert_eq!(buffer.buffered(), Direction::None);

        // Nothing pending: predicate is never consulted
        assert!(!buffer.apply_if_can_move(|_| panic!("should not be called")));
    }

    #[test]
    fn test_apply_clears_buffer() {
        let mut buffer = DirectionBuffer::new(Direction::Left);
        buffer.queue(Direction::Down);
        buffer.apply(Direction::Right);
        assert_eq!(buffer.current(), Direction::Right);
        assert_eq!(buffer.buffered(), Direction::None);
    }
}
