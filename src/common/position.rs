use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell on the grid. North is `y + 1`, east is `x + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn step(&self, direction: Direction) -> Position {
        let (dx, dy) = direction.offset();
        Position::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan_distance(&self, other: &Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn is_adjacent_or_same(&self, other: &Position) -> bool {
        self.x.abs_diff(other.x) <= 1 && self.y.abs_diff(other.y) <= 1
    }
}

impl From<[i32; 2]> for Position {
    fn from([x, y]: [i32; 2]) -> Self {
        Position::new(x, y)
    }
}

impl From<Position> for [i32; 2] {
    fn from(position: Position) -> Self {
        [position.x, position.y]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Stay,
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    // Callers pass single-step moves; farther targets reduce to the sign of each delta.
    pub fn between(from: Position, to: Position) -> Direction {
        let dx = (i64::from(to.x) - i64::from(from.x)).signum();
        let dy = (i64::from(to.y) - i64::from(from.y)).signum();
        match (dx, dy) {
            (0, 0) => Direction::Stay,
            (0, 1) => Direction::North,
            (0, -1) => Direction::South,
            (1, 0) => Direction::East,
            (-1, 0) => Direction::West,
            (1, 1) => Direction::NorthEast,
            (-1, 1) => Direction::NorthWest,
            (1, -1) => Direction::SouthEast,
            (-1, -1) => Direction::SouthWest,
            _ => unreachable!(),
        }
    }

    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::Stay => (0, 0),
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, 1),
            Direction::NorthWest => (-1, 1),
            Direction::SouthEast => (1, -1),
            Direction::SouthWest => (-1, -1),
        }
    }

    pub fn is_cardinal(&self) -> bool {
        matches!(
            self,
            Direction::North | Direction::South | Direction::East | Direction::West
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_between() {
        let origin = Position::new(3, 3);

        assert_eq!(Direction::between(origin, origin), Direction::Stay);
        assert_eq!(Direction::between(origin, Position::new(3, 4)), Direction::North);
        assert_eq!(Direction::between(origin, Position::new(3, 2)), Direction::South);
        assert_eq!(Direction::between(origin, Position::new(4, 3)), Direction::East);
        assert_eq!(Direction::between(origin, Position::new(2, 3)), Direction::West);
        assert_eq!(Direction::between(origin, Position::new(4, 4)), Direction::NorthEast);
        assert_eq!(Direction::between(origin, Position::new(2, 4)), Direction::NorthWest);
        assert_eq!(Direction::between(origin, Position::new(4, 2)), Direction::SouthEast);
        assert_eq!(Direction::between(origin, Position::new(2, 2)), Direction::SouthWest);
    }

    #[test]
    fn test_step_inverts_between() {
        let origin = Position::new(0, 0);
        for direction in [
            Direction::Stay,
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
            Direction::NorthEast,
            Direction::NorthWest,
            Direction::SouthEast,
            Direction::SouthWest,
        ] {
            assert_eq!(Direction::between(origin, origin.step(direction)), direction);
        }

        // Negative coordinates are valid neighbours of the origin.
        assert_eq!(origin.step(Direction::West), Position::new(-1, 0));
    }

    #[test]
    fn test_direction_between_extreme_coordinates() {
        let low = Position::new(i32::MIN, i32::MIN);
        let high = Position::new(i32::MAX, i32::MAX);

        assert_eq!(Direction::between(low, high), Direction::NorthEast);
        assert_eq!(Direction::between(high, low), Direction::SouthWest);
        assert_eq!(
            Direction::between(Position::new(i32::MIN, 0), Position::new(i32::MAX, 0)),
            Direction::East
        );
    }

    #[test]
    fn test_cardinal() {
        assert!(Direction::North.is_cardinal());
        assert!(Direction::West.is_cardinal());
        assert!(!Direction::Stay.is_cardinal());
        assert!(!Direction::SouthEast.is_cardinal());
    }

    #[test]
    fn test_distance_and_adjacency() {
        let a = Position::new(0, 0);
        let b = Position::from([2, -1]);

        assert_eq!(a.manhattan_distance(&b), 3);
        assert!(!a.is_adjacent_or_same(&b));
        assert!(a.is_adjacent_or_same(&Position::new(1, 1)));
        assert!(a.is_adjacent_or_same(&a));
        assert_eq!(<[i32; 2]>::from(b), [2, -1]);
        assert_eq!(b.to_string(), "(2, -1)");
    }
}
