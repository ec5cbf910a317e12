//! Grid coordinates

use serde::{Deserialize, Serialize};

/// Position on the map
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

impl Position {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Chebyshev grid distance: the number of king moves between two cells
    pub const fn distance(&self, other: Position) -> i32 {
        let dx = (self.x as i32 - other.x as i32).abs();
        let dy = (self.y as i32 - other.y as i32).abs();
        if dx > dy { dx } else { dy }
    }

    /// Calculate distance squared to another position
    pub const fn distance_sq(&self, other: Position) -> i32 {
        let dx = (self.x - other.x) as i32;
        let dy = (self.y - other.y) as i32;
        dx * dx + dy * dy
    }

    /// Check if adjacent (including diagonals)
    pub const fn is_adjacent(&self, other: Position) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx <= 1 && dy <= 1 && (dx > 0 || dy > 0)
    }

    /// Offset by a delta, saturating at the i8 boundary
    pub const fn offset(&self, dx: i8, dy: i8) -> Position {
        Position {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_chebyshev() {
        let origin = Position::new(10, 10);
        assert_eq!(origin.distance(Position::new(10, 10)), 0);
        assert_eq!(origin.distance(Position::new(13, 10)), 3);
        assert_eq!(origin.distance(Position::new(13, 12)), 3);
        assert_eq!(origin.distance(Position::new(7, 14)), 4);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = Position::new(3, 17);
        let b = Position::new(12, 2);
        assert_eq!(a.distance(b), b.distance(a));
    }

    #[test]
    fn test_adjacency() {
        let p = Position::new(5, 5);
        assert!(p.is_adjacent(Position::new(6, 6)));
        assert!(p.is_adjacent(Position::new(4, 5)));
        assert!(!p.is_adjacent(p));
        assert!(!p.is_adjacent(Position::new(7, 5)));
    }
}
