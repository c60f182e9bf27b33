use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::direction::Direction;
use super::error::NoFreeCellError;
use super::rng::RandomSource;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// Fixed-size playing field, immutable for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
}

impl Grid {
    /// Dimensions are validated by `GameConfig::validate` before a grid is built.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn center(&self) -> Position {
        Position::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    /// Iterate every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| Position::new(x as i32, y as i32)))
    }

    /// Pick a uniformly random cell not contained in `excluding`
    pub fn random_free_position<R: RandomSource + ?Sized>(
        &self,
        excluding: &HashSet<Position>,
        rng: &mut R,
    ) -> Result<Position, NoFreeCellError> {
        let free: Vec<Position> = self
            .cells()
            .filter(|pos| !excluding.contains(pos))
            .collect();

        if free.is_empty() {
            return Err(NoFreeCellError);
        }

        Ok(free[rng.index(free.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::rng::SessionRng;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_in_direction(Direction::Down), Position::new(5, 6));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_bounds_checking() {
        let grid = Grid::new(20, 20);

        assert!(grid.is_in_bounds(Position::new(0, 0)));
        assert!(grid.is_in_bounds(Position::new(19, 19)));
        assert!(!grid.is_in_bounds(Position::new(-1, 0)));
        assert!(!grid.is_in_bounds(Position::new(20, 0)));
        assert!(!grid.is_in_bounds(Position::new(0, 20)));
    }

    #[test]
    fn test_center() {
        assert_eq!(Grid::new(5, 5).center(), Position::new(2, 2));
        assert_eq!(Grid::new(4, 3).center(), Position::new(2, 1));
    }

    #[test]
    fn test_random_free_position_skips_excluded() {
        let grid = Grid::new(3, 3);
        let excluding: HashSet<Position> = grid
            .cells()
            .filter(|pos| *pos != Position::new(2, 1))
            .collect();
        let mut rng = SessionRng::new(7);

        for _ in 0..10 {
            assert_eq!(
                grid.random_free_position(&excluding, &mut rng),
                Ok(Position::new(2, 1))
            );
        }
    }

    #[test]
    fn test_random_free_position_stays_in_bounds() {
        let grid = Grid::new(4, 6);
        let mut rng = SessionRng::new(1);
        let excluding = HashSet::new();

        for _ in 0..100 {
            let pos = grid.random_free_position(&excluding, &mut rng).unwrap();
            assert!(grid.is_in_bounds(pos));
        }
    }

    #[test]
    fn test_full_grid_has_no_free_cell() {
        let grid = Grid::new(2, 2);
        let excluding: HashSet<Position> = grid.cells().collect();
        let mut rng = SessionRng::new(0);

        assert_eq!(
            grid.random_free_position(&excluding, &mut rng),
            Err(NoFreeCellError)
        );
    }
}
