use std::collections::{HashSet, VecDeque};

use super::direction::Direction;
use super::grid::{Grid, Position};

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at the front
    body: VecDeque<Position>,
    /// Current direction of movement
    direction: Direction,
    /// Cells still to be added, at most one per advance
    pending_growth: u32,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    ///
    /// The body trails behind the head, opposite to `direction`.
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.opposite().delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(dx * i, dy * i))
            .collect();

        Self {
            body,
            direction,
            pending_growth: 0,
        }
    }

    /// Build a snake from explicit segments, head first
    ///
    /// Returns `None` for an empty body or one with overlapping segments.
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Option<Self> {
        let unique: HashSet<&Position> = segments.iter().collect();
        if segments.is_empty() || unique.len() != segments.len() {
            return None;
        }

        Some(Self {
            body: segments.into(),
            direction,
            pending_growth: 0,
        })
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_growth(&self) -> u32 {
        self.pending_growth
    }

    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Candidate head cell one step in `direction`
    pub fn next_head(&self, direction: Direction) -> Position {
        self.head().moved_in_direction(direction)
    }

    /// Whether moving the head onto `candidate` hits the body
    ///
    /// The tail only counts when it stays put this tick, i.e. when the snake
    /// grows. Otherwise it is vacated as the head moves in.
    pub fn collides_with_self(&self, candidate: Position, grows: bool) -> bool {
        let checked = if grows {
            self.body.len()
        } else {
            self.body.len() - 1
        };

        self.body.iter().take(checked).any(|&segment| segment == candidate)
    }

    pub fn collides_with_wall(&self, candidate: Position, grid: &Grid) -> bool {
        !grid.is_in_bounds(candidate)
    }

    /// Queue one cell of growth
    pub fn grow(&mut self) {
        self.pending_growth += 1;
    }

    /// Commit a move, keeping the tail if `grew`
    pub fn advance(&mut self, direction: Direction, grew: bool) {
        let new_head = self.next_head(direction);
        self.body.push_front(new_head);
        self.direction = direction;

        if grew {
            self.pending_growth = self.pending_growth.saturating_sub(1);
        } else {
            self.body.pop_back();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Whether the body has no segments
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
