use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::food::{Food, FoodKind};
use super::grid::Position;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Running,
    Paused,
    /// Terminal: further ticks and pause toggles are ignored
    Ended,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// Snake hit itself
    SelfCollision,
    /// Snake hit a wall
    WallCollision,
    /// No free cell left for food: the board is full
    BoardFilled,
}

impl EndReason {
    /// Filling the board is the only way to win
    pub fn is_win(&self) -> bool {
        matches!(self, EndReason::BoardFilled)
    }

    pub fn describe(&self) -> &'static str {
        match self {
            EndReason::SelfCollision => "You ran into yourself",
            EndReason::WallCollision => "You hit the wall",
            EndReason::BoardFilled => "You filled the board",
        }
    }
}

/// Something observable that happened during a tick or command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    FoodEaten { kind: FoodKind, value: u32 },
    FoodSpawned { kind: FoodKind, position: Position },
    /// A special food ran out of time without being eaten
    SpecialExpired { position: Position },
    Paused,
    Resumed,
    SessionEnded { reason: EndReason, final_score: u32 },
}

/// Read-only view of a session handed to renderers and other consumers
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Ticks processed so far
    pub tick: u64,
    pub grid_width: usize,
    pub grid_height: usize,
    /// Snake segments, head first
    pub segments: Vec<Position>,
    pub direction: Direction,
    pub food: Vec<Food>,
    pub score: u32,
    pub state: SessionState,
    pub end_reason: Option<EndReason>,
    pub speed_level: u8,
    /// Events produced since the previous snapshot
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    pub fn head(&self) -> Option<Position> {
        self.segments.first().copied()
    }

    pub fn food_at(&self, position: Position) -> Option<&Food> {
        self.food.iter().find(|food| food.position == position)
    }

    pub fn special_food(&self) -> Option<&Food> {
        self.food.iter().find(|food| food.kind == FoodKind::Special)
    }

    pub fn is_over(&self) -> bool {
        self.state == SessionState::Ended
    }

    pub fn has_event(&self, predicate: impl Fn(&GameEvent) -> bool) -> bool {
        self.events.iter().any(predicate)
    }
}
