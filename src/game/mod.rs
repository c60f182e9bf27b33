//! Core game logic module for Snake
//!
//! This module contains the simulation of a single session without any I/O or
//! rendering dependencies. Front-ends drive a [`GameSession`] with ticks and
//! commands and read [`Snapshot`]s back.

pub mod config;
pub mod direction;
pub mod error;
pub mod food;
pub mod grid;
pub mod input;
pub mod rng;
pub mod session;
pub mod snake;
pub mod state;

// Re-export commonly used types
pub use config::{GameConfig, MAX_SPEED_LEVEL, MIN_SPEED_LEVEL};
pub use direction::Direction;
pub use error::{GameError, NoFreeCellError};
pub use food::{Food, FoodKind, FoodSpawner};
pub use grid::{Grid, Position};
pub use input::InputTranslator;
pub use rng::{RandomSource, SessionRng};
pub use session::GameSession;
pub use snake::Snake;
pub use state::{EndReason, GameEvent, SessionState, Snapshot};
