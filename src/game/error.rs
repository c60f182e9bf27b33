use std::fmt;

/// Errors surfaced by the game core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// A configuration value was rejected before a session could start
    InvalidConfiguration(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidConfiguration(reason) => {
                write!(f, "Invalid configuration: {}", reason)
            }
        }
    }
}

impl std::error::Error for GameError {}

/// Every cell of the grid is excluded from placement
///
/// Only reachable once the snake fills the board. The session maps it to
/// [`EndReason::BoardFilled`](super::EndReason::BoardFilled).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoFreeCellError;

impl fmt::Display for NoFreeCellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No free cell left on the grid")
    }
}

impl std::error::Error for NoFreeCellError {}
