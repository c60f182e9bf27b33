use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::GameError;

/// Slowest selectable speed
pub const MIN_SPEED_LEVEL: u8 = 1;
/// Fastest selectable speed
pub const MAX_SPEED_LEVEL: u8 = 10;

/// Tick interval for a speed level; higher levels tick faster
///
/// Level 1 runs at 10 ticks per second, each level adds two more.
pub fn tick_interval(speed_level: u8) -> Duration {
    let level = speed_level.clamp(MIN_SPEED_LEVEL, MAX_SPEED_LEVEL) as u64;
    Duration::from_millis(1000 / (8 + 2 * level))
}

/// Reject speed levels outside `MIN_SPEED_LEVEL..=MAX_SPEED_LEVEL`
pub fn validate_speed_level(speed_level: u8) -> Result<(), GameError> {
    if !(MIN_SPEED_LEVEL..=MAX_SPEED_LEVEL).contains(&speed_level) {
        return Err(GameError::InvalidConfiguration(format!(
            "speed level must be between {} and {}, got {}",
            MIN_SPEED_LEVEL, MAX_SPEED_LEVEL, speed_level
        )));
    }
    Ok(())
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Speed level, see [`tick_interval`]
    pub speed_level: u8,

    // Scoring
    /// Points for a normal food
    pub normal_food_value: u32,
    /// Points for a special food
    pub special_food_value: u32,

    // Special food cadence
    /// Ticks without a special food before the next one appears
    pub special_spawn_interval: u32,
    /// Ticks a special food stays on the board before expiring
    pub special_lifetime: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 20,
            initial_snake_length: 3,
            speed_level: 3,
            normal_food_value: 10,
            special_food_value: 20,
            special_spawn_interval: 40,
            special_lifetime: 50,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Builder-style speed override
    pub fn with_speed_level(mut self, speed_level: u8) -> Self {
        self.speed_level = speed_level;
        self
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    pub fn tick_interval(&self) -> Duration {
        tick_interval(self.speed_level)
    }

    /// Check every value a session depends on
    pub fn validate(&self) -> Result<(), GameError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(GameError::InvalidConfiguration(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if i32::try_from(self.grid_width).is_err() || i32::try_from(self.grid_height).is_err() {
            return Err(GameError::InvalidConfiguration(
                "grid dimensions are too large".to_string(),
            ));
        }
        if self.initial_snake_length == 0 {
            return Err(GameError::InvalidConfiguration(
                "initial snake length must be at least 1".to_string(),
            ));
        }
        // The snake starts at the centre with its body trailing left
        if self.initial_snake_length - 1 > self.grid_width / 2 {
            return Err(GameError::InvalidConfiguration(format!(
                "a snake of length {} does not fit on a grid {} cells wide",
                self.initial_snake_length, self.grid_width
            )));
        }
        validate_speed_level(self.speed_level)?;
        if self.special_spawn_interval == 0 || self.special_lifetime == 0 {
            return Err(GameError::InvalidConfiguration(
                "special food interval and lifetime must be at least 1 tick".to_string(),
            ));
        }
        Ok(())
    }
}
