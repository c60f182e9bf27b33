//! Arcade Snake - a terminal snake game with timed bonus food
//!
//! This library provides:
//! - Core game logic (game module): grid, snake, food, input and the session state machine
//! - Settings and leaderboard persistence (storage module)
//! - TUI rendering (render module) and key mapping (input module)
//! - The interactive play mode (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod storage;
