//! Files kept between runs: settings and the leaderboard

pub mod leaderboard;
pub mod settings;

pub use leaderboard::{Leaderboard, ScoreEntry, MAX_ENTRIES};
pub use settings::Settings;
