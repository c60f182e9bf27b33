//! Local high-score table
//!
//! Scores are kept per player (names compare case-insensitively), sorted
//! best first and capped at [`MAX_ENTRIES`]. The table lives in a small JSON
//! file next to the settings.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Number of entries kept on the board
pub const MAX_ENTRIES: usize = 10;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One row of the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub username: String,
    pub score: u32,
    /// When the score was set, `YYYY-MM-DD HH:MM`
    pub date: String,
}

/// High scores backed by a JSON file
#[derive(Debug, Clone)]
pub struct Leaderboard {
    path: PathBuf,
    entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    /// Load the board stored at `path`
    ///
    /// A missing file yields an empty board; an unreadable or malformed one
    /// is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read leaderboard from {:?}", path))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse leaderboard {:?}", path))?
        } else {
            Vec::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Like [`Leaderboard::load`], but starts empty if the file cannot be used
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("Starting with an empty leaderboard: {:#}", e);
            Self {
                path: path.to_path_buf(),
                entries: Vec::new(),
            }
        })
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Highest score on the board
    pub fn best_score(&self) -> Option<u32> {
        self.entries.first().map(|entry| entry.score)
    }

    /// Insert a score dated `at`
    ///
    /// A player already on the board keeps a single row, replaced only by a
    /// strictly higher score. Returns the player's rank (0-based) if they are
    /// on the board afterwards.
    pub fn add_score_at(&mut self, username: &str, score: u32, at: NaiveDateTime) -> Option<usize> {
        let date = at.format(DATE_FORMAT).to_string();
        let existing = self
            .entries
            .iter_mut()
            .find(|entry| entry.username.to_lowercase() == username.to_lowercase());

        match existing {
            Some(entry) => {
                if score > entry.score {
                    entry.score = score;
                    entry.date = date;
                }
            }
            None => self.entries.push(ScoreEntry {
                username: username.to_string(),
                score,
                date,
            }),
        }

        // Stable sort keeps earlier holders ahead on ties
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);

        self.entries
            .iter()
            .position(|entry| entry.username.to_lowercase() == username.to_lowercase())
    }

    pub fn add_score(&mut self, username: &str, score: u32) -> Option<usize> {
        self.add_score_at(username, score, Local::now().naive_local())
    }

    /// Add a score and write the board back to disk
    pub fn record(&mut self, username: &str, score: u32) -> Result<Option<usize>> {
        let rank = self.add_score(username, score);
        self.save()?;
        Ok(rank)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let json = serde_json::to_string_pretty(&self.entries)
            .context("Failed to serialize leaderboard")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write leaderboard to {:?}", self.path))?;

        Ok(())
    }
}
