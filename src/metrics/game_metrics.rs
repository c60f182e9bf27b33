use std::time::{Duration, Instant};

/// Per-run statistics shown next to the board
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub games_played: u32,
    /// Set while the game is paused; paused time is not counted
    paused_at: Option<Instant>,
    paused_total: Duration,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            best_score: 0,
            games_played: 0,
            paused_at: None,
            paused_total: Duration::ZERO,
        }
    }

    /// Start from an existing best, e.g. the top of the leaderboard
    pub fn with_best_score(best_score: u32) -> Self {
        Self {
            best_score,
            ..Self::new()
        }
    }

    pub fn update(&mut self) {
        let paused_now = self
            .paused_at
            .map(|at| at.elapsed())
            .unwrap_or(Duration::ZERO);
        self.elapsed_time = self
            .start_time
            .elapsed()
            .saturating_sub(self.paused_total + paused_now);
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.paused_at = None;
        self.paused_total = Duration::ZERO;
    }

    pub fn on_pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(Instant::now());
        }
    }

    pub fn on_resume(&mut self) {
        if let Some(at) = self.paused_at.take() {
            self.paused_total += at.elapsed();
        }
    }

    /// Record a finished game; returns true on a new best score
    pub fn on_game_over(&mut self, final_score: u32) -> bool {
        self.update();
        self.games_played += 1;
        if final_score > self.best_score {
            self.best_score = final_score;
            return true;
        }
        false
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
