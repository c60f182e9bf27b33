//! Interactive terminal play
//!
//! Drives a [`GameSession`] from a tokio timer at the session's tick
//! interval while crossterm key events feed directions, pause and speed
//! changes into it. Finished games go to the leaderboard; speed changes are
//! written back to the settings file on exit.

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{error, info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::panic;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::time::{Interval, MissedTickBehavior, interval};

use crate::game::{
    FoodKind, GameEvent, GameSession, SessionRng, SessionState, MAX_SPEED_LEVEL, MIN_SPEED_LEVEL,
};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Notice, Overlay, Renderer};
use crate::storage::{Leaderboard, Settings};

/// Countdown shown before a game starts or resumes
const COUNTDOWN: Duration = Duration::from_secs(3);

/// How long a bonus notice stays in the header
const NOTICE_DURATION: Duration = Duration::from_secs(2);

/// Everything the play mode needs from the command line
#[derive(Debug, Clone)]
pub struct PlayOptions {
    pub settings: Settings,
    pub settings_path: PathBuf,
    pub leaderboard_path: PathBuf,
    pub username: String,
    /// Fixed seed for reproducible food placement
    pub seed: Option<u64>,
}

pub struct PlayMode {
    options: PlayOptions,
    session: GameSession,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    leaderboard: Leaderboard,
    should_quit: bool,
    settings_changed: bool,
    countdown_until: Option<Instant>,
    /// Whether the current session's score went to the leaderboard
    recorded: bool,
    rank: Option<usize>,
    notice: Option<(Notice, Instant)>,
}

impl PlayMode {
    pub fn new(options: PlayOptions) -> Result<Self> {
        let leaderboard = Leaderboard::load_or_default(&options.leaderboard_path);
        let metrics = GameMetrics::with_best_score(leaderboard.best_score().unwrap_or(0));
        let session = Self::new_session(&options, 0)?;

        let mut mode = Self {
            options,
            session,
            metrics,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            leaderboard,
            should_quit: false,
            settings_changed: false,
            countdown_until: None,
            recorded: false,
            rank: None,
            notice: None,
        };
        mode.begin_countdown();

        Ok(mode)
    }

    fn new_session(options: &PlayOptions, games_played: u32) -> Result<GameSession> {
        let config = options.settings.game_config();
        let session = match options.seed {
            Some(seed) => GameSession::with_rng(
                config,
                SessionRng::new(seed.wrapping_add(games_played as u64)),
            ),
            None => GameSession::start(config),
        };
        session.context("Failed to start a game session")
    }

    pub async fn run(&mut self) -> Result<()> {
        install_panic_hook();

        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal).await;

        restore_terminal()?;
        self.save_settings();

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = self.tick_timer();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_countdown();
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.update_countdown();
                    self.metrics.update();
                    let snapshot = self.session.snapshot();
                    let overlay = self.overlay();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics, overlay);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn tick_timer(&self) -> Interval {
        let mut timer = interval(self.session.tick_interval());
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        timer
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer(direction) => self.session.submit_direction(direction),
                KeyAction::TogglePause => self.toggle_pause(),
                KeyAction::SpeedUp => self.change_speed(1, tick_timer),
                KeyAction::SpeedDown => self.change_speed(-1, tick_timer),
                KeyAction::Restart => self.restart(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    fn overlay(&self) -> Overlay {
        let countdown = self.countdown_until.map(|until| {
            let left = until.saturating_duration_since(Instant::now());
            // Round up so the display reads 3, 2, 1
            left.as_secs() + u64::from(left.subsec_nanos() > 0)
        });

        let notice = self
            .notice
            .filter(|(_, until)| Instant::now() < *until)
            .map(|(notice, _)| notice);

        Overlay {
            countdown,
            rank: self.rank,
            notice,
        }
    }

    /// Hold the session paused for [`COUNTDOWN`] before it runs
    fn begin_countdown(&mut self) {
        if self.session.state() == SessionState::Ended {
            return;
        }
        if self.session.state() == SessionState::Running {
            self.session.toggle_pause();
        }
        self.metrics.on_pause();
        self.countdown_until = Some(Instant::now() + COUNTDOWN);
    }

    fn update_countdown(&mut self) {
        let Some(until) = self.countdown_until else {
            return;
        };
        if Instant::now() < until {
            return;
        }

        self.countdown_until = None;
        if self.session.state() == SessionState::Paused {
            self.session.toggle_pause();
            self.metrics.on_resume();
        }
    }

    fn toggle_pause(&mut self) {
        if self.countdown_until.take().is_some() {
            // Pausing again during the countdown keeps the game paused
            return;
        }

        match self.session.state() {
            SessionState::Running => {
                self.session.toggle_pause();
                self.metrics.on_pause();
            }
            SessionState::Paused => self.begin_countdown(),
            SessionState::Ended => {}
        }
    }

    fn change_speed(&mut self, step: i8, tick_timer: &mut Interval) {
        let current = self.session.speed_level() as i16;
        let level = (current + step as i16).clamp(MIN_SPEED_LEVEL as i16, MAX_SPEED_LEVEL as i16) as u8;

        if let Err(e) = self.session.set_speed_level(level) {
            warn!("Ignoring speed change: {}", e);
            return;
        }

        if level != self.options.settings.speed_level {
            self.options.settings.speed_level = level;
            self.settings_changed = true;
        }
        *tick_timer = self.tick_timer();
    }

    fn update_game(&mut self) {
        let snapshot = self.session.tick();
        self.note_events(&snapshot.events);

        if self.recorded {
            return;
        }
        if let Some(final_score) = self.session.final_score() {
            self.recorded = true;
            if self.metrics.on_game_over(final_score) {
                info!("New best score: {}", final_score);
            }

            match self.leaderboard.record(&self.options.username, final_score) {
                Ok(rank) => self.rank = rank,
                Err(e) => error!("Failed to save leaderboard: {:#}", e),
            }
        }
    }

    /// Turn bonus food events into a header notice
    fn note_events(&mut self, events: &[GameEvent]) {
        for event in events {
            let notice = match event {
                GameEvent::FoodEaten {
                    kind: FoodKind::Special,
                    value,
                } => Notice::BonusEaten(*value),
                GameEvent::SpecialExpired { .. } => Notice::BonusMissed,
                _ => continue,
            };
            self.notice = Some((notice, Instant::now() + NOTICE_DURATION));
        }
    }

    fn restart(&mut self) {
        match Self::new_session(&self.options, self.metrics.games_played) {
            Ok(session) => {
                self.session = session;
                self.metrics.on_game_start();
                self.recorded = false;
                self.rank = None;
                self.notice = None;
                self.countdown_until = None;
                self.begin_countdown();
            }
            Err(e) => error!("Failed to restart: {:#}", e),
        }
    }

    fn save_settings(&mut self) {
        if !self.settings_changed {
            return;
        }
        match self.options.settings.save(&self.options.settings_path) {
            Ok(()) => self.settings_changed = false,
            Err(e) => warn!("Failed to save settings: {:#}", e),
        }
    }
}

/// Leave raw mode and the alternate screen
fn restore_terminal() -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(stderr(), LeaveAlternateScreen, Show).context("Failed to leave alternate screen")?;
    Ok(())
}

/// Restore the terminal before the panic message is printed
fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if let Err(e) = restore_terminal() {
            error!("Failed to restore terminal after panic: {:#}", e);
        }
        previous(info);
    }));
}
