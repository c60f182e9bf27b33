use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{EndReason, FoodKind, Position, SessionState, Snapshot};
use crate::metrics::GameMetrics;

/// Special food starts blinking when this few ticks remain
const SPECIAL_WARNING_TICKS: u32 = 10;

/// Short-lived message shown in the header after a game event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// A special food was eaten for this many points
    BonusEaten(u32),
    BonusMissed,
}

/// Front-end state layered over the game snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overlay {
    /// Seconds left before the game (re)starts
    pub countdown: Option<u64>,
    /// Leaderboard rank reached by the finished game, 0-based
    pub rank: Option<usize>,
    pub notice: Option<Notice>,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &Snapshot,
        metrics: &GameMetrics,
        overlay: Overlay,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(snapshot, metrics, overlay.notice);
        frame.render_widget(stats, chunks[0]);

        let game_area = chunks[1];

        match snapshot.end_reason {
            Some(reason) => {
                let game_over = self.render_game_over(snapshot, reason, overlay.rank);
                frame.render_widget(game_over, game_area);
            }
            None => {
                let grid = self.render_grid(snapshot);
                frame.render_widget(grid, game_area);

                if let Some(seconds) = overlay.countdown {
                    self.render_banner(frame, game_area, &seconds.to_string(), Color::Yellow);
                } else if snapshot.state == SessionState::Paused {
                    self.render_banner(frame, game_area, "PAUSED", Color::Cyan);
                }
            }
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn cell(&self, snapshot: &Snapshot, pos: Position) -> Span<'static> {
        if snapshot.head() == Some(pos) {
            return Span::styled(
                "■ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        }
        if snapshot.segments.contains(&pos) {
            return Span::styled("□ ", Style::default().fg(Color::Green));
        }

        match snapshot.food_at(pos) {
            Some(food) if food.kind == FoodKind::Special => {
                let mut style = Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD);
                if food.lifetime.unwrap_or(0) <= SPECIAL_WARNING_TICKS {
                    style = style.add_modifier(Modifier::SLOW_BLINK);
                }
                Span::styled("★ ", style)
            }
            Some(_) => Span::styled(
                "O ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            None => Span::styled(". ", Style::default().fg(Color::DarkGray)),
        }
    }

    fn render_grid(&self, snapshot: &Snapshot) -> Paragraph<'static> {
        let lines: Vec<Line> = (0..snapshot.grid_height)
            .map(|y| {
                let spans: Vec<Span> = (0..snapshot.grid_width)
                    .map(|x| self.cell(snapshot, Position::new(x as i32, y as i32)))
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(
        &self,
        snapshot: &Snapshot,
        metrics: &GameMetrics,
        notice: Option<Notice>,
    ) -> Paragraph<'static> {
        let mut spans = vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.best_score.max(snapshot.score).to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Speed: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.speed_level.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ];

        if let Some(lifetime) = snapshot.special_food().and_then(|food| food.lifetime) {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                format!("★ {}", lifetime),
                Style::default().fg(Color::Yellow),
            ));
        }

        match notice {
            Some(Notice::BonusEaten(value)) => {
                spans.push(Span::raw("    "));
                spans.push(Span::styled(
                    format!("Bonus +{}", value),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ));
            }
            Some(Notice::BonusMissed) => {
                spans.push(Span::raw("    "));
                spans.push(Span::styled(
                    "Bonus missed",
                    Style::default().fg(Color::Red),
                ));
            }
            None => {}
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    /// Small centred box over the board
    fn render_banner(&self, frame: &mut Frame, area: Rect, text: &str, color: Color) {
        let width = (text.chars().count() as u16 + 6).min(area.width);
        let height = 3.min(area.height);
        let banner_area = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };

        let banner = Paragraph::new(Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );

        frame.render_widget(Clear, banner_area);
        frame.render_widget(banner, banner_area);
    }

    fn render_game_over(
        &self,
        snapshot: &Snapshot,
        reason: EndReason,
        rank: Option<usize>,
    ) -> Paragraph<'static> {
        let (title, color) = if reason.is_win() {
            ("YOU WIN", Color::Green)
        } else {
            ("GAME OVER", Color::Red)
        };

        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )]),
            Line::from(vec![Span::styled(
                reason.describe(),
                Style::default().fg(Color::Gray),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if let Some(rank) = rank {
            text.push(Line::from(vec![Span::styled(
                format!("Leaderboard position #{}", rank + 1),
                Style::default().fg(Color::Cyan),
            )]));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("P", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("+/-", Style::default().fg(Color::Cyan)),
            Span::raw(" speed | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
