use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GamePhase, GameState, Position};
use crate::metrics::{format_time, GameMetrics};

/// Draws a [`GameState`] snapshot; holds no game state of its own
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// `hue` drives the decorative color cycle; `banner` is a short-lived
    /// message such as "LEVEL UP".
    pub fn render(
        &self,
        frame: &mut Frame,
        state: &GameState,
        metrics: &GameMetrics,
        hue: u16,
        banner: Option<&str>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, metrics, banner), chunks[0]);

        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match state.phase() {
            GamePhase::GameOver => {
                frame.render_widget(self.render_game_over(state, metrics), game_area)
            }
            _ => frame.render_widget(self.render_grid(game_area, state, hue), game_area),
        }

        frame.render_widget(self.render_controls(state.phase()), chunks[2]);
    }

    fn render_grid(&self, _area: Rect, state: &GameState, hue: u16) -> Paragraph<'_> {
        let size = state.grid_size;
        // Segment index per cell, for the per-segment color gradient
        let mut segment_at = vec![None; size * size];
        for (i, seg) in state.snake.segments().enumerate() {
            if state.is_in_bounds(*seg) {
                segment_at[seg.y as usize * size + seg.x as usize] = Some(i);
            }
        }

        let mut lines = Vec::with_capacity(size);
        for y in 0..size {
            let mut spans = Vec::with_capacity(size);
            for x in 0..size {
                let pos = Position::new(x as i32, y as i32);
                let cell = match segment_at[y * size + x] {
                    Some(0) => Span::styled(
                        "■ ",
                        Style::default()
                            .fg(hue_color(hue))
                            .add_modifier(Modifier::BOLD),
                    ),
                    Some(i) => Span::styled(
                        "□ ",
                        Style::default().fg(hue_color(segment_hue(hue, i))),
                    ),
                    None if pos == state.food => Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    None if state.is_power_up_at(pos) => Span::styled(
                        "★ ",
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
                    ),
                    None => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                };
                spans.push(cell);
            }
            lines.push(Line::from(spans));
        }

        if state.phase() == GamePhase::NotStarted {
            lines.push(Line::from(Span::styled(
                "Press an arrow key to start",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )));
        }

        let border = if state.active_power_up.is_some() {
            BorderType::Plain
        } else {
            BorderType::Double
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(border)
                    .border_style(Style::default().fg(hue_color(hue)))
                    .title(" Neon Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(
        &self,
        state: &GameState,
        metrics: &GameMetrics,
        banner: Option<&str>,
    ) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

        let mut spans = vec![
            Span::styled("Score: ", label),
            Span::styled(state.score.to_string(), value),
            Span::raw("   "),
            Span::styled("Level: ", label),
            Span::styled(
                format!(
                    "{} ({}/{})",
                    state.level, state.level_progress, state.points_per_level
                ),
                value,
            ),
            Span::raw("   "),
            Span::styled("Lives: ", label),
            Span::styled(state.lives.to_string(), Style::default().fg(Color::Green)),
            Span::raw("   "),
            Span::styled("Time: ", label),
            Span::styled(format_time(state.elapsed_ms), value),
            Span::raw("   "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.to_string(), value),
        ];

        if let Some(active) = state.active_power_up {
            spans.push(Span::raw("   "));
            spans.push(Span::styled(
                format!("{} {}s", active.kind.label(), active.time_left_ms / 1000),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ));
        }

        let mut lines = vec![Line::from(spans)];
        if let Some(text) = banner {
            lines.push(Line::from(Span::styled(
                text.to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )));
        }

        Paragraph::new(lines).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("   Level: ", Style::default().fg(Color::Yellow)),
                Span::styled(state.level.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(vec![
                Span::styled("Session best: ", Style::default().fg(Color::Gray)),
                Span::styled(metrics.high_score.to_string(), Style::default().fg(Color::White)),
                Span::styled(
                    format!("   Games: {}", metrics.games_played),
                    Style::default().fg(Color::Gray),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
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
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, phase: GamePhase) -> Paragraph<'_> {
        let action = match phase {
            GamePhase::NotStarted => " to start | ",
            _ => " to move | ",
        };
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(action),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
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

/// Hue for body segment `index`, shifted 10 degrees per segment
fn segment_hue(hue: u16, index: usize) -> u16 {
    (hue % 360 + (index % 36) as u16 * 10) % 360
}

/// Fully saturated color at `hue` degrees (lightness 50%)
pub fn hue_color(hue: u16) -> Color {
    let h = f32::from(hue % 360) / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let scale = |c: f32| (c * 255.0).round() as u8;
    Color::Rgb(scale(r), scale(g), scale(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hue_color_primaries() {
        assert_eq!(hue_color(0), Color::Rgb(255, 0, 0));
        assert_eq!(hue_color(120), Color::Rgb(0, 255, 0));
        assert_eq!(hue_color(240), Color::Rgb(0, 0, 255));
        assert_eq!(hue_color(360), hue_color(0));
    }

    #[test]
    fn test_segment_hue_stays_in_range_for_long_snakes() {
        assert_eq!(segment_hue(0, 1), 10);
        assert_eq!(segment_hue(350, 2), 10);
        assert_eq!(segment_hue(40, 36), 40);
        assert_eq!(segment_hue(359, 6_554), segment_hue(359, 6_554 % 36));
        assert!(segment_hue(u16::MAX, usize::MAX) < 360);
    }
}
