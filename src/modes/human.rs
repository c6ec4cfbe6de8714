use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, interval, sleep};

use crate::game::{GameConfig, GameEngine, GameEvent};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// How often elapsed time is fed to the power-up timers
const TIMER_RESOLUTION: Duration = Duration::from_millis(100);
/// Redraw and color-cycle cadence
const FRAME_INTERVAL: Duration = Duration::from_millis(50);
/// How long a banner such as "LEVEL UP" stays on screen
const BANNER_DURATION: Duration = Duration::from_millis(1500);

pub struct HumanMode {
    engine: GameEngine<StdRng>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    hue: u16,
    banner: Option<(String, Instant)>,
}

impl HumanMode {
    /// `seed` makes food and power-up placement reproducible
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let engine = GameEngine::with_rng(config, rng).context("Failed to create game engine")?;

        Ok(Self {
            engine,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            hue: 0,
            banner: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Re-armed after every tick so a level-up speed change applies at once
        let tick_sleep = sleep(self.engine.speed());
        tokio::pin!(tick_sleep);

        let mut timer_clock = interval(TIMER_RESOLUTION);
        let mut last_timer_tick = Instant::now();
        let mut frame_timer = interval(FRAME_INTERVAL);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                () = &mut tick_sleep => {
                    self.update_game()?;
                    tick_sleep.as_mut().reset(Instant::now() + self.engine.speed());
                }

                _ = timer_clock.tick() => {
                    let now = Instant::now();
                    let events = self.engine.advance_timers(now - last_timer_tick);
                    last_timer_tick = now;
                    self.on_events(&events);
                }

                _ = frame_timer.tick() => {
                    self.hue = (self.hue + 1) % 360;
                    let banner = self.current_banner();
                    terminal.draw(|frame| {
                        self.renderer.render(
                            frame,
                            self.engine.snapshot(),
                            &self.metrics,
                            self.hue,
                            banner.as_deref(),
                        );
                    }).context("Failed to draw frame")?;
                }

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

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::GameAction(action) => {
                    self.engine.handle_input(action);
                }
                KeyAction::Start => {
                    self.engine.start();
                }
                KeyAction::Restart => self.reset_game()?,
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn update_game(&mut self) -> Result<()> {
        let result = self.engine.tick().context("Game tick failed")?;
        self.on_events(&result.events);
        Ok(())
    }

    fn reset_game(&mut self) -> Result<()> {
        self.engine.reset().context("Failed to reset game")?;
        self.banner = None;
        debug!("game reset by player");
        Ok(())
    }

    fn on_events(&mut self, events: &[GameEvent]) {
        for event in events {
            self.metrics.record(event);

            let banner = match event {
                GameEvent::LevelUp { level, .. } => Some(format!("LEVEL {}!", level)),
                GameEvent::PowerUpClaimed { kind } => Some(format!("{} ACTIVE", kind.label())),
                GameEvent::PowerUpEnded { kind } => Some(format!("{} faded", kind.label())),
                GameEvent::LifeLost { lives_left, .. } => {
                    Some(format!("Ouch! {} lives left", lives_left))
                }
                GameEvent::GameOver { score, .. } => {
                    info!("session: game over at {}, best {}", score, self.metrics.high_score);
                    None
                }
                _ => None,
            };

            if let Some(text) = banner {
                self.banner = Some((text, Instant::now()));
            }
        }
    }

    fn current_banner(&self) -> Option<String> {
        self.banner
            .as_ref()
            .filter(|(_, shown_at)| shown_at.elapsed() < BANNER_DURATION)
            .map(|(text, _)| text.clone())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Action, CollisionType, Direction, GamePhase};

    #[test]
    fn test_game_initialization() {
        let mode = HumanMode::new(GameConfig::default(), Some(7)).unwrap();
        let state = mode.engine.snapshot();
        assert_eq!(state.phase(), GamePhase::NotStarted);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let config = GameConfig {
            initial_lives: 0,
            ..Default::default()
        };
        assert!(HumanMode::new(config, None).is_err());
    }

    #[test]
    fn test_game_reset() {
        let mut mode = HumanMode::new(GameConfig::default(), Some(7)).unwrap();
        mode.engine.handle_input(Action::Move(Direction::Up));
        mode.update_game().unwrap();
        assert_eq!(mode.engine.phase(), GamePhase::Running);

        mode.reset_game().unwrap();
        assert_eq!(mode.engine.phase(), GamePhase::NotStarted);
        assert_eq!(mode.engine.snapshot().steps, 0);
    }

    #[tokio::test]
    async fn test_events_feed_metrics_and_banner() {
        let mut mode = HumanMode::new(GameConfig::default(), Some(7)).unwrap();
        mode.on_events(&[
            GameEvent::FoodEaten { score: 10 },
            GameEvent::LevelUp {
                level: 2,
                speed_ms: 140,
            },
        ]);
        assert_eq!(mode.metrics.high_score, 10);
        assert_eq!(mode.current_banner().as_deref(), Some("LEVEL 2!"));

        mode.on_events(&[GameEvent::GameOver {
            score: 10,
            collision: CollisionType::Wall,
        }]);
        assert_eq!(mode.metrics.games_played, 1);
    }
}
