use log::{debug, info};
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use std::time::Duration;

use super::{
    action::{Action, Direction},
    config::GameConfig,
    error::{GameError, Result},
    grid::Grid,
    spawner::Spawner,
    state::{ActivePowerUp, CollisionType, GamePhase, GameState, Position, PowerUp, PowerUpKind, Snake},
    timers::PowerUpTimers,
};

/// Notifications for a presentation layer (sound, flashes, metrics)
///
/// Events describe what just happened; they are not part of the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    FoodEaten { score: u32 },
    LevelUp { level: u32, speed_ms: u64 },
    PowerUpSpawned { position: Position },
    PowerUpClaimed { kind: PowerUpKind },
    /// An unclaimed power-up left the board
    PowerUpExpired,
    /// An active effect ran out
    PowerUpEnded { kind: PowerUpKind },
    LifeLost { lives_left: u32, collision: CollisionType },
    GameOver { score: u32, collision: CollisionType },
}

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Whether the snake picked up a power-up this step
    pub claimed_power_up: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepResult {
    /// Whether the game has ended
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
    /// Everything worth telling the presentation layer about
    pub events: Vec<GameEvent>,
}

/// The game engine that owns the state and handles all game logic
///
/// Generic over the random source so tests can run on a seeded RNG.
pub struct GameEngine<R = ThreadRng> {
    config: GameConfig,
    grid: Grid,
    spawner: Spawner,
    rng: R,
    state: GameState,
    timers: PowerUpTimers,
    pending_direction: Option<Direction>,
}

impl GameEngine<ThreadRng> {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl GameEngine<StdRng> {
    /// Engine with a reproducible random source
    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn with_rng(config: GameConfig, mut rng: R) -> Result<Self> {
        config.validate().map_err(GameError::InvalidConfig)?;

        let grid = Grid::new(config.grid_size);
        let spawner = Spawner::new(grid, config.max_placement_attempts);
        let state = Self::fresh_state(&config, &spawner, &mut rng)?;

        Ok(Self {
            config,
            grid,
            spawner,
            rng,
            state,
            timers: PowerUpTimers::new(),
            pending_direction: None,
        })
    }

    fn fresh_state(config: &GameConfig, spawner: &Spawner, rng: &mut R) -> Result<GameState> {
        let center = Position::from(config.center());
        let food = spawner.place(rng, |p| p == center)?;
        Ok(GameState::new(config, food))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only view of the current state for rendering
    pub fn snapshot(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    /// Current tick interval; the driving clock should re-read it every cycle
    pub fn speed(&self) -> Duration {
        Duration::from_millis(self.state.speed_ms)
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    pub fn timers(&self) -> &PowerUpTimers {
        &self.timers
    }

    /// NotStarted -> Running; returns false in any other phase
    pub fn start(&mut self) -> bool {
        if self.phase() != GamePhase::NotStarted {
            return false;
        }
        self.state.game_started = true;
        info!("game started");
        true
    }

    /// Reinitialize everything, cancelling any power-up timers
    pub fn reset(&mut self) -> Result<()> {
        self.timers.cancel_all();
        self.pending_direction = None;
        self.state = Self::fresh_state(&self.config, &self.spawner, &mut self.rng)?;
        debug!("game reset, food at {:?}", self.state.food);
        Ok(())
    }

    /// Route a controller action
    ///
    /// Before the game starts, any move only starts it and does not steer.
    /// Returns true if a direction change was queued.
    pub fn handle_input(&mut self, action: Action) -> bool {
        match action {
            Action::Move(direction) => {
                if self.phase() == GamePhase::NotStarted {
                    self.start();
                    false
                } else {
                    self.set_direction(direction)
                }
            }
            Action::Continue => false,
        }
    }

    /// Queue a direction change for the next tick
    ///
    /// Reversals and repeats of the current heading are ignored. A later
    /// valid call before the next tick overwrites an earlier one, but a
    /// repeat of the current heading does not cancel a queued turn.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.state.game_over
            || direction == self.state.direction
            || direction.is_opposite(self.state.direction)
        {
            return false;
        }
        self.pending_direction = Some(direction);
        true
    }

    /// Same as [`GameEngine::set_direction`] for a raw `(dx, dy)` vector
    pub fn set_direction_vector(&mut self, dx: i32, dy: i32) -> bool {
        Direction::from_delta(dx, dy).is_some_and(|d| self.set_direction(d))
    }

    /// Execute one step of the game
    ///
    /// Does nothing unless the game is running.
    pub fn tick(&mut self) -> Result<StepResult> {
        if self.phase() != GamePhase::Running {
            return Ok(StepResult {
                terminated: self.state.game_over,
                ..Default::default()
            });
        }

        if let Some(direction) = self.pending_direction.take() {
            if !direction.is_opposite(self.state.direction) {
                self.state.direction = direction;
            }
        }

        self.state.steps += 1;
        let mut result = StepResult::default();

        let head = self.state.snake.head();
        let policy = self.state.wall_policy();
        // Self-collision is checked against the whole body, tail included
        let stepped = match self.grid.step(head, self.state.direction, policy) {
            None => Err(CollisionType::Wall),
            Some(next) if self.state.snake.occupies(next) => Err(CollisionType::SelfCollision),
            Some(next) => Ok(next),
        };

        let new_head = match stepped {
            Ok(next) => next,
            Err(collision) => {
                result.info.collision_type = Some(collision);
                self.on_fatal_collision(collision, &mut result)?;
                return Ok(result);
            }
        };

        self.state.snake.push_head(new_head);

        if new_head == self.state.food {
            result.info.ate_food = true;
            self.on_food_eaten(&mut result)?;
        } else if self.state.is_power_up_at(new_head) {
            result.info.claimed_power_up = true;
            self.claim_power_up(&mut result);
            self.state.snake.drop_tail();
        } else {
            self.state.snake.drop_tail();
        }

        Ok(result)
    }

    /// Feed elapsed play time to the power-up timers
    ///
    /// Time only passes while the game is running.
    pub fn advance_timers(&mut self, elapsed: Duration) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase() != GamePhase::Running {
            return events;
        }

        self.state.elapsed_ms += elapsed.as_millis() as u64;
        let firings = self.timers.advance(elapsed);

        if firings.despawned && self.state.power_up.take().is_some() {
            info!("power-up expired unclaimed");
            events.push(GameEvent::PowerUpExpired);
        }

        for _ in 0..firings.countdown_steps {
            let Some(active) = self.state.active_power_up.as_mut() else {
                self.timers.cancel_countdown();
                break;
            };
            active.time_left_ms = active
                .time_left_ms
                .saturating_sub(self.config.power_up_countdown_step_ms);

            if active.time_left_ms == 0 {
                let kind = active.kind;
                self.state.active_power_up = None;
                self.timers.cancel_countdown();
                info!("{} wore off", kind.label());
                events.push(GameEvent::PowerUpEnded { kind });
                break;
            }
        }

        events
    }

    fn on_fatal_collision(&mut self, collision: CollisionType, result: &mut StepResult) -> Result<()> {
        if self.state.lives > 1 {
            self.state.lives -= 1;
            self.pending_direction = None;
            self.state.snake = Snake::new(self.config.center().into());
            self.clear_respawn_cell()?;
            info!("{:?} collision, {} lives left", collision, self.state.lives);
            result.events.push(GameEvent::LifeLost {
                lives_left: self.state.lives,
                collision,
            });
        } else {
            self.state.game_over = true;
            self.pending_direction = None;
            self.timers.cancel_all();
            result.terminated = true;
            info!("game over with score {}", self.state.score);
            result.events.push(GameEvent::GameOver {
                score: self.state.score,
                collision,
            });
        }
        Ok(())
    }

    /// Move food or a power-up off the cell the snake respawns on
    fn clear_respawn_cell(&mut self) -> Result<()> {
        let center = self.state.snake.head();
        if self.state.food == center {
            self.state.food = self.place_free_cell()?;
            debug!("food moved off respawn cell to {:?}", self.state.food);
        }
        if self.state.is_power_up_at(center) {
            let position = self.place_free_cell()?;
            if let Some(power_up) = self.state.power_up.as_mut() {
                power_up.position = position;
            }
        }
        Ok(())
    }

    fn on_food_eaten(&mut self, result: &mut StepResult) -> Result<()> {
        let state = &mut self.state;
        state.score += 1;
        state.level_progress = state.score % self.config.points_per_level;
        result.events.push(GameEvent::FoodEaten { score: state.score });

        if state.level_progress == 0 {
            state.level += 1;
            state.speed_ms = state
                .speed_ms
                .saturating_sub(self.config.speed_step_ms)
                .max(self.config.min_speed_ms);
            info!("level {} reached, {}ms per tick", state.level, state.speed_ms);
            result.events.push(GameEvent::LevelUp {
                level: state.level,
                speed_ms: state.speed_ms,
            });
        }

        self.state.food = self.place_free_cell()?;

        if self.state.power_up.is_none()
            && self
                .spawner
                .roll_power_up(&mut self.rng, self.config.power_up_spawn_chance)
        {
            // The food may have taken the last free cell
            match self.place_free_cell() {
                Ok(position) => result.events.push(self.spawn_power_up(position)),
                Err(GameError::GridFull) => debug!("no room for a power-up"),
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// A cell clear of the snake, the food and any power-up
    fn place_free_cell(&mut self) -> Result<Position> {
        let state = &self.state;
        self.spawner.place(&mut self.rng, |p| {
            state.snake.occupies(p) || p == state.food || state.is_power_up_at(p)
        })
    }

    fn spawn_power_up(&mut self, position: Position) -> GameEvent {
        self.state.power_up = Some(PowerUp {
            position,
            kind: PowerUpKind::WallPass,
        });
        self.timers.schedule_despawn(self.config.power_up_exist());
        debug!("power-up spawned at {:?}", position);
        GameEvent::PowerUpSpawned { position }
    }

    fn claim_power_up(&mut self, result: &mut StepResult) {
        let Some(power_up) = self.state.power_up.take() else {
            return;
        };
        self.timers.cancel_despawn();
        self.state.active_power_up = Some(ActivePowerUp {
            kind: power_up.kind,
            time_left_ms: self.config.power_up_duration_ms,
        });
        self.timers
            .schedule_countdown(self.config.power_up_countdown_step());
        info!("{} claimed", power_up.kind.label());
        result.events.push(GameEvent::PowerUpClaimed {
            kind: power_up.kind,
        });
    }
}
