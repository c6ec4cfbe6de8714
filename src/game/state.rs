use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::action::Direction;
use super::config::GameConfig;
use super::grid::WallPolicy;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta, with no bounds handling
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction, with no bounds handling
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: VecDeque<Position>,
}

impl Snake {
    /// A fresh single-cell snake
    pub fn new(head: Position) -> Self {
        Self {
            body: VecDeque::from([head]),
        }
    }

    /// Build a snake from explicit segments, head first
    ///
    /// Returns `None` for an empty body.
    pub fn from_segments<I: IntoIterator<Item = Position>>(segments: I) -> Option<Self> {
        let body: VecDeque<Position> = segments.into_iter().collect();
        if body.is_empty() {
            None
        } else {
            Some(Self { body })
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Check if position is on any segment, head and tail included
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub(crate) fn push_head(&mut self, pos: Position) {
        self.body.push_front(pos);
    }

    pub(crate) fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Effect granted by a power-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Leaving the grid wraps around to the opposite edge
    WallPass,
}

impl PowerUpKind {
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::WallPass => "Wall Pass",
        }
    }
}

/// A power-up waiting on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUp {
    pub position: Position,
    pub kind: PowerUpKind,
}

/// A claimed effect and the time it has left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub time_left_ms: u64,
}

/// Top-level lifecycle of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    NotStarted,
    Running,
    GameOver,
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Complete game state, as seen by a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub snake: Snake,
    pub direction: Direction,
    pub food: Position,
    pub power_up: Option<PowerUp>,
    pub active_power_up: Option<ActivePowerUp>,
    pub grid_size: usize,
    pub lives: u32,
    pub score: u32,
    pub level: u32,
    pub level_progress: u32,
    pub points_per_level: u32,
    pub speed_ms: u64,
    pub steps: u32,
    /// Play time accumulated while running
    pub elapsed_ms: u64,
    pub game_over: bool,
    pub game_started: bool,
}

impl GameState {
    /// Fresh state for a new game; the caller places the food
    pub fn new(config: &GameConfig, food: Position) -> Self {
        Self {
            snake: Snake::new(config.center().into()),
            direction: Direction::Right,
            food,
            power_up: None,
            active_power_up: None,
            grid_size: config.grid_size,
            lives: config.initial_lives,
            score: 0,
            level: 1,
            level_progress: 0,
            points_per_level: config.points_per_level,
            speed_ms: config.initial_speed_ms,
            steps: 0,
            elapsed_ms: 0,
            game_over: false,
            game_started: false,
        }
    }

    pub fn phase(&self) -> GamePhase {
        if self.game_over {
            GamePhase::GameOver
        } else if self.game_started {
            GamePhase::Running
        } else {
            GamePhase::NotStarted
        }
    }

    /// Collision policy implied by the active effect
    pub fn wall_policy(&self) -> WallPolicy {
        match self.active_power_up {
            Some(ActivePowerUp {
                kind: PowerUpKind::WallPass,
                ..
            }) => WallPolicy::Wrap,
            None => WallPolicy::Block,
        }
    }

    /// Remaining effect time, zero when nothing is active
    pub fn power_up_time_left_ms(&self) -> u64 {
        self.active_power_up.map_or(0, |a| a.time_left_ms)
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        let size = self.grid_size as i32;
        (0..size).contains(&pos.x) && (0..size).contains(&pos.y)
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }

    pub fn is_power_up_at(&self, pos: Position) -> bool {
        self.power_up.is_some_and(|p| p.position == pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_in_direction(Direction::Down), Position::new(5, 6));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(5, 5));
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), snake.tail());

        assert!(Snake::from_segments(Vec::new()).is_none());

        let snake = Snake::from_segments([
            Position::new(5, 5),
            Position::new(4, 5),
            Position::new(3, 5),
        ])
        .unwrap();
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.tail(), Position::new(3, 5));
    }

    #[test]
    fn test_tail_never_dropped_below_one() {
        let mut snake = Snake::new(Position::new(1, 1));
        snake.drop_tail();
        assert_eq!(snake.len(), 1);

        snake.push_head(Position::new(2, 1));
        snake.drop_tail();
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Position::new(2, 1));
    }

    #[test]
    fn test_occupancy_includes_tail() {
        let snake = Snake::from_segments([Position::new(5, 5), Position::new(4, 5)]).unwrap();
        assert!(snake.occupies(Position::new(5, 5)));
        assert!(snake.occupies(Position::new(4, 5)));
        assert!(!snake.occupies(Position::new(10, 10)));
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::new(&GameConfig::default(), Position::new(15, 15));
        assert_eq!(state.snake.head(), Position::new(10, 10));
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.lives, 3);
        assert_eq!(state.level, 1);
        assert_eq!(state.speed_ms, 150);
        assert_eq!(state.phase(), GamePhase::NotStarted);
        assert_eq!(state.wall_policy(), WallPolicy::Block);
    }

    #[test]
    fn test_wall_policy_follows_active_effect() {
        let mut state = GameState::new(&GameConfig::default(), Position::new(15, 15));
        state.active_power_up = Some(ActivePowerUp {
            kind: PowerUpKind::WallPass,
            time_left_ms: 3_000,
        });
        assert_eq!(state.wall_policy(), WallPolicy::Wrap);
        assert_eq!(state.power_up_time_left_ms(), 3_000);
    }

    #[test]
    fn test_bounds_checking() {
        let state = GameState::new(&GameConfig::default(), Position::new(15, 15));

        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(19, 19)));
        assert!(!state.is_in_bounds(Position::new(-1, 0)));
        assert!(!state.is_in_bounds(Position::new(20, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 20)));
    }
}
