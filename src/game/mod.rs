//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! A front end drives it with ticks, elapsed time and directional input, and reads
//! back a [`GameState`] snapshot plus [`GameEvent`] notifications.

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod spawner;
pub mod state;
pub mod timers;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::GameConfig;
pub use engine::{GameEngine, GameEvent, StepInfo, StepResult};
pub use error::GameError;
pub use grid::{Grid, WallPolicy};
pub use state::{
    ActivePowerUp, CollisionType, GamePhase, GameState, Position, PowerUp, PowerUpKind, Snake,
};
pub use timers::{PowerUpTimers, Timer};
