use thiserror::Error;

/// Failures the engine cannot express as gameplay.
///
/// Life loss and game over are events, not errors. These variants are
/// programming or configuration mistakes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("No free cell found after {attempts} placement attempts")]
    PlacementExhausted { attempts: u32 },
    #[error("Every cell on the grid is occupied")]
    GridFull,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
