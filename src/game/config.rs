use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the game
///
/// Every gameplay constant lives here so a front end (or a test) can tune the
/// rules without touching the engine. Missing keys in a config file fall back
/// to [`GameConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width and height of the square grid
    pub grid_size: usize,
    /// Lives at the start of a game
    pub initial_lives: u32,

    /// Milliseconds per tick at level 1
    pub initial_speed_ms: u64,
    /// Fastest allowed tick interval
    pub min_speed_ms: u64,
    /// How much the tick interval shrinks on each level up
    pub speed_step_ms: u64,
    /// Food eaten per level
    pub points_per_level: u32,

    // Power-ups
    /// Probability of a power-up appearing when new food is placed
    pub power_up_spawn_chance: f64,
    /// How long a claimed effect lasts
    pub power_up_duration_ms: u64,
    /// How long an unclaimed power-up stays on the board
    pub power_up_exist_ms: u64,
    /// Granularity of the active effect countdown
    pub power_up_countdown_step_ms: u64,

    /// Upper bound on rejection-sampling attempts for a single placement
    pub max_placement_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_lives: 3,
            initial_speed_ms: 150,
            min_speed_ms: 50,
            speed_step_ms: 10,
            points_per_level: 10,
            power_up_spawn_chance: 0.10,
            power_up_duration_ms: 10_000,
            power_up_exist_ms: 15_000,
            power_up_countdown_step_ms: 1_000,
            max_placement_attempts: 10_000,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Load a configuration from a JSON file and validate it
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;

        if let Err(reason) = config.validate() {
            log::warn!("rejecting config {:?}: {}", path, reason);
            bail!("Invalid config {:?}: {}", path, reason);
        }

        Ok(config)
    }

    /// Validate configuration parameters
    ///
    /// Returns `Err(String)` describing the first value out of range.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_size < 2 {
            return Err(format!("grid_size must be at least 2, got {}", self.grid_size));
        }

        if self.grid_size > i32::MAX as usize {
            return Err(format!("grid_size {} does not fit a coordinate", self.grid_size));
        }

        if self.initial_lives == 0 {
            return Err("initial_lives must be at least 1".to_string());
        }

        if self.min_speed_ms == 0 {
            return Err("min_speed_ms must be positive".to_string());
        }

        if self.min_speed_ms > self.initial_speed_ms {
            return Err(format!(
                "min_speed_ms ({}) cannot exceed initial_speed_ms ({})",
                self.min_speed_ms, self.initial_speed_ms
            ));
        }

        if self.points_per_level == 0 {
            return Err("points_per_level must be at least 1".to_string());
        }

        if !(0.0..=1.0).contains(&self.power_up_spawn_chance) {
            return Err(format!(
                "power_up_spawn_chance must be in [0, 1], got {}",
                self.power_up_spawn_chance
            ));
        }

        if self.power_up_countdown_step_ms == 0 {
            return Err("power_up_countdown_step_ms must be positive".to_string());
        }

        if self.power_up_exist_ms == 0 {
            return Err("power_up_exist_ms must be positive".to_string());
        }

        if self.max_placement_attempts == 0 {
            return Err("max_placement_attempts must be at least 1".to_string());
        }

        Ok(())
    }

    /// Cell the snake starts and respawns on
    pub fn center(&self) -> (i32, i32) {
        let c = (self.grid_size / 2) as i32;
        (c, c)
    }

    pub fn power_up_duration(&self) -> Duration {
        Duration::from_millis(self.power_up_duration_ms)
    }

    pub fn power_up_exist(&self) -> Duration {
        Duration::from_millis(self.power_up_exist_ms)
    }

    pub fn power_up_countdown_step(&self) -> Duration {
        Duration::from_millis(self.power_up_countdown_step_ms)
    }
}
