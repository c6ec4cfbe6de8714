use std::time::Duration;

use crate::game::GameEvent;

/// Per-session statistics, kept in memory only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameMetrics {
    pub high_score: u32,
    pub best_level: u32,
    pub games_played: u32,
    pub food_eaten: u32,
    pub power_ups_claimed: u32,
    pub lives_lost: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one engine event into the session totals
    pub fn record(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::FoodEaten { score } => {
                self.food_eaten += 1;
                self.high_score = self.high_score.max(score);
            }
            GameEvent::LevelUp { level, .. } => {
                self.best_level = self.best_level.max(level);
            }
            GameEvent::PowerUpClaimed { .. } => self.power_ups_claimed += 1,
            GameEvent::LifeLost { .. } => self.lives_lost += 1,
            GameEvent::GameOver { score, .. } => {
                self.games_played += 1;
                self.lives_lost += 1;
                self.high_score = self.high_score.max(score);
            }
            GameEvent::PowerUpSpawned { .. }
            | GameEvent::PowerUpExpired
            | GameEvent::PowerUpEnded { .. } => {}
        }
    }
}

/// `mm:ss` for a play clock in milliseconds
pub fn format_time(elapsed_ms: u64) -> String {
    let total_secs = Duration::from_millis(elapsed_ms).as_secs();
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CollisionType, PowerUpKind};

    #[test]
    fn test_time_formatting() {
        assert_eq!(format_time(125_000), "02:05");
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(999), "00:00");
        assert_eq!(format_time(3_661_000), "61:01");
    }

    #[test]
    fn test_high_score_tracking() {
        let mut metrics = GameMetrics::new();

        metrics.record(&GameEvent::GameOver {
            score: 10,
            collision: CollisionType::Wall,
        });
        assert_eq!(metrics.high_score, 10);
        assert_eq!(metrics.games_played, 1);

        metrics.record(&GameEvent::GameOver {
            score: 5,
            collision: CollisionType::SelfCollision,
        });
        assert_eq!(metrics.high_score, 10);
        assert_eq!(metrics.games_played, 2);

        metrics.record(&GameEvent::FoodEaten { score: 15 });
        assert_eq!(metrics.high_score, 15);
    }

    #[test]
    fn test_event_counters() {
        let mut metrics = GameMetrics::new();
        let events = [
            GameEvent::FoodEaten { score: 1 },
            GameEvent::PowerUpClaimed {
                kind: PowerUpKind::WallPass,
            },
            GameEvent::LevelUp {
                level: 2,
                speed_ms: 140,
            },
            GameEvent::LifeLost {
                lives_left: 2,
                collision: CollisionType::Wall,
            },
            GameEvent::PowerUpExpired,
        ];
        for event in &events {
            metrics.record(event);
        }

        assert_eq!(metrics.food_eaten, 1);
        assert_eq!(metrics.power_ups_claimed, 1);
        assert_eq!(metrics.best_level, 2);
        assert_eq!(metrics.lives_lost, 1);
        assert_eq!(metrics.games_played, 0);
    }
}
