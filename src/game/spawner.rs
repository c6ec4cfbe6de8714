use rand::Rng;

use super::error::{GameError, Result};
use super::grid::Grid;
use super::state::Position;

/// Picks free cells for food and power-ups by rejection sampling
#[derive(Debug, Clone, Copy)]
pub struct Spawner {
    grid: Grid,
    max_attempts: u32,
}

impl Spawner {
    pub fn new(grid: Grid, max_attempts: u32) -> Self {
        Self { grid, max_attempts }
    }

    /// Sample uniform cells until one is not occupied
    ///
    /// Gives up after `max_attempts` draws. That only happens when the board
    /// is (nearly) full, which callers treat as fatal.
    pub fn place<R, F>(&self, rng: &mut R, is_occupied: F) -> Result<Position>
    where
        R: Rng + ?Sized,
        F: Fn(Position) -> bool,
    {
        let size = self.grid.size() as i32;
        for _ in 0..self.max_attempts {
            let pos = Position::new(rng.gen_range(0..size), rng.gen_range(0..size));
            if !is_occupied(pos) {
                return Ok(pos);
            }
        }

        if self.grid.cells().all(&is_occupied) {
            log::error!("placement requested on a full {}x{} grid", size, size);
            Err(GameError::GridFull)
        } else {
            log::error!("placement gave up after {} attempts", self.max_attempts);
            Err(GameError::PlacementExhausted {
                attempts: self.max_attempts,
            })
        }
    }

    /// Independent roll for a power-up appearing alongside new food
    pub fn roll_power_up<R: Rng + ?Sized>(&self, rng: &mut R, chance: f64) -> bool {
        rng.gen_bool(chance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_place_avoids_occupied_cells() {
        let spawner = Spawner::new(Grid::new(5), 10_000);
        let mut rng = StdRng::seed_from_u64(7);

        // Everything but (4, 4) is taken
        let free = Position::new(4, 4);
        for _ in 0..20 {
            let pos = spawner.place(&mut rng, |p| p != free).unwrap();
            assert_eq!(pos, free);
        }
    }

    #[test]
    fn test_place_stays_in_grid() {
        let grid = Grid::new(20);
        let spawner = Spawner::new(grid, 10_000);
        let mut rng = StdRng::seed_from_u64(42);
        let occupied: HashSet<Position> = [Position::new(10, 10), Position::new(11, 10)].into();

        for _ in 0..500 {
            let pos = spawner.place(&mut rng, |p| occupied.contains(&p)).unwrap();
            assert!(grid.contains(pos));
            assert!(!occupied.contains(&pos));
        }
    }

    #[test]
    fn test_full_grid_fails_loudly() {
        let spawner = Spawner::new(Grid::new(3), 50);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(spawner.place(&mut rng, |_| true), Err(GameError::GridFull));
    }

    #[test]
    fn test_exhausted_attempts_reported() {
        // A single draw on a grid with one free cell usually misses it
        let spawner = Spawner::new(Grid::new(20), 1);
        let mut rng = StdRng::seed_from_u64(3);
        let free = Position::new(0, 0);
        match spawner.place(&mut rng, |p| p != free) {
            Ok(pos) => assert_eq!(pos, free),
            Err(err) => assert_eq!(err, GameError::PlacementExhausted { attempts: 1 }),
        }
    }

    #[test]
    fn test_power_up_roll_extremes() {
        let spawner = Spawner::new(Grid::new(20), 10);
        let mut rng = StdRng::seed_from_u64(9);
        assert!((0..100).all(|_| !spawner.roll_power_up(&mut rng, 0.0)));
        assert!((0..100).all(|_| spawner.roll_power_up(&mut rng, 1.0)));
    }
}
